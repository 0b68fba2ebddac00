//! # Core Module
//!
//! Fundamental concurrency primitives used throughout the world engine.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `WeakResource`: Non-owning companion handle to an `MtResource`
//!
//! Chunks are shared between the main thread and background workers through
//! `MtResource`, while neighbor links between chunks are `WeakResource`s so
//! that the link graph never owns anything.

pub mod mt_resource;

pub use mt_resource::{MtResource, WeakResource};
