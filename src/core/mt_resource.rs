use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be shared
/// across threads. It uses an `Arc<RwLock<T>>` internally to manage concurrent access.
/// This is how chunks travel between the terrain store and the background workers:
/// the store keeps one handle, and every dispatched task clones its own.
///
/// # Examples
///
/// ```
/// use voxel_world::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Performance Considerations
/// - Read operations (`get()`) can occur concurrently
/// - Write operations (`get_mut()`) are exclusive and will block other operations
/// - Prefer `get()` when possible to allow concurrent reads
pub struct MtResource<T: Send + Sync> {
    pub resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard that allows reading the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a mutable guard that allows modifying the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }

    /// Creates a non-owning handle to the same resource.
    ///
    /// The returned `WeakResource` does not keep the value alive; it is the
    /// right shape for back-references such as chunk neighbor links, where an
    /// owning handle would form a reference cycle.
    pub fn downgrade(&self) -> WeakResource<T> {
        WeakResource {
            resource: Arc::downgrade(&self.resource),
        }
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

/// A non-owning counterpart to [`MtResource`].
///
/// Upgrading yields `None` once every owning handle has been dropped, so a
/// stale link reads as "no neighbor" instead of dangling.
pub struct WeakResource<T: Send + Sync> {
    resource: Weak<RwLock<T>>,
}

impl<T: Send + Sync + 'static> WeakResource<T> {
    /// Attempts to recover an owning handle to the resource.
    pub fn upgrade(&self) -> Option<MtResource<T>> {
        self.resource.upgrade().map(|resource| MtResource { resource })
    }
}

impl<T: Send + Sync> Clone for WeakResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn shared_mutation_across_threads() {
        let counter = MtResource::new(0);
        let counter_clone = counter.clone();

        let handle = thread::spawn(move || {
            *counter_clone.get_mut() += 1;
        });

        handle.join().unwrap();
        assert_eq!(*counter.get(), 1);
    }

    #[test]
    fn weak_handle_does_not_keep_resource_alive() {
        let strong = MtResource::new(5);
        let weak = strong.downgrade();
        assert_eq!(*weak.upgrade().unwrap().get(), 5);

        drop(strong);
        assert!(weak.upgrade().is_none());
    }
}
