//! # Task Management System
//!
//! A small worker-thread pool for the terrain pipeline: zone generation and
//! chunk meshing both run off the main thread and report back over channels.
//!
//! ## Architecture Overview
//!
//! - `TaskPool`: central coordinator for task distribution and worker threads
//! - `WorldTask`: a unit of work that runs once on a worker
//! - `TaskOutcome`: what a finished task produced, drained on the main thread
//! - `TaskChannel`: the per-worker task/result channel pair
//!
//! ## Task Lifecycle
//! 1. Tasks are published via [`TaskPool::publish_task`]
//! 2. The pool distributes tasks to workers round-robin; when every worker
//!    is at capacity the task waits in a FIFO overflow queue
//! 3. Workers process tasks and send outcomes back on their result channel
//! 4. The main thread drains outcomes each tick via [`TaskPool::drain_results`]
//!    and re-dispatches the overflow queue via [`TaskPool::process_queued_tasks`]
//!
//! A pool constructed with zero workers never runs anything; every published
//! task lands in the overflow queue. Tests use this to observe scheduling
//! decisions deterministically.

pub mod task;

use log::info;
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use task::{TaskOutcome, WorldTask};

/// The task/result channel pair for one worker thread.
///
/// # Fields
/// - `task_sender`: sends tasks from the main thread to the worker
/// - `result_receiver`: receives outcomes from the worker
/// - `num_tasks_in_flight`: tasks currently dispatched but not yet drained
/// - `_worker`: handle keeping the worker thread alive
pub struct TaskChannel {
    task_sender: Sender<Box<dyn WorldTask>>,
    result_receiver: Receiver<TaskOutcome>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Maximum number of tasks in flight per worker channel.
///
/// Kept at 1 so each channel processes tasks in publication order; raising
/// it would pipeline work at the cost of reordering within a channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskPool {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn WorldTask>>,
    current_channel: usize,
}

impl TaskPool {
    /// Creates a pool with the given number of worker threads. Zero workers
    /// is valid; the pool then only queues.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn WorldTask>>();
            let (result_tx, result_rx) = channel::<TaskOutcome>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let outcome = task.process();
                    let _ = result_tx.send(outcome);
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        info!("task pool started with {num_workers} workers");

        TaskPool {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel, incrementing
    /// the in-flight counter on success. Returns the task on failure so it
    /// can be requeued.
    fn try_send_task(
        &mut self,
        task: Box<dyn WorldTask>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn WorldTask>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(send_error) => Err(send_error.0),
        }
    }

    /// Finds the next worker channel with in-flight capacity, round-robin
    /// from the last used channel so load spreads evenly.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }
        if self
            .channels
            .iter()
            .all(|channel| channel.num_tasks_in_flight >= MAX_TASKS_IN_FLIGHT)
        {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;
        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                info!("all channels are full, but missed the first check");
                return None;
            }
        }
    }

    /// Publishes a task for background execution.
    ///
    /// Returns `true` if the task was dispatched to a worker immediately,
    /// `false` if it was placed in the overflow queue.
    pub fn publish_task(&mut self, task: Box<dyn WorldTask>) -> bool {
        if self.channels.is_empty() {
            self.queued_tasks.push_back(task);
            return false;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Dispatches queued tasks to workers as capacity opens up. Call once
    /// per tick; tasks leave the queue in FIFO order and dispatch stops at
    /// the first moment no worker has capacity.
    pub fn process_queued_tasks(&mut self) {
        if self.queued_tasks.is_empty() {
            return;
        }

        match self.find_available_channel() {
            None => {}
            Some(mut channel_idx) => {
                while let Some(task) = self.queued_tasks.pop_front() {
                    match self.try_send_task(task, channel_idx) {
                        Ok(_) => match self.find_available_channel() {
                            Some(next_idx) => channel_idx = next_idx,
                            None => break,
                        },
                        Err(task) => {
                            // Channel is disconnected; put the task back and
                            // stop dispatching this tick.
                            self.queued_tasks.push_front(task);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Drains every completed outcome from every worker channel, in the
    /// order each channel delivered them. Must be called from the main
    /// thread; outcomes are applied to the terrain store by the caller.
    pub fn drain_results(&mut self) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::new();
        for channel in &mut self.channels {
            while let Ok(outcome) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Number of tasks waiting in the overflow queue.
    pub fn num_queued(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Number of tasks dispatched to workers but not yet drained.
    pub fn num_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }
}
