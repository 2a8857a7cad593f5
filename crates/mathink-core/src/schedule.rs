//! Deferred board tasks (shape previews, highlight reverts, staggered results).
//!
//! The host passes `now` in on every call, so the scheduler never reads the
//! clock itself and is deterministic under test.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TaskId,
    at: Instant,
    payload: T,
}

/// A queue of payloads that become due at given instants.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    tasks: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at `at`.
    pub fn schedule(&mut self, at: Instant, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Scheduled { id, at, payload });
        id
    }

    /// Schedule `payload` to fire `delay` after `now`.
    pub fn schedule_after(&mut self, now: Instant, delay: Duration, payload: T) -> TaskId {
        self.schedule(now + delay, payload)
    }

    /// Cancel a task. Returns its payload if it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index).payload)
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    /// Remove and return every task due at or before `now`, earliest first.
    /// Tasks due at the same instant fire in scheduling order.
    pub fn due(&mut self, now: Instant) -> Vec<(TaskId, T)> {
        let (mut ready, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.at <= now);
        self.tasks = pending;
        ready.sort_by_key(|task| (task.at, task.id));
        ready.into_iter().map(|task| (task.id, task.payload)).collect()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.iter().map(|task| task.at).min()
    }

    /// Drop all pending tasks.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
