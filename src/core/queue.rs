// Copyright 2026 the Multistate Authors
// SPDX-License-Identifier: Apache-2.0

//! A single-threaded task queue standing in for the host UI thread.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::num::NonZeroU64;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier of a task posted to a [`UiQueue`].
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct TaskId(NonZeroU64);

impl TaskId {
    /// Allocate a new unique id.
    pub fn next() -> Self {
        static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        let id = TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).unwrap())
    }
}

struct Task {
    id: TaskId,
    run: Box<dyn FnOnce()>,
}

struct QueueState {
    tasks: VecDeque<Task>,
}

/// A FIFO queue of one-shot tasks, all of which run on the thread that drains it.
///
/// This models the host GUI environment's UI-thread message queue: widgets post
/// work that must happen "on the next pass", after whatever the current pass is
/// doing has settled. There is no parallelism; tasks run exactly in the order
/// they were posted, when the owner of the queue calls [`run_until_idle`].
///
/// `UiQueue` is a cheap-to-clone handle; all clones share the same queue.
///
/// [`run_until_idle`]: UiQueue::run_until_idle
#[derive(Clone)]
pub struct UiQueue {
    state: Rc<RefCell<QueueState>>,
}

impl UiQueue {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(QueueState {
                tasks: VecDeque::new(),
            })),
        }
    }

    /// Post a task to run on the next drain. Returns an id usable with [`cancel`].
    ///
    /// [`cancel`]: UiQueue::cancel
    pub fn post(&self, run: impl FnOnce() + 'static) -> TaskId {
        let id = TaskId::next();
        self.state.borrow_mut().tasks.push_back(Task {
            id,
            run: Box::new(run),
        });
        id
    }

    /// Remove a pending task.
    ///
    /// Returns false if the task already ran or was never posted here; canceling
    /// a completed task is a harmless no-op.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id != id);
        state.tasks.len() != before
    }

    /// The number of tasks currently waiting to run.
    pub fn pending(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Run tasks in FIFO order until the queue is empty, returning how many ran.
    ///
    /// Tasks may post or cancel other tasks while running; a task posted during
    /// the drain runs in the same drain, after everything already queued.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            // The borrow must not be held while the task runs.
            let task = self.state.borrow_mut().tasks.pop_front();
            let Some(task) = task else {
                break;
            };
            (task.run)();
            ran += 1;
        }
        ran
    }
}

impl Default for UiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UiQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn runs_in_fifo_order() {
        let queue = UiQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..4 {
            let log = log.clone();
            queue.post(move || log.borrow_mut().push(i));
        }

        assert_eq!(queue.pending(), 4);
        assert_eq!(queue.run_until_idle(), 4);
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn cancel_removes_pending_task() {
        let queue = UiQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log2 = log.clone();
        let first = queue.post(move || log2.borrow_mut().push("first"));
        let log2 = log.clone();
        let _second = queue.post(move || log2.borrow_mut().push("second"));

        assert!(queue.cancel(first));
        queue.run_until_idle();
        assert_eq!(*log.borrow(), vec!["second"]);

        // Canceling after the fact is a no-op.
        assert!(!queue.cancel(first));
    }

    #[test]
    fn task_posted_during_drain_runs_in_same_drain() {
        let queue = UiQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_log = log.clone();
        let inner_queue = queue.clone();
        queue.post(move || {
            inner_log.borrow_mut().push("outer");
            let inner_log = inner_log.clone();
            inner_queue.post(move || inner_log.borrow_mut().push("inner"));
        });

        assert_eq!(queue.run_until_idle(), 2);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }
}
