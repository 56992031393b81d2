//! FIFO of closures waiting to run on the main thread.
//!
//! Any thread may push; only the main thread pops. Once closed the queue
//! refuses new work, and closing hands back whatever was still pending so the
//! owner can drop it outside the lock.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A unit of work marshalled onto the main thread.
pub type MainThreadTask = Box<dyn FnOnce() + Send + 'static>;

struct QueueState {
    tasks: VecDeque<MainThreadTask>,
    closed: bool,
}

pub struct TaskQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Append a task and wake the consumer.
    ///
    /// Returns the task back when the queue has been closed. The closed check
    /// and the append happen under one lock, so no task can slip in after
    /// [`TaskQueue::close`] has drained the queue.
    pub fn push(&self, task: MainThreadTask) -> Result<(), MainThreadTask> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(task);
        }
        state.tasks.push_back(task);
        drop(state);
        self.ready.notify_one();
        Ok(())
    }

    pub fn pop(&self) -> Option<MainThreadTask> {
        self.state.lock().tasks.pop_front()
    }

    /// Take every task queued right now, leaving the queue empty.
    pub fn drain(&self) -> VecDeque<MainThreadTask> {
        std::mem::take(&mut self.state.lock().tasks)
    }

    /// Block until the queue holds a task or is closed, or `timeout` elapses.
    /// `None` waits without a deadline. Returns true when tasks are pending.
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        let mut state = self.state.lock();
        match timeout {
            Some(timeout) => {
                if state.tasks.is_empty() && !state.closed {
                    self.ready.wait_for(&mut state, timeout);
                }
            }
            None => {
                while state.tasks.is_empty() && !state.closed {
                    self.ready.wait(&mut state);
                }
            }
        }
        !state.tasks.is_empty()
    }

    /// Refuse further pushes and return the tasks that never ran.
    pub fn close(&self) -> VecDeque<MainThreadTask> {
        let mut state = self.state.lock();
        state.closed = true;
        let abandoned = std::mem::take(&mut state.tasks);
        drop(state);
        self.ready.notify_all();
        abandoned
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().tasks.is_empty()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TaskQueue")
            .field("pending", &state.tasks.len())
            .field("closed", &state.closed)
            .finish()
    }
}
