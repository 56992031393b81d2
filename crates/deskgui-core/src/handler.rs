//! Main-thread marshaller shared by an application and its views.
//!
//! Native windowing toolkits only accept calls from the thread that owns the
//! event loop. [`AppHandler`] remembers which thread that is and lets any
//! other thread hand it a closure, block (or await) until the loop has run
//! it, and get the closure's value back. A panic inside the closure is caught
//! on the main thread and resumed on the caller, so the loop keeps running.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use deskgui_common::MarshalError;
use parking_lot::{Mutex, RwLock};
use tokio::sync::oneshot;
use tracing::{debug, info, trace, warn};

use crate::queue::{MainThreadTask, TaskQueue};

/// Lifecycle of an [`AppHandler`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Main thread recorded, loop not started yet.
    Identified,
    Running,
    /// Queue closed. Marshalled calls fail with [`MarshalError::Terminated`].
    Terminated,
}

type TaskOutcome<T> = thread::Result<T>;

#[derive(Debug)]
pub struct AppHandler {
    name: String,
    main_thread: RwLock<ThreadId>,
    state: Mutex<HandlerState>,
    open_windows: AtomicUsize,
    queue: TaskQueue,
}

impl AppHandler {
    /// Create a handler whose main thread is the calling thread.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            main_thread: RwLock::new(thread::current().id()),
            state: Mutex::new(HandlerState::Identified),
            open_windows: AtomicUsize::new(0),
            queue: TaskQueue::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> HandlerState {
        *self.state.lock()
    }

    pub fn main_thread_id(&self) -> ThreadId {
        *self.main_thread.read()
    }

    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.main_thread_id()
    }

    /// Record the calling thread as the main thread.
    ///
    /// Called when the loop starts, in case it runs on a different thread
    /// than the one that built the application.
    pub fn capture_main_thread(&self) {
        let current = thread::current().id();
        let mut main_thread = self.main_thread.write();
        if *main_thread != current {
            debug!(app = %self.name, ?current, "main thread re-captured");
            *main_thread = current;
        }
    }

    /// Move from `Identified` to `Running`. Returns false in any other state.
    pub(crate) fn mark_running(&self) -> bool {
        let mut state = self.state.lock();
        if *state != HandlerState::Identified {
            return false;
        }
        *state = HandlerState::Running;
        true
    }

    /// Close the task queue for good.
    ///
    /// Tasks still queued are dropped without running; their callers get
    /// [`MarshalError::Abandoned`]. Returns how many were dropped. Calling
    /// this again is a no-op.
    pub fn terminate(&self) -> usize {
        {
            let mut state = self.state.lock();
            if *state == HandlerState::Terminated {
                return 0;
            }
            *state = HandlerState::Terminated;
        }

        let abandoned = self.queue.close();
        let count = abandoned.len();
        drop(abandoned);

        if count > 0 {
            warn!(app = %self.name, count, "dropped main-thread tasks on terminate");
        }
        info!(app = %self.name, "handler terminated");
        count
    }

    pub fn open_windows_count(&self) -> usize {
        self.open_windows.load(Ordering::SeqCst)
    }

    pub(crate) fn window_opened(&self) -> usize {
        self.open_windows.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Decrement the open window count, never below zero. Returns the new count.
    pub(crate) fn window_closed(&self) -> usize {
        let previous = self
            .open_windows
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_sub(1))
            })
            .unwrap_or(0);
        previous.saturating_sub(1)
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Run `task` on the main thread and return its value.
    ///
    /// On the main thread the task runs inline. From any other thread it is
    /// queued, and the caller blocks until the loop has run it. If the task
    /// panics, the panic is resumed on the calling thread.
    ///
    /// Safe to call from a thread driving an async runtime, though it parks
    /// that thread; async code should prefer
    /// [`AppHandler::run_on_main_thread_async`].
    pub fn run_on_main_thread<T, F>(&self, task: F) -> Result<T, MarshalError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.is_main_thread() {
            return Ok(task());
        }
        let (sender, receiver) = mpsc::sync_channel(1);
        self.post(task, move |outcome| {
            let _ = sender.send(outcome);
        })?;
        settle(receiver.recv())
    }

    /// Async form of [`AppHandler::run_on_main_thread`]. Awaits the result
    /// instead of blocking the calling thread.
    pub async fn run_on_main_thread_async<T, F>(&self, task: F) -> Result<T, MarshalError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.is_main_thread() {
            return Ok(task());
        }
        let (sender, receiver) = oneshot::channel();
        self.post(task, move |outcome| {
            // The caller may have stopped waiting (dropped future).
            let _ = sender.send(outcome);
        })?;
        settle(receiver.await)
    }

    /// Queue `task`; `reply` receives its outcome on the main thread. If the
    /// task is dropped unrun, so is `reply`, which the waiting side sees as a
    /// closed channel.
    fn post<T, F, R>(&self, task: F, reply: R) -> Result<(), MarshalError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
        R: FnOnce(TaskOutcome<T>) + Send + 'static,
    {
        let wrapped: MainThreadTask = Box::new(move || {
            reply(panic::catch_unwind(AssertUnwindSafe(task)));
        });

        self.queue
            .push(wrapped)
            .map_err(|_| MarshalError::Terminated)?;
        trace!(app = %self.name, "task queued for main thread");
        Ok(())
    }

    /// Wait for queued work and run every task present when the wait ends.
    ///
    /// `wait` bounds how long to block for the first task; `None` blocks
    /// until a task arrives or the handler terminates. Returns how many tasks
    /// ran. Does nothing off the main thread.
    pub fn pump(&self, wait: Option<Duration>) -> usize {
        if !self.is_main_thread() {
            warn!(app = %self.name, "pump called off the main thread, ignoring");
            return 0;
        }
        if !self.queue.wait(wait) {
            return 0;
        }

        let batch = self.queue.drain();
        let count = batch.len();
        for task in batch {
            task();
        }
        trace!(app = %self.name, count, "ran main-thread tasks");
        count
    }
}

fn settle<T, E>(outcome: Result<TaskOutcome<T>, E>) -> Result<T, MarshalError> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(payload)) => panic::resume_unwind(payload),
        Err(_) => Err(MarshalError::Abandoned),
    }
}
