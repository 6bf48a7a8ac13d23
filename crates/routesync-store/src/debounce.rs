//! Debounced history writes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use routesync_core::IMMEDIATE_THRESHOLD_MS;

/// Handle for a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Schedules one-shot callbacks.
pub trait Timer {
    /// Run `callback` once after `delay`.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a callback that has not run yet. Unknown ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// Keeps at most one pending callback; scheduling replaces it.
///
/// Delays at or below the threshold run synchronously. Without a timer
/// every task runs synchronously.
pub struct Debouncer {
    timer: Option<Rc<dyn Timer>>,
    pending: Rc<Cell<Option<TimerId>>>,
    threshold: Duration,
}

impl Debouncer {
    /// Create a debouncer on top of `timer`.
    pub fn new(timer: Rc<dyn Timer>) -> Self {
        Self {
            timer: Some(timer),
            pending: Rc::new(Cell::new(None)),
            threshold: Duration::from_millis(IMMEDIATE_THRESHOLD_MS),
        }
    }

    /// Create a debouncer that always runs tasks immediately.
    pub fn immediate() -> Self {
        Self {
            timer: None,
            pending: Rc::new(Cell::new(None)),
            threshold: Duration::from_millis(IMMEDIATE_THRESHOLD_MS),
        }
    }

    /// Cancel the pending task, then run `task` now or after `delay`.
    pub fn schedule(&self, delay: Duration, task: impl FnOnce() + 'static) {
        self.cancel();

        match &self.timer {
            Some(timer) if delay > self.threshold => {
                let pending = Rc::clone(&self.pending);
                let id = timer.schedule(
                    delay,
                    Box::new(move || {
                        pending.set(None);
                        task();
                    }),
                );
                self.pending.set(Some(id));
            }
            _ => task(),
        }
    }

    /// Drop the pending task, if any.
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(timer) = &self.timer {
                timer.cancel(id);
            }
        }
    }

    /// Check if a task is waiting on the timer.
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("timer", &self.timer.is_some())
            .field("pending", &self.pending.get())
            .field("threshold", &self.threshold)
            .finish()
    }
}

/// Timer driven by explicit calls to [`ManualTimer::advance`].
///
/// Clones share the same clock and queue.
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    tasks: Vec<ManualTask>,
}

struct ManualTask {
    id: TimerId,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this clock.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of callbacks waiting to run.
    pub fn pending(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Move the clock forward, running due callbacks in order.
    ///
    /// Returns how many callbacks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;

        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id.0))
                    .map(|(i, _)| i);
                match next {
                    Some(i) => {
                        let task = state.tasks.remove(i);
                        state.now = task.due;
                        task
                    }
                    None => break,
                }
            };
            // callbacks may schedule again, so no borrow is held here
            (task.callback)();
            fired += 1;
        }

        self.state.borrow_mut().now = target;
        fired
    }

    /// Run everything currently queued.
    pub fn run_all(&self) -> usize {
        let last_due = self.state.borrow().tasks.iter().map(|t| t.due).max();
        match last_due {
            Some(due) => self.advance(due.saturating_sub(self.now())),
            None => 0,
        }
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TimerId(state.next_id);
        let due = state.now + delay;
        state.tasks.push(ManualTask { id, due, callback });
        id
    }

    fn cancel(&self, id: TimerId) {
        self.state.borrow_mut().tasks.retain(|t| t.id != id);
    }
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualTimer")
            .field("now", &state.now)
            .field("pending", &state.tasks.len())
            .finish()
    }
}
