use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::poller::Timers;

enum Task {
    Once(Box<dyn FnOnce()>),
    Every(Duration, Rc<dyn Fn()>),
}

struct Pending {
    id: u64,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct State {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
    ignore_clears: bool,
}

/// Virtual time for poller tests. Timers fire only inside `advance`, in
/// deadline order, with `now()` set to each timer's deadline.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<State>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock whose timers keep firing after being cleared.
    pub fn ignoring_clears() -> Self {
        let clock = Self::default();
        clock.state.borrow_mut().ignore_clears = true;
        clock
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        while let Some(task) = self.pop_due(target) {
            match task {
                Task::Once(f) => f(),
                Task::Every(_, f) => f(),
            }
        }
        self.state.borrow_mut().now = target;
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut state = self.state.borrow_mut();
        let index = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;
        let timer = state.pending.remove(index);
        state.now = timer.due;
        match timer.task {
            Task::Once(f) => Some(Task::Once(f)),
            Task::Every(period, f) => {
                // same id, so clearing the interval still finds it
                state.pending.push(Pending {
                    id: timer.id,
                    due: timer.due + period,
                    task: Task::Every(period, Rc::clone(&f)),
                });
                Some(Task::Every(period, f))
            }
        }
    }

    fn schedule(&self, delay: Duration, task: Task) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + delay;
        state.pending.push(Pending { id, due, task });
        id
    }

    fn clear(&self, id: u64) {
        let mut state = self.state.borrow_mut();
        if !state.ignore_clears {
            state.pending.retain(|p| p.id != id);
        }
    }
}

impl Timers for ManualClock {
    type Timeout = u64;
    type Interval = u64;

    fn set_timeout(&self, delay: Duration, f: Box<dyn FnOnce()>) -> Option<u64> {
        Some(self.schedule(delay, Task::Once(f)))
    }

    fn set_interval(&self, period: Duration, f: Box<dyn Fn()>) -> Option<u64> {
        Some(self.schedule(period, Task::Every(period, Rc::from(f))))
    }

    fn clear_timeout(&self, handle: u64) {
        self.clear(handle);
    }

    fn clear_interval(&self, handle: u64) {
        self.clear(handle);
    }
}
