use leptos::leptos_dom::helpers::{
    set_interval_with_handle, set_timeout_with_handle, IntervalHandle, TimeoutHandle,
};
use log::{debug, error};
use rand::Rng;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollerError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}

/// Where the poller gets its timers from.
pub trait Timers: Clone + 'static {
    type Timeout: 'static;
    type Interval: 'static;

    fn set_timeout(&self, delay: Duration, f: Box<dyn FnOnce()>) -> Option<Self::Timeout>;
    fn set_interval(&self, period: Duration, f: Box<dyn Fn()>) -> Option<Self::Interval>;
    fn clear_timeout(&self, handle: Self::Timeout);
    fn clear_interval(&self, handle: Self::Interval);
}

/// `window.setTimeout` / `window.setInterval` through Leptos.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimers;

impl Timers for BrowserTimers {
    type Timeout = TimeoutHandle;
    type Interval = IntervalHandle;

    fn set_timeout(&self, delay: Duration, f: Box<dyn FnOnce()>) -> Option<TimeoutHandle> {
        set_timeout_with_handle(f, delay)
            .map_err(|e| error!("Failed to schedule timeout: {e:?}"))
            .ok()
    }

    fn set_interval(&self, period: Duration, f: Box<dyn Fn()>) -> Option<IntervalHandle> {
        set_interval_with_handle(f, period)
            .map_err(|e| error!("Failed to schedule interval: {e:?}"))
            .ok()
    }

    fn clear_timeout(&self, handle: TimeoutHandle) {
        handle.clear();
    }

    fn clear_interval(&self, handle: IntervalHandle) {
        handle.clear();
    }
}

/// Picks the delay before the first scheduled (non-immediate) call.
pub trait Jitter {
    fn delay(&mut self, interval: Duration) -> Duration;
}

/// Uniform in `[0, interval)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn delay(&mut self, interval: Duration) -> Duration {
        let nanos = u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX);
        if nanos == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(rand::thread_rng().gen_range(0..nanos))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl Jitter for FixedJitter {
    fn delay(&mut self, _interval: Duration) -> Duration {
        self.0
    }
}

struct Schedule<T: Timers> {
    live: Cell<bool>,
    timeout: RefCell<Option<T::Timeout>>,
    interval: RefCell<Option<T::Interval>>,
}

impl<T: Timers> Schedule<T> {
    fn is_live(this: &Weak<Self>) -> bool {
        this.upgrade().is_some_and(|s| s.live.get())
    }
}

/// Calls a fetch function now, once more after a random delay below the
/// interval, and then every interval until stopped or dropped.
///
/// The random first delay keeps widgets that mount together from hitting
/// the backend in lockstep.
pub struct StaggeredPoller<T: Timers, J: Jitter = RandomJitter> {
    timers: T,
    jitter: J,
    schedule: Option<Rc<Schedule<T>>>,
    delay: Option<Duration>,
}

impl<T: Timers> StaggeredPoller<T, RandomJitter> {
    pub fn new(timers: T) -> Self {
        Self::with_jitter(timers, RandomJitter)
    }
}

impl<T: Timers, J: Jitter> StaggeredPoller<T, J> {
    pub fn with_jitter(timers: T, jitter: J) -> Self {
        Self {
            timers,
            jitter,
            schedule: None,
            delay: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.schedule.is_some()
    }

    /// Jitter delay drawn for the current activation.
    pub fn current_delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Tears down any running schedule and starts a fresh one. Returns the
    /// jitter delay drawn for this activation.
    pub fn start(&mut self, callback: Rc<dyn Fn()>, interval: Duration) -> Result<Duration, PollerError> {
        if interval.is_zero() {
            return Err(PollerError::ZeroInterval);
        }
        self.stop();

        let delay = self.jitter.delay(interval);
        let schedule = Rc::new(Schedule::<T> {
            live: Cell::new(true),
            timeout: RefCell::new(None),
            interval: RefCell::new(None),
        });
        self.schedule = Some(Rc::clone(&schedule));
        self.delay = Some(delay);
        debug!("Poller started: first delay {delay:?}, interval {interval:?}");

        callback();

        let timers = self.timers.clone();
        let weak = Rc::downgrade(&schedule);
        let handle = self.timers.set_timeout(
            delay,
            Box::new(move || {
                let Some(schedule) = weak.upgrade().filter(|s| s.live.get()) else {
                    return;
                };
                schedule.timeout.borrow_mut().take();
                callback();
                // the callback may have stopped the schedule itself
                if !schedule.live.get() {
                    return;
                }

                let weak = Rc::downgrade(&schedule);
                let repeat = Rc::clone(&callback);
                let handle = timers.set_interval(
                    interval,
                    Box::new(move || {
                        if Schedule::is_live(&weak) {
                            repeat();
                        }
                    }),
                );
                *schedule.interval.borrow_mut() = handle;
            }),
        );
        *schedule.timeout.borrow_mut() = handle;

        Ok(delay)
    }

    /// Cancels the pending delayed call and the steady interval. Nothing
    /// fires after this returns, even if a timer was already queued.
    pub fn stop(&mut self) {
        let Some(schedule) = self.schedule.take() else {
            return;
        };
        schedule.live.set(false);
        if let Some(handle) = schedule.timeout.borrow_mut().take() {
            self.timers.clear_timeout(handle);
        }
        if let Some(handle) = schedule.interval.borrow_mut().take() {
            self.timers.clear_interval(handle);
        }
        self.delay = None;
        debug!("Poller stopped");
    }
}

impl<T: Timers, J: Jitter> Drop for StaggeredPoller<T, J> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::clock::ManualClock;

    fn recorder(clock: &ManualClock) -> (Rc<RefCell<Vec<Duration>>>, Rc<dyn Fn()>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let clock = clock.clone();
        (calls, Rc::new(move || sink.borrow_mut().push(clock.now())))
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_immediate_then_jitter_then_steady() {
        let clock = ManualClock::new();
        let (calls, callback) = recorder(&clock);
        let mut poller = StaggeredPoller::with_jitter(clock.clone(), FixedJitter(secs(3)));

        poller.start(callback, secs(10)).unwrap();
        assert_eq!(*calls.borrow(), vec![secs(0)]);

        clock.advance(secs(35));
        assert_eq!(*calls.borrow(), vec![secs(0), secs(3), secs(13), secs(23), secs(33)]);
    }

    #[test]
    fn test_random_delay_is_below_interval() {
        for interval in [1u64, 7, 30, 300] {
            let clock = ManualClock::new();
            let (calls, callback) = recorder(&clock);
            let mut poller = StaggeredPoller::new(clock.clone());
            let interval = secs(interval);

            let delay = poller.start(callback, interval).unwrap();
            assert!(delay < interval);
            assert_eq!(poller.current_delay(), Some(delay));

            clock.advance(interval * 3);
            let calls = calls.borrow();
            assert_eq!(calls[0], Duration::ZERO);
            assert_eq!(calls[1], delay);
            assert_eq!(calls[2], delay + interval);
            assert_eq!(calls[3], delay + interval * 2);
        }
    }

    #[test]
    fn test_nothing_fires_after_stop() {
        let clock = ManualClock::new();
        let (calls, callback) = recorder(&clock);
        let mut poller = StaggeredPoller::with_jitter(clock.clone(), FixedJitter(secs(2)));

        poller.start(callback, secs(5)).unwrap();
        clock.advance(secs(8));
        assert_eq!(calls.borrow().len(), 3);

        poller.stop();
        assert!(!poller.is_active());
        clock.advance(secs(100));
        assert_eq!(calls.borrow().len(), 3);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_queued_timers_are_inert_after_stop() {
        // Timers that ignore clear requests, like a callback already queued
        // on the event loop.
        let clock = ManualClock::ignoring_clears();
        let (calls, callback) = recorder(&clock);
        let mut poller = StaggeredPoller::with_jitter(clock.clone(), FixedJitter(secs(1)));

        poller.start(callback, secs(4)).unwrap();
        clock.advance(secs(2));
        assert_eq!(calls.borrow().len(), 2);

        poller.stop();
        clock.advance(secs(60));
        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn test_stop_before_first_delay() {
        let clock = ManualClock::ignoring_clears();
        let (calls, callback) = recorder(&clock);
        let mut poller = StaggeredPoller::with_jitter(clock.clone(), FixedJitter(secs(9)));

        poller.start(callback, secs(10)).unwrap();
        poller.stop();
        clock.advance(secs(60));
        assert_eq!(*calls.borrow(), vec![secs(0)]);
    }

    #[test]
    fn test_restart_replaces_schedule() {
        let clock = ManualClock::new();
        let (old_calls, old) = recorder(&clock);
        let (new_calls, new) = recorder(&clock);
        let mut poller = StaggeredPoller::new(clock.clone());

        poller.start(old, secs(10)).unwrap();
        clock.advance(secs(1));
        let delay = poller.start(new, secs(20)).unwrap();
        let old_count = old_calls.borrow().len();

        clock.advance(secs(100));
        assert_eq!(old_calls.borrow().len(), old_count);
        let new_calls = new_calls.borrow();
        assert_eq!(new_calls[0], secs(1));
        assert_eq!(new_calls[1], secs(1) + delay);
        assert_eq!(new_calls[2], secs(1) + delay + secs(20));
    }

    #[test]
    fn test_drop_tears_down() {
        let clock = ManualClock::ignoring_clears();
        let (calls, callback) = recorder(&clock);
        {
            let mut poller = StaggeredPoller::with_jitter(clock.clone(), FixedJitter(secs(1)));
            poller.start(callback, secs(2)).unwrap();
        }
        clock.advance(secs(30));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_callback_that_stops_leaves_no_timers() {
        let clock = ManualClock::new();
        let poller = Rc::new(RefCell::new(StaggeredPoller::with_jitter(
            clock.clone(),
            FixedJitter(secs(1)),
        )));
        let calls = Rc::new(Cell::new(0));
        let callback: Rc<dyn Fn()> = {
            let calls = Rc::clone(&calls);
            let poller = Rc::downgrade(&poller);
            Rc::new(move || {
                calls.set(calls.get() + 1);
                // the first call happens inside `start`, while the poller is borrowed
                if calls.get() == 2 {
                    if let Some(poller) = poller.upgrade() {
                        poller.borrow_mut().stop();
                    }
                }
            })
        };

        poller.borrow_mut().start(callback, secs(5)).unwrap();
        clock.advance(secs(30));
        assert_eq!(calls.get(), 2);
        assert!(!poller.borrow().is_active());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let clock = ManualClock::new();
        let (calls, callback) = recorder(&clock);
        let mut poller = StaggeredPoller::new(clock.clone());
        assert_eq!(
            poller.start(callback, Duration::ZERO),
            Err(PollerError::ZeroInterval)
        );
        assert!(calls.borrow().is_empty());
        assert!(!poller.is_active());
    }
}
