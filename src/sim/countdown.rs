//! Countdown clock

use std::fmt;

use super::scheduler::{IntervalId, Scheduler, Task};
use crate::align_number;
use crate::consts::COUNTDOWN_TICK_MS;

/// Remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub minutes: u32,
    pub seconds: u32,
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", align_number(self.minutes), align_number(self.seconds))
    }
}

/// Notification produced by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Updated(Clock),
    /// Terminal; the interval is already cancelled
    Ended,
}

/// Minutes/seconds countdown driven by a 1 s interval
#[derive(Debug, Clone)]
pub struct Countdown {
    clock: Clock,
    interval: Option<IntervalId>,
}

impl Countdown {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            clock: Clock { minutes, seconds },
            interval: None,
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Start ticking. Already running is a no-op.
    pub fn run(&mut self, scheduler: &mut Scheduler) {
        if self.interval.is_none() {
            self.interval = Some(scheduler.set_interval(COUNTDOWN_TICK_MS, Task::Countdown));
        }
    }

    /// One second elapsed
    pub fn tick(&mut self, scheduler: &mut Scheduler) -> CountdownEvent {
        if self.clock.seconds == 0 {
            if self.clock.minutes == 0 {
                return self.stop(scheduler);
            }
            self.clock.minutes -= 1;
            self.clock.seconds = 59;
        } else {
            self.clock.seconds -= 1;
        }
        CountdownEvent::Updated(self.clock)
    }

    /// Stop ticking without notifying; `run` resumes from the same time
    pub fn pause(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.interval.take() {
            scheduler.clear_interval(id);
        }
    }

    /// Stop ticking and report the end
    pub fn stop(&mut self, scheduler: &mut Scheduler) -> CountdownEvent {
        self.pause(scheduler);
        CountdownEvent::Ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(
        countdown: &mut Countdown,
        scheduler: &mut Scheduler,
        n: usize,
    ) -> Vec<CountdownEvent> {
        (0..n).map(|_| countdown.tick(scheduler)).collect()
    }

    #[test]
    fn test_counts_down_to_end() {
        let mut scheduler = Scheduler::new();
        let mut countdown = Countdown::new(0, 3);
        countdown.run(&mut scheduler);

        let events = ticks(&mut countdown, &mut scheduler, 4);
        assert_eq!(
            events,
            vec![
                CountdownEvent::Updated(Clock { minutes: 0, seconds: 2 }),
                CountdownEvent::Updated(Clock { minutes: 0, seconds: 1 }),
                CountdownEvent::Updated(Clock { minutes: 0, seconds: 0 }),
                CountdownEvent::Ended,
            ]
        );
        assert!(!countdown.is_running());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_minute_underflow() {
        let mut scheduler = Scheduler::new();
        let mut countdown = Countdown::new(1, 0);
        assert_eq!(
            countdown.tick(&mut scheduler),
            CountdownEvent::Updated(Clock { minutes: 0, seconds: 59 })
        );
    }

    #[test]
    fn test_pause_keeps_time() {
        let mut scheduler = Scheduler::new();
        let mut countdown = Countdown::new(0, 10);
        countdown.run(&mut scheduler);
        countdown.tick(&mut scheduler);
        countdown.pause(&mut scheduler);

        assert!(!countdown.is_running());
        assert!(scheduler.is_empty());
        assert_eq!(countdown.clock(), Clock { minutes: 0, seconds: 9 });

        countdown.run(&mut scheduler);
        assert!(countdown.is_running());
        assert_eq!(
            countdown.tick(&mut scheduler),
            CountdownEvent::Updated(Clock { minutes: 0, seconds: 8 })
        );
    }

    #[test]
    fn test_run_twice_keeps_one_interval() {
        let mut scheduler = Scheduler::new();
        let mut countdown = Countdown::new(1, 0);
        countdown.run(&mut scheduler);
        countdown.run(&mut scheduler);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_stop_always_ends() {
        let mut scheduler = Scheduler::new();
        let mut countdown = Countdown::new(5, 0);
        countdown.run(&mut scheduler);
        assert_eq!(countdown.stop(&mut scheduler), CountdownEvent::Ended);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_clock_display() {
        assert_eq!(Clock { minutes: 2, seconds: 5 }.to_string(), "02:05");
        assert_eq!(Clock { minutes: 12, seconds: 30 }.to_string(), "12:30");
    }
}
