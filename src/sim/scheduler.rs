//! Repeating intervals over virtual time
//!
//! The single-threaded equivalent of `setInterval`/`clearInterval`. Time only
//! moves when the caller advances it, so every timing rule is reproducible.

use super::fish::FishId;

/// Handle returned by [`Scheduler::set_interval`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntervalId(u32);

/// What a firing interval asks the game to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// One countdown second
    Countdown,
    /// Spawner attempt
    Spawn,
    /// Motion tick for one fish
    Motion(FishId),
}

#[derive(Debug, Clone)]
struct Interval {
    id: IntervalId,
    period_ms: f64,
    next_due_ms: f64,
    task: Task,
}

/// Virtual clock plus the set of live intervals
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: f64,
    intervals: Vec<Interval>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time (ms since creation)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Fire `task` every `period_ms`, first firing one period from now
    pub fn set_interval(&mut self, period_ms: f64, task: Task) -> IntervalId {
        // A zero period would fire forever within one advance
        let period_ms = period_ms.max(1.0);
        let id = IntervalId(self.next_id);
        self.next_id += 1;
        self.intervals.push(Interval {
            id,
            period_ms,
            next_due_ms: self.now_ms + period_ms,
            task,
        });
        id
    }

    /// Cancel an interval. Unknown or already cleared ids are ignored.
    pub fn clear_interval(&mut self, id: IntervalId) {
        self.intervals.retain(|i| i.id != id);
    }

    pub fn is_active(&self, id: IntervalId) -> bool {
        self.intervals.iter().any(|i| i.id == id)
    }

    /// Number of live intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Pop the earliest interval due at or before `until_ms`.
    ///
    /// Moves the clock to its due time and reschedules it. Ties fire in
    /// creation order. Callers loop until `None`, then call [`Self::settle`].
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(IntervalId, Task)> {
        let interval = self
            .intervals
            .iter_mut()
            .filter(|i| i.next_due_ms <= until_ms)
            .min_by(|a, b| {
                a.next_due_ms
                    .partial_cmp(&b.next_due_ms)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            })?;

        self.now_ms = self.now_ms.max(interval.next_due_ms);
        interval.next_due_ms += interval.period_ms;
        Some((interval.id, interval.task.clone()))
    }

    /// Move the clock to `until_ms` once every due interval has fired
    pub fn settle(&mut self, until_ms: f64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, dt: f64) -> Vec<(f64, Task)> {
        let until = s.now_ms() + dt;
        let mut fired = Vec::new();
        while let Some((_, task)) = s.pop_due(until) {
            fired.push((s.now_ms(), task));
        }
        s.settle(until);
        fired
    }

    #[test]
    fn test_fires_each_period() {
        let mut s = Scheduler::new();
        s.set_interval(1000.0, Task::Countdown);

        assert!(drain(&mut s, 999.0).is_empty());
        assert_eq!(drain(&mut s, 1.0), vec![(1000.0, Task::Countdown)]);
        let fired = drain(&mut s, 2500.0);
        assert_eq!(fired, vec![(2000.0, Task::Countdown), (3000.0, Task::Countdown)]);
        assert_eq!(s.now_ms(), 3500.0);
    }

    #[test]
    fn test_time_order_across_intervals() {
        let mut s = Scheduler::new();
        s.set_interval(1000.0, Task::Countdown);
        s.set_interval(400.0, Task::Spawn);

        let tasks: Vec<Task> = drain(&mut s, 1200.0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(tasks, vec![Task::Spawn, Task::Spawn, Task::Countdown, Task::Spawn]);
    }

    #[test]
    fn test_ties_fire_in_creation_order() {
        let mut s = Scheduler::new();
        s.set_interval(500.0, Task::Spawn);
        s.set_interval(500.0, Task::Countdown);

        let tasks: Vec<Task> = drain(&mut s, 500.0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(tasks, vec![Task::Spawn, Task::Countdown]);
    }

    #[test]
    fn test_clear_stops_firing() {
        let mut s = Scheduler::new();
        let id = s.set_interval(100.0, Task::Spawn);
        assert_eq!(drain(&mut s, 250.0).len(), 2);

        s.clear_interval(id);
        assert!(!s.is_active(id));
        assert!(drain(&mut s, 1000.0).is_empty());

        // Clearing twice is harmless
        s.clear_interval(id);
        assert!(s.is_empty());
    }

    #[test]
    fn test_new_interval_starts_from_now() {
        let mut s = Scheduler::new();
        drain(&mut s, 750.0);
        s.set_interval(1000.0, Task::Countdown);
        assert!(drain(&mut s, 999.0).is_empty());
        assert_eq!(drain(&mut s, 1.0), vec![(1750.0, Task::Countdown)]);
    }
}
