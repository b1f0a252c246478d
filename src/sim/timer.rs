//! Virtual-clock task scheduler
//!
//! Stands in for interval/timeout timers so rounds stay deterministic:
//! - One periodic slot (the countdown). Starting a new periodic task
//!   cancels the previous one before it is installed.
//! - Any number of one-shot tasks (rush expiry, pair resolution).
//! - Due tasks fire in (due time, creation order).

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a one-shot task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShotKind {
    /// Rush regime is over, switch back to the normal countdown
    RushExpiry,
    /// Hide the pending pair after the resolution delay
    ResolvePair,
}

/// A task that came due during [`Scheduler::pop_due`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    Periodic(TimerId),
    OneShot(TimerId, OneShotKind),
}

#[derive(Debug, Clone)]
struct Periodic {
    id: TimerId,
    interval_ms: u64,
    next_due_ms: u64,
}

#[derive(Debug, Clone)]
struct OneShot {
    id: TimerId,
    due_ms: u64,
    kind: OneShotKind,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_id: u64,
    periodic: Option<Periodic>,
    one_shots: Vec<OneShot>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Install a periodic task firing every `interval_ms` starting one
    /// interval after `now_ms`. Any previous periodic task is cancelled first.
    pub fn start_periodic(&mut self, now_ms: u64, interval_ms: u64) -> TimerId {
        if let Some(prev) = self.cancel_periodic() {
            log::debug!("Replaced periodic timer {:?}", prev);
        }
        let interval_ms = interval_ms.max(1);
        let id = self.allocate_id();
        self.periodic = Some(Periodic {
            id,
            interval_ms,
            next_due_ms: now_ms.saturating_add(interval_ms),
        });
        log::debug!("Started periodic timer {:?} every {}ms", id, interval_ms);
        id
    }

    /// Cancel the periodic task, returning its handle if one was live
    pub fn cancel_periodic(&mut self) -> Option<TimerId> {
        self.periodic.take().map(|p| p.id)
    }

    pub fn periodic_interval_ms(&self) -> Option<u64> {
        self.periodic.as_ref().map(|p| p.interval_ms)
    }

    /// Schedule a one-shot task `delay_ms` after `now_ms`
    pub fn schedule_once(&mut self, now_ms: u64, delay_ms: u64, kind: OneShotKind) -> TimerId {
        let id = self.allocate_id();
        self.one_shots.push(OneShot {
            id,
            due_ms: now_ms.saturating_add(delay_ms),
            kind,
        });
        log::debug!("Scheduled {:?} ({:?}) in {}ms", kind, id, delay_ms);
        id
    }

    /// Drop every outstanding task
    pub fn cancel_all(&mut self) {
        let count = self.active_count();
        self.periodic = None;
        self.one_shots.clear();
        if count > 0 {
            log::debug!("Cancelled {} outstanding timer(s)", count);
        }
    }

    /// Number of live tasks (periodic + one-shot)
    pub fn active_count(&self) -> usize {
        self.one_shots.len() + usize::from(self.periodic.is_some())
    }

    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }

    /// Remove and return the next task due at or before `until_ms`,
    /// along with the time it fires. Periodic tasks are re-armed, or
    /// dropped once their next occurrence would pass the end of the clock.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(u64, Fired)> {
        let periodic_key = self
            .periodic
            .as_ref()
            .filter(|p| p.next_due_ms <= until_ms)
            .map(|p| (p.next_due_ms, p.id));

        let one_shot_idx = self
            .one_shots
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i);
        let one_shot_key = one_shot_idx.map(|i| (self.one_shots[i].due_ms, self.one_shots[i].id));

        let take_periodic = match (periodic_key, one_shot_key) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(p), Some(o)) => p < o,
        };

        if take_periodic {
            let periodic = self.periodic.as_mut()?;
            let (at, id) = (periodic.next_due_ms, periodic.id);
            match at.checked_add(periodic.interval_ms) {
                Some(next) => periodic.next_due_ms = next,
                None => {
                    log::warn!("Periodic timer {:?} ran off the end of the clock", id);
                    self.periodic = None;
                }
            }
            Some((at, Fired::Periodic(id)))
        } else {
            let task = self.one_shots.remove(one_shot_idx?);
            Some((task.due_ms, Fired::OneShot(task.id, task.kind)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, until_ms: u64) -> Vec<(u64, Fired)> {
        let mut fired = Vec::new();
        while let Some(f) = scheduler.pop_due(until_ms) {
            fired.push(f);
        }
        fired
    }

    #[test]
    fn test_periodic_fires_on_cadence() {
        let mut s = Scheduler::new();
        let id = s.start_periodic(0, 1000);
        let fired = drain(&mut s, 3500);
        assert_eq!(
            fired,
            vec![
                (1000, Fired::Periodic(id)),
                (2000, Fired::Periodic(id)),
                (3000, Fired::Periodic(id)),
            ]
        );
        assert_eq!(drain(&mut s, 4000), vec![(4000, Fired::Periodic(id))]);
    }

    #[test]
    fn test_starting_periodic_cancels_previous() {
        let mut s = Scheduler::new();
        let first = s.start_periodic(0, 1000);
        let second = s.start_periodic(200, 500);
        assert_ne!(first, second);
        assert_eq!(s.active_count(), 1);

        let fired = drain(&mut s, 1200);
        assert!(fired.iter().all(|(_, f)| *f == Fired::Periodic(second)));
        assert_eq!(fired.iter().map(|(at, _)| *at).collect::<Vec<_>>(), vec![700, 1200]);
    }

    #[test]
    fn test_ties_fire_in_creation_order() {
        let mut s = Scheduler::new();
        let periodic = s.start_periodic(0, 500);
        let expiry = s.schedule_once(0, 1000, OneShotKind::RushExpiry);
        let fired = drain(&mut s, 1000);
        assert_eq!(
            fired,
            vec![
                (500, Fired::Periodic(periodic)),
                (1000, Fired::Periodic(periodic)),
                (1000, Fired::OneShot(expiry, OneShotKind::RushExpiry)),
            ]
        );
    }

    #[test]
    fn test_cancel_all() {
        let mut s = Scheduler::new();
        s.start_periodic(0, 1000);
        s.schedule_once(0, 1000, OneShotKind::ResolvePair);
        s.schedule_once(0, 5000, OneShotKind::RushExpiry);
        assert_eq!(s.active_count(), 3);

        s.cancel_all();
        assert!(s.is_idle());
        assert_eq!(s.pop_due(u64::MAX), None);
    }

    #[test]
    fn test_far_future_deadlines_saturate() {
        let mut s = Scheduler::new();
        let near_end = u64::MAX - 10;
        let once = s.schedule_once(near_end, u64::MAX, OneShotKind::ResolvePair);
        let periodic = s.start_periodic(near_end, 1000);

        assert_eq!(s.pop_due(u64::MAX - 1), None);
        assert_eq!(
            drain(&mut s, u64::MAX),
            vec![
                (u64::MAX, Fired::OneShot(once, OneShotKind::ResolvePair)),
                (u64::MAX, Fired::Periodic(periodic)),
            ]
        );
        assert!(s.is_idle());
    }
}
