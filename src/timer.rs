use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of "now" for the game, measured from an arbitrary origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual clock for tests. Clones share the same time, so a test can keep
/// one handle and hand another to the game.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    event: E,
}

/// Pending one-shot and periodic timers, fired in due order.
///
/// Timers with the same due time fire in the order they were scheduled.
/// A periodic timer keeps its id across firings, so cancelling the id
/// stops every future firing.
#[derive(Debug)]
pub struct TimerQueue<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Clone> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            period,
            event,
        });
        id
    }

    /// Fire `event` once at `at`.
    pub fn schedule_once(&mut self, at: Duration, event: E) -> TimerId {
        self.push(at, None, event)
    }

    /// Fire `event` at `start + period`, then every `period` after that.
    pub fn schedule_every(&mut self, start: Duration, period: Duration, event: E) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.push(start + period, Some(period), event)
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Take the earliest firing due at or before `now`, together with the
    /// time it was due.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, E)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(idx, _)| idx)?;

        let due = self.entries[idx].due;
        if let Some(period) = self.entries[idx].period {
            let entry = &mut self.entries[idx];
            entry.due += period;
            Some((due, entry.event.clone()))
        } else {
            Some((due, self.entries.swap_remove(idx).event))
        }
    }
}
