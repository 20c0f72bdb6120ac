use std::time::Duration;

/// Virtual time source driven by the host.
///
/// Time only moves when the owner calls [`Self::advance_to`]; nothing here
/// reads the wall clock.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    now: Duration,
    next_id: u64,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock forward. Going backwards is ignored.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Creates a periodic timer whose first firing is one period from now.
    ///
    /// Timers created later sort after earlier ones with the same deadline.
    pub fn schedule(&mut self, period: Duration) -> Timer {
        let id = self.next_id;
        self.next_id += 1;
        Timer {
            id,
            period,
            due: self.now.saturating_add(period),
        }
    }
}

/// Handle of a periodic timer created by [`Clock::schedule`].
///
/// The timer is cancelled by dropping the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    id: u64,
    period: Duration,
    due: Duration,
}

impl Timer {
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Clock time of the next firing.
    #[must_use]
    pub fn due(&self) -> Duration {
        self.due
    }

    /// Ordering key: deadline first, then creation order.
    #[must_use]
    pub fn order_key(&self) -> (Duration, u64) {
        (self.due, self.id)
    }

    /// Moves the deadline one period forward, saturating at [`Duration::MAX`].
    pub fn reschedule(&mut self) {
        self.due = self.due.saturating_add(self.period);
    }

    /// `false` once the deadline has saturated; such a timer never fires.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.due < Duration::MAX
    }
}
