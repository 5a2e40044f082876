use chrono::{DateTime, Duration, Utc};

/// Source of "now" for session start and submit timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    /// Wall-clock time.
    #[default]
    Default,
    /// Frozen at a timestamp; moved forward only by `advance`.
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }

    /// Move a fixed clock forward so session timestamps follow the
    /// countdown. Wall-clock time is left alone.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(at) = self {
            *at += delta;
        }
    }
}

/// Session start used by deterministic tests: 2023-11-14T22:13:20Z.
pub const FIXED_SESSION_EPOCH: i64 = 1_700_000_000;

/// `FIXED_SESSION_EPOCH` as a timestamp.
///
/// # Panics
///
/// Never in practice; the constant is inside chrono's range.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_SESSION_EPOCH, 0).expect("epoch in chrono range")
}

/// Clock frozen at `fixed_now()`.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

/// Result of advancing a `Countdown` by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time is still left.
    Running { remaining: u32 },
    /// This tick reached zero. Reported exactly once per countdown.
    Expired,
    /// The countdown had already expired; nothing changed.
    Stopped,
}

impl TickOutcome {
    /// True once no further ticks are useful.
    #[must_use]
    pub fn is_finished(self) -> bool {
        !matches!(self, TickOutcome::Running { .. })
    }
}

/// Whole-second countdown floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    expired: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            expired: false,
        }
    }

    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(minutes.saturating_mul(60))
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.expired {
            return TickOutcome::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            return TickOutcome::Expired;
        }
        TickOutcome::Running {
            remaining: self.remaining,
        }
    }
}
