//! Clock source for phase derivation.
//!
//! The kernel only ever *reads* time; it never schedules anything.
//! Production binds the clock to the wall clock, tests pin it to an
//! explicit timestamp and advance it by hand.

use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// A current-timestamp source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Clock {
    /// Wall-clock time (`chrono::Utc`).
    System,
    /// A pinned timestamp, settable by tests.
    Fixed(Timestamp),
}

impl Clock {
    /// Wall-clock-backed clock for production use.
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    /// A clock pinned at `ts`.
    #[must_use]
    pub fn fixed(ts: Timestamp) -> Self {
        Self::Fixed(ts)
    }

    /// The current timestamp.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        match self {
            Self::System => Timestamp::try_from(chrono::Utc::now().timestamp()).unwrap_or(0),
            Self::Fixed(ts) => *ts,
        }
    }

    /// Pin the clock at `ts`. Converts a system clock into a fixed one.
    pub fn set_timestamp(&mut self, ts: Timestamp) {
        *self = Self::Fixed(ts);
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::System
    }
}
