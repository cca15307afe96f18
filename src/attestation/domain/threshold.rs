//! Pure elapsed-day threshold evaluation for campaign scheduling.

use chrono::{DateTime, Utc};

/// Result of evaluating a day threshold against a campaign start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdCheck {
    elapsed_days: i64,
    crossed: bool,
}

impl ThresholdCheck {
    /// Evaluates whether `threshold_days` whole days have elapsed since
    /// `start` at instant `now`.
    ///
    /// Elapsed days are whole days, floored. A start in the future is treated
    /// as not yet due rather than an error.
    #[must_use]
    pub fn evaluate(start: DateTime<Utc>, now: DateTime<Utc>, threshold_days: u32) -> Self {
        if now < start {
            return Self {
                elapsed_days: 0,
                crossed: false,
            };
        }
        let elapsed_days = (now - start).num_days();
        Self {
            elapsed_days,
            crossed: elapsed_days >= i64::from(threshold_days),
        }
    }

    /// Returns the whole days elapsed since campaign start.
    #[must_use]
    pub const fn elapsed_days(&self) -> i64 {
        self.elapsed_days
    }

    /// Reports whether the threshold has been met or passed.
    #[must_use]
    pub const fn crossed(&self) -> bool {
        self.crossed
    }
}
