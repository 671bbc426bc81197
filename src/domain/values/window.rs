use chrono::{DateTime, Duration, Utc};

/// Consecutive, non-overlapping windows of `days` days counting back from `now`.
///
/// Window 0 covers ages `[0, days]`, window 1 covers `(days, 2 × days]` and so
/// on: each window is closed at its older end. A timestamp belongs to exactly
/// one window, so comparing two windows never counts the same day twice.
/// Timestamps after `now` belong to none.
#[derive(Debug, Clone, Copy)]
pub struct TrailingWindows {
    now: DateTime<Utc>,
    days: u32,
}

impl TrailingWindows {
    pub fn new(now: DateTime<Utc>, days: u32) -> Self {
        Self {
            now,
            days: days.max(1),
        }
    }

    pub fn index_of(&self, at: DateTime<Utc>) -> Option<u32> {
        if at > self.now {
            return None;
        }
        let age_ms = self.now.signed_duration_since(at).num_milliseconds();
        let span_ms = i64::from(self.days) * Duration::days(1).num_milliseconds();
        if age_ms == 0 {
            return Some(0);
        }
        u32::try_from((age_ms - 1) / span_ms).ok()
    }

    /// Earliest instant still covered by the first `count` windows.
    pub fn start_of(&self, count: u32) -> DateTime<Utc> {
        i64::from(self.days)
            .checked_mul(i64::from(count))
            .and_then(Duration::try_days)
            .and_then(|span| self.now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
