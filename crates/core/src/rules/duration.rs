//! Length-of-stay calculation.

use chrono::{DateTime, Utc};

/// Whole days between admission and discharge, or between admission and now while the patient
/// is still admitted.
pub fn days_hospitalized(admission: DateTime<Utc>, discharge: Option<DateTime<Utc>>) -> u32 {
    days_hospitalized_as_of(admission, discharge, Utc::now())
}

/// Same as [`days_hospitalized`] with the clock pinned to `now`.
///
/// Counts complete 24-hour periods, floored. An admission at or after the end instant yields 0.
pub fn days_hospitalized_as_of(
    admission: DateTime<Utc>,
    discharge: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> u32 {
    let end = discharge.unwrap_or(now);
    let days = end.signed_duration_since(admission).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}
