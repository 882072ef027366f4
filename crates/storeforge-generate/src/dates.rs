use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;

/// Window of `years` × 365 days ending at midnight of a reference date.
///
/// Dates are drawn at second resolution and truncated to the calendar day.
#[derive(Debug, Clone, Copy)]
pub struct DateWindow {
    start: NaiveDateTime,
    span_secs: i64,
}

impl DateWindow {
    /// Returns `None` when the window reaches before the earliest
    /// representable date.
    pub fn new(reference_date: NaiveDate, years: u32) -> Option<Self> {
        let end = reference_date.and_time(NaiveTime::MIN);
        let span = Duration::try_days(365 * i64::from(years))?;
        let start = end.checked_sub_signed(span)?;
        Some(Self {
            start,
            span_secs: span.num_seconds(),
        })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> NaiveDate {
        let offset = rng.random_range(0..=self.span_secs);
        (self.start + Duration::seconds(offset)).date()
    }
}
