//! Timeframe resolution.
//!
//! A named or custom timeframe resolves to one concrete `[start, end)`
//! UTC window per request, computed in the caller's local calendar via a
//! fixed site offset. The offset is applied exactly once here; no
//! derived view repeats per-row offset arithmetic. Daylight-saving
//! shifting zones are out of scope: the site calendar is a fixed
//! `UtcOffset` from configuration.
//!
//! `alltime` is not actually all time: it is capped to a lookback window
//! and a row count ([`AlltimeCaps`]), a documented approximation that
//! keeps unbounded historical pulls tractable.

use thiserror::Error;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Default lookback for `alltime` pulls.
pub const DEFAULT_ALLTIME_LOOKBACK_DAYS: i64 = 365;

/// Default row cap for `alltime` pulls.
pub const DEFAULT_ALLTIME_MAX_ROWS: i64 = 10_000;

/// A named or custom calendar window, as selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    AllTime,
    /// Inclusive site-local calendar dates.
    Custom { start: Date, end: Date },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeframeError {
    #[error("unrecognized timeframe: {0}")]
    Unknown(String),

    #[error("custom timeframe requires startDate and endDate")]
    MissingCustomBounds,

    #[error("startDate must not be after endDate")]
    InvertedRange,
}

/// Bounds applied to `alltime` pulls at the query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlltimeCaps {
    pub lookback_days: i64,
    pub max_rows: i64,
}

impl Default for AlltimeCaps {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_ALLTIME_LOOKBACK_DAYS,
            max_rows: DEFAULT_ALLTIME_MAX_ROWS,
        }
    }
}

/// A timeframe resolved to concrete instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    /// UTC window start (inclusive), for the range query.
    pub start: PrimitiveDateTime,
    /// UTC window end (exclusive).
    pub end: PrimitiveDateTime,
    /// First site-local calendar day of the window.
    pub first_day: Date,
    /// Last site-local calendar day (inclusive).
    pub last_day: Date,
    /// The fixed site offset the window was resolved under.
    pub offset: UtcOffset,
    /// Whether the bucket series should be pre-seeded gap-free.
    pub dense: bool,
    /// Row cap to apply at the query, set only for `alltime`.
    pub row_cap: Option<i64>,
}

impl Timeframe {
    /// Parse the wire selector. `None` defaults to `7days`.
    pub fn parse(
        name: Option<&str>,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<Self, TimeframeError> {
        match name.unwrap_or("7days") {
            "today" => Ok(Timeframe::Today),
            "yesterday" => Ok(Timeframe::Yesterday),
            "7days" => Ok(Timeframe::Last7Days),
            "30days" => Ok(Timeframe::Last30Days),
            "alltime" => Ok(Timeframe::AllTime),
            "custom" => {
                let (Some(start), Some(end)) = (start, end) else {
                    return Err(TimeframeError::MissingCustomBounds);
                };
                if start > end {
                    return Err(TimeframeError::InvertedRange);
                }
                Ok(Timeframe::Custom { start, end })
            }
            other => Err(TimeframeError::Unknown(other.to_owned())),
        }
    }

    /// Resolve to a concrete window around `now_utc`.
    pub fn resolve(self, now_utc: OffsetDateTime, offset: UtcOffset, caps: AlltimeCaps) -> ResolvedWindow {
        let today = now_utc.to_offset(offset).date();

        let (first_day, last_day, dense, row_cap) = match self {
            Timeframe::Today => (today, today, true, None),
            Timeframe::Yesterday => {
                let y = days_back(today, 1);
                (y, y, true, None)
            }
            Timeframe::Last7Days => (days_back(today, 6), today, true, None),
            Timeframe::Last30Days => (days_back(today, 29), today, true, None),
            Timeframe::Custom { start, end } => (start, end, true, None),
            Timeframe::AllTime => {
                let start_instant = now_utc - Duration::days(caps.lookback_days);
                let first = start_instant.to_offset(offset).date();
                (first, today, false, Some(caps.max_rows))
            }
        };

        ResolvedWindow {
            start: local_midnight_utc(first_day, offset),
            end: local_midnight_utc(next_day(last_day), offset),
            first_day,
            last_day,
            offset,
            dense,
            row_cap,
        }
    }
}

/// UTC instant of the site-local midnight starting `day`.
fn local_midnight_utc(day: Date, offset: UtcOffset) -> PrimitiveDateTime {
    let utc = PrimitiveDateTime::new(day, Time::MIDNIGHT)
        .assume_offset(offset)
        .to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

/// UTC instant of the current site-local day's midnight (the "since"
/// bound for same-day usage counts).
pub fn local_day_start_utc(now_utc: OffsetDateTime, offset: UtcOffset) -> PrimitiveDateTime {
    local_midnight_utc(now_utc.to_offset(offset).date(), offset)
}

/// Site-local calendar day of a stored UTC timestamp.
pub fn local_day(created_at: PrimitiveDateTime, offset: UtcOffset) -> Date {
    created_at.assume_utc().to_offset(offset).date()
}

fn days_back(day: Date, n: i64) -> Date {
    day.checked_sub(Duration::days(n)).unwrap_or(day)
}

pub(crate) fn next_day(day: Date) -> Date {
    day.checked_add(Duration::days(1)).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    const CAPS: AlltimeCaps = AlltimeCaps {
        lookback_days: DEFAULT_ALLTIME_LOOKBACK_DAYS,
        max_rows: DEFAULT_ALLTIME_MAX_ROWS,
    };

    #[test]
    fn parse_defaults_to_seven_days() {
        assert_eq!(
            Timeframe::parse(None, None, None),
            Ok(Timeframe::Last7Days)
        );
    }

    #[test]
    fn parse_rejects_unknown_selector() {
        assert_eq!(
            Timeframe::parse(Some("fortnight"), None, None),
            Err(TimeframeError::Unknown("fortnight".into()))
        );
    }

    #[test]
    fn parse_custom_needs_both_bounds_in_order() {
        assert_eq!(
            Timeframe::parse(Some("custom"), Some(date!(2026 - 08 - 01)), None),
            Err(TimeframeError::MissingCustomBounds)
        );
        assert_eq!(
            Timeframe::parse(
                Some("custom"),
                Some(date!(2026 - 08 - 10)),
                Some(date!(2026 - 08 - 01))
            ),
            Err(TimeframeError::InvertedRange)
        );
        assert_eq!(
            Timeframe::parse(
                Some("custom"),
                Some(date!(2026 - 08 - 01)),
                Some(date!(2026 - 08 - 10))
            ),
            Ok(Timeframe::Custom {
                start: date!(2026 - 08 - 01),
                end: date!(2026 - 08 - 10)
            })
        );
    }

    #[test]
    fn today_respects_a_positive_offset() {
        // 01:00 UTC is already 03:00 on Aug 31 at UTC+2.
        let now = datetime!(2026-08-31 01:00:00 UTC);
        let window = Timeframe::Today.resolve(now, offset!(+2), CAPS);

        assert_eq!(window.first_day, date!(2026 - 08 - 31));
        assert_eq!(window.start, datetime!(2026-08-30 22:00:00));
        assert_eq!(window.end, datetime!(2026-08-31 22:00:00));
        assert!(window.dense);
        assert_eq!(window.row_cap, None);
    }

    #[test]
    fn today_respects_a_negative_offset() {
        // 01:00 UTC on Aug 31 is still Aug 30 at UTC-5.
        let now = datetime!(2026-08-31 01:00:00 UTC);
        let window = Timeframe::Today.resolve(now, offset!(-5), CAPS);

        assert_eq!(window.first_day, date!(2026 - 08 - 30));
        assert_eq!(window.start, datetime!(2026-08-30 05:00:00));
        assert_eq!(window.end, datetime!(2026-08-31 05:00:00));
    }

    #[test]
    fn seven_days_covers_seven_consecutive_local_days() {
        let now = datetime!(2026-08-31 12:00:00 UTC);
        let window = Timeframe::Last7Days.resolve(now, UtcOffset::UTC, CAPS);

        assert_eq!(window.first_day, date!(2026 - 08 - 25));
        assert_eq!(window.last_day, date!(2026 - 08 - 31));
        assert_eq!(window.end - window.start, Duration::days(7));
    }

    #[test]
    fn yesterday_is_one_single_day_window() {
        let now = datetime!(2026-08-31 12:00:00 UTC);
        let window = Timeframe::Yesterday.resolve(now, UtcOffset::UTC, CAPS);

        assert_eq!(window.first_day, date!(2026 - 08 - 30));
        assert_eq!(window.last_day, date!(2026 - 08 - 30));
        assert_eq!(window.end - window.start, Duration::days(1));
    }

    #[test]
    fn alltime_is_capped_and_sparse() {
        let now = datetime!(2026-08-31 12:00:00 UTC);
        let caps = AlltimeCaps {
            lookback_days: 30,
            max_rows: 500,
        };
        let window = Timeframe::AllTime.resolve(now, UtcOffset::UTC, caps);

        assert!(!window.dense);
        assert_eq!(window.row_cap, Some(500));
        assert_eq!(window.first_day, date!(2026 - 08 - 01));
        assert_eq!(window.last_day, date!(2026 - 08 - 31));
    }

    #[test]
    fn local_day_start_matches_today_window_start() {
        let now = datetime!(2026-08-31 01:00:00 UTC);
        let window = Timeframe::Today.resolve(now, offset!(+2), CAPS);
        assert_eq!(local_day_start_utc(now, offset!(+2)), window.start);
    }

    #[test]
    fn local_day_shifts_events_near_midnight() {
        // 23:30 UTC on Aug 30 is already Aug 31 at UTC+2.
        let stored = datetime!(2026-08-30 23:30:00);
        assert_eq!(local_day(stored, offset!(+2)), date!(2026 - 08 - 31));
        assert_eq!(local_day(stored, UtcOffset::UTC), date!(2026 - 08 - 30));
    }
}
