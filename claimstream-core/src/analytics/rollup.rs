//! Event-to-bucket rollups.
//!
//! All functions here fold an already-fetched slice of offer events into
//! response rows. Dense windows pre-seed one zeroed bucket per local
//! calendar day so charts never show gaps; sparse (`alltime`) windows
//! only emit days that saw activity.
//!
//! A `code_copy` counts as a copy, an `offer_click` as a click, and both
//! contribute to `total`. Non-offer action types are ignored defensively
//! even though the window queries already filter them out.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::entities::ActionType;
use crate::entities::tracking_events::TrackingEvent;
use claimstream_sdk::objects::{
    ActivityTotals, BonusActivityRow, CasinoActivityRow, DailyActivity, RecentActivity,
};

use super::timeframe::{ResolvedWindow, local_day, next_day};

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    copies: i64,
    clicks: i64,
}

impl Counts {
    fn add(&mut self, action: ActionType) {
        match action {
            ActionType::CodeCopy => self.copies += 1,
            ActionType::OfferClick => self.clicks += 1,
            ActionType::Search | ActionType::PageVisit => {}
        }
    }

    fn total(self) -> i64 {
        self.copies + self.clicks
    }
}

/// Fold events into per-local-day buckets, ordered by date ascending.
pub fn daily_buckets(events: &[TrackingEvent], window: &ResolvedWindow) -> Vec<DailyActivity> {
    let mut buckets: BTreeMap<_, Counts> = BTreeMap::new();

    if window.dense {
        let mut day = window.first_day;
        while day <= window.last_day {
            buckets.insert(day, Counts::default());
            let advanced = next_day(day);
            if advanced == day {
                break;
            }
            day = advanced;
        }
    }

    for event in events {
        let day = local_day(event.created_at, window.offset);
        buckets.entry(day).or_default().add(event.action_type);
    }

    buckets
        .into_iter()
        .map(|(date, counts)| DailyActivity {
            date,
            copies: counts.copies,
            clicks: counts.clicks,
            total: counts.total(),
        })
        .collect()
}

/// Window-wide sums over a bucket series.
pub fn totals(buckets: &[DailyActivity]) -> ActivityTotals {
    buckets.iter().fold(ActivityTotals::default(), |acc, day| {
        ActivityTotals {
            copies: acc.copies + day.copies,
            clicks: acc.clicks + day.clicks,
            total: acc.total + day.total,
        }
    })
}

/// Per-casino counts, ordered by total descending (ties keep first-seen
/// event order). Display fields are left empty for the caller to join.
pub fn casino_breakdown(events: &[TrackingEvent]) -> Vec<CasinoActivityRow> {
    let mut order = Vec::new();
    let mut counts: BTreeMap<Uuid, Counts> = BTreeMap::new();

    for event in events {
        let Some(casino_id) = event.casino_id else {
            continue;
        };
        if !counts.contains_key(&casino_id) {
            order.push(casino_id);
        }
        counts.entry(casino_id).or_default().add(event.action_type);
    }

    let mut rows: Vec<CasinoActivityRow> = order
        .into_iter()
        .map(|casino_id| {
            let c = counts[&casino_id];
            CasinoActivityRow {
                casino_id,
                name: None,
                slug: None,
                copies: c.copies,
                clicks: c.clicks,
                total: c.total(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Per-bonus counts for an entity-scoped window, ordered like
/// [`casino_breakdown`].
pub fn bonus_breakdown(events: &[TrackingEvent]) -> Vec<BonusActivityRow> {
    let mut order = Vec::new();
    let mut counts: BTreeMap<Uuid, Counts> = BTreeMap::new();

    for event in events {
        let Some(bonus_id) = event.bonus_id else {
            continue;
        };
        if !counts.contains_key(&bonus_id) {
            order.push(bonus_id);
        }
        counts.entry(bonus_id).or_default().add(event.action_type);
    }

    let mut rows: Vec<BonusActivityRow> = order
        .into_iter()
        .map(|bonus_id| {
            let c = counts[&bonus_id];
            BonusActivityRow {
                bonus_id,
                title: None,
                code: None,
                copies: c.copies,
                clicks: c.clicks,
                total: c.total(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Map stored events to feed entries, preserving the slice's order.
pub fn recent_activity(events: &[TrackingEvent]) -> Vec<RecentActivity> {
    events
        .iter()
        .map(|event| RecentActivity {
            id: event.id,
            action_type: event.action_type.into(),
            casino_id: event.casino_id,
            bonus_id: event.bonus_id,
            created_at: event.created_at.assume_utc(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::timeframe::{AlltimeCaps, Timeframe};
    use time::macros::{datetime, offset};
    use time::{PrimitiveDateTime, UtcOffset};

    fn offer_event(
        action_type: ActionType,
        casino: u8,
        bonus: u8,
        created_at: PrimitiveDateTime,
    ) -> TrackingEvent {
        TrackingEvent {
            id: Uuid::new_v4(),
            action_type,
            casino_id: Some(Uuid::from_u128(casino as u128)),
            bonus_id: Some(Uuid::from_u128(bonus as u128)),
            search_term: None,
            path: None,
            created_at,
        }
    }

    fn seven_day_window() -> ResolvedWindow {
        Timeframe::Last7Days.resolve(
            datetime!(2026-08-31 12:00:00 UTC),
            UtcOffset::UTC,
            AlltimeCaps::default(),
        )
    }

    #[test]
    fn dense_window_yields_exactly_one_bucket_per_day() {
        let window = seven_day_window();
        let events = [offer_event(
            ActionType::CodeCopy,
            1,
            1,
            datetime!(2026-08-28 10:00:00),
        )];

        let buckets = daily_buckets(&events, &window);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, time::macros::date!(2026 - 08 - 25));
        assert_eq!(buckets[6].date, time::macros::date!(2026 - 08 - 31));
        for pair in buckets.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, time::Duration::days(1));
        }

        let active = buckets
            .iter()
            .find(|b| b.date == time::macros::date!(2026 - 08 - 28))
            .map(|b| (b.copies, b.clicks, b.total));
        assert_eq!(active, Some((1, 0, 1)));
    }

    #[test]
    fn sparse_window_skips_empty_days() {
        let window = Timeframe::AllTime.resolve(
            datetime!(2026-08-31 12:00:00 UTC),
            UtcOffset::UTC,
            AlltimeCaps::default(),
        );
        let events = [
            offer_event(ActionType::CodeCopy, 1, 1, datetime!(2026-03-01 10:00:00)),
            offer_event(ActionType::OfferClick, 1, 1, datetime!(2026-08-15 10:00:00)),
        ];

        let buckets = daily_buckets(&events, &window);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date, time::macros::date!(2026 - 03 - 01));
        assert_eq!(buckets[1].date, time::macros::date!(2026 - 08 - 15));
    }

    #[test]
    fn buckets_follow_the_site_local_calendar() {
        let window = Timeframe::Custom {
            start: time::macros::date!(2026 - 08 - 30),
            end: time::macros::date!(2026 - 08 - 31),
        }
        .resolve(
            datetime!(2026-08-31 12:00:00 UTC),
            offset!(+2),
            AlltimeCaps::default(),
        );

        // 23:30 UTC on Aug 30 falls on Aug 31 at UTC+2.
        let events = [offer_event(
            ActionType::OfferClick,
            1,
            1,
            datetime!(2026-08-30 23:30:00),
        )];

        let buckets = daily_buckets(&events, &window);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].total, 0);
        assert_eq!(buckets[1].date, time::macros::date!(2026 - 08 - 31));
        assert_eq!(buckets[1].clicks, 1);
    }

    #[test]
    fn totals_sum_both_offer_actions() {
        let window = seven_day_window();
        let events = [
            offer_event(ActionType::CodeCopy, 1, 1, datetime!(2026-08-28 10:00:00)),
            offer_event(ActionType::CodeCopy, 2, 2, datetime!(2026-08-29 10:00:00)),
            offer_event(ActionType::OfferClick, 1, 1, datetime!(2026-08-30 10:00:00)),
        ];

        let sum = totals(&daily_buckets(&events, &window));
        assert_eq!(sum, ActivityTotals { copies: 2, clicks: 1, total: 3 });
    }

    #[test]
    fn casino_breakdown_sorts_by_total_with_stable_ties() {
        let t = datetime!(2026-08-30 10:00:00);
        let events = [
            // Casino 1 appears first with 1 event, casino 2 gets 2, casino 3 ties casino 1.
            offer_event(ActionType::CodeCopy, 1, 1, t),
            offer_event(ActionType::OfferClick, 2, 2, t),
            offer_event(ActionType::CodeCopy, 2, 3, t),
            offer_event(ActionType::OfferClick, 3, 4, t),
        ];

        let rows = casino_breakdown(&events);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].casino_id, Uuid::from_u128(2));
        assert_eq!((rows[0].copies, rows[0].clicks), (1, 1));
        // Tied casinos keep first-seen order.
        assert_eq!(rows[1].casino_id, Uuid::from_u128(1));
        assert_eq!(rows[2].casino_id, Uuid::from_u128(3));
    }

    #[test]
    fn bonus_breakdown_counts_per_bonus() {
        let t = datetime!(2026-08-30 10:00:00);
        let events = [
            offer_event(ActionType::CodeCopy, 1, 1, t),
            offer_event(ActionType::CodeCopy, 1, 1, t),
            offer_event(ActionType::OfferClick, 1, 2, t),
        ];

        let rows = bonus_breakdown(&events);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bonus_id, Uuid::from_u128(1));
        assert_eq!(rows[0].total, 2);
        assert_eq!(rows[1].clicks, 1);
    }

    #[test]
    fn recent_activity_preserves_order_and_utc_instants() {
        let events = [
            offer_event(ActionType::OfferClick, 1, 1, datetime!(2026-08-30 11:00:00)),
            offer_event(ActionType::CodeCopy, 2, 2, datetime!(2026-08-30 10:00:00)),
        ];

        let feed = recent_activity(&events);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, events[0].id);
        assert_eq!(feed[0].created_at, datetime!(2026-08-30 11:00:00 UTC));
    }
}
