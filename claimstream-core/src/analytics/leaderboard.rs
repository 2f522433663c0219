//! Leaderboard ranking and sitewide statistics helpers.

use itertools::Itertools;
use uuid::Uuid;

use crate::entities::tracking_events::{BonusClaimCount, CasinoClaimCount};

/// One ranked leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub casino_id: Uuid,
    pub claims: i64,
    /// 1-based position; ties get distinct consecutive positions in
    /// input order.
    pub position: usize,
}

/// Rank casinos by claim count descending.
///
/// The sort is stable, so rows tied on claims keep the order the store
/// returned them in (first event wins).
pub fn rank_casinos(rows: &[CasinoClaimCount]) -> Vec<LeaderboardEntry> {
    rows.iter()
        .sorted_by(|a, b| b.claims.cmp(&a.claims))
        .enumerate()
        .map(|(idx, row)| LeaderboardEntry {
            casino_id: row.casino_id,
            claims: row.claims,
            position: idx + 1,
        })
        .collect()
}

/// Position and claim count of one casino on the board.
///
/// A casino with no events in the window ranks one past the last ranked
/// entry with zero claims; it is never reported as unranked.
pub fn weekly_position(rows: &[CasinoClaimCount], casino_id: Uuid) -> (usize, i64) {
    let ranked = rank_casinos(rows);
    ranked
        .iter()
        .find(|entry| entry.casino_id == casino_id)
        .map(|entry| (entry.position, entry.claims))
        .unwrap_or((ranked.len() + 1, 0))
}

/// Pick the headline "most claimed" offer.
///
/// Copies are the primary signal; clicks only break a total absence of
/// copies, never outvote them.
pub fn choose_most_popular(
    by_copies: Option<BonusClaimCount>,
    by_clicks: Option<BonusClaimCount>,
) -> Option<BonusClaimCount> {
    by_copies.or(by_clicks)
}

/// A unique-actor approximation derived from distinct paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueActors {
    pub count: i64,
    /// True when no presence signal existed and the coarser offer-path
    /// fallback was used instead.
    pub degraded: bool,
}

/// Estimate unique actors from distinct visit paths, falling back to
/// distinct offer-action paths when no page visits were ever recorded.
pub fn unique_actor_estimate(visitor_paths: i64, offer_paths: i64) -> UniqueActors {
    if visitor_paths > 0 {
        UniqueActors {
            count: visitor_paths,
            degraded: false,
        }
    } else {
        UniqueActors {
            count: offer_paths,
            degraded: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(casino: u8, claims: i64) -> CasinoClaimCount {
        CasinoClaimCount {
            casino_id: Uuid::from_u128(casino as u128),
            claims,
        }
    }

    #[test]
    fn ranks_descending_with_consecutive_positions() {
        let rows = [row(1, 5), row(2, 9), row(3, 9)];
        let ranked = rank_casinos(&rows);

        assert_eq!(ranked[0].casino_id, Uuid::from_u128(2));
        assert_eq!(ranked[0].position, 1);
        // Tie resolves to input order.
        assert_eq!(ranked[1].casino_id, Uuid::from_u128(3));
        assert_eq!(ranked[1].position, 2);
        assert_eq!(ranked[2].casino_id, Uuid::from_u128(1));
        assert_eq!(ranked[2].position, 3);
    }

    #[test]
    fn weekly_position_finds_ranked_casino() {
        let rows = [row(1, 5), row(2, 9)];
        assert_eq!(weekly_position(&rows, Uuid::from_u128(1)), (2, 5));
    }

    #[test]
    fn absent_casino_ranks_one_past_last() {
        let rows = [row(1, 5), row(2, 9)];
        assert_eq!(weekly_position(&rows, Uuid::from_u128(7)), (3, 0));
    }

    #[test]
    fn empty_board_ranks_everyone_first_with_zero() {
        assert_eq!(weekly_position(&[], Uuid::from_u128(1)), (1, 0));
    }

    #[test]
    fn copies_always_beat_clicks_for_most_popular() {
        let copies = BonusClaimCount {
            bonus_id: Uuid::from_u128(1),
            claims: 2,
        };
        let clicks = BonusClaimCount {
            bonus_id: Uuid::from_u128(2),
            claims: 50,
        };

        let chosen = choose_most_popular(Some(copies.clone()), Some(clicks.clone()));
        assert_eq!(chosen, Some(copies));

        let fallback = choose_most_popular(None, Some(clicks.clone()));
        assert_eq!(fallback, Some(clicks));

        assert_eq!(choose_most_popular(None, None), None);
    }

    #[test]
    fn unique_actors_degrade_to_offer_paths() {
        assert_eq!(
            unique_actor_estimate(12, 90),
            UniqueActors { count: 12, degraded: false }
        );
        assert_eq!(
            unique_actor_estimate(0, 4),
            UniqueActors { count: 4, degraded: true }
        );
        assert_eq!(
            unique_actor_estimate(0, 0),
            UniqueActors { count: 0, degraded: true }
        );
    }
}
