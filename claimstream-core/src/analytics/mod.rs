//! The analytics rollup engine and statistics aggregators.
//!
//! Everything in this module is a pure function of data already fetched
//! from the event store: timeframe resolution happens exactly once per
//! request, bucketing and ranking operate on in-memory slices, and no
//! state is owned here.

pub mod leaderboard;
pub mod rollup;
pub mod timeframe;

pub use leaderboard::{LeaderboardEntry, UniqueActors, choose_most_popular, rank_casinos, unique_actor_estimate, weekly_position};
pub use rollup::{bonus_breakdown, casino_breakdown, daily_buckets, recent_activity, totals};
pub use timeframe::{AlltimeCaps, ResolvedWindow, Timeframe, TimeframeError, local_day, local_day_start_utc};
