pub mod analytics;
pub mod stream;
pub mod tracking;

pub use analytics::{
    ActivityTotals, AnalyticsQuery, AnalyticsResponse, BonusActivityRow, CasinoActivityRow,
    CasinoDetail, CasinoStats, CasinoStatsResponse, DailyActivity, MostClaimedOffer,
    RecentActivity, StatisticsResponse,
};
pub use stream::{ControlMessage, LiveNotification, StreamMessage};
pub use tracking::{ActionType, TrackRequest, TrackResponse, TrackedEvent, UsageResponse};
