//! Typed HTTP client for the tracking and analytics endpoints.

use reqwest::Client;
use url::Url;
use uuid::Uuid;

use super::{ClientError, parse_response};
use crate::objects::analytics::{
    AnalyticsQuery, AnalyticsResponse, CasinoStatsResponse, StatisticsResponse,
};
use crate::objects::tracking::{TrackRequest, TrackResponse, UsageResponse};

/// Typed HTTP client for the claimstream REST API.
///
/// Ingest is best-effort from the caller's perspective: a failed `track`
/// call should surface a local "action not recorded" state, never block
/// the page.
#[derive(Debug, Clone)]
pub struct TrackingClient {
    http: Client,
    base_url: Url,
}

impl TrackingClient {
    /// Create a new `TrackingClient` for the given server root URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /tracking` – record one user action.
    pub async fn track(&self, request: &TrackRequest) -> Result<TrackResponse, ClientError> {
        let url = self.base_url.join("/tracking")?;
        let resp = self.http.post(url).json(request).send().await?;
        parse_response(resp).await
    }

    /// `GET /tracking?bonusId=…` – same-day usage count for a bonus.
    pub async fn usage(&self, bonus_id: Uuid) -> Result<UsageResponse, ClientError> {
        let mut url = self.base_url.join("/tracking")?;
        url.query_pairs_mut()
            .append_pair("bonusId", &bonus_id.to_string());
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /analytics` – multi-timeframe rollup, optionally casino-scoped.
    pub async fn analytics(&self, query: &AnalyticsQuery) -> Result<AnalyticsResponse, ClientError> {
        let mut url = self.base_url.join("/analytics")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(timeframe) = &query.timeframe {
                pairs.append_pair("timeframe", timeframe);
            }
            if let Some(casino_id) = &query.casino_id {
                pairs.append_pair("casinoId", &casino_id.to_string());
            }
            if let Some(start) = &query.start_date {
                pairs.append_pair("startDate", &start.to_string());
            }
            if let Some(end) = &query.end_date {
                pairs.append_pair("endDate", &end.to_string());
            }
        }
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /casinos/{idOrSlug}/analytics` – one casino's dashboard data.
    pub async fn casino_analytics(
        &self,
        id_or_slug: &str,
    ) -> Result<CasinoStatsResponse, ClientError> {
        let url = self
            .base_url
            .join(&format!("/casinos/{id_or_slug}/analytics"))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /statistics` – global site statistics.
    ///
    /// The server guarantees a stable shape even on internal failure, so
    /// this only errors on transport problems.
    pub async fn statistics(&self) -> Result<StatisticsResponse, ClientError> {
        let url = self.base_url.join("/statistics")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}
