//! Read-only collaborator queries against the entity store.
//!
//! Casino and bonus display metadata decorates live notifications and
//! labels analytics rows; this core never writes to these tables.

use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Display snapshot of one casino.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CasinoSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
}

/// Display snapshot of one bonus offer.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BonusSummary {
    pub id: Uuid,
    pub casino_id: Uuid,
    pub title: String,
    pub code: Option<String>,
    pub value: Option<Decimal>,
}

const CASINO_COLUMNS: &str = "id, name, slug, logo_url";
const BONUS_COLUMNS: &str = "id, casino_id, title, code, value";

#[derive(Debug, Clone)]
pub struct GetCasinoById {
    pub id: Uuid,
}

impl Processor<GetCasinoById> for DatabaseProcessor {
    type Output = Option<CasinoSummary>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCasinoById")]
    async fn process(&self, query: GetCasinoById) -> Result<Option<CasinoSummary>, sqlx::Error> {
        sqlx::query_as::<_, CasinoSummary>(&format!(
            "SELECT {CASINO_COLUMNS} FROM casinos WHERE id = $1"
        ))
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetCasinoBySlug {
    pub slug: String,
}

impl Processor<GetCasinoBySlug> for DatabaseProcessor {
    type Output = Option<CasinoSummary>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCasinoBySlug")]
    async fn process(&self, query: GetCasinoBySlug) -> Result<Option<CasinoSummary>, sqlx::Error> {
        sqlx::query_as::<_, CasinoSummary>(&format!(
            "SELECT {CASINO_COLUMNS} FROM casinos WHERE slug = $1"
        ))
        .bind(query.slug)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Batch lookup for labeling per-casino analytics rows.
pub struct GetCasinosByIds {
    pub ids: Vec<Uuid>,
}

impl Processor<GetCasinosByIds> for DatabaseProcessor {
    type Output = Vec<CasinoSummary>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCasinosByIds")]
    async fn process(&self, query: GetCasinosByIds) -> Result<Vec<CasinoSummary>, sqlx::Error> {
        if query.ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, CasinoSummary>(&format!(
            "SELECT {CASINO_COLUMNS} FROM casinos WHERE id = ANY($1)"
        ))
        .bind(&query.ids)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetBonusById {
    pub id: Uuid,
}

impl Processor<GetBonusById> for DatabaseProcessor {
    type Output = Option<BonusSummary>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetBonusById")]
    async fn process(&self, query: GetBonusById) -> Result<Option<BonusSummary>, sqlx::Error> {
        sqlx::query_as::<_, BonusSummary>(&format!(
            "SELECT {BONUS_COLUMNS} FROM bonuses WHERE id = $1"
        ))
        .bind(query.id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// All bonuses of one casino, for the per-bonus breakdown labels.
pub struct GetBonusesByCasino {
    pub casino_id: Uuid,
}

impl Processor<GetBonusesByCasino> for DatabaseProcessor {
    type Output = Vec<BonusSummary>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetBonusesByCasino")]
    async fn process(&self, query: GetBonusesByCasino) -> Result<Vec<BonusSummary>, sqlx::Error> {
        sqlx::query_as::<_, BonusSummary>(&format!(
            "SELECT {BONUS_COLUMNS} FROM bonuses WHERE casino_id = $1 ORDER BY title ASC"
        ))
        .bind(query.casino_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Count of currently active bonus offers.
pub struct CountActiveBonuses;

impl Processor<CountActiveBonuses> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountActiveBonuses")]
    async fn process(&self, _query: CountActiveBonuses) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bonuses WHERE active = TRUE")
            .fetch_one(&self.pool)
            .await
    }
}
