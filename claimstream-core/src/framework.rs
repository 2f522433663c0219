use sqlx::PgPool;

/// Receiver for every database query message in this crate.
///
/// Queries are plain structs implementing
/// `kanau::processor::Processor<Query>` against this type, one impl per
/// query, so handlers compose reads without touching SQL directly.
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
