use crate::domain::{
    models::stats::{StatsRecord, VisitorCounters},
    ports::StatsRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresStatsRepo { pool: PgPool }
impl PostgresStatsRepo { pub fn new(pool: PgPool) -> Self { Self { pool } } }

#[async_trait]
impl StatsRepository for PostgresStatsRepo {
    async fn find(&self, establishment_id: &str) -> Result<Option<VisitorCounters>, AppError> {
        sqlx::query_as::<_, StatsRecord>("SELECT * FROM establishment_stats WHERE establishment_id = $1")
            .bind(establishment_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .map(VisitorCounters::try_from)
            .transpose()
    }
}
