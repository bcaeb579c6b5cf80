use crate::domain::{
    models::stats::{StatsRecord, VisitorCounters},
    ports::StatsRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteStatsRepo { pool: SqlitePool }
impl SqliteStatsRepo { pub fn new(pool: SqlitePool) -> Self { Self { pool } } }

#[async_trait]
impl StatsRepository for SqliteStatsRepo {
    async fn find(&self, establishment_id: &str) -> Result<Option<VisitorCounters>, AppError> {
        sqlx::query_as::<_, StatsRecord>("SELECT * FROM establishment_stats WHERE establishment_id = ?")
            .bind(establishment_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .map(VisitorCounters::try_from)
            .transpose()
    }
}
