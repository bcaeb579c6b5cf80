use crate::domain::{
    models::offer::{Offer, OfferRecord},
    ports::OfferRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresOfferRepo {
    pool: PgPool,
}

impl PostgresOfferRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferRepository for PostgresOfferRepo {
    async fn create(&self, offer: &Offer) -> Result<Offer, AppError> {
        let record = OfferRecord::from(offer);
        sqlx::query_as::<_, OfferRecord>(
            r#"INSERT INTO offers (
                id, establishment_id, title, description, offer_type, percentage, special_text,
                happy_hour_price, days_json, start_time, end_time, start_date, end_date,
                is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *"#
        )
            .bind(&record.id)
            .bind(&record.establishment_id)
            .bind(&record.title)
            .bind(&record.description)
            .bind(&record.offer_type)
            .bind(record.percentage)
            .bind(&record.special_text)
            .bind(&record.happy_hour_price)
            .bind(&record.days_json)
            .bind(&record.start_time)
            .bind(&record.end_time)
            .bind(record.start_date)
            .bind(record.end_date)
            .bind(record.is_active)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?
            .try_into()
    }

    async fn find_by_id(&self, establishment_id: &str, id: &str) -> Result<Option<Offer>, AppError> {
        sqlx::query_as::<_, OfferRecord>(
            "SELECT * FROM offers WHERE establishment_id = $1 AND id = $2",
        )
            .bind(establishment_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .map(Offer::try_from)
            .transpose()
    }

    async fn list(&self, establishment_id: &str) -> Result<Vec<Offer>, AppError> {
        sqlx::query_as::<_, OfferRecord>(
            "SELECT * FROM offers WHERE establishment_id = $1 ORDER BY created_at DESC",
        )
            .bind(establishment_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?
            .into_iter()
            .map(Offer::try_from)
            .collect()
    }

    async fn update(&self, offer: &Offer) -> Result<Offer, AppError> {
        let record = OfferRecord::from(offer);
        sqlx::query_as::<_, OfferRecord>(
            r#"UPDATE offers SET
                title=$1, description=$2, offer_type=$3, percentage=$4, special_text=$5,
                happy_hour_price=$6, days_json=$7, start_time=$8, end_time=$9,
                start_date=$10, end_date=$11, is_active=$12, updated_at=$13
               WHERE id=$14 AND establishment_id=$15 RETURNING *"#
        )
            .bind(&record.title)
            .bind(&record.description)
            .bind(&record.offer_type)
            .bind(record.percentage)
            .bind(&record.special_text)
            .bind(&record.happy_hour_price)
            .bind(&record.days_json)
            .bind(&record.start_time)
            .bind(&record.end_time)
            .bind(record.start_date)
            .bind(record.end_date)
            .bind(record.is_active)
            .bind(record.updated_at)
            .bind(&record.id)
            .bind(&record.establishment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Offer not found".into()))?
            .try_into()
    }

    async fn delete(&self, establishment_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1 AND establishment_id = $2")
            .bind(id)
            .bind(establishment_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Offer not found".into()));
        }
        Ok(())
    }
}
