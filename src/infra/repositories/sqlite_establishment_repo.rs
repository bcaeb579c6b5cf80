use crate::domain::{
    models::establishment::{Establishment, EstablishmentRecord},
    ports::EstablishmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEstablishmentRepo {
    pool: SqlitePool,
}

impl SqliteEstablishmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EstablishmentRepository for SqliteEstablishmentRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Establishment>, AppError> {
        sqlx::query_as::<_, EstablishmentRecord>("SELECT * FROM establishments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .map(Establishment::try_from)
            .transpose()
    }

    async fn update(&self, establishment: &Establishment) -> Result<Establishment, AppError> {
        let record = EstablishmentRecord::try_from(establishment)?;
        sqlx::query_as::<_, EstablishmentRecord>(
            r#"UPDATE establishments SET
                name=?, description=?, phone=?, email=?, address_line1=?, address_line2=?,
                postal_code=?, city=?, country=?, opening_hours_json=?, photos_json=?, updated_at=?
               WHERE id=? RETURNING *"#
        )
            .bind(&record.name)
            .bind(&record.description)
            .bind(&record.phone)
            .bind(&record.email)
            .bind(&record.address_line1)
            .bind(&record.address_line2)
            .bind(&record.postal_code)
            .bind(&record.city)
            .bind(&record.country)
            .bind(&record.opening_hours_json)
            .bind(&record.photos_json)
            .bind(record.updated_at)
            .bind(&record.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Establishment not found".into()))?
            .try_into()
    }
}
