use crate::domain::{
    models::{
        establishment::{Establishment, EstablishmentRecord},
        partner::Partner,
        stats::StatsRecord,
    },
    ports::PartnerRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePartnerRepo {
    pool: SqlitePool,
}

impl SqlitePartnerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartnerRepository for SqlitePartnerRepo {
    async fn create_account(&self, establishment: &Establishment, partner: &Partner) -> Result<Partner, AppError> {
        let record = EstablishmentRecord::try_from(establishment)?;
        let stats = StatsRecord::zeroed(&record.id)?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            r#"INSERT INTO establishments (
                id, name, description, phone, email, address_line1, address_line2,
                postal_code, city, country, opening_hours_json, photos_json, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
            .bind(&record.id)
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
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query(
            r#"INSERT INTO establishment_stats (
                establishment_id, total_visitors, offers_viewed, offers_redeemed, visitors_trend_json, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)"#
        )
            .bind(&stats.establishment_id)
            .bind(stats.total_visitors)
            .bind(stats.offers_viewed)
            .bind(stats.offers_redeemed)
            .bind(&stats.visitors_trend_json)
            .bind(stats.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Partner>(
            r#"INSERT INTO partners (
                id, email, password_hash, first_name, last_name, establishment_id, avatar_url, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&partner.id)
            .bind(&partner.email)
            .bind(&partner.password_hash)
            .bind(&partner.first_name)
            .bind(&partner.last_name)
            .bind(&partner.establishment_id)
            .bind(&partner.avatar_url)
            .bind(partner.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Partner>, AppError> {
        sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Partner>, AppError> {
        sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
