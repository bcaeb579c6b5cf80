use crate::domain::{
    models::establishment::{Establishment, EstablishmentRecord},
    ports::EstablishmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEstablishmentRepo {
    pool: PgPool,
}

impl PostgresEstablishmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EstablishmentRepository for PostgresEstablishmentRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Establishment>, AppError> {
        sqlx::query_as::<_, EstablishmentRecord>("SELECT * FROM establishments WHERE id = $1")
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
                name=$1, description=$2, phone=$3, email=$4, address_line1=$5, address_line2=$6,
                postal_code=$7, city=$8, country=$9, opening_hours_json=$10, photos_json=$11, updated_at=$12
               WHERE id=$13 RETURNING *"#
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
