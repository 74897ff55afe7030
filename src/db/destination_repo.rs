// src/db/destination_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::destination::Destination};

#[derive(Clone)]
pub struct DestinationRepository {
    pool: PgPool,
}

impl DestinationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Destination>, AppError> {
        let destinations = sqlx::query_as::<_, Destination>(
            "SELECT * FROM destinations ORDER BY country ASC, city ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(destinations)
    }

    pub async fn create(&self, country: &str, city: &str) -> Result<Destination, AppError> {
        sqlx::query_as::<_, Destination>(
            "INSERT INTO destinations (country, city) VALUES ($1, $2) RETURNING *",
        )
        .bind(country)
        .bind(city)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!("{}, {}", city, country));
                }
            }
            e.into()
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // ON DELETE RESTRICT em tour_destinations
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ResourceInUse("Destino usado por um ou mais tours.".to_string());
                    }
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::DestinationNotFound);
        }
        Ok(())
    }
}
