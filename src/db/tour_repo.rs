// src/db/tour_repo.rs

use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tour::{
        Departure, Tour, TourActivity, TourAttachment, TourDestination, TourGift, TourPayload,
        TourPhoto, TourPrice, TourSlug,
    },
    services::{destination_order::DestinationPosition, tour_aggregation::TourCollections},
};

#[derive(Clone)]
pub struct TourRepository {
    pool: PgPool,
}

// Converte violações de FK/unicidade em erros de domínio
fn map_write_error(e: sqlx::Error, conflict: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(conflict());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::DestinationNotFound;
        }
    }
    e.into()
}

impl TourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_tours(&self, published_only: bool, search: Option<&str>) -> Result<Vec<Tour>, AppError> {
        let tours = sqlx::query_as::<_, Tour>(
            r#"
            SELECT * FROM tours
            WHERE ($1 = FALSE OR is_published)
              AND ($2::TEXT IS NULL OR title ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(published_only)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(tours)
    }

    pub async fn find_by_slug(&self, slug: &str, published_only: bool) -> Result<Option<Tour>, AppError> {
        let tour = sqlx::query_as::<_, Tour>(
            "SELECT * FROM tours WHERE slug = $1 AND ($2 = FALSE OR is_published)",
        )
        .bind(slug)
        .bind(published_only)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tour)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>, AppError> {
        let tour = sqlx::query_as::<_, Tour>("SELECT * FROM tours WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tour)
    }

    pub async fn list_published_slugs(&self) -> Result<Vec<TourSlug>, AppError> {
        let slugs = sqlx::query_as::<_, TourSlug>(
            "SELECT slug, updated_at FROM tours WHERE is_published ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(slugs)
    }

    pub async fn destinations_for<'e, E>(&self, executor: E, tour_ids: &[Uuid]) -> Result<Vec<TourDestination>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, TourDestination>(
            r#"
            SELECT td.tour_id, td.destination_id, td.position, d.country, d.city
            FROM tour_destinations td
            JOIN destinations d ON d.id = td.destination_id
            WHERE td.tour_id = ANY($1)
            ORDER BY td.tour_id, td.position
            "#,
        )
        .bind(tour_ids)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Carrega todas as coleções aninhadas de uma vez (uma consulta por coleção).
    pub async fn load_collections(&self, tour_ids: &[Uuid]) -> Result<TourCollections, AppError> {
        if tour_ids.is_empty() {
            return Ok(TourCollections::default());
        }

        let destinations = self.destinations_for(&self.pool, tour_ids).await?;

        let departures = sqlx::query_as::<_, Departure>(
            "SELECT * FROM tour_departures WHERE tour_id = ANY($1) ORDER BY departure_date",
        )
        .bind(tour_ids)
        .fetch_all(&self.pool)
        .await?;

        let prices = sqlx::query_as::<_, TourPrice>(
            "SELECT * FROM tour_prices WHERE tour_id = ANY($1) ORDER BY amount",
        )
        .bind(tour_ids)
        .fetch_all(&self.pool)
        .await?;

        let photos = sqlx::query_as::<_, TourPhoto>(
            "SELECT * FROM tour_photos WHERE tour_id = ANY($1) ORDER BY position",
        )
        .bind(tour_ids)
        .fetch_all(&self.pool)
        .await?;

        let gifts = sqlx::query_as::<_, TourGift>("SELECT * FROM tour_gifts WHERE tour_id = ANY($1)")
            .bind(tour_ids)
            .fetch_all(&self.pool)
            .await?;

        let activities = sqlx::query_as::<_, TourActivity>(
            "SELECT * FROM tour_activities WHERE tour_id = ANY($1) ORDER BY position",
        )
        .bind(tour_ids)
        .fetch_all(&self.pool)
        .await?;

        let attachments = sqlx::query_as::<_, TourAttachment>(
            "SELECT * FROM tour_attachments WHERE tour_id = ANY($1)",
        )
        .bind(tour_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(TourCollections {
            destinations,
            departures,
            prices,
            photos,
            gifts,
            activities,
            attachments,
        })
    }

    // ---
    // Escrita (dentro da transação do service)
    // ---

    pub async fn insert_tour<'e, E>(&self, executor: E, input: &TourPayload) -> Result<Tour, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tour>(
            r#"
            INSERT INTO tours (
                slug, title, description, duration_days, duration_nights,
                includes_flight, includes_transport, includes_lodging, includes_meals,
                includes_activities, is_published
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&input.slug)
        .bind(input.title.trim())
        .bind(input.description.as_deref())
        .bind(input.duration_days)
        .bind(input.duration_nights)
        .bind(input.includes_flight)
        .bind(input.includes_transport)
        .bind(input.includes_lodging)
        .bind(input.includes_meals)
        .bind(input.includes_activities)
        .bind(input.is_published)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, || format!("O slug '{}' já existe.", input.slug)))
    }

    pub async fn update_tour<'e, E>(&self, executor: E, id: Uuid, input: &TourPayload) -> Result<Option<Tour>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tour>(
            r#"
            UPDATE tours SET
                slug = $2, title = $3, description = $4, duration_days = $5,
                duration_nights = $6, includes_flight = $7, includes_transport = $8,
                includes_lodging = $9, includes_meals = $10, includes_activities = $11,
                is_published = $12, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.slug)
        .bind(input.title.trim())
        .bind(input.description.as_deref())
        .bind(input.duration_days)
        .bind(input.duration_nights)
        .bind(input.includes_flight)
        .bind(input.includes_transport)
        .bind(input.includes_lodging)
        .bind(input.includes_meals)
        .bind(input.includes_activities)
        .bind(input.is_published)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_write_error(e, || format!("O slug '{}' já existe.", input.slug)))
    }

    pub async fn delete_tour(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn touch<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE tours SET updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Reescreve o roteiro inteiro com as posições já normalizadas.
    pub async fn set_destination_positions(
        &self,
        conn: &mut PgConnection,
        tour_id: Uuid,
        positions: &[DestinationPosition],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tour_destinations WHERE tour_id = $1")
            .bind(tour_id)
            .execute(&mut *conn)
            .await?;

        for entry in positions {
            sqlx::query(
                "INSERT INTO tour_destinations (tour_id, destination_id, position) VALUES ($1, $2, $3)",
            )
            .bind(tour_id)
            .bind(entry.destination_id)
            .bind(entry.position)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_write_error(e, || format!("Destino {} repetido.", entry.destination_id)))?;
        }
        Ok(())
    }

    /// Substitui todas as sub-coleções pelas do formulário.
    pub async fn replace_children(
        &self,
        conn: &mut PgConnection,
        tour_id: Uuid,
        input: &TourPayload,
    ) -> Result<(), AppError> {
        // Preços caem em cascata junto com as saídas
        for table in ["tour_prices", "tour_departures", "tour_photos", "tour_gifts", "tour_activities", "tour_attachments"] {
            sqlx::query(&format!("DELETE FROM {} WHERE tour_id = $1", table))
                .bind(tour_id)
                .execute(&mut *conn)
                .await?;
        }

        let mut departure_ids = Vec::with_capacity(input.departures.len());
        for departure in &input.departures {
            let id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO tour_departures (tour_id, departure_date, return_date, capacity)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(tour_id)
            .bind(departure.departure_date)
            .bind(departure.return_date)
            .bind(departure.capacity)
            .fetch_one(&mut *conn)
            .await?;
            departure_ids.push(id);
        }

        for price in &input.prices {
            let departure_id = price.departure_index.and_then(|i| departure_ids.get(i).copied());
            sqlx::query(
                r#"
                INSERT INTO tour_prices (tour_id, departure_id, room_type, payment_method, amount)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(tour_id)
            .bind(departure_id)
            .bind(price.room_type)
            .bind(price.payment_method)
            .bind(price.amount)
            .execute(&mut *conn)
            .await?;
        }

        for (index, url) in input.photo_urls.iter().enumerate() {
            sqlx::query("INSERT INTO tour_photos (tour_id, url, position) VALUES ($1, $2, $3)")
                .bind(tour_id)
                .bind(url)
                .bind(index as i32 + 1)
                .execute(&mut *conn)
                .await?;
        }

        for gift in &input.gifts {
            sqlx::query("INSERT INTO tour_gifts (tour_id, description) VALUES ($1, $2)")
                .bind(tour_id)
                .bind(gift)
                .execute(&mut *conn)
                .await?;
        }

        for (index, activity) in input.activities.iter().enumerate() {
            sqlx::query("INSERT INTO tour_activities (tour_id, description, position) VALUES ($1, $2, $3)")
                .bind(tour_id)
                .bind(activity)
                .bind(index as i32 + 1)
                .execute(&mut *conn)
                .await?;
        }

        for attachment in &input.attachments {
            sqlx::query("INSERT INTO tour_attachments (tour_id, name, url) VALUES ($1, $2, $3)")
                .bind(tour_id)
                .bind(&attachment.name)
                .bind(&attachment.url)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }
}
