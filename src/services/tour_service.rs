// src/services/tour_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TourRepository,
    models::{
        language::Language,
        tour::{Tour, TourDetail, TourFilter, TourPayload},
    },
    services::{
        destination_order::{self, has_duplicates, resequence},
        seo_service::{canonical_url, tour_path},
        tour_aggregation::{apply_filters, assemble},
    },
};

#[derive(Clone)]
pub struct TourService {
    repo: TourRepository,
    pool: PgPool,
    base_url: String,
}

/// Regras do formulário que o `validator` não cobre sozinho.
pub fn check_tour_consistency(input: &TourPayload) -> Result<(), AppError> {
    if has_duplicates(&input.destination_ids) {
        return Err(AppError::invalid_field("destinationIds", "duplicate_destination"));
    }

    for departure in &input.departures {
        if let Some(return_date) = departure.return_date {
            if return_date < departure.departure_date {
                return Err(AppError::invalid_field("departures", "return_before_departure"));
            }
        }
    }

    let departure_count = input.departures.len();
    if input
        .prices
        .iter()
        .filter_map(|p| p.departure_index)
        .any(|index| index >= departure_count)
    {
        return Err(AppError::invalid_field("prices", "unknown_departure"));
    }

    Ok(())
}

impl TourService {
    pub fn new(repo: TourRepository, pool: PgPool, base_url: String) -> Self {
        Self { repo, pool, base_url }
    }

    async fn aggregate(&self, tours: Vec<Tour>) -> Result<Vec<TourDetail>, AppError> {
        let ids: Vec<Uuid> = tours.iter().map(|t| t.id).collect();
        let collections = self.repo.load_collections(&ids).await?;
        Ok(assemble(tours, collections))
    }

    async fn aggregate_one(&self, tour: Tour) -> Result<TourDetail, AppError> {
        self.aggregate(vec![tour])
            .await?
            .pop()
            .ok_or(AppError::TourNotFound)
    }

    // =========================================================================
    //  PÚBLICO
    // =========================================================================

    /// Catálogo: consulta no banco, agrega e aplica os filtros pós-consulta.
    pub async fn list_public(&self, filter: &TourFilter) -> Result<Vec<TourDetail>, AppError> {
        filter.validate_range()?;

        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let tours = self.repo.list_tours(true, search).await?;
        let fetched = tours.len();

        let detailed = apply_filters(self.aggregate(tours).await?, filter);
        tracing::debug!(fetched, returned = detailed.len(), "Catálogo de tours filtrado");
        Ok(detailed)
    }

    pub async fn get_public(&self, slug: &str, lang: Language) -> Result<TourDetail, AppError> {
        let tour = self.repo
            .find_by_slug(slug, true)
            .await?
            .ok_or(AppError::TourNotFound)?;

        let mut detail = self.aggregate_one(tour).await?;
        detail.canonical_url = Some(canonical_url(&self.base_url, &tour_path(lang, slug)));
        Ok(detail)
    }

    // =========================================================================
    //  ADMIN
    // =========================================================================

    pub async fn list_all(&self) -> Result<Vec<TourDetail>, AppError> {
        let tours = self.repo.list_tours(false, None).await?;
        self.aggregate(tours).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<TourDetail, AppError> {
        let tour = self.repo.find_by_id(id).await?.ok_or(AppError::TourNotFound)?;
        self.aggregate_one(tour).await
    }

    pub async fn create(&self, input: &TourPayload) -> Result<TourDetail, AppError> {
        check_tour_consistency(input)?;

        let mut tx = self.pool.begin().await?;

        let tour = self.repo.insert_tour(&mut *tx, input).await?;
        self.repo
            .set_destination_positions(&mut tx, tour.id, &resequence(&input.destination_ids))
            .await?;
        self.repo.replace_children(&mut tx, tour.id, input).await?;

        tx.commit().await?;

        tracing::info!(tour_id = %tour.id, slug = %tour.slug, "Tour criado");
        self.get_by_id(tour.id).await
    }

    pub async fn update(&self, id: Uuid, input: &TourPayload) -> Result<TourDetail, AppError> {
        check_tour_consistency(input)?;

        let mut tx = self.pool.begin().await?;

        let tour = self.repo
            .update_tour(&mut *tx, id, input)
            .await?
            .ok_or(AppError::TourNotFound)?;
        self.repo
            .set_destination_positions(&mut tx, tour.id, &resequence(&input.destination_ids))
            .await?;
        self.repo.replace_children(&mut tx, tour.id, input).await?;

        tx.commit().await?;

        tracing::info!(tour_id = %tour.id, "Tour atualizado");
        self.get_by_id(tour.id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_tour(id).await? {
            return Err(AppError::TourNotFound);
        }
        tracing::info!(tour_id = %id, "Tour removido");
        Ok(())
    }

    /// Tira um destino do roteiro e renumera os demais (1..N).
    pub async fn remove_destination(&self, tour_id: Uuid, destination_id: Uuid) -> Result<TourDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let rows = self.repo.destinations_for(&mut *tx, &[tour_id]).await?;
        let order = destination_order::current_order(&rows);
        let positions = destination_order::remove_destination(&order, destination_id)
            .ok_or(AppError::DestinationNotFound)?;

        self.repo.set_destination_positions(&mut tx, tour_id, &positions).await?;
        self.repo.touch(&mut *tx, tour_id).await?;
        tx.commit().await?;

        self.get_by_id(tour_id).await
    }

    pub async fn reorder_destinations(&self, tour_id: Uuid, requested: &[Uuid]) -> Result<TourDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let rows = self.repo.destinations_for(&mut *tx, &[tour_id]).await?;
        let positions = destination_order::reorder(&destination_order::current_order(&rows), requested)?;

        self.repo.set_destination_positions(&mut tx, tour_id, &positions).await?;
        self.repo.touch(&mut *tx, tour_id).await?;
        tx.commit().await?;

        self.get_by_id(tour_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tour::{DepartureInput, PaymentMethod, PriceInput, RoomType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use validator::Validate;

    fn payload() -> TourPayload {
        serde_json::from_value(serde_json::json!({
            "title": "Galápagos 5 días",
            "slug": "galapagos-5-dias",
            "durationDays": 5,
            "durationNights": 4,
            "includesLodging": true,
            "destinationIds": [Uuid::from_u128(1), Uuid::from_u128(2)],
            "departures": [
                { "departureDate": "2025-07-14", "returnDate": "2025-07-18", "capacity": 16 }
            ],
            "prices": [
                { "departureIndex": 0, "roomType": "DOUBLE", "paymentMethod": "CASH", "amount": 1250.0 },
                { "roomType": "SINGLE", "paymentMethod": "CARD", "amount": 1490.5 }
            ],
            "activities": ["Snorkel", "Visita a la Estación Darwin"]
        }))
        .unwrap()
    }

    #[test]
    fn valid_form_passes_both_layers() {
        let input = payload();
        assert!(input.validate().is_ok());
        assert!(check_tour_consistency(&input).is_ok());
        assert!(!input.includes_flight);
        assert_eq!(input.prices[1].amount, Decimal::new(14905, 1));
    }

    #[test]
    fn required_fields_and_numeric_limits() {
        let mut input = payload();
        input.title = "  ".into();
        input.slug = "Galapagos 5".into();
        input.duration_days = 0;
        input.departures[0].capacity = 0;
        input.prices[0].amount = Decimal::from(-10);

        let errors = input.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("slug"));
        assert!(fields.contains_key("departures"));
        assert!(fields.contains_key("prices"));
        // durationDays também falhou
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn duplicated_destination_is_rejected() {
        let mut input = payload();
        input.destination_ids.push(Uuid::from_u128(1));
        assert!(matches!(check_tour_consistency(&input), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn return_before_departure_is_rejected() {
        let mut input = payload();
        input.departures.push(DepartureInput {
            departure_date: NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            capacity: 10,
        });
        assert!(check_tour_consistency(&input).is_err());
    }

    #[test]
    fn price_pointing_to_missing_departure_is_rejected() {
        let mut input = payload();
        input.prices.push(PriceInput {
            departure_index: Some(3),
            room_type: RoomType::Triple,
            payment_method: PaymentMethod::Transfer,
            amount: Decimal::from(900),
        });
        assert!(check_tour_consistency(&input).is_err());
    }
}
