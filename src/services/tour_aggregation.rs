// src/services/tour_aggregation.rs
//
// Remonta os tours a partir das coleções carregadas em consultas separadas
// e aplica os filtros que não são feitos no SQL.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tour::{
        Departure, Tour, TourActivity, TourAttachment, TourDestination, TourDetail, TourFilter,
        TourGift, TourPhoto, TourPrice,
    },
};

/// Coleções aninhadas de vários tours, como vêm do banco.
#[derive(Debug, Default)]
pub struct TourCollections {
    pub destinations: Vec<TourDestination>,
    pub departures: Vec<Departure>,
    pub prices: Vec<TourPrice>,
    pub photos: Vec<TourPhoto>,
    pub gifts: Vec<TourGift>,
    pub activities: Vec<TourActivity>,
    pub attachments: Vec<TourAttachment>,
}

/// Menor preço entre todos os registros. Sem preços -> None.
pub fn starting_price(prices: &[TourPrice]) -> Option<Decimal> {
    prices.iter().fold(None, |min, price| match min {
        Some(current) if current <= price.amount => Some(current),
        _ => Some(price.amount),
    })
}

fn group_by_tour<T>(items: Vec<T>, tour_id: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(tour_id(&item)).or_default().push(item);
    }
    grouped
}

/// Junta cada tour com suas coleções, mantendo a ordem de `tours`.
pub fn assemble(tours: Vec<Tour>, collections: TourCollections) -> Vec<TourDetail> {
    let mut destinations = group_by_tour(collections.destinations, |d| d.tour_id);
    let mut departures = group_by_tour(collections.departures, |d| d.tour_id);
    let mut prices = group_by_tour(collections.prices, |p| p.tour_id);
    let mut photos = group_by_tour(collections.photos, |p| p.tour_id);
    let mut gifts = group_by_tour(collections.gifts, |g| g.tour_id);
    let mut activities = group_by_tour(collections.activities, |a| a.tour_id);
    let mut attachments = group_by_tour(collections.attachments, |a| a.tour_id);

    tours
        .into_iter()
        .map(|tour| {
            let id = tour.id;

            let mut tour_destinations = destinations.remove(&id).unwrap_or_default();
            tour_destinations.sort_by_key(|d| d.position);

            let mut tour_departures = departures.remove(&id).unwrap_or_default();
            tour_departures.sort_by_key(|d| d.departure_date);

            let mut tour_photos = photos.remove(&id).unwrap_or_default();
            tour_photos.sort_by_key(|p| p.position);

            let mut tour_activities = activities.remove(&id).unwrap_or_default();
            tour_activities.sort_by_key(|a| a.position);

            let tour_prices = prices.remove(&id).unwrap_or_default();

            TourDetail {
                starting_price: starting_price(&tour_prices),
                tour,
                destinations: tour_destinations,
                departures: tour_departures,
                prices: tour_prices,
                photos: tour_photos,
                gifts: gifts.remove(&id).unwrap_or_default(),
                activities: tour_activities,
                attachments: attachments.remove(&id).unwrap_or_default(),
                canonical_url: None,
            }
        })
        .collect()
}

fn departure_overlaps(departure: &Departure, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    let start = departure.departure_date;
    let end = departure.return_date.unwrap_or(start);
    from.is_none_or(|from| end >= from) && to.is_none_or(|to| start <= to)
}

impl TourFilter {
    pub fn validate_range(&self) -> Result<(), AppError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(AppError::invalid_field("dateFrom", "invalid_date_range"));
            }
        }
        Ok(())
    }

    fn has_date_bounds(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Filtros pós-consulta: destino, preço máximo e janela de datas.
    pub fn matches(&self, tour: &TourDetail) -> bool {
        if let Some(destination_id) = self.destination_id {
            if !tour.destinations.iter().any(|d| d.destination_id == destination_id) {
                return false;
            }
        }

        if let Some(max_price) = self.max_price {
            // Tour sem preço definido nunca passa no filtro de preço
            match tour.starting_price {
                Some(price) if price <= max_price => {}
                _ => return false,
            }
        }

        if self.has_date_bounds()
            && !tour
                .departures
                .iter()
                .any(|d| departure_overlaps(d, self.date_from, self.date_to))
        {
            return false;
        }

        true
    }
}

pub fn apply_filters(mut tours: Vec<TourDetail>, filter: &TourFilter) -> Vec<TourDetail> {
    tours.retain(|tour| filter.matches(tour));
    tours
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::tour::{PaymentMethod, RoomType};
    use chrono::{TimeZone, Utc};

    pub fn tour(n: u128) -> Tour {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Tour {
            id: Uuid::from_u128(n),
            slug: format!("tour-{}", n),
            title: format!("Tour {}", n),
            description: None,
            duration_days: 5,
            duration_nights: 4,
            includes_flight: true,
            includes_transport: true,
            includes_lodging: true,
            includes_meals: false,
            includes_activities: false,
            is_published: true,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn price(tour: u128, amount: i64) -> TourPrice {
        TourPrice {
            id: Uuid::new_v4(),
            tour_id: Uuid::from_u128(tour),
            departure_id: None,
            room_type: RoomType::Double,
            payment_method: PaymentMethod::Cash,
            amount: Decimal::from(amount),
        }
    }

    pub fn departure(tour: u128, start: (i32, u32, u32), end: Option<(i32, u32, u32)>) -> Departure {
        let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Departure {
            id: Uuid::new_v4(),
            tour_id: Uuid::from_u128(tour),
            departure_date: date(start),
            return_date: end.map(date),
            capacity: 20,
        }
    }

    pub fn destination(tour: u128, destination: u128, position: i32) -> TourDestination {
        TourDestination {
            tour_id: Uuid::from_u128(tour),
            destination_id: Uuid::from_u128(destination),
            position,
            country: "Ecuador".to_string(),
            city: format!("Ciudad {}", destination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn ids(tours: &[TourDetail]) -> Vec<Uuid> {
        tours.iter().map(|t| t.tour.id).collect()
    }

    #[test]
    fn starting_price_is_minimum_of_all_prices() {
        let prices = vec![price(1, 150), price(1, 100), price(1, 180)];
        assert_eq!(starting_price(&prices), Some(Decimal::from(100)));
    }

    #[test]
    fn starting_price_is_none_without_prices() {
        assert_eq!(starting_price(&[]), None);
    }

    #[test]
    fn assemble_groups_children_and_keeps_tour_order() {
        let collections = TourCollections {
            destinations: vec![destination(2, 20, 2), destination(2, 21, 1), destination(1, 10, 1)],
            prices: vec![price(1, 100), price(1, 150), price(2, 90)],
            departures: vec![
                departure(2, (2025, 9, 1), None),
                departure(2, (2025, 3, 1), None),
            ],
            ..Default::default()
        };

        let tours = assemble(vec![tour(2), tour(1), tour(3)], collections);

        assert_eq!(ids(&tours), vec![Uuid::from_u128(2), Uuid::from_u128(1), Uuid::from_u128(3)]);
        assert_eq!(tours[0].starting_price, Some(Decimal::from(90)));
        assert_eq!(tours[1].starting_price, Some(Decimal::from(100)));
        assert_eq!(tours[2].starting_price, None);

        let positions: Vec<i32> = tours[0].destinations.iter().map(|d| d.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert!(tours[0].departures[0].departure_date < tours[0].departures[1].departure_date);
        assert!(tours[2].prices.is_empty());
    }

    #[test]
    fn max_price_excludes_tours_without_price() {
        let tours = assemble(
            vec![tour(1), tour(2)],
            TourCollections {
                prices: vec![price(1, 100), price(1, 150)],
                ..Default::default()
            },
        );
        let filter = TourFilter {
            max_price: Some(Decimal::from(120)),
            ..Default::default()
        };

        let filtered = apply_filters(tours, &filter);
        assert_eq!(ids(&filtered), vec![Uuid::from_u128(1)]);
    }

    #[test]
    fn max_price_is_inclusive() {
        let tours = assemble(
            vec![tour(1)],
            TourCollections { prices: vec![price(1, 120)], ..Default::default() },
        );
        let filter = TourFilter { max_price: Some(Decimal::from(120)), ..Default::default() };
        assert_eq!(apply_filters(tours, &filter).len(), 1);
    }

    #[test]
    fn destination_filter_requires_membership() {
        let tours = assemble(
            vec![tour(1), tour(2)],
            TourCollections {
                destinations: vec![destination(1, 10, 1), destination(2, 11, 1), destination(2, 10, 2)],
                ..Default::default()
            },
        );
        let filter = TourFilter { destination_id: Some(Uuid::from_u128(11)), ..Default::default() };
        assert_eq!(ids(&apply_filters(tours, &filter)), vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn date_range_uses_overlap_with_departure_window() {
        let tours = assemble(
            vec![tour(1), tour(2), tour(3)],
            TourCollections {
                departures: vec![
                    // 28/06 a 05/07 cruza o início da janela
                    departure(1, (2025, 6, 28), Some((2025, 7, 5))),
                    departure(2, (2025, 8, 10), None),
                ],
                ..Default::default()
            },
        );
        let filter = TourFilter {
            date_from: NaiveDate::from_ymd_opt(2025, 7, 1),
            date_to: NaiveDate::from_ymd_opt(2025, 7, 31),
            ..Default::default()
        };

        // Tour 3 não tem saídas e fica de fora
        assert_eq!(ids(&apply_filters(tours, &filter)), vec![Uuid::from_u128(1)]);
    }

    #[test]
    fn open_ended_date_bounds() {
        let tours = assemble(
            vec![tour(1), tour(2)],
            TourCollections {
                departures: vec![
                    departure(1, (2025, 1, 10), None),
                    departure(2, (2025, 12, 10), None),
                ],
                ..Default::default()
            },
        );
        let filter = TourFilter { date_from: NaiveDate::from_ymd_opt(2025, 6, 1), ..Default::default() };
        assert_eq!(ids(&apply_filters(tours, &filter)), vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let filter = TourFilter {
            date_from: NaiveDate::from_ymd_opt(2025, 8, 1),
            date_to: NaiveDate::from_ymd_opt(2025, 7, 1),
            ..Default::default()
        };
        assert!(matches!(filter.validate_range(), Err(AppError::ValidationError(_))));
        assert!(TourFilter::default().validate_range().is_ok());
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let tours = assemble(vec![tour(1), tour(2)], TourCollections::default());
        assert_eq!(apply_filters(tours, &TourFilter::default()).len(), 2);
    }
}
