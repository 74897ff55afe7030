// src/common/query.rs

use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer};

/// Campo de query string opcional: ausente ou em branco (`?maxPrice=`) vira `None`.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use crate::models::tour::TourFilter;
    use axum::{extract::Query, http::Uri};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn filter(uri: &'static str) -> Result<TourFilter, String> {
        Query::<TourFilter>::try_from_uri(&Uri::from_static(uri))
            .map(|Query(filter)| filter)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn blank_values_from_html_forms_are_ignored() {
        let f = filter("/api/tours?maxPrice=&dateFrom=&dateTo=&destinationId=").unwrap();
        assert!(f.max_price.is_none());
        assert!(f.date_from.is_none());
        assert!(f.date_to.is_none());
        assert!(f.destination_id.is_none());
    }

    #[test]
    fn filled_values_are_parsed() {
        let f = filter("/api/tours?precio_maximo=120.50&dateFrom=2025-07-01").unwrap();
        assert_eq!(f.max_price, Some(Decimal::new(12050, 2)));
        assert_eq!(f.date_from, NaiveDate::from_ymd_opt(2025, 7, 1));
    }

    #[test]
    fn garbage_is_still_rejected() {
        assert!(filter("/api/tours?maxPrice=barato").is_err());
        assert!(filter("/api/tours?dateFrom=ayer").is_err());
    }
}
