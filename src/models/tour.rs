// src/models/tour.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    query::blank_as_none,
    validation::{validate_not_blank, validate_not_negative, validate_slug},
};

// --- ENUMS ---

// Mapeia o CREATE TYPE room_type do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "room_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Single,
    Double,
    Triple,
    Quadruple,
    Child,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
}

// --- LINHAS DO BANCO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub duration_nights: i32,

    // O que o pacote inclui
    pub includes_flight: bool,
    pub includes_transport: bool,
    pub includes_lodging: bool,
    pub includes_meals: bool,
    pub includes_activities: bool,

    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha do JOIN tour_destinations + destinations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourDestination {
    pub tour_id: Uuid,
    pub destination_id: Uuid,
    pub position: i32,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub id: Uuid,
    pub tour_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-07-14")]
    pub departure_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub return_date: Option<NaiveDate>,
    pub capacity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPrice {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub departure_id: Option<Uuid>,
    pub room_type: RoomType,
    pub payment_method: PaymentMethod,
    #[schema(value_type = f64, example = 1250.0)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPhoto {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub url: String,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourGift {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourActivity {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub description: String,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourAttachment {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub name: String,
    pub url: String,
}

// Entrada do sitemap
#[derive(Debug, Clone, FromRow)]
pub struct TourSlug {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

// --- VIEW MODEL AGREGADO ---

/// Tour com todas as coleções aninhadas e o preço "desde" calculado.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourDetail {
    #[serde(flatten)]
    pub tour: Tour,

    // Nunca gravado: mínimo de todos os preços no momento da leitura
    #[schema(value_type = Option<f64>)]
    pub starting_price: Option<Decimal>,

    pub destinations: Vec<TourDestination>,
    pub departures: Vec<Departure>,
    pub prices: Vec<TourPrice>,
    pub photos: Vec<TourPhoto>,
    pub gifts: Vec<TourGift>,
    pub activities: Vec<TourActivity>,
    pub attachments: Vec<TourAttachment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

// --- FILTROS (query string) ---

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TourFilter {
    /// Busca no título
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[param(value_type = Option<String>, format = Uuid)]
    pub destination_id: Option<Uuid>,
    /// Preço máximo ("precio_maximo")
    #[serde(default, alias = "precio_maximo", deserialize_with = "blank_as_none")]
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[param(value_type = Option<String>, format = Date)]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[param(value_type = Option<String>, format = Date)]
    pub date_to: Option<NaiveDate>,
}

// --- PAYLOADS DO ADMIN ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartureInput {
    #[schema(value_type = String, format = Date, example = "2025-07-14")]
    pub departure_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2025-07-21")]
    pub return_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "min_capacity"))]
    #[schema(example = 20)]
    pub capacity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceInput {
    /// Índice em `departures` quando o preço é de uma saída específica
    pub departure_index: Option<usize>,
    pub room_type: RoomType,
    pub payment_method: PaymentMethod,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 1250.0)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInput {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Itinerario.pdf")]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub url: String,
}

/// Formulário completo do tour. As coleções são enviadas inteiras e substituem as atuais.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Galápagos 5 días")]
    pub title: String,

    #[validate(custom(function = "validate_slug"))]
    #[schema(example = "galapagos-5-dias")]
    pub slug: String,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "min_duration"))]
    pub duration_days: i32,

    #[validate(range(min = 0, message = "negative_value"))]
    #[serde(default)]
    pub duration_nights: i32,

    #[serde(default)]
    pub includes_flight: bool,
    #[serde(default)]
    pub includes_transport: bool,
    #[serde(default)]
    pub includes_lodging: bool,
    #[serde(default)]
    pub includes_meals: bool,
    #[serde(default)]
    pub includes_activities: bool,
    #[serde(default)]
    pub is_published: bool,

    /// A ordem do array vira a ordem do roteiro (1..N)
    #[serde(default)]
    pub destination_ids: Vec<Uuid>,

    #[serde(default)]
    #[validate(nested)]
    pub departures: Vec<DepartureInput>,

    #[serde(default)]
    #[validate(nested)]
    pub prices: Vec<PriceInput>,

    #[serde(default)]
    pub photo_urls: Vec<String>,

    #[serde(default)]
    pub gifts: Vec<String>,

    #[serde(default)]
    pub activities: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub attachments: Vec<AttachmentInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderDestinationsPayload {
    /// Todos os destinos do tour, na nova ordem
    pub destination_ids: Vec<Uuid>,
}
