// src/models/destination.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Ecuador")]
    pub country: String,
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Puerto Ayora")]
    pub city: String,
}
