// src/models/tag.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_slug};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagCategory {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Aventura")]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    #[schema(example = "aventura")]
    pub slug: String,
    #[schema(example = "#0ea5e9")]
    pub color: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagCategoryPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Destinos")]
    pub name: String,
    pub color: Option<String>,
}
