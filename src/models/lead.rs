// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_blank;

pub const DEFAULT_LEAD_SOURCE: &str = "contact_form";

// Mapeia o CREATE TYPE lead_status do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: LeadStatus,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

// Formulário público de contato
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "María Pérez")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@correo.com")]
    pub email: String,

    pub phone: Option<String>,

    #[validate(custom(function = "validate_not_blank"), length(max = 5000, message = "too_long"))]
    pub message: String,

    /// Página de origem (ex: "galapagos", "vuelos")
    pub source: Option<String>,
}

impl ContactPayload {
    /// Tira os espaços das pontas; telefone e origem em branco viram `None`.
    pub fn normalized(&self) -> Self {
        fn optional(value: &Option<String>) -> Option<String> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        }

        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(&self.phone),
            message: self.message.trim().to_string(),
            source: optional(&self.source),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLeadStatusPayload {
    pub status: LeadStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
}
