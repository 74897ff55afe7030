// src/services/lead_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::LeadRepository,
    models::lead::{ContactPayload, Lead, LeadStatus, DEFAULT_LEAD_SOURCE},
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
}

impl LeadService {
    pub fn new(repo: LeadRepository) -> Self {
        Self { repo }
    }

    /// Formulário de contato. Nada vai ao banco se a validação falhar.
    pub async fn submit(&self, input: &ContactPayload) -> Result<Lead, AppError> {
        let input = input.normalized();
        input.validate()?;

        let source = input.source.as_deref().unwrap_or(DEFAULT_LEAD_SOURCE);

        let lead = self.repo
            .create(&input.name, &input.email, input.phone.as_deref(), &input.message, source)
            .await?;

        tracing::info!(lead_id = %lead.id, source = %lead.source, "📨 Novo lead recebido");
        Ok(lead)
    }

    pub async fn list(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>, AppError> {
        self.repo.list(status).await
    }

    pub async fn update_status(&self, id: Uuid, status: LeadStatus) -> Result<Lead, AppError> {
        self.repo
            .update_status(id, status)
            .await?
            .ok_or(AppError::LeadNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> LeadService {
        // Endereço inexistente: se o submit chegasse ao banco, o erro não seria de validação
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        LeadService::new(LeadRepository::new(pool))
    }

    fn contact(name: &str, email: &str, message: &str) -> ContactPayload {
        ContactPayload {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            message: message.to_string(),
            source: Some("galapagos".to_string()),
        }
    }

    #[tokio::test]
    async fn empty_name_is_rejected_before_touching_the_database() {
        let result = service().submit(&contact("   ", "maria@correo.com", "Hola")).await;

        match result {
            Err(AppError::ValidationError(errors)) => {
                assert!(errors.errors().contains_key("name"));
            }
            other => panic!("esperava erro de validação, veio {:?}", other.map(|l| l.id)),
        }
    }

    #[test]
    fn padded_fields_are_trimmed_before_validation() {
        let mut payload = contact("  María Pérez ", " maria@correo.com ", " Quiero ir a Galápagos ");
        payload.phone = Some("   ".to_string());
        payload.source = Some(" ".to_string());

        let normalized = payload.normalized();

        assert!(normalized.validate().is_ok());
        assert_eq!(normalized.email, "maria@correo.com");
        assert_eq!(normalized.name, "María Pérez");
        assert!(normalized.phone.is_none());
        assert!(normalized.source.is_none());
    }

    #[tokio::test]
    async fn padded_email_passes_validation_and_reaches_the_repository() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        let service = LeadService::new(LeadRepository::new(pool));

        let result = service.submit(&contact("María", " maria@correo.com ", "Hola")).await;

        // Sem banco de verdade: o erro tem que vir do banco, não da validação
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn invalid_email_and_blank_message_are_reported_together() {
        let result = service().submit(&contact("María", "no-es-email", "")).await;

        let Err(AppError::ValidationError(errors)) = result else {
            panic!("esperava erro de validação");
        };
        let fields = errors.errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("message"));
        assert!(!fields.contains_key("name"));
    }
}
