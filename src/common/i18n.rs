// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

use crate::models::language::Language;

// Tabela de mensagens de erro: chave -> (es, en)
const MESSAGES: &[(&str, &str, &str)] = &[
    // Genéricos
    ("validation_failed", "Uno o más campos son inválidos.", "One or more fields are invalid."),
    ("internal_error", "Ocurrió un error inesperado. Intenta nuevamente.", "An unexpected error occurred. Please try again."),
    ("database_unavailable", "El servicio no está disponible en este momento.", "The service is temporarily unavailable."),
    ("invalid_query", "Los parámetros de la consulta no son válidos.", "The query parameters are invalid."),
    ("conflict", "El registro ya existe.", "The record already exists."),
    ("in_use", "El registro está en uso y no puede eliminarse.", "The record is in use and cannot be deleted."),
    // Auth
    ("invalid_credentials", "Correo o contraseña inválidos.", "Invalid email or password."),
    ("invalid_token", "Token de autenticación inválido o ausente.", "Missing or invalid authentication token."),
    ("user_not_found", "Usuario no encontrado.", "User not found."),
    // Recursos
    ("tour_not_found", "Tour no encontrado.", "Tour not found."),
    ("post_not_found", "Artículo no encontrado.", "Post not found."),
    ("destination_not_found", "Destino no encontrado.", "Destination not found."),
    ("tag_not_found", "Etiqueta no encontrada.", "Tag not found."),
    ("tag_category_not_found", "Categoría de etiqueta no encontrada.", "Tag category not found."),
    ("lead_not_found", "Contacto no encontrado.", "Lead not found."),
    // Códigos de validação por campo
    ("required", "Este campo es obligatorio.", "This field is required."),
    ("invalid_email", "El correo electrónico no es válido.", "The email address is invalid."),
    ("invalid_slug", "Solo se permiten minúsculas, números y guiones.", "Only lowercase letters, digits and dashes are allowed."),
    ("too_short", "El texto es demasiado corto.", "The text is too short."),
    ("too_long", "El texto es demasiado largo.", "The text is too long."),
    ("negative_value", "El valor no puede ser negativo.", "The value cannot be negative."),
    ("min_duration", "La duración debe ser de al menos un día.", "Duration must be at least one day."),
    ("min_capacity", "La capacidad debe ser al menos 1.", "Capacity must be at least 1."),
    ("return_before_departure", "La fecha de regreso es anterior a la salida.", "Return date is before departure date."),
    ("duplicate_destination", "El destino está repetido.", "The destination is repeated."),
    ("unknown_departure", "El precio apunta a una salida inexistente.", "The price points to a missing departure."),
    ("invalid_date_range", "La fecha inicial es posterior a la final.", "The start date is after the end date."),
    ("invalid_order", "La lista de destinos no coincide con el tour.", "The destination list does not match the tour."),
];

#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<(Language, &'static str), &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::with_capacity(MESSAGES.len() * 2);
        for (key, es, en) in MESSAGES {
            messages.insert((Language::Es, *key), *es);
            messages.insert((Language::En, *key), *en);
        }
        Self { messages: Arc::new(messages) }
    }

    /// Retorna a própria chave quando não existe tradução.
    pub fn translate(&self, lang: Language, key: &str) -> String {
        self.messages
            .get(&(lang, key))
            .map(|m| m.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_both_languages() {
        let store = I18nStore::new();
        assert_eq!(store.translate(Language::Es, "required"), "Este campo es obligatorio.");
        assert_eq!(store.translate(Language::En, "required"), "This field is required.");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate(Language::En, "no_such_key"), "no_such_key");
    }
}
