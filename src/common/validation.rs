// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// Validadores customizados usados pelos payloads.
// A mensagem é a chave de tradução do I18nStore.

fn coded(code: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(code.into());
    err
}

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        return Err(coded("negative_value"));
    }
    Ok(())
}

pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        return Err(coded("required"));
    }
    Ok(())
}

/// Slugs de URL: minúsculas, dígitos e hífens, sem hífen nas pontas.
pub fn validate_slug(val: &str) -> Result<(), ValidationError> {
    if val.is_empty() {
        return Err(coded("required"));
    }
    let valid_chars = val
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || val.starts_with('-') || val.ends_with('-') {
        return Err(coded("invalid_slug"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(validate_slug("galapagos-8-dias").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Galapagos").is_err());
        assert!(validate_slug("islas galapagos").is_err());
        assert!(validate_slug("-cusco").is_err());
        assert!(validate_slug("cañon").is_err());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("Ana").is_ok());
    }

    #[test]
    fn negative_decimals_are_rejected() {
        assert!(validate_not_negative(&Decimal::new(-1, 2)).is_err());
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::new(19999, 2)).is_ok());
    }
}
