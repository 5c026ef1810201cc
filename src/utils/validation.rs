//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validar y convertir los
//! valores que llegan sin tipar desde el backend de alquileres.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    // EQX1001, S001, OP101...
    static ref BUSINESS_ID_REGEX: Regex = Regex::new(r"^[A-Za-z]{1,5}[-_]?\d{1,8}$").unwrap();
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a datetime (RFC3339)
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Convertir cualquier marca de tiempo del backend a UTC.
///
/// Acepta RFC3339, datetime sin zona (se asume UTC, con o sin fracción
/// de segundo) y fechas simples `YYYY-MM-DD` (medianoche UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();

    if let Ok(dt) = validate_datetime(trimmed) {
        return Ok(dt);
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = validate_date(trimmed) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    let mut error = ValidationError::new("timestamp");
    error.add_param("value".into(), &value.to_string());
    error.add_param("format".into(), &"RFC3339, YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD".to_string());
    Err(error)
}

/// Variante opcional de `parse_timestamp`: vacío o ausente es `None`
pub fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_timestamp(v).map(Some),
    }
}

/// Convertir un importe flotante del backend a `Decimal` con 2 decimales
pub fn parse_money(value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        let mut error = ValidationError::new("money");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    let amount = Decimal::from_f64_retain(value).ok_or_else(|| {
        let mut error = ValidationError::new("money");
        error.add_param("value".into(), &value);
        error
    })?;
    validate_non_negative(amount)?;
    Ok(amount.round_dp(2))
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar identificadores de negocio (EQX1001, S001, OP101)
pub fn validate_business_id(value: &str) -> Result<(), ValidationError> {
    if !BUSINESS_ID_REGEX.is_match(value.trim()) {
        let mut error = ValidationError::new("business_id");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"letters followed by digits".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 7 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Normalizar un término de búsqueda: recortado y en minúsculas
pub fn normalize_search(value: &str) -> String {
    value.trim().to_lowercase()
}
