//! Sistema de manejo de errores
//!
//! Este módulo define la taxonomía de errores del tracker y su conversión
//! a respuestas HTTP. Las funciones de derivación del núcleo son totales;
//! solo la frontera de parseo y el cliente externo producen estos errores.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.to_string())
    }
}

impl AppError {
    /// Código estable para el cuerpo JSON
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidOperation(_) => "INVALID_OPERATION",
            AppError::Transport(_) => "TRANSPORT_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code,
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code,
                    },
                )
            }

            AppError::InvalidOperation(msg) => {
                warn!("Invalid operation: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Invalid Operation".to_string(),
                        message: msg,
                        details: None,
                        code,
                    },
                )
            }

            AppError::Transport(msg) => {
                error!("Transport failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "Transport Failure".to_string(),
                        message: "The rental backend could not be reached".to_string(),
                        details: Some(json!({ "transport_error": msg })),
                        code,
                    },
                )
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code,
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("field".into(), &field);
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Convierte un `ValidationError` suelto en un error de campo
pub fn field_error(field: &'static str, error: validator::ValidationError) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);
    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de operación inválida
pub fn invalid_operation_error(operation: &str, reason: &str) -> AppError {
    AppError::InvalidOperation(format!("Cannot {}: {}", operation, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (validation_error("name", "required"), StatusCode::BAD_REQUEST),
            (not_found_error("Alert", 7), StatusCode::NOT_FOUND),
            (invalid_operation_error("resolve alert", "already resolved"), StatusCode::CONFLICT),
            (AppError::Transport("timeout".to_string()), StatusCode::BAD_GATEWAY),
            (AppError::Internal("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_not_found_message() {
        let error = not_found_error("Rental", 42);
        assert_eq!(error.to_string(), "Not found: Rental with id '42' not found");
        assert_eq!(error.code(), "NOT_FOUND");
    }

    #[test]
    fn test_validation_error_carries_field() {
        match validation_error("resolved_by", "must not be empty") {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("resolved_by"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
