use chrono::{DateTime, Utc};
use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

// Listado con marca de datos obsoletos
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    /// `true` cuando el backend falló y se sirve el último snapshot conocido
    pub stale: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Elementos del backend omitidos por payload inválido
    pub skipped: usize,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, stale: bool, fetched_at: Option<DateTime<Utc>>) -> Self {
        Self {
            total: items.len(),
            items,
            stale,
            fetched_at,
            skipped: 0,
        }
    }

    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }
}

// Health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub backend_url: String,
    pub timestamp: DateTime<Utc>,
}
