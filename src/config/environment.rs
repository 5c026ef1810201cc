//! Configuración de variables de entorno
//!
//! Este módulo carga la configuración del gateway desde el entorno
//! (previamente poblado por `dotenvy`).

use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

use crate::models::SummarySource;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: tracing::Level,
    pub cors_origins: Vec<String>,
    // Backend de alquileres
    pub rental_api_url: String,
    pub rental_api_timeout_secs: u64,
    pub page_limit: u32,
    // Reglas de derivación
    pub recent_alerts_window: usize,
    pub due_soon_days: i64,
    pub overdue_escalation_days: i64,
    pub summary_source: SummarySource,
    /// Horas de ralentí diarias en un registro de uso que disparan alerta
    pub idle_hours_threshold: f64,
    /// "overdue return=high,maintenance due=medium"
    pub alert_severity_rules: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: tracing::Level::INFO,
            cors_origins: Vec::new(),
            rental_api_url: "http://localhost:8000".to_string(),
            rental_api_timeout_secs: 30,
            page_limit: 1000,
            recent_alerts_window: 5,
            due_soon_days: 7,
            overdue_escalation_days: 7,
            summary_source: SummarySource::Local,
            idle_hours_threshold: 10.0,
            alert_severity_rules: None,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno, con valores por defecto
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            log_level: parse_var("LOG_LEVEL", defaults.log_level)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| split_list(&origins))
                .unwrap_or(defaults.cors_origins),
            rental_api_url: env::var("RENTAL_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.rental_api_url),
            rental_api_timeout_secs: parse_var(
                "RENTAL_API_TIMEOUT_SECS",
                defaults.rental_api_timeout_secs,
            )?,
            page_limit: parse_var("PAGE_LIMIT", defaults.page_limit)?,
            recent_alerts_window: parse_var(
                "RECENT_ALERTS_WINDOW",
                defaults.recent_alerts_window,
            )?,
            due_soon_days: parse_var("DUE_SOON_DAYS", defaults.due_soon_days)?,
            overdue_escalation_days: parse_var(
                "OVERDUE_ESCALATION_DAYS",
                defaults.overdue_escalation_days,
            )?,
            summary_source: match env::var("SUMMARY_SOURCE") {
                Ok(value) => parse_summary_source(&value)?,
                Err(_) => defaults.summary_source,
            },
            idle_hours_threshold: parse_threshold(parse_var(
                "IDLE_HOURS_THRESHOLD",
                defaults.idle_hours_threshold,
            )?)?,
            alert_severity_rules: env::var("ALERT_SEVERITY_RULES")
                .ok()
                .filter(|rules| !rules.trim().is_empty()),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("{} must be a valid value, got '{}'", name, raw)),
        _ => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_threshold(hours: f64) -> Result<f64> {
    if hours.is_finite() && (0.0..=24.0).contains(&hours) {
        Ok(hours)
    } else {
        Err(anyhow!("IDLE_HOURS_THRESHOLD must be between 0 and 24, got {}", hours))
    }
}

fn parse_summary_source(value: &str) -> Result<SummarySource> {
    match value.trim().to_lowercase().as_str() {
        "local" | "" => Ok(SummarySource::Local),
        "upstream" => Ok(SummarySource::Upstream),
        other => Err(anyhow!("SUMMARY_SOURCE must be 'local' or 'upstream', got '{}'", other)),
    }
}
