//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::cache::SnapshotCache;
use crate::clients::{HttpRentalApi, Page, RentalApi};
use crate::config::environment::EnvironmentConfig;
use crate::services::alert_classifier::ClassifierRules;
use crate::utils::clock::{Clock, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub api: Arc<dyn RentalApi>,
    pub clock: Arc<dyn Clock>,
    pub rules: Arc<ClassifierRules>,
    pub cache: SnapshotCache,
}

impl AppState {
    /// Estado con cliente HTTP real y reloj del sistema
    pub fn from_config(config: EnvironmentConfig) -> Result<Self> {
        let api = HttpRentalApi::from_config(&config)?;
        let rules = build_rules(&config)?;
        Ok(Self::new(config, Arc::new(api), Arc::new(SystemClock), rules))
    }

    pub fn new(
        config: EnvironmentConfig,
        api: Arc<dyn RentalApi>,
        clock: Arc<dyn Clock>,
        rules: ClassifierRules,
    ) -> Self {
        Self {
            config,
            api,
            clock,
            rules: Arc::new(rules),
            cache: SnapshotCache::new(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Página usada para traer colecciones completas
    pub fn page(&self) -> Page {
        Page::first(self.config.page_limit)
    }
}

/// Reglas del clasificador a partir de la configuración
pub fn build_rules(config: &EnvironmentConfig) -> Result<ClassifierRules> {
    let rules = match config.alert_severity_rules.as_deref() {
        Some(overrides) => ClassifierRules::with_overrides(overrides)?,
        None => ClassifierRules::default(),
    };
    Ok(rules.with_escalation_days(config.overdue_escalation_days))
}
