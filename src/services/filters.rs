//! Filtros de listados
//!
//! Cada filtro se descompone en criterios independientes que se combinan
//! con AND, así que el orden de aplicación no cambia el resultado.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{Alert, Equipment, EquipmentStatus, Rental, RentalStatus, Severity};
use crate::services::alert_classifier::{effective_severity, ClassifierRules};
use crate::services::status_resolver::{is_alert_active, resolve_rental_status};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::normalize_search;

/// Un criterio sobre elementos de tipo `T`
pub trait Criterion<T> {
    fn matches(&self, item: &T) -> bool;
}

/// Aplica todos los criterios (AND) preservando el orden de entrada
pub fn apply_all<'a, T, C: Criterion<T>>(items: &'a [T], criteria: &[C]) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| criteria.iter().all(|c| c.matches(item)))
        .collect()
}

/// Búsqueda por subcadena sin mayúsculas sobre campos recortados.
/// Un término vacío coincide con todo.
pub fn search_matches(fields: &[Option<&str>], term: &str) -> bool {
    let term = normalize_search(term);
    if term.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| normalize_search(field).contains(&term))
}

fn is_wildcard(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

// --- Equipment ---

#[derive(Debug, Clone, PartialEq)]
pub enum EquipmentCriterion {
    Search(String),
    Status(EquipmentStatus),
}

impl Criterion<Equipment> for EquipmentCriterion {
    fn matches(&self, item: &Equipment) -> bool {
        match self {
            EquipmentCriterion::Search(term) => search_matches(
                &[
                    Some(item.equipment_id.as_str()),
                    Some(item.equipment_type.as_str()),
                    item.model.as_deref(),
                    item.manufacturer.as_deref(),
                    item.site_id.as_deref(),
                ],
                term,
            ),
            EquipmentCriterion::Status(status) => &item.status == status,
        }
    }
}

/// Filtros para búsqueda de equipos
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EquipmentFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl EquipmentFilter {
    pub const FIELDS: &'static [&'static str] = &["search", "status"];

    pub fn criteria(&self) -> Vec<EquipmentCriterion> {
        let mut criteria = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            criteria.push(EquipmentCriterion::Search(search.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !is_wildcard(s)) {
            criteria.push(EquipmentCriterion::Status(EquipmentStatus::parse(status)));
        }
        criteria
    }

    pub fn apply<'a>(&self, items: &'a [Equipment]) -> Vec<&'a Equipment> {
        apply_all(items, &self.criteria())
    }
}

// --- Rentals ---

#[derive(Debug, Clone, PartialEq)]
pub enum RentalCriterion {
    Search(String),
    /// Compara contra el estado visible en `now`
    Status { status: RentalStatus, now: DateTime<Utc> },
}

impl Criterion<Rental> for RentalCriterion {
    fn matches(&self, item: &Rental) -> bool {
        match self {
            RentalCriterion::Search(term) => search_matches(
                &[
                    Some(item.rental_ref.as_str()),
                    item.equipment_code.as_deref(),
                    item.site_name.as_deref(),
                    item.operator_name.as_deref(),
                    item.notes.as_deref(),
                ],
                term,
            ),
            RentalCriterion::Status { status, now } => resolve_rental_status(item, *now) == *status,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RentalFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl RentalFilter {
    pub const FIELDS: &'static [&'static str] = &["search", "status"];

    pub fn criteria(&self, now: DateTime<Utc>) -> AppResult<Vec<RentalCriterion>> {
        let mut criteria = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            criteria.push(RentalCriterion::Search(search.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !is_wildcard(s)) {
            let status = status
                .parse::<RentalStatus>()
                .map_err(|e| validation_error("status", &e))?;
            criteria.push(RentalCriterion::Status { status, now });
        }
        Ok(criteria)
    }

    pub fn apply<'a>(&self, items: &'a [Rental], now: DateTime<Utc>) -> AppResult<Vec<&'a Rental>> {
        Ok(apply_all(items, &self.criteria(now)?))
    }
}

// --- Alerts ---

#[derive(Debug, Clone)]
pub enum AlertCriterion<'r> {
    Search(String),
    Severity { level: Severity, rules: &'r ClassifierRules },
    Resolved(bool),
}

impl Criterion<Alert> for AlertCriterion<'_> {
    fn matches(&self, item: &Alert) -> bool {
        match self {
            AlertCriterion::Search(term) => search_matches(
                &[
                    Some(item.title.as_str()),
                    Some(item.message.as_str()),
                    Some(item.alert_type.as_str()),
                ],
                term,
            ),
            AlertCriterion::Severity { level, rules } => effective_severity(item, rules) == *level,
            AlertCriterion::Resolved(resolved) => is_alert_active(item) != *resolved,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertFilter {
    pub search: Option<String>,
    pub severity: Option<String>,
    pub resolved: Option<bool>,
}

impl AlertFilter {
    pub const FIELDS: &'static [&'static str] = &["search", "severity", "resolved"];

    pub fn criteria<'r>(&self, rules: &'r ClassifierRules) -> AppResult<Vec<AlertCriterion<'r>>> {
        let mut criteria = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            criteria.push(AlertCriterion::Search(search.to_string()));
        }
        if let Some(severity) = self.severity.as_deref().filter(|s| !is_wildcard(s)) {
            let level = severity
                .parse::<Severity>()
                .map_err(|e| validation_error("severity", &e))?;
            criteria.push(AlertCriterion::Severity { level, rules });
        }
        if let Some(resolved) = self.resolved {
            criteria.push(AlertCriterion::Resolved(resolved));
        }
        Ok(criteria)
    }

    pub fn apply<'a>(
        &self,
        items: &'a [Alert],
        rules: &ClassifierRules,
    ) -> AppResult<Vec<&'a Alert>> {
        Ok(apply_all(items, &self.criteria(rules)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn query_for(fields: &[&str]) -> Uri {
        let pairs: Vec<String> = fields.iter().map(|f| format!("{}=true", f)).collect();
        format!("http://localhost/?{}", pairs.join("&")).parse().unwrap()
    }

    #[test]
    fn test_declared_fields_match_accepted_query() {
        let equipment = query_for(EquipmentFilter::FIELDS);
        assert!(Query::<EquipmentFilter>::try_from_uri(&equipment).is_ok());
        assert!(Query::<RentalFilter>::try_from_uri(&query_for(RentalFilter::FIELDS)).is_ok());
        assert!(Query::<AlertFilter>::try_from_uri(&query_for(AlertFilter::FIELDS)).is_ok());

        assert!(Query::<EquipmentFilter>::try_from_uri(&query_for(&["type"])).is_err());
        assert!(Query::<RentalFilter>::try_from_uri(&query_for(&["overdue"])).is_err());
        assert!(Query::<AlertFilter>::try_from_uri(&query_for(&["status"])).is_err());
    }

    #[test]
    fn test_search_matches() {
        assert!(search_matches(&[Some("  eqx1027 ")], "EQX1027"));
        assert!(search_matches(&[Some("Excavator")], "cava"));
        assert!(search_matches(&[None, Some("Crane")], "   "));
        assert!(search_matches(&[], ""));
        assert!(!search_matches(&[None, Some("Crane")], "dozer"));
    }

    #[test]
    fn test_wildcards() {
        let filter = EquipmentFilter {
            search: Some("  ".to_string()),
            status: Some("All".to_string()),
        };
        assert!(filter.criteria().is_empty());
    }

    #[test]
    fn test_invalid_rental_status_is_validation_error() {
        let filter = RentalFilter {
            search: None,
            status: Some("paused".to_string()),
        };
        assert!(filter.criteria(Utc::now()).is_err());
    }
}
