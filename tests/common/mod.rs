//! Backend simulado y utilidades para los tests de integración
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

use rental_tracker::clients::{Batch, Page, RentalApi};
use rental_tracker::config::EnvironmentConfig;
use rental_tracker::dto::{
    CreateEquipmentRequest, CreateOperatorRequest, CreateRentalRequest, CreateSiteRequest,
    CreateUsageLogRequest, RawDashboardSummary, UpdateEquipmentRequest, UpdateOperatorRequest,
    UpdateRentalRequest, UpdateSiteRequest,
};
use rental_tracker::models::{
    Alert, AlertDraft, Equipment, EquipmentStatus, Operator, Rental, RentalStatus, Resolution,
    Site, UsageLog, UsageScope,
};
use rental_tracker::routes::create_router;
use rental_tracker::services::alert_classifier::ClassifierRules;
use rental_tracker::services::rental_billing::compute_total_cost;
use rental_tracker::state::AppState;
use rental_tracker::utils::clock::FixedClock;
use rental_tracker::utils::errors::{not_found_error, AppError, AppResult};

/// 2025-06-15 12:00 UTC
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

pub fn equipment(
    id: i64,
    code: &str,
    kind: &str,
    status: &str,
    engine: f64,
    idle: f64,
) -> Equipment {
    Equipment {
        id,
        equipment_id: code.to_string(),
        equipment_type: kind.to_string(),
        model: None,
        manufacturer: None,
        year: None,
        serial_number: None,
        site_id: None,
        last_operator_id: None,
        status: EquipmentStatus::parse(status),
        last_maintenance: None,
        next_maintenance: None,
        engine_hours_per_day: engine,
        idle_hours_per_day: idle,
        created_at: day(2025, 1, 1),
        updated_at: day(2025, 1, 1),
    }
}

pub fn rental(
    id: i64,
    equipment_id: i64,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    status: RentalStatus,
    rate: Option<i64>,
) -> Rental {
    Rental {
        id,
        rental_ref: Rental::default_ref(id),
        equipment_id,
        site_id: None,
        operator_id: None,
        equipment_code: Some(format!("EQX{}", 1000 + equipment_id)),
        site_name: None,
        operator_name: None,
        start_date: start,
        end_date: end,
        check_in_date: None,
        status,
        daily_rate: rate.map(Decimal::from),
        total_cost: None,
        notes: None,
        created_at: start,
        updated_at: start,
    }
}

pub fn alert(id: i64, alert_type: &str, severity: &str, created_at: DateTime<Utc>) -> Alert {
    Alert {
        id,
        equipment_id: None,
        rental_id: None,
        alert_type: alert_type.to_string(),
        title: format!("{} #{}", alert_type, id),
        message: String::new(),
        severity_label: severity.to_string(),
        resolution: Resolution::Unresolved,
        created_at,
    }
}

pub fn usage_log(
    id: i64,
    rental_id: i64,
    equipment_id: i64,
    date: DateTime<Utc>,
    idle: f64,
) -> UsageLog {
    UsageLog {
        id,
        rental_id,
        equipment_id,
        operator_id: None,
        date,
        engine_hours: 4.0,
        idle_hours: idle,
        fuel_usage: 25.0,
        location_lat: None,
        location_lng: None,
        condition_rating: Some(8),
        maintenance_required: false,
        maintenance_notes: None,
        created_at: date,
    }
}

fn offline() -> AppError {
    AppError::Transport("connection refused".to_string())
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

/// Backend de alquileres en memoria con interruptor de caída
#[derive(Default)]
pub struct MockRentalApi {
    pub equipment: RwLock<Vec<Equipment>>,
    pub sites: RwLock<Vec<Site>>,
    pub operators: RwLock<Vec<Operator>>,
    pub rentals: RwLock<Vec<Rental>>,
    pub alerts: RwLock<Vec<Alert>>,
    pub usage_logs: RwLock<Vec<UsageLog>>,
    /// Resumen servido en `/dashboard/summary`; `None` responde como caído
    pub summary: RwLock<Option<RawDashboardSummary>>,
    offline: AtomicBool,
    skipped: AtomicUsize,
}

impl MockRentalApi {
    pub fn new(equipment: Vec<Equipment>, rentals: Vec<Rental>, alerts: Vec<Alert>) -> Self {
        Self {
            equipment: RwLock::new(equipment),
            rentals: RwLock::new(rentals),
            alerts: RwLock::new(alerts),
            ..Default::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Elementos inválidos que reporta cada listado
    pub fn set_skipped(&self, skipped: usize) {
        self.skipped.store(skipped, Ordering::SeqCst);
    }

    fn batch<T>(&self, items: Vec<T>) -> Batch<T> {
        Batch {
            items,
            skipped: self.skipped.load(Ordering::SeqCst),
        }
    }

    fn check(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(offline())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RentalApi for MockRentalApi {
    async fn list_equipment(&self, _page: Page) -> AppResult<Batch<Equipment>> {
        self.check()?;
        Ok(self.batch(self.equipment.read().await.clone()))
    }

    async fn get_equipment(&self, id: i64) -> AppResult<Equipment> {
        self.check()?;
        self.equipment
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Equipment", id))
    }

    async fn create_equipment(&self, request: &CreateEquipmentRequest) -> AppResult<Equipment> {
        self.check()?;
        let mut items = self.equipment.write().await;
        let mut created = equipment(
            next_id(items.iter().map(|e| e.id)),
            &request.equipment_id,
            &request.equipment_type,
            request.status.as_str(),
            request.engine_hours_per_day,
            request.idle_hours_per_day,
        );
        created.model = request.model.clone();
        created.site_id = request.site_id.clone();
        items.push(created.clone());
        Ok(created)
    }

    async fn update_equipment(
        &self,
        id: i64,
        request: &UpdateEquipmentRequest,
    ) -> AppResult<Equipment> {
        self.check()?;
        let mut items = self.equipment.write().await;
        let item = items
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found_error("Equipment", id))?;
        if let Some(status) = &request.status {
            item.status = status.clone();
        }
        if let Some(model) = &request.model {
            item.model = Some(model.clone());
        }
        if let Some(engine) = request.engine_hours_per_day {
            item.engine_hours_per_day = engine;
        }
        if let Some(idle) = request.idle_hours_per_day {
            item.idle_hours_per_day = idle;
        }
        Ok(item.clone())
    }

    async fn list_sites(&self, _page: Page) -> AppResult<Batch<Site>> {
        self.check()?;
        Ok(self.batch(self.sites.read().await.clone()))
    }

    async fn get_site(&self, id: i64) -> AppResult<Site> {
        self.check()?;
        self.sites
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Site", id))
    }

    async fn create_site(&self, request: &CreateSiteRequest) -> AppResult<Site> {
        self.check()?;
        let mut items = self.sites.write().await;
        let site = Site {
            id: next_id(items.iter().map(|s| s.id)),
            site_id: request.site_id.clone(),
            name: request.name.clone(),
            location: request.location.clone(),
            address: request.address.clone(),
            contact_person: request.contact_person.clone(),
            contact_phone: request.contact_phone.clone(),
            created_at: now(),
        };
        items.push(site.clone());
        Ok(site)
    }

    async fn update_site(&self, id: i64, request: &UpdateSiteRequest) -> AppResult<Site> {
        self.check()?;
        let mut items = self.sites.write().await;
        let site = items
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found_error("Site", id))?;
        if let Some(name) = &request.name {
            site.name = name.clone();
        }
        if let Some(location) = &request.location {
            site.location = Some(location.clone());
        }
        Ok(site.clone())
    }

    async fn list_operators(&self, _page: Page) -> AppResult<Batch<Operator>> {
        self.check()?;
        Ok(self.batch(self.operators.read().await.clone()))
    }

    async fn get_operator(&self, id: i64) -> AppResult<Operator> {
        self.check()?;
        self.operators
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Operator", id))
    }

    async fn create_operator(&self, request: &CreateOperatorRequest) -> AppResult<Operator> {
        self.check()?;
        let mut items = self.operators.write().await;
        let operator = Operator {
            id: next_id(items.iter().map(|o| o.id)),
            operator_id: request.operator_id.clone(),
            name: request.name.clone(),
            license_number: request.license_number.clone(),
            phone: request.phone.clone(),
            email: request.email.clone(),
            certification_level: request.certification_level.clone(),
            created_at: now(),
        };
        items.push(operator.clone());
        Ok(operator)
    }

    async fn update_operator(
        &self,
        id: i64,
        request: &UpdateOperatorRequest,
    ) -> AppResult<Operator> {
        self.check()?;
        let mut items = self.operators.write().await;
        let operator = items
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| not_found_error("Operator", id))?;
        if let Some(name) = &request.name {
            operator.name = name.clone();
        }
        if let Some(phone) = &request.phone {
            operator.phone = Some(phone.clone());
        }
        Ok(operator.clone())
    }

    async fn list_rentals(
        &self,
        _page: Page,
        status: Option<RentalStatus>,
    ) -> AppResult<Batch<Rental>> {
        self.check()?;
        let items = self
            .rentals
            .read()
            .await
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        Ok(self.batch(items))
    }

    async fn get_rental(&self, id: i64) -> AppResult<Rental> {
        self.check()?;
        self.rentals
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Rental", id))
    }

    async fn create_rental(&self, request: &CreateRentalRequest) -> AppResult<Rental> {
        self.check()?;
        let mut items = self.rentals.write().await;
        let mut created = rental(
            next_id(items.iter().map(|r| r.id)),
            request.equipment_id,
            request.check_out_date,
            request.expected_return_date,
            RentalStatus::Active,
            None,
        );
        created.daily_rate = request.rental_rate_per_day.and_then(Decimal::from_f64);
        created.site_id = request.site_id;
        created.operator_id = request.operator_id;
        items.push(created.clone());
        Ok(created)
    }

    async fn update_rental(&self, id: i64, request: &UpdateRentalRequest) -> AppResult<Rental> {
        self.check()?;
        let mut items = self.rentals.write().await;
        let item = items
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found_error("Rental", id))?;
        if let Some(end) = request.expected_return_date {
            item.end_date = Some(end);
        }
        if let Some(status) = request.status {
            item.status = status;
        }
        if let Some(check_in) = request.check_in_date {
            item.check_in_date = Some(check_in);
        }
        if let Some(notes) = &request.notes {
            item.notes = Some(notes.clone());
        }
        if let Some(rate) = request.rental_rate_per_day {
            item.daily_rate = Decimal::from_f64(rate);
        }
        Ok(item.clone())
    }

    async fn check_in_rental(&self, id: i64) -> AppResult<Rental> {
        self.check()?;
        let mut items = self.rentals.write().await;
        let item = items
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found_error("Rental", id))?;
        item.status = RentalStatus::Completed;
        item.check_in_date = Some(now());
        item.total_cost = compute_total_cost(item, now());
        Ok(item.clone())
    }

    async fn list_usage_logs(&self, scope: UsageScope) -> AppResult<Batch<UsageLog>> {
        self.check()?;
        let items = self
            .usage_logs
            .read()
            .await
            .iter()
            .filter(|log| match scope {
                UsageScope::Rental(id) => log.rental_id == id,
                UsageScope::Equipment(id) => log.equipment_id == id,
            })
            .cloned()
            .collect();
        Ok(self.batch(items))
    }

    async fn create_usage_log(&self, request: &CreateUsageLogRequest) -> AppResult<UsageLog> {
        self.check()?;
        let mut items = self.usage_logs.write().await;
        let mut created = usage_log(
            next_id(items.iter().map(|l| l.id)),
            request.rental_id,
            request.equipment_id,
            request.date,
            request.idle_hours,
        );
        created.engine_hours = request.engine_hours;
        created.fuel_usage = request.fuel_usage;
        created.condition_rating = request.condition_rating;
        created.created_at = now();
        items.push(created.clone());
        Ok(created)
    }

    async fn list_alerts(&self, _page: Page, resolved: Option<bool>) -> AppResult<Batch<Alert>> {
        self.check()?;
        let items = self
            .alerts
            .read()
            .await
            .iter()
            .filter(|a| {
                let closed = matches!(a.resolution, Resolution::Resolved { .. });
                resolved.map_or(true, |r| closed == r)
            })
            .cloned()
            .collect();
        Ok(self.batch(items))
    }

    async fn get_alert(&self, id: i64) -> AppResult<Alert> {
        self.check()?;
        self.alerts
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| not_found_error("Alert", id))
    }

    async fn create_alert(&self, draft: &AlertDraft) -> AppResult<Alert> {
        self.check()?;
        let mut items = self.alerts.write().await;
        let created = Alert {
            id: next_id(items.iter().map(|a| a.id)),
            equipment_id: draft.equipment_id,
            rental_id: draft.rental_id,
            alert_type: draft.category.canonical_type().to_string(),
            title: draft.title.clone(),
            message: draft.message.clone(),
            severity_label: draft.severity.as_str().to_string(),
            resolution: Resolution::Unresolved,
            created_at: now(),
        };
        items.push(created.clone());
        Ok(created)
    }

    async fn resolve_alert(&self, id: i64, resolved_by: &str) -> AppResult<()> {
        self.check()?;
        let mut items = self.alerts.write().await;
        let item = items
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found_error("Alert", id))?;
        item.resolution = Resolution::Resolved {
            by: resolved_by.to_string(),
            at: now(),
        };
        Ok(())
    }

    async fn fetch_dashboard_summary(&self) -> AppResult<RawDashboardSummary> {
        self.check()?;
        self.summary
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Transport("summary endpoint not served".to_string()))
    }
}

pub fn test_state(api: Arc<MockRentalApi>, config: EnvironmentConfig) -> AppState {
    AppState::new(config, api, Arc::new(FixedClock(now())), ClassifierRules::default())
}

pub fn test_app(api: Arc<MockRentalApi>) -> Router {
    create_router(test_state(api, EnvironmentConfig::default()))
}

/// Envía una petición al router y devuelve estado y cuerpo JSON
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}
