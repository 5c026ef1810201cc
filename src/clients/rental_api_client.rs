//! Cliente HTTP para el backend de alquileres
//!
//! Contrato `RentalApi` consumido por los controladores y su implementación
//! sobre `reqwest`. Cada payload pasa por la frontera de parseo antes de
//! salir de este módulo.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EnvironmentConfig;
use crate::dto::{
    CreateAlertRequest, CreateEquipmentRequest, CreateOperatorRequest, CreateRentalRequest,
    CreateSiteRequest, CreateUsageLogRequest, RawAlert, RawDashboardSummary, RawEquipment,
    RawOperator, RawRental, RawSite, RawUsageLog, UpdateEquipmentRequest, UpdateOperatorRequest,
    UpdateRentalRequest, UpdateSiteRequest,
};
use crate::models::{
    Alert, AlertDraft, Equipment, Operator, Rental, RentalStatus, Site, UsageLog, UsageScope,
};
use crate::utils::errors::{validation_error, AppError, AppResult};

/// Paginación skip/limit del backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub fn first(limit: u32) -> Self {
        Self { skip: 0, limit }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("skip", self.skip.to_string()), ("limit", self.limit.to_string())]
    }
}

/// Listado parseado: los elementos que no pasan la frontera se descartan
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

impl<T> From<Vec<T>> for Batch<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items, skipped: 0 }
    }
}

/// Operaciones del backend REST
#[async_trait]
pub trait RentalApi: Send + Sync {
    async fn list_equipment(&self, page: Page) -> AppResult<Batch<Equipment>>;
    async fn get_equipment(&self, id: i64) -> AppResult<Equipment>;
    async fn create_equipment(&self, request: &CreateEquipmentRequest) -> AppResult<Equipment>;
    async fn update_equipment(
        &self,
        id: i64,
        request: &UpdateEquipmentRequest,
    ) -> AppResult<Equipment>;

    async fn list_sites(&self, page: Page) -> AppResult<Batch<Site>>;
    async fn get_site(&self, id: i64) -> AppResult<Site>;
    async fn create_site(&self, request: &CreateSiteRequest) -> AppResult<Site>;
    async fn update_site(&self, id: i64, request: &UpdateSiteRequest) -> AppResult<Site>;

    async fn list_operators(&self, page: Page) -> AppResult<Batch<Operator>>;
    async fn get_operator(&self, id: i64) -> AppResult<Operator>;
    async fn create_operator(&self, request: &CreateOperatorRequest) -> AppResult<Operator>;
    async fn update_operator(
        &self,
        id: i64,
        request: &UpdateOperatorRequest,
    ) -> AppResult<Operator>;

    async fn list_rentals(
        &self,
        page: Page,
        status: Option<RentalStatus>,
    ) -> AppResult<Batch<Rental>>;
    async fn get_rental(&self, id: i64) -> AppResult<Rental>;
    async fn create_rental(&self, request: &CreateRentalRequest) -> AppResult<Rental>;
    async fn update_rental(&self, id: i64, request: &UpdateRentalRequest) -> AppResult<Rental>;
    /// Cierra el alquiler vía el endpoint dedicado de check-in
    async fn check_in_rental(&self, id: i64) -> AppResult<Rental>;

    async fn list_usage_logs(&self, scope: UsageScope) -> AppResult<Batch<UsageLog>>;
    async fn create_usage_log(&self, request: &CreateUsageLogRequest) -> AppResult<UsageLog>;

    async fn list_alerts(&self, page: Page, resolved: Option<bool>) -> AppResult<Batch<Alert>>;
    async fn get_alert(&self, id: i64) -> AppResult<Alert>;
    async fn create_alert(&self, draft: &AlertDraft) -> AppResult<Alert>;
    async fn resolve_alert(&self, id: i64, resolved_by: &str) -> AppResult<()>;

    async fn fetch_dashboard_summary(&self) -> AppResult<RawDashboardSummary>;
}

/// Parsea cada elemento por separado; uno inválido no tumba el listado
fn parse_batch<R, M>(resource: &str, values: Vec<Value>) -> Batch<M>
where
    R: DeserializeOwned,
    M: TryFrom<R, Error = AppError>,
{
    let mut items = Vec::with_capacity(values.len());
    let mut skipped = 0;

    for value in values {
        let parsed = serde_json::from_value::<R>(value)
            .map_err(|e| validation_error("payload", &e.to_string()))
            .and_then(M::try_from);
        match parsed {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!("⚠️ Elemento de {} descartado: {}", resource, e);
                skipped += 1;
            }
        }
    }

    Batch { items, skipped }
}

/// Implementación HTTP de `RentalApi`
pub struct HttpRentalApi {
    client: Client,
    base_url: String,
}

impl HttpRentalApi {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &EnvironmentConfig) -> AppResult<Self> {
        Self::new(
            &config.rental_api_url,
            Duration::from_secs(config.rental_api_timeout_secs),
        )
    }

    async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> AppResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("➡️ {} {}", method, url);

        let mut builder = self.client.request(method.clone(), &url).query(query);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("⚠️ Backend no disponible en {} {}: {}", method, path, e);
            AppError::from(e)
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("{} not found", path)));
        }
        if !status.is_success() {
            warn!("⚠️ {} {} respondió {}", method, path, status);
            let message = format!("{} {} returned {}", method, path, status);
            return Err(AppError::Transport(message));
        }

        response.json::<R>().await.map_err(|e| {
            if e.is_decode() {
                validation_error("payload", &e.to_string())
            } else {
                AppError::from(e)
            }
        })
    }

    async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> AppResult<R> {
        self.request::<(), R>(Method::GET, path, query, None).await
    }

    /// El cuerpo debe ser un array; sus elementos se parsean uno a uno
    async fn list<R, M>(&self, path: &str, query: &[(&'static str, String)]) -> AppResult<Batch<M>>
    where
        R: DeserializeOwned,
        M: TryFrom<R, Error = AppError>,
    {
        let values = self.get::<Vec<Value>>(path, query).await?;
        Ok(parse_batch::<R, M>(path, values))
    }

    async fn send<B, R>(&self, method: Method, path: &str, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        self.request(method, path, &[], Some(body)).await
    }
}

#[async_trait]
impl RentalApi for HttpRentalApi {
    async fn list_equipment(&self, page: Page) -> AppResult<Batch<Equipment>> {
        self.list::<RawEquipment, _>("/equipment/", &page.query()).await
    }

    async fn get_equipment(&self, id: i64) -> AppResult<Equipment> {
        Equipment::try_from(self.get::<RawEquipment>(&format!("/equipment/{}", id), &[]).await?)
    }

    async fn create_equipment(&self, request: &CreateEquipmentRequest) -> AppResult<Equipment> {
        let raw = self.send::<_, RawEquipment>(Method::POST, "/equipment/", request).await?;
        Equipment::try_from(raw)
    }

    async fn update_equipment(
        &self,
        id: i64,
        request: &UpdateEquipmentRequest,
    ) -> AppResult<Equipment> {
        let path = format!("/equipment/{}", id);
        Equipment::try_from(self.send::<_, RawEquipment>(Method::PUT, &path, request).await?)
    }

    async fn list_sites(&self, page: Page) -> AppResult<Batch<Site>> {
        self.list::<RawSite, _>("/sites/", &page.query()).await
    }

    async fn get_site(&self, id: i64) -> AppResult<Site> {
        Site::try_from(self.get::<RawSite>(&format!("/sites/{}", id), &[]).await?)
    }

    async fn create_site(&self, request: &CreateSiteRequest) -> AppResult<Site> {
        Site::try_from(self.send::<_, RawSite>(Method::POST, "/sites/", request).await?)
    }

    async fn update_site(&self, id: i64, request: &UpdateSiteRequest) -> AppResult<Site> {
        let path = format!("/sites/{}", id);
        Site::try_from(self.send::<_, RawSite>(Method::PUT, &path, request).await?)
    }

    async fn list_operators(&self, page: Page) -> AppResult<Batch<Operator>> {
        self.list::<RawOperator, _>("/operators/", &page.query()).await
    }

    async fn get_operator(&self, id: i64) -> AppResult<Operator> {
        Operator::try_from(self.get::<RawOperator>(&format!("/operators/{}", id), &[]).await?)
    }

    async fn create_operator(&self, request: &CreateOperatorRequest) -> AppResult<Operator> {
        let raw = self.send::<_, RawOperator>(Method::POST, "/operators/", request).await?;
        Operator::try_from(raw)
    }

    async fn update_operator(
        &self,
        id: i64,
        request: &UpdateOperatorRequest,
    ) -> AppResult<Operator> {
        let path = format!("/operators/{}", id);
        Operator::try_from(self.send::<_, RawOperator>(Method::PUT, &path, request).await?)
    }

    async fn list_rentals(
        &self,
        page: Page,
        status: Option<RentalStatus>,
    ) -> AppResult<Batch<Rental>> {
        let mut query = page.query();
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        self.list::<RawRental, _>("/rentals/", &query).await
    }

    async fn get_rental(&self, id: i64) -> AppResult<Rental> {
        Rental::try_from(self.get::<RawRental>(&format!("/rentals/{}", id), &[]).await?)
    }

    async fn create_rental(&self, request: &CreateRentalRequest) -> AppResult<Rental> {
        Rental::try_from(self.send::<_, RawRental>(Method::POST, "/rentals/", request).await?)
    }

    async fn update_rental(&self, id: i64, request: &UpdateRentalRequest) -> AppResult<Rental> {
        let path = format!("/rentals/{}", id);
        Rental::try_from(self.send::<_, RawRental>(Method::PUT, &path, request).await?)
    }

    async fn check_in_rental(&self, id: i64) -> AppResult<Rental> {
        let path = format!("/rentals/{}/checkin", id);
        Rental::try_from(self.request::<(), RawRental>(Method::POST, &path, &[], None).await?)
    }

    async fn list_usage_logs(&self, scope: UsageScope) -> AppResult<Batch<UsageLog>> {
        let path = match scope {
            UsageScope::Rental(id) => format!("/usage-logs/rental/{}", id),
            UsageScope::Equipment(id) => format!("/usage-logs/equipment/{}", id),
        };
        self.list::<RawUsageLog, _>(&path, &[]).await
    }

    async fn create_usage_log(&self, request: &CreateUsageLogRequest) -> AppResult<UsageLog> {
        let raw = self.send::<_, RawUsageLog>(Method::POST, "/usage-logs/", request).await?;
        UsageLog::try_from(raw)
    }

    async fn list_alerts(&self, page: Page, resolved: Option<bool>) -> AppResult<Batch<Alert>> {
        let mut query = page.query();
        if let Some(resolved) = resolved {
            query.push(("is_resolved", resolved.to_string()));
        }
        self.list::<RawAlert, _>("/alerts/", &query).await
    }

    async fn get_alert(&self, id: i64) -> AppResult<Alert> {
        Alert::try_from(self.get::<RawAlert>(&format!("/alerts/{}", id), &[]).await?)
    }

    async fn create_alert(&self, draft: &AlertDraft) -> AppResult<Alert> {
        let request = CreateAlertRequest::from(draft);
        Alert::try_from(self.send::<_, RawAlert>(Method::POST, "/alerts/", &request).await?)
    }

    async fn resolve_alert(&self, id: i64, resolved_by: &str) -> AppResult<()> {
        let path = format!("/alerts/{}/resolve", id);
        let query = [("resolved_by", resolved_by.to_string())];
        // el backend solo devuelve un mensaje de confirmación
        self.request::<(), serde_json::Value>(Method::PUT, &path, &query, None)
            .await
            .map(|_| ())
    }

    async fn fetch_dashboard_summary(&self) -> AppResult<RawDashboardSummary> {
        self.get("/dashboard/summary", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_query() {
        let page = Page { skip: 20, limit: 10 };
        assert_eq!(
            page.query(),
            vec![("skip", "20".to_string()), ("limit", "10".to_string())]
        );
        assert_eq!(Page::first(1000).skip, 0);
    }

    #[test]
    fn test_parse_batch_skips_invalid_items() {
        let values = vec![
            json!({"id": 1, "site_id": "S001", "name": "North", "created_at": "2024-01-01"}),
            json!({"id": 2, "site_id": "S002", "name": "", "created_at": "2024-01-01"}),
            json!({"id": "three"}),
        ];
        let batch = parse_batch::<RawSite, Site>("/sites/", values);
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].site_id, "S001");
        assert_eq!(batch.skipped, 2);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let api = HttpRentalApi::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url, "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_failure() {
        let api = HttpRentalApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.list_equipment(Page::first(10)).await.unwrap_err();
        assert!(err.is_transport());
    }
}
