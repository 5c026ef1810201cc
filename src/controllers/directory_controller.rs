use tracing::info;
use validator::Validate;

use crate::controllers::{fetch_one_or_cached, fetch_or_cached};
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::directory_dto::{
    CreateOperatorRequest, CreateSiteRequest, UpdateOperatorRequest, UpdateSiteRequest,
};
use crate::models::{Operator, Site};
use crate::services::filters::search_matches;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Obras y operadores: solo alta, consulta y actualización
pub struct DirectoryController {
    state: AppState,
}

impl DirectoryController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn list_sites(&self, search: Option<String>) -> AppResult<ListResponse<Site>> {
        let now = self.state.now();
        let request = self.state.api.list_sites(self.state.page());
        let fetched = fetch_or_cached(&self.state.cache.sites, now, request).await?;

        let term = search.unwrap_or_default();
        let items: Vec<Site> = fetched
            .items
            .iter()
            .filter(|site| {
                search_matches(
                    &[
                        Some(site.site_id.as_str()),
                        Some(site.name.as_str()),
                        site.location.as_deref(),
                    ],
                    &term,
                )
            })
            .cloned()
            .collect();

        Ok(fetched.respond_with(items))
    }

    pub async fn get_site(&self, id: i64) -> AppResult<Site> {
        fetch_one_or_cached(&self.state.cache.sites, id, self.state.api.get_site(id)).await
    }

    pub async fn create_site(&self, request: CreateSiteRequest) -> AppResult<ApiResponse<Site>> {
        request.validate().map_err(AppError::Validation)?;

        let site = self.state.api.create_site(&request).await?;
        self.state.cache.sites.upsert(site.clone()).await;
        info!("✅ Obra {} creada", site.site_id);

        Ok(ApiResponse::success_with_message(site, "Site created successfully".to_string()))
    }

    pub async fn update_site(
        &self,
        id: i64,
        request: UpdateSiteRequest,
    ) -> AppResult<ApiResponse<Site>> {
        request.validate().map_err(AppError::Validation)?;

        let site = self.state.api.update_site(id, &request).await?;
        self.state.cache.sites.upsert(site.clone()).await;

        Ok(ApiResponse::success_with_message(site, "Site updated successfully".to_string()))
    }

    pub async fn list_operators(
        &self,
        search: Option<String>,
    ) -> AppResult<ListResponse<Operator>> {
        let now = self.state.now();
        let fetched = fetch_or_cached(
            &self.state.cache.operators,
            now,
            self.state.api.list_operators(self.state.page()),
        )
        .await?;

        let term = search.unwrap_or_default();
        let items: Vec<Operator> = fetched
            .items
            .iter()
            .filter(|operator| {
                search_matches(
                    &[
                        Some(operator.operator_id.as_str()),
                        Some(operator.name.as_str()),
                        operator.license_number.as_deref(),
                    ],
                    &term,
                )
            })
            .cloned()
            .collect();

        Ok(fetched.respond_with(items))
    }

    pub async fn get_operator(&self, id: i64) -> AppResult<Operator> {
        fetch_one_or_cached(&self.state.cache.operators, id, self.state.api.get_operator(id)).await
    }

    pub async fn create_operator(
        &self,
        request: CreateOperatorRequest,
    ) -> AppResult<ApiResponse<Operator>> {
        request.validate().map_err(AppError::Validation)?;

        let operator = self.state.api.create_operator(&request).await?;
        self.state.cache.operators.upsert(operator.clone()).await;
        info!("✅ Operador {} creado", operator.operator_id);

        Ok(ApiResponse::success_with_message(
            operator,
            "Operator created successfully".to_string(),
        ))
    }

    pub async fn update_operator(
        &self,
        id: i64,
        request: UpdateOperatorRequest,
    ) -> AppResult<ApiResponse<Operator>> {
        request.validate().map_err(AppError::Validation)?;

        let operator = self.state.api.update_operator(id, &request).await?;
        self.state.cache.operators.upsert(operator.clone()).await;

        Ok(ApiResponse::success_with_message(
            operator,
            "Operator updated successfully".to_string(),
        ))
    }
}
