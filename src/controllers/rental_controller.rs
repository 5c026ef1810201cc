use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::controllers::{fetch_one_or_cached, fetch_or_cached, Fetched};
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::rental_dto::{
    CreateRentalRequest, ExtendRentalRequest, RentalView, UpdateRentalRequest,
};
use crate::models::Rental;
use crate::services::filters::RentalFilter;
use crate::services::rental_billing::{
    check_in_preview, due_soon, extend_rental, overdue_notices, CheckInPreview, DueSoon,
    OverdueNotice,
};
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError, AppResult};

/// Resultado del check-in: lo que se calculó y lo que confirmó el backend
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub preview: CheckInPreview,
    pub rental: RentalView,
}

pub struct RentalController {
    state: AppState,
}

impl RentalController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn fetch_all(&self) -> AppResult<Fetched<Rental>> {
        fetch_or_cached(
            &self.state.cache.rentals,
            self.state.now(),
            self.state.api.list_rentals(self.state.page(), None),
        )
        .await
    }

    pub async fn list(&self, filter: RentalFilter) -> AppResult<ListResponse<RentalView>> {
        let now = self.state.now();
        // el estado se valida antes de tocar el backend
        filter.criteria(now)?;

        let fetched = self.fetch_all().await?;
        let items = filter
            .apply(&fetched.items, now)?
            .into_iter()
            .cloned()
            .map(|rental| RentalView::at(rental, now))
            .collect();

        Ok(fetched.respond_with(items))
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<RentalView> {
        let request = self.state.api.get_rental(id);
        let rental = fetch_one_or_cached(&self.state.cache.rentals, id, request).await?;
        Ok(RentalView::at(rental, self.state.now()))
    }

    pub async fn create(&self, request: CreateRentalRequest) -> AppResult<ApiResponse<RentalView>> {
        request.validate().map_err(AppError::Validation)?;

        let rental = self.state.api.create_rental(&request).await?;
        self.state.cache.rentals.upsert(rental.clone()).await;
        info!("✅ Alquiler {} creado", rental.rental_ref);

        Ok(ApiResponse::success_with_message(
            RentalView::at(rental, self.state.now()),
            "Rental created successfully".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateRentalRequest,
    ) -> AppResult<ApiResponse<RentalView>> {
        request.validate().map_err(AppError::Validation)?;

        let rental = self.state.api.update_rental(id, &request).await?;
        self.state.cache.rentals.upsert(rental.clone()).await;

        Ok(ApiResponse::success_with_message(
            RentalView::at(rental, self.state.now()),
            "Rental updated successfully".to_string(),
        ))
    }

    pub async fn check_in(&self, id: i64) -> AppResult<ApiResponse<CheckInResponse>> {
        let now = self.state.now();
        let current = self.state.api.get_rental(id).await?;
        let preview = check_in_preview(&current, now)?;

        let rental = self.state.api.check_in_rental(id).await?;
        self.state.cache.rentals.upsert(rental.clone()).await;
        info!(
            "✅ Check-in de {}: {} días, coste {:?}",
            rental.rental_ref, preview.elapsed_days, preview.total_cost
        );

        Ok(ApiResponse::success_with_message(
            CheckInResponse {
                preview,
                rental: RentalView::at(rental, now),
            },
            "Rental checked in successfully".to_string(),
        ))
    }

    pub async fn extend(
        &self,
        id: i64,
        request: ExtendRentalRequest,
    ) -> AppResult<ApiResponse<RentalView>> {
        request.validate().map_err(AppError::Validation)?;

        let now = self.state.now();
        let current = self.state.api.get_rental(id).await?;
        let update = extend_rental(&current, request.extension_days, now)?;

        let rental = self.state.api.update_rental(id, &update).await?;
        self.state.cache.rentals.upsert(rental.clone()).await;
        info!("✅ Alquiler {} extendido {} días", rental.rental_ref, request.extension_days);

        Ok(ApiResponse::success_with_message(
            RentalView::at(rental, now),
            "Rental extended successfully".to_string(),
        ))
    }

    pub async fn due_soon(&self, days: Option<i64>) -> AppResult<ListResponse<DueSoon>> {
        let days = days.unwrap_or(self.state.config.due_soon_days);
        if days < 0 {
            return Err(validation_error("days", "days must not be negative"));
        }

        let fetched = self.fetch_all().await?;
        let items = due_soon(&fetched.items, self.state.now(), days);
        Ok(fetched.respond_with(items))
    }

    pub async fn overdue(&self) -> AppResult<ListResponse<OverdueNotice>> {
        let fetched = self.fetch_all().await?;
        let items = overdue_notices(&fetched.items, self.state.now());
        Ok(fetched.respond_with(items))
    }
}
