use tracing::info;
use validator::Validate;

use crate::controllers::{fetch_one_or_cached, fetch_or_cached};
use crate::dto::api_response::{ApiResponse, ListResponse};
use crate::dto::equipment_dto::{CreateEquipmentRequest, UpdateEquipmentRequest};
use crate::models::Equipment;
use crate::services::filters::EquipmentFilter;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct EquipmentController {
    state: AppState,
}

impl EquipmentController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self, filter: EquipmentFilter) -> AppResult<ListResponse<Equipment>> {
        let now = self.state.now();
        let fetched = fetch_or_cached(
            &self.state.cache.equipment,
            now,
            self.state.api.list_equipment(self.state.page()),
        )
        .await?;

        let items: Vec<Equipment> = filter.apply(&fetched.items).into_iter().cloned().collect();
        Ok(fetched.respond_with(items))
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Equipment> {
        fetch_one_or_cached(&self.state.cache.equipment, id, self.state.api.get_equipment(id)).await
    }

    pub async fn create(
        &self,
        request: CreateEquipmentRequest,
    ) -> AppResult<ApiResponse<Equipment>> {
        request.validate().map_err(AppError::Validation)?;

        let equipment = self.state.api.create_equipment(&request).await?;
        self.state.cache.equipment.upsert(equipment.clone()).await;
        info!("✅ Equipo {} creado", equipment.equipment_id);

        Ok(ApiResponse::success_with_message(
            equipment,
            "Equipment created successfully".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateEquipmentRequest,
    ) -> AppResult<ApiResponse<Equipment>> {
        request.validate().map_err(AppError::Validation)?;

        let equipment = self.state.api.update_equipment(id, &request).await?;
        self.state.cache.equipment.upsert(equipment.clone()).await;
        info!("✅ Equipo {} actualizado", equipment.equipment_id);

        Ok(ApiResponse::success_with_message(
            equipment,
            "Equipment updated successfully".to_string(),
        ))
    }
}
