//! DTOs de la API
//!
//! Frontera de parseo (`Raw*` → modelos vía `TryFrom`), requests validados
//! con `validator` y vistas derivadas que sirve el gateway.

pub mod alert_dto;
pub mod api_response;
pub mod dashboard_dto;
pub mod directory_dto;
pub mod equipment_dto;
pub mod rental_dto;
pub mod usage_dto;

pub use alert_dto::*;
pub use api_response::*;
pub use dashboard_dto::*;
pub use directory_dto::*;
pub use equipment_dto::*;
pub use rental_dto::*;
pub use usage_dto::*;
