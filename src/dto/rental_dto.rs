use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Rental, RentalStatus};
use crate::services::rental_billing::{compute_total_cost, late_fee};
use crate::services::status_resolver::{days_overdue, days_until_due, resolve_rental_status};
use crate::utils::errors::{field_error, validation_error, AppError};
use crate::utils::validation::{parse_money, parse_optional_timestamp, parse_timestamp};

// Objetos relacionados que el backend anida en cada alquiler
#[derive(Debug, Clone, Deserialize)]
pub struct RawEquipmentRef {
    pub equipment_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNamedRef {
    pub name: Option<String>,
}

// Payload de alquiler
#[derive(Debug, Clone, Deserialize)]
pub struct RawRental {
    pub id: i64,
    pub rental_ref: Option<String>,
    pub equipment_id: i64,
    pub site_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub check_out_date: String,
    pub expected_return_date: Option<String>,
    pub check_in_date: Option<String>,
    pub rental_rate_per_day: Option<f64>,
    pub total_cost: Option<f64>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub equipment: Option<RawEquipmentRef>,
    pub site: Option<RawNamedRef>,
    pub operator: Option<RawNamedRef>,
}

fn money(field: &'static str, value: Option<f64>) -> Result<Option<Decimal>, AppError> {
    value
        .map(parse_money)
        .transpose()
        .map_err(|e| field_error(field, e))
}

impl TryFrom<RawRental> for Rental {
    type Error = AppError;

    fn try_from(raw: RawRental) -> Result<Self, Self::Error> {
        let status = raw
            .status
            .parse::<RentalStatus>()
            .map_err(|e| validation_error("status", &e))?;

        let start_date =
            parse_timestamp(&raw.check_out_date).map_err(|e| field_error("check_out_date", e))?;
        let end_date = parse_optional_timestamp(raw.expected_return_date.as_deref())
            .map_err(|e| field_error("expected_return_date", e))?;

        if let Some(end) = end_date {
            if end.date_naive() < start_date.date_naive() {
                return Err(validation_error(
                    "expected_return_date",
                    "expected return date is before check-out date",
                ));
            }
        }

        let created_at =
            parse_timestamp(&raw.created_at).map_err(|e| field_error("created_at", e))?;
        let updated_at = parse_optional_timestamp(raw.updated_at.as_deref())
            .map_err(|e| field_error("updated_at", e))?
            .unwrap_or(created_at);

        let rental_ref = raw
            .rental_ref
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| Rental::default_ref(raw.id));

        Ok(Rental {
            id: raw.id,
            rental_ref,
            equipment_id: raw.equipment_id,
            site_id: raw.site_id,
            operator_id: raw.operator_id,
            equipment_code: raw.equipment.and_then(|e| e.equipment_id),
            site_name: raw.site.and_then(|s| s.name),
            operator_name: raw.operator.and_then(|o| o.name),
            start_date,
            end_date,
            check_in_date: parse_optional_timestamp(raw.check_in_date.as_deref())
                .map_err(|e| field_error("check_in_date", e))?,
            status,
            daily_rate: money("rental_rate_per_day", raw.rental_rate_per_day)?,
            total_cost: money("total_cost", raw.total_cost)?,
            notes: raw.notes.filter(|n| !n.trim().is_empty()),
            created_at,
            updated_at,
        })
    }
}

// Request para crear un alquiler
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_rental_window"))]
pub struct CreateRentalRequest {
    #[validate(range(min = 1))]
    pub equipment_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    pub check_out_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub rental_rate_per_day: Option<f64>,
}

fn validate_rental_window(request: &CreateRentalRequest) -> Result<(), ValidationError> {
    match request.expected_return_date {
        Some(end) if end.date_naive() < request.check_out_date.date_naive() => {
            let mut error = ValidationError::new("rental_window");
            error.add_param("check_out_date".into(), &request.check_out_date);
            error.add_param("expected_return_date".into(), &end);
            Err(error)
        }
        _ => Ok(()),
    }
}

// Request de actualización parcial de un alquiler
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
pub struct UpdateRentalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub rental_rate_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub total_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RentalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

// Request para extender un alquiler
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExtendRentalRequest {
    #[validate(range(min = 1, max = 365))]
    pub extension_days: i64,
}

// Query para recordatorios de devolución
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DueSoonQuery {
    pub days: Option<i64>,
}

// Response de alquiler con estado derivado
#[derive(Debug, Clone, Serialize)]
pub struct RentalView {
    #[serde(flatten)]
    pub rental: Rental,
    pub display_status: RentalStatus,
    pub days_overdue: i64,
    pub days_until_due: Option<i64>,
    pub accrued_cost: Option<Decimal>,
    pub late_fee: Decimal,
}

impl RentalView {
    pub fn at(rental: Rental, now: DateTime<Utc>) -> Self {
        let display_status = resolve_rental_status(&rental, now);
        let accrued_cost = if display_status.is_terminal() {
            rental.total_cost
        } else {
            compute_total_cost(&rental, now)
        };

        Self {
            display_status,
            days_overdue: days_overdue(&rental, now),
            days_until_due: days_until_due(&rental, now),
            accrued_cost,
            late_fee: late_fee(&rental, now),
            rental,
        }
    }
}
