//! Facturación y seguimiento de alquileres
//!
//! Costes por días transcurridos, vista previa de check-in, extensiones,
//! recargos por retraso y selección de recordatorios de devolución.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::dto::rental_dto::UpdateRentalRequest;
use crate::models::{Rental, RentalStatus};
use crate::services::status_resolver::{days_overdue, days_until_due, resolve_rental_status};
use crate::utils::errors::{invalid_operation_error, validation_error, AppResult};

/// Recargo diario por retraso: 10% de la tarifa diaria
const LATE_FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Días de calendario transcurridos, ambos extremos incluidos (mínimo 1)
pub fn elapsed_days(start: DateTime<Utc>, until: DateTime<Utc>) -> i64 {
    ((until.date_naive() - start.date_naive()).num_days() + 1).max(1)
}

/// `daily_rate × elapsed_days`, redondeado a céntimos
pub fn compute_total_cost(rental: &Rental, until: DateTime<Utc>) -> Option<Decimal> {
    rental
        .daily_rate
        .map(|rate| (rate * Decimal::from(elapsed_days(rental.start_date, until))).round_dp(2))
}

/// Recargo acumulado por retraso en `now`
pub fn late_fee(rental: &Rental, now: DateTime<Utc>) -> Decimal {
    let days = days_overdue(rental, now);
    match rental.daily_rate {
        Some(rate) if days > 0 => (rate * LATE_FEE_RATE * Decimal::from(days)).round_dp(2),
        _ => Decimal::ZERO,
    }
}

/// Vista previa del cierre de un alquiler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInPreview {
    pub rental_id: i64,
    pub check_in_date: DateTime<Utc>,
    pub elapsed_days: i64,
    pub daily_rate: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub days_overdue: i64,
    pub late_fee: Decimal,
}

pub fn check_in_preview(rental: &Rental, now: DateTime<Utc>) -> AppResult<CheckInPreview> {
    let status = resolve_rental_status(rental, now);
    if status.is_terminal() {
        return Err(invalid_operation_error(
            "check in rental",
            &format!("rental {} is already {}", rental.id, status),
        ));
    }

    Ok(CheckInPreview {
        rental_id: rental.id,
        check_in_date: now,
        elapsed_days: elapsed_days(rental.start_date, now),
        daily_rate: rental.daily_rate,
        total_cost: compute_total_cost(rental, now),
        days_overdue: days_overdue(rental, now),
        late_fee: late_fee(rental, now),
    })
}

/// Prepara la actualización parcial que extiende un alquiler
pub fn extend_rental(
    rental: &Rental,
    extra_days: i64,
    now: DateTime<Utc>,
) -> AppResult<UpdateRentalRequest> {
    if extra_days < 1 {
        return Err(validation_error("extension_days", "extension must be at least one day"));
    }
    if rental.status.is_terminal() {
        return Err(invalid_operation_error(
            "extend rental",
            &format!("rental {} is {}", rental.id, rental.status),
        ));
    }

    let base = rental.end_date.unwrap_or(now);
    Ok(UpdateRentalRequest {
        expected_return_date: Some(base + Duration::days(extra_days)),
        ..Default::default()
    })
}

/// Alquiler próximo a vencer (recordatorio de devolución)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueSoon {
    pub rental: Rental,
    pub days_remaining: i64,
}

/// Alquileres activos cuya devolución cae dentro de `0..=days_ahead` días
pub fn due_soon(rentals: &[Rental], now: DateTime<Utc>, days_ahead: i64) -> Vec<DueSoon> {
    let mut due: Vec<DueSoon> = rentals
        .iter()
        .filter(|r| resolve_rental_status(r, now) == RentalStatus::Active)
        .filter_map(|r| {
            days_until_due(r, now)
                .filter(|days| (0..=days_ahead).contains(days))
                .map(|days_remaining| DueSoon {
                    rental: r.clone(),
                    days_remaining,
                })
        })
        .collect();
    due.sort_by(|a, b| {
        a.rental
            .end_date
            .cmp(&b.rental.end_date)
            .then(a.rental.id.cmp(&b.rental.id))
    });
    due
}

/// Aviso de alquiler vencido
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueNotice {
    pub rental: Rental,
    pub days_overdue: i64,
    pub late_fee: Decimal,
}

/// Alquileres vencidos en `now`, los más atrasados primero
pub fn overdue_notices(rentals: &[Rental], now: DateTime<Utc>) -> Vec<OverdueNotice> {
    let mut notices: Vec<OverdueNotice> = rentals
        .iter()
        .filter(|r| resolve_rental_status(r, now) == RentalStatus::Overdue)
        .map(|r| OverdueNotice {
            rental: r.clone(),
            days_overdue: days_overdue(r, now),
            late_fee: late_fee(r, now),
        })
        .collect();
    notices.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue).then(a.rental.id.cmp(&b.rental.id)));
    notices
}
