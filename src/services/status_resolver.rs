//! Resolución de estados
//!
//! Deriva el estado visible de un alquiler y si una alerta está activa.
//! Las comparaciones temporales usan la fecha de calendario UTC en ambos
//! lados: un alquiler que vence hoy no está vencido.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Alert, Rental, RentalStatus, Resolution};

fn calendar_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Estado visible de un alquiler en `now`.
///
/// `completed` y `cancelled` se devuelven tal cual. Un `active` cuya fecha
/// de fin ya pasó se muestra como `overdue` sin tocar el campo almacenado.
pub fn resolve_rental_status(rental: &Rental, now: DateTime<Utc>) -> RentalStatus {
    match rental.status {
        RentalStatus::Completed | RentalStatus::Cancelled | RentalStatus::Overdue => rental.status,
        RentalStatus::Active => match rental.end_date {
            Some(end) if calendar_day(end) < calendar_day(now) => RentalStatus::Overdue,
            _ => RentalStatus::Active,
        },
    }
}

/// Días de retraso (0 si no está vencido)
pub fn days_overdue(rental: &Rental, now: DateTime<Utc>) -> i64 {
    if resolve_rental_status(rental, now) != RentalStatus::Overdue {
        return 0;
    }
    rental
        .end_date
        .map(|end| (calendar_day(now) - calendar_day(end)).num_days().max(0))
        .unwrap_or(0)
}

/// Días hasta la devolución prevista; negativo si ya pasó
pub fn days_until_due(rental: &Rental, now: DateTime<Utc>) -> Option<i64> {
    rental
        .end_date
        .map(|end| (calendar_day(end) - calendar_day(now)).num_days())
}

/// Una alerta está activa si y solo si no tiene resolución
pub fn is_alert_active(alert: &Alert) -> bool {
    matches!(alert.resolution, Resolution::Unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn rental(status: RentalStatus, end: Option<DateTime<Utc>>) -> Rental {
        Rental {
            id: 1,
            rental_ref: Rental::default_ref(1),
            equipment_id: 10,
            site_id: None,
            operator_id: None,
            equipment_code: None,
            site_name: None,
            operator_name: None,
            start_date: at(2023, 12, 1, 8),
            end_date: end,
            check_in_date: None,
            status,
            daily_rate: None,
            total_cost: None,
            notes: None,
            created_at: at(2023, 12, 1, 8),
            updated_at: at(2023, 12, 1, 8),
        }
    }

    #[test]
    fn test_active_past_end_is_overdue() {
        let r = rental(RentalStatus::Active, Some(at(2024, 1, 1, 0)));
        assert_eq!(resolve_rental_status(&r, at(2024, 6, 1, 0)), RentalStatus::Overdue);
        // el campo almacenado no cambia
        assert_eq!(r.status, RentalStatus::Active);
    }

    #[test]
    fn test_end_today_is_not_overdue() {
        let r = rental(RentalStatus::Active, Some(at(2024, 6, 1, 0)));
        assert_eq!(resolve_rental_status(&r, at(2024, 6, 1, 0)), RentalStatus::Active);
        // misma fecha, hora posterior: sigue sin vencer
        assert_eq!(resolve_rental_status(&r, at(2024, 6, 1, 23)), RentalStatus::Active);
        assert_eq!(resolve_rental_status(&r, at(2024, 6, 2, 0)), RentalStatus::Overdue);
    }

    #[test]
    fn test_terminal_states_never_overridden() {
        for status in [RentalStatus::Completed, RentalStatus::Cancelled] {
            let r = rental(status, Some(at(2020, 1, 1, 0)));
            assert_eq!(resolve_rental_status(&r, at(2024, 6, 1, 0)), status);
            assert_eq!(days_overdue(&r, at(2024, 6, 1, 0)), 0);
        }
    }

    #[test]
    fn test_without_end_date_never_overdue() {
        let r = rental(RentalStatus::Active, None);
        assert_eq!(resolve_rental_status(&r, at(2030, 1, 1, 0)), RentalStatus::Active);
        assert_eq!(days_until_due(&r, at(2030, 1, 1, 0)), None);
    }

    #[test]
    fn test_day_counters() {
        let r = rental(RentalStatus::Active, Some(at(2024, 1, 1, 18)));
        assert_eq!(days_overdue(&r, at(2024, 1, 11, 6)), 10);
        assert_eq!(days_until_due(&r, at(2023, 12, 25, 23)), Some(7));
        assert_eq!(days_until_due(&r, at(2024, 1, 3, 0)), Some(-2));
    }

    #[test]
    fn test_stored_overdue_stays_overdue() {
        let r = rental(RentalStatus::Overdue, Some(at(2030, 1, 1, 0)));
        assert_eq!(resolve_rental_status(&r, at(2024, 1, 1, 0)), RentalStatus::Overdue);
    }
}
