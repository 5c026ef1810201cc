//! Modelos del sistema
//!
//! Este módulo contiene las entidades fuertemente tipadas que produce la
//! frontera de parseo y que consumen los servicios de derivación.

pub mod alert;
pub mod dashboard;
pub mod directory;
pub mod equipment;
pub mod rental;
pub mod usage;

pub use alert::{Alert, AlertCategory, AlertDraft, Resolution, Severity};
pub use dashboard::{
    DashboardSummary, EquipmentSummary, EquipmentTypeStats, RentalSummary, SummarySource,
};
pub use directory::{Operator, Site};
pub use equipment::{Equipment, EquipmentStatus};
pub use rental::{Rental, RentalStatus};
pub use usage::{UsageLog, UsageScope};
