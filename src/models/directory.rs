//! Modelos de Site y Operator
//!
//! Entidades de directorio: sin ciclo de vida más allá de crear/actualizar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Obra o faena donde se asigna el equipo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    pub id: i64,
    pub site_id: String,
    pub name: String,
    pub location: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Operador de maquinaria
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operator {
    pub id: i64,
    pub operator_id: String,
    pub name: String,
    pub license_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub certification_level: Option<String>,
    pub created_at: DateTime<Utc>,
}
