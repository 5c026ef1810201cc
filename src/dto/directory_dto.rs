use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Operator, Site};
use crate::utils::errors::{field_error, AppError};
use crate::utils::validation::{
    parse_timestamp, validate_business_id, validate_not_empty, validate_phone,
};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Payload de obra
#[derive(Debug, Clone, Deserialize)]
pub struct RawSite {
    pub id: i64,
    pub site_id: String,
    pub name: String,
    pub location: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: String,
}

impl TryFrom<RawSite> for Site {
    type Error = AppError;

    fn try_from(raw: RawSite) -> Result<Self, Self::Error> {
        validate_not_empty(&raw.site_id).map_err(|e| field_error("site_id", e))?;
        validate_not_empty(&raw.name).map_err(|e| field_error("name", e))?;

        Ok(Site {
            id: raw.id,
            site_id: raw.site_id.trim().to_string(),
            name: raw.name.trim().to_string(),
            location: non_blank(raw.location),
            address: non_blank(raw.address),
            contact_person: non_blank(raw.contact_person),
            contact_phone: non_blank(raw.contact_phone),
            created_at: parse_timestamp(&raw.created_at).map_err(|e| field_error("created_at", e))?,
        })
    }
}

// Payload de operador
#[derive(Debug, Clone, Deserialize)]
pub struct RawOperator {
    pub id: i64,
    pub operator_id: String,
    pub name: String,
    pub license_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub certification_level: Option<String>,
    pub created_at: String,
}

impl TryFrom<RawOperator> for Operator {
    type Error = AppError;

    fn try_from(raw: RawOperator) -> Result<Self, Self::Error> {
        validate_not_empty(&raw.operator_id).map_err(|e| field_error("operator_id", e))?;
        validate_not_empty(&raw.name).map_err(|e| field_error("name", e))?;

        Ok(Operator {
            id: raw.id,
            operator_id: raw.operator_id.trim().to_string(),
            name: raw.name.trim().to_string(),
            license_number: non_blank(raw.license_number),
            phone: non_blank(raw.phone),
            email: non_blank(raw.email),
            certification_level: non_blank(raw.certification_level),
            created_at: parse_timestamp(&raw.created_at).map_err(|e| field_error("created_at", e))?,
        })
    }
}

// Request para crear una obra
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateSiteRequest {
    #[validate(custom = "validate_business_id")]
    pub site_id: String,
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_phone")]
    pub contact_phone: Option<String>,
}

// Request para actualizar una obra
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateSiteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_phone")]
    pub contact_phone: Option<String>,
}

// Request para crear un operador
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateOperatorRequest {
    #[validate(custom = "validate_business_id")]
    pub operator_id: String,
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_level: Option<String>,
}

// Request para actualizar un operador
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateOperatorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certification_level: Option<String>,
}
