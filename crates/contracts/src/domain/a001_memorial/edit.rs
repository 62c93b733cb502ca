//! Inline edit endpoints: field ids, request bodies, response bodies.
//!
//! The biography endpoint answers with a `success` flag while the others use
//! a `status` string. Both shapes are kept here as the server produces them;
//! the client normalizes them at its sync boundary.

use serde::{Deserialize, Serialize};

use super::aggregate::MemorialId;
use crate::domain::common::AggregateId;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldId {
    Banner,
    Name,
    Dates,
    Quote,
    Biography,
}

impl FieldId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Banner => "banner",
            FieldId::Name => "name",
            FieldId::Dates => "dates",
            FieldId::Quote => "quote",
            FieldId::Biography => "biography",
        }
    }

    /// Same-origin path of the edit endpoint, e.g. `/memorials/{id}/update-name/`
    pub fn endpoint(&self, id: &MemorialId) -> String {
        format!("/memorials/{}/update-{}/", id.as_string(), self.as_str())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// POST update-name (form-encoded)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateNameForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// POST update-dates (form-encoded, `YYYY-MM-DD`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDatesForm {
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub date_of_death: String,
}

/// POST update-banner (form-encoded)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBannerForm {
    #[serde(default)]
    pub banner_type: String,
    #[serde(default)]
    pub banner_value: String,
}

/// POST update-quote (JSON)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateQuoteRequest {
    #[serde(default)]
    pub quote: String,
}

/// POST update-biography (form-encoded)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBiographyForm {
    #[serde(default)]
    pub biography: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusError {
    pub status: String,
    pub message: String,
}

impl StatusError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameUpdated {
    pub status: String,
    pub new_name: String,
}

impl NameUpdated {
    pub fn new(new_name: String) -> Self {
        Self {
            status: STATUS_SUCCESS.into(),
            new_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatesUpdated {
    pub status: String,
    pub new_dates: String,
}

impl DatesUpdated {
    pub fn new(new_dates: String) -> Self {
        Self {
            status: STATUS_SUCCESS.into(),
            new_dates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdated {
    pub status: String,
    pub quote: String,
    pub message: String,
}

impl QuoteUpdated {
    pub fn new(quote: String) -> Self {
        Self {
            status: STATUS_SUCCESS.into(),
            quote,
            message: "Quote updated successfully".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerUpdated {
    pub status: String,
    pub banner_type: String,
    pub banner_value: String,
}

impl BannerUpdated {
    pub fn new(banner_type: String, banner_value: String) -> Self {
        Self {
            status: STATUS_SUCCESS.into(),
            banner_type,
            banner_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiographyUpdated {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BiographyUpdated {
    pub fn ok(biography: String) -> Self {
        Self {
            success: true,
            biography: Some(biography),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            biography: None,
            error: Some(error.into()),
        }
    }
}
