use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MalformedInput;

/// Identifier wrapper for stored applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub Uuid);

impl ApplicationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ApplicationId {
    type Err = MalformedInput;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| MalformedInput::ApplicationId {
                raw: raw.to_string(),
            })
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle status of an application. Only some states have a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    Draft,
    Pending,
    Activated,
    InReview,
    Declined,
    Cancelled,
}

impl ApplicationState {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationState::Draft => "Draft",
            ApplicationState::Pending => "Pending",
            ApplicationState::Activated => "Activated",
            ApplicationState::InReview => "In Review",
            ApplicationState::Declined => "Declined",
            ApplicationState::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub first_name: String,
    pub surname: String,
}

impl Applicant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Registration details captured when an application is made on behalf of a company or trust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub registered_name: String,
    pub registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    pub name: String,
    pub amount: Decimal,
    pub fees: Decimal,
}

impl Fund {
    pub fn net_value(&self) -> Decimal {
        self.amount - self.fees
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub funds: Vec<Fund>,
}

/// Open review attached to an application placed in review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationReview {
    #[serde(default)]
    pub reason: Option<String>,
    pub opened_on: NaiveDate,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// Stored application as returned by the record lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub reference_number: String,
    pub state: ApplicationState,
    pub applicant: Applicant,
    pub applied_on: NaiveDate,
    #[serde(default)]
    pub is_legal_entity: bool,
    #[serde(default)]
    pub legal_entity: Option<LegalEntity>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub current_review: Option<ApplicationReview>,
}

impl ApplicationRecord {
    /// Legal-entity details, honored only when the record is flagged as a legal entity.
    pub fn flagged_legal_entity(&self) -> Option<&LegalEntity> {
        if self.is_legal_entity {
            self.legal_entity.as_ref()
        } else {
            None
        }
    }
}
