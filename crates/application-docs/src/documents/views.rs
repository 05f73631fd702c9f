use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{ApplicationReview, Fund, LegalEntity};

/// Fields every application document carries regardless of state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    pub reference_number: String,
    pub state_description: &'static str,
    pub full_name: String,
    pub applied_on: NaiveDate,
    pub support_email: String,
    pub signature: String,
}

/// Holdings section shared by activated and in-review documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_entity: Option<LegalEntity>,
    pub portfolio_funds: Vec<Fund>,
    pub portfolio_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivatedApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    #[serde(flatten)]
    pub portfolio: PortfolioSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InReviewApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    #[serde(flatten)]
    pub portfolio: PortfolioSection,
    pub in_review_message: String,
    pub current_review: ApplicationReview,
}

/// View model handed to the markup renderer; serializes as a single flat object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApplicationView {
    Pending(PendingApplicationView),
    Activated(ActivatedApplicationView),
    InReview(InReviewApplicationView),
}

impl ApplicationView {
    pub fn summary(&self) -> &ApplicationSummary {
        match self {
            ApplicationView::Pending(view) => &view.summary,
            ApplicationView::Activated(view) => &view.summary,
            ApplicationView::InReview(view) => &view.summary,
        }
    }

    pub fn portfolio(&self) -> Option<&PortfolioSection> {
        match self {
            ApplicationView::Pending(_) => None,
            ApplicationView::Activated(view) => Some(&view.portfolio),
            ApplicationView::InReview(view) => Some(&view.portfolio),
        }
    }
}
