use tracing::debug;

use super::domain::{ApplicationRecord, ApplicationState};
use super::generator::{DocumentConfig, DocumentError};
use super::portfolio::{portfolio_funds, portfolio_total};
use super::rendering::{MarkupRenderer, TemplatePathResolver};
use super::review::in_review_message;
use super::uri::template_address;
use super::views::{
    ActivatedApplicationView, ApplicationSummary, ApplicationView, InReviewApplicationView,
    PendingApplicationView, PortfolioSection,
};

/// Outcome of routing a lifecycle state to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRoute {
    Render(DocumentKind),
    Unsupported(ApplicationState),
}

impl DocumentRoute {
    pub const fn for_state(state: ApplicationState) -> Self {
        match state {
            ApplicationState::Pending => Self::Render(DocumentKind::Pending),
            ApplicationState::Activated => Self::Render(DocumentKind::Activated),
            ApplicationState::InReview => Self::Render(DocumentKind::InReview),
            ApplicationState::Draft | ApplicationState::Declined | ApplicationState::Cancelled => {
                Self::Unsupported(state)
            }
        }
    }
}

/// The documents the service knows how to produce, one per supported state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pending,
    Activated,
    InReview,
}

impl DocumentKind {
    /// Name handed to the template resolver.
    pub const fn logical_name(self) -> &'static str {
        match self {
            DocumentKind::Pending => "PendingApplication",
            DocumentKind::Activated => "ActivatedApplication",
            DocumentKind::InReview => "InReviewApplication",
        }
    }

    pub fn build_view(
        self,
        record: &ApplicationRecord,
        config: &DocumentConfig,
    ) -> Result<ApplicationView, DocumentError> {
        match self {
            DocumentKind::Pending => Ok(ApplicationView::Pending(build_pending_view(
                record, config,
            ))),
            DocumentKind::Activated => {
                build_activated_view(record, config).map(ApplicationView::Activated)
            }
            DocumentKind::InReview => {
                build_in_review_view(record, config).map(ApplicationView::InReview)
            }
        }
    }

    /// Builds the view model, resolves this document's template, and renders markup.
    pub(crate) fn render(
        self,
        record: &ApplicationRecord,
        context: &RenderContext<'_>,
    ) -> Result<String, DocumentError> {
        let view = self.build_view(record, context.config)?;
        let template_path = context.templates.resolve(self.logical_name())?;
        let address = template_address(context.base_uri, &template_path);

        debug!(
            document = self.logical_name(),
            template = %address,
            "rendering application document"
        );

        Ok(context.renderer.render(&address, &view)?)
    }
}

/// Borrowed collaborators for a single render call.
pub(crate) struct RenderContext<'a> {
    pub(crate) config: &'a DocumentConfig,
    pub(crate) templates: &'a dyn TemplatePathResolver,
    pub(crate) renderer: &'a dyn MarkupRenderer,
    pub(crate) base_uri: &'a str,
}

fn summary(record: &ApplicationRecord, config: &DocumentConfig) -> ApplicationSummary {
    ApplicationSummary {
        reference_number: record.reference_number.clone(),
        state_description: record.state.label(),
        full_name: record.applicant.full_name(),
        applied_on: record.applied_on,
        support_email: config.support_email.clone(),
        signature: config.signature.clone(),
    }
}

fn portfolio(
    record: &ApplicationRecord,
    config: &DocumentConfig,
) -> Result<PortfolioSection, DocumentError> {
    if record.is_legal_entity && record.legal_entity.is_none() {
        return Err(DocumentError::IncompleteRecord {
            reference: record.reference_number.clone(),
            missing: "legal entity details",
        });
    }

    Ok(PortfolioSection {
        legal_entity: record.flagged_legal_entity().cloned(),
        portfolio_funds: portfolio_funds(&record.products),
        portfolio_total: portfolio_total(&record.products, config.tax_rate),
    })
}

pub fn build_pending_view(
    record: &ApplicationRecord,
    config: &DocumentConfig,
) -> PendingApplicationView {
    PendingApplicationView {
        summary: summary(record, config),
    }
}

pub fn build_activated_view(
    record: &ApplicationRecord,
    config: &DocumentConfig,
) -> Result<ActivatedApplicationView, DocumentError> {
    Ok(ActivatedApplicationView {
        summary: summary(record, config),
        portfolio: portfolio(record, config)?,
    })
}

pub fn build_in_review_view(
    record: &ApplicationRecord,
    config: &DocumentConfig,
) -> Result<InReviewApplicationView, DocumentError> {
    let review = record
        .current_review
        .clone()
        .ok_or_else(|| DocumentError::IncompleteRecord {
            reference: record.reference_number.clone(),
            missing: "current review",
        })?;

    Ok(InReviewApplicationView {
        summary: summary(record, config),
        portfolio: portfolio(record, config)?,
        in_review_message: in_review_message(review.reason.as_deref()),
        current_review: review,
    })
}
