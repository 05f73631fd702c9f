//! State-driven application documents.
//!
//! A record is fetched by identifier, routed by lifecycle state to one of the document
//! builders, bound into a view model, rendered to markup, and converted into the final
//! paginated document. Storage, templates, markup rendering, and conversion sit behind traits.

pub mod domain;
pub mod generator;
pub mod portfolio;
pub mod rendering;
pub mod repository;
pub mod review;
pub mod router;
pub mod templates;
pub mod uri;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicationId, ApplicationRecord, ApplicationReview, ApplicationState, Fund,
    LegalEntity, Product,
};
pub use generator::{
    ApplicationDocumentGenerator, ApplicationDocumentGeneratorBuilder, ConstructionError,
    DocumentConfig, DocumentError, MalformedInput,
};
pub use portfolio::{portfolio_funds, portfolio_total};
pub use rendering::{
    ConversionError, DocumentConverter, HeaderOptions, HeaderRepeat, LayoutOptions,
    MarkupRenderer, PageNumbering, RenderError, TemplateError, TemplatePathResolver,
    DOCUMENT_HEADER,
};
pub use repository::{ApplicationLookup, LookupError};
pub use review::in_review_message;
pub use router::{document_router, DocumentRouteState};
pub use templates::{DocumentKind, DocumentRoute};
pub use views::{
    ActivatedApplicationView, ApplicationSummary, ApplicationView, InReviewApplicationView,
    PendingApplicationView, PortfolioSection,
};
