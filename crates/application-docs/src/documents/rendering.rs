//! Contracts for the template lookup, markup engine, and document converter.
//!
//! None of these are implemented by the library. The generator only depends on the traits,
//! which lets the service crate plug in whatever engine it ships with.

use serde::Serialize;

use super::views::ApplicationView;

/// Maps a logical document name such as `PendingApplication` to a template path.
pub trait TemplatePathResolver: Send + Sync {
    fn resolve(&self, logical_name: &str) -> Result<String, TemplateError>;
}

/// Binds a view model into a template and returns markup.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, template_path: &str, view: &ApplicationView) -> Result<String, RenderError>;
}

/// Converts rendered markup into the final paginated document bytes.
pub trait DocumentConverter: Send + Sync {
    fn convert(&self, markup: &str, layout: &LayoutOptions) -> Result<Vec<u8>, ConversionError>;

    /// Media type of the bytes returned by [`convert`](Self::convert).
    fn media_type(&self) -> mime::Mime {
        mime::APPLICATION_PDF
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("no template registered for '{0}'")]
    Unknown(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template '{path}' could not be rendered: {reason}")]
    Template { path: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("document conversion failed: {0}")]
    Backend(String),
}

/// Markup placed at the top of the first page of every document.
pub const DOCUMENT_HEADER: &str =
    "<div class=\"document-header\"><span class=\"document-header__title\">Application Summary</span></div>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumbering {
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRepeat {
    FirstPageOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderOptions {
    pub repeat: HeaderRepeat,
    pub content: &'static str,
}

/// Pagination and header settings handed to the converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutOptions {
    pub page_numbering: PageNumbering,
    pub header: HeaderOptions,
}

impl LayoutOptions {
    /// The layout used for every application document.
    pub const fn standard() -> Self {
        Self {
            page_numbering: PageNumbering::Numeric,
            header: HeaderOptions {
                repeat: HeaderRepeat::FirstPageOnly,
                content: DOCUMENT_HEADER,
            },
        }
    }
}
