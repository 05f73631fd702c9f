use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::domain::ApplicationId;
use super::rendering::{
    ConversionError, DocumentConverter, LayoutOptions, MarkupRenderer, RenderError,
    TemplateError, TemplatePathResolver,
};
use super::repository::{ApplicationLookup, LookupError};
use super::templates::{DocumentRoute, RenderContext};
use super::uri::normalize_base_uri;

/// Read-only values copied into every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    pub support_email: String,
    pub signature: String,
    /// Fractional multiplier applied to net fund value.
    pub tax_rate: Decimal,
}

/// Renders the document for one application, choosing content by lifecycle state.
///
/// The generator holds only shared, immutable collaborators, so one instance can serve
/// concurrent requests.
pub struct ApplicationDocumentGenerator {
    lookup: Arc<dyn ApplicationLookup>,
    templates: Arc<dyn TemplatePathResolver>,
    renderer: Arc<dyn MarkupRenderer>,
    converter: Arc<dyn DocumentConverter>,
    config: DocumentConfig,
    layout: LayoutOptions,
}

impl ApplicationDocumentGenerator {
    pub fn builder() -> ApplicationDocumentGeneratorBuilder {
        ApplicationDocumentGeneratorBuilder::default()
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Media type of the documents this generator produces.
    pub fn media_type(&self) -> mime::Mime {
        self.converter.media_type()
    }

    /// Produce the document bytes for `application_id`.
    ///
    /// Returns `Ok(None)` when the record does not exist or its state has no document.
    pub fn generate(
        &self,
        application_id: &ApplicationId,
        base_uri: &str,
    ) -> Result<Option<Vec<u8>>, DocumentError> {
        let base_uri = normalize_base_uri(base_uri)?;

        let Some(record) = self.lookup.fetch(application_id)? else {
            warn!(%application_id, "application record not found");
            return Ok(None);
        };

        let kind = match DocumentRoute::for_state(record.state) {
            DocumentRoute::Render(kind) => kind,
            DocumentRoute::Unsupported(state) => {
                warn!(
                    %application_id,
                    state = state.label(),
                    "no document defined for application state"
                );
                return Ok(None);
            }
        };

        let context = RenderContext {
            config: &self.config,
            templates: self.templates.as_ref(),
            renderer: self.renderer.as_ref(),
            base_uri,
        };
        let markup = kind.render(&record, &context)?;
        let document = self.converter.convert(&markup, &self.layout)?;

        info!(
            %application_id,
            document = kind.logical_name(),
            bytes = document.len(),
            "application document generated"
        );

        Ok(Some(document))
    }

    /// Like [`generate`](Self::generate), parsing the identifier first.
    pub fn generate_for(
        &self,
        raw_application_id: &str,
        base_uri: &str,
    ) -> Result<Option<Vec<u8>>, DocumentError> {
        let application_id = raw_application_id.parse::<ApplicationId>()?;
        self.generate(&application_id, base_uri)
    }
}

impl std::fmt::Debug for ApplicationDocumentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationDocumentGenerator")
            .field("config", &self.config)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

/// Collects collaborators and refuses to build while any of them is missing.
#[derive(Default)]
pub struct ApplicationDocumentGeneratorBuilder {
    lookup: Option<Arc<dyn ApplicationLookup>>,
    templates: Option<Arc<dyn TemplatePathResolver>>,
    renderer: Option<Arc<dyn MarkupRenderer>>,
    converter: Option<Arc<dyn DocumentConverter>>,
    config: Option<DocumentConfig>,
}

impl ApplicationDocumentGeneratorBuilder {
    pub fn lookup(mut self, lookup: Arc<dyn ApplicationLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn templates(mut self, templates: Arc<dyn TemplatePathResolver>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn MarkupRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn config(mut self, config: DocumentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<ApplicationDocumentGenerator, ConstructionError> {
        let lookup = self
            .lookup
            .ok_or(ConstructionError::MissingCollaborator("record lookup"))?;
        let templates = self
            .templates
            .ok_or(ConstructionError::MissingCollaborator("template path resolver"))?;
        let renderer = self
            .renderer
            .ok_or(ConstructionError::MissingCollaborator("markup renderer"))?;
        let converter = self
            .converter
            .ok_or(ConstructionError::MissingCollaborator("document converter"))?;
        let config = self
            .config
            .ok_or(ConstructionError::MissingCollaborator("document configuration"))?;

        Ok(ApplicationDocumentGenerator {
            lookup,
            templates,
            renderer,
            converter,
            config,
            layout: LayoutOptions::standard(),
        })
    }
}

/// Raised while wiring the generator; the service must not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("document generator requires a {0}")]
    MissingCollaborator(&'static str),
}

/// Caller input rejected before any lookup happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedInput {
    #[error("'{raw}' is not a valid application identifier")]
    ApplicationId { raw: String },
    #[error("base URI must not be empty")]
    EmptyBaseUri,
}

/// Error raised while generating a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    MalformedInput(#[from] MalformedInput),
    #[error("application {reference} is missing {missing}")]
    IncompleteRecord {
        reference: String,
        missing: &'static str,
    },
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
