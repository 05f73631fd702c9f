use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::Value;
use uuid::Uuid;

use crate::documents::domain::{
    Applicant, ApplicationId, ApplicationRecord, ApplicationReview, ApplicationState, Fund,
    LegalEntity, Product,
};
use crate::documents::generator::{ApplicationDocumentGenerator, DocumentConfig};
use crate::documents::rendering::{
    ConversionError, DocumentConverter, LayoutOptions, MarkupRenderer, RenderError,
    TemplateError, TemplatePathResolver,
};
use crate::documents::repository::{ApplicationLookup, LookupError};
use crate::documents::views::ApplicationView;

pub(super) const BASE_URI: &str = "http://docs.test/templates";

pub(super) fn document_config() -> DocumentConfig {
    DocumentConfig {
        support_email: "support@fund.test".to_string(),
        signature: "Client Services".to_string(),
        tax_rate: dec!(0.2),
    }
}

pub(super) fn application_id(seed: u128) -> ApplicationId {
    ApplicationId(Uuid::from_u128(seed))
}

pub(super) fn products() -> Vec<Product> {
    vec![
        Product {
            name: "Retirement Annuity".to_string(),
            funds: vec![
                Fund {
                    name: "Balanced".to_string(),
                    amount: dec!(100),
                    fees: dec!(10),
                },
                Fund {
                    name: "Global Equity".to_string(),
                    amount: dec!(250.50),
                    fees: dec!(0.50),
                },
            ],
        },
        Product {
            name: "Tax-Free Savings".to_string(),
            funds: vec![Fund {
                name: "Money Market".to_string(),
                amount: dec!(60),
                fees: dec!(0),
            }],
        },
    ]
}

pub(super) fn legal_entity() -> LegalEntity {
    LegalEntity {
        registered_name: "Nkosi Family Trust".to_string(),
        registration_number: "IT1234/2019".to_string(),
        tax_number: Some("9012345678".to_string()),
    }
}

pub(super) fn record(seed: u128, state: ApplicationState) -> ApplicationRecord {
    ApplicationRecord {
        id: application_id(seed),
        reference_number: format!("APP-{seed:05}"),
        state,
        applicant: Applicant {
            first_name: "Thandi".to_string(),
            surname: "Nkosi".to_string(),
        },
        applied_on: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
        is_legal_entity: false,
        legal_entity: None,
        products: products(),
        current_review: None,
    }
}

pub(super) fn in_review_record(seed: u128, reason: Option<&str>) -> ApplicationRecord {
    let mut record = record(seed, ApplicationState::InReview);
    record.current_review = Some(ApplicationReview {
        reason: reason.map(str::to_string),
        opened_on: NaiveDate::from_ymd_opt(2025, 3, 20).expect("valid date"),
        assigned_to: Some("compliance-desk".to_string()),
    });
    record
}

pub(super) fn legal_entity_record(seed: u128, state: ApplicationState) -> ApplicationRecord {
    let mut record = record(seed, state);
    record.is_legal_entity = true;
    record.legal_entity = Some(legal_entity());
    record
}

#[derive(Default)]
pub(super) struct MemoryLookup {
    records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
    fetches: AtomicUsize,
}

impl MemoryLookup {
    pub(super) fn with_records(records: impl IntoIterator<Item = ApplicationRecord>) -> Self {
        let lookup = Self::default();
        {
            let mut guard = lookup.records.lock().expect("lookup mutex poisoned");
            for record in records {
                guard.insert(record.id, record);
            }
        }
        lookup
    }

    pub(super) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ApplicationLookup for MemoryLookup {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, LookupError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let guard = self.records.lock().expect("lookup mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableLookup;

impl ApplicationLookup for UnavailableLookup {
    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, LookupError> {
        Err(LookupError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct StaticTemplates;

impl TemplatePathResolver for StaticTemplates {
    fn resolve(&self, logical_name: &str) -> Result<String, TemplateError> {
        match logical_name {
            "PendingApplication" => Ok("/pending-application.html".to_string()),
            "ActivatedApplication" => Ok("/activated-application.html".to_string()),
            "InReviewApplication" => Ok("/in-review-application.html".to_string()),
            other => Err(TemplateError::Unknown(other.to_string())),
        }
    }
}

pub(super) struct EmptyTemplates;

impl TemplatePathResolver for EmptyTemplates {
    fn resolve(&self, logical_name: &str) -> Result<String, TemplateError> {
        Err(TemplateError::Unknown(logical_name.to_string()))
    }
}

/// Renders the view as JSON wrapped in a tag naming the template address.
#[derive(Default)]
pub(super) struct RecordingRenderer {
    calls: Mutex<Vec<(String, Value)>>,
}

impl RecordingRenderer {
    pub(super) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().expect("renderer mutex poisoned").clone()
    }
}

impl MarkupRenderer for RecordingRenderer {
    fn render(&self, template_path: &str, view: &ApplicationView) -> Result<String, RenderError> {
        let payload = serde_json::to_value(view).map_err(|err| RenderError::Template {
            path: template_path.to_string(),
            reason: err.to_string(),
        })?;
        let markup = format!("<main data-template=\"{template_path}\">{payload}</main>");
        self.calls
            .lock()
            .expect("renderer mutex poisoned")
            .push((template_path.to_string(), payload));
        Ok(markup)
    }
}

pub(super) struct FailingRenderer;

impl MarkupRenderer for FailingRenderer {
    fn render(&self, template_path: &str, _view: &ApplicationView) -> Result<String, RenderError> {
        Err(RenderError::Template {
            path: template_path.to_string(),
            reason: "unterminated block".to_string(),
        })
    }
}

/// Emits `%PDF-` followed by the markup so tests can inspect what was converted.
#[derive(Default)]
pub(super) struct EchoConverter {
    layouts: Mutex<Vec<LayoutOptions>>,
}

impl EchoConverter {
    pub(super) fn layouts(&self) -> Vec<LayoutOptions> {
        self.layouts.lock().expect("converter mutex poisoned").clone()
    }
}

impl DocumentConverter for EchoConverter {
    fn convert(&self, markup: &str, layout: &LayoutOptions) -> Result<Vec<u8>, ConversionError> {
        self.layouts
            .lock()
            .expect("converter mutex poisoned")
            .push(layout.clone());
        let mut document = b"%PDF-".to_vec();
        document.extend_from_slice(markup.as_bytes());
        Ok(document)
    }
}

pub(super) struct Harness {
    pub(super) generator: ApplicationDocumentGenerator,
    pub(super) lookup: Arc<MemoryLookup>,
    pub(super) renderer: Arc<RecordingRenderer>,
    pub(super) converter: Arc<EchoConverter>,
}

pub(super) fn harness(records: impl IntoIterator<Item = ApplicationRecord>) -> Harness {
    let lookup = Arc::new(MemoryLookup::with_records(records));
    let renderer = Arc::new(RecordingRenderer::default());
    let converter = Arc::new(EchoConverter::default());

    let generator = ApplicationDocumentGenerator::builder()
        .lookup(lookup.clone())
        .templates(Arc::new(StaticTemplates))
        .renderer(renderer.clone())
        .converter(converter.clone())
        .config(document_config())
        .build()
        .expect("all collaborators supplied");

    Harness {
        generator,
        lookup,
        renderer,
        converter,
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}
