use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use application_docs::documents::{
    ApplicationDocumentGenerator, ApplicationId, ApplicationLookup, ApplicationRecord,
    ApplicationView, ConstructionError, ConversionError, DocumentConfig, DocumentConverter,
    DocumentKind, HeaderRepeat, LayoutOptions, LookupError, MarkupRenderer, PageNumbering,
    PortfolioSection, RenderError, TemplateError, TemplatePathResolver,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read-only record store fixed at startup.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationLookup {
    records: Arc<HashMap<ApplicationId, ApplicationRecord>>,
}

impl InMemoryApplicationLookup {
    pub(crate) fn seeded(records: impl IntoIterator<Item = ApplicationRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self {
            records: Arc::new(records),
        }
    }
}

impl ApplicationLookup for InMemoryApplicationLookup {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, LookupError> {
        Ok(self.records.get(id).cloned())
    }
}

/// Fixed table of template files, one per document kind.
#[derive(Debug, Clone)]
pub(crate) struct StaticTemplateResolver {
    paths: HashMap<&'static str, &'static str>,
}

impl Default for StaticTemplateResolver {
    fn default() -> Self {
        let paths = [
            (DocumentKind::Pending, "/pending-application.html"),
            (DocumentKind::Activated, "/activated-application.html"),
            (DocumentKind::InReview, "/in-review-application.html"),
        ]
        .into_iter()
        .map(|(kind, path)| (kind.logical_name(), path))
        .collect();

        Self { paths }
    }
}

impl TemplatePathResolver for StaticTemplateResolver {
    fn resolve(&self, logical_name: &str) -> Result<String, TemplateError> {
        self.paths
            .get(logical_name)
            .map(|path| path.to_string())
            .ok_or_else(|| TemplateError::Unknown(logical_name.to_string()))
    }
}

/// Lays the view model out as a plain HTML page. The template address is recorded in a
/// `<meta>` tag rather than fetched.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HtmlMarkupRenderer;

impl MarkupRenderer for HtmlMarkupRenderer {
    fn render(&self, template_path: &str, view: &ApplicationView) -> Result<String, RenderError> {
        render_application_html(view, template_path).map_err(|_| RenderError::Template {
            path: template_path.to_string(),
            reason: "failed to write markup".to_string(),
        })
    }
}

fn render_application_html(
    view: &ApplicationView,
    template_path: &str,
) -> Result<String, std::fmt::Error> {
    let summary = view.summary();
    let mut html = String::new();

    writeln!(
        html,
        "<meta name=\"template\" content=\"{}\">",
        escape_html(template_path)
    )?;
    writeln!(
        html,
        "<h1>Application {}</h1>",
        escape_html(&summary.reference_number)
    )?;
    writeln!(
        html,
        "<p>Status: {}</p>",
        escape_html(summary.state_description)
    )?;
    writeln!(html, "<p>Applicant: {}</p>", escape_html(&summary.full_name))?;
    writeln!(
        html,
        "<p>Applied on: {}</p>",
        summary.applied_on.format("%d %B %Y")
    )?;

    if let ApplicationView::InReview(in_review) = view {
        writeln!(
            html,
            "<p class=\"review\">{}</p>",
            escape_html(&in_review.in_review_message)
        )?;
        writeln!(
            html,
            "<p>Review opened on {}</p>",
            in_review.current_review.opened_on.format("%d %B %Y")
        )?;
    }

    if let Some(portfolio) = view.portfolio() {
        render_portfolio(&mut html, portfolio)?;
    }

    writeln!(
        html,
        "<p>Questions? Contact us at {}.</p>",
        escape_html(&summary.support_email)
    )?;
    writeln!(html, "<p>{}</p>", escape_html(&summary.signature))?;

    Ok(html)
}

fn render_portfolio(html: &mut String, portfolio: &PortfolioSection) -> std::fmt::Result {
    if let Some(entity) = &portfolio.legal_entity {
        writeln!(
            html,
            "<h2>Legal entity</h2><p>{} ({})</p>",
            escape_html(&entity.registered_name),
            escape_html(&entity.registration_number)
        )?;
    }

    html.push_str("<h2>Portfolio</h2><table><tr><th>Fund</th><th>Amount</th><th>Fees</th></tr>");
    for fund in &portfolio.portfolio_funds {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&fund.name),
            currency(fund.amount),
            currency(fund.fees)
        )?;
    }
    html.push_str("</table>");

    writeln!(
        html,
        "<p>Portfolio total: {}</p>",
        currency(portfolio.portfolio_total)
    )
}

fn currency(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wraps markup in a print-ready HTML document whose `@page` rules carry the layout options.
///
/// Hand the output to any HTML-to-PDF engine that understands CSS paged media.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PrintableHtmlConverter;

impl DocumentConverter for PrintableHtmlConverter {
    fn convert(&self, markup: &str, layout: &LayoutOptions) -> Result<Vec<u8>, ConversionError> {
        let counter = match layout.page_numbering {
            PageNumbering::Numeric => "counter(page, decimal)",
        };
        let header_pages = match layout.header.repeat {
            HeaderRepeat::FirstPageOnly => "@page :first",
        };

        let mut document = String::new();
        write!(
            document,
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>\
             .document-header {{ position: running(document-header); }}\
             @page {{ @bottom-center {{ content: {counter}; }} }}\
             {header_pages} {{ @top-center {{ content: element(document-header); }} }}\
             </style></head><body>{}{markup}</body></html>",
            layout.header.content
        )
        .map_err(|err| ConversionError::Backend(err.to_string()))?;

        Ok(document.into_bytes())
    }

    fn media_type(&self) -> mime::Mime {
        mime::TEXT_HTML_UTF_8
    }
}

pub(crate) fn build_generator(
    lookup: Arc<dyn ApplicationLookup>,
    config: DocumentConfig,
) -> Result<ApplicationDocumentGenerator, ConstructionError> {
    ApplicationDocumentGenerator::builder()
        .lookup(lookup)
        .templates(Arc::new(StaticTemplateResolver::default()))
        .renderer(Arc::new(HtmlMarkupRenderer))
        .converter(Arc::new(PrintableHtmlConverter))
        .config(config)
        .build()
}
