use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use mime::Mime;
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicationId;
use super::generator::{ApplicationDocumentGenerator, DocumentError};
use crate::error::AppError;

/// Shared state for the document routes.
#[derive(Debug, Clone)]
pub struct DocumentRouteState {
    pub generator: Arc<ApplicationDocumentGenerator>,
    /// Used when the request does not name a template base URI.
    pub default_base_uri: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DocumentQuery {
    #[serde(default)]
    pub(crate) base_uri: Option<String>,
}

/// Router builder exposing the document download endpoint.
pub fn document_router(state: DocumentRouteState) -> Router {
    Router::new()
        .route(
            "/api/v1/applications/:application_id/document",
            get(document_handler),
        )
        .with_state(state)
}

pub(crate) async fn document_handler(
    State(state): State<DocumentRouteState>,
    Path(raw_id): Path<String>,
    Query(query): Query<DocumentQuery>,
) -> Result<Response, AppError> {
    let application_id = raw_id
        .parse::<ApplicationId>()
        .map_err(DocumentError::from)?;
    let base_uri = query
        .base_uri
        .unwrap_or_else(|| state.default_base_uri.clone());
    let generator = state.generator.clone();

    let outcome =
        tokio::task::spawn_blocking(move || generator.generate(&application_id, &base_uri))
            .await??;

    let Some(document) = outcome else {
        let payload = json!({
            "application_id": application_id,
            "error": "no document available for this application",
        });
        return Ok((StatusCode::NOT_FOUND, Json(payload)).into_response());
    };

    let media_type = state.generator.media_type();
    let disposition = format!(
        "inline; filename=\"application-{application_id}.{}\"",
        file_extension(&media_type)
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, media_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response())
}

fn file_extension(media_type: &Mime) -> &'static str {
    let subtype = media_type.subtype();
    if subtype == mime::PDF {
        "pdf"
    } else if subtype == mime::HTML {
        "html"
    } else {
        "bin"
    }
}
