//! Document index and extraction view handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::AppState;
use tabledesk_common::{
    db::models::{DocumentSummary, ExtractionData},
    errors::{AppError, Result},
};

/// Request for the tables of one document
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionDataRequest {
    #[validate(length(min = 1, max = 255))]
    pub pdf_name: String,
}

/// Every document with its table counts, ordered by document id.
///
/// Any store failure answers 500 with the message as plain text; nothing
/// partial is ever returned.
pub async fn table_index(State(state): State<AppState>) -> Result<Json<Vec<DocumentSummary>>> {
    let summaries = state.repo.document_summaries().await?;
    Ok(Json(summaries))
}

/// Table layouts and status of a single document
pub async fn extraction_data(
    State(state): State<AppState>,
    Json(request): Json<ExtractionDataRequest>,
) -> Result<Json<ExtractionData>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("pdfName".to_string()),
    })?;

    let data = state.repo.extraction_data(&request.pdf_name).await?;

    tracing::debug!(
        pdf_name = %request.pdf_name,
        tables = data.tables.len(),
        "Extraction data loaded"
    );

    Ok(Json(data))
}
