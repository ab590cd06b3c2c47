//! Read models produced by queries rather than stored in a table

use sea_orm::entity::prelude::*;
use sea_orm::{DerivePartialModel, FromQueryResult};
use serde::{Deserialize, Serialize};

/// One row of the document index: a document and counts of its extracted
/// tables by review state.
///
/// Each count is its own conditional aggregate and the buckets overlap: an
/// irrelevant table that carries a CSV is counted as irrelevant and as
/// validated. The three state counts can add up to more or less than
/// `table_count`.
#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub pdf_id: i32,
    pub pdf_name: String,
    pub pdf_size: f64,
    pub filing_id: String,
    pub date: DateTimeUtc,
    pub total_pages: i32,
    pub status: String,
    /// Tables with a correct CSV chosen
    pub tables_validated: i64,
    /// Tables marked irrelevant
    pub tables_irrelevant: i64,
    /// Relevant tables still without a correct CSV
    pub tables_not_validated: i64,
    pub table_count: i64,
}

/// Layout of an extracted table as drawn by the extraction view
#[derive(Clone, Debug, PartialEq, DerivePartialModel, FromQueryResult, Serialize, Deserialize)]
#[sea_orm(entity = "super::extracted_table::Entity")]
#[serde(rename_all = "camelCase")]
pub struct TableLayout {
    pub head_table: i32,
    pub page: i32,
    pub page_height: f64,
    pub page_width: f64,
    pub parent_table: Option<String>,
    pub table_id: String,
    pub table_title: Option<String>,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Everything the extraction view needs for one document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionData {
    pub tables: Vec<TableLayout>,
    /// `None` when no document has that name
    pub pdf_status: Option<String>,
}
