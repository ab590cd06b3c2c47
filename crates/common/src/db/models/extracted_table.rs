//! Extracted table entity
//!
//! One region of a document page detected as a table. Rows are written by
//! the ingestion process; relevancy and the chosen CSV are set during review.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tables")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "tableId")]
    pub table_id: String,

    /// Owning document, by name
    #[sea_orm(column_name = "pdfName")]
    pub pdf_name: String,

    pub page: i32,

    #[sea_orm(column_name = "pageWidth")]
    pub page_width: f64,

    #[sea_orm(column_name = "pageHeight")]
    pub page_height: f64,

    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,

    #[sea_orm(column_name = "tableTitle", nullable)]
    pub table_title: Option<String>,

    /// Previous table in a multi-page chain
    #[sea_orm(column_name = "parentTable", nullable)]
    pub parent_table: Option<String>,

    /// 1 for the first table of a chain
    #[sea_orm(column_name = "headTable")]
    pub head_table: i32,

    /// 0 = irrelevant, 1 = relevant
    pub relevancy: i32,

    /// CSV confirmed as the correct extraction; set once validated
    #[sea_orm(column_name = "correct_csv", nullable)]
    #[serde(rename = "correct_csv")]
    pub correct_csv: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
