//! Document entity (one source PDF and its processing status)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pdfs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "pdfId")]
    pub pdf_id: i32,

    /// Extracted tables refer to their document by this name
    #[sea_orm(column_name = "pdfName")]
    pub pdf_name: String,

    #[sea_orm(column_name = "pdfSize")]
    pub pdf_size: f64,

    #[sea_orm(column_name = "filingId")]
    pub filing_id: String,

    pub date: DateTimeUtc,

    #[sea_orm(column_name = "totalPages")]
    pub total_pages: i32,

    /// Free-form, written by the review client
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Entity {
    /// Join onto the extracted tables of each document.
    ///
    /// The link is `pdfs.pdfName = tables.pdfName`, not the document id, so a
    /// renamed or duplicated name misattributes tables. It is kept as a plain
    /// join condition rather than a foreign key because the name is not unique.
    pub fn extracted_tables() -> RelationDef {
        Entity::belongs_to(super::extracted_table::Entity)
            .from(Column::PdfName)
            .to(super::extracted_table::Column::PdfName)
            .into()
    }
}

impl ActiveModelBehavior for ActiveModel {}
