//! SeaORM entity models
//!
//! Stored entities (`pdfs`, `tables`) and the read models built from them

mod document;
mod extracted_table;
mod summary;

pub use document::{
    Entity as DocumentEntity,
    Model as Document,
    ActiveModel as DocumentActiveModel,
    Column as DocumentColumn,
};

pub use extracted_table::{
    Entity as ExtractedTableEntity,
    Model as ExtractedTable,
    ActiveModel as ExtractedTableActiveModel,
    Column as ExtractedTableColumn,
};

pub use summary::{DocumentSummary, ExtractionData, TableLayout};
