//! Repository for the document index and extraction reads
//!
//! All queries are read-only. Each one either returns every row or fails as a
//! whole with [`AppError::Database`].

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::Result;
use crate::metrics;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
};
use std::time::Instant;

/// Repository for data access operations
#[derive(Clone, Debug)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Document Index
    // ========================================================================

    /// One summary per document, ordered by document id.
    ///
    /// Documents are left-joined to their tables by name and grouped by id.
    /// `table_count` counts the table id column so a document without tables
    /// (a single all-NULL joined row) yields 0.
    pub async fn document_summaries(&self) -> Result<Vec<DocumentSummary>> {
        let start = Instant::now();

        let relevancy = || table_col(ExtractedTableColumn::Relevancy);
        let correct_csv = || table_col(ExtractedTableColumn::CorrectCsv);

        let result = DocumentEntity::find()
            .select_only()
            .column_as(DocumentColumn::PdfId, "pdf_id")
            .column_as(DocumentColumn::PdfName, "pdf_name")
            .column_as(DocumentColumn::PdfSize, "pdf_size")
            .column_as(DocumentColumn::FilingId, "filing_id")
            .column_as(DocumentColumn::Date, "date")
            .column_as(DocumentColumn::TotalPages, "total_pages")
            .column_as(DocumentColumn::Status, "status")
            .column_as(count(correct_csv()), "tables_validated")
            .column_as(count_where(relevancy().eq(0)), "tables_irrelevant")
            .column_as(
                count_where(correct_csv().is_null().and(relevancy().eq(1))),
                "tables_not_validated",
            )
            .column_as(count(table_col(ExtractedTableColumn::TableId)), "table_count")
            .join(JoinType::LeftJoin, DocumentEntity::extracted_tables())
            .group_by(DocumentColumn::PdfId)
            .order_by_asc(DocumentColumn::PdfId)
            .into_model::<DocumentSummary>()
            .all(self.conn())
            .await;

        metrics::record_query(
            "document_summaries",
            start.elapsed().as_secs_f64(),
            result.is_ok(),
        );

        let summaries = result?;
        metrics::record_index_size(summaries.len());
        tracing::debug!(documents = summaries.len(), "Document index loaded");

        Ok(summaries)
    }

    // ========================================================================
    // Extraction View
    // ========================================================================

    /// Table layouts of a document (page descending, then top edge) and the
    /// document's status. Both reads run concurrently.
    pub async fn extraction_data(&self, pdf_name: &str) -> Result<ExtractionData> {
        let start = Instant::now();

        let tables = ExtractedTableEntity::find()
            .filter(ExtractedTableColumn::PdfName.eq(pdf_name))
            .order_by_desc(ExtractedTableColumn::Page)
            .order_by_asc(ExtractedTableColumn::Y1)
            .into_partial_model::<TableLayout>()
            .all(self.conn());

        let status = DocumentEntity::find()
            .select_only()
            .column(DocumentColumn::Status)
            .filter(DocumentColumn::PdfName.eq(pdf_name))
            .order_by_asc(DocumentColumn::PdfId)
            .into_tuple::<String>()
            .one(self.conn());

        let result = tokio::try_join!(tables, status);

        metrics::record_query(
            "extraction_data",
            start.elapsed().as_secs_f64(),
            result.is_ok(),
        );

        let (tables, pdf_status) = result?;
        Ok(ExtractionData { tables, pdf_status })
    }
}

fn table_col(column: ExtractedTableColumn) -> Expr {
    Expr::col((ExtractedTableEntity, column))
}

/// `COUNT(expr)`: counts non-NULL values only
fn count<E: Into<SimpleExpr>>(expr: E) -> SimpleExpr {
    Func::count(expr).into()
}

/// `COUNT(CASE WHEN cond THEN 1 END)`
fn count_where(cond: SimpleExpr) -> SimpleExpr {
    count(Expr::case(cond, Expr::val(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::errors::AppError;
    use sea_orm::prelude::DateTimeUtc;
    use sea_orm::{ActiveModelTrait, Set};

    async fn test_repo() -> Repository {
        let config = DatabaseConfig {
            max_connections: 1,
            ..DatabaseConfig::default()
        };
        let pool = DbPool::connect("sqlite::memory:", &config).await.unwrap();
        pool.create_schema().await.unwrap();
        Repository::new(pool)
    }

    fn filed_on() -> DateTimeUtc {
        "2019-06-14T00:00:00Z".parse().unwrap()
    }

    async fn insert_document(repo: &Repository, id: i32, name: &str) {
        DocumentActiveModel {
            pdf_id: Set(id),
            pdf_name: Set(name.to_string()),
            pdf_size: Set(1024.5),
            filing_id: Set(format!("A{}", 1000 + id)),
            date: Set(filed_on()),
            total_pages: Set(40),
            status: Set("new".to_string()),
        }
        .insert(repo.conn())
        .await
        .unwrap();
    }

    async fn insert_table(
        repo: &Repository,
        id: &str,
        pdf_name: &str,
        page: i32,
        y1: f64,
        relevancy: i32,
        correct_csv: Option<&str>,
    ) {
        ExtractedTableActiveModel {
            table_id: Set(id.to_string()),
            pdf_name: Set(pdf_name.to_string()),
            page: Set(page),
            page_width: Set(612.0),
            page_height: Set(792.0),
            x1: Set(36.0),
            y1: Set(y1),
            x2: Set(576.0),
            y2: Set(y1 + 120.0),
            table_title: Set(Some(format!("Table {}", id))),
            parent_table: Set(None),
            head_table: Set(1),
            relevancy: Set(relevancy),
            correct_csv: Set(correct_csv.map(str::to_string)),
        }
        .insert(repo.conn())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_document_without_tables_has_zero_counts() {
        let repo = test_repo().await;
        insert_document(&repo, 1, "A").await;

        let summaries = repo.document_summaries().await.unwrap();

        assert_eq!(summaries.len(), 1);
        let a = &summaries[0];
        assert_eq!(a.pdf_id, 1);
        assert_eq!(a.pdf_name, "A");
        assert_eq!(a.table_count, 0);
        assert_eq!(a.tables_validated, 0);
        assert_eq!(a.tables_irrelevant, 0);
        assert_eq!(a.tables_not_validated, 0);
    }

    #[tokio::test]
    async fn test_counts_by_review_state() {
        let repo = test_repo().await;
        insert_document(&repo, 2, "B").await;
        insert_table(&repo, "b-1", "B", 1, 100.0, 1, None).await;
        insert_table(&repo, "b-2", "B", 2, 100.0, 0, None).await;
        insert_table(&repo, "b-3", "B", 3, 100.0, 1, Some("x.csv")).await;

        let summaries = repo.document_summaries().await.unwrap();

        assert_eq!(summaries.len(), 1);
        let b = &summaries[0];
        assert_eq!(b.table_count, 3);
        assert_eq!(b.tables_validated, 1);
        assert_eq!(b.tables_irrelevant, 1);
        assert_eq!(b.tables_not_validated, 1);
    }

    #[tokio::test]
    async fn test_document_attributes_carried_through() {
        let repo = test_repo().await;
        insert_document(&repo, 7, "Filing 7.pdf").await;
        insert_table(&repo, "t-1", "Filing 7.pdf", 1, 10.0, 1, None).await;

        let summary = repo.document_summaries().await.unwrap().remove(0);

        assert_eq!(summary.pdf_size, 1024.5);
        assert_eq!(summary.filing_id, "A1007");
        assert_eq!(summary.date, filed_on());
        assert_eq!(summary.total_pages, 40);
        assert_eq!(summary.status, "new");
    }

    #[tokio::test]
    async fn test_validated_irrelevant_table_counted_twice() {
        let repo = test_repo().await;
        insert_document(&repo, 1, "C").await;
        // Irrelevant but validated: matches both predicates
        insert_table(&repo, "c-1", "C", 1, 0.0, 0, Some("c1.csv")).await;
        insert_table(&repo, "c-2", "C", 1, 200.0, 0, None).await;
        insert_table(&repo, "c-3", "C", 2, 0.0, 1, None).await;
        insert_table(&repo, "c-4", "C", 2, 200.0, 1, Some("c4.csv")).await;

        let c = repo.document_summaries().await.unwrap().remove(0);

        assert_eq!(c.table_count, 4);
        assert_eq!(c.tables_validated, 2);
        assert_eq!(c.tables_irrelevant, 2);
        assert_eq!(c.tables_not_validated, 1);
    }

    #[tokio::test]
    async fn test_states_never_exceed_total() {
        let repo = test_repo().await;
        insert_document(&repo, 1, "D").await;
        insert_table(&repo, "d-1", "D", 1, 0.0, 0, None).await;
        insert_table(&repo, "d-2", "D", 1, 50.0, 1, None).await;
        insert_table(&repo, "d-3", "D", 2, 0.0, 1, Some("d3.csv")).await;
        insert_table(&repo, "d-4", "D", 2, 50.0, 1, None).await;

        for s in repo.document_summaries().await.unwrap() {
            assert!(s.tables_validated + s.tables_irrelevant + s.tables_not_validated <= s.table_count);
        }
    }

    #[tokio::test]
    async fn test_ordered_by_document_id() {
        let repo = test_repo().await;
        insert_document(&repo, 3, "third").await;
        insert_document(&repo, 1, "first").await;
        insert_document(&repo, 2, "second").await;
        insert_table(&repo, "s-1", "second", 1, 0.0, 1, None).await;

        let ids: Vec<i32> = repo
            .document_summaries()
            .await
            .unwrap()
            .iter()
            .map(|s| s.pdf_id)
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_tables_attributed_by_name_only() {
        let repo = test_repo().await;
        insert_document(&repo, 1, "E").await;
        insert_table(&repo, "orphan", "not-a-document", 1, 0.0, 1, None).await;

        let summaries = repo.document_summaries().await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].table_count, 0);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let repo = test_repo().await;
        assert!(repo.document_summaries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_query_is_data_access_error() {
        // Connected, but the tables were never created: every read fails
        let config = DatabaseConfig {
            max_connections: 1,
            ..DatabaseConfig::default()
        };
        let pool = DbPool::connect("sqlite::memory:", &config).await.unwrap();
        let repo = Repository::new(pool);

        let err = repo.document_summaries().await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert!(!err.is_startup_error());
        assert!(err.to_string().starts_with("Database error"));

        let err = repo.extraction_data("A").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_summary_json_round_trip() {
        let repo = test_repo().await;
        insert_document(&repo, 2, "B").await;
        insert_table(&repo, "b-1", "B", 1, 0.0, 1, Some("b1.csv")).await;

        let summary = repo.document_summaries().await.unwrap().remove(0);
        let json = serde_json::to_value(&summary).unwrap();

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for field in [
            "pdfId", "pdfName", "pdfSize", "filingId", "date", "totalPages", "status",
            "tablesValidated", "tablesIrrelevant", "tablesNotValidated", "tableCount",
        ] {
            assert!(keys.contains(&field), "missing {}", field);
        }
        assert_eq!(keys.len(), 11);

        let back: DocumentSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }

    #[tokio::test]
    async fn test_extraction_data_order_and_status() {
        let repo = test_repo().await;
        insert_document(&repo, 1, "F").await;
        insert_table(&repo, "f-low", "F", 1, 300.0, 1, None).await;
        insert_table(&repo, "f-top", "F", 1, 20.0, 1, None).await;
        insert_table(&repo, "f-last", "F", 5, 90.0, 0, None).await;
        insert_table(&repo, "g-1", "G", 1, 0.0, 1, None).await;

        let data = repo.extraction_data("F").await.unwrap();

        let ids: Vec<&str> = data.tables.iter().map(|t| t.table_id.as_str()).collect();
        assert_eq!(ids, vec!["f-last", "f-top", "f-low"]);
        assert_eq!(data.pdf_status.as_deref(), Some("new"));
        assert_eq!(data.tables[0].table_title.as_deref(), Some("Table f-last"));
    }

    #[tokio::test]
    async fn test_extraction_data_unknown_document() {
        let repo = test_repo().await;

        let data = repo.extraction_data("missing.pdf").await.unwrap();

        assert!(data.tables.is_empty());
        assert_eq!(data.pdf_status, None);
    }
}
