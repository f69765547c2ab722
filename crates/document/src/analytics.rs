//! MongoDB-backed analytics over the faculty/publications collections

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection, Database, IndexModel};
use scholarlens_common::config::DocumentConfig;
use scholarlens_common::errors::{AppError, Result, StoreKind};
use scholarlens_common::metrics::{record_store_error, StoreQueryTimer};
use scholarlens_common::models::{KeywordWeight, KrcEntry};
use tracing::info;

use crate::pipelines;

/// Contract of the Document Aggregation Service.
#[async_trait]
pub trait DocumentAnalytics: Send + Sync {
    /// Check connectivity.
    async fn ping(&self) -> Result<()>;

    /// Total number of faculty documents.
    async fn count_faculty(&self) -> Result<i64>;

    /// Number of distinct affiliation ids.
    async fn count_affiliations(&self) -> Result<i64>;

    /// One name per distinct affiliation.
    async fn list_affiliations(&self) -> Result<Vec<String>>;

    /// Keyword occurrence counts for one school, descending, capped.
    async fn top_keywords_by_school(&self, school: &str, limit: i64)
        -> Result<Vec<KeywordWeight>>;

    /// Per-faculty KRC ranking for one (school, keyword) pair,
    /// descending, capped.
    async fn calculate_krc(
        &self,
        school: &str,
        keyword: &str,
        limit: i64,
    ) -> Result<Vec<KrcEntry>>;
}

/// MongoDB-backed implementation of [`DocumentAnalytics`].
#[derive(Clone)]
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Connect to the document store.
    pub async fn connect(config: &DocumentConfig) -> Result<Self> {
        info!("Connecting to document store...");

        let client = Client::with_uri_str(&config.uri).await.map_err(doc_err)?;
        let db = client.database(&config.database);

        info!(database = %config.database, "Document store connection established");

        Ok(Self { db })
    }

    fn faculty(&self) -> Collection<Document> {
        self.db.collection("faculty")
    }

    fn publications(&self) -> Collection<Document> {
        self.db.collection("publications")
    }

    /// Create the supporting indexes for the aggregation pipelines.
    /// Idempotent; invoked once at startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let faculty_indexes = vec![
            IndexModel::builder().keys(doc! { "affiliation.name": 1 }).build(),
            IndexModel::builder().keys(doc! { "publications": 1 }).build(),
        ];
        let publication_indexes = vec![
            IndexModel::builder().keys(doc! { "id": 1 }).build(),
            IndexModel::builder().keys(doc! { "keywords.name": 1 }).build(),
        ];

        self.faculty()
            .create_indexes(faculty_indexes)
            .await
            .map_err(doc_err)?;
        self.publications()
            .create_indexes(publication_indexes)
            .await
            .map_err(doc_err)?;

        info!("Document store indexes ensured");
        Ok(())
    }

    async fn aggregate_faculty(&self, pipeline: Vec<Document>) -> Result<Vec<Document>> {
        self.faculty()
            .aggregate(pipeline)
            .await
            .map_err(doc_err)?
            .try_collect()
            .await
            .map_err(doc_err)
    }
}

fn doc_err(e: mongodb::error::Error) -> AppError {
    record_store_error(StoreKind::Document);
    AppError::DataSource {
        store: StoreKind::Document,
        message: e.to_string(),
    }
}

/// Aggregation outputs carry numbers as whichever BSON numeric type the
/// server chose; normalize to i64/f64 before handing results on.
fn numeric_as_i64(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Double(n)) => *n as i64,
        _ => 0,
    }
}

fn numeric_as_f64(doc: &Document, key: &str) -> f64 {
    match doc.get(key) {
        Some(Bson::Double(n)) => *n,
        Some(Bson::Int64(n)) => *n as f64,
        Some(Bson::Int32(n)) => f64::from(*n),
        _ => 0.0,
    }
}

#[async_trait]
impl DocumentAnalytics for DocumentStore {
    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await.map_err(doc_err)?;
        Ok(())
    }

    async fn count_faculty(&self) -> Result<i64> {
        let timer = StoreQueryTimer::start(StoreKind::Document, "count_faculty");

        let count = self
            .faculty()
            .count_documents(doc! {})
            .await
            .map_err(doc_err)?;

        timer.finish();
        Ok(count as i64)
    }

    async fn count_affiliations(&self) -> Result<i64> {
        let timer = StoreQueryTimer::start(StoreKind::Document, "count_affiliations");

        let docs = self
            .aggregate_faculty(pipelines::affiliation_count_pipeline())
            .await?;

        // No documents at all means no affiliations.
        let count = docs.first().map(|d| numeric_as_i64(d, "count")).unwrap_or(0);

        timer.finish();
        Ok(count)
    }

    async fn list_affiliations(&self) -> Result<Vec<String>> {
        let timer = StoreQueryTimer::start(StoreKind::Document, "list_affiliations");

        let docs = self
            .aggregate_faculty(pipelines::affiliation_names_pipeline())
            .await?;

        let names = docs
            .iter()
            .filter_map(|d| d.get_str("name").ok().map(str::to_owned))
            .collect();

        timer.finish();
        Ok(names)
    }

    async fn top_keywords_by_school(
        &self,
        school: &str,
        limit: i64,
    ) -> Result<Vec<KeywordWeight>> {
        let timer = StoreQueryTimer::start(StoreKind::Document, "top_keywords_by_school");

        let docs = self
            .aggregate_faculty(pipelines::top_keywords_pipeline(school, limit))
            .await?;

        let keywords = docs
            .iter()
            .filter_map(|d| {
                let keyword = d.get_str("_id").ok()?.to_owned();
                Some(KeywordWeight {
                    keyword,
                    weight: numeric_as_f64(d, "count"),
                })
            })
            .collect();

        timer.finish();
        Ok(keywords)
    }

    async fn calculate_krc(
        &self,
        school: &str,
        keyword: &str,
        limit: i64,
    ) -> Result<Vec<KrcEntry>> {
        let timer = StoreQueryTimer::start(StoreKind::Document, "calculate_krc");

        let docs = self
            .aggregate_faculty(pipelines::krc_pipeline(school, keyword, limit))
            .await?;

        let entries = docs
            .iter()
            .filter_map(|d| {
                let faculty_name = d.get_str("_id").ok()?.to_owned();
                Some(KrcEntry {
                    faculty_name,
                    krc: numeric_as_f64(d, "krc"),
                })
            })
            .collect();

        timer.finish();
        Ok(entries)
    }
}
