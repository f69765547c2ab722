//! Repository for relational queries and the favorites subset
//!
//! All statements are parameterized raw SQL in the fixed schema below
//! (ids and citation counts are BIGINT, years INT, keyword scores
//! DOUBLE PRECISION):
//!
//! - `faculty(id, name, position, research_interest, email, phone, photo_url, university_id)`
//! - `university(id, name)`
//! - `publication(id, title, venue, year, num_citations)`
//! - `faculty_publication(faculty_id, publication_id)`
//! - `keyword(id, name)` / `publication_keyword(publication_id, keyword_id, score)`
//! - `favorite_faculty` / `favorite_publication` (created lazily, see below)

use async_trait::async_trait;
use scholarlens_common::errors::{AppError, Result, StoreKind};
use scholarlens_common::metrics::{record_store_error, StoreQueryTimer};
use scholarlens_common::models::{
    CitedPublication, Faculty, KeywordWeight, Publication, YearRange,
};
use scholarlens_common::ANOMALOUS_AUTHORSHIP_PUBLICATION_ID;
use sea_orm::{ConnectionTrait, DbBackend, QueryResult, Statement, Value};

use crate::pool::DbPool;

/// Contract of the Relational Query Service.
#[async_trait]
pub trait RelationalQueries: Send + Sync {
    /// Check connectivity.
    async fn ping(&self) -> Result<()>;

    /// Case-insensitive substring match on faculty name, joined with the
    /// affiliation name. Capped by the configured search limit.
    async fn search_faculty_by_name(&self, name: &str) -> Result<Vec<Faculty>>;

    /// Case-insensitive substring match on publication title, scoped to
    /// the given inclusive year range. The range is an explicit parameter
    /// on every call.
    async fn search_publications_by_title(
        &self,
        title: &str,
        range: YearRange,
    ) -> Result<Vec<Publication>>;

    /// Author names of one publication.
    async fn authors_of_publication(&self, publication_id: i64) -> Result<Vec<String>>;

    /// Top publications of a faculty member by citation count.
    async fn top_cited_publications(
        &self,
        faculty_id: i64,
        limit: u32,
    ) -> Result<Vec<CitedPublication>>;

    /// Summed keyword score per keyword over a faculty's publications,
    /// ascending by sum.
    async fn keyword_frequencies(&self, faculty_id: i64) -> Result<Vec<KeywordWeight>>;

    /// Faculty name lookup, used to key graph-store traversals.
    async fn faculty_name(&self, faculty_id: i64) -> Result<Option<String>>;

    /// Snapshot-copy a faculty row into the favorites table (upsert).
    async fn save_favorite_faculty(&self, faculty_id: i64) -> Result<()>;

    /// Snapshot-copy a publication row into the favorites table (upsert).
    async fn save_favorite_publication(&self, publication_id: i64) -> Result<()>;

    async fn remove_favorite_faculty(&self, faculty_id: i64) -> Result<()>;

    async fn remove_favorite_publication(&self, publication_id: i64) -> Result<()>;

    /// All favorite faculty, joined with the affiliation name.
    async fn favorite_faculty(&self) -> Result<Vec<Faculty>>;

    /// All favorite publications.
    async fn favorite_publications(&self) -> Result<Vec<Publication>>;
}

/// Postgres-backed implementation of [`RelationalQueries`].
#[derive(Clone)]
pub struct RelationalStore {
    pool: DbPool,
    search_limit: u32,
}

const SEARCH_FACULTY_SQL: &str = r#"
    SELECT f.id, f.name, f.position, f.research_interest, f.email,
           f.phone, f.photo_url, u.name AS university
    FROM faculty f
    JOIN university u ON f.university_id = u.id
    WHERE f.name ILIKE $1
    ORDER BY f.name
    LIMIT $2
"#;

const SEARCH_PUBLICATIONS_SQL: &str = r#"
    SELECT id, title, venue, year, num_citations
    FROM publication
    WHERE title ILIKE $1
      AND year >= $2 AND year <= $3
    ORDER BY num_citations DESC NULLS LAST
    LIMIT $4
"#;

const AUTHORS_SQL: &str = r#"
    SELECT f.name AS author
    FROM faculty f
    JOIN faculty_publication fp ON fp.faculty_id = f.id
    WHERE fp.publication_id = $1
    ORDER BY f.name
"#;

const TOP_CITED_SQL: &str = r#"
    SELECT f.name AS faculty_name, p.title AS title, p.num_citations
    FROM publication p
    JOIN faculty_publication fp ON fp.publication_id = p.id
    JOIN faculty f ON f.id = fp.faculty_id
    WHERE f.id = $1
      AND p.id <> $2
    ORDER BY p.num_citations DESC
    LIMIT $3
"#;

const KEYWORD_FREQUENCIES_SQL: &str = r#"
    SELECT k.name AS keyword, SUM(pk.score) AS weight
    FROM faculty f
    JOIN faculty_publication fp ON fp.faculty_id = f.id
    JOIN publication p ON p.id = fp.publication_id
    JOIN publication_keyword pk ON pk.publication_id = p.id
    JOIN keyword k ON k.id = pk.keyword_id
    WHERE f.id = $1
    GROUP BY k.name
    ORDER BY weight ASC
"#;

const FACULTY_NAME_SQL: &str = "SELECT name FROM faculty WHERE id = $1";

/// Favorites are snapshots: the columns mirror the source row at save
/// time and never follow later updates or deletes of the source.
const CREATE_FAVORITE_FACULTY_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS favorite_faculty (
        id BIGINT PRIMARY KEY,
        name TEXT,
        position TEXT,
        research_interest TEXT,
        email TEXT,
        phone TEXT,
        photo_url TEXT,
        university_id BIGINT
    )
"#;

const CREATE_FAVORITE_PUBLICATION_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS favorite_publication (
        id BIGINT PRIMARY KEY,
        title TEXT,
        venue TEXT,
        year INT,
        num_citations BIGINT
    )
"#;

const SAVE_FAVORITE_FACULTY_SQL: &str = r#"
    INSERT INTO favorite_faculty
        (id, name, position, research_interest, email, phone, photo_url, university_id)
    SELECT id, name, position, research_interest, email, phone, photo_url, university_id
    FROM faculty
    WHERE faculty.id = $1
    ON CONFLICT (id) DO UPDATE SET
        name = EXCLUDED.name,
        position = EXCLUDED.position,
        research_interest = EXCLUDED.research_interest,
        email = EXCLUDED.email,
        phone = EXCLUDED.phone,
        photo_url = EXCLUDED.photo_url,
        university_id = EXCLUDED.university_id
"#;

const SAVE_FAVORITE_PUBLICATION_SQL: &str = r#"
    INSERT INTO favorite_publication (id, title, venue, year, num_citations)
    SELECT id, title, venue, year, num_citations
    FROM publication
    WHERE publication.id = $1
    ON CONFLICT (id) DO UPDATE SET
        title = EXCLUDED.title,
        venue = EXCLUDED.venue,
        year = EXCLUDED.year,
        num_citations = EXCLUDED.num_citations
"#;

const LIST_FAVORITE_FACULTY_SQL: &str = r#"
    SELECT ff.id, ff.name, ff.position, ff.research_interest, ff.email,
           ff.phone, ff.photo_url, u.name AS university
    FROM favorite_faculty ff
    JOIN university u ON ff.university_id = u.id
    ORDER BY ff.name
"#;

const LIST_FAVORITE_PUBLICATIONS_SQL: &str = r#"
    SELECT id, title, venue, year, num_citations
    FROM favorite_publication
    ORDER BY title
"#;

impl RelationalStore {
    /// Create a store over the given pool. `search_limit` caps the
    /// otherwise unbounded name/title searches.
    pub fn new(pool: DbPool, search_limit: u32) -> Self {
        Self { pool, search_limit }
    }

    fn stmt(sql: &str, values: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }

    async fn query_all(&self, sql: &str, values: Vec<Value>) -> Result<Vec<QueryResult>> {
        self.pool
            .conn()
            .query_all(Self::stmt(sql, values))
            .await
            .map_err(db_err)
    }

    async fn execute(&self, sql: &str, values: Vec<Value>) -> Result<()> {
        self.pool
            .conn()
            .execute(Self::stmt(sql, values))
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn ensure_favorite_faculty_table(&self) -> Result<()> {
        self.pool
            .conn()
            .execute_unprepared(CREATE_FAVORITE_FACULTY_SQL)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn ensure_favorite_publication_table(&self) -> Result<()> {
        self.pool
            .conn()
            .execute_unprepared(CREATE_FAVORITE_PUBLICATION_SQL)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

fn db_err(e: sea_orm::DbErr) -> AppError {
    record_store_error(StoreKind::Relational);
    AppError::DataSource {
        store: StoreKind::Relational,
        message: e.to_string(),
    }
}

fn like_pattern(needle: &str) -> String {
    format!("%{}%", needle)
}

fn faculty_from_row(row: &QueryResult) -> Result<Faculty> {
    Ok(Faculty {
        id: row.try_get("", "id").map_err(db_err)?,
        name: row.try_get("", "name").map_err(db_err)?,
        position: row.try_get("", "position").map_err(db_err)?,
        research_interest: row.try_get("", "research_interest").map_err(db_err)?,
        email: row.try_get("", "email").map_err(db_err)?,
        phone: row.try_get("", "phone").map_err(db_err)?,
        photo_url: row.try_get("", "photo_url").map_err(db_err)?,
        affiliation: row.try_get("", "university").map_err(db_err)?,
    })
}

fn publication_from_row(row: &QueryResult) -> Result<Publication> {
    Ok(Publication {
        id: row.try_get("", "id").map_err(db_err)?,
        title: row.try_get("", "title").map_err(db_err)?,
        venue: row.try_get("", "venue").map_err(db_err)?,
        year: row.try_get("", "year").map_err(db_err)?,
        num_citations: row.try_get("", "num_citations").map_err(db_err)?,
    })
}

#[async_trait]
impl RelationalQueries for RelationalStore {
    async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    async fn search_faculty_by_name(&self, name: &str) -> Result<Vec<Faculty>> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "search_faculty_by_name");

        let rows = self
            .query_all(
                SEARCH_FACULTY_SQL,
                vec![like_pattern(name).into(), i64::from(self.search_limit).into()],
            )
            .await?;

        let results = rows.iter().map(faculty_from_row).collect::<Result<Vec<_>>>()?;

        timer.finish();
        Ok(results)
    }

    async fn search_publications_by_title(
        &self,
        title: &str,
        range: YearRange,
    ) -> Result<Vec<Publication>> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "search_publications_by_title");

        let rows = self
            .query_all(
                SEARCH_PUBLICATIONS_SQL,
                vec![
                    like_pattern(title).into(),
                    range.min.into(),
                    range.max.into(),
                    i64::from(self.search_limit).into(),
                ],
            )
            .await?;

        let results = rows
            .iter()
            .map(publication_from_row)
            .collect::<Result<Vec<_>>>()?;

        timer.finish();
        Ok(results)
    }

    async fn authors_of_publication(&self, publication_id: i64) -> Result<Vec<String>> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "authors_of_publication");

        let rows = self.query_all(AUTHORS_SQL, vec![publication_id.into()]).await?;

        let authors = rows
            .iter()
            .map(|row| row.try_get("", "author").map_err(db_err))
            .collect::<Result<Vec<String>>>()?;

        timer.finish();
        Ok(authors)
    }

    async fn top_cited_publications(
        &self,
        faculty_id: i64,
        limit: u32,
    ) -> Result<Vec<CitedPublication>> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "top_cited_publications");

        let rows = self
            .query_all(
                TOP_CITED_SQL,
                vec![
                    faculty_id.into(),
                    ANOMALOUS_AUTHORSHIP_PUBLICATION_ID.into(),
                    i64::from(limit).into(),
                ],
            )
            .await?;

        let results = rows
            .iter()
            .map(|row| {
                Ok(CitedPublication {
                    faculty_name: row.try_get("", "faculty_name").map_err(db_err)?,
                    title: row.try_get("", "title").map_err(db_err)?,
                    num_citations: row.try_get("", "num_citations").map_err(db_err)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        timer.finish();
        Ok(results)
    }

    async fn keyword_frequencies(&self, faculty_id: i64) -> Result<Vec<KeywordWeight>> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "keyword_frequencies");

        let rows = self
            .query_all(KEYWORD_FREQUENCIES_SQL, vec![faculty_id.into()])
            .await?;

        let results = rows
            .iter()
            .map(|row| {
                Ok(KeywordWeight {
                    keyword: row.try_get("", "keyword").map_err(db_err)?,
                    weight: row.try_get("", "weight").map_err(db_err)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        timer.finish();
        Ok(results)
    }

    async fn faculty_name(&self, faculty_id: i64) -> Result<Option<String>> {
        let rows = self.query_all(FACULTY_NAME_SQL, vec![faculty_id.into()]).await?;

        rows.first()
            .map(|row| row.try_get("", "name").map_err(db_err))
            .transpose()
    }

    async fn save_favorite_faculty(&self, faculty_id: i64) -> Result<()> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "save_favorite_faculty");

        self.ensure_favorite_faculty_table().await?;
        self.execute(SAVE_FAVORITE_FACULTY_SQL, vec![faculty_id.into()])
            .await?;

        timer.finish();
        Ok(())
    }

    async fn save_favorite_publication(&self, publication_id: i64) -> Result<()> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "save_favorite_publication");

        self.ensure_favorite_publication_table().await?;
        self.execute(SAVE_FAVORITE_PUBLICATION_SQL, vec![publication_id.into()])
            .await?;

        timer.finish();
        Ok(())
    }

    async fn remove_favorite_faculty(&self, faculty_id: i64) -> Result<()> {
        self.ensure_favorite_faculty_table().await?;
        self.execute(
            "DELETE FROM favorite_faculty WHERE id = $1",
            vec![faculty_id.into()],
        )
        .await
    }

    async fn remove_favorite_publication(&self, publication_id: i64) -> Result<()> {
        self.ensure_favorite_publication_table().await?;
        self.execute(
            "DELETE FROM favorite_publication WHERE id = $1",
            vec![publication_id.into()],
        )
        .await
    }

    async fn favorite_faculty(&self) -> Result<Vec<Faculty>> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "favorite_faculty");

        self.ensure_favorite_faculty_table().await?;
        let rows = self.query_all(LIST_FAVORITE_FACULTY_SQL, vec![]).await?;

        let results = rows.iter().map(faculty_from_row).collect::<Result<Vec<_>>>()?;

        timer.finish();
        Ok(results)
    }

    async fn favorite_publications(&self) -> Result<Vec<Publication>> {
        let timer = StoreQueryTimer::start(StoreKind::Relational, "favorite_publications");

        self.ensure_favorite_publication_table().await?;
        let rows = self.query_all(LIST_FAVORITE_PUBLICATIONS_SQL, vec![]).await?;

        let results = rows
            .iter()
            .map(publication_from_row)
            .collect::<Result<Vec<_>>>()?;

        timer.finish();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("Smith"), "%Smith%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn test_top_cited_excludes_anomalous_publication() {
        // The carve-out rides in as a bound parameter, not inline SQL.
        assert!(TOP_CITED_SQL.contains("p.id <> $2"));
        assert_eq!(ANOMALOUS_AUTHORSHIP_PUBLICATION_ID, i64::from(i32::MAX));
    }

    #[test]
    fn test_keyword_frequencies_sorted_ascending() {
        assert!(KEYWORD_FREQUENCIES_SQL.contains("ORDER BY weight ASC"));
    }

    #[test]
    fn test_title_search_carries_explicit_year_bounds() {
        assert!(SEARCH_PUBLICATIONS_SQL.contains("year >= $2"));
        assert!(SEARCH_PUBLICATIONS_SQL.contains("year <= $3"));
    }

    #[test]
    fn test_favorite_upserts_overwrite_on_conflict() {
        assert!(SAVE_FAVORITE_FACULTY_SQL.contains("ON CONFLICT (id) DO UPDATE"));
        assert!(SAVE_FAVORITE_PUBLICATION_SQL.contains("ON CONFLICT (id) DO UPDATE"));
    }
}
