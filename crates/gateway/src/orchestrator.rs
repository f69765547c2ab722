//! Aggregation Orchestrator
//!
//! The single entry point behind the dashboard: receives one
//! [`DashboardAction`] per interaction cycle, fans out to the
//! relational, document, and graph query services, and merges the
//! results into one display-ready [`ActionOutcome`].
//!
//! The active year filter lives here, mirroring the dashboard's slider,
//! and is passed as an explicit parameter on every scoped relational
//! query. The ratio lookup calls the Graph Query Service directly
//! in-process; there is no self-addressed HTTP hop.

use std::sync::Arc;
use std::time::Instant;

use scholarlens_common::errors::Result;
use scholarlens_common::metrics::record_action;
use scholarlens_common::models::{EntityKind, Publication, PublicationWithAuthors, YearRange};
use scholarlens_document::DocumentAnalytics;
use scholarlens_graph::GraphQueries;
use scholarlens_relational::RelationalQueries;
use tokio::sync::RwLock;
use tracing::info;

use crate::actions::{ActionOutcome, DashboardAction};
use crate::presentation::build_network;

/// Ranking caps, fixed by the dashboard widgets.
const TOP_CITED_LIMIT: u32 = 5;
const TOP_KEYWORDS_LIMIT: i64 = 20;
const KRC_LIMIT: i64 = 10;

/// Fans user intents out over the three query services.
pub struct Orchestrator {
    relational: Arc<dyn RelationalQueries>,
    document: Arc<dyn DocumentAnalytics>,
    graph: Arc<dyn GraphQueries>,
    /// The year scope title searches run under; follows the slider.
    year_filter: RwLock<YearRange>,
}

impl Orchestrator {
    pub fn new(
        relational: Arc<dyn RelationalQueries>,
        document: Arc<dyn DocumentAnalytics>,
        graph: Arc<dyn GraphQueries>,
    ) -> Self {
        Self {
            relational,
            document,
            graph,
            year_filter: RwLock::new(YearRange::default()),
        }
    }

    /// Dispatch one action and produce its outcome. Bad input becomes a
    /// guidance outcome, an empty answer a no-results outcome; only
    /// store failures surface as errors.
    pub async fn dispatch(&self, action: DashboardAction) -> Result<ActionOutcome> {
        let start = Instant::now();
        let label = action.label();

        let outcome = match action {
            DashboardAction::SetYearFilter { min, max } => self.set_year_filter(min, max).await,
            DashboardAction::Search { query } => self.search(&query).await?,
            DashboardAction::SaveFavorite { kind, id } => self.save_favorite(kind, id).await?,
            DashboardAction::RemoveFavorite { kind, id } => {
                self.remove_favorite(kind, id).await?
            }
            DashboardAction::ShowFavorites => self.show_favorites().await?,
            DashboardAction::FacultyCount => ActionOutcome::FacultyCount {
                count: self.document.count_faculty().await?,
            },
            DashboardAction::AffiliationOverview => self.affiliation_overview().await?,
            DashboardAction::TopKeywords { school } => self.top_keywords(&school).await?,
            DashboardAction::CalculateKrc { school, keyword } => {
                self.calculate_krc(&school, &keyword).await?
            }
            DashboardAction::FacultyRatio { institution } => {
                self.faculty_ratio(&institution).await?
            }
            DashboardAction::PublicationsInsight { faculty_id } => {
                self.publications_insight(faculty_id).await?
            }
            DashboardAction::Unknown => ActionOutcome::UnknownAction,
        };

        record_action(label, start.elapsed().as_secs_f64());
        info!(action = label, latency_ms = start.elapsed().as_millis() as u64, "Action dispatched");

        Ok(outcome)
    }

    async fn set_year_filter(&self, min: i32, max: i32) -> ActionOutcome {
        match YearRange::new(min, max) {
            Some(range) => {
                *self.year_filter.write().await = range;
                ActionOutcome::YearFilterApplied { range }
            }
            None => ActionOutcome::Guidance {
                message: "Year range start must not exceed year range end.".to_string(),
            },
        }
    }

    async fn search(&self, query: &str) -> Result<ActionOutcome> {
        let query = query.trim();
        if query.is_empty() {
            // An empty query is rejected, never treated as match-all.
            return Ok(ActionOutcome::Guidance {
                message: "Please enter a search query and click the search button.".to_string(),
            });
        }

        let range = *self.year_filter.read().await;
        let faculty = self.relational.search_faculty_by_name(query).await?;
        let publications = self
            .relational
            .search_publications_by_title(query, range)
            .await?;

        if faculty.is_empty() && publications.is_empty() {
            return Ok(ActionOutcome::NoResults {
                message: "No results found.".to_string(),
            });
        }

        Ok(ActionOutcome::SearchResults {
            faculty,
            publications: self.with_authors(publications).await?,
        })
    }

    async fn save_favorite(&self, kind: EntityKind, id: i64) -> Result<ActionOutcome> {
        match kind {
            EntityKind::Faculty => self.relational.save_favorite_faculty(id).await?,
            EntityKind::Publication => self.relational.save_favorite_publication(id).await?,
        }
        Ok(ActionOutcome::FavoriteSaved { kind, id })
    }

    async fn remove_favorite(&self, kind: EntityKind, id: i64) -> Result<ActionOutcome> {
        match kind {
            EntityKind::Faculty => self.relational.remove_favorite_faculty(id).await?,
            EntityKind::Publication => self.relational.remove_favorite_publication(id).await?,
        }
        // The favorites panel refreshes in the same cycle as the removal.
        self.show_favorites().await
    }

    async fn show_favorites(&self) -> Result<ActionOutcome> {
        let faculty = self.relational.favorite_faculty().await?;
        let publications = self.relational.favorite_publications().await?;

        Ok(ActionOutcome::Favorites {
            faculty,
            publications: self.with_authors(publications).await?,
        })
    }

    async fn affiliation_overview(&self) -> Result<ActionOutcome> {
        let count = self.document.count_affiliations().await?;
        let names = self.document.list_affiliations().await?;
        Ok(ActionOutcome::AffiliationOverview { count, names })
    }

    async fn top_keywords(&self, school: &str) -> Result<ActionOutcome> {
        let school = school.trim();
        if school.is_empty() {
            return Ok(ActionOutcome::Guidance {
                message: "Please enter a school name.".to_string(),
            });
        }

        let keywords = self
            .document
            .top_keywords_by_school(school, TOP_KEYWORDS_LIMIT)
            .await?;

        if keywords.is_empty() {
            return Ok(ActionOutcome::NoResults {
                message: "No keywords found.".to_string(),
            });
        }

        Ok(ActionOutcome::TopKeywords {
            school: school.to_string(),
            keywords,
        })
    }

    async fn calculate_krc(&self, school: &str, keyword: &str) -> Result<ActionOutcome> {
        let school = school.trim();
        let keyword = keyword.trim();
        if school.is_empty() || keyword.is_empty() {
            return Ok(ActionOutcome::Guidance {
                message: "Please enter both a school name and a keyword.".to_string(),
            });
        }

        let entries = self.document.calculate_krc(school, keyword, KRC_LIMIT).await?;

        if entries.is_empty() {
            return Ok(ActionOutcome::NoResults {
                message: "No results found.".to_string(),
            });
        }

        Ok(ActionOutcome::Krc {
            school: school.to_string(),
            keyword: keyword.to_string(),
            entries,
        })
    }

    async fn faculty_ratio(&self, institution: &str) -> Result<ActionOutcome> {
        let institution = institution.trim();
        if institution.is_empty() {
            return Ok(ActionOutcome::Guidance {
                message: "Please select a university.".to_string(),
            });
        }

        let ratio = self.graph.faculty_ratio(institution).await?;

        Ok(ActionOutcome::FacultyRatio {
            institution: institution.to_string(),
            ratio,
        })
    }

    /// Fan-out merge: relational top-cited ranking and keyword
    /// frequencies plus the graph-store collaboration network, colored
    /// for rendering.
    async fn publications_insight(&self, faculty_id: i64) -> Result<ActionOutcome> {
        let top_cited = self
            .relational
            .top_cited_publications(faculty_id, TOP_CITED_LIMIT)
            .await?;

        if top_cited.is_empty() {
            return Ok(ActionOutcome::NoResults {
                message: "No publications found.".to_string(),
            });
        }

        let keyword_frequencies = self.relational.keyword_frequencies(faculty_id).await?;

        let Some(faculty_name) = self.relational.faculty_name(faculty_id).await? else {
            return Ok(ActionOutcome::NoResults {
                message: "No publications found.".to_string(),
            });
        };

        let nodes = self.graph.collaborator_nodes_of(&faculty_name).await?;
        let edges = self.graph.collaborations_of(&faculty_name).await?;

        Ok(ActionOutcome::PublicationsInsight {
            top_cited,
            keyword_frequencies,
            network: build_network(nodes, edges),
        })
    }

    async fn with_authors(
        &self,
        publications: Vec<Publication>,
    ) -> Result<Vec<PublicationWithAuthors>> {
        let mut enriched = Vec::with_capacity(publications.len());
        for publication in publications {
            let authors = self.relational.authors_of_publication(publication.id).await?;
            enriched.push(PublicationWithAuthors {
                publication,
                authors,
            });
        }
        Ok(enriched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scholarlens_common::models::{
        CitedPublication, CollaborationEdge, Faculty, FacultyRatio, GraphNode, KeywordWeight,
        KrcEntry,
    };
    use scholarlens_common::ANOMALOUS_AUTHORSHIP_PUBLICATION_ID;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn faculty(id: i64, name: &str) -> Faculty {
        Faculty {
            id,
            name: name.to_string(),
            position: Some("Professor".to_string()),
            research_interest: Some("databases".to_string()),
            email: Some(format!("{}@example.edu", name.to_lowercase())),
            phone: None,
            photo_url: None,
            affiliation: "Example University".to_string(),
        }
    }

    fn publication(id: i64, title: &str, year: i32, citations: i64) -> Publication {
        Publication {
            id,
            title: title.to_string(),
            venue: Some("VLDB".to_string()),
            year: Some(year),
            num_citations: Some(citations),
        }
    }

    #[derive(Default)]
    struct MockRelational {
        faculty: Mutex<Vec<Faculty>>,
        publications: Vec<Publication>,
        authors: HashMap<i64, Vec<String>>,
        authored_by: HashMap<i64, Vec<i64>>,
        keyword_weights: Vec<KeywordWeight>,
        favorite_faculty: Mutex<BTreeMap<i64, Faculty>>,
        favorite_publications: Mutex<BTreeMap<i64, Publication>>,
        query_calls: AtomicUsize,
    }

    #[async_trait]
    impl RelationalQueries for MockRelational {
        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn search_faculty_by_name(&self, name: &str) -> Result<Vec<Faculty>> {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            let needle = name.to_lowercase();
            Ok(self
                .faculty
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn search_publications_by_title(
            &self,
            title: &str,
            range: YearRange,
        ) -> Result<Vec<Publication>> {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            let needle = title.to_lowercase();
            Ok(self
                .publications
                .iter()
                .filter(|p| p.title.to_lowercase().contains(&needle))
                .filter(|p| p.year.is_some_and(|y| range.contains(y)))
                .cloned()
                .collect())
        }

        async fn authors_of_publication(&self, publication_id: i64) -> Result<Vec<String>> {
            Ok(self.authors.get(&publication_id).cloned().unwrap_or_default())
        }

        async fn top_cited_publications(
            &self,
            faculty_id: i64,
            limit: u32,
        ) -> Result<Vec<CitedPublication>> {
            let Some(faculty_name) = self.faculty_name(faculty_id).await? else {
                return Ok(Vec::new());
            };
            let pub_ids = self.authored_by.get(&faculty_id).cloned().unwrap_or_default();
            let mut ranked: Vec<CitedPublication> = self
                .publications
                .iter()
                .filter(|p| pub_ids.contains(&p.id))
                .filter(|p| p.id != ANOMALOUS_AUTHORSHIP_PUBLICATION_ID)
                .map(|p| CitedPublication {
                    faculty_name: faculty_name.clone(),
                    title: p.title.clone(),
                    num_citations: p.num_citations.unwrap_or(0),
                })
                .collect();
            ranked.sort_by(|a, b| b.num_citations.cmp(&a.num_citations));
            ranked.truncate(limit as usize);
            Ok(ranked)
        }

        async fn keyword_frequencies(&self, _faculty_id: i64) -> Result<Vec<KeywordWeight>> {
            Ok(self.keyword_weights.clone())
        }

        async fn faculty_name(&self, faculty_id: i64) -> Result<Option<String>> {
            Ok(self
                .faculty
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.id == faculty_id)
                .map(|f| f.name.clone()))
        }

        async fn save_favorite_faculty(&self, faculty_id: i64) -> Result<()> {
            // Snapshot-copies the source row, overwriting on conflict.
            let source = self
                .faculty
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.id == faculty_id)
                .cloned();
            if let Some(row) = source {
                self.favorite_faculty.lock().unwrap().insert(faculty_id, row);
            }
            Ok(())
        }

        async fn save_favorite_publication(&self, publication_id: i64) -> Result<()> {
            let source = self
                .publications
                .iter()
                .find(|p| p.id == publication_id)
                .cloned();
            if let Some(row) = source {
                self.favorite_publications
                    .lock()
                    .unwrap()
                    .insert(publication_id, row);
            }
            Ok(())
        }

        async fn remove_favorite_faculty(&self, faculty_id: i64) -> Result<()> {
            self.favorite_faculty.lock().unwrap().remove(&faculty_id);
            Ok(())
        }

        async fn remove_favorite_publication(&self, publication_id: i64) -> Result<()> {
            self.favorite_publications.lock().unwrap().remove(&publication_id);
            Ok(())
        }

        async fn favorite_faculty(&self) -> Result<Vec<Faculty>> {
            Ok(self.favorite_faculty.lock().unwrap().values().cloned().collect())
        }

        async fn favorite_publications(&self) -> Result<Vec<Publication>> {
            Ok(self
                .favorite_publications
                .lock()
                .unwrap()
                .values()
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct MockDocument {
        faculty_count: i64,
        affiliations: Vec<String>,
        keywords: Vec<KeywordWeight>,
        krc: Vec<KrcEntry>,
    }

    #[async_trait]
    impl DocumentAnalytics for MockDocument {
        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn count_faculty(&self) -> Result<i64> {
            Ok(self.faculty_count)
        }

        async fn count_affiliations(&self) -> Result<i64> {
            Ok(self.affiliations.len() as i64)
        }

        async fn list_affiliations(&self) -> Result<Vec<String>> {
            Ok(self.affiliations.clone())
        }

        async fn top_keywords_by_school(
            &self,
            _school: &str,
            limit: i64,
        ) -> Result<Vec<KeywordWeight>> {
            let mut keywords = self.keywords.clone();
            keywords.truncate(limit as usize);
            Ok(keywords)
        }

        async fn calculate_krc(
            &self,
            _school: &str,
            _keyword: &str,
            limit: i64,
        ) -> Result<Vec<KrcEntry>> {
            let mut entries = self.krc.clone();
            entries.truncate(limit as usize);
            Ok(entries)
        }
    }

    #[derive(Default)]
    struct MockGraph {
        total_faculty: i64,
        institution_faculty: i64,
        edges: Vec<CollaborationEdge>,
        nodes: Vec<GraphNode>,
    }

    #[async_trait]
    impl GraphQueries for MockGraph {
        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn count_institutes(&self) -> Result<i64> {
            Ok(1)
        }

        async fn faculty_ratio(&self, _institution: &str) -> Result<FacultyRatio> {
            Ok(FacultyRatio {
                total_faculty: self.total_faculty,
                institution_faculty: self.institution_faculty,
                ratio: scholarlens_graph::compute_ratio(
                    self.total_faculty,
                    self.institution_faculty,
                ),
            })
        }

        async fn collaborations_of(&self, _name: &str) -> Result<Vec<CollaborationEdge>> {
            Ok(self.edges.clone())
        }

        async fn collaborator_nodes_of(&self, _name: &str) -> Result<Vec<GraphNode>> {
            Ok(self.nodes.clone())
        }
    }

    fn orchestrator(
        relational: MockRelational,
        document: MockDocument,
        graph: MockGraph,
    ) -> (Orchestrator, Arc<MockRelational>) {
        let relational = Arc::new(relational);
        let orchestrator = Orchestrator::new(
            relational.clone(),
            Arc::new(document),
            Arc::new(graph),
        );
        (orchestrator, relational)
    }

    #[tokio::test]
    async fn empty_search_is_guidance_without_store_calls() {
        let (orch, relational) =
            orchestrator(MockRelational::default(), MockDocument::default(), MockGraph::default());

        let outcome = orch
            .dispatch(DashboardAction::Search { query: "   ".to_string() })
            .await
            .unwrap();

        assert!(matches!(outcome, ActionOutcome::Guidance { .. }));
        assert_eq!(relational.query_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn year_filter_scopes_title_search() {
        let relational = MockRelational {
            publications: vec![
                publication(1, "A neural network approach", 1999, 120),
                publication(2, "Network tomography revisited", 2010, 80),
            ],
            ..Default::default()
        };
        let (orch, _) = orchestrator(relational, MockDocument::default(), MockGraph::default());

        orch.dispatch(DashboardAction::SetYearFilter { min: 1995, max: 2005 })
            .await
            .unwrap();
        let outcome = orch
            .dispatch(DashboardAction::Search { query: "network".to_string() })
            .await
            .unwrap();

        let ActionOutcome::SearchResults { publications, .. } = outcome else {
            panic!("expected search results");
        };
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0].publication.year, Some(1999));
    }

    #[tokio::test]
    async fn search_without_filter_uses_full_slider_span() {
        let relational = MockRelational {
            publications: vec![publication(1, "Early network theory", 1950, 10)],
            ..Default::default()
        };
        let (orch, _) = orchestrator(relational, MockDocument::default(), MockGraph::default());

        let outcome = orch
            .dispatch(DashboardAction::Search { query: "network".to_string() })
            .await
            .unwrap();

        let ActionOutcome::SearchResults { publications, .. } = outcome else {
            panic!("expected search results");
        };
        assert_eq!(publications.len(), 1);
    }

    #[tokio::test]
    async fn search_with_no_matches_is_no_results_not_guidance() {
        let (orch, _) =
            orchestrator(MockRelational::default(), MockDocument::default(), MockGraph::default());

        let outcome = orch
            .dispatch(DashboardAction::Search { query: "nothing".to_string() })
            .await
            .unwrap();

        assert!(matches!(outcome, ActionOutcome::NoResults { .. }));
    }

    #[tokio::test]
    async fn inverted_year_range_is_rejected() {
        let (orch, _) =
            orchestrator(MockRelational::default(), MockDocument::default(), MockGraph::default());

        let outcome = orch
            .dispatch(DashboardAction::SetYearFilter { min: 2010, max: 1990 })
            .await
            .unwrap();

        assert!(matches!(outcome, ActionOutcome::Guidance { .. }));
    }

    #[tokio::test]
    async fn favorite_save_is_idempotent_snapshot_upsert() {
        let relational = MockRelational {
            faculty: Mutex::new(vec![faculty(7, "Ada Lovelace")]),
            ..Default::default()
        };
        let (orch, relational) =
            orchestrator(relational, MockDocument::default(), MockGraph::default());

        for _ in 0..2 {
            orch.dispatch(DashboardAction::SaveFavorite {
                kind: EntityKind::Faculty,
                id: 7,
            })
            .await
            .unwrap();
        }

        // The source row changes after the first save; re-saving
        // refreshes the snapshot to the latest attributes.
        relational.faculty.lock().unwrap()[0].position = Some("Emeritus".to_string());
        orch.dispatch(DashboardAction::SaveFavorite {
            kind: EntityKind::Faculty,
            id: 7,
        })
        .await
        .unwrap();

        let outcome = orch.dispatch(DashboardAction::ShowFavorites).await.unwrap();
        let ActionOutcome::Favorites { faculty, .. } = outcome else {
            panic!("expected favorites");
        };
        assert_eq!(faculty.len(), 1);
        assert_eq!(faculty[0].id, 7);
        assert_eq!(faculty[0].position.as_deref(), Some("Emeritus"));
    }

    #[tokio::test]
    async fn remove_favorite_returns_refreshed_view() {
        let relational = MockRelational {
            publications: vec![publication(3, "Query optimization", 2001, 400)],
            authors: HashMap::from([(3, vec!["Ada Lovelace".to_string()])]),
            ..Default::default()
        };
        let (orch, _) = orchestrator(relational, MockDocument::default(), MockGraph::default());

        orch.dispatch(DashboardAction::SaveFavorite {
            kind: EntityKind::Publication,
            id: 3,
        })
        .await
        .unwrap();

        let outcome = orch
            .dispatch(DashboardAction::RemoveFavorite {
                kind: EntityKind::Publication,
                id: 3,
            })
            .await
            .unwrap();

        let ActionOutcome::Favorites { publications, .. } = outcome else {
            panic!("expected favorites");
        };
        assert!(publications.is_empty());
    }

    #[tokio::test]
    async fn unknown_action_is_neutral() {
        let (orch, _) =
            orchestrator(MockRelational::default(), MockDocument::default(), MockGraph::default());

        let outcome = orch.dispatch(DashboardAction::Unknown).await.unwrap();
        assert_eq!(outcome, ActionOutcome::UnknownAction);
    }

    #[tokio::test]
    async fn ratio_lookup_runs_in_process() {
        let graph = MockGraph {
            total_faculty: 200,
            institution_faculty: 37,
            ..Default::default()
        };
        let (orch, _) = orchestrator(MockRelational::default(), MockDocument::default(), graph);

        let outcome = orch
            .dispatch(DashboardAction::FacultyRatio {
                institution: "Stanford University".to_string(),
            })
            .await
            .unwrap();

        let ActionOutcome::FacultyRatio { ratio, .. } = outcome else {
            panic!("expected ratio");
        };
        assert_eq!(ratio.total_faculty, 200);
        assert_eq!(ratio.institution_faculty, 37);
        assert!(ratio.ratio > 0.0 && ratio.ratio <= 1.0);
    }

    #[tokio::test]
    async fn blank_ratio_institution_is_guidance() {
        let (orch, _) =
            orchestrator(MockRelational::default(), MockDocument::default(), MockGraph::default());

        let outcome = orch
            .dispatch(DashboardAction::FacultyRatio {
                institution: "".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, ActionOutcome::Guidance { .. }));
    }

    #[tokio::test]
    async fn krc_requires_both_school_and_keyword() {
        let (orch, _) =
            orchestrator(MockRelational::default(), MockDocument::default(), MockGraph::default());

        let outcome = orch
            .dispatch(DashboardAction::CalculateKrc {
                school: "MIT".to_string(),
                keyword: "  ".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, ActionOutcome::Guidance { .. }));
    }

    #[tokio::test]
    async fn publications_insight_merges_rankings_and_network() {
        let relational = MockRelational {
            faculty: Mutex::new(vec![faculty(7, "Ada Lovelace")]),
            publications: vec![
                publication(1, "Analytical engines", 1990, 500),
                publication(2, "Notes on computation", 1995, 900),
                publication(ANOMALOUS_AUTHORSHIP_PUBLICATION_ID, "Bulk record", 2000, 9999),
            ],
            authored_by: HashMap::from([(
                7,
                vec![1, 2, ANOMALOUS_AUTHORSHIP_PUBLICATION_ID],
            )]),
            keyword_weights: vec![KeywordWeight {
                keyword: "computation".to_string(),
                weight: 12.5,
            }],
            ..Default::default()
        };
        let graph = MockGraph {
            nodes: vec![
                GraphNode {
                    id: "Ada Lovelace".to_string(),
                    label: "Ada Lovelace".to_string(),
                    image: None,
                },
                GraphNode {
                    id: "Charles Babbage".to_string(),
                    label: "Charles Babbage".to_string(),
                    image: None,
                },
            ],
            edges: vec![CollaborationEdge {
                source: "Ada Lovelace".to_string(),
                target: "Charles Babbage".to_string(),
                weight: 2,
            }],
            ..Default::default()
        };
        let (orch, _) = orchestrator(relational, MockDocument::default(), graph);

        let outcome = orch
            .dispatch(DashboardAction::PublicationsInsight { faculty_id: 7 })
            .await
            .unwrap();

        let ActionOutcome::PublicationsInsight {
            top_cited,
            keyword_frequencies,
            network,
        } = outcome
        else {
            panic!("expected insight");
        };

        // The anomalous-authorship record never reaches the ranking.
        assert_eq!(top_cited.len(), 2);
        assert_eq!(top_cited[0].title, "Notes on computation");
        assert!(top_cited.windows(2).all(|w| w[0].num_citations >= w[1].num_citations));

        assert_eq!(keyword_frequencies.len(), 1);

        assert_eq!(network.nodes.len(), 2);
        assert!(network.edges.iter().all(|e| e.source != e.target));
        let node_ids: Vec<&str> = network.nodes.iter().map(|n| n.id.as_str()).collect();
        assert!(network
            .edges
            .iter()
            .all(|e| node_ids.contains(&e.source.as_str()) && node_ids.contains(&e.target.as_str())));
    }

    #[tokio::test]
    async fn publications_insight_for_unknown_faculty_is_no_results() {
        let (orch, _) =
            orchestrator(MockRelational::default(), MockDocument::default(), MockGraph::default());

        let outcome = orch
            .dispatch(DashboardAction::PublicationsInsight { faculty_id: 404 })
            .await
            .unwrap();

        assert!(matches!(outcome, ActionOutcome::NoResults { .. }));
    }
}
