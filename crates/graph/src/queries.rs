//! Graph traversals: affiliation ratios and co-authorship

use async_trait::async_trait;
use neo4rs::query;
use scholarlens_common::errors::{Result, StoreKind};
use scholarlens_common::metrics::StoreQueryTimer;
use scholarlens_common::models::{CollaborationEdge, FacultyRatio, GraphNode};
use std::collections::BTreeSet;

use crate::client::{graph_err, GraphClient};

const TOTAL_FACULTY_CYPHER: &str = "MATCH (f:FACULTY) RETURN count(f) AS total_faculty";

const INSTITUTION_FACULTY_CYPHER: &str = "MATCH (f:FACULTY)-[:AFFILIATION_WITH]->(i:INSTITUTE {name: $name}) \
     RETURN count(f) AS institution_faculty";

const COUNT_INSTITUTES_CYPHER: &str = "MATCH (i:INSTITUTE) RETURN count(i) AS institute_count";

/// Co-authors of one faculty member: every other faculty publishing at
/// least one shared publication, weighted by the shared count. The
/// `f1.id <> f2.id` guard keeps self-pairs out of the result.
const COLLABORATIONS_CYPHER: &str = "MATCH (f1:FACULTY {name: $name})-[:PUBLISH]->(p:PUBLICATION)<-[:PUBLISH]-(f2:FACULTY) \
     WHERE f1.id <> f2.id \
     RETURN f1.name AS source, f2.name AS target, count(p) AS weight";

const COLLABORATOR_NODES_CYPHER: &str = "MATCH (f:FACULTY {name: $name})-[:PUBLISH]->(p:PUBLICATION)<-[:PUBLISH]-(co:FACULTY) \
     WHERE f.id <> co.id \
     RETURN f.name AS name, f.photoUrl AS photo, co.name AS co_name, co.photoUrl AS co_photo";

/// Contract of the Graph Query Service.
#[async_trait]
pub trait GraphQueries: Send + Sync {
    /// Check connectivity.
    async fn ping(&self) -> Result<()>;

    /// Number of institute nodes in the graph.
    async fn count_institutes(&self) -> Result<i64>;

    /// Head-counts and ratio for one institution; ratio is 0.0 when the
    /// graph holds no faculty at all.
    async fn faculty_ratio(&self, institution: &str) -> Result<FacultyRatio>;

    /// Co-authorship edges for one faculty member.
    async fn collaborations_of(&self, faculty_name: &str) -> Result<Vec<CollaborationEdge>>;

    /// The queried faculty plus every collaborator as render-ready
    /// nodes, deduplicated by (name, photo) pair.
    async fn collaborator_nodes_of(&self, faculty_name: &str) -> Result<Vec<GraphNode>>;
}

/// Neo4j-backed implementation of [`GraphQueries`].
#[derive(Clone)]
pub struct GraphStore {
    client: GraphClient,
}

impl GraphStore {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    async fn count(&self, cypher: &str, column: &str) -> Result<i64> {
        let mut stream = self
            .client
            .graph
            .execute(query(cypher))
            .await
            .map_err(graph_err)?;

        match stream.next().await.map_err(graph_err)? {
            Some(row) => Ok(row.get::<i64>(column).unwrap_or(0)),
            None => Ok(0),
        }
    }
}

/// institution_faculty / total_faculty, defined as 0.0 for an empty
/// graph to avoid a division fault. Always in [0, 1] for consistent
/// counts.
pub fn compute_ratio(total_faculty: i64, institution_faculty: i64) -> f64 {
    if total_faculty == 0 {
        0.0
    } else {
        institution_faculty as f64 / total_faculty as f64
    }
}

/// Collapse (name, photo) pairs into render-ready nodes. One node per
/// distinct pair: a name mapped to several photo values in the store
/// yields several nodes, preserved as-is rather than silently merged
/// (known data hazard, flagged for the data owner).
pub fn dedup_nodes(pairs: impl IntoIterator<Item = (String, Option<String>)>) -> Vec<GraphNode> {
    let unique: BTreeSet<(String, Option<String>)> = pairs.into_iter().collect();
    unique
        .into_iter()
        .map(|(name, photo)| GraphNode {
            id: name.clone(),
            label: name,
            image: photo,
        })
        .collect()
}

#[async_trait]
impl GraphQueries for GraphStore {
    async fn ping(&self) -> Result<()> {
        self.client
            .graph
            .run(query("RETURN 1"))
            .await
            .map_err(graph_err)
    }

    async fn count_institutes(&self) -> Result<i64> {
        let timer = StoreQueryTimer::start(StoreKind::Graph, "count_institutes");
        let count = self.count(COUNT_INSTITUTES_CYPHER, "institute_count").await?;
        timer.finish();
        Ok(count)
    }

    async fn faculty_ratio(&self, institution: &str) -> Result<FacultyRatio> {
        let timer = StoreQueryTimer::start(StoreKind::Graph, "faculty_ratio");

        let total_faculty = self.count(TOTAL_FACULTY_CYPHER, "total_faculty").await?;

        let mut stream = self
            .client
            .graph
            .execute(query(INSTITUTION_FACULTY_CYPHER).param("name", institution))
            .await
            .map_err(graph_err)?;

        let institution_faculty = match stream.next().await.map_err(graph_err)? {
            Some(row) => row.get::<i64>("institution_faculty").unwrap_or(0),
            None => 0,
        };

        timer.finish();
        Ok(FacultyRatio {
            total_faculty,
            institution_faculty,
            ratio: compute_ratio(total_faculty, institution_faculty),
        })
    }

    async fn collaborations_of(&self, faculty_name: &str) -> Result<Vec<CollaborationEdge>> {
        let timer = StoreQueryTimer::start(StoreKind::Graph, "collaborations_of");

        let mut stream = self
            .client
            .graph
            .execute(query(COLLABORATIONS_CYPHER).param("name", faculty_name))
            .await
            .map_err(graph_err)?;

        let mut edges = Vec::new();
        while let Some(row) = stream.next().await.map_err(graph_err)? {
            let source: String = row.get("source").unwrap_or_default();
            let target: String = row.get("target").unwrap_or_default();
            let weight: i64 = row.get("weight").unwrap_or(0);
            edges.push(CollaborationEdge {
                source,
                target,
                weight,
            });
        }

        timer.finish();
        Ok(edges)
    }

    async fn collaborator_nodes_of(&self, faculty_name: &str) -> Result<Vec<GraphNode>> {
        let timer = StoreQueryTimer::start(StoreKind::Graph, "collaborator_nodes_of");

        let mut stream = self
            .client
            .graph
            .execute(query(COLLABORATOR_NODES_CYPHER).param("name", faculty_name))
            .await
            .map_err(graph_err)?;

        let mut pairs = Vec::new();
        while let Some(row) = stream.next().await.map_err(graph_err)? {
            let name: String = row.get("name").unwrap_or_default();
            let photo: Option<String> = row.get::<String>("photo").ok();
            let co_name: String = row.get("co_name").unwrap_or_default();
            let co_photo: Option<String> = row.get::<String>("co_photo").ok();
            pairs.push((name, photo));
            pairs.push((co_name, co_photo));
        }

        timer.finish();
        Ok(dedup_nodes(pairs))
    }
}
