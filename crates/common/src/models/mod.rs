//! Domain models shared across the ScholarLens services
//!
//! Faculty and publications exist in all three backing stores with
//! store-specific shapes; the types here are the merged, display-ready
//! forms the services hand to the orchestrator. No single store is
//! authoritative for every field: the relational store owns profile and
//! contact fields, the document store owns keyword linkage, the graph
//! store owns collaboration edges.

use serde::{Deserialize, Serialize};

/// Faculty profile joined with the affiliation (university) name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    pub position: Option<String>,
    pub research_interest: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub affiliation: String,
}

/// A publication row from the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,
    pub title: String,
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub num_citations: Option<i64>,
}

/// A publication with its author names resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationWithAuthors {
    #[serde(flatten)]
    pub publication: Publication,
    pub authors: Vec<String>,
}

/// A keyword with a numeric weight. The weight is a summed relevance
/// score for relational frequencies, an occurrence count for top-keyword
/// rankings, and a KRC value for relevance contributions; which one is
/// meant is determined by the producing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub keyword: String,
    pub weight: f64,
}

/// One entry of the top-cited ranking for a faculty member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitedPublication {
    pub faculty_name: String,
    pub title: String,
    pub num_citations: i64,
}

/// Keyword Relevance Contribution of one faculty member: the sum of
/// (keyword score x publication citation count) over the faculty's
/// publications carrying the keyword. Non-negative for non-negative
/// inputs; exactly zero when no publication matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrcEntry {
    pub faculty_name: String,
    pub krc: f64,
}

/// Faculty head-counts for one institution against the whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacultyRatio {
    pub total_faculty: i64,
    pub institution_faculty: i64,
    /// institution_faculty / total_faculty; 0.0 when total_faculty is 0.
    pub ratio: f64,
}

/// Derived co-authorship edge between two faculty, weighted by the
/// number of shared publications. Never a self-pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationEdge {
    pub source: String,
    pub target: String,
    pub weight: i64,
}

/// A faculty node ready for node-link rendering, keyed by name.
/// Deduplicated by (name, image) pair upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub image: Option<String>,
}

/// Inclusive publication-year range. Carried explicitly on every scoped
/// query; there is no shared server-side filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

impl Default for YearRange {
    /// The dashboard slider's full span.
    fn default() -> Self {
        Self { min: 1900, max: 2023 }
    }
}

/// Discriminator for favoritable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Faculty,
    Publication,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_inclusive() {
        let range = YearRange::new(1995, 2005).unwrap();
        assert!(range.contains(1995));
        assert!(range.contains(2005));
        assert!(!range.contains(1994));
        assert!(!range.contains(2006));
    }

    #[test]
    fn test_year_range_rejects_inverted_bounds() {
        assert!(YearRange::new(2010, 2000).is_none());
        assert!(YearRange::new(2000, 2000).is_some());
    }

    #[test]
    fn test_entity_kind_serde() {
        let json = serde_json::to_string(&EntityKind::Publication).unwrap();
        assert_eq!(json, "\"publication\"");
        let kind: EntityKind = serde_json::from_str("\"faculty\"").unwrap();
        assert_eq!(kind, EntityKind::Faculty);
    }
}
