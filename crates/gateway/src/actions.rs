//! Dashboard actions and their display-ready outcomes
//!
//! One action arrives per user interaction cycle. Each rendered action
//! button is an explicit (entity kind, entity id, action) event emitted
//! by the UI layer and consumed exactly once; there are no shared click
//! counters to scan or reset.

use scholarlens_common::models::{
    CitedPublication, EntityKind, Faculty, FacultyRatio, KeywordWeight, KrcEntry,
    PublicationWithAuthors, YearRange,
};
use serde::{Deserialize, Serialize};

use crate::presentation::NetworkElements;

/// A single user intent from the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DashboardAction {
    /// Year slider moved; scopes later title searches.
    SetYearFilter { min: i32, max: i32 },

    /// Free-text search over faculty names and publication titles.
    Search { query: String },

    SaveFavorite { kind: EntityKind, id: i64 },

    RemoveFavorite { kind: EntityKind, id: i64 },

    ShowFavorites,

    FacultyCount,

    AffiliationOverview,

    TopKeywords { school: String },

    CalculateKrc { school: String, keyword: String },

    FacultyRatio { institution: String },

    /// Combined insight for one faculty member: top-cited ranking,
    /// keyword frequencies, and the collaboration network.
    PublicationsInsight { faculty_id: i64 },

    /// Anything the dispatcher does not recognize.
    #[serde(other)]
    Unknown,
}

impl DashboardAction {
    /// Stable label for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DashboardAction::SetYearFilter { .. } => "set_year_filter",
            DashboardAction::Search { .. } => "search",
            DashboardAction::SaveFavorite { .. } => "save_favorite",
            DashboardAction::RemoveFavorite { .. } => "remove_favorite",
            DashboardAction::ShowFavorites => "show_favorites",
            DashboardAction::FacultyCount => "faculty_count",
            DashboardAction::AffiliationOverview => "affiliation_overview",
            DashboardAction::TopKeywords { .. } => "top_keywords",
            DashboardAction::CalculateKrc { .. } => "calculate_krc",
            DashboardAction::FacultyRatio { .. } => "faculty_ratio",
            DashboardAction::PublicationsInsight { .. } => "publications_insight",
            DashboardAction::Unknown => "unknown",
        }
    }
}

/// Display-ready result of one dispatched action.
///
/// `Guidance` (bad input) and `NoResults` (valid input, empty answer)
/// are deliberately distinct; neither is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The user needs to adjust their input before anything can run.
    Guidance { message: String },

    /// The query ran but matched nothing.
    NoResults { message: String },

    /// Dispatch fell through every known branch.
    UnknownAction,

    YearFilterApplied {
        range: YearRange,
    },

    SearchResults {
        faculty: Vec<Faculty>,
        publications: Vec<PublicationWithAuthors>,
    },

    FavoriteSaved {
        // Serialized as "entity_kind": the enum's internal tag already
        // occupies the "kind" key on the wire.
        #[serde(rename = "entity_kind")]
        kind: EntityKind,
        id: i64,
    },

    Favorites {
        faculty: Vec<Faculty>,
        publications: Vec<PublicationWithAuthors>,
    },

    FacultyCount {
        count: i64,
    },

    AffiliationOverview {
        count: i64,
        names: Vec<String>,
    },

    TopKeywords {
        school: String,
        keywords: Vec<KeywordWeight>,
    },

    Krc {
        school: String,
        keyword: String,
        entries: Vec<KrcEntry>,
    },

    FacultyRatio {
        institution: String,
        ratio: FacultyRatio,
    },

    PublicationsInsight {
        top_cited: Vec<CitedPublication>,
        keyword_frequencies: Vec<KeywordWeight>,
        network: NetworkElements,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_deserializes_from_tagged_json() {
        let action: DashboardAction =
            serde_json::from_str(r#"{"action": "search", "query": "network"}"#).unwrap();
        assert_eq!(
            action,
            DashboardAction::Search {
                query: "network".to_string()
            }
        );
    }

    #[test]
    fn test_unrecognized_action_maps_to_unknown() {
        let action: DashboardAction =
            serde_json::from_str(r#"{"action": "reticulate_splines"}"#).unwrap();
        assert_eq!(action, DashboardAction::Unknown);
    }

    #[test]
    fn test_save_favorite_event_carries_kind_and_id() {
        let action: DashboardAction = serde_json::from_str(
            r#"{"action": "save_favorite", "kind": "publication", "id": 77}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            DashboardAction::SaveFavorite {
                kind: EntityKind::Publication,
                id: 77
            }
        );
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let outcome = ActionOutcome::Guidance {
            message: "Please enter a search query.".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "guidance");
    }
}
