//! Aggregation pipeline builders
//!
//! Kept as pure functions so stage order is testable without a live
//! store. The keyword `$match` in the KRC pipeline must come AFTER both
//! `$unwind` stages: pre-filtering before the unwinds changes which
//! publications reach the group stage when a faculty has several
//! qualifying keywords.

use bson::{doc, Document};

/// Distinct affiliation ids, counted.
pub(crate) fn affiliation_count_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$affiliation.id" } },
        doc! { "$count": "count" },
    ]
}

/// One name per distinct affiliation id.
pub(crate) fn affiliation_names_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$affiliation.id", "name": { "$first": "$affiliation.name" } } },
        doc! { "$project": { "_id": 0, "name": 1 } },
    ]
}

/// Keyword occurrence counts (not score-weighted) over all publications
/// authored by faculty at one school, descending.
pub(crate) fn top_keywords_pipeline(school: &str, limit: i64) -> Vec<Document> {
    vec![
        doc! { "$match": { "affiliation.name": school } },
        doc! { "$lookup": {
            "from": "publications",
            "localField": "publications",
            "foreignField": "id",
            "as": "pub_data",
        } },
        doc! { "$unwind": "$pub_data" },
        doc! { "$unwind": "$pub_data.keywords" },
        doc! { "$group": {
            "_id": "$pub_data.keywords.name",
            "count": { "$sum": 1 },
        } },
        doc! { "$sort": { "count": -1 } },
        doc! { "$limit": limit },
    ]
}

/// Per-faculty KRC for one (school, keyword) pair: sum of
/// score x numCitations over matching publication keywords, descending.
pub(crate) fn krc_pipeline(school: &str, keyword: &str, limit: i64) -> Vec<Document> {
    vec![
        doc! { "$match": { "affiliation.name": school } },
        doc! { "$lookup": {
            "from": "publications",
            "localField": "publications",
            "foreignField": "id",
            "as": "pub_data",
        } },
        doc! { "$unwind": "$pub_data" },
        doc! { "$unwind": "$pub_data.keywords" },
        doc! { "$match": { "pub_data.keywords.name": keyword } },
        doc! { "$group": {
            "_id": "$name",
            "krc": { "$sum": { "$multiply": ["$pub_data.keywords.score", "$pub_data.numCitations"] } },
        } },
        doc! { "$sort": { "krc": -1 } },
        doc! { "$limit": limit },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_name(stage: &Document) -> &str {
        stage.keys().next().expect("empty pipeline stage")
    }

    #[test]
    fn test_krc_matches_keyword_after_both_unwinds() {
        let pipeline = krc_pipeline("Stanford University", "internet", 10);
        let stages: Vec<&str> = pipeline.iter().map(stage_name).collect();
        assert_eq!(
            stages,
            vec!["$match", "$lookup", "$unwind", "$unwind", "$match", "$group", "$sort", "$limit"]
        );

        // The second $match is the keyword filter, strictly after the unwinds.
        let keyword_match = &pipeline[4];
        assert_eq!(
            keyword_match
                .get_document("$match")
                .unwrap()
                .get_str("pub_data.keywords.name")
                .unwrap(),
            "internet"
        );
    }

    #[test]
    fn test_krc_sums_score_times_citations() {
        let pipeline = krc_pipeline("MIT", "databases", 10);
        let group = pipeline[5].get_document("$group").unwrap();
        let sum = group.get_document("krc").unwrap();
        let multiply = sum.get_document("$sum").unwrap().get_array("$multiply").unwrap();
        assert_eq!(multiply.len(), 2);
    }

    #[test]
    fn test_krc_sorts_descending_and_limits() {
        let pipeline = krc_pipeline("MIT", "databases", 10);
        let sort = pipeline[6].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("krc").unwrap(), -1);
        assert_eq!(pipeline[7].get_i64("$limit").unwrap(), 10);
    }

    #[test]
    fn test_top_keywords_counts_occurrences_not_scores() {
        let pipeline = top_keywords_pipeline("Stanford University", 20);
        let group = pipeline[4].get_document("$group").unwrap();
        let sum = group.get_document("count").unwrap();
        // $sum: 1 — a plain occurrence count, deliberately not score-weighted.
        assert_eq!(sum.get_i32("$sum").unwrap(), 1);
        assert_eq!(pipeline[6].get_i64("$limit").unwrap(), 20);
    }

    #[test]
    fn test_top_keywords_has_no_keyword_filter() {
        let pipeline = top_keywords_pipeline("Stanford University", 20);
        let matches: Vec<&Document> = pipeline
            .iter()
            .filter(|s| s.contains_key("$match"))
            .collect();
        assert_eq!(matches.len(), 1, "only the school match is present");
    }

    #[test]
    fn test_affiliation_count_groups_by_id() {
        let pipeline = affiliation_count_pipeline();
        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$affiliation.id");
    }
}
