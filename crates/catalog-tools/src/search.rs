//! Keyword search over the catalog, backing the generic strategy's `search` tool.

use crate::catalog::EndpointCatalog;
use crate::naming::truncate_chars;
use serde::Serialize;

/// Maximum number of matches returned by one search.
pub const SEARCH_RESULT_LIMIT: usize = 20;
pub const SEARCH_SUMMARY_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub feature: String,
    pub title: String,
    pub method: String,
    pub path: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub results: Vec<SearchMatch>,
    /// Match count before capping; may exceed `results.len()`.
    pub total_found: usize,
}

/// Case-insensitive substring match against title, summary and feature name.
///
/// An empty query matches every endpoint.
#[must_use]
pub fn search(catalog: &EndpointCatalog, query: &str) -> SearchResults {
    let needle = query.to_lowercase();
    let mut results = Vec::new();
    let mut total_found = 0;

    for feature in catalog.features() {
        let feature_hit = feature.name.to_lowercase().contains(&needle);
        for ep in &feature.endpoints {
            let summary = ep.summary().unwrap_or_default();
            let hit = feature_hit
                || ep.title.to_lowercase().contains(&needle)
                || summary.to_lowercase().contains(&needle);
            if !hit {
                continue;
            }

            total_found += 1;
            if results.len() < SEARCH_RESULT_LIMIT {
                results.push(SearchMatch {
                    feature: feature.name.clone(),
                    title: ep.title.clone(),
                    method: ep.method.clone(),
                    path: ep.path.clone(),
                    summary: truncate_chars(summary, SEARCH_SUMMARY_MAX).to_string(),
                });
            }
        }
    }

    SearchResults {
        results,
        total_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> EndpointCatalog {
        let numbers: Vec<_> = (0..30)
            .map(|i| {
                json!({
                    "title": format!("Number Operation {i}"),
                    "method": "GET",
                    "path": format!("/numbers/{i}"),
                    "spec": {"spec": {"summary": "x".repeat(150)}}
                })
            })
            .collect();
        let doc = json!({
            "endpoints": {
                "Locations": [
                    {"title": "Get Location Details", "method": "GET",
                     "path": "/locations/{locationId}",
                     "spec": {"spec": {"summary": "Shows details for a location."}}},
                    {"title": "List Locations", "method": "GET", "path": "/locations"}
                ],
                "People": [
                    {"title": "Get My Own Details", "method": "GET", "path": "/people/me",
                     "spec": {"spec": {"summary": "Show the profile of the authenticated user."}}}
                ],
                "Numbers": numbers
            }
        });
        EndpointCatalog::parse("inline", &doc.to_string()).expect("catalog")
    }

    #[test]
    fn finds_endpoint_by_title_case_insensitively() {
        let out = search(&catalog(), "location");
        assert!(out.results.iter().any(|m| m.title == "Get Location Details"
            && m.feature == "Locations"
            && m.method == "GET"
            && m.path == "/locations/{locationId}"));
        assert_eq!(out.total_found, 2);
    }

    #[test]
    fn matches_summary_and_feature() {
        let by_summary = search(&catalog(), "AUTHENTICATED");
        assert_eq!(by_summary.total_found, 1);
        assert_eq!(by_summary.results[0].title, "Get My Own Details");

        let by_feature = search(&catalog(), "people");
        assert_eq!(by_feature.total_found, 1);
    }

    #[test]
    fn results_capped_but_total_is_true_count() {
        let out = search(&catalog(), "number");
        assert_eq!(out.results.len(), SEARCH_RESULT_LIMIT);
        assert_eq!(out.total_found, 30);
        assert_eq!(out.results[0].summary.chars().count(), SEARCH_SUMMARY_MAX);
    }

    #[test]
    fn empty_query_matches_everything() {
        let out = search(&catalog(), "");
        assert_eq!(out.total_found, 33);
        assert_eq!(out.results.len(), SEARCH_RESULT_LIMIT);
    }

    #[test]
    fn no_match() {
        let out = search(&catalog(), "voicemail");
        assert!(out.results.is_empty());
        assert_eq!(out.total_found, 0);
    }
}
