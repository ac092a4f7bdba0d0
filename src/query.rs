//! Keyword lookup over a built catalog.
//!
//! Scoring is deliberately mechanical: exact trigger hits outrank
//! description substrings, which outrank body-digest substrings, so the same
//! keyword against the same catalog always produces the same ordered list.
//! Anything smarter than substring matching is out of scope for this tool.

use crate::catalog::{Catalog, CategorySlug, SkillId};
use crate::error::CatalogError;
use serde::Serialize;

// Weights are spaced so one stronger signal always beats any combination of
// weaker ones.
const TRIGGER_WEIGHT: u32 = 100;
const DESCRIPTION_WEIGHT: u32 = 10;
const DIGEST_WEIGHT: u32 = 1;

/// One ranked query hit.
#[derive(Debug, Clone, Serialize)]
pub struct QueryMatch {
    pub id: SkillId,
    pub category: CategorySlug,
    pub score: u32,
    pub description: String,
}

/// Score every skill against `keyword` and return matches ordered by
/// descending score, ties broken by category then id.
///
/// An empty (or whitespace-only) keyword is a contract violation; an empty
/// result list is a perfectly valid answer.
pub fn run_query(catalog: &Catalog, keyword: &str) -> Result<Vec<QueryMatch>, CatalogError> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Err(CatalogError::InvalidQuery);
    }

    let mut matches: Vec<QueryMatch> = catalog
        .skills()
        .filter_map(|skill| {
            let mut score = 0;
            if skill.triggers.contains(&keyword) {
                score += TRIGGER_WEIGHT;
            }
            if skill.description.to_lowercase().contains(&keyword) {
                score += DESCRIPTION_WEIGHT;
            }
            if skill.digest.contains(&keyword) {
                score += DIGEST_WEIGHT;
            }
            if score == 0 {
                return None;
            }
            Some(QueryMatch {
                id: skill.id.clone(),
                category: skill.category.clone(),
                score,
                description: skill.description.clone(),
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(matches)
}
