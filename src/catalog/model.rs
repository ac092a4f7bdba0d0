//! In-memory catalog aggregate built from a skills corpus.
//!
//! The records mirror what the corpus layout expresses on disk: skills grouped
//! by category directories, plus gateway indices pointing at categories. All
//! maps are BTreeMaps so iteration order, and therefore every
//! summary, report, and query result, is deterministic across runs.

use crate::catalog::identity::{CategorySlug, GatewaySlug, SkillId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// One skill document. Immutable after the catalog is built; a re-scan
/// rebuilds the whole catalog rather than patching records in place.
#[derive(Clone, Debug, Serialize)]
pub struct SkillRecord {
    pub id: SkillId,
    pub category: CategorySlug,
    pub title: String,
    pub description: String,
    /// Lowercased keywords used for exact-match scoring.
    pub triggers: BTreeSet<String>,
    /// Raw reference strings in first-occurrence order, deduplicated.
    pub references: Vec<String>,
    /// Path relative to the corpus root.
    pub path: PathBuf,
    /// Lowercased body prefix used for substring scoring; never serialized.
    #[serde(skip)]
    pub digest: String,
}

/// A category directory and the skills it contains, in filesystem order.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryRecord {
    pub slug: CategorySlug,
    pub skills: Vec<SkillId>,
}

/// A `discover-*` index document exposing one category.
#[derive(Clone, Debug, Serialize)]
pub struct GatewayRecord {
    pub slug: GatewaySlug,
    pub target_category: CategorySlug,
    pub path: PathBuf,
}

/// Aggregate root over skills, categories, and gateways.
///
/// Invariants hold by construction: no two skills share an id, every category
/// entry names an extant skill, every gateway targets an extant category.
/// The builder refuses to produce a catalog that violates any of them.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) skills: BTreeMap<SkillId, SkillRecord>,
    pub(crate) categories: BTreeMap<CategorySlug, CategoryRecord>,
    pub(crate) gateways: BTreeMap<GatewaySlug, GatewayRecord>,
}

impl Catalog {
    /// Resolve a skill by id.
    pub fn skill(&self, id: &SkillId) -> Option<&SkillRecord> {
        self.skills.get(id)
    }

    /// Iterate skills in stable id order.
    pub fn skills(&self) -> impl Iterator<Item = &SkillRecord> {
        self.skills.values()
    }

    /// Iterate skill ids in stable order.
    pub fn skill_ids(&self) -> impl Iterator<Item = &SkillId> {
        self.skills.keys()
    }

    pub fn category(&self, slug: &CategorySlug) -> Option<&CategoryRecord> {
        self.categories.get(slug)
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryRecord> {
        self.categories.values()
    }

    pub fn gateways(&self) -> impl Iterator<Item = &GatewayRecord> {
        self.gateways.values()
    }

    /// Counts and per-category breakdown for the `load` summary.
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            skills: self.skills.len(),
            categories: self.categories.len(),
            gateways: self.gateways.len(),
            per_category: self
                .categories
                .values()
                .map(|c| (c.slug.0.clone(), c.skills.len()))
                .collect(),
        }
    }
}

/// Serializable load summary; identical input trees produce identical
/// summaries.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CatalogSummary {
    pub skills: usize,
    pub categories: usize,
    pub gateways: usize,
    pub per_category: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: &str) -> SkillRecord {
        SkillRecord {
            id: SkillId(id.to_string()),
            category: CategorySlug(category.to_string()),
            title: id.to_string(),
            description: String::new(),
            triggers: BTreeSet::new(),
            references: Vec::new(),
            path: PathBuf::from(format!("{category}/{id}.md")),
            digest: String::new(),
        }
    }

    #[test]
    fn summary_counts_per_category() {
        let mut catalog = Catalog::default();
        for (id, cat) in [("foo", "database"), ("bar", "database"), ("tls", "security")] {
            catalog.skills.insert(SkillId(id.to_string()), record(id, cat));
        }
        catalog.categories.insert(
            CategorySlug("database".to_string()),
            CategoryRecord {
                slug: CategorySlug("database".to_string()),
                skills: vec![SkillId("bar".to_string()), SkillId("foo".to_string())],
            },
        );
        catalog.categories.insert(
            CategorySlug("security".to_string()),
            CategoryRecord {
                slug: CategorySlug("security".to_string()),
                skills: vec![SkillId("tls".to_string())],
            },
        );

        let summary = catalog.summary();
        assert_eq!(summary.skills, 3);
        assert_eq!(summary.categories, 2);
        assert_eq!(summary.gateways, 0);
        assert_eq!(summary.per_category.get("database"), Some(&2));
        assert_eq!(summary.per_category.get("security"), Some(&1));
    }

    #[test]
    fn digest_is_not_serialized() {
        let mut rec = record("foo", "database");
        rec.digest = "lowercased body".to_string();
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("digest").is_none());
        assert_eq!(json.get("id").and_then(|v| v.as_str()), Some("foo"));
    }
}
