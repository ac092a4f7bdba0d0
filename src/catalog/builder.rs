//! Catalog construction from parsed documents.
//!
//! The builder is all-or-nothing: either every invariant holds (unique slugs,
//! categories reference extant skills, gateways target extant categories) or
//! the load fails with the offending paths. There is no partial catalog state
//! a caller could observe.

use crate::catalog::identity::{CategorySlug, DocumentKind, GatewaySlug, SkillId, slug_from_path};
use crate::catalog::model::{Catalog, CategoryRecord, GatewayRecord, SkillRecord};
use crate::document::{ParsedDocument, extract_references, extract_triggers, load_documents};
use crate::error::CatalogError;
use std::collections::BTreeMap;
use std::path::Path;

const GATEWAY_PREFIX: &str = "discover-";

/// How much lowercased body text each skill keeps for query scoring.
const DIGEST_LEN: usize = 4096;

/// Reserved category for documents sitting directly in the corpus root.
const ROOT_CATEGORY: &str = "root";

/// Scan `root` and build the catalog in one pass.
pub fn load_catalog(root: &Path) -> Result<Catalog, CatalogError> {
    let documents = load_documents(root)?;
    build_catalog(root, documents)
}

/// Assemble a catalog from already-parsed documents.
///
/// Classification happens exactly once per document; afterwards every record
/// is immutable. Duplicate slugs are fatal because silent shadowing would
/// corrupt id lookups.
pub fn build_catalog(
    root: &Path,
    documents: Vec<ParsedDocument>,
) -> Result<Catalog, CatalogError> {
    if documents.is_empty() {
        return Err(CatalogError::EmptyCatalog {
            path: root.to_path_buf(),
        });
    }

    let mut catalog = Catalog::default();
    let mut category_members: BTreeMap<CategorySlug, Vec<SkillId>> = BTreeMap::new();

    for doc in documents {
        match DocumentKind::classify(&doc.rel_path) {
            DocumentKind::Skill => {
                let record = skill_record(&doc);
                if let Some(existing) = catalog.skills.get(&record.id) {
                    return Err(CatalogError::DuplicateId {
                        id: record.id.0.clone(),
                        first: existing.path.clone(),
                        second: record.path,
                    });
                }
                category_members
                    .entry(record.category.clone())
                    .or_default()
                    .push(record.id.clone());
                catalog.skills.insert(record.id.clone(), record);
            }
            DocumentKind::Gateway => {
                let record = gateway_record(&doc);
                if let Some(existing) = catalog.gateways.get(&record.slug) {
                    return Err(CatalogError::DuplicateId {
                        id: record.slug.0.clone(),
                        first: existing.path.clone(),
                        second: record.path,
                    });
                }
                catalog.gateways.insert(record.slug.clone(), record);
            }
            DocumentKind::Index => {
                tracing::debug!(path = %doc.rel_path.display(), "skipping index document");
            }
        }
    }

    // Documents arrive sorted by path, so member lists are already in
    // filesystem order; the category table itself is keyed deterministically.
    for (slug, skills) in category_members {
        catalog.categories.insert(
            slug.clone(),
            CategoryRecord { slug, skills },
        );
    }

    for gateway in catalog.gateways.values() {
        if !catalog.categories.contains_key(&gateway.target_category) {
            return Err(CatalogError::DanglingGateway {
                gateway: gateway.slug.0.clone(),
                target: gateway.target_category.0.clone(),
            });
        }
    }

    Ok(catalog)
}

fn skill_record(doc: &ParsedDocument) -> SkillRecord {
    let slug = slug_from_path(&doc.rel_path).unwrap_or_default();
    let category = category_for(&doc.rel_path);
    let description = doc
        .front_matter
        .description
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();

    SkillRecord {
        title: doc.title_or(&slug),
        id: SkillId(slug),
        category,
        description,
        triggers: extract_triggers(&doc.front_matter, &doc.body),
        references: extract_references(&doc.body),
        path: doc.rel_path.clone(),
        digest: digest_of(&doc.body),
    }
}

fn gateway_record(doc: &ParsedDocument) -> GatewayRecord {
    let slug = slug_from_path(&doc.rel_path).unwrap_or_default();
    let target = doc
        .front_matter
        .category
        .as_deref()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| slug.strip_prefix(GATEWAY_PREFIX).unwrap_or(&slug).to_string());

    GatewayRecord {
        slug: GatewaySlug(slug),
        target_category: CategorySlug(target),
        path: doc.rel_path.clone(),
    }
}

/// Category assignment: the parent directory name, with `SKILL.md` files
/// looking one level higher since their parent directory is the skill itself.
fn category_for(rel_path: &Path) -> CategorySlug {
    let is_skill_md = rel_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("skill"))
        .unwrap_or(false);

    let mut dir = rel_path.parent();
    if is_skill_md {
        dir = dir.and_then(|p| p.parent());
    }

    let name = dir
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .filter(|s| !s.is_empty());

    CategorySlug(name.unwrap_or_else(|| ROOT_CATEGORY.to_string()))
}

fn digest_of(body: &str) -> String {
    let lowered = body.to_lowercase();
    match lowered.char_indices().nth(DIGEST_LEN) {
        Some((idx, _)) => lowered[..idx].to_string(),
        None => lowered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;
    use std::path::PathBuf;

    fn doc(rel: &str, contents: &str) -> ParsedDocument {
        parse_document(
            PathBuf::from("/corpus").join(rel),
            PathBuf::from(rel),
            contents,
        )
    }

    #[test]
    fn builds_skills_categories_and_gateways() {
        let catalog = build_catalog(
            Path::new("/corpus"),
            vec![
                doc(
                    "database/foo.md",
                    "---\ndescription: caching\n---\n# Foo\n",
                ),
                doc("database/bar.md", "# Bar\n"),
                doc("discover-database.md", "---\ncategory: database\n---\n"),
            ],
        )
        .unwrap();

        assert_eq!(catalog.summary().skills, 2);
        assert_eq!(catalog.summary().categories, 1);
        assert_eq!(catalog.summary().gateways, 1);

        let category = catalog
            .category(&CategorySlug("database".to_string()))
            .unwrap();
        assert_eq!(
            category.skills,
            vec![SkillId("bar".to_string()), SkillId("foo".to_string())]
        );
        for id in &category.skills {
            assert!(catalog.skill(id).is_some());
        }
    }

    #[test]
    fn duplicate_slugs_fail_with_both_paths() {
        let err = build_catalog(
            Path::new("/corpus"),
            vec![
                doc("database/foo.md", "# Foo\n"),
                doc("security/foo.md", "# Other Foo\n"),
            ],
        )
        .unwrap_err();

        match err {
            CatalogError::DuplicateId { id, first, second } => {
                assert_eq!(id, "foo");
                assert_eq!(first, PathBuf::from("database/foo.md"));
                assert_eq!(second, PathBuf::from("security/foo.md"));
            }
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn gateway_target_defaults_to_slug_suffix() {
        let catalog = build_catalog(
            Path::new("/corpus"),
            vec![
                doc("database/foo.md", "# Foo\n"),
                doc("discover-database/SKILL.md", "# Database index\n"),
            ],
        )
        .unwrap();

        let gateway = catalog.gateways().next().unwrap();
        assert_eq!(gateway.slug.0, "discover-database");
        assert_eq!(gateway.target_category.0, "database");
    }

    #[test]
    fn dangling_gateway_fails_the_build() {
        let err = build_catalog(
            Path::new("/corpus"),
            vec![
                doc("database/foo.md", "# Foo\n"),
                doc("discover-formal-methods.md", "# Formal methods index\n"),
            ],
        )
        .unwrap_err();

        match err {
            CatalogError::DanglingGateway { gateway, target } => {
                assert_eq!(gateway, "discover-formal-methods");
                assert_eq!(target, "formal-methods");
            }
            other => panic!("expected DanglingGateway, got {other:?}"),
        }
    }

    #[test]
    fn empty_corpus_is_fatal() {
        let err = build_catalog(Path::new("/corpus"), Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCatalog { .. }));
    }

    #[test]
    fn skill_md_takes_directory_slug_and_grandparent_category() {
        let catalog = build_catalog(
            Path::new("/corpus"),
            vec![doc("database/caching/SKILL.md", "# Caching\n")],
        )
        .unwrap();

        let skill = catalog.skill(&SkillId("caching".to_string())).unwrap();
        assert_eq!(skill.category.0, "database");
    }

    #[test]
    fn top_level_files_land_in_the_root_category() {
        let catalog = build_catalog(
            Path::new("/corpus"),
            vec![doc("orientation.md", "# Orientation\n")],
        )
        .unwrap();
        let skill = catalog.skill(&SkillId("orientation".to_string())).unwrap();
        assert_eq!(skill.category.0, "root");
    }
}
