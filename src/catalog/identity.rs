use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Stable identifier for a skill document, derived from its file path.
///
/// Slugs are lowercased file stems (`postgres-schema-design.md` →
/// `postgres-schema-design`); `SKILL.md` files take their directory's name so
/// folder-per-skill layouts produce the same ids as flat ones.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

/// Category identifier, taken from the parent directory of a skill file.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySlug(pub String);

/// Identifier for a gateway (`discover-*`) index document.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewaySlug(pub String);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CategorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for GatewaySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document role, decided once at classification time and matched
/// exhaustively afterwards.
///
/// `Index` covers README/INDEX files that belong to the corpus but are
/// neither skills nor gateways; they are counted during load and otherwise
/// ignored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocumentKind {
    Skill,
    Gateway,
    Index,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Skill => "skill",
            DocumentKind::Gateway => "gateway",
            DocumentKind::Index => "index",
        }
    }

    /// Classify a document by its path relative to the corpus root.
    ///
    /// Gateways are `discover-*/SKILL.md` or `discover-*.md`; README and
    /// INDEX files are indices; everything else is a skill.
    pub fn classify(rel_path: &Path) -> Self {
        let stem = file_stem_lower(rel_path);
        if stem == "skill" {
            if parent_dir_name(rel_path)
                .map(|dir| dir.starts_with("discover-"))
                .unwrap_or(false)
            {
                return DocumentKind::Gateway;
            }
            return DocumentKind::Skill;
        }
        if stem.starts_with("discover-") {
            return DocumentKind::Gateway;
        }
        if matches!(stem.as_str(), "readme" | "index" | "_index") {
            return DocumentKind::Index;
        }
        DocumentKind::Skill
    }
}

/// Derive the slug for a skill or gateway document.
///
/// Returns `None` only for paths with no usable stem, which the loader never
/// produces for `.md` files.
pub fn slug_from_path(rel_path: &Path) -> Option<String> {
    let stem = file_stem_lower(rel_path);
    if stem.is_empty() {
        return None;
    }
    if stem == "skill" {
        if let Some(dir) = parent_dir_name(rel_path) {
            return Some(dir);
        }
    }
    Some(stem)
}

fn file_stem_lower(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default()
}

fn parent_dir_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_gateway_layouts() {
        assert_eq!(
            DocumentKind::classify(Path::new("discover-api/SKILL.md")),
            DocumentKind::Gateway
        );
        assert_eq!(
            DocumentKind::classify(Path::new("discover-databases.md")),
            DocumentKind::Gateway
        );
        assert_eq!(
            DocumentKind::classify(Path::new("database/SKILL.md")),
            DocumentKind::Skill
        );
    }

    #[test]
    fn classifies_index_and_skill_documents() {
        assert_eq!(
            DocumentKind::classify(Path::new("README.md")),
            DocumentKind::Index
        );
        assert_eq!(
            DocumentKind::classify(Path::new("database/INDEX.md")),
            DocumentKind::Index
        );
        assert_eq!(
            DocumentKind::classify(Path::new("database/postgres-schema-design.md")),
            DocumentKind::Skill
        );
    }

    #[test]
    fn slug_uses_stem_and_skill_md_uses_directory() {
        assert_eq!(
            slug_from_path(Path::new("database/Redis-Patterns.md")),
            Some("redis-patterns".to_string())
        );
        assert_eq!(
            slug_from_path(Path::new("database/caching/SKILL.md")),
            Some("caching".to_string())
        );
        assert_eq!(
            slug_from_path(Path::new("discover-api/SKILL.md")),
            Some("discover-api".to_string())
        );
    }

    #[test]
    fn skill_id_serializes_transparently() {
        let id = SkillId("postgres-schema-design".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"postgres-schema-design\"");
        let back: SkillId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn root_level_skill_md_falls_back_to_stem() {
        assert_eq!(
            slug_from_path(Path::new("SKILL.md")),
            Some("skill".to_string())
        );
    }
}
