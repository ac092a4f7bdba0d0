//! Cross-reference validation over a built catalog.
//!
//! Every raw reference a skill body mentions is normalized to a candidate
//! filename and resolved against the catalog, ignoring whatever path prefix
//! the author wrote. The validator returns findings as data and never mutates
//! the catalog; whether unresolved references fail the run is the caller's
//! decision (`--strict`).

use crate::catalog::{Catalog, SkillId};
use serde::Serialize;
use std::path::Path;

/// Outcome for one raw reference in one skill body.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceFinding {
    pub skill: SkillId,
    pub raw: String,
    /// Slug the reference resolved to (skill id or gateway slug), if any.
    pub resolved: Option<String>,
}

impl ReferenceFinding {
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Full validation report, one finding per reference occurrence.
#[derive(Debug, Default, Serialize)]
pub struct ReferenceReport {
    pub findings: Vec<ReferenceFinding>,
}

impl ReferenceReport {
    pub fn unresolved(&self) -> impl Iterator<Item = &ReferenceFinding> {
        self.findings.iter().filter(|f| !f.is_resolved())
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved().count()
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved_count() == 0
    }
}

/// Check every reference of every skill against the catalog.
///
/// Findings come back in skill-id order (catalog iteration is deterministic)
/// with each skill's references in their original body order.
pub fn validate_references(catalog: &Catalog) -> ReferenceReport {
    let mut report = ReferenceReport::default();
    for skill in catalog.skills() {
        for raw in &skill.references {
            report.findings.push(ReferenceFinding {
                skill: skill.id.clone(),
                raw: raw.clone(),
                resolved: resolve_reference(catalog, raw),
            });
        }
    }
    report
}

/// Resolve one raw reference string to a catalog slug.
///
/// Skill ids are tried first, then gateway slugs, so index documents can link
/// to their `discover-*` siblings without tripping the validator.
pub fn resolve_reference(catalog: &Catalog, raw: &str) -> Option<String> {
    let stem = normalize_reference(raw)?;
    let skill_id = SkillId(stem.clone());
    if catalog.skill(&skill_id).is_some() {
        return Some(stem);
    }
    if catalog
        .gateways()
        .any(|gateway| gateway.slug.0 == stem)
    {
        return Some(stem);
    }
    None
}

/// Normalize a raw reference to the lowercased filename stem used for lookup.
///
/// Strips a leading `cat ` invocation, `./` prefixes, and backticks, then
/// keeps only the final path component. `SKILL.md` references resolve through
/// their directory name, matching slug derivation.
pub fn normalize_reference(raw: &str) -> Option<String> {
    let mut candidate = raw.trim().trim_matches('`').trim();
    if let Some(rest) = candidate.strip_prefix("cat ") {
        candidate = rest.trim();
    }
    candidate = candidate.trim_matches('`');
    while let Some(rest) = candidate.strip_prefix("./") {
        candidate = rest;
    }
    if candidate.is_empty() {
        return None;
    }

    let path = Path::new(candidate);
    let file_name = path.file_name().and_then(|s| s.to_str())?;
    let stem = if file_name.eq_ignore_ascii_case("skill.md") {
        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())?
            .to_ascii_lowercase()
    } else {
        let lower = file_name.to_ascii_lowercase();
        lower.strip_suffix(".md").map(str::to_string).unwrap_or(lower)
    };

    if stem.is_empty() { None } else { Some(stem) }
}
