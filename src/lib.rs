//! Shared library for the skilldex CLI.
//!
//! The crate exposes the catalog types and the three operations the binary
//! wires together: loading a corpus into a `Catalog`, validating
//! cross-references, and answering keyword queries. One invocation moves
//! through exactly three states (unloaded, loaded, queried/validated) and
//! the catalog is immutable once built; a re-scan starts from scratch.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod contract;
pub mod document;
pub mod error;
pub mod query;
pub mod reference;

pub use catalog::{
    Catalog, CatalogSummary, CategoryRecord, CategorySlug, DocumentKind, GatewayRecord,
    GatewaySlug, SkillId, SkillRecord, build_catalog, load_catalog,
};
pub use contract::{FrontMatterContract, default_contract_path};
pub use document::{FrontMatter, ParseWarning, ParsedDocument, load_documents};
pub use error::CatalogError;
pub use query::{QueryMatch, run_query};
pub use reference::{ReferenceFinding, ReferenceReport, validate_references};

const CORPUS_DIR: &str = "skills";

/// Returns true when `candidate` holds a skills corpus directory.
fn has_corpus_dir(candidate: &Path) -> bool {
    candidate.join(CORPUS_DIR).is_dir()
}

/// Verifies that an explicit `SKILLDEX_ROOT` hint points at a directory.
fn corpus_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_dir() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if has_corpus_dir(&dir) {
            return Some(dir.join(CORPUS_DIR));
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the corpus root when `--root` is not given.
///
/// Search order: honor `SKILLDEX_ROOT` if it points at a real directory,
/// climb up from the working directory looking for a `skills/` folder, then
/// fall back to the build-time hint. Callers can treat failure as fatal
/// because every command needs a corpus to operate on.
pub fn find_corpus_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var("SKILLDEX_ROOT") {
        if let Some(root) = corpus_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    if let Some(hint) = option_env!("SKILLDEX_ROOT_HINT") {
        if let Some(base) = corpus_from_hint(hint) {
            if has_corpus_dir(&base) {
                return Ok(base.join(CORPUS_DIR));
            }
        }
    }

    bail!(
        "Unable to locate a skills corpus. Pass --root or set SKILLDEX_ROOT to the corpus directory."
    );
}
