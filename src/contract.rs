//! Front-matter contract checking.
//!
//! The contract is a JSON Schema shipped with the tool; each document's raw
//! front-matter is validated against it during `validate`. Findings are
//! report data alongside unresolved references, never load errors; the
//! loader already accepted the document, the contract just describes what a
//! well-authored one looks like.

use crate::catalog::identity::DocumentKind;
use crate::document::ParsedDocument;
use anyhow::{Context, Result, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CONTRACT_VERSION: &str = "skill_frontmatter_v1";

/// Compiled front-matter contract.
pub struct FrontMatterContract {
    version: String,
    compiled: JSONSchema,
    // Backing storage for the compiled schema; the validator borrows it for
    // the lifetime of this struct.
    #[allow(dead_code)]
    raw: Arc<Value>,
}

impl FrontMatterContract {
    /// Load and compile the contract schema from disk.
    ///
    /// The contract file carries its own `version` tag, checked against the
    /// allowed set so stale copies cannot silently lint with old rules.
    pub fn load(path: &Path) -> Result<Self> {
        let schema_value: Value = serde_json::from_reader(BufReader::new(
            File::open(path).with_context(|| format!("opening contract {}", path.display()))?,
        ))
        .with_context(|| format!("parsing contract {}", path.display()))?;

        let version = schema_value
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let allowed = allowed_contract_versions();
        if !allowed.contains(&version) {
            bail!(
                "contract version '{}' not in allowed set {:?}",
                version,
                allowed
            );
        }

        let raw = Arc::new(schema_value);
        let raw_static: &'static Value = unsafe { &*(Arc::as_ptr(&raw)) };
        let compiled = JSONSchema::compile(raw_static)
            .with_context(|| format!("compiling contract {}", path.display()))?;

        Ok(Self {
            version,
            compiled,
            raw,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Check every skill and gateway document; index documents are exempt.
    ///
    /// Returns one finding string per violation rather than short-circuiting
    /// so a single run surfaces everything worth fixing.
    pub fn check_all(&self, documents: &[ParsedDocument]) -> Vec<String> {
        let mut findings = Vec::new();
        for doc in documents {
            if DocumentKind::classify(&doc.rel_path) == DocumentKind::Index {
                continue;
            }
            findings.extend(self.check(doc));
        }
        findings
    }

    fn check(&self, doc: &ParsedDocument) -> Vec<String> {
        let display = doc.rel_path.display();
        if doc.front_matter_value.is_null() {
            return vec![format!("{display}: no front-matter block")];
        }
        match self.compiled.validate(&doc.front_matter_value) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| format!("{display}: {err}"))
                .collect(),
        }
    }
}

fn allowed_contract_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([CONTRACT_VERSION.to_string()])
}

/// The contract copy bundled with the tool.
pub fn default_contract_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/frontmatter.schema.json")
}
