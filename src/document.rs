//! Loading and parsing of markdown skill documents.
//!
//! The loader walks a corpus root for `.md` files and scrapes each one for
//! the metadata the catalog needs (front-matter, triggers, references)
//! without interpreting the prose itself. Parsing is tolerant: documentation
//! authors are humans, so malformed front-matter downgrades to a warning on
//! the document instead of failing the load.

use crate::error::CatalogError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const FRONT_MATTER_DELIM: &str = "---";

/// Typed view of the YAML front-matter fields the catalog consumes.
///
/// Unknown fields are ignored here; the front-matter contract check sees the
/// raw value and can flag them separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Non-fatal problem found while parsing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// Opening `---` with no closing delimiter; front-matter treated as empty.
    UnterminatedFrontMatter,
    /// Front-matter present but not parseable as YAML.
    InvalidYaml(String),
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::UnterminatedFrontMatter => {
                f.write_str("front-matter opened with '---' but never closed")
            }
            ParseWarning::InvalidYaml(detail) => {
                write!(f, "front-matter is not valid YAML: {detail}")
            }
        }
    }
}

/// One parsed document: raw tuple of path, metadata, and body.
///
/// Produced once per load pass and consumed by the catalog builder; nothing
/// here is mutated afterwards.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the corpus root; drives classification and slugs.
    pub rel_path: PathBuf,
    pub front_matter: FrontMatter,
    /// Raw front-matter as JSON for contract linting; `Null` when absent.
    pub front_matter_value: Value,
    pub body: String,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedDocument {
    /// Title fallback chain: front-matter, first `#` heading, file slug.
    pub fn title_or(&self, fallback: &str) -> String {
        if let Some(title) = self.front_matter.title.as_deref() {
            let trimmed = title.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        if let Some(heading) = first_heading(&self.body) {
            return heading;
        }
        fallback.to_string()
    }
}

/// Collect every `.md` file under `root`, sorted for deterministic loads.
///
/// A missing or non-directory root is the one fatal condition at this layer;
/// everything below it is walked recursively.
pub fn collect_markdown_files(root: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    if !root.is_dir() {
        return Err(CatalogError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    let mut files = Vec::new();
    collect_from_dir(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_from_dir(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
    let entries = fs::read_dir(dir).map_err(|err| CatalogError::io(dir, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| CatalogError::io(dir, err))?;
        let path = entry.path();
        if path.is_dir() {
            collect_from_dir(&path, acc)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("md") {
            acc.push(path);
        }
    }
    Ok(())
}

/// Load and parse every markdown document under `root`.
///
/// Unreadable files abort the load (fail fast, per the error policy); parse
/// warnings are logged and attached to the document.
pub fn load_documents(root: &Path) -> Result<Vec<ParsedDocument>, CatalogError> {
    let files = collect_markdown_files(root)?;
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let contents = fs::read_to_string(&path).map_err(|err| CatalogError::io(&path, err))?;
        let rel_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        let doc = parse_document(path.clone(), rel_path, &contents);
        for warning in &doc.warnings {
            tracing::warn!(path = %doc.rel_path.display(), "{warning}");
        }
        documents.push(doc);
    }
    Ok(documents)
}

/// Parse one document body into its front-matter/body split.
pub fn parse_document(path: PathBuf, rel_path: PathBuf, contents: &str) -> ParsedDocument {
    let mut warnings = Vec::new();
    let (raw_front_matter, body) = match split_front_matter(contents) {
        Ok(split) => split,
        Err(warning) => {
            warnings.push(warning);
            (None, contents.to_string())
        }
    };

    let (front_matter, front_matter_value) = match raw_front_matter {
        Some(raw) => parse_front_matter(&raw, &mut warnings),
        None => (FrontMatter::default(), Value::Null),
    };

    ParsedDocument {
        path,
        rel_path,
        front_matter,
        front_matter_value,
        body,
        warnings,
    }
}

/// Split an optional leading `---` front-matter block from the body.
///
/// The opening delimiter must be the very first line. A missing closing
/// delimiter is reported as a warning and the whole text becomes the body,
/// since guessing where metadata ends would silently eat prose.
fn split_front_matter(contents: &str) -> Result<(Option<String>, String), ParseWarning> {
    let mut lines = contents.lines();
    match lines.next() {
        Some(first) if first.trim_end() == FRONT_MATTER_DELIM => {}
        _ => return Ok((None, contents.to_string())),
    }

    let mut front = Vec::new();
    while let Some(line) = lines.next() {
        if line.trim_end() == FRONT_MATTER_DELIM {
            let body: String = lines.collect::<Vec<_>>().join("\n");
            return Ok((Some(front.join("\n")), body));
        }
        front.push(line);
    }
    Err(ParseWarning::UnterminatedFrontMatter)
}

fn parse_front_matter(raw: &str, warnings: &mut Vec<ParseWarning>) -> (FrontMatter, Value) {
    let yaml: serde_yaml::Value = match serde_yaml::from_str(raw) {
        Ok(serde_yaml::Value::Null) => {
            // An empty block between the delimiters is legal, just bare.
            return (FrontMatter::default(), Value::Null);
        }
        Ok(value) => value,
        Err(err) => {
            warnings.push(ParseWarning::InvalidYaml(err.to_string()));
            return (FrontMatter::default(), Value::Null);
        }
    };
    let value = match serde_json::to_value(&yaml) {
        Ok(value) => value,
        Err(err) => {
            warnings.push(ParseWarning::InvalidYaml(err.to_string()));
            return (FrontMatter::default(), Value::Null);
        }
    };
    // Typed extraction is best-effort on top of the raw value; a front-matter
    // block with, say, a string where a list was expected still loads.
    let front_matter = serde_json::from_value(value.clone()).unwrap_or_else(|err| {
        warnings.push(ParseWarning::InvalidYaml(err.to_string()));
        FrontMatter::default()
    });
    (front_matter, value)
}

/// Merge trigger keywords from the front-matter list and the "When to Use"
/// section.
///
/// Canonical rule: front-matter `triggers:` entries and the bullet items of a
/// "When to Use" heading are comma-split, trimmed of backticks and trailing
/// punctuation, lowercased, and deduplicated. Non-bullet prose in the section
/// is ignored; it still ranks via the body digest.
pub fn extract_triggers(front_matter: &FrontMatter, body: &str) -> BTreeSet<String> {
    let mut triggers = BTreeSet::new();
    for entry in &front_matter.triggers {
        push_trigger_phrases(entry, &mut triggers);
    }
    for item in when_to_use_items(body) {
        push_trigger_phrases(&item, &mut triggers);
    }
    triggers
}

fn push_trigger_phrases(entry: &str, acc: &mut BTreeSet<String>) {
    for piece in entry.split(',') {
        let cleaned = piece
            .trim()
            .trim_matches('`')
            .trim_end_matches(['.', ';'])
            .trim()
            .to_lowercase();
        if !cleaned.is_empty() {
            acc.insert(cleaned);
        }
    }
}

fn when_to_use_items(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut in_section = false;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if let Some(heading) = heading_text(trimmed) {
            in_section = heading.to_lowercase().starts_with("when to use");
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            items.push(item.trim().to_string());
        }
    }
    items
}

fn heading_text(line: &str) -> Option<&str> {
    let stripped = line.trim_start_matches('#');
    if stripped.len() == line.len() {
        return None;
    }
    Some(stripped.trim())
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .filter_map(|line| heading_text(line.trim_start()))
        .map(|text| text.to_string())
        .find(|text| !text.is_empty())
}

/// Extract raw reference strings: any token ending in `.md`, in
/// first-occurrence order, deduplicated per document.
///
/// `cat path.md` invocations keep their `cat ` prefix so the validator's
/// normalization rules see the same raw string the author wrote. URL targets
/// are skipped; the catalog only resolves files.
pub fn extract_references(body: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut references = Vec::new();
    for line in body.lines() {
        let mut previous: Option<String> = None;
        for token in line.split([' ', '\t', '(', ')', '[', ']', '<', '>']) {
            let cleaned = clean_token(token);
            if cleaned.is_empty() {
                continue;
            }
            if cleaned.to_lowercase().ends_with(".md") && !cleaned.contains("://") {
                let raw = if previous.as_deref() == Some("cat") {
                    format!("cat {cleaned}")
                } else {
                    cleaned.clone()
                };
                if seen.insert(raw.clone()) {
                    references.push(raw);
                }
            }
            previous = Some(cleaned);
        }
    }
    references
}

// Trims to a fixed point so mixed wrappers like `bar.md`, come out clean.
fn clean_token(token: &str) -> String {
    let mut current = token;
    loop {
        let next = current
            .trim_matches('`')
            .trim_matches('"')
            .trim_matches('\'')
            .trim_end_matches(['.', ',', ';', ':', '!', '?']);
        if next == current {
            return next.to_string();
        }
        current = next;
    }
}
