//! Top-level CLI for the skill catalog resolver.
//!
//! Usage:
//!   skilldex load --root skills
//!   skilldex validate --root skills --strict
//!   skilldex query --root skills --keyword caching
//!
//! Each subcommand scans the corpus once, operates on the resulting catalog,
//! and exits; nothing is persisted between invocations.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use skilldex::{
    CatalogError, FrontMatterContract, build_catalog, default_contract_path, find_corpus_root,
    load_catalog, load_documents, run_query, validate_references,
};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skilldex")]
#[command(about = "Load, validate, and query a markdown skills corpus")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the catalog and print summary counts.
    Load {
        /// Corpus root; discovered via SKILLDEX_ROOT or upward search when omitted.
        #[arg(long)]
        root: Option<PathBuf>,
        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check cross-references and the front-matter contract.
    Validate {
        #[arg(long)]
        root: Option<PathBuf>,
        /// Exit non-zero when unresolved references exist.
        #[arg(long)]
        strict: bool,
        #[arg(long)]
        json: bool,
    },
    /// Rank skills matching a keyword.
    Query {
        #[arg(long)]
        root: Option<PathBuf>,
        /// Keyword to match against triggers, descriptions, and bodies.
        #[arg(long)]
        keyword: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(exit_code(&err));
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Load { root, json } => run_load(resolve_root(root)?, json),
        Command::Validate { root, strict, json } => run_validate(resolve_root(root)?, strict, json),
        Command::Query { root, keyword, json } => run_query_cmd(resolve_root(root)?, &keyword, json),
    }
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(path) => Ok(path),
        None => find_corpus_root(),
    }
}

fn run_load(root: PathBuf, json: bool) -> Result<i32> {
    let catalog = load_catalog(&root)?;
    let summary = catalog.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(0);
    }

    println!("skills: {}", summary.skills);
    println!("categories: {}", summary.categories);
    println!("gateways: {}", summary.gateways);
    for (category, count) in &summary.per_category {
        println!("  {category}: {count}");
    }
    for gateway in catalog.gateways() {
        println!("gateway {} -> {}", gateway.slug, gateway.target_category);
    }
    Ok(0)
}

fn run_validate(root: PathBuf, strict: bool, json: bool) -> Result<i32> {
    let documents = load_documents(&root)?;
    let contract = FrontMatterContract::load(&default_contract_path())?;
    let contract_findings = contract.check_all(&documents);
    let catalog = build_catalog(&root, documents)?;
    let report = validate_references(&catalog);

    let unresolved = report.unresolved_count();
    // Front-matter findings are informational; only unresolved references
    // participate in the strict exit-code escalation.
    let code = if strict && unresolved > 0 { 1 } else { 0 };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "unresolved": unresolved,
                "findings": report.findings,
                "front_matter": contract_findings,
            }))?
        );
        return Ok(code);
    }

    for finding in report.unresolved() {
        println!("{}: unresolved reference '{}'", finding.skill, finding.raw);
    }
    for finding in &contract_findings {
        println!("front-matter: {finding}");
    }
    if unresolved == 0 && contract_findings.is_empty() {
        println!("validate: PASS ({} reference(s) resolved)", report.findings.len());
    } else {
        println!(
            "validate: {} unresolved reference(s), {} front-matter finding(s)",
            unresolved,
            contract_findings.len()
        );
    }
    Ok(code)
}

fn run_query_cmd(root: PathBuf, keyword: &str, json: bool) -> Result<i32> {
    let catalog = load_catalog(&root)?;
    let matches = run_query(&catalog, keyword)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(0);
    }

    for entry in &matches {
        println!("{}\t{}\t{}", entry.id, entry.score, entry.description);
    }
    Ok(0)
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CatalogError>()
        .map(CatalogError::exit_code)
        .unwrap_or(1)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}
