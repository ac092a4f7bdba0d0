#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Write one corpus document, creating parent directories as needed.
pub fn write_doc(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture directories");
    }
    fs::write(&path, contents).expect("write fixture document");
}

/// Small corpus shared across tests: two database skills (one referencing the
/// other), a TLS skill, and a gateway for the database category.
pub fn fixture_corpus() -> TempDir {
    let temp = TempDir::new().expect("temp corpus");
    let root = temp.path();
    write_doc(
        root,
        "database/foo.md",
        "---\ndescription: caching\ntriggers: [caching]\n---\n# Foo\nRun cat skills/database/bar.md for details.\n",
    );
    write_doc(
        root,
        "database/bar.md",
        "---\ndescription: connection pooling\n---\n# Bar\n",
    );
    write_doc(
        root,
        "security/tls-config.md",
        "---\ndescription: TLS configuration guidance\n---\n# TLS\n\n## When to Use This Skill\n- certificates, handshake failures\n",
    );
    write_doc(
        root,
        "discover-database.md",
        "---\ndescription: database skill index\ncategory: database\n---\n# Database skills\nSee `foo.md` and `bar.md`.\n",
    );
    temp
}

pub fn skilldex_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_skilldex"))
}

/// Run a command and capture output without asserting on the exit status;
/// callers check the code themselves since non-zero exits are part of the
/// CLI contract under test.
pub fn run_capture(mut cmd: Command) -> Result<Output> {
    cmd.output()
        .with_context(|| format!("failed to run command: {cmd:?}"))
}

/// Run a command that is expected to succeed.
pub fn run_ok(cmd: Command) -> Result<Output> {
    let debug = format!("{cmd:?}");
    let output = run_capture(cmd)?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {} failed: status {:?}\nstdout: {}\nstderr: {}",
            debug,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
