//! Command line arguments and the run loop behind them.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use follow_algebra_executor::{ExecutorConfig, GraphSnapshot, GroupExecutor};
use tracing::debug;

use crate::error::CliError;

/// Evaluate a follower-group expression against a social graph.
///
/// Members are printed one handle per line, sorted case-insensitively.
/// A result meaning "everybody except" prints each excluded handle
/// prefixed with `NOT `.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Expression, e.g. `alice.following & ~alice.followers`.
    pub expression: Option<String>,

    /// JSON snapshot of the social graph.
    #[arg(short, long, value_name = "FILE")]
    pub graph: Option<PathBuf>,

    /// Log each fetch to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the fetches the expression needs instead of running it.
    #[arg(long)]
    pub explain: bool,

    /// Upper bound on concurrent fetches.
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,
}

impl Cli {
    fn config(&self) -> ExecutorConfig {
        let builder = ExecutorConfig::builder();
        match self.max_concurrency {
            Some(limit) => builder.with_max_concurrency(limit).build(),
            None => builder.build(),
        }
    }
}

/// Reads a graph snapshot from `path`.
pub fn load_snapshot(path: &Path) -> Result<GraphSnapshot, CliError> {
    let file = File::open(path).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs `expression`, writing result lines to `out` and diagnostics to `err`.
pub fn run(
    cli: &Cli,
    expression: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), CliError> {
    if cli.explain {
        let empty = GraphSnapshot::new();
        let plan = GroupExecutor::new(&empty).explain(expression)?;
        write!(out, "{plan}")?;
        return Ok(());
    }

    let path = cli.graph.as_deref().ok_or(CliError::MissingGraph)?;
    let graph = load_snapshot(path)?;
    debug!(path = %path.display(), users = graph.users.len(), "graph snapshot loaded");

    let executor = GroupExecutor::with_config(&graph, cli.config());
    let result = executor.execute(expression)?;
    let report = executor.report(&result)?;

    for line in &report.lines {
        writeln!(out, "{line}")?;
    }
    if let Some(marker) = report.diagnostic {
        writeln!(err, "{marker}")?;
    }
    Ok(())
}
