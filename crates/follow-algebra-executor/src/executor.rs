//! Group expression executor.

use std::time::Instant;

use follow_algebra::{parse, GroupExpr};
use tracing::info;

use crate::config::ExecutorConfig;
use crate::error::{ExecResult, ExecutorError};
use crate::loader::ConcurrentLoader;
use crate::planner::FetchPlan;
use crate::result::{ExecutionStats, GroupResult, Report};
use crate::traits::{SocialGraphClient, User};

/// Main execution engine.
///
/// Runs the pipeline parse → load → evaluate against any
/// [`SocialGraphClient`], and resolves results back to handles for display.
///
/// # Example
///
/// ```rust
/// use follow_algebra_executor::{GraphSnapshot, GroupExecutor};
///
/// let graph = GraphSnapshot::new()
///     .with_user(1, "carol")
///     .with_following("alice", vec![1, 2, 3])
///     .with_followers("bob", vec![2, 3, 4]);
/// let executor = GroupExecutor::new(&graph);
///
/// let result = executor.execute("alice.following & ~bob.followers").unwrap();
/// assert_eq!(result.to_vec(), vec![1]);
///
/// let report = executor.report(&result).unwrap();
/// assert_eq!(report.lines, vec!["carol"]);
/// ```
pub struct GroupExecutor<'a> {
    /// Source of graph data.
    client: &'a dyn SocialGraphClient,
    /// Executor configuration.
    config: ExecutorConfig,
}

impl<'a> GroupExecutor<'a> {
    /// Creates a new executor with default configuration.
    pub fn new(client: &'a dyn SocialGraphClient) -> Self {
        Self::with_config(client, ExecutorConfig::default())
    }

    /// Creates an executor with custom configuration.
    pub fn with_config(client: &'a dyn SocialGraphClient, config: ExecutorConfig) -> Self {
        Self { client, config }
    }

    /// Returns a reference to the executor configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Parses and executes an expression.
    ///
    /// Syntax and file errors are reported before any fetch is made.
    ///
    /// # Errors
    ///
    /// * [`ExecutorError::Expression`] - the expression is malformed or a
    ///   file literal cannot be read
    /// * [`ExecutorError::Fetch`] - a fetch failed (including rate limits);
    ///   no partial result is produced
    pub fn execute(&self, source: &str) -> ExecResult<GroupResult> {
        let expr = parse(source)?;
        self.execute_ast(&expr)
    }

    /// Executes a pre-parsed expression.
    pub fn execute_ast(&self, expr: &GroupExpr) -> ExecResult<GroupResult> {
        let start = Instant::now();

        let fetched = ConcurrentLoader::new(self.client, &self.config).load(expr)?;
        let members = expr.evaluate(&fetched)?;

        let stats = ExecutionStats::new(start.elapsed(), fetched.len(), expr.primitives().len());
        info!(
            expression = %expr,
            fetches = stats.fetches,
            references = stats.references,
            complement = members.is_complement(),
            count = members.ids().len(),
            elapsed_ms = stats.duration.as_millis() as u64,
            "expression evaluated"
        );
        Ok(GroupResult::new(members, stats))
    }

    /// Parses an expression and reports the fetches it would make, without
    /// making them.
    pub fn explain(&self, source: &str) -> ExecResult<FetchPlan> {
        let expr = parse(source)?;
        Ok(FetchPlan::for_expression(&expr))
    }

    /// Looks up the accounts listed in `result` (members, or exclusions of
    /// a complement).
    pub fn resolve_users(&self, result: &GroupResult) -> ExecResult<Vec<User>> {
        let ids = result.to_vec();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.client.users_by_id(&ids).map_err(ExecutorError::Lookup)
    }

    /// Builds the printable report for `result`.
    pub fn report(&self, result: &GroupResult) -> ExecResult<Report> {
        let users = self.resolve_users(result)?;
        Ok(Report::build(result, &users))
    }
}
