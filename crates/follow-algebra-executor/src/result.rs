//! Execution results and their printable form.

use std::collections::HashMap;
use std::time::Duration;

use follow_algebra::{GroupSet, UserId};

use crate::traits::User;

/// Stderr marker for an empty finite result.
pub const NOBODY: &str = "(nobody)";

/// Stderr marker for the complement of the empty set.
pub const EVERYBODY: &str = "(everybody)";

/// Result of executing a group expression.
///
/// # Example
///
/// ```ignore
/// let result = executor.execute("alice.following & ~alice.followers")?;
///
/// if result.is_complement() {
///     println!("everybody except {} accounts", result.count());
/// }
/// for id in result.to_vec() {
///     println!("{id}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GroupResult {
    /// The evaluated set.
    pub members: GroupSet,
    /// Execution statistics.
    pub stats: ExecutionStats,
}

impl GroupResult {
    /// Creates a new GroupResult.
    pub fn new(members: GroupSet, stats: ExecutionStats) -> Self {
        Self { members, stats }
    }

    /// Returns true if the result is "everybody except" the listed ids.
    pub fn is_complement(&self) -> bool {
        self.members.is_complement()
    }

    /// Number of listed ids (members, or exclusions for a complement).
    pub fn count(&self) -> usize {
        self.members.ids().len()
    }

    /// Returns true if no ids are listed.
    pub fn is_empty(&self) -> bool {
        self.members.ids().is_empty()
    }

    /// Checks whether `id` belongs to the resulting group.
    pub fn contains(&self, id: UserId) -> bool {
        self.members.contains(id)
    }

    /// Listed ids in ascending order.
    pub fn to_vec(&self) -> Vec<UserId> {
        self.members.to_sorted_vec()
    }
}

/// Statistics from one execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Total execution duration, fetches included.
    pub duration: Duration,
    /// Number of distinct fetches performed.
    pub fetches: usize,
    /// Number of primitive occurrences in the expression.
    pub references: usize,
}

impl ExecutionStats {
    /// Creates new execution stats.
    pub fn new(duration: Duration, fetches: usize, references: usize) -> Self {
        Self {
            duration,
            fetches,
            references,
        }
    }
}

/// Printable form of a [`GroupResult`].
///
/// `lines` go to stdout; `diagnostic` (if any) goes to stderr so that an
/// empty result never pollutes piped output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// One handle per line, sorted case-insensitively, `NOT `-prefixed for a
    /// complement result.
    pub lines: Vec<String>,
    /// `(nobody)` or `(everybody)` for empty results.
    pub diagnostic: Option<&'static str>,
}

impl Report {
    /// Builds the report, naming ids via `users`.
    ///
    /// Ids missing from `users` are shown numerically.
    pub fn build(result: &GroupResult, users: &[User]) -> Self {
        if result.is_empty() {
            let marker = if result.is_complement() { EVERYBODY } else { NOBODY };
            return Report {
                lines: Vec::new(),
                diagnostic: Some(marker),
            };
        }

        let names: HashMap<UserId, &str> = users
            .iter()
            .map(|user| (user.id, user.handle.as_str()))
            .collect();

        let mut handles: Vec<String> = result
            .members
            .ids()
            .iter()
            .map(|id| match names.get(id) {
                Some(handle) => (*handle).to_string(),
                None => id.to_string(),
            })
            .collect();
        handles.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        let prefix = if result.is_complement() { "NOT " } else { "" };
        Report {
            lines: handles
                .into_iter()
                .map(|handle| format!("{prefix}{handle}"))
                .collect(),
            diagnostic: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(members: GroupSet) -> GroupResult {
        GroupResult::new(members, ExecutionStats::default())
    }

    #[test]
    fn test_group_result_accessors() {
        let r = result(GroupSet::finite([300, 100, 200]));
        assert_eq!(r.count(), 3);
        assert!(!r.is_empty());
        assert!(!r.is_complement());
        assert!(r.contains(100));
        assert!(!r.contains(400));
        assert_eq!(r.to_vec(), vec![100, 200, 300]);
    }

    #[test]
    fn test_complement_result_contains() {
        let r = result(GroupSet::excluding([4]));
        assert!(r.is_complement());
        assert!(r.contains(1));
        assert!(!r.contains(4));
    }

    #[test]
    fn test_report_sorts_case_insensitively() {
        let users = vec![
            User::new(1, "zed"),
            User::new(2, "Bob"),
            User::new(3, "alice"),
        ];
        let report = Report::build(&result(GroupSet::finite([1, 2, 3])), &users);
        assert_eq!(report.lines, vec!["alice", "Bob", "zed"]);
        assert!(report.diagnostic.is_none());
    }

    #[test]
    fn test_report_complement_prefix() {
        let users = vec![User::new(4, "dave")];
        let report = Report::build(&result(GroupSet::excluding([4])), &users);
        assert_eq!(report.lines, vec!["NOT dave"]);
    }

    #[test]
    fn test_report_unknown_id_shown_numerically() {
        let report = Report::build(&result(GroupSet::finite([42])), &[]);
        assert_eq!(report.lines, vec!["42"]);
    }

    #[test]
    fn test_report_empty_markers() {
        let nobody = Report::build(&result(GroupSet::nobody()), &[]);
        assert!(nobody.lines.is_empty());
        assert_eq!(nobody.diagnostic, Some(NOBODY));

        let everybody = Report::build(&result(GroupSet::everybody()), &[]);
        assert!(everybody.lines.is_empty());
        assert_eq!(everybody.diagnostic, Some(EVERYBODY));
    }

    #[test]
    fn test_execution_stats() {
        let stats = ExecutionStats::new(Duration::from_millis(50), 2, 3);
        assert_eq!(stats.duration, Duration::from_millis(50));
        assert_eq!(stats.fetches, 2);
        assert_eq!(stats.references, 3);
    }
}
