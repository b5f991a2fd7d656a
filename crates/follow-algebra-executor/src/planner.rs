//! Fetch planning for group expressions.
//!
//! A [`FetchPlan`] lists the distinct fetches an expression needs without
//! touching the network, so a caller can see what deduplication saves
//! before spending rate-limited requests.

use std::fmt;

use follow_algebra::{DataRequest, GroupExpr};

/// The fetches required to evaluate one expression.
///
/// # Example
///
/// ```rust
/// use follow_algebra::parse;
/// use follow_algebra_executor::FetchPlan;
///
/// let expr = parse("a.followers & ~a.followers | b/team").unwrap();
/// let plan = FetchPlan::for_expression(&expr);
///
/// assert_eq!(plan.references, 3);
/// assert_eq!(plan.fetches.len(), 2);
/// assert_eq!(plan.deduplicated(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    /// Canonical text of the planned expression.
    pub expression: String,
    /// Distinct fetches in first-reference order.
    pub fetches: Vec<PlannedFetch>,
    /// Number of primitive occurrences in the expression.
    pub references: usize,
}

/// One distinct fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFetch {
    /// Cache key shared by every occurrence.
    pub cache_key: String,
    /// Client call that will be made.
    pub operation: &'static str,
    /// How many times the expression references this key.
    pub occurrences: usize,
}

impl FetchPlan {
    /// Plans the fetches for `expr`.
    pub fn for_expression(expr: &GroupExpr) -> Self {
        let mut plan = FetchPlan {
            expression: expr.to_string(),
            fetches: Vec::new(),
            references: 0,
        };

        expr.for_each_primitive(&mut |node| {
            let (Some(cache_key), Some(request)) = (node.cache_key(), node.data_request()) else {
                return;
            };
            plan.references += 1;
            match plan.fetches.iter_mut().find(|f| f.cache_key == cache_key) {
                Some(existing) => existing.occurrences += 1,
                None => plan.fetches.push(PlannedFetch {
                    cache_key,
                    operation: operation_name(request),
                    occurrences: 1,
                }),
            }
        });

        plan
    }

    /// Number of fetches saved by sharing cache keys.
    pub fn deduplicated(&self) -> usize {
        self.references - self.fetches.len()
    }
}

fn operation_name(request: DataRequest<'_>) -> &'static str {
    match request {
        DataRequest::Followers(_) => "follower_ids",
        DataRequest::Following(_) => "friend_ids",
        DataRequest::ListMembers { .. } => "list_members",
        DataRequest::Handles(set) if set.is_empty() => "none",
        DataRequest::Handles(_) => "users_by_handle",
    }
}

impl fmt::Display for FetchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fetch plan for: {}", self.expression)?;
        writeln!(
            f,
            "{} fetches for {} references ({} shared)",
            self.fetches.len(),
            self.references,
            self.deduplicated()
        )?;
        for (i, fetch) in self.fetches.iter().enumerate() {
            write!(f, "  {}. {} {}", i + 1, fetch.operation, fetch.cache_key)?;
            if fetch.occurrences > 1 {
                write!(f, " (x{})", fetch.occurrences)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
