//! End-to-end tests for group expression execution.
//!
//! These tests cover the algebraic laws, fetch deduplication and failure
//! propagation against a mock social graph.

use std::collections::{HashMap, HashSet};

use chrono::{TimeZone, Utc};
use follow_algebra_executor::{
    GraphError, GraphResult, GroupExecutor, GroupSet, SocialGraphClient, User, UserId,
};
use parking_lot::Mutex;

/// Mock social graph that counts every id fetch.
struct MockGraph {
    users: Vec<User>,
    followers: HashMap<String, Vec<UserId>>,
    following: HashMap<String, Vec<UserId>>,
    lists: HashMap<String, Vec<UserId>>,
    throttled: HashSet<String>,
    fetches: Mutex<Vec<String>>,
}

impl MockGraph {
    fn new() -> Self {
        let mut graph = MockGraph {
            users: Vec::new(),
            followers: HashMap::new(),
            following: HashMap::new(),
            lists: HashMap::new(),
            throttled: HashSet::new(),
            fetches: Mutex::new(Vec::new()),
        };

        for (id, handle) in [(1, "alice"), (2, "bob"), (3, "carol"), (4, "dave"), (5, "erin")] {
            graph.users.push(User::new(id, handle));
        }

        graph.following.insert("alice".to_string(), vec![1, 2, 3]);
        graph.followers.insert("bob".to_string(), vec![2, 3, 4]);
        graph.followers.insert("alice".to_string(), vec![3, 4, 5]);
        graph.following.insert("bob".to_string(), vec![1, 5]);
        graph.lists.insert("carol/team".to_string(), vec![1, 4]);

        graph
    }

    fn throttle(mut self, key: &str) -> Self {
        self.throttled.insert(key.to_string());
        self
    }

    fn record(&self, key: String) -> GraphResult<()> {
        let throttled = self.throttled.contains(&key);
        self.fetches.lock().push(key);
        if throttled {
            return Err(GraphError::RateLimited {
                limit: 15,
                remaining: 0,
                reset_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 15, 0).unwrap(),
            });
        }
        Ok(())
    }

    fn fetch_count(&self, key: &str) -> usize {
        self.fetches.lock().iter().filter(|k| *k == key).count()
    }

    fn total_fetches(&self) -> usize {
        self.fetches.lock().len()
    }
}

impl SocialGraphClient for MockGraph {
    fn follower_ids(&self, handle: &str) -> GraphResult<Vec<UserId>> {
        self.record(format!("{handle}.followers"))?;
        Ok(self.followers.get(handle).cloned().unwrap_or_default())
    }

    fn friend_ids(&self, handle: &str) -> GraphResult<Vec<UserId>> {
        self.record(format!("{handle}.following"))?;
        Ok(self.following.get(handle).cloned().unwrap_or_default())
    }

    fn list_members(&self, handle: &str, list: &str) -> GraphResult<Vec<UserId>> {
        let key = format!("{handle}/{list}");
        self.record(key.clone())?;
        self.lists
            .get(&key)
            .cloned()
            .ok_or(GraphError::NotFound(key))
    }

    fn users_by_handle(&self, handles: &[&str]) -> GraphResult<Vec<User>> {
        self.record(format!("{{{}}}", handles.join(",")))?;
        Ok(self
            .users
            .iter()
            .filter(|u| handles.contains(&u.handle.as_str()))
            .cloned()
            .collect())
    }

    fn users_by_id(&self, ids: &[UserId]) -> GraphResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

const SAMPLES: &[&str] = &[
    "alice.following",
    "bob.followers",
    "~alice.followers",
    "carol/team | {erin}",
    "~(bob.following & alice.followers)",
    "{}",
];

fn eval(graph: &MockGraph, source: &str) -> GroupSet {
    GroupExecutor::new(graph)
        .execute(source)
        .unwrap_or_else(|e| panic!("{source}: {e}"))
        .members
}

// ==================== End-to-end ====================

#[test]
fn test_intersection_end_to_end() {
    let graph = MockGraph::new();
    assert_eq!(
        eval(&graph, "alice.following & bob.followers"),
        GroupSet::finite([2, 3])
    );
}

#[test]
fn test_union_with_complement_end_to_end() {
    let graph = MockGraph::new();
    assert_eq!(
        eval(&graph, "alice.following | ~bob.followers"),
        GroupSet::excluding([4])
    );
}

#[test]
fn test_chained_operators_left_to_right() {
    let graph = MockGraph::new();
    // ({1,2,3} & {2,3,4}) | {1,4} = {1,2,3,4}
    assert_eq!(
        eval(&graph, "alice.following & bob.followers | carol/team"),
        GroupSet::finite([1, 2, 3, 4])
    );
    // ({1,2,3} | {1,4}) & {2,3,4} = {2,3,4}
    assert_eq!(
        eval(&graph, "alice.following | carol/team & bob.followers"),
        GroupSet::finite([2, 3, 4])
    );
}

#[test]
fn test_mutuals_and_fans() {
    let graph = MockGraph::new();
    // alice follows {1,2,3}, followed by {3,4,5}
    assert_eq!(
        eval(&graph, "alice.following & alice.followers"),
        GroupSet::finite([3])
    );
    assert_eq!(
        eval(&graph, "alice.followers & ~alice.following"),
        GroupSet::finite([4, 5])
    );
}

#[test]
fn test_handle_literal_case_and_order() {
    let graph = MockGraph::new();
    let left = eval(&graph, "{bob, Alice, alice}");
    let right = eval(&graph, "{alice, bob}");
    assert_eq!(left, right);
    assert_eq!(left, GroupSet::finite([1, 2]));
}

// ==================== Algebraic laws ====================

#[test]
fn test_double_complement_is_identity() {
    let graph = MockGraph::new();
    for a in SAMPLES {
        assert_eq!(eval(&graph, &format!("~~({a})")), eval(&graph, a), "{a}");
    }
}

#[test]
fn test_commutativity() {
    let graph = MockGraph::new();
    for a in SAMPLES {
        for b in SAMPLES {
            assert_eq!(
                eval(&graph, &format!("({a}) & ({b})")),
                eval(&graph, &format!("({b}) & ({a})")),
                "{a} & {b}"
            );
            assert_eq!(
                eval(&graph, &format!("({a}) | ({b})")),
                eval(&graph, &format!("({b}) | ({a})")),
                "{a} | {b}"
            );
        }
    }
}

#[test]
fn test_excluded_middle_is_everybody() {
    let graph = MockGraph::new();
    for a in SAMPLES {
        let result = eval(&graph, &format!("({a}) | ~({a})"));
        assert!(result.is_everybody(), "{a}: {result:?}");
    }
}

#[test]
fn test_contradiction_is_nobody() {
    let graph = MockGraph::new();
    for a in SAMPLES {
        let result = eval(&graph, &format!("({a}) & ~({a})"));
        assert!(result.is_nobody(), "{a}: {result:?}");
    }
}

// ==================== Fetch deduplication ====================

#[test]
fn test_repeated_primitive_fetched_once() {
    let graph = MockGraph::new();
    let executor = GroupExecutor::new(&graph);

    let result = executor
        .execute("bob.followers & (alice.following | ~bob.followers) & bob.followers")
        .unwrap();

    assert_eq!(graph.fetch_count("bob.followers"), 1);
    assert_eq!(graph.fetch_count("alice.following"), 1);
    assert_eq!(graph.total_fetches(), 2);
    assert_eq!(result.stats.references, 4);
    assert_eq!(result.stats.fetches, 2);
}

#[test]
fn test_equivalent_literals_fetched_once() {
    let graph = MockGraph::new();
    let executor = GroupExecutor::new(&graph);

    executor.execute("{b, A, a} | {a, b}").unwrap();

    assert_eq!(graph.fetch_count("{a,b}"), 1);
    assert_eq!(graph.total_fetches(), 1);
}

#[test]
fn test_each_run_fetches_afresh() {
    let graph = MockGraph::new();
    let executor = GroupExecutor::new(&graph);

    executor.execute("bob.followers").unwrap();
    executor.execute("bob.followers").unwrap();

    assert_eq!(graph.fetch_count("bob.followers"), 2);
}

// ==================== Failures ====================

#[test]
fn test_rate_limit_fails_whole_run() {
    let graph = MockGraph::new().throttle("bob.followers");
    let executor = GroupExecutor::new(&graph);

    let err = executor
        .execute("alice.following | bob.followers")
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(
        err.graph_error(),
        Some(&GraphError::RateLimited {
            limit: 15,
            remaining: 0,
            reset_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 15, 0).unwrap(),
        })
    );
    // Not retried.
    assert_eq!(graph.fetch_count("bob.followers"), 1);
}

#[test]
fn test_first_registered_failure_reported() {
    let graph = MockGraph::new()
        .throttle("alice.following")
        .throttle("bob.followers");
    let executor = GroupExecutor::new(&graph);

    let err = executor
        .execute("bob.followers & alice.following")
        .unwrap_err();

    assert!(err.to_string().starts_with("fetching 'bob.followers' failed"));
}

#[test]
fn test_missing_list_fails() {
    let graph = MockGraph::new();
    let executor = GroupExecutor::new(&graph);

    let err = executor.execute("carol/ghosts | alice.following").unwrap_err();
    assert_eq!(
        err.graph_error(),
        Some(&GraphError::NotFound("carol/ghosts".to_string()))
    );
}

// ==================== Display resolution ====================

#[test]
fn test_report_lines() {
    let graph = MockGraph::new();
    let executor = GroupExecutor::new(&graph);

    let result = executor.execute("alice.following & ~bob.followers").unwrap();
    assert_eq!(executor.report(&result).unwrap().lines, vec!["alice"]);

    let result = executor.execute("~alice.followers").unwrap();
    assert_eq!(
        executor.report(&result).unwrap().lines,
        vec!["NOT carol", "NOT dave", "NOT erin"]
    );
}
