//! Tests that distinct fetches really overlap in time.

use std::time::Duration;

use follow_algebra_executor::{
    ExecutorConfig, GraphResult, GroupExecutor, SocialGraphClient, User, UserId,
};
use parking_lot::{Condvar, Mutex};

/// Client whose id fetches block until `expected` of them are in flight,
/// or until a timeout passes.
struct RendezvousClient {
    expected: usize,
    state: Mutex<InFlight>,
    arrived: Condvar,
}

#[derive(Default)]
struct InFlight {
    current: usize,
    peak: usize,
}

impl RendezvousClient {
    fn new(expected: usize) -> Self {
        Self {
            expected,
            state: Mutex::new(InFlight::default()),
            arrived: Condvar::new(),
        }
    }

    fn enter(&self) {
        let mut state = self.state.lock();
        state.current += 1;
        state.peak = state.peak.max(state.current);
        self.arrived.notify_all();

        let deadline = Duration::from_secs(5);
        while state.peak < self.expected {
            if self.arrived.wait_for(&mut state, deadline).timed_out() {
                break;
            }
        }
        state.current -= 1;
    }

    fn peak(&self) -> usize {
        self.state.lock().peak
    }
}

impl SocialGraphClient for RendezvousClient {
    fn follower_ids(&self, _handle: &str) -> GraphResult<Vec<UserId>> {
        self.enter();
        Ok(vec![1])
    }

    fn friend_ids(&self, _handle: &str) -> GraphResult<Vec<UserId>> {
        self.enter();
        Ok(vec![2])
    }

    fn list_members(&self, _handle: &str, _list: &str) -> GraphResult<Vec<UserId>> {
        self.enter();
        Ok(vec![3])
    }

    fn users_by_handle(&self, _handles: &[&str]) -> GraphResult<Vec<User>> {
        self.enter();
        Ok(Vec::new())
    }

    fn users_by_id(&self, _ids: &[UserId]) -> GraphResult<Vec<User>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_distinct_fetches_run_concurrently() {
    let client = RendezvousClient::new(3);
    let executor = GroupExecutor::new(&client);

    let result = executor
        .execute("a.followers | b.following | c/list | a.followers")
        .unwrap();

    assert_eq!(result.to_vec(), vec![1, 2, 3]);
    assert_eq!(client.peak(), 3);
}

#[test]
fn test_max_concurrency_bounds_in_flight_fetches() {
    let client = RendezvousClient::new(2);
    let config = ExecutorConfig::builder().with_max_concurrency(2).build();
    let executor = GroupExecutor::with_config(&client, config);

    executor
        .execute("a.followers | b.followers | c.followers | d.followers")
        .unwrap();

    assert_eq!(client.peak(), 2);
}
