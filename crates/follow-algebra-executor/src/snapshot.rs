//! In-memory social graph.
//!
//! [`GraphSnapshot`] answers [`SocialGraphClient`] calls from data held in
//! memory. It is built programmatically in tests, or deserialized from JSON
//! (feature `serde`) by the command line tool:
//!
//! ```json
//! {
//!   "users": [{ "id": 1, "handle": "alice" }, { "id": 2, "handle": "bob" }],
//!   "followers": { "alice": [2] },
//!   "following": { "bob": [1] },
//!   "lists": { "alice/team": [1, 2] },
//!   "rate_limit": { "limit": 15, "remaining": 3, "reset_at": "2024-05-01T12:00:00Z" }
//! }
//! ```
//!
//! Handle lookups ignore ASCII case. When `rate_limit` is set, id fetches
//! beyond `remaining` fail with [`GraphError::RateLimited`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use follow_algebra::UserId;

use crate::error::{GraphError, GraphResult};
use crate::traits::{SocialGraphClient, User};

/// Rate-limit window applied to id fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateLimit {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left before throttling starts.
    pub remaining: u32,
    /// When the window resets.
    pub reset_at: DateTime<Utc>,
}

/// A social graph held in memory.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphSnapshot {
    /// Known accounts.
    pub users: Vec<User>,
    /// Handle → follower ids.
    pub followers: HashMap<String, Vec<UserId>>,
    /// Handle → ids followed.
    pub following: HashMap<String, Vec<UserId>>,
    /// `owner/list` → member ids.
    pub lists: HashMap<String, Vec<UserId>>,
    /// Optional throttling of id fetches.
    pub rate_limit: Option<RateLimit>,
    #[cfg_attr(feature = "serde", serde(skip))]
    requests: AtomicU32,
}

impl GraphSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account.
    pub fn with_user(mut self, id: UserId, handle: impl Into<String>) -> Self {
        self.users.push(User::new(id, handle));
        self
    }

    /// Sets the followers of `handle`.
    pub fn with_followers(mut self, handle: impl Into<String>, ids: impl Into<Vec<UserId>>) -> Self {
        self.followers.insert(handle.into(), ids.into());
        self
    }

    /// Sets the accounts `handle` follows.
    pub fn with_following(mut self, handle: impl Into<String>, ids: impl Into<Vec<UserId>>) -> Self {
        self.following.insert(handle.into(), ids.into());
        self
    }

    /// Sets the members of `owner`'s list `list`.
    pub fn with_list(
        mut self,
        owner: &str,
        list: &str,
        ids: impl Into<Vec<UserId>>,
    ) -> Self {
        self.lists.insert(format!("{owner}/{list}"), ids.into());
        self
    }

    /// Throttles id fetches.
    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Number of id fetches served or refused so far.
    pub fn requests(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }

    fn throttle(&self) -> GraphResult<()> {
        let made = self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.rate_limit {
            Some(window) if made >= window.remaining => Err(GraphError::RateLimited {
                limit: window.limit,
                remaining: 0,
                reset_at: window.reset_at,
            }),
            _ => Ok(()),
        }
    }

    fn lookup(map: &HashMap<String, Vec<UserId>>, key: &str) -> GraphResult<Vec<UserId>> {
        map.get(key)
            .or_else(|| {
                map.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, ids)| ids)
            })
            .cloned()
            .ok_or_else(|| GraphError::NotFound(key.to_string()))
    }
}

impl SocialGraphClient for GraphSnapshot {
    fn follower_ids(&self, handle: &str) -> GraphResult<Vec<UserId>> {
        self.throttle()?;
        Self::lookup(&self.followers, handle)
    }

    fn friend_ids(&self, handle: &str) -> GraphResult<Vec<UserId>> {
        self.throttle()?;
        Self::lookup(&self.following, handle)
    }

    fn list_members(&self, handle: &str, list: &str) -> GraphResult<Vec<UserId>> {
        self.throttle()?;
        Self::lookup(&self.lists, &format!("{handle}/{list}"))
    }

    fn users_by_handle(&self, handles: &[&str]) -> GraphResult<Vec<User>> {
        Ok(handles
            .iter()
            .filter_map(|handle| {
                self.users
                    .iter()
                    .find(|user| user.handle.eq_ignore_ascii_case(handle))
                    .cloned()
            })
            .collect())
    }

    fn users_by_id(&self, ids: &[UserId]) -> GraphResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.iter().find(|user| user.id == *id).cloned())
            .collect())
    }
}
