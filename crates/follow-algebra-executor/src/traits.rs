//! The social graph capability consumed by the executor.
//!
//! Client construction and credentials live outside this crate; anything
//! that can answer these calls can drive an [`GroupExecutor`](crate::GroupExecutor).
//!
//! # Example: a test double
//!
//! ```rust
//! use follow_algebra_executor::{GraphError, GraphResult, SocialGraphClient, User, UserId};
//!
//! struct Offline;
//!
//! impl SocialGraphClient for Offline {
//!     fn follower_ids(&self, handle: &str) -> GraphResult<Vec<UserId>> {
//!         Err(GraphError::NotFound(handle.to_string()))
//!     }
//!     fn friend_ids(&self, handle: &str) -> GraphResult<Vec<UserId>> {
//!         Err(GraphError::NotFound(handle.to_string()))
//!     }
//!     fn list_members(&self, handle: &str, list: &str) -> GraphResult<Vec<UserId>> {
//!         Err(GraphError::NotFound(format!("{handle}/{list}")))
//!     }
//!     fn users_by_handle(&self, _handles: &[&str]) -> GraphResult<Vec<User>> {
//!         Ok(Vec::new())
//!     }
//!     fn users_by_id(&self, _ids: &[UserId]) -> GraphResult<Vec<User>> {
//!         Ok(Vec::new())
//!     }
//! }
//! ```

use follow_algebra::{DataRequest, UserId};

use crate::error::GraphResult;

/// An account as returned by batch lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    /// Stable account identifier.
    pub id: UserId,
    /// Display handle.
    pub handle: String,
}

impl User {
    /// Creates a user record.
    pub fn new(id: UserId, handle: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
        }
    }
}

/// Read access to a social graph service.
///
/// Every call may fail with [`GraphError::RateLimited`](crate::GraphError::RateLimited)
/// when the service throttles. Implementations are shared across fetch
/// threads, hence `Send + Sync`.
pub trait SocialGraphClient: Send + Sync {
    /// Ids of the accounts following `handle`.
    fn follower_ids(&self, handle: &str) -> GraphResult<Vec<UserId>>;

    /// Ids of the accounts `handle` follows.
    fn friend_ids(&self, handle: &str) -> GraphResult<Vec<UserId>>;

    /// Ids of the members of `handle`'s list named `list`.
    fn list_members(&self, handle: &str, list: &str) -> GraphResult<Vec<UserId>>;

    /// Batch lookup by handle. Unknown handles are omitted from the result.
    fn users_by_handle(&self, handles: &[&str]) -> GraphResult<Vec<User>>;

    /// Batch lookup by id. Unknown ids are omitted from the result.
    fn users_by_id(&self, ids: &[UserId]) -> GraphResult<Vec<User>>;
}

/// Performs the client call a primitive node asks for.
///
/// An empty handle literal resolves to no ids without calling the client.
pub fn fetch(client: &dyn SocialGraphClient, request: DataRequest<'_>) -> GraphResult<Vec<UserId>> {
    match request {
        DataRequest::Followers(handle) => client.follower_ids(handle),
        DataRequest::Following(handle) => client.friend_ids(handle),
        DataRequest::ListMembers { handle, list } => client.list_members(handle, list),
        DataRequest::Handles(set) if set.is_empty() => Ok(Vec::new()),
        DataRequest::Handles(set) => {
            let handles: Vec<&str> = set.iter().collect();
            let users = client.users_by_handle(&handles)?;
            Ok(users.into_iter().map(|user| user.id).collect())
        }
    }
}
