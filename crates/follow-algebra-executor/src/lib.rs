//! # follow-algebra-executor
//!
//! Fetch-and-evaluate engine for group expressions.
//!
//! This crate bridges the [`follow_algebra`] parser and any social graph
//! service implementing [`SocialGraphClient`]:
//!
//! - **Deduplicated fetches** - every distinct primitive is fetched once,
//!   however often the expression mentions it
//! - **Concurrent loading** - independent fetches run on their own threads
//! - **Fail loudly** - a rate limit or service error aborts the run; partial
//!   results are never returned
//!
//! ## Quick Start
//!
//! ```rust
//! use follow_algebra_executor::{GraphSnapshot, GroupExecutor};
//!
//! let graph = GraphSnapshot::new()
//!     .with_following("alice", vec![1, 2, 3])
//!     .with_followers("alice", vec![2, 3, 4]);
//! let executor = GroupExecutor::new(&graph);
//!
//! // Accounts alice follows that don't follow her back
//! let result = executor.execute("alice.following & ~alice.followers").unwrap();
//! assert_eq!(result.to_vec(), vec![1]);
//! ```
//!
//! ## With Configuration
//!
//! ```rust
//! use follow_algebra_executor::{ExecutorConfig, GraphSnapshot, GroupExecutor};
//!
//! let config = ExecutorConfig::builder()
//!     .with_max_concurrency(4)
//!     .build();
//!
//! let graph = GraphSnapshot::new();
//! let executor = GroupExecutor::with_config(&graph, config);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/deserialize [`GraphSnapshot`], [`User`] and the AST
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 follow-algebra-executor                  │
//! │                                                          │
//! │  GroupExecutor                                           │
//! │  ├── parse text → GroupExpr (follow-algebra)             │
//! │  ├── ConcurrentLoader: one fetch per distinct cache key  │
//! │  ├── evaluate GroupExpr → GroupSet                       │
//! │  └── resolve ids → handles, build Report                 │
//! │                                                          │
//! │  SocialGraphClient (trait)                               │
//! │  └── GraphSnapshot - in-memory implementation            │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod executor;
mod loader;
mod planner;
mod result;
mod snapshot;
mod traits;

// Public re-exports
pub use config::{ExecutorConfig, ExecutorConfigBuilder, DEFAULT_THREAD_NAME};
pub use error::{ExecResult, ExecutorError, GraphError, GraphResult};
pub use executor::GroupExecutor;
pub use loader::ConcurrentLoader;
pub use planner::{FetchPlan, PlannedFetch};
pub use result::{ExecutionStats, GroupResult, Report, EVERYBODY, NOBODY};
pub use snapshot::{GraphSnapshot, RateLimit};
pub use traits::{fetch, SocialGraphClient, User};

// Re-export commonly used types from dependencies for convenience
pub use follow_algebra::{GroupExpr, GroupSet, UserId};

