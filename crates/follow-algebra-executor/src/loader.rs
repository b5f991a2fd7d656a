//! Concurrent, deduplicating fetch of an expression's primitives.
//!
//! The loader walks the tree once. Each primitive's cache key is registered
//! under a lock; the first registration of a key spawns its fetch task and
//! every later occurrence observes the existing task. All tasks run on a
//! dedicated rayon pool and the loader returns once every task has finished.

use std::collections::HashMap;
use std::sync::Arc;

use follow_algebra::{DataRequest, FetchResults, GroupExpr, UserId};
use parking_lot::Mutex;
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

use crate::config::ExecutorConfig;
use crate::error::{ExecResult, ExecutorError, GraphError, GraphResult};
use crate::traits::{fetch, SocialGraphClient};

/// One fetch, shared by every occurrence of its cache key.
struct FetchTask<'e> {
    cache_key: String,
    request: DataRequest<'e>,
    outcome: Mutex<Option<GraphResult<Vec<UserId>>>>,
}

impl<'e> FetchTask<'e> {
    fn new(cache_key: String, request: DataRequest<'e>) -> Self {
        Self {
            cache_key,
            request,
            outcome: Mutex::new(None),
        }
    }

    fn run(&self, client: &dyn SocialGraphClient) {
        debug!(cache_key = %self.cache_key, "fetch started");
        let outcome = fetch(client, self.request);
        match &outcome {
            Ok(ids) => debug!(cache_key = %self.cache_key, count = ids.len(), "fetch finished"),
            Err(GraphError::RateLimited {
                limit,
                remaining,
                reset_at,
            }) => warn!(
                cache_key = %self.cache_key,
                limit = *limit,
                remaining = *remaining,
                reset_at = %reset_at,
                "rate limited"
            ),
            Err(err) => warn!(cache_key = %self.cache_key, error = %err, "fetch failed"),
        }
        *self.outcome.lock() = Some(outcome);
    }
}

#[derive(Default)]
struct RegistryInner<'e> {
    index: HashMap<String, usize>,
    tasks: Vec<Arc<FetchTask<'e>>>,
}

/// Cache key → task map, written once per key.
#[derive(Default)]
struct TaskRegistry<'e> {
    inner: Mutex<RegistryInner<'e>>,
}

impl<'e> TaskRegistry<'e> {
    /// Returns the task for `cache_key`, creating it if absent.
    ///
    /// The flag is true only for the caller that created the task.
    fn register(&self, cache_key: String, request: DataRequest<'e>) -> (Arc<FetchTask<'e>>, bool) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if let Some(&slot) = inner.index.get(&cache_key) {
            return (Arc::clone(&inner.tasks[slot]), false);
        }
        let task = Arc::new(FetchTask::new(cache_key.clone(), request));
        inner.index.insert(cache_key, inner.tasks.len());
        inner.tasks.push(Arc::clone(&task));
        (task, true)
    }

    /// Collects outcomes in registration order, failing on the first error.
    fn into_results(self) -> ExecResult<FetchResults> {
        let inner = self.inner.into_inner();
        let mut fetched = FetchResults::new();
        for task in inner.tasks {
            let outcome = task.outcome.lock().take();
            match outcome {
                Some(Ok(ids)) => {
                    fetched.insert(task.cache_key.clone(), ids);
                }
                Some(Err(source)) => {
                    return Err(ExecutorError::Fetch {
                        cache_key: task.cache_key.clone(),
                        source,
                    })
                }
                None => return Err(ExecutorError::TaskAbandoned(task.cache_key.clone())),
            }
        }
        Ok(fetched)
    }
}

/// Fetches every distinct primitive of an expression concurrently.
///
/// # Example
///
/// ```ignore
/// let loader = ConcurrentLoader::new(&client, &ExecutorConfig::default());
/// let expr = follow_algebra::parse("a.followers & ~a.followers")?;
/// let fetched = loader.load(&expr)?;   // one call to follower_ids("a")
/// assert_eq!(fetched.len(), 1);
/// ```
pub struct ConcurrentLoader<'a> {
    client: &'a dyn SocialGraphClient,
    config: &'a ExecutorConfig,
}

impl<'a> ConcurrentLoader<'a> {
    /// Creates a loader over `client`.
    pub fn new(client: &'a dyn SocialGraphClient, config: &'a ExecutorConfig) -> Self {
        Self { client, config }
    }

    /// Fetches the raw identifiers for every distinct cache key in `root`.
    ///
    /// Blocks until all started fetches have finished. No retries are made.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Fetch`] for the earliest-registered key whose
    /// fetch failed (rate limits included), or [`ExecutorError::ThreadPool`]
    /// if the workers cannot be started.
    pub fn load(&self, root: &GroupExpr) -> ExecResult<FetchResults> {
        let primitives: Vec<(String, DataRequest<'_>)> = root
            .primitives()
            .into_iter()
            .filter_map(|node| Some((node.cache_key()?, node.data_request()?)))
            .collect();

        let distinct = {
            let mut keys: Vec<&str> = primitives.iter().map(|(key, _)| key.as_str()).collect();
            keys.sort_unstable();
            keys.dedup();
            keys.len()
        };

        let workers = self.config.worker_count(distinct);
        let prefix = self.config.thread_name.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        debug!(
            references = primitives.len(),
            distinct, workers, "loading primitives"
        );

        let registry = TaskRegistry::default();
        let client = self.client;
        pool.in_place_scope(|scope| {
            for (cache_key, request) in primitives {
                let (task, created) = registry.register(cache_key, request);
                if created {
                    scope.spawn(move |_| task.run(client));
                }
            }
        });

        registry.into_results()
    }
}
