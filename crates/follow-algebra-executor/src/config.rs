//! Configuration types for the executor.

/// Default name prefix for fetch worker threads.
pub const DEFAULT_THREAD_NAME: &str = "follow-fetch";

/// Configuration for the executor.
///
/// By default every distinct primitive gets its own fetch thread.
///
/// # Example
///
/// ```rust
/// use follow_algebra_executor::ExecutorConfig;
///
/// let config = ExecutorConfig::builder()
///     .with_max_concurrency(4)
///     .with_thread_name("graph-fetch")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound on concurrent fetches (None = one per distinct primitive).
    pub max_concurrency: Option<usize>,
    /// Prefix for fetch worker thread names.
    pub thread_name: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl ExecutorConfig {
    /// Creates a new builder for ExecutorConfig.
    pub fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::default()
    }

    /// Number of fetch threads to start for `distinct` primitives.
    ///
    /// Always at least one.
    pub fn worker_count(&self, distinct: usize) -> usize {
        let wanted = distinct.max(1);
        match self.max_concurrency {
            Some(cap) => wanted.min(cap.max(1)),
            None => wanted,
        }
    }
}

/// Builder for ExecutorConfig.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfigBuilder {
    max_concurrency: Option<usize>,
    thread_name: Option<String>,
}

impl ExecutorConfigBuilder {
    /// Caps the number of concurrent fetches.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    /// Sets the fetch worker thread name prefix.
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = Some(thread_name.into());
        self
    }

    /// Builds the ExecutorConfig.
    pub fn build(self) -> ExecutorConfig {
        ExecutorConfig {
            max_concurrency: self.max_concurrency,
            thread_name: self
                .thread_name
                .unwrap_or_else(|| DEFAULT_THREAD_NAME.to_string()),
        }
    }
}
