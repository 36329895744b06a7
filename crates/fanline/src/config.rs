use core::time::Duration;

/// Tunables for one pipeline run.
///
/// Defaults match the reference workload: five workers, a one second
/// generator deadline, a one millisecond per-item worker delay, a rendezvous
/// input channel and a result channel buffered to one slot per worker.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use fanline::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_workers(8)
///     .with_timeout(Duration::from_millis(250));
///
/// assert_eq!(config.workers, 8);
/// assert_eq!(config.result_capacity(), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of workers (and collectors) in the fan-out stage.
    ///
    /// Zero is allowed: nothing can receive from the input channel, so the
    /// generator stops on its first send and the run reports zeros.
    pub workers: usize,
    /// How long the generator runs when started through
    /// [`Pipeline::run`](crate::Pipeline::run).
    pub timeout: Duration,
    /// Per-item sleep inside each worker.
    pub worker_delay: Duration,
    /// Buffer size of the shared input channel. Zero makes every hand-off a
    /// rendezvous between the generator and a worker.
    pub input_capacity: usize,
    /// Buffer size of the shared result channel. `None` means one slot per
    /// worker.
    pub result_capacity: Option<usize>,
}

impl PipelineConfig {
    pub const DEFAULT_WORKERS: usize = 5;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
    pub const DEFAULT_WORKER_DELAY: Duration = Duration::from_millis(1);

    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_worker_delay(mut self, delay: Duration) -> Self {
        self.worker_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_input_capacity(mut self, capacity: usize) -> Self {
        self.input_capacity = capacity;
        self
    }

    #[must_use]
    pub const fn with_result_capacity(mut self, capacity: usize) -> Self {
        self.result_capacity = Some(capacity);
        self
    }

    /// Effective buffer size of the shared result channel.
    pub const fn result_capacity(&self) -> usize {
        match self.result_capacity {
            Some(capacity) => capacity,
            None => self.workers,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: Self::DEFAULT_WORKERS,
            timeout: Self::DEFAULT_TIMEOUT,
            worker_delay: Self::DEFAULT_WORKER_DELAY,
            input_capacity: 0,
            result_capacity: None,
        }
    }
}
