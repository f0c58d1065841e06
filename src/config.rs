use crate::error::{KMeansError, Result};

/// Iteration cap applied to every Lloyd run unless overridden.
pub const DEFAULT_MAX_ITERS: usize = 96;

/// Default fraction of points allowed to change group before a run is
/// considered converged.
pub const DEFAULT_DELTA_THRESHOLD: f64 = 0.01;

/// Configuration for the k-means partitioning engine
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Convergence sensitivity. A run stops once the fraction of points that
    /// changed group in an iteration drops below this value. Must lie in (0, 1).
    pub delta_threshold: f64,

    /// Maximum number of Lloyd iterations
    pub max_iters: usize,

    /// Random seed used for k-means++ seeding and empty-cluster recovery
    /// when no random source is injected
    pub seed: u64,

    /// Number of random draws made per empty cluster while looking for a
    /// donor point before falling back to an exhaustive candidate scan
    pub max_recovery_attempts: usize,

    /// Log every iteration at `info` level instead of `debug`
    pub verbose: bool,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            delta_threshold: DEFAULT_DELTA_THRESHOLD,
            max_iters: DEFAULT_MAX_ITERS,
            seed: 0,
            max_recovery_attempts: 1024,
            verbose: false,
        }
    }
}

impl KMeansConfig {
    /// Create a new configuration with the specified convergence threshold
    pub fn new(delta_threshold: f64) -> Self {
        Self {
            delta_threshold,
            ..Default::default()
        }
    }

    /// Set the convergence threshold
    pub fn with_delta_threshold(mut self, delta_threshold: f64) -> Self {
        self.delta_threshold = delta_threshold;
        self
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of random donor draws per empty cluster
    pub fn with_max_recovery_attempts(mut self, attempts: usize) -> Self {
        self.max_recovery_attempts = attempts;
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check that every parameter is within its valid range.
    pub fn validate(&self) -> Result<()> {
        if !(self.delta_threshold > 0.0 && self.delta_threshold < 1.0) {
            return Err(KMeansError::InvalidConfiguration(format!(
                "delta threshold must be > 0.0 and < 1.0, got {}",
                self.delta_threshold
            )));
        }
        if self.max_iters == 0 {
            return Err(KMeansError::InvalidConfiguration(
                "max_iters must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
