//! Engine configuration.
//!
//! `EngineConfig` collects the process-wide flags that steer request
//! handling: whether pre-checkpoint requests are queued, how chatty
//! per-entity reporting is, and how the checkpoint prefilter is tuned.
//! Flags are read at the moment a request is made, never latched into
//! queued work.

/// Configuration for a [`RetoolsEngine`](crate::RetoolsEngine).
///
/// # Examples
///
/// ```rust
/// use retools_engine::EngineConfig;
///
/// // Batching off, quiet output, the shape used by interactive shells
/// // that want every request applied on the spot.
/// let config = EngineConfig::new()
///     .with_batching(false)
///     .with_verbose(false);
///
/// assert!(!config.batching);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Queue requests made before the database-ready checkpoint and apply
    /// them all against a single traversal when it fires.
    ///
    /// Read per request: turning this off while requests are already
    /// queued routes *new* requests to immediate execution but does not
    /// un-queue anything.
    ///
    /// **Default**: true
    pub batching: bool,

    /// Emit an info line for every successful mutation (alias created,
    /// annotation stored, field written). Failures are always logged.
    ///
    /// **Default**: true
    pub verbose: bool,

    /// Log the total number of matched entities after a batch checkpoint
    /// or an immediate request completes.
    ///
    /// **Default**: false
    pub report_match_count: bool,

    /// Skip regex evaluation at the checkpoint for snapshot names that
    /// cannot contain a pattern's required literal fragment. Purely an
    /// optimization: results are identical with the prefilter disabled.
    ///
    /// **Default**: true
    pub enable_prefilter: bool,

    /// Minimum length of a literal fragment worth prefiltering on.
    /// Fragments shorter than this are ignored; a pattern with no usable
    /// fragment is evaluated for every snapshot entry.
    ///
    /// **Default**: 3
    pub min_literal_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batching: true,
            verbose: true,
            report_match_count: false,
            enable_prefilter: true,
            min_literal_length: 3,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable pre-checkpoint request queuing.
    pub fn with_batching(mut self, enable: bool) -> Self {
        self.batching = enable;
        self
    }

    /// Enable or disable per-mutation success lines.
    pub fn with_verbose(mut self, enable: bool) -> Self {
        self.verbose = enable;
        self
    }

    /// Enable or disable the matched-entity total after each request.
    pub fn with_match_count(mut self, enable: bool) -> Self {
        self.report_match_count = enable;
        self
    }

    /// Enable or disable the checkpoint literal prefilter.
    pub fn with_prefilter(mut self, enable: bool) -> Self {
        self.enable_prefilter = enable;
        self
    }

    /// Set the minimum literal fragment length for the prefilter.
    pub fn with_min_literal_length(mut self, len: usize) -> Self {
        self.min_literal_length = len;
        self
    }
}
