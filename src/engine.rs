//! Primary retools engine interface.
//!
//! [`RetoolsEngine`] is the request surface: six operations, each taking a
//! pattern (and where applicable a replacement template) as strings, plus
//! the [`database_ready`](RetoolsEngine::database_ready) checkpoint entry
//! point the host's lifecycle notification calls. The engine owns the
//! [`BatchScheduler`] and configuration; it is constructed once per
//! process and injected wherever requests originate, never reached through
//! global state.

use crate::action::Action;
use crate::config::EngineConfig;
use crate::database::RecordDatabase;
use crate::error::Result;
use crate::matcher::{self, MatchStats};
use crate::pattern::Pattern;
use crate::scheduler::{BatchScheduler, PendingAction, Phase};

/// How a request was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Queued for the database-ready checkpoint; nothing touched yet.
    Queued,
    /// Executed against the database now, with the traversal's counters.
    Executed(MatchStats),
}

/// Pattern-driven batch mutation engine over one record database.
///
/// Every operation compiles its pattern first; a malformed pattern fails
/// the request synchronously and neither queues nor executes anything.
/// Well-formed requests either queue (batching enabled, checkpoint not yet
/// reached) or run a single traversal now. Per-entity action failures are
/// logged and never fail the request.
///
/// # Examples
///
/// ```rust,ignore
/// use retools_engine::{EngineConfig, RetoolsEngine};
///
/// let mut engine = RetoolsEngine::new();
///
/// // Before the database is ready: requests queue.
/// engine.add_alias(&db, "(.*):A", "$1:X")?;
///
/// // The host's one-shot ready notification fires the checkpoint:
/// // one traversal applies everything queued.
/// engine.database_ready(&db);
///
/// // From here on, requests execute immediately.
/// engine.add_annotation(&db, "(.*):B", "archive", "monitor 1")?;
/// # Ok::<(), retools_engine::RetoolsError>(())
/// ```
#[derive(Debug, Default)]
pub struct RetoolsEngine {
    config: EngineConfig,
    scheduler: BatchScheduler,
}

impl RetoolsEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            scheduler: BatchScheduler::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Enable or disable batching. Read at request time; requests already
    /// queued stay queued.
    pub fn set_batching(&mut self, enable: bool) {
        self.config.batching = enable;
    }

    /// Enable or disable per-mutation success lines.
    pub fn set_verbose(&mut self, enable: bool) {
        self.config.verbose = enable;
    }

    /// Scheduler phase: `Queuing` until the checkpoint, `Immediate` after.
    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    /// Number of requests waiting for the checkpoint.
    pub fn pending_requests(&self) -> usize {
        self.scheduler.pending()
    }

    /// Emit every record name matching `pattern`.
    pub fn list_matches<D: RecordDatabase>(
        &mut self,
        db: &D,
        pattern: &str,
    ) -> Result<Disposition> {
        self.submit(db, pattern, "", Action::ListMatches)
    }

    /// Emit each matching name alongside its substitution; mutates
    /// nothing.
    pub fn test_substitution<D: RecordDatabase>(
        &mut self,
        db: &D,
        pattern: &str,
        template: &str,
    ) -> Result<Disposition> {
        self.submit(db, pattern, template, Action::TestSubstitution)
    }

    /// Register the substituted name as an alias of every matching record.
    pub fn add_alias<D: RecordDatabase>(
        &mut self,
        db: &D,
        pattern: &str,
        template: &str,
    ) -> Result<Disposition> {
        self.submit(db, pattern, template, Action::CreateAlias)
    }

    /// Store the substituted value under annotation `key` on every
    /// matching record.
    pub fn add_annotation<D: RecordDatabase>(
        &mut self,
        db: &D,
        pattern: &str,
        key: &str,
        template: &str,
    ) -> Result<Disposition> {
        self.submit(
            db,
            pattern,
            template,
            Action::SetAnnotation {
                key: key.to_string(),
            },
        )
    }

    /// Write the substituted value into `field` on every matching record.
    pub fn set_field<D: RecordDatabase>(
        &mut self,
        db: &D,
        pattern: &str,
        field: &str,
        template: &str,
    ) -> Result<Disposition> {
        self.submit(
            db,
            pattern,
            template,
            Action::SetField {
                field: field.to_string(),
            },
        )
    }

    /// Emit the current value of `field` for every matching record.
    pub fn get_field<D: RecordDatabase>(
        &mut self,
        db: &D,
        pattern: &str,
        field: &str,
    ) -> Result<Disposition> {
        self.submit(
            db,
            pattern,
            "",
            Action::GetField {
                field: field.to_string(),
            },
        )
    }

    /// The one-time database-ready checkpoint.
    ///
    /// The host's lifecycle notification calls this exactly once, after
    /// which all records exist in final form. Extra deliveries are
    /// harmless no-ops. Returns the counters for the drained batch.
    pub fn database_ready<D: RecordDatabase>(&mut self, db: &D) -> MatchStats {
        self.scheduler.checkpoint(db, &self.config)
    }

    fn submit<D: RecordDatabase>(
        &mut self,
        db: &D,
        pattern: &str,
        template: &str,
        action: Action,
    ) -> Result<Disposition> {
        let pattern = Pattern::compile(pattern, template)?;

        // Flag read per request: batching may have been toggled since the
        // last request without affecting anything already queued.
        if self.config.batching && self.scheduler.phase() == Phase::Queuing {
            self.scheduler.enqueue(PendingAction { pattern, action });
            return Ok(Disposition::Queued);
        }

        let config = &self.config;
        let stats = matcher::for_each_match(db, &pattern, |handle, original, substituted| {
            action.apply(db, handle, original, substituted, config)
        });

        if config.report_match_count {
            log::info!(
                "{}: {} matched, {} failed",
                action.kind(),
                stats.matched,
                stats.failed
            );
        }
        Ok(Disposition::Executed(stats))
    }
}
