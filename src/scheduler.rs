//! Deferred batch scheduling around the database-ready checkpoint.
//!
//! Requests made before the host database finishes initializing are queued
//! as [`PendingAction`]s. When the checkpoint fires, the scheduler takes
//! one snapshot of every record's current name and canonical handle in a
//! single traversal, applies every queued action against that snapshot,
//! then permanently switches to immediate mode. N queued requests cost one
//! traversal instead of N.
//!
//! Matching during the batch is always against snapshotted names: an
//! action earlier in the queue may rename or alias records, but later
//! queued actions still see the pre-batch view, keeping per-batch results
//! independent of queue order.

use crate::action::Action;
use crate::config::EngineConfig;
use crate::database::RecordDatabase;
use crate::matcher::MatchStats;
use crate::pattern::Pattern;
use crate::prefilter::LiteralPrefilter;

/// Scheduler execution phase.
///
/// `Queuing` holds from construction until the checkpoint; `Immediate` is
/// permanent afterwards. The batching *flag* is a separate, per-request
/// concern: a request executes immediately whenever the flag is off, even
/// in `Queuing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Checkpoint not yet reached; batching-enabled requests queue.
    Queuing,
    /// Checkpoint fired (or never applicable); requests execute now.
    Immediate,
}

/// One queued request awaiting the checkpoint.
///
/// Owned exclusively by the scheduler queue, consumed (never mutated) when
/// the checkpoint drains it.
#[derive(Debug, Clone)]
pub struct PendingAction {
    /// Compiled pattern plus replacement template.
    pub pattern: Pattern,
    /// The operation to apply per matching record.
    pub action: Action,
}

/// A record's snapshotted name and canonical handle.
struct SnapshotEntry<H> {
    name: String,
    handle: H,
}

/// Owner of the pending queue and the checkpoint procedure.
///
/// Constructed once per process and injected into the request path; there
/// is no ambient global state.
#[derive(Debug)]
pub struct BatchScheduler {
    phase: Phase,
    queue: Vec<PendingAction>,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchScheduler {
    /// Create a scheduler in the `Queuing` phase with an empty queue.
    pub fn new() -> Self {
        Self {
            phase: Phase::Queuing,
            queue: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of requests waiting for the checkpoint.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Append a request to the queue. No database access happens here.
    pub fn enqueue(&mut self, pending: PendingAction) {
        log::debug!(
            "queued {} request for pattern '{}'",
            pending.action.kind(),
            pending.pattern.as_str()
        );
        self.queue.push(pending);
    }

    /// Handle the one-time database-ready checkpoint.
    ///
    /// Idempotent: delivering the event twice leaves the same final state
    /// as delivering it once; the second call is a no-op returning zero
    /// stats. On the first call the scheduler snapshots the database in
    /// one traversal, applies every queued action against the snapshot,
    /// drains the queue and transitions permanently to `Immediate`.
    pub fn checkpoint<D: RecordDatabase>(&mut self, db: &D, config: &EngineConfig) -> MatchStats {
        if self.phase == Phase::Immediate {
            return MatchStats::default();
        }
        self.phase = Phase::Immediate;

        let queue = std::mem::take(&mut self.queue);
        if queue.is_empty() {
            log::debug!("checkpoint reached with empty queue");
            return MatchStats::default();
        }

        let mut stats = MatchStats::default();

        // One traversal: capture every name with its canonical handle.
        // Alias resolution failures are logged once per entry and the
        // entry is dropped from the snapshot.
        let mut snapshot: Vec<SnapshotEntry<D::Handle>> = Vec::new();
        for entry in db.records() {
            let handle = if entry.is_alias {
                match db.resolve_alias(&entry.name) {
                    Ok(handle) => handle,
                    Err(err) => {
                        log::warn!("{}: {err}", entry.name);
                        stats.failed += 1;
                        continue;
                    }
                }
            } else {
                entry.handle
            };
            snapshot.push(SnapshotEntry {
                name: entry.name,
                handle,
            });
        }

        let prefilter = if config.enable_prefilter {
            let patterns: Vec<&Pattern> = queue.iter().map(|p| &p.pattern).collect();
            LiteralPrefilter::build(&patterns, config.min_literal_length)
        } else {
            LiteralPrefilter::passthrough(queue.len())
        };
        log::debug!(
            "checkpoint: applying {} queued actions to {} snapshot entries ({:?})",
            queue.len(),
            snapshot.len(),
            prefilter.stats()
        );

        let mut marks = Vec::new();
        for entry in &snapshot {
            prefilter.mark_candidates(&entry.name, &mut marks);
            for (idx, pending) in queue.iter().enumerate() {
                if !marks[idx] {
                    continue;
                }
                let Some(substituted) = pending.pattern.substitute(&entry.name) else {
                    continue;
                };
                stats.matched += 1;
                if let Err(err) =
                    pending
                        .action
                        .apply(db, &entry.handle, &entry.name, &substituted, config)
                {
                    log::warn!("{}: {err}", entry.name);
                    stats.failed += 1;
                }
            }
        }

        if config.report_match_count {
            log::info!(
                "Batch complete: {} matches, {} failures",
                stats.matched,
                stats.failed
            );
        }
        stats
    }
}
