//! Single-traversal match engine.
//!
//! [`for_each_match`] walks the database's full record list exactly once,
//! computes the substitution for every name the pattern matches, resolves
//! alias records to their canonical handle, and hands each match to the
//! caller's visitor. Visitor failures are logged and counted; they never
//! abort the traversal of the remaining records.

use crate::database::RecordDatabase;
use crate::error::Result;
use crate::pattern::Pattern;

/// Counters for one traversal or one drained batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Names the pattern matched (visitor invoked, or attempted).
    pub matched: usize,
    /// Per-entity failures: visitor errors plus failed alias resolutions.
    pub failed: usize,
}

/// Traverse every record once and invoke `visit` for each match.
///
/// The visitor receives the canonical record handle, the name the pattern
/// matched (the alias name when the match hit an alias) and the
/// substituted name. Traversal follows the database's native enumeration
/// order. Errors returned by `visit` are logged with the offending record
/// name and swallowed.
pub fn for_each_match<D, F>(db: &D, pattern: &Pattern, mut visit: F) -> MatchStats
where
    D: RecordDatabase,
    F: FnMut(&D::Handle, &str, &str) -> Result<()>,
{
    let mut stats = MatchStats::default();

    for entry in db.records() {
        let Some(substituted) = pattern.substitute(&entry.name) else {
            continue;
        };

        // Matched through an alias: hop once to the canonical record.
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

        stats.matched += 1;
        if let Err(err) = visit(&handle, &entry.name, &substituted) {
            log::warn!("{}: {err}", entry.name);
            stats.failed += 1;
        }
    }

    stats
}
