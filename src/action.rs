//! The fixed set of per-match operations.
//!
//! Each request carries one [`Action`]. The match engine hands every
//! (canonical handle, original name, substituted name) triple to
//! [`Action::apply`], which performs the mutation or emits the
//! observation. Failures are returned to the caller, which logs them and
//! keeps traversing; no action failure aborts a request.
//!
//! Observation output (`ListMatches`, `TestSubstitution`, `GetField`)
//! goes to the `retools::emit` log target so hosts can route it away
//! from diagnostics. Mutation success lines are gated by
//! [`EngineConfig::verbose`](crate::EngineConfig).

use crate::config::EngineConfig;
use crate::database::RecordDatabase;
use crate::error::Result;

/// Log target for operation output, as opposed to diagnostics.
pub const EMIT_TARGET: &str = "retools::emit";

/// One of the six mutation/observation operations.
///
/// Parameters an operation needs (annotation key, field name) live as
/// plain fields on the variant; dispatch is a `match`, not an indirect
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Emit every matching name. Never fails.
    ListMatches,
    /// Emit each matching name alongside its substitution. Never fails.
    TestSubstitution,
    /// Register the substituted name as an alias of the matched record.
    CreateAlias,
    /// Store the substituted name under a metadata annotation key.
    SetAnnotation { key: String },
    /// Write the substituted name as a field's string-coerced value.
    SetField { field: String },
    /// Read a field and emit its current value; the substitution is
    /// ignored.
    GetField { field: String },
}

impl Action {
    /// Apply this action to one matched record.
    pub fn apply<D: RecordDatabase>(
        &self,
        db: &D,
        handle: &D::Handle,
        original: &str,
        substituted: &str,
        config: &EngineConfig,
    ) -> Result<()> {
        match self {
            Action::ListMatches => {
                log::info!(target: EMIT_TARGET, "{original}");
                Ok(())
            }
            Action::TestSubstitution => {
                log::info!(target: EMIT_TARGET, "{original}\t{substituted}");
                Ok(())
            }
            Action::CreateAlias => {
                db.create_alias(handle, substituted)?;
                if config.verbose {
                    log::info!("Alias {original} -> {substituted} created");
                }
                Ok(())
            }
            Action::SetAnnotation { key } => {
                db.set_annotation(handle, key, substituted)?;
                if config.verbose {
                    log::info!("{original}: added annotation ({key}, '{substituted}')");
                }
                Ok(())
            }
            Action::SetField { field } => {
                db.set_field(handle, field, substituted)?;
                if config.verbose {
                    log::info!("{original}: field {field} set to '{substituted}'");
                }
                Ok(())
            }
            Action::GetField { field } => {
                let value = db.get_field(handle, field)?;
                log::info!(target: EMIT_TARGET, "{original}: {field} = {value}");
                Ok(())
            }
        }
    }

    /// Short operation name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::ListMatches => "list-matches",
            Action::TestSubstitution => "test-substitution",
            Action::CreateAlias => "create-alias",
            Action::SetAnnotation { .. } => "set-annotation",
            Action::SetField { .. } => "set-field",
            Action::GetField { .. } => "get-field",
        }
    }
}
