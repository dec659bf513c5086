//! Request scripts.
//!
//! A script is a YAML sequence of requests, executed in document order
//! against an engine. It is the crate-native replacement for the shell
//! startup lines that traditionally drove tools like this: hosts can ship
//! a fixed set of renaming/annotation rules as a file and replay it at
//! boot, before or after the database-ready checkpoint.
//!
//! ```yaml
//! - action: add-alias
//!   pattern: "(.*):A"
//!   template: "$1:X"
//! - action: add-annotation
//!   pattern: "(.*):B"
//!   key: archive
//!   template: "monitor 1"
//! ```

use crate::database::RecordDatabase;
use crate::engine::{Disposition, RetoolsEngine};
use crate::error::{Result, RetoolsError};
use serde::Deserialize;
use std::path::Path;

/// One scripted request, tagged by operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case", deny_unknown_fields)]
pub enum RequestSpec {
    ListMatches {
        pattern: String,
    },
    TestSubstitution {
        pattern: String,
        template: String,
    },
    AddAlias {
        pattern: String,
        template: String,
    },
    AddAnnotation {
        pattern: String,
        key: String,
        template: String,
    },
    SetField {
        pattern: String,
        field: String,
        template: String,
    },
    GetField {
        pattern: String,
        field: String,
    },
}

/// Parse a YAML request script.
///
/// Fails with [`RetoolsError::ScriptError`] when the document is not a
/// well-formed request sequence; nothing is executed on failure.
pub fn parse_script(yaml: &str) -> Result<Vec<RequestSpec>> {
    serde_yaml::from_str(yaml).map_err(|e| RetoolsError::ScriptError(e.to_string()))
}

/// Load and parse a request script from a file.
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<RequestSpec>> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

/// Submit every request in order, collecting each request's outcome.
///
/// A request with a malformed pattern fails on its own; later requests
/// still run. The result vector is index-aligned with `requests`.
pub fn run_script<D: RecordDatabase>(
    engine: &mut RetoolsEngine,
    db: &D,
    requests: &[RequestSpec],
) -> Vec<Result<Disposition>> {
    requests
        .iter()
        .map(|request| match request {
            RequestSpec::ListMatches { pattern } => engine.list_matches(db, pattern),
            RequestSpec::TestSubstitution { pattern, template } => {
                engine.test_substitution(db, pattern, template)
            }
            RequestSpec::AddAlias { pattern, template } => engine.add_alias(db, pattern, template),
            RequestSpec::AddAnnotation {
                pattern,
                key,
                template,
            } => engine.add_annotation(db, pattern, key, template),
            RequestSpec::SetField {
                pattern,
                field,
                template,
            } => engine.set_field(db, pattern, field, template),
            RequestSpec::GetField { pattern, field } => engine.get_field(db, pattern, field),
        })
        .collect()
}
