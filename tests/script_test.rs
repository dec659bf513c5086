//! Request-script integration tests: parse, load from disk, run in order.

mod common;

use common::MemoryDatabase;
use retools_engine::script::{load_script, parse_script, run_script};
use retools_engine::{Disposition, EngineConfig, RetoolsEngine, RetoolsError};
use serde_json::json;
use std::io::Write;

const BOOT_SCRIPT: &str = r#"
- action: add-alias
  pattern: "(.*):A"
  template: "$1:X"
- action: add-annotation
  pattern: "(.*):B"
  key: archive
  template: "monitor 1"
- action: set-field
  pattern: "PS(.*)"
  field: DESC
  template: "supply $1"
"#;

fn populated_db() -> MemoryDatabase {
    let db = MemoryDatabase::new();
    db.add_records(&["DIAG:CH0:A", "DIAG:CH0:B"]);
    db.add_record("PS1", &[("DESC", json!("old"))]);
    db
}

#[test]
fn test_run_script_applies_requests_in_order() {
    let db = populated_db();
    let mut engine =
        RetoolsEngine::with_config(EngineConfig::new().with_batching(false).with_verbose(false));

    let requests = parse_script(BOOT_SCRIPT).unwrap();
    let outcomes = run_script(&mut engine, &db, &requests);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|outcome| outcome.is_ok()));
    assert!(db.has_alias("DIAG:CH0:X", "DIAG:CH0:A"));
    assert_eq!(
        db.annotation("DIAG:CH0:B", "archive").as_deref(),
        Some("monitor 1")
    );
    assert_eq!(db.field("PS1", "DESC"), Some(json!("supply 1")));
}

#[test]
fn test_run_script_queues_before_checkpoint() {
    let db = populated_db();
    let mut engine = RetoolsEngine::with_config(EngineConfig::new().with_verbose(false));

    let requests = parse_script(BOOT_SCRIPT).unwrap();
    let outcomes = run_script(&mut engine, &db, &requests);

    assert!(outcomes
        .iter()
        .all(|outcome| matches!(outcome, Ok(Disposition::Queued))));
    assert_eq!(engine.pending_requests(), 3);
    assert_eq!(db.alias_count(), 0);

    engine.database_ready(&db);
    assert!(db.has_alias("DIAG:CH0:X", "DIAG:CH0:A"));
}

#[test]
fn test_bad_pattern_does_not_stop_later_requests() {
    let db = populated_db();
    let mut engine =
        RetoolsEngine::with_config(EngineConfig::new().with_batching(false).with_verbose(false));

    let yaml = r#"
- action: add-alias
  pattern: "(.*"
  template: "$1:X"
- action: add-annotation
  pattern: "(.*):B"
  key: archive
  template: "monitor 1"
"#;
    let requests = parse_script(yaml).unwrap();
    let outcomes = run_script(&mut engine, &db, &requests);

    assert!(matches!(
        outcomes[0],
        Err(RetoolsError::CompilationError(_))
    ));
    assert!(outcomes[1].is_ok());
    assert_eq!(
        db.annotation("DIAG:CH0:B", "archive").as_deref(),
        Some("monitor 1")
    );
}

#[test]
fn test_load_script_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BOOT_SCRIPT.as_bytes()).unwrap();

    let requests = load_script(file.path()).unwrap();
    assert_eq!(requests.len(), 3);
}

#[test]
fn test_load_script_reports_io_failure() {
    let err = load_script("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, RetoolsError::IoError(_)));
}

#[test]
fn test_parse_failure_is_fatal_and_runs_nothing() {
    let db = populated_db();
    let before = db.dump();

    let err = parse_script("- action: [broken").unwrap_err();
    assert!(matches!(err, RetoolsError::ScriptError(_)));
    assert_eq!(db.dump(), before);
}
