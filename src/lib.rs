//! # Retools Engine
//!
//! A pattern-driven batch mutation engine for record databases: apply one
//! regular expression to the names of every record in an already-loaded
//! database and, for each matching name, perform a mutation derived from
//! the match: create an alternate name, attach metadata, or write/read a
//! typed field.
//!
//! The engine is two-phase. Requests made before the host database
//! reaches its ready checkpoint are queued; when the checkpoint fires, one
//! snapshot traversal applies everything queued, then the engine switches
//! permanently to immediate per-request execution. Callers never need to
//! know which phase is active.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use retools_engine::{EngineConfig, RetoolsEngine};
//!
//! let mut engine = RetoolsEngine::new();
//!
//! // Alias records ending in :A to :X, eg PS1:CH0:A -> PS1:CH0:X.
//! // Before the database is ready this queues; afterwards it runs now.
//! engine.add_alias(&db, "(.*):A", "$1:X")?;
//!
//! // The host's one-shot "database ready" notification:
//! engine.database_ready(&db);
//! # Ok::<(), retools_engine::RetoolsError>(())
//! ```
//!
//! ## Bringing a database
//!
//! The engine never owns records; implement [`RecordDatabase`] over your
//! store. The trait is a narrow surface: a restartable full traversal, a
//! one-hop alias resolver and four per-record accessors.
//!
//! ## Request scripts
//!
//! ```rust,ignore
//! use retools_engine::script;
//!
//! let requests = script::load_script("boot-renames.yaml")?;
//! let outcomes = script::run_script(&mut engine, &db, &requests);
//! # Ok::<(), retools_engine::RetoolsError>(())
//! ```

pub mod action;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod pattern;
pub mod prefilter;
pub mod scheduler;
pub mod script;

// Primary engine interface
pub use engine::{Disposition, RetoolsEngine};

// Configuration
pub use config::EngineConfig;

// Core types and errors
pub use error::{Result, RetoolsError};
pub use pattern::Pattern;

// Database interface
pub use database::{RecordDatabase, RecordEntry};

// Actions and scheduling
pub use action::Action;
pub use matcher::{for_each_match, MatchStats};
pub use scheduler::{BatchScheduler, PendingAction, Phase};

// Request scripts
pub use script::RequestSpec;
