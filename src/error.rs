//! Error types for the retools engine crate.

use std::fmt;

pub type Result<T> = std::result::Result<T, RetoolsError>;

/// Errors produced by pattern compilation, per-entity actions and script
/// loading.
///
/// Only `CompilationError` and `ScriptError` are fatal to the request that
/// produced them. The per-entity variants (`AliasCreation`,
/// `AnnotationWrite`, `UnknownField`, `FieldWrite`, `NotFound`) are logged
/// with the offending entity name and swallowed so a traversal or batch
/// always runs to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum RetoolsError {
    CompilationError(String),
    AliasCreation(String),
    AnnotationWrite(String),
    UnknownField(String),
    FieldWrite(String),
    NotFound(String),
    IoError(String),
    ScriptError(String),
}

impl fmt::Display for RetoolsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetoolsError::CompilationError(msg) => {
                write!(f, "Regex compilation failed: {msg}")
            }
            RetoolsError::AliasCreation(msg) => write!(f, "Alias creation failed: {msg}"),
            RetoolsError::AnnotationWrite(msg) => write!(f, "Annotation write failed: {msg}"),
            RetoolsError::UnknownField(name) => write!(f, "Unknown field: {name}"),
            RetoolsError::FieldWrite(msg) => write!(f, "Field write rejected: {msg}"),
            RetoolsError::NotFound(name) => write!(f, "Record not found: {name}"),
            RetoolsError::IoError(msg) => write!(f, "IO error: {msg}"),
            RetoolsError::ScriptError(msg) => write!(f, "Script parsing error: {msg}"),
        }
    }
}

impl std::error::Error for RetoolsError {}

impl From<std::io::Error> for RetoolsError {
    fn from(err: std::io::Error) -> Self {
        RetoolsError::IoError(err.to_string())
    }
}

impl RetoolsError {
    /// True for the variants that abort the whole request rather than a
    /// single entity.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RetoolsError::CompilationError(_) | RetoolsError::ScriptError(_)
        )
    }
}
