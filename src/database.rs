//! The record database interface consumed by the engine.
//!
//! The engine never owns records. It reaches the host's database through
//! [`RecordDatabase`], a deliberately narrow surface: one restartable
//! full-traversal primitive, one-hop alias resolution, and the four
//! per-record accessors the actions need. Storage, type/instance indexing
//! and alias bookkeeping stay on the implementation's side of the trait.

use crate::error::Result;
use serde_json::Value;

/// One record as yielded by a full traversal.
///
/// Alias records carry the alias name; their canonical target is obtained
/// through [`RecordDatabase::resolve_alias`]. An alias never points at
/// another alias.
#[derive(Debug, Clone)]
pub struct RecordEntry<H> {
    /// The record's current name (an alias name for alias records).
    pub name: String,
    /// Whether this entry is an alias rather than a canonical record.
    pub is_alias: bool,
    /// Handle for the record itself; for aliases this is the alias entry,
    /// not the canonical target.
    pub handle: H,
}

/// Narrow accessor surface over the host's record database.
///
/// All methods take `&self`, including the mutating ones: the engine is
/// single-threaded and cooperative (requests, checkpoint and traversal run
/// on one logical thread), so implementations are expected to use interior
/// mutability rather than locks.
///
/// Field values are typed on the database side; reads surface them as
/// [`serde_json::Value`] and writes hand over the substituted text for the
/// implementation to coerce, rejecting with
/// [`FieldWrite`](crate::RetoolsError::FieldWrite) when the field's type
/// refuses the value.
pub trait RecordDatabase {
    /// Handle used to address one canonical record across calls.
    type Handle: Clone;

    /// Traverse every record, canonical and alias alike, in the database's
    /// native enumeration order. Restartable: each call yields a fresh,
    /// finite traversal. The order is implementation-defined but stable
    /// within one call.
    fn records(&self) -> Box<dyn Iterator<Item = RecordEntry<Self::Handle>> + '_>;

    /// Resolve an alias name to its canonical record's handle.
    ///
    /// Exactly one hop: the result is always a canonical record. Fails
    /// with [`NotFound`](crate::RetoolsError::NotFound) when the name is
    /// unknown or does not name an alias.
    fn resolve_alias(&self, name: &str) -> Result<Self::Handle>;

    /// Read a field's current value.
    ///
    /// Fails with [`UnknownField`](crate::RetoolsError::UnknownField) when
    /// the field does not exist on this record's type.
    fn get_field(&self, handle: &Self::Handle, field: &str) -> Result<Value>;

    /// Write `value` as the field's string-coerced value.
    ///
    /// Fails with [`UnknownField`](crate::RetoolsError::UnknownField) when
    /// the field does not exist, or
    /// [`FieldWrite`](crate::RetoolsError::FieldWrite) when the field
    /// rejects the value.
    fn set_field(&self, handle: &Self::Handle, field: &str, value: &str) -> Result<()>;

    /// Register `alias` as an alternate name for the record.
    ///
    /// Fails with [`AliasCreation`](crate::RetoolsError::AliasCreation)
    /// when the name is already taken or invalid.
    fn create_alias(&self, handle: &Self::Handle, alias: &str) -> Result<()>;

    /// Store `value` under the metadata annotation `key`.
    ///
    /// Fails with
    /// [`AnnotationWrite`](crate::RetoolsError::AnnotationWrite) on write
    /// failure.
    fn set_annotation(&self, handle: &Self::Handle, key: &str, value: &str) -> Result<()>;
}
