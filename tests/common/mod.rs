//! Shared in-memory record database fixture for integration tests.
//!
//! Records live in insertion order with typed `serde_json::Value` fields,
//! string annotations and an alias table. Mutating trait methods use
//! interior mutability, matching the engine's single-threaded contract.
//! Field writes coerce the incoming text to the field's current type and
//! reject mismatches, so tests can exercise the `FieldWrite` path.

#![allow(dead_code)]

use retools_engine::{RecordDatabase, RecordEntry, Result, RetoolsError};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct RecordData {
    name: String,
    fields: BTreeMap<String, Value>,
    annotations: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct MemoryDatabase {
    records: RefCell<Vec<RecordData>>,
    /// (alias name, canonical record index), in creation order.
    aliases: RefCell<Vec<(String, usize)>>,
    /// Simulate a metadata store outage.
    fail_annotations: std::cell::Cell<bool>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canonical record with the given fields.
    pub fn add_record(&self, name: &str, fields: &[(&str, Value)]) {
        self.records.borrow_mut().push(RecordData {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            annotations: BTreeMap::new(),
        });
    }

    /// Add several field-less records at once.
    pub fn add_records(&self, names: &[&str]) {
        for name in names {
            self.add_record(name, &[]);
        }
    }

    /// Pre-register an alias, as if the database was loaded with it.
    pub fn add_alias_entry(&self, alias: &str, target: &str) {
        let idx = self.index_of(target).expect("alias target must exist");
        self.aliases.borrow_mut().push((alias.to_string(), idx));
    }

    /// Make annotation writes fail until reset.
    pub fn set_fail_annotations(&self, fail: bool) {
        self.fail_annotations.set(fail);
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.records.borrow().iter().position(|r| r.name == name)
    }

    fn name_taken(&self, name: &str) -> bool {
        self.index_of(name).is_some()
            || self.aliases.borrow().iter().any(|(alias, _)| alias == name)
    }

    // Assertion helpers

    pub fn has_alias(&self, alias: &str, target: &str) -> bool {
        let records = self.records.borrow();
        self.aliases
            .borrow()
            .iter()
            .any(|(a, idx)| a == alias && records[*idx].name == target)
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.borrow().len()
    }

    pub fn annotation(&self, name: &str, key: &str) -> Option<String> {
        let idx = self.index_of(name)?;
        self.records.borrow()[idx].annotations.get(key).cloned()
    }

    pub fn field(&self, name: &str, field: &str) -> Option<Value> {
        let idx = self.index_of(name)?;
        self.records.borrow()[idx].fields.get(field).cloned()
    }

    /// Full state dump for whole-database equality checks: sorted
    /// (name, fields, annotations, aliases-pointing-here) tuples.
    pub fn dump(&self) -> Vec<(String, Vec<(String, Value)>, Vec<(String, String)>, Vec<String>)> {
        let records = self.records.borrow();
        let aliases = self.aliases.borrow();
        let mut out: Vec<_> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let mut pointing: Vec<String> = aliases
                    .iter()
                    .filter(|(_, target)| *target == idx)
                    .map(|(alias, _)| alias.clone())
                    .collect();
                pointing.sort();
                (
                    record.name.clone(),
                    record.fields.clone().into_iter().collect(),
                    record.annotations.clone().into_iter().collect(),
                    pointing,
                )
            })
            .collect();
        // Record names are unique; sorting by name is a total order.
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

impl RecordDatabase for MemoryDatabase {
    type Handle = usize;

    fn records(&self) -> Box<dyn Iterator<Item = RecordEntry<usize>> + '_> {
        // Materialized at call time: the traversal is restartable and a
        // visitor creating aliases must not invalidate it.
        let canonical: Vec<RecordEntry<usize>> = self
            .records
            .borrow()
            .iter()
            .enumerate()
            .map(|(idx, record)| RecordEntry {
                name: record.name.clone(),
                is_alias: false,
                handle: idx,
            })
            .collect();
        let aliases: Vec<RecordEntry<usize>> = self
            .aliases
            .borrow()
            .iter()
            .map(|(alias, target)| RecordEntry {
                name: alias.clone(),
                is_alias: true,
                handle: *target,
            })
            .collect();
        Box::new(canonical.into_iter().chain(aliases))
    }

    fn resolve_alias(&self, name: &str) -> Result<usize> {
        self.aliases
            .borrow()
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, target)| *target)
            .ok_or_else(|| RetoolsError::NotFound(name.to_string()))
    }

    fn get_field(&self, handle: &usize, field: &str) -> Result<Value> {
        self.records.borrow()[*handle]
            .fields
            .get(field)
            .cloned()
            .ok_or_else(|| RetoolsError::UnknownField(field.to_string()))
    }

    fn set_field(&self, handle: &usize, field: &str, value: &str) -> Result<()> {
        let mut records = self.records.borrow_mut();
        let record = &mut records[*handle];
        let slot = record
            .fields
            .get_mut(field)
            .ok_or_else(|| RetoolsError::UnknownField(field.to_string()))?;

        // Coerce to the field's current type; reject mismatches the way a
        // typed field store would.
        let coerced = match slot {
            Value::String(_) => Value::String(value.to_string()),
            Value::Number(_) => value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| {
                    RetoolsError::FieldWrite(format!("{field}: '{value}' is not a number"))
                })?,
            Value::Bool(_) => value
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|_| {
                    RetoolsError::FieldWrite(format!("{field}: '{value}' is not a boolean"))
                })?,
            other => {
                return Err(RetoolsError::FieldWrite(format!(
                    "{field}: cannot coerce '{value}' into {other}"
                )))
            }
        };
        *slot = coerced;
        Ok(())
    }

    fn create_alias(&self, handle: &usize, alias: &str) -> Result<()> {
        if alias.is_empty() {
            return Err(RetoolsError::AliasCreation("empty alias name".to_string()));
        }
        if self.name_taken(alias) {
            return Err(RetoolsError::AliasCreation(format!(
                "{alias} already exists"
            )));
        }
        self.aliases.borrow_mut().push((alias.to_string(), *handle));
        Ok(())
    }

    fn set_annotation(&self, handle: &usize, key: &str, value: &str) -> Result<()> {
        if self.fail_annotations.get() {
            return Err(RetoolsError::AnnotationWrite(format!(
                "{key}: metadata store unavailable"
            )));
        }
        self.records.borrow_mut()[*handle]
            .annotations
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
