//! CB-003: Registry, the authoritative name → entry store.
//!
//! Names are unique across both entry variants. Recipes may reference names
//! that are not registered yet; those references are only checked when a
//! summary reaches them.
//!
//! The store sits behind a reader-writer lock: summaries share the read side,
//! registration takes the write side so name uniqueness and the dependency
//! graph stay consistent for the duration of a traversal.

use super::aggregator::{self, AggregationError};
use super::parser;
use super::types::*;
use indexmap::IndexMap;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Registration and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("an entry named '{0}' already exists")]
    DuplicateName(String),

    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("no entry named '{0}'")]
    NotFound(String),
}

/// Plain map of registered entries, in registration order.
///
/// This is the unlocked view the aggregator walks.
#[derive(Debug, Clone, Default)]
pub struct Cookbook {
    entries: IndexMap<String, Entry>,
}

impl Cookbook {
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    fn insert(&mut self, entry: Entry) -> Result<(), RegistryError> {
        if self.entries.contains_key(entry.name()) {
            return Err(RegistryError::DuplicateName(entry.name().to_string()));
        }
        self.entries.insert(entry.name().to_string(), entry);
        Ok(())
    }
}

/// Shared, lock-protected cookbook plus the aggregation depth bound.
#[derive(Debug)]
pub struct Registry {
    inner: RwLock<Cookbook>,
    max_depth: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Registry whose summaries refuse to nest deeper than `max_depth` recipes.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            inner: RwLock::new(Cookbook::default()),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Validate and store a typed entry.
    pub fn register(&self, entry: Entry) -> Result<(), RegistryError> {
        parser::validate_entry(&entry).inspect_err(|e| warn!("rejected entry: {}", e))?;

        let name = entry.name().to_string();
        let kind = entry.kind();
        let mut cookbook = self.inner.write();
        cookbook
            .insert(entry)
            .inspect_err(|e| warn!("rejected entry: {}", e))?;
        debug!(name = %name, kind = %kind, "registered entry");
        Ok(())
    }

    /// Register an untyped payload (JSON object with a `type` tag).
    ///
    /// Checks run in order: type tag, duplicate name, field constraints.
    /// Returns the stored name.
    pub fn register_payload(&self, payload: &serde_json::Value) -> Result<String, RegistryError> {
        parser::check_type_tag(payload)?;

        // Hold the write lock across the duplicate check and the insert.
        let mut cookbook = self.inner.write();
        if let Some(name) = payload.get("name").and_then(|n| n.as_str()) {
            if cookbook.contains(name) {
                warn!(name, "rejected duplicate entry");
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
        }

        let entry = parser::parse_entry(payload)?;
        parser::validate_entry(&entry)?;
        let name = entry.name().to_string();
        let kind = entry.kind();
        cookbook.insert(entry)?;
        debug!(name = %name, kind = %kind, "registered entry");
        Ok(name)
    }

    /// Fetch a copy of a registered entry.
    pub fn lookup(&self, name: &str) -> Result<Entry, RegistryError> {
        self.inner
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains(name)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.inner.read().iter().map(|e| e.name().to_string()).collect()
    }

    /// Snapshot of every entry in registration order.
    pub fn entries(&self) -> Vec<Entry> {
        self.inner.read().iter().cloned().collect()
    }

    /// Total cook time and base-ingredient quantities for `name`.
    pub fn summarize(&self, name: &str) -> Result<AggregationResult, AggregationError> {
        let cookbook = self.inner.read();
        aggregator::summarize(&cookbook, name, self.max_depth)
    }
}
