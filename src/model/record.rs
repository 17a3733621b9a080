use crate::core::{EntityId, EntityKind};
use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Contract every stored entity implements.
///
/// A record is created from a caller-supplied `Draft` (no id, no timestamps)
/// and mutated by shallow-merging a `Patch`. The store owns id and timestamp
/// synthesis, so neither type can carry them.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// Builds the stored record from a draft, using store-generated id and time
    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Overwrites every field present in the patch; absent fields are kept
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// Values that must not repeat across records of this kind
    fn unique_keys(&self) -> Vec<UniqueKey> {
        Vec::new()
    }

    /// Foreign references held by this record
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Orders a full listing. Insertion order is kept unless overridden.
    fn sort_listing(_records: &mut [Self]) {}
}

/// A unique-constraint value, already normalized for comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub field: &'static str,
    pub value: String,
}

impl UniqueKey {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// A foreign reference from one record to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target: EntityKind,
    pub id: EntityId,
}

impl Reference {
    pub fn new(field: &'static str, target: EntityKind, id: EntityId) -> Self {
        Self { field, target, id }
    }
}

/// Emails are unique regardless of case and surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
