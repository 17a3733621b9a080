use crate::core::{EntityId, EntityKind};
use crate::model::{Record, Reference};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A reference whose target id is missing from its collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingReference {
    /// Kind of the record holding the reference
    pub kind: EntityKind,
    pub id: EntityId,
    pub field: &'static str,
    pub target: EntityKind,
    pub missing: EntityId,
}

/// Collects ids and references across collections, then reports the gaps.
///
/// Detection only; the store never repairs or cascades.
#[derive(Debug, Default)]
pub struct IntegrityScan {
    known: HashMap<EntityKind, HashSet<EntityId>>,
    holders: Vec<(EntityKind, EntityId, Vec<Reference>)>,
}

impl IntegrityScan {
    pub fn add<R: Record>(&mut self, records: &[R]) {
        let ids = self.known.entry(R::KIND).or_default();
        for record in records {
            ids.insert(record.id());
            let references = record.references();
            if !references.is_empty() {
                self.holders.push((R::KIND, record.id(), references));
            }
        }
    }

    pub fn dangling(&self) -> Vec<DanglingReference> {
        let mut found = Vec::new();
        for (kind, id, references) in &self.holders {
            for reference in references {
                let exists = self
                    .known
                    .get(&reference.target)
                    .is_some_and(|ids| ids.contains(&reference.id));
                if !exists {
                    found.push(DanglingReference {
                        kind: *kind,
                        id: *id,
                        field: reference.field,
                        target: reference.target,
                        missing: reference.id,
                    });
                }
            }
        }
        found
    }
}
