use super::engine::{Predicate, Repository};
use crate::core::{EntityId, Result, StoreError, new_id};
use crate::model::Record;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Records of one kind, kept in insertion order
#[derive(Debug, Clone)]
pub struct Table<R: Record> {
    rows: BTreeMap<u64, R>,
    positions: HashMap<EntityId, u64>,
    next_position: u64,
}

impl<R: Record> Table<R> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            positions: HashMap::new(),
            next_position: 0,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&R> {
        self.positions.get(&id).and_then(|pos| self.rows.get(pos))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn scan(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }

    pub fn insert(&mut self, record: R) -> Result<()> {
        self.check_uniqueness(&record, None)?;

        let position = self.next_position;
        self.next_position += 1;

        self.positions.insert(record.id(), position);
        self.rows.insert(position, record);
        Ok(())
    }

    /// Replaces the stored record with the same id; `false` if there is none
    pub fn replace(&mut self, record: R) -> Result<bool> {
        let id = record.id();
        let Some(position) = self.positions.get(&id).copied() else {
            return Ok(false);
        };

        self.check_uniqueness(&record, Some(id))?;
        self.rows.insert(position, record);
        Ok(true)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<R> {
        let position = self.positions.remove(&id)?;
        self.rows.remove(&position)
    }

    /// Full listing in the order `R` asks for
    pub fn listing(&self) -> Vec<R> {
        let mut records: Vec<R> = self.rows.values().cloned().collect();
        R::sort_listing(&mut records);
        records
    }

    fn check_uniqueness(&self, record: &R, skip: Option<EntityId>) -> Result<()> {
        let keys = record.unique_keys();
        if keys.is_empty() {
            return Ok(());
        }

        for existing in self.rows.values() {
            if Some(existing.id()) == skip {
                continue;
            }

            for existing_key in existing.unique_keys() {
                if keys.contains(&existing_key) {
                    return Err(StoreError::conflict(format!(
                        "{} with {} '{}' already exists",
                        R::KIND,
                        existing_key.field,
                        existing_key.value
                    )));
                }
            }
        }

        Ok(())
    }
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory [`Repository`] for one record kind
pub struct MemCollection<R: Record> {
    table: RwLock<Table<R>>,
}

impl<R: Record> MemCollection<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

impl<R: Record> Default for MemCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemCollection<R> {
    async fn get(&self, id: EntityId) -> Result<Option<R>> {
        Ok(self.table.read().await.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<R>> {
        Ok(self.table.read().await.listing())
    }

    async fn find(&self, predicate: Predicate<'_, R>) -> Result<Vec<R>> {
        let table = self.table.read().await;
        let mut matches: Vec<R> = table
            .scan()
            .filter(|&record| predicate(record))
            .cloned()
            .collect();
        R::sort_listing(&mut matches);
        Ok(matches)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.table.read().await.len())
    }

    async fn create(&self, draft: R::Draft) -> Result<R> {
        let record = R::from_draft(new_id(), Utc::now(), draft);

        let mut table = self.table.write().await;
        if let Err(err) = table.insert(record.clone()) {
            warn!(kind = %R::KIND, error = %err, "create rejected");
            return Err(err);
        }

        debug!(kind = %R::KIND, id = %record.id(), "record created");
        Ok(record)
    }

    async fn update(&self, id: EntityId, patch: R::Patch) -> Result<Option<R>> {
        let mut table = self.table.write().await;
        let Some(existing) = table.get(id) else {
            return Ok(None);
        };

        let mut merged = existing.clone();
        merged.apply_patch(patch, Utc::now());

        if let Err(err) = table.replace(merged.clone()) {
            warn!(kind = %R::KIND, %id, error = %err, "update rejected");
            return Err(err);
        }

        debug!(kind = %R::KIND, %id, "record updated");
        Ok(Some(merged))
    }

    async fn delete(&self, id: EntityId) -> Result<bool> {
        let removed = self.table.write().await.remove(id).is_some();
        if removed {
            debug!(kind = %R::KIND, %id, "record deleted");
        }
        Ok(removed)
    }

    async fn bulk_create(&self, drafts: Vec<R::Draft>) -> Result<Vec<R>> {
        let mut created = Vec::with_capacity(drafts.len());

        for (index, draft) in drafts.into_iter().enumerate() {
            match self.create(draft).await {
                Ok(record) => created.push(record),
                Err(err) => {
                    warn!(
                        kind = %R::KIND,
                        index,
                        committed = created.len(),
                        "batch insert aborted"
                    );
                    let committed = created.iter().map(Record::id).collect();
                    return Err(StoreError::batch_aborted(index, committed, err));
                }
            }
        }

        debug!(kind = %R::KIND, count = created.len(), "batch inserted");
        Ok(created)
    }
}
