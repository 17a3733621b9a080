use crate::core::{EntityId, Result};
use crate::model::Record;
use async_trait::async_trait;

/// Row filter handed to [`Repository::find`]
pub type Predicate<'a, R> = &'a (dyn Fn(&R) -> bool + Send + Sync);

/// CRUD contract for one record kind - allows pluggable storage backends.
///
/// Misses are reported as `None`/`false`, never as errors. Errors are
/// reserved for unique-key conflicts and aborted batches.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Point lookup by id
    async fn get(&self, id: EntityId) -> Result<Option<R>>;

    /// Every record, in the kind's listing order
    async fn get_all(&self) -> Result<Vec<R>>;

    /// Linear scan keeping the records the predicate accepts, in listing order
    async fn find(&self, predicate: Predicate<'_, R>) -> Result<Vec<R>>;

    async fn count(&self) -> Result<usize>;

    /// Stores a new record with a generated id and creation time
    async fn create(&self, draft: R::Draft) -> Result<R>;

    /// Merges the patch over the stored record; `None` if the id is unknown
    async fn update(&self, id: EntityId, patch: R::Patch) -> Result<Option<R>>;

    /// Removes the record; `false` if the id is unknown
    async fn delete(&self, id: EntityId) -> Result<bool>;

    /// Creates drafts one by one in order.
    ///
    /// Not atomic: if draft `n` fails, drafts `0..n` stay committed, the rest
    /// are never attempted and `StoreError::BatchAborted { index: n, committed, .. }`
    /// is returned with the ids of the committed drafts in input order.
    async fn bulk_create(&self, drafts: Vec<R::Draft>) -> Result<Vec<R>>;
}
