use crate::core::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Batch insert aborted at item {index}: {source}")]
    BatchAborted {
        index: usize,
        /// Ids created before the failing item, in input order
        committed: Vec<EntityId>,
        #[source]
        source: Box<StoreError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Wraps the failure of one batch item, keeping the position it failed at.
    pub fn batch_aborted(index: usize, committed: Vec<EntityId>, source: StoreError) -> Self {
        Self::BatchAborted {
            index,
            committed,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
