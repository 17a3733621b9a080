pub mod error;
pub mod types;
pub mod value;

pub use error::{Result, StoreError};
pub use types::{EntityId, EntityKind, double_option, new_id};
pub use value::{Amount, BillingMonth, Grade};
