// ============================================================================
// TutorDesk Library
// ============================================================================

//! In-memory data store for a tutoring center.
//!
//! Ten record kinds (users, students, classes, attendance, fees, homework,
//! submissions, announcements, audit logs, settings) live in per-kind
//! collections behind the [`Storage`] trait. Route handlers talk to the trait,
//! so the in-memory backend can be swapped for a database one without
//! touching call sites.
//!
//! # Examples
//!
//! ```
//! use tutordesk::model::{NewUser, Role, UserPatch};
//! use tutordesk::{MemStorage, Storage};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemStorage::new();
//!
//! let tutor = store
//!     .users()
//!     .create(NewUser::new("tara@center.test", "pw", "Tara", Role::Tutor))
//!     .await?;
//!
//! let renamed = store
//!     .users()
//!     .update(tutor.id, UserPatch { name: Some("Tara Q.".into()), ..Default::default() })
//!     .await?
//!     .expect("tutor exists");
//! assert_eq!(renamed.email, "tara@center.test");
//!
//! let tutors = store.get_users_by_role(Role::Tutor).await?;
//! assert_eq!(tutors.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod model;
pub mod storage;

// Re-export main types for convenience
pub use config::{AppConfig, StoreConfig};
pub use core::{Amount, BillingMonth, EntityId, EntityKind, Grade, Result, StoreError};
pub use storage::{
    AdminDashboardStats, DanglingReference, MemStorage, Repository, Storage, TutorDashboardStats,
};
