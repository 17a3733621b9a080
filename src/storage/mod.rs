pub mod engine;
pub mod integrity;
pub mod memory;
pub mod seed;
pub mod stats;
pub mod store;
pub mod table;

pub use engine::{Predicate, Repository};
pub use integrity::{DanglingReference, IntegrityScan};
pub use memory::MemStorage;
pub use seed::{SeedSummary, load_demo_data};
pub use stats::{AdminDashboardStats, RoleCounts, TutorDashboardStats, attendance_rate};
pub use store::Storage;
pub use table::{MemCollection, Table};
