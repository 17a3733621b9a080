use super::engine::Repository;
use super::seed::load_demo_data;
use super::store::Storage;
use super::table::MemCollection;
use crate::config::StoreConfig;
use crate::core::Result;
use crate::model::{
    Announcement, Attendance, Class, Fee, Homework, HomeworkSubmission, Student, SystemLog,
    SystemSetting, User,
};
use tracing::info;

/// In-memory [`Storage`] backend.
///
/// Each collection has its own lock, so a write to fees never waits on a
/// read of users. The store is an ordinary value: build one per process (or
/// per test) and share it through an `Arc`.
#[derive(Default)]
pub struct MemStorage {
    users: MemCollection<User>,
    students: MemCollection<Student>,
    classes: MemCollection<Class>,
    attendance: MemCollection<Attendance>,
    fees: MemCollection<Fee>,
    homework: MemCollection<Homework>,
    submissions: MemCollection<HomeworkSubmission>,
    announcements: MemCollection<Announcement>,
    system_logs: MemCollection<SystemLog>,
    settings: MemCollection<SystemSetting>,
}

impl MemStorage {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store and applies the configured initialization
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let store = Self::new();
        if config.seed_demo_data {
            load_demo_data(&store, &config).await?;
        }
        info!(seeded = config.seed_demo_data, "in-memory store ready");
        Ok(store)
    }
}

impl Storage for MemStorage {
    fn users(&self) -> &dyn Repository<User> {
        &self.users
    }

    fn students(&self) -> &dyn Repository<Student> {
        &self.students
    }

    fn classes(&self) -> &dyn Repository<Class> {
        &self.classes
    }

    fn attendance(&self) -> &dyn Repository<Attendance> {
        &self.attendance
    }

    fn fees(&self) -> &dyn Repository<Fee> {
        &self.fees
    }

    fn homework(&self) -> &dyn Repository<Homework> {
        &self.homework
    }

    fn submissions(&self) -> &dyn Repository<HomeworkSubmission> {
        &self.submissions
    }

    fn announcements(&self) -> &dyn Repository<Announcement> {
        &self.announcements
    }

    fn system_logs(&self) -> &dyn Repository<SystemLog> {
        &self.system_logs
    }

    fn settings(&self) -> &dyn Repository<SystemSetting> {
        &self.settings
    }
}
