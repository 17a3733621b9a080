use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Primary key of every stored record.
pub type EntityId = Uuid;

/// Generates a fresh record identifier
pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// The ten record kinds held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Student,
    Class,
    Attendance,
    Fee,
    Homework,
    HomeworkSubmission,
    Announcement,
    SystemLog,
    SystemSetting,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::User,
        EntityKind::Student,
        EntityKind::Class,
        EntityKind::Attendance,
        EntityKind::Fee,
        EntityKind::Homework,
        EntityKind::HomeworkSubmission,
        EntityKind::Announcement,
        EntityKind::SystemLog,
        EntityKind::SystemSetting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Student => "student",
            Self::Class => "class",
            Self::Attendance => "attendance",
            Self::Fee => "fee",
            Self::Homework => "homework",
            Self::HomeworkSubmission => "homework_submission",
            Self::Announcement => "announcement",
            Self::SystemLog => "system_log",
            Self::SystemSetting => "system_setting",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str() == normalized || format!("{}s", kind.as_str()) == normalized
            })
            .ok_or_else(|| format!("unknown entity kind '{raw}'"))
    }
}

/// Deserializes a field that distinguishes "absent" from "explicit null".
///
/// Used by patch structs together with `#[serde(default)]`: a missing key
/// stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
