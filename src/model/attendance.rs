use crate::core::{EntityId, EntityKind, double_option};
use crate::model::record::{Record, Reference};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    /// Late arrivals count as attended
    pub fn attended(&self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: EntityId,
    pub class_id: EntityId,
    pub student_id: EntityId,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Attendance {
    /// Same calendar day (UTC), regardless of time of day
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date.date_naive() == day
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    pub class_id: EntityId,
    pub student_id: EntityId,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewAttendance {
    pub fn new(
        class_id: EntityId,
        student_id: EntityId,
        date: DateTime<Utc>,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            class_id,
            student_id,
            date,
            status,
            notes: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttendancePatch {
    pub class_id: Option<EntityId>,
    pub student_id: Option<EntityId>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<AttendanceStatus>,
    #[serde(deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl Record for Attendance {
    type Draft = NewAttendance;
    type Patch = AttendancePatch;

    const KIND: EntityKind = EntityKind::Attendance;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewAttendance) -> Self {
        Self {
            id,
            class_id: draft.class_id,
            student_id: draft.student_id,
            date: draft.date,
            status: draft.status,
            notes: draft.notes,
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: AttendancePatch, _now: DateTime<Utc>) {
        if let Some(class_id) = patch.class_id {
            self.class_id = class_id;
        }
        if let Some(student_id) = patch.student_id {
            self.student_id = student_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("class_id", EntityKind::Class, self.class_id),
            Reference::new("student_id", EntityKind::Student, self.student_id),
        ]
    }
}
