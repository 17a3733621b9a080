use crate::core::{Amount, EntityId, EntityKind};
use crate::model::record::{Record, Reference};
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// One weekly meeting of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub day: Weekday,
    pub time: NaiveTime,
}

impl ScheduleSlot {
    pub fn new(day: Weekday, time: NaiveTime) -> Self {
        Self { day, time }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: EntityId,
    pub name: String,
    pub subject: String,
    pub grade: String,
    pub tutor_id: EntityId,
    pub schedule: Vec<ScheduleSlot>,
    pub student_ids: Vec<EntityId>,
    pub fee_amount: Amount,
    pub created_at: DateTime<Utc>,
}

impl Class {
    pub fn has_student(&self, student_id: EntityId) -> bool {
        self.student_ids.contains(&student_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub name: String,
    pub subject: String,
    pub grade: String,
    pub tutor_id: EntityId,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
    #[serde(default)]
    pub student_ids: Vec<EntityId>,
    pub fee_amount: Amount,
}

impl NewClass {
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        grade: impl Into<String>,
        tutor_id: EntityId,
        fee_amount: Amount,
    ) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            grade: grade.into(),
            tutor_id,
            schedule: Vec::new(),
            student_ids: Vec::new(),
            fee_amount,
        }
    }

    pub fn meets(mut self, day: Weekday, time: NaiveTime) -> Self {
        self.schedule.push(ScheduleSlot::new(day, time));
        self
    }

    pub fn students(mut self, student_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.student_ids = student_ids.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassPatch {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub grade: Option<String>,
    pub tutor_id: Option<EntityId>,
    pub schedule: Option<Vec<ScheduleSlot>>,
    pub student_ids: Option<Vec<EntityId>>,
    pub fee_amount: Option<Amount>,
}

impl Record for Class {
    type Draft = NewClass;
    type Patch = ClassPatch;

    const KIND: EntityKind = EntityKind::Class;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewClass) -> Self {
        Self {
            id,
            name: draft.name,
            subject: draft.subject,
            grade: draft.grade,
            tutor_id: draft.tutor_id,
            schedule: draft.schedule,
            student_ids: draft.student_ids,
            fee_amount: draft.fee_amount,
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ClassPatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(subject) = patch.subject {
            self.subject = subject;
        }
        if let Some(grade) = patch.grade {
            self.grade = grade;
        }
        if let Some(tutor_id) = patch.tutor_id {
            self.tutor_id = tutor_id;
        }
        if let Some(schedule) = patch.schedule {
            self.schedule = schedule;
        }
        if let Some(student_ids) = patch.student_ids {
            self.student_ids = student_ids;
        }
        if let Some(fee_amount) = patch.fee_amount {
            self.fee_amount = fee_amount;
        }
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = vec![Reference::new("tutor_id", EntityKind::User, self.tutor_id)];
        refs.extend(
            self.student_ids
                .iter()
                .map(|id| Reference::new("student_ids", EntityKind::Student, *id)),
        );
        refs
    }
}
