use crate::core::{EntityId, EntityKind, double_option};
use crate::model::record::{Record, Reference, UniqueKey, normalize_email};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Enrolled student; optionally linked to a parent and a tutor account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub parent_id: Option<EntityId>,
    pub tutor_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub grade: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub tutor_id: Option<EntityId>,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        roll_number: impl Into<String>,
        grade: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            roll_number: roll_number.into(),
            grade: grade.into(),
            subjects: Vec::new(),
            parent_id: None,
            tutor_id: None,
        }
    }

    pub fn subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    pub fn parent(mut self, parent_id: EntityId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn tutor(mut self, tutor_id: EntityId) -> Self {
        self.tutor_id = Some(tutor_id);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<String>,
    pub grade: Option<String>,
    pub subjects: Option<Vec<String>>,
    #[serde(deserialize_with = "double_option")]
    pub parent_id: Option<Option<EntityId>>,
    #[serde(deserialize_with = "double_option")]
    pub tutor_id: Option<Option<EntityId>>,
}

impl Record for Student {
    type Draft = NewStudent;
    type Patch = StudentPatch;

    const KIND: EntityKind = EntityKind::Student;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewStudent) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            roll_number: draft.roll_number,
            grade: draft.grade,
            subjects: draft.subjects,
            parent_id: draft.parent_id,
            tutor_id: draft.tutor_id,
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: StudentPatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(roll_number) = patch.roll_number {
            self.roll_number = roll_number;
        }
        if let Some(grade) = patch.grade {
            self.grade = grade;
        }
        if let Some(subjects) = patch.subjects {
            self.subjects = subjects;
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(tutor_id) = patch.tutor_id {
            self.tutor_id = tutor_id;
        }
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::new("email", normalize_email(&self.email)),
            UniqueKey::new("roll_number", self.roll_number.trim()),
        ]
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        if let Some(parent_id) = self.parent_id {
            refs.push(Reference::new("parent_id", EntityKind::User, parent_id));
        }
        if let Some(tutor_id) = self.tutor_id {
            refs.push(Reference::new("tutor_id", EntityKind::User, tutor_id));
        }
        refs
    }
}
