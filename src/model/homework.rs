use crate::core::{EntityId, EntityKind, Grade, double_option};
use crate::model::record::{Record, Reference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Active,
    Completed,
    Archived,
}

/// Assignment handed out to a class.
///
/// `total_students` and `submitted_count` are counters kept by whoever
/// records submissions; the store never derives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homework {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub class_id: EntityId,
    pub tutor_id: EntityId,
    pub due_date: DateTime<Utc>,
    pub assigned_date: DateTime<Utc>,
    pub status: HomeworkStatus,
    pub total_students: u32,
    pub submitted_count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHomework {
    pub title: String,
    pub description: String,
    pub class_id: EntityId,
    pub tutor_id: EntityId,
    pub due_date: DateTime<Utc>,
    #[serde(default = "default_homework_status")]
    pub status: HomeworkStatus,
    #[serde(default)]
    pub total_students: u32,
    #[serde(default)]
    pub submitted_count: u32,
}

fn default_homework_status() -> HomeworkStatus {
    HomeworkStatus::Active
}

impl NewHomework {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        class_id: EntityId,
        tutor_id: EntityId,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            class_id,
            tutor_id,
            due_date,
            status: HomeworkStatus::Active,
            total_students: 0,
            submitted_count: 0,
        }
    }

    pub fn total_students(mut self, total: u32) -> Self {
        self.total_students = total;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeworkPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub class_id: Option<EntityId>,
    pub tutor_id: Option<EntityId>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<HomeworkStatus>,
    pub total_students: Option<u32>,
    pub submitted_count: Option<u32>,
}

impl Record for Homework {
    type Draft = NewHomework;
    type Patch = HomeworkPatch;

    const KIND: EntityKind = EntityKind::Homework;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewHomework) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            class_id: draft.class_id,
            tutor_id: draft.tutor_id,
            due_date: draft.due_date,
            assigned_date: now,
            status: draft.status,
            total_students: draft.total_students,
            submitted_count: draft.submitted_count,
        }
    }

    fn apply_patch(&mut self, patch: HomeworkPatch, _now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(class_id) = patch.class_id {
            self.class_id = class_id;
        }
        if let Some(tutor_id) = patch.tutor_id {
            self.tutor_id = tutor_id;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(total_students) = patch.total_students {
            self.total_students = total_students;
        }
        if let Some(submitted_count) = patch.submitted_count {
            self.submitted_count = submitted_count;
        }
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("class_id", EntityKind::Class, self.class_id),
            Reference::new("tutor_id", EntityKind::User, self.tutor_id),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkSubmission {
    pub id: EntityId,
    pub homework_id: EntityId,
    pub student_id: EntityId,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<Grade>,
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub homework_id: EntityId,
    pub student_id: EntityId,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

impl NewSubmission {
    pub fn new(homework_id: EntityId, student_id: EntityId) -> Self {
        Self {
            homework_id,
            student_id,
            content: None,
            attachment_url: None,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn attachment(mut self, url: impl Into<String>) -> Self {
        self.attachment_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionPatch {
    #[serde(deserialize_with = "double_option")]
    pub content: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub attachment_url: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub grade: Option<Option<Grade>>,
    #[serde(deserialize_with = "double_option")]
    pub feedback: Option<Option<String>>,
    pub status: Option<SubmissionStatus>,
}

impl SubmissionPatch {
    /// Records a grade and optional feedback, moving the submission to graded
    pub fn graded(grade: Grade, feedback: Option<String>) -> Self {
        Self {
            grade: Some(Some(grade)),
            feedback: Some(feedback),
            status: Some(SubmissionStatus::Graded),
            ..Default::default()
        }
    }
}

impl Record for HomeworkSubmission {
    type Draft = NewSubmission;
    type Patch = SubmissionPatch;

    const KIND: EntityKind = EntityKind::HomeworkSubmission;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewSubmission) -> Self {
        Self {
            id,
            homework_id: draft.homework_id,
            student_id: draft.student_id,
            content: draft.content,
            attachment_url: draft.attachment_url,
            submitted_at: now,
            grade: None,
            feedback: None,
            status: SubmissionStatus::Submitted,
        }
    }

    fn apply_patch(&mut self, patch: SubmissionPatch, _now: DateTime<Utc>) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(attachment_url) = patch.attachment_url {
            self.attachment_url = attachment_url;
        }
        if let Some(grade) = patch.grade {
            self.grade = grade;
        }
        if let Some(feedback) = patch.feedback {
            self.feedback = feedback;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("homework_id", EntityKind::Homework, self.homework_id),
            Reference::new("student_id", EntityKind::Student, self.student_id),
        ]
    }
}
