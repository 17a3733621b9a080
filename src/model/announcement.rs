use crate::core::{EntityId, EntityKind};
use crate::model::record::{Record, Reference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Students,
    Parents,
    All,
}

impl Audience {
    /// `All` reaches every audience
    pub fn reaches(&self, wanted: Audience) -> bool {
        *self == Audience::All || *self == wanted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: EntityId,
    pub title: String,
    pub message: String,
    pub tutor_id: EntityId,
    pub target_audience: Audience,
    pub class_ids: Vec<EntityId>,
    pub is_important: bool,
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    pub fn targets_any(&self, class_ids: &[EntityId]) -> bool {
        self.class_ids.iter().any(|id| class_ids.contains(id))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
    pub title: String,
    pub message: String,
    pub tutor_id: EntityId,
    pub target_audience: Audience,
    #[serde(default)]
    pub class_ids: Vec<EntityId>,
    #[serde(default)]
    pub is_important: bool,
}

impl NewAnnouncement {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        tutor_id: EntityId,
        target_audience: Audience,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            tutor_id,
            target_audience,
            class_ids: Vec::new(),
            is_important: false,
        }
    }

    pub fn classes(mut self, class_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.class_ids = class_ids.into_iter().collect();
        self
    }

    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub message: Option<String>,
    pub tutor_id: Option<EntityId>,
    pub target_audience: Option<Audience>,
    pub class_ids: Option<Vec<EntityId>>,
    pub is_important: Option<bool>,
}

impl Record for Announcement {
    type Draft = NewAnnouncement;
    type Patch = AnnouncementPatch;

    const KIND: EntityKind = EntityKind::Announcement;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewAnnouncement) -> Self {
        Self {
            id,
            title: draft.title,
            message: draft.message,
            tutor_id: draft.tutor_id,
            target_audience: draft.target_audience,
            class_ids: draft.class_ids,
            is_important: draft.is_important,
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: AnnouncementPatch, _now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(tutor_id) = patch.tutor_id {
            self.tutor_id = tutor_id;
        }
        if let Some(target_audience) = patch.target_audience {
            self.target_audience = target_audience;
        }
        if let Some(class_ids) = patch.class_ids {
            self.class_ids = class_ids;
        }
        if let Some(is_important) = patch.is_important {
            self.is_important = is_important;
        }
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = vec![Reference::new("tutor_id", EntityKind::User, self.tutor_id)];
        refs.extend(
            self.class_ids
                .iter()
                .map(|id| Reference::new("class_ids", EntityKind::Class, *id)),
        );
        refs
    }
}
