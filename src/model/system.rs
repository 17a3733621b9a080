//! Admin-side records: the audit trail and key/value settings.

use crate::core::{EntityId, EntityKind, double_option};
use crate::model::record::{Record, Reference, UniqueKey};
use crate::model::user::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::net::IpAddr;

/// Payload attached to an audit entry.
///
/// Known admin actions get a typed variant; anything else goes into
/// `Other` as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogDetails {
    #[default]
    Empty,
    UserCreated {
        email: String,
        role: Role,
    },
    UserUpdated {
        fields: Vec<String>,
    },
    UserDeleted {
        email: String,
    },
    UserStatusChanged {
        is_active: bool,
    },
    SettingChanged {
        key: String,
        old_value: Option<String>,
        new_value: String,
    },
    ReportGenerated {
        report: String,
    },
    Other {
        data: Map<String, Value>,
    },
}

/// Append-only audit entry written for admin actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLog {
    pub id: EntityId,
    pub admin_id: EntityId,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub details: LogDetails,
    pub ip_address: Option<IpAddr>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSystemLog {
    pub admin_id: EntityId,
    pub action: String,
    #[serde(default)]
    pub target_type: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub details: LogDetails,
    #[serde(default)]
    pub ip_address: Option<IpAddr>,
}

impl NewSystemLog {
    pub fn new(admin_id: EntityId, action: impl Into<String>) -> Self {
        Self {
            admin_id,
            action: action.into(),
            target_type: None,
            target_id: None,
            details: LogDetails::Empty,
            ip_address: None,
        }
    }

    pub fn target(mut self, target_type: impl Into<String>, target_id: impl ToString) -> Self {
        self.target_type = Some(target_type.into());
        self.target_id = Some(target_id.to_string());
        self
    }

    pub fn details(mut self, details: LogDetails) -> Self {
        self.details = details;
        self
    }

    pub fn ip(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }
}

impl Record for SystemLog {
    type Draft = NewSystemLog;
    // Audit entries are never edited
    type Patch = Infallible;

    const KIND: EntityKind = EntityKind::SystemLog;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewSystemLog) -> Self {
        Self {
            id,
            admin_id: draft.admin_id,
            action: draft.action,
            target_type: draft.target_type,
            target_id: draft.target_id,
            details: draft.details,
            ip_address: draft.ip_address,
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: Infallible, _now: DateTime<Utc>) {
        match patch {}
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::new("admin_id", EntityKind::User, self.admin_id)]
    }

    /// Newest first; among equal timestamps the later insert wins
    fn sort_listing(records: &mut [Self]) {
        records.reverse();
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    }
}

pub const DEFAULT_SETTING_CATEGORY: &str = "general";

/// Named configuration value editable from the admin panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSetting {
    pub id: EntityId,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub category: String,
    pub updated_by: Option<EntityId>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSetting {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub updated_by: Option<EntityId>,
}

fn default_category() -> String {
    DEFAULT_SETTING_CATEGORY.to_string()
}

impl NewSetting {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: None,
            category: default_category(),
            updated_by: None,
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn updated_by(mut self, user_id: EntityId) -> Self {
        self.updated_by = Some(user_id);
        self
    }
}

/// The key is fixed once a setting exists
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingPatch {
    pub value: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub updated_by: Option<Option<EntityId>>,
}

impl Record for SystemSetting {
    type Draft = NewSetting;
    type Patch = SettingPatch;

    const KIND: EntityKind = EntityKind::SystemSetting;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewSetting) -> Self {
        Self {
            id,
            key: draft.key,
            value: draft.value,
            description: draft.description,
            category: draft.category,
            updated_by: draft.updated_by,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: SettingPatch, now: DateTime<Utc>) {
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(updated_by) = patch.updated_by {
            self.updated_by = updated_by;
        }
        self.updated_at = now;
    }

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::new("key", self.key.trim())]
    }

    fn references(&self) -> Vec<Reference> {
        self.updated_by
            .map(|id| Reference::new("updated_by", EntityKind::User, id))
            .into_iter()
            .collect()
    }
}
