use crate::core::{Amount, BillingMonth, EntityId, EntityKind, double_option};
use crate::model::record::{Record, Reference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment state of a fee. Any state may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Pending,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: EntityId,
    pub student_id: EntityId,
    pub class_id: EntityId,
    pub amount: Amount,
    pub due_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
    pub status: FeeStatus,
    pub month: BillingMonth,
    pub created_at: DateTime<Utc>,
}

impl Fee {
    pub fn is_paid(&self) -> bool {
        self.status == FeeStatus::Paid
    }

    /// Unpaid and past its due date at `as_of`
    pub fn is_past_due(&self, as_of: DateTime<Utc>) -> bool {
        self.status != FeeStatus::Paid && self.due_date < as_of
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFee {
    pub student_id: EntityId,
    pub class_id: EntityId,
    pub amount: Amount,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub paid_date: Option<DateTime<Utc>>,
    pub status: FeeStatus,
    pub month: BillingMonth,
}

impl NewFee {
    /// A pending fee with no payment recorded
    pub fn pending(
        student_id: EntityId,
        class_id: EntityId,
        amount: Amount,
        due_date: DateTime<Utc>,
        month: BillingMonth,
    ) -> Self {
        Self {
            student_id,
            class_id,
            amount,
            due_date,
            paid_date: None,
            status: FeeStatus::Pending,
            month,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeePatch {
    pub student_id: Option<EntityId>,
    pub class_id: Option<EntityId>,
    pub amount: Option<Amount>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "double_option")]
    pub paid_date: Option<Option<DateTime<Utc>>>,
    pub status: Option<FeeStatus>,
    pub month: Option<BillingMonth>,
}

impl FeePatch {
    /// Marks the fee paid on the given date
    pub fn paid_on(date: DateTime<Utc>) -> Self {
        Self {
            status: Some(FeeStatus::Paid),
            paid_date: Some(Some(date)),
            ..Default::default()
        }
    }
}

impl Record for Fee {
    type Draft = NewFee;
    type Patch = FeePatch;

    const KIND: EntityKind = EntityKind::Fee;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, now: DateTime<Utc>, draft: NewFee) -> Self {
        Self {
            id,
            student_id: draft.student_id,
            class_id: draft.class_id,
            amount: draft.amount,
            due_date: draft.due_date,
            paid_date: draft.paid_date,
            status: draft.status,
            month: draft.month,
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: FeePatch, _now: DateTime<Utc>) {
        if let Some(student_id) = patch.student_id {
            self.student_id = student_id;
        }
        if let Some(class_id) = patch.class_id {
            self.class_id = class_id;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(paid_date) = patch.paid_date {
            self.paid_date = paid_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(month) = patch.month {
            self.month = month;
        }
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("student_id", EntityKind::Student, self.student_id),
            Reference::new("class_id", EntityKind::Class, self.class_id),
        ]
    }
}
