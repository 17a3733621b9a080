//! Read-only folds behind the admin and tutor dashboards.
//!
//! Nothing here is cached or maintained incrementally; each snapshot is
//! recomputed from full collections on every call.

use crate::core::{Amount, BillingMonth, EntityId, Result};
use crate::model::{
    Attendance, Class, Fee, Homework, HomeworkStatus, HomeworkSubmission, Role, SubmissionStatus,
    User,
};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub admin: usize,
    pub tutor: usize,
    pub student: usize,
    pub parent: usize,
}

impl RoleCounts {
    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::Admin => self.admin,
            Role::Tutor => self.tutor,
            Role::Student => self.student,
            Role::Parent => self.parent,
        }
    }

    fn bump(&mut self, role: Role) {
        match role {
            Role::Admin => self.admin += 1,
            Role::Tutor => self.tutor += 1,
            Role::Student => self.student += 1,
            Role::Parent => self.parent += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub users_by_role: RoleCounts,
    pub total_classes: usize,
    /// Sum of all paid fees
    pub total_revenue: Amount,
    /// Sum of paid fees billed for `month`
    pub monthly_revenue: Amount,
    pub month: BillingMonth,
    /// Percentage of attendance records marked present or late
    pub avg_attendance: f64,
}

impl AdminDashboardStats {
    pub fn compute(
        users: &[User],
        total_classes: usize,
        fees: &[Fee],
        attendance: &[Attendance],
        month: BillingMonth,
    ) -> Result<Self> {
        let mut users_by_role = RoleCounts::default();
        for user in users {
            users_by_role.bump(user.role);
        }

        let paid = fees.iter().filter(|fee| fee.is_paid());
        let total_revenue = Amount::checked_sum(paid.clone().map(|fee| fee.amount))?;
        let monthly_revenue = Amount::checked_sum(
            paid.filter(|fee| fee.month == month).map(|fee| fee.amount),
        )?;

        Ok(Self {
            total_users: users.len(),
            active_users: users.iter().filter(|user| user.is_active).count(),
            users_by_role,
            total_classes,
            total_revenue,
            monthly_revenue,
            month,
            avg_attendance: attendance_rate(attendance),
        })
    }
}

/// Present-or-late share of all records as a percentage with one decimal.
///
/// Zero records yield `0.0`.
pub fn attendance_rate(records: &[Attendance]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let attended = records.iter().filter(|record| record.status.attended()).count();
    let rate = attended as f64 / records.len() as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorDashboardStats {
    pub total_classes: usize,
    /// Distinct students across the tutor's class rosters
    pub total_students: usize,
    pub active_homework: usize,
    /// Submissions to the tutor's homework not yet graded
    pub pending_submissions: usize,
    pub announcements: usize,
}

impl TutorDashboardStats {
    pub fn compute(
        classes: &[Class],
        homework: &[Homework],
        submissions: &[HomeworkSubmission],
        announcements: usize,
    ) -> Self {
        let students: HashSet<EntityId> = classes
            .iter()
            .flat_map(|class| class.student_ids.iter().copied())
            .collect();

        Self {
            total_classes: classes.len(),
            total_students: students.len(),
            active_homework: homework
                .iter()
                .filter(|item| item.status == HomeworkStatus::Active)
                .count(),
            pending_submissions: submissions
                .iter()
                .filter(|submission| submission.status == SubmissionStatus::Submitted)
                .count(),
            announcements,
        }
    }
}
