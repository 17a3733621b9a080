use super::engine::Repository;
use super::integrity::{DanglingReference, IntegrityScan};
use super::stats::{AdminDashboardStats, TutorDashboardStats};
use crate::core::{BillingMonth, EntityId, EntityKind, Result};
use crate::model::{
    Announcement, Attendance, Audience, Class, ClassPatch, Fee, FeeStatus, Homework,
    HomeworkSubmission, NewSetting, Role, SettingPatch, Student, SystemLog, SystemSetting, User,
    UserPatch, normalize_email,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::debug;

/// The tutoring center's data store.
///
/// A backend only has to hand out one [`Repository`] per record kind; every
/// derived query below is a linear scan or fold over those repositories. A
/// database backend can override any of them with an indexed query.
#[async_trait]
pub trait Storage: Send + Sync {
    fn users(&self) -> &dyn Repository<User>;
    fn students(&self) -> &dyn Repository<Student>;
    fn classes(&self) -> &dyn Repository<Class>;
    fn attendance(&self) -> &dyn Repository<Attendance>;
    fn fees(&self) -> &dyn Repository<Fee>;
    fn homework(&self) -> &dyn Repository<Homework>;
    fn submissions(&self) -> &dyn Repository<HomeworkSubmission>;
    fn announcements(&self) -> &dyn Repository<Announcement>;
    fn system_logs(&self) -> &dyn Repository<SystemLog>;
    fn settings(&self) -> &dyn Repository<SystemSetting>;

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Case-insensitive email lookup
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let wanted = normalize_email(email);
        let found = self
            .users()
            .find(&|user: &User| normalize_email(&user.email) == wanted)
            .await?;
        Ok(found.into_iter().next())
    }

    async fn get_users_by_role(&self, role: Role) -> Result<Vec<User>> {
        self.users().find(&|user: &User| user.role == role).await
    }

    /// Stamps the user's last-login time with the current clock
    async fn record_login(&self, user_id: EntityId) -> Result<Option<User>> {
        let patch = UserPatch {
            last_login: Some(Some(Utc::now())),
            ..Default::default()
        };
        self.users().update(user_id, patch).await
    }

    // ------------------------------------------------------------------
    // Students
    // ------------------------------------------------------------------

    async fn get_students_by_tutor(&self, tutor_id: EntityId) -> Result<Vec<Student>> {
        self.students()
            .find(&|student: &Student| student.tutor_id == Some(tutor_id))
            .await
    }

    async fn get_students_by_parent(&self, parent_id: EntityId) -> Result<Vec<Student>> {
        self.students()
            .find(&|student: &Student| student.parent_id == Some(parent_id))
            .await
    }

    async fn get_student_by_roll_number(&self, roll_number: &str) -> Result<Option<Student>> {
        let wanted = roll_number.trim();
        let found = self
            .students()
            .find(&|student: &Student| student.roll_number.trim() == wanted)
            .await?;
        Ok(found.into_iter().next())
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    async fn get_classes_by_tutor(&self, tutor_id: EntityId) -> Result<Vec<Class>> {
        self.classes()
            .find(&|class: &Class| class.tutor_id == tutor_id)
            .await
    }

    /// Classes whose roster lists the student
    async fn get_classes_by_student(&self, student_id: EntityId) -> Result<Vec<Class>> {
        self.classes()
            .find(&|class: &Class| class.has_student(student_id))
            .await
    }

    /// Adds the student to the roster unless already listed.
    ///
    /// Read-then-write; two concurrent roster edits on one class may lose one.
    async fn enroll_student(&self, class_id: EntityId, student_id: EntityId) -> Result<Option<Class>> {
        let Some(class) = self.classes().get(class_id).await? else {
            return Ok(None);
        };
        if class.has_student(student_id) {
            return Ok(Some(class));
        }

        let mut student_ids = class.student_ids;
        student_ids.push(student_id);
        let patch = ClassPatch {
            student_ids: Some(student_ids),
            ..Default::default()
        };
        self.classes().update(class_id, patch).await
    }

    /// Drops the student from the roster; a no-op if not listed
    async fn unenroll_student(&self, class_id: EntityId, student_id: EntityId) -> Result<Option<Class>> {
        let Some(class) = self.classes().get(class_id).await? else {
            return Ok(None);
        };
        if !class.has_student(student_id) {
            return Ok(Some(class));
        }

        let student_ids = class
            .student_ids
            .into_iter()
            .filter(|id| *id != student_id)
            .collect();
        let patch = ClassPatch {
            student_ids: Some(student_ids),
            ..Default::default()
        };
        self.classes().update(class_id, patch).await
    }

    // ------------------------------------------------------------------
    // Attendance
    // ------------------------------------------------------------------

    /// Attendance of a class, optionally narrowed to one calendar day
    async fn get_attendance_by_class(
        &self,
        class_id: EntityId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Attendance>> {
        self.attendance()
            .find(&|record: &Attendance| {
                record.class_id == class_id && date.is_none_or(|day| record.is_on(day))
            })
            .await
    }

    async fn get_attendance_by_student(&self, student_id: EntityId) -> Result<Vec<Attendance>> {
        self.attendance()
            .find(&|record: &Attendance| record.student_id == student_id)
            .await
    }

    // ------------------------------------------------------------------
    // Fees
    // ------------------------------------------------------------------

    async fn get_fees_by_student(&self, student_id: EntityId) -> Result<Vec<Fee>> {
        self.fees()
            .find(&|fee: &Fee| fee.student_id == student_id)
            .await
    }

    async fn get_fees_by_month(&self, month: BillingMonth) -> Result<Vec<Fee>> {
        self.fees().find(&|fee: &Fee| fee.month == month).await
    }

    async fn get_fees_by_status(&self, status: FeeStatus) -> Result<Vec<Fee>> {
        self.fees().find(&|fee: &Fee| fee.status == status).await
    }

    /// Unpaid fees due strictly before `as_of`. Statuses are left as they are.
    async fn get_overdue_fees(&self, as_of: DateTime<Utc>) -> Result<Vec<Fee>> {
        self.fees().find(&|fee: &Fee| fee.is_past_due(as_of)).await
    }

    // ------------------------------------------------------------------
    // Homework
    // ------------------------------------------------------------------

    async fn get_homework_by_class(&self, class_id: EntityId) -> Result<Vec<Homework>> {
        self.homework()
            .find(&|homework: &Homework| homework.class_id == class_id)
            .await
    }

    async fn get_homework_by_tutor(&self, tutor_id: EntityId) -> Result<Vec<Homework>> {
        self.homework()
            .find(&|homework: &Homework| homework.tutor_id == tutor_id)
            .await
    }

    async fn get_submissions_by_homework(
        &self,
        homework_id: EntityId,
    ) -> Result<Vec<HomeworkSubmission>> {
        self.submissions()
            .find(&|submission: &HomeworkSubmission| submission.homework_id == homework_id)
            .await
    }

    async fn get_submissions_by_student(
        &self,
        student_id: EntityId,
    ) -> Result<Vec<HomeworkSubmission>> {
        self.submissions()
            .find(&|submission: &HomeworkSubmission| submission.student_id == student_id)
            .await
    }

    // ------------------------------------------------------------------
    // Announcements
    // ------------------------------------------------------------------

    async fn get_announcements_by_tutor(&self, tutor_id: EntityId) -> Result<Vec<Announcement>> {
        self.announcements()
            .find(&|announcement: &Announcement| announcement.tutor_id == tutor_id)
            .await
    }

    /// Announcements targeting at least one of the given classes
    async fn get_announcements_for_classes(
        &self,
        class_ids: &[EntityId],
    ) -> Result<Vec<Announcement>> {
        self.announcements()
            .find(&|announcement: &Announcement| announcement.targets_any(class_ids))
            .await
    }

    async fn get_announcements_for_audience(
        &self,
        audience: Audience,
        class_ids: &[EntityId],
    ) -> Result<Vec<Announcement>> {
        self.announcements()
            .find(&|announcement: &Announcement| {
                announcement.target_audience.reaches(audience) && announcement.targets_any(class_ids)
            })
            .await
    }

    // ------------------------------------------------------------------
    // Audit log & settings
    // ------------------------------------------------------------------

    /// Newest entries first, optionally capped
    async fn get_system_logs(&self, limit: Option<usize>) -> Result<Vec<SystemLog>> {
        let mut logs = self.system_logs().get_all().await?;
        if let Some(limit) = limit {
            logs.truncate(limit);
        }
        Ok(logs)
    }

    async fn get_system_logs_by_admin(&self, admin_id: EntityId) -> Result<Vec<SystemLog>> {
        self.system_logs()
            .find(&|log: &SystemLog| log.admin_id == admin_id)
            .await
    }

    async fn get_setting(&self, key: &str) -> Result<Option<SystemSetting>> {
        let wanted = key.trim();
        let found = self
            .settings()
            .find(&|setting: &SystemSetting| setting.key.trim() == wanted)
            .await?;
        Ok(found.into_iter().next())
    }

    async fn get_settings_by_category(&self, category: &str) -> Result<Vec<SystemSetting>> {
        self.settings()
            .find(&|setting: &SystemSetting| setting.category == category)
            .await
    }

    /// Sets a value, creating the setting in the default category if missing
    async fn upsert_setting(
        &self,
        key: &str,
        value: &str,
        updated_by: Option<EntityId>,
    ) -> Result<SystemSetting> {
        if let Some(existing) = self.get_setting(key).await? {
            let patch = SettingPatch {
                value: Some(value.to_string()),
                updated_by: Some(updated_by),
                ..Default::default()
            };
            if let Some(updated) = self.settings().update(existing.id, patch).await? {
                return Ok(updated);
            }
        }

        let mut draft = NewSetting::new(key.trim(), value);
        draft.updated_by = updated_by;
        self.settings().create(draft).await
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    /// Dashboard snapshot with revenue scoped to the current calendar month
    async fn admin_dashboard_stats(&self) -> Result<AdminDashboardStats> {
        self.admin_dashboard_stats_for(BillingMonth::current()).await
    }

    async fn admin_dashboard_stats_for(&self, month: BillingMonth) -> Result<AdminDashboardStats> {
        let users = self.users().get_all().await?;
        let total_classes = self.classes().count().await?;
        let fees = self.fees().get_all().await?;
        let attendance = self.attendance().get_all().await?;

        let stats =
            AdminDashboardStats::compute(&users, total_classes, &fees, &attendance, month)?;
        debug!(%month, total_users = stats.total_users, "admin dashboard computed");
        Ok(stats)
    }

    async fn tutor_dashboard_stats(&self, tutor_id: EntityId) -> Result<TutorDashboardStats> {
        let classes = self.get_classes_by_tutor(tutor_id).await?;
        let homework = self.get_homework_by_tutor(tutor_id).await?;
        let homework_ids: Vec<EntityId> = homework.iter().map(|item| item.id).collect();
        let submissions = self
            .submissions()
            .find(&|submission: &HomeworkSubmission| homework_ids.contains(&submission.homework_id))
            .await?;
        let announcements = self.get_announcements_by_tutor(tutor_id).await?.len();

        Ok(TutorDashboardStats::compute(
            &classes,
            &homework,
            &submissions,
            announcements,
        ))
    }

    /// Every foreign reference whose target no longer exists
    async fn dangling_references(&self) -> Result<Vec<DanglingReference>> {
        let mut scan = IntegrityScan::default();
        scan.add(&self.users().get_all().await?);
        scan.add(&self.students().get_all().await?);
        scan.add(&self.classes().get_all().await?);
        scan.add(&self.attendance().get_all().await?);
        scan.add(&self.fees().get_all().await?);
        scan.add(&self.homework().get_all().await?);
        scan.add(&self.submissions().get_all().await?);
        scan.add(&self.announcements().get_all().await?);
        scan.add(&self.system_logs().get_all().await?);
        scan.add(&self.settings().get_all().await?);
        Ok(scan.dangling())
    }

    /// Full listing of one kind as a JSON array
    async fn dump(&self, kind: EntityKind) -> Result<Value> {
        let value = match kind {
            EntityKind::User => serde_json::to_value(self.users().get_all().await?)?,
            EntityKind::Student => serde_json::to_value(self.students().get_all().await?)?,
            EntityKind::Class => serde_json::to_value(self.classes().get_all().await?)?,
            EntityKind::Attendance => serde_json::to_value(self.attendance().get_all().await?)?,
            EntityKind::Fee => serde_json::to_value(self.fees().get_all().await?)?,
            EntityKind::Homework => serde_json::to_value(self.homework().get_all().await?)?,
            EntityKind::HomeworkSubmission => {
                serde_json::to_value(self.submissions().get_all().await?)?
            }
            EntityKind::Announcement => {
                serde_json::to_value(self.announcements().get_all().await?)?
            }
            EntityKind::SystemLog => serde_json::to_value(self.system_logs().get_all().await?)?,
            EntityKind::SystemSetting => serde_json::to_value(self.settings().get_all().await?)?,
        };
        Ok(value)
    }
}
