use super::store::Storage;
use crate::config::StoreConfig;
use crate::core::{Amount, BillingMonth, EntityId, Result, StoreError};
use crate::model::{
    LogDetails, NewClass, NewFee, NewSetting, NewStudent, NewSystemLog, NewUser, Role,
};
use chrono::{Duration, NaiveTime, Utc, Weekday};
use tracing::info;

/// Ids of the seeded records, for callers that want to build on them
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub admin_id: EntityId,
    pub tutor_id: EntityId,
    pub parent_id: EntityId,
    pub student_user_id: EntityId,
    pub student_ids: Vec<EntityId>,
    pub class_id: EntityId,
    pub fee_id: EntityId,
}

/// Loads a small, consistent demo center into an empty store
pub async fn load_demo_data(store: &dyn Storage, config: &StoreConfig) -> Result<SeedSummary> {
    let users = store
        .users()
        .bulk_create(vec![
            NewUser::new(
                config.admin_email.as_str(),
                config.admin_password.as_str(),
                "Center Admin",
                Role::Admin,
            ),
            NewUser::new("tutor@tutordesk.local", "tutorpass", "Tara Quinn", Role::Tutor),
            NewUser::new("parent@tutordesk.local", "parentpass", "Priya Patel", Role::Parent),
            NewUser::new("student@tutordesk.local", "studentpass", "Maya Patel", Role::Student),
        ])
        .await?;
    let [admin, tutor, parent, student_user] = <[_; 4]>::try_from(users)
        .map_err(|_| StoreError::invalid("seeding did not create four users"))?;

    let students = store
        .students()
        .bulk_create(vec![
            NewStudent::new("Maya Patel", "student@tutordesk.local", "TD-001", "8")
                .subjects(["Mathematics", "Science"])
                .parent(parent.id)
                .tutor(tutor.id),
            NewStudent::new("Leo Garcia", "leo.garcia@tutordesk.local", "TD-002", "8")
                .subjects(["Mathematics"])
                .tutor(tutor.id),
        ])
        .await?;
    let student_ids: Vec<EntityId> = students.iter().map(|student| student.id).collect();

    let after_school = NaiveTime::from_hms_opt(16, 0, 0)
        .ok_or_else(|| StoreError::invalid("invalid seed class time"))?;
    let class = store
        .classes()
        .create(
            NewClass::new(
                "Grade 8 Mathematics",
                "Mathematics",
                "8",
                tutor.id,
                Amount::from_cents(12_000),
            )
            .meets(Weekday::Mon, after_school)
            .meets(Weekday::Wed, after_school)
            .students(student_ids.iter().copied()),
        )
        .await?;

    let fee = store
        .fees()
        .create(NewFee::pending(
            student_ids[0],
            class.id,
            class.fee_amount,
            Utc::now() + Duration::days(7),
            BillingMonth::current(),
        ))
        .await?;

    store
        .settings()
        .bulk_create(vec![
            NewSetting::new("center_name", "TutorDesk Learning Center")
                .described("Name shown on reports and invoices"),
            NewSetting::new("currency", "USD")
                .category("billing")
                .described("Currency used for fee amounts"),
            NewSetting::new("late_fee_grace_days", "5")
                .category("billing")
                .described("Days after the due date before a fee is treated as overdue"),
            NewSetting::new("attendance_alert_threshold", "75")
                .category("attendance")
                .described("Attendance percentage below which parents are notified"),
        ])
        .await?;

    store
        .system_logs()
        .create(
            NewSystemLog::new(admin.id, "seed_demo_data").details(LogDetails::ReportGenerated {
                report: "demo data loaded".to_string(),
            }),
        )
        .await?;

    info!(
        users = 4,
        students = student_ids.len(),
        classes = 1,
        "demo data seeded"
    );

    Ok(SeedSummary {
        admin_id: admin.id,
        tutor_id: tutor.id,
        parent_id: parent.id,
        student_user_id: student_user.id,
        student_ids,
        class_id: class.id,
        fee_id: fee.id,
    })
}
