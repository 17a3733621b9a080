/// Derived lookups layered over the per-kind repositories
///
/// Run with: cargo test --test query_tests
use chrono::{Duration, NaiveTime, TimeZone, Utc, Weekday};
use tutordesk::model::{
    AttendanceStatus, Audience, FeeStatus, HomeworkStatus, LogDetails, NewAnnouncement,
    NewAttendance, NewClass, NewFee, NewHomework, NewSetting, NewStudent, NewSubmission,
    NewSystemLog, NewUser, Role, SubmissionPatch,
};
use tutordesk::{Amount, BillingMonth, EntityId, Grade, MemStorage, Storage};

struct Center {
    store: MemStorage,
    tutor: EntityId,
    parent: EntityId,
    students: Vec<EntityId>,
}

async fn center() -> Center {
    let store = MemStorage::new();
    let users = store
        .users()
        .bulk_create(vec![
            NewUser::new("tutor@center.test", "pw", "Tara", Role::Tutor),
            NewUser::new("parent@center.test", "pw", "Pat", Role::Parent),
            NewUser::new("admin@center.test", "pw", "Ada", Role::Admin),
        ])
        .await
        .unwrap();
    let (tutor, parent) = (users[0].id, users[1].id);

    let students = store
        .students()
        .bulk_create(vec![
            NewStudent::new("Maya", "maya@center.test", "R-1", "8")
                .parent(parent)
                .tutor(tutor),
            NewStudent::new("Leo", "leo@center.test", "R-2", "8").tutor(tutor),
            NewStudent::new("Ivy", "ivy@center.test", "R-3", "9"),
        ])
        .await
        .unwrap()
        .into_iter()
        .map(|student| student.id)
        .collect();

    Center {
        store,
        tutor,
        parent,
        students,
    }
}

fn class(name: &str, tutor: EntityId) -> NewClass {
    NewClass::new(name, "Mathematics", "8", tutor, Amount::from_cents(9_500))
        .meets(Weekday::Tue, NaiveTime::from_hms_opt(17, 30, 0).unwrap())
}

#[tokio::test]
async fn test_users_by_email_and_role() {
    let Center { store, tutor, .. } = center().await;

    let found = store
        .get_user_by_email("Tutor@Center.TEST")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, tutor);
    assert!(store.get_user_by_email("ghost@center.test").await.unwrap().is_none());

    let admins = store.get_users_by_role(Role::Admin).await.unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].email, "admin@center.test");
}

#[tokio::test]
async fn test_record_login_stamps_time() {
    let Center { store, tutor, .. } = center().await;
    let before = Utc::now();

    let user = store.record_login(tutor).await.unwrap().unwrap();
    assert!(user.last_login.is_some_and(|at| at >= before));
}

#[tokio::test]
async fn test_students_by_tutor_parent_and_roll() {
    let Center {
        store,
        tutor,
        parent,
        students,
    } = center().await;

    let taught: Vec<EntityId> = store
        .get_students_by_tutor(tutor)
        .await
        .unwrap()
        .iter()
        .map(|student| student.id)
        .collect();
    assert_eq!(taught, students[..2]);

    let children = store.get_students_by_parent(parent).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "Maya");

    let ivy = store.get_student_by_roll_number("R-3").await.unwrap().unwrap();
    assert_eq!(ivy.id, students[2]);
    assert!(store.get_student_by_roll_number("R-404").await.unwrap().is_none());
}

#[tokio::test]
async fn test_classes_by_student() {
    let Center {
        store,
        tutor,
        students,
        ..
    } = center().await;

    let algebra = store
        .classes()
        .create(class("Algebra", tutor).students([students[0], students[1]]))
        .await
        .unwrap();
    let geometry = store
        .classes()
        .create(class("Geometry", tutor).students([students[1]]))
        .await
        .unwrap();

    let maya = store.get_classes_by_student(students[0]).await.unwrap();
    assert_eq!(maya, vec![algebra.clone()]);

    let leo = store.get_classes_by_student(students[1]).await.unwrap();
    assert_eq!(leo, vec![algebra, geometry]);

    assert!(store.get_classes_by_student(students[2]).await.unwrap().is_empty());
    assert_eq!(store.get_classes_by_tutor(tutor).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_enroll_and_unenroll() {
    let Center {
        store,
        tutor,
        students,
        ..
    } = center().await;
    let created = store.classes().create(class("Algebra", tutor)).await.unwrap();

    let enrolled = store
        .enroll_student(created.id, students[2])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrolled.student_ids, vec![students[2]]);

    let again = store
        .enroll_student(created.id, students[2])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.student_ids.len(), 1);

    let dropped = store
        .unenroll_student(created.id, students[2])
        .await
        .unwrap()
        .unwrap();
    assert!(dropped.student_ids.is_empty());

    let missing = store
        .enroll_student(tutordesk::core::new_id(), students[0])
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_attendance_by_class_and_day() {
    let Center {
        store,
        tutor,
        students,
        ..
    } = center().await;
    let algebra = store.classes().create(class("Algebra", tutor)).await.unwrap();
    let geometry = store.classes().create(class("Geometry", tutor)).await.unwrap();

    let morning = Utc.with_ymd_and_hms(2024, 11, 5, 9, 0, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2024, 11, 5, 18, 45, 0).unwrap();
    let next_day = Utc.with_ymd_and_hms(2024, 11, 6, 9, 0, 0).unwrap();

    store
        .attendance()
        .bulk_create(vec![
            NewAttendance::new(algebra.id, students[0], morning, AttendanceStatus::Present),
            NewAttendance::new(algebra.id, students[1], evening, AttendanceStatus::Late)
                .notes("bus delay"),
            NewAttendance::new(algebra.id, students[0], next_day, AttendanceStatus::Absent),
            NewAttendance::new(geometry.id, students[0], morning, AttendanceStatus::Present),
        ])
        .await
        .unwrap();

    let all = store.get_attendance_by_class(algebra.id, None).await.unwrap();
    assert_eq!(all.len(), 3);

    let day = morning.date_naive();
    let same_day = store
        .get_attendance_by_class(algebra.id, Some(day))
        .await
        .unwrap();
    assert_eq!(same_day.len(), 2);
    assert!(same_day.iter().all(|record| record.is_on(day)));

    let maya = store.get_attendance_by_student(students[0]).await.unwrap();
    assert_eq!(maya.len(), 3);
}

#[tokio::test]
async fn test_fee_lookups() {
    let Center {
        store,
        tutor,
        students,
        ..
    } = center().await;
    let algebra = store.classes().create(class("Algebra", tutor)).await.unwrap();
    let november: BillingMonth = "2024-11".parse().unwrap();
    let december: BillingMonth = "2024-12".parse().unwrap();
    let now = Utc::now();

    let fees = store
        .fees()
        .bulk_create(vec![
            NewFee::pending(
                students[0],
                algebra.id,
                Amount::from_cents(9_500),
                now - Duration::days(3),
                november,
            ),
            NewFee::pending(
                students[1],
                algebra.id,
                Amount::from_cents(9_500),
                now + Duration::days(10),
                december,
            ),
        ])
        .await
        .unwrap();

    let by_month = store.get_fees_by_month(november).await.unwrap();
    assert_eq!(by_month, vec![fees[0].clone()]);
    assert_eq!(store.get_fees_by_student(students[1]).await.unwrap().len(), 1);
    assert_eq!(store.get_fees_by_status(FeeStatus::Pending).await.unwrap().len(), 2);

    let overdue = store.get_overdue_fees(now).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, fees[0].id);
    // Detection only; the stored status is untouched
    assert_eq!(overdue[0].status, FeeStatus::Pending);
}

#[tokio::test]
async fn test_homework_and_submissions() {
    let Center {
        store,
        tutor,
        students,
        ..
    } = center().await;
    let algebra = store.classes().create(class("Algebra", tutor)).await.unwrap();

    let homework = store
        .homework()
        .create(
            NewHomework::new(
                "Quadratics",
                "Exercises 1-10",
                algebra.id,
                tutor,
                Utc::now() + Duration::days(7),
            )
            .total_students(2),
        )
        .await
        .unwrap();
    assert_eq!(homework.status, HomeworkStatus::Active);

    let first = store
        .submissions()
        .create(NewSubmission::new(homework.id, students[0]).content("x = 2 or x = 3"))
        .await
        .unwrap();
    store
        .submissions()
        .create(NewSubmission::new(homework.id, students[1]).attachment("https://files.test/leo.pdf"))
        .await
        .unwrap();

    let graded = store
        .submissions()
        .update(
            first.id,
            SubmissionPatch::graded(Grade::new(92).unwrap(), Some("Neat work".to_string())),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(graded.grade.map(|grade| grade.value()), Some(92));

    assert_eq!(store.get_homework_by_class(algebra.id).await.unwrap().len(), 1);
    assert_eq!(store.get_homework_by_tutor(tutor).await.unwrap().len(), 1);
    assert_eq!(store.get_submissions_by_homework(homework.id).await.unwrap().len(), 2);
    assert_eq!(store.get_submissions_by_student(students[0]).await.unwrap(), vec![graded]);
}

#[tokio::test]
async fn test_announcements_by_class_and_audience() {
    let Center { store, tutor, .. } = center().await;
    let algebra = store.classes().create(class("Algebra", tutor)).await.unwrap();
    let geometry = store.classes().create(class("Geometry", tutor)).await.unwrap();

    store
        .announcements()
        .bulk_create(vec![
            NewAnnouncement::new("Quiz", "Friday quiz", tutor, Audience::Students)
                .classes([algebra.id]),
            NewAnnouncement::new("Meeting", "Parent evening", tutor, Audience::Parents)
                .classes([algebra.id, geometry.id])
                .important(),
            NewAnnouncement::new("Holiday", "Closed Monday", tutor, Audience::All)
                .classes([geometry.id]),
        ])
        .await
        .unwrap();

    let algebra_only = store.get_announcements_for_classes(&[algebra.id]).await.unwrap();
    let titles: Vec<&str> = algebra_only.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, ["Quiz", "Meeting"]);

    assert!(store.get_announcements_for_classes(&[]).await.unwrap().is_empty());

    let for_parents = store
        .get_announcements_for_audience(Audience::Parents, &[geometry.id])
        .await
        .unwrap();
    let titles: Vec<&str> = for_parents.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, ["Meeting", "Holiday"]);

    assert_eq!(store.get_announcements_by_tutor(tutor).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_system_logs_newest_first() {
    let Center { store, tutor, .. } = center().await;
    let admin = store.get_users_by_role(Role::Admin).await.unwrap()[0].id;

    for action in ["create_user", "update_user", "delete_user"] {
        store
            .system_logs()
            .create(
                NewSystemLog::new(admin, action)
                    .target("user", tutor)
                    .details(LogDetails::Other {
                        data: Default::default(),
                    }),
            )
            .await
            .unwrap();
    }

    let logs = store.get_system_logs(None).await.unwrap();
    let actions: Vec<&str> = logs.iter().map(|log| log.action.as_str()).collect();
    assert_eq!(actions, ["delete_user", "update_user", "create_user"]);
    assert!(logs.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));

    let latest = store.get_system_logs(Some(1)).await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].action, "delete_user");

    assert_eq!(store.get_system_logs_by_admin(admin).await.unwrap().len(), 3);
    assert!(store.get_system_logs_by_admin(tutor).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_settings_upsert_and_category() {
    let Center { store, tutor, .. } = center().await;
    let original = store
        .settings()
        .create(NewSetting::new("currency", "USD").category("billing"))
        .await
        .unwrap();

    let updated = store
        .upsert_setting("currency", "EUR", Some(tutor))
        .await
        .unwrap();
    assert_eq!(updated.value, "EUR");
    assert_eq!(updated.category, "billing");
    assert_eq!(updated.updated_by, Some(tutor));
    assert_eq!(updated.id, original.id);
    assert!(updated.updated_at >= original.updated_at);

    let created = store.upsert_setting("timezone", "UTC", None).await.unwrap();
    assert_eq!(created.category, tutordesk::model::DEFAULT_SETTING_CATEGORY);

    assert_eq!(store.settings().count().await.unwrap(), 2);
    assert_eq!(store.get_settings_by_category("billing").await.unwrap().len(), 1);
    assert_eq!(
        store.get_setting("timezone").await.unwrap().map(|setting| setting.value),
        Some("UTC".to_string())
    );
}
