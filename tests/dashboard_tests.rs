/// Admin and tutor dashboard aggregates
///
/// Run with: cargo test --test dashboard_tests
use chrono::{Duration, Utc};
use tutordesk::model::{
    AttendanceStatus, Audience, FeePatch, FeeStatus, HomeworkPatch, HomeworkStatus,
    NewAnnouncement, NewAttendance, NewClass, NewFee, NewHomework, NewStudent, NewSubmission,
    NewUser, Role, UserPatch,
};
use tutordesk::{Amount, BillingMonth, EntityId, MemStorage, Storage, StoreError};

async fn class_with_students(
    store: &MemStorage,
    count: usize,
) -> (EntityId, EntityId, Vec<EntityId>) {
    let tutor = store
        .users()
        .create(NewUser::new("tutor@center.test", "pw", "Tara", Role::Tutor))
        .await
        .unwrap();

    let mut students = Vec::new();
    for n in 0..count {
        let student = store
            .students()
            .create(NewStudent::new(
                format!("Student {n}"),
                format!("s{n}@center.test"),
                format!("R-{n}"),
                "8",
            ))
            .await
            .unwrap();
        students.push(student.id);
    }

    let class = store
        .classes()
        .create(
            NewClass::new("Algebra", "Mathematics", "8", tutor.id, Amount::from_cents(10_000))
                .students(students.iter().copied()),
        )
        .await
        .unwrap();
    (tutor.id, class.id, students)
}

#[tokio::test]
async fn test_empty_store_dashboard() {
    let store = MemStorage::new();
    let stats = store.admin_dashboard_stats().await.unwrap();

    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.active_users, 0);
    assert_eq!(stats.total_classes, 0);
    assert!(stats.total_revenue.is_zero());
    assert!(stats.monthly_revenue.is_zero());
    assert_eq!(stats.avg_attendance, 0.0);
    assert_eq!(stats.month, BillingMonth::current());
}

#[tokio::test]
async fn test_user_counts_by_role_and_activity() {
    let store = MemStorage::new();
    let users = store
        .users()
        .bulk_create(vec![
            NewUser::new("a@center.test", "pw", "A", Role::Admin),
            NewUser::new("t@center.test", "pw", "T", Role::Tutor),
            NewUser::new("s1@center.test", "pw", "S1", Role::Student),
            NewUser::new("s2@center.test", "pw", "S2", Role::Student).inactive(),
        ])
        .await
        .unwrap();

    let deactivate = UserPatch {
        is_active: Some(false),
        ..Default::default()
    };
    store.users().update(users[1].id, deactivate).await.unwrap();

    let stats = store.admin_dashboard_stats().await.unwrap();
    assert_eq!(stats.total_users, 4);
    assert_eq!(stats.active_users, 2);
    assert_eq!(stats.users_by_role.get(Role::Student), 2);
    assert_eq!(stats.users_by_role.get(Role::Tutor), 1);
    assert_eq!(stats.users_by_role.get(Role::Parent), 0);
}

#[tokio::test]
async fn test_average_attendance() {
    let store = MemStorage::new();
    let (_, class, students) = class_with_students(&store, 4).await;
    let today = Utc::now();

    let statuses = [
        AttendanceStatus::Present,
        AttendanceStatus::Present,
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
    ];
    for (student, status) in students.iter().zip(statuses) {
        store
            .attendance()
            .create(NewAttendance::new(class, *student, today, status))
            .await
            .unwrap();
    }

    let stats = store.admin_dashboard_stats().await.unwrap();
    assert_eq!(stats.avg_attendance, 75.0);
    assert_eq!(stats.total_classes, 1);
}

#[tokio::test]
async fn test_paying_a_fee_moves_revenue() {
    let store = MemStorage::new();
    let (_, class, students) = class_with_students(&store, 1).await;
    let november: BillingMonth = "2024-11".parse().unwrap();

    let fee = store
        .fees()
        .create(NewFee::pending(
            students[0],
            class,
            "250.00".parse().unwrap(),
            Utc::now() + Duration::days(5),
            november,
        ))
        .await
        .unwrap();
    assert_eq!(store.get_fees_by_month(november).await.unwrap(), vec![fee.clone()]);

    let before = store.admin_dashboard_stats_for(november).await.unwrap();
    assert!(before.total_revenue.is_zero());

    let paid = store
        .fees()
        .update(fee.id, FeePatch::paid_on(Utc::now()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.status, FeeStatus::Paid);
    assert!(paid.paid_date.is_some());

    let after = store.admin_dashboard_stats_for(november).await.unwrap();
    assert_eq!(after.total_revenue.to_string(), "250.00");
    assert_eq!(after.monthly_revenue.to_string(), "250.00");

    let other_month = store
        .admin_dashboard_stats_for("2024-12".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(other_month.total_revenue, after.total_revenue);
    assert!(other_month.monthly_revenue.is_zero());
}

#[tokio::test]
async fn test_current_month_revenue() {
    let store = MemStorage::new();
    let (_, class, students) = class_with_students(&store, 2).await;
    let current = BillingMonth::current();

    let mut paid = NewFee::pending(
        students[0],
        class,
        Amount::from_cents(25_000),
        Utc::now(),
        current,
    );
    paid.status = FeeStatus::Paid;
    paid.paid_date = Some(Utc::now());
    store.fees().create(paid).await.unwrap();
    store
        .fees()
        .create(NewFee::pending(
            students[1],
            class,
            Amount::from_cents(25_000),
            Utc::now(),
            current,
        ))
        .await
        .unwrap();

    let stats = store.admin_dashboard_stats().await.unwrap();
    assert_eq!(stats.total_revenue, Amount::from_cents(25_000));
    assert_eq!(stats.monthly_revenue, Amount::from_cents(25_000));
}

#[tokio::test]
async fn test_revenue_overflow_is_reported() {
    let store = MemStorage::new();
    let (_, class, students) = class_with_students(&store, 2).await;
    let current = BillingMonth::current();

    for student in &students {
        let fee = store
            .fees()
            .create(NewFee::pending(
                *student,
                class,
                "50000000000000000.00".parse().unwrap(),
                Utc::now(),
                current,
            ))
            .await
            .unwrap();
        store
            .fees()
            .update(fee.id, FeePatch::paid_on(Utc::now()))
            .await
            .unwrap();
    }

    let err = store.admin_dashboard_stats().await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue(_)), "got {err:?}");
}

#[tokio::test]
async fn test_admin_stats_json_shape() {
    let store = MemStorage::new();
    class_with_students(&store, 1).await;

    let json = serde_json::to_value(store.admin_dashboard_stats().await.unwrap()).unwrap();
    for key in [
        "totalUsers",
        "activeUsers",
        "usersByRole",
        "totalClasses",
        "totalRevenue",
        "monthlyRevenue",
        "avgAttendance",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["totalRevenue"], "0.00");
}

#[tokio::test]
async fn test_tutor_dashboard() {
    let store = MemStorage::new();
    let (tutor, class, students) = class_with_students(&store, 3).await;

    let homework = store
        .homework()
        .bulk_create(vec![
            NewHomework::new("Week 1", "Fractions", class, tutor, Utc::now()),
            NewHomework::new("Week 2", "Decimals", class, tutor, Utc::now()),
        ])
        .await
        .unwrap();
    let closed = HomeworkPatch {
        status: Some(HomeworkStatus::Completed),
        ..Default::default()
    };
    store.homework().update(homework[0].id, closed).await.unwrap();

    store
        .submissions()
        .bulk_create(vec![
            NewSubmission::new(homework[1].id, students[0]),
            NewSubmission::new(homework[1].id, students[1]),
        ])
        .await
        .unwrap();
    store
        .announcements()
        .create(NewAnnouncement::new("Hi", "Welcome", tutor, Audience::All).classes([class]))
        .await
        .unwrap();

    let stats = store.tutor_dashboard_stats(tutor).await.unwrap();
    assert_eq!(stats.total_classes, 1);
    assert_eq!(stats.total_students, 3);
    assert_eq!(stats.active_homework, 1);
    assert_eq!(stats.pending_submissions, 2);
    assert_eq!(stats.announcements, 1);
}
