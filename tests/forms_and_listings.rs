mod support;

use drivefitt::application::contacts::{ContactFilter, CreateContactCommand};
use drivefitt::application::error::ServiceError;
use drivefitt::application::franchise::{
    CreateFranchiseCommand, FranchiseFilter, UpdateFranchiseStatusCommand,
};
use drivefitt::application::pagination::PageWindow;
use drivefitt::application::payments::PaymentFilter;
use drivefitt::application::subscriptions::{CreateSubscriptionCommand, SubscriptionFilter};
use drivefitt::application::users::UserFilter;

use support::services;

fn inquiry(city: &str) -> CreateFranchiseCommand {
    CreateFranchiseCommand {
        contact_person: "Ravi Kumar".into(),
        email: "ravi@example.com".into(),
        phone: "9876543210".into(),
        city: city.into(),
        investment_capacity: Some(2_000_000),
        ..Default::default()
    }
}

#[tokio::test]
async fn contact_submission_invalidates_cached_listing() {
    let (_repos, services) = services();
    let before = services
        .contacts
        .list(PageWindow::default(), &ContactFilter::default())
        .await
        .expect("empty list");
    assert_eq!(before.total, 0);

    let contact = services
        .contacts
        .create(CreateContactCommand {
            first_name: " Asha ".into(),
            phone: "12345".into(),
            ..Default::default()
        })
        .await
        .expect("create");
    assert_eq!(contact.first_name, "Asha");
    assert_eq!(contact.last_name, "");

    let after = services
        .contacts
        .list(PageWindow::default(), &ContactFilter::default())
        .await
        .expect("list");
    assert_eq!(after.total, 1);
}

#[tokio::test]
async fn contact_search_matches_any_column() {
    let (_repos, services) = services();
    for (name, message) in [("Asha", "Morning batch"), ("Vikram", "Evening batch")] {
        services
            .contacts
            .create(CreateContactCommand {
                first_name: name.into(),
                phone: "1".into(),
                message: Some(message.into()),
                ..Default::default()
            })
            .await
            .expect("create");
    }

    let rows = services
        .contacts
        .export(&ContactFilter {
            search: Some("EVENING".into()),
            ..Default::default()
        })
        .await
        .expect("export");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].first_name, "Vikram");
}

#[tokio::test]
async fn franchise_status_pipeline() {
    let (_repos, services) = services();
    let created = services.franchise.create(inquiry("Pune")).await.expect("create");
    assert_eq!(created.status, 1);

    let updated = services
        .franchise
        .update_status(
            created.id,
            UpdateFranchiseStatusCommand {
                status: 3,
                notes: Some("Site visit booked".into()),
                assigned_to: Some(4),
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.status, 3);
    assert_eq!(updated.assigned_to, Some(4));

    let listed = services
        .franchise
        .list(
            PageWindow::default(),
            &FranchiseFilter {
                status: Some(3),
                ..Default::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(listed.total, 1);

    let err = services
        .franchise
        .update_status(
            created.id,
            UpdateFranchiseStatusCommand {
                status: 7,
                notes: None,
                assigned_to: None,
            },
        )
        .await
        .expect_err("bad status");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn missing_inquiry_is_not_found_before_status_is_checked() {
    let (_repos, services) = services();
    let err = services
        .franchise
        .update_status(
            404,
            UpdateFranchiseStatusCommand {
                status: 7,
                notes: None,
                assigned_to: None,
            },
        )
        .await
        .expect_err("missing inquiry");
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[tokio::test]
async fn franchise_investment_range() {
    let (_repos, services) = services();
    services.franchise.create(inquiry("Pune")).await.expect("create");
    services
        .franchise
        .create(CreateFranchiseCommand {
            investment_capacity: Some(9_000_000),
            ..inquiry("Nagpur")
        })
        .await
        .expect("create");

    let rows = services
        .franchise
        .export(&FranchiseFilter {
            investment_capacity_min: Some(5_000_000),
            ..Default::default()
        })
        .await
        .expect("export");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].city, "Nagpur");
}

#[tokio::test]
async fn payments_filter_by_amount_and_status() {
    let (repos, services) = services();
    repos.seed_payment("a@example.com", 1_000, "completed").await;
    repos.seed_payment("b@example.com", 5_000, "completed").await;
    repos.seed_payment("c@example.com", 5_000, "failed").await;

    let page = services
        .payments
        .list(
            PageWindow::default(),
            &PaymentFilter {
                status: Some("completed".into()),
                min_amount: Some(2_000),
                ..Default::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].user_email.as_deref(), Some("b@example.com"));

    let all = services
        .payments
        .export(&PaymentFilter::default())
        .await
        .expect("export");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn unverified_users_are_filterable() {
    let (repos, services) = services();
    repos.seed_user("verified@example.com", true).await;
    repos.seed_user("pending@example.com", false).await;

    let page = services
        .users
        .list(
            PageWindow::default(),
            &UserFilter {
                email_verified: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].email, "pending@example.com");
}

fn checkout(subscription_id: &str) -> CreateSubscriptionCommand {
    CreateSubscriptionCommand {
        subscription_id: subscription_id.into(),
        user_id: "member-17".into(),
        plan_id: "quarterly".into(),
        base_amount: 4_500,
        discount_amount: Some(500),
        discount_type: Some("fixed".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn new_subscription_shows_up_on_a_cached_page() {
    let (repos, services) = services();
    services
        .subscriptions
        .create(checkout("sub_001"))
        .await
        .expect("first");

    let before = services
        .subscriptions
        .list(PageWindow::default(), &SubscriptionFilter::default())
        .await
        .expect("list");
    assert_eq!(before.total, 1);
    let lists_after_first_read = repos.calls.list();

    services
        .subscriptions
        .list(PageWindow::default(), &SubscriptionFilter::default())
        .await
        .expect("cached");
    assert_eq!(repos.calls.list(), lists_after_first_read);

    let created = services
        .subscriptions
        .create(checkout("sub_002"))
        .await
        .expect("second");
    assert_eq!(created.total_amount, 4_000);

    let after = services
        .subscriptions
        .list(PageWindow::default(), &SubscriptionFilter::default())
        .await
        .expect("list");
    assert_eq!(after.total, 2);
    assert_eq!(after.items[0].subscription_id, "sub_002");
}

#[tokio::test]
async fn reused_subscription_id_is_a_conflict() {
    let (_repos, services) = services();
    services
        .subscriptions
        .create(checkout("sub_001"))
        .await
        .expect("first");

    let err = services
        .subscriptions
        .create(checkout("sub_001"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, ServiceError::Duplicate { .. }));
    assert_eq!(err.public_message(), "subscription already exists");
}

