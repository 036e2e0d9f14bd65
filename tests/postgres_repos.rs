//! Runs against a live database: `DATABASE_URL=... cargo test -- --ignored`.

use std::sync::Arc;

use drivefitt::application::blogs::{BlogFilter, CreateBlogCommand, UpdateBlogCommand};
use drivefitt::application::careers::{CareerFilter, CreateCareerCommand};
use drivefitt::application::pagination::PageWindow;
use drivefitt::application::payments::PaymentFilter;
use drivefitt::application::repos::UpdateCareerParams;
use drivefitt::application::services::Services;
use drivefitt::application::subscriptions::{CreateSubscriptionCommand, SubscriptionFilter};
use drivefitt::application::user_details::CreateUserDetailsCommand;
use drivefitt::cache::{CacheConfig, CacheService};
use drivefitt::infra::db::PostgresRepositories;
use sqlx::PgPool;

fn services(pool: PgPool) -> Services {
    let cache = Arc::new(CacheService::in_memory(&CacheConfig::default()));
    Services::new(Arc::new(PostgresRepositories::new(pool)), cache)
}

fn career(title: &str, status: i16) -> CreateCareerCommand {
    CreateCareerCommand {
        title: title.into(),
        description: "Coach members".into(),
        location: "Pune".into(),
        job_type: "Full-time".into(),
        experience_level: "Mid".into(),
        requirements: "CSCS".into(),
        responsibilities: "Programming".into(),
        status: Some(status),
        posted_by: 1,
        ..Default::default()
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn career_listing_counts_match_the_filter(pool: PgPool) {
    let services = services(pool);
    for n in 0..15 {
        let status = if n < 10 { 1 } else { 2 };
        services
            .careers
            .create(career(&format!("Trainer {n}"), status))
            .await
            .expect("insert career");
    }

    let filter = CareerFilter {
        status: Some(1),
        search: Some("trainer".into()),
        ..Default::default()
    };
    let first = services
        .careers
        .list(PageWindow::clamp(Some(1), Some(10)), &filter)
        .await
        .expect("first page");
    assert_eq!(first.total, 10);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages, 1);

    let second = services
        .careers
        .list(PageWindow::clamp(Some(2), Some(10)), &filter)
        .await
        .expect("second page");
    assert!(second.items.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn blog_slugs_and_tags_round_trip(pool: PgPool) {
    let services = services(pool);
    let blog = services
        .blogs
        .create(CreateBlogCommand {
            title: "Mobility Basics".into(),
            content: "Stretch daily.".into(),
            author_id: 1,
            tags: vec!["mobility".into(), "recovery".into()],
            status: Some(1),
            ..Default::default()
        })
        .await
        .expect("create blog");
    assert_eq!(blog.slug, "mobility-basics");
    assert!(blog.published_at.is_some());

    let tagged = services
        .blogs
        .list(
            PageWindow::default(),
            &BlogFilter {
                tags: Some(vec!["recovery".into()]),
                ..Default::default()
            },
        )
        .await
        .expect("tag filter");
    assert_eq!(tagged.total, 1);

    let renamed = services
        .blogs
        .update(
            blog.id,
            UpdateBlogCommand {
                title: Some("Mobility for Lifters".into()),
                ..Default::default()
            },
        )
        .await
        .expect("rename");
    assert_eq!(renamed.slug, "mobility-for-lifters");

    services.blogs.delete(blog.id).await.expect("delete");
    assert!(services.blogs.get_by_slug("mobility-for-lifters").await.is_err());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn payment_filters_bind_every_placeholder(pool: PgPool) {
    sqlx::query(
        "INSERT INTO payments (transaction_id, user_email, amount, currency, payment_method, payment_gateway, status) \
         VALUES ('t1', 'a@example.com', 1000, 'INR', 'card', 'razorpay', 'completed'), \
                ('t2', 'b@example.com', 5000, 'INR', 'upi', 'razorpay', 'completed')",
    )
    .execute(&pool)
    .await
    .expect("seed payments");

    let services = services(pool);
    let page = services
        .payments
        .list(
            PageWindow::default(),
            &PaymentFilter {
                status: Some("completed".into()),
                min_amount: Some(2000),
                search: Some("example".into()),
                start_date: Some(time::macros::date!(2020 - 01 - 01)),
                ..Default::default()
            },
        )
        .await
        .expect("filtered payments");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].transaction_id, "t2");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn subscription_insert_derives_total_and_rejects_reuse(pool: PgPool) {
    let services = services(pool);
    let command = CreateSubscriptionCommand {
        subscription_id: "sub_pg_1".into(),
        user_id: "member-1".into(),
        plan_id: "monthly".into(),
        base_amount: 1500,
        discount_amount: Some(300),
        discount_type: Some("fixed".into()),
        razorpay_order_id: Some("order_1".into()),
        ..Default::default()
    };

    let created = services
        .subscriptions
        .create(command.clone())
        .await
        .expect("create");
    assert_eq!(created.total_amount, 1200);
    assert_eq!(created.payment_status, "pending");

    let page = services
        .subscriptions
        .list(PageWindow::default(), &SubscriptionFilter::default())
        .await
        .expect("list");
    assert_eq!(page.total, 1);

    let err = services
        .subscriptions
        .create(command)
        .await
        .expect_err("reused id");
    assert!(!err.public_message().contains("pkey"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn lead_insert_round_trips_the_birth_date(pool: PgPool) {
    let services = services(pool);
    let lead = services
        .user_details
        .create(CreateUserDetailsCommand {
            name: "Meera".into(),
            phone: "9820012345".into(),
            email: "meera@example.com".into(),
            dob: Some(time::macros::date!(1994 - 07 - 21)),
            gender: Some("Female".into()),
            ..Default::default()
        })
        .await
        .expect("create");
    assert_eq!(lead.dob, Some(time::macros::date!(1994 - 07 - 21)));
    assert!(!lead.otp_verified);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn null_update_clears_a_nullable_column(pool: PgPool) {
    let services = services(pool);
    let created = services
        .careers
        .create(CreateCareerCommand {
            benefits: Some("Free membership".into()),
            ..career("Front Desk", 1)
        })
        .await
        .expect("create");

    let updated = services
        .careers
        .update(
            created.id,
            UpdateCareerParams {
                benefits: Some(None),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.benefits, None);
}

