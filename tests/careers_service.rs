mod support;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use drivefitt::application::careers::{CareerFilter, CreateCareerCommand};
use drivefitt::application::error::ServiceError;
use drivefitt::application::pagination::PageWindow;
use drivefitt::application::repos::UpdateCareerParams;

use support::services;

fn window(page: i64, limit: i64) -> PageWindow {
    PageWindow::clamp(Some(page), Some(limit))
}

fn active() -> CareerFilter {
    CareerFilter {
        status: Some(1),
        ..Default::default()
    }
}

fn command(title: &str) -> CreateCareerCommand {
    CreateCareerCommand {
        title: title.into(),
        description: "Lead group classes".into(),
        location: "Mumbai".into(),
        job_type: "Part-time".into(),
        experience_level: "Entry".into(),
        requirements: "First aid".into(),
        responsibilities: "Classes".into(),
        posted_by: 9,
        ..Default::default()
    }
}

#[tokio::test]
async fn fifteen_careers_paginate_by_status() {
    let (repos, services) = services();
    for n in 0..15 {
        let status = if n < 10 { 1 } else { 2 };
        repos.seed_career(&format!("Trainer {n}"), status).await;
    }

    let first = services
        .careers
        .list(window(1, 10), &active())
        .await
        .expect("first page");
    assert_eq!(first.total, 10);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages, 1);

    let second = services
        .careers
        .list(window(2, 10), &active())
        .await
        .expect("second page");
    assert_eq!(second.total, 10);
    assert!(second.items.is_empty());

    let everything = services
        .careers
        .list(window(2, 4), &CareerFilter::default())
        .await
        .expect("unfiltered");
    assert_eq!(everything.total, 15);
    assert_eq!(everything.total_pages, 4);
    assert_eq!(everything.items.len(), 4);
}

#[tokio::test]
async fn total_is_independent_of_the_window() {
    let (repos, services) = services();
    for n in 0..7 {
        repos.seed_career(&format!("Coach {n}"), 1).await;
    }

    for (page, limit) in [(1, 1), (2, 3), (3, 3), (9, 100), (-1, 0)] {
        let listed = services
            .careers
            .list(window(page, limit), &CareerFilter::default())
            .await
            .expect("list");
        assert_eq!(listed.total, 7);
        assert!(listed.items.len() <= listed.limit as usize);
        let limit = i64::from(listed.limit);
        assert_eq!(listed.total_pages, (7 + limit - 1) / limit);
    }
}

#[tokio::test]
async fn newest_rows_come_first() {
    let (repos, services) = services();
    repos.seed_career("Older", 1).await;
    repos.seed_career("Newer", 1).await;

    let listed = services
        .careers
        .list(PageWindow::default(), &CareerFilter::default())
        .await
        .expect("list");
    let titles: Vec<_> = listed.items.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
}

#[tokio::test]
async fn repeated_list_is_served_from_cache() {
    let (repos, services) = services();
    repos.seed_career("Coach", 1).await;

    let first = services
        .careers
        .list(PageWindow::default(), &active())
        .await
        .expect("first");
    let second = services
        .careers
        .list(PageWindow::default(), &active())
        .await
        .expect("second");

    assert_eq!(first, second);
    assert_eq!(repos.calls.list(), 1);
    assert_eq!(repos.calls.count(), 1);
}

#[tokio::test]
async fn create_is_visible_after_a_cached_page() {
    let (repos, services) = services();
    repos.seed_career("Coach", 1).await;

    let before = services
        .careers
        .list(PageWindow::default(), &CareerFilter::default())
        .await
        .expect("before");
    assert_eq!(before.total, 1);

    let created = services
        .careers
        .create(command("Yoga Instructor"))
        .await
        .expect("create");
    assert_eq!(created.status, 1);

    let after = services
        .careers
        .list(PageWindow::default(), &CareerFilter::default())
        .await
        .expect("after");
    assert_eq!(after.total, 2);
    assert_eq!(after.items[0].id, created.id);
}

#[tokio::test]
async fn update_refreshes_the_item_cache() {
    let (repos, services) = services();
    let seeded = repos.seed_career("Coach", 1).await;

    let cached = services.careers.get_by_id(seeded.id).await.expect("get");
    assert_eq!(cached.title, "Coach");

    services
        .careers
        .update(
            seeded.id,
            UpdateCareerParams {
                title: Some("Head Coach".into()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    let fresh = services.careers.get_by_id(seeded.id).await.expect("get");
    assert_eq!(fresh.title, "Head Coach");
}

#[tokio::test]
async fn item_reads_are_cached() {
    let (repos, services) = services();
    let seeded = repos.seed_career("Coach", 1).await;

    services.careers.get_by_id(seeded.id).await.expect("first");
    services.careers.get_by_id(seeded.id).await.expect("second");
    assert_eq!(repos.calls.find(), 1);
}

#[tokio::test]
async fn deleted_career_is_gone_everywhere() {
    let (repos, services) = services();
    let seeded = repos.seed_career("Coach", 1).await;
    services.careers.get_by_id(seeded.id).await.expect("warm item cache");
    services
        .careers
        .list(PageWindow::default(), &CareerFilter::default())
        .await
        .expect("warm list cache");

    services.careers.delete(seeded.id).await.expect("delete");

    let err = services
        .careers
        .get_by_id(seeded.id)
        .await
        .expect_err("gone");
    assert!(matches!(err, ServiceError::NotFound { .. }));
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

    let listed = services
        .careers
        .list(PageWindow::default(), &CareerFilter::default())
        .await
        .expect("list");
    assert_eq!(listed.total, 0);

    let again = services.careers.delete(seeded.id).await.expect_err("twice");
    assert!(matches!(again, ServiceError::NotFound { .. }));
}

#[tokio::test]
async fn update_of_missing_career_is_not_found() {
    let (_repos, services) = services();
    let err = services
        .careers
        .update(
            404,
            UpdateCareerParams {
                title: Some("Ghost".into()),
                ..Default::default()
            },
        )
        .await
        .expect_err("missing");
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[tokio::test]
async fn empty_update_is_a_validation_error() {
    let (repos, services) = services();
    let seeded = repos.seed_career("Coach", 1).await;
    let err = services
        .careers
        .update(seeded.id, UpdateCareerParams::default())
        .await
        .expect_err("empty");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.public_message(), "No fields to update");
}

#[tokio::test]
async fn public_reads_hide_inactive_postings() {
    let (repos, services) = services();
    let open = repos.seed_career("Open", 1).await;
    let closed = repos.seed_career("Closed", 2).await;

    let listed = services
        .careers
        .list_active(PageWindow::default(), &CareerFilter::default())
        .await
        .expect("list");
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].id, open.id);

    let err = services
        .careers
        .get_active_by_id(closed.id)
        .await
        .expect_err("inactive");
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[tokio::test]
async fn zero_status_is_a_real_filter() {
    let (repos, services) = services();
    repos.seed_career("Coach", 1).await;

    let listed = services
        .careers
        .list(
            PageWindow::default(),
            &CareerFilter {
                status: Some(0),
                ..Default::default()
            },
        )
        .await
        .expect("list");
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn count_failure_hides_driver_text() {
    let (repos, services) = services();
    repos.seed_career("Coach", 1).await;
    repos.fail_count.store(true, Ordering::SeqCst);

    let err = services
        .careers
        .list(PageWindow::default(), &CareerFilter::default())
        .await
        .expect_err("count fails");
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.public_message(), "Failed to count careers");
}
