//! Analytics API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use chrono::{Duration, Local};
use serde_json::json;

use common::fixtures;
use common::TestContext;
use routina_backend::models::RoutineBlock;

fn block(id: &str, category: &str, completed: bool) -> RoutineBlock {
    serde_json::from_value(fixtures::block(id, "09:00", "10:00", category, completed)).unwrap()
}

/// Test analytics for a user with no data.
#[tokio::test]
#[ignore = "requires database"]
async fn test_analytics_empty() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;

    let response = server
        .get("/api/analytics")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_plans"], 0);
    assert_eq!(body["average_completion"].as_f64(), Some(0.0));
    assert_eq!(body["current_streak"], 0);
    assert_eq!(body["category_stats"], json!({}));
    assert_eq!(body["habit_stats"], json!([]));
    assert_eq!(body["recent_plans"], json!([]));

    ctx.cleanup_user(user_id).await;
}

/// Test streak, averages, categories and habit stats over stored data.
#[tokio::test]
#[ignore = "requires database"]
async fn test_analytics_summary() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let today = Local::now().date_naive();

    // Today first: 80, 75, 60 -> streak of 2
    for (offset, rate) in [(0, 80.0), (1, 75.0), (2, 60.0)] {
        let blocks = vec![block("w", "work", true), block("f", "fitness", false)];
        ctx.db
            .insert_plan(user_id, today - Duration::days(offset), &blocks, rate)
            .await
            .unwrap()
            .expect("plan inserted");
    }
    // Outside a 7-day window
    ctx.db
        .insert_plan(user_id, today - Duration::days(20), &[], 100.0)
        .await
        .unwrap()
        .expect("plan inserted");

    let habit = ctx
        .db
        .create_habit(user_id, "Meditate", None, "daily", None)
        .await
        .unwrap();
    for (offset, completed) in [(0, true), (1, true), (3, false)] {
        ctx.db
            .upsert_checkin(
                user_id,
                habit.id,
                today - Duration::days(offset),
                completed,
                None,
            )
            .await
            .unwrap();
    }

    let response = server
        .get("/api/analytics?days=7")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_plans"], 3);
    assert_eq!(body["average_completion"].as_f64(), Some(71.67));
    assert_eq!(body["current_streak"], 2);
    assert_eq!(body["category_stats"], json!({ "work": 3 }));
    assert_eq!(body["recent_plans"].as_array().unwrap().len(), 3);
    assert_eq!(body["recent_plans"][0]["date"], today.to_string());

    let stats = &body["habit_stats"][0];
    assert_eq!(stats["habit_id"], habit.id.to_string());
    assert_eq!(stats["habit_name"], "Meditate");
    assert_eq!(stats["current_streak"], 2);
    assert_eq!(stats["total_checkins"], 2);
    let rate = stats["completion_rate"].as_f64().unwrap();
    assert!((rate - 200.0 / 3.0).abs() < 1e-9);

    // The default 30-day window includes the older plan
    let body: serde_json::Value = server
        .get("/api/analytics")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .json();
    assert_eq!(body["total_plans"], 4);

    ctx.cleanup_user(user_id).await;
}
