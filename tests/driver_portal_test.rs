//! Driver portal task flow against a mock backend

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};
use helpers::*;
use vip_transfer::models::TransferStatus;
use vip_transfer::views::DriverPortalView;
use vip_transfer::TransferError;

async fn portal_with(ctx: &TestContext, transfers: Vec<serde_json::Value>) -> DriverPortalView {
    ctx.backend
        .mock_ok(
            "GET",
            &format!("/transfers/driver/{}", DRIVER_ID),
            json!({ "transfers": transfers }),
        )
        .await;
    let view = DriverPortalView::new(ctx.ctx.clone(), DRIVER_ID);
    view.reload().await.unwrap();
    view
}

#[tokio::test]
async fn test_advance_pending_to_accepted() {
    let ctx = TestContext::new().await;
    let view = portal_with(&ctx, vec![transfer_json(TRANSFER_ID, "pending")]).await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/transfers/{}", TRANSFER_ID)))
        .and(body_json(json!({ "status": "accepted" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .expect(1)
        .mount(&ctx.backend.server)
        .await;

    let next = view.advance(TRANSFER_ID).await.unwrap();

    assert_eq!(next, TransferStatus::Accepted);
    assert_eq!(ctx.notifier.successes(), vec![ctx.t("driver.statusUpdated")]);
}

#[tokio::test]
async fn test_accepted_task_navigates_to_pickup() {
    let ctx = TestContext::new().await;
    let view = portal_with(&ctx, vec![transfer_json(TRANSFER_ID, "accepted")]).await;

    let task = &view.active_tasks()[0];
    let link = view.navigation_link(task).unwrap();
    assert!(link.contains("Heydar%20Aliyev%20Airport"));
    assert_eq!(view.action_label(task), Some(ctx.t("driver.markAsArrived")));
}

#[tokio::test]
async fn test_decline_sends_translated_reason() {
    let ctx = TestContext::new().await;
    let view = portal_with(&ctx, vec![transfer_json(TRANSFER_ID, "pending")]).await;
    assert_eq!(view.active_tasks().len(), 1);

    ctx.backend.reset().await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/transfers/{}", TRANSFER_ID)))
        .and(body_json(json!({ "status": "declined", "declineReason": "On break" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .expect(1)
        .mount(&ctx.backend.server)
        .await;
    ctx.backend
        .mock_ok(
            "GET",
            &format!("/transfers/driver/{}", DRIVER_ID),
            json!({ "transfers": [transfer_json(TRANSFER_ID, "declined")] }),
        )
        .await;

    view.decline(TRANSFER_ID, "driver.declineReason.onBreak").await.unwrap();

    let state = view.state();
    assert_eq!(state.transfers[0].status, TransferStatus::Declined);
    assert!(view.active_tasks().is_empty());
    assert!(view.completed_tasks().is_empty());
}

#[tokio::test]
async fn test_decline_only_allowed_while_pending() {
    let ctx = TestContext::new().await;
    let view = portal_with(&ctx, vec![transfer_json(TRANSFER_ID, "in-progress")]).await;
    ctx.backend
        .expect_ok("PUT", &format!("/transfers/{}", TRANSFER_ID), json!({}), 0)
        .await;

    let err = view
        .decline(TRANSFER_ID, "driver.declineReason.onBreak")
        .await
        .unwrap_err();
    assert_matches!(err, TransferError::InvalidStateTransition { .. });
}

#[tokio::test]
async fn test_completed_task_cannot_advance() {
    let ctx = TestContext::new().await;
    let view = portal_with(&ctx, vec![transfer_json(TRANSFER_ID, "completed")]).await;

    assert!(view.active_tasks().is_empty());
    assert_eq!(view.completed_tasks().len(), 1);
    assert_matches!(
        view.advance(TRANSFER_ID).await,
        Err(TransferError::InvalidStateTransition { .. })
    );
}

#[tokio::test]
async fn test_failed_update_keeps_status() {
    let ctx = TestContext::new().await;
    let view = portal_with(&ctx, vec![transfer_json(TRANSFER_ID, "pending")]).await;
    ctx.backend
        .mock_error("PUT", &format!("/transfers/{}", TRANSFER_ID), 500, "Server error")
        .await;

    view.advance(TRANSFER_ID).await.unwrap_err();

    assert_eq!(view.state().transfers[0].status, TransferStatus::Pending);
    assert_eq!(ctx.notifier.errors(), vec![ctx.t("driver.statusUpdateError")]);
}

#[tokio::test]
async fn test_busy_and_free() {
    let ctx = TestContext::new().await;
    let view = DriverPortalView::new(ctx.ctx.clone(), DRIVER_ID);
    Mock::given(method("PUT"))
        .and(path("/api/drivers/me/busy-status"))
        .and(body_json(json!({ "status": "offline", "busyReason": "On break" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "driver": driver_json(DRIVER_ID, "Rauf", "offline")
        }))))
        .expect(1)
        .mount(&ctx.backend.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/drivers/me/busy-status"))
        .and(body_json(json!({ "status": "available" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "driver": driver_json(DRIVER_ID, "Rauf", "available")
        }))))
        .expect(1)
        .mount(&ctx.backend.server)
        .await;

    view.set_busy("driver.declineReason.onBreak").await.unwrap();
    let state = view.state();
    assert!(state.busy);
    assert_eq!(state.busy_reason.as_deref(), Some("On break"));

    view.set_free().await.unwrap();
    assert!(!view.state().busy);
    assert_eq!(
        ctx.notifier.successes(),
        vec![ctx.t("driver.statusBusy"), ctx.t("driver.statusFree")]
    );
}
