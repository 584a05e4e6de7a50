//! Integration tests for submit and watch.

use docharvest_client::{ProgressView, TrackerState, build_job};
use docharvest_core::error::ErrorKind;
use docharvest_core::traits::queue::TaskQueue;
use docharvest_entity::{DocumentKind, JobRequest, StatusSnapshot};

use crate::helpers::{self, FakeDocumentApi, TestHarness};

fn request(identifiers: &str) -> JobRequest {
    build_job(
        identifiers,
        helpers::date("2024-01-01"),
        helpers::date("2024-06-30"),
        &[DocumentKind::Slides, DocumentKind::Report],
        "bucket-x",
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_submitted_job_is_watched_to_completion() {
    let harness = TestHarness::start();
    let mut session = harness.session();

    let handle = session
        .submit(&request("US0000000001\n\n  US0000000002  "))
        .await
        .unwrap();

    let mut fractions = Vec::new();
    let last = session
        .watch(handle, |view| {
            if let ProgressView::Running { fraction, .. } = view {
                fractions.push(*fraction);
            }
        })
        .await
        .unwrap();

    assert_eq!(
        last,
        ProgressView::Complete {
            total: 8,
            succeeded: 8,
            failed: 0
        }
    );
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(session.state(), TrackerState::Complete);
    assert_eq!(session.current(), None);

    let keys = harness.sink.keys.lock().unwrap().clone();
    assert_eq!(keys.len(), 8);
    assert!(keys.contains(&"bucket-x/US0000000002/report/2024-05-15_report.bin".to_string()));
    assert!(keys.iter().all(|k| !k.contains("2024-08-15")));

    assert_eq!(
        harness.store.read_snapshot(handle).await.unwrap(),
        Some(StatusSnapshot::Complete {
            total: 8,
            succeeded: 8,
            failed: 0
        })
    );

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_job_is_rendered_and_frees_the_session() {
    let api = FakeDocumentApi {
        broken: vec!["BROKEN".to_string()],
    };
    let harness = TestHarness::start_with(api, Vec::new());
    let mut session = harness.session();

    let handle = session.submit(&request("BROKEN")).await.unwrap();
    let last = session.watch(handle, |_| {}).await.unwrap();

    match last {
        ProgressView::Failed { reason } => assert!(reason.contains("BROKEN")),
        other => panic!("unexpected view: {other:?}"),
    }
    assert_eq!(session.state(), TrackerState::Failed);

    let err = session.poll_once(handle).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    session.submit(&request("US0000000001")).await.unwrap();

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_job_without_worker_is_reported_lost_after_grace() {
    let harness = TestHarness::without_worker();
    let mut session = harness.session();

    let handle = session.submit(&request("US0000000001")).await.unwrap();

    let mut waiting = 0;
    let last = session
        .watch(handle, |view| {
            if matches!(view, ProgressView::Waiting { .. }) {
                waiting += 1;
            }
        })
        .await
        .unwrap();

    assert_eq!(
        last,
        ProgressView::Failed {
            reason: "job not found / expired".to_string()
        }
    );
    assert!(waiting >= 5);
}

#[tokio::test(start_paused = true)]
async fn test_second_submission_is_rejected_while_in_flight() {
    let harness = TestHarness::without_worker();
    let mut session = harness.session();

    session.submit(&request("US0000000001")).await.unwrap();
    let err = session.submit(&request("US0000000002")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    assert_eq!(harness.queue.pending_count().await.unwrap(), 1);
}
