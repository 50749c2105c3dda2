//! End-to-end tests: parse -> run batch -> classify -> export, all over
//! the mock account client and mock clipboard sinks.

use keysweep::classify;
use keysweep::export::{ExportEngine, ExportStatus, MockClipboard};
use keysweep::http::{AccountResponse, MockAccountClient};
use keysweep::parser;
use keysweep::{BatchRunner, CheckerConfig, KeyStatus, KeysweepError};
use std::sync::Arc;
use std::time::Duration;

fn balance_body(balance: f64) -> String {
    format!(r#"{{"data": {{"balance": {}, "name": "tester"}}}}"#, balance)
}

fn ok_response(balance: f64) -> keysweep::Result<AccountResponse> {
    Ok(AccountResponse {
        status: 200,
        body: balance_body(balance),
    })
}

fn status_response(status: u16) -> keysweep::Result<AccountResponse> {
    Ok(AccountResponse {
        status,
        body: r#"{"message": "denied"}"#.to_string(),
    })
}

#[test_log::test(tokio::test)]
async fn mixed_batch_classifies_and_counts() {
    let mock = MockAccountClient::new();
    mock.add_response("k1", ok_response(5.0));
    mock.add_response("k2", status_response(401));
    mock.add_response("k3", ok_response(0.0));

    let runner = BatchRunner::new(Arc::new(mock.clone()), CheckerConfig::default());

    // Operator pastes a comma/newline mixture
    let credentials = parser::parse("k1, k2\nk3");
    assert_eq!(credentials, vec!["k1", "k2", "k3"]);

    let result = runner.run_batch(credentials).await.unwrap().unwrap();
    assert_eq!(result.len(), 3);

    let counts = classify::counts(&result);
    assert_eq!(counts.invalid, 1);
    assert_eq!(counts.valid_no_balance, 1);
    assert_eq!(counts.valid_with_balance, 1);
    assert_eq!(counts.total(), 3);

    assert_eq!(classify::valid_keys_with_balance(&result), vec!["k1"]);
    assert_eq!(classify::all_valid_keys(&result), vec!["k1", "k3"]);

    // Every credential got exactly one bearer-authenticated lookup
    assert_eq!(mock.call_count(), 3);
    let urls: Vec<_> = mock.get_calls().iter().map(|c| c.url.clone()).collect();
    assert!(urls.iter().all(|u| u == &CheckerConfig::default().account_info_url));
}

#[test_log::test(tokio::test)]
async fn all_failures_export_nothing() {
    let mock = MockAccountClient::new();
    mock.add_response("k1", status_response(401));
    mock.add_response("k2", status_response(503));

    let runner = BatchRunner::new(Arc::new(mock), CheckerConfig::default());
    let result = runner
        .run_batch(vec!["k1".into(), "k2".into()])
        .await
        .unwrap()
        .unwrap();

    let valid = classify::all_valid_keys(&result);
    assert!(valid.is_empty());

    // The derived payload is empty, so the export is a no-op
    let primary = MockClipboard::new();
    let engine = ExportEngine::new(Box::new(primary.clone()), Box::new(MockClipboard::new()));
    let status = engine.export(&classify::export_payload(&valid)).await;
    assert_eq!(status, ExportStatus::Skipped);
    assert!(primary.writes().is_empty());
    assert!(!engine.is_copied());
}

#[test_log::test(tokio::test)]
async fn funded_subset_round_trips_to_the_clipboard() {
    let mock = MockAccountClient::new();
    mock.add_response("k1", ok_response(5.0));
    mock.add_response("k2", ok_response(0.0));
    mock.add_response("k3", ok_response(2.5));

    let runner = BatchRunner::new(Arc::new(mock), CheckerConfig::default());
    let result = runner
        .run_batch(vec!["k1".into(), "k2".into(), "k3".into()])
        .await
        .unwrap()
        .unwrap();

    let funded = classify::valid_keys_with_balance(&result);
    assert_eq!(funded, vec!["k1", "k3"]);

    let primary = MockClipboard::new();
    let engine = ExportEngine::new(Box::new(primary.clone()), Box::new(MockClipboard::new()))
        .with_ack_window(Duration::from_millis(50));

    let status = engine.export(&classify::export_payload(&funded)).await;
    assert_eq!(status, ExportStatus::Copied);
    assert_eq!(primary.writes(), vec!["k1,k3"]);
    assert!(engine.is_copied());

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(!engine.is_copied());
}

#[test_log::test(tokio::test)]
async fn primary_clipboard_outage_falls_back_invisibly() {
    let mock = MockAccountClient::new();
    mock.add_response("k1", ok_response(1.0));

    let runner = BatchRunner::new(Arc::new(mock), CheckerConfig::default());
    let result = runner.run_batch(vec!["k1".into()]).await.unwrap().unwrap();

    let fallback = MockClipboard::new();
    let engine = ExportEngine::new(
        Box::new(MockClipboard::failing()),
        Box::new(fallback.clone()),
    );

    let payload = classify::export_payload(&classify::all_valid_keys(&result));
    let status = engine.export(&payload).await;

    // The caller cannot tell the primary transport failed
    assert_eq!(status, ExportStatus::Copied);
    assert_eq!(fallback.writes(), vec!["k1"]);
}

#[test_log::test(tokio::test)]
async fn empty_input_never_reaches_the_network() {
    let mock = MockAccountClient::new();
    let runner = BatchRunner::new(Arc::new(mock.clone()), CheckerConfig::default());

    let credentials = parser::parse("  , \n  ");
    assert!(credentials.is_empty());

    let err = runner.run_batch(credentials).await.unwrap_err();
    assert!(matches!(err, KeysweepError::EmptyBatch));
    assert_eq!(mock.call_count(), 0);
    assert!(runner.current_result().is_none());
}

#[test_log::test(tokio::test)]
async fn transport_failures_become_invalid_outcomes() {
    let mock = MockAccountClient::new();
    mock.add_response("good", ok_response(3.0));
    // "dead" and "gone" have no configured responses: each lookup fails
    // with a transport error that must stay contained to its own outcome.

    let runner = BatchRunner::new(Arc::new(mock), CheckerConfig::default());
    let result = runner
        .run_batch(vec!["dead".into(), "good".into(), "gone".into()])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.outcomes[0].status(), KeyStatus::Invalid);
    assert!(result.outcomes[0].failure_reason().unwrap().contains("dead"));
    assert_eq!(result.outcomes[1].status(), KeyStatus::ValidWithBalance);
    assert_eq!(result.outcomes[2].status(), KeyStatus::Invalid);
}

#[test_log::test(tokio::test)]
async fn newer_batch_wins_over_a_slow_stale_one() {
    let mock = MockAccountClient::new();
    let slow_trigger = mock.add_response_with_trigger("slow", ok_response(99.0));
    mock.add_response("fast", ok_response(1.0));

    let runner = Arc::new(BatchRunner::new(
        Arc::new(mock.clone()),
        CheckerConfig::default(),
    ));

    let stale = {
        let runner = runner.clone();
        tokio::spawn(async move { runner.run_batch(vec!["slow".into()]).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(mock.in_flight_count(), 1);

    let fresh = runner.run_batch(vec!["fast".into()]).await.unwrap().unwrap();
    assert_eq!(fresh.outcomes[0].credential, "fast");

    // The slow batch settles afterwards and is discarded unpublished
    slow_trigger.send(()).unwrap();
    assert!(stale.await.unwrap().unwrap().is_none());

    let published = runner.current_result().unwrap();
    assert_eq!(published.outcomes[0].credential, "fast");
    assert_eq!(
        classify::valid_keys_with_balance(&published),
        vec!["fast"]
    );
}

#[test_log::test(tokio::test)]
async fn masked_display_never_alters_the_export() {
    let key = "sk-abcdefghijklmnop";
    let mock = MockAccountClient::new();
    mock.add_response(key, ok_response(4.0));

    let runner = BatchRunner::new(Arc::new(mock), CheckerConfig::default());
    let result = runner.run_batch(vec![key.into()]).await.unwrap().unwrap();

    let masked = classify::mask_credential(&result.outcomes[0].credential);
    assert_eq!(masked, "sk-a****mnop");

    // Export carries the full credential, not the display mask
    let primary = MockClipboard::new();
    let engine = ExportEngine::new(Box::new(primary.clone()), Box::new(MockClipboard::new()));
    engine
        .export(&classify::export_payload(&classify::all_valid_keys(&result)))
        .await;
    assert_eq!(primary.writes(), vec![key]);
}
