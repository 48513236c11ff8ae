use anyhow::Result;
use octocrab::Octocrab;
use tracing::info;

use crate::config::Config;
use crate::diff::diff;
use crate::fetch::fetch_snapshot;
use crate::github::types::PrInfoGroups;
use crate::output::format_report;
use crate::snapshot::SnapshotStore;

/// Diff `current` against whatever the store holds from the previous run
pub fn detect_changes(current: &PrInfoGroups, store: &dyn SnapshotStore) -> Vec<String> {
    let prior = store.load();
    diff(current, prior.as_ref())
}

/// One polling cycle: fetch, diff against the stored snapshot, render the
/// report, then replace the stored snapshot.
///
/// The store is written only after everything before it succeeded, so a
/// failed or timed out fetch leaves the previous snapshot in place.
pub async fn run(client: &Octocrab, config: &Config, store: &dyn SnapshotStore) -> Result<String> {
    let groups = fetch_snapshot(client, config).await?;

    let alerts = detect_changes(&groups, store);
    info!(alerts = alerts.len(), "compared with previous snapshot");

    let report = format_report(&groups, &alerts);
    store.save(&groups)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CLOSED_WINDOW, DEFAULT_LOOKBACK};
    use crate::diff::test_support::pr;
    use crate::github::FetchError;
    use crate::snapshot::MemorySnapshotStore;
    use chrono::{DateTime, Utc};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(timeout: Duration) -> Config {
        Config {
            token: "test-token".to_string(),
            username: "octocat".to_string(),
            org: None,
            repo: None,
            lookback: DEFAULT_LOOKBACK,
            closed_window: DEFAULT_CLOSED_WINDOW,
            timeout,
        }
    }

    fn search_body(updated: DateTime<Utc>, title: &str) -> serde_json::Value {
        serde_json::json!({
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "number": 7,
                "title": title,
                "body": "Adds caching",
                "state": "open",
                "html_url": "https://github.com/acme/widgets/pull/7",
                "draft": false,
                "comments": 0,
                "updated_at": updated.to_rfc3339(),
                "labels": []
            }]
        })
    }

    async fn mount(server: &MockServer, search: serde_json::Value, reviews: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/7/reviews"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reviews))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> Octocrab {
        let _ = rustls::crypto::ring::default_provider().install_default();
        crate::github::create_client_with_base("test-token", &server.uri()).unwrap()
    }

    #[test]
    fn test_detect_changes_without_baseline() {
        let store = MemorySnapshotStore::new();
        let current = PrInfoGroups {
            open: vec![pr(1, "Fix X")],
            closed: vec![],
        };
        assert!(detect_changes(&current, &store).is_empty());
    }

    #[test]
    fn test_detect_changes_against_stored() {
        let before = PrInfoGroups {
            open: vec![pr(1, "Fix X")],
            closed: vec![],
        };
        let store = MemorySnapshotStore::with_snapshot(before.clone());

        let mut current = before;
        current.open[0].updated_at += chrono::Duration::days(1);
        assert_eq!(detect_changes(&current, &store), vec!["PR \"Fix X\" updated"]);
    }

    #[tokio::test]
    async fn test_two_cycles_report_new_review() {
        let server = MockServer::start().await;
        let updated = Utc::now() - chrono::Duration::minutes(10);
        mount(&server, search_body(updated, "Add cache"), serde_json::json!([])).await;

        let store = MemorySnapshotStore::new();
        let client = client(&server);
        let cfg = config(Duration::from_secs(5));

        let first = run(&client, &cfg, &store).await.unwrap();
        assert!(!first.contains("🎵"), "first run should not alert: {}", first);
        assert!(first.starts_with("1 Open PR"));
        assert_eq!(store.load().unwrap().open.len(), 1);

        server.reset().await;
        mount(
            &server,
            search_body(updated, "Add cache"),
            serde_json::json!([{
                "user": { "login": "alice" },
                "state": "APPROVED",
                "submitted_at": "2024-01-01T10:00:00Z"
            }]),
        )
        .await;

        let second = run(&client, &cfg, &store).await.unwrap();
        assert!(
            second.starts_with("🎵 alice APPROVED on \"Add cache\"\n1 Open PR"),
            "got: {}",
            second
        );
        assert_eq!(store.load().unwrap().open[0].reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_leaves_snapshot_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_body(Utc::now(), "Slow"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let before = PrInfoGroups {
            open: vec![pr(1, "Fix X")],
            closed: vec![],
        };
        let store = MemorySnapshotStore::with_snapshot(before.clone());

        let err = run(&client(&server), &config(Duration::from_millis(100)), &store)
            .await
            .unwrap_err();

        assert!(FetchError::is_timeout(&err));
        assert_eq!(store.load(), Some(before));
    }

    #[tokio::test]
    async fn test_review_failure_fails_run_without_saving() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_body(Utc::now(), "Add cache")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/7/reviews"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let store = MemorySnapshotStore::new();
        let result = run(&client(&server), &config(Duration::from_secs(5)), &store).await;

        assert!(result.is_err());
        assert!(store.load().is_none());
    }
}
