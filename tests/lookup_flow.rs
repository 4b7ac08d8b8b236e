//! Cache and presentation flow tests against a mock lookup server.
//!
//! Each mock declares how many lookups it expects; the server verifies the
//! count when it is dropped at the end of the test.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use whatsnew::cache::{CACHED_LOOKUP_KEY, LAST_SHOWN_KEY};
use whatsnew::{
    GateState, KitConfig, LookupRecord, MemoryStore, PreferenceStore, PresentOutcome, Presenter,
    ReleaseNotesError, ReleaseNotesKit,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_ID: &str = "1525384123";

fn lookup_body(app_id: u64, version: &str) -> serde_json::Value {
    json!({
        "resultCount": 1,
        "results": [{
            "artistId": app_id,
            "trackCensoredName": "Sample App",
            "version": version,
            "currentVersionReleaseDate": "2023-01-10T18:43:04Z",
            "releaseNotes": format!("Notes for {}", version)
        }]
    })
}

fn cached_bytes(app_id: Option<u64>, version: &str) -> Vec<u8> {
    let mut record = json!({ "version": version, "releaseNotes": "cached" });
    if let Some(id) = app_id {
        record["artistId"] = json!(id);
    }
    serde_json::to_vec(&json!({ "resultCount": 1, "results": [record] })).unwrap()
}

async fn mount_lookup(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", APP_ID))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

fn kit(server: &MockServer, installed: &str) -> ReleaseNotesKit<Arc<MemoryStore>> {
    let config = KitConfig::new(installed)
        .with_lookup_base(format!("{}/", server.uri()))
        .with_timeout(Duration::from_millis(500));
    let mut kit = ReleaseNotesKit::new(config, Arc::new(MemoryStore::new())).unwrap();
    kit.set_app(APP_ID);
    kit
}

#[derive(Default)]
struct RecordingPresenter {
    shown: Vec<LookupRecord>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, record: &LookupRecord) -> whatsnew::Result<()> {
        self.shown.push(record.clone());
        Ok(())
    }
}

// ============================================================================
// Cache resolution
// ============================================================================

#[tokio::test]
async fn test_absent_cache_always_fetches() {
    for precondition in [false, true] {
        let server = MockServer::start().await;
        mount_lookup(
            &server,
            ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.0")),
            1,
        )
        .await;

        let kit = kit(&server, "2.0");
        let record = kit.resolve(precondition).await.unwrap();

        assert_eq!(record.current_version.as_deref(), Some("2.0"));
        assert!(kit.store().data(CACHED_LOOKUP_KEY).is_some());
    }
}

#[tokio::test]
async fn test_cache_hit_without_precondition_does_not_fetch() {
    let server = MockServer::start().await;
    mount_lookup(&server, ResponseTemplate::new(200), 0).await;

    let kit = kit(&server, "3.0");
    kit.store()
        .set_data(CACHED_LOOKUP_KEY, &cached_bytes(Some(99), "1.0"))
        .unwrap();

    let record = kit.resolve(false).await.unwrap();
    assert_eq!(record.current_version.as_deref(), Some("1.0"));
    assert_eq!(record.release_notes.as_deref(), Some("cached"));
}

#[tokio::test]
async fn test_matching_cache_with_precondition_does_not_fetch() {
    let server = MockServer::start().await;
    mount_lookup(&server, ResponseTemplate::new(200), 0).await;

    let kit = kit(&server, "2.0");
    kit.store()
        .set_data(CACHED_LOOKUP_KEY, &cached_bytes(Some(1525384123), "2.0"))
        .unwrap();

    let record = kit.resolve(true).await.unwrap();
    assert_eq!(record.release_notes.as_deref(), Some("cached"));
}

#[tokio::test]
async fn test_version_mismatch_fetches_once() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.0")),
        1,
    )
    .await;

    let kit = kit(&server, "2.0");
    kit.store()
        .set_data(CACHED_LOOKUP_KEY, &cached_bytes(Some(1525384123), "1.9"))
        .unwrap();

    let record = kit.resolve(true).await.unwrap();
    assert_eq!(record.release_notes.as_deref(), Some("Notes for 2.0"));
}

#[tokio::test]
async fn test_app_id_mismatch_fetches_once() {
    // Cached for another app, and a record without an ID compares as "0"
    for cached in [cached_bytes(Some(42), "2.0"), cached_bytes(None, "2.0")] {
        let server = MockServer::start().await;
        mount_lookup(
            &server,
            ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.0")),
            1,
        )
        .await;

        let kit = kit(&server, "2.0");
        kit.store().set_data(CACHED_LOOKUP_KEY, &cached).unwrap();

        let record = kit.resolve(true).await.unwrap();
        assert_eq!(record.app_id, Some(1525384123));
    }
}

#[tokio::test]
async fn test_undecodable_cache_falls_back_to_fetch() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.0")),
        1,
    )
    .await;

    let kit = kit(&server, "2.0");
    kit.store().set_data(CACHED_LOOKUP_KEY, b"{truncated").unwrap();

    let record = kit.resolve(false).await.unwrap();
    assert_eq!(record.current_version.as_deref(), Some("2.0"));
}

// ============================================================================
// Fetch failures
// ============================================================================

#[tokio::test]
async fn test_empty_body_is_malformed_data() {
    let server = MockServer::start().await;
    mount_lookup(&server, ResponseTemplate::new(200), 1).await;

    let kit = kit(&server, "2.0");
    kit.store()
        .set_data(CACHED_LOOKUP_KEY, &cached_bytes(Some(1525384123), "1.0"))
        .unwrap();

    let result = kit.fetch().await;

    assert!(matches!(result, Err(ReleaseNotesError::MalformedData(_))));
    // Nothing was received, so the previous cache survives
    assert_eq!(
        kit.store().data(CACHED_LOOKUP_KEY),
        Some(cached_bytes(Some(1525384123), "1.0"))
    );
}

#[tokio::test]
async fn test_non_json_body_is_parsing_failure_and_overwrites_cache() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(503).set_body_string("Service Unavailable"),
        1,
    )
    .await;

    let kit = kit(&server, "2.0");
    kit.store()
        .set_data(CACHED_LOOKUP_KEY, &cached_bytes(Some(1525384123), "1.0"))
        .unwrap();

    let result = kit.fetch().await;

    assert!(matches!(result, Err(ReleaseNotesError::ParsingFailure(_))));
    assert_eq!(
        kit.store().data(CACHED_LOOKUP_KEY),
        Some(b"Service Unavailable".to_vec())
    );
}

#[tokio::test]
async fn test_zero_results_is_no_results() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "resultCount": 0, "results": [] })),
        1,
    )
    .await;

    let kit = kit(&server, "2.0");
    let result = kit.resolve(true).await;

    assert!(matches!(result, Err(ReleaseNotesError::NoResults)));
}

#[tokio::test]
async fn test_slow_lookup_resolves_as_malformed_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(lookup_body(1525384123, "2.0"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let kit = kit(&server, "2.0");
    let result = tokio::time::timeout(Duration::from_secs(3), kit.fetch())
        .await
        .expect("fetch must resolve within the transport deadline");

    assert!(matches!(result, Err(ReleaseNotesError::MalformedData(_))));
    assert!(kit.store().data(CACHED_LOOKUP_KEY).is_none());
}

#[tokio::test]
async fn test_unconfigured_kit_does_not_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = KitConfig::new("2.0").with_lookup_base(server.uri());
    let kit = ReleaseNotesKit::new(config, MemoryStore::new()).unwrap();

    assert!(matches!(
        kit.resolve(true).await,
        Err(ReleaseNotesError::NotConfigured)
    ));
}

// ============================================================================
// Presentation gate
// ============================================================================

#[tokio::test]
async fn test_first_launch_presents_and_writes_marker() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.0")),
        1,
    )
    .await;

    let mut kit = kit(&server, "2.0");
    let mut presenter = RecordingPresenter::default();
    assert!(kit.should_present_on_version_change());

    let outcome = kit.present_on_version_change(&mut presenter).await.unwrap();

    assert_eq!(
        outcome,
        PresentOutcome::Presented {
            version: Some("2.0".to_string())
        }
    );
    assert_eq!(presenter.shown.len(), 1);
    assert_eq!(
        kit.store().string(LAST_SHOWN_KEY),
        Some("2.0".to_string())
    );
    assert!(!kit.should_present_on_version_change());
}

#[tokio::test]
async fn test_marker_for_installed_version_skips_everything() {
    let server = MockServer::start().await;
    mount_lookup(&server, ResponseTemplate::new(200), 0).await;

    let mut kit = kit(&server, "2.0");
    kit.store().set_string(LAST_SHOWN_KEY, "2.0").unwrap();
    let mut presenter = RecordingPresenter::default();

    let outcome = kit.present_on_version_change(&mut presenter).await.unwrap();

    assert_eq!(outcome, PresentOutcome::AlreadyShown);
    assert!(presenter.shown.is_empty());
}

#[tokio::test]
async fn test_newer_store_version_is_suppressed() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.1")),
        1,
    )
    .await;

    let mut kit = kit(&server, "2.0");
    kit.store().set_string(LAST_SHOWN_KEY, "1.9").unwrap();
    let mut presenter = RecordingPresenter::default();

    let outcome = kit.present_on_version_change(&mut presenter).await.unwrap();

    assert_eq!(
        outcome,
        PresentOutcome::Suppressed {
            listed_version: Some("2.1".to_string())
        }
    );
    assert!(presenter.shown.is_empty());
    assert_eq!(kit.store().string(LAST_SHOWN_KEY), Some("1.9".to_string()));
    assert_eq!(kit.last_attempt(), GateState::Suppressed);
}

#[tokio::test]
async fn test_stale_cache_is_refreshed_before_presenting() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.0")),
        1,
    )
    .await;

    let mut kit = kit(&server, "2.0");
    kit.store()
        .set_data(CACHED_LOOKUP_KEY, &cached_bytes(Some(1525384123), "1.0"))
        .unwrap();
    let mut presenter = RecordingPresenter::default();

    kit.present(true, &mut presenter).await.unwrap();

    assert_eq!(
        presenter.shown[0].release_notes.as_deref(),
        Some("Notes for 2.0")
    );

    // The refreshed cache now satisfies the precondition without another lookup
    let record = kit.resolve(true).await.unwrap();
    assert_eq!(record.current_version.as_deref(), Some("2.0"));
}

#[tokio::test]
async fn test_warm_up_primes_cache() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.0")),
        1,
    )
    .await;

    let kit = kit(&server, "2.0");
    kit.warm_up().await;
    // Second warm-up is served from cache
    kit.warm_up().await;

    assert!(kit.store().data(CACHED_LOOKUP_KEY).is_some());
}

#[tokio::test]
async fn test_configure_primes_cache_once() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        ResponseTemplate::new(200).set_body_json(lookup_body(1525384123, "2.0")),
        1,
    )
    .await;

    let config = KitConfig::new("2.0")
        .with_lookup_base(format!("{}/", server.uri()))
        .with_timeout(Duration::from_millis(500));
    let mut kit = ReleaseNotesKit::new(config, Arc::new(MemoryStore::new())).unwrap();
    assert!(kit.store().data(CACHED_LOOKUP_KEY).is_none());

    kit.configure(APP_ID).await;
    assert!(kit.store().data(CACHED_LOOKUP_KEY).is_some());

    // Presenting afterwards is served from the primed cache
    let mut presenter = RecordingPresenter::default();
    let outcome = kit.present_on_version_change(&mut presenter).await.unwrap();
    assert!(outcome.was_presented());
    assert_eq!(presenter.shown.len(), 1);
}
