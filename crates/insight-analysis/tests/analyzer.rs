//! End-to-end tests for the analysis orchestrator against a wiremock backend.
//!
//! Both pipeline stages hit the same `generateContent` path; mocks are told
//! apart by request body: the grounding stage carries the search tool, the
//! synthesis stage carries the JSON generation config.

use std::sync::Arc;

use insight_analysis::{cache_key, smart_search, suggest_keywords, AnalysisError, Analyzer};
use insight_gemini::{GeminiClient, GeminiError};
use insight_store::{MemoryStore, StoragePort};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url("test-key", "gemini-2.5-flash", 30, base_url)
        .expect("client construction should not fail")
}

fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
}

fn grounding_matcher() -> impl wiremock::Match {
    body_partial_json(serde_json::json!({ "tools": [{ "google_search": {} }] }))
}

fn synthesis_matcher() -> impl wiremock::Match {
    body_partial_json(serde_json::json!({
        "generationConfig": { "responseMimeType": "application/json" }
    }))
}

fn analysis_document() -> serde_json::Value {
    serde_json::json!({
        "meta": { "fetchedPostCount": 100, "fetchMode": "fixed-newest-100" },
        "metrics": {
            "totalPostsGrowth": 12.5,
            "totalPostsVolume": 2850,
            "activeTrends": 3,
            "engagementRate": 8.2,
            "activeUsers": 1400
        },
        "topics": [{
            "title": "Battery drain",
            "growth": 40.0,
            "volume": 38,
            "sentiment": 22.0,
            "history": [{ "month": "Jan", "value": 10.0 }]
        }],
        "subreddits": [],
        "brands": []
    })
}

async fn mount_grounding(server: &MockServer, context: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(grounding_matcher())
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(context)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_synthesis(server: &MockServer, reply_text: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(synthesis_matcher())
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(reply_text)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn analyze_caches_and_stamps_freshness() {
    let server = MockServer::start().await;
    mount_grounding(&server, "three subreddits discuss battery drain", 1).await;
    mount_synthesis(&server, &analysis_document().to_string(), 1).await;

    let store = Arc::new(MemoryStore::new());
    let analyzer = Analyzer::new(test_client(&server.uri()), Arc::clone(&store));

    let first = analyzer
        .analyze("iphone battery", false)
        .await
        .expect("analysis should succeed");

    assert_eq!(first.metrics.total_posts_volume, 2850);
    assert_eq!(first.topics[0].title, "Battery drain");
    assert!(
        first.meta.last_updated.is_some(),
        "finalize must stamp last_updated"
    );
    assert!(store.read(&cache_key("iphone battery")).unwrap().is_some());

    // Second call is served from cache: same stamp, and the expect(1) on
    // each mock verifies no further upstream traffic.
    let second = analyzer
        .analyze(" iPhone Battery ", false)
        .await
        .expect("cache hit should succeed");
    assert_eq!(second, first);
}

#[tokio::test]
async fn analyze_discards_model_supplied_freshness() {
    let server = MockServer::start().await;
    let mut document = analysis_document();
    document["meta"]["lastUpdated"] = serde_json::json!("2001-01-01T00:00:00Z");
    mount_grounding(&server, "ctx", 1).await;
    mount_synthesis(&server, &document.to_string(), 1).await;

    let analyzer = Analyzer::new(test_client(&server.uri()), MemoryStore::new());
    let result = analyzer.analyze("q", false).await.unwrap();

    let stamped = result.meta.last_updated.expect("stamp set");
    assert!(stamped.timestamp() > 1_000_000_000, "stamp is wall-clock, not model-supplied");
}

#[tokio::test]
async fn force_refresh_re_runs_both_stages_and_overwrites() {
    let server = MockServer::start().await;
    mount_grounding(&server, "ctx", 2).await;
    mount_synthesis(&server, &analysis_document().to_string(), 2).await;

    let store = Arc::new(MemoryStore::new());
    let analyzer = Analyzer::new(test_client(&server.uri()), Arc::clone(&store));

    let first = analyzer.analyze("q", false).await.unwrap();
    let refreshed = analyzer.analyze("q", true).await.unwrap();

    assert!(refreshed.meta.last_updated >= first.meta.last_updated);
    let cached_raw = store.read(&cache_key("q")).unwrap().unwrap();
    let cached: insight_core::AnalysisResult = serde_json::from_str(&cached_raw).unwrap();
    assert_eq!(cached.meta.last_updated, refreshed.meta.last_updated);
}

#[tokio::test]
async fn fenced_synthesis_reply_is_recovered() {
    let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", analysis_document());
    mount_grounding(&server, "ctx", 1).await;
    mount_synthesis(&server, &fenced, 1).await;

    let analyzer = Analyzer::new(test_client(&server.uri()), MemoryStore::new());
    let result = analyzer.analyze("q", false).await.unwrap();
    assert_eq!(result.metrics.total_posts_volume, 2850);
}

#[tokio::test]
async fn over_delivering_backend_is_clamped_to_caps() {
    let server = MockServer::start().await;
    let mut document = analysis_document();
    let topic = document["topics"][0].clone();
    document["topics"] = serde_json::Value::Array(vec![topic; 9]);
    mount_grounding(&server, "ctx", 1).await;
    mount_synthesis(&server, &document.to_string(), 1).await;

    let analyzer = Analyzer::new(test_client(&server.uri()), MemoryStore::new());
    let result = analyzer.analyze("q", false).await.unwrap();
    assert_eq!(result.topics.len(), 4);
}

#[tokio::test]
async fn malformed_synthesis_fails_without_caching() {
    let server = MockServer::start().await;
    mount_grounding(&server, "ctx", 1).await;
    mount_synthesis(&server, "the model rambled with no JSON anywhere", 1).await;

    let store = Arc::new(MemoryStore::new());
    let analyzer = Analyzer::new(test_client(&server.uri()), Arc::clone(&store));

    let err = analyzer.analyze("q", false).await.unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse { .. }));
    assert!(store.is_empty(), "nothing may be cached on failure");
}

#[tokio::test]
async fn schema_mismatch_is_malformed_and_keeps_raw_text() {
    let server = MockServer::start().await;
    // Valid JSON, but no metrics block.
    mount_grounding(&server, "ctx", 1).await;
    mount_synthesis(&server, r#"{"meta":{"fetchedPostCount":1,"fetchMode":"x"}}"#, 1).await;

    let analyzer = Analyzer::new(test_client(&server.uri()), MemoryStore::new());
    let err = analyzer.analyze("q", false).await.unwrap_err();
    match err {
        AnalysisError::MalformedResponse { raw } => assert!(raw.contains("fetchedPostCount")),
        other => panic!("expected MalformedResponse, got: {other:?}"),
    }
}

#[tokio::test]
async fn upstream_failure_surfaces_and_preserves_cache() {
    let server = MockServer::start().await;
    mount_grounding(&server, "ctx", 2).await;

    // First synthesis succeeds, then the mock is replaced by a quota error.
    let success = Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(synthesis_matcher())
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body(&analysis_document().to_string())),
        )
        .expect(1)
        .mount_as_scoped(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let analyzer = Analyzer::new(test_client(&server.uri()), Arc::clone(&store));
    let first = analyzer.analyze("q", false).await.unwrap();
    drop(success);

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(synthesis_matcher())
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "message": "quota exhausted" }
        })))
        .mount(&server)
        .await;

    let err = analyzer.analyze("q", true).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Upstream(GeminiError::Api { status: 429, .. })
    ));

    // The prior entry is untouched; a non-forced call still hits it.
    let cached = analyzer.analyze("q", false).await.unwrap();
    assert_eq!(cached, first);
}

#[tokio::test]
async fn suggest_keywords_parses_plain_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(synthesis_matcher())
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
            r#"["newborn sleep", "sleep training", "co-sleeping"]"#,
        )))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let keywords = suggest_keywords(&client, "parenting").await.unwrap();
    assert_eq!(keywords.len(), 3);
    assert_eq!(keywords[0], "newborn sleep");
}

#[tokio::test]
async fn suggest_keywords_rejects_non_array_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body(r#"{"keywords": []}"#)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = suggest_keywords(&client, "parenting").await.unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse { .. }));
}

#[tokio::test]
async fn smart_search_dedupes_and_caps_sources() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": "总结：大多数用户推荐白噪音。" }] },
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "a", "title": "A1" } },
                    { "web": { "uri": "b", "title": "B" } },
                    { "web": { "uri": "a", "title": "A2" } }
                ]
            }
        }]
    });
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(grounding_matcher())
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let answer = smart_search(&client, "how do parents get newborns to sleep?")
        .await
        .unwrap();

    assert_eq!(answer.summary, "总结：大多数用户推荐白噪音。");
    assert_eq!(answer.sources.len(), 2);
    assert_eq!(answer.sources[0].title, "A1");
    assert_eq!(answer.sources[1].url, "b");
}
