//! Advisory integration tests
//!
//! Exercises the Gemini client against a mock HTTP server and checks that
//! every failure ends in a fallback advisory.

use serde_json::json;
use shared::{AdvisorySource, ExtremeCondition};
use weather_insight_backend::config::AdvisoryConfig;
use weather_insight_backend::services::AdvisoryService;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONDITIONS: [ExtremeCondition; 1] = [ExtremeCondition::VeryHot];

fn config(endpoint: String, api_key: Option<&str>) -> AdvisoryConfig {
    AdvisoryConfig {
        api_endpoint: endpoint,
        api_key: api_key.map(str::to_string),
        model: "gemini-pro".to_string(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_generated_advisory() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .and(query_param("key", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hike before 9am and carry two litres of water."}]}
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AdvisoryService::from_config(&config(mock_server.uri(), Some("test_key"))).unwrap();
    let advisory = service.generate("Tokyo", "Hiking", &CONDITIONS).await;

    assert_eq!(advisory.source, AdvisorySource::Generated);
    assert_eq!(advisory.text, "Hike before 9am and carry two litres of water.");
}

#[tokio::test]
async fn test_provider_failure_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let service = AdvisoryService::from_config(&config(mock_server.uri(), Some("test_key"))).unwrap();
    let advisory = service.generate("Tokyo", "Hiking", &CONDITIONS).await;

    assert_eq!(advisory.source, AdvisorySource::FallbackError);
    assert_eq!(
        advisory.text,
        "For your hiking in Tokyo, please be prepared for very hot conditions. Ensure you have \
         appropriate gear, stay hydrated, and monitor weather updates regularly."
    );
}

#[tokio::test]
async fn test_empty_candidates_fall_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&mock_server)
        .await;

    let service = AdvisoryService::from_config(&config(mock_server.uri(), Some("test_key"))).unwrap();
    let advisory = service.generate("Tokyo", "Hiking", &CONDITIONS).await;

    assert_eq!(advisory.source, AdvisorySource::FallbackError);
}

#[tokio::test]
async fn test_missing_key_never_calls_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = AdvisoryService::from_config(&config(mock_server.uri(), None)).unwrap();
    let advisory = service.generate("Tokyo", "Hiking", &CONDITIONS).await;

    assert_eq!(advisory.source, AdvisorySource::FallbackNoCredential);
    assert!(advisory.text.ends_with("Safety should always be your top priority."));
}
