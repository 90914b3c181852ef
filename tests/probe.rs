//! Connection probing never fails; every problem becomes `false`.

mod common;

use common::{gemini_reply, MockBackend, GEMINI_MODEL};
use mockito::Matcher;
use prompt_forge::{Dispatcher, ProviderId, ProviderSelection};

#[tokio::test]
async fn test_compat_probe_uses_metadata_endpoint() {
    let mut backend = MockBackend::start().await;
    let mock = backend
        .server
        .mock("GET", MockBackend::probe_path(ProviderId::OpenAi))
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let selection = ProviderSelection::new(ProviderId::OpenAi, "gpt-4o-mini").with_credential("sk-test");
    assert!(backend.dispatcher().probe(&selection).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openrouter_probe_uses_key_introspection() {
    let mut backend = MockBackend::start().await;
    let mock = backend
        .mock_json("GET", MockBackend::probe_path(ProviderId::OpenRouter), 200, r#"{"data":{}}"#)
        .await;

    let selection = ProviderSelection::new(ProviderId::OpenRouter, "m").with_credential("sk-or");
    assert!(backend.dispatcher().probe(&selection).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_compat_probe_rejected_key_is_false() {
    let mut backend = MockBackend::start().await;
    backend
        .mock_json(
            "GET",
            MockBackend::probe_path(ProviderId::Groq),
            401,
            r#"{"error":{"message":"Invalid API Key"}}"#,
        )
        .await;

    let selection = ProviderSelection::new(ProviderId::Groq, "m").with_credential("gsk-bad");
    assert!(!backend.dispatcher().probe(&selection).await);
}

#[tokio::test]
async fn test_probe_without_key_is_false_and_offline() {
    let mut backend = MockBackend::start().await;
    let mock = backend
        .server
        .mock("GET", MockBackend::probe_path(ProviderId::OpenAi))
        .expect(0)
        .create_async()
        .await;

    let selection = ProviderSelection::new(ProviderId::OpenAi, "m");
    assert!(!backend.dispatcher().probe(&selection).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_native_probe_checks_for_text() {
    let mut backend = MockBackend::start().await;
    let path = MockBackend::gemini_path(GEMINI_MODEL);
    let mock = backend
        .server
        .mock("POST", path.as_str())
        .match_query(Matcher::UrlEncoded("key".into(), "AIza".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "generationConfig": { "maxOutputTokens": 5 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_reply("pong"))
        .create_async()
        .await;

    let selection = ProviderSelection::new(ProviderId::Gemini, GEMINI_MODEL).with_credential("AIza");
    assert!(backend.dispatcher().probe(&selection).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_native_probe_without_text_is_false() {
    let mut backend = MockBackend::start().await;
    let path = MockBackend::gemini_path(GEMINI_MODEL);
    backend
        .mock_json("POST", &path, 200, r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#)
        .await;

    let selection = ProviderSelection::new(ProviderId::Gemini, GEMINI_MODEL).with_credential("AIza");
    assert!(!backend.dispatcher().probe(&selection).await);
}

#[tokio::test]
async fn test_relay_probe_sends_ping() {
    let mut backend = MockBackend::start().await;
    let mock = backend
        .server
        .mock("POST", "/hook")
        .match_body(Matcher::Json(serde_json::json!({ "prompt": "ping" })))
        .with_status(204)
        .create_async()
        .await;

    let selection = ProviderSelection::new(ProviderId::Gemini, GEMINI_MODEL)
        .with_relay(format!("{}/hook?Content-Type=application/json", backend.url()));
    assert!(backend.dispatcher().probe(&selection).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_endpoints_probe_false() {
    let dispatcher = Dispatcher::builder()
        .gemini_base_url("http://127.0.0.1:9")
        .compat_endpoints(
            ProviderId::OpenAi,
            prompt_forge::drivers::CompatEndpoints::with_base("http://127.0.0.1:9/v1"),
        )
        .build()
        .unwrap();

    let selections = vec![
        ProviderSelection::new(ProviderId::Gemini, GEMINI_MODEL).with_credential("AIza"),
        ProviderSelection::new(ProviderId::OpenAi, "m").with_credential("sk"),
        ProviderSelection::new(ProviderId::Gemini, GEMINI_MODEL).with_relay("http://127.0.0.1:9/hook"),
        ProviderSelection::new(ProviderId::Gemini, GEMINI_MODEL).with_relay("::not a url::"),
    ];
    let results = dispatcher.probe_all(&selections).await;

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|(_, alive)| !alive));
    assert_eq!(results[1].0, ProviderId::OpenAi);
}

#[tokio::test]
async fn test_probe_all_keeps_input_order() {
    let mut backend = MockBackend::start().await;
    backend
        .mock_json("GET", MockBackend::probe_path(ProviderId::Groq), 200, "{}")
        .await;
    backend
        .mock_json("GET", MockBackend::probe_path(ProviderId::OpenAi), 500, "{}")
        .await;

    let selections = vec![
        ProviderSelection::new(ProviderId::Groq, "m").with_credential("gsk"),
        ProviderSelection::new(ProviderId::OpenAi, "m").with_credential("sk"),
        ProviderSelection::new(ProviderId::OpenRouter, "m"),
    ];
    let results = backend.dispatcher().probe_all(&selections).await;

    assert_eq!(
        results,
        vec![
            (ProviderId::Groq, true),
            (ProviderId::OpenAi, false),
            (ProviderId::OpenRouter, false),
        ]
    );
}
