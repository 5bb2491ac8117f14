use gemini_component::{
    ClientContext, FieldValue, GoogleGenerativeAiComponent, LanguageModel, LlmError,
    ModelComponent, ResolvedConfig,
};
use serde_json::{Map, Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const GEMINI_PRO_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

fn component_for(server: &MockServer) -> GoogleGenerativeAiComponent {
    GoogleGenerativeAiComponent::with_context(ClientContext::new().with_base_url(server.uri()))
}

fn resolve(component: &GoogleGenerativeAiComponent, values: Value) -> ResolvedConfig {
    let values: Map<String, Value> = values.as_object().cloned().expect("object");
    component.resolve(&values).expect("valid config")
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 1, "candidatesTokenCount": 1, "totalTokenCount": 2 }
    }))
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("mock server should record requests")
        .iter()
        .map(|request| request.body_json::<Value>().expect("json body"))
        .collect()
}

#[tokio::test]
async fn empty_api_key_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("unreachable"))
        .mount(&server)
        .await;

    let component = component_for(&server);
    let config = resolve(&component, json!({ "gemini_api_key": "", "model": "gemini-pro" }));

    let err = component.build_model(&config).unwrap_err();
    assert!(matches!(err, LlmError::Configuration(_)));
    assert_eq!(err.to_string(), "Gemini API Key is required.");

    assert!(request_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn valid_key_returns_model_that_answers_prompts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PRO_PATH))
        .and(header("x-goog-api-key", "VALID_KEY"))
        .respond_with(text_response("hi"))
        .expect(1)
        .mount(&server)
        .await;

    let component = component_for(&server);
    let config = resolve(
        &component,
        json!({
            "gemini_api_key": "VALID_KEY",
            "model": "gemini-pro",
            "temperature": 1,
            "top_p": 0.95,
            "top_k": 64,
            "max_output_tokens": 8192
        }),
    );

    let model = component.build_model(&config).expect("adapter");
    let text = model.invoke("hello", None).await.expect("text");
    assert_eq!(text, "hi");

    let bodies = request_bodies(&server).await;
    assert_eq!(
        bodies[0],
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
            "generationConfig": {
                "temperature": 1.0,
                "topP": 0.95,
                "topK": 64,
                "maxOutputTokens": 8192
            }
        })
    );
}

#[tokio::test]
async fn generation_config_matches_resolved_values_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro-latest:generateContent"))
        .respond_with(text_response("ok"))
        .mount(&server)
        .await;

    let component = component_for(&server);
    let config = resolve(
        &component,
        json!({
            "gemini_api_key": "VALID_KEY",
            "model": "gemini-1.5-pro-latest",
            "temperature": 0.25,
            "top_p": 0.5,
            "top_k": 10,
            "max_output_tokens": 256
        }),
    );

    let model = component.build_model(&config).expect("adapter");
    model.invoke("hello", None).await.expect("text");

    let bodies = request_bodies(&server).await;
    assert_eq!(
        bodies[0]["generationConfig"],
        json!({
            "temperature": 0.25,
            "topP": 0.5,
            "topK": 10,
            "maxOutputTokens": 256
        })
    );
}

#[tokio::test]
async fn stop_sequences_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PRO_PATH))
        .respond_with(text_response("hi"))
        .mount(&server)
        .await;

    let component = component_for(&server);
    let config = resolve(&component, json!({ "gemini_api_key": "VALID_KEY" }));
    let model = component.build_model(&config).expect("adapter");

    let stop = vec!["STOP_HERE".to_string()];
    let text = model.invoke("hello", Some(stop.as_slice())).await.expect("text");
    assert_eq!(text, "hi");

    let body = request_bodies(&server).await.remove(0).to_string();
    assert!(!body.contains("STOP_HERE"));
    assert!(!body.contains("stopSequences"));
}

#[tokio::test]
async fn each_invocation_starts_a_fresh_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PRO_PATH))
        .respond_with(text_response("hi"))
        .expect(2)
        .mount(&server)
        .await;

    let component = component_for(&server);
    let config = resolve(&component, json!({ "gemini_api_key": "VALID_KEY" }));
    let model = component.build_language_model(&config).expect("adapter");

    model.invoke("first", None).await.expect("text");
    model.invoke("second", None).await.expect("text");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[1]["contents"].as_array().map(Vec::len), Some(1));
    assert_eq!(bodies[1]["contents"][0]["parts"][0]["text"], "second");
}

#[tokio::test]
async fn models_keep_their_own_api_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-goog-api-key", "KEY_A"))
        .respond_with(text_response("from a"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("x-goog-api-key", "KEY_B"))
        .respond_with(text_response("from b"))
        .mount(&server)
        .await;

    let component = component_for(&server);
    let first = component
        .build_model(&resolve(&component, json!({ "gemini_api_key": "KEY_A" })))
        .expect("adapter");
    let second = component
        .build_model(&resolve(&component, json!({ "gemini_api_key": "KEY_B" })))
        .expect("adapter");

    // building the second model must not change the first one's credential
    assert_eq!(first.invoke("hello", None).await.expect("text"), "from a");
    assert_eq!(second.invoke("hello", None).await.expect("text"), "from b");
}

#[test]
fn unknown_model_is_rejected_by_resolution() {
    let component = GoogleGenerativeAiComponent::new();
    let values = json!({ "gemini_api_key": "VALID_KEY", "model": "gemini-ultra-9000" });

    let err = component
        .resolve(values.as_object().expect("object"))
        .unwrap_err();
    assert!(matches!(err, LlmError::InvalidField { ref field, .. } if field == "model"));
}

#[tokio::test]
async fn unknown_model_surfaces_remote_error_when_validation_is_bypassed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-ultra-9000:generateContent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "models/gemini-ultra-9000 is not found", "status": "NOT_FOUND" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let component = component_for(&server);
    let mut config = resolve(&component, json!({ "gemini_api_key": "VALID_KEY" }));
    config.set("model", FieldValue::Str("gemini-ultra-9000".to_string()));

    let model = component.build_model(&config).expect("adapter");
    let err = model.invoke("hello", None).await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("is not found"));
}

#[tokio::test]
async fn remote_failure_propagates_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let component = component_for(&server);
    let config = resolve(&component, json!({ "gemini_api_key": "VALID_KEY" }));
    let model = component.build_model(&config).expect("adapter");

    let err = model.invoke("hello", None).await.unwrap_err();
    assert!(matches!(err, LlmError::Api { status_code: Some(503), .. }));
    assert_eq!(request_bodies(&server).await.len(), 1);
}

#[test]
fn component_describes_itself_as_json() {
    let component = GoogleGenerativeAiComponent::new();

    let info = serde_json::to_value(component.info()).expect("info");
    assert_eq!(info["name"], "GoogleGenerativeAIModel");
    assert_eq!(info["icon"], "GoogleGenerativeAI");

    let inputs = serde_json::to_value(component.inputs()).expect("inputs");
    assert_eq!(inputs[2]["name"], "gemini_api_key");
    assert_eq!(inputs[2]["type"], "secret_str");
    assert_eq!(inputs[2]["password"], true);
    assert_eq!(inputs[6]["input_types"], json!(["OutputParser"]));
}
