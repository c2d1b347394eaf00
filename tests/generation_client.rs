use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use showcase::generation::{
    ClientConfig, GenerationClient, GenerationError, ImageOptions, TextOptions,
};
use showcase::paper::PaperData;

#[derive(Debug, Clone)]
struct CapturedRequest {
    path: String,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn handle_generation(
    State(state): State<ServerState>,
    headers: HeaderMap,
    uri: Uri,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    state.requests.lock().await.push(CapturedRequest {
        path: uri.path().to_string(),
        authorization,
        body,
    });
    let reply = if state.status.is_success() {
        json!({"id": "gen-1", "choices": [{"message": {"content": "ok"}}]})
    } else {
        json!({"error": {"message": "boom"}})
    };
    (state.status, Json(reply))
}

async fn spawn_generation_server(
    status: StatusCode,
) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        status,
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(handle_generation))
        .route("/v1/images/generations", post(handle_generation))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/v1"), requests)
}

fn client_for(base_url: &str, api_key: Option<&str>) -> GenerationClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    GenerationClient::from_config(ClientConfig {
        api_key: api_key.map(ToOwned::to_owned),
        base_url: Some(base_url.to_string()),
    })
    .with_http_client(http)
}

#[tokio::test]
async fn text_request_uses_default_options() {
    let (base_url, requests) = spawn_generation_server(StatusCode::OK).await;
    let client = client_for(&base_url, Some("test-key"));

    let result = client
        .generate_text("hello", &TextOptions::default())
        .await
        .unwrap();
    assert_eq!(result["id"], "gen-1");

    let requests = requests.lock().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/v1/chat/completions");
    assert_eq!(request.authorization.as_deref(), Some("Bearer test-key"));
    assert_eq!(
        request.body,
        json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "user", "content": "hello"}],
            "max_tokens": 150,
            "temperature": 0.7,
        })
    );
}

#[tokio::test]
async fn image_request_carries_all_fields() {
    let (base_url, requests) = spawn_generation_server(StatusCode::OK).await;
    let client = client_for(&base_url, Some("test-key"));
    let options = ImageOptions {
        quality: Some("hd".to_string()),
        count: Some(2),
        ..ImageOptions::default()
    };

    client.generate_image("a lab", &options).await.unwrap();

    let requests = requests.lock().await;
    let request = &requests[0];
    assert_eq!(request.path, "/v1/images/generations");
    assert_eq!(
        request.body,
        json!({
            "prompt": "a lab",
            "model": "dall-e-3",
            "size": "1024x1024",
            "quality": "hd",
            "n": 2,
        })
    );
}

#[tokio::test]
async fn research_visuals_raise_token_budget() {
    let (base_url, requests) = spawn_generation_server(StatusCode::OK).await;
    let client = client_for(&base_url, Some("test-key"));
    let paper = PaperData::new("Haptic Menus", "Menus you can feel.").with_keywords(["haptics"]);

    client.generate_research_visuals(&paper).await.unwrap();

    let requests = requests.lock().await;
    let body = &requests[0].body;
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["temperature"], 0.8);
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.starts_with(
        "\n    Create visual storytelling suggestions for a research paper titled \"Haptic Menus\"."
    ));
    assert!(prompt.contains("Keywords: haptics"));
}

#[tokio::test]
async fn missing_key_never_reaches_the_server() {
    let (base_url, requests) = spawn_generation_server(StatusCode::OK).await;
    let client = client_for(&base_url, None);

    let err = client
        .generate_text("hello", &TextOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::MissingApiKey));
    let err = client
        .generate_image("hello", &ImageOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::MissingApiKey));

    assert!(requests.lock().await.is_empty());
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let (base_url, requests) = spawn_generation_server(StatusCode::INTERNAL_SERVER_ERROR).await;
    let client = client_for(&base_url, Some("test-key"));

    let err = client
        .generate_text("hello", &TextOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("500"));
    assert_eq!(requests.lock().await.len(), 1);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}/v1"), Some("test-key"));
    let err = client
        .generate_text("hello", &TextOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)));
    assert_eq!(err.status(), None);
}
