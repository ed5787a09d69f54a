use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use chat_widget::config::WidgetConfig;
use chat_widget::error::TransportError;
use chat_widget::message::{ChatRequest, ChatResponse};
use chat_widget::services::controller::{ChatController, Completion};
use chat_widget::services::transport::{CHAT_ENDPOINT, HttpTransport, Transport};
use chat_widget::state::MessageKind;
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/chat")
}

async fn echo(headers: HeaderMap, Json(req): Json<ChatRequest>) -> Json<ChatResponse> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    Json(ChatResponse::reply(format!("{content_type} | {}", req.message)))
}

#[test]
fn test_default_endpoint_is_fixed() {
    assert_eq!(HttpTransport::new().endpoint(), CHAT_ENDPOINT);
    assert_eq!(CHAT_ENDPOINT, "http://127.0.0.1:8000/chat");
}

#[tokio::test]
async fn test_posts_json_message() {
    let url = spawn_stub(Router::new().route("/chat", post(echo))).await;
    let transport = HttpTransport::with_endpoint(url);

    let reply = transport.send("Hello").await.unwrap();
    assert_eq!(reply.response.as_deref(), Some("application/json | Hello"));
}

#[tokio::test]
async fn test_empty_object_has_no_reply() {
    let url = spawn_stub(Router::new().route("/chat", post(|| async { Json(json!({})) }))).await;
    let reply = HttpTransport::with_endpoint(url).send("Hello").await.unwrap();
    assert_eq!(reply, ChatResponse::default());
}

#[tokio::test]
async fn test_error_status_carries_detail() {
    let router = Router::new().route(
        "/chat",
        post(|| async {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "store offline"})))
        }),
    );
    let url = spawn_stub(router).await;

    let err = HttpTransport::with_endpoint(url).send("Hello").await.unwrap_err();
    match err {
        TransportError::Status { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail.as_deref(), Some("store offline"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_fails_to_decode() {
    let url = spawn_stub(Router::new().route("/chat", post(|| async { "plain text" }))).await;
    let err = HttpTransport::with_endpoint(url).send("Hello").await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpTransport::with_endpoint(format!("http://{addr}/chat"))
        .send("Hello")
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_controller_over_http() {
    let router = Router::new().route(
        "/chat",
        post(|Json(req): Json<ChatRequest>| async move {
            Json(ChatResponse::reply(format!("Here you go, {}: https://example.com/a.JPG", req.message)))
        }),
    );
    let url = spawn_stub(router).await;
    let mut ctl = ChatController::new(HttpTransport::with_endpoint(url), WidgetConfig::default());

    assert_eq!(ctl.submit("Alice").await, Some(Completion::Succeeded));

    let bot = ctl.view().messages().last().unwrap();
    assert_eq!(bot.kind, MessageKind::Normal);
    assert!(bot.text.starts_with("Here you go, Alice"));
    assert_eq!(bot.images().collect::<Vec<_>>(), vec!["https://example.com/a.JPG"]);
    assert_eq!(ctl.view().loading_count(), 0);
}

#[tokio::test]
async fn test_controller_shows_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = HttpTransport::with_endpoint(format!("http://{addr}/chat"));
    let mut ctl = ChatController::new(transport, WidgetConfig::default());

    assert_eq!(ctl.submit("Hello").await, Some(Completion::Failed));
    let messages = ctl.view().messages();
    assert_eq!(messages.iter().filter(|m| m.kind == MessageKind::Error).count(), 1);
    assert!(messages.last().unwrap().text.starts_with("Error: network request failed"));
    assert_eq!(ctl.view().loading_count(), 0);
}
