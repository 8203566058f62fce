//! HTTP routes
//!
//! - `GET /`         re-registers the Telegram webhook
//! - `POST /webhook` receives Telegram updates
//! - `GET /health`   liveness check

use crate::error::BotResult;
use crate::handlers;
use crate::state::AppState;
use crate::telegram::Update;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the bot router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(register_webhook))
        .route("/webhook", post(handle_webhook))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "ok"
}

/// Drop the current webhook and point Telegram at ours
async fn reset_webhook(state: &AppState) -> BotResult<()> {
    state.transport.delete_webhook().await?;
    state.transport.set_webhook(&state.webhook_endpoint).await
}

async fn register_webhook(State(state): State<AppState>) -> (StatusCode, String) {
    match reset_webhook(&state).await {
        Ok(()) => {
            tracing::info!(url = %state.webhook_endpoint, "Webhook registered");
            (StatusCode::OK, "Webhook has been set!".to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Webhook registration failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

/// Handle an incoming Telegram update
///
/// The update is processed to completion before Telegram gets its 200.
/// Rendering itself runs on the blocking pool.
async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !is_json(&headers) {
        tracing::warn!("Webhook call without JSON content type");
        return StatusCode::FORBIDDEN;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse update JSON");
            return StatusCode::BAD_REQUEST;
        }
    };
    tracing::debug!(update_id = update.update_id, "Received update");

    handlers::handle_update(&state, update).await;
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Welcome;
    use crate::transport::ChatTransport;
    use crate::transport::mock::{Call, MockTransport};
    use axum::body::Body;
    use axum::http::Request;
    use label_sheet::{LabelConfig, LabelSheetGenerator};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(transport: Arc<MockTransport>) -> Router {
        create_router(AppState {
            transport: transport as Arc<dyn ChatTransport>,
            generator: Arc::new(LabelSheetGenerator::new(
                LabelConfig::default().without_logo(),
            )),
            welcome: Arc::new(Welcome {
                bot_name: "Barcode Label Bot".into(),
                support_contact: None,
            }),
            webhook_endpoint: "https://labels.example.com/webhook".into(),
        })
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(MockTransport::default()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_register_webhook() {
        let transport = Arc::new(MockTransport::default());
        let response = app(transport.clone())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Webhook has been set!");
        assert_eq!(
            transport.calls(),
            vec![
                Call::DeleteWebhook,
                Call::SetWebhook("https://labels.example.com/webhook".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_webhook_rejects_non_json() {
        let transport = Arc::new(MockTransport::default());
        let response = app(transport.clone())
            .oneshot(
                Request::post("/webhook")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_rejects_missing_content_type() {
        let response = app(Arc::new(MockTransport::default()))
            .oneshot(Request::post("/webhook").body(Body::from("{}")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_webhook_accepts_update() {
        let update = r#"{"update_id": 5, "message": {"message_id": 3, "chat": {"id": 9}, "text": "1, A, B"}}"#;
        let transport = Arc::new(MockTransport::default());
        let response = app(transport.clone())
            .oneshot(
                Request::post("/webhook")
                    .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
                    .body(Body::from(update))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.is_empty());

        // Handled by the time the response is out
        let calls = transport.calls();
        assert_eq!(calls.len(), 3, "{calls:?}");
        assert!(matches!(&calls[0], Call::Message { text, .. } if text == handlers::GENERATING));
        assert!(matches!(
            &calls[1],
            Call::Document { file_name, .. } if file_name == "1_labels.pdf"
        ));
        assert!(matches!(calls[2], Call::Delete { chat_id: 9, .. }));
    }

    #[tokio::test]
    async fn test_webhook_malformed_json() {
        let response = app(Arc::new(MockTransport::default()))
            .oneshot(
                Request::post("/webhook")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
