//! WebSocket — stream chat events to a connected client; text frames from the
//! client are submitted as chat input.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message as WsMessage, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{error, info};

use watt_core::chat::{ChatCommand, SessionHandle};
use watt_core::events::ChatEvent;

use super::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ws/{session_id}", get(ws_handler))
}

/// Unknown sessions are a 404 whether or not the request is a valid upgrade.
async fn ws_handler(
    Path(session_id): Path<String>,
    State(state): State<Arc<AppState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let handle = match state.session(&session_id).await {
        Ok(handle) => handle,
        Err(e) => return e.into_response(),
    };
    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, handle)),
        Err(rejection) => rejection.into_response(),
    }
}

async fn handle_socket(mut socket: WebSocket, handle: SessionHandle) {
    let mut rx = handle.subscribe();
    info!("WebSocket client connected to {}", handle.id);

    loop {
        tokio::select! {
            // Session events -> client
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        let closed = matches!(event, ChatEvent::Closed);
                        match serde_json::to_string(&event) {
                            Ok(json) => {
                                if socket.send(WsMessage::Text(json.into())).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                error!("Failed to serialize event: {}", e);
                            }
                        }
                        if closed {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        info!("WebSocket lagged {} events", n);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
            // Client -> session input
            msg = socket.recv() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        let text = text.as_str().to_string();
                        if !text.trim().is_empty() && !handle.send(ChatCommand::Submit(text)).await {
                            break;
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {} // ping/pong/binary
                }
            }
        }
    }

    info!("WebSocket client disconnected from {}", handle.id);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use watt_core::config::Config;

    use super::super::{router, AppState};

    fn upgrade_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("connection", "upgrade")
            .header("upgrade", "websocket")
            .header("sec-websocket-version", "13")
            .header("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn it_404s_unknown_session() {
        let app = router(Arc::new(AppState::new(Config::default())));
        let response = app.oneshot(upgrade_request("/ws/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn it_rejects_plain_get_for_known_session() {
        let state = Arc::new(AppState::new(Config::default()));
        let app = router(Arc::clone(&state));
        let created = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let id = state.sessions.read().await.keys().next().cloned().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/ws/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_ne!(response.status(), StatusCode::NOT_FOUND);
    }
}
