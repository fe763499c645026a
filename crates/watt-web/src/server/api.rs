//! REST API endpoints — chat sessions, appliances, bills, profile.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use watt_core::appliances::{ApplianceReport, NewAppliance};
use watt_core::billing::{previous_bills, Bill};
use watt_core::chat::{ChatCommand, ChatSession, SessionHandle};
use watt_core::profile::{welcome_line, ProfileUpdate};
use watt_core::responder::SUGGESTIONS;

use super::error::{ApiError, ApiResult};
use super::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/suggestions", get(get_suggestions))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(delete_session))
        .route(
            "/api/sessions/{id}/messages",
            get(get_messages).post(post_message),
        )
        .route(
            "/api/sessions/{id}/suggestions/{index}",
            post(post_suggestion),
        )
        .route("/api/appliances", get(list_appliances).post(add_appliance))
        .route("/api/bill", get(get_bill))
        .route("/api/bill/export", get(export_bill))
        .route("/api/bills/history", get(get_bill_history))
        .route("/api/profile", get(get_profile).put(update_profile))
        .route("/api/viewer", get(get_viewer))
}

async fn transcript_of(handle: &SessionHandle) -> ApiResult<Value> {
    handle
        .transcript()
        .await
        .map(|messages| json!(messages))
        .ok_or_else(|| ApiError::SessionClosed(handle.id.clone()))
}

// --- Chat ---

async fn get_suggestions() -> Json<Value> {
    Json(json!(SUGGESTIONS))
}

async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let session = ChatSession::new().with_idle_timeout(state.config.session_idle_timeout());
    let messages = session.transcript().to_vec();
    let suggestions = session.suggestions();
    let (handle, task) = session.spawn();
    let id = handle.id.clone();

    state.sessions.write().await.insert(id.clone(), handle);
    info!("Created chat session {}", id);

    // Forget the session once its task exits (idle timeout or Stop)
    let reaper_state = Arc::clone(&state);
    let reaper_id = id.clone();
    tokio::spawn(async move {
        if let Err(e) = task.await {
            warn!("Chat session {} task failed: {}", reaper_id, e);
        }
        if reaper_state.sessions.write().await.remove(&reaper_id).is_some() {
            info!("Removed expired chat session {}", reaper_id);
        }
    });

    (
        StatusCode::CREATED,
        Json(json!({"id": id, "messages": messages, "suggestions": suggestions})),
    )
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let handle = state
        .sessions
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| ApiError::SessionNotFound(id.clone()))?;
    handle.send(ChatCommand::Stop).await;
    info!("Closed chat session {}", id);
    Ok(Json(json!({"ok": true})))
}

async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let handle = state.session(&id).await?;
    Ok(Json(transcript_of(&handle).await?))
}

#[derive(Deserialize)]
struct MessageBody {
    text: Option<String>,
}

async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<MessageBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let text = body
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or(ApiError::EmptyMessage)?;

    let handle = state.session(&id).await?;
    if !handle.send(ChatCommand::Submit(text)).await {
        return Err(ApiError::SessionClosed(id));
    }
    // The reply lands after the typing delay; clients poll or listen on /ws/{id}.
    Ok((StatusCode::ACCEPTED, Json(json!({"ok": true}))))
}

async fn post_suggestion(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, usize)>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let handle = state.session(&id).await?;
    if !handle.send(ChatCommand::Suggestion(index)).await {
        return Err(ApiError::SessionClosed(id));
    }
    Ok((StatusCode::ACCEPTED, Json(json!({"ok": true}))))
}

// --- Appliances ---

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn list_appliances(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Value> {
    let catalog = state.catalog.read().await;
    let rate = state.config.rate_per_kwh;
    let reports: Vec<ApplianceReport> = catalog
        .search(query.q.as_deref().unwrap_or(""))
        .into_iter()
        .map(|a| ApplianceReport::new(a, rate))
        .collect();
    Json(json!(reports))
}

async fn add_appliance(
    State(state): State<Arc<AppState>>,
    Json(form): Json<NewAppliance>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut catalog = state.catalog.write().await;
    let added = catalog.add(form)?;
    Ok((
        StatusCode::CREATED,
        Json(json!(ApplianceReport::new(added, state.config.rate_per_kwh))),
    ))
}

// --- Bills ---

fn current_bill(state: &AppState) -> Bill {
    Bill::sample(Local::now().date_naive(), state.config.rate_per_kwh)
}

async fn get_bill(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(current_bill(&state).summary()))
}

async fn export_bill(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let bill = current_bill(&state);
    let text = bill.export_text(Local::now().date_naive());
    let disposition = format!("attachment; filename=\"{}\"", bill.export_filename());
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text,
    )
}

async fn get_bill_history() -> Json<Value> {
    Json(json!(previous_bills()))
}

// --- Profile ---

async fn get_profile(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(*state.profile.read().await))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<Value>> {
    let mut profile = state.profile.write().await;
    profile.apply(update)?;
    info!("Profile updated for {}", profile.full_name);
    Ok(Json(json!(*profile)))
}

async fn get_viewer(State(state): State<Arc<AppState>>) -> Json<Value> {
    let viewer = state.identity.viewer();
    Json(json!({
        "authenticated": viewer.authenticated,
        "display_name": viewer.display_name,
        "welcome": welcome_line(&viewer),
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use watt_core::chat::TYPING_DELAY;
    use watt_core::config::Config;

    use super::super::{router, AppState};
    use std::sync::Arc;

    fn test_app(user: Option<&str>) -> Router {
        let config = Config {
            user: user.map(String::from),
            ..Config::default()
        };
        router(Arc::new(AppState::new(config)))
    }

    fn test_app_with_state(config: Config) -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(config));
        (router(Arc::clone(&state)), state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn new_session(app: &Router) -> String {
        let (status, body) = send(app, "POST", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 4);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test(start_paused = true)]
    async fn it_replies_after_typing_delay() {
        let app = test_app(None);
        let id = new_session(&app).await;
        let uri = format!("/api/sessions/{}/messages", id);

        let (status, _) = send(&app, "POST", &uri, Some(json!({"text": "hi"}))).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (_, messages) = send(&app, "GET", &uri, None).await;
        assert_eq!(messages.as_array().unwrap().len(), 2);
        assert_eq!(messages[1]["sender"], "user");

        tokio::time::sleep(TYPING_DELAY + Duration::from_millis(10)).await;
        let (_, messages) = send(&app, "GET", &uri, None).await;
        assert_eq!(messages.as_array().unwrap().len(), 3);
        assert_eq!(messages[2]["sender"], "bot");
    }

    #[tokio::test]
    async fn it_rejects_blank_messages() {
        let app = test_app(None);
        let id = new_session(&app).await;
        let uri = format!("/api/sessions/{}/messages", id);

        let (status, body) = send(&app, "POST", &uri, Some(json!({"text": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);

        let (_, messages) = send(&app, "GET", &uri, None).await;
        assert_eq!(messages.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn it_404s_unknown_and_deleted_sessions() {
        let app = test_app(None);
        let (status, _) = send(&app, "GET", "/api/sessions/nope/messages", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let id = new_session(&app).await;
        let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) =
            send(&app, "GET", &format!("/api/sessions/{}/messages", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn it_submits_suggestions() {
        let app = test_app(None);
        let id = new_session(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/sessions/{}/suggestions/1", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        tokio::time::sleep(TYPING_DELAY * 2).await;
        let (_, messages) =
            send(&app, "GET", &format!("/api/sessions/{}/messages", id), None).await;
        assert_eq!(messages[1]["text"], "Tips for saving energy");
        assert_eq!(messages.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn it_searches_and_adds_appliances() {
        let app = test_app(None);
        let (_, list) = send(&app, "GET", "/api/appliances?q=kitchen", None).await;
        assert_eq!(list.as_array().unwrap().len(), 2);
        assert!(list[0]["efficiency"].is_string());
        assert_eq!(list[0]["name"], "Refrigerator");
        assert_eq!(list[0]["daily_cost"], 0.42);

        let (status, body) = send(
            &app,
            "POST",
            "/api/appliances",
            Some(json!({"name": "Kettle", "location": "Kitchen", "expected_watts": 2000, "current_watts": 2400})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["efficiency"], "poor");
        assert_eq!(body["daily_cost"], 6.91);

        let (status, body) = send(
            &app,
            "POST",
            "/api/appliances",
            Some(json!({"location": "Kitchen", "expected_watts": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("required"));

        let (_, list) = send(&app, "GET", "/api/appliances?q=kitchen", None).await;
        assert_eq!(list.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn it_exports_bill_as_text() {
        let app = test_app(None);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/bill/export")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"energy-bill-"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("SMART ENERGY MANAGEMENT SYSTEM\n"));
        assert!(text.contains("Air Conditioner (Living Room): 324 kWh - $38.88\n"));
    }

    #[tokio::test]
    async fn it_reports_viewer_and_profile() {
        let app = test_app(Some("Ada"));
        let (_, viewer) = send(&app, "GET", "/api/viewer", None).await;
        assert_eq!(viewer["authenticated"], true);
        assert_eq!(viewer["welcome"], "Welcome back, Ada");

        let (_, profile) = send(&app, "GET", "/api/profile", None).await;
        assert_eq!(profile["full_name"], "Ada");
        assert_eq!(profile["bill_history"].as_array().unwrap().len(), 5);

        let (_, bill) = send(&app, "GET", "/api/bill", None).await;
        assert_eq!(bill["items"].as_array().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn it_forgets_idle_sessions() {
        let (app, state) = test_app_with_state(Config {
            session_idle_secs: 60,
            ..Config::default()
        });
        let idle_id = new_session(&app).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        let fresh_id = new_session(&app).await;
        assert_eq!(state.sessions.read().await.len(), 2);

        tokio::time::sleep(Duration::from_secs(45)).await;
        let sessions = state.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&fresh_id));
        drop(sessions);

        let (status, _) =
            send(&app, "GET", &format!("/api/sessions/{}/messages", idle_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn it_forgets_deleted_sessions() {
        let (app, state) = test_app_with_state(Config::default());
        let id = new_session(&app).await;
        let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn it_updates_profile() {
        let app = test_app(Some("Ada"));
        let (status, profile) = send(
            &app,
            "PUT",
            "/api/profile",
            Some(json!({"phone": "(555) 987-6543", "monthly_budget": 95})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["phone"], "(555) 987-6543");

        let (_, profile) = send(&app, "GET", "/api/profile", None).await;
        assert_eq!(profile["full_name"], "Ada");
        assert_eq!(profile["phone"], "(555) 987-6543");
        assert_eq!(profile["monthly_budget"], 95);
        assert_eq!(profile["email"], "john.smith@email.com");

        let (status, body) =
            send(&app, "PUT", "/api/profile", Some(json!({"email": " "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        let (_, profile) = send(&app, "GET", "/api/profile", None).await;
        assert_eq!(profile["email"], "john.smith@email.com");
    }
}
