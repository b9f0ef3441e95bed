//! HTTP + WebSocket API for Laughmeter
//!
//! A browser (or any frame producer) runs the camera and the face model and
//! posts one smile score per frame; the server owns detection and billing.
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /session/new - Create new session
//! - GET /session/:id - Get session status
//! - POST /session/:id/start - Enter the show
//! - POST /session/:id/frame - Process one frame
//! - POST /session/:id/finish - Finish & pay, returns the receipt
//! - POST /session/:id/restart - Back to the entrance
//! - POST /session/:id/fail - Report a fatal capture/model error
//! - POST /session/:id/retry - Start over after a fatal error
//! - GET /session/:id/receipt - Get the receipt
//! - POST /session/:id/settle - Settle the bill (demo)
//! - WS /ws/:id - Live frame reports

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};
use tracing::info;

use crate::config::LaughConfig;
use crate::core::{settle, LaughSession};
use crate::error::{LaughError, SessionFault};
use crate::types::{
    DetectionState, FaceObservation, FrameReport, Receipt, SessionPhase, SessionStats, Settlement,
};

/// Session state
#[derive(Debug)]
pub struct ApiSession {
    pub id: String,
    pub session: LaughSession,
    /// Origin of the session clock when frames carry no timestamp
    pub epoch: Instant,
    pub update_tx: broadcast::Sender<FrameReport>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, ApiSession>>,
    pub defaults: LaughConfig,
}

/// Create new session request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewSessionRequest {
    pub config: Option<LaughConfig>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub config: LaughConfig,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub phase: SessionPhase,
    pub stats: SessionStats,
    pub detection: DetectionState,
    pub frame_count: u64,
    pub fault: Option<SessionFault>,
    pub receipt_available: bool,
}

/// One frame from the producer. `smile_score` wins over `face`;
/// neither means no face was found.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FrameRequest {
    pub timestamp_ms: Option<u64>,
    pub smile_score: Option<f64>,
    pub face: Option<FaceObservation>,
}

/// Fatal conditions the frame producer can report
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InferenceInitFailure,
    CameraPermissionDenied,
    CameraUnavailable,
}

/// Fail request
#[derive(Debug, Deserialize)]
pub struct FailRequest {
    pub kind: FailureKind,
    #[serde(default)]
    pub detail: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// API errors
#[derive(Debug)]
pub enum ApiError {
    SessionNotFound,
    NoReceipt,
    Laugh(LaughError),
}

impl From<LaughError> for ApiError {
    fn from(err: LaughError) -> Self {
        Self::Laugh(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::SessionNotFound => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", "Session not found".to_string()),
            ApiError::NoReceipt => (StatusCode::NOT_FOUND, "NO_RECEIPT", "No receipt issued yet".to_string()),
            ApiError::Laugh(err) => {
                let status = match &err {
                    LaughError::InvalidTransition { .. } | LaughError::RetryRequired(_) => {
                        StatusCode::CONFLICT
                    }
                    LaughError::InvalidScore(_) | LaughError::InvalidConfig(_) | LaughError::Json(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.code(), err.to_string())
            }
        };
        let body = ErrorBody {
            code: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Create the API router
pub fn create_router(defaults: LaughConfig) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        defaults,
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/start", post(start_show))
        .route("/session/:id/frame", post(process_frame))
        .route("/session/:id/finish", post(finish_show))
        .route("/session/:id/restart", post(restart))
        .route("/session/:id/fail", post(fail))
        .route("/session/:id/retry", post(retry))
        .route("/session/:id/receipt", get(get_receipt))
        .route("/session/:id/settle", post(settle_bill))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> ApiResult<NewSessionResponse> {
    let config = req.config.unwrap_or_else(|| state.defaults.clone());
    config.validate()?;

    let session_id = generate_session_id();
    let (tx, _) = broadcast::channel(100);

    let session = ApiSession {
        id: session_id.clone(),
        session: LaughSession::new(config.clone()),
        epoch: Instant::now(),
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!(session = %session_id, "session created");

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
        config,
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<SessionStatusResponse> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    Ok(Json(status_of(session)))
}

/// Enter the show
async fn start_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<SessionStatusResponse> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
    session.session.start_show()?;
    session.epoch = Instant::now();
    Ok(Json(status_of(session)))
}

/// Process one frame
async fn process_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FrameRequest>,
) -> ApiResult<FrameReport> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    let score = match (req.smile_score, req.face.as_ref()) {
        (Some(score), _) => Some(score),
        (None, Some(face)) => Some(face.smile_score()),
        (None, None) => None,
    };
    if let Some(score) = score {
        if !(0.0..=1.0).contains(&score) {
            return Err(LaughError::InvalidScore(score).into());
        }
    }

    let now_ms = req
        .timestamp_ms
        .unwrap_or_else(|| session.epoch.elapsed().as_millis() as u64);
    let report = FrameReport {
        face_box: req.face.as_ref().and_then(FaceObservation::bounding_box),
        ..session.session.process_frame(score, now_ms)?
    };

    // Broadcast update
    let _ = session.update_tx.send(report.clone());

    Ok(Json(report))
}

/// Finish & pay
async fn finish_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Receipt> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
    let receipt = session.session.finish_show()?.clone();
    Ok(Json(receipt))
}

/// Back to the entrance
async fn restart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<SessionStatusResponse> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
    session.session.restart()?;
    Ok(Json(status_of(session)))
}

/// Record a fatal error reported by the frame producer
async fn fail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FailRequest>,
) -> ApiResult<SessionStatusResponse> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
    let err = match req.kind {
        FailureKind::InferenceInitFailure => LaughError::InferenceInitFailure(req.detail),
        FailureKind::CameraPermissionDenied => LaughError::CameraPermissionDenied(req.detail),
        FailureKind::CameraUnavailable => LaughError::CameraUnavailable(req.detail),
    };
    session.session.fail(&err)?;
    Ok(Json(status_of(session)))
}

/// Start over after a fatal error
async fn retry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<SessionStatusResponse> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;
    session.session.retry();
    Ok(Json(status_of(session)))
}

/// Get receipt for session
async fn get_receipt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Receipt> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    let receipt = session.session.receipt().ok_or(ApiError::NoReceipt)?;
    Ok(Json(receipt.clone()))
}

/// Settle the bill (never charges)
async fn settle_bill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Settlement> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    let receipt = session.session.receipt().ok_or(ApiError::NoReceipt)?;
    Ok(Json(settle(receipt)))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(ApiError::SessionNotFound)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Forward frame reports until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<FrameReport>) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(report) => {
                    let json = serde_json::to_string(&report).unwrap_or_default();
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

fn status_of(session: &ApiSession) -> SessionStatusResponse {
    SessionStatusResponse {
        session_id: session.id.clone(),
        phase: session.session.phase(),
        stats: session.session.stats(),
        detection: session.session.detection(),
        frame_count: session.session.frame_count(),
        fault: session.session.fault().cloned(),
        receipt_available: session.session.receipt().is_some(),
    }
}

/// Generate session ID
fn generate_session_id() -> String {
    format!("session_{}", uuid::Uuid::new_v4().simple())
}

/// Run the API server
pub async fn run_server(addr: &str, defaults: LaughConfig) -> crate::Result<()> {
    let router = create_router(defaults);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Laughmeter API running");
    println!("🎤 Laughmeter API running on {}", addr);
    println!("  POST /session/new          - Create session");
    println!("  GET  /session/:id          - Get status");
    println!("  POST /session/:id/start    - Enter the show");
    println!("  POST /session/:id/frame    - Process a frame");
    println!("  POST /session/:id/finish   - Finish & pay");
    println!("  POST /session/:id/restart  - Back to entrance");
    println!("  GET  /session/:id/receipt  - Get receipt");
    println!("  WS   /ws/:id               - Live updates");
    println!("  GET  /health               - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
