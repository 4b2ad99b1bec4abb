//! HTTP routes bound to a [`LockService`].
//!
//! Session identities travel in three headers and are rebuilt into a
//! [`SessionToken`] per request. Authorization failures end the request with
//! `401` and are logged; they never reach the serving loop.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lockey_core::{LockError, LockService};
use lockey_proto::{
    ErrorBody, ErrorCode, LockRequest, LockStatus, OpenSessionRequest, Session, SessionClosed,
    SessionDescriptor, SessionToken,
};

/// Header carrying the session ID.
pub const SESSION_ID_HEADER: &str = "x-lockey-session-id";
/// Header carrying the client ID.
pub const CLIENT_ID_HEADER: &str = "x-lockey-client-id";
/// Header carrying the process ID.
pub const PROCESS_ID_HEADER: &str = "x-lockey-process-id";

/// Register every lock route on `router`, bound to `lock_service`.
pub fn setup_routing<L: LockService>(lock_service: Arc<L>, router: Router) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/sessions", post(open_session::<L>).delete(close_session::<L>))
        .route("/acquire", post(acquire::<L>))
        .route("/release", post(release::<L>))
        .route("/checkAcquire", post(check_acquire::<L>))
        .route("/checkRelease", post(check_release::<L>))
        .with_state(lock_service);

    router.merge(routes)
}

/// Rebuild the presented session from request headers.
pub fn session_from_headers(headers: &HeaderMap) -> SessionToken {
    let value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    SessionToken::from_parts(
        value(SESSION_ID_HEADER),
        value(CLIENT_ID_HEADER),
        value(PROCESS_ID_HEADER),
    )
}

/// A [`LockError`] rendered as an HTTP reply.
#[derive(Debug)]
pub struct ApiError(LockError);

impl From<LockError> for ApiError {
    fn from(err: LockError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            LockError::Unauthorized(err) => {
                tracing::warn!(reason = %err, "Rejected session");
                (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized)
            },
            LockError::AlreadyAcquired { .. } | LockError::NotAcquired { .. } => {
                (StatusCode::CONFLICT, ErrorCode::Conflict)
            },
            LockError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
        };

        // Keep the failing tier out of the reply.
        let message =
            if self.0.is_unauthorized() { "unauthorized".to_string() } else { self.0.to_string() };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn open_session<L: LockService>(
    State(service): State<Arc<L>>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionDescriptor>), ApiError> {
    let session = service.open_session(request.client_id, request.process_id).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn close_session<L: LockService>(
    State(service): State<Arc<L>>,
    headers: HeaderMap,
) -> Result<Json<SessionClosed>, ApiError> {
    let session = session_from_headers(&headers);
    let released = service.close_session(&session).await?;
    Ok(Json(SessionClosed { session_id: session.session_id().clone(), released }))
}

async fn acquire<L: LockService>(
    State(service): State<Arc<L>>,
    headers: HeaderMap,
    Json(request): Json<LockRequest>,
) -> Result<Json<LockStatus>, ApiError> {
    let session = session_from_headers(&headers);
    service.acquire(&session, &request.resource).await?;
    Ok(Json(LockStatus { resource: request.resource, held: true }))
}

async fn release<L: LockService>(
    State(service): State<Arc<L>>,
    headers: HeaderMap,
    Json(request): Json<LockRequest>,
) -> Result<Json<LockStatus>, ApiError> {
    let session = session_from_headers(&headers);
    service.release(&session, &request.resource).await?;
    Ok(Json(LockStatus { resource: request.resource, held: false }))
}

async fn check_acquire<L: LockService>(
    State(service): State<Arc<L>>,
    headers: HeaderMap,
    Json(request): Json<LockRequest>,
) -> Result<Json<LockStatus>, ApiError> {
    let session = session_from_headers(&headers);
    let held = service.check_acquired(&session, &request.resource).await?;
    Ok(Json(LockStatus { resource: request.resource, held }))
}

async fn check_release<L: LockService>(
    State(service): State<Arc<L>>,
    headers: HeaderMap,
    Json(request): Json<LockRequest>,
) -> Result<Json<LockStatus>, ApiError> {
    let session = session_from_headers(&headers);
    let released = service.check_released(&session, &request.resource).await?;
    Ok(Json(LockStatus { resource: request.resource, held: !released }))
}
