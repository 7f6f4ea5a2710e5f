//! axum router and server lifecycle.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{ErrorCode, TodoError};
use crate::procedures::ProcedureHandler;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct ApiServer {
    handler: ProcedureHandler,
}

impl ApiServer {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            handler: ProcedureHandler::new(db),
        }
    }

    pub fn handler(&self) -> &ProcedureHandler {
        &self.handler
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// HTTP status for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCode::ReferenceError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::NotFound | ErrorCode::UnknownProcedure => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        (status_for(self.code), Json(self)).into_response()
    }
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// API root - lists the callable procedures.
async fn api_root(State(state): State<ApiServer>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "procedures": "/api/todo/{procedure}",
        },
        "procedures": state.handler().get_procedures(),
    }))
}

/// Run one procedure. An empty body is the same as `{}`.
async fn call_procedure(
    State(state): State<ApiServer>,
    Path(procedure): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, TodoError> {
    let input = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            TodoError::validation("input", format!("Request body is not valid JSON: {}", e))
        })?
    };

    let now = chrono::Local::now().naive_local();
    match state.handler().call(&procedure, input, now) {
        Ok(output) => Ok(Json(output)),
        Err(e) => {
            if !e.is(ErrorCode::InternalError) {
                warn!(procedure = %procedure, code = ?e.code, "{}", e.message);
            }
            Err(e)
        }
    }
}

/// Build the router with all routes.
pub fn build_router(state: ApiServer, cors: bool) -> Router {
    let router = Router::new()
        .route("/api", get(api_root))
        .route("/api/health", get(health))
        .route("/api/todo/{procedure}", post(call_procedure))
        .layer(TraceLayer::new_for_http());

    let router = if cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

/// Start the HTTP server.
///
/// Returns a channel that triggers graceful shutdown and the bound address.
pub async fn start_server(
    db: Arc<Database>,
    host: &str,
    port: u16,
    cors: bool,
) -> anyhow::Result<(oneshot::Sender<()>, SocketAddr)> {
    let app = build_router(ApiServer::new(db), cors);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let bound_addr = listener.local_addr()?;

    info!("Todo server listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Todo server shutting down");
            })
            .await
        {
            tracing::error!("Todo server error: {}", e);
        }
    });

    Ok((shutdown_tx, bound_addr))
}
