use crate::core::link_fix::LinkFixService;
use crate::core::{FixRequest, FixResponse, Relay};
use crate::domain::model::{ServerErrorBody, ServiceInfo, ValidationErrorBody, USAGE_HINT};
use crate::utils::error::{LinkFixError, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const SERVER_ERROR_MESSAGE: &str = "Failed to process links";

pub fn router<R: Relay + 'static>(service: Arc<LinkFixService<R>>) -> Router {
    Router::new()
        .route("/", get(service_info::<R>))
        .route("/linkfix", post(linkfix::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn service_info<R: Relay + 'static>(
    State(service): State<Arc<LinkFixService<R>>>,
) -> Response {
    Json(ServiceInfo::new(service.rules())).into_response()
}

async fn linkfix<R: Relay + 'static>(
    State(service): State<Arc<LinkFixService<R>>>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<FixResponse>, LinkFixError> {
    let request = parse_fix_request(&headers, &body)?;
    let response = service.process(&request).await?;
    Ok(Json(response))
}

/// 非 JSON 或空的 body 視同 `{}`，交給後續驗證回 400；
/// JSON 語法錯誤是 400，欄位型別錯誤是 500
pub fn parse_fix_request(headers: &HeaderMap, body: &[u8]) -> Result<FixRequest> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        tracing::debug!("Request body is not JSON, treating it as empty");
        return Ok(FixRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        if e.is_data() {
            LinkFixError::SerializationError(e)
        } else {
            LinkFixError::validation(format!("Invalid JSON body: {}", e))
        }
    })
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

impl IntoResponse for LinkFixError {
    fn into_response(self) -> Response {
        match self {
            LinkFixError::ValidationError { message } => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorBody {
                    error: message,
                    usage: USAGE_HINT.to_string(),
                }),
            )
                .into_response(),
            other => {
                // 細節只寫進 log，不回傳給呼叫端
                tracing::error!(
                    "❌ Failed to process links: {} (Category: {:?})",
                    other,
                    other.category()
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ServerErrorBody {
                        error: SERVER_ERROR_MESSAGE.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

pub async fn serve(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 LinkFix server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
