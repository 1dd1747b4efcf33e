//! HTTP server setup and request forwarding.
//!
//! # Responsibilities
//! - Create the Axum router (liveness endpoint + catch-all proxy handler)
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Extract the bearer token and run it through the core validator
//! - Ask the core for a dispatch decision and act on it
//! - Forward permitted requests verbatim and relay the response
//!
//! # Design Decisions
//! - The core decides, this layer executes: 401/403/404 map directly from
//!   `RejectReason`, and Unauthorized stays distinct from Forbidden
//! - An invalid bearer token demotes the caller to anonymous; public routes
//!   still work, gated routes reject with 401
//! - Request body is streamed through untouched; no buffering, no retries

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::Scheme, HeaderName, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::Utc;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::dispatch::{Dispatch, RejectReason};
use crate::gateway::{GatewayCore, RequestDescriptor};

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// UUID v4 request IDs, attached as early as possible for tracing.
#[derive(Clone, Copy, Default)]
struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(value))
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub core: Arc<GatewayCore>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server hosting the gateway core.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around an already-built core.
    pub fn new(config: &GatewayConfig, core: Arc<GatewayCore>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState { core, client };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(healthz))
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(
                        X_REQUEST_ID.clone(),
                        MakeRequestUuidV4,
                    ))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness endpoint owned by the host, not the core.
async fn healthz() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Main gateway handler: authenticate, dispatch, forward.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Authentication and authorization are the core's decision; invalid
    // tokens leave the caller anonymous, gated routes then reject 401.
    let descriptor = RequestDescriptor {
        method: method.clone(),
        path: path.clone(),
        bearer_token: bearer_token(&request),
    };

    let forward = match state.core.handle(&descriptor) {
        Dispatch::Forward(forward) => forward,
        Dispatch::Reject(reason) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                reason = ?reason,
                "request rejected"
            );
            return reject_response(reason);
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %forward.route_id,
        cluster = %forward.cluster_id,
        "forwarding request"
    );

    let (mut parts, body) = request.into_parts();
    parts.uri = match rewrite_uri(&parts.uri, &forward.destination) {
        Some(uri) => uri,
        None => {
            tracing::error!(
                request_id = %request_id,
                destination = %forward.destination,
                "failed to build upstream URI"
            );
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };
    // The client derives Host from the rewritten authority.
    parts.headers.remove(header::HOST);

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                route = %forward.route_id,
                error = %e,
                "upstream error"
            );
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Extract the raw token from an `Authorization: Bearer ...` header.
fn bearer_token(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn reject_response(reason: RejectReason) -> Response {
    match reason {
        RejectReason::NotFound => {
            (StatusCode::NOT_FOUND, "No matching route found").into_response()
        }
        RejectReason::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
        RejectReason::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
    }
}

/// Rewrite the request URI onto the destination base address. The original
/// path and query are preserved; a destination base path is prefixed.
fn rewrite_uri(original: &Uri, destination: &Url) -> Option<Uri> {
    let scheme = if destination.scheme() == "https" {
        Scheme::HTTPS
    } else {
        Scheme::HTTP
    };

    let mut authority = destination.host_str()?.to_string();
    if let Some(port) = destination.port() {
        authority.push_str(&format!(":{port}"));
    }

    let base = destination.path().trim_end_matches('/');
    let path_and_query = match original.path_and_query() {
        Some(pq) => format!("{base}{pq}"),
        None => format!("{base}/"),
    };

    Uri::builder()
        .scheme(scheme)
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_uri_replaces_authority_and_keeps_path() {
        let original: Uri = "http://gateway.local/api/users/42?full=true".parse().unwrap();
        let destination = Url::parse("http://localhost:9001").unwrap();
        let rewritten = rewrite_uri(&original, &destination).unwrap();
        assert_eq!(rewritten.to_string(), "http://localhost:9001/api/users/42?full=true");
    }

    #[test]
    fn rewrite_uri_prefixes_destination_base_path() {
        let original: Uri = "/api/auth/login".parse().unwrap();
        let destination = Url::parse("https://lambda.aws.example.com/prod").unwrap();
        let rewritten = rewrite_uri(&original, &destination).unwrap();
        assert_eq!(
            rewritten.to_string(),
            "https://lambda.aws.example.com/prod/api/auth/login"
        );
    }

    #[test]
    fn bearer_extraction_requires_bearer_scheme() {
        let request = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request).as_deref(), Some("abc.def.ghi"));

        let request = Request::builder()
            .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), None);

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(bearer_token(&request), None);
    }
}
