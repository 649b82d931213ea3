//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all gate handler
//! - Wire up middleware (timeout, tracing, request ID)
//! - Extract what the dispatcher needs (method, URL, cookie, POST body)
//! - Turn a GateOutcome into a real response: 302 or proxied pass-through
//! - Serve with graceful shutdown

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::loader::ConfigError;
use crate::config::schema::GateConfig;
use crate::gate::dispatcher::{Decision, Dispatcher};
use crate::http::forward::Forwarder;

/// Largest request body the gate will buffer.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub forwarder: Forwarder,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: Arc<GateConfig>) -> Result<Self, ConfigError> {
        let dispatcher = Arc::new(Dispatcher::new(config.clone())?);
        let forwarder = Forwarder::new(&config.backend.address)?;

        let state = AppState {
            dispatcher,
            forwarder,
        };
        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GateConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gate_handler))
            .route("/", any(gate_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main gate handler: dispatch, then redirect or forward.
async fn gate_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let body: Bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "failed to buffer request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let cookie_header = parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let post_data = (parts.method == Method::POST).then_some(body.as_ref());

    let url = parts.uri.to_string();
    let outcome = state
        .dispatcher
        .dispatch(&parts.method, &url, cookie_header.as_deref(), post_data)
        .await;

    match outcome.decision {
        Decision::Redirect(location) => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::FOUND;
            response.headers_mut().extend(outcome.headers);
            match header::HeaderValue::from_str(&location) {
                Ok(value) => {
                    response.headers_mut().insert(header::LOCATION, value);
                    response
                }
                Err(_) => {
                    // Redirect targets come from validated config.
                    tracing::error!(location = %location, "redirect target failed header encoding");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Bad redirect target").into_response()
                }
            }
        }
        Decision::Forward => state.forwarder.forward(parts, body, outcome.headers).await,
    }
}
