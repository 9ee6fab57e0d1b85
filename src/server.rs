//! HTTP entry point.
//!
//! Every `GET` is treated as `/<container>/<variant>`:
//!
//! | Outcome | Status | Body |
//! |---|---|---|
//! | container or variant missing | 400 | required-parameters message |
//! | resolved | 200 | variant bytes, `image/webp`, long-lived `Cache-Control` |
//! | anything else | 500 | container, variant and dimensions |
//!
//! Genuine absence is reported as 500 like every other failure.
//!
//! ## Write-back
//!
//! A newly derived variant is stored under its requested name by a detached
//! task spawned before the handler returns and never awaited by it. The
//! write may start before the response is flushed. A failed write is logged and
//! otherwise ignored; the next request for that name simply derives it
//! again. Pending writes are tracked so shutdown can let them finish.

use crate::config::ServerConfig;
use crate::imaging::{ImageBackend, Limits, OUTPUT_CONTENT_TYPE, RustBackend};
use crate::naming::{RequestTarget, parse_request_path};
use crate::resolve::{VariantError, resolve};
use crate::storage::{FsStore, ObjectStore};
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bytes::Bytes;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Roughly 30.44 days.
pub const CACHE_CONTROL: &str = "public, max-age=2629440";

/// Shared per-process state handed to every request.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ObjectStore>,
    backend: Arc<dyn ImageBackend>,
    limits: Limits,
    write_backs: TaskTracker,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>, backend: Arc<dyn ImageBackend>, limits: Limits) -> Self {
        Self {
            store,
            backend,
            limits,
            write_backs: TaskTracker::new(),
        }
    }

    /// Filesystem store and the `image` backend, as configured.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            Arc::new(FsStore::new(&config.storage.root)),
            Arc::new(RustBackend::new()),
            config.limits(),
        )
    }

    /// Wait until every write-back spawned so far has finished.
    pub async fn wait_for_write_backs(&self) {
        self.write_backs.close();
        self.write_backs.wait().await;
        self.write_backs.reopen();
    }
}

/// Build the router serving variants for every path.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_variant))
        .route("/{*path}", get(serve_variant))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn or_null(value: Option<u32>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

fn not_available(target: &RequestTarget) -> String {
    format!(
        "Image not available: {}, file: {}, width: {}, height: {}",
        target.container,
        target.variant,
        or_null(target.dimensions.width),
        or_null(target.dimensions.height),
    )
}

async fn serve_variant(State(state): State<AppState>, uri: Uri) -> Response {
    let raw = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let target = parse_request_path(raw);
    info!(
        container = %target.container,
        variant = %target.variant,
        width = ?target.dimensions.width,
        height = ?target.dimensions.height,
        "request received"
    );

    match resolve(state.store.as_ref(), &state.backend, &target, state.limits).await {
        Ok(resolved) => {
            if resolved.is_new {
                state.write_backs.spawn(write_back(
                    Arc::clone(&state.store),
                    target.container.clone(),
                    target.variant.clone(),
                    resolved.bytes.clone(),
                ));
            }
            (
                [
                    (header::CACHE_CONTROL, CACHE_CONTROL),
                    (header::CONTENT_TYPE, OUTPUT_CONTENT_TYPE),
                ],
                resolved.bytes,
            )
                .into_response()
        }
        Err(e @ VariantError::InvalidRequest) => {
            warn!(container = %target.container, variant = %target.variant, "{e}");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            error!(
                container = %target.container,
                variant = %target.variant,
                width = ?target.dimensions.width,
                height = ?target.dimensions.height,
                error = %e,
                "image not available"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, not_available(&target)).into_response()
        }
    }
}

/// Persist a derived variant. Failures only reach the log.
async fn write_back(store: Arc<dyn ObjectStore>, container: String, variant: String, bytes: Bytes) {
    let len = bytes.len();
    match store
        .write(&container, &variant, bytes, OUTPUT_CONTENT_TYPE)
        .await
    {
        Ok(()) => info!(container = %container, variant = %variant, bytes = len, "variant saved"),
        Err(e) => error!(container = %container, variant = %variant, error = %e, "write-back failed"),
    }
}

/// Bind, serve until Ctrl-C, then let pending write-backs finish.
pub async fn run(config: &ServerConfig) -> std::io::Result<()> {
    let state = AppState::from_config(config);
    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    info!(
        addr = %listener.local_addr()?,
        storage = %config.storage.root.display(),
        "listening"
    );

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("draining pending write-backs");
    state.wait_for_write_backs().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
