//! The HTTP shell around the renderer.  `router` wires the handlers
//! to their routes; `Server` owns a router and a port and runs them.
//! Nothing here is global, so tests drive the router directly.

use axum::extract::{ConnectInfo, Path, Query, Request, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{debug, error, info};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::errors::{RenderError, ServeError};
use crate::params::parse_tile;
use crate::planes::ComplexRect;
use crate::png;
use crate::renderer::render;

#[derive(Clone)]
struct AppState {
    config: Arc<ServerConfig>,
}

#[derive(Debug, Deserialize)]
struct ViewportQuery {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    width: Option<usize>,
    height: Option<usize>,
}

/// Build the application's routes around a configuration.
pub fn router(config: ServerConfig) -> Router {
    let static_dir = config.static_dir.clone();
    let state = AppState {
        config: Arc::new(config),
    };
    Router::new()
        .route("/mandelbrot/:z/:x/:y", get(handle_tile))
        .route("/mandelbrot", get(handle_viewport))
        .route("/livez", get(handle_livez))
        .route("/healthz", get(handle_healthz))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// A router bound to a port.
pub struct Server {
    addr: SocketAddr,
    router: Router,
}

impl Server {
    /// Listen on every interface at `port`, answering with `router`.
    pub fn new(port: u16, router: Router) -> Server {
        Server {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            router,
        }
    }

    /// Serve until the process is stopped.
    pub async fn run(self) -> Result<(), ServeError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| ServeError::Bind(self.addr.to_string(), e))?;
        info!("Server opened on port {}", self.addr.port());
        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(ServeError::Serve)
    }
}

fn header_or_dash(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

async fn log_request(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "-".to_string());
    info!(
        "{} - - \"{} {} {:?}\" \"{}\" \"{}\"",
        remote,
        request.method(),
        request.uri(),
        request.version(),
        header_or_dash(request.headers(), header::REFERER),
        header_or_dash(request.headers(), header::USER_AGENT),
    );
    next.run(request).await
}

async fn handle_tile(
    State(state): State<AppState>,
    Path((z, x, y)): Path<(String, String, String)>,
) -> Response {
    let tile = match parse_tile(&z, &x, &y) {
        Ok(tile) => tile,
        Err(e) => return (StatusCode::BAD_REQUEST, e.message()).into_response(),
    };
    debug!("tile {} {} {}", tile.zoom, tile.x, tile.y);
    let size = state.config.tile_size;
    render_png(&state, tile.to_rect(), size, size).await
}

async fn handle_viewport(
    State(state): State<AppState>,
    Query(query): Query<ViewportQuery>,
) -> Response {
    let width = query.width.unwrap_or(state.config.tile_size);
    let height = query.height.unwrap_or(state.config.tile_size);
    match width.checked_mul(height) {
        Some(pixels) if pixels <= state.config.max_pixels => (),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                format!(
                    "Image may not exceed {} pixels",
                    state.config.max_pixels
                ),
            )
                .into_response()
        }
    }
    let rect = ComplexRect::new(query.xmin, query.ymin, query.xmax, query.ymax);
    render_png(&state, rect, width, height).await
}

async fn render_png(state: &AppState, rect: ComplexRect, width: usize, height: usize) -> Response {
    let iterations = state.config.iterations;
    let threads = state.config.threads;
    let job = task::spawn_blocking(move || -> Result<Vec<u8>, RenderError> {
        let buffer = render(rect, width, height, iterations, threads)?;
        png::encode(&buffer)
    });
    match job.await {
        Ok(Ok(bytes)) => ([(header::CONTENT_TYPE, png::CONTENT_TYPE)], bytes).into_response(),
        Ok(Err(e)) => {
            if e.is_invalid_argument() {
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            } else {
                error!("{}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error generating image").into_response()
            }
        }
        Err(e) => {
            error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating image").into_response()
        }
    }
}

async fn handle_livez() -> &'static str {
    "ok"
}

// Nothing to depend on yet, so healthy whenever live.
async fn handle_healthz() -> &'static str {
    "ok"
}
