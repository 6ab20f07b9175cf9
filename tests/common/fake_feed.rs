//! Fake Talos feed server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1 and serves `GET /documents/ip-blacklist` with a configurable
//! status and body. `start_tls` serves the same routes over HTTPS with the
//! leaf certificate in `tests/fixtures/tls`, issued by `ca.pem` there.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// State shared between the router and test code.
struct FeedState {
    status: u16,
    body: String,
    delay: Option<Duration>,
    hits: usize,
    last_query: Option<String>,
}

/// Handle to the running fake feed server.
pub struct FakeFeed {
    addr: SocketAddr,
    scheme: &'static str,
    state: Arc<Mutex<FeedState>>,
}

/// Path of a file under `tests/fixtures/tls`.
pub fn tls_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/tls")
        .join(name)
}

fn feed_state(status: u16, body: &str) -> Arc<Mutex<FeedState>> {
    Arc::new(Mutex::new(FeedState {
        status,
        body: body.to_string(),
        delay: None,
        hits: 0,
        last_query: None,
    }))
}

fn feed_router(state: Arc<Mutex<FeedState>>) -> Router {
    Router::new()
        .route("/documents/ip-blacklist", get(ip_blacklist))
        .with_state(state)
}

impl FakeFeed {
    /// Start the server answering 200 with `body`.
    pub async fn start(body: &str) -> std::io::Result<Self> {
        Self::start_with_status(200, body).await
    }

    /// Start the server answering `status` with `body`.
    pub async fn start_with_status(status: u16, body: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = feed_state(status, body);
        let app = feed_router(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            addr,
            scheme: "http",
            state,
        })
    }

    /// Start an HTTPS server answering 200 with `body`.
    pub async fn start_tls(body: &str) -> std::io::Result<Self> {
        // reqwest and axum-server both pull in rustls; pin one provider.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let tls = RustlsConfig::from_pem_file(tls_fixture("server.pem"), tls_fixture("server.key"))
            .await?;
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        let state = feed_state(200, body);
        let app = feed_router(state.clone());

        tokio::spawn(async move {
            axum_server::from_tcp_rustls(listener, tls)
                .serve(app.into_make_service())
                .await
                .unwrap();
        });

        Ok(Self {
            addr,
            scheme: "https",
            state,
        })
    }

    /// Base URL for the feed (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.addr)
    }

    /// Hold every response for `delay` before answering.
    pub async fn set_delay(&self, delay: Duration) {
        self.state.lock().await.delay = Some(delay);
    }

    /// Number of requests served so far.
    pub async fn hits(&self) -> usize {
        self.state.lock().await.hits
    }

    /// Raw query string of the last request.
    pub async fn last_query(&self) -> Option<String> {
        self.state.lock().await.last_query.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn ip_blacklist(
    State(state): State<Arc<Mutex<FeedState>>>,
    uri: axum::http::Uri,
) -> impl IntoResponse {
    let (status, body, delay) = {
        let mut state = state.lock().await;
        state.hits += 1;
        state.last_query = uri.query().map(str::to_string);
        (state.status, state.body.clone(), state.delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, body)
}
