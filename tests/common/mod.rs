#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use minihub::config::{parse_base_url, HubConfig};
use minihub::db::sqlite_url_for;
use tokio::net::TcpListener;

#[derive(Clone)]
struct Fixtures {
    routes: Arc<HashMap<String, (StatusCode, String)>>,
    hits: Arc<AtomicUsize>,
}

async fn serve_fixture(State(fixtures): State<Fixtures>, uri: Uri) -> impl IntoResponse {
    fixtures.hits.fetch_add(1, Ordering::SeqCst);
    let (status, body) = fixtures
        .routes
        .get(uri.path())
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, "not found".to_string()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Static fixture server: one canned (status, body) per path, 404 otherwise.
pub struct StubServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl StubServer {
    pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
        let routes = routes
            .iter()
            .map(|(path, status, body)| {
                let status = StatusCode::from_u16(*status).expect("valid status code");
                (path.to_string(), (status, body.to_string()))
            })
            .collect();
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .fallback(serve_fixture)
            .with_state(Fixtures { routes: Arc::new(routes), hits: hits.clone() });

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve fixtures") });

        Self { addr, hits }
    }

    pub fn hits(&self) -> usize { self.hits.load(Ordering::SeqCst) }

    pub fn base_url(&self) -> String { format!("http://{}", self.addr) }
}

/// An address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn config_for(base_url: &str, db_dir: &Path) -> HubConfig {
    HubConfig {
        base_url: parse_base_url(base_url).unwrap(),
        database_url: Some(sqlite_url_for(&db_dir.join("minihub.db"))),
        request_timeout: Some(Duration::from_secs(5)),
        run_migrations: true,
    }
}
