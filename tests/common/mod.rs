//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use localseo_router::ai::{AiError, ContentGenerator, GeneratedContent, PageSubject};
use localseo_router::config::ServerConfig;
use localseo_router::store::{Database, NewLocalPage};
use localseo_router::{AppState, HttpServer};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

pub const ADMIN_KEY: &str = "test-admin-key";

/// Config with the test admin key and no pause between bulk rows.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.admin.api_key = ADMIN_KEY.to_string();
    config.site.base_url = "https://example.dk".to_string();
    config.site.business_phone = "+45 12 34 56 78".to_string();
    config.ai.bulk_delay_ms = 0;
    config
}

pub struct TestApp {
    pub router: Router,
    pub db: Database,
    pub state: AppState,
}

impl TestApp {
    pub async fn new(config: ServerConfig) -> Self {
        let db = Database::in_memory().await.unwrap();
        let state = AppState::new(&config, &db).unwrap();
        Self::assemble(config, db, state)
    }

    pub async fn with_generator(config: ServerConfig, generator: Arc<dyn ContentGenerator>) -> Self {
        let db = Database::in_memory().await.unwrap();
        let state = AppState::new(&config, &db).unwrap().with_generator(generator);
        Self::assemble(config, db, state)
    }

    fn assemble(config: ServerConfig, db: Database, state: AppState) -> Self {
        let router = HttpServer::new(&config, state.clone()).router();
        Self { router, db, state }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Authenticated admin request with an optional JSON body.
    pub async fn admin(&self, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_KEY));
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn seed_page(&self, service: &str, city: &str) -> i64 {
        self.db
            .pages()
            .insert(NewLocalPage::new(service, city))
            .await
            .unwrap()
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Generator that answers from the subject, failing for one city.
pub struct EchoGenerator {
    pub fail_city: Option<String>,
}

#[async_trait]
impl ContentGenerator for EchoGenerator {
    async fn generate(&self, subject: &PageSubject) -> Result<GeneratedContent, AiError> {
        if self.fail_city.as_deref() == Some(subject.city.as_str()) {
            return Err(AiError::Provider("quota exceeded".into()));
        }
        Ok(GeneratedContent {
            intro: format!("Lokal {} i {}.", subject.service, subject.city),
            meta_title: format!("{} {}", subject.service, subject.city),
            meta_description: format!("{} i {}", subject.service, subject.city),
        })
    }
}

/// Read one HTTP/1.1 request (headers plus Content-Length body).
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the raw request text and returns status plus JSON body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Serve the full app on an ephemeral port. Returns the base URL.
pub async fn spawn_server(config: ServerConfig) -> (String, Database) {
    let db = Database::in_memory().await.unwrap();
    let state = AppState::new(&config, &db).unwrap();
    let router = HttpServer::new(&config, state).router();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), db)
}
