//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared application state from config and database
//! - Create the Axum router: health, sitemap, admin API, page fallback
//! - Wire up middleware (request ID, tracing, timeout, body limit, headers)
//! - Apply hot-reloaded site settings
//! - Serve until the shutdown signal fires

use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::ai::{AiError, ContentGenerator, HttpContentGenerator};
use crate::config::{AdminConfig, ServerConfig, SiteConfig};
use crate::http::frontend::{frontend_handler, health_handler, sitemap_handler};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::redirects::RedirectTable;
use crate::routing::RouteResolver;
use crate::security;
use crate::store::{Database, PageStore};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pages: PageStore,
    pub resolver: Arc<RouteResolver>,
    pub redirects: Arc<RedirectTable>,
    /// Site settings; swapped whole on config reload.
    pub site: Arc<ArcSwap<SiteConfig>>,
    pub admin: Arc<AdminConfig>,
    pub generator: Arc<dyn ContentGenerator>,
    pub bulk_delay: Duration,
}

impl AppState {
    pub fn new(config: &ServerConfig, db: &Database) -> Result<Self, AiError> {
        let pages = db.pages();
        Ok(Self {
            resolver: Arc::new(RouteResolver::new(pages.clone())),
            redirects: Arc::new(RedirectTable::new(
                db.redirects(),
                Duration::from_secs(config.redirects.cache_ttl_secs),
            )),
            pages,
            site: Arc::new(ArcSwap::from_pointee(config.site.clone())),
            admin: Arc::new(config.admin.clone()),
            generator: Arc::new(HttpContentGenerator::new(config.ai.clone())?),
            bulk_delay: Duration::from_millis(config.ai.bulk_delay_ms),
        })
    }

    /// Replace the content generator.
    pub fn with_generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.generator = generator;
        self
    }
}

/// HTTP server for the LocalSEO front and admin API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ServerConfig, state: AppState) -> Self {
        let router = Self::build_router(config, state.clone());
        Self { router, state }
    }

    /// The assembled router, for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/localseo-sitemap.xml", get(sitemap_handler));

        if config.admin.enabled {
            router = router.merge(admin::router(state.clone()));
        } else {
            tracing::info!("Admin API disabled");
        }

        let router = router
            .fallback(frontend_handler)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            );

        if config.security.enable_headers {
            security::headers::apply(router)
        } else {
            router
        }
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Site settings arriving on `config_updates` replace the live ones;
    /// other sections take effect on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let site = Arc::clone(&self.state.site);
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if **site.load() != config.site {
                    site.store(Arc::new(config.site));
                    tracing::info!("Site settings updated");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
