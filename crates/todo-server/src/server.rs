//! Server assembly: application state, router, and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::FromRef, http::Uri};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use todo_auth::{AuthService, AuthState, JwtService};
use todo_db_postgres::{PgPool, PgTodoStore, PgUserStore, create_pool, migrations};

use crate::cache::TodoCache;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::routes;
use crate::todos::TodoService;

/// Process-wide services, constructed once by the entry point and shared by
/// handle. Nothing here is global state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub todos: Arc<TodoService>,
    pub auth: AuthState,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Builds the full application router over the given state.
pub fn build_app(state: AppState) -> Router {
    routes::router()
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Not Found - {uri}"))
}

pub struct ServerBuilder {
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Connects the store and cache, runs migrations, and assembles the app.
    pub async fn build(self) -> anyhow::Result<TodoServer> {
        let cfg = self.config;

        let pool = create_pool(&cfg.storage).await?;
        if cfg.storage.run_migrations {
            migrations::run(&pool).await?;
        }

        let cache_backend = crate::create_cache_backend(&cfg.redis).await;
        let todo_cache = TodoCache::new(
            cache_backend,
            Duration::from_secs(cfg.cache.todo_ttl_secs),
        );

        let jwt = Arc::new(JwtService::new(&cfg.auth.secret, cfg.auth.token_ttl()));
        let auth_service = Arc::new(AuthService::new(
            Arc::new(PgUserStore::new(pool.clone())),
            jwt.clone(),
        ));
        let todos = Arc::new(TodoService::new(
            Arc::new(PgTodoStore::new(pool.clone())),
            todo_cache,
        ));

        let state = AppState {
            auth_service,
            todos,
            auth: AuthState::new(jwt),
        };

        Ok(TodoServer {
            addr: cfg.addr(),
            app: build_app(state),
            pool,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TodoServer {
    addr: SocketAddr,
    app: Router,
    pool: PgPool,
}

impl TodoServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // Drain the pool only after the listener stops accepting work.
        self.pool.close().await;
        tracing::info!("database pool closed");
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
