//! # Scheduler Server
//!
//! HTTP front end for [`scheduler_core`]: a JSON API under `/api` plus static
//! files for the web client.
//!
//! - [`handlers`]: Request decoding and response shaping for each endpoint
//! - [`auth`]: Shared-secret sign-in and the token check for task routes
//! - [`config`]: Layered configuration (defaults, `config.toml`, `TODO_*`)
//! - [`error`]: Mapping of failures to status codes and `{"error"}` bodies

use std::path::Path;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use mockable::{Clock, DefaultClock};
use scheduler_core::{
    db, error::CoreError, repository::SqliteRepository, service::TaskService,
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

use config::Config;

/// Clock shared by the service; [`DefaultClock`] outside of tests.
pub type SharedClock = dyn Clock + Send + Sync;

pub type Service = TaskService<SqliteRepository, SharedClock>;

#[derive(Clone)]
pub struct AppState {
    pub service: Service,
    /// Configured password; empty when sign-in is disabled.
    pub password: String,
}

impl AppState {
    pub fn new(service: Service, password: Option<&str>) -> Self {
        Self {
            service,
            password: password.unwrap_or_default().to_string(),
        }
    }

    /// Opens the configured database and wires the service over it.
    pub async fn from_config(config: &Config) -> Result<Self, CoreError> {
        let pool = db::establish_connection(&config.dbfile).await?;
        let clock: Arc<SharedClock> = Arc::new(DefaultClock);
        let service = TaskService::new(Arc::new(SqliteRepository::new(pool)), clock);
        Ok(Self::new(service, config.secret()))
    }

    /// The secret task routes are guarded by, if any.
    pub fn secret(&self) -> Option<&str> {
        Some(self.password.as_str()).filter(|p| !p.is_empty())
    }
}

pub fn app(state: AppState, web_dir: &Path) -> Router {
    let tasks = Router::new()
        .route(
            "/api/task",
            get(handlers::get_task)
                .post(handlers::create_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/task/done", post(handlers::complete_task))
        .route("/api/tasks", get(handlers::list_tasks))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/api/nextdate", get(handlers::next_date))
        .route("/api/signin", post(handlers::sign_in))
        .merge(tasks)
        .fallback_service(ServeDir::new(web_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(
    listener: TcpListener,
    state: AppState,
    web_dir: &Path,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state, web_dir)).await
}
