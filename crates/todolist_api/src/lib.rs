//! HTTP API for the todo list.
//!
//! # Responsibility
//! - Map REST verbs/paths onto `todolist_core` service operations.
//! - Serve the liveness endpoint and request logging.
//!
//! # Routes
//! - `GET    /api/todos`
//! - `GET    /api/todos/:id`
//! - `POST   /api/todos`
//! - `PUT    /api/todos/:id`
//! - `PATCH  /api/todos/:id/toggle`
//! - `DELETE /api/todos/:id`
//! - `GET    /health`

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, FileTodoService};

use axum::routing::{get, patch};
use axum::Router;
use log::info;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Fixed path prefix the client uses to reach the todo routes.
pub const API_PREFIX: &str = "/api";

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let todos = Router::new()
        .route(
            "/todos",
            get(handlers::todos::list_todos).post(handlers::todos::create_todo),
        )
        .route(
            "/todos/:id",
            get(handlers::todos::get_todo)
                .put(handlers::todos::update_todo)
                .delete(handlers::todos::delete_todo),
        )
        .route("/todos/:id/toggle", patch(handlers::todos::toggle_todo));

    Router::new()
        .nest(API_PREFIX, todos)
        .route("/health", get(handlers::health_check))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        "event=server_start module=api status=ok addr={} data_file={}",
        addr,
        state.service().repository().path().display()
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("event=server_stop module=api status=ok addr={addr}");
    Ok(())
}
