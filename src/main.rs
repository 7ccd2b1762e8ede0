// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // If configuration is broken the process should not come up at all.
    let app_state = AppState::new()
        .await
        .expect("Failed to initialize application state.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Failed to run database migrations.");
    tracing::info!("Database migrations applied");

    // Public routes
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Everything below requires a valid bearer token.
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let stock_routes = Router::new()
        .route("/", get(handlers::stock::list_stock))
        .route("/summary", get(handlers::stock::stock_summary))
        .route("/receive", post(handlers::stock::receive_stock))
        .route("/issue", post(handlers::stock::issue_stock))
        .route("/export", get(handlers::stock::export_stock))
        .route("/ledger", get(handlers::stock::list_ledger))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/stock", stock_routes)
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    tracing::info!("Server listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Server error");
}
