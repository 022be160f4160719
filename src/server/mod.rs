//! Registration/login backend that the endpoint prober talks to.
//!
//! Routes are mounted under the configured API prefix (`/api` by default), so a
//! client base URL such as `http://10.0.2.2:3001/api` reaches:
//!
//! - `GET {prefix}/health`: liveness, `{status, timestamp, uptime}`
//! - `POST {prefix}/register`: create an account, 201 or 409 on duplicate email
//! - `POST {prefix}/login`: check credentials, 200 or 401
//!
//! `GET /` lists the endpoints; anything else is a JSON 404.
//!
//! Users live in an in-memory store behind the `UserStore` port. Passwords are
//! hashed with bcrypt and never leave the server.
use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod error;
pub mod routes;
pub mod state;

use crate::config::toml_config::ServerSettings;
use crate::utils::error::Result;
use routes::{health_handler, login_handler, not_found_handler, register_handler, root_handler};
pub use state::State;

pub fn build_router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/health", get(health_handler))
        .route("/register", post(register_handler))
        .route("/login", post(login_handler));

    let prefix = state.settings.api_prefix.as_str();
    let app = Router::new().route("/", get(root_handler));
    let app = if prefix.is_empty() {
        app.merge(api)
    } else {
        app.nest(prefix, api)
    };

    app.fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// 綁定設定的位址並執行到收到關閉訊號為止
pub async fn start_server(state: Arc<State>) -> Result<()> {
    let listener = bind_listener(&state.settings).await?;
    serve(listener, state).await
}

/// 以 (host, port) 綁定，IPv6 位址如 `::` 不需加中括號
pub async fn bind_listener(settings: &ServerSettings) -> Result<TcpListener> {
    info!("Binding to {} port {}", settings.bind_address, settings.port);
    let listener = TcpListener::bind((settings.bind_address.as_str(), settings.port)).await?;
    Ok(listener)
}

pub async fn serve(listener: TcpListener, state: Arc<State>) -> Result<()> {
    let address = listener.local_addr()?;
    let prefix = state.settings.api_prefix.clone();
    let app = build_router(state);

    info!("🌐 Server running on http://{address}");
    info!("💚 Health check: http://{address}{prefix}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
