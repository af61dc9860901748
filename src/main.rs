#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    api::client::ApiClient, config::RuntimeConfiguration, routes::router,
    session_store::MemorySessionStore, state::RollbookState,
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod api;
mod config;
mod data;
mod error;
mod handoff;
mod maud_conveniences;
mod routes;
mod session_store;
mod state;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() {
    let dotenv_result = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv_result {
        warn!(?e, "no .env loaded, using the process environment only");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let api_config = config.api_config();
    info!(base_url = %api_config.base_url, "using student api");

    let state = RollbookState::new(Arc::new(ApiClient::new(api_config)));

    let session_store = MemorySessionStore::default();
    tokio::spawn(
        session_store
            .clone()
            .sweep_expired_every(Duration::from_secs(60)),
    );

    let server_config = config.server_config();
    let app = router(state, session_store, server_config.secure_cookies);

    let listener = TcpListener::bind(&server_config.server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(server_ip = ?server_config.server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}
