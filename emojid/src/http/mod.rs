use crate::{plugin::EmojiPlugin, signal::Shutdown};
use axum::Router;
use emoji_config::server;
use http::StatusCode;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub mod chain;
pub mod custom_emoji;

pub fn create_router(plugin: &EmojiPlugin, server_config: &server::Configuration) -> Router {
    let handler = plugin.handler();
    let mount_path = server_config.mount_path.trim_end_matches('/');

    let router = if mount_path.is_empty() {
        Router::new().fallback_service(handler)
    } else {
        Router::new().nest_service(mount_path, handler)
    };

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server_config.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
}

#[instrument(skip_all, fields(port = %server_config.port))]
pub async fn run(
    plugin: &EmojiPlugin,
    server_config: &server::Configuration,
    shutdown: Shutdown,
) -> eyre::Result<()> {
    let router = create_router(plugin, server_config);
    let listener = TcpListener::bind(("0.0.0.0", server_config.port)).await?;

    info!(mount_path = %server_config.mount_path, "serving emoji");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.wait())
        .await?;

    Ok(())
}
