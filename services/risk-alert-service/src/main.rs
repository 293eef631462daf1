mod app;
mod config;
mod handlers;
mod hazards;
mod models;

use risk_alert_common::{bind_listener, init_tracing, shutdown_signal};

use crate::config::{Config, SERVICE_NAME};

#[tokio::main]
async fn main() {
    let _guards = init_tracing(SERVICE_NAME);

    let config = Config::from_env();
    tracing::info!(
        port = config.port,
        upload_limit_bytes = config.upload_limit_bytes,
        "starting risk alert service"
    );

    let app = app::build_router(&config);
    let listener = bind_listener(config.port).await.expect("bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("serve");
}
