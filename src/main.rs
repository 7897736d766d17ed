use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use epicase::api::{api_router, ApiContext};
use epicase::{config, db};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} registry starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::registry_db_path();
    if let Some(parent) = db_path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            tracing::error!(path = %parent.display(), %err, "cannot create data directory");
            std::process::exit(1);
        }
    }

    let conn = match db::open_database(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            tracing::error!(path = %db_path.display(), %err, "cannot open registry database");
            std::process::exit(1);
        }
    };

    let app = api_router(ApiContext::new(conn));
    let addr = SocketAddr::from(([0, 0, 0, 0], config::server_port()));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, %err, "cannot bind listen address");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, db = %db_path.display(), "registry listening");
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(%err, "server exited with error");
        std::process::exit(1);
    }
}
