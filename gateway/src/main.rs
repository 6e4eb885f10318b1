use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::HeaderValue};
use dotenvy::dotenv;
use photofinder_core::{ensure_schema, repos::SeaStore, urls, AppCfg, AppState};
use sea_orm::{ConnectOptions, Database};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let cfg = AppCfg::from_env()?;

    let mut opts = ConnectOptions::new(cfg.database_url.clone());
    opts.sqlx_logging(false);
    let db = Database::connect(opts).await?;
    ensure_schema(&db).await?;

    // one pool for the whole process, handed to every handler through state
    let store = Arc::new(SeaStore::new(db));
    let state = AppState::from_cfg(store, &cfg);
    if cfg.enforce_ownership {
        info!("ownership checks enabled on delete routes");
    }

    let app = urls::router(state)
        .layer(DefaultBodyLimit::max(cfg.body_limit_bytes))
        .layer(TimeoutLayer::new(cfg.request_timeout))
        .layer(cors_layer(&cfg.cors_origin))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    info!("listening on http://{}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return base.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(v) => base.allow_origin(v),
        Err(_) => {
            warn!(origin, "CORS_ORIGIN is not a valid header value, allowing any origin");
            base.allow_origin(Any)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
