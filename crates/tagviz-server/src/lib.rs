//! Web application charting an artist's most used tags.
//!
//! ```ignore
//! let config = TagvizConfig::load(Path::new("/app/tagviz.toml"))?;
//! tagviz_server::logging::init(&config)?;
//! tagviz_server::serve(config).await?;
//! ```

pub mod error;
pub mod logging;
pub mod page;
pub mod routes;
pub mod state;
pub mod svg;

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tagviz_core::TagvizConfig;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::ServerError;
pub use page::{PageTemplate, PageView};
pub use state::AppState;

/// Build the application router.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(routes::index).post(routes::search))
        .route("/_autocomplete", get(routes::autocomplete))
        .route("/_tags", get(routes::tags))
        .route("/health", get(routes::health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load state, bind, and serve until SIGINT or SIGTERM.
pub async fn serve(config: TagvizConfig) -> Result<(), ServerError> {
    let state = AppState::load(&config)?;
    let app = router(state, &config.static_dir());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            source: e,
        })?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
