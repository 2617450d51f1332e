//! Packstation HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin packstation-server
//! ```
//!
//! Configuration comes from environment variables (all optional):
//! `HOST`, `PORT`, `BASE_URL`, `DATA_DIR`, `FRONT_DESK_PASS`, `STORE_PASS`,
//! `DRIVER_PASS`, `SESSION_TTL_HOURS`, `LOG_LEVEL`.
//!
//! # Example requests
//!
//! ```bash
//! # Reserve a drop-off slot
//! curl -X POST http://localhost:3000/api/reservations \
//!   -H "Content-Type: application/json" \
//!   -d '{"itemDescription": "box", "customerName": "Ada"}'
//!
//! # Log in as front desk, then check the package in
//! curl -c jar -X POST http://localhost:3000/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"role": "frontdesk", "password": "frontdesk"}'
//! curl -b jar -X POST http://localhost:3000/api/reservations/R3F9KQZ/assign-tracking \
//!   -H "Content-Type: application/json" -d '{"storageLocation": "A-3"}'
//! ```

use packstation_core::environment::{RandomIdGenerator, SystemClock};
use packstation_store::JsonFileStore;
use packstation_web::{AppState, Config, LocalBlobStore, SvgLabelRenderer, router};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = JsonFileStore::load(config.db_path());
    let blobs = LocalBlobStore::new(config.uploads_dir());

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(
        Box::new(store),
        config,
        Arc::new(SystemClock),
        Arc::new(RandomIdGenerator),
        Arc::new(blobs),
        Arc::new(SvgLabelRenderer),
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "packstation server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
