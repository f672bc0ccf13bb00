//! care-concierge server binary.
//!
//! Loads configuration from the environment, wires the dispatcher, and
//! serves the OpenAI-compatible chat endpoint.

use std::sync::Arc;

use tracing::info;

use care_concierge::adapters::http::{concierge_router, ConciergeAppState};
use care_concierge::adapters::store::InMemorySessionStore;
use care_concierge::bootstrap::{build_dispatcher, init_tracing};
use care_concierge::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server.log_level);

    let dispatcher = Arc::new(build_dispatcher(&config));
    let state = ConciergeAppState::new(dispatcher, Arc::new(InMemorySessionStore::new()));
    let router = concierge_router(state);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router).await?;
    Ok(())
}
