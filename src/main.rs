pub mod api;
pub mod client;
pub mod directory;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::placeholder::DEFAULT_USERS_ENDPOINT;

const BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    api::server::start_server(BIND_ADDR, DEFAULT_USERS_ENDPOINT).await;
}
