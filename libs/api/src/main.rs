use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use api::{build_repository, init_config, serve};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use util::{load_config, load_env};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = load_env()?;
    let access_token = secrets
        .get("PRISMIC_ACCESS_TOKEN")
        .and_then(|token| token.as_str())
        .map(ToString::to_string);
    let suffix = secrets
        .get("CONFIG")
        .and_then(|config| config.as_str())
        .unwrap_or_default();

    let config = init_config(&load_config(&format!("Config{suffix}.toml"))?)?;
    let port = config.server.port;
    let repository = build_repository(&config, access_token)?;

    let router = serve(repository, config).await?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(&address)
        .await
        .context("failed to bind listener")?;
    Ok(axum::serve(listener, router).await?)
}
