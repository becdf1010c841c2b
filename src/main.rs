use shuttle_runtime::{Error, SecretStore, Secrets};
use util::{load_config, parse_config};

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match secret_store.get("CONFIG") {
        Some(suffix) => load_config(&format!("Config{suffix}.toml")),
        None => parse_config(include_str!("../Config.toml")),
    }
    .and_then(|config| api::init_config(&config))
    .map_err(|e| Error::BuildPanic(e.to_string()))?;

    let access_token = secret_store.get("PRISMIC_ACCESS_TOKEN");
    let repository = api::build_repository(&config, access_token)
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    let router = api::serve(repository, config)
        .await
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    Ok(router.into())
}
