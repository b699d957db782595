use anyhow::Context;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use timetable_solver::config::Config;
use timetable_solver::server;
use timetable_solver::store::Catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config =
        Config::load_from(config_path.as_deref()).context("failed to load configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.log_filter),
    )
    .init();

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))?,
        None => {
            info!("No catalog_path configured; starting with an empty record store");
            Catalog::default()
        }
    };

    server::run_server(&config, Arc::new(catalog))
        .await
        .context("server terminated")?;

    Ok(())
}
