//! Create (or recreate) the product catalogue schema.
//!
//! Settings come from `DATABASE_*` environment variables, configuration files
//! and `--uri`/`--max-connections` flags. Set `DB_CREATE_RECREATE=1` to drop
//! the tables and build them again from the embedded migrations. Log output
//! is JSON, filtered by `RUST_LOG`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;

use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use product_catalogue::config::DatabaseSettings;
use product_catalogue::outbound::persistence::{init_db, recreate_schema};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const RECREATE_ENV: &str = "DB_CREATE_RECREATE";

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = DatabaseSettings::load_from_iter(env::args_os())
        .wrap_err("failed to load database settings")?;

    if recreate_requested() {
        let applied = recreate_schema(settings.uri()).wrap_err("failed to recreate schema")?;
        info!(applied, "database schema recreated");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build runtime")?;
    runtime.block_on(async {
        let pool = init_db(&settings)
            .await
            .wrap_err("failed to initialise database")?;
        drop(pool);
        info!("database ready");
        Ok(())
    })
}

fn recreate_requested() -> bool {
    env::var(RECREATE_ENV).is_ok_and(|value| value == "1")
}
