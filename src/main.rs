use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, job::JobList, pipeline::build_all};

//

mod config;
mod job;
mod pipeline;
mod scratch;
mod toolchain;

#[cfg(all(test, unix))]
mod test_support;

//

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    tracing::debug!("{config:?}");

    let jobs = JobList::defaults()?.resolve(&config.root)?;

    let report = build_all(&config.toolchain, &config.options, &jobs)?;
    tracing::info!("built {} shader libraries", report.built);

    Ok(())
}
