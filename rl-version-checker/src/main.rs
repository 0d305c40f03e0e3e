mod error;
mod args;
mod api;
mod cache;
mod check;

use clap::Parser as _;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use crate::args::CheckerArgs;
use crate::error::CheckerError;
use crate::check::VersionChecker;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("RL_VERSION_CHECKER_LOG")
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = args::CheckerArgs::parse();

    let result = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build() {
        Ok(v) => v.block_on(async_main(args)),
        Err(err) => {
            tracing::error!("Failed to create tokio runtime: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        tracing::error!("Error: {}", err);

        let mut src = std::error::Error::source(&err);
        while let Some(err) = src {
            tracing::error!("-> Caused by: {}", err);
            src = err.source();
        }

        std::process::exit(1);
    }
}

async fn async_main(args: CheckerArgs) -> Result<(), CheckerError> {
    let config = args.validate()?;
    tracing::trace!("config = {:#?}", config);

    let checker = VersionChecker::new(&config)?;

    tracing::info!("Checking for new releases...");
    let report = checker.run().await?;

    if report.dispatched {
        tracing::info!(
            "Dispatched workflow {} on {} for: {}",
            config.target.workflow_id,
            config.target.git_ref,
            report.changes.download_input()
        );
    } else {
        tracing::info!("Nothing changed, no workflow dispatched");
    }

    tracing::info!(
        "Recorded stable {}, snapshot {}, launcher {}",
        report.fetched.stable_version,
        report.fetched.snapshot_version,
        report.fetched.launcher_version
    );

    Ok(())
}
