mod cli;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::ParseId(args) => {
            let table = cli::parse_id(&args)?;
            println!("{}", table);
        }
        Command::Wait { target } => {
            let (cancel_tx, cancel_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, canceling wait");
                    let _ = cancel_tx.send(true);
                }
            });

            let summary = cli::wait(target, cancel_rx).await?;
            tracing::info!(%summary, "wait complete");
            println!("{}", summary);
        }
    }

    Ok(())
}
