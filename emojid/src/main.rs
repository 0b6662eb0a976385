use clap::Parser;
use color_eyre::eyre;
use emoji_config::Configuration;
use emojid::signal::Shutdown;
use std::path::PathBuf;

/// Emoji resolution and custom emoji server
#[derive(Parser)]
#[command(about, author, version)]
struct Args {
    /// Path to the configuration file
    #[clap(long, short)]
    config: PathBuf,
}

async fn boot() -> eyre::Result<()> {
    let args = Args::parse();
    let config = Configuration::load(args.config).await?;
    emoji_observability::initialise()?;

    let plugin = emojid::initialise(&config).await?;
    let shutdown = Shutdown::on_signal();

    emojid::http::run(&plugin, &config.server, shutdown).await
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(boot())
}
