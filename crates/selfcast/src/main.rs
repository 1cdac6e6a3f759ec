use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use selfcast::backend::BackendClient;
use selfcast::cli::Cli;
use selfcast::config::Config;
use selfcast::runner::{Options, Runner};
use selfcast::schedule::Schedule;
use selfcast::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Local .env convention; absence is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if cli.paths.is_empty() && !cli.update_metadata {
        eprintln!("{}", Cli::command().render_help());
        std::process::exit(1);
    }

    let config = Config::from_env()?;
    let schedule = match &cli.schedule {
        Some(path) => Schedule::load_from(path)?,
        None => Schedule::load_default()?,
    };

    let runner = Runner::new(
        BackendClient::new(&config),
        schedule,
        Options {
            delete: cli.delete,
            update_metadata: cli.update_metadata,
            channel_override: cli.channel.clone(),
        },
    );

    if cli.watch {
        watch::watch(&runner, &cli.paths).await
    } else {
        runner.process(&cli.paths).await
    }
}
