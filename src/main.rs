use clap::Parser;
use grafana_team_sync::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Sync => cli::sync::run(&cli.global).await,
        Command::Server(args) => cli::server::run(&cli.global, args).await,
    }
}
