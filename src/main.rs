//! # brvmstore CLI

use std::path::PathBuf;

use clap::Parser;

use crate::cli::Commands;

mod cli;

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        global = true,
        short = 'd',
        long = "database",
        help = "Database file, overrides the configured one"
    )]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    brvmstore::init(cli.database);

    match &cli.command {
        Commands::Config(cmd) => {
            cmd.exec().await;
        }
        Commands::Day(cmd) => {
            cmd.exec().await;
        }
        Commands::Import(cmd) => {
            cmd.exec().await;
        }
        Commands::Init(cmd) => {
            cmd.exec().await;
        }
        Commands::Latest(cmd) => {
            cmd.exec().await;
        }
        Commands::Ticker(cmd) => {
            cmd.exec().await;
        }
    }
}
