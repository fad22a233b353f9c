use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{check::CheckArgs, move_customer::MoveArgs, solve::SolveArgs};

mod backends;
mod check;
mod file_utils;
mod move_customer;
mod parsers;
mod report;
mod solve;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the violations of a solution
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
    /// Move a customer and re-optimize the routes involved
    #[command(name = "move", visible_alias = "mv")]
    Move {
        #[command(flatten)]
        args: MoveArgs,
    },
    /// Solve a problem with the configured solver
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Check { args } => check::run(args).await?,
        Commands::Move { args } => move_customer::run(args).await?,
        Commands::Solve { args } => solve::run(args).await?,
    }

    Ok(())
}
