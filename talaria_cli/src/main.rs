use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{compare::CompareArgs, dispatch::DispatchArgs, generate::GenerateArgs};

mod compare;
mod dispatch;
mod generate;

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
    /// Pack an order feed into trips and optionally fly them
    Dispatch {
        #[command(flatten)]
        args: DispatchArgs,
    },
    /// Run both packing policies over the same feed, side by side
    Compare {
        #[command(flatten)]
        args: CompareArgs,
    },
    /// Write a synthetic order feed and distance matrix
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Dispatch { args } => dispatch::run(args),
        Commands::Compare { args } => compare::run(args),
        Commands::Generate { args } => generate::run(args),
    }
}
