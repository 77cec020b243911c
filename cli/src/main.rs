mod eval;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "patina")]
#[command(about = "Patina CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay fixture cases through the inspection pipeline and report accuracy
    Eval {
        /// Cases file: array of {id, image, part_type?, expected?, notes?}
        #[arg(long, default_value = "eval/cases.json")]
        cases: PathBuf,
        /// Where to write detailed results
        #[arg(long, default_value = "eval/results.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { cases, out } => {
            eval::run(&cases, &out).await?;
        }
    }

    Ok(())
}
