//! Entry point for the `unseal` binary

use clap::{Parser, Subcommand};
use unseal_cli::commands::{AnalyzeArgs, RecoverArgs, RunArgs};

/// Recover and analyze a sealed text payload
#[derive(Parser)]
#[command(name = "unseal", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decrypt and decompress a sealed payload into a plaintext file
    Recover(RecoverArgs),
    /// Run the text analyses over a recovered plaintext file
    Analyze(AnalyzeArgs),
    /// Recover and analyze in one go
    Run(RunArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Recover(args) => args.execute(),
        Command::Analyze(args) => args.execute(),
        Command::Run(args) => args.execute(),
    }
}
