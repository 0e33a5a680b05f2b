// Licensed under the Apache-2.0 license

//! Repository maintenance tasks.

mod codegen;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "regmap repository tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the sample register-map artifacts.
    Codegen {
        /// Output directory for the generated files.
        #[arg(long, default_value = "out")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Codegen { out } => codegen::generate(&out),
    }
}
