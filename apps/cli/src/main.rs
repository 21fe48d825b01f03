//! deskbot CLI: answers help-center questions from the terminal.
//!
//! Questions are translated, searched against the help center, and answered
//! with a listing, a summary, or the document itself.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
