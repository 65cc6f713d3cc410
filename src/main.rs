use anyhow::Result;
use clap::Parser;
use farecard::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
