//! CLI entry point for tile-by-tile outpainting

use clap::Parser;
use outpainter::io::cli::Cli;

fn main() -> outpainter::Result<()> {
    let cli = Cli::parse();
    cli.run()?;
    Ok(())
}
