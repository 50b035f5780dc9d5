use clap::Parser;
use miette::Result;
use scenedoc::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => scenedoc::cli::generate::run(args)?,
        Commands::Check(args) => scenedoc::cli::check::run(args)?,
    }

    Ok(())
}
