pub mod check;
pub mod generate;

use clap::{Parser, Subcommand};

/// scenedoc - Cross-linked documentation generator for Godot projects
#[derive(Parser, Debug)]
#[command(name = "scenedoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate documentation from a project tree
    Generate(generate::GenerateArgs),

    /// Resolve a project tree and report problems without writing docs
    Check(check::CheckArgs),
}
