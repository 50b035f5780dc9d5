//! Generate command implementation.
//!
//! Scans a project tree, resolves the documentation graph and writes the
//! markdown documentation set.

use std::path::PathBuf;

use clap::Args;

use crate::discovery::scan_project;
use crate::error::{DocsError, Result};
use crate::registry::build_project;
use crate::render::gen_docs;
use crate::report::{print_report, Report};

/// Generate documentation from a project tree
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Project root directory to scan
    pub root: PathBuf,

    /// Folder names to skip while scanning (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Output directory, relative to the project root unless absolute
    #[arg(long, short, default_value = "docs")]
    pub output: PathBuf,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    if !args.root.is_dir() {
        return Err(DocsError::Io {
            path: args.root.clone(),
            message: "project root is not a directory".to_string(),
        });
    }

    let scan = scan_project(&args.root, &args.ignore);
    if scan.is_empty() {
        println!("No scene, resource or script files found in {}", args.root.display());
        return Ok(());
    }

    let mut report = Report::new();
    let project = build_project(&scan, &args.root, &mut report)?;
    print_report(&report);

    let out_dir = if args.output.is_absolute() {
        args.output.clone()
    } else {
        args.root.join(&args.output)
    };
    gen_docs(&project, &out_dir)?;

    println!(
        "Documented {} scene(s), {} resource(s), {} script(s) to {}",
        project.scenes.len(),
        project.resources.len(),
        project.scripts.len(),
        out_dir.display()
    );

    Ok(())
}
