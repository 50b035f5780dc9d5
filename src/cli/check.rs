//! Check command implementation.
//!
//! Runs the full resolution without writing any output, so broken
//! references can gate a commit or CI run.

use std::path::PathBuf;

use clap::Args;

use crate::discovery::scan_project;
use crate::error::{DocsError, Result};
use crate::registry::build_project;
use crate::report::{print_report, Report};

/// Resolve a project tree and report problems without writing docs
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Project root directory to scan
    pub root: PathBuf,

    /// Folder names to skip while scanning (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: CheckArgs) -> Result<()> {
    if !args.root.is_dir() {
        return Err(DocsError::Io {
            path: args.root.clone(),
            message: "project root is not a directory".to_string(),
        });
    }

    let scan = scan_project(&args.root, &args.ignore);
    let mut report = Report::new();
    let project = build_project(&scan, &args.root, &mut report)?;
    print_report(&report);

    let failed = report.has_errors() || (args.strict && report.has_warnings());
    if failed {
        return Err(DocsError::Emit {
            message: format!(
                "check failed: {} error(s), {} warning(s)",
                report.error_count(),
                report.warning_count()
            ),
            help: Some("fix the reported files, or drop --strict to tolerate warnings".to_string()),
        });
    }

    println!(
        "Checked {} file(s): {} scene(s), {} resource(s), {} script(s)",
        project.total(),
        project.scenes.len(),
        project.resources.len(),
        project.scripts.len()
    );

    Ok(())
}
