//! scenedoc - Cross-linked documentation generator for Godot projects
//!
//! A library for reconstructing the reference graph of a Godot project
//! (scenes, resources, scripts) and emitting a cross-linked markdown
//! documentation set from it.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;
pub mod render;
pub mod report;

pub use discovery::{detect_file_kind, scan_project, FileKind, ScanResult};
pub use error::{DocsError, Result};
pub use model::{
    FileRef, NodeTree, ResourceFile, ResourceNode, SceneFile, ScriptClass, ScriptFile, WeakFileRef,
};
pub use registry::{build_project, Project};
pub use render::gen_docs;
pub use report::{print_report, Diagnostic, Report, Severity};
