//! File discovery for Godot projects.
//!
//! Finds every scene, resource and script file under a project root so the
//! registry can resolve them as one set.

mod scanner;

pub use scanner::{detect_file_kind, scan_project, FileKind, ScanResult};
