//! File system scanner for discovering Godot project files.
//!
//! Recursively scans a project directory to find all scene (`.tscn`),
//! resource (`.tres`) and script (`.gd`, `.cs`) files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// The three file kinds documentation is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Scene,
    Resource,
    Script,
}

/// Result of scanning a project directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Discovered scene files.
    pub scenes: Vec<PathBuf>,
    /// Discovered resource files.
    pub resources: Vec<PathBuf>,
    /// Discovered script files.
    pub scripts: Vec<PathBuf>,
}

impl ScanResult {
    /// Create a new empty scan result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of discovered files.
    pub fn total(&self) -> usize {
        self.scenes.len() + self.resources.len() + self.scripts.len()
    }

    /// Check if no files were discovered.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get files of a specific kind.
    pub fn files_of_kind(&self, kind: FileKind) -> &[PathBuf] {
        match kind {
            FileKind::Scene => &self.scenes,
            FileKind::Resource => &self.resources,
            FileKind::Script => &self.scripts,
        }
    }
}

/// Scan a project directory for scene, resource and script files.
///
/// Any directory whose name appears in `ignored` is pruned together with its
/// whole subtree. File discovery order is not significant; resolution runs
/// over the complete set in registration passes.
pub fn scan_project(root: &Path, ignored: &[String]) -> ScanResult {
    let mut result = ScanResult::new();

    if !root.exists() {
        return result;
    }

    let mut walker = WalkDir::new(root).follow_links(true).into_iter();
    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else {
            continue;
        };

        if entry.file_type().is_dir() {
            // Never prune the root itself, even if its name matches.
            let name = entry.file_name().to_string_lossy();
            if entry.depth() > 0 && ignored.iter().any(|i| i == name.as_ref()) {
                walker.skip_current_dir();
            }
            continue;
        }

        if let Some(kind) = detect_file_kind(entry.path()) {
            let path = entry.path().to_path_buf();
            match kind {
                FileKind::Scene => result.scenes.push(path),
                FileKind::Resource => result.resources.push(path),
                FileKind::Script => result.scripts.push(path),
            }
        }
    }

    result
}

/// Detect the file kind from a path based on its extension.
pub fn detect_file_kind(path: &Path) -> Option<FileKind> {
    match path.extension()?.to_str()? {
        "tscn" => Some(FileKind::Scene),
        "tres" => Some(FileKind::Resource),
        "gd" | "cs" => Some(FileKind::Script),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_detect_file_kind() {
        assert_eq!(detect_file_kind(Path::new("Player.tscn")), Some(FileKind::Scene));
        assert_eq!(detect_file_kind(Path::new("Theme.tres")), Some(FileKind::Resource));
        assert_eq!(detect_file_kind(Path::new("player.gd")), Some(FileKind::Script));
        assert_eq!(detect_file_kind(Path::new("Player.cs")), Some(FileKind::Script));
        assert_eq!(detect_file_kind(Path::new("project.godot")), None);
        assert_eq!(detect_file_kind(Path::new("sprite.png")), None);
        assert_eq!(detect_file_kind(Path::new("no_extension")), None);
    }

    #[test]
    fn test_detect_file_kind_with_path() {
        assert_eq!(
            detect_file_kind(Path::new("levels/town/Hub.tscn")),
            Some(FileKind::Scene)
        );
        assert_eq!(
            detect_file_kind(Path::new("/absolute/path/ui_theme.tres")),
            Some(FileKind::Resource)
        );
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempdir().unwrap();

        let result = scan_project(dir.path(), &[]);

        assert!(result.is_empty());
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_scan_recursive() {
        let dir = tempdir().unwrap();

        fs::create_dir_all(dir.path().join("levels/town")).unwrap();
        fs::create_dir_all(dir.path().join("scripts")).unwrap();

        fs::write(dir.path().join("Player.tscn"), "[gd_scene]").unwrap();
        fs::write(dir.path().join("levels/town/Hub.tscn"), "[gd_scene]").unwrap();
        fs::write(dir.path().join("levels/theme.tres"), "[gd_resource]").unwrap();
        fs::write(dir.path().join("scripts/player.gd"), "extends Node").unwrap();
        fs::write(dir.path().join("readme.md"), "# Readme").unwrap();

        let result = scan_project(dir.path(), &[]);

        assert_eq!(result.scenes.len(), 2);
        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.scripts.len(), 1);
        assert_eq!(result.total(), 4);
    }

    #[test]
    fn test_ignored_folder_prunes_subtree() {
        let dir = tempdir().unwrap();

        fs::create_dir_all(dir.path().join("addons/gizmo/nested")).unwrap();
        fs::write(dir.path().join("Player.tscn"), "[gd_scene]").unwrap();
        fs::write(dir.path().join("addons/gizmo/Tool.tscn"), "[gd_scene]").unwrap();
        fs::write(dir.path().join("addons/gizmo/nested/deep.gd"), "extends Node").unwrap();

        let result = scan_project(dir.path(), &["addons".to_string()]);

        assert_eq!(result.scenes.len(), 1);
        assert!(result.scenes[0].to_string_lossy().contains("Player"));
        assert!(result.scripts.is_empty());
    }

    #[test]
    fn test_ignored_name_does_not_prune_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("addons");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("Tool.tscn"), "[gd_scene]").unwrap();

        let result = scan_project(&root, &["addons".to_string()]);

        assert_eq!(result.scenes.len(), 1);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let result = scan_project(Path::new("/nonexistent/path"), &[]);

        assert!(result.is_empty());
    }

    #[test]
    fn test_files_of_kind() {
        let mut result = ScanResult::new();
        result.scenes.push(PathBuf::from("a.tscn"));
        result.scripts.push(PathBuf::from("b.gd"));

        assert_eq!(result.files_of_kind(FileKind::Scene).len(), 1);
        assert_eq!(result.files_of_kind(FileKind::Script).len(), 1);
        assert_eq!(result.files_of_kind(FileKind::Resource).len(), 0);
    }
}
