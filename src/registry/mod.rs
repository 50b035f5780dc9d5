//! Project-wide registries and construction of the documentation graph.
//!
//! The registries are the sole shared owners of every file object. Scenes
//! and resources register under their project-global uid, scripts under
//! their root-relative path; both key spaces are complete before any file
//! body is resolved, so discovery order never affects resolution.

use std::cell::RefCell;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::discovery::ScanResult;
use crate::error::Result;
use crate::model::{ResourceFile, ResourceRef, SceneFile, SceneRef, ScriptFile, ScriptRef};
use crate::parser::dott::{self, script_key, Lookups};
use crate::parser::script::parse_script;
use crate::report::{Diagnostic, Report};

/// The resolved documentation graph for one project.
#[derive(Debug)]
pub struct Project {
    /// Project root directory.
    pub root: PathBuf,
    /// Scene files by uid.
    pub scenes: BTreeMap<String, SceneRef>,
    /// Resource files by uid.
    pub resources: BTreeMap<String, ResourceRef>,
    /// Script files by normalized root-relative path.
    pub scripts: BTreeMap<String, ScriptRef>,
}

impl Project {
    fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            scenes: BTreeMap::new(),
            resources: BTreeMap::new(),
            scripts: BTreeMap::new(),
        }
    }

    /// Total number of registered files.
    pub fn total(&self) -> usize {
        self.scenes.len() + self.resources.len() + self.scripts.len()
    }
}

/// Build the full documentation graph from a scan.
///
/// Runs in ordered passes: scripts are parsed and registered first, then
/// every scene and resource header (registering uids), and only then the
/// scene and resource bodies, resolved against the completed registries.
///
/// A file that cannot be read is reported and skipped; a malformed header
/// or script annotation aborts the run.
pub fn build_project(scan: &ScanResult, root: &Path, report: &mut Report) -> Result<Project> {
    let mut project = Project::new(root);

    for path in &scan.scripts {
        let Some(source) = read_source(path, report) else {
            continue;
        };
        let mut script = ScriptFile::new(path.clone());
        script.class = parse_script(&source, path)?;

        let key = script_registry_key(root, path);
        match project.scripts.entry(key.clone()) {
            Entry::Occupied(_) => report.push(duplicate_registration(path, &key)),
            Entry::Vacant(slot) => {
                slot.insert(Rc::new(RefCell::new(script)));
            }
        }
    }

    let mut scene_files: Vec<SceneRef> = Vec::new();
    for path in &scan.scenes {
        let Some(source) = read_source(path, report) else {
            continue;
        };
        let scene = Rc::new(RefCell::new(SceneFile::new(path.clone())));
        let uid = dott::parse_scene_header(&source, &scene, report)?;

        // First registration wins; a later file claiming the same uid is
        // reported and contributes nothing.
        match project.scenes.entry(uid.clone()) {
            Entry::Occupied(_) => {
                report.push(duplicate_registration(path, &uid));
                continue;
            }
            Entry::Vacant(slot) => {
                slot.insert(Rc::clone(&scene));
            }
        }
        scene_files.push(scene);
    }

    let mut resource_files: Vec<ResourceRef> = Vec::new();
    for path in &scan.resources {
        let Some(source) = read_source(path, report) else {
            continue;
        };
        let resource = Rc::new(RefCell::new(ResourceFile::new(path.clone())));
        let uid = dott::parse_resource_header(&source, &resource, report)?;

        match project.resources.entry(uid.clone()) {
            Entry::Occupied(_) => {
                report.push(duplicate_registration(path, &uid));
                continue;
            }
            Entry::Vacant(slot) => {
                slot.insert(Rc::clone(&resource));
            }
        }
        resource_files.push(resource);
    }

    for scene in &scene_files {
        let path = scene.borrow().path.clone();
        let Some(source) = read_source(&path, report) else {
            continue;
        };
        let lookups = Lookups {
            scenes: &project.scenes,
            scripts: &project.scripts,
            resources: &project.resources,
        };
        dott::parse_scene_body(&source, scene, &lookups, report)?;
    }

    for resource in &resource_files {
        let path = resource.borrow().path.clone();
        let Some(source) = read_source(&path, report) else {
            continue;
        };
        let lookups = Lookups {
            scenes: &project.scenes,
            scripts: &project.scripts,
            resources: &project.resources,
        };
        dott::parse_resource_body(&source, resource, &lookups, report)?;
    }

    Ok(project)
}

/// Key a script file the way `ext_resource` path literals address it.
fn script_registry_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    script_key(&rel.to_string_lossy())
}

fn read_source(path: &Path, report: &mut Report) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            report.push(
                Diagnostic::error("scenedoc::io", format!("could not read file: {}", e)).with_path(path),
            );
            None
        }
    }
}

fn duplicate_registration(path: &Path, key: &str) -> Diagnostic {
    Diagnostic::warning(
        "scenedoc::duplicate-key",
        format!("`{}` is already registered by another file", key),
    )
    .with_path(path)
    .with_detail(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use crate::discovery::scan_project;
    use crate::model::FileRef;

    fn write_sample_project(root: &Path) {
        fs::create_dir_all(root.join("scripts")).unwrap();

        fs::write(
            root.join("scripts/player.gd"),
            "#CLASS controls the player character\n\
             class_name Player\n\
             extends CharacterBody2D\n\
             #TAGS player, movement\n\n\
             #VAR speed of movement\n\
             @export var speed: float = 200.0\n\n\
             #FUNC moves the player\n\
             func move(direction: Vector2) -> bool:\n",
        )
        .unwrap();

        fs::write(
            root.join("Player.tscn"),
            "[gd_scene load_steps=2 format=3 uid=\"uid://player\"]\n\n\
             [ext_resource type=\"Script\" path=\"res://scripts/player.gd\" id=\"1_s\"]\n\n\
             [node name=\"Player\" type=\"CharacterBody2D\"]\n\
             script = ExtResource(\"1_s\")\n\n\
             [node name=\"Sprite\" type=\"Sprite2D\" parent=\".\"]\n",
        )
        .unwrap();

        fs::write(
            root.join("Hub.tscn"),
            "[gd_scene load_steps=3 format=3 uid=\"uid://hub\"]\n\n\
             [ext_resource type=\"PackedScene\" uid=\"uid://player\" path=\"res://Player.tscn\" id=\"1_p\"]\n\
             [ext_resource type=\"Resource\" uid=\"uid://stats\" path=\"res://stats.tres\" id=\"2_r\"]\n\n\
             [node name=\"Hub\" type=\"Node2D\"]\n\n\
             [node name=\"PlayerSpawn\" parent=\".\" instance=ExtResource(\"1_p\")]\n",
        )
        .unwrap();

        fs::write(
            root.join("stats.tres"),
            "[gd_resource type=\"Resource\" script_class=\"CharacterStats\" format=3 uid=\"uid://stats\"]\n\n\
             [sub_resource type=\"Curve\" id=\"c1\"]\n\
             max_value = 2.0\n\n\
             [resource]\n\
             growth = SubResource(\"c1\")\n\
             base_health = 100\n",
        )
        .unwrap();
    }

    #[test]
    fn test_build_full_project() {
        let dir = tempdir().unwrap();
        write_sample_project(dir.path());

        let scan = scan_project(dir.path(), &[]);
        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        assert_eq!(project.scenes.len(), 2);
        assert_eq!(project.resources.len(), 1);
        assert_eq!(project.scripts.len(), 1);
        assert_eq!(project.total(), 4);
        assert!(!report.has_errors());

        // Hub resolved the player scene and the stats resource.
        let hub = project.scenes.get("uid://hub").unwrap().borrow();
        assert_eq!(hub.tables.packed_scenes.len(), 1);
        assert_eq!(hub.tables.ext_resources.len(), 1);
        let spawn_type = hub
            .node_tree
            .iter()
            .find(|n| n.borrow().name == "PlayerSpawn")
            .map(|n| n.borrow().node_type.clone());
        assert_eq!(spawn_type.as_deref(), Some("PackedScene"));

        // Player's script field links to the parsed script file.
        let player = project.scenes.get("uid://player").unwrap().borrow();
        let root_node = player.node_tree.root().unwrap().borrow();
        match root_node.ext_resource_fields[0].1.upgrade() {
            Some(FileRef::Script(s)) => {
                let s = s.borrow();
                assert_eq!(s.class.name, "Player");
                assert!(s.class.is_public);
            }
            other => panic!("expected script, got {:?}", other),
        }

        // Resource body resolved its own sub-resource.
        let stats = project.resources.get("uid://stats").unwrap().borrow();
        assert_eq!(stats.script_class.as_deref(), Some("CharacterStats"));
        let top = stats.resource.as_ref().unwrap();
        assert_eq!(top.sub_res_fields.len(), 1);
    }

    #[test]
    fn test_resolution_is_discovery_order_independent() {
        let dir = tempdir().unwrap();
        write_sample_project(dir.path());

        // Force the referencing scene ahead of its dependency.
        let mut scan = ScanResult::new();
        scan.scenes.push(dir.path().join("Hub.tscn"));
        scan.scenes.push(dir.path().join("Player.tscn"));
        scan.resources.push(dir.path().join("stats.tres"));
        scan.scripts.push(dir.path().join("scripts").join("player.gd"));

        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        let hub = project.scenes.get("uid://hub").unwrap().borrow();
        assert_eq!(hub.tables.packed_scenes.len(), 1);
        assert_eq!(
            hub.tables.packed_scenes.get("1_p").unwrap().borrow().title,
            "Player.tscn"
        );
        assert!(!report.has_errors());
    }

    #[test]
    fn test_unreadable_file_is_skipped_with_error() {
        let dir = tempdir().unwrap();
        write_sample_project(dir.path());

        let mut scan = scan_project(dir.path(), &[]);
        scan.scenes.push(dir.path().join("Ghost.tscn"));

        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        assert_eq!(project.scenes.len(), 2);
        assert!(report.has_errors());
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_malformed_header_aborts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.tscn"), "[gd_scene format=3]\n").unwrap();

        let scan = scan_project(dir.path(), &[]);
        let mut report = Report::new();

        assert!(build_project(&scan, dir.path(), &mut report).is_err());
    }

    #[test]
    fn test_duplicate_uid_keeps_first_registration() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.tscn"), "[gd_scene uid=\"uid://same\"]\n").unwrap();
        fs::write(dir.path().join("b.tscn"), "[gd_scene uid=\"uid://same\"]\n").unwrap();

        let mut scan = ScanResult::new();
        scan.scenes.push(dir.path().join("a.tscn"));
        scan.scenes.push(dir.path().join("b.tscn"));

        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        assert_eq!(project.scenes.len(), 1);
        assert_eq!(
            project.scenes.get("uid://same").unwrap().borrow().title,
            "a.tscn"
        );
        assert_eq!(report.warning_count(), 1);
    }
}
