//! Markdown documentation emission.
//!
//! Writes one `<file name>.md` document per registered file into an output
//! tree mirroring the project layout, plus an Obsidian graph configuration
//! that colors the three file kinds by their tag. Links between documents
//! are relative markdown links, so the output works in any viewer; dangling
//! weak references are skipped silently.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{DocsError, Result};
use crate::model::{title_of, FileRef, RefTables, ResourceFile, ResourceNode, SceneFile, ScriptFile};
use crate::registry::Project;

/// Generate the full documentation set into `out_dir`.
///
/// The output directory is clobbered: stale documents from a previous run
/// must not survive a rename or deletion in the project.
pub fn gen_docs(project: &Project, out_dir: &Path) -> Result<()> {
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).map_err(|e| io_error(out_dir, &e))?;
    }
    fs::create_dir_all(out_dir).map_err(|e| io_error(out_dir, &e))?;

    let root = &project.root;
    for scene in project.scenes.values() {
        let scene = scene.borrow();
        write_doc(out_dir, root, &scene.path, &render_scene(&scene, root))?;
    }
    for resource in project.resources.values() {
        let resource = resource.borrow();
        write_doc(out_dir, root, &resource.path, &render_resource(&resource, root))?;
    }
    for script in project.scripts.values() {
        let script = script.borrow();
        write_doc(out_dir, root, &script.path, &render_script(&script))?;
    }

    write_graph_config(out_dir)
}

/// Project-relative path of the document for a file, with `.md` appended to
/// the full file name (`levels/Hub.tscn` becomes `levels/Hub.tscn.md`).
fn doc_rel_path(root: &Path, file_path: &Path) -> PathBuf {
    let rel = file_path.strip_prefix(root).unwrap_or(file_path);
    let mut path = rel.to_path_buf();
    path.set_file_name(format!("{}.md", title_of(rel)));
    path
}

/// Directory component of a file's document, relative to the docs root.
fn doc_dir(root: &Path, file_path: &Path) -> PathBuf {
    doc_rel_path(root, file_path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn write_doc(out_dir: &Path, root: &Path, file_path: &Path, content: &str) -> Result<()> {
    let path = out_dir.join(doc_rel_path(root, file_path));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
    }
    fs::write(&path, content).map_err(|e| io_error(&path, &e))
}

fn io_error(path: &Path, e: &std::io::Error) -> DocsError {
    DocsError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Markdown link from the document in `from_dir` to another file's document,
/// both addressed relative to the docs root.
fn file_link(root: &Path, from_dir: &Path, target: &Path) -> String {
    let link = relative_path(from_dir, &doc_rel_path(root, target));
    format!("[{}]({})", title_of(target), link.display())
}

/// Relative path from a directory to a target, both given against the same
/// base.
fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from: Vec<_> = from_dir.components().collect();
    let to: Vec<_> = to.components().collect();
    let common = from.iter().zip(to.iter()).take_while(|(a, b)| a == b).count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for component in &to[common..] {
        rel.push(component);
    }
    rel
}

fn render_scene(scene: &SceneFile, root: &Path) -> String {
    let from_dir = doc_dir(root, &scene.path);
    let mut out = String::new();
    out.push_str("#scene\n\n");
    out.push_str(&format!("# {}\n\n", scene.title));

    if !scene.node_tree.is_empty() {
        out.push_str("## Node Tree\n\n");
        for node in scene.node_tree.iter() {
            let node = node.borrow();
            let indent = "\t".repeat(node.depth.saturating_sub(1));
            out.push_str(&format!("{}- **{}** ({})\n", indent, node.name, node.node_type));
            for (field, target) in &node.ext_resource_fields {
                if let Some(target) = target.upgrade() {
                    out.push_str(&format!(
                        "{}  *{}*: {}\n",
                        indent,
                        field,
                        file_link(root, &from_dir, &target.path())
                    ));
                }
            }
        }
        out.push('\n');
    }

    render_external_resources(&mut out, &scene.tables, root, &from_dir);
    out
}

fn render_resource(resource: &ResourceFile, root: &Path) -> String {
    let from_dir = doc_dir(root, &resource.path);
    let mut out = String::new();
    out.push_str("#resource\n\n");
    out.push_str(&format!("# {}\n\n", resource.title));

    if let Some(script_class) = &resource.script_class {
        out.push_str(&format!("*script class*: `{}`\n\n", script_class));
    }

    if let Some(top) = &resource.resource {
        out.push_str("## Resource\n\n");
        render_resource_node(&mut out, top, root, &from_dir);
        out.push('\n');
    }

    if !resource.sub_resources.is_empty() {
        out.push_str("## Sub-Resources\n\n");
        for (id, node) in &resource.sub_resources {
            let node = node.borrow();
            out.push_str(&format!("### {} (`{}`)\n\n", node.type_name, id));
            render_resource_node(&mut out, &node, root, &from_dir);
            out.push('\n');
        }
    }

    render_external_resources(&mut out, &resource.tables, root, &from_dir);
    out
}

fn render_resource_node(out: &mut String, node: &ResourceNode, root: &Path, from_dir: &Path) {
    for (field, target) in &node.res_file_fields {
        if let Some(target) = target.upgrade() {
            out.push_str(&format!("- *{}*: {}\n", field, file_link(root, from_dir, &target.path())));
        }
    }
    for (field, name) in &node.res_other_fields {
        out.push_str(&format!("- *{}*: {}\n", field, name));
    }
    for (field, target) in &node.sub_res_fields {
        if let Some(target) = target.upgrade() {
            out.push_str(&format!("- *{}*: sub-resource `{}`\n", field, target.borrow().type_name));
        }
    }
    for (field, value) in &node.fields {
        out.push_str(&format!("- *{}*: `{}`\n", field, value));
    }
}

fn render_external_resources(out: &mut String, tables: &RefTables, root: &Path, from_dir: &Path) {
    let has_any = !tables.packed_scenes.is_empty()
        || !tables.scripts.is_empty()
        || !tables.ext_resources.is_empty()
        || !tables.ext_resources_other.is_empty();
    if !has_any {
        return;
    }

    out.push_str("## External Resources\n\n");

    if !tables.packed_scenes.is_empty() {
        out.push_str("### Scenes\n\n");
        for scene in tables.packed_scenes.values() {
            let path = FileRef::Scene(scene.clone()).path();
            out.push_str(&format!("- {}\n", file_link(root, from_dir, &path)));
        }
        out.push('\n');
    }
    if !tables.scripts.is_empty() {
        out.push_str("### Scripts\n\n");
        for script in tables.scripts.values() {
            let path = FileRef::Script(script.clone()).path();
            out.push_str(&format!("- {}\n", file_link(root, from_dir, &path)));
        }
        out.push('\n');
    }
    if !tables.ext_resources.is_empty() {
        out.push_str("### Resources\n\n");
        for resource in tables.ext_resources.values() {
            let path = FileRef::Resource(resource.clone()).path();
            out.push_str(&format!("- {}\n", file_link(root, from_dir, &path)));
        }
        out.push('\n');
    }
    if !tables.ext_resources_other.is_empty() {
        out.push_str("### Other\n\n");
        for other in tables.ext_resources_other.values() {
            out.push_str(&format!("- {}: `{}`\n", other.name, other.type_name));
        }
        out.push('\n');
    }
}

fn render_script(script: &ScriptFile) -> String {
    let class = &script.class;
    let mut out = String::new();
    out.push_str("#script\n");
    for tag in &class.tags {
        out.push_str(&format!("#{}\n", tag));
    }
    out.push('\n');

    let heading = if class.name.is_empty() { &script.title } else { &class.name };
    out.push_str(&format!("# {}\n\n", heading));

    if !class.parent.is_empty() {
        out.push_str(&format!("*extends* `{}`\n\n", class.parent));
    }
    if !class.short_desc.is_empty() {
        out.push_str(&format!("{}\n\n", class.short_desc));
    }

    let has_variables = class.categories.iter().any(|c| !c.variables.is_empty());
    if has_variables {
        out.push_str("## Exports\n\n");
        for category in &class.categories {
            if category.variables.is_empty() {
                continue;
            }
            if !category.name.is_empty() {
                out.push_str(&format!("### {}\n\n", category.name));
            }
            for variable in &category.variables {
                out.push_str(&format!("- `{}`", variable.name));
                if !variable.var_type.is_empty() {
                    out.push_str(&format!(": `{}`", variable.var_type));
                }
                if !variable.short_desc.is_empty() {
                    out.push_str(&format!(" - {}", variable.short_desc));
                }
                out.push('\n');
            }
            out.push('\n');
        }
    }

    if !class.functions.is_empty() {
        out.push_str("## Functions\n\n");
        for function in &class.functions {
            out.push_str(&format!("- `{}({}) -> {}`", function.name, render_args(function), function.return_type));
            if !function.short_desc.is_empty() {
                out.push_str(&format!(" - {}", function.short_desc));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

fn render_args(function: &crate::model::Function) -> String {
    function
        .arguments
        .iter()
        .map(|a| {
            if a.var_type.is_empty() {
                a.name.clone()
            } else {
                format!("{}: {}", a.name, a.var_type)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Obsidian graph view configuration.
#[derive(Debug, Serialize)]
struct GraphConfig {
    #[serde(rename = "colorGroups")]
    color_groups: Vec<ColorGroup>,
}

#[derive(Debug, Serialize)]
struct ColorGroup {
    query: String,
    color: GroupColor,
}

#[derive(Debug, Serialize)]
struct GroupColor {
    a: u8,
    rgb: u32,
}

impl ColorGroup {
    fn for_tag(tag: &str, rgb: u32) -> Self {
        Self {
            query: format!("tag:#{}", tag),
            color: GroupColor { a: 1, rgb },
        }
    }
}

/// Write the Obsidian graph configuration coloring documents by kind tag.
fn write_graph_config(out_dir: &Path) -> Result<()> {
    let obsidian_dir = out_dir.join(".obsidian");
    fs::create_dir_all(&obsidian_dir).map_err(|e| io_error(&obsidian_dir, &e))?;

    let config = GraphConfig {
        color_groups: vec![
            ColorGroup::for_tag("scene", 14048348),
            ColorGroup::for_tag("script", 6577366),
            ColorGroup::for_tag("resource", 4521728),
        ],
    };

    let path = obsidian_dir.join("graph.json");
    let body = serde_json::to_string(&config).map_err(|e| DocsError::Emit {
        message: format!("could not serialize graph config: {}", e),
        help: None,
    })?;
    fs::write(&path, body).map_err(|e| io_error(&path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use crate::discovery::scan_project;
    use crate::registry::build_project;
    use crate::report::Report;

    fn sample_project_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();
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

        dir
    }

    #[test]
    fn test_gen_docs_mirrors_project_layout() {
        let dir = sample_project_dir();
        let scan = scan_project(dir.path(), &[]);
        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        let out = dir.path().join("docs");
        gen_docs(&project, &out).unwrap();

        assert!(out.join("Player.tscn.md").exists());
        assert!(out.join("scripts/player.gd.md").exists());
        assert!(out.join(".obsidian/graph.json").exists());
    }

    #[test]
    fn test_same_file_name_in_sibling_folders_keeps_both_docs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("enemies")).unwrap();
        fs::create_dir_all(root.join("players")).unwrap();
        fs::write(root.join("enemies/actor.gd"), "extends Node2D\n").unwrap();
        fs::write(root.join("players/actor.gd"), "extends Node2D\n").unwrap();

        let scan = scan_project(root, &[]);
        let mut report = Report::new();
        let project = build_project(&scan, root, &mut report).unwrap();
        assert_eq!(project.scripts.len(), 2);

        let out = root.join("docs");
        gen_docs(&project, &out).unwrap();

        assert!(out.join("enemies/actor.gd.md").exists());
        assert!(out.join("players/actor.gd.md").exists());
    }

    #[test]
    fn test_scene_doc_structure() {
        let dir = sample_project_dir();
        let scan = scan_project(dir.path(), &[]);
        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        let out = dir.path().join("docs");
        gen_docs(&project, &out).unwrap();

        let doc = fs::read_to_string(out.join("Player.tscn.md")).unwrap();
        assert!(doc.starts_with("#scene\n"));
        assert!(doc.contains("- **Player** (CharacterBody2D)"));
        assert!(doc.contains("\t- **Sprite** (Sprite2D)"));
        assert!(doc.contains("*script*: [player.gd](scripts/player.gd.md)"));
        assert!(doc.contains("### Scripts"));
    }

    #[test]
    fn test_links_climb_out_of_subfolders() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("levels")).unwrap();
        fs::write(root.join("hub.gd"), "extends Node2D\n").unwrap();
        fs::write(
            root.join("levels/Hub.tscn"),
            "[gd_scene uid=\"uid://hub\"]\n\n\
             [ext_resource type=\"Script\" path=\"res://hub.gd\" id=\"1\"]\n\n\
             [node name=\"Hub\" type=\"Node2D\"]\n\
             script = ExtResource(\"1\")\n",
        )
        .unwrap();

        let scan = scan_project(root, &[]);
        let mut report = Report::new();
        let project = build_project(&scan, root, &mut report).unwrap();

        let out = root.join("docs");
        gen_docs(&project, &out).unwrap();

        let doc = fs::read_to_string(out.join("levels/Hub.tscn.md")).unwrap();
        assert!(doc.contains("*script*: [hub.gd](../hub.gd.md)"));
    }

    #[test]
    fn test_script_doc_structure() {
        let dir = sample_project_dir();
        let scan = scan_project(dir.path(), &[]);
        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        let out = dir.path().join("docs");
        gen_docs(&project, &out).unwrap();

        let doc = fs::read_to_string(out.join("scripts/player.gd.md")).unwrap();
        assert!(doc.starts_with("#script\n"));
        assert!(doc.contains("#player\n"));
        assert!(doc.contains("# Player\n"));
        assert!(doc.contains("*extends* `CharacterBody2D`"));
        assert!(doc.contains("- `speed`: `float` - speed of movement"));
        assert!(doc.contains("- `move(direction: Vector2) -> bool` - moves the player"));
    }

    #[test]
    fn test_gen_docs_clobbers_previous_output() {
        let dir = sample_project_dir();
        let scan = scan_project(dir.path(), &[]);
        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        let out = dir.path().join("docs");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("Stale.tscn.md"), "#scene\n").unwrap();

        gen_docs(&project, &out).unwrap();

        assert!(!out.join("Stale.tscn.md").exists());
        assert!(out.join("Player.tscn.md").exists());
    }

    #[test]
    fn test_graph_config_colors_all_kinds() {
        let dir = sample_project_dir();
        let scan = scan_project(dir.path(), &[]);
        let mut report = Report::new();
        let project = build_project(&scan, dir.path(), &mut report).unwrap();

        let out = dir.path().join("docs");
        gen_docs(&project, &out).unwrap();

        let config: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(".obsidian/graph.json")).unwrap()).unwrap();
        let groups = config["colorGroups"].as_array().unwrap();
        let queries: Vec<&str> = groups.iter().map(|g| g["query"].as_str().unwrap()).collect();
        assert_eq!(queries, vec!["tag:#scene", "tag:#script", "tag:#resource"]);
        let colors: Vec<u64> = groups.iter().map(|g| g["color"]["rgb"].as_u64().unwrap()).collect();
        assert_eq!(colors, vec![14048348, 6577366, 4521728]);
    }
}
