//! Two-phase scene/resource resolver.
//!
//! Files forward-reference each other regardless of discovery order, so
//! resolution runs in two phases over the whole file set: a header pass that
//! registers every file's identity (uid), then a body pass that resolves
//! references against the completed registries. The caller drives the passes;
//! this module parses one file at a time.
//!
//! Failure semantics: header malformation and a missing `type` on the first
//! `ext_resource` entry are fatal (identity resolution is compromised past
//! that point); every other malformed entry or registry miss skips only that
//! entry/reference and is reported once.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use crate::error::{DocsError, Result};
use crate::model::file::{OtherResource, RefTables, ResourceRef, SceneRef, ScriptRef};
use crate::model::resource::{ResourceNode, ResourceNodeRef};
use crate::report::{Diagnostic, Report};

use super::entry::EntryStream;
use super::fields::{decode_entry, strip_ext_resource, strip_sub_resource, EntryFields};

/// Read-only views of the project registries, completed by the header passes
/// before any body pass runs.
#[derive(Debug, Clone, Copy)]
pub struct Lookups<'a> {
    pub scenes: &'a BTreeMap<String, SceneRef>,
    pub scripts: &'a BTreeMap<String, ScriptRef>,
    pub resources: &'a BTreeMap<String, ResourceRef>,
}

/// Normalize a root-relative path literal into the key space script files are
/// registered under.
pub fn script_key(root_relative: &str) -> String {
    root_relative.replace(['/', '\\'], std::path::MAIN_SEPARATOR_STR)
}

/// Header pass for a scene file: read only the first entry, require a
/// `gd_scene` section with a non-empty uid, and return the uid for
/// registration.
pub fn parse_scene_header(source: &str, scene: &SceneRef, report: &mut Report) -> Result<String> {
    let path = scene.borrow().path.clone();
    let uid = parse_header(source, &path, "gd_scene", report)?.0;
    scene.borrow_mut().uid = uid.clone();
    Ok(uid)
}

/// Header pass for a resource file: same contract as the scene header, with
/// an optional `script_class` captured alongside the uid.
pub fn parse_resource_header(source: &str, resource: &ResourceRef, report: &mut Report) -> Result<String> {
    let path = resource.borrow().path.clone();
    let (uid, script_class) = parse_header(source, &path, "gd_resource", report)?;
    {
        let mut file = resource.borrow_mut();
        file.uid = uid.clone();
        file.script_class = script_class;
    }
    Ok(uid)
}

fn parse_header(
    source: &str,
    path: &Path,
    section: &str,
    report: &mut Report,
) -> Result<(String, Option<String>)> {
    let mut entries = EntryStream::new(source);
    let raw = entries.next_entry().ok_or_else(|| header_error(path, "no header entry found"))?;
    let fields = decode_entry(raw, path, report);

    if !fields.contains(section) {
        return Err(header_error(path, &format!("first entry is not a `{}` section", section)));
    }
    let uid = fields
        .get_nonempty("uid")
        .ok_or_else(|| header_error(path, "missing or empty uid"))?
        .to_string();
    let script_class = fields.get_nonempty("script_class").map(str::to_string);

    Ok((uid, script_class))
}

fn header_error(path: &Path, message: &str) -> DocsError {
    DocsError::Header {
        path: path.to_path_buf(),
        message: message.to_string(),
        help: Some("every scene/resource file must start with a header entry carrying its uid".to_string()),
    }
}

/// Body pass for a scene file: re-scan from the top, resolving external
/// resources into the file's reference tables and rebuilding the node tree.
pub fn parse_scene_body(source: &str, scene: &SceneRef, lookups: &Lookups, report: &mut Report) -> Result<()> {
    let path = scene.borrow().path.clone();
    let mut entries = EntryStream::new(source);
    let mut file = scene.borrow_mut();
    let mut seen_ext_resource = false;

    while let Some(raw) = entries.next_entry() {
        let fields = decode_entry(raw, &path, report);

        if fields.contains("ext_resource") {
            let first = !seen_ext_resource;
            seen_ext_resource = true;
            resolve_ext_resource(&fields, &mut file.tables, lookups, &path, first, report)?;
        } else if fields.contains("node") {
            let name = fields.get("name").unwrap_or("");
            let node_type = node_type_of(&fields, &file.tables);

            match file.node_tree.insert(name, &node_type, fields.get("parent")) {
                Some(node) => {
                    while let Some((field_name, value)) = entries.next_continuation_field() {
                        // Plain property values flow through this same scan,
                        // so a value that is not ExtResource-shaped (or whose
                        // id hits no table) is passed over without a report.
                        if let Some(id) = strip_ext_resource(&value) {
                            if let Some(target) = file.tables.lookup(id) {
                                node.borrow_mut().ext_resource_fields.push((field_name, target.downgrade()));
                            }
                        }
                    }
                }
                None => {
                    report.push(
                        Diagnostic::warning(
                            "scenedoc::node",
                            format!("could not insert node `{}` (unknown parent or duplicate root)", name),
                        )
                        .with_path(&path)
                        .with_detail(fields.get("parent").unwrap_or("").to_string()),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Body pass for a resource file: resolve external resources, build each
/// `sub_resource` node, and build the single top-level `resource`.
pub fn parse_resource_body(
    source: &str,
    resource: &ResourceRef,
    lookups: &Lookups,
    report: &mut Report,
) -> Result<()> {
    let path = resource.borrow().path.clone();
    let mut entries = EntryStream::new(source);
    let mut file = resource.borrow_mut();
    let mut seen_ext_resource = false;

    while let Some(raw) = entries.next_entry() {
        let fields = decode_entry(raw, &path, report);

        if fields.contains("ext_resource") {
            let first = !seen_ext_resource;
            seen_ext_resource = true;
            resolve_ext_resource(&fields, &mut file.tables, lookups, &path, first, report)?;
        } else if fields.contains("sub_resource") {
            let (type_name, id) = match (fields.get_nonempty("type"), fields.get_nonempty("id")) {
                (Some(t), Some(i)) => (t.to_string(), i.to_string()),
                _ => {
                    report.push(
                        Diagnostic::warning("scenedoc::sub-resource", "skipping sub_resource without type or id")
                            .with_path(&path),
                    );
                    continue;
                }
            };

            let mut node = ResourceNode::new(type_name);
            scan_resource_fields(&mut entries, &mut node, &file.tables, &file.sub_resources);
            if file.push_sub_resource(&id, Rc::new(RefCell::new(node))).is_some() {
                report.push(duplicate_id(&path, &id));
            }
        } else if fields.contains("resource") {
            // The top-level resource; its type is implicit from the header.
            let mut node = ResourceNode::new("");
            scan_resource_fields(&mut entries, &mut node, &file.tables, &file.sub_resources);
            file.resource = Some(node);
        }
    }

    Ok(())
}

/// Read a resource entry's continuation fields, sorting each property by
/// what its value resolved to.
fn scan_resource_fields(
    entries: &mut EntryStream,
    node: &mut ResourceNode,
    tables: &RefTables,
    sub_resources: &BTreeMap<String, ResourceNodeRef>,
) {
    while let Some((name, value)) = entries.next_continuation_field() {
        if let Some(id) = strip_ext_resource(&value) {
            if let Some(target) = tables.lookup(id) {
                node.res_file_fields.push((name, target.downgrade()));
            } else if let Some(other) = tables.ext_resources_other.get(id) {
                node.res_other_fields.push((name, other.name.clone()));
            }
        } else if let Some(id) = strip_sub_resource(&value) {
            if let Some(sibling) = sub_resources.get(id) {
                node.sub_res_fields.push((name, Rc::downgrade(sibling)));
            }
        } else {
            node.fields.push((name, value));
        }
    }
}

/// Determine a node's type: explicit `type` field, an `instance` id known to
/// be a packed scene, or `"Unknown"`.
fn node_type_of(fields: &EntryFields, tables: &RefTables) -> String {
    if let Some(t) = fields.get_nonempty("type") {
        return t.to_string();
    }
    if let Some(instance) = fields.get_nonempty("instance") {
        if tables.packed_scenes.contains_key(instance) {
            return "PackedScene".to_string();
        }
    }
    "Unknown".to_string()
}

/// Dispatch one `ext_resource` entry by its declared type, resolving it into
/// the file's reference tables.
fn resolve_ext_resource(
    fields: &EntryFields,
    tables: &mut RefTables,
    lookups: &Lookups,
    file_path: &Path,
    first: bool,
    report: &mut Report,
) -> Result<()> {
    let Some(type_name) = fields.get_nonempty("type") else {
        if first {
            return Err(DocsError::Structure {
                path: file_path.to_path_buf(),
                message: "first external resource entry has no type".to_string(),
                help: Some("the reference graph is unreliable past this point".to_string()),
            });
        }
        report.push(
            Diagnostic::warning("scenedoc::ext-resource", "skipping external resource without a type")
                .with_path(file_path),
        );
        return Ok(());
    };

    match type_name {
        "PackedScene" => {
            let (Some(uid), Some(res_path), Some(id)) = (
                fields.get_nonempty("uid"),
                fields.get_nonempty("path"),
                fields.get_nonempty("id"),
            ) else {
                report.push(invalid_ext_resource(file_path, "PackedScene"));
                return Ok(());
            };

            match lookups.scenes.get(uid) {
                Some(target) => {
                    if tables.push_packed_scene(id, Rc::clone(target)).is_some() {
                        report.push(duplicate_id(file_path, id));
                    }
                }
                None => report.push(unresolved(file_path, "scene", res_path)),
            }
        }
        "Script" => {
            let (Some(res_path), Some(id)) = (fields.get_nonempty("path"), fields.get_nonempty("id")) else {
                report.push(invalid_ext_resource(file_path, "Script"));
                return Ok(());
            };

            match lookups.scripts.get(&script_key(res_path)) {
                Some(target) => {
                    if tables.push_script(id, Rc::clone(target)).is_some() {
                        report.push(duplicate_id(file_path, id));
                    }
                }
                None => report.push(unresolved(file_path, "script", res_path)),
            }
        }
        "Resource" => {
            let (Some(uid), Some(res_path), Some(id)) = (
                fields.get_nonempty("uid"),
                fields.get_nonempty("path"),
                fields.get_nonempty("id"),
            ) else {
                report.push(invalid_ext_resource(file_path, "Resource"));
                return Ok(());
            };

            match lookups.resources.get(uid) {
                Some(target) => {
                    if tables.push_ext_resource(id, Rc::clone(target)).is_some() {
                        report.push(duplicate_id(file_path, id));
                    }
                }
                None => report.push(unresolved(file_path, "resource", res_path)),
            }
        }
        // Leaf references the resolver does not recurse into.
        other => {
            let (Some(res_path), Some(id)) = (fields.get_nonempty("path"), fields.get_nonempty("id")) else {
                report.push(invalid_ext_resource(file_path, other));
                return Ok(());
            };

            if tables
                .push_ext_resource_other(id, OtherResource::new(other, res_path))
                .is_some()
            {
                report.push(duplicate_id(file_path, id));
            }
        }
    }

    Ok(())
}

fn invalid_ext_resource(path: &Path, type_name: &str) -> Diagnostic {
    Diagnostic::warning(
        "scenedoc::ext-resource",
        format!("skipping invalid external resource \"{}\"", type_name),
    )
    .with_path(path)
}

fn unresolved(path: &Path, kind: &str, res_path: &str) -> Diagnostic {
    Diagnostic::warning(
        format!("scenedoc::unresolved-{}", kind),
        format!("previously not encountered {} file", kind),
    )
    .with_path(path)
    .with_detail(res_path)
}

fn duplicate_id(path: &Path, id: &str) -> Diagnostic {
    Diagnostic::warning("scenedoc::duplicate-id", format!("local id `{}` registered twice", id))
        .with_path(path)
        .with_detail(id)
}
