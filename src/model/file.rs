//! File objects and cross-file reference tables.
//!
//! The three file kinds are a closed set resolved once at construction;
//! heterogeneous links between them go through [`FileRef`] / [`WeakFileRef`]
//! rather than per-operation downcasts.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use super::node_tree::NodeTree;
use super::resource::{ResourceNode, ResourceNodeRef};
use super::script_class::ScriptClass;

/// Shared handle to a scene file.
pub type SceneRef = Rc<RefCell<SceneFile>>;
/// Shared handle to a resource file.
pub type ResourceRef = Rc<RefCell<ResourceFile>>;
/// Shared handle to a script file.
pub type ScriptRef = Rc<RefCell<ScriptFile>>;

/// An owning reference to a file of any kind.
#[derive(Debug, Clone)]
pub enum FileRef {
    Scene(SceneRef),
    Resource(ResourceRef),
    Script(ScriptRef),
}

impl FileRef {
    /// Downgrade to a non-owning handle for rendering links.
    pub fn downgrade(&self) -> WeakFileRef {
        match self {
            FileRef::Scene(f) => WeakFileRef::Scene(Rc::downgrade(f)),
            FileRef::Resource(f) => WeakFileRef::Resource(Rc::downgrade(f)),
            FileRef::Script(f) => WeakFileRef::Script(Rc::downgrade(f)),
        }
    }

    /// Filesystem path of the referenced file.
    pub fn path(&self) -> PathBuf {
        match self {
            FileRef::Scene(f) => f.borrow().path.clone(),
            FileRef::Resource(f) => f.borrow().path.clone(),
            FileRef::Script(f) => f.borrow().path.clone(),
        }
    }
}

/// A non-owning reference to a file of any kind.
///
/// Must never keep a file alive and must be upgraded before use; a dangling
/// handle is silently skipped by rendering (the target may legitimately have
/// failed parsing and never been registered).
#[derive(Debug, Clone)]
pub enum WeakFileRef {
    Scene(Weak<RefCell<SceneFile>>),
    Resource(Weak<RefCell<ResourceFile>>),
    Script(Weak<RefCell<ScriptFile>>),
}

impl WeakFileRef {
    /// Check liveness and recover the owning handle.
    pub fn upgrade(&self) -> Option<FileRef> {
        match self {
            WeakFileRef::Scene(f) => f.upgrade().map(FileRef::Scene),
            WeakFileRef::Resource(f) => f.upgrade().map(FileRef::Resource),
            WeakFileRef::Script(f) => f.upgrade().map(FileRef::Script),
        }
    }
}

/// Derived display title: the file name component of a path.
pub fn title_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// An external resource of a kind the resolver does not model structurally
/// (textures, audio, fonts and the like). Kept as a leaf reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherResource {
    /// Declared resource type, e.g. `Texture2D`.
    pub type_name: String,
    /// Root-relative source path as written in the file.
    pub path: String,
    /// Display name derived from the path's file name component.
    pub name: String,
}

impl OtherResource {
    pub fn new(type_name: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self {
            type_name: type_name.into(),
            path,
            name,
        }
    }
}

/// Reference tables shared by scene and resource files, keyed by the in-file
/// local id used by `ExtResource` tokens.
///
/// Local ids are unique within one file; re-registering an id overwrites the
/// previous entry (the `push_*` methods surface the replaced value so the
/// resolver can report the anomaly).
#[derive(Debug, Default)]
pub struct RefTables {
    pub packed_scenes: BTreeMap<String, SceneRef>,
    pub scripts: BTreeMap<String, ScriptRef>,
    pub ext_resources: BTreeMap<String, ResourceRef>,
    pub ext_resources_other: BTreeMap<String, OtherResource>,
}

impl RefTables {
    pub fn push_packed_scene(&mut self, id: impl Into<String>, scene: SceneRef) -> Option<SceneRef> {
        self.packed_scenes.insert(id.into(), scene)
    }

    pub fn push_script(&mut self, id: impl Into<String>, script: ScriptRef) -> Option<ScriptRef> {
        self.scripts.insert(id.into(), script)
    }

    pub fn push_ext_resource(&mut self, id: impl Into<String>, resource: ResourceRef) -> Option<ResourceRef> {
        self.ext_resources.insert(id.into(), resource)
    }

    pub fn push_ext_resource_other(&mut self, id: impl Into<String>, other: OtherResource) -> Option<OtherResource> {
        self.ext_resources_other.insert(id.into(), other)
    }

    /// Resolve a local id against, in order, packed scenes, scripts, then
    /// modelled external resources.
    pub fn lookup(&self, id: &str) -> Option<FileRef> {
        if let Some(scene) = self.packed_scenes.get(id) {
            return Some(FileRef::Scene(Rc::clone(scene)));
        }
        if let Some(script) = self.scripts.get(id) {
            return Some(FileRef::Script(Rc::clone(script)));
        }
        if let Some(resource) = self.ext_resources.get(id) {
            return Some(FileRef::Resource(Rc::clone(resource)));
        }
        None
    }
}

/// A `.tscn` scene file.
#[derive(Debug)]
pub struct SceneFile {
    /// Filesystem path, normalized at construction. Immutable.
    pub path: PathBuf,
    /// File name, used as the display title.
    pub title: String,
    /// Project-global identifier, set by the header pass.
    pub uid: String,
    /// External references declared by the file body.
    pub tables: RefTables,
    /// Reconstructed in-scene hierarchy.
    pub node_tree: NodeTree,
}

impl SceneFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = title_of(&path);
        Self {
            path,
            title,
            uid: String::new(),
            tables: RefTables::default(),
            node_tree: NodeTree::new(),
        }
    }
}

/// A `.tres` resource file.
#[derive(Debug)]
pub struct ResourceFile {
    /// Filesystem path, normalized at construction. Immutable.
    pub path: PathBuf,
    /// File name, used as the display title.
    pub title: String,
    /// Project-global identifier, set by the header pass.
    pub uid: String,
    /// Optional script class name captured from the header.
    pub script_class: Option<String>,
    /// External references declared by the file body.
    pub tables: RefTables,
    /// Sub-resources by local id. This table is the sole owner of every
    /// sub-resource node; `sub_res_fields` links are weak.
    pub sub_resources: BTreeMap<String, ResourceNodeRef>,
    /// The single top-level resource the file describes.
    pub resource: Option<ResourceNode>,
}

impl ResourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = title_of(&path);
        Self {
            path,
            title,
            uid: String::new(),
            script_class: None,
            tables: RefTables::default(),
            sub_resources: BTreeMap::new(),
            resource: None,
        }
    }

    pub fn push_sub_resource(&mut self, id: impl Into<String>, node: ResourceNodeRef) -> Option<ResourceNodeRef> {
        self.sub_resources.insert(id.into(), node)
    }
}

/// A `.gd` / `.cs` script file.
#[derive(Debug)]
pub struct ScriptFile {
    /// Filesystem path, normalized at construction. Immutable.
    pub path: PathBuf,
    /// File name, used as the display title.
    pub title: String,
    /// Documentation model extracted from annotated comments.
    pub class: ScriptClass,
}

impl ScriptFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = title_of(&path);
        Self {
            path,
            title,
            class: ScriptClass::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_file_name() {
        let scene = SceneFile::new("levels/Hub.tscn");
        assert_eq!(scene.title, "Hub.tscn");

        let script = ScriptFile::new("scripts/player.gd");
        assert_eq!(script.title, "player.gd");
    }

    #[test]
    fn test_other_resource_name_derived_from_path() {
        let other = OtherResource::new("Texture2D", "art/sprites/hank.png");
        assert_eq!(other.name, "hank.png");
        assert_eq!(other.type_name, "Texture2D");
    }

    #[test]
    fn test_lookup_priority_order() {
        let scene = Rc::new(RefCell::new(SceneFile::new("a.tscn")));
        let script = Rc::new(RefCell::new(ScriptFile::new("a.gd")));

        let mut tables = RefTables::default();
        tables.push_script("1", Rc::clone(&script));
        tables.push_packed_scene("1", Rc::clone(&scene));

        // Packed scenes shadow scripts under the same id.
        match tables.lookup("1") {
            Some(FileRef::Scene(f)) => assert_eq!(f.borrow().title, "a.tscn"),
            other => panic!("expected scene, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_miss() {
        let tables = RefTables::default();
        assert!(tables.lookup("99").is_none());
    }

    #[test]
    fn test_duplicate_id_overwrites_and_reports_previous() {
        let a = Rc::new(RefCell::new(SceneFile::new("a.tscn")));
        let b = Rc::new(RefCell::new(SceneFile::new("b.tscn")));

        let mut tables = RefTables::default();
        assert!(tables.push_packed_scene("1", Rc::clone(&a)).is_none());
        let previous = tables.push_packed_scene("1", Rc::clone(&b));

        assert!(previous.is_some());
        assert_eq!(tables.packed_scenes.get("1").unwrap().borrow().title, "b.tscn");
    }

    #[test]
    fn test_weak_ref_does_not_keep_file_alive() {
        let weak = {
            let scene = Rc::new(RefCell::new(SceneFile::new("a.tscn")));
            FileRef::Scene(scene).downgrade()
        };
        assert!(weak.upgrade().is_none());
    }
}
