//! Data model for the resolved documentation graph.
//!
//! Project-wide registries hold the sole shared owners of every file object;
//! all links that exist purely so rendering can reach through to another file
//! or sibling resource are weak handles checked for liveness at use time.

pub mod file;
pub mod node_tree;
pub mod resource;
pub mod script_class;

pub use file::{
    title_of, FileRef, OtherResource, RefTables, ResourceFile, ResourceRef, SceneFile, SceneRef,
    ScriptFile, ScriptRef, WeakFileRef,
};
pub use node_tree::{NodeTree, PreOrder, TreeNode, TreeNodeRef};
pub use resource::{ResourceNode, ResourceNodeRef, WeakResourceNode};
pub use script_class::{ExportCategory, Function, ScriptClass, Variable};
