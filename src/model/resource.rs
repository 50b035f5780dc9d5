//! Resource nodes built from `sub_resource` / `resource` entries.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::file::WeakFileRef;

/// Owning handle to a resource node (held by the file's sub-resource table).
pub type ResourceNodeRef = Rc<RefCell<ResourceNode>>;

/// Non-owning link to a sibling resource node.
///
/// Sub-resources may reference earlier-declared sub-resources but never
/// themselves, so these links form a DAG rooted at the file's top-level
/// resource. Ownership stays with the file's sub-resource table.
pub type WeakResourceNode = Weak<RefCell<ResourceNode>>;

/// One resource described inside a resource file, with its properties split
/// by what they resolved to.
#[derive(Debug, Default)]
pub struct ResourceNode {
    /// Declared type; empty for the top-level resource (implicit from the
    /// file header).
    pub type_name: String,
    /// Properties that resolved to another file.
    pub res_file_fields: Vec<(String, WeakFileRef)>,
    /// Properties that resolved to an unmodelled external resource, by its
    /// derived display name.
    pub res_other_fields: Vec<(String, String)>,
    /// Properties that resolved to a sibling sub-resource.
    pub sub_res_fields: Vec<(String, WeakResourceNode)>,
    /// Plain properties, raw value text preserved.
    pub fields: Vec<(String, String)>,
}

impl ResourceNode {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }
}
