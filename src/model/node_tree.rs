//! Ordered, path-addressed tree of scene nodes.
//!
//! Scene files list nodes flat, each addressing its parent by a `/`-joined
//! path of ancestor names. The tree reconstructs the hierarchy by resolving
//! that address against already-inserted nodes; insertion at an address that
//! does not exist yet is a reported no-op, never a panic.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::file::WeakFileRef;

/// Shared handle to a node in the tree.
pub type TreeNodeRef = Rc<RefCell<TreeNode>>;

/// A single node of the in-scene hierarchy.
#[derive(Debug)]
pub struct TreeNode {
    /// Node name as declared in the scene file.
    pub name: String,
    /// Node type (engine class name, `"PackedScene"`, or `"Unknown"`).
    pub node_type: String,
    /// `/`-joined sequence of ancestor names. This is the addressing key for
    /// parent lookup during insertion, not a filesystem path.
    pub path: String,
    /// 1 for the root, incrementing by 1 per level.
    pub depth: usize,
    /// Non-owning link back to the parent; empty for the root.
    pub parent: Weak<RefCell<TreeNode>>,
    /// Children in insertion order.
    pub children: Vec<TreeNodeRef>,
    /// Per-node properties that resolved to an external file, for rendering.
    pub ext_resource_fields: Vec<(String, WeakFileRef)>,
}

/// The node hierarchy of one scene file.
#[derive(Debug, Default)]
pub struct NodeTree {
    root: Option<TreeNodeRef>,
}

impl NodeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root node, if one has been inserted.
    pub fn root(&self) -> Option<&TreeNodeRef> {
        self.root.as_ref()
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a node under the parent addressed by `parent`.
    ///
    /// `None` creates the root (fails if one exists already). `"."` is a
    /// shortcut for "child of root". Any other address is resolved by a
    /// pre-order scan comparing node paths; a miss returns `None` without
    /// touching the tree. Re-insertion at an identical path is accepted and
    /// appended as an additional sibling.
    pub fn insert(&mut self, name: &str, node_type: &str, parent: Option<&str>) -> Option<TreeNodeRef> {
        let Some(parent) = parent else {
            if self.root.is_some() {
                return None;
            }
            let node = Rc::new(RefCell::new(TreeNode {
                name: name.to_string(),
                node_type: node_type.to_string(),
                path: name.to_string(),
                depth: 1,
                parent: Weak::new(),
                children: Vec::new(),
                ext_resource_fields: Vec::new(),
            }));
            self.root = Some(Rc::clone(&node));
            return Some(node);
        };

        let root = Rc::clone(self.root.as_ref()?);
        let parent_node = if parent == "." {
            root
        } else {
            let parent_path = format!("{}/{}", root.borrow().path, parent);
            self.iter().find(|n| n.borrow().path == parent_path)?
        };

        let (path, depth) = {
            let p = parent_node.borrow();
            (format!("{}/{}", p.path, name), p.depth + 1)
        };
        let node = Rc::new(RefCell::new(TreeNode {
            name: name.to_string(),
            node_type: node_type.to_string(),
            path,
            depth,
            parent: Rc::downgrade(&parent_node),
            children: Vec::new(),
            ext_resource_fields: Vec::new(),
        }));
        parent_node.borrow_mut().children.push(Rc::clone(&node));
        Some(node)
    }

    /// Pre-order, depth-first traversal; children in insertion order.
    pub fn iter(&self) -> PreOrder {
        PreOrder {
            stack: self.root.iter().map(Rc::clone).collect(),
        }
    }
}

/// Iterative pre-order walker with an explicit stack, so arbitrarily deep
/// hierarchies cannot overflow the call stack.
#[derive(Debug)]
pub struct PreOrder {
    stack: Vec<TreeNodeRef>,
}

impl Iterator for PreOrder {
    type Item = TreeNodeRef;

    fn next(&mut self) -> Option<TreeNodeRef> {
        let node = self.stack.pop()?;
        {
            let borrowed = node.borrow();
            for child in borrowed.children.iter().rev() {
                self.stack.push(Rc::clone(child));
            }
        }
        Some(node)
    }
}
