//! BSP tree node data structure

use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;

/// A BSP tree node, containing polygons plus optional front/back subtrees.
///
/// Children are exclusively owned, so a tree is a plain recursive value with
/// no sharing and no cycles.
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node *or* **None** for an empty tree.
    pub plane: Option<Plane>,

    /// Subtree for the *front* half‑space.
    pub front: Option<Box<Node<S>>>,

    /// Subtree for the *back* half‑space.
    pub back: Option<Box<Node<S>>>,

    /// Polygons that lie on `plane` (after the node has been built).
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone> Default for Node<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone> Node<S> {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// `true` for a node that has never been given a plane.
    pub const fn is_empty(&self) -> bool {
        self.plane.is_none()
    }

    /// `true` when neither child exists.
    pub const fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let front = self.front.as_ref().map_or(0, |n| n.depth());
        let back = self.back.as_ref().map_or(0, |n| n.depth());
        1 + front.max(back)
    }
}
