use serde::Serialize;

use crate::tree::solution_node::NodeId;

/// Which nodes the user is looking at: every solution in creation order,
/// a gallery of kept solutions and a left/right comparison.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    solutions: Vec<NodeId>,
    gallery: Vec<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Workspace {
    pub fn solutions(&self) -> &[NodeId] {
        &self.solutions
    }

    pub fn gallery(&self) -> &[NodeId] {
        &self.gallery
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// New nodes land in the solution list and in the left focus.
    pub(crate) fn push(&mut self, node: NodeId) {
        self.solutions.push(node);
        self.left = Some(node);
    }

    /// `fork` takes the place of `original` wherever it was shown.
    pub(crate) fn replace_with_fork(&mut self, original: NodeId, fork: NodeId) {
        self.solutions.push(fork);
        for node in self.gallery.iter_mut().filter(|node| **node == original) {
            *node = fork;
        }
        if self.left == Some(original) {
            self.left = Some(fork);
        }
        if self.right == Some(original) {
            self.right = Some(fork);
        }
    }

    /// Returns whether the node is now in the gallery.
    pub fn toggle_in_gallery(&mut self, node: NodeId) -> bool {
        match self.gallery.iter().position(|existing| *existing == node) {
            Some(index) => {
                self.gallery.remove(index);
                false
            }
            None => {
                self.gallery.push(node);
                true
            }
        }
    }

    pub fn is_in_gallery(&self, node: NodeId) -> bool {
        self.gallery.contains(&node)
    }

    pub fn is_in_focus(&self, node: NodeId) -> bool {
        self.left == Some(node) || self.right == Some(node)
    }

    pub fn select_left(&mut self, node: NodeId) {
        self.left = Some(node);
    }

    pub fn select_right(&mut self, node: NodeId) {
        self.right = Some(node);
    }
}
