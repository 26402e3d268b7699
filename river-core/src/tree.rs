use crate::types::{BranchId, NodeId};
use glam::Vec2;

#[derive(Debug, Clone)]
pub struct RiverNode {
    pub pos: Vec2,
    pub parent: Option<NodeId>,
    /// Children in discovery order.
    pub children: Vec<NodeId>,
    /// Confluence order, set by [`crate::post::assign_widths`].
    pub width: Option<u32>,
    /// Owning branch, set by [`crate::post::decompose_branches`].
    pub branch: Option<BranchId>,
}

/// Arena-backed river network. Node `0` is the root (the mouth); nodes are
/// only ever appended, never removed or re-parented.
#[derive(Debug, Clone)]
pub struct Tree {
    pub nodes: Vec<RiverNode>,
}

impl RiverNode {
    pub fn new_root(pos: Vec2) -> Self {
        Self {
            pos,
            parent: None,
            children: Vec::with_capacity(2),
            width: None,
            branch: None,
        }
    }

    pub fn new_child(pos: Vec2, parent: NodeId) -> Self {
        Self {
            pos,
            parent: Some(parent),
            children: Vec::with_capacity(2),
            width: None,
            branch: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new(root_pos: Vec2) -> Self {
        Self {
            nodes: vec![RiverNode::new_root(root_pos)],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &RiverNode {
        &self.nodes[Self::ROOT]
    }

    pub fn add_child(&mut self, parent: NodeId, pos: Vec2) -> NodeId {
        let id: usize = self.nodes.len();
        self.nodes.push(RiverNode::new_child(pos, parent));
        self.nodes[parent].children.push(id);
        id
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, mut id: NodeId) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.nodes[id].parent {
            depth += 1;
            id = parent;
        }
        depth
    }

    /// Every `(parent, child)` edge, ordered by child id.
    pub fn edges<'a>(&'a self) -> impl Iterator<Item = (NodeId, NodeId)> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.parent.map(|p| (p, id)))
    }

    /// Node ids with every parent before its children, siblings in
    /// discovery order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }

        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Node ids with every child before its parent, siblings in
    /// discovery order.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }

        // (node, children already expanded)
        let mut stack = vec![(Self::ROOT, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
            } else {
                stack.push((id, true));
                stack.extend(self.nodes[id].children.iter().rev().map(|&c| (c, false)));
            }
        }
        order
    }

    /// Node count of the subtree rooted at each node, indexed by id.
    pub fn subtree_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![1; self.nodes.len()];
        for id in self.post_order() {
            if let Some(parent) = self.nodes[id].parent {
                sizes[parent] += sizes[id];
            }
        }
        sizes
    }
}
