//! Annotations computed over a finished network for its renderers.

use crate::{
    config::Config,
    error::GrowthResult,
    growth::{Growth, grow},
    pending::PendingPoints,
    tree::Tree,
    types::{BranchId, NodeId},
};
use glam::Vec2;
use rand::Rng;

/// Sets `width` on every node, bottom-up.
///
/// Leaves get width `1`. An inner node takes the largest child width, plus
/// one when at least two children share that largest width.
pub fn assign_widths(tree: &mut Tree) {
    for id in tree.post_order() {
        let mut max = 0;
        let mut at_max = 0;
        for &child in &tree.nodes[id].children {
            let w = tree.nodes[child].width.unwrap_or(1);
            if w > max {
                max = w;
                at_max = 1;
            } else if w == max {
                at_max += 1;
            }
        }

        let width = match at_max {
            0 => 1,
            1 => max,
            _ => max + 1,
        };
        tree.nodes[id].width = Some(width);
    }
}

/// Splits the network into maximal paths and tags every node with its
/// branch.
///
/// A branch continues into the child with the largest subtree (the first
/// such child on ties); every other child opens a new branch. Branch `0`
/// starts at the root. Each returned branch lists its node ids from the
/// end nearest the mouth outwards.
pub fn decompose_branches(tree: &mut Tree) -> Vec<Vec<NodeId>> {
    let mut branches: Vec<Vec<NodeId>> = Vec::new();
    if tree.is_empty() {
        return branches;
    }

    let sizes = tree.subtree_sizes();
    // (node, branch it continues; `None` opens a new one)
    let mut stack: Vec<(NodeId, Option<BranchId>)> = vec![(Tree::ROOT, None)];

    while let Some((id, branch)) = stack.pop() {
        let branch = branch.unwrap_or_else(|| {
            branches.push(Vec::new());
            branches.len() - 1
        });
        branches[branch].push(id);
        tree.nodes[id].branch = Some(branch);

        let children = &tree.nodes[id].children;
        let Some(successor) = children
            .iter()
            .copied()
            .reduce(|best, c| if sizes[c] > sizes[best] { c } else { best })
        else {
            continue;
        };

        stack.extend(
            children
                .iter()
                .rev()
                .filter(|&&c| c != successor)
                .map(|&c| (c, None)),
        );
        stack.push((successor, Some(branch)));
    }

    branches
}

/// Per-node view handed to renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub pos: Vec2,
    pub parent: Option<NodeId>,
    pub width: u32,
    pub branch: BranchId,
}

/// A grown network with widths and branches assigned.
#[derive(Debug, Clone)]
pub struct RiverNetwork {
    pub tree: Tree,
    pub branches: Vec<Vec<NodeId>>,
    pub pending: PendingPoints,
    pub iterations: usize,
}

impl RiverNetwork {
    pub fn from_growth(growth: Growth) -> Self {
        let Growth {
            mut tree,
            pending,
            iterations,
        } = growth;

        assign_widths(&mut tree);
        let branches = decompose_branches(&mut tree);

        Self {
            tree,
            branches,
            pending,
            iterations,
        }
    }

    /// Grows and annotates a network in one go.
    pub fn grow(points: Vec<Vec2>, cfg: &Config, rng: &mut impl Rng) -> GrowthResult<Self> {
        grow(points, cfg, rng).map(Self::from_growth)
    }

    pub fn records<'a>(&'a self) -> impl Iterator<Item = NodeRecord> + 'a {
        self.tree.nodes.iter().enumerate().map(|(id, n)| NodeRecord {
            id,
            pos: n.pos,
            parent: n.parent,
            width: n.width.unwrap_or(1),
            branch: n.branch.unwrap_or(0),
        })
    }

    pub fn branches(&self) -> &[Vec<NodeId>] {
        &self.branches
    }

    /// Width at the mouth, the largest in the network.
    pub fn max_width(&self) -> u32 {
        self.tree.root().width.unwrap_or(1)
    }
}
