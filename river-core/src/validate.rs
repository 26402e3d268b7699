//! Post-hoc self-intersection check.
//!
//! Growth itself does not guarantee a crossing-free network. This scan
//! compares every pair of edges and only reports what it finds.

use crate::{geometry::intersection_point, tree::Tree, types::NodeId};
use glam::Vec2;
use tracing::warn;

/// Two network edges that cross, each given as `(parent, child)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    pub first: (NodeId, NodeId),
    pub second: (NodeId, NodeId),
    pub at: Vec2,
}

/// Every crossing between edges that share no node. Quadratic in the
/// number of edges.
pub fn find_crossings(tree: &Tree) -> Vec<Crossing> {
    let edges: Vec<(NodeId, NodeId)> = tree.edges().collect();
    let mut crossings = Vec::new();

    for (i, &(a, b)) in edges.iter().enumerate() {
        for &(c, d) in &edges[i + 1..] {
            if a == c || a == d || b == c || b == d {
                continue;
            }

            let hit = intersection_point(
                tree.nodes[a].pos,
                tree.nodes[b].pos,
                tree.nodes[c].pos,
                tree.nodes[d].pos,
            );
            if let Some(at) = hit {
                warn!(?at, first = ?(a, b), second = ?(c, d), "network edges cross");
                crossings.push(Crossing {
                    first: (a, b),
                    second: (c, d),
                    at,
                });
            }
        }
    }

    crossings
}
