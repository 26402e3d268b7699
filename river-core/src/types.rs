/// Identifier for a node in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`. Ids are handed out in creation
/// order, so the root is always `0` and a child always has a larger id
/// than its parent.
pub type NodeId = usize;

/// Identifier for a branch produced by [`crate::post::decompose_branches`].
pub type BranchId = usize;

/// Position of a point in the input sequence.
pub type PointIndex = usize;
