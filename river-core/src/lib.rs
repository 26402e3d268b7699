//! Procedural drainage-network growth inside a rectangular basin.
//!
//! Main components:
//! - [`geometry`] - lines, segment intersection, point-in-polygon, the basin.
//! - [`selector`] - nearest-pair selection around the growth tip.
//! - [`region`] - confinement regions built from the limit-line stack.
//! - [`growth`] - the growth state machine with explicit backtracking.
//! - [`post`] - widths, branch decomposition and renderer records.
//! - [`validate`] - post-hoc edge crossing scan.
//! - [`pending`] - input points and their consumption ledger.
//! - [`tree`] - arena tree of network nodes.
//! - [`config`] - run configuration and policies.
//! - [`error`] - growth failures.
//! - [`types`] - shared type aliases and IDs.

pub mod config;
pub mod error;
pub mod geometry;
pub mod growth;
pub mod pending;
pub mod post;
pub mod region;
pub mod selector;
pub mod tree;
pub mod types;
pub mod validate;
