//! Confinement regions: where the next growth step may pick its points.
//!
//! Every committed growth step records a [`LimitLine`] from the mouth to
//! the new node. The latest two lines decide whether growth is sweeping
//! left or right; the allowed region is the part of the basin on that
//! side of the latest line. Because the region is the basin clipped by a
//! half-plane it is convex, so the midpoint of two points inside it stays
//! inside it.

use crate::{
    error::{GrowthError, GrowthResult},
    geometry::{Basin, Line, Polygon, intersection_point},
    types::NodeId,
};
use glam::Vec2;

/// Boundary line recorded for a growth step: from the mouth through
/// the position of `node`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimitLine {
    pub line: Line,
    pub node: NodeId,
}

impl LimitLine {
    pub fn new(mouth: Vec2, node_pos: Vec2, node: NodeId) -> Self {
        Self {
            line: Line::through(mouth, node_pos),
            node,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

/// Direction of travel from `prev` to `latest`, both rays from the mouth.
///
/// Counter-clockwise (y up) is `Left`. Collinear rays count as `Left`.
pub fn turn_between(prev: &Line, latest: &Line) -> Turn {
    if prev.dir.perp_dot(latest.dir) >= 0.0 {
        Turn::Left
    } else {
        Turn::Right
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BasinEdge {
    Left,
    Top,
    Right,
}

/// First crossing of the ray `mouth + t * dir` (`t > 0`) with the left,
/// top or right basin edge. Ties at a corner keep the edge listed first.
pub fn boundary_hit(basin: &Basin, dir: Vec2) -> Option<(Vec2, BasinEdge)> {
    if dir == Vec2::ZERO {
        return None;
    }

    let mouth = basin.mouth();
    let reach = 2.0 * (basin.width + basin.height) / dir.length();
    let far = mouth + dir * reach;

    let edges = [
        (basin.bottom_left(), basin.top_left(), BasinEdge::Left),
        (basin.top_left(), basin.top_right(), BasinEdge::Top),
        (basin.top_right(), basin.bottom_right(), BasinEdge::Right),
    ];

    let mut best: Option<(Vec2, BasinEdge, f32)> = None;
    for (a, b, edge) in edges {
        let Some(hit) = intersection_point(mouth, far, a, b) else {
            continue;
        };
        let d2 = hit.distance_squared(mouth);
        if d2 == 0.0 {
            continue;
        }
        if best.is_none_or(|(_, _, bd)| d2 < bd) {
            best = Some((hit, edge, d2));
        }
    }

    best.map(|(hit, edge, _)| (hit, edge))
}

/// Builds the confinement polygon from the two most recent limit lines.
///
/// The polygon starts at the mouth, runs along the latest limit line to
/// the basin boundary and then follows the boundary on the turn side back
/// to the bottom edge.
pub fn find_area(limits: &[LimitLine], basin: &Basin) -> GrowthResult<Polygon> {
    let [.., prev, latest] = limits else {
        return Err(GrowthError::GeometryInvariantViolation {
            reason: format!("need two limit lines, have {}", limits.len()),
        });
    };

    let turn = turn_between(&prev.line, &latest.line);
    let (hit, edge) = boundary_hit(basin, latest.line.dir).ok_or_else(|| {
        GrowthError::GeometryInvariantViolation {
            reason: format!(
                "limit line towards node {} does not reach the basin boundary",
                latest.node
            ),
        }
    })?;

    let corners = match (turn, edge) {
        (Turn::Left, BasinEdge::Right) => vec![basin.top_right(), basin.top_left(), basin.bottom_left()],
        (Turn::Left, BasinEdge::Top) => vec![basin.top_left(), basin.bottom_left()],
        (Turn::Left, BasinEdge::Left) => vec![basin.bottom_left()],
        (Turn::Right, BasinEdge::Left) => vec![basin.top_left(), basin.top_right(), basin.bottom_right()],
        (Turn::Right, BasinEdge::Top) => vec![basin.top_right(), basin.bottom_right()],
        (Turn::Right, BasinEdge::Right) => vec![basin.bottom_right()],
    };

    let mut polygon = Vec::with_capacity(2 + corners.len());
    polygon.push(basin.mouth());
    polygon.push(hit);
    polygon.extend(corners.into_iter().filter(|&c| c != hit));
    Ok(polygon)
}
