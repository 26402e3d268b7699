use crate::{
    geometry::Basin,
    types::{NodeId, PointIndex},
};
use glam::Vec2;
use rand::Rng;

/// How a pending point left the pending set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumption {
    /// Paired and merged into the node with this id.
    Paired(NodeId),
    /// Dropped as an unpaired remainder.
    Discarded,
    /// The mouth placeholder, never a growth candidate.
    Mouth,
}

#[derive(Clone, Debug)]
pub struct PendingPoint {
    pub pos: Vec2,
    pub consumed: Option<Consumption>,
}

impl PendingPoint {
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.consumed.is_none()
    }
}

/// Input points of a run, keyed by their input index.
///
/// Points are never removed from the vector; consuming a point only
/// stamps it with a [`Consumption`], so indices stay valid for the whole
/// run and duplicate coordinates cannot be confused with each other.
#[derive(Clone, Debug)]
pub struct PendingPoints {
    pub points: Vec<PendingPoint>,
}

impl PendingPoints {
    pub fn from_positions(positions: Vec<Vec2>) -> Self {
        let points = positions
            .into_iter()
            .map(|pos| PendingPoint {
                pos,
                consumed: None,
            })
            .collect();

        Self { points }
    }

    /// Generates a point set for `basin`: the mouth at index 0 followed by
    /// up to `count - 1` random points. Exact duplicates are dropped, so
    /// the result may hold fewer than `count` points.
    pub fn random_in_basin(basin: Basin, count: usize, rng: &mut impl Rng) -> Self {
        let mut positions = Vec::with_capacity(count);
        positions.push(basin.mouth());
        for _ in 1..count {
            let p = basin.sample(rng);
            if !positions.contains(&p) {
                positions.push(p);
            }
        }

        Self::from_positions(positions)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn pos(&self, index: PointIndex) -> Vec2 {
        self.points[index].pos
    }

    /// Indices of points still pending, in input order.
    pub fn pending_indices<'a>(&'a self) -> impl Iterator<Item = PointIndex> + 'a {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| if p.is_pending() { Some(i) } else { None })
    }

    pub fn pending_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_pending()).count()
    }

    pub fn has_pending(&self) -> bool {
        self.points.iter().any(|p| p.is_pending())
    }

    /// Marks a pending point as consumed. Returns `false` if it was
    /// already consumed, leaving the earlier stamp untouched.
    pub fn consume(&mut self, index: PointIndex, how: Consumption) -> bool {
        let point = &mut self.points[index];
        if point.is_pending() {
            point.consumed = Some(how);
            true
        } else {
            false
        }
    }

    /// Stamps every pending point located exactly at `pos` as the mouth
    /// placeholder. Returns how many were stamped.
    pub fn retire_mouth(&mut self, pos: Vec2) -> usize {
        let mut n = 0;
        for p in self.points.iter_mut().filter(|p| p.is_pending()) {
            if p.pos == pos {
                p.consumed = Some(Consumption::Mouth);
                n += 1;
            }
        }
        n
    }

    /// Number of points consumed by pairing or discarding; the mouth
    /// placeholder does not count.
    pub fn consumed_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| matches!(p.consumed, Some(Consumption::Paired(_) | Consumption::Discarded)))
            .count()
    }
}
