//! The network growth state machine.
//!
//! A run starts from the mouth, pairs the two input points closest to it
//! and places the first node at their midpoint. Every later step:
//! 1. Computes the confinement region from the latest two [`LimitLine`]s
//!    (skipped while only one line exists).
//! 2. Pairs the two eligible pending points nearest to the growth tip and
//!    grows a node at their midpoint, or
//! 3. Backtracks to the parent of the tip when the region holds no
//!    eligible point.
//!
//! Backtracking is an explicit stack of limit lines, one per node on the
//! path from the first node to the tip, so deep networks need no recursion.

use crate::{
    config::{Config, LonePointPolicy},
    error::{GrowthError, GrowthResult},
    geometry::{Polygon, point_in_polygon},
    pending::{Consumption, PendingPoints},
    region::{LimitLine, find_area},
    selector::{Candidate, nearest_two},
    tree::Tree,
    types::{NodeId, PointIndex},
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, info, trace, warn};

/// Outcome of a single [`GrowthEngine::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A node was grown with this id.
    Grew(NodeId),
    /// The tip moved back to this node.
    Backtracked(NodeId),
    /// A lone point was dropped as an unpaired remainder.
    Discarded(PointIndex),
    /// Nothing left to do.
    Finished,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct Growth {
    pub tree: Tree,
    /// Every input point with its consumption stamp.
    pub pending: PendingPoints,
    pub iterations: usize,
}

#[derive(Debug)]
pub struct GrowthEngine {
    cfg: Config,
    tree: Tree,
    pending: PendingPoints,
    limits: Vec<LimitLine>,
    current: NodeId,
    iterations: usize,
    limit: usize,
    finished: bool,
}

impl GrowthEngine {
    /// Seeds a run: root at the mouth, first node at the midpoint of the two
    /// input points closest to the mouth.
    ///
    /// Input points equal to the mouth are treated as the mouth placeholder
    /// and never become growth candidates.
    ///
    /// ### Parameters
    /// - `points` - Input points; by convention index `0` is the mouth.
    /// - `cfg` - Basin and policy configuration for the whole run.
    ///
    /// ### Errors
    /// [`GrowthError::InsufficientCandidates`] if fewer than two input points
    /// differ from the mouth.
    pub fn new(points: Vec<Vec2>, cfg: Config) -> GrowthResult<Self> {
        let mouth = cfg.basin.mouth();
        let limit = cfg.iteration_limit(points.len());
        let pending = PendingPoints::from_positions(points);

        let mut engine = Self {
            cfg,
            tree: Tree::new(mouth),
            pending,
            limits: Vec::new(),
            current: Tree::ROOT,
            iterations: 0,
            limit,
            finished: false,
        };

        let all = engine.candidates(|_| true);
        let (a, b) = nearest_two(&all, mouth)?;
        engine.pending.retire_mouth(mouth);
        engine.commit(a, b);
        Ok(engine)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn pending(&self) -> &PendingPoints {
        &self.pending
    }

    pub fn limits(&self) -> &[LimitLine] {
        &self.limits
    }

    /// Current growth tip.
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The region the next step would select from, if one applies.
    pub fn region(&self) -> Option<Polygon> {
        if self.limits.len() < 2 {
            return None;
        }
        find_area(&self.limits, &self.cfg.basin).ok()
    }

    /// Advances the state machine by one transition.
    ///
    /// ### Parameters
    /// - `rng` - Source for synthesized partner points; pass a seeded
    ///   generator for reproducible runs.
    ///
    /// ### Returns
    /// The transition that was taken. Once [`Step::Finished`] is returned,
    /// further calls keep returning it.
    pub fn step(&mut self, rng: &mut impl Rng) -> GrowthResult<Step> {
        if self.finished {
            return Ok(Step::Finished);
        }

        let remaining = self.pending.pending_count();
        if remaining == 0 {
            return Ok(self.finish());
        }

        self.iterations += 1;
        if self.iterations > self.limit {
            return Err(GrowthError::IterationLimit { limit: self.limit });
        }

        let tip = self.tree.nodes[self.current].pos;

        let (a, b) = if self.limits.len() == 1 {
            if remaining == 1 {
                debug!("one point left with no established direction, stopping");
                return Ok(self.finish());
            }
            let all = self.candidates(|_| true);
            nearest_two(&all, tip)?
        } else {
            let region = match find_area(&self.limits, &self.cfg.basin) {
                Ok(region) => region,
                Err(err) if !self.cfg.strict_geometry => {
                    warn!(node = self.current, %err, "treating unbuildable region as empty");
                    return self.backtrack();
                }
                Err(err) => return Err(err),
            };

            let mut eligible = self.candidates(|p| p != tip && point_in_polygon(p, &region));
            match eligible.len() {
                0 => return self.backtrack(),
                1 => match self.cfg.lone_point {
                    LonePointPolicy::Synthesize => {
                        let partner = self.synthesize(&region, tip, rng)?;
                        eligible.push(partner);
                    }
                    LonePointPolicy::Discard => {
                        let index = eligible[0]
                            .index
                            .ok_or(GrowthError::InsufficientCandidates { found: 0 })?;
                        self.pending.consume(index, Consumption::Discarded);
                        debug!(index, "discarded lone point in region");
                        return Ok(Step::Discarded(index));
                    }
                },
                _ => {}
            }
            nearest_two(&eligible, tip)?
        };

        Ok(Step::Grew(self.commit(a, b)))
    }

    /// Runs the state machine to completion.
    pub fn run(mut self, rng: &mut impl Rng) -> GrowthResult<Growth> {
        while self.step(rng)? != Step::Finished {}

        info!(
            nodes = self.tree.len(),
            consumed = self.pending.consumed_count(),
            left_over = self.pending.pending_count(),
            iterations = self.iterations,
            "river network grown"
        );

        Ok(self.into_growth())
    }

    /// Hands over the tree and ledger as they stand, finished or not.
    pub fn into_growth(self) -> Growth {
        Growth {
            tree: self.tree,
            pending: self.pending,
            iterations: self.iterations,
        }
    }

    fn finish(&mut self) -> Step {
        self.finished = true;
        Step::Finished
    }

    /// Pending points accepted by `keep`, in input order.
    fn candidates(&self, keep: impl Fn(Vec2) -> bool) -> Vec<Candidate> {
        self.pending
            .pending_indices()
            .map(|i| Candidate::pending(i, self.pending.pos(i)))
            .filter(|c| keep(c.pos))
            .collect()
    }

    /// Grows a node at the midpoint of `a` and `b` under the current tip.
    fn commit(&mut self, a: Candidate, b: Candidate) -> NodeId {
        let mid = (a.pos + b.pos) * 0.5;
        let id = self.tree.add_child(self.current, mid);
        self.limits.push(LimitLine::new(self.cfg.basin.mouth(), mid, id));

        for index in [a.index, b.index].into_iter().flatten() {
            self.pending.consume(index, Consumption::Paired(id));
        }

        trace!(id, parent = self.current, x = mid.x, y = mid.y, "grew node");
        self.current = id;
        id
    }

    fn backtrack(&mut self) -> GrowthResult<Step> {
        let parent = self.tree.nodes[self.current]
            .parent
            .ok_or(GrowthError::TreeExhausted)?;
        if self.limits.pop().is_none() {
            return Err(GrowthError::TreeExhausted);
        }

        debug!(from = self.current, to = parent, "backtracking");
        self.current = parent;
        Ok(Step::Backtracked(parent))
    }

    /// Rejection-samples a point inside `region` to pair with a lone
    /// pending point.
    fn synthesize(
        &self,
        region: &[Vec2],
        tip: Vec2,
        rng: &mut impl Rng,
    ) -> GrowthResult<Candidate> {
        let attempts = self.cfg.synthesis_attempts;
        for attempt in 0..attempts {
            let p = self.cfg.basin.sample(rng);
            if p != tip && point_in_polygon(p, region) {
                debug!(attempt, x = p.x, y = p.y, "synthesized partner point");
                return Ok(Candidate::synthesized(p));
            }
        }
        Err(GrowthError::AreaDegenerate { attempts })
    }
}

/// Grows a complete network from `points`.
///
/// Convenience wrapper over [`GrowthEngine::new`] and [`GrowthEngine::run`].
pub fn grow(points: Vec<Vec2>, cfg: &Config, rng: &mut impl Rng) -> GrowthResult<Growth> {
    GrowthEngine::new(points, *cfg)?.run(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Basin;
    use rand::{SeedableRng, rngs::StdRng};

    fn pts(points: &[(f32, f32)]) -> Vec<Vec2> {
        points.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    // Mouth, a pair that seeds node 1 at (50, 10), a pair that grows node 2
    // at (30, 35) to the upper left, and a pair to the right of that turn.
    fn backtracking_points() -> Vec<Vec2> {
        pts(&[
            (50.0, 0.0),
            (45.0, 10.0),
            (55.0, 10.0),
            (30.0, 30.0),
            (30.0, 40.0),
            (80.0, 60.0),
            (90.0, 70.0),
        ])
    }

    // Like `backtracking_points`, but with a single extra point left of the
    // turn and only one point to the right of it.
    fn lone_point_points() -> Vec<Vec2> {
        pts(&[
            (50.0, 0.0),
            (45.0, 10.0),
            (55.0, 10.0),
            (30.0, 30.0),
            (30.0, 40.0),
            (10.0, 50.0),
            (80.0, 60.0),
        ])
    }

    #[test]
    fn single_leftover_point_stops_growth() {
        let cfg = Config::default();
        let mut rng = StdRng::seed_from_u64(0);
        let points = pts(&[(50.0, 0.0), (10.0, 10.0), (90.0, 10.0), (50.0, 90.0)]);

        let growth = grow(points, &cfg, &mut rng).unwrap();

        assert_eq!(growth.tree.len(), 2);
        assert_eq!(growth.tree.root().pos, Vec2::new(50.0, 0.0));
        assert_eq!(growth.tree.root().children, vec![1]);
        assert_eq!(growth.tree.nodes[1].pos, Vec2::new(50.0, 10.0));

        assert_eq!(growth.pending.points[0].consumed, Some(Consumption::Mouth));
        assert_eq!(growth.pending.points[1].consumed, Some(Consumption::Paired(1)));
        assert_eq!(growth.pending.points[2].consumed, Some(Consumption::Paired(1)));
        assert!(growth.pending.points[3].is_pending());
        assert_eq!(growth.iterations, 1);
    }

    #[test]
    fn new_requires_two_points_besides_the_mouth() {
        let err = GrowthEngine::new(pts(&[(50.0, 0.0), (10.0, 10.0)]), Config::default())
            .unwrap_err();
        assert_eq!(err, GrowthError::InsufficientCandidates { found: 1 });
    }

    #[test]
    fn new_places_first_node_between_nearest_pair() {
        let engine = GrowthEngine::new(backtracking_points(), Config::default()).unwrap();

        assert_eq!(engine.current(), 1);
        assert_eq!(engine.tree().nodes[1].pos, Vec2::new(50.0, 10.0));
        assert_eq!(engine.limits().len(), 1);
        assert_eq!(engine.limits()[0].node, 1);
        assert!(engine.region().is_none());
        assert_eq!(engine.pending().pending_count(), 4);
    }

    #[test]
    fn empty_region_backtracks_and_branches() {
        let mut engine = GrowthEngine::new(backtracking_points(), Config::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(engine.step(&mut rng).unwrap(), Step::Grew(2));
        assert_eq!(engine.tree().nodes[2].pos, Vec2::new(30.0, 35.0));
        assert_eq!(engine.limits().len(), 2);

        assert_eq!(engine.step(&mut rng).unwrap(), Step::Backtracked(1));
        assert_eq!(engine.current(), 1);
        assert_eq!(engine.limits().len(), 1);

        assert_eq!(engine.step(&mut rng).unwrap(), Step::Grew(3));
        assert_eq!(engine.tree().nodes[3].pos, Vec2::new(85.0, 65.0));
        assert_eq!(engine.tree().nodes[1].children, vec![2, 3]);

        assert_eq!(engine.step(&mut rng).unwrap(), Step::Finished);
        assert_eq!(engine.step(&mut rng).unwrap(), Step::Finished);
        assert!(engine.is_finished());
    }

    #[test]
    fn limit_stack_tracks_tip_depth() {
        let mut engine = GrowthEngine::new(backtracking_points(), Config::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        while engine.step(&mut rng).unwrap() != Step::Finished {
            let tip = engine.current();
            assert_eq!(engine.limits().len(), engine.tree().depth(tip));
            assert_eq!(engine.limits().last().map(|l| l.node), Some(tip));
        }
    }

    #[test]
    fn lone_point_gets_synthesized_partner() {
        let cfg = Config::default();
        let mut engine = GrowthEngine::new(lone_point_points(), cfg).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(engine.step(&mut rng).unwrap(), Step::Grew(2));
        let region = engine.region().unwrap();

        assert_eq!(engine.step(&mut rng).unwrap(), Step::Grew(3));
        let lone = engine.pending().pos(5);
        let node = engine.tree().nodes[3].pos;

        assert_eq!(engine.tree().nodes[3].parent, Some(2));
        assert_eq!(engine.pending().points[5].consumed, Some(Consumption::Paired(3)));
        assert!(cfg.basin.contains(node));
        assert_ne!(node, lone);
        assert!(point_in_polygon(node, &region));

        let growth = engine.run(&mut rng).unwrap();
        assert_eq!(growth.tree.len(), 4);
        // The point right of the first turn is never reached.
        assert!(growth.pending.points[6].is_pending());
    }

    #[test]
    fn lone_point_can_be_discarded() {
        let cfg = Config {
            lone_point: LonePointPolicy::Discard,
            ..Config::default()
        };
        let mut engine = GrowthEngine::new(lone_point_points(), cfg).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        assert_eq!(engine.step(&mut rng).unwrap(), Step::Grew(2));
        assert_eq!(engine.step(&mut rng).unwrap(), Step::Discarded(5));
        assert_eq!(engine.pending().points[5].consumed, Some(Consumption::Discarded));

        let growth = engine.run(&mut rng).unwrap();
        assert_eq!(growth.tree.len(), 3);
        assert!(growth.pending.points[6].is_pending());
    }

    #[test]
    fn exhausted_synthesis_is_recoverable() {
        let cfg = Config {
            synthesis_attempts: 0,
            ..Config::default()
        };
        let mut rng = StdRng::seed_from_u64(5);

        let err = grow(lone_point_points(), &cfg, &mut rng).unwrap_err();
        assert_eq!(err, GrowthError::AreaDegenerate { attempts: 0 });
        assert!(err.is_recoverable());
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let cfg = Config {
            max_iterations: Some(1),
            ..Config::default()
        };
        let mut rng = StdRng::seed_from_u64(6);

        let err = grow(backtracking_points(), &cfg, &mut rng).unwrap_err();
        assert_eq!(err, GrowthError::IterationLimit { limit: 1 });
    }

    // Node 2 lands exactly on the mouth, so its limit line has no direction.
    fn mouth_node_points() -> Vec<Vec2> {
        pts(&[
            (50.0, 0.0),
            (48.0, 3.0),
            (52.0, 3.0),
            (40.0, 0.0),
            (60.0, 0.0),
            (20.0, 80.0),
            (30.0, 90.0),
        ])
    }

    #[test]
    fn unbuildable_region_fails_in_strict_mode() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = grow(mouth_node_points(), &Config::default(), &mut rng).unwrap_err();

        assert!(matches!(err, GrowthError::GeometryInvariantViolation { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn unbuildable_region_backtracks_when_lenient() {
        let cfg = Config {
            strict_geometry: false,
            ..Config::default()
        };
        let mut rng = StdRng::seed_from_u64(8);
        let growth = grow(mouth_node_points(), &cfg, &mut rng).unwrap();

        assert_eq!(growth.tree.len(), 4);
        assert_eq!(growth.tree.nodes[2].pos, Vec2::new(50.0, 0.0));
        assert_eq!(growth.tree.nodes[3].parent, Some(1));
        assert_eq!(growth.tree.nodes[3].pos, Vec2::new(25.0, 85.0));
        assert_eq!(growth.pending.pending_count(), 0);
    }

    #[test]
    fn mouth_placeholder_anywhere_is_ignored() {
        let basin = Basin::new(100.0, 100.0);
        let cfg = Config {
            basin,
            ..Config::default()
        };
        let points = pts(&[(10.0, 10.0), (50.0, 0.0), (90.0, 10.0)]);
        let engine = GrowthEngine::new(points, cfg).unwrap();

        assert_eq!(engine.tree().nodes[1].pos, Vec2::new(50.0, 10.0));
        assert_eq!(engine.pending().points[1].consumed, Some(Consumption::Mouth));
        assert_eq!(engine.pending().pending_count(), 0);
    }
}
