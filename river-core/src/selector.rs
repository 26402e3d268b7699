use crate::{
    error::{GrowthError, GrowthResult},
    types::PointIndex,
};
use glam::Vec2;

/// A point offered to [`nearest_two`].
///
/// `index` is the input index for real pending points and `None` for
/// points synthesized during growth, which never belong to the pending set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub index: Option<PointIndex>,
    pub pos: Vec2,
}

impl Candidate {
    pub fn pending(index: PointIndex, pos: Vec2) -> Self {
        Self {
            index: Some(index),
            pos,
        }
    }

    pub fn synthesized(pos: Vec2) -> Self {
        Self { index: None, pos }
    }
}

/// Returns the two candidates closest to `pivot`, nearest first.
///
/// Candidates located exactly at `pivot` are skipped. Equal distances keep
/// the candidate that appears first in `candidates`.
pub fn nearest_two(candidates: &[Candidate], pivot: Vec2) -> GrowthResult<(Candidate, Candidate)> {
    let mut first: Option<(Candidate, f32)> = None;
    let mut second: Option<(Candidate, f32)> = None;
    let mut found = 0;

    for &c in candidates {
        if c.pos == pivot {
            continue;
        }
        found += 1;

        let d2 = c.pos.distance_squared(pivot);
        match first {
            Some((_, d1)) if d2 >= d1 => {
                if second.is_none_or(|(_, ds)| d2 < ds) {
                    second = Some((c, d2));
                }
            }
            _ => {
                second = first;
                first = Some((c, d2));
            }
        }
    }

    match (first, second) {
        (Some((a, _)), Some((b, _))) => Ok((a, b)),
        _ => Err(GrowthError::InsufficientCandidates { found }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cands(points: &[(f32, f32)]) -> Vec<Candidate> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Candidate::pending(i, Vec2::new(x, y)))
            .collect()
    }

    #[test]
    fn picks_two_closest_nearest_first() {
        let c = cands(&[(10.0, 0.0), (1.0, 0.0), (5.0, 0.0), (2.0, 0.0)]);
        let (a, b) = nearest_two(&c, Vec2::ZERO).unwrap();

        assert_eq!(a.index, Some(1));
        assert_eq!(b.index, Some(3));
    }

    #[test]
    fn nearer_point_later_demotes_previous_best() {
        let c = cands(&[(3.0, 0.0), (9.0, 0.0), (1.0, 0.0)]);
        let (a, b) = nearest_two(&c, Vec2::ZERO).unwrap();

        assert_eq!(a.index, Some(2));
        assert_eq!(b.index, Some(0));
    }

    #[test]
    fn ties_keep_input_order() {
        let c = cands(&[(50.0, 0.0), (10.0, 10.0), (90.0, 10.0), (50.0, 90.0)]);
        let (a, b) = nearest_two(&c, Vec2::new(50.0, 0.0)).unwrap();

        assert_eq!(a.pos, Vec2::new(10.0, 10.0));
        assert_eq!(b.pos, Vec2::new(90.0, 10.0));
    }

    #[test]
    fn pivot_is_excluded() {
        let c = cands(&[(0.0, 0.0), (4.0, 0.0), (3.0, 0.0)]);
        let (a, b) = nearest_two(&c, Vec2::ZERO).unwrap();

        assert_eq!(a.index, Some(2));
        assert_eq!(b.index, Some(1));
    }

    #[test]
    fn too_few_candidates_fail() {
        let c = cands(&[(0.0, 0.0), (4.0, 0.0)]);
        assert_eq!(
            nearest_two(&c, Vec2::ZERO),
            Err(GrowthError::InsufficientCandidates { found: 1 })
        );
        assert_eq!(
            nearest_two(&[], Vec2::ZERO),
            Err(GrowthError::InsufficientCandidates { found: 0 })
        );
    }

    #[test]
    fn synthesized_candidates_keep_no_index() {
        let c = vec![
            Candidate::pending(4, Vec2::new(1.0, 1.0)),
            Candidate::synthesized(Vec2::new(2.0, 2.0)),
        ];
        let (a, b) = nearest_two(&c, Vec2::ZERO).unwrap();

        assert_eq!(a.index, Some(4));
        assert_eq!(b.index, None);
    }
}
