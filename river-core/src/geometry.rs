//! Planar primitives shared by the selector, the region builder and the
//! crossing validator.
//!
//! Every predicate here is total: degenerate input yields `None` or
//! `false`, never a panic or an error.

use glam::Vec2;
use rand::Rng;

/// Closed polygon given by its vertices in order; the closing edge from
/// the last vertex back to the first is implicit.
pub type Polygon = Vec<Vec2>;

/// An infinite line in two-point form: every point `origin + t * dir`.
///
/// Vertical lines need no special case. Slope/intercept views are
/// available through [`Line::slope`] and [`Line::intercept`] and are
/// `None` when the line is vertical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub origin: Vec2,
    pub dir: Vec2,
}

impl Line {
    pub fn through(p1: Vec2, p2: Vec2) -> Self {
        Self {
            origin: p1,
            dir: p2 - p1,
        }
    }

    /// Both defining points coincide, so the line has no direction.
    pub fn is_degenerate(&self) -> bool {
        self.dir == Vec2::ZERO
    }

    pub fn is_vertical(&self) -> bool {
        self.dir.x == 0.0 && self.dir.y != 0.0
    }

    pub fn slope(&self) -> Option<f32> {
        if self.dir.x == 0.0 {
            None
        } else {
            Some(self.dir.y / self.dir.x)
        }
    }

    pub fn intercept(&self) -> Option<f32> {
        self.slope().map(|m| self.origin.y - m * self.origin.x)
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.dir * t
    }

    /// Signed area test: positive when `p` lies to the left of the line
    /// (counter-clockwise of `dir`), negative to the right, zero on it.
    pub fn side_of(&self, p: Vec2) -> f32 {
        self.dir.perp_dot(p - self.origin)
    }
}

/// Line through `p1` and `p2`.
pub fn line(p1: Vec2, p2: Vec2) -> Line {
    Line::through(p1, p2)
}

/// Intersection of segments `a-b` and `c-d`, endpoints included.
///
/// Parallel and collinear segments report no intersection.
pub fn intersection_point(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2> {
    let r = b - a;
    let s = d - c;
    let denom = r.perp_dot(s);
    if denom == 0.0 {
        return None;
    }

    let ac = c - a;
    let t = ac.perp_dot(s) / denom;
    let u = ac.perp_dot(r) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a + r * t)
    } else {
        None
    }
}

pub fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    intersection_point(a, b, c, d).is_some()
}

/// Even-odd ray-casting containment test.
///
/// Points on an edge follow the half-open rule of the crossing count, so
/// the answer for a given point and polygon never changes between calls.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = polygon[i];
        let vj = polygon[j];
        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// The rectangular drainage basin `[0, width] x [0, height]`.
///
/// The outlet ("mouth") sits in the middle of the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basin {
    pub width: f32,
    pub height: f32,
}

impl Basin {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn mouth(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, 0.0)
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::ZERO
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(0.0, self.height)
    }

    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.width, 0.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Uniformly distributed point inside the basin.
    pub fn sample(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.random_range(0.0..=self.width),
            rng.random_range(0.0..=self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn vertical_line_is_well_defined() {
        let l = line(Vec2::new(0.0, 0.0), Vec2::new(0.0, 5.0));

        assert!(l.is_vertical());
        assert!(!l.is_degenerate());
        assert_eq!(l.slope(), None);
        assert_eq!(l.intercept(), None);
        assert_eq!(l.point_at(1.0), Vec2::new(0.0, 5.0));
    }

    #[test]
    fn slope_and_intercept_of_oblique_line() {
        let l = line(Vec2::new(1.0, 3.0), Vec2::new(3.0, 7.0));

        assert_eq!(l.slope(), Some(2.0));
        assert_eq!(l.intercept(), Some(1.0));
    }

    #[test]
    fn side_of_distinguishes_left_and_right() {
        let l = line(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0));

        assert!(l.side_of(Vec2::new(-1.0, 0.5)) > 0.0);
        assert!(l.side_of(Vec2::new(1.0, 0.5)) < 0.0);
        assert_eq!(l.side_of(Vec2::new(0.0, 9.0)), 0.0);
    }

    #[test]
    fn crossing_segments_meet_at_center() {
        let p = intersection_point(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
        );
        assert_eq!(p, Some(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn parallel_and_disjoint_segments_do_not_intersect() {
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ));
        // Lines cross, but outside the second segment.
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(2.0, 3.0),
        ));
    }

    #[test]
    fn touching_endpoints_count_as_intersection() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 0.0),
        ));
    }

    #[test]
    fn point_in_square_and_triangle() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(5.0, -1.0), &square));

        let triangle = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(2.0, 2.0), &triangle));
        assert!(!point_in_polygon(Vec2::new(8.0, 8.0), &triangle));
    }

    #[test]
    fn boundary_answers_are_stable() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let on_edge = Vec2::new(0.0, 5.0);
        let first = point_in_polygon(on_edge, &square);
        for _ in 0..5 {
            assert_eq!(point_in_polygon(on_edge, &square), first);
        }
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let seg = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)];
        assert!(!point_in_polygon(Vec2::new(0.5, 0.5), &seg));
    }

    #[test]
    fn basin_mouth_and_samples() {
        let basin = Basin::new(100.0, 50.0);
        assert_eq!(basin.mouth(), Vec2::new(50.0, 0.0));

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(basin.contains(basin.sample(&mut rng)));
        }
    }
}
