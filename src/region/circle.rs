use std::f64::consts::PI;

use crate::error::{ClipError, ClipResult};
use crate::geo::{point_on_ring, ring_contains_point, Coord};
use crate::region::position::Position;
use crate::region::rectangle::Rectangle;
use crate::region::{push_segment, Sense, Span, Step};

/// Default number of straight pieces approximating the whole circle.
pub const DEFAULT_SEGMENTS: usize = 360;

/// Fewest pieces `with_segments()` accepts.
pub const MIN_SEGMENTS: usize = 8;

/// How far |p - centre|² may stray from R², as a fraction of R², for `p` to
/// count as on the circle.
pub const EDGE_TOLERANCE: f64 = 1e-9;

/// Angles (radians) closer than this are the same angle.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// Boundary samples `is_inside_ring()` tests.
const INSIDE_RING_SAMPLES: usize = 36;

const TWO_PI: f64 = 2.0 * PI;

/// A planar circle.
///
/// Boundary points come from solving quadratics, so unlike Rectangle every
/// "is it on the boundary" question here is answered within a tolerance.
#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    center: Coord,
    radius: f64,
    radius2: f64,
    tolerance: f64,
    segments: usize,
    step: f64,
}

impl Circle {
    pub fn new(center: Coord, radius: f64) -> ClipResult<Circle> {
        if !center.is_finite() {
            return Err(ClipError::InvalidRegion(format!("circle center must be finite: {}", center)));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ClipError::InvalidRegion(format!("circle radius must be positive: {}", radius)));
        }

        let radius2 = radius * radius;

        Ok(Circle {
            center: center,
            radius: radius,
            radius2: radius2,
            tolerance: EDGE_TOLERANCE * radius2,
            segments: DEFAULT_SEGMENTS,
            step: TWO_PI / DEFAULT_SEGMENTS as f64,
        })
    }

    /// Sets how many straight pieces approximate the full circle in
    /// synthesized boundary paths.
    pub fn with_segments(mut self, segments: usize) -> ClipResult<Circle> {
        if segments < MIN_SEGMENTS {
            return Err(ClipError::InvalidArgument(format!("a circle needs at least {} segments, not {}", MIN_SEGMENTS, segments)));
        }
        self.segments = segments;
        self.step = TWO_PI / segments as f64;
        Ok(self)
    }

    pub fn center(&self) -> Coord { self.center }
    pub fn radius(&self) -> f64 { self.radius }
    pub fn segments(&self) -> usize { self.segments }

    /// `None` when the radius vanishes next to the centre's magnitude.
    pub fn bounding_box(&self) -> Option<Rectangle> {
        Rectangle::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        ).ok()
    }

    /// Binary: points exactly on the circle count as Inside.
    pub fn position(&self, c: &Coord) -> Position {
        if self.center.distance2(c) <= self.radius2 {
            Position::Inside
        } else {
            Position::Outside
        }
    }

    pub fn is_on_edge(&self, c: &Coord) -> bool {
        (self.center.distance2(c) - self.radius2).abs() <= self.tolerance
    }

    fn in_closed_disk(&self, c: &Coord) -> bool {
        self.center.distance2(c) <= self.radius2 + self.tolerance
    }

    /// Solves |a + t(b - a) - centre| = R. Everything is relative to the
    /// centre, so nothing large gets squared.
    pub fn span(&self, a: &Coord, b: &Coord) -> Option<Span> {
        let a_in = self.in_closed_disk(a);
        let b_in = self.in_closed_disk(b);

        if a_in && b_in {
            // A disk is convex
            return Some(Span { entry: None, exit: None });
        }

        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let fx = a.x - self.center.x;
        let fy = a.y - self.center.y;

        let qa = dx * dx + dy * dy;
        if qa == 0.0 {
            return None; // a == b, and it's outside
        }
        let qb = 2.0 * (fx * dx + fy * dy);
        let qc = fx * fx + fy * fy - self.radius2;

        let discriminant = qb * qb - 4.0 * qa * qc;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        // Numerically stable pairing of the two roots
        let q = -0.5 * (qb + qb.signum() * root);
        let (t1, t2) = if q == 0.0 {
            (0.0, 0.0)
        } else {
            let r1 = q / qa;
            let r2 = qc / q;
            if r1 <= r2 { (r1, r2) } else { (r2, r1) }
        };

        if !(t1.is_finite() && t2.is_finite()) {
            warn!("non-finite circle intersection for {} -> {}", a, b);
            return None;
        }

        let at = |t: f64| Coord::new(a.x + t * dx, a.y + t * dy);

        let entry = if a_in { None } else { Some(at(t1)) };
        let exit = if b_in { None } else { Some(at(t2)) };

        if (!a_in && !(0.0..=1.0).contains(&t1)) || (!b_in && !(0.0..=1.0).contains(&t2)) {
            return None;
        }

        Some(Span { entry: entry, exit: exit })
    }

    /// A tangent (or a chord so short it can't be told apart from one) isn't
    /// interior.
    pub fn is_interior_span(&self, e: &Coord, x: &Coord) -> bool {
        e.distance2(x) > self.tolerance
            && self.center.distance2(&e.midpoint(x)) < self.radius2 - self.tolerance
    }

    /// Angle of `c` around the centre, in [0, 2π).
    fn angle(&self, c: &Coord) -> f64 {
        let a = (c.y - self.center.y).atan2(c.x - self.center.x);
        if a < 0.0 { a + TWO_PI } else { a }
    }

    fn point_at(&self, angle: f64) -> Coord {
        Coord::new(self.center.x + self.radius * angle.cos(), self.center.y + self.radius * angle.sin())
    }

    /// How far to rotate from `from` to reach `to`, in [0, 2π). Clockwise
    /// means decreasing angle.
    fn rotation(from: f64, to: f64, sense: Sense) -> f64 {
        let d = match sense {
            Sense::Clockwise => from - to,
            Sense::CounterClockwise => to - from,
        };
        let d = d.rem_euclid(TWO_PI);
        if d > TWO_PI - ANGLE_EPSILON { 0.0 } else { d }
    }

    /// Index of the first grid angle strictly past `angle` in `sense`.
    /// Indices aren't wrapped: `k * step` may fall outside [0, 2π).
    fn next_grid_index(&self, angle: f64, sense: Sense) -> i64 {
        match sense {
            Sense::Clockwise => ((angle - ANGLE_EPSILON) / self.step).floor() as i64,
            Sense::CounterClockwise => ((angle + ANGLE_EPSILON) / self.step).floor() as i64 + 1,
        }
    }

    fn grid_angle(&self, k: i64) -> f64 {
        (k as f64 * self.step).rem_euclid(TWO_PI)
    }

    pub fn is_inside_ring(&self, ring: &[Coord]) -> bool {
        let step = TWO_PI / INSIDE_RING_SAMPLES as f64;

        (0..INSIDE_RING_SAMPLES)
            .map(|i| self.point_at(i as f64 * step))
            .all(|c| point_on_ring(ring, &c) || ring_contains_point(ring, &c))
            && ring_contains_point(ring, &self.center)
    }

    /// Clockwise, starting due east of the centre.
    pub fn make_ring(&self, max_segment_length: f64) -> Vec<Coord> {
        let first = self.point_at(0.0);
        let mut ring = vec![ first ];
        for k in 1..self.segments {
            push_segment(&mut ring, self.point_at(TWO_PI - k as f64 * self.step), max_segment_length);
        }
        push_segment(&mut ring, first, max_segment_length);
        ring
    }

    /// Candidates within one grid step win, even in a near-tie with the grid
    /// vertex: the grid vertex would just duplicate them.
    pub fn search(&self, sense: Sense, end: &Coord, starts: &[Coord]) -> Step {
        if !self.is_on_edge(end) {
            return Step::Lost;
        }

        let from = self.angle(end);
        let k = self.next_grid_index(from, sense);
        let limit = Circle::rotation(from, self.grid_angle(k), sense);

        let mut best: Option<(usize, f64)> = None;
        for (i, start) in starts.iter().enumerate() {
            if !self.is_on_edge(start) {
                continue;
            }
            let d = Circle::rotation(from, self.angle(start), sense);
            if d <= limit + ANGLE_EPSILON && best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }

        match best {
            Some((i, _)) => Step::Fragment(i),
            None => Step::Boundary(self.point_at(self.grid_angle(k))),
        }
    }

    pub fn connect_points(&self, sense: Sense, ring: &mut Vec<Coord>, from: &Coord, to: &Coord, max_segment_length: f64) -> bool {
        if from == to {
            return false;
        }

        let start = self.angle(from);
        let total = Circle::rotation(start, self.angle(to), sense);
        if total <= ANGLE_EPSILON && from.distance2(to) <= self.tolerance {
            return false;
        }

        let mut k = self.next_grid_index(start, sense);
        for _ in 0..self.segments {
            let g = self.grid_angle(k);
            if Circle::rotation(start, g, sense) >= total - ANGLE_EPSILON {
                break;
            }
            push_segment(ring, self.point_at(g), max_segment_length);
            k += match sense {
                Sense::Clockwise => -1,
                Sense::CounterClockwise => 1,
            };
        }

        push_segment(ring, *to, max_segment_length);
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo::{winding_order, WindingOrder};

    fn c(x: f64, y: f64) -> Coord { Coord::new(x, y) }

    fn unit() -> Circle {
        Circle::new(c(0.0, 0.0), 1.0).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_radius() {
        assert!(Circle::new(c(0.0, 0.0), 0.0).is_err());
        assert!(Circle::new(c(0.0, 0.0), -1.0).is_err());
        assert!(Circle::new(c(f64::INFINITY, 0.0), 1.0).is_err());
        assert!(unit().with_segments(4).is_err());
    }

    #[test]
    fn test_position_is_binary() {
        assert_eq!(Position::Inside, unit().position(&c(0.5, 0.5)));
        assert_eq!(Position::Inside, unit().position(&c(1.0, 0.0)));
        assert_eq!(Position::Outside, unit().position(&c(1.0, 1.0)));
        assert!(unit().is_on_edge(&c(0.0, -1.0)));
        assert!(!unit().is_on_edge(&c(0.0, -0.9)));
    }

    #[test]
    fn test_span_chord() {
        let span = unit().span(&c(-2.0, 0.0), &c(2.0, 0.0)).unwrap();
        assert_relative_eq!(-1.0, span.entry.unwrap().x);
        assert_relative_eq!(1.0, span.exit.unwrap().x);
    }

    #[test]
    fn test_span_leaving() {
        let span = unit().span(&c(0.0, 0.0), &c(0.0, 3.0)).unwrap();
        assert_eq!(None, span.entry);
        assert_relative_eq!(1.0, span.exit.unwrap().y);
    }

    #[test]
    fn test_span_inside() {
        assert_eq!(Some(Span { entry: None, exit: None }), unit().span(&c(0.0, 0.0), &c(0.5, 0.5)));
    }

    #[test]
    fn test_span_miss() {
        assert_eq!(None, unit().span(&c(-2.0, 2.0), &c(2.0, 2.0)));
        // The line would cross, but the segment stops short
        assert_eq!(None, unit().span(&c(-3.0, 0.0), &c(-2.0, 0.0)));
    }

    #[test]
    fn test_span_far_from_origin() {
        let circle = Circle::new(c(1e7, 1e7), 10.0).unwrap();
        let span = circle.span(&c(1e7 - 20.0, 1e7), &c(1e7, 1e7)).unwrap();
        let entry = span.entry.unwrap();
        assert_relative_eq!(1e7 - 10.0, entry.x);
        assert!(circle.is_on_edge(&entry));
    }

    #[test]
    fn test_tangent_is_not_interior() {
        let circle = unit();
        let span = circle.span(&c(-1.0, 1.0), &c(1.0, 1.0)).unwrap();
        let e = span.start(&c(-1.0, 1.0));
        let x = span.end(&c(1.0, 1.0));
        assert!(!circle.is_interior_span(&e, &x));
        assert!(circle.is_interior_span(&c(-1.0, 0.0), &c(1.0, 0.0)));
    }

    #[test]
    fn test_make_ring_is_clockwise_and_closed() {
        let ring = unit().with_segments(8).unwrap().make_ring(0.0);
        assert_eq!(9, ring.len());
        assert_eq!(ring[0], ring[8]);
        assert_eq!(WindingOrder::Clockwise, winding_order(&ring));
    }

    #[test]
    fn test_search_prefers_candidate_within_step() {
        let circle = unit().with_segments(8).unwrap();
        let end = circle.point_at(0.3);
        let near = circle.point_at(0.2);
        let far = circle.point_at(5.0);
        assert_eq!(Step::Fragment(1), circle.search(Sense::Clockwise, &end, &[ far, near ]));
    }

    #[test]
    fn test_search_falls_back_to_grid() {
        let circle = unit().with_segments(8).unwrap();
        let end = circle.point_at(0.3);
        match circle.search(Sense::CounterClockwise, &end, &[ circle.point_at(0.2) ]) {
            Step::Boundary(p) => {
                assert_relative_eq!(PI / 4.0, circle.angle(&p), epsilon = 1e-12);
            }
            other => panic!("expected a grid vertex, got {:?}", other),
        }
    }

    #[test]
    fn test_search_wraps_past_zero() {
        let circle = unit().with_segments(8).unwrap();
        let end = circle.point_at(0.0);
        let start = circle.point_at(TWO_PI - 0.1);
        assert_eq!(Step::Fragment(0), circle.search(Sense::Clockwise, &end, &[ start ]));
    }

    #[test]
    fn test_connect_points_follows_grid() {
        let circle = unit().with_segments(8).unwrap();
        let from = circle.point_at(0.1);
        let to = circle.point_at(PI - 0.1);
        let mut ring = vec![ from ];
        assert!(circle.connect_points(Sense::CounterClockwise, &mut ring, &from, &to, 0.0));
        // π/4, π/2, 3π/4, then the destination
        assert_eq!(5, ring.len());
        assert_eq!(to, ring[4]);
        for p in ring.iter() {
            assert!(circle.is_on_edge(p));
        }
    }

    #[test]
    fn test_connect_points_clockwise_the_long_way() {
        let circle = unit().with_segments(8).unwrap();
        let from = circle.point_at(0.1);
        let to = circle.point_at(PI - 0.1);
        let mut ring = vec![ from ];
        assert!(circle.connect_points(Sense::Clockwise, &mut ring, &from, &to, 0.0));
        // 0, 7π/4, 3π/2, 5π/4, π, then the destination
        assert_eq!(7, ring.len());
    }

    #[test]
    fn test_connect_points_coincident() {
        let circle = unit();
        let p = circle.point_at(1.0);
        let mut ring = vec![ p ];
        assert!(!circle.connect_points(Sense::Clockwise, &mut ring, &p, &p, 0.0));
        assert_eq!(1, ring.len());
    }

    #[test]
    fn test_is_inside_ring() {
        let big = vec![ c(-2.0, -2.0), c(-2.0, 2.0), c(2.0, 2.0), c(2.0, -2.0), c(-2.0, -2.0) ];
        let small = vec![ c(-0.5, -0.5), c(-0.5, 0.5), c(0.5, 0.5), c(0.5, -0.5), c(-0.5, -0.5) ];
        assert!(unit().is_inside_ring(&big));
        assert!(!unit().is_inside_ring(&small));
    }
}
