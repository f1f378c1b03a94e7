use crate::error::{ClipError, ClipResult};
use crate::geo::{point_on_ring, ring_contains_point, Coord};
use crate::region::position::{Edges, Position};
use crate::region::{push_segment, Sense, Span, Step};

/// An axis-aligned rectangle.
///
/// Every boundary point this type produces has one coordinate copied exactly
/// from `xmin`, `ymin`, `xmax` or `ymax`, so all position tests here compare
/// with `==` and never with a tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Rectangle {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> ClipResult<Rectangle> {
        if !(xmin.is_finite() && ymin.is_finite() && xmax.is_finite() && ymax.is_finite()) {
            return Err(ClipError::InvalidRegion(format!("rectangle bounds must be finite: {} {} {} {}", xmin, ymin, xmax, ymax)));
        }
        if xmin >= xmax || ymin >= ymax {
            return Err(ClipError::InvalidRegion(format!("rectangle has no area: {} {} {} {}", xmin, ymin, xmax, ymax)));
        }

        Ok(Rectangle {
            xmin: xmin,
            ymin: ymin,
            xmax: xmax,
            ymax: ymax,
        })
    }

    pub fn xmin(&self) -> f64 { self.xmin }
    pub fn ymin(&self) -> f64 { self.ymin }
    pub fn xmax(&self) -> f64 { self.xmax }
    pub fn ymax(&self) -> f64 { self.ymax }

    pub fn position(&self, c: &Coord) -> Position {
        // NaN fails these comparisons too, and lands Outside.
        if !(c.x >= self.xmin && c.x <= self.xmax && c.y >= self.ymin && c.y <= self.ymax) {
            return Position::Outside;
        }

        let edges = Edges {
            left: c.x == self.xmin,
            top: c.y == self.ymax,
            right: c.x == self.xmax,
            bottom: c.y == self.ymin,
        };

        if edges.count() == 0 {
            Position::Inside
        } else {
            Position::OnEdge(edges)
        }
    }

    /// True if no Coord comes near enough to touch this rectangle.
    pub fn is_disjoint(&self, coords: &[Coord]) -> bool {
        !coords.is_empty() && (
            coords.iter().all(|c| c.x < self.xmin)
            || coords.iter().all(|c| c.x > self.xmax)
            || coords.iter().all(|c| c.y < self.ymin)
            || coords.iter().all(|c| c.y > self.ymax)
        )
    }

    /// Liang–Barsky, with intersections snapped exactly onto the side they
    /// were computed against.
    pub fn span(&self, a: &Coord, b: &Coord) -> Option<Span> {
        // Relative to the rectangle's size, intersections closer than this
        // are one point.
        const TOUCH_EPSILON: f64 = 1e-12;

        let dx = b.x - a.x;
        let dy = b.y - a.y;

        let mut t0 = 0.0;
        let mut t1 = 1.0;
        let mut entry_side = None;
        let mut exit_side = None;

        let constraints = [
            (Side::Left, -dx, a.x - self.xmin),
            (Side::Right, dx, self.xmax - a.x),
            (Side::Bottom, -dy, a.y - self.ymin),
            (Side::Top, dy, self.ymax - a.y),
        ];

        for &(side, p, q) in constraints.iter() {
            if p == 0.0 {
                if q < 0.0 {
                    return None; // parallel, and outside
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    if r > t1 { return None; }
                    if r > t0 {
                        t0 = r;
                        entry_side = Some(side);
                    }
                } else {
                    if r < t0 { return None; }
                    if r < t1 {
                        t1 = r;
                        exit_side = Some(side);
                    }
                }
            }
        }

        let entry = entry_side.map(|side| self.point_on_side(side, a, dx, dy, t0));
        let mut exit = exit_side.map(|side| self.point_on_side(side, a, dx, dy, t1)).filter(|x| x != b);

        if let (Some(e), Some(x)) = (entry, exit) {
            let size = (self.xmax - self.xmin) + (self.ymax - self.ymin);
            if e != x && e.distance(&x) <= TOUCH_EPSILON * size {
                // A corner graze: make it a touch at exactly one point.
                exit = Some(e);
            }
        }

        Some(Span {
            entry: entry.filter(|e| e != a),
            exit: exit,
        })
    }

    fn point_on_side(&self, side: Side, a: &Coord, dx: f64, dy: f64, t: f64) -> Coord {
        fn clamp(v: f64, min: f64, max: f64) -> f64 {
            if v < min { min } else if v > max { max } else { v }
        }

        match side {
            Side::Left => Coord::new(self.xmin, clamp(a.y + t * dy, self.ymin, self.ymax)),
            Side::Right => Coord::new(self.xmax, clamp(a.y + t * dy, self.ymin, self.ymax)),
            Side::Bottom => Coord::new(clamp(a.x + t * dx, self.xmin, self.xmax), self.ymin),
            Side::Top => Coord::new(clamp(a.x + t * dx, self.xmin, self.xmax), self.ymax),
        }
    }

    /// Two boundary points on a common side only ever travel along it.
    pub fn is_interior_span(&self, e: &Coord, x: &Coord) -> bool {
        e != x && self.position(&e.midpoint(x)) == Position::Inside
    }

    fn corners(&self) -> [Coord; 4] {
        [
            Coord::new(self.xmin, self.ymin),
            Coord::new(self.xmin, self.ymax),
            Coord::new(self.xmax, self.ymax),
            Coord::new(self.xmax, self.ymin),
        ]
    }

    pub fn is_inside_ring(&self, ring: &[Coord]) -> bool {
        let center = Coord::new((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0);

        self.corners().iter().all(|c| point_on_ring(ring, c) || ring_contains_point(ring, c))
            && !point_on_ring(ring, &center)
            && ring_contains_point(ring, &center)
    }

    /// Clockwise from the bottom-left corner.
    pub fn make_ring(&self, max_segment_length: f64) -> Vec<Coord> {
        let corners = self.corners();
        let mut ring = vec![ corners[0] ];
        for &corner in corners[1..].iter().chain(corners[..1].iter()) {
            push_segment(&mut ring, corner, max_segment_length);
        }
        ring
    }

    /// The side a boundary point travels along when leaving in `sense`.
    ///
    /// A corner belongs to the side it starts, not the one it ends.
    fn leaving_side(edges: &Edges, sense: Sense) -> Option<Side> {
        match sense {
            Sense::Clockwise => {
                if edges.left && !edges.top { Some(Side::Left) }
                else if edges.top && !edges.right { Some(Side::Top) }
                else if edges.right && !edges.bottom { Some(Side::Right) }
                else if edges.bottom && !edges.left { Some(Side::Bottom) }
                else { None }
            }
            Sense::CounterClockwise => {
                if edges.left && !edges.bottom { Some(Side::Left) }
                else if edges.bottom && !edges.right { Some(Side::Bottom) }
                else if edges.right && !edges.top { Some(Side::Right) }
                else if edges.top && !edges.left { Some(Side::Top) }
                else { None }
            }
        }
    }

    /// The corner where travel along `side` in `sense` ends.
    fn end_corner(&self, side: Side, sense: Sense) -> Coord {
        match (sense, side) {
            (Sense::Clockwise, Side::Left) => Coord::new(self.xmin, self.ymax),
            (Sense::Clockwise, Side::Top) => Coord::new(self.xmax, self.ymax),
            (Sense::Clockwise, Side::Right) => Coord::new(self.xmax, self.ymin),
            (Sense::Clockwise, Side::Bottom) => Coord::new(self.xmin, self.ymin),
            (Sense::CounterClockwise, Side::Left) => Coord::new(self.xmin, self.ymin),
            (Sense::CounterClockwise, Side::Bottom) => Coord::new(self.xmax, self.ymin),
            (Sense::CounterClockwise, Side::Right) => Coord::new(self.xmax, self.ymax),
            (Sense::CounterClockwise, Side::Top) => Coord::new(self.xmin, self.ymax),
        }
    }

    /// How far `q` lies ahead of `p` when travelling along `side` in `sense`.
    /// `None` if `q` isn't on that side or lies behind `p`.
    fn distance_along(&self, side: Side, sense: Sense, p: &Coord, q: &Coord) -> Option<f64> {
        let on_side = match side {
            Side::Left => q.x == self.xmin,
            Side::Right => q.x == self.xmax,
            Side::Top => q.y == self.ymax,
            Side::Bottom => q.y == self.ymin,
        };
        if !on_side || !self.position(q).is_on_edge() {
            return None;
        }

        // Clockwise goes up the left side, right along the top, down the
        // right side and left along the bottom.
        let forward = match side {
            Side::Left => q.y - p.y,
            Side::Top => q.x - p.x,
            Side::Right => p.y - q.y,
            Side::Bottom => p.x - q.x,
        };
        let d = match sense {
            Sense::Clockwise => forward,
            Sense::CounterClockwise => -forward,
        };

        if d >= 0.0 { Some(d) } else { None }
    }

    pub fn search(&self, sense: Sense, end: &Coord, starts: &[Coord]) -> Step {
        let side = match Rectangle::leaving_side(&self.position(end).edges(), sense) {
            Some(side) => side,
            None => return Step::Lost,
        };

        let corner = self.end_corner(side, sense);
        let limit = self.distance_along(side, sense, end, &corner).unwrap_or(0.0);

        let mut best: Option<(usize, f64)> = None;
        for (i, start) in starts.iter().enumerate() {
            if let Some(d) = self.distance_along(side, sense, end, start) {
                if d < limit && best.map_or(true, |(_, best_d)| d < best_d) {
                    best = Some((i, d));
                }
            }
        }

        match best {
            Some((i, _)) => Step::Fragment(i),
            None => Step::Boundary(corner),
        }
    }

    pub fn connect_points(&self, sense: Sense, ring: &mut Vec<Coord>, from: &Coord, to: &Coord, max_segment_length: f64) -> bool {
        if from == to {
            return false;
        }

        let mut p = *from;
        // Four corners at most, then the destination.
        for _ in 0..5 {
            let side = match Rectangle::leaving_side(&self.position(&p).edges(), sense) {
                Some(side) => side,
                None => break,
            };
            let corner = self.end_corner(side, sense);
            let limit = self.distance_along(side, sense, &p, &corner).unwrap_or(0.0);

            match self.distance_along(side, sense, &p, to) {
                Some(d) if d <= limit => break,
                _ => {
                    push_segment(ring, corner, max_segment_length);
                    p = corner;
                }
            }
        }

        push_segment(ring, *to, max_segment_length);
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn c(x: f64, y: f64) -> Coord { Coord::new(x, y) }

    fn rect() -> Rectangle {
        Rectangle::new(0.0, 0.0, 10.0, 10.0).unwrap()
    }

    fn left() -> Edges { Edges { left: true, ..Edges::NONE } }

    #[test]
    fn test_new_rejects_bad_bounds() {
        assert!(Rectangle::new(0.0, 0.0, 0.0, 10.0).is_err());
        assert!(Rectangle::new(10.0, 0.0, 0.0, 10.0).is_err());
        assert!(Rectangle::new(0.0, f64::NAN, 10.0, 10.0).is_err());
    }

    #[test]
    fn test_position() {
        let r = rect();
        assert_eq!(Position::Inside, r.position(&c(5.0, 5.0)));
        assert_eq!(Position::Outside, r.position(&c(-1.0, 5.0)));
        assert_eq!(Position::OnEdge(left()), r.position(&c(0.0, 5.0)));
        assert_eq!(2, r.position(&c(0.0, 10.0)).edges().count());
        assert_eq!(Position::Outside, r.position(&c(f64::NAN, 5.0)));
    }

    #[test]
    fn test_span_entering() {
        let span = rect().span(&c(-1.0, 5.0), &c(5.0, 5.0)).unwrap();
        assert_eq!(Some(c(0.0, 5.0)), span.entry);
        assert_eq!(None, span.exit);
    }

    #[test]
    fn test_span_snaps_to_side() {
        // The parametric y would carry round-off; x must be exactly 0
        let span = rect().span(&c(-3.0, 2.0), &c(1.0, 6.0)).unwrap();
        assert_eq!(Some(c(0.0, 5.0)), span.entry);
    }

    #[test]
    fn test_span_chord() {
        let span = rect().span(&c(-5.0, 5.0), &c(15.0, 5.0)).unwrap();
        assert_eq!(Some(c(0.0, 5.0)), span.entry);
        assert_eq!(Some(c(10.0, 5.0)), span.exit);
    }

    #[test]
    fn test_span_miss() {
        assert_eq!(None, rect().span(&c(-5.0, 5.0), &c(-1.0, 20.0)));
        assert_eq!(None, rect().span(&c(-5.0, -1.0), &c(15.0, -1.0)));
    }

    #[test]
    fn test_span_corner_graze() {
        let span = rect().span(&c(-1.0, 9.0), &c(1.0, 11.0)).unwrap();
        assert_eq!(span.entry, span.exit);
        assert_eq!(Some(c(0.0, 10.0)), span.entry);
    }

    #[test]
    fn test_span_leaving_from_boundary() {
        let span = rect().span(&c(0.0, 5.0), &c(-1.0, 5.0)).unwrap();
        assert_eq!(None, span.entry);
        assert_eq!(Some(c(0.0, 5.0)), span.exit);
    }

    #[test]
    fn test_interior_span() {
        let r = rect();
        assert!(r.is_interior_span(&c(0.0, 5.0), &c(10.0, 5.0)));
        assert!(r.is_interior_span(&c(0.0, 5.0), &c(5.0, 0.0)));
        assert!(!r.is_interior_span(&c(0.0, 5.0), &c(0.0, 8.0)));
        assert!(!r.is_interior_span(&c(0.0, 5.0), &c(0.0, 5.0)));
    }

    #[test]
    fn test_is_disjoint() {
        let r = rect();
        assert!(r.is_disjoint(&[ c(-3.0, 0.0), c(-1.0, 20.0) ]));
        assert!(!r.is_disjoint(&[ c(-3.0, 0.0), c(0.0, 20.0) ]));
    }

    #[test]
    fn test_make_ring() {
        assert_eq!(
            vec![ c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0), c(0.0, 0.0) ],
            rect().make_ring(0.0)
        );
        assert_eq!(17, rect().make_ring(2.5).len());
    }

    #[test]
    fn test_is_inside_ring() {
        let big = vec![ c(-1.0, -1.0), c(-1.0, 11.0), c(11.0, 11.0), c(11.0, -1.0), c(-1.0, -1.0) ];
        let same = rect().make_ring(0.0);
        let small = vec![ c(1.0, 1.0), c(1.0, 2.0), c(2.0, 2.0), c(1.0, 1.0) ];
        assert!(rect().is_inside_ring(&big));
        assert!(rect().is_inside_ring(&same));
        assert!(!rect().is_inside_ring(&small));
    }

    #[test]
    fn test_search_cw_picks_closest_ahead() {
        let starts = [ c(0.0, 8.0), c(0.0, 7.0), c(0.0, 2.0), c(5.0, 10.0) ];
        assert_eq!(Step::Fragment(1), rect().search(Sense::Clockwise, &c(0.0, 5.0), &starts));
    }

    #[test]
    fn test_search_ccw_goes_down_the_left_side() {
        let starts = [ c(0.0, 8.0), c(0.0, 2.0) ];
        assert_eq!(Step::Fragment(1), rect().search(Sense::CounterClockwise, &c(0.0, 5.0), &starts));
    }

    #[test]
    fn test_search_corner_wins_ties() {
        let starts = [ c(0.0, 10.0) ];
        assert_eq!(Step::Boundary(c(0.0, 10.0)), rect().search(Sense::Clockwise, &c(0.0, 5.0), &starts));
        // ... and from the corner, the candidate is right there
        assert_eq!(Step::Fragment(0), rect().search(Sense::Clockwise, &c(0.0, 10.0), &starts));
    }

    #[test]
    fn test_search_lost() {
        assert_eq!(Step::Lost, rect().search(Sense::Clockwise, &c(5.0, 5.0), &[]));
    }

    #[test]
    fn test_connect_points_cw_around_corners() {
        let mut ring = vec![ c(5.0, 0.0) ];
        assert!(rect().connect_points(Sense::Clockwise, &mut ring, &c(5.0, 0.0), &c(0.0, 5.0), 0.0));
        assert_eq!(vec![ c(5.0, 0.0), c(0.0, 0.0), c(0.0, 5.0) ], ring);
    }

    #[test]
    fn test_connect_points_ccw_around_corners() {
        let mut ring = vec![ c(5.0, 0.0) ];
        assert!(rect().connect_points(Sense::CounterClockwise, &mut ring, &c(5.0, 0.0), &c(0.0, 5.0), 0.0));
        assert_eq!(vec![ c(5.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 10.0), c(0.0, 5.0) ], ring);
    }

    #[test]
    fn test_connect_points_same_side_behind() {
        let mut ring = vec![ c(0.0, 5.0) ];
        rect().connect_points(Sense::Clockwise, &mut ring, &c(0.0, 5.0), &c(0.0, 4.0), 0.0);
        assert_eq!(6, ring.len()); // all the way around
    }

    #[test]
    fn test_connect_points_coincident() {
        let mut ring = vec![ c(0.0, 5.0) ];
        assert!(!rect().connect_points(Sense::Clockwise, &mut ring, &c(0.0, 5.0), &c(0.0, 5.0), 0.0));
        assert_eq!(1, ring.len());
    }
}
