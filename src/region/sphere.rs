use std::f64::consts::PI;

use crate::error::{ClipError, ClipResult};
use crate::geo::Coord;
use crate::region::circle::Circle;
use crate::region::position::Position;
use crate::region::projection::{AzimuthalEquidistant, EARTH_RADIUS};
use crate::region::{Sense, Span, Step};

/// A circle on the Earth's surface: every point within `radius` metres
/// (great-circle distance) of a longitude/latitude centre.
///
/// Queries are projected into a plane where the circle is exactly circular,
/// answered there by a planar `Circle`, and any point we synthesize is
/// projected back. Input coordinates pass through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereCircle {
    center: Coord,
    radius: f64,
    projection: AzimuthalEquidistant,
    circle: Circle,
}

impl SphereCircle {
    pub fn new(lon: f64, lat: f64, radius: f64) -> ClipResult<SphereCircle> {
        if !lon.is_finite() || !(lat >= -90.0 && lat <= 90.0) {
            return Err(ClipError::InvalidRegion(format!("invalid circle center: {} {}", lon, lat)));
        }
        if !(radius > 0.0 && radius < PI * EARTH_RADIUS) {
            return Err(ClipError::InvalidRegion(format!("circle radius must be between 0 and {} metres, not {}", PI * EARTH_RADIUS, radius)));
        }

        Ok(SphereCircle {
            center: Coord::new(lon, lat),
            radius: radius,
            projection: AzimuthalEquidistant::new(lon, lat),
            circle: Circle::new(Coord::new(0.0, 0.0), radius)?,
        })
    }

    pub fn with_segments(mut self, segments: usize) -> ClipResult<SphereCircle> {
        self.circle = self.circle.with_segments(segments)?;
        Ok(self)
    }

    pub fn center(&self) -> Coord { self.center }
    pub fn radius(&self) -> f64 { self.radius }
    pub fn segments(&self) -> usize { self.circle.segments() }

    fn project(&self, c: &Coord) -> Coord {
        self.projection.project(c)
    }

    fn unproject(&self, c: &Coord) -> Coord {
        self.projection.unproject(c)
    }

    pub fn position(&self, c: &Coord) -> Position {
        self.circle.position(&self.project(c))
    }

    pub fn is_on_edge(&self, c: &Coord) -> bool {
        self.circle.is_on_edge(&self.project(c))
    }

    pub fn span(&self, a: &Coord, b: &Coord) -> Option<Span> {
        self.circle.span(&self.project(a), &self.project(b)).map(|span| Span {
            entry: span.entry.map(|e| self.unproject(&e)),
            exit: span.exit.map(|x| self.unproject(&x)),
        })
    }

    pub fn is_interior_span(&self, e: &Coord, x: &Coord) -> bool {
        self.circle.is_interior_span(&self.project(e), &self.project(x))
    }

    pub fn is_inside_ring(&self, ring: &[Coord]) -> bool {
        let projected: Vec<Coord> = ring.iter().map(|c| self.project(c)).collect();
        self.circle.is_inside_ring(&projected)
    }

    pub fn make_ring(&self, max_segment_length: f64) -> Vec<Coord> {
        let mut ring: Vec<Coord> = self.circle.make_ring(max_segment_length).iter()
            .map(|c| self.unproject(c))
            .collect();
        if let Some(&first) = ring.first() {
            let n = ring.len();
            ring[n - 1] = first;
        }
        ring
    }

    pub fn search(&self, sense: Sense, end: &Coord, starts: &[Coord]) -> Step {
        let projected: Vec<Coord> = starts.iter().map(|c| self.project(c)).collect();

        match self.circle.search(sense, &self.project(end), &projected) {
            Step::Boundary(c) => Step::Boundary(self.unproject(&c)),
            step => step,
        }
    }

    /// `max_segment_length` is in metres here.
    pub fn connect_points(&self, sense: Sense, ring: &mut Vec<Coord>, from: &Coord, to: &Coord, max_segment_length: f64) -> bool {
        if from == to {
            return false;
        }

        let planar_from = self.project(from);
        let mut planar = vec![ planar_from ];
        if !self.circle.connect_points(sense, &mut planar, &planar_from, &self.project(to), max_segment_length) {
            return false;
        }

        // planar[0] is `from` and the last is `to`: keep the originals
        let n = planar.len();
        for c in planar[1..n - 1].iter() {
            ring.push(self.unproject(c));
        }
        ring.push(*to);
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geo::{winding_order, WindingOrder};

    fn c(x: f64, y: f64) -> Coord { Coord::new(x, y) }

    /// About one degree of latitude
    const ONE_DEGREE: f64 = EARTH_RADIUS * PI / 180.0;

    fn circle() -> SphereCircle {
        SphereCircle::new(0.0, 0.0, ONE_DEGREE).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(SphereCircle::new(0.0, 91.0, 1000.0).is_err());
        assert!(SphereCircle::new(0.0, 0.0, 0.0).is_err());
        assert!(SphereCircle::new(0.0, 0.0, 1e8).is_err());
        assert!(SphereCircle::new(f64::NAN, 0.0, 1000.0).is_err());
    }

    #[test]
    fn test_position() {
        assert_eq!(Position::Inside, circle().position(&c(0.5, 0.5)));
        assert_eq!(Position::Outside, circle().position(&c(1.5, 0.0)));
        assert!(circle().is_on_edge(&c(0.0, 1.0)));
    }

    #[test]
    fn test_span_unprojects_intersections() {
        let span = circle().span(&c(-2.0, 0.0), &c(0.0, 0.0)).unwrap();
        let entry = span.entry.unwrap();
        assert_relative_eq!(-1.0, entry.x, epsilon = 1e-9);
        assert_relative_eq!(0.0, entry.y, epsilon = 1e-9);
        assert_eq!(None, span.exit);
    }

    #[test]
    fn test_make_ring() {
        let ring = circle().with_segments(36).unwrap().make_ring(0.0);
        assert_eq!(37, ring.len());
        assert_eq!(ring[0], ring[36]);
        assert_eq!(WindingOrder::Clockwise, winding_order(&ring));
        for p in ring.iter() {
            assert!(circle().is_on_edge(p));
        }
    }

    #[test]
    fn test_connect_points_keeps_endpoints() {
        let region = circle().with_segments(8).unwrap();
        let from = c(0.0, 1.0);
        let to = c(-1.0, 0.0);
        let mut ring = vec![ from ];
        assert!(region.connect_points(Sense::CounterClockwise, &mut ring, &from, &to, 0.0));
        // one grid vertex at 135°
        assert_eq!(3, ring.len());
        assert_eq!(to, ring[2]);
        assert!(region.is_on_edge(&ring[1]));
    }

    #[test]
    fn test_is_inside_ring() {
        let big = vec![ c(-3.0, -3.0), c(-3.0, 3.0), c(3.0, 3.0), c(3.0, -3.0), c(-3.0, -3.0) ];
        assert!(circle().is_inside_ring(&big));
    }
}
