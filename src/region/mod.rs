//! The shapes we clip against.
//!
//! A Region answers point and segment queries, and knows how to walk its own
//! boundary. It never owns geometry: the clipping code feeds it coordinates
//! and collects what comes back.

use crate::clip::fragments::{Fragments, Role};
use crate::clip::segment::{self, Keep};
use crate::error::ClipResult;
use crate::geo::{Coord, LineString};

mod circle;
mod position;
pub mod projection;
mod rectangle;
mod sphere;

pub use self::circle::Circle;
pub use self::position::{Edges, Position, PositionSummary};
pub use self::rectangle::Rectangle;
pub use self::sphere::SphereCircle;

/// Direction of travel along a Region boundary.
///
/// With y pointing up, clockwise keeps the Region's interior on the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Clockwise,
    CounterClockwise,
}

/// What `Region::search()` decided to do next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Jump to the candidate at this index.
    Fragment(usize),
    /// No candidate comes first: walk to this boundary vertex.
    Boundary(Coord),
    /// The starting point isn't on the boundary.
    Lost,
}

/// The part of a segment that lies within the closed Region.
///
/// `None` means "the segment's own endpoint". A `Some` entry means the
/// segment started outside; a `Some` exit means it ended outside (or left
/// the Region right where it ended up touching it).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub entry: Option<Coord>,
    pub exit: Option<Coord>,
}

impl Span {
    pub fn start(&self, a: &Coord) -> Coord {
        self.entry.unwrap_or(*a)
    }

    pub fn end(&self, b: &Coord) -> Coord {
        self.exit.unwrap_or(*b)
    }
}

/// A closed 2-D shape to clip or cut geometries against.
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    Rectangle(Rectangle),
    Circle(Circle),
    Sphere(SphereCircle),
}

impl Region {
    pub fn rectangle(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> ClipResult<Region> {
        Ok(Region::Rectangle(Rectangle::new(xmin, ymin, xmax, ymax)?))
    }

    pub fn circle(x: f64, y: f64, radius: f64) -> ClipResult<Region> {
        Ok(Region::Circle(Circle::new(Coord::new(x, y), radius)?))
    }

    /// A circle on the Earth: centre in degrees, radius in metres.
    pub fn sphere(lon: f64, lat: f64, radius: f64) -> ClipResult<Region> {
        Ok(Region::Sphere(SphereCircle::new(lon, lat, radius)?))
    }

    /// Inside or Outside; a Rectangle also reports `OnEdge` for points exactly
    /// on a side. Circles never say `OnEdge`: ask `is_on_edge()`.
    pub fn position(&self, c: &Coord) -> Position {
        match self {
            &Region::Rectangle(ref r) => r.position(c),
            &Region::Circle(ref r) => r.position(c),
            &Region::Sphere(ref r) => r.position(c),
        }
    }

    pub fn is_on_edge(&self, c: &Coord) -> bool {
        match self {
            &Region::Rectangle(ref r) => r.position(c).is_on_edge(),
            &Region::Circle(ref r) => r.is_on_edge(c),
            &Region::Sphere(ref r) => r.is_on_edge(c),
        }
    }

    /// Like `position()`, but circles report `OnEdge` within their tolerance.
    ///
    /// This is what classification accumulates, so a vertex that merely
    /// grazes a circle counts as neither inside nor outside.
    pub fn vertex_position(&self, c: &Coord) -> Position {
        match self {
            &Region::Rectangle(ref r) => r.position(c),
            _ if self.is_on_edge(c) => Position::OnEdge(Edges::NONE),
            _ => self.position(c),
        }
    }

    /// Intersects segment `a→b` with the closed Region. `None` means they
    /// don't meet at all.
    pub fn span(&self, a: &Coord, b: &Coord) -> Option<Span> {
        match self {
            &Region::Rectangle(ref r) => r.span(a, b),
            &Region::Circle(ref r) => r.span(a, b),
            &Region::Sphere(ref r) => r.span(a, b),
        }
    }

    /// True if the straight path from `e` to `x` (both in the closed Region)
    /// crosses the interior, rather than touching the boundary or running
    /// along it.
    pub fn is_interior_span(&self, e: &Coord, x: &Coord) -> bool {
        match self {
            &Region::Rectangle(ref r) => r.is_interior_span(e, x),
            &Region::Circle(ref r) => r.is_interior_span(e, x),
            &Region::Sphere(ref r) => r.is_interior_span(e, x),
        }
    }

    /// Classifies `line` and hands every piece inside the Region to `fragments`.
    pub fn clip(&self, line: &[Coord], fragments: &mut Fragments, role: Role) -> PositionSummary {
        segment::classify(self, line, Keep::Inside, fragments, role)
    }

    /// Classifies `line` and hands every piece outside the Region to `fragments`.
    pub fn cut(&self, line: &[Coord], fragments: &mut Fragments, role: Role) -> PositionSummary {
        segment::classify(self, line, Keep::Outside, fragments, role)
    }

    /// True if the whole Region lies within `ring`.
    pub fn is_inside_ring(&self, ring: &[Coord]) -> bool {
        match self {
            &Region::Rectangle(ref r) => r.is_inside_ring(ring),
            &Region::Circle(ref r) => r.is_inside_ring(ring),
            &Region::Sphere(ref r) => r.is_inside_ring(ring),
        }
    }

    /// True if `ring`, which must not cross the boundary, lies inside the
    /// Region. Decided by the first vertex that isn't on the boundary; a ring
    /// that runs entirely along the boundary counts as inside.
    pub fn is_ring_inside(&self, ring: &[Coord]) -> bool {
        for c in ring {
            match self.vertex_position(c) {
                Position::Inside => return true,
                Position::Outside => return false,
                Position::OnEdge(_) => {}
            }
        }
        true
    }

    /// The Region's own boundary as a clockwise ring.
    pub fn make_ring(&self, max_segment_length: f64) -> LineString {
        LineString(match self {
            &Region::Rectangle(ref r) => r.make_ring(max_segment_length),
            &Region::Circle(ref r) => r.make_ring(max_segment_length),
            &Region::Sphere(ref r) => r.make_ring(max_segment_length),
        })
    }

    /// The Region's own boundary as a counter-clockwise ring.
    pub fn make_hole(&self, max_segment_length: f64) -> LineString {
        self.make_ring(max_segment_length).reversed()
    }

    /// From boundary point `end`, finds the candidate in `starts` that comes
    /// first when walking the boundary in the given sense, unless a corner
    /// (or arc vertex) comes first. A candidate exactly at that corner loses:
    /// we walk to the corner, and pick the candidate on the next call.
    pub fn search(&self, sense: Sense, end: &Coord, starts: &[Coord]) -> Step {
        match self {
            &Region::Rectangle(ref r) => r.search(sense, end, starts),
            &Region::Circle(ref r) => r.search(sense, end, starts),
            &Region::Sphere(ref r) => r.search(sense, end, starts),
        }
    }

    pub fn search_cw(&self, end: &Coord, starts: &[Coord]) -> Step {
        self.search(Sense::Clockwise, end, starts)
    }

    pub fn search_ccw(&self, end: &Coord, starts: &[Coord]) -> Step {
        self.search(Sense::CounterClockwise, end, starts)
    }

    /// Appends to `ring` the boundary path from `from` (already the last
    /// vertex of `ring`) to `to`, ending with `to` itself.
    ///
    /// Returns false, appending nothing, if the two points coincide.
    pub fn connect_points(&self, sense: Sense, ring: &mut Vec<Coord>, from: &Coord, to: &Coord, max_segment_length: f64) -> bool {
        match self {
            &Region::Rectangle(ref r) => r.connect_points(sense, ring, from, to, max_segment_length),
            &Region::Circle(ref r) => r.connect_points(sense, ring, from, to, max_segment_length),
            &Region::Sphere(ref r) => r.connect_points(sense, ring, from, to, max_segment_length),
        }
    }

    pub fn connect_points_cw(&self, ring: &mut Vec<Coord>, from: &Coord, to: &Coord, max_segment_length: f64) -> bool {
        self.connect_points(Sense::Clockwise, ring, from, to, max_segment_length)
    }

    pub fn connect_points_ccw(&self, ring: &mut Vec<Coord>, from: &Coord, to: &Coord, max_segment_length: f64) -> bool {
        self.connect_points(Sense::CounterClockwise, ring, from, to, max_segment_length)
    }

    /// How many corners or arc vertices one trip around the boundary passes.
    pub fn boundary_vertex_count(&self) -> usize {
        match self {
            &Region::Rectangle(_) => 4,
            &Region::Circle(ref r) => r.segments(),
            &Region::Sphere(ref r) => r.segments(),
        }
    }

    /// An axis-aligned box around the Region in input coordinates, when one
    /// can be had cheaply.
    pub fn bounding_box(&self) -> Option<Rectangle> {
        match self {
            &Region::Rectangle(ref r) => Some(r.clone()),
            &Region::Circle(ref r) => r.bounding_box(),
            &Region::Sphere(_) => None,
        }
    }
}

/// Most pieces one boundary segment is split into.
pub const MAX_SUBDIVISIONS: usize = 1 << 16;

/// Appends `to` after the last vertex of `ring`, with evenly spaced vertices
/// in between so no piece is longer than `max_segment_length` (if positive).
///
/// A segment is split into at most `MAX_SUBDIVISIONS` pieces.
pub(crate) fn push_segment(ring: &mut Vec<Coord>, to: Coord, max_segment_length: f64) {
    if let Some(&from) = ring.last() {
        if max_segment_length > 0.0 {
            let n = (from.distance(&to) / max_segment_length).ceil();
            if n > 1.0 {
                let n = if n > MAX_SUBDIVISIONS as f64 {
                    warn!("max_segment_length {} would split a segment into {} pieces; using {}", max_segment_length, n, MAX_SUBDIVISIONS);
                    MAX_SUBDIVISIONS
                } else {
                    n as usize
                };
                let dx = to.x - from.x;
                let dy = to.y - from.y;
                for i in 1..n {
                    let t = i as f64 / n as f64;
                    ring.push(Coord::new(from.x + t * dx, from.y + t * dy));
                }
            }
        }
    }
    ring.push(to);
}
