use std::cmp::Ordering;
use std::fmt;
use itertools::Itertools;

pub mod wkb;
pub mod wkt;

/// A 2-D position.
///
/// Coordinates are never snapped or rounded by the clipping code: a `Coord`
/// that comes out of a clip is either an input vertex, an exact boundary
/// value, or a freshly computed intersection. That is what lets rings close
/// with plain `==`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Coord {
        Coord { x: x, y: y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance2(&self, other: &Coord) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Coord) -> f64 {
        self.distance2(other).sqrt()
    }

    pub fn midpoint(&self, other: &Coord) -> Coord {
        Coord::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Orders by x, then y. This is how ring normalization picks its start.
    pub fn cmp_xy(&self, other: &Coord) -> Ordering {
        self.x.partial_cmp(&other.x)
            .unwrap_or(Ordering::Equal)
            .then(self.y.partial_cmp(&other.y).unwrap_or(Ordering::Equal))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", wkt::Number(self.x), wkt::Number(self.y))
    }
}

/// A path joining any number of Coords.
///
/// When the first and last Coords are identical, it's a ring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineString(pub Vec<Coord>);

impl LineString {
    pub fn new() -> LineString {
        LineString(Vec::new())
    }

    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Coord> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Coord> {
        self.0.last()
    }

    pub fn push(&mut self, coord: Coord) {
        self.0.push(coord)
    }

    /// True if there are at least two Coords and the first equals the last.
    pub fn is_closed(&self) -> bool {
        self.0.len() > 1 && self.0.first() == self.0.last()
    }

    pub fn winding_order(&self) -> WindingOrder {
        winding_order(&self.0)
    }

    pub fn reversed(&self) -> LineString {
        let mut coords = self.0.clone();
        coords.reverse();
        LineString(coords)
    }

    /// Returns a copy wound in the given order.
    pub fn oriented(&self, order: WindingOrder) -> LineString {
        if self.winding_order() == order {
            self.clone()
        } else {
            self.reversed()
        }
    }
}

impl From<Vec<Coord>> for LineString {
    fn from(coords: Vec<Coord>) -> LineString {
        LineString(coords)
    }
}

/// An exterior ring plus any number of holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub exterior: LineString,
    pub interiors: Vec<LineString>,
}

impl Polygon {
    pub fn new(exterior: LineString, interiors: Vec<LineString>) -> Polygon {
        Polygon {
            exterior: exterior,
            interiors: interiors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(LineString),
    /// Parsed and written, but never accepted by the clipping operations.
    LinearRing(LineString),
    Polygon(Polygon),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// `GEOMETRYCOLLECTION EMPTY`: what's left when nothing survives.
    pub fn empty() -> Geometry {
        Geometry::GeometryCollection(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            &Geometry::Point(_) => false,
            &Geometry::LineString(ref line) => line.is_empty(),
            &Geometry::LinearRing(ref ring) => ring.is_empty(),
            &Geometry::Polygon(ref polygon) => polygon.is_empty(),
            &Geometry::MultiPoint(ref points) => points.is_empty(),
            &Geometry::MultiLineString(ref lines) => lines.iter().all(|l| l.is_empty()),
            &Geometry::MultiPolygon(ref polygons) => polygons.iter().all(|p| p.is_empty()),
            &Geometry::GeometryCollection(ref geometries) => geometries.iter().all(|g| g.is_empty()),
        }
    }

    /// The WKT type keyword.
    pub fn type_name(&self) -> &'static str {
        match self {
            &Geometry::Point(_) => "Point",
            &Geometry::LineString(_) => "LineString",
            &Geometry::LinearRing(_) => "LinearRing",
            &Geometry::Polygon(_) => "Polygon",
            &Geometry::MultiPoint(_) => "MultiPoint",
            &Geometry::MultiLineString(_) => "MultiLineString",
            &Geometry::MultiPolygon(_) => "MultiPolygon",
            &Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Twice the total polygonal area, ignoring winding.
    pub fn area2(&self) -> f64 {
        match self {
            &Geometry::Polygon(ref polygon) => polygon_area2(polygon),
            &Geometry::MultiPolygon(ref polygons) => polygons.iter().map(polygon_area2).sum(),
            &Geometry::GeometryCollection(ref geometries) => geometries.iter().map(|g| g.area2()).sum(),
            _ => 0.0,
        }
    }
}

fn polygon_area2(polygon: &Polygon) -> f64 {
    let holes: f64 = polygon.interiors.iter().map(|r| signed_area2(&r.0).abs()).sum();
    signed_area2(&polygon.exterior.0).abs() - holes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindingOrder {
    Clockwise,
    CounterClockwise,
}

impl WindingOrder {
    pub fn reverse(self) -> WindingOrder {
        match self {
            WindingOrder::Clockwise => WindingOrder::CounterClockwise,
            WindingOrder::CounterClockwise => WindingOrder::Clockwise,
        }
    }
}

/// Returns 2*area, positive iff the ring is counter-clockwise.
///
/// Assumes y grows **upwards** (as in WGS84 or any projected CRS).
///
/// Assumes the first and last Coords are identical.
pub fn signed_area2<'a, T: IntoIterator<Item=&'a Coord>>(coords: T) -> f64 {
    // https://en.wikipedia.org/wiki/Shoelace_formula
    let mut a = 0.0;

    for (p1, p2) in coords.into_iter().tuple_windows() {
        a += p1.x * p2.y - p2.x * p1.y;
    }

    a
}

/// Returns winding order.
///
/// A zero-area ring is considered to be Clockwise.
pub fn winding_order<'a, T: IntoIterator<Item=&'a Coord>>(coords: T) -> WindingOrder {
    if signed_area2(coords) > 0.0 {
        WindingOrder::CounterClockwise
    } else {
        WindingOrder::Clockwise
    }
}

/// Winding-number test. Undefined result if the point is _on_ the ring: call
/// `point_on_ring()` first when that matters.
pub fn ring_contains_point(ring: &[Coord], point: &Coord) -> bool {
    // http://geomalgorithms.com/a03-_inclusion.html
    //    Return: >0 for p2 left of the line through p0 and p1
    //            =0 for p2  on the line
    //            <0 for p2  right of the line
    fn is_left(p0: &Coord, p1: &Coord, p2: &Coord) -> f64 {
        (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
    }

    let mut wn = 0; // 0 means "outside polygon"; non-0 means inside

    for (p1, p2) in ring.iter().tuple_windows() {
        if p1.y <= point.y {
            if p2.y > point.y && is_left(p1, p2, point) > 0.0 {
                wn += 1; // upward crossing
            }
        } else if p2.y <= point.y && is_left(p1, p2, point) < 0.0 {
            wn -= 1; // downward crossing
        }
    }

    wn != 0
}

/// True if the point lies exactly on one of the ring's segments.
pub fn point_on_ring(ring: &[Coord], point: &Coord) -> bool {
    ring.iter().tuple_windows().any(|(p1, p2)| {
        let cross = (p2.x - p1.x) * (point.y - p1.y) - (point.x - p1.x) * (p2.y - p1.y);
        cross == 0.0
            && point.x >= p1.x.min(p2.x) && point.x <= p1.x.max(p2.x)
            && point.y >= p1.y.min(p2.y) && point.y <= p1.y.max(p2.y)
    })
}

/// Rotates a closed ring so its smallest Coord (by x, then y) comes first,
/// then re-closes it exactly.
///
/// Clipping output runs every ring it builds through this, so equal rings
/// print identically no matter where reconnection happened to start them.
pub fn normalize_ring(ring: &mut Vec<Coord>) {
    if ring.len() < 2 {
        return;
    }

    let n = ring.len() - 1; // ignore the closing duplicate
    let best = (0..n).fold(0, |best, i| {
        if ring[i].cmp_xy(&ring[best]) == Ordering::Less { i } else { best }
    });

    if best != 0 {
        ring[..n].rotate_left(best);
    }
    ring[n] = ring[0];
}

/// Reorients every polygon ring the OGC way: exterior counter-clockwise,
/// holes clockwise.
///
/// Clipping emits clockwise exteriors; call this afterwards if a consumer
/// wants the OGC convention.
pub fn orient_ogc(geometry: &mut Geometry) {
    fn orient_polygon(polygon: &mut Polygon) {
        polygon.exterior = polygon.exterior.oriented(WindingOrder::CounterClockwise);
        for hole in polygon.interiors.iter_mut() {
            *hole = hole.oriented(WindingOrder::Clockwise);
        }
    }

    match geometry {
        &mut Geometry::Polygon(ref mut polygon) => orient_polygon(polygon),
        &mut Geometry::MultiPolygon(ref mut polygons) => polygons.iter_mut().for_each(orient_polygon),
        &mut Geometry::GeometryCollection(ref mut geometries) => geometries.iter_mut().for_each(orient_ogc),
        _ => {}
    }
}
