//! Clipping (keep what's inside a Region) and cutting (keep what's outside).
//!
//! Every line is walked once against the Region (see `segment`). If it never
//! crosses the boundary we keep or drop it whole; otherwise the kept pieces
//! become lines, or, for polygons, get closed up along the Region's boundary
//! (see `reconnect`) and paired with holes again (see `assemble`).
//!
//! Internally, polygon exteriors are clockwise and holes counter-clockwise.
//! Output uses the same convention; call `geo::orient_ogc()` for OGC order.

pub mod assemble;
mod builder;
pub mod fragments;
pub mod reconnect;
pub mod segment;

use crate::error::{ClipError, ClipResult};
use crate::geo::{Coord, Geometry, LineString, Polygon, WindingOrder};
use crate::region::{Position, PositionSummary, Region};

use self::assemble::rings_to_polygons;
use self::builder::GeometryBuilder;
use self::fragments::{Fragments, Role};
use self::reconnect::{reconnect, Synthesize};
use self::segment::Keep;

/// The part of `geometry` inside `region`. Polygons come out as their
/// boundary lines.
///
/// ```
/// use shapeclip::{lineclip, Geometry, Region};
///
/// let region = Region::rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
/// let line: Geometry = "LINESTRING (-1 5,5 5,9 9)".parse().unwrap();
/// let clipped = lineclip(&line, &region).unwrap();
/// assert_eq!("LINESTRING (0 5,5 5,9 9)", clipped.to_string());
/// ```
pub fn lineclip(geometry: &Geometry, region: &Region) -> ClipResult<Geometry> {
    Clipper::new(region, Keep::Inside, Output::Lines, 0.0)?.run(geometry)
}

/// The part of `geometry` inside `region`, keeping polygons as polygons.
///
/// Boundary runs added to close a polygon are split so no piece is longer
/// than `max_segment_length`; 0 means "don't split". For a SphereCircle the
/// length is in metres.
///
/// ```
/// use shapeclip::{polyclip, Geometry, Region};
///
/// let region = Region::rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
/// let polygon: Geometry = "POLYGON ((-1 -1,-1 5,5 5,5 -1,-1 -1))".parse().unwrap();
/// let clipped = polyclip(&polygon, &region, 0.0).unwrap();
/// assert_eq!("POLYGON ((0 0,0 5,5 5,5 0,0 0))", clipped.to_string());
/// ```
pub fn polyclip(geometry: &Geometry, region: &Region, max_segment_length: f64) -> ClipResult<Geometry> {
    Clipper::new(region, Keep::Inside, Output::Polygons, max_segment_length)?.run(geometry)
}

/// The part of `geometry` outside `region`. Polygons come out as their
/// boundary lines.
pub fn linecut(geometry: &Geometry, region: &Region) -> ClipResult<Geometry> {
    Clipper::new(region, Keep::Outside, Output::Lines, 0.0)?.run(geometry)
}

/// The part of `geometry` outside `region`, keeping polygons as polygons.
///
/// ```
/// use shapeclip::{polycut, Geometry, Region};
///
/// let region = Region::rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
/// let polygon: Geometry = "POLYGON ((-1 -1,-1 5,5 5,5 -1,-1 -1))".parse().unwrap();
/// let cut = polycut(&polygon, &region, 0.0).unwrap();
/// assert_eq!("POLYGON ((-1 -1,-1 5,0 5,0 0,5 0,5 -1,-1 -1))", cut.to_string());
/// ```
pub fn polycut(geometry: &Geometry, region: &Region, max_segment_length: f64) -> ClipResult<Geometry> {
    Clipper::new(region, Keep::Outside, Output::Polygons, max_segment_length)?.run(geometry)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Output {
    Lines,
    Polygons,
}

/// Where a whole line ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    Inside,
    Outside,
    Crossing,
}

struct Clipper<'a> {
    region: &'a Region,
    keep: Keep,
    output: Output,
    max_segment_length: f64,
}

impl<'a> Clipper<'a> {
    fn new(region: &'a Region, keep: Keep, output: Output, max_segment_length: f64) -> ClipResult<Clipper<'a>> {
        if !(max_segment_length >= 0.0) || max_segment_length.is_infinite() {
            return Err(ClipError::InvalidArgument(format!("max_segment_length must be a finite number >= 0, not {}", max_segment_length)));
        }

        Ok(Clipper {
            region: region,
            keep: keep,
            output: output,
            max_segment_length: max_segment_length,
        })
    }

    fn run(&self, geometry: &Geometry) -> ClipResult<Geometry> {
        let mut builder = GeometryBuilder::new();
        self.do_geom(geometry, &mut builder)?;
        Ok(builder.build())
    }

    fn do_geom(&self, geometry: &Geometry, out: &mut GeometryBuilder) -> ClipResult<()> {
        match geometry {
            &Geometry::Point(ref c) => self.do_point(c, out),
            &Geometry::LineString(ref line) => self.do_linestring(line, out),
            &Geometry::LinearRing(_) => return Err(ClipError::UnsupportedGeometry("LinearRing")),
            &Geometry::Polygon(ref polygon) => self.do_polygon(polygon, out),
            &Geometry::MultiPoint(ref points) => {
                for c in points.iter() {
                    self.do_point(c, out);
                }
            }
            &Geometry::MultiLineString(ref lines) => {
                for line in lines.iter() {
                    self.do_linestring(line, out);
                }
            }
            &Geometry::MultiPolygon(ref polygons) => {
                for polygon in polygons.iter() {
                    self.do_polygon(polygon, out);
                }
            }
            &Geometry::GeometryCollection(ref geometries) => {
                for geometry in geometries.iter() {
                    self.do_geom(geometry, out)?;
                }
            }
        }

        Ok(())
    }

    /// True for positions on the side we keep. The boundary is on neither.
    fn keeps(&self, position: Position) -> bool {
        match (self.keep, position) {
            (Keep::Inside, Position::Inside) => true,
            (Keep::Outside, Position::Outside) => true,
            _ => false,
        }
    }

    fn keeps_placement(&self, placement: Placement) -> bool {
        match (self.keep, placement) {
            (Keep::Inside, Placement::Inside) => true,
            (Keep::Outside, Placement::Outside) => true,
            _ => false,
        }
    }

    fn do_point(&self, c: &Coord, out: &mut GeometryBuilder) {
        if self.keeps(self.region.vertex_position(c)) {
            out.add_point(*c);
        }
    }

    /// Walks one line, sending kept pieces to `fragments`.
    fn classify(&self, line: &[Coord], fragments: &mut Fragments, role: Role) -> PositionSummary {
        if let Some(bounds) = self.region.bounding_box() {
            if bounds.is_disjoint(line) {
                let mut summary = PositionSummary::new();
                summary.add(Position::Outside);
                return summary;
            }
        }

        match self.keep {
            Keep::Inside => self.region.clip(line, fragments, role),
            Keep::Outside => self.region.cut(line, fragments, role),
        }
    }

    fn placement(&self, summary: &PositionSummary, line: &[Coord]) -> Placement {
        match (summary.all_not_inside(), summary.all_not_outside()) {
            (false, false) => Placement::Crossing,
            (true, false) => Placement::Outside,
            (false, true) => Placement::Inside,
            // nothing but boundary
            (true, true) => if self.region.is_ring_inside(line) { Placement::Inside } else { Placement::Outside },
        }
    }

    fn do_linestring(&self, line: &LineString, out: &mut GeometryBuilder) {
        if line.is_empty() {
            return;
        }

        let mut fragments = Fragments::new();
        let summary = self.classify(&line.0, &mut fragments, Role::Exterior);

        match self.placement(&summary, &line.0) {
            Placement::Crossing => {
                for fragment in fragments.into_lines() {
                    out.add_line(fragment);
                }
            }
            placement if self.keeps_placement(placement) => out.add_line(line.clone()),
            _ => {}
        }
    }

    fn do_polygon(&self, polygon: &Polygon, out: &mut GeometryBuilder) {
        match self.output {
            Output::Lines => self.do_polygon_to_linestrings(polygon, out),
            Output::Polygons => self.do_polygon_to_polygons(polygon, out),
        }
    }

    /// Each ring is handled on its own, like a line: exterior clockwise,
    /// holes counter-clockwise.
    fn do_polygon_to_linestrings(&self, polygon: &Polygon, out: &mut GeometryBuilder) {
        let exterior = Some(polygon.exterior.oriented(WindingOrder::Clockwise));
        let holes = polygon.interiors.iter().map(|ring| ring.oriented(WindingOrder::CounterClockwise));

        for ring in exterior.into_iter().chain(holes) {
            self.do_linestring(&ring, out);
        }
    }

    fn do_polygon_to_polygons(&self, polygon: &Polygon, out: &mut GeometryBuilder) {
        if polygon.exterior.len() < 4 {
            debug!("skipping a polygon with a {}-vertex exterior", polygon.exterior.len());
            return;
        }

        let exterior = polygon.exterior.oriented(WindingOrder::Clockwise);
        let mut fragments = Fragments::new();
        let summary = self.classify(&exterior.0, &mut fragments, Role::Exterior);
        let placement = self.placement(&summary, &exterior.0);
        trace!("polygon exterior: {:?} ({:?})", placement, summary);

        let mut shells: Vec<Vec<Coord>> = Vec::new();
        let mut holes: Vec<Vec<Coord>> = Vec::new();
        let mut synthesize_exterior = Synthesize::Nothing;
        let mut synthesize_interior = Synthesize::Nothing;

        match (self.keep, placement) {
            (Keep::Inside, Placement::Inside) => {
                out.add_polygon(polygon.clone());
                return;
            }
            (Keep::Outside, Placement::Inside) => return,
            (Keep::Inside, Placement::Outside) => {
                if !self.region.is_inside_ring(&exterior.0) {
                    return;
                }
                // the Region is our new exterior
                synthesize_exterior = Synthesize::Ring;
            }
            (Keep::Outside, Placement::Outside) => {
                if !self.region.is_inside_ring(&exterior.0) {
                    out.add_polygon(polygon.clone());
                    return;
                }
                // the Region becomes a hole; the exterior stays whole
                shells.push(exterior.0.clone());
                fragments.take(Role::Exterior);
                synthesize_interior = Synthesize::Hole;
            }
            (_, Placement::Crossing) => {}
        }

        // When cutting a Region out from inside the exterior, holes that
        // meet it merge with it: they trace removed area.
        let role = if self.keep == Keep::Outside && placement != Placement::Crossing {
            Role::Interior
        } else {
            Role::Exterior
        };

        for ring in polygon.interiors.iter() {
            if ring.is_empty() {
                continue;
            }

            let hole = ring.oriented(WindingOrder::CounterClockwise);
            let walked = match role {
                Role::Exterior => hole.clone(),
                Role::Interior => hole.reversed(),
            };

            let mut hole_fragments = Fragments::new();
            let summary = self.classify(&walked.0, &mut hole_fragments, role);
            let hole_placement = self.placement(&summary, &walked.0);
            trace!("polygon hole: {:?} ({:?})", hole_placement, summary);

            match (self.keep, hole_placement) {
                (Keep::Inside, Placement::Inside) => holes.push(hole.0),
                (Keep::Inside, Placement::Outside) => {
                    if self.region.is_inside_ring(&hole.0) {
                        // the Region sits in the hole: nothing to keep
                        return;
                    }
                }
                (Keep::Outside, Placement::Inside) => {}
                (Keep::Outside, Placement::Outside) => {
                    if self.region.is_inside_ring(&hole.0) {
                        out.add_polygon(polygon.clone());
                        return;
                    }
                    holes.push(hole.0);
                }
                (_, Placement::Crossing) => fragments.append(&mut hole_fragments),
            }
        }

        for &(pool, synthesize) in [ (Role::Exterior, synthesize_exterior), (Role::Interior, synthesize_interior) ].iter() {
            trace!("reconnecting {} {:?} fragments ({:?})", fragments.len(pool), pool, synthesize);
            let mut rings = reconnect(self.region, self.keep, pool, fragments.take(pool), synthesize, self.max_segment_length);
            shells.append(&mut rings.shells);
            holes.append(&mut rings.holes);
        }

        for polygon in rings_to_polygons(shells, holes) {
            out.add_polygon(polygon);
        }
    }
}
