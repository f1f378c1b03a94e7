//! Pairs reconstructed shells with holes.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::geo::{normalize_ring, point_on_ring, ring_contains_point, signed_area2, Coord, LineString, Polygon, WindingOrder};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

impl Bounds {
    fn of(coords: &[Coord]) -> Bounds {
        coords.iter().fold(
            Bounds { xmin: f64::INFINITY, ymin: f64::INFINITY, xmax: f64::NEG_INFINITY, ymax: f64::NEG_INFINITY },
            |b, c| Bounds {
                xmin: b.xmin.min(c.x),
                ymin: b.ymin.min(c.y),
                xmax: b.xmax.max(c.x),
                ymax: b.ymax.max(c.y),
            }
        )
    }

    /// Holes may touch their shell, so this doesn't need to be strict.
    fn contains(&self, other: &Bounds) -> bool {
        other.xmin >= self.xmin && other.xmax <= self.xmax
            && other.ymin >= self.ymin && other.ymax <= self.ymax
    }
}

fn ring_contains_hole(ring: &[Coord], ring_bounds: &Bounds, hole: &[Coord], hole_bounds: &Bounds) -> bool {
    if !ring_bounds.contains(hole_bounds) {
        return false;
    }

    // A vertex the two rings share says nothing: test one that isn't shared.
    if let Some(c) = hole.iter().find(|c| !point_on_ring(ring, c)) {
        return ring_contains_point(ring, c);
    }

    // Every vertex is on the shell, so try the middle of each hole edge.
    match hole.iter().tuple_windows().map(|(a, b)| a.midpoint(b)).find(|c| !point_on_ring(ring, c)) {
        Some(c) => ring_contains_point(ring, &c),
        // the hole traces the shell itself
        None => true,
    }
}

/// Builds polygons out of clockwise shells and counter-clockwise holes.
///
/// Every ring is re-oriented and rotated to start at its lowest vertex, so
/// output doesn't depend on where the clipping happened to start.
///
/// A hole that fits in no shell is dropped.
pub fn rings_to_polygons(shells: Vec<Vec<Coord>>, holes: Vec<Vec<Coord>>) -> Vec<Polygon> {
    struct PolygonBuilder {
        exterior: Vec<Coord>,
        area2: f64,
        bounds: Bounds,
        interiors: Vec<Vec<Coord>>,
    }

    let mut polygon_builders: Vec<PolygonBuilder> = shells.into_iter()
        .map(|ring| {
            let mut exterior = LineString(ring).oriented(WindingOrder::Clockwise).0;
            normalize_ring(&mut exterior);
            let area2 = signed_area2(&exterior).abs();
            let bounds = Bounds::of(&exterior);

            PolygonBuilder {
                exterior: exterior,
                area2: area2,
                bounds: bounds,
                interiors: vec![],
            }
        })
        .collect();

    // Put smallest shells in front, so that a hole lands in the innermost
    // shell that contains it:
    //
    // +------------+
    // |A           |
    // | +--------+ |
    // | |////////| |
    // | |/+----+/| |
    // | |/|B   |/| |
    // | |/| ++ |/| |
    // | |/| ++ |/| |
    // | |/|    |/| |
    // | |/+----+/| |
    // | |////////| |
    // | +--------+ |
    // |            |
    // +------------+
    //
    // B's hole is inside A too, but it belongs to B.
    polygon_builders.sort_by(|a, b| a.area2.partial_cmp(&b.area2).unwrap_or(Ordering::Equal));

    let single_shell = polygon_builders.len() == 1;

    'hole: for hole in holes.into_iter() {
        let mut interior = LineString(hole).oriented(WindingOrder::CounterClockwise).0;
        normalize_ring(&mut interior);

        if single_shell {
            polygon_builders[0].interiors.push(interior);
            continue;
        }

        let hole_bounds = Bounds::of(&interior);
        for polygon_builder in polygon_builders.iter_mut() {
            if ring_contains_hole(&polygon_builder.exterior, &polygon_builder.bounds, &interior, &hole_bounds) {
                polygon_builder.interiors.push(interior);
                continue 'hole;
            }
        }

        debug!("dropping a {}-vertex hole that fits in none of {} shells", interior.len(), polygon_builders.len());
    }

    polygon_builders.into_iter()
        .map(|pb| Polygon::new(LineString(pb.exterior), pb.interiors.into_iter().map(LineString).collect()))
        .collect()
}
