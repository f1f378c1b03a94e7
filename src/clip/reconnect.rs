//! Closes open fragments into rings by walking the Region's boundary.
//!
//! Every fragment starts and ends on the boundary. From a fragment's end we
//! walk the boundary (in whichever sense keeps the kept area on our right)
//! until we reach the start of some fragment, which may be our own:
//!
//! ```text
//!     +----<-----+----<----+
//!     |          |         |     A ends on the top side; walking clockwise
//!     |    A     |    B    |     we reach the start of B, then from B's end
//!     |          |         |     we walk back to A's start.
//!     +---->-----+---->----+
//! ```

use std::mem;

use crate::clip::fragments::Role;
use crate::clip::segment::Keep;
use crate::geo::{signed_area2, winding_order, Coord, WindingOrder};
use crate::region::{Region, Sense, Step};

/// What to produce when a pool has no fragments at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Synthesize {
    Nothing,
    /// The Region's boundary, as a shell.
    Ring,
    /// The Region's boundary, as a hole.
    Hole,
}

/// Closed rings out of one pool: shells clockwise, holes counter-clockwise.
#[derive(Debug, Default, PartialEq)]
pub struct Rings {
    pub shells: Vec<Vec<Coord>>,
    pub holes: Vec<Vec<Coord>>,
}

/// Which way to walk the boundary from a fragment's end.
///
/// Clipping keeps the Region's inside, which lies to the right when walking
/// clockwise. Cutting keeps the outside, so it goes the other way, and the
/// interior pool (which traces removed area) flips it again.
pub fn sense_for(keep: Keep, role: Role) -> Sense {
    let keep_inside = keep == Keep::Inside;
    let interior = role == Role::Interior;

    if keep_inside != interior {
        Sense::Clockwise
    } else {
        Sense::CounterClockwise
    }
}

/// Turns one pool of fragments into rings.
///
/// In the exterior pool, clockwise rings are shells and counter-clockwise
/// rings are holes. The interior pool traces removed area, so there it's the
/// other way around.
pub fn reconnect(region: &Region, keep: Keep, role: Role, mut pool: Vec<Vec<Coord>>, synthesize: Synthesize, max_segment_length: f64) -> Rings {
    let mut rings = Rings::default();

    if pool.is_empty() {
        match synthesize {
            Synthesize::Nothing => {}
            Synthesize::Ring => rings.shells.push(region.make_ring(max_segment_length).0),
            Synthesize::Hole => rings.holes.push(region.make_hole(max_segment_length).0),
        }
        return rings;
    }

    let sense = sense_for(keep, role);
    let max_steps = 2 * region.boundary_vertex_count() + 2 * pool.len() + 8;

    let mut current: Vec<Coord> = Vec::new();
    let mut steps = 0;

    loop {
        if current.is_empty() {
            if pool.is_empty() {
                break;
            }
            current = pool.remove(0);
            steps = 0;
        }

        if current.len() > 2 && current.first() == current.last() {
            let ring = mem::replace(&mut current, Vec::new());
            add_ring(&mut rings, ring, role);
            continue;
        }

        steps += 1;
        if steps > max_steps {
            warn!("gave up closing a {}-vertex ring after {} steps", current.len(), max_steps);
            current.clear();
            continue;
        }

        let start = current[0];
        let end = current[current.len() - 1];
        let mut starts: Vec<Coord> = pool.iter().map(|fragment| fragment[0]).collect();
        starts.push(start);

        match region.search(sense, &end, &starts) {
            Step::Fragment(i) if i == pool.len() => {
                if !region.connect_points(sense, &mut current, &end, &start, max_segment_length) {
                    let n = current.len();
                    current[n - 1] = start;
                }
            }
            Step::Fragment(i) => {
                let next = pool.remove(i);
                region.connect_points(sense, &mut current, &end, &next[0], max_segment_length);
                current.extend_from_slice(&next[1..]);
            }
            Step::Boundary(corner) => {
                region.connect_points(sense, &mut current, &end, &corner, max_segment_length);
            }
            Step::Lost => {
                warn!("fragment end {} isn't on the boundary; dropping a {}-vertex ring", end, current.len());
                current.clear();
            }
        }
    }

    rings
}

fn add_ring(rings: &mut Rings, mut ring: Vec<Coord>, role: Role) {
    ring.dedup();

    let area2 = signed_area2(&ring);
    if ring.len() < 4 || area2 == 0.0 || !area2.is_finite() {
        debug!("discarding a degenerate {}-vertex ring", ring.len());
        return;
    }

    let clockwise = winding_order(&ring) == WindingOrder::Clockwise;
    let shell = clockwise != (role == Role::Interior);

    if clockwise != shell {
        ring.reverse();
    }

    if shell {
        rings.shells.push(ring);
    } else {
        rings.holes.push(ring);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn c(x: f64, y: f64) -> Coord { Coord::new(x, y) }

    fn rect() -> Region {
        Region::rectangle(0.0, 0.0, 10.0, 10.0).unwrap()
    }

    #[test]
    fn test_sense() {
        assert_eq!(Sense::Clockwise, sense_for(Keep::Inside, Role::Exterior));
        assert_eq!(Sense::CounterClockwise, sense_for(Keep::Outside, Role::Exterior));
        assert_eq!(Sense::Clockwise, sense_for(Keep::Outside, Role::Interior));
    }

    #[test]
    fn test_empty_pool() {
        let rings = reconnect(&rect(), Keep::Inside, Role::Exterior, vec![], Synthesize::Nothing, 0.0);
        assert_eq!(Rings::default(), rings);
    }

    #[test]
    fn test_synthesize_ring() {
        let rings = reconnect(&rect(), Keep::Inside, Role::Exterior, vec![], Synthesize::Ring, 0.0);
        assert_eq!(vec![ rect().make_ring(0.0).0 ], rings.shells);
        assert!(rings.holes.is_empty());
    }

    #[test]
    fn test_synthesize_hole() {
        let rings = reconnect(&rect(), Keep::Outside, Role::Interior, vec![], Synthesize::Hole, 0.0);
        assert!(rings.shells.is_empty());
        assert_eq!(vec![ rect().make_hole(0.0).0 ], rings.holes);
    }

    #[test]
    fn test_closes_one_fragment_along_a_side() {
        let fragment = vec![ c(0.0, 8.0), c(5.0, 8.0), c(5.0, 2.0), c(0.0, 2.0) ];
        let rings = reconnect(&rect(), Keep::Inside, Role::Exterior, vec![ fragment ], Synthesize::Nothing, 0.0);
        assert_eq!(vec![
            vec![ c(0.0, 8.0), c(5.0, 8.0), c(5.0, 2.0), c(0.0, 2.0), c(0.0, 8.0) ],
        ], rings.shells);
    }

    #[test]
    fn test_closes_around_a_corner() {
        // clockwise from (10, 5) passes the bottom-right corner
        let fragment = vec![ c(5.0, 0.0), c(5.0, 5.0), c(10.0, 5.0) ];
        let rings = reconnect(&rect(), Keep::Inside, Role::Exterior, vec![ fragment ], Synthesize::Nothing, 0.0);
        assert_eq!(vec![
            vec![ c(5.0, 0.0), c(5.0, 5.0), c(10.0, 5.0), c(10.0, 0.0), c(5.0, 0.0) ],
        ], rings.shells);
    }

    #[test]
    fn test_joins_two_fragments() {
        // a band across the Region with a notch cut down from the top
        let notch = vec![ c(4.0, 10.0), c(4.0, 8.0), c(6.0, 8.0), c(6.0, 10.0) ];
        let bottom = vec![ c(10.0, 5.0), c(0.0, 5.0) ];
        let rings = reconnect(&rect(), Keep::Inside, Role::Exterior, vec![ notch, bottom ], Synthesize::Nothing, 0.0);
        assert_eq!(vec![
            vec![
                c(4.0, 10.0), c(4.0, 8.0), c(6.0, 8.0), c(6.0, 10.0), c(10.0, 10.0),
                c(10.0, 5.0), c(0.0, 5.0), c(0.0, 10.0), c(4.0, 10.0),
            ],
        ], rings.shells);
        assert_relative_eq!(-92.0, signed_area2(&rings.shells[0]));
    }

    #[test]
    fn test_cut_keeps_each_side_apart() {
        let left = vec![ c(0.0, 2.0), c(-5.0, 2.0), c(-5.0, 8.0), c(0.0, 8.0) ];
        let right = vec![ c(10.0, 8.0), c(15.0, 8.0), c(15.0, 2.0), c(10.0, 2.0) ];
        let rings = reconnect(&rect(), Keep::Outside, Role::Exterior, vec![ left, right ], Synthesize::Nothing, 0.0);
        assert_eq!(vec![
            vec![ c(0.0, 2.0), c(-5.0, 2.0), c(-5.0, 8.0), c(0.0, 8.0), c(0.0, 2.0) ],
            vec![ c(10.0, 8.0), c(15.0, 8.0), c(15.0, 2.0), c(10.0, 2.0), c(10.0, 8.0) ],
        ], rings.shells);
        assert!(rings.holes.is_empty());
    }

    #[test]
    fn test_counter_clockwise_ring_is_a_hole() {
        let hole = vec![ c(2.0, 2.0), c(4.0, 2.0), c(4.0, 4.0), c(2.0, 2.0) ];
        let rings = reconnect(&rect(), Keep::Inside, Role::Exterior, vec![ hole.clone() ], Synthesize::Nothing, 0.0);
        assert_eq!(vec![ hole ], rings.holes);
        assert!(rings.shells.is_empty());
    }

    #[test]
    fn test_lost_fragment_is_dropped() {
        let fragment = vec![ c(0.0, 5.0), c(5.0, 5.0) ];
        let rings = reconnect(&rect(), Keep::Inside, Role::Exterior, vec![ fragment ], Synthesize::Nothing, 0.0);
        assert_eq!(Rings::default(), rings);
    }

    #[test]
    fn test_interior_pool_clockwise_is_a_hole() {
        let fragment = vec![ c(10.0, 6.0), c(12.0, 6.0), c(12.0, 4.0), c(10.0, 4.0) ];
        let rings = reconnect(&rect(), Keep::Outside, Role::Interior, vec![ fragment ], Synthesize::Hole, 0.0);
        assert!(rings.shells.is_empty());
        assert_eq!(1, rings.holes.len());
        let hole = &rings.holes[0];
        assert_eq!(WindingOrder::CounterClockwise, winding_order(hole));
        assert_relative_eq!(2.0 * 104.0, signed_area2(hole));
    }
}
