//! Walks a line segment by segment against a Region, splitting it into the
//! pieces we keep.
//!
//! Two things come out of one pass: the kept fragments (handed to a
//! `Fragments` collector) and a `PositionSummary` saying where the line went.
//!
//! Cutting keeps what's outside, and a line may slide along the boundary on
//! its way around the Region:
//!
//! ```text
//!     outside
//!   a----------e=========x----------b
//!              |  Region |
//!              +---------+
//! ```
//!
//! The `e==x` stretch belongs to the kept piece only while the line stays out
//! of the interior. If the line dives in right after sliding, the slide is
//! trimmed off the fragment before it ends; if it comes out of the interior
//! and slides before leaving, the slide is trimmed off the next fragment's
//! start.

use std::borrow::Cow;
use std::mem;

use itertools::Itertools;

use crate::clip::fragments::{Fragments, Role};
use crate::geo::Coord;
use crate::region::{Position, PositionSummary, Region};

/// Which side of the boundary we keep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keep {
    /// Clip: keep what's inside the Region.
    Inside,
    /// Cut: keep what's outside the Region.
    Outside,
}

impl Keep {
    fn position(&self) -> Position {
        match self {
            &Keep::Inside => Position::Inside,
            &Keep::Outside => Position::Outside,
        }
    }
}

/// Splits `line` against `region`. Kept pieces go to `fragments` under `role`.
///
/// A closed line (a ring) is walked from a vertex strictly on the kept side
/// when it has one, and the piece that wraps past its start is joined back
/// into one fragment.
pub fn classify(region: &Region, line: &[Coord], keep: Keep, fragments: &mut Fragments, role: Role) -> PositionSummary {
    let mut summary = PositionSummary::new();

    match line.first() {
        Some(c) => summary.add(region.vertex_position(c)),
        None => return summary,
    }

    let closed = line.len() > 2 && line.first() == line.last();
    let line = if closed {
        rotate_ring_to_kept_vertex(region, line, keep)
    } else {
        Cow::Borrowed(line)
    };

    let mut walker = Walker::new(region, keep);
    for (a, b) in line.iter().tuple_windows() {
        summary.add(region.vertex_position(b));
        walker.segment(a, b, &mut summary);
    }

    let mut parts = walker.finish();
    if closed {
        rejoin_ring_parts(&mut parts, &line);
    }

    trace!("classified a {}-vertex line into {} fragments: {:?}", line.len(), parts.len(), summary);

    for part in parts {
        fragments.add(role, part);
    }

    summary
}

/// Rotates a closed ring so it starts at the first vertex strictly on the
/// kept side, if there is one.
fn rotate_ring_to_kept_vertex<'a>(region: &Region, ring: &'a [Coord], keep: Keep) -> Cow<'a, [Coord]> {
    let wanted = keep.position();
    let n = ring.len() - 1;

    match ring[..n].iter().position(|c| region.vertex_position(c) == wanted) {
        Some(i) if i > 0 => {
            let mut rotated = Vec::with_capacity(ring.len());
            rotated.extend_from_slice(&ring[i..n]);
            rotated.extend_from_slice(&ring[..=i]);
            Cow::Owned(rotated)
        }
        _ => Cow::Borrowed(ring),
    }
}

/// If the walk was interrupted, its first and last pieces meet at the ring's
/// start vertex: make them one piece.
fn rejoin_ring_parts(parts: &mut Vec<Vec<Coord>>, ring: &[Coord]) {
    if parts.len() < 2 {
        return;
    }

    let starts_at_start = parts[0].first() == ring.first();
    let ends_at_end = parts[parts.len() - 1].last() == ring.last();
    if !starts_at_start || !ends_at_end {
        return;
    }

    let first = parts.remove(0);
    if let Some(mut last) = parts.pop() {
        last.extend_from_slice(&first[1..]);
        parts.insert(0, last);
    }
}

/// State for one walk down a line.
struct Walker<'a> {
    region: &'a Region,
    keep: Keep,
    current: Vec<Coord>,
    /// Index in `current` where the trailing boundary slide begins.
    travel_from: Option<usize>,
    /// `current` started where the line left the interior.
    after_exit: bool,
    parts: Vec<Vec<Coord>>,
}

impl<'a> Walker<'a> {
    fn new(region: &'a Region, keep: Keep) -> Walker<'a> {
        Walker {
            region: region,
            keep: keep,
            current: Vec::new(),
            travel_from: None,
            after_exit: false,
            parts: Vec::new(),
        }
    }

    fn segment(&mut self, a: &Coord, b: &Coord, summary: &mut PositionSummary) {
        let span = match self.region.span(a, b) {
            Some(span) => span,
            None => {
                match self.keep {
                    Keep::Inside => self.flush(),
                    Keep::Outside => self.extend(a, b, false),
                }
                return;
            }
        };

        let e = span.start(a);
        let x = span.end(b);

        if !e.is_finite() || !x.is_finite() {
            warn!("dropping segment {} -> {}: intersection isn't finite", a, b);
            self.flush();
            return;
        }

        let interior = self.region.is_interior_span(&e, &x);
        if interior {
            summary.add(Position::Inside);
        }

        match self.keep {
            Keep::Inside => {
                if !interior {
                    self.flush();
                    return;
                }

                if span.entry.is_some() || self.current.is_empty() {
                    self.flush();
                    self.current.push(e);
                }
                if self.current.last() != Some(&x) {
                    self.current.push(x);
                }
                if span.exit.is_some() {
                    self.flush();
                }
            }
            Keep::Outside => {
                if span.entry.is_some() {
                    self.extend(a, &e, false);
                }

                if interior {
                    self.enter();
                } else if e != x {
                    self.extend(&e, &x, true);
                }

                if span.exit.is_some() {
                    self.extend(&x, b, false);
                }
            }
        }
    }

    /// Continues the current piece from `p` to `q`. `travel` means the piece
    /// runs along the boundary.
    fn extend(&mut self, p: &Coord, q: &Coord, travel: bool) {
        if self.current.is_empty() {
            self.current.push(*p);
        }
        if self.current.last() == Some(q) {
            return;
        }
        self.current.push(*q);

        let n = self.current.len();
        if travel {
            if self.travel_from.is_none() {
                self.travel_from = Some(n - 2);
            }
        } else {
            if self.after_exit && self.travel_from == Some(0) {
                // only slid along the boundary since leaving the interior
                self.current.drain(..n - 2);
            }
            self.after_exit = false;
            self.travel_from = None;
        }
    }

    /// The line dives into the interior: end the current piece where it
    /// last left the outside.
    fn enter(&mut self) {
        if let Some(i) = self.travel_from {
            self.current.truncate(i + 1);
        }
        self.flush();
        self.after_exit = true;
    }

    fn flush(&mut self) {
        let current = mem::replace(&mut self.current, Vec::new());
        if current.len() >= 2 {
            self.parts.push(current);
        }
        self.travel_from = None;
    }

    fn finish(mut self) -> Vec<Vec<Coord>> {
        self.flush();
        self.parts
    }
}
