use std::mem;

use crate::geo::{Coord, LineString};

/// Which pool a fragment goes to.
///
/// Exterior fragments become (parts of) shells, except that a clipped hole
/// also lands here: once cut open, a hole is part of the new outline.
/// Interior fragments only exist when cutting a Region out of a polygon
/// whose exterior doesn't touch it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Exterior,
    Interior,
}

/// Open polylines waiting to be reconnected (or emitted as lines).
#[derive(Debug, Default)]
pub struct Fragments {
    exterior: Vec<Vec<Coord>>,
    interior: Vec<Vec<Coord>>,
}

impl Fragments {
    pub fn new() -> Fragments {
        Fragments::default()
    }

    fn pool(&mut self, role: Role) -> &mut Vec<Vec<Coord>> {
        match role {
            Role::Exterior => &mut self.exterior,
            Role::Interior => &mut self.interior,
        }
    }

    /// Adds a fragment, dropping repeated vertices. Anything shorter than two
    /// vertices (a line that only touched the boundary) is discarded.
    pub fn add(&mut self, role: Role, mut coords: Vec<Coord>) {
        coords.dedup();

        if coords.len() < 2 {
            debug!("discarding a degenerate fragment at {:?}", coords.first());
            return;
        }

        self.pool(role).push(coords);
    }

    pub fn len(&self, role: Role) -> usize {
        match role {
            Role::Exterior => self.exterior.len(),
            Role::Interior => self.interior.len(),
        }
    }

    /// Empties one pool, returning its fragments in insertion order.
    pub fn take(&mut self, role: Role) -> Vec<Vec<Coord>> {
        mem::replace(self.pool(role), Vec::new())
    }

    /// Moves all of `other`'s fragments into this collection.
    pub fn append(&mut self, other: &mut Fragments) {
        self.exterior.append(&mut other.exterior);
        self.interior.append(&mut other.interior);
    }

    /// Every fragment as a line: exterior pool first.
    pub fn into_lines(self) -> Vec<LineString> {
        self.exterior.into_iter()
            .chain(self.interior.into_iter())
            .map(LineString)
            .collect()
    }
}
