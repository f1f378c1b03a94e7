/// Which rectangle sides a boundary point lies on.
///
/// One flag set means the point is somewhere along that side; two flags mean
/// it's a corner. Circles have no sides, so their boundary points carry
/// `Edges::NONE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Edges {
    pub const NONE: Edges = Edges { left: false, top: false, right: false, bottom: false };

    pub fn count(&self) -> usize {
        [ self.left, self.top, self.right, self.bottom ].iter().filter(|&&b| b).count()
    }
}

/// Where a point is relative to a Region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Inside,
    Outside,
    OnEdge(Edges),
}

impl Position {
    pub fn is_on_edge(&self) -> bool {
        match self {
            &Position::OnEdge(_) => true,
            _ => false,
        }
    }

    pub fn edges(&self) -> Edges {
        match self {
            &Position::OnEdge(edges) => edges,
            _ => Edges::NONE,
        }
    }
}

/// Which sides of the boundary one line reached, accumulated while
/// classifying it.
///
/// After a single pass this answers "was it all inside, all outside, or
/// both?" without looking at the line again. Boundary points count as
/// neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionSummary {
    inside: bool,
    outside: bool,
}

impl PositionSummary {
    pub fn new() -> PositionSummary {
        PositionSummary::default()
    }

    pub fn add(&mut self, position: Position) {
        match position {
            Position::Inside => self.inside = true,
            Position::Outside => self.outside = true,
            Position::OnEdge(_) => {}
        }
    }

    /// Nothing was strictly outside.
    pub fn all_not_outside(&self) -> bool {
        !self.outside
    }

    /// Nothing was strictly inside.
    pub fn all_not_inside(&self) -> bool {
        !self.inside
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const LEFT: Edges = Edges { left: true, top: false, right: false, bottom: false };
    const TOP_LEFT: Edges = Edges { left: true, top: true, right: false, bottom: false };

    #[test]
    fn test_count() {
        assert_eq!(2, TOP_LEFT.count());
        assert_eq!(1, LEFT.count());
        assert_eq!(0, Edges::NONE.count());
    }

    #[test]
    fn test_position_edges() {
        assert_eq!(LEFT, Position::OnEdge(LEFT).edges());
        assert_eq!(Edges::NONE, Position::Inside.edges());
        assert!(!Position::Outside.is_on_edge());
    }

    #[test]
    fn test_summary_mixed() {
        let mut summary = PositionSummary::new();
        summary.add(Position::OnEdge(LEFT));
        assert!(summary.all_not_inside());
        assert!(summary.all_not_outside());
        summary.add(Position::Inside);
        assert!(!summary.all_not_inside());
        assert!(summary.all_not_outside());
        summary.add(Position::Outside);
        assert!(!summary.all_not_outside());
    }
}
