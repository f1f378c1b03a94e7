use crate::geo::{Coord, Geometry, LineString, Polygon};

/// Collects everything that survived a clip or cut, then picks the output
/// type.
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    polygons: Vec<Polygon>,
    lines: Vec<LineString>,
    points: Vec<Coord>,
}

impl GeometryBuilder {
    pub fn new() -> GeometryBuilder {
        GeometryBuilder::default()
    }

    pub fn add_polygon(&mut self, polygon: Polygon) {
        if !polygon.is_empty() {
            self.polygons.push(polygon);
        }
    }

    pub fn add_line(&mut self, line: LineString) {
        if !line.is_empty() {
            self.lines.push(line);
        }
    }

    pub fn add_point(&mut self, point: Coord) {
        self.points.push(point);
    }

    /// One part comes out as itself; several parts of one kind make a Multi*;
    /// mixed kinds make a collection: polygons, then lines, then points.
    pub fn build(self) -> Geometry {
        let GeometryBuilder { mut polygons, mut lines, mut points } = self;

        let kinds = [ !polygons.is_empty(), !lines.is_empty(), !points.is_empty() ]
            .iter()
            .filter(|&&present| present)
            .count();

        match kinds {
            0 => Geometry::empty(),
            1 if polygons.len() == 1 => Geometry::Polygon(polygons.remove(0)),
            1 if lines.len() == 1 => Geometry::LineString(lines.remove(0)),
            1 if points.len() == 1 => Geometry::Point(points.remove(0)),
            1 if !polygons.is_empty() => Geometry::MultiPolygon(polygons),
            1 if !lines.is_empty() => Geometry::MultiLineString(lines),
            1 => Geometry::MultiPoint(points),
            _ => Geometry::GeometryCollection(
                polygons.into_iter().map(Geometry::Polygon)
                    .chain(lines.into_iter().map(Geometry::LineString))
                    .chain(points.into_iter().map(Geometry::Point))
                    .collect()
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn c(x: f64, y: f64) -> Coord { Coord::new(x, y) }

    fn line() -> LineString {
        LineString(vec![ c(0.0, 0.0), c(1.0, 1.0) ])
    }

    fn polygon() -> Polygon {
        Polygon::new(LineString(vec![ c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0), c(0.0, 0.0) ]), vec![])
    }

    #[test]
    fn test_nothing() {
        assert_eq!(Geometry::empty(), GeometryBuilder::new().build());
    }

    #[test]
    fn test_single_part() {
        let mut builder = GeometryBuilder::new();
        builder.add_line(line());
        assert_eq!(Geometry::LineString(line()), builder.build());
    }

    #[test]
    fn test_multi_part() {
        let mut builder = GeometryBuilder::new();
        builder.add_point(c(1.0, 2.0));
        builder.add_point(c(3.0, 4.0));
        assert_eq!(Geometry::MultiPoint(vec![ c(1.0, 2.0), c(3.0, 4.0) ]), builder.build());
    }

    #[test]
    fn test_mixed_kinds_are_ordered() {
        let mut builder = GeometryBuilder::new();
        builder.add_point(c(1.0, 2.0));
        builder.add_line(line());
        builder.add_polygon(polygon());
        assert_eq!(
            Geometry::GeometryCollection(vec![
                Geometry::Polygon(polygon()),
                Geometry::LineString(line()),
                Geometry::Point(c(1.0, 2.0)),
            ]),
            builder.build()
        );
    }

    #[test]
    fn test_empty_parts_are_ignored() {
        let mut builder = GeometryBuilder::new();
        builder.add_line(LineString::new());
        builder.add_polygon(Polygon::default());
        assert_eq!(Geometry::empty(), builder.build());
    }
}
