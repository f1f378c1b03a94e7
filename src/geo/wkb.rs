//! Well-Known Binary, read and written with `geozero`.
//!
//! Geometries pass through `geo_types` on the way. Only 2-D is supported.
//! Neither WKB nor `geo_types` has a LinearRing, so a `Geometry::LinearRing`
//! is written as a LineString.

use geo_types as gt;
use geozero::wkb::Wkb;
use geozero::{CoordDimensions, ToGeo, ToWkb};
use thiserror::Error;

use crate::geo::{Coord, Geometry, LineString, Polygon};

#[derive(Debug, Error)]
pub enum WkbError {
    #[error("WKB encode error: {0}")]
    EncodeError(String),
    #[error("WKB decode error: {0}")]
    DecodeError(String),
}

/// Parses one WKB geometry, in either byte order.
pub fn parse(bytes: &[u8]) -> Result<Geometry, WkbError> {
    let geometry = Wkb(bytes.to_vec())
        .to_geo()
        .map_err(|e| WkbError::DecodeError(e.to_string()))?;

    from_geo(geometry)
}

/// Serializes to WKB.
pub fn to_wkb(geometry: &Geometry) -> Result<Vec<u8>, WkbError> {
    to_geo(geometry)
        .to_wkb(CoordDimensions::xy())
        .map_err(|e| WkbError::EncodeError(e.to_string()))
}

fn to_geo_coords(line: &LineString) -> gt::LineString<f64> {
    gt::LineString(line.0.iter().map(|c| gt::Coord { x: c.x, y: c.y }).collect())
}

fn to_geo_polygon(polygon: &Polygon) -> gt::Polygon<f64> {
    gt::Polygon::new(
        to_geo_coords(&polygon.exterior),
        polygon.interiors.iter().map(to_geo_coords).collect()
    )
}

fn to_geo(geometry: &Geometry) -> gt::Geometry<f64> {
    match geometry {
        &Geometry::Point(ref c) => gt::Geometry::Point(gt::Point::new(c.x, c.y)),
        &Geometry::LineString(ref line) | &Geometry::LinearRing(ref line) => gt::Geometry::LineString(to_geo_coords(line)),
        &Geometry::Polygon(ref polygon) => gt::Geometry::Polygon(to_geo_polygon(polygon)),
        &Geometry::MultiPoint(ref coords) => gt::Geometry::MultiPoint(gt::MultiPoint(
            coords.iter().map(|c| gt::Point::new(c.x, c.y)).collect()
        )),
        &Geometry::MultiLineString(ref lines) => gt::Geometry::MultiLineString(gt::MultiLineString(
            lines.iter().map(to_geo_coords).collect()
        )),
        &Geometry::MultiPolygon(ref polygons) => gt::Geometry::MultiPolygon(gt::MultiPolygon(
            polygons.iter().map(to_geo_polygon).collect()
        )),
        &Geometry::GeometryCollection(ref geometries) => gt::Geometry::GeometryCollection(gt::GeometryCollection(
            geometries.iter().map(to_geo).collect()
        )),
    }
}

fn from_geo_coords(line: &gt::LineString<f64>) -> LineString {
    LineString(line.0.iter().map(|c| Coord::new(c.x, c.y)).collect())
}

fn from_geo_polygon(polygon: &gt::Polygon<f64>) -> Polygon {
    if polygon.exterior().0.is_empty() {
        return Polygon::default();
    }

    Polygon::new(
        from_geo_coords(polygon.exterior()),
        polygon.interiors().iter().map(from_geo_coords).collect()
    )
}

fn from_geo_point(point: &gt::Point<f64>) -> Result<Coord, WkbError> {
    if point.x().is_nan() && point.y().is_nan() {
        return Err(WkbError::DecodeError("POINT EMPTY is not supported".to_string()));
    }
    Ok(Coord::new(point.x(), point.y()))
}

fn from_geo(geometry: gt::Geometry<f64>) -> Result<Geometry, WkbError> {
    match geometry {
        gt::Geometry::Point(ref p) => Ok(Geometry::Point(from_geo_point(p)?)),
        gt::Geometry::Line(ref l) => Ok(Geometry::LineString(LineString(vec![
            Coord::new(l.start.x, l.start.y),
            Coord::new(l.end.x, l.end.y),
        ]))),
        gt::Geometry::LineString(ref line) => Ok(Geometry::LineString(from_geo_coords(line))),
        gt::Geometry::Polygon(ref polygon) => Ok(Geometry::Polygon(from_geo_polygon(polygon))),
        gt::Geometry::MultiPoint(ref points) => Ok(Geometry::MultiPoint(
            points.0.iter().map(from_geo_point).collect::<Result<Vec<Coord>, WkbError>>()?
        )),
        gt::Geometry::MultiLineString(ref lines) => Ok(Geometry::MultiLineString(lines.0.iter().map(from_geo_coords).collect())),
        gt::Geometry::MultiPolygon(ref polygons) => Ok(Geometry::MultiPolygon(polygons.0.iter().map(from_geo_polygon).collect())),
        gt::Geometry::GeometryCollection(collection) => Ok(Geometry::GeometryCollection(
            collection.0.into_iter().map(from_geo).collect::<Result<Vec<Geometry>, WkbError>>()?
        )),
        gt::Geometry::Rect(ref rect) => Ok(Geometry::Polygon(from_geo_polygon(&rect.to_polygon()))),
        gt::Geometry::Triangle(ref triangle) => Ok(Geometry::Polygon(from_geo_polygon(&triangle.to_polygon()))),
    }
}
