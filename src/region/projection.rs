//! Spherical azimuthal equidistant projection.
//!
//! Distances and directions from the projection centre are true, so a
//! geodesic circle around the centre becomes an ordinary planar circle.

use crate::geo::Coord;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Maps longitude/latitude in degrees to metres east/north of a centre.
#[derive(Clone, Debug, PartialEq)]
pub struct AzimuthalEquidistant {
    center: Coord,
    lon0: f64,
    lat0: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl AzimuthalEquidistant {
    pub fn new(lon: f64, lat: f64) -> AzimuthalEquidistant {
        let lat0 = lat.to_radians();

        AzimuthalEquidistant {
            center: Coord::new(lon, lat),
            lon0: lon.to_radians(),
            lat0: lat0,
            sin_lat0: lat0.sin(),
            cos_lat0: lat0.cos(),
        }
    }

    pub fn project(&self, c: &Coord) -> Coord {
        let lat = c.y.to_radians();
        let dlon = c.x.to_radians() - self.lon0;
        let (sin_lat, cos_lat) = lat.sin_cos();

        // Haversine keeps short distances accurate
        let h = ((lat - self.lat0) / 2.0).sin().powi(2)
            + self.cos_lat0 * cos_lat * (dlon / 2.0).sin().powi(2);
        let distance = 2.0 * h.min(1.0).sqrt().asin();

        if distance == 0.0 {
            return Coord::new(0.0, 0.0);
        }

        let azimuth = (dlon.sin() * cos_lat)
            .atan2(self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * dlon.cos());

        let rho = EARTH_RADIUS * distance;
        Coord::new(rho * azimuth.sin(), rho * azimuth.cos())
    }

    pub fn unproject(&self, c: &Coord) -> Coord {
        let rho = c.x.hypot(c.y);
        if rho == 0.0 {
            return self.center;
        }

        let distance = rho / EARTH_RADIUS;
        let azimuth = c.x.atan2(c.y);
        let (sin_d, cos_d) = distance.sin_cos();

        let sin_lat = (self.sin_lat0 * cos_d + self.cos_lat0 * sin_d * azimuth.cos()).max(-1.0).min(1.0);
        let lat = sin_lat.asin();
        let dlon = (azimuth.sin() * sin_d * self.cos_lat0).atan2(cos_d - self.sin_lat0 * sin_lat);

        // within 180 degrees of the centre's longitude, never wrapped
        Coord::new(self.center.x + dlon.to_degrees(), lat.to_degrees())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_center_maps_to_origin() {
        let projection = AzimuthalEquidistant::new(10.0, 50.0);
        assert_eq!(Coord::new(0.0, 0.0), projection.project(&Coord::new(10.0, 50.0)));
        assert_eq!(Coord::new(10.0, 50.0), projection.unproject(&Coord::new(0.0, 0.0)));
    }

    #[test]
    fn test_one_degree_north() {
        let projection = AzimuthalEquidistant::new(10.0, 50.0);
        let p = projection.project(&Coord::new(10.0, 51.0));
        assert_relative_eq!(0.0, p.x, epsilon = 1e-6);
        assert_relative_eq!(EARTH_RADIUS * 1f64.to_radians(), p.y, max_relative = 1e-12);
    }

    #[test]
    fn test_east_is_positive_x() {
        let projection = AzimuthalEquidistant::new(0.0, 0.0);
        let p = projection.project(&Coord::new(1.0, 0.0));
        assert!(p.x > 0.0);
        assert_relative_eq!(0.0, p.y, epsilon = 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let projection = AzimuthalEquidistant::new(-73.5, 45.5);
        for &(lon, lat) in [ (-73.0, 45.0), (-80.0, 60.0), (-60.0, 10.0), (100.0, -30.0) ].iter() {
            let back = projection.unproject(&projection.project(&Coord::new(lon, lat)));
            assert_relative_eq!(lon, back.x, epsilon = 1e-9);
            assert_relative_eq!(lat, back.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_round_trip_across_antimeridian() {
        let projection = AzimuthalEquidistant::new(179.5, 0.0);
        let back = projection.unproject(&projection.project(&Coord::new(-179.5, 0.5)));
        assert_relative_eq!(180.5, back.x, epsilon = 1e-9);
        assert_relative_eq!(0.5, back.y, epsilon = 1e-9);
    }

    #[test]
    fn test_unproject_is_continuous_past_180() {
        let projection = AzimuthalEquidistant::new(180.0, 0.0);
        let east = projection.unproject(&Coord::new(10_000.0, 0.0));
        let west = projection.unproject(&Coord::new(-10_000.0, 0.0));
        assert!(east.x > 180.0 && east.x < 180.1);
        assert!(west.x < 180.0 && west.x > 179.9);
    }
}
