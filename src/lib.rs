//! Clip geometries to a Region, or cut a Region out of them.
//!
//! A Region is a rectangle, a circle, or a circle on the Earth's surface
//! (centre in degrees, radius in metres). Four operations do the work:
//!
//! * `lineclip` / `linecut` keep what's inside / outside, as lines.
//! * `polyclip` / `polycut` keep what's inside / outside, keeping polygons
//!   whole by closing them along the Region's boundary.
//!
//! ```
//! use shapeclip::{polyclip, Geometry, Region};
//!
//! let region = Region::rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
//! let polygon: Geometry = "POLYGON ((-1 -1,-1 11,11 11,11 -1,-1 -1))".parse().unwrap();
//! assert_eq!("POLYGON ((0 0,0 10,10 10,10 0,0 0))", polyclip(&polygon, &region, 0.0).unwrap().to_string());
//! ```

extern crate geo_types;
extern crate geozero;
extern crate itertools;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
extern crate regex;
extern crate thiserror;

#[cfg(test)] #[macro_use] extern crate approx;

pub mod clip;
pub mod error;
pub mod geo;
pub mod region;

pub use clip::{lineclip, linecut, polyclip, polycut};
pub use error::{ClipError, ClipResult};
pub use geo::{Coord, Geometry, LineString, Polygon};
pub use region::Region;
