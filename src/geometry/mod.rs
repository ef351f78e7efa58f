// src/geometry/mod.rs
//
// Frame algebra shared by the filter and the predictor: polar/Cartesian,
// geodetic → UTM → tractor-local transforms, and the followed-implement
// silhouette polygons used to exclude the combine's own body from hazard
// decisions.

pub mod frame;
pub mod region;

pub use frame::{
    combine_to_local, euclidean_distance, lonlat_to_utm, parse_utm_zone, polar_to_cartesian,
    utm_to_local, wheel_angle_from_curvature,
};
pub use region::{auger_region, combine_region, contains_point, relative_xy};
