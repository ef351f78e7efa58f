// src/geometry/frame.rs
//
// Coordinate-frame conversions. The vehicle-local frame has +x forward and
// +y to the left; compass headings come in as degrees clockwise from north,
// hence the π/2 − heading rotation when going UTM → local.

use crate::error::GeoError;

/// Latitudes convertible to UTM (the projection degenerates at the poles).
const UTM_LAT_RANGE: (f64, f64) = (-80.0, 84.0);

pub fn polar_to_cartesian(theta: f64, r: f64) -> (f64, f64) {
    (r * theta.cos(), r * theta.sin())
}

pub fn euclidean_distance(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
}

/// Steering wheel angle implied by a path curvature for a given wheelbase
/// (bicycle model).
pub fn wheel_angle_from_curvature(curvature: f64, wheelbase_m: f64) -> f64 {
    (curvature * wheelbase_m).atan()
}

/// Parse a UTM zone designator like "14T" into (number, letter).
pub fn parse_utm_zone(zone: &str) -> Result<(u32, char), GeoError> {
    let digits: String = zone.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rest = &zone[digits.len()..];

    let number: u32 = digits
        .parse()
        .map_err(|_| GeoError::InvalidUtmZone(zone.to_string()))?;
    if !(1..=60).contains(&number) {
        return Err(GeoError::InvalidUtmZone(zone.to_string()));
    }

    let mut letters = rest.chars();
    match (letters.next(), letters.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Ok((number, letter)),
        _ => Err(GeoError::InvalidUtmZone(zone.to_string())),
    }
}

/// Convert geodetic lon/lat to UTM easting/northing in the given zone.
///
/// The zone is forced rather than derived from the longitude so every
/// vehicle in the fleet shares one reference frame even near a zone edge.
pub fn lonlat_to_utm(lon: f64, lat: f64, zone: &str) -> Result<(f64, f64), GeoError> {
    let (zone_number, _zone_letter) = parse_utm_zone(zone)?;

    if !(UTM_LAT_RANGE.0..=UTM_LAT_RANGE.1).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(GeoError::CoordinateOutOfRange { lat, lon });
    }

    let (northing, easting, _convergence) = utm::to_utm_wgs84(lat, lon, zone_number as u8);
    Ok((easting, northing))
}

/// Rotate a UTM-frame offset into the vehicle-local frame of a reference
/// point with the given compass heading (degrees). Forward is +x, left is +y.
pub fn utm_to_local(
    reference_x: f64,
    reference_y: f64,
    heading_deg: f64,
    translate_x: f64,
    translate_y: f64,
) -> (f64, f64) {
    let theta = std::f64::consts::FRAC_PI_2 - heading_deg.to_radians();
    let dx_a = translate_x - reference_x;
    let dy_a = translate_y - reference_y;
    let dx = theta.cos() * dx_a + theta.sin() * dy_a;
    let dy = -theta.sin() * dx_a + theta.cos() * dy_a;
    (dx, dy)
}

/// Position of the followed combine in the tractor-local frame.
pub fn combine_to_local(
    combine_lon: f64,
    combine_lat: f64,
    tractor_lon: f64,
    tractor_lat: f64,
    tractor_heading_deg: f64,
    zone: &str,
) -> Result<(f64, f64), GeoError> {
    let (combine_e, combine_n) = lonlat_to_utm(combine_lon, combine_lat, zone)?;
    let (tractor_e, tractor_n) = lonlat_to_utm(tractor_lon, tractor_lat, zone)?;
    Ok(utm_to_local(
        tractor_e,
        tractor_n,
        tractor_heading_deg,
        combine_e,
        combine_n,
    ))
}
