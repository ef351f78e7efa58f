// src/geometry/region.rs
//
// Closed-ring silhouettes of the followed implement. During combine
// following the tractor's radar stares straight at the combine; these
// polygons let the safety decision drop validated targets that are just the
// implement's own body. Rings are ordered vertex lists with the first
// vertex repeated at the end.

use crate::types::CombineConfig;

/// Rotate an offset (dx, dy) by theta and translate it to (x, y).
pub fn relative_xy(x: f64, y: f64, dx: f64, dy: f64, theta: f64) -> (f64, f64) {
    (
        x + dx * theta.cos() - dy * theta.sin(),
        y + dx * theta.sin() + dy * theta.cos(),
    )
}

/// Combine body + header silhouette.
///
/// `x`/`y` locate the combine's GPS antenna in the tractor-local frame and
/// `theta` its relative heading. The header is wider than the body and
/// mounted ahead of it, so the ring is a cross-shaped octagon rather than a
/// plain rectangle.
pub fn combine_region(x: f64, y: f64, theta: f64, dims: &CombineConfig) -> Vec<(f64, f64)> {
    let body_half = dims.body_width_m / 2.0;
    let header_half = dims.header_width_m / 2.0;
    let header_front = dims.gps_to_header_m + dims.header_length_m;

    let corners = [
        (header_front, header_half),
        (header_front, -header_half),
        (dims.gps_to_header_m, -header_half),
        (dims.gps_to_header_m, -body_half),
        (-dims.gps_to_back_m, -body_half),
        (-dims.gps_to_back_m, body_half),
        (dims.gps_to_header_m, body_half),
        (dims.gps_to_header_m, header_half),
    ];

    close_ring(
        corners
            .iter()
            .map(|&(dx, dy)| relative_xy(x, y, dx, dy, theta))
            .collect(),
    )
}

/// Unload auger silhouette: a thin rectangle extending from the combine's
/// left side over the tractor's grain cart while unloading on the go.
pub fn auger_region(x: f64, y: f64, theta: f64, dims: &CombineConfig) -> Vec<(f64, f64)> {
    let half_width = dims.auger_width_m / 2.0;
    let inboard = dims.body_width_m / 2.0;
    let outboard = inboard + dims.auger_length_m;

    let corners = [
        (dims.gps_to_auger_m + half_width, inboard),
        (dims.gps_to_auger_m + half_width, outboard),
        (dims.gps_to_auger_m - half_width, outboard),
        (dims.gps_to_auger_m - half_width, inboard),
    ];

    close_ring(
        corners
            .iter()
            .map(|&(dx, dy)| relative_xy(x, y, dx, dy, theta))
            .collect(),
    )
}

fn close_ring(mut ring: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Ray-casting point-in-polygon test. Works on open or closed rings.
pub fn contains_point(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = ring.len();
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> CombineConfig {
        CombineConfig {
            body_width_m: 4.0,
            header_length_m: 2.0,
            header_width_m: 9.0,
            gps_to_header_m: 3.0,
            gps_to_back_m: 6.0,
            auger_length_m: 5.0,
            auger_width_m: 1.0,
            gps_to_auger_m: 1.0,
        }
    }

    #[test]
    fn test_relative_xy_quarter_turn() {
        // Rotating a forward offset by π/2 swings it to the left.
        let (x, y) = relative_xy(1.0, 1.0, 2.0, 0.0, std::f64::consts::FRAC_PI_2);
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_region_is_closed() {
        let ring = combine_region(10.0, 2.0, 0.3, &dims());
        assert_eq!(ring.len(), 9);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_combine_region_contains_body_and_header() {
        let ring = combine_region(10.0, 0.0, 0.0, &dims());
        // GPS antenna sits inside the body
        assert!(contains_point(&ring, 10.0, 0.0));
        // Header is wider than the body
        assert!(contains_point(&ring, 14.0, 4.0));
        // But body is not that wide behind the header
        assert!(!contains_point(&ring, 9.0, 4.0));
        // Well clear of the machine
        assert!(!contains_point(&ring, 30.0, 0.0));
    }

    #[test]
    fn test_auger_region_extends_left() {
        let ring = auger_region(10.0, 0.0, 0.0, &dims());
        assert_eq!(ring.first(), ring.last());
        // Mid-auger, left of the body
        assert!(contains_point(&ring, 11.0, 4.5));
        // Mirror point on the right side is outside
        assert!(!contains_point(&ring, 11.0, -4.5));
    }

    #[test]
    fn test_contains_point_degenerate_ring() {
        assert!(!contains_point(&[(0.0, 0.0), (1.0, 1.0)], 0.5, 0.5));
    }
}
