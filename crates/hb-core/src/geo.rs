//! Flat-earth spatial helpers.
//!
//! Snapping and hit testing treat one degree of latitude *and* one degree of
//! longitude as [`FEET_PER_DEGREE`]. The map overlay layer instead shrinks
//! longitude by `cos(lat)` ([`feet_to_lng`], [`offset_feet`]), so far from the
//! equator "looks snapped" and "is snapped" can disagree by a small,
//! latitude-dependent amount.

use crate::model::LatLng;

/// Approximate length of one degree of latitude, in feet.
pub const FEET_PER_DEGREE: f64 = 364_000.0;

#[must_use]
pub fn feet_to_degrees(ft: f64) -> f64 {
    ft / FEET_PER_DEGREE
}

#[must_use]
pub fn degrees_to_feet(deg: f64) -> f64 {
    deg * FEET_PER_DEGREE
}

/// Feet → degrees of longitude at latitude `lat`, corrected by `cos(lat)`.
/// Used only for overlay placement, never for snapping.
#[must_use]
pub fn feet_to_lng(ft: f64, lat: f64) -> f64 {
    ft / (FEET_PER_DEGREE * lat.to_radians().cos())
}

/// Offset `origin` by a local east/north displacement in feet.
#[must_use]
pub fn offset_feet(origin: LatLng, east_ft: f64, north_ft: f64) -> LatLng {
    LatLng::new(
        origin.lat + feet_to_degrees(north_ft),
        origin.lng + feet_to_lng(east_ft, origin.lat),
    )
}

/// Distance in feet between two points, flat and uncorrected.
#[must_use]
pub fn flat_distance_ft(a: LatLng, b: LatLng) -> f64 {
    degrees_to_feet((a.lat - b.lat).hypot(a.lng - b.lng))
}

/// Distance in feet from `p` to the segment `v1`–`v2`.
///
/// Projects onto the segment line in flat degree space and clamps the
/// parameter to `[0, 1]`.
#[must_use]
pub fn point_to_segment_distance_ft(p: LatLng, v1: LatLng, v2: LatLng) -> f64 {
    let dx = v2.lng - v1.lng;
    let dy = v2.lat - v1.lat;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-24 {
        // Degenerate segment (both endpoints coincide).
        return flat_distance_ft(p, v1);
    }

    let t = (((p.lng - v1.lng) * dx + (p.lat - v1.lat) * dy) / len_sq).clamp(0.0, 1.0);
    let closest = LatLng::new(v1.lat + t * dy, v1.lng + t * dx);
    flat_distance_ft(p, closest)
}

#[must_use]
pub fn midpoint(a: LatLng, b: LatLng) -> LatLng {
    LatLng::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
}
