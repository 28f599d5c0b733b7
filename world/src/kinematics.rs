//! Heading, turning and slope helpers used by the motion state machine.

use std::f64::consts::FRAC_PI_2;

use solar_sweep_core::{Point, TURN_RADIUS_PANEL_FRACTION};

/// Heading that faces from `from` towards `to`.
///
/// 0 faces +y and 90 faces +x on the animation surface.
#[must_use]
pub fn bearing_deg(from: Point, to: Point) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    -dy.atan2(dx).to_degrees() + 90.0
}

/// Signed rotation from `from_deg` to `to_deg` taking the short way round.
///
/// The result lies in `(-180, 180]`.
#[must_use]
pub fn shortest_delta_deg(from_deg: f64, to_deg: f64) -> f64 {
    let delta = (to_deg - from_deg).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Speed de-rating applied to a leg travelling along `(dx, dy)`.
///
/// A leg climbs when its vertical component dominates and points towards the
/// top of the surface. Climbing legs are scaled by the magnitude of the slope
/// cosine; every other leg keeps full speed.
#[must_use]
pub fn grade_factor(dx: f64, dy: f64, inclination_deg: f64) -> f64 {
    if is_climb(dx, dy) {
        inclination_deg.to_radians().cos().abs()
    } else {
        1.0
    }
}

fn is_climb(dx: f64, dy: f64) -> bool {
    dy < 0.0 && dy.abs() > dx.abs()
}

/// Time spent turning in place, regardless of the turn angle.
///
/// Modelled as a quarter arc of radius `0.3 * panel_width_px` driven at the
/// linear speed. Returns zero when the speed is not positive.
#[must_use]
pub fn turn_duration_secs(panel_width_px: f64, speed_px_per_sec: f64) -> f64 {
    if speed_px_per_sec <= 0.0 {
        return 0.0;
    }
    let radius_px = TURN_RADIUS_PANEL_FRACTION * panel_width_px;
    (FRAC_PI_2 * radius_px) / speed_px_per_sec
}
