//! Mathematical utilities for sun-path calculations.

/// Mathematical constants
pub const PI: f64 = core::f64::consts::PI;

/// Full turn in radians.
pub const TAU: f64 = core::f64::consts::TAU;

/// Converts degrees to radians.
#[inline]
pub const fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Converts radians to degrees.
#[inline]
pub const fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Normalizes an angle in degrees to the range [0, 360).
pub fn normalize_degrees_0_to_360(degrees: f64) -> f64 {
    let normalized = degrees % 360.0;
    if normalized < 0.0 {
        normalized + 360.0
    } else {
        normalized
    }
}

/// Normalizes an angle in radians to the range [0, 2π).
pub fn normalize_radians_0_to_tau(radians: f64) -> f64 {
    let normalized = radians % TAU;
    if normalized < 0.0 {
        // -1e-17 % TAU + TAU rounds to TAU itself
        let wrapped = normalized + TAU;
        if wrapped >= TAU { 0.0 } else { wrapped }
    } else {
        normalized
    }
}

/// Clamps a sine or cosine argument into [-1, 1] before inversion.
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}
