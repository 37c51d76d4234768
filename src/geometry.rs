//! Vector and angle math over landmark points.
//!
//! All angles are computed in the image x/y plane; depth is ignored.

use crate::{constants::EPSILON, landmarks::Landmark};
use nalgebra::Vector2;

fn planar(p: &Landmark) -> Vector2<f64> {
    Vector2::new(p.x, p.y)
}

/// Angle at vertex `b` between `b→a` and `b→c`, via `atan2(cross, dot)`.
///
/// Returns the absolute value in degrees `[0, 180]`, so the bend direction
/// is not distinguished. Degenerate (zero-length) rays give `0.0`.
#[must_use]
pub fn angle_signed(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    let ab = planar(b) - planar(a);
    let cb = planar(b) - planar(c);

    let dot = ab.dot(&cb);
    let cross = ab.perp(&cb);

    cross.atan2(dot).to_degrees().abs()
}

/// Joint angle at vertex `b` via normalized dot product and `acos`.
///
/// Returns degrees in `[0, 180]`; 180 means `a`, `b`, `c` are collinear with
/// `b` in the middle. Rays shorter than the epsilon give `0.0` instead of NaN.
#[must_use]
pub fn angle_unsigned(a: &Landmark, b: &Landmark, c: &Landmark) -> f64 {
    let ba = planar(a) - planar(b);
    let bc = planar(c) - planar(b);

    let len = ba.norm() * bc.norm();
    if len < EPSILON {
        return 0.0;
    }

    (ba.dot(&bc) / len).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Euclidean distance in the x/y plane
#[must_use]
pub fn distance_2d(a: &Landmark, b: &Landmark) -> f64 {
    (planar(a) - planar(b)).norm()
}
