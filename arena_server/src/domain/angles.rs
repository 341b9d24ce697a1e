// Heading arithmetic.

use std::f64::consts::{PI, TAU};

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Normalizes an angle difference into `(-π, π]`.
pub fn signed_angle(angle: f64) -> f64 {
    let wrapped = wrap_angle(angle);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_wrapping_negative_angle_then_result_is_positive() {
        assert!((wrap_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert_eq!(wrap_angle(-1e-20), 0.0);
    }

    #[test]
    fn when_normalizing_half_turn_then_positive_pi_is_kept() {
        assert_eq!(signed_angle(PI), PI);
        assert!((signed_angle(-PI) - PI).abs() < 1e-12);
        assert!((signed_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
    }
}
