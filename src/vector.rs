/*
 * Vector Module
 *
 * 2D vector arithmetic shared by the flock and the chain follower.
 * `Vector2` is glam's `Vec2`; every operation is value-returning, so a
 * vector handed to a helper is never modified behind the caller's back.
 * The extension trait adds the few operations whose edge cases matter here:
 * fallible scalar division, guarded angles, and heading helpers.
 */

use crate::error::SimError;

pub type Vector2 = glam::Vec2;

pub trait VectorExt: Sized {
    /// Divide by `scalar`, failing when it is exactly zero.
    fn divide_scalar(self, scalar: f32) -> Result<Self, SimError>;

    /// Angle of the vector in radians, `atan2(y, x)`.
    fn heading(self) -> f32;

    /// Angle between two vectors, `None` when either has zero magnitude.
    fn try_angle_to(self, other: Self) -> Option<f32>;

    /// Unit vector pointing along `angle`.
    fn from_heading(angle: f32) -> Self;

    /// Rescale to `length`, leaving a zero vector untouched.
    fn with_magnitude(self, length: f32) -> Self;
}

impl VectorExt for Vector2 {
    fn divide_scalar(self, scalar: f32) -> Result<Self, SimError> {
        if scalar == 0.0 {
            return Err(SimError::DivisionByZero);
        }
        Ok(self / scalar)
    }

    #[inline]
    fn heading(self) -> f32 {
        self.y.atan2(self.x)
    }

    fn try_angle_to(self, other: Self) -> Option<f32> {
        let mags = self.length() * other.length();
        if mags == 0.0 {
            return None;
        }
        // Rounding can push the cosine just outside [-1, 1]
        let cos = (self.dot(other) / mags).clamp(-1.0, 1.0);
        Some(cos.acos())
    }

    #[inline]
    fn from_heading(angle: f32) -> Self {
        Vector2::new(angle.cos(), angle.sin())
    }

    fn with_magnitude(self, length: f32) -> Self {
        self.normalize_or_zero() * length
    }
}

/// Wrap an angle into `[-PI, PI)`.
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    #[test]
    fn divide_by_zero_is_an_error() {
        let v = Vector2::new(3.0, 4.0);
        assert!(matches!(v.divide_scalar(0.0), Err(SimError::DivisionByZero)));
        assert_eq!(v.divide_scalar(2.0).unwrap(), Vector2::new(1.5, 2.0));
    }

    #[test]
    fn normalize_zero_vector_is_zero() {
        assert_eq!(Vector2::ZERO.normalize_or_zero(), Vector2::ZERO);
        assert_eq!(Vector2::ZERO.with_magnitude(5.0), Vector2::ZERO);
    }

    #[test]
    fn heading_matches_atan2() {
        assert!((Vector2::new(0.0, 1.0).heading() - FRAC_PI_2).abs() < EPS);
        assert!((Vector2::new(-1.0, 0.0).heading() - PI).abs() < EPS);
    }

    #[test]
    fn try_angle_to_guards_zero_magnitude() {
        assert_eq!(Vector2::ZERO.try_angle_to(Vector2::X), None);
        assert_eq!(Vector2::X.try_angle_to(Vector2::ZERO), None);
        assert_eq!(Vector2::ZERO.try_angle_to(Vector2::ZERO), None);
        let right = Vector2::X.try_angle_to(Vector2::Y).unwrap();
        assert!((right - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn try_angle_to_is_unsigned_and_finite() {
        let v = Vector2::new(0.1, 0.7);
        let angle = v.try_angle_to(v * 3.0).unwrap();
        assert!(angle.is_finite() && angle.abs() < 1e-3);
        let back = Vector2::Y.try_angle_to(Vector2::X).unwrap();
        assert!((back - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn with_magnitude_rescales() {
        let v = Vector2::new(3.0, 4.0).with_magnitude(10.0);
        assert!((v.length() - 10.0).abs() < EPS);
        assert!((v.x - 6.0).abs() < EPS);
    }

    #[test]
    fn wrap_angle_folds_into_one_turn() {
        assert!((wrap_angle(0.5) - 0.5).abs() < EPS);
        assert!((wrap_angle(1.5 * PI) + FRAC_PI_2).abs() < EPS);
        assert!((wrap_angle(-1.5 * PI) - FRAC_PI_2).abs() < EPS);
        assert!((wrap_angle(4.0 * PI + 0.25) - 0.25).abs() < 1e-4);
    }
}
