// extensions/easing.rs
//
// Easing curves and interpolation helpers for tile transitions.
// No dependencies on the graph, just math.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Slow end.
    QuadOut,
    /// Stronger slow end.
    CubicOut,
    /// Very strong slow end: `1 - (1 - t)^4`.
    #[default]
    QuartOut,
    /// Sine-shaped slow end.
    SineOut,
}

impl Easing {
    /// Apply the curve to progress `t`, clamped to [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t).powi(2),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::SineOut => (t * std::f32::consts::FRAC_PI_2).sin(),
        }
    }
}

/// Linearly interpolate between two points.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Spherical interpolation that does not clamp `t`, so values past 1 keep
/// turning beyond `b`. Takes the short way round.
pub fn slerp_unclamped(a: Quat, b: Quat, t: f32) -> Quat {
    let mut b = b;
    let mut cos = a.dot(b);
    if cos < 0.0 {
        b = -b;
        cos = -cos;
    }
    // Nearly parallel: fall back to normalized lerp.
    if cos > 0.9995 {
        return (a + (b - a) * t).normalize();
    }
    let theta = cos.acos();
    let sin = theta.sin();
    let wa = ((1.0 - t) * theta).sin() / sin;
    let wb = (t * theta).sin() / sin;
    (a * wa + b * wb).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for easing in [Easing::Linear, Easing::QuadOut, Easing::CubicOut, Easing::QuartOut, Easing::SineOut] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{:?}", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{:?}", easing);
        }
    }

    #[test]
    fn quart_out_matches_formula() {
        let t = 0.3;
        let expected = 1.0 - (0.7f32).powi(4);
        assert!((Easing::QuartOut.apply(t) - expected).abs() < 1e-6);
        assert!(Easing::QuartOut.apply(0.5) > 0.9);
    }

    #[test]
    fn apply_clamps_input() {
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
    }

    #[test]
    fn lerp_midpoint() {
        let mid = lerp_vec3(Vec3::ZERO, Vec3::new(2.0, 4.0, -6.0), 0.5);
        assert_eq!(mid, Vec3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn slerp_unclamped_hits_endpoints() {
        let a = Quat::from_rotation_y(0.2);
        let b = Quat::from_rotation_y(1.4);
        assert!(slerp_unclamped(a, b, 0.0).dot(a).abs() > 1.0 - 1e-5);
        assert!(slerp_unclamped(a, b, 1.0).dot(b).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn slerp_unclamped_overshoots() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(0.5);
        let past = slerp_unclamped(a, b, 3.0);
        let expected = Quat::from_rotation_y(1.5);
        assert!(past.dot(expected).abs() > 1.0 - 1e-4, "got {:?}", past);
    }
}
