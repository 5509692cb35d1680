//! Property-based tests for the vector helpers
//!
//! These tests check the geometric invariants the steering rules rely on
//! over wide input ranges rather than hand-picked cases.

use nannou::prelude::*;
use proptest::prelude::*;
use std::f32::consts::{PI, TAU};

use flock_background::vector::*;

fn polar(angle: f32, length: f32) -> Vec2 {
    vec2(angle.cos(), angle.sin()) * length
}

fn is_multiple_of(value: f32, period: f32, tolerance: f32) -> bool {
    let k = (value / period).round();
    (value - k * period).abs() < tolerance
}

// ============================================================================
// Toroidal geometry
// ============================================================================

proptest! {
    // Property: the offset never exceeds half the world on either axis
    #[test]
    fn test_toroidal_offset_is_shortest(
        width in 10.0f32..2000.0,
        height in 10.0f32..2000.0,
        fa in (0.0f32..1.0, 0.0f32..1.0),
        fb in (0.0f32..1.0, 0.0f32..1.0),
    ) {
        let a = pt2(fa.0 * width, fa.1 * height);
        let b = pt2(fb.0 * width, fb.1 * height);
        let offset = toroidal_offset(a, b, width, height);

        prop_assert!(offset.x.abs() <= width / 2.0 + 1e-3, "x offset {} too long", offset.x);
        prop_assert!(offset.y.abs() <= height / 2.0 + 1e-3, "y offset {} too long", offset.y);
    }

    // Property: a + offset lands on b modulo the world size
    #[test]
    fn test_toroidal_offset_reaches_target(
        width in 10.0f32..2000.0,
        height in 10.0f32..2000.0,
        fa in (0.0f32..1.0, 0.0f32..1.0),
        fb in (0.0f32..1.0, 0.0f32..1.0),
    ) {
        let a = pt2(fa.0 * width, fa.1 * height);
        let b = pt2(fb.0 * width, fb.1 * height);
        let landed = a + toroidal_offset(a, b, width, height);

        prop_assert!(is_multiple_of(landed.x - b.x, width, 1e-2));
        prop_assert!(is_multiple_of(landed.y - b.y, height, 1e-2));
    }

    // Property: distance on the torus is symmetric
    #[test]
    fn test_toroidal_distance_symmetry(
        width in 10.0f32..2000.0,
        height in 10.0f32..2000.0,
        fa in (0.0f32..1.0, 0.0f32..1.0),
        fb in (0.0f32..1.0, 0.0f32..1.0),
    ) {
        let a = pt2(fa.0 * width, fa.1 * height);
        let b = pt2(fb.0 * width, fb.1 * height);
        let ab = magnitude(toroidal_offset(a, b, width, height));
        let ba = magnitude(toroidal_offset(b, a, width, height));

        prop_assert!((ab - ba).abs() < 1e-3, "{} vs {}", ab, ba);
    }

    // Property: wrapped coordinates stay in [0, extent) and keep their class
    #[test]
    fn test_wrap_coordinate_in_range(value in -10000.0f32..10000.0, extent in 1.0f32..2000.0) {
        let wrapped = wrap_coordinate(value, extent);

        prop_assert!(wrapped >= 0.0 && wrapped < extent, "{} not in [0, {})", wrapped, extent);
        prop_assert!(is_multiple_of(value - wrapped, extent, 1e-2));
    }
}

// ============================================================================
// Magnitude and heading
// ============================================================================

proptest! {
    // Property: heading of a non-zero vector has unit length
    #[test]
    fn test_heading_unit_length(angle in 0.0f32..TAU, length in 0.001f32..1000.0) {
        let h = heading(polar(angle, length));
        prop_assert!((magnitude(h) - 1.0).abs() < 1e-4);
    }

    // Property: clamping never lengthens and never exceeds the limit
    #[test]
    fn test_clamp_magnitude_bound(
        angle in 0.0f32..TAU,
        length in 0.0f32..100.0,
        limit in 0.01f32..50.0,
    ) {
        let v = polar(angle, length);
        let clamped = clamp_magnitude(v, limit);

        prop_assert!(magnitude(clamped) <= limit * (1.0 + 1e-5));
        prop_assert!(magnitude(clamped) <= magnitude(v) * (1.0 + 1e-5));
        if magnitude(v) <= limit {
            prop_assert_eq!(clamped, v);
        }
    }
}

// ============================================================================
// Angles and turning
// ============================================================================

proptest! {
    // Property: the angle difference is wrapped and congruent to b - a
    #[test]
    fn test_angle_difference_wrapped(a in -20.0f32..20.0, b in -20.0f32..20.0) {
        let diff = angle_difference(a, b);

        prop_assert!(diff >= -PI - 1e-5 && diff <= PI + 1e-5, "{} out of range", diff);
        prop_assert!(is_multiple_of((b - a) - diff, TAU, 1e-3));
    }

    // Property: a turn keeps the speed and stays within the turn limit
    #[test]
    fn test_rotate_toward_limits_turn(
        from in 0.0f32..TAU,
        to in 0.0f32..TAU,
        speed in 0.1f32..10.0,
        desired_speed in 0.1f32..10.0,
        max_angle in 0.01f32..PI,
    ) {
        let v = polar(from, speed);
        let turned = rotate_toward(v, polar(to, desired_speed), max_angle);

        prop_assert!((magnitude(turned) - speed).abs() < 1e-3 * speed.max(1.0));
        prop_assert!(angle_between(v, turned) <= max_angle + 1e-4);
    }

    // Property: a turn inside the limit lands exactly on the desired heading
    #[test]
    fn test_rotate_toward_snaps_when_close(
        from in 0.0f32..TAU,
        delta in -0.05f32..0.05,
        speed in 0.1f32..10.0,
    ) {
        let v = polar(from, speed);
        let desired = polar(from + delta, 1.0);
        let turned = rotate_toward(v, desired, 0.1);

        prop_assert!(angle_between(turned, desired) < 1e-4);
    }
}
