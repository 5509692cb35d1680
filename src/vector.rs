/*
 * Vector Module
 *
 * Pure 2D helpers used by the steering rules and the stepper.
 * Every function is stateless and takes vectors by value.
 *
 * Zero-length inputs never divide by zero: direction-producing helpers
 * floor the magnitude at MAGNITUDE_EPSILON, so a zero vector maps to zero.
 */

use nannou::prelude::*;
use std::f32::consts::PI;

// Floor applied to magnitudes before dividing
pub const MAGNITUDE_EPSILON: f32 = 1e-9;

#[inline]
pub fn magnitude(v: Vec2) -> f32 {
    v.x.hypot(v.y)
}

// Unit vector along v (zero vector stays zero)
#[inline]
pub fn heading(v: Vec2) -> Vec2 {
    v / magnitude(v).max(MAGNITUDE_EPSILON)
}

// Right-hand perpendicular of v
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    vec2(-v.y, v.x)
}

// Scale v down to m if it is longer, otherwise return it unchanged
#[inline]
pub fn clamp_magnitude(v: Vec2, m: f32) -> Vec2 {
    let n = magnitude(v);
    if n > m {
        v * (m / n)
    } else {
        v
    }
}

#[inline]
pub fn set_magnitude(v: Vec2, m: f32) -> Vec2 {
    v * (m / magnitude(v).max(MAGNITUDE_EPSILON))
}

// Signed difference b - a wrapped into (-PI, PI]
pub fn angle_difference(a: f32, b: f32) -> f32 {
    PI - (a - b + PI).rem_euclid(2.0 * PI)
}

// Unsigned angle between the directions of a and b, in [0, PI]
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    angle_difference(a.y.atan2(a.x), b.y.atan2(b.x)).abs()
}

/// Rotate `v` toward the direction of `desired` by at most `max_angle`
/// radians, keeping the magnitude of `v`.
///
/// The shorter angular direction is taken. When the remaining difference is
/// below `max_angle` the result points exactly along `desired`.
pub fn rotate_toward(v: Vec2, desired: Vec2, max_angle: f32) -> Vec2 {
    let speed = magnitude(v);
    let current = v.y.atan2(v.x);
    let target = desired.y.atan2(desired.x);
    let diff = angle_difference(current, target);

    let angle = if diff.abs() < max_angle {
        target
    } else {
        current + max_angle.copysign(diff)
    };

    vec2(angle.cos() * speed, angle.sin() * speed)
}

/// Shortest vector from `a` to `b` on a `width` x `height` torus.
///
/// Each axis is corrected independently by one full extent when the raw
/// delta exceeds half of that extent.
pub fn toroidal_offset(a: Vec2, b: Vec2, width: f32, height: f32) -> Vec2 {
    vec2(wrap_delta(b.x - a.x, width), wrap_delta(b.y - a.y, height))
}

#[inline]
fn wrap_delta(delta: f32, extent: f32) -> f32 {
    let half = extent * 0.5;
    if delta > half {
        delta - extent
    } else if delta < -half {
        delta + extent
    } else {
        delta
    }
}

// Fold a coordinate into [0, extent). rem_euclid can round up to exactly
// `extent` for tiny negative inputs, which is the same point as 0.
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
