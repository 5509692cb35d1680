/*
 * Boid Module
 *
 * This module defines the Boid struct and its two per-agent behaviors.
 * Each boid steers by:
 * 1. Separation: move away from any boid that is too close
 * 2. Alignment: match the velocity of nearby boids of the same group
 * 3. Cohesion: move toward the centre of nearby boids of the same group
 * 4. Wander: a slow, irregular sideways drift independent of neighbors
 *
 * Alignment and cohesion can be restricted to a forward field of view.
 * All distances are measured on the torus, so boids near opposite edges
 * are neighbors.
 */

use nannou::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::flock::WorldBounds;
use crate::params::{ShapeGeometry, SimulationParams};
use crate::vector::{clamp_magnitude, heading, magnitude, perpendicular, rotate_toward, set_magnitude};

// Fraction of max speed a freshly seeded boid may start with
const MIN_START_SPEED_FRACTION: f32 = 0.6;
// Countdown range for the first wander jitter after seeding
const INITIAL_WANDER_TICKS: std::ops::Range<u32> = 20..120;
// Countdown range after each jitter
const WANDER_TICKS: std::ops::Range<u32> = 60..180;
// Largest phase change applied by one jitter (radians)
const WANDER_JITTER: f32 = 0.6;
// Sideways reach of the wander target relative to the heading
const WANDER_REACH: f32 = 0.6;

#[derive(Clone, Debug, PartialEq)]
pub struct Boid {
    pub position: Point2,
    pub velocity: Vec2,
    group: usize,
    wander_phase: f32,
    wander_countdown: u32,
}

impl Boid {
    pub fn new(position: Point2, velocity: Vec2, group: usize) -> Self {
        Self {
            position,
            velocity,
            group,
            wander_phase: 0.0,
            wander_countdown: WANDER_TICKS.start,
        }
    }

    // Seed a boid anywhere in the world with a random heading, speed and group
    pub fn random<R: Rng>(rng: &mut R, bounds: WorldBounds, params: &SimulationParams) -> Self {
        let x = rng.gen_range(0.0..bounds.width);
        let y = rng.gen_range(0.0..bounds.height);

        let angle = rng.gen_range(0.0..TAU);
        let speed = params.max_speed * rng.gen_range(MIN_START_SPEED_FRACTION..=1.0);
        let velocity = vec2(angle.cos(), angle.sin()) * speed;

        Self {
            position: pt2(x, y),
            velocity,
            group: rng.gen_range(0..params.num_groups()),
            wander_phase: rng.gen_range(0.0..TAU),
            wander_countdown: rng.gen_range(INITIAL_WANDER_TICKS),
        }
    }

    pub fn with_wander(mut self, phase: f32, countdown: u32) -> Self {
        self.wander_phase = phase;
        self.wander_countdown = countdown.max(1);
        self
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn wander_phase(&self) -> f32 {
        self.wander_phase
    }

    pub fn speed(&self) -> f32 {
        magnitude(self.velocity)
    }

    /// Steering from separation, alignment and cohesion.
    ///
    /// `neighbors` must not contain this boid; the caller decides whether it
    /// is every other boid or only grid candidates, the result is the same as
    /// long as every boid within the largest radius is included. Each rule
    /// that found no neighbors contributes nothing.
    pub fn neighbor_force<'a, I>(&self, neighbors: I, bounds: WorldBounds, params: &SimulationParams) -> Vec2
    where
        I: IntoIterator<Item = &'a Boid>,
    {
        let forward = heading(self.velocity);
        let radii = &params.radii;
        let fov = &params.field_of_view;

        let mut separation = Vec2::ZERO;
        let mut alignment = Vec2::ZERO;
        let mut cohesion = Vec2::ZERO;
        let mut sep_count = 0;
        let mut align_count = 0;
        let mut cohesion_count = 0;

        // Process all neighbors in a single pass
        for other in neighbors {
            let offset = bounds.offset(self.position, other.position);
            let d = magnitude(offset);
            if d <= 0.0 {
                continue;
            }
            let direction = offset / d;

            // Separation ignores groups
            if d < radii.separation {
                separation -= direction;
                sep_count += 1;
            }

            if other.group != self.group {
                continue;
            }

            let in_view = !fov.enabled || forward.dot(direction) >= fov.half_angle_cos;
            if !in_view {
                continue;
            }

            if d < radii.alignment {
                alignment += other.velocity;
                align_count += 1;
            }

            if d < radii.cohesion {
                // Summing offsets keeps the centroid unwrapped around this boid
                cohesion += offset;
                cohesion_count += 1;
            }
        }

        let mut force = Vec2::ZERO;

        if sep_count > 0 {
            let desired = set_magnitude(separation / sep_count as f32, params.max_speed);
            force += (desired - self.velocity) * params.weights.separation;
        }

        if align_count > 0 {
            let desired = set_magnitude(alignment / align_count as f32, params.max_speed);
            force += (desired - self.velocity) * params.weights.alignment;
        }

        if cohesion_count > 0 {
            let to_centroid = cohesion / cohesion_count as f32;
            let desired = set_magnitude(to_centroid, params.max_speed);
            force += (desired - self.velocity) * params.weights.cohesion;
        }

        force
    }

    // Count down to the next wander jitter, re-arming the timer when it fires
    pub fn advance_wander<R: Rng>(&mut self, rng: &mut R) {
        self.wander_countdown = self.wander_countdown.saturating_sub(1);
        if self.wander_countdown == 0 {
            self.wander_countdown = rng.gen_range(WANDER_TICKS);
            self.wander_phase += rng.gen_range(-WANDER_JITTER..WANDER_JITTER);
        }
    }

    /// Unweighted wander steering, clamped to `max_force`.
    ///
    /// The target leans off the current heading toward its right-hand
    /// perpendicular by `sin(phase) * 0.6`.
    pub fn wander_force(&self, params: &SimulationParams) -> Vec2 {
        let forward = heading(self.velocity);
        let target = forward + perpendicular(forward) * (self.wander_phase.sin() * WANDER_REACH);
        let desired = set_magnitude(target, params.max_speed);
        clamp_magnitude(desired - self.velocity, params.max_force)
    }

    // Neighbor rule plus weighted wander, before flock-wide bias is added
    pub fn steering<'a, I>(&self, neighbors: I, bounds: WorldBounds, params: &SimulationParams) -> Vec2
    where
        I: IntoIterator<Item = &'a Boid>,
    {
        self.neighbor_force(neighbors, bounds, params) + self.wander_force(params) * params.weights.wander
    }

    /// Apply one tick of motion.
    ///
    /// `force` is the total steering (neighbor rule, wander and flock bias).
    /// Speed is capped at `max_speed`, the turn is limited to
    /// `max_turn_rate`, and the position wraps back into the world.
    pub fn integrate(&mut self, force: Vec2, bounds: WorldBounds, params: &SimulationParams) {
        let force = clamp_magnitude(force, params.max_force);

        let pushed = self.velocity + force;
        let desired = set_magnitude(pushed, magnitude(pushed).min(params.max_speed));

        self.velocity = rotate_toward(self.velocity, desired, params.max_turn_rate);
        self.position = bounds.wrap(self.position + self.velocity);
    }

    // Triangle for drawing: tip ahead of the boid, two corners behind it
    pub fn shape_points(&self, geometry: &ShapeGeometry) -> [Point2; 3] {
        let forward = heading(self.velocity);
        let side = perpendicular(forward);

        let tip = self.position + forward * geometry.tip;
        let base = self.position - forward * geometry.tail;

        [tip, base + side * geometry.half_width, base - side * geometry.half_width]
    }
}
