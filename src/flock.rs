/*
 * Flock Module
 *
 * This module defines the World that owns the flock: the toroidal bounds,
 * the boids, the random source used for seeding and wander, and whether the
 * simulation is currently running.
 *
 * It also computes the flock-wide bias applied to every boid each tick:
 * - Drift neutralization: a small force against the mean flock velocity,
 *   so the whole flock does not slowly translate in one direction
 * - Variety: a slowly rotating push per group, so groups keep diverging
 *   instead of merging into one super-flock
 */

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::boid::Boid;
use crate::error::{Result, SimulationError};
use crate::params::SimulationParams;
use crate::vector::{clamp_magnitude, toroidal_offset, wrap_coordinate};

// Drift correction is capped at this fraction of max_force
const DRIFT_FORCE_FRACTION: f32 = 0.6;

// Size of the toroidal world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SimulationError::InvalidBounds { width, height });
        }
        Ok(Self { width, height })
    }

    // Shortest vector from a to b across the wrapped edges
    #[inline]
    pub fn offset(&self, a: Point2, b: Point2) -> Vec2 {
        toroidal_offset(a, b, self.width, self.height)
    }

    #[inline]
    pub fn wrap(&self, p: Point2) -> Point2 {
        pt2(wrap_coordinate(p.x, self.width), wrap_coordinate(p.y, self.height))
    }

    pub fn contains(&self, p: Point2) -> bool {
        (0.0..self.width).contains(&p.x) && (0.0..self.height).contains(&p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Active,
    Paused,
}

/// Forces shared by the whole flock for one tick.
///
/// `drift` is the same for every boid; `variety` is indexed by group.
/// Disabled terms are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FlockBias {
    pub drift: Vec2,
    pub variety: Vec<Vec2>,
}

impl FlockBias {
    // Total bias felt by a boid of the given group
    #[inline]
    pub fn for_group(&self, group: usize) -> Vec2 {
        self.drift + self.variety.get(group).copied().unwrap_or(Vec2::ZERO)
    }
}

// Corrective force against the mean flock velocity
pub fn drift_force(boids: &[Boid], params: &SimulationParams) -> Vec2 {
    if !params.drift_neutralization.enabled || boids.is_empty() {
        return Vec2::ZERO;
    }

    clamp_magnitude(
        -mean_velocity(boids) * params.drift_neutralization.damping,
        DRIFT_FORCE_FRACTION * params.max_force,
    )
}

// Average velocity of the flock, zero when empty
pub fn mean_velocity(boids: &[Boid]) -> Vec2 {
    if boids.is_empty() {
        return Vec2::ZERO;
    }
    let sum = boids.iter().fold(Vec2::ZERO, |acc, b| acc + b.velocity);
    sum / boids.len() as f32
}

// Per-group rotating bias at the given frame-clock time (milliseconds)
pub fn variety_forces(time_ms: f64, params: &SimulationParams) -> Vec<Vec2> {
    let num_groups = params.num_groups();
    let variety = &params.variety;
    if !variety.enabled || variety.group_phases.is_empty() {
        return vec![Vec2::ZERO; num_groups];
    }

    (0..num_groups)
        .map(|g| {
            let phase = variety.group_phases[g % variety.group_phases.len()] as f64;
            let angle = (time_ms * variety.angular_frequency as f64 + phase) as f32;
            vec2(angle.cos(), angle.sin()) * variety.amplitude
        })
        .collect()
}

pub struct World {
    pub boids: Vec<Boid>,
    params: SimulationParams,
    bounds: WorldBounds,
    state: RunState,
    rng: StdRng,
    ticks: u64,
}

impl World {
    /// Build a world and seed it with `params.num_boids` random boids.
    ///
    /// Fails if the parameters or the bounds are invalid.
    pub fn new(params: SimulationParams, width: f32, height: f32) -> Result<Self> {
        Self::with_rng(params, width, height, StdRng::from_entropy())
    }

    // Same as new, with a reproducible random sequence
    pub fn with_seed(params: SimulationParams, width: f32, height: f32, seed: u64) -> Result<Self> {
        Self::with_rng(params, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: SimulationParams, width: f32, height: f32, rng: StdRng) -> Result<Self> {
        params.validate()?;
        let bounds = WorldBounds::new(width, height)?;

        let mut world = Self {
            boids: Vec::with_capacity(params.num_boids),
            params,
            bounds,
            state: RunState::Active,
            rng,
            ticks: 0,
        };
        world.seed();
        Ok(world)
    }

    /// Build a world around an explicit set of boids, without seeding.
    ///
    /// Boids outside the bounds are wrapped in and velocities faster than
    /// `max_speed` are slowed to it. Positions and velocities must be finite
    /// and group ids must be valid for the palette.
    pub fn from_boids(params: SimulationParams, width: f32, height: f32, boids: Vec<Boid>, seed: u64) -> Result<Self> {
        params.validate()?;
        let bounds = WorldBounds::new(width, height)?;

        for boid in &boids {
            if boid.group() >= params.num_groups() {
                return Err(SimulationError::invalid(
                    "boids",
                    format!("group {} has no color", boid.group()),
                ));
            }
            if !(boid.position.is_finite() && boid.velocity.is_finite()) {
                return Err(SimulationError::invalid(
                    "boids",
                    format!("non-finite state at {:?} moving {:?}", boid.position, boid.velocity),
                ));
            }
        }

        let boids = boids
            .into_iter()
            .map(|mut b| {
                b.position = bounds.wrap(b.position);
                b.velocity = clamp_magnitude(b.velocity, params.max_speed);
                b
            })
            .collect();

        Ok(Self {
            boids,
            params,
            bounds,
            state: RunState::Active,
            rng: StdRng::seed_from_u64(seed),
            ticks: 0,
        })
    }

    // Replace every boid with a freshly randomised one
    pub fn seed(&mut self) {
        let bounds = self.bounds;
        let params = &self.params;
        let rng = &mut self.rng;

        self.boids.clear();
        self.boids
            .extend((0..params.num_boids).map(|_| Boid::random(rng, bounds, params)));
        self.ticks = 0;

        info!(
            boids = self.boids.len(),
            width = bounds.width,
            height = bounds.height,
            "seeded flock"
        );
    }

    /// Change the world size. The old flock is discarded and re-seeded.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.bounds = WorldBounds::new(width, height)?;
        self.seed();
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state != RunState::Paused {
            debug!(ticks = self.ticks, "simulation paused");
            self.state = RunState::Paused;
        }
    }

    // Resume ticking; missed frames are not replayed
    pub fn resume(&mut self) {
        if self.state != RunState::Active {
            debug!(ticks = self.ticks, "simulation resumed");
            self.state = RunState::Active;
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // Flock-wide bias for the current state at the given time
    pub fn bias(&self, time_ms: f64) -> FlockBias {
        FlockBias {
            drift: drift_force(&self.boids, &self.params),
            variety: variety_forces(time_ms, &self.params),
        }
    }

    pub fn mean_velocity(&self) -> Vec2 {
        mean_velocity(&self.boids)
    }

    // Split borrows used by the stepper
    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Boid>, &SimulationParams, WorldBounds, &mut StdRng) {
        (&mut self.boids, &self.params, self.bounds, &mut self.rng)
    }

    pub(crate) fn advance_tick_count(&mut self) {
        self.ticks += 1;
    }
}
