/*
 * Physics Module
 *
 * This module advances the flock by one tick:
 * 1. Compute the flock-wide bias (drift neutralization, group variety)
 * 2. Advance each boid's wander timer
 * 3. Compute every boid's steering from the pre-tick snapshot
 * 4. Integrate velocity and position, wrapping at the edges
 *
 * All steering is computed before any boid moves, so no boid sees another
 * boid's post-tick state and the result does not depend on iteration order
 * or thread count. Wander timers draw from the world's random source in boid
 * order before the neighbor pass, which keeps seeded runs reproducible.
 *
 * Each tick is one fixed unit of simulated time. The frame-clock timestamp
 * only feeds the variety phase, so visible speed follows the frame rate.
 *
 * Optimized for larger flocks by:
 * - Using the spatial grid to narrow neighbor candidates
 * - Computing steering in parallel with rayon (the snapshot is read-only)
 */

use nannou::prelude::*;
use rayon::prelude::*;

use crate::boid::Boid;
use crate::flock::{World, WorldBounds};
use crate::params::SimulationParams;
use crate::spatial_grid::SpatialGrid;

/// Advance the world by one tick at frame-clock time `time_ms`.
///
/// Returns `false` without touching anything while the world is paused.
pub fn step(world: &mut World, time_ms: f64) -> bool {
    if world.is_paused() {
        return false;
    }

    let bias = world.bias(time_ms);

    let (boids, params, bounds, rng) = world.parts_mut();

    for boid in boids.iter_mut() {
        boid.advance_wander(rng);
    }

    let steering = compute_steering(boids, params, bounds);

    for (boid, steer) in boids.iter_mut().zip(steering) {
        let force = steer + bias.for_group(boid.group());
        boid.integrate(force, bounds, params);
    }

    world.advance_tick_count();
    true
}

/// Neighbor rule plus weighted wander for every boid, in boid order.
///
/// Strategy (grid or full scan, parallel or sequential) comes from
/// `params.performance`; every combination gives the same forces up to
/// floating-point summation order.
pub fn compute_steering(boids: &[Boid], params: &SimulationParams, bounds: WorldBounds) -> Vec<Vec2> {
    let grid = params.performance.spatial_grid.then(|| {
        let radii = &params.radii;
        let max_radius = radii.separation.max(radii.alignment).max(radii.cohesion);
        let mut grid = SpatialGrid::for_radii(max_radius, bounds);
        grid.rebuild(boids);
        grid
    });
    let grid = grid.as_ref();

    let steer = |i: usize| steering_for(i, boids, grid, params, bounds);

    if params.performance.parallel {
        (0..boids.len()).into_par_iter().map(steer).collect()
    } else {
        (0..boids.len()).map(steer).collect()
    }
}

fn steering_for(
    i: usize,
    boids: &[Boid],
    grid: Option<&SpatialGrid>,
    params: &SimulationParams,
    bounds: WorldBounds,
) -> Vec2 {
    let boid = &boids[i];
    match grid {
        Some(grid) => {
            let nearby = grid.nearby_indices(boid.position);
            let neighbors = nearby.into_iter().filter(|&j| j != i).map(|j| &boids[j]);
            boid.steering(neighbors, bounds, params)
        }
        None => {
            let neighbors = boids
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| other);
            boid.steering(neighbors, bounds, params)
        }
    }
}
