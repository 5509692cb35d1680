/*
 * Flock Background - Module Definitions
 *
 * This file defines the module structure of the flocking simulation.
 * The core (vector math, boids, world, stepper, spatial grid, shapes) runs
 * headless; `app` wires it to a nannou window.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use error::{Result, SimulationError};
pub use flock::{FlockBias, RunState, World, WorldBounds};
pub use params::{Preset, SimulationParams};
pub use physics::step;
pub use renderer::{boid_shape, shapes, BoidShape};
pub use spatial_grid::SpatialGrid;
pub use debug::DebugInfo;

// Define modules
pub mod vector;
pub mod cli;
pub mod error;
pub mod params;
pub mod boid;
pub mod flock;
pub mod spatial_grid;
pub mod physics;
pub mod renderer;
pub mod debug;
pub mod app;
