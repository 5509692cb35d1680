/*
 * Renderer Module
 *
 * This module turns the flock into triangles and draws them with nannou.
 *
 * The world uses screen conventions (origin at the top-left corner, y grows
 * downward) while nannou draws in a frame centred on the window with y
 * growing upward. Shapes are built in world space and mapped point by point,
 * so the heading flip falls out of the mapping.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::error::Result;
use crate::flock::{World, WorldBounds};
use crate::params::{parse_hex_color, SimulationParams};

const OUTLINE_WEIGHT: f32 = 1.0;

/// One boid ready to draw: triangle corners in world coordinates and the
/// group whose color fills it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoidShape {
    pub points: [Vec2; 3],
    pub group: usize,
}

pub fn boid_shape(boid: &Boid, params: &SimulationParams) -> BoidShape {
    BoidShape {
        points: boid.shape_points(&params.shape),
        group: boid.group(),
    }
}

pub fn shapes(world: &World) -> Vec<BoidShape> {
    world
        .boids
        .iter()
        .map(|boid| boid_shape(boid, world.params()))
        .collect()
}

// Colors resolved once from the hex strings in the parameters
#[derive(Debug, Clone)]
pub struct Palette {
    pub fills: Vec<Rgb<u8>>,
    pub outline: Rgb<u8>,
    pub background: Rgb<u8>,
}

impl Palette {
    pub fn from_params(params: &SimulationParams) -> Result<Self> {
        let to_rgb = |[r, g, b]: [u8; 3]| rgb(r, g, b);

        Ok(Self {
            fills: params.palette()?.into_iter().map(to_rgb).collect(),
            outline: to_rgb(parse_hex_color(&params.outline_color)?),
            background: to_rgb(parse_hex_color(&params.background_color)?),
        })
    }

    pub fn fill(&self, group: usize) -> Rgb<u8> {
        self.fills[group % self.fills.len()]
    }
}

// World (top-left origin, y down) to nannou (centred, y up)
#[inline]
pub fn world_to_screen(p: Point2, bounds: WorldBounds) -> Point2 {
    pt2(p.x - bounds.width / 2.0, bounds.height / 2.0 - p.y)
}

pub fn draw_world(draw: &Draw, world: &World, palette: &Palette) {
    let bounds = world.bounds();

    draw.background().color(palette.background);

    for shape in shapes(world) {
        let points = shape.points.map(|p| world_to_screen(p, bounds));
        draw.polygon()
            .color(palette.fill(shape.group))
            .stroke(palette.outline)
            .stroke_weight(OUTLINE_WEIGHT)
            .points(points);
    }
}

/// Perception radii and velocity of the first boid, drawn over the flock
/// when the debug overlay is on.
pub fn draw_perception(draw: &Draw, world: &World) {
    let Some(first) = world.boids.first() else {
        return;
    };
    let bounds = world.bounds();
    let radii = &world.params().radii;
    let centre = world_to_screen(first.position, bounds);

    for (radius, color) in [(radii.separation, RED), (radii.alignment, GREEN), (radii.cohesion, BLUE)] {
        draw.ellipse()
            .xy(centre)
            .radius(radius)
            .no_fill()
            .stroke(color)
            .stroke_weight(1.0);
    }

    let tip = world_to_screen(first.position + first.velocity * 5.0, bounds);
    draw.arrow().start(centre).end(tip).color(ORANGE).stroke_weight(2.0);
}
