/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that collects frame statistics
 * and flock measurements, and draws them as a small overlay panel.
 *
 * Includes metrics for:
 * - FPS (frames per second) and frame time
 * - Simulation ticks and run state
 * - Mean boid speed and the speed of the flock as a whole (drift)
 */

use nannou::prelude::*;
use std::time::Duration;

use crate::flock::World;

const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 20.0;
const PANEL_WIDTH: f32 = 220.0;

#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub boids: usize,
    pub ticks: u64,
    pub paused: bool,
    pub mean_speed: f32,
    pub drift_speed: f32,
}

impl DebugInfo {
    pub fn record_frame(&mut self, fps: f32, frame_time: Duration) {
        self.fps = fps;
        self.frame_time = frame_time;
    }

    pub fn observe(&mut self, world: &World) {
        self.boids = world.boids.len();
        self.ticks = world.ticks();
        self.paused = world.is_paused();
        self.mean_speed = if world.boids.is_empty() {
            0.0
        } else {
            world.boids.iter().map(|b| b.speed()).sum::<f32>() / world.boids.len() as f32
        };
        self.drift_speed = world.mean_velocity().length();
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Boids: {}", self.boids),
            format!("Ticks: {}{}", self.ticks, if self.paused { " (paused)" } else { "" }),
            format!("Mean speed: {:.2}", self.mean_speed),
            format!("Drift: {:.3}", self.drift_speed),
        ]
    }

    // Panel in the top-left corner of the window
    pub fn draw(&self, draw: &Draw, window_rect: Rect) {
        let lines = self.lines();
        let panel_height = LINE_HEIGHT * lines.len() as f32 + MARGIN;

        draw.rect()
            .x_y(window_rect.left() + PANEL_WIDTH / 2.0, window_rect.top() - panel_height / 2.0)
            .w_h(PANEL_WIDTH, panel_height)
            .color(rgba(0.0, 0.0, 0.0, 0.7));

        let text_x = window_rect.left() + PANEL_WIDTH / 2.0;
        let text_y = window_rect.top() - MARGIN;

        for (i, text) in lines.iter().enumerate() {
            draw.text(text)
                .x_y(text_x, text_y - i as f32 * LINE_HEIGHT)
                .w(PANEL_WIDTH - MARGIN)
                .left_justify()
                .color(WHITE)
                .font_size(14);
        }
    }
}
