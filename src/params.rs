/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct holding every tunable of
 * the flock: kinematic limits, perception radii, rule weights, the optional
 * field-of-view gate, drift neutralization and per-group variety, plus the
 * palette and triangle geometry used when drawing.
 *
 * Parameters are fixed for the lifetime of a World. They come from one of
 * the two presets or from a TOML file, and are validated before use.
 */

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

use crate::error::{Result, SimulationError};

// Radii beyond which neighbors stop counting for each rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Radii {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
}

impl Default for Radii {
    fn default() -> Self {
        Self {
            separation: 20.0,
            alignment: 38.0,
            cohesion: 80.0,
        }
    }
}

// Blend coefficients for the steering forces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    pub wander: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            separation: 2.0,
            alignment: 0.7,
            cohesion: 0.45,
            wander: 0.02,
        }
    }
}

/// Forward cone that gates alignment and cohesion (never separation).
///
/// A neighbor is admitted when the cosine between the agent's heading and
/// the direction to the neighbor is at least `half_angle_cos`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOfView {
    pub enabled: bool,
    pub half_angle_cos: f32,
}

impl FieldOfView {
    // Build the gate from a full cone angle in degrees
    pub fn from_degrees(enabled: bool, full_angle_deg: f32) -> Self {
        Self {
            enabled,
            half_angle_cos: (full_angle_deg * 0.5).to_radians().cos(),
        }
    }
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self::from_degrees(true, 220.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftNeutralization {
    pub enabled: bool,
    pub damping: f32,
}

impl Default for DriftNeutralization {
    fn default() -> Self {
        Self {
            enabled: true,
            damping: 0.05,
        }
    }
}

// Slowly rotating per-group bias; angular_frequency is in radians per
// millisecond of frame-clock time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variety {
    pub enabled: bool,
    pub amplitude: f32,
    pub angular_frequency: f32,
    pub group_phases: Vec<f32>,
}

impl Default for Variety {
    fn default() -> Self {
        Self {
            enabled: true,
            amplitude: 0.02,
            angular_frequency: 0.00008,
            group_phases: vec![0.0, 2.1, 4.0],
        }
    }
}

// Triangle drawn for each boid, in world units along the heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeGeometry {
    pub tip: f32,
    pub tail: f32,
    pub half_width: f32,
}

impl Default for ShapeGeometry {
    fn default() -> Self {
        Self {
            tip: 14.0,
            tail: 9.0,
            half_width: 4.0,
        }
    }
}

// Neighbor-pass strategy; every combination produces the same forces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Performance {
    pub parallel: bool,
    pub spatial_grid: bool,
}

impl Default for Performance {
    fn default() -> Self {
        Self {
            parallel: true,
            spatial_grid: true,
        }
    }
}

// Named starting points for the parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Field of view, drift neutralization and group variety enabled
    Tuned,
    /// Plain grouped flocking with the three extras disabled
    Classic,
}

// Parameters for the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub enabled: bool,
    pub num_boids: usize,
    pub max_speed: f32,
    pub max_force: f32,
    pub max_turn_rate: f32,
    pub radii: Radii,
    pub weights: Weights,
    pub field_of_view: FieldOfView,
    pub drift_neutralization: DriftNeutralization,
    pub variety: Variety,
    // One entry per group
    pub colors: Vec<String>,
    pub outline_color: String,
    pub background_color: String,
    pub shape: ShapeGeometry,
    pub performance: Performance,
    pub show_debug: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::tuned()
    }
}

impl SimulationParams {
    pub fn tuned() -> Self {
        Self {
            enabled: true,
            num_boids: 120,
            max_speed: 3.0,
            max_force: 0.1,
            max_turn_rate: PI / 30.0,
            radii: Radii::default(),
            weights: Weights::default(),
            field_of_view: FieldOfView::default(),
            drift_neutralization: DriftNeutralization::default(),
            variety: Variety::default(),
            colors: vec![
                "#204fc7".to_string(),
                "#067a52".to_string(),
                "#ad3829".to_string(),
            ],
            outline_color: "#282828".to_string(),
            background_color: "#f4f4f2".to_string(),
            shape: ShapeGeometry::default(),
            performance: Performance::default(),
            show_debug: false,
        }
    }

    pub fn classic() -> Self {
        let mut params = Self::tuned();
        params.field_of_view.enabled = false;
        params.drift_neutralization.enabled = false;
        params.variety.enabled = false;
        params
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Tuned => Self::tuned(),
            Preset::Classic => Self::classic(),
        }
    }

    pub fn num_groups(&self) -> usize {
        self.colors.len()
    }

    /// Parse parameters from TOML text. Missing fields keep their
    /// `tuned()` values. The result is validated.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let params: SimulationParams = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    // Load and validate a TOML config file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimulationError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would produce silently degenerate motion.
    pub fn validate(&self) -> Result<()> {
        if self.num_boids == 0 {
            return Err(SimulationError::invalid("num_boids", "must be at least 1"));
        }
        positive("max_speed", self.max_speed)?;
        positive("max_force", self.max_force)?;
        positive("max_turn_rate", self.max_turn_rate)?;

        non_negative("radii.separation", self.radii.separation)?;
        non_negative("radii.alignment", self.radii.alignment)?;
        non_negative("radii.cohesion", self.radii.cohesion)?;

        finite("weights.separation", self.weights.separation)?;
        finite("weights.alignment", self.weights.alignment)?;
        finite("weights.cohesion", self.weights.cohesion)?;
        finite("weights.wander", self.weights.wander)?;

        let cos = self.field_of_view.half_angle_cos;
        if !(-1.0..=1.0).contains(&cos) {
            return Err(SimulationError::invalid(
                "field_of_view.half_angle_cos",
                format!("{cos} is not a cosine"),
            ));
        }

        non_negative("drift_neutralization.damping", self.drift_neutralization.damping)?;

        finite("variety.amplitude", self.variety.amplitude)?;
        finite("variety.angular_frequency", self.variety.angular_frequency)?;
        if self.variety.enabled && self.variety.group_phases.is_empty() {
            return Err(SimulationError::invalid(
                "variety.group_phases",
                "needs at least one phase when variety is enabled",
            ));
        }
        for &phase in &self.variety.group_phases {
            finite("variety.group_phases", phase)?;
        }

        non_negative("shape.tip", self.shape.tip)?;
        non_negative("shape.tail", self.shape.tail)?;
        non_negative("shape.half_width", self.shape.half_width)?;

        self.palette()?;
        parse_hex_color(&self.outline_color)?;
        parse_hex_color(&self.background_color)?;

        Ok(())
    }

    // Group colors as RGB triples, in group order
    pub fn palette(&self) -> Result<Vec<[u8; 3]>> {
        if self.colors.is_empty() {
            return Err(SimulationError::invalid("colors", "needs at least one group color"));
        }
        self.colors.iter().map(|c| parse_hex_color(c)).collect()
    }
}

// Parse `#rrggbb` (leading `#` optional)
pub fn parse_hex_color(text: &str) -> Result<[u8; 3]> {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SimulationError::InvalidColor(text.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| SimulationError::InvalidColor(text.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

fn finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, format!("{value} is not finite")))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(SimulationError::invalid(name, format!("{value} is negative")));
    }
    Ok(())
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(SimulationError::invalid(name, format!("{value} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        SimulationParams::tuned().validate().unwrap();
        SimulationParams::classic().validate().unwrap();
    }

    #[test]
    fn presets_differ_only_in_feature_flags() {
        let tuned = SimulationParams::tuned();
        let mut classic = SimulationParams::classic();
        assert!(!classic.field_of_view.enabled);
        assert!(!classic.drift_neutralization.enabled);
        assert!(!classic.variety.enabled);

        classic.field_of_view.enabled = true;
        classic.drift_neutralization.enabled = true;
        classic.variety.enabled = true;
        assert_eq!(classic, tuned);
    }

    #[test]
    fn fov_from_degrees_uses_half_angle() {
        let fov = FieldOfView::from_degrees(true, 180.0);
        assert!(fov.half_angle_cos.abs() < 1e-6);
        let wide = FieldOfView::from_degrees(true, 220.0);
        assert!(wide.half_angle_cos < 0.0);
    }

    #[test]
    fn rejects_non_positive_speed() {
        let mut params = SimulationParams::tuned();
        params.max_speed = 0.0;
        let err = params.validate().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "max_speed", .. }));
    }

    #[test]
    fn rejects_negative_radius() {
        let mut params = SimulationParams::tuned();
        params.radii.cohesion = -1.0;
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidParameter { name: "radii.cohesion", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_cosine() {
        let mut params = SimulationParams::tuned();
        params.field_of_view.half_angle_cos = 1.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_variety_without_phases() {
        let mut params = SimulationParams::tuned();
        params.variety.group_phases.clear();
        assert!(params.validate().is_err());

        params.variety.enabled = false;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_bad_palette() {
        let mut params = SimulationParams::tuned();
        params.colors.clear();
        assert!(params.validate().is_err());

        params.colors = vec!["#12345z".to_string()];
        assert!(matches!(params.validate(), Err(SimulationError::InvalidColor(_))));
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#204fc7").unwrap(), [0x20, 0x4f, 0xc7]);
        assert_eq!(parse_hex_color("067a52").unwrap(), [0x06, 0x7a, 0x52]);
        assert!(parse_hex_color("#fff").is_err());
    }

    #[test]
    fn partial_toml_keeps_tuned_defaults() {
        let params = SimulationParams::from_toml_str(
            r#"
            num_boids = 40
            max_speed = 2.5

            [field_of_view]
            enabled = false

            [weights]
            wander = 0.0
            "#,
        )
        .unwrap();

        let tuned = SimulationParams::tuned();
        assert_eq!(params.num_boids, 40);
        assert_eq!(params.max_speed, 2.5);
        assert!(!params.field_of_view.enabled);
        assert_eq!(params.field_of_view.half_angle_cos, tuned.field_of_view.half_angle_cos);
        assert_eq!(params.weights.wander, 0.0);
        assert_eq!(params.weights.separation, tuned.weights.separation);
        assert_eq!(params.colors, tuned.colors);
    }

    #[test]
    fn invalid_toml_values_are_rejected() {
        assert!(matches!(
            SimulationParams::from_toml_str("max_force = -0.1"),
            Err(SimulationError::InvalidParameter { name: "max_force", .. })
        ));
        assert!(matches!(
            SimulationParams::from_toml_str("num_boids = \"many\""),
            Err(SimulationError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SimulationParams::from_toml_file("/nonexistent/flock.toml").unwrap_err();
        assert!(matches!(err, SimulationError::ConfigRead { .. }));
        assert!(err.to_string().contains("flock.toml"));
    }
}
