//! Command-line options and how they resolve to simulation parameters

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::Result;
use crate::params::{Preset, SimulationParams};

/// Animated flocking background
#[derive(Parser, Debug, Clone)]
#[command(name = "flock-background")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML file with simulation parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Built-in parameter set, used when no config file is given
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Number of boids
    #[arg(long)]
    pub boids: Option<usize>,

    /// Seed for a reproducible flock
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show the debug overlay and log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Exit without opening a window
    #[arg(long)]
    pub disabled: bool,
}

impl Cli {
    /// Config file or preset, then the command-line overrides, validated.
    pub fn load_params(&self) -> Result<SimulationParams> {
        let mut params = match &self.config {
            Some(path) => {
                if self.preset.is_some() {
                    warn!("--preset is ignored when --config is given");
                }
                debug!(path = %path.display(), "loading configuration");
                SimulationParams::from_toml_file(path)?
            }
            None => SimulationParams::preset(self.preset.unwrap_or(Preset::Tuned)),
        };

        if let Some(boids) = self.boids {
            params.num_boids = boids;
        }
        if self.debug {
            params.show_debug = true;
        }
        if self.disabled {
            params.enabled = false;
        }

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("flock-background").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_tuned_preset() {
        let params = parse(&[]).load_params().unwrap();
        assert_eq!(params, SimulationParams::tuned());
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let params = parse(&["--preset", "classic", "--boids", "40", "--debug", "--disabled"])
            .load_params()
            .unwrap();

        assert!(!params.field_of_view.enabled);
        assert_eq!(params.num_boids, 40);
        assert!(params.show_debug);
        assert!(!params.enabled);
    }

    #[test]
    fn overrides_are_validated() {
        let err = parse(&["--boids", "0"]).load_params().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { name: "num_boids", .. }));
    }

    #[test]
    fn missing_config_file_fails() {
        let err = parse(&["--config", "/nonexistent/flock.toml"]).load_params().unwrap_err();
        assert!(matches!(err, SimulationError::ConfigRead { .. }));
    }
}
