//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use crate::params::TerrainParams;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Kinetic Terrain")]
#[command(about = "Procedural terrain viewer over an infinite noise field", long_about = None)]
pub struct Args {
    /// Grid resolution (vertices per side, minimum 2)
    #[arg(long, value_name = "N", default_value = "256", value_parser = parse_grid_n)]
    pub grid_n: usize,

    /// World-unit spacing between adjacent grid samples
    #[arg(long, value_name = "METERS", default_value = "0.5")]
    pub cell_spacing: f32,

    /// Maximum terrain elevation
    #[arg(long, value_name = "METERS", default_value = "30.0")]
    pub amplitude: f32,

    /// Base noise frequency (cycles per meter)
    #[arg(long, value_name = "FREQ", default_value = "0.02")]
    pub frequency: f32,

    /// Noise seed
    #[arg(long, default_value = "0")]
    pub seed: u32,

    /// Diffuse texture image (falls back to a flat placeholder if unreadable)
    #[arg(long, value_name = "PATH")]
    pub texture: Option<PathBuf>,
}

fn parse_grid_n(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{}", e))?;
    if n < 2 {
        return Err("grid resolution must be at least 2".to_string());
    }
    Ok(n)
}

impl Args {
    /// Build terrain parameters from the parsed arguments.
    pub fn terrain_params(&self) -> TerrainParams {
        TerrainParams {
            grid_n: self.grid_n,
            cell_spacing_m: self.cell_spacing,
            amplitude_m: self.amplitude,
            base_frequency: self.frequency,
            offset: Vec2::ZERO,
            noise_seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["kinetic-terrain"]);
        let params = args.terrain_params();
        assert_eq!(params.grid_n, 256);
        assert_eq!(params.cell_spacing_m, 0.5);
        assert_eq!(params.amplitude_m, 30.0);
        assert!(args.texture.is_none());
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        assert!(Args::try_parse_from(["kinetic-terrain", "--grid-n", "1"]).is_err());
        assert!(Args::try_parse_from(["kinetic-terrain", "--grid-n", "2"]).is_ok());
    }
}
