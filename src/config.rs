use crate::projection::Crs;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub boundary_file: PathBuf,
    pub language_distribution: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub file: PathBuf,
    #[serde(default)]
    pub excluded_countries: Vec<String>,
    pub southernmost_latitude: Option<f64>,
    pub northernmost_latitude: Option<f64>,
    pub map_projection: String,
    pub random_seed: u64,
    pub grid_length: f64,
    pub grid_relative_std_dev: f64,
    pub min_relative_distance: f64,
    pub width: f64,
    pub height: f64,
    pub undefined_code: String,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration errors are fatal before any country is processed.
    pub fn validate(&self) -> Result<()> {
        let out = &self.output;
        if !(out.grid_length > 0.0) || !out.grid_length.is_finite() {
            bail!("grid_length must be a positive number, got {}", out.grid_length);
        }
        if !(out.grid_relative_std_dev > 0.0) || !out.grid_relative_std_dev.is_finite() {
            bail!(
                "grid_relative_std_dev must be a positive fraction, got {}",
                out.grid_relative_std_dev
            );
        }
        if !(out.min_relative_distance >= 0.0) || !out.min_relative_distance.is_finite() {
            bail!(
                "min_relative_distance must be non-negative, got {}",
                out.min_relative_distance
            );
        }
        if !(out.width > 0.0) || !(out.height > 0.0) {
            bail!("width and height must be positive, got {}x{}", out.width, out.height);
        }
        Crs::parse(&out.map_projection)?;
        if let (Some(south), Some(north)) = (out.southernmost_latitude, out.northernmost_latitude) {
            if south >= north {
                bail!(
                    "southernmost_latitude {} must be below northernmost_latitude {}",
                    south,
                    north
                );
            }
        }
        Ok(())
    }
}
