//! Scenario description and its TOML file format.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use solar_sweep_core::RunParameters;

/// Scenario file version understood by this build.
pub const SUPPORTED_SCENARIO_VERSION: u32 = 1;

/// Drawing area the roof is fitted into.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Canvas {
    /// Width in pixels.
    pub width_px: f64,
    /// Height in pixels.
    pub height_px: f64,
    /// Margin kept free on every side, in pixels.
    pub padding_px: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width_px: 1200.0,
            height_px: 600.0,
            padding_px: 20.0,
        }
    }
}

/// Physical footprint of the cleaning robot.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RobotDimensions {
    /// Brush width across the direction of travel, in millimetres.
    pub width_mm: f64,
    /// Body length along the direction of travel, in millimetres.
    pub length_mm: f64,
}

impl Default for RobotDimensions {
    fn default() -> Self {
        Self {
            width_mm: 1200.0,
            length_mm: 1450.0,
        }
    }
}

/// Everything needed to simulate one or more cleaning runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    /// Inputs recorded with every run.
    pub parameters: RunParameters,
    /// Drawing area used for the layout.
    pub canvas: Canvas,
    /// Robot footprint.
    pub robot: RobotDimensions,
    /// Ticks per simulated second.
    pub tick_rate_hz: u32,
    /// Number of consecutive runs.
    pub runs: u32,
    /// Frames a single run may take before it is abandoned. Unbounded when
    /// `None`.
    pub frame_budget: Option<u64>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            parameters: RunParameters::default(),
            canvas: Canvas::default(),
            robot: RobotDimensions::default(),
            tick_rate_hz: 60,
            runs: 1,
            frame_budget: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    version: u32,
    run: RunParameters,
    #[serde(default)]
    canvas: Canvas,
    #[serde(default)]
    robot: RobotDimensions,
    tick_rate_hz: Option<u32>,
    runs: Option<u32>,
    frame_budget: Option<u64>,
}

/// Loads a scenario from the TOML file at `path`.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario at {}", path.display()))?;
    parse_scenario(&contents).with_context(|| format!("invalid scenario {}", path.display()))
}

/// Parses a scenario from TOML contents.
pub fn parse_scenario(contents: &str) -> Result<Scenario> {
    let file: ScenarioFile =
        toml::from_str(contents).context("failed to parse scenario toml contents")?;
    if file.version != SUPPORTED_SCENARIO_VERSION {
        bail!(
            "unsupported scenario version {}; expected {}",
            file.version,
            SUPPORTED_SCENARIO_VERSION
        );
    }

    let defaults = Scenario::default();
    Ok(Scenario {
        parameters: file.run,
        canvas: file.canvas,
        robot: file.robot,
        tick_rate_hz: file.tick_rate_hz.unwrap_or(defaults.tick_rate_hz),
        runs: file.runs.unwrap_or(defaults.runs),
        frame_budget: file.frame_budget.or(defaults.frame_budget),
    })
}
