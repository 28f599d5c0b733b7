//! Command-line arguments.

use std::{path::PathBuf, str::FromStr};

use anyhow::Result;
use clap::Parser;
use solar_sweep_core::{PathKind, RunParameters};

use crate::scenario::{load_scenario, Canvas, RobotDimensions, Scenario};

/// Simulates a cleaning robot sweeping a rooftop solar array.
#[derive(Parser, Debug)]
#[command(name = "solar-sweep", version, about, long_about = None)]
pub struct CliArgs {
    /// TOML scenario holding every input; when given, the input flags below are ignored.
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Directory receiving the timestamped run history CSV.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Roof width in metres.
    #[arg(long, default_value_t = 20.0)]
    pub roof_width: f64,

    /// Roof length in metres.
    #[arg(long, default_value_t = 8.0)]
    pub roof_length: f64,

    /// Panel width in millimetres.
    #[arg(long, default_value_t = 1100.0)]
    pub panel_width: f64,

    /// Panel length in millimetres.
    #[arg(long, default_value_t = 2000.0)]
    pub panel_length: f64,

    /// Panel inclination in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub inclination: f64,

    /// Nominal robot speed in millimetres per second.
    #[arg(long, default_value_t = 10_000.0)]
    pub speed: f64,

    /// Playback acceleration applied to speed and reported duration.
    #[arg(long, default_value_t = RunParameters::DEFAULT_SPEED_MULTIPLIER)]
    pub multiplier: f64,

    /// Coverage strategy: zigzag, rowwise or loop.
    #[arg(long, default_value = "ZigZag", value_parser = PathKind::from_str)]
    pub path_kind: PathKind,

    /// Gap between panels in millimetres.
    #[arg(long, default_value_t = RunParameters::DEFAULT_PANEL_PADDING_MM)]
    pub panel_padding: f64,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1200.0)]
    pub canvas_width: f64,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 600.0)]
    pub canvas_height: f64,

    /// Canvas margin in pixels.
    #[arg(long, default_value_t = 20.0)]
    pub canvas_padding: f64,

    /// Robot brush width in millimetres.
    #[arg(long, default_value_t = 1200.0)]
    pub robot_width: f64,

    /// Robot body length in millimetres.
    #[arg(long, default_value_t = 1450.0)]
    pub robot_length: f64,

    /// Simulation ticks per second.
    #[arg(long, default_value_t = 60)]
    pub tick_rate: u32,

    /// Number of consecutive runs to simulate.
    #[arg(long, default_value_t = 1)]
    pub runs: u32,

    /// Abandon a run after this many ticks; runs are unbounded by default.
    #[arg(long)]
    pub frame_budget: Option<u64>,
}

impl CliArgs {
    /// Resolves the scenario described by the arguments.
    pub fn to_scenario(&self) -> Result<Scenario> {
        if let Some(path) = &self.scenario {
            return load_scenario(path);
        }

        Ok(Scenario {
            parameters: RunParameters {
                roof_width_m: self.roof_width,
                roof_length_m: self.roof_length,
                panel_width_mm: self.panel_width,
                panel_length_mm: self.panel_length,
                panel_inclination_deg: self.inclination,
                robot_speed_mm_per_sec: self.speed,
                speed_multiplier: self.multiplier,
                path_kind: self.path_kind,
                panel_padding_mm: self.panel_padding,
            },
            canvas: Canvas {
                width_px: self.canvas_width,
                height_px: self.canvas_height,
                padding_px: self.canvas_padding,
            },
            robot: RobotDimensions {
                width_mm: self.robot_width,
                length_mm: self.robot_length,
            },
            tick_rate_hz: self.tick_rate,
            runs: self.runs,
            frame_budget: self.frame_budget,
        })
    }
}
