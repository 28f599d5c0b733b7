#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that wires layout, planning, motion and recording.
//!
//! [`run_scenario`] lays out the roof, plans the coverage path, places the
//! robot at the bottom-right corner of the panel block and drives the world
//! with the headless rendering backend until every requested run finished.

pub mod args;
pub mod scenario;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, ensure, Context, Result};
use chrono::Local;
use glam::Vec2;
use solar_sweep_core::{Command, CoveragePath, Event, Layout, Point, RunSummary};
use solar_sweep_rendering::{
    Color, FrameControl, HeadlessBackend, PanelGridPresentation, PathPresentation, Presentation,
    RenderingBackend, RobotPresentation, Scene,
};
use solar_sweep_system_coverage::{generate_coverage_path, PathGeometry};
use solar_sweep_system_layout::{calculate_layout, LayoutRequest};
use solar_sweep_system_recorder::{csv, MemoryRunStore, RunRecorder};
use solar_sweep_world::{self as world, query, World};

pub use crate::scenario::{Canvas, RobotDimensions, Scenario};

const WINDOW_TITLE: &str = "Solar Sweep";
const CLEAR_COLOR: Color = Color::from_rgb_u8(245, 245, 240);
const ROOF_COLOR: Color = Color::from_rgb_u8(150, 150, 150);
const PANEL_COLOR: Color = Color::from_rgb_u8(25, 60, 140);
const PATH_COLOR: Color = Color::from_rgb_u8(230, 180, 30);
const ROBOT_COLOR: Color = Color::from_rgb_u8(210, 40, 40);

/// Result of one simulated run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Summary handed to the run history.
    pub summary: RunSummary,
    /// Ticks the run consumed.
    pub ticks: u64,
    /// Simulated time before the speed multiplier is applied.
    pub simulated: Duration,
}

/// Everything produced by [`run_scenario`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioOutcome {
    /// Computed roof and panel layout.
    pub layout: Layout,
    /// Coverage path followed by every run.
    pub path: CoveragePath,
    /// Home position of the robot on the panel surface.
    pub home: Point,
    /// One report per run in execution order.
    pub runs: Vec<RunReport>,
}

impl ScenarioOutcome {
    /// Run summaries in recording order.
    #[must_use]
    pub fn summaries(&self) -> Vec<RunSummary> {
        self.runs.iter().map(|run| run.summary.clone()).collect()
    }
}

/// Simulates every run of the scenario and returns the recorded history.
pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioOutcome> {
    let parameters = &scenario.parameters;
    parameters.validate().context("invalid run parameters")?;
    ensure!(
        scenario.robot.width_mm > 0.0 && scenario.robot.length_mm > 0.0,
        "robot dimensions must be positive"
    );
    ensure!(scenario.runs > 0, "at least one run is required");

    let layout = calculate_layout(&LayoutRequest {
        roof_width_m: parameters.roof_width_m,
        roof_length_m: parameters.roof_length_m,
        canvas_width_px: scenario.canvas.width_px,
        canvas_height_px: scenario.canvas.height_px,
        canvas_padding_px: scenario.canvas.padding_px,
        panel_width_mm: parameters.panel_width_mm,
        panel_length_mm: parameters.panel_length_mm,
        panel_padding_mm: parameters.panel_padding_mm,
    })
    .context("failed to lay out the roof")?;
    let scale = layout.scale_factor;
    let grid = &layout.panel_grid;
    let robot_width_px = scenario.robot.width_mm * scale;
    let robot_length_px = scenario.robot.length_mm * scale;

    let path = generate_coverage_path(
        parameters.path_kind,
        &PathGeometry::from_grid(grid, robot_width_px),
    );
    let surface = grid.surface();
    let home = surface.map_or(Point::ORIGIN, |surface| {
        Point::new(
            surface.width - robot_width_px / 2.0,
            surface.height - robot_length_px / 2.0,
        )
    });
    let surface_origin = surface.unwrap_or(layout.roof_rect);
    tracing::info!(
        scale,
        cols = grid.cols(),
        rows = grid.rows(),
        kind = %parameters.path_kind,
        waypoints = path.len(),
        length_px = path.total_length(),
        "planned coverage"
    );

    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::PlaceRobot { home }, &mut events);
    world::apply(
        &mut world,
        Command::Configure {
            panel_width_px: grid.panel_width_px(),
            panel_inclination_deg: parameters.panel_inclination_deg,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SetCoveragePath { path: path.clone() },
        &mut events,
    );

    let presentation = Presentation::new(
        WINDOW_TITLE,
        CLEAR_COLOR,
        Scene::new(
            PanelGridPresentation::from_layout(&layout, ROOF_COLOR, PANEL_COLOR),
            Vec2::new(surface_origin.x as f32, surface_origin.y as f32),
            PathPresentation::from_path(&path, PATH_COLOR),
            RobotPresentation::new(
                query::home(&world),
                Vec2::new(robot_width_px as f32, robot_length_px as f32),
                ROBOT_COLOR,
            )?,
        ),
    );
    let backend = HeadlessBackend::with_tick_rate(scenario.tick_rate_hz, scenario.frame_budget)?;
    tracing::debug!(
        frame_dt = ?backend.frame_dt(),
        max_frames = ?backend.max_frames(),
        "headless tick source ready"
    );
    let mut recorder = RunRecorder::new(MemoryRunStore::new(), parameters.clone());

    let mut runs = Vec::with_capacity(scenario.runs as usize);
    for _ in 0..scenario.runs {
        let start = Command::Start {
            speed_mm_per_sec: parameters.robot_speed_mm_per_sec,
            scale_factor: scale,
            speed_multiplier: parameters.speed_multiplier,
        };
        runs.push(execute_run(
            &mut world,
            &mut recorder,
            start,
            backend,
            presentation.clone(),
        )?);
    }

    Ok(ScenarioOutcome {
        layout,
        path,
        home,
        runs,
    })
}

fn execute_run(
    world: &mut World,
    recorder: &mut RunRecorder,
    start: Command,
    backend: HeadlessBackend,
    presentation: Presentation,
) -> Result<RunReport> {
    let mut events = Vec::new();
    let mut recorded = Vec::new();
    world::apply(world, start, &mut events);
    if let Some(reason) = events.iter().find_map(|event| match event {
        Event::StartRejected { reason } => Some(*reason),
        _ => None,
    }) {
        bail!("run rejected: {reason}");
    }
    recorder.handle(&events, &mut recorded);

    let mut ticks = 0_u64;
    if query::is_running(world) {
        backend.run(presentation, |dt, scene| {
            events.clear();
            world::apply(world, Command::Tick { dt }, &mut events);
            recorder.handle(&events, &mut recorded);
            scene.robot.set_pose(query::pose(world));
            ticks += 1;
            if query::is_running(world) {
                FrameControl::Continue
            } else {
                FrameControl::Exit
            }
        })?;
    }

    let Some(summary) = recorded.pop() else {
        bail!("run ended without reporting completion");
    };
    tracing::info!(
        run = summary.run_number,
        ticks,
        elapsed = %csv::format_elapsed(summary.elapsed),
        "run finished"
    );
    Ok(RunReport {
        summary,
        ticks,
        simulated: query::elapsed(world),
    })
}

/// Writes the run history of `outcome` into `directory` as a timestamped CSV.
pub fn write_history(outcome: &ScenarioOutcome, directory: &Path) -> Result<PathBuf> {
    let path = csv::write_runs(directory, &outcome.summaries(), Local::now())?;
    Ok(path)
}
