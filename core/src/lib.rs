#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the solar sweep simulator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative robot world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values that systems
//! such as the run recorder react to deterministically. Planning systems are
//! pure functions over the geometry types declared here.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of millimetres in a metre.
pub const MILLIMETRES_PER_METRE: f64 = 1000.0;

/// Fraction of the panel width used as the robot's turning radius.
pub const TURN_RADIUS_PANEL_FRACTION: f64 = 0.3;

/// Point in the pixel space of the animation surface that bounds the panel grid.
///
/// The origin sits in the top-left corner and `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate in pixels.
    pub x: f64,
    /// Vertical coordinate in pixels.
    pub y: f64,
}

impl Point {
    /// Surface origin in the top-left corner.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new point from pixel coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned rectangle expressed in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge of the rectangle.
    pub x: f64,
    /// Top edge of the rectangle.
    pub y: f64,
    /// Horizontal extent of the rectangle.
    pub width: f64,
    /// Vertical extent of the rectangle.
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge of the rectangle.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge of the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Reports whether two rectangles share interior area.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Sweep strategies available to the coverage planner.
///
/// Serialized as its canonical name; deserialization accepts every spelling
/// understood by [`FromStr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PathKind {
    /// Column-major snake starting at the bottom of the rightmost column.
    ZigZag,
    /// Row-major snake starting at the top-left corner.
    RowWise,
    /// Fixed eight-point cycle around the extreme rows and columns.
    Loop,
}

impl PathKind {
    /// All path kinds in declaration order.
    pub const ALL: [PathKind; 3] = [PathKind::ZigZag, PathKind::RowWise, PathKind::Loop];

    /// Canonical name used when persisting runs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ZigZag => "ZigZag",
            Self::RowWise => "RowWise",
            Self::Loop => "Loop",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathKind {
    type Err = CoverageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "zigzag" => Ok(Self::ZigZag),
            "rowwise" => Ok(Self::RowWise),
            "loop" => Ok(Self::Loop),
            _ => Err(CoverageError::UnsupportedPathType(value.to_owned())),
        }
    }
}

impl TryFrom<String> for PathKind {
    type Error = CoverageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PathKind> for String {
    fn from(kind: PathKind) -> Self {
        kind.name().to_owned()
    }
}

/// Errors raised while selecting a coverage strategy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoverageError {
    /// The requested strategy is not one of the enumerated path kinds.
    #[error("unsupported coverage path type '{0}'")]
    UnsupportedPathType(String),
}

/// Uniform grid of panels laid out in pixel space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelGrid {
    rows: u32,
    cols: u32,
    panel_width_px: f64,
    panel_height_px: f64,
    padding_px: f64,
    rects: Vec<Rect>,
}

impl PanelGrid {
    /// Creates a grid description from its counts, panel size and row-major rectangles.
    #[must_use]
    pub fn new(
        rows: u32,
        cols: u32,
        panel_width_px: f64,
        panel_height_px: f64,
        padding_px: f64,
        rects: Vec<Rect>,
    ) -> Self {
        Self {
            rows,
            cols,
            panel_width_px,
            panel_height_px,
            padding_px,
            rects,
        }
    }

    /// Number of panel rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of panel columns.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Width of a single panel in pixels.
    #[must_use]
    pub const fn panel_width_px(&self) -> f64 {
        self.panel_width_px
    }

    /// Height of a single panel in pixels.
    #[must_use]
    pub const fn panel_height_px(&self) -> f64 {
        self.panel_height_px
    }

    /// Gap between neighbouring panels in pixels.
    #[must_use]
    pub const fn padding_px(&self) -> f64 {
        self.padding_px
    }

    /// Panel rectangles in row-major order, row 0 at the top.
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Reports whether the grid holds no panels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Bounding box of the panel block; waypoints are expressed relative to its corner.
    ///
    /// Returns `None` for an empty grid.
    #[must_use]
    pub fn surface(&self) -> Option<Rect> {
        let first = self.rects.first()?;
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.right();
        let mut max_y = first.bottom();
        for rect in &self.rects[1..] {
            min_x = min_x.min(rect.x);
            min_y = min_y.min(rect.y);
            max_x = max_x.max(rect.right());
            max_y = max_y.max(rect.bottom());
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Result of fitting a roof and its panel grid into a drawing area.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Pixels per millimetre applied uniformly to both axes.
    pub scale_factor: f64,
    /// Roof outline in pixels.
    pub roof_rect: Rect,
    /// Panels placed on the roof.
    pub panel_grid: PanelGrid,
}

/// Ordered waypoint sequence for one cleaning run.
#[derive(Clone, Debug, PartialEq)]
pub struct CoveragePath {
    kind: PathKind,
    waypoints: Vec<Point>,
}

impl CoveragePath {
    /// Creates a coverage path from its strategy and waypoints.
    #[must_use]
    pub fn new(kind: PathKind, waypoints: Vec<Point>) -> Self {
        Self { kind, waypoints }
    }

    /// Strategy that produced the waypoints.
    #[must_use]
    pub const fn kind(&self) -> PathKind {
        self.kind
    }

    /// Waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Sum of the straight legs between consecutive waypoints.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|leg| leg[0].distance(leg[1]))
            .sum()
    }
}

/// Robot centre and heading sampled from the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RobotPose {
    /// Centre of the robot on the animation surface.
    pub position: Point,
    /// Heading in degrees; 0 faces +y (towards the bottom edge) and 90 faces +x.
    pub heading_deg: f64,
}

impl RobotPose {
    /// Creates a new pose.
    #[must_use]
    pub const fn new(position: Point, heading_deg: f64) -> Self {
        Self {
            position,
            heading_deg,
        }
    }
}

/// Phases of the motion state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionPhase {
    /// Robot is placed but no run has started.
    Idle,
    /// Robot is travelling towards the current waypoint.
    Traveling,
    /// Robot is rotating in place before the next leg.
    Turning,
    /// Run ended, either because the path was exhausted or it was stopped.
    Finished,
}

/// Identifier of a single simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(u32);

impl RunId {
    /// Creates a new run identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Why a run finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionReason {
    /// Every waypoint was reached.
    PathExhausted,
    /// The run was cancelled explicitly.
    Stopped,
}

/// Reasons a start request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum StartError {
    /// Robot speed must be positive and finite.
    #[error("robot speed must be positive")]
    InvalidSpeed,
    /// Scale factor must be positive and finite.
    #[error("scale factor must be positive")]
    InvalidScale,
    /// Speed multiplier must be positive and finite.
    #[error("speed multiplier must be positive")]
    InvalidMultiplier,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places the robot on the surface and defines its home pose.
    PlaceRobot {
        /// Robot centre used as the home position; the home heading is always 0.
        home: Point,
    },
    /// Sets the static parameters used by the speed and turning models.
    Configure {
        /// Width of a single panel in pixels.
        panel_width_px: f64,
        /// Inclination of the panels in degrees.
        panel_inclination_deg: f64,
    },
    /// Installs a new coverage path, replacing the previous one wholesale.
    SetCoveragePath {
        /// Path the robot should follow from its first waypoint.
        path: CoveragePath,
    },
    /// Starts a fresh run, retiring any run in progress.
    Start {
        /// Nominal robot speed in millimetres per second.
        speed_mm_per_sec: f64,
        /// Pixels per millimetre of the current layout.
        scale_factor: f64,
        /// Playback acceleration applied to speed and reported duration.
        speed_multiplier: f64,
    },
    /// Advances the simulation by the provided time slice.
    Tick {
        /// Time elapsed since the previous tick.
        dt: Duration,
    },
    /// Ends the current run immediately and returns the robot home.
    Stop,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the robot was placed at its home pose.
    RobotPlaced {
        /// Home pose adopted by the robot.
        home: RobotPose,
    },
    /// Confirms that a coverage path was installed.
    CoveragePathInstalled {
        /// Strategy of the installed path.
        kind: PathKind,
        /// Number of waypoints in the installed path.
        waypoints: usize,
    },
    /// Announces that a new run began.
    RunStarted {
        /// Identifier of the run.
        run: RunId,
        /// Effective linear speed in pixels per second.
        speed_px_per_sec: f64,
    },
    /// Reports that a start request was rejected without mutating state.
    StartRejected {
        /// Specific reason the start failed.
        reason: StartError,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Pose sampled once per tick while a run is active.
    PoseSampled {
        /// Pose at the end of the tick.
        pose: RobotPose,
    },
    /// Confirms that the robot snapped onto a waypoint.
    WaypointReached {
        /// Index of the waypoint within the installed path.
        index: usize,
        /// Position of the waypoint.
        position: Point,
    },
    /// Announces an in-place turn.
    TurnStarted {
        /// Heading when the turn began.
        from_deg: f64,
        /// Heading the turn ends at.
        to_deg: f64,
        /// Time the turn takes.
        duration: Duration,
    },
    /// Confirms that an in-place turn ended.
    TurnCompleted {
        /// Heading committed at the end of the turn.
        heading_deg: f64,
    },
    /// Announces the end of a run; emitted at most once per run.
    RunCompleted {
        /// Identifier of the finished run.
        run: RunId,
        /// Simulated time the run took.
        elapsed: Duration,
        /// Elapsed time scaled by the speed multiplier.
        reported: Duration,
        /// Why the run ended.
        reason: CompletionReason,
    },
}

/// Validated user inputs describing one simulated cleaning run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunParameters {
    /// Roof width in metres.
    pub roof_width_m: f64,
    /// Roof length in metres.
    pub roof_length_m: f64,
    /// Panel width in millimetres.
    pub panel_width_mm: f64,
    /// Panel length in millimetres.
    pub panel_length_mm: f64,
    /// Panel inclination in degrees.
    #[serde(default)]
    pub panel_inclination_deg: f64,
    /// Nominal robot speed in millimetres per second.
    pub robot_speed_mm_per_sec: f64,
    /// Playback acceleration.
    #[serde(default = "RunParameters::default_speed_multiplier")]
    pub speed_multiplier: f64,
    /// Coverage strategy.
    #[serde(default = "RunParameters::default_path_kind")]
    pub path_kind: PathKind,
    /// Gap between panels in millimetres.
    #[serde(default = "RunParameters::default_panel_padding_mm")]
    pub panel_padding_mm: f64,
}

impl RunParameters {
    /// Default playback acceleration.
    pub const DEFAULT_SPEED_MULTIPLIER: f64 = 1.0;
    /// Default gap between panels in millimetres.
    pub const DEFAULT_PANEL_PADDING_MM: f64 = 2.0;

    fn default_speed_multiplier() -> f64 {
        Self::DEFAULT_SPEED_MULTIPLIER
    }

    fn default_path_kind() -> PathKind {
        PathKind::ZigZag
    }

    fn default_panel_padding_mm() -> f64 {
        Self::DEFAULT_PANEL_PADDING_MM
    }

    /// Checks every field, reporting the first one out of range.
    pub fn validate(&self) -> Result<(), InputError> {
        positive("roof width", self.roof_width_m)?;
        positive("roof length", self.roof_length_m)?;
        positive("panel width", self.panel_width_mm)?;
        positive("panel length", self.panel_length_mm)?;
        if !self.panel_inclination_deg.is_finite() {
            return Err(InputError::NotFinite {
                field: "panel inclination",
            });
        }
        positive("robot speed", self.robot_speed_mm_per_sec)?;
        positive("speed multiplier", self.speed_multiplier)?;
        if !self.panel_padding_mm.is_finite() || self.panel_padding_mm < 0.0 {
            return Err(InputError::Negative {
                field: "panel padding",
                value: self.panel_padding_mm,
            });
        }
        Ok(())
    }
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            roof_width_m: 20.0,
            roof_length_m: 8.0,
            panel_width_mm: 1100.0,
            panel_length_mm: 2000.0,
            panel_inclination_deg: 0.0,
            robot_speed_mm_per_sec: 10_000.0,
            speed_multiplier: Self::DEFAULT_SPEED_MULTIPLIER,
            path_kind: PathKind::ZigZag,
            panel_padding_mm: Self::DEFAULT_PANEL_PADDING_MM,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(InputError::NotPositive { field, value });
    }
    Ok(())
}

/// User input rejected before any layout, path or simulation state changes.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InputError {
    /// The field must be strictly positive.
    #[error("{field} must be greater than zero (received {value})")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f64,
    },
    /// The field must not be negative.
    #[error("{field} must not be negative (received {value})")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f64,
    },
    /// The field must be a finite number.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Finished-run record handed to persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// One-based run number within the recorder's history.
    pub run_number: u32,
    /// Reported run duration.
    pub elapsed: Duration,
    /// Roof length in metres.
    pub roof_length_m: f64,
    /// Roof width in metres.
    pub roof_width_m: f64,
    /// Panel width in millimetres.
    pub panel_width_mm: f64,
    /// Panel length in millimetres.
    pub panel_length_mm: f64,
    /// Panel inclination in degrees.
    pub panel_inclination_deg: f64,
    /// Nominal robot speed in millimetres per second.
    pub robot_speed_mm_per_sec: f64,
    /// Playback acceleration.
    pub speed_multiplier: f64,
    /// Coverage strategy.
    pub path_kind: PathKind,
}

impl RunSummary {
    /// Builds a summary from the run's inputs and its reported duration.
    #[must_use]
    pub fn from_parameters(run_number: u32, elapsed: Duration, parameters: &RunParameters) -> Self {
        Self {
            run_number,
            elapsed,
            roof_length_m: parameters.roof_length_m,
            roof_width_m: parameters.roof_width_m,
            panel_width_mm: parameters.panel_width_mm,
            panel_length_mm: parameters.panel_length_mm,
            panel_inclination_deg: parameters.panel_inclination_deg,
            robot_speed_mm_per_sec: parameters.robot_speed_mm_per_sec,
            speed_multiplier: parameters.speed_multiplier,
            path_kind: parameters.path_kind,
        }
    }
}
