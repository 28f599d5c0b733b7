#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative robot motion state for the solar sweep simulator.
//!
//! The world owns the single robot state of a run. It is mutated only through
//! [`apply`], which executes one [`Command`] and appends the resulting
//! [`Event`] values, and it is read through the [`query`] module. Calls are
//! sequential; a run advances only when the caller feeds it
//! [`Command::Tick`] slices from its tick source.

pub mod kinematics;

use std::time::Duration;

use solar_sweep_core::{
    Command, CompletionReason, CoveragePath, Event, MotionPhase, PathKind, Point, RobotPose,
    RunId, StartError,
};

use crate::kinematics::{bearing_deg, grade_factor, shortest_delta_deg, turn_duration_secs};

/// Static parameters used by the speed and turning models.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct MotionSettings {
    panel_width_px: f64,
    panel_inclination_deg: f64,
}

/// In-place rotation between two headings.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Turn {
    elapsed: Duration,
    duration_secs: f64,
    initial_deg: f64,
    target_deg: f64,
}

impl Turn {
    fn progress(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.elapsed.as_secs_f64() / self.duration_secs).min(1.0)
        } else {
            1.0
        }
    }

    fn heading_at(&self, t: f64) -> f64 {
        self.initial_deg + (self.target_deg - self.initial_deg) * t
    }
}

/// Clock and speed of the most recent run.
#[derive(Clone, Copy, Debug, PartialEq)]
struct RunClock {
    id: RunId,
    speed_px_per_sec: f64,
    speed_multiplier: f64,
    elapsed: Duration,
}

impl RunClock {
    fn reported(&self) -> Duration {
        reported_duration(self.elapsed, self.speed_multiplier)
    }
}

/// Scales a simulated duration by the playback multiplier.
///
/// Saturates at [`Duration::MAX`] when the product does not fit.
#[must_use]
pub fn reported_duration(elapsed: Duration, speed_multiplier: f64) -> Duration {
    Duration::try_from_secs_f64(speed_multiplier * elapsed.as_secs_f64()).unwrap_or(Duration::MAX)
}

/// Represents the authoritative robot world.
#[derive(Debug)]
pub struct World {
    home: RobotPose,
    pose: RobotPose,
    path: CoveragePath,
    waypoint_index: usize,
    turn: Option<Turn>,
    phase: MotionPhase,
    settings: MotionSettings,
    run: Option<RunClock>,
    last_run_id: RunId,
}

impl World {
    /// Creates an idle world with the robot at the surface origin and no path.
    #[must_use]
    pub fn new() -> Self {
        let home = RobotPose::new(Point::ORIGIN, 0.0);
        Self {
            home,
            pose: home,
            path: CoveragePath::new(PathKind::ZigZag, Vec::new()),
            waypoint_index: 0,
            turn: None,
            phase: MotionPhase::Idle,
            settings: MotionSettings::default(),
            run: None,
            last_run_id: RunId::new(0),
        }
    }

    fn is_running(&self) -> bool {
        matches!(self.phase, MotionPhase::Traveling | MotionPhase::Turning)
    }

    fn return_home(&mut self) {
        self.pose = self.home;
        self.waypoint_index = 0;
        self.turn = None;
    }

    fn start(
        &mut self,
        speed_mm_per_sec: f64,
        scale_factor: f64,
        speed_multiplier: f64,
        out_events: &mut Vec<Event>,
    ) {
        if let Err(reason) = validate_start(speed_mm_per_sec, scale_factor, speed_multiplier) {
            tracing::warn!(%reason, "start rejected");
            out_events.push(Event::StartRejected { reason });
            return;
        }

        if let Some(previous) = self.run.filter(|_| self.is_running()) {
            tracing::debug!(run = previous.id.get(), "retiring run in progress");
        }

        let id = self.last_run_id.next();
        self.last_run_id = id;
        let speed_px_per_sec = speed_mm_per_sec * scale_factor * speed_multiplier;
        self.run = Some(RunClock {
            id,
            speed_px_per_sec,
            speed_multiplier,
            elapsed: Duration::ZERO,
        });
        self.return_home();
        self.phase = MotionPhase::Traveling;

        tracing::info!(
            run = id.get(),
            speed_px_per_sec,
            waypoints = self.path.len(),
            kind = %self.path.kind(),
            "run started"
        );
        out_events.push(Event::RunStarted {
            run: id,
            speed_px_per_sec,
        });

        if self.path.is_empty() {
            self.finish(CompletionReason::PathExhausted, out_events);
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.elapsed = run.elapsed.saturating_add(dt);
        let speed_px_per_sec = run.speed_px_per_sec;
        out_events.push(Event::TimeAdvanced { dt });

        match self.phase {
            MotionPhase::Turning => self.advance_turn(dt, out_events),
            MotionPhase::Traveling => self.advance_travel(dt, speed_px_per_sec, out_events),
            MotionPhase::Idle | MotionPhase::Finished => {}
        }

        tracing::trace!(
            x = self.pose.position.x,
            y = self.pose.position.y,
            heading = self.pose.heading_deg,
            "pose sampled"
        );
        out_events.push(Event::PoseSampled { pose: self.pose });

        if self.turn.is_none() && self.waypoint_index >= self.path.len() {
            self.finish(CompletionReason::PathExhausted, out_events);
        }
    }

    fn advance_turn(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(turn) = self.turn.as_mut() else {
            self.phase = MotionPhase::Traveling;
            return;
        };
        turn.elapsed = turn.elapsed.saturating_add(dt);
        let t = turn.progress();
        self.pose.heading_deg = turn.heading_at(t);

        if t >= 1.0 {
            self.pose.heading_deg = turn.target_deg;
            self.turn = None;
            self.phase = MotionPhase::Traveling;
            out_events.push(Event::TurnCompleted {
                heading_deg: self.pose.heading_deg,
            });
        }
    }

    fn advance_travel(&mut self, dt: Duration, speed_px_per_sec: f64, out_events: &mut Vec<Event>) {
        let Some(target) = self.path.waypoints().get(self.waypoint_index).copied() else {
            return;
        };

        let position = self.pose.position;
        let dx = target.x - position.x;
        let dy = target.y - position.y;
        let distance = dx.hypot(dy);
        let reach = speed_px_per_sec * dt.as_secs_f64();

        if distance < reach || distance <= f64::EPSILON {
            self.arrive(target, speed_px_per_sec, out_events);
            return;
        }

        let step = reach * grade_factor(dx, dy, self.settings.panel_inclination_deg);
        self.pose.position = Point::new(
            position.x + dx / distance * step,
            position.y + dy / distance * step,
        );
    }

    fn arrive(&mut self, target: Point, speed_px_per_sec: f64, out_events: &mut Vec<Event>) {
        self.pose.position = target;
        let index = self.waypoint_index;
        tracing::debug!(index, x = target.x, y = target.y, "waypoint reached");
        out_events.push(Event::WaypointReached {
            index,
            position: target,
        });

        let initial_deg = self.pose.heading_deg;
        let target_deg = match self.path.waypoints().get(index + 1) {
            Some(next) => {
                initial_deg + shortest_delta_deg(initial_deg, bearing_deg(target, *next))
            }
            None => initial_deg,
        };
        let turn = Turn {
            elapsed: Duration::ZERO,
            duration_secs: turn_duration_secs(self.settings.panel_width_px, speed_px_per_sec),
            initial_deg,
            target_deg,
        };
        out_events.push(Event::TurnStarted {
            from_deg: initial_deg,
            to_deg: target_deg,
            duration: Duration::try_from_secs_f64(turn.duration_secs).unwrap_or(Duration::MAX),
        });

        self.turn = Some(turn);
        self.phase = MotionPhase::Turning;
        self.waypoint_index += 1;
    }

    fn finish(&mut self, reason: CompletionReason, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }
        self.phase = MotionPhase::Finished;
        self.turn = None;

        let Some(run) = self.run else {
            return;
        };
        let reported = run.reported();
        tracing::info!(
            run = run.id.get(),
            elapsed_secs = run.elapsed.as_secs_f64(),
            reported_secs = reported.as_secs_f64(),
            ?reason,
            "run completed"
        );
        out_events.push(Event::RunCompleted {
            run: run.id,
            elapsed: run.elapsed,
            reported,
            reason,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_start(
    speed_mm_per_sec: f64,
    scale_factor: f64,
    speed_multiplier: f64,
) -> Result<(), StartError> {
    let positive = |value: f64| value.is_finite() && value > 0.0;
    if !positive(speed_mm_per_sec) {
        return Err(StartError::InvalidSpeed);
    }
    if !positive(scale_factor) {
        return Err(StartError::InvalidScale);
    }
    if !positive(speed_multiplier) {
        return Err(StartError::InvalidMultiplier);
    }
    if !positive(speed_mm_per_sec * scale_factor * speed_multiplier) {
        return Err(StartError::InvalidSpeed);
    }
    Ok(())
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceRobot { home } => {
            world.home = RobotPose::new(home, 0.0);
            world.return_home();
            world.phase = MotionPhase::Idle;
            world.run = None;
            out_events.push(Event::RobotPlaced { home: world.home });
        }
        Command::Configure {
            panel_width_px,
            panel_inclination_deg,
        } => {
            world.settings = MotionSettings {
                panel_width_px,
                panel_inclination_deg,
            };
        }
        Command::SetCoveragePath { path } => {
            let kind = path.kind();
            let waypoints = path.len();
            world.path = path;
            world.waypoint_index = 0;
            world.turn = None;
            if world.phase == MotionPhase::Turning {
                world.phase = MotionPhase::Traveling;
            }
            out_events.push(Event::CoveragePathInstalled { kind, waypoints });
        }
        Command::Start {
            speed_mm_per_sec,
            scale_factor,
            speed_multiplier,
        } => world.start(speed_mm_per_sec, scale_factor, speed_multiplier, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::Stop => {
            world.finish(CompletionReason::Stopped, out_events);
            world.return_home();
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use solar_sweep_core::{CoveragePath, MotionPhase, RobotPose, RunId};

    use super::World;

    /// Current robot centre and heading.
    #[must_use]
    pub fn pose(world: &World) -> RobotPose {
        world.pose
    }

    /// Pose the robot returns to on stop and on every start.
    #[must_use]
    pub fn home(world: &World) -> RobotPose {
        world.home
    }

    /// Current phase of the motion state machine.
    #[must_use]
    pub fn phase(world: &World) -> MotionPhase {
        world.phase
    }

    /// Reports whether a run is consuming ticks.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.is_running()
    }

    /// Coverage path currently installed.
    #[must_use]
    pub fn coverage_path(world: &World) -> &CoveragePath {
        &world.path
    }

    /// Index of the waypoint the robot is heading for.
    #[must_use]
    pub fn waypoint_index(world: &World) -> usize {
        world.waypoint_index
    }

    /// Identifier of the most recent run, if one was started since placement.
    #[must_use]
    pub fn current_run(world: &World) -> Option<RunId> {
        world.run.map(|run| run.id)
    }

    /// Simulated time accumulated by the most recent run.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.run.map_or(Duration::ZERO, |run| run.elapsed)
    }

    /// Elapsed time of the most recent run scaled by its speed multiplier.
    #[must_use]
    pub fn reported_elapsed(world: &World) -> Duration {
        world.run.map_or(Duration::ZERO, |run| run.reported())
    }

    /// Captures the complete robot state for comparisons and diagnostics.
    #[must_use]
    pub fn robot_snapshot(world: &World) -> RobotSnapshot {
        let turn = world.turn;
        RobotSnapshot {
            pose: world.pose,
            waypoint_index: world.waypoint_index,
            phase: world.phase,
            turning: turn.is_some(),
            turn_elapsed: turn.map_or(Duration::ZERO, |turn| turn.elapsed),
            turn_duration_secs: turn.map_or(0.0, |turn| turn.duration_secs),
            initial_heading_deg: turn.map_or(world.pose.heading_deg, |turn| turn.initial_deg),
            target_heading_deg: turn.map_or(world.pose.heading_deg, |turn| turn.target_deg),
            running: world.is_running(),
            elapsed: elapsed(world),
        }
    }

    /// Immutable representation of the robot state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct RobotSnapshot {
        /// Robot centre and heading.
        pub pose: RobotPose,
        /// Index of the waypoint being approached.
        pub waypoint_index: usize,
        /// Phase of the state machine.
        pub phase: MotionPhase,
        /// Indicates whether an in-place turn is in progress.
        pub turning: bool,
        /// Time spent in the current turn.
        pub turn_elapsed: Duration,
        /// Total length of the current turn in seconds.
        pub turn_duration_secs: f64,
        /// Heading at the start of the current turn.
        pub initial_heading_deg: f64,
        /// Heading at the end of the current turn.
        pub target_heading_deg: f64,
        /// Indicates whether the run consumes ticks.
        pub running: bool,
        /// Simulated time accumulated by the run.
        pub elapsed: Duration,
    }
}
