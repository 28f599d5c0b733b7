#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for solar sweep adapters.
//!
//! Panel rectangles are expressed in canvas pixels. Robot and path
//! coordinates live in surface pixels, whose origin is the top-left corner of
//! the panel block; [`Scene::to_canvas`] maps between the two.

use anyhow::{bail, Result as AnyResult};
use glam::Vec2;
use solar_sweep_core::{CoveragePath, Layout, Point, Rect, RobotPose};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

fn to_vec2(point: Point) -> Vec2 {
    Vec2::new(point.x as f32, point.y as f32)
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectPresentation {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl RectPresentation {
    /// Converts a layout rectangle into its drawable form.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            origin: Vec2::new(rect.x as f32, rect.y as f32),
            size: Vec2::new(rect.width as f32, rect.height as f32),
        }
    }
}

/// Roof outline and the panels laid out on it.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelGridPresentation {
    /// Roof outline.
    pub roof: RectPresentation,
    /// Fill color of the roof.
    pub roof_color: Color,
    /// Panels in row-major order.
    pub panels: Vec<RectPresentation>,
    /// Fill color of every panel.
    pub panel_color: Color,
}

impl PanelGridPresentation {
    /// Builds the drawable grid from a computed layout.
    #[must_use]
    pub fn from_layout(layout: &Layout, roof_color: Color, panel_color: Color) -> Self {
        Self {
            roof: RectPresentation::from_rect(layout.roof_rect),
            roof_color,
            panels: layout
                .panel_grid
                .rects()
                .iter()
                .copied()
                .map(RectPresentation::from_rect)
                .collect(),
            panel_color,
        }
    }
}

/// Robot footprint drawn at its current pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotPresentation {
    /// Robot centre in surface pixels.
    pub center: Vec2,
    /// Heading in degrees; 0 faces +y and 90 faces +x.
    pub heading_deg: f32,
    /// Width across the direction of travel and length along it, in pixels.
    pub footprint: Vec2,
    /// Fill color of the robot body.
    pub color: Color,
}

impl RobotPresentation {
    /// Creates a robot descriptor.
    ///
    /// Returns an error when either footprint dimension is not positive.
    pub fn new(
        pose: RobotPose,
        footprint: Vec2,
        color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !(footprint.x > 0.0 && footprint.y > 0.0) {
            return Err(RenderingError::InvalidFootprint {
                width: footprint.x,
                length: footprint.y,
            });
        }

        Ok(Self {
            center: to_vec2(pose.position),
            heading_deg: pose.heading_deg as f32,
            footprint,
            color,
        })
    }

    /// Moves the robot to a freshly sampled pose.
    pub fn set_pose(&mut self, pose: RobotPose) {
        self.center = to_vec2(pose.position);
        self.heading_deg = pose.heading_deg as f32;
    }

    /// Corners of the rotated footprint in surface pixels.
    ///
    /// Ordered rear-left, rear-right, front-right, front-left.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.footprint / 2.0;
        let rotation = Vec2::from_angle(-self.heading_deg.to_radians());
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|corner| self.center + rotation.rotate(corner))
    }
}

/// Coverage path drawn as a polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Waypoints in surface pixels.
    pub points: Vec<Vec2>,
    /// Line color.
    pub color: Color,
}

impl PathPresentation {
    /// Builds the polyline for a planned path.
    #[must_use]
    pub fn from_path(path: &CoveragePath, color: Color) -> Self {
        Self {
            points: path.waypoints().iter().copied().map(to_vec2).collect(),
            color,
        }
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Scene description combining the panel grid, the planned path and the robot.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Roof and panels.
    pub panel_grid: PanelGridPresentation,
    /// Canvas position of the surface origin.
    pub surface_origin: Vec2,
    /// Planned coverage path.
    pub path: PathPresentation,
    /// Robot at its latest sampled pose.
    pub robot: RobotPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        panel_grid: PanelGridPresentation,
        surface_origin: Vec2,
        path: PathPresentation,
        robot: RobotPresentation,
    ) -> Self {
        Self {
            panel_grid,
            surface_origin,
            path,
            robot,
        }
    }

    /// Maps a surface coordinate onto the canvas.
    #[must_use]
    pub fn to_canvas(&self, surface: Vec2) -> Vec2 {
        self.surface_origin + surface
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Decision returned by the scene update after each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep producing frames.
    Continue,
    /// Stop the backend and return control to the caller.
    Exit,
}

/// Rendering backend capable of presenting solar sweep scenes.
///
/// The backend is the tick source of a run: every frame it hands the elapsed
/// frame delta to `update_scene`.
pub trait RenderingBackend {
    /// Runs the rendering backend until `update_scene` requests an exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and may mutate the scene before it is rendered, allowing adapters to
    /// animate world snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl;
}

/// Backend without a window that produces frames at a fixed step.
///
/// Without a frame budget the backend keeps producing frames until the
/// update closure asks it to exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadlessBackend {
    frame_dt: Duration,
    max_frames: Option<u64>,
}

impl HeadlessBackend {
    /// Creates a backend that advances by `frame_dt`, optionally for at most
    /// `max_frames` frames.
    pub fn new(
        frame_dt: Duration,
        max_frames: Option<u64>,
    ) -> std::result::Result<Self, RenderingError> {
        if frame_dt.is_zero() {
            return Err(RenderingError::ZeroFrameDelta);
        }

        Ok(Self {
            frame_dt,
            max_frames,
        })
    }

    /// Creates a backend ticking `hz` times per simulated second.
    pub fn with_tick_rate(
        hz: u32,
        max_frames: Option<u64>,
    ) -> std::result::Result<Self, RenderingError> {
        if hz == 0 {
            return Err(RenderingError::InvalidTickRate { hz });
        }
        Self::new(Duration::from_secs(1) / hz, max_frames)
    }

    /// Delta handed to every frame.
    #[must_use]
    pub const fn frame_dt(&self) -> Duration {
        self.frame_dt
    }

    /// Upper bound on the number of frames a single `run` produces, if any.
    #[must_use]
    pub const fn max_frames(&self) -> Option<u64> {
        self.max_frames
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl,
    {
        let mut scene = presentation.scene;
        let mut frames: u64 = 0;
        loop {
            if let Some(max_frames) = self.max_frames {
                if frames >= max_frames {
                    bail!(
                        "'{}' did not finish within {} frames",
                        presentation.window_title,
                        max_frames
                    );
                }
            }
            if update_scene(self.frame_dt, &mut scene) == FrameControl::Exit {
                return Ok(());
            }
            frames = frames.saturating_add(1);
        }
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Robot footprints must have positive width and length.
    InvalidFootprint {
        /// Provided width in pixels.
        width: f32,
        /// Provided length in pixels.
        length: f32,
    },
    /// Frames must advance time.
    ZeroFrameDelta,
    /// Tick rates must be positive.
    InvalidTickRate {
        /// Provided tick rate.
        hz: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFootprint { width, length } => {
                write!(
                    f,
                    "robot footprint must be positive (received {width} x {length})"
                )
            }
            Self::ZeroFrameDelta => f.write_str("frame delta must be greater than zero"),
            Self::InvalidTickRate { hz } => {
                write!(f, "tick rate must be positive (received {hz})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_sweep_core::{PanelGrid, PathKind};

    fn robot(heading_deg: f64) -> RobotPresentation {
        RobotPresentation::new(
            RobotPose::new(Point::new(10.0, 20.0), heading_deg),
            Vec2::new(4.0, 6.0),
            Color::from_rgb_u8(200, 40, 40),
        )
        .expect("positive footprint")
    }

    fn scene() -> Scene {
        let layout = Layout {
            scale_factor: 0.1,
            roof_rect: Rect::new(20.0, 20.0, 200.0, 100.0),
            panel_grid: PanelGrid::new(
                1,
                2,
                50.0,
                80.0,
                1.0,
                vec![
                    Rect::new(60.0, 30.0, 50.0, 80.0),
                    Rect::new(111.0, 30.0, 50.0, 80.0),
                ],
            ),
        };
        Scene::new(
            PanelGridPresentation::from_layout(
                &layout,
                Color::from_rgb_u8(120, 120, 120),
                Color::from_rgb_u8(20, 40, 120),
            ),
            Vec2::new(60.0, 30.0),
            PathPresentation {
                points: Vec::new(),
                color: Color::from_rgb_u8(230, 180, 30),
            },
            robot(0.0),
        )
    }

    #[test]
    fn robot_rejects_degenerate_footprint() {
        let error = RobotPresentation::new(
            RobotPose::default(),
            Vec2::new(0.0, 5.0),
            Color::from_rgb_u8(0, 0, 0),
        )
        .expect_err("zero width must be rejected");

        assert_eq!(
            error,
            RenderingError::InvalidFootprint {
                width: 0.0,
                length: 5.0
            }
        );
    }

    #[test]
    fn corners_follow_heading() {
        let facing_down = robot(0.0).corners();
        assert_eq!(facing_down[0], Vec2::new(8.0, 17.0));
        assert_eq!(facing_down[2], Vec2::new(12.0, 23.0));

        let facing_right = robot(90.0).corners();
        let front_right = facing_right[2];
        assert!((front_right.x - 13.0).abs() < 1e-4, "{front_right:?}");
        assert!((front_right.y - 18.0).abs() < 1e-4, "{front_right:?}");
    }

    #[test]
    fn set_pose_moves_robot() {
        let mut robot = robot(0.0);
        robot.set_pose(RobotPose::new(Point::new(3.0, 4.0), 45.0));

        assert_eq!(robot.center, Vec2::new(3.0, 4.0));
        assert_eq!(robot.heading_deg, 45.0);
    }

    #[test]
    fn path_segments_pair_neighbours() {
        let path = CoveragePath::new(
            PathKind::RowWise,
            vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 0.0),
                Point::new(5.0, 5.0),
            ],
        );
        let presentation = PathPresentation::from_path(&path, Color::from_rgb_u8(0, 200, 0));

        let segments: Vec<_> = presentation.segments().collect();
        assert_eq!(
            segments,
            vec![
                (Vec2::ZERO, Vec2::new(5.0, 0.0)),
                (Vec2::new(5.0, 0.0), Vec2::new(5.0, 5.0)),
            ]
        );
    }

    #[test]
    fn panel_grid_mirrors_layout() {
        let scene = scene();

        assert_eq!(scene.panel_grid.panels.len(), 2);
        assert_eq!(scene.panel_grid.roof.size, Vec2::new(200.0, 100.0));
        assert_eq!(scene.to_canvas(Vec2::new(1.0, 2.0)), Vec2::new(61.0, 32.0));
    }

    #[test]
    fn headless_backend_rejects_zero_delta() {
        assert_eq!(
            HeadlessBackend::new(Duration::ZERO, Some(10)),
            Err(RenderingError::ZeroFrameDelta)
        );
        assert_eq!(
            HeadlessBackend::with_tick_rate(0, None),
            Err(RenderingError::InvalidTickRate { hz: 0 })
        );
    }

    #[test]
    fn headless_backend_stops_on_exit() {
        let backend = HeadlessBackend::with_tick_rate(60, Some(100)).expect("valid backend");
        let presentation = Presentation::new("test", Color::new(0.0, 0.0, 0.0, 1.0), scene());
        let mut frames = 0;
        let mut total = Duration::ZERO;

        backend
            .run(presentation, |dt, scene| {
                frames += 1;
                total += dt;
                scene.robot.set_pose(RobotPose::new(Point::new(1.0, 1.0), 0.0));
                if frames == 5 {
                    FrameControl::Exit
                } else {
                    FrameControl::Continue
                }
            })
            .expect("backend exits cleanly");

        assert_eq!(frames, 5);
        assert_eq!(total, (Duration::from_secs(1) / 60) * 5);
    }

    #[test]
    fn headless_backend_reports_exhausted_frame_budget() {
        let backend =
            HeadlessBackend::new(Duration::from_millis(10), Some(3)).expect("valid backend");
        let presentation = Presentation::new(
            "budget",
            Color::from_rgb_u8(0, 0, 0).with_alpha(0.5),
            scene(),
        );
        let mut frames = 0;

        let error = backend
            .run(presentation, |_, _| {
                frames += 1;
                FrameControl::Continue
            })
            .expect_err("frame budget exhausted");

        assert_eq!(frames, 3);
        assert!(error.to_string().contains("3 frames"));
    }

    #[test]
    fn unbounded_backend_runs_until_exit() {
        let backend = HeadlessBackend::with_tick_rate(1000, None).expect("valid backend");
        assert_eq!(backend.frame_dt(), Duration::from_millis(1));
        assert_eq!(backend.max_frames(), None);

        let presentation = Presentation::new("long", Color::new(0.0, 0.0, 0.0, 1.0), scene());
        let mut frames: u64 = 0;

        backend
            .run(presentation, |_, _| {
                frames += 1;
                if frames == 2_000_000 {
                    FrameControl::Exit
                } else {
                    FrameControl::Continue
                }
            })
            .expect("no frame budget to exhaust");

        assert_eq!(frames, 2_000_000);
    }

    #[test]
    fn frame_budget_is_reported() {
        let backend =
            HeadlessBackend::new(Duration::from_millis(20), Some(7)).expect("valid backend");
        assert_eq!(backend.frame_dt(), Duration::from_millis(20));
        assert_eq!(backend.max_frames(), Some(7));
    }
}
