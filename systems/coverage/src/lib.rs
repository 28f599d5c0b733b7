#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic coverage planner that turns a panel grid into waypoints.
//!
//! Waypoints live in the pixel space of the animation surface, whose origin is
//! the top-left corner of the panel block. Every sweep is inset by half the
//! brush width so the robot's footprint reaches the outer panel edges.

use solar_sweep_core::{CoveragePath, PanelGrid, PathKind, Point};

/// Grid geometry consumed by the planner, all lengths in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathGeometry {
    /// Gap between neighbouring panels.
    pub padding_px: f64,
    /// Effective cleaning width of the robot.
    pub brush_width_px: f64,
    /// Number of panel columns.
    pub cols: u32,
    /// Number of panel rows.
    pub rows: u32,
    /// Width of a single panel.
    pub panel_width_px: f64,
    /// Height of a single panel.
    pub panel_height_px: f64,
}

impl PathGeometry {
    /// Extracts the planner inputs from a computed panel grid.
    #[must_use]
    pub fn from_grid(grid: &PanelGrid, brush_width_px: f64) -> Self {
        Self {
            padding_px: grid.padding_px(),
            brush_width_px,
            cols: grid.cols(),
            rows: grid.rows(),
            panel_width_px: grid.panel_width_px(),
            panel_height_px: grid.panel_height_px(),
        }
    }

    fn x_step(&self) -> f64 {
        self.panel_width_px + self.padding_px
    }

    fn y_step(&self) -> f64 {
        self.panel_height_px + self.padding_px
    }

    fn half_brush(&self) -> f64 {
        self.brush_width_px / 2.0
    }

    fn total_width(&self) -> f64 {
        extent(self.cols, self.panel_width_px, self.padding_px)
    }

    fn total_height(&self) -> f64 {
        extent(self.rows, self.panel_height_px, self.padding_px)
    }

    /// Centre line of the rightmost column.
    fn right_column_x(&self) -> f64 {
        f64::from(self.cols - 1) * self.x_step() + self.panel_width_px / 2.0
    }

    fn is_degenerate(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

fn extent(count: u32, panel: f64, padding: f64) -> f64 {
    f64::from(count) * panel + f64::from(count.saturating_sub(1)) * padding
}

/// Produces the waypoint sequence for the requested sweep strategy.
///
/// A grid without rows or columns yields an empty path for every strategy.
#[must_use]
pub fn generate_coverage_path(kind: PathKind, geometry: &PathGeometry) -> CoveragePath {
    let waypoints = if geometry.is_degenerate() {
        Vec::new()
    } else {
        match kind {
            PathKind::ZigZag => zig_zag(geometry),
            PathKind::RowWise => row_wise(geometry),
            PathKind::Loop => perimeter_loop(geometry),
        }
    };

    tracing::debug!(%kind, waypoints = waypoints.len(), "generated coverage path");
    CoveragePath::new(kind, waypoints)
}

fn zig_zag(geometry: &PathGeometry) -> Vec<Point> {
    let y_top = geometry.half_brush();
    let y_bottom = geometry.total_height() - geometry.half_brush();
    let mut x = geometry.right_column_x();

    let mut waypoints = Vec::new();
    waypoints.push(Point::new(x, y_bottom));

    let mut going_up = true;
    for _ in 1..geometry.cols {
        let y = if going_up { y_top } else { y_bottom };
        waypoints.push(Point::new(x, y));
        x -= geometry.x_step();
        waypoints.push(Point::new(x, y));
        going_up = !going_up;
    }

    waypoints
}

fn row_wise(geometry: &PathGeometry) -> Vec<Point> {
    let x_left = geometry.half_brush();
    let x_right = geometry.total_width() - geometry.half_brush();
    let mut y = geometry.half_brush();

    let mut waypoints = Vec::new();
    waypoints.push(Point::new(x_left, y));

    let mut going_right = true;
    for _ in 1..geometry.rows {
        let x = if going_right { x_right } else { x_left };
        waypoints.push(Point::new(x, y));
        y += geometry.y_step();
        waypoints.push(Point::new(x, y));
        going_right = !going_right;
    }

    waypoints
}

fn perimeter_loop(geometry: &PathGeometry) -> Vec<Point> {
    let x_right = geometry.right_column_x();
    let x_left = geometry.panel_width_px / 2.0;
    let y_top = geometry.half_brush();
    let y_second = y_top + geometry.brush_width_px;
    let y_bottom = geometry.total_height() - geometry.half_brush();

    let start = Point::new(x_right, y_bottom);
    vec![
        start,
        Point::new(x_right, y_top),
        Point::new(x_left, y_top),
        Point::new(x_left, y_second),
        Point::new(x_right, y_second),
        start,
        Point::new(x_left, y_bottom),
        start,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(cols: u32, rows: u32) -> PathGeometry {
        PathGeometry {
            padding_px: 5.0,
            brush_width_px: 20.0,
            cols,
            rows,
            panel_width_px: 100.0,
            panel_height_px: 50.0,
        }
    }

    #[test]
    fn extents_include_inner_padding_only() {
        let geometry = geometry(3, 2);
        assert_eq!(geometry.total_width(), 310.0);
        assert_eq!(geometry.total_height(), 105.0);
        assert_eq!(geometry.right_column_x(), 260.0);
    }

    #[test]
    fn zig_zag_golden_waypoints() {
        let path = generate_coverage_path(PathKind::ZigZag, &geometry(3, 2));
        assert_eq!(
            path.waypoints(),
            &[
                Point::new(260.0, 95.0),
                Point::new(260.0, 10.0),
                Point::new(155.0, 10.0),
                Point::new(155.0, 95.0),
                Point::new(50.0, 95.0),
            ]
        );
    }

    #[test]
    fn row_wise_golden_waypoints() {
        let path = generate_coverage_path(PathKind::RowWise, &geometry(3, 3));
        assert_eq!(
            path.waypoints(),
            &[
                Point::new(10.0, 10.0),
                Point::new(300.0, 10.0),
                Point::new(300.0, 65.0),
                Point::new(10.0, 65.0),
                Point::new(10.0, 120.0),
            ]
        );
    }

    #[test]
    fn loop_golden_waypoints() {
        let path = generate_coverage_path(PathKind::Loop, &geometry(3, 2));
        let start = Point::new(260.0, 95.0);
        assert_eq!(
            path.waypoints(),
            &[
                start,
                Point::new(260.0, 10.0),
                Point::new(50.0, 10.0),
                Point::new(50.0, 30.0),
                Point::new(260.0, 30.0),
                start,
                Point::new(50.0, 95.0),
                start,
            ]
        );
    }

    #[test]
    fn single_column_zig_zag_is_just_the_start() {
        let path = generate_coverage_path(PathKind::ZigZag, &geometry(1, 4));
        assert_eq!(path.len(), 1);
        assert_eq!(path.waypoints()[0].x, 50.0);
    }

    #[test]
    fn degenerate_grid_yields_empty_paths() {
        for kind in PathKind::ALL {
            assert!(generate_coverage_path(kind, &geometry(0, 3)).is_empty());
            assert!(generate_coverage_path(kind, &geometry(4, 0)).is_empty());
        }
    }
}
