use solar_sweep_core::{PathKind, Point};
use solar_sweep_system_coverage::{generate_coverage_path, PathGeometry};
use solar_sweep_system_layout::{calculate_layout, LayoutRequest};

fn geometry(cols: u32, rows: u32) -> PathGeometry {
    PathGeometry {
        padding_px: 0.116,
        brush_width_px: 69.6,
        cols,
        rows,
        panel_width_px: 63.8,
        panel_height_px: 116.0,
    }
}

fn distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut seen: Vec<f64> = Vec::new();
    for value in values {
        if !seen.iter().any(|existing| *existing == value) {
            seen.push(value);
        }
    }
    seen
}

#[test]
fn zig_zag_has_two_waypoints_per_column_minus_one() {
    for cols in 1..=20 {
        for rows in 1..=4 {
            let path = generate_coverage_path(PathKind::ZigZag, &geometry(cols, rows));
            assert_eq!(
                path.len(),
                2 * cols as usize - 1,
                "cols={cols} rows={rows}"
            );
        }
    }
}

#[test]
fn row_wise_has_two_waypoints_per_row_minus_one() {
    for rows in 1..=20 {
        for cols in 1..=4 {
            let path = generate_coverage_path(PathKind::RowWise, &geometry(cols, rows));
            assert_eq!(
                path.len(),
                2 * rows as usize - 1,
                "cols={cols} rows={rows}"
            );
        }
    }
}

#[test]
fn loop_always_has_eight_waypoints() {
    for cols in 1..=12 {
        for rows in 1..=12 {
            let path = generate_coverage_path(PathKind::Loop, &geometry(cols, rows));
            assert_eq!(path.len(), 8, "cols={cols} rows={rows}");
            assert_eq!(path.waypoints()[0], path.waypoints()[7]);
        }
    }
}

#[test]
fn zig_zag_only_visits_top_and_bottom_insets() {
    let path = generate_coverage_path(PathKind::ZigZag, &geometry(9, 3));
    let ys = distinct(path.waypoints().iter().map(|point| point.y));
    assert_eq!(ys.len(), 2, "unexpected y values {ys:?}");
    assert!(ys.iter().any(|y| (*y - 34.8).abs() < 1e-9));
}

#[test]
fn row_wise_only_visits_left_and_right_insets() {
    let path = generate_coverage_path(PathKind::RowWise, &geometry(4, 7));
    let xs = distinct(path.waypoints().iter().map(|point| point.x));
    assert_eq!(xs.len(), 2, "unexpected x values {xs:?}");
}

#[test]
fn consecutive_legs_are_axis_aligned() {
    for kind in [PathKind::ZigZag, PathKind::RowWise] {
        let path = generate_coverage_path(kind, &geometry(6, 5));
        for leg in path.waypoints().windows(2) {
            let (from, to): (Point, Point) = (leg[0], leg[1]);
            assert!(
                from.x == to.x || from.y == to.y,
                "{kind} leg {from:?} -> {to:?} is diagonal"
            );
        }
    }
}

#[test]
fn planning_is_deterministic() {
    for kind in PathKind::ALL {
        let first = generate_coverage_path(kind, &geometry(7, 3));
        let second = generate_coverage_path(kind, &geometry(7, 3));
        assert_eq!(first, second);
        assert_eq!(first.kind(), kind);
    }
}

#[test]
fn path_from_layout_stays_on_surface() {
    let layout = calculate_layout(&LayoutRequest {
        roof_width_m: 20.0,
        roof_length_m: 8.0,
        canvas_width_px: 1200.0,
        canvas_height_px: 600.0,
        canvas_padding_px: 20.0,
        panel_width_mm: 1100.0,
        panel_length_mm: 2000.0,
        panel_padding_mm: 2.0,
    })
    .expect("valid layout");
    let grid = &layout.panel_grid;
    let surface = grid.surface().expect("panels fit on the roof");
    let brush_width_px = 1200.0 * layout.scale_factor;

    for kind in PathKind::ALL {
        let path = generate_coverage_path(kind, &PathGeometry::from_grid(grid, brush_width_px));
        assert!(!path.is_empty());
        for point in path.waypoints() {
            assert!(point.x >= 0.0 && point.x <= surface.width + 1e-9, "{point:?}");
            assert!(point.y >= 0.0 && point.y <= surface.height + 1e-9, "{point:?}");
        }
    }
}
