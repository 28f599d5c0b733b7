use solar_sweep_system_layout::{calculate_layout, LayoutError, LayoutRequest, MAX_PANELS};

fn request(roof_width_m: f64, roof_length_m: f64) -> LayoutRequest {
    LayoutRequest {
        roof_width_m,
        roof_length_m,
        canvas_width_px: 1200.0,
        canvas_height_px: 600.0,
        canvas_padding_px: 20.0,
        panel_width_mm: 1100.0,
        panel_length_mm: 2000.0,
        panel_padding_mm: 2.0,
    }
}

#[test]
fn panels_stay_on_roof_without_overlapping() {
    for (width, length) in [(20.0, 8.0), (7.5, 12.0), (3.3, 2.1), (50.0, 50.0)] {
        let layout = calculate_layout(&request(width, length)).expect("valid layout");
        let roof = layout.roof_rect;
        let rects = layout.panel_grid.rects();

        for (index, rect) in rects.iter().enumerate() {
            assert!(rect.x >= roof.x - 1e-9 && rect.right() <= roof.right() + 1e-9);
            assert!(rect.y >= roof.y - 1e-9 && rect.bottom() <= roof.bottom() + 1e-9);
            for other in &rects[index + 1..] {
                assert!(!rect.overlaps(other), "{rect:?} overlaps {other:?}");
            }
        }
    }
}

#[test]
fn roof_fits_inside_padded_canvas() {
    let layout = calculate_layout(&request(20.0, 8.0)).expect("valid layout");
    let roof = layout.roof_rect;

    assert_eq!((roof.x, roof.y), (20.0, 20.0));
    assert!(roof.right() <= 1180.0 + 1e-9);
    assert!(roof.bottom() <= 580.0 + 1e-9);
}

#[test]
fn grid_counts_match_rect_count() {
    let layout = calculate_layout(&request(20.0, 8.0)).expect("valid layout");
    let grid = &layout.panel_grid;

    assert_eq!(
        grid.rects().len(),
        grid.rows() as usize * grid.cols() as usize
    );
}

#[test]
fn roof_too_small_for_a_panel_yields_empty_grid() {
    let layout = calculate_layout(&request(1.0, 8.0)).expect("valid layout");

    assert_eq!(layout.panel_grid.cols(), 0);
    assert!(layout.panel_grid.is_empty());
    assert!(layout.panel_grid.surface().is_none());
}

#[test]
fn canvas_without_drawable_area_is_rejected() {
    let error = calculate_layout(&LayoutRequest {
        canvas_padding_px: 600.0,
        ..request(20.0, 8.0)
    })
    .expect_err("padding consumes the canvas");

    assert!(matches!(error, LayoutError::InvalidLayout { .. }));
}

#[test]
fn grid_at_panel_limit_is_accepted_and_larger_grids_are_not() {
    // 1 mm panels: 1000 columns across a 1 m roof
    let square = |roof_length_m: f64| LayoutRequest {
        roof_width_m: 1.0,
        roof_length_m,
        panel_width_mm: 1.0,
        panel_length_mm: 1.0,
        panel_padding_mm: 0.0,
        ..request(1.0, 1.0)
    };

    let layout = calculate_layout(&square(1.0)).expect("grid at the limit");
    assert_eq!(layout.panel_grid.rects().len(), MAX_PANELS);

    let error = calculate_layout(&square(1.5)).expect_err("grid over the limit");
    assert_eq!(
        error,
        LayoutError::InvalidLayout {
            reason: "too many panels"
        }
    );
}

#[test]
fn huge_roof_with_tiny_panels_is_rejected_without_allocating() {
    let error = calculate_layout(&LayoutRequest {
        panel_width_mm: 1.0,
        panel_length_mm: 1.0,
        ..request(1e12, 1e12)
    })
    .expect_err("grid far beyond the limit");

    assert!(matches!(error, LayoutError::InvalidLayout { .. }));
}
