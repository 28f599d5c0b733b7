#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure layout system that fits a roof and its panel grid into a drawing area.
//!
//! Roof dimensions arrive in metres and panel dimensions in millimetres. Both
//! are converted to millimetres, a single scale factor maps millimetres to
//! pixels, and the panel block is centred on the roof.

use solar_sweep_core::{Layout, PanelGrid, Rect, MILLIMETRES_PER_METRE};
use thiserror::Error;

/// Largest panel grid a layout may hold.
///
/// Larger grids are rejected instead of allocated.
pub const MAX_PANELS: usize = 1_000_000;

/// Physical and drawing-area inputs for a layout computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRequest {
    /// Roof width in metres.
    pub roof_width_m: f64,
    /// Roof length in metres.
    pub roof_length_m: f64,
    /// Width of the drawing area in pixels.
    pub canvas_width_px: f64,
    /// Height of the drawing area in pixels.
    pub canvas_height_px: f64,
    /// Margin kept free on every side of the drawing area, in pixels.
    pub canvas_padding_px: f64,
    /// Panel width in millimetres.
    pub panel_width_mm: f64,
    /// Panel length in millimetres.
    pub panel_length_mm: f64,
    /// Gap between neighbouring panels in millimetres.
    pub panel_padding_mm: f64,
}

/// Errors raised when the inputs cannot produce a layout.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// The roof, canvas or panel pitch leaves nothing to lay out.
    #[error("invalid layout: {reason}")]
    InvalidLayout {
        /// Human readable description of the failed check.
        reason: &'static str,
    },
}

/// Computes the scale factor, roof rectangle and panel grid for a request.
pub fn calculate_layout(request: &LayoutRequest) -> Result<Layout, LayoutError> {
    let roof_width_mm = request.roof_width_m * MILLIMETRES_PER_METRE;
    let roof_length_mm = request.roof_length_m * MILLIMETRES_PER_METRE;
    if !(roof_width_mm > 0.0 && roof_length_mm > 0.0)
        || !roof_width_mm.is_finite()
        || !roof_length_mm.is_finite()
    {
        return Err(LayoutError::InvalidLayout {
            reason: "roof dimensions must be positive",
        });
    }

    let available_width = request.canvas_width_px - 2.0 * request.canvas_padding_px;
    let available_height = request.canvas_height_px - 2.0 * request.canvas_padding_px;
    if !(available_width > 0.0 && available_height > 0.0) {
        return Err(LayoutError::InvalidLayout {
            reason: "canvas leaves no drawable area after padding",
        });
    }

    let pitch_x = request.panel_width_mm + request.panel_padding_mm;
    let pitch_y = request.panel_length_mm + request.panel_padding_mm;
    if !(pitch_x > 0.0 && pitch_y > 0.0) {
        return Err(LayoutError::InvalidLayout {
            reason: "panel size plus padding must be positive",
        });
    }

    let scale = (available_width / roof_width_mm).min(available_height / roof_length_mm);
    let roof_rect = Rect::new(
        request.canvas_padding_px,
        request.canvas_padding_px,
        roof_width_mm * scale,
        roof_length_mm * scale,
    );

    let cols = columns_for(roof_width_mm, request.panel_width_mm, request.panel_padding_mm);
    let rows = rows_for(
        roof_length_mm,
        request.panel_length_mm,
        request.panel_padding_mm,
    );

    let panel_width_px = request.panel_width_mm * scale;
    let panel_height_px = request.panel_length_mm * scale;
    let padding_px = request.panel_padding_mm * scale;

    let panel_count = (cols as usize)
        .checked_mul(rows as usize)
        .filter(|count| *count <= MAX_PANELS)
        .ok_or(LayoutError::InvalidLayout {
            reason: "too many panels",
        })?;

    let rects = if panel_count == 0 {
        Vec::new()
    } else {
        let grid_width_mm = block_extent(cols, request.panel_width_mm, request.panel_padding_mm);
        let grid_height_mm =
            block_extent(rows, request.panel_length_mm, request.panel_padding_mm);
        let offset_x_mm = (roof_width_mm - grid_width_mm) / 2.0;
        let offset_y_mm = (roof_length_mm - grid_height_mm) / 2.0;

        let mut rects = Vec::with_capacity(panel_count);
        for row in 0..rows {
            for col in 0..cols {
                let x_mm = offset_x_mm + f64::from(col) * pitch_x;
                let y_mm = offset_y_mm + f64::from(row) * pitch_y;
                rects.push(Rect::new(
                    roof_rect.x + x_mm * scale,
                    roof_rect.y + y_mm * scale,
                    panel_width_px,
                    panel_height_px,
                ));
            }
        }
        rects
    };

    tracing::debug!(
        scale,
        cols,
        rows,
        panel_width_px,
        panel_height_px,
        "computed panel layout"
    );

    Ok(Layout {
        scale_factor: scale,
        roof_rect,
        panel_grid: PanelGrid::new(
            rows,
            cols,
            panel_width_px,
            panel_height_px,
            padding_px,
            rects,
        ),
    })
}

/// Number of panel columns that fit across the roof width.
///
/// Non-positive or non-finite results collapse to zero.
#[must_use]
pub fn columns_for(roof_width_mm: f64, panel_width_mm: f64, panel_padding_mm: f64) -> u32 {
    fit_count(roof_width_mm, panel_width_mm, panel_padding_mm)
}

/// Number of panel rows that fit along the roof length.
///
/// Non-positive or non-finite results collapse to zero.
#[must_use]
pub fn rows_for(roof_length_mm: f64, panel_length_mm: f64, panel_padding_mm: f64) -> u32 {
    fit_count(roof_length_mm, panel_length_mm, panel_padding_mm)
}

fn fit_count(span_mm: f64, panel_mm: f64, padding_mm: f64) -> u32 {
    let count = ((span_mm + padding_mm) / (panel_mm + padding_mm)).floor();
    if count.is_finite() && count > 0.0 {
        count.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

fn block_extent(count: u32, panel_mm: f64, padding_mm: f64) -> f64 {
    f64::from(count) * panel_mm + f64::from(count.saturating_sub(1)) * padding_mm
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn request() -> LayoutRequest {
        LayoutRequest {
            roof_width_m: 10.0,
            roof_length_m: 5.0,
            canvas_width_px: 1020.0,
            canvas_height_px: 520.0,
            canvas_padding_px: 10.0,
            panel_width_mm: 1000.0,
            panel_length_mm: 2000.0,
            panel_padding_mm: 0.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn scale_fits_the_tighter_axis() {
        let layout = calculate_layout(&LayoutRequest {
            canvas_width_px: 1220.0,
            ..request()
        })
        .expect("valid layout");

        // width allows 0.12 px/mm, height only 0.1
        assert_close(layout.scale_factor, 0.1);
        assert_eq!(layout.roof_rect.x, 10.0);
        assert_close(layout.roof_rect.width, 1000.0);
        assert_close(layout.roof_rect.height, 500.0);
    }

    #[test]
    fn panels_are_row_major_and_centred() {
        let layout = calculate_layout(&request()).expect("valid layout");
        let grid = &layout.panel_grid;

        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.rects().len(), 20);

        let first = grid.rects()[0];
        assert_close(first.x, 10.0);
        // 500 mm of slack above the block at 0.1 px/mm
        assert_close(first.y, 60.0);
        assert_close(first.width, 100.0);
        assert_close(first.height, 200.0);

        let second_row = grid.rects()[10];
        assert_close(second_row.x, 10.0);
        assert_close(second_row.y, 260.0);

        let last = grid.rects()[19];
        assert_close(last.right(), 1010.0);
        assert_close(last.bottom(), 460.0);
    }

    #[test]
    fn padding_reduces_column_count_and_centres_block() {
        let layout = calculate_layout(&LayoutRequest {
            panel_padding_mm: 2.0,
            ..request()
        })
        .expect("valid layout");
        let grid = &layout.panel_grid;

        assert_eq!(grid.cols(), 9);
        assert_close(grid.padding_px(), 0.2);
        // block spans 9016 mm, leaving 492 mm on each side
        assert_close(grid.rects()[0].x, 10.0 + 49.2);
        let surface = grid.surface().expect("non-empty grid");
        assert_close(surface.width, 901.6);
    }

    #[test]
    fn panels_never_overlap() {
        let layout = calculate_layout(&LayoutRequest {
            panel_padding_mm: 2.0,
            ..request()
        })
        .expect("valid layout");
        let rects = layout.panel_grid.rects();
        for (index, rect) in rects.iter().enumerate() {
            for other in &rects[index + 1..] {
                assert!(!rect.overlaps(other), "{rect:?} overlaps {other:?}");
            }
        }
    }

    #[test]
    fn oversized_panels_yield_empty_grid() {
        let layout = calculate_layout(&LayoutRequest {
            panel_width_mm: 20_000.0,
            ..request()
        })
        .expect("degenerate grid is not an error");

        assert_eq!(layout.panel_grid.cols(), 0);
        assert!(layout.panel_grid.is_empty());
    }

    #[test]
    fn non_positive_roof_is_rejected() {
        let result = calculate_layout(&LayoutRequest {
            roof_length_m: 0.0,
            ..request()
        });
        assert!(matches!(result, Err(LayoutError::InvalidLayout { .. })));
    }

    #[test]
    fn padding_consuming_canvas_is_rejected() {
        let result = calculate_layout(&LayoutRequest {
            canvas_padding_px: 260.0,
            ..request()
        });
        assert!(matches!(result, Err(LayoutError::InvalidLayout { .. })));
    }

    #[test]
    fn grid_beyond_panel_limit_is_rejected() {
        let result = calculate_layout(&LayoutRequest {
            roof_width_m: 1e12,
            roof_length_m: 1e12,
            panel_width_mm: 1.0,
            panel_length_mm: 1.0,
            ..request()
        });
        assert_eq!(
            result,
            Err(LayoutError::InvalidLayout {
                reason: "too many panels",
            })
        );
    }

    #[test]
    fn fit_counts_round_down() {
        assert_eq!(columns_for(20_000.0, 1100.0, 2.0), 18);
        assert_eq!(rows_for(8000.0, 2000.0, 2.0), 3);
        assert_eq!(rows_for(8000.0, 2000.0, 0.0), 4);
        assert_eq!(columns_for(500.0, 1100.0, 2.0), 0);
    }
}
