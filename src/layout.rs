//! Screen layout for the shrinking grid
//!
//! Pure geometry shared with the renderer: where each cell sits, which cell a
//! pointer lands on, and the band a laser warning covers. Positions are cell
//! centres in viewport pixels (y down).

use glam::Vec2;

use crate::settings::LayoutMetrics;
use crate::sim::{Cell, GridDimensions};

/// Axis-aligned rectangle given by centre and full size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.size.x / 2.0 && d.y <= self.size.y / 2.0
    }
}

/// Grid layout for a given viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    metrics: LayoutMetrics,
}

impl GridLayout {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Centre of cell (0, 0) for a grid of the given size
    pub fn origin(&self, grid: &GridDimensions) -> Vec2 {
        let m = &self.metrics;
        let extent = Vec2::new(grid.cols as f32, grid.rows as f32) * m.cell_size;
        let viewport = Vec2::new(m.viewport_width, m.viewport_height);
        (viewport - extent) / 2.0 + Vec2::new(m.offset_x, 0.0)
    }

    pub fn cell_center(&self, grid: &GridDimensions, row: u32, col: u32) -> Vec2 {
        self.origin(grid) + Vec2::new(col as f32, row as f32) * self.metrics.cell_size
    }

    /// Drawn rectangle of a cell (pitch minus inset)
    pub fn cell_rect(&self, grid: &GridDimensions, row: u32, col: u32) -> Rect {
        let side = self.drawn_side();
        Rect {
            center: self.cell_center(grid, row, col),
            size: Vec2::splat(side),
        }
    }

    /// Cell under a pointer, `None` outside the grid or in the gutter between cells
    pub fn cell_at(&self, grid: &GridDimensions, point: Vec2) -> Option<Cell> {
        let local = (point - self.origin(grid)) / self.metrics.cell_size + Vec2::splat(0.5);
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let col = local.x.floor() as u32;
        let row = local.y.floor() as u32;
        if !grid.contains(row, col) {
            return None;
        }
        self.cell_rect(grid, row, col)
            .contains(point)
            .then_some(Cell { row, col })
    }

    /// Band covered by a laser sweeping row or column `index`
    pub fn laser_rect(&self, grid: &GridDimensions, is_row: bool, index: u32) -> Rect {
        let cs = self.metrics.cell_size;
        let origin = self.origin(grid);
        let width = grid.cols as f32 * cs;
        let height = grid.rows as f32 * cs;
        let side = self.drawn_side();

        if is_row {
            Rect {
                center: Vec2::new(origin.x + width / 2.0 - cs / 2.0, origin.y + index as f32 * cs),
                size: Vec2::new(width, side),
            }
        } else {
            Rect {
                center: Vec2::new(origin.x + index as f32 * cs, origin.y + height / 2.0 - cs / 2.0),
                size: Vec2::new(side, height),
            }
        }
    }

    fn drawn_side(&self) -> f32 {
        (self.metrics.cell_size - self.metrics.cell_inset).max(0.0)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(LayoutMetrics::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_centres_grid() {
        let layout = GridLayout::default();
        let grid = GridDimensions::new(8);
        // (800 - 480) / 2 + 25, (1080 - 480) / 2
        assert_eq!(layout.origin(&grid), Vec2::new(185.0, 300.0));
    }

    #[test]
    fn test_cell_center_steps_by_pitch() {
        let layout = GridLayout::default();
        let grid = GridDimensions::new(3);
        let a = layout.cell_center(&grid, 0, 0);
        let b = layout.cell_center(&grid, 1, 2);
        assert_eq!(b - a, Vec2::new(120.0, 60.0));
    }

    #[test]
    fn test_cell_at_round_trips_centres() {
        let layout = GridLayout::default();
        let mut grid = GridDimensions::new(4);
        grid.remove_column();
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let p = layout.cell_center(&grid, row, col);
                assert_eq!(layout.cell_at(&grid, p), Some(Cell { row, col }));
            }
        }
    }

    #[test]
    fn test_cell_at_outside_and_gutter() {
        let layout = GridLayout::default();
        let grid = GridDimensions::new(3);
        assert_eq!(layout.cell_at(&grid, Vec2::ZERO), None);
        assert_eq!(layout.cell_at(&grid, Vec2::new(799.0, 1079.0)), None);

        // Just inside the 2px gutter between (0,0) and (0,1)
        let edge = layout.cell_center(&grid, 0, 0) + Vec2::new(29.0, 0.0);
        assert_eq!(layout.cell_at(&grid, edge), None);
    }

    #[test]
    fn test_laser_rect_row_spans_width() {
        let layout = GridLayout::default();
        let grid = GridDimensions::new(3);
        let rect = layout.laser_rect(&grid, true, 1);
        assert_eq!(rect.size, Vec2::new(180.0, 56.0));
        for col in 0..3 {
            assert!(rect.contains(layout.cell_center(&grid, 1, col)));
            assert!(!rect.contains(layout.cell_center(&grid, 0, col)));
        }
    }

    #[test]
    fn test_laser_rect_column_spans_height() {
        let layout = GridLayout::default();
        let grid = GridDimensions::new(3);
        let rect = layout.laser_rect(&grid, false, 2);
        assert_eq!(rect.size, Vec2::new(56.0, 180.0));
        for row in 0..3 {
            assert!(rect.contains(layout.cell_center(&grid, row, 2)));
            assert!(!rect.contains(layout.cell_center(&grid, row, 1)));
        }
    }
}
