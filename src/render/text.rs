//! Character-grid rasterizer for terminal hosts
//!
//! Each cell covers `cell_size` surface units. A disk is drawn as the ring of
//! cells whose centers lie within half a cell of the circle, with the label
//! written across the row holding the disk's center.

use glam::Vec2;

use super::RenderSurface;
use crate::sim::{Rgb, Viewport};

/// Character used for disk outlines
pub const OUTLINE_CHAR: char = 'o';

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    /// `None` for the terminal's default color
    pub fg: Option<Rgb>,
}

impl Cell {
    pub const BLANK: Cell = Cell { ch: ' ', fg: None };
}

/// A `cols x rows` grid of colored characters
#[derive(Debug, Clone)]
pub struct TextSurface {
    cols: usize,
    rows: usize,
    cell_size: Vec2,
    cells: Vec<Cell>,
}

impl TextSurface {
    pub fn new(cols: usize, rows: usize, cell_size: Vec2) -> Self {
        Self {
            cols,
            rows,
            cell_size,
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    /// Surface extents in simulation units
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.cols as f32 * self.cell_size.x,
            self.rows as f32 * self.cell_size.y,
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Map a terminal cell to the surface point at its center
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.cell_size.x,
            (row as f32 + 0.5) * self.cell_size.y,
        )
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    /// One row of cells
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Plain text, one string per row, colors dropped
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.rows)
            .map(|r| self.row(r).iter().map(|c| c.ch).collect())
            .collect()
    }

    fn put(&mut self, col: i64, row: i64, cell: Cell) {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return;
        }
        self.cells[row as usize * self.cols + col as usize] = cell;
    }

    fn cell_index(&self, p: Vec2) -> (i64, i64) {
        (
            (p.x / self.cell_size.x).floor() as i64,
            (p.y / self.cell_size.y).floor() as i64,
        )
    }
}

impl RenderSurface for TextSurface {
    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn draw_disk(&mut self, center: Vec2, radius: f32, color: Rgb, label: &str) {
        let band = self.cell_size.max_element() * 0.5;
        let (c0, r0) = self.cell_index(center - Vec2::splat(radius + band));
        let (c1, r1) = self.cell_index(center + Vec2::splat(radius + band));
        let outline = Cell {
            ch: OUTLINE_CHAR,
            fg: Some(color),
        };

        for row in r0.max(0)..=r1.min(self.rows as i64 - 1) {
            for col in c0.max(0)..=c1.min(self.cols as i64 - 1) {
                let p = self.cell_center(col as usize, row as usize);
                if (p.distance(center) - radius).abs() <= band {
                    self.put(col, row, outline);
                }
            }
        }

        // Labels keep the terminal's default color
        let (col, row) = self.cell_index(center);
        let len = label.chars().count() as i64;
        for (i, ch) in label.chars().enumerate() {
            self.put(col - len / 2 + i as i64, row, Cell { ch, fg: None });
        }
    }
}
