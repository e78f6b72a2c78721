use crate::game::{GameConfig, Position, to_coord};

/// Pixel rectangle, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Grow by `by` pixels on every side
    pub fn expanded(&self, by: i32) -> Self {
        Self::new(self.x - by, self.y - by, self.w + 2 * by, self.h + 2 * by)
    }

    /// Pixels on the one-pixel outline of the rectangle
    pub fn outline(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.w - 1, self.y + self.h - 1);
        let horizontal = (x0..=x1).flat_map(move |x| [(x, y0), (x, y1)]);
        let vertical = (y0 + 1..y1).flat_map(move |y| [(x0, y), (x1, y)]);
        horizontal.chain(vertical)
    }
}

/// Maps grid cells onto the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_px: usize,
    pub border_px: usize,
}

impl Viewport {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            cell_px: config.cell_px,
            border_px: config.border_px,
        }
    }

    pub fn frame_width(&self) -> usize {
        self.grid_width * self.cell_px + 2 * self.border_px
    }

    pub fn frame_height(&self) -> usize {
        self.grid_height * self.cell_px + 2 * self.border_px
    }

    /// The area inside the bezel
    pub fn playfield(&self) -> PixelRect {
        PixelRect::new(
            to_coord(self.border_px),
            to_coord(self.border_px),
            to_coord(self.grid_width.saturating_mul(self.cell_px)),
            to_coord(self.grid_height.saturating_mul(self.cell_px)),
        )
    }

    /// Pixel rectangle covered by a grid cell
    pub fn cell_rect(&self, pos: Position) -> PixelRect {
        let size = to_coord(self.cell_px);
        let border = to_coord(self.border_px);
        PixelRect::new(
            border.saturating_add(pos.x.saturating_mul(size)),
            border.saturating_add(pos.y.saturating_mul(size)),
            size,
            size,
        )
    }
}
