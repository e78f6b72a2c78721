use ratatui::{Frame as TermFrame, buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use tracing::warn;

use super::frame::{Frame, Rgb};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: &str = "\u{2580}";

/// Terminal size in cells needed to show a frame without clipping
pub fn required_size(image: &Frame) -> (u16, u16) {
    let cols = image.width().min(u16::MAX as usize) as u16;
    let rows = image.height().div_ceil(2).min(u16::MAX as usize) as u16;
    (cols, rows)
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Widget drawing a framebuffer two pixels per terminal cell, centered in
/// its area and center-cropped if the area is too small
pub struct FrameView<'a> {
    image: &'a Frame,
}

impl<'a> FrameView<'a> {
    pub fn new(image: &'a Frame) -> Self {
        Self { image }
    }
}

impl Widget for FrameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (need_cols, need_rows) = required_size(self.image);
        let cols = need_cols.min(area.width);
        let rows = need_rows.min(area.height);

        let dst_x = area.x + (area.width - cols) / 2;
        let dst_y = area.y + (area.height - rows) / 2;
        let src_col = i32::from((need_cols - cols) / 2);
        let src_row = i32::from((need_rows - rows) / 2);

        for row in 0..rows {
            let py = (src_row + i32::from(row)) * 2;
            for col in 0..cols {
                let px = src_col + i32::from(col);
                let top = self.image.get(px, py).unwrap_or_default();
                let bottom = self.image.get(px, py + 1).unwrap_or_default();

                if let Some(cell) = buf.cell_mut((dst_x + col, dst_y + row)) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(to_color(top))
                        .set_bg(to_color(bottom));
                }
            }
        }
    }
}

/// Presents pipeline output in the terminal
pub struct Renderer {
    warned_small: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            warned_small: false,
        }
    }

    pub fn render(&mut self, frame: &mut TermFrame, image: &Frame) {
        let area = frame.area();
        let (cols, rows) = required_size(image);

        if (area.width < cols || area.height < rows) && !self.warned_small {
            warn!(
                terminal_cols = area.width,
                terminal_rows = area.height,
                cols,
                rows,
                "terminal smaller than frame, output is cropped"
            );
            self.warned_small = true;
        }

        frame.render_widget(FrameView::new(image), area);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
