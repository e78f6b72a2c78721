//! Drawing passes and CRT post-process filters
//!
//! Every pass draws into a [`Frame`] in place. Apart from [`apply_noise`],
//! which samples the supplied RNG, each pass is a pure function of its
//! arguments.

use std::collections::VecDeque;

use rand::Rng;

use super::frame::{Frame, Rgb};
use super::theme::{Effects, Palette};
use super::viewport::{PixelRect, Viewport};
use crate::game::{Direction, Position, to_coord};

/// One pixel line along the top and left edge of every cell
pub fn draw_grid(frame: &mut Frame, viewport: &Viewport, color: Rgb) {
    let field = viewport.playfield();
    let step = to_coord(viewport.cell_px);

    for col in 0..to_coord(viewport.grid_width) {
        frame.fill_rect(field.x + col * step, field.y, 1, field.h, color);
    }
    for row in 0..to_coord(viewport.grid_height) {
        frame.fill_rect(field.x, field.y + row * step, field.w, 1, color);
    }
}

/// Fill a cell-sized square, leaving the corner pixels untouched on
/// cells large enough to look rounded
fn fill_rounded(frame: &mut Frame, rect: PixelRect, color: Rgb) {
    if rect.w < 4 || rect.h < 4 {
        frame.fill_rect(rect.x, rect.y, rect.w, rect.h, color);
        return;
    }

    let (x1, y1) = (rect.x + rect.w - 1, rect.y + rect.h - 1);
    let corners = [(rect.x, rect.y), (x1, rect.y), (rect.x, y1), (x1, y1)];
    let saved = corners.map(|(x, y)| frame.get(x, y));

    frame.fill_rect(rect.x, rect.y, rect.w, rect.h, color);
    for ((x, y), px) in corners.into_iter().zip(saved) {
        if let Some(px) = px {
            frame.set(x, y, px);
        }
    }
}

pub fn draw_food(frame: &mut Frame, viewport: &Viewport, food: Position, palette: &Palette) {
    let rect = viewport.cell_rect(food);
    fill_rounded(frame, rect, palette.food);

    let core = rect.expanded(-1);
    if core.w > 0 && core.h > 0 {
        frame.fill_rect(core.x, core.y, core.w, core.h, palette.food.brighten(50));
    }
}

/// Snake body tail-first so the head lands on top, eyes facing `heading`
pub fn draw_snake(
    frame: &mut Frame,
    viewport: &Viewport,
    body: &[Position],
    heading: Direction,
    palette: &Palette,
) {
    for (i, &segment) in body.iter().enumerate().rev() {
        let rect = viewport.cell_rect(segment);
        if i == 0 {
            fill_rounded(frame, rect, palette.snake_head);
            for (x, y) in eye_pixels(rect, heading) {
                frame.set(x, y, palette.background);
            }
        } else {
            fill_rounded(frame, rect, palette.snake_body);
        }
    }
}

fn eye_pixels(rect: PixelRect, heading: Direction) -> [(i32, i32); 2] {
    let near = 1;
    let far = rect.w - 2;
    let (x, y) = (rect.x, rect.y);
    match heading {
        Direction::Up => [(x + near, y + near), (x + far, y + near)],
        Direction::Down => [(x + near, y + far), (x + far, y + far)],
        Direction::Left => [(x + near, y + near), (x + near, y + far)],
        Direction::Right => [(x + far, y + near), (x + far, y + far)],
    }
}

/// Wash the playfield in the theme's game-over color
pub fn tint_game_over(frame: &mut Frame, viewport: &Viewport, color: Rgb) {
    let field = viewport.playfield();
    frame.blend_rect(field.x, field.y, field.w, field.h, color, 0.3);
}

/// Halo around lit cells, fading with distance from the cell edge
pub fn apply_glow(
    frame: &mut Frame,
    viewport: &Viewport,
    lit: &[(Position, Rgb)],
    effects: &Effects,
) {
    let radius = to_coord(effects.glow_radius);
    if radius == 0 || effects.glow_strength <= 0.0 {
        return;
    }

    for &(cell, color) in lit {
        let rect = viewport.cell_rect(cell);
        for ring in 1..=radius {
            let alpha = effects.glow_strength * (radius + 1 - ring) as f32 / (radius + 1) as f32;
            for (x, y) in rect.expanded(ring).outline() {
                frame.lighten_pixel(x, y, color, alpha);
            }
        }
    }
}

/// Blend previous composites into the frame, newest first in `history`.
///
/// The frame `age` steps back weighs `ghost_alpha * ghost_decay^(age - 1)`.
pub fn apply_ghost_trail(frame: &mut Frame, history: &VecDeque<Frame>, effects: &Effects) {
    if effects.ghost_alpha <= 0.0 {
        return;
    }

    let depth = history.len().min(effects.ghost_frames);
    // Oldest first, so the most recent trail is applied last
    for age in (0..depth).rev() {
        let weight = effects.ghost_alpha * effects.ghost_decay.powi(age as i32);
        frame.lighten_from(&history[age], weight);
    }
}

/// Fixed horizontal bands across the playfield
pub fn apply_banding(frame: &mut Frame, viewport: &Viewport, color: Rgb, effects: &Effects) {
    if effects.banding_period == 0 || effects.banding_thickness == 0 {
        return;
    }

    let field = viewport.playfield();
    for offset in 0..field.h {
        if (offset as usize) % effects.banding_period < effects.banding_thickness {
            frame.blend_rect(field.x, field.y + offset, field.w, 1, color, effects.banding_alpha);
        }
    }
}

/// Random chunky pixels over the playfield, resampled every call
pub fn apply_noise<R: Rng + ?Sized>(
    frame: &mut Frame,
    viewport: &Viewport,
    color: Rgb,
    effects: &Effects,
    rng: &mut R,
) {
    if effects.noise_density <= 0.0 || effects.noise_alpha <= 0.0 {
        return;
    }

    let field = viewport.playfield();
    let chunk = effects.noise_chunk.max(1) as i32;
    let density = effects.noise_density.min(1.0);

    for y in (field.y..field.y + field.h).step_by(chunk as usize) {
        for x in (field.x..field.x + field.w).step_by(chunk as usize) {
            if rng.gen_bool(density) {
                frame.blend_rect(x, y, chunk, chunk, color, effects.noise_alpha);
            }
        }
    }
}

/// Darken every `scanline_spacing`-th row of the whole frame
pub fn apply_scanlines(frame: &mut Frame, color: Rgb, effects: &Effects) {
    if effects.scanline_spacing == 0 {
        return;
    }

    for y in (0..frame.height()).step_by(effects.scanline_spacing) {
        frame.blend_row(y as i32, color, effects.scanline_alpha);
    }
}

/// Monitor casing around the playfield
pub fn draw_bezel(frame: &mut Frame, viewport: &Viewport, palette: &Palette) {
    let border = to_coord(viewport.border_px);
    if border == 0 {
        return;
    }

    let (w, h) = (to_coord(frame.width()), to_coord(frame.height()));
    frame.fill_rect(0, 0, w, border, palette.bezel);
    frame.fill_rect(0, h - border, w, border, palette.bezel);
    frame.fill_rect(0, 0, border, h, palette.bezel);
    frame.fill_rect(w - border, 0, border, h, palette.bezel);

    let field = viewport.playfield();
    for (x, y) in field.expanded(1).outline() {
        frame.set(x, y, palette.border);
    }
    for (x, y) in field.outline() {
        frame.blend_pixel(x, y, palette.inner_glow, 0.25);
    }
}

/// Top row of the beamline for a given frame number
pub fn beam_row(frame_counter: u64, speed: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    ((frame_counter % height as u64) * (speed as u64 % height as u64) % height as u64) as usize
}

/// Sweeping highlight band that wraps at the bottom of the frame
pub fn apply_beamline(frame: &mut Frame, color: Rgb, effects: &Effects, frame_counter: u64) {
    if effects.beam_thickness == 0 || frame.height() == 0 {
        return;
    }

    let height = frame.height();
    let top = beam_row(frame_counter, effects.beam_speed, height);
    for t in 0..effects.beam_thickness.min(height) {
        let y = (top + t) % height;
        frame.blend_row(y as i32, color, effects.beam_alpha);
    }
}
