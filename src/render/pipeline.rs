use std::collections::VecDeque;

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use super::effects;
use super::frame::{Frame, Rgb};
use super::theme::Theme;
use super::viewport::Viewport;
use crate::game::{Direction, GameState, Position};

/// The part of the game the pipeline needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    /// Snake segments, head first
    pub snake: &'a [Position],
    pub heading: Direction,
    pub food: Position,
    /// The run has ended and the board is frozen
    pub ended: bool,
}

impl<'a> From<&'a GameState> for FrameState<'a> {
    fn from(state: &'a GameState) -> Self {
        Self {
            snake: &state.snake.body,
            heading: state.snake.direction,
            food: state.food,
            ended: !state.is_running(),
        }
    }
}

/// Composites game frames with the CRT look of the active theme.
///
/// Owns the only state carried between frames: the ghost-trail history and
/// the frame counter that drives the beamline.
pub struct RenderPipeline {
    viewport: Viewport,
    /// Previous composites, newest first
    history: VecDeque<Frame>,
    frame_counter: u64,
    rng: StdRng,
}

impl RenderPipeline {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_rng(viewport, StdRng::from_entropy())
    }

    /// Pipeline whose noise pattern is reproducible
    pub fn with_seed(viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(viewport: Viewport, rng: StdRng) -> Self {
        Self {
            viewport,
            history: VecDeque::new(),
            frame_counter: 0,
            rng,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Frames rendered so far
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Number of previous frames currently held for the ghost trail
    pub fn ghost_depth(&self) -> usize {
        self.history.len()
    }

    /// Drop the ghost trail, e.g. when a new run starts
    pub fn reset(&mut self) {
        debug!(frames = self.history.len(), "clearing ghost trail");
        self.history.clear();
    }

    /// Draw one frame, back to front
    pub fn render(&mut self, state: &FrameState<'_>, theme: &Theme) -> Frame {
        let vp = self.viewport;
        let palette = &theme.palette;
        let fx = &theme.effects;

        let mut frame = Frame::new(vp.frame_width(), vp.frame_height());
        frame.fill(palette.background);
        effects::draw_grid(&mut frame, &vp, palette.grid);
        effects::draw_food(&mut frame, &vp, state.food, palette);
        effects::draw_snake(&mut frame, &vp, state.snake, state.heading, palette);
        if state.ended {
            effects::tint_game_over(&mut frame, &vp, palette.game_over);
        }

        let composite = frame.clone();

        let lit = lit_cells(state, theme);
        effects::apply_glow(&mut frame, &vp, &lit, fx);
        effects::apply_ghost_trail(&mut frame, &self.history, fx);
        effects::apply_banding(&mut frame, &vp, palette.accent, fx);
        effects::apply_noise(&mut frame, &vp, palette.accent, fx, &mut self.rng);
        effects::apply_scanlines(&mut frame, palette.scanline, fx);
        effects::draw_bezel(&mut frame, &vp, palette);
        effects::apply_beamline(&mut frame, palette.accent, fx, self.frame_counter);

        self.history.push_front(composite);
        self.history.truncate(fx.ghost_frames);
        self.frame_counter += 1;

        frame
    }
}

/// Cells that bloom, with the color they bloom in
fn lit_cells(state: &FrameState<'_>, theme: &Theme) -> Vec<(Position, Rgb)> {
    let palette = &theme.palette;
    let mut lit = Vec::with_capacity(state.snake.len() + 1);
    lit.push((state.food, palette.food_glow));
    for (i, &segment) in state.snake.iter().enumerate() {
        let color = if i == 0 {
            palette.snake_head
        } else {
            palette.snake_body
        };
        lit.push((segment, color));
    }
    lit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use crate::render::theme::{AMBER_MONO, GREEN_PHOSPHOR, ThemeKind};

    fn setup() -> (GameState, RenderPipeline) {
        let config = GameConfig::small();
        let state = GameEngine::with_seed(config.clone(), 5).reset();
        let pipeline = RenderPipeline::with_seed(Viewport::from_config(&config), 5);
        (state, pipeline)
    }

    #[test]
    fn test_frame_matches_viewport() {
        let (state, mut pipeline) = setup();
        let frame = pipeline.render(&FrameState::from(&state), &GREEN_PHOSPHOR);

        assert_eq!(frame.width(), pipeline.viewport().frame_width());
        assert_eq!(frame.height(), pipeline.viewport().frame_height());
        assert_eq!(pipeline.frame_counter(), 1);
    }

    #[test]
    fn test_deterministic_without_noise() {
        let (state, _) = setup();
        let vp = Viewport::from_config(&GameConfig::small());
        let mut a = RenderPipeline::with_seed(vp, 1);
        let mut b = RenderPipeline::with_seed(vp, 2);

        let fa = a.render(&FrameState::from(&state), &AMBER_MONO);
        let fb = b.render(&FrameState::from(&state), &AMBER_MONO);
        assert_eq!(fa, fb);
    }

    #[test]
    fn test_ghost_history_capped_by_theme() {
        let (state, mut pipeline) = setup();
        for _ in 0..10 {
            pipeline.render(&FrameState::from(&state), &GREEN_PHOSPHOR);
        }
        assert_eq!(pipeline.ghost_depth(), GREEN_PHOSPHOR.effects.ghost_frames);

        let blue = ThemeKind::BlueChunky.theme();
        pipeline.render(&FrameState::from(&state), blue);
        assert_eq!(pipeline.ghost_depth(), blue.effects.ghost_frames);

        pipeline.reset();
        assert_eq!(pipeline.ghost_depth(), 0);
    }

    #[test]
    fn test_ghost_trail_leaves_afterglow() {
        let (mut state, mut pipeline) = setup();
        let old_head = state.snake.head();
        pipeline.render(&FrameState::from(&state), &GREEN_PHOSPHOR);

        // Move the snake far away; the old head cell should still glow
        state.snake.body = vec![Position::new(0, 0)];
        let mut fresh = RenderPipeline::with_seed(*pipeline.viewport(), 5);
        let without = fresh.render(&FrameState::from(&state), &GREEN_PHOSPHOR);
        let with = pipeline.render(&FrameState::from(&state), &GREEN_PHOSPHOR);

        let rect = pipeline.viewport().cell_rect(old_head);
        let (x, y) = (rect.x + 1, rect.y + 1);
        assert!(with.get(x, y).unwrap().luma() > without.get(x, y).unwrap().luma());
    }

    #[test]
    fn test_game_over_tints_playfield() {
        let (state, mut pipeline) = setup();
        let running = pipeline.render(&FrameState::from(&state), &GREEN_PHOSPHOR);

        let mut ended = FrameState::from(&state);
        ended.ended = true;
        let mut fresh = RenderPipeline::with_seed(*pipeline.viewport(), 5);
        let over = fresh.render(&ended, &GREEN_PHOSPHOR);

        let field = pipeline.viewport().playfield();
        let red = |frame: &Frame| -> u32 {
            let mut sum = 0;
            for y in field.y..field.y + field.h {
                for x in field.x..field.x + field.w {
                    sum += u32::from(frame.get(x, y).unwrap().r);
                }
            }
            sum
        };
        assert!(red(&over) > red(&running));
    }
}
