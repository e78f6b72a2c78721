use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{Action, Direction, GameConfig, GameEngine, GameState, RunStatus, StepResult};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::{RunSummary, SessionStats, format_clock};
use crate::render::{Frame, FrameState, RenderPipeline, Renderer, ThemeKind, Viewport};

/// Turns rendered frames into simulation steps: one step every
/// `frames_per_step` frames, so a frame advances the board zero or one times
#[derive(Debug, Clone)]
pub struct TickPacer {
    frames_per_step: u32,
    frames_since_step: u32,
}

impl TickPacer {
    pub fn new(frames_per_step: u32) -> Self {
        Self {
            frames_per_step: frames_per_step.max(1),
            frames_since_step: 0,
        }
    }

    /// Count one frame; true if the simulation should step on it
    pub fn on_frame(&mut self) -> bool {
        self.frames_since_step += 1;
        if self.frames_since_step >= self.frames_per_step {
            self.frames_since_step = 0;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.frames_since_step = 0;
    }
}

/// Interactive play in the terminal
pub struct HumanMode {
    config: GameConfig,
    engine: GameEngine,
    state: GameState,
    pipeline: RenderPipeline,
    renderer: Renderer,
    input_handler: InputHandler,
    stats: SessionStats,
    pacer: TickPacer,
    theme: ThemeKind,
    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let engine = GameEngine::new(config.clone());
        let pipeline = RenderPipeline::new(Viewport::from_config(&config));
        Self::with_parts(config, engine, pipeline)
    }

    /// Reproducible food placement and noise
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let engine = GameEngine::with_seed(config.clone(), seed);
        let pipeline = RenderPipeline::with_seed(Viewport::from_config(&config), seed);
        Self::with_parts(config, engine, pipeline)
    }

    fn with_parts(config: GameConfig, mut engine: GameEngine, pipeline: RenderPipeline) -> Self {
        let state = engine.reset();
        let pacer = TickPacer::new(config.frames_per_step());

        Self {
            config,
            engine,
            state,
            pipeline,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            stats: SessionStats::new(),
            pacer,
            theme: ThemeKind::for_score(0),
            should_quit: false,
            pending_direction: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            width = self.config.grid_width,
            height = self.config.grid_height,
            tick_ms = self.config.tick_ms,
            fps = self.config.fps,
            "starting session"
        );

        // Restore the terminal even if the loop failed
        let result = self.run_game_loop(&mut terminal).await;
        self.cleanup_terminal(&mut terminal)?;

        info!(
            runs = self.stats.runs_played(),
            best_score = self.stats.best_score(),
            wall_deaths = self.stats.wall_deaths(),
            self_collisions = self.stats.self_collisions(),
            boards_cleared = self.stats.boards_cleared(),
            theme_changes = self.stats.theme_changes(),
            "session ended"
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(self.config.frame_interval());
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                _ = frame_timer.tick() => {
                    let image = self.advance_frame();
                    let renderer = &mut self.renderer;
                    terminal.draw(|frame| {
                        renderer.render(frame, &image);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::GameAction(Action::Move(dir)) => {
                self.pending_direction = Some(dir);
            }
            KeyAction::GameAction(Action::Continue) | KeyAction::None => {}
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
        }
    }

    /// One tick of the loop: maybe step the board, then composite a frame
    fn advance_frame(&mut self) -> Frame {
        if self.pacer.on_frame() && self.state.is_running() {
            self.update_game();
        }

        let theme = ThemeKind::for_score(self.state.score);
        if theme != self.theme {
            info!(score = self.state.score, theme = theme.name(), "theme changed");
            self.theme = theme;
            self.stats.on_theme_change();
        }

        self.pipeline
            .render(&FrameState::from(&self.state), theme.theme())
    }

    fn update_game(&mut self) {
        let action = Action::from(self.pending_direction.take());

        match self.engine.step(&mut self.state, action) {
            StepResult::Moved => {}
            StepResult::Grew => {
                debug!(score = self.state.score, "snake grew");
            }
            StepResult::GameOver(_) | StepResult::Cleared => {
                if let Some(summary) = self.stats.finish_run(&self.state) {
                    log_run_end(&summary);
                }
            }
        }
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.pipeline.reset();
        self.stats.start_run();
        self.pacer.reset();
        self.pending_direction = None;
        info!("new run");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn log_run_end(summary: &RunSummary) {
    let time = format_clock(summary.duration);
    match summary.ending {
        RunStatus::Over(collision) => info!(
            score = summary.score,
            ?collision,
            length = summary.length,
            steps = summary.steps,
            theme = summary.theme.name(),
            %time,
            new_best = summary.new_best,
            "game over"
        ),
        RunStatus::Cleared => info!(
            score = summary.score,
            steps = summary.steps,
            %time,
            new_best = summary.new_best,
            "board cleared"
        ),
        RunStatus::Running => {}
    }
}
