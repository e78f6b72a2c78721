use std::time::{Duration, Instant};

use crate::game::{CollisionType, GameState, RunStatus};
use crate::render::ThemeKind;

/// What a finished run looked like, handed back for logging
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub score: u32,
    pub length: usize,
    pub steps: u32,
    pub duration: Duration,
    pub ending: RunStatus,
    /// Theme the run ended under
    pub theme: ThemeKind,
    /// Score beat every earlier run this session
    pub new_best: bool,
}

/// Tallies across all runs since the program started
#[derive(Debug, Clone)]
pub struct SessionStats {
    run_started: Instant,
    wall_deaths: u32,
    self_collisions: u32,
    boards_cleared: u32,
    best_score: u32,
    theme_changes: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            run_started: Instant::now(),
            wall_deaths: 0,
            self_collisions: 0,
            boards_cleared: 0,
            best_score: 0,
            theme_changes: 0,
        }
    }

    /// Restart the run clock
    pub fn start_run(&mut self) {
        self.run_started = Instant::now();
    }

    pub fn run_time(&self) -> Duration {
        self.run_started.elapsed()
    }

    pub fn on_theme_change(&mut self) {
        self.theme_changes += 1;
    }

    /// Tally a run that has just stopped. Returns `None` while it is still
    /// running.
    pub fn finish_run(&mut self, state: &GameState) -> Option<RunSummary> {
        match state.status {
            RunStatus::Running => return None,
            RunStatus::Over(CollisionType::Wall) => self.wall_deaths += 1,
            RunStatus::Over(CollisionType::SelfCollision) => self.self_collisions += 1,
            RunStatus::Cleared => self.boards_cleared += 1,
        }

        let new_best = state.score > self.best_score;
        self.best_score = self.best_score.max(state.score);

        Some(RunSummary {
            score: state.score,
            length: state.snake.len(),
            steps: state.steps,
            duration: self.run_time(),
            ending: state.status,
            theme: ThemeKind::for_score(state.score),
            new_best,
        })
    }

    pub fn runs_played(&self) -> u32 {
        self.wall_deaths + self.self_collisions + self.boards_cleared
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn wall_deaths(&self) -> u32 {
        self.wall_deaths
    }

    pub fn self_collisions(&self) -> u32 {
        self.self_collisions
    }

    pub fn boards_cleared(&self) -> u32 {
        self.boards_cleared
    }

    pub fn theme_changes(&self) -> u32 {
        self.theme_changes
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// `MM:SS`, minutes uncapped
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, Snake};

    fn ended(score: u32, status: RunStatus) -> GameState {
        let mut state = GameState::new(
            Snake::new(Position::new(4, 4), Direction::Right, 3),
            Position::new(0, 0),
            10,
            10,
        );
        state.score = score;
        state.steps = 40;
        state.status = status;
        state
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_secs(125)), "02:05");
        assert_eq!(format_clock(Duration::from_secs(3661)), "61:01");
    }

    #[test]
    fn test_running_state_is_not_tallied() {
        let mut stats = SessionStats::new();
        let state = ended(3, RunStatus::Running);
        assert_eq!(stats.finish_run(&state), None);
        assert_eq!(stats.runs_played(), 0);
        assert_eq!(stats.best_score(), 0);
    }

    #[test]
    fn test_endings_counted_separately() {
        let mut stats = SessionStats::new();
        stats.finish_run(&ended(2, RunStatus::Over(CollisionType::Wall)));
        stats.finish_run(&ended(1, RunStatus::Over(CollisionType::Wall)));
        stats.finish_run(&ended(4, RunStatus::Over(CollisionType::SelfCollision)));
        stats.finish_run(&ended(97, RunStatus::Cleared));

        assert_eq!(stats.wall_deaths(), 2);
        assert_eq!(stats.self_collisions(), 1);
        assert_eq!(stats.boards_cleared(), 1);
        assert_eq!(stats.runs_played(), 4);
    }

    #[test]
    fn test_best_score_and_summary() {
        let mut stats = SessionStats::new();

        let first = stats
            .finish_run(&ended(7, RunStatus::Over(CollisionType::Wall)))
            .unwrap();
        assert!(first.new_best);
        assert_eq!(first.theme, ThemeKind::AmberMono);
        assert_eq!(first.length, 3);
        assert_eq!(first.steps, 40);
        assert_eq!(first.ending, RunStatus::Over(CollisionType::Wall));

        let tie = stats
            .finish_run(&ended(7, RunStatus::Over(CollisionType::SelfCollision)))
            .unwrap();
        assert!(!tie.new_best);

        let better = stats
            .finish_run(&ended(12, RunStatus::Over(CollisionType::Wall)))
            .unwrap();
        assert!(better.new_best);
        assert_eq!(better.theme, ThemeKind::BlueChunky);
        assert_eq!(stats.best_score(), 12);
    }

    #[test]
    fn test_start_run_resets_clock() {
        let mut stats = SessionStats::new();
        std::thread::sleep(Duration::from_millis(50));
        assert!(stats.run_time() >= Duration::from_millis(50));

        stats.start_run();
        assert!(stats.run_time() < Duration::from_millis(50));
    }
}
