use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest grid side, in cells
pub const MAX_GRID_SIDE: usize = 512;
/// Largest cell size, in pixels
pub const MAX_CELL_PX: usize = 8;
/// Largest bezel thickness, in pixels
pub const MAX_BORDER_PX: usize = 16;

/// Configuration for a play session
///
/// Covers both the board rules and the display geometry. Every field has a
/// default, so a JSON file only needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Segments added per food item
    pub growth_per_food: u32,

    /// Pixels per grid cell in the rendered frame
    pub cell_px: usize,
    /// Bezel thickness around the playfield, in pixels
    pub border_px: usize,

    /// Milliseconds between simulation steps
    pub tick_ms: u64,
    /// Target frames per second
    pub fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 18,
            grid_height: 12,
            initial_snake_length: 3,
            growth_per_food: 1,
            cell_px: 4,
            border_px: 2,
            tick_ms: 100,
            fps: 30,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Read a JSON configuration file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        config
            .validate()
            .map_err(|msg| anyhow!("Invalid config {:?}: {}", path, msg))?;
        Ok(config)
    }

    /// Check that the board and display parameters are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(format!(
                "grid must be at most {}x{}, got {}x{}",
                MAX_GRID_SIDE, MAX_GRID_SIDE, self.grid_width, self.grid_height
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        // The starting snake trails left from the center column.
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(format!(
                "initial_snake_length ({}) does not fit a grid {} cells wide",
                self.initial_snake_length, self.grid_width
            ));
        }

        if !(3..=MAX_CELL_PX).contains(&self.cell_px) {
            return Err(format!(
                "cell_px must be in [3, {}], got {}",
                MAX_CELL_PX, self.cell_px
            ));
        }

        if self.border_px > MAX_BORDER_PX {
            return Err(format!(
                "border_px must be at most {}, got {}",
                MAX_BORDER_PX, self.border_px
            ));
        }

        // One frame pixel per terminal column, two per row
        let frame_side = |cells: usize| {
            cells
                .checked_mul(self.cell_px)
                .and_then(|px| px.checked_add(2 * self.border_px))
        };
        let fits = |px: Option<usize>, limit: usize| px.is_some_and(|px| px <= limit);
        if !fits(frame_side(self.grid_width), usize::from(u16::MAX))
            || !fits(frame_side(self.grid_height), 2 * usize::from(u16::MAX))
        {
            return Err(format!(
                "a {}x{} grid at {} px per cell does not fit a terminal",
                self.grid_width, self.grid_height, self.cell_px
            ));
        }

        if self.tick_ms == 0 {
            return Err("tick_ms must be at least 1".to_string());
        }

        if self.fps == 0 {
            return Err("fps must be at least 1".to_string());
        }

        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }

    /// How many rendered frames make up one simulation step
    pub fn frames_per_step(&self) -> u32 {
        let frames = (self.tick_ms as f64 * f64::from(self.fps) / 1000.0).round() as u32;
        frames.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 18);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.initial_snake_length, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
        assert_eq!(config.cell_px, 4);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GameConfig::new(0, 10);
        assert!(config.validate().is_err());

        config = GameConfig::new(4, 4);
        config.initial_snake_length = 4;
        assert!(config.validate().is_err());

        config = GameConfig::default();
        config.fps = 0;
        assert!(config.validate().is_err());

        config = GameConfig::default();
        config.cell_px = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        let huge = GameConfig::new((1 << 32) + 10, 1);
        assert!(huge.validate().is_err());

        let too_wide = GameConfig::new(MAX_GRID_SIDE + 1, 10);
        assert!(too_wide.validate().is_err());

        let big_cells = GameConfig {
            cell_px: 1 << 20,
            ..GameConfig::default()
        };
        assert!(big_cells.validate().is_err());

        let big_border = GameConfig {
            border_px: usize::MAX / 2,
            ..GameConfig::default()
        };
        assert!(big_border.validate().is_err());

        let largest = GameConfig {
            cell_px: MAX_CELL_PX,
            border_px: MAX_BORDER_PX,
            ..GameConfig::new(MAX_GRID_SIDE, MAX_GRID_SIDE)
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_frames_per_step() {
        let config = GameConfig::default();
        assert_eq!(config.frames_per_step(), 3);

        let fast = GameConfig {
            tick_ms: 10,
            ..GameConfig::default()
        };
        assert_eq!(fast.frames_per_step(), 1);
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_width": 24, "tick_ms": 80 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_width, 24);
        assert_eq!(config.tick_ms, 80);
        assert_eq!(config.grid_height, 12);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_height": 0 }}"#).unwrap();

        let err = GameConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("grid must be at least"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(GameConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
