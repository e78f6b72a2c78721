//! The closed set of CRT themes and the score-driven rotation between them
//!
//! Each theme is an immutable record of palette and post-process
//! parameters. The active one is a pure function of the score: the rotation
//! advances every [`SCORE_PER_THEME`] points and wraps around.

use super::frame::Rgb;

/// Points needed to move to the next theme
pub const SCORE_PER_THEME: u32 = 5;

/// Colors used by one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb,
    pub grid: Rgb,
    pub snake_head: Rgb,
    pub snake_body: Rgb,
    pub food: Rgb,
    pub food_glow: Rgb,
    /// Phosphor color used by banding, noise and the beamline
    pub accent: Rgb,
    pub scanline: Rgb,
    pub bezel: Rgb,
    pub border: Rgb,
    pub inner_glow: Rgb,
    pub game_over: Rgb,
}

/// Post-process parameters. Alphas are in `0.0..=1.0`; a zero spacing,
/// period or density switches that effect off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effects {
    pub scanline_spacing: usize,
    pub scanline_alpha: f32,

    /// Halo width around lit cells, in pixels
    pub glow_radius: usize,
    pub glow_strength: f32,

    /// How many previous frames persist
    pub ghost_frames: usize,
    /// Weight of the most recent previous frame
    pub ghost_alpha: f32,
    /// Multiplier applied per additional frame of age
    pub ghost_decay: f32,

    /// Chance that a noise chunk lights up in a given frame
    pub noise_density: f64,
    pub noise_alpha: f32,
    /// Side of a noise chunk, in pixels
    pub noise_chunk: usize,

    pub banding_period: usize,
    pub banding_thickness: usize,
    pub banding_alpha: f32,

    pub beam_thickness: usize,
    pub beam_alpha: f32,
    /// Rows the beam travels per frame
    pub beam_speed: usize,
}

/// A named palette plus effect set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub name: &'static str,
    pub palette: Palette,
    pub effects: Effects,
}

/// Identifier of a theme in rotation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeKind {
    /// Classic green terminal
    GreenPhosphor,
    /// IBM-style amber monochrome with horizontal banding
    AmberMono,
    /// Commodore-style blue with chunky pixel noise
    BlueChunky,
}

impl ThemeKind {
    pub const ALL: [ThemeKind; 3] = [
        ThemeKind::GreenPhosphor,
        ThemeKind::AmberMono,
        ThemeKind::BlueChunky,
    ];

    /// Position in the rotation
    pub fn index(self) -> usize {
        match self {
            ThemeKind::GreenPhosphor => 0,
            ThemeKind::AmberMono => 1,
            ThemeKind::BlueChunky => 2,
        }
    }

    /// Theme at `index`, wrapping past the end
    pub fn from_index(index: usize) -> ThemeKind {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Theme active at a given score
    pub fn for_score(score: u32) -> ThemeKind {
        Self::from_index(active_theme_index(score))
    }

    pub fn theme(self) -> &'static Theme {
        match self {
            ThemeKind::GreenPhosphor => &GREEN_PHOSPHOR,
            ThemeKind::AmberMono => &AMBER_MONO,
            ThemeKind::BlueChunky => &BLUE_CHUNKY,
        }
    }

    pub fn name(self) -> &'static str {
        self.theme().name
    }
}

/// `floor(score / 5) mod 3`
pub fn active_theme_index(score: u32) -> usize {
    (score / SCORE_PER_THEME) as usize % ThemeKind::ALL.len()
}

pub static GREEN_PHOSPHOR: Theme = Theme {
    kind: ThemeKind::GreenPhosphor,
    name: "Green Phosphor",
    palette: Palette {
        background: Rgb::new(8, 12, 8),
        grid: Rgb::new(0, 40, 0),
        snake_head: Rgb::new(0, 255, 0),
        snake_body: Rgb::new(0, 180, 0),
        food: Rgb::new(255, 50, 50),
        food_glow: Rgb::new(255, 100, 100),
        accent: Rgb::new(0, 255, 0),
        scanline: Rgb::BLACK,
        bezel: Rgb::new(20, 20, 20),
        border: Rgb::new(60, 60, 60),
        inner_glow: Rgb::new(0, 100, 0),
        game_over: Rgb::new(255, 0, 0),
    },
    effects: Effects {
        scanline_spacing: 3,
        scanline_alpha: 0.2,
        glow_radius: 2,
        glow_strength: 0.5,
        ghost_frames: 5,
        ghost_alpha: 0.45,
        ghost_decay: 0.6,
        noise_density: 0.0,
        noise_alpha: 0.0,
        noise_chunk: 1,
        banding_period: 0,
        banding_thickness: 0,
        banding_alpha: 0.0,
        beam_thickness: 2,
        beam_alpha: 0.12,
        beam_speed: 1,
    },
};

pub static AMBER_MONO: Theme = Theme {
    kind: ThemeKind::AmberMono,
    name: "Amber Mono",
    palette: Palette {
        background: Rgb::new(20, 10, 0),
        grid: Rgb::new(50, 20, 0),
        snake_head: Rgb::new(255, 200, 0),
        snake_body: Rgb::new(180, 120, 0),
        food: Rgb::new(255, 255, 0),
        food_glow: Rgb::new(255, 255, 100),
        accent: Rgb::new(255, 200, 0),
        scanline: Rgb::BLACK,
        bezel: Rgb::new(30, 20, 10),
        border: Rgb::new(80, 50, 20),
        inner_glow: Rgb::new(200, 100, 0),
        game_over: Rgb::new(255, 80, 0),
    },
    effects: Effects {
        scanline_spacing: 3,
        scanline_alpha: 0.16,
        glow_radius: 2,
        glow_strength: 0.45,
        ghost_frames: 5,
        ghost_alpha: 0.55,
        ghost_decay: 0.7,
        noise_density: 0.0,
        noise_alpha: 0.0,
        noise_chunk: 1,
        banding_period: 8,
        banding_thickness: 2,
        banding_alpha: 0.2,
        beam_thickness: 2,
        beam_alpha: 0.12,
        beam_speed: 1,
    },
};

pub static BLUE_CHUNKY: Theme = Theme {
    kind: ThemeKind::BlueChunky,
    name: "Blue Chunky",
    palette: Palette {
        background: Rgb::new(0, 0, 50),
        grid: Rgb::new(0, 0, 100),
        snake_head: Rgb::new(100, 100, 255),
        snake_body: Rgb::new(50, 50, 180),
        food: Rgb::new(255, 0, 255),
        food_glow: Rgb::new(255, 100, 255),
        accent: Rgb::new(100, 100, 255),
        scanline: Rgb::BLACK,
        bezel: Rgb::new(10, 10, 30),
        border: Rgb::new(40, 40, 90),
        inner_glow: Rgb::new(0, 0, 200),
        game_over: Rgb::new(255, 50, 50),
    },
    effects: Effects {
        scanline_spacing: 4,
        scanline_alpha: 0.3,
        glow_radius: 1,
        glow_strength: 0.4,
        ghost_frames: 3,
        ghost_alpha: 0.3,
        ghost_decay: 0.5,
        noise_density: 0.02,
        noise_alpha: 0.2,
        noise_chunk: 2,
        banding_period: 0,
        banding_thickness: 0,
        banding_alpha: 0.0,
        beam_thickness: 2,
        beam_alpha: 0.15,
        beam_speed: 1,
    },
};
