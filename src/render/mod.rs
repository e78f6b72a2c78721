//! Theme render pipeline and its terminal presenter

pub mod effects;
pub mod frame;
pub mod pipeline;
pub mod renderer;
pub mod theme;
pub mod viewport;

pub use frame::{Frame, Rgb};
pub use pipeline::{FrameState, RenderPipeline};
pub use renderer::{FrameView, Renderer};
pub use theme::{SCORE_PER_THEME, Theme, ThemeKind, active_theme_index};
pub use viewport::{PixelRect, Viewport};
