//! Ripple Field - pointer-driven ripples over an aspect-fitted backdrop
//!
//! Core modules:
//! - `sim`: Deterministic wave ring (trigger, decay, serialization)
//! - `layout`: Canvas sizing, pointer normalization, cover fit
//! - `renderer`: WebGPU pipelines for the backdrop and wave instances
//! - `tuning`: Data-driven wave parameters
//! - `settings`: Persisted preferences

pub mod error;
pub mod layout;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, RenderError};
pub use layout::{CoverFit, Viewport};
pub use settings::{QualityPreset, Settings};
pub use sim::{WaveField, WaveFrame};
pub use tuning::WaveConfig;

/// Demo configuration constants
pub mod consts {
    /// Default ring size
    pub const DEFAULT_CAPACITY: usize = 128;
    /// One frame at 60 Hz, in milliseconds
    pub const DEBOUNCE_MS: f64 = 1000.0 / 60.0;

    /// Aspect ratio of the backdrop artwork (width / height)
    pub const BACKDROP_ASPECT: f32 = 16.0 / 9.0;

    /// Vertical offsets of the title/subtitle bands (CSS pixels, +y down)
    pub const TITLE_OFFSET: f32 = -100.0;
    pub const SUBTITLE_OFFSET: f32 = 100.0;

    /// Clear color behind everything
    pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Title band tint (0x005a9c)
    pub const TITLE_COLOR: [f32; 4] = [0.0, 90.0 / 255.0, 156.0 / 255.0, 1.0];
    /// Subtitle band tint
    pub const SUBTITLE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
