//! Error types for configuration and renderer setup
//!
//! The simulation itself is total and has no error path.

use thiserror::Error;

/// Rejected wave tuning parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("wave capacity must be at least 1")]
    ZeroCapacity,

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("decay factor must lie in (0, 1), got {0}")]
    Decay(f32),

    #[error("debounce_ms must be finite and non-negative, got {0}")]
    Debounce(f64),
}

/// Failures while bringing up the GPU surface
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
