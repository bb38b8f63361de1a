//! WebGPU rendering module
//!
//! A fullscreen backdrop pass followed by one instanced quad per wave slot.

pub mod pipeline;
pub mod vertex;

pub use pipeline::{RenderState, request_adapter};
