//! Deterministic wave simulation
//!
//! Pure and platform-free:
//! - Seeded RNG only
//! - Time comes in as explicit timestamps, never read from a clock
//! - No rendering or platform dependencies

pub mod field;
pub mod wave;

pub use field::{WaveField, WaveFrame};
pub use wave::{STRIDE, WaveInstance, WaveParticle};
