//! Wave records and their packed upload layout

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::tuning::WaveConfig;

/// Scalars per serialized wave: x, y, angle, scale, alpha
pub const STRIDE: usize = std::mem::size_of::<WaveInstance>() / std::mem::size_of::<f32>();

/// One slot of the wave ring
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveParticle {
    /// Center in normalized device coordinates
    pub position: Vec2,
    /// Phase/direction (radians)
    pub angle: f32,
    /// Ring radius factor, 0-1
    pub scale: f32,
    /// Intensity, 0-1
    pub alpha: f32,
}

impl WaveParticle {
    /// Restart this slot as a fresh wave
    pub fn trigger(&mut self, position: Vec2, angle: f32, scale: f32, alpha: f32) {
        self.position = position;
        self.angle = angle;
        self.scale = scale;
        self.alpha = alpha;
    }

    /// Decay alpha, spin, and grow scale over `dt` seconds
    ///
    /// Decay is a per-frame factor, so a zero-length step leaves alpha alone.
    pub fn step(&mut self, dt: f32, config: &WaveConfig) {
        if dt > 0.0 {
            self.alpha = (self.alpha * config.decay).max(config.alpha_floor);
        }
        self.angle += self.alpha * dt * config.angle_drive + dt * config.angle_base;
        self.scale = (self.scale + self.scale * dt * config.scale_drive).min(1.0);
    }

    /// True once the wave has faded to the floor and stopped growing
    pub fn is_dormant(&self, floor: f32) -> bool {
        self.alpha <= floor && (self.scale >= 1.0 || self.scale == 0.0)
    }
}

/// Packed per-instance record (must match `wave_shader.wgsl`)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaveInstance {
    pub position: [f32; 2],
    pub angle: f32,
    pub scale: f32,
    pub alpha: f32,
}

impl From<&WaveParticle> for WaveInstance {
    fn from(p: &WaveParticle) -> Self {
        Self {
            position: p.position.to_array(),
            angle: p.angle,
            scale: p.scale,
            alpha: p.alpha,
        }
    }
}

/// Pack `particles` into `out` slot by slot
pub fn serialize(particles: &[WaveParticle], out: &mut [WaveInstance]) {
    debug_assert_eq!(particles.len(), out.len());
    for (slot, particle) in out.iter_mut().zip(particles) {
        *slot = WaveInstance::from(particle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_is_five_scalars() {
        assert_eq!(STRIDE, 5);
        assert_eq!(std::mem::size_of::<WaveInstance>(), 20);
    }

    #[test]
    fn test_serialized_field_order() {
        let particle = WaveParticle {
            position: Vec2::new(0.25, -0.75),
            angle: 1.5,
            scale: 0.4,
            alpha: 0.1,
        };
        let mut out = [WaveInstance::default()];
        serialize(&[particle], &mut out);
        let scalars: &[f32] = bytemuck::cast_slice(&out);
        assert_eq!(scalars, &[0.25f32, -0.75, 1.5, 0.4, 0.1]);
    }

    #[test]
    fn test_step_with_zero_dt_is_idle() {
        let mut p = WaveParticle {
            position: Vec2::ZERO,
            angle: 0.3,
            scale: 0.1,
            alpha: 0.192,
        };
        let before = p;
        p.step(0.0, &WaveConfig::default());
        assert_eq!(p, before);
    }

    #[test]
    fn test_step_clamps_scale_and_floors_alpha() {
        let mut p = WaveParticle {
            position: Vec2::ZERO,
            angle: 0.0,
            scale: 0.9,
            alpha: 0.00205,
        };
        p.step(1.0, &WaveConfig::default());
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.alpha, 0.002);
        assert!(p.is_dormant(0.002));
    }
}
