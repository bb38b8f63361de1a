//! The wave field: a fixed ring of waves driven by pointer movement
//!
//! A pointer move marks the field active for one debounce window. Each tick
//! that finds the field active starts a new wave in the next ring slot,
//! overwriting the oldest one. Every tick then decays, spins and grows all
//! slots and repacks them for upload.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::wave::{self, STRIDE, WaveInstance, WaveParticle};
use crate::error::ConfigError;
use crate::tuning::WaveConfig;

/// Read-only view of one advanced frame, ready for upload
#[derive(Debug, Clone, Copy)]
pub struct WaveFrame<'a> {
    instances: &'a [WaveInstance],
}

impl<'a> WaveFrame<'a> {
    /// Packed records in slot order
    pub fn instances(&self) -> &'a [WaveInstance] {
        self.instances
    }

    /// Flat `capacity * STRIDE` scalar view
    pub fn scalars(&self) -> &'a [f32] {
        bytemuck::cast_slice(self.instances)
    }

    /// Raw bytes for `queue.write_buffer`
    pub fn bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.instances)
    }

    /// Number of instances to draw (always the full ring)
    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }
}

/// Ring of waves plus the pointer state that feeds it
#[derive(Debug, Clone)]
pub struct WaveField {
    config: WaveConfig,
    particles: Vec<WaveParticle>,
    instances: Vec<WaveInstance>,
    /// Most recently triggered slot
    cursor: usize,
    /// Latest pointer position (NDC)
    pointer: Vec2,
    last_move_ms: Option<f64>,
    last_tick_ms: Option<f64>,
    rng: Pcg32,
}

impl WaveField {
    /// Create a field with all slots zeroed (invisible)
    pub fn new(config: WaveConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity = config.capacity;
        log::debug!("Wave field: {} slots, seed {}", capacity, seed);

        Ok(Self {
            config,
            particles: vec![WaveParticle::default(); capacity],
            instances: vec![WaveInstance::default(); capacity],
            cursor: 0,
            pointer: Vec2::ZERO,
            last_move_ms: None,
            last_tick_ms: None,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn particles(&self) -> &[WaveParticle] {
        &self.particles
    }

    /// Whether a pointer move happened within the debounce window before `now_ms`
    pub fn is_active(&self, now_ms: f64) -> bool {
        self.last_move_ms
            .is_some_and(|t| now_ms - t < self.config.debounce_ms)
    }

    /// Record a pointer move (position already in NDC)
    pub fn on_pointer_move(&mut self, position: Vec2, now_ms: f64) {
        self.pointer = position;
        self.last_move_ms = Some(now_ms);
    }

    /// Advance using the time elapsed since the previous tick
    ///
    /// The first tick after creation or `reset` uses a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> WaveFrame<'_> {
        let dt = match self.last_tick_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);
        self.advance(dt, now_ms)
    }

    /// Advance every slot by `dt` seconds, triggering a new wave if active
    pub fn advance(&mut self, dt: f32, now_ms: f64) -> WaveFrame<'_> {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::debug!("Clamping invalid wave delta {} to 0", dt);
            0.0
        };

        if self.is_active(now_ms) {
            self.trigger_next();
        }

        let config = self.config;
        for (i, particle) in self.particles.iter_mut().enumerate() {
            particle.step(dt, &config);
            if i == self.cursor {
                particle.position = self.pointer;
            }
        }

        wave::serialize(&self.particles, &mut self.instances);
        self.frame()
    }

    /// Current packed state without advancing
    pub fn frame(&self) -> WaveFrame<'_> {
        WaveFrame {
            instances: &self.instances,
        }
    }

    /// Zero every slot and forget pointer activity
    pub fn reset(&mut self) {
        self.particles.fill(WaveParticle::default());
        self.instances.fill(WaveInstance::default());
        self.cursor = 0;
        self.last_move_ms = None;
        self.last_tick_ms = None;
    }

    /// Length of the flat scalar buffer
    pub fn buffer_len(&self) -> usize {
        self.capacity() * STRIDE
    }

    fn trigger_next(&mut self) {
        self.cursor = (self.cursor + 1) % self.particles.len();
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let (scale, alpha) = (self.config.scale_seed, self.config.alpha_seed);
        self.particles[self.cursor].trigger(self.pointer, angle, scale, alpha);
    }
}
