//! Vertex layouts for GPU data

use std::mem::{offset_of, size_of};

use crate::sim::WaveInstance;

const WAVE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        offset: offset_of!(WaveInstance, position) as wgpu::BufferAddress,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x2,
    },
    wgpu::VertexAttribute {
        offset: offset_of!(WaveInstance, angle) as wgpu::BufferAddress,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        offset: offset_of!(WaveInstance, scale) as wgpu::BufferAddress,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32,
    },
    wgpu::VertexAttribute {
        offset: offset_of!(WaveInstance, alpha) as wgpu::BufferAddress,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32,
    },
];

/// Per-instance layout of the wave buffer (one `WaveInstance` per ring slot)
pub fn wave_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<WaveInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &WAVE_ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_packed_record() {
        let layout = wave_instance_layout();
        assert_eq!(layout.array_stride, 20);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 12, 16]);
    }
}
