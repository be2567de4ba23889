//! Vertex layout for the side-view renderer

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One corner of a flat-shaded triangle (world units until uploaded)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(p: Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::from(self.position)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Backdrop colors
pub mod colors {
    pub const SKY: [f32; 4] = [0.53, 0.78, 0.95, 1.0];
    pub const SEA: [f32; 4] = [0.1, 0.35, 0.6, 1.0];
    pub const FOAM: [f32; 4] = [0.85, 0.93, 1.0, 0.8];
    /// Open bonus hole
    pub const HOLE: [f32; 4] = [1.0, 0.95, 0.5, 0.9];
    /// Distant scenery fades toward this
    pub const HAZE: [f32; 4] = [0.7, 0.85, 0.95, 1.0];
}
