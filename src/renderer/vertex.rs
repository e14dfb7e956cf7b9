//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::sim::tick::{MISS_SPARK_COLOR, PADDLE_SPARK_COLOR, POWERUP_SPARK_COLOR};

    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const PADDLE: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const LASER: [f32; 4] = [1.0, 0.3, 0.9, 1.0];
    pub const POWERUP: [f32; 4] = [0.9, 0.85, 0.3, 1.0];

    /// Brick rows, top to bottom
    pub const BRICK_ROWS: [[f32; 4]; 4] = [
        [1.0, 0.35, 0.3, 1.0],
        [1.0, 0.7, 0.2, 1.0],
        [0.3, 0.85, 0.4, 1.0],
        [0.35, 0.6, 1.0, 1.0],
    ];

    /// Resolve a palette index stored on a brick or particle
    pub fn palette(index: usize) -> [f32; 4] {
        match index {
            i if i < BRICK_ROWS.len() => BRICK_ROWS[i],
            i if i == PADDLE_SPARK_COLOR => PADDLE,
            i if i == MISS_SPARK_COLOR => [1.0, 0.25, 0.25, 1.0],
            i if i == POWERUP_SPARK_COLOR => POWERUP,
            _ => BALL,
        }
    }
}
