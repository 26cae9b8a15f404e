//! Vertex data structures for voxel geometry.
//!
//! The mesher keeps positions and colors in parallel arrays. This module provides the
//! interleaved form that a rendering backend can upload directly.

use cgmath::Point3;

/// A vertex of the flat-colored chunk geometry.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), chunk-local
/// - Color: 4x f32 (16 bytes), linear RGBA
///
/// Total size: 28 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the chunk origin
    pub position: [f32; 3],
    /// Flat per-block color
    pub color: [f32; 4],
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `pos` - The corner position in chunk-local block units
    /// * `color` - The RGBA color of the owning block
    pub fn new(pos: Point3<i32>, color: [f32; 4]) -> Self {
        Vertex {
            position: [pos.x as f32, pos.y as f32, pos.z as f32],
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
        let v = Vertex::new(Point3::new(1, 2, 3), [0.5; 4]);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 28);
    }
}
