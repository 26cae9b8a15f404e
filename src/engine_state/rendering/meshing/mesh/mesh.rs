//! Mesh data structures for voxel geometry.
//!
//! A [`ChunkMesh`] is the output of one rebuild of one chunk: parallel position and
//! color arrays plus two triangle lists that index into them, one for opaque blocks and
//! one for water. Meshes are always rebuilt wholesale, never patched.

use crate::engine_state::rendering::Vertex;

use super::face::Face;

/// Surface geometry for a single chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    /// Vertex positions in chunk-local block units
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex RGBA colors, parallel to `positions`
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices for every non-water face
    pub opaque_indices: Vec<u32>,
    /// Triangle indices for water faces
    pub water_indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one face, routing its triangles by the face's block kind.
    ///
    /// # Arguments
    /// * `face` - The face to append, corners in chunk-local coordinates
    pub fn push_face(&mut self, face: &Face) {
        let base = self.positions.len() as u32;
        let color = face.kind.color();
        for corner in face.corners() {
            self.positions
                .push([corner.x as f32, corner.y as f32, corner.z as f32]);
            self.colors.push(color);
        }

        let indices = Face::indices(base);
        if face.kind.is_fluid() {
            self.water_indices.extend_from_slice(&indices);
        } else {
            self.opaque_indices.extend_from_slice(&indices);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of quads, four vertices each.
    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    /// Triangles across both groups.
    pub fn triangle_count(&self) -> usize {
        (self.opaque_indices.len() + self.water_indices.len()) / 3
    }

    pub fn opaque_triangle_count(&self) -> usize {
        self.opaque_indices.len() / 3
    }

    pub fn water_triangle_count(&self) -> usize {
        self.water_indices.len() / 3
    }

    /// Returns true if the mesh has no faces.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Builds the interleaved vertex array for upload.
    ///
    /// # Returns
    /// One [`Vertex`] per entry in `positions`, in the same order, so both index groups
    /// stay valid against it.
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(self.colors.iter())
            .map(|(position, color)| Vertex {
                position: *position,
                color: *color,
            })
            .collect()
    }
}
