//! # Procedural Geometry Generation
//!
//! Indexed primitive shapes that can stand in for the shared mesh when no
//! asset is supplied. [`GeometryData::to_mesh_data`] expands them into the
//! non-indexed triangle list the renderer draws.

pub mod primitives;

pub use primitives::generate_sphere;

use super::mesh::MeshData;

/// Indexed geometry produced by the generators
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z), one per vertex
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expands the index buffer into one vertex per triangle corner
    pub fn to_mesh_data(&self) -> MeshData {
        let mut mesh = MeshData::with_capacity(self.indices.len());
        for &index in &self.indices {
            let i = index as usize;
            mesh.push(
                self.vertices[i],
                self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            );
        }
        mesh
    }
}
