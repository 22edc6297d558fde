//! Shared mesh
//!
//! Every node of both rigs draws the same static triangle list. The mesh is
//! resolved once at start-up from a [`MeshSource`], uploaded once, and drawn
//! non-indexed with one vertex per triangle corner.

use std::path::Path;

use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::{config::MeshSource, error::SetupError};

use super::{geometry::generate_sphere, vertex::Vertex3D};

const SPHERE_LONGITUDE_SEGMENTS: u32 = 32;
const SPHERE_LATITUDE_SEGMENTS: u32 = 16;

/// Positions and normals of a non-indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
}

impl MeshData {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
        }
    }

    pub fn push(&mut self, position: [f32; 3], normal: [f32; 3]) {
        self.positions.push(position);
        self.normals.push(normal);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Resolves the configured mesh source.
    pub fn from_source(source: &MeshSource) -> Result<Self, SetupError> {
        match source {
            MeshSource::Sphere { radius } => Ok(generate_sphere(
                *radius,
                SPHERE_LONGITUDE_SEGMENTS,
                SPHERE_LATITUDE_SEGMENTS,
            )
            .to_mesh_data()),
            MeshSource::Obj(path) => Self::load_obj(path),
        }
    }

    /// Loads every model in an OBJ file into a single triangle list.
    ///
    /// Faces are triangulated; vertices without normals in the file get the
    /// normal of the face they belong to.
    pub fn load_obj(path: &Path) -> Result<Self, SetupError> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| SetupError::MeshLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let mut data = MeshData::default();
        for model in &models {
            let mesh = &model.mesh;
            let has_normals =
                !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len();
            log::debug!(
                "model '{}': {} triangles, normals from file: {}",
                model.name,
                mesh.indices.len() / 3,
                has_normals
            );

            let read = |buf: &[f32], i: u32| {
                let i = i as usize * 3;
                [buf[i], buf[i + 1], buf[i + 2]]
            };

            for triangle in mesh.indices.chunks_exact(3) {
                let corners = [
                    read(&mesh.positions, triangle[0]),
                    read(&mesh.positions, triangle[1]),
                    read(&mesh.positions, triangle[2]),
                ];
                let face = face_normal(corners);

                for (&index, corner) in triangle.iter().zip(corners) {
                    let normal = if has_normals {
                        read(&mesh.normals, index)
                    } else {
                        face
                    };
                    data.push(corner, normal);
                }
            }
        }

        if data.vertex_count() == 0 {
            return Err(SetupError::EmptyMesh(path.to_path_buf()));
        }

        log::info!(
            "Loaded mesh '{}': {} models, {} vertices",
            path.display(),
            models.len(),
            data.vertex_count()
        );
        Ok(data)
    }

    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| Vertex3D { position, normal })
            .collect()
    }
}

/// Unit normal of a counter-clockwise triangle; degenerate faces get +Y.
fn face_normal([a, b, c]: [[f32; 3]; 3]) -> [f32; 3] {
    let a = Vector3::from(a);
    let edge1 = Vector3::from(b) - a;
    let edge2 = Vector3::from(c) - a;
    let n = edge1.cross(edge2);
    if n.magnitude2() > f32::EPSILON {
        n.normalize().into()
    } else {
        [0.0, 1.0, 0.0]
    }
}

/// The shared mesh once uploaded to the GPU
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertices = mesh.to_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}
