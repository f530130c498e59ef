//! CPU mesh construction for the primitive shapes the room uses.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle list in local space, centered on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    /// Half extents of the local bounding box.
    pub half_extents: Vec3,
}

impl MeshData {
    /// Axis-aligned box of size `w × h × d`; each face has its own UVs.
    pub fn cuboid(w: f32, h: f32, d: f32) -> Self {
        let (x, y, z) = (w * 0.5, h * 0.5, d * 0.5);

        // (normal axis corners in CCW order seen from outside)
        let faces: [[[f32; 3]; 4]; 6] = [
            [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]],     // +Z
            [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]], // -Z
            [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]],     // +X
            [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]], // -X
            [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]],     // +Y
            [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]], // -Y
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for face in faces {
            let base = vertices.len() as u16;
            vertices.extend(face.iter().zip(QUAD_UVS).map(|(p, uv)| Vertex { position: *p, uv }));
            indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        }

        Self {
            vertices,
            indices,
            half_extents: Vec3::new(x, y, z),
        }
    }

    /// Double-sided quad of size `w × h` in the local XY plane, facing +Z.
    pub fn plane(w: f32, h: f32) -> Self {
        let (x, y) = (w * 0.5, h * 0.5);
        let vertices = [[-x, -y, 0.0], [x, -y, 0.0], [x, y, 0.0], [-x, y, 0.0]]
            .into_iter()
            .zip(QUAD_UVS)
            .map(|(position, uv)| Vertex { position, uv })
            .collect();

        Self {
            vertices,
            indices: QUAD_INDICES.to_vec(),
            half_extents: Vec3::new(x, y, 0.0),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

// Image rows run top to bottom, so v = 0 is the top edge.
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_has_six_faces() {
        let m = MeshData::cuboid(1.0, 2.0, 3.0);
        assert_eq!(m.vertices.len(), 24);
        assert_eq!(m.triangle_count(), 12);
        assert_eq!(m.half_extents, Vec3::new(0.5, 1.0, 1.5));
        assert!(m.indices.iter().all(|&i| (i as usize) < m.vertices.len()));
    }

    #[test]
    fn cuboid_vertices_lie_on_bounds() {
        let m = MeshData::cuboid(6.0, 0.15, 6.0);
        for v in &m.vertices {
            let p = Vec3::from_array(v.position);
            assert!(p.abs().cmple(m.half_extents + 1e-6).all());
        }
    }

    #[test]
    fn plane_is_flat_quad() {
        let m = MeshData::plane(1.04, 0.8);
        assert_eq!(m.vertices.len(), 4);
        assert_eq!(m.triangle_count(), 2);
        assert!(m.vertices.iter().all(|v| v.position[2] == 0.0));
        assert_eq!(m.half_extents.z, 0.0);
    }
}
