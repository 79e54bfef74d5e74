use std::vec::Vec;

use cgmath::{Vector2, Vector3, Vector4};

use crate::error::{SkyError, SkyResult};

/******************************************************************************/

pub const MIN_LATS: u32 = 3;
pub const MIN_LONGS: u32 = 3;

/// Vertices are addressed by `u32` indices.
pub const MAX_VERTICES: u64 = u32::MAX as u64;

/// Number of latitude bands and longitude divisions of a sky sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    lats: u32,
    longs: u32,
}

impl Resolution {
    pub fn new(lats: u32, longs: u32) -> SkyResult<Self> {
        if lats < MIN_LATS || longs < MIN_LONGS {
            return Err(SkyError::InvalidResolution { lats, longs });
        }
        let vertices = (lats as u64 - 1).checked_mul(longs as u64)
            .and_then(|n| n.checked_add(2))
            .unwrap_or(u64::MAX);
        if vertices > MAX_VERTICES {
            return Err(SkyError::ResolutionTooLarge { lats, longs, vertices });
        }
        Ok(Self{lats, longs})
    }

    pub fn lats(&self) -> u32 {
        self.lats
    }

    pub fn longs(&self) -> u32 {
        self.longs
    }

    /// Both poles plus `lats - 1` rings of `longs` vertices each.
    pub fn num_vertices(&self) -> usize {
        2 + (self.lats as usize - 1) * self.longs as usize
    }

    /// Two pole fans plus one strip per interior latitude gap.
    pub fn num_indices(&self) -> usize {
        self.strip_len() * self.num_strips() + self.fan_len() * 2
    }

    pub fn fan_len(&self) -> usize {
        self.longs as usize + 1
    }

    pub fn strip_len(&self) -> usize {
        self.longs as usize * 2
    }

    pub fn num_strips(&self) -> usize {
        self.lats as usize - 2
    }
}

/******************************************************************************/

pub trait SkyVertexModel {
    fn push_vertex(&mut self, position: Vector3<f32>, tex_coord: Vector2<f32>) -> u32;
    fn push_index(&mut self, i: u32);
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkyMesh {
    pub positions: Vec<Vector3<f32>>,
    pub tex_coords: Vec<Vector2<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub colours: Vec<Vector4<f32>>,
    pub indices: Vec<u32>,
}

impl SkyMesh {
    pub fn with_capacity(resolution: &Resolution) -> Self {
        let vertices = resolution.num_vertices();
        SkyMesh {
            positions: Vec::with_capacity(vertices),
            tex_coords: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            colours: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(resolution.num_indices()),
        }
    }

    pub fn vertex_num(&self) -> usize {
        self.positions.len()
    }

    pub fn index_num(&self) -> usize {
        self.indices.len()
    }

    /// Normals point inwards since the sky is seen from inside.
    pub fn derive_attributes(&mut self) {
        self.normals = self.positions.iter().map(|&p| -p).collect();
        self.colours = self.positions.iter().map(|p| p.extend(1.0)).collect();
    }
}

impl SkyVertexModel for SkyMesh {
    fn push_vertex(&mut self, position: Vector3<f32>, tex_coord: Vector2<f32>) -> u32 {
        let i = self.positions.len();
        self.positions.push(position);
        self.tex_coords.push(tex_coord);
        i as u32
    }

    fn push_index(&mut self, i: u32) {
        self.indices.push(i);
    }
}

/// Lays vectors out as a tightly packed float array for attribute upload.
pub fn flatten<V, const N: usize>(items: &[V]) -> Vec<f32>
    where V: Copy + Into<[f32; N]> {
    items.iter().flat_map(|&v| Into::<[f32; N]>::into(v)).collect()
}

/******************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_small_resolutions() {
        assert_eq!(Resolution::new(2, 5), Err(SkyError::InvalidResolution { lats: 2, longs: 5 }));
        assert_eq!(Resolution::new(4, 2), Err(SkyError::InvalidResolution { lats: 4, longs: 2 }));
        assert_eq!(Resolution::new(0, 0), Err(SkyError::InvalidResolution { lats: 0, longs: 0 }));
        assert!(Resolution::new(3, 3).is_ok());
    }

    #[test]
    fn rejects_resolutions_beyond_u32_indices() {
        assert_eq!(Resolution::new(65537, 65537)
                   , Err(SkyError::ResolutionTooLarge { lats: 65537, longs: 65537, vertices: 4_295_032_834 }));
        assert!(matches!(Resolution::new(u32::MAX, u32::MAX), Err(SkyError::ResolutionTooLarge { .. })));

        let r = Resolution::new(65536, 65535).unwrap();
        assert_eq!(r.num_vertices(), 4_294_836_227);
        assert!(matches!(Resolution::new(65536, 65537), Err(SkyError::ResolutionTooLarge { .. })));
    }

    #[test]
    fn counts_for_known_resolutions() {
        let r = Resolution::new(4, 5).unwrap();
        assert_eq!(r.num_vertices(), 17);
        assert_eq!(r.num_indices(), 32);

        let r = Resolution::new(3, 3).unwrap();
        assert_eq!(r.num_vertices(), 8);
        assert_eq!(r.num_indices(), 14);
    }

    #[test]
    fn derived_attributes_follow_positions() {
        let mut mesh = SkyMesh::default();
        mesh.push_vertex(Vector3::new(0.0, 0.6, 0.8), Vector2::new(0.25, 0.5));
        mesh.push_vertex(Vector3::new(-1.0, 0.0, 0.0), Vector2::new(0.0, 0.5));
        mesh.derive_attributes();
        assert_eq!(mesh.normals, vec![Vector3::new(0.0, -0.6, -0.8), Vector3::new(1.0, 0.0, 0.0)]);
        assert_eq!(mesh.colours, vec![Vector4::new(0.0, 0.6, 0.8, 1.0), Vector4::new(-1.0, 0.0, 0.0, 1.0)]);
    }

    #[test]
    fn flatten_packs_components() {
        let v = [Vector2::new(1.0f32, 2.0), Vector2::new(3.0, 4.0)];
        assert_eq!(flatten::<_, 2>(&v), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
