use cgmath::{Vector2, Vector3};

use crate::model::{Resolution, SkyMesh, SkyVertexModel};

/******************************************************************************/

/// Pushes the unit sphere vertices: north pole, `lats - 1` rings from north to
/// south, south pole. Each ring starts at -180 and ends at +180 degrees, so the
/// seam vertex is duplicated with u = 0 and u = 1.
pub fn gen_unit_sky<M: SkyVertexModel>(model: &mut M, resolution: &Resolution) {
    model.push_vertex(Vector3::new(0.0, 0.0, 1.0), Vector2::new(0.5, 1.0));

    let lats = resolution.lats();
    let longs = resolution.longs();
    for j in 1..lats {
        let lat = 90.0 - 180.0 * j as f32 / lats as f32;
        let lat_r = lat.to_radians();
        for i in 0..longs {
            let lon = -180.0 + 360.0 * i as f32 / (longs - 1) as f32;
            let lon_r = lon.to_radians();

            let x = lat_r.cos() * lon_r.cos();
            let y = lat_r.cos() * lon_r.sin();
            let z = lat_r.sin();

            let u = (lon + 180.0) / 360.0;
            let v = (lat + 90.0) / 180.0;
            model.push_vertex(Vector3::new(x, y, z), Vector2::new(u, v));
        }
    }

    model.push_vertex(Vector3::new(0.0, 0.0, -1.0), Vector2::new(0.5, 0.0));
}

/// Pushes north fan, latitude strips and south fan indices, in draw order.
pub fn gen_sky_indices<M: SkyVertexModel>(model: &mut M, resolution: &Resolution) {
    let longs = resolution.longs();
    let num_vertices = resolution.num_vertices() as u32;

    for i in 0..=longs {
        model.push_index(i);
    }

    let mut start = 1;
    for _ in 0..resolution.num_strips() {
        for i in 0..longs {
            model.push_index(start + i);
            model.push_index(start + i + longs);
        }
        start += longs;
    }

    for i in (num_vertices - longs - 1..num_vertices).rev() {
        model.push_index(i);
    }
}

pub fn gen_sky(resolution: &Resolution) -> SkyMesh {
    let mut mesh = SkyMesh::with_capacity(resolution);
    gen_unit_sky(&mut mesh, resolution);
    mesh.derive_attributes();
    gen_sky_indices(&mut mesh, resolution);
    log::debug!("Sky mesh {}x{}: {} vertices, {} indices"
                , resolution.lats(), resolution.longs(), mesh.vertex_num(), mesh.index_num());
    mesh
}

/******************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    use cgmath::{InnerSpace, Vector4};

    fn resolutions() -> impl Iterator<Item = Resolution> {
        (3..24).flat_map(|lats| (3..24).map(move |longs| Resolution::new(lats, longs).unwrap()))
    }

    #[test]
    fn vertex_and_index_counts() {
        for r in resolutions() {
            let mesh = gen_sky(&r);
            let lats = r.lats() as usize;
            let longs = r.longs() as usize;
            assert_eq!(mesh.vertex_num(), 2 + (lats - 1) * longs, "{r:?}");
            assert_eq!(mesh.tex_coords.len(), mesh.vertex_num());
            assert_eq!(mesh.index_num(), longs * 2 * (lats - 2) + (longs + 1) * 2, "{r:?}");
        }
    }

    #[test]
    fn indices_in_bounds() {
        for r in resolutions() {
            let mesh = gen_sky(&r);
            let n = mesh.vertex_num() as u32;
            assert!(mesh.indices.iter().all(|&i| i < n), "{r:?}");
        }
    }

    #[test]
    fn positions_on_unit_sphere() {
        for r in resolutions() {
            let mesh = gen_sky(&r);
            for p in &mesh.positions {
                assert!((p.magnitude() - 1.0).abs() < 1e-5, "{p:?} in {r:?}");
            }
        }
    }

    #[test]
    fn normals_and_colours_derived_per_vertex() {
        let mesh = gen_sky(&Resolution::new(7, 9).unwrap());
        assert_eq!(mesh.normals.len(), mesh.vertex_num());
        assert_eq!(mesh.colours.len(), mesh.vertex_num());
        for (k, p) in mesh.positions.iter().enumerate() {
            assert_eq!(mesh.normals[k], -*p);
            assert_eq!(mesh.colours[k], Vector4::new(p.x, p.y, p.z, 1.0));
        }
    }

    #[test]
    fn poles() {
        let mesh = gen_sky(&Resolution::new(5, 6).unwrap());
        let last = mesh.vertex_num() - 1;
        assert_eq!(mesh.positions[0], Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.tex_coords[0], Vector2::new(0.5, 1.0));
        assert_eq!(mesh.positions[last], Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(mesh.tex_coords[last], Vector2::new(0.5, 0.0));
    }

    #[test]
    fn seam_vertices_duplicated() {
        let r = Resolution::new(6, 8).unwrap();
        let mesh = gen_sky(&r);
        let longs = r.longs() as usize;
        for ring in 0..(r.lats() as usize - 1) {
            let first = 1 + ring * longs;
            let last = first + longs - 1;
            let (a, b) = (mesh.positions[first], mesh.positions[last]);
            assert!((a - b).magnitude() < 1e-5, "ring {ring}");
            assert_eq!(mesh.tex_coords[first].x, 0.0);
            assert_eq!(mesh.tex_coords[last].x, 1.0);
            assert_eq!(mesh.tex_coords[first].y, mesh.tex_coords[last].y);
        }
    }

    #[test]
    fn tex_coords_in_unit_square() {
        for r in resolutions() {
            let mesh = gen_sky(&r);
            for t in &mesh.tex_coords {
                assert!((0.0..=1.0).contains(&t.x) && (0.0..=1.0).contains(&t.y), "{t:?} in {r:?}");
            }
        }
    }

    #[test]
    fn index_layout_lats4_longs5() {
        let mesh = gen_sky(&Resolution::new(4, 5).unwrap());
        let expected: Vec<u32> = vec![
            0, 1, 2, 3, 4, 5,
            1, 6, 2, 7, 3, 8, 4, 9, 5, 10,
            6, 11, 7, 12, 8, 13, 9, 14, 10, 15,
            16, 15, 14, 13, 12, 11,
        ];
        assert_eq!(mesh.indices, expected);
    }

    #[test]
    fn index_layout_lats3_longs3() {
        let mesh = gen_sky(&Resolution::new(3, 3).unwrap());
        assert_eq!(mesh.vertex_num(), 8);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 1, 4, 2, 5, 3, 6, 7, 6, 5, 4]);
    }

    #[test]
    fn generation_is_deterministic() {
        let r = Resolution::new(11, 17).unwrap();
        assert_eq!(gen_sky(&r), gen_sky(&r));
    }
}
