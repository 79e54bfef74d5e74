use skysphere::backend::{BackendCall, BufferId, RecordingBackend, VertexAttr};
use skysphere::draw::{DrawCall, Primitive};
use skysphere::error::SkyError;
use skysphere::sky::Sky;

fn uploaded_vertices(sky: &Sky<RecordingBackend>) -> Vec<(BufferId, Vec<f32>)> {
    let backend = sky.backend();
    backend.calls.iter().filter_map(|c| match c {
        BackendCall::UploadVertices{id, ..} => backend.vertex_data(*id).map(|d| (*id, d.to_vec())),
        _ => None,
    }).collect()
}

fn uploaded_indices(sky: &Sky<RecordingBackend>) -> Vec<u32> {
    let backend = sky.backend();
    backend.calls.iter().find_map(|c| match c {
        BackendCall::UploadIndices{id, ..} => backend.index_data(*id).map(|d| d.to_vec()),
        _ => None,
    }).unwrap_or_default()
}

#[test]
fn uploaded_buffers_match_attribute_rules() {
    let mut sky = Sky::new(RecordingBackend::new(), true);
    sky.build(6, 9).unwrap();

    let vertices = uploaded_vertices(&sky);
    assert_eq!(vertices.len(), 4);
    let num_vertices = 2 + 5 * 9;
    let (coords, normals, colours, tex_coords) = (&vertices[0].1, &vertices[1].1, &vertices[2].1, &vertices[3].1);
    assert_eq!(coords.len(), num_vertices * 3);
    assert_eq!(tex_coords.len(), num_vertices * 2);

    for k in 0..num_vertices {
        let p = &coords[k * 3..k * 3 + 3];
        let magnitude = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
        assert_eq!(&normals[k * 3..k * 3 + 3], &[-p[0], -p[1], -p[2]]);
        assert_eq!(&colours[k * 4..k * 4 + 4], &[p[0], p[1], p[2], 1.0]);
    }

    assert_eq!(&coords[..3], &[0.0, 0.0, 1.0]);
    assert_eq!(&tex_coords[..2], &[0.5, 1.0]);
    assert_eq!(&coords[coords.len() - 3..], &[0.0, 0.0, -1.0]);
    assert_eq!(&tex_coords[tex_coords.len() - 2..], &[0.5, 0.0]);

    let indices = uploaded_indices(&sky);
    assert_eq!(indices.len(), 9 * 2 * 4 + 10 * 2);
    assert!(indices.iter().all(|&i| (i as usize) < num_vertices));
}

#[test]
fn draw_sequence_walks_index_buffer() {
    let mut sky = Sky::new(RecordingBackend::new(), false);
    sky.build(3, 3).unwrap();
    sky.backend_mut().clear_calls();
    sky.render().unwrap();

    assert_eq!(sky.backend().draws(), vec![
        DrawCall{primitive: Primitive::TriangleFan, count: 4, offset: 0},
        DrawCall{primitive: Primitive::TriangleStrip, count: 6, offset: 16},
        DrawCall{primitive: Primitive::TriangleFan, count: 4, offset: 40},
    ]);
    assert!(sky.backend().calls.contains(&BackendCall::DisableAttribute(VertexAttr::TexCoord)));
}

#[test]
fn rebuild_is_deterministic() {
    let mut sky = Sky::new(RecordingBackend::new(), true);
    sky.build(8, 12).unwrap();
    let first: Vec<Vec<f32>> = uploaded_vertices(&sky).into_iter().map(|(_, d)| d).collect();
    let first_indices = uploaded_indices(&sky);

    sky.backend_mut().clear_calls();
    sky.build(8, 12).unwrap();
    let second: Vec<Vec<f32>> = uploaded_vertices(&sky).into_iter().map(|(_, d)| d).collect();
    let second_indices = uploaded_indices(&sky);

    let first_bits: Vec<Vec<u32>> = first.iter().map(|d| d.iter().map(|v| v.to_bits()).collect()).collect();
    let second_bits: Vec<Vec<u32>> = second.iter().map(|d| d.iter().map(|v| v.to_bits()).collect()).collect();
    assert_eq!(first_bits, second_bits);
    assert_eq!(first_indices, second_indices);
    assert_eq!(sky.backend().live_buffers().len(), 5);
}

#[test]
fn invalid_resolutions_rejected() {
    let mut sky = Sky::new(RecordingBackend::new(), true);
    for (lats, longs) in [(0, 10), (2, 10), (10, 2), (1, 1)] {
        assert_eq!(sky.build(lats, longs), Err(SkyError::InvalidResolution{lats, longs}));
    }
    assert!(sky.backend().calls.is_empty());
    assert_eq!(sky.render(), Err(SkyError::NotBuilt));
}

#[test]
fn allocation_failure_propagates() {
    let mut sky = Sky::new(RecordingBackend::with_allocation_limit(4), true);
    match sky.build(4, 4) {
        Err(SkyError::BackendAllocation(_)) => (),
        other => panic!("unexpected {other:?}"),
    }
    assert!(sky.backend().live_buffers().is_empty());
}
