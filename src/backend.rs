use std::vec::Vec;

use crate::draw::DrawCall;
use crate::error::{SkyError, SkyResult};

/******************************************************************************/

/// Vertex attribute slots shared with the sky shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexAttr {
    Coord,
    Colour,
    Normal,
    TexCoord,
}

impl VertexAttr {
    pub fn index(&self) -> u32 {
        match self {
            Self::Coord => 0,
            Self::Colour => 1,
            Self::Normal => 2,
            Self::TexCoord => 3,
        }
    }

    pub fn components(&self) -> usize {
        match self {
            Self::Coord => 3,
            Self::Colour => 4,
            Self::Normal => 3,
            Self::TexCoord => 2,
        }
    }
}

/// GPU side of a sky: owns buffer objects and turns draw requests into
/// primitives. Buffers are handed back through `release`.
pub trait SkyBackend {
    type Buffer;

    fn upload_vertices(&mut self, data: &[f32]) -> SkyResult<Self::Buffer>;
    fn upload_indices(&mut self, data: &[u32]) -> SkyResult<Self::Buffer>;
    fn release(&mut self, buffer: Self::Buffer);

    fn bind_attribute(&mut self, attr: VertexAttr, buffer: &Self::Buffer);
    fn disable_attribute(&mut self, attr: VertexAttr);
    fn bind_indices(&mut self, buffer: &Self::Buffer);
    fn front_face_ccw(&mut self);
    fn draw(&mut self, call: &DrawCall);
}

/******************************************************************************/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    UploadVertices { id: BufferId, len: usize },
    UploadIndices { id: BufferId, len: usize },
    Release(BufferId),
    BindAttribute(VertexAttr, BufferId),
    DisableAttribute(VertexAttr),
    BindIndices(BufferId),
    FrontFaceCcw,
    Draw(DrawCall),
}

/// In-memory backend that keeps every uploaded payload and logs each request.
/// Used for headless dumps and tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
    vertex_data: Vec<(BufferId, Vec<f32>)>,
    index_data: Vec<(BufferId, Vec<u32>)>,
    next_id: u32,
    allocation_limit: Option<usize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every allocation after the first `limit` ones.
    pub fn with_allocation_limit(limit: usize) -> Self {
        Self{allocation_limit: Some(limit), ..Self::default()}
    }

    pub fn set_allocation_limit(&mut self, limit: Option<usize>) {
        self.allocation_limit = limit;
    }

    pub fn live_buffers(&self) -> Vec<BufferId> {
        let mut ids: Vec<BufferId> = self.vertex_data.iter().map(|(id, _)| *id)
            .chain(self.index_data.iter().map(|(id, _)| *id))
            .collect();
        ids.sort();
        ids
    }

    pub fn vertex_data(&self, id: BufferId) -> Option<&[f32]> {
        self.vertex_data.iter().find(|(i, _)| *i == id).map(|(_, d)| d.as_slice())
    }

    pub fn index_data(&self, id: BufferId) -> Option<&[u32]> {
        self.index_data.iter().find(|(i, _)| *i == id).map(|(_, d)| d.as_slice())
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.calls.iter().filter_map(|c| match c {
            BackendCall::Draw(call) => Some(*call),
            _ => None,
        }).collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn alloc_id(&mut self) -> SkyResult<BufferId> {
        if let Some(limit) = self.allocation_limit {
            if self.next_id as usize >= limit {
                return Err(SkyError::BackendAllocation(format!("Allocation limit {limit} reached")));
            }
        }
        self.next_id += 1;
        Ok(BufferId(self.next_id))
    }
}

impl SkyBackend for RecordingBackend {
    type Buffer = BufferId;

    fn upload_vertices(&mut self, data: &[f32]) -> SkyResult<BufferId> {
        let id = self.alloc_id()?;
        self.vertex_data.push((id, data.to_vec()));
        self.calls.push(BackendCall::UploadVertices{id, len: data.len()});
        Ok(id)
    }

    fn upload_indices(&mut self, data: &[u32]) -> SkyResult<BufferId> {
        let id = self.alloc_id()?;
        self.index_data.push((id, data.to_vec()));
        self.calls.push(BackendCall::UploadIndices{id, len: data.len()});
        Ok(id)
    }

    fn release(&mut self, buffer: BufferId) {
        self.vertex_data.retain(|(id, _)| *id != buffer);
        self.index_data.retain(|(id, _)| *id != buffer);
        self.calls.push(BackendCall::Release(buffer));
    }

    fn bind_attribute(&mut self, attr: VertexAttr, buffer: &BufferId) {
        self.calls.push(BackendCall::BindAttribute(attr, *buffer));
    }

    fn disable_attribute(&mut self, attr: VertexAttr) {
        self.calls.push(BackendCall::DisableAttribute(attr));
    }

    fn bind_indices(&mut self, buffer: &BufferId) {
        self.calls.push(BackendCall::BindIndices(*buffer));
    }

    fn front_face_ccw(&mut self) {
        self.calls.push(BackendCall::FrontFaceCcw);
    }

    fn draw(&mut self, call: &DrawCall) {
        log::trace!("draw {:?}", call);
        self.calls.push(BackendCall::Draw(*call));
    }
}

/******************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_slots() {
        let attrs = [VertexAttr::Coord, VertexAttr::Colour, VertexAttr::Normal, VertexAttr::TexCoord];
        let slots: Vec<(u32, usize)> = attrs.iter().map(|a| (a.index(), a.components())).collect();
        assert_eq!(slots, vec![(0, 3), (1, 4), (2, 3), (3, 2)]);
    }

    #[test]
    fn recording_release_drops_payload() {
        let mut backend = RecordingBackend::new();
        let a = backend.upload_vertices(&[1.0, 2.0, 3.0]).unwrap();
        let b = backend.upload_indices(&[0, 1, 2]).unwrap();
        assert_eq!(backend.live_buffers(), vec![a, b]);
        assert_eq!(backend.vertex_data(a), Some(&[1.0, 2.0, 3.0][..]));
        backend.release(a);
        assert_eq!(backend.live_buffers(), vec![b]);
        assert_eq!(backend.vertex_data(a), None);
        assert_eq!(backend.index_data(b), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn recording_allocation_limit() {
        let mut backend = RecordingBackend::with_allocation_limit(1);
        assert!(backend.upload_vertices(&[0.0]).is_ok());
        assert!(matches!(backend.upload_indices(&[0]), Err(SkyError::BackendAllocation(_))));
    }
}
