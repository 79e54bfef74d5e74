use crate::backend::{SkyBackend, VertexAttr};
use crate::draw::sky_draw_calls;
use crate::error::{SkyError, SkyResult};
use crate::geometry::sky_sphere::gen_sky;
use crate::model::{flatten, Resolution, SkyMesh};

/******************************************************************************/

struct SkyBuffers<T> {
    coords: Option<T>,
    normals: Option<T>,
    colours: Option<T>,
    tex_coords: Option<T>,
    elements: Option<T>,
}

impl<T> SkyBuffers<T> {
    fn empty() -> Self {
        Self{coords: None, normals: None, colours: None, tex_coords: None, elements: None}
    }

    fn release<B: SkyBackend<Buffer = T>>(&mut self, backend: &mut B) {
        let buffers = [self.coords.take(), self.normals.take(), self.colours.take(), self.tex_coords.take(), self.elements.take()];
        for buffer in buffers.into_iter().flatten() {
            backend.release(buffer);
        }
    }
}

/// Sky sphere drawn from the inside: pole fans plus latitude strips over one
/// shared index buffer.
pub struct Sky<B: SkyBackend> {
    backend: B,
    use_texture: bool,
    resolution: Option<Resolution>,
    buffers: SkyBuffers<B::Buffer>,
}

impl<B: SkyBackend> Sky<B> {
    pub fn new(backend: B, use_texture: bool) -> Self {
        Self{backend, use_texture, resolution: None, buffers: SkyBuffers::empty()}
    }

    pub fn use_texture(&self) -> bool {
        self.use_texture
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Generates the mesh and replaces any previously uploaded buffers.
    /// An invalid resolution leaves the current buffers untouched.
    pub fn build(&mut self, lats: u32, longs: u32) -> SkyResult<()> {
        let resolution = Resolution::new(lats, longs)?;
        let mesh = gen_sky(&resolution);

        self.resolution = None;
        self.buffers.release(&mut self.backend);

        if let Err(error) = self.upload(&mesh) {
            log::warn!("Sky upload failed for {lats}x{longs}: {error}");
            self.buffers.release(&mut self.backend);
            return Err(error);
        }
        self.resolution = Some(resolution);
        Ok(())
    }

    fn upload(&mut self, mesh: &SkyMesh) -> SkyResult<()> {
        let backend = &mut self.backend;
        let buffers = &mut self.buffers;
        buffers.coords = Some(backend.upload_vertices(&flatten::<_, 3>(&mesh.positions))?);
        buffers.normals = Some(backend.upload_vertices(&flatten::<_, 3>(&mesh.normals))?);
        buffers.colours = Some(backend.upload_vertices(&flatten::<_, 4>(&mesh.colours))?);
        if self.use_texture {
            buffers.tex_coords = Some(backend.upload_vertices(&flatten::<_, 2>(&mesh.tex_coords))?);
        }
        buffers.elements = Some(backend.upload_indices(&mesh.indices)?);
        log::debug!("Sky buffers uploaded: {} vertices, {} indices, texture {}"
                    , mesh.vertex_num(), mesh.index_num(), self.use_texture);
        Ok(())
    }

    pub fn render(&mut self) -> SkyResult<()> {
        let resolution = self.resolution.ok_or(SkyError::NotBuilt)?;
        let buffers = &self.buffers;
        let (Some(coords), Some(normals), Some(colours), Some(elements)) =
            (&buffers.coords, &buffers.normals, &buffers.colours, &buffers.elements) else {
            return Err(SkyError::NotBuilt);
        };

        let backend = &mut self.backend;
        backend.bind_attribute(VertexAttr::Coord, coords);
        backend.bind_attribute(VertexAttr::Normal, normals);
        backend.bind_attribute(VertexAttr::Colour, colours);
        match &buffers.tex_coords {
            Some(tex_coords) if self.use_texture => backend.bind_attribute(VertexAttr::TexCoord, tex_coords),
            _ => backend.disable_attribute(VertexAttr::TexCoord),
        }
        backend.front_face_ccw();
        backend.bind_indices(elements);
        for call in sky_draw_calls(&resolution) {
            backend.draw(&call);
        }
        Ok(())
    }
}

impl<B: SkyBackend> Drop for Sky<B> {
    fn drop(&mut self) {
        self.buffers.release(&mut self.backend);
    }
}

/******************************************************************************/
