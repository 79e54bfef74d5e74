use std::ffi::c_void;

use gl46::*;

use crate::backend::{SkyBackend, VertexAttr};
use crate::draw::{DrawCall, Primitive};
use crate::error::{SkyError, SkyResult};
use crate::opengl::gl::{GlCtx, gl_error_panic};
use crate::opengl::buffer::GlBufferStatic;
use crate::opengl::vertex::{GlVao, GlVertexAttr};

/******************************************************************************/

/// OpenGL 4.6 sky backend. Attribute and element bindings live in its VAO.
pub struct GlSkyBackend {
    gl: GlCtx,
    vao: GlVao,
}

impl GlSkyBackend {
    pub fn new(gl: &GlCtx) -> SkyResult<Self> {
        let vao = GlVao::new(gl).map_err(SkyError::BackendAllocation)?;
        Ok(Self{gl: gl.clone(), vao})
    }
}

fn gl_primitive(primitive: Primitive) -> GLenum {
    match primitive {
        Primitive::TriangleFan => GL_TRIANGLE_FAN,
        Primitive::TriangleStrip => GL_TRIANGLE_STRIP,
    }
}

impl SkyBackend for GlSkyBackend {
    type Buffer = GlBufferStatic;

    fn upload_vertices(&mut self, data: &[f32]) -> SkyResult<GlBufferStatic> {
        GlBufferStatic::new(&self.gl, GL_ARRAY_BUFFER, data)
    }

    fn upload_indices(&mut self, data: &[u32]) -> SkyResult<GlBufferStatic> {
        GlBufferStatic::new(&self.gl, GL_ELEMENT_ARRAY_BUFFER, data)
    }

    fn release(&mut self, buffer: GlBufferStatic) {
        log::debug!("Release buffer of {} bytes", buffer.size());
        drop(buffer);
    }

    fn bind_attribute(&mut self, attr: VertexAttr, buffer: &GlBufferStatic) {
        let gl_attr = GlVertexAttr::new(attr.index(), attr.components(), GL_FLOAT);
        if let Err(error) = self.vao.set_attr(&gl_attr, buffer) {
            panic!("Cannot bind sky attribute {attr:?}: {error}");
        }
    }

    fn disable_attribute(&mut self, attr: VertexAttr) {
        self.vao.disable_attr(attr.index());
    }

    fn bind_indices(&mut self, buffer: &GlBufferStatic) {
        self.vao.set_elements(buffer);
    }

    fn front_face_ccw(&mut self) {
        let gl = &self.gl;
        unsafe {
            gl.FrontFace(GL_CCW);
        }
    }

    fn draw(&mut self, call: &DrawCall) {
        let gl = &self.gl;
        log::trace!("draw {:?}", call);
        self.vao.bind();
        unsafe {
            gl.DrawElements(gl_primitive(call.primitive)
                            , call.count as i32
                            , GL_UNSIGNED_INT
                            , call.offset as *const c_void);
        }
        gl_error_panic(gl, "Sky draw failed");
    }
}
