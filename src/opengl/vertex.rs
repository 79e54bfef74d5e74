use std::ptr::null;
use std::os::raw::c_uint;

use gl46::*;

use crate::opengl::gl::{GlCtx, gl_get_error, gl_error_panic};
use crate::opengl::buffer::GlBufferStatic;

/******************************************************************************/

pub struct GlVertexAttr {
    index: c_uint,
    elems: usize,
    elem_type: GLenum,
}

impl GlVertexAttr {
    pub fn new(index: c_uint, elems: usize, elem_type: GLenum) -> Self {
        Self{index, elems, elem_type}
    }
}

pub struct GlVao {
    gl: GlCtx,
    handle: c_uint,
}

impl GlVao {
    pub fn new(gl: &GlCtx) -> Result<Self, String> {
        let mut handle: c_uint = 0;
        unsafe {
            gl.GenVertexArrays(1, &mut handle);
        }
        if handle == 0 {
            return Err("Cannot create VAO handle".to_owned());
        }
        Ok(Self{gl: gl.clone(), handle})
    }

    pub fn bind(&self) {
        let gl = &self.gl;
        gl.BindVertexArray(self.handle);
        gl_error_panic(gl, &format!("Cannot bind VAO {:?}", self.handle));
    }

    /// Sources `attr` from the start of `buffer`, tightly packed.
    pub fn set_attr(&self, attr: &GlVertexAttr, buffer: &GlBufferStatic) -> Result<(), String> {
        let gl = &self.gl;
        self.bind();
        buffer.bind();
        unsafe {
            gl.VertexAttribPointer(
                attr.index,
                attr.elems as i32,
                attr.elem_type,
                0 /*GL_FALSE*/,
                0,
                null()
            );
            if let Err(error) = gl_get_error(gl) {
                return Err(format!("VertexAttribPointer error = {error:?}"))
            }
            gl.EnableVertexAttribArray(attr.index);
            if let Err(error) = gl_get_error(gl) {
                return Err(format!("EnableVertexAttribArray error = {error:?}"))
            }
        }
        buffer.unbind();
        Ok(())
    }

    pub fn disable_attr(&self, index: c_uint) {
        let gl = &self.gl;
        self.bind();
        unsafe {
            gl.DisableVertexAttribArray(index);
        }
    }

    /// Element buffer binding is VAO state, so keep it bound after return.
    pub fn set_elements(&self, buffer: &GlBufferStatic) {
        self.bind();
        buffer.bind();
    }
}

impl Drop for GlVao {
    fn drop(&mut self) {
        let gl = &self.gl;
        let handle = self.handle;
        unsafe {
            gl.DeleteVertexArrays(1, &handle);
        }
        self.handle = 0;
    }
}
