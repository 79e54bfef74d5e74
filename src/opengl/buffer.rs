use std::ffi::c_void;
use std::os::raw::c_uint;

use gl46::*;

use crate::error::{SkyError, SkyResult};
use crate::opengl::gl::{GlCtx, gl_check_alloc, gl_error_panic};

/******************************************************************************/

/// Immutable-content buffer object filled once at creation.
pub struct GlBufferStatic {
    gl: GlCtx,
    handle: c_uint,
    size: usize,
    buffer_type: GLenum,
}

impl GlBufferStatic {
    pub fn new<T>(gl: &GlCtx, buffer_type: GLenum, data: &[T]) -> SkyResult<Self> {
        let mut handle: c_uint = 0;
        unsafe {
            gl.CreateBuffers(1, &mut handle);
        }
        if handle == 0 {
            return Err(SkyError::BackendAllocation("Cannot create buffer handle".to_owned()));
        }
        let mut buffer = Self{gl: gl.clone(), handle, size: 0, buffer_type};
        buffer.store(data)?;
        Ok(buffer)
    }

    fn store<T>(&mut self, data: &[T]) -> SkyResult<()> {
        let gl = &self.gl;
        let size = std::mem::size_of_val(data);
        unsafe {
            let ptr = data.as_ptr() as *const c_void;
            gl.NamedBufferData(self.handle, size as isize, ptr, GL_STATIC_DRAW);
        }
        gl_check_alloc(gl, &format!("Buffer {:?} of {size} bytes", self.handle))?;
        self.size = size;
        log::debug!("Buffer {:?} ({:?}) stored {} bytes", self.handle, self.buffer_type, size);
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bind(&self) {
        let gl = &self.gl;
        unsafe {
            gl.BindBuffer(self.buffer_type, self.handle);
        }
        gl_error_panic(gl, "Cannot bind buffer");
    }

    pub fn unbind(&self) {
        let gl = &self.gl;
        unsafe {
            gl.BindBuffer(self.buffer_type, 0);
        }
    }
}

impl Drop for GlBufferStatic {
    fn drop(&mut self) {
        let gl = &self.gl;
        let handle = self.handle;
        unsafe {
            gl.DeleteBuffers(1, &handle);
        }
        self.handle = 0;
        self.size = 0;
    }
}
