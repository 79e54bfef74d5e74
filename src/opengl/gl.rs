use std::rc::Rc;
use std::ffi::CStr;

use gl46::*;
use glutin::PossiblyCurrent;

use crate::error::{SkyError, SkyResult};

/******************************************************************************/

pub type GlCtx = Rc<GlFns>;

pub fn new_gl_ctx(gl_context: &glutin::Context<PossiblyCurrent>) -> GlCtx {
    unsafe {
        match GlFns::load_from(&|symbol| gl_context.get_proc_address( &CStr::from_ptr(symbol as *const i8).to_string_lossy() )) {
            Err(e) =>
                panic!("Cannot init GL {e:?}"),
            Ok(gl) => {
                Rc::new(gl)
            }
        }
    }
}

pub fn gl_error_panic(gl: &GlCtx, text: &str) {
    if let Err(s) = gl_get_error(gl) { panic!("{:?} - {:?}", s, text) }
}

pub fn gl_get_error(gl: &GlCtx) -> Result<(), GLenum> {
    unsafe {
        let error = gl.GetError();
        if error != GL_NO_ERROR {
            Err(error)
        } else {
            Ok(())
        }
    }
}

/// Maps a pending GL error to an allocation failure of `what`.
pub fn gl_check_alloc(gl: &GlCtx, what: &str) -> SkyResult<()> {
    match gl_get_error(gl) {
        Ok(()) => Ok(()),
        Err(error) if error == GL_OUT_OF_MEMORY => Err(SkyError::BackendAllocation(format!("{what}: out of GPU memory"))),
        Err(error) => Err(SkyError::BackendAllocation(format!("{what}: GL error {error:?}"))),
    }
}

pub fn gl_clear_error(gl: &GlCtx) {
    unsafe {
        gl.GetError();
    }
}

/******************************************************************************/
