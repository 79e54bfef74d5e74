use std::ffi::c_void;
use std::os::raw::c_uint;
use std::path::Path;

use gl46::*;

use crate::error::{SkyError, SkyResult};
use crate::opengl::gl::{GlCtx, gl_error_panic, gl_clear_error, gl_get_error};

/******************************************************************************/

#[derive(Copy, Clone)]
pub struct TextureParams {
    pub target: GLenum,
    pub internal_format: GLenum,
    pub format: GLenum,
    pub data_type: GLenum,
    pub nearest: bool,
}

pub struct GlTexture {
    gl: GlCtx,
    handle: c_uint,
    unit: c_uint,
}

impl GlTexture {
    pub fn new_2d<V>(gl: &GlCtx, unit: c_uint, params: &TextureParams, width: usize, height: usize, data: &[V]) -> SkyResult<Self> {
        let mut handle: c_uint = 0;
        unsafe {
            gl.CreateTextures(params.target, 1, &mut handle);
        }
        if handle == 0 {
            return Err(SkyError::Texture("Cannot create texture handle".to_owned()));
        }
        let texture = Self{gl: gl.clone(), handle, unit};
        let width = width as i32;
        let height = height as i32;
        let filter = if params.nearest { GL_NEAREST.0 as i32 } else { GL_LINEAR.0 as i32 };
        let wrap_s = GL_REPEAT.0 as i32;
        let wrap_t = GL_CLAMP_TO_EDGE.0 as i32;
        unsafe {
            gl.TextureStorage2D(texture.handle, 1, params.internal_format, width, height);
            if let Err(error) = gl_get_error(gl) {
                return Err(SkyError::Texture(format!("TextureStorage2D error = {error:?} {width}x{height}")))
            }
            let ptr = data.as_ptr() as *const c_void;
            gl.TextureSubImage2D(texture.handle, 0, 0, 0, width, height, params.format, params.data_type, ptr);
            if let Err(error) = gl_get_error(gl) {
                return Err(SkyError::Texture(format!("TextureSubImage2D error = {error:?}")))
            }
            gl.TextureParameteriv(texture.handle, GL_TEXTURE_MIN_FILTER, &filter);
            gl.TextureParameteriv(texture.handle, GL_TEXTURE_MAG_FILTER, &filter);
            gl.TextureParameteriv(texture.handle, GL_TEXTURE_WRAP_S, &wrap_s);
            gl.TextureParameteriv(texture.handle, GL_TEXTURE_WRAP_T, &wrap_t);
            if let Err(error) = gl_get_error(gl) {
                return Err(SkyError::Texture(format!("TextureParameteriv error = {error:?}")))
            }
        }
        Ok(texture)
    }

    /// Loads an image as RGBA8, flipped so its top row lands at v = 1.
    pub fn from_image(gl: &GlCtx, unit: c_uint, path: &Path) -> SkyResult<Self> {
        let image = image::open(path)
            .map_err(|e| SkyError::Texture(format!("Cannot load {path:?}: {e}")))?
            .flipv()
            .to_rgba8();
        let (width, height) = image.dimensions();
        log::debug!("Sky texture {:?}: {}x{}", path, width, height);
        let params = TextureParams{target: GL_TEXTURE_2D, internal_format: GL_RGBA8, format: GL_RGBA, data_type: GL_UNSIGNED_BYTE, nearest: false};
        Self::new_2d(gl, unit, &params, width as usize, height as usize, image.as_raw().as_slice())
    }

    pub fn bind(&self) {
        let gl = &self.gl;
        unsafe {
            gl_clear_error(gl);
            gl.BindTextureUnit(self.unit, self.handle);
        }
        gl_error_panic(gl, &format!("BindTextureUnit = {:?}", self.handle));
    }
}

impl Drop for GlTexture {
    fn drop(&mut self) {
        let gl = &self.gl;
        unsafe {
            gl.DeleteTextures(1, &self.handle);
        }
        self.handle = 0;
    }
}
