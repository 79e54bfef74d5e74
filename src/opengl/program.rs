use std::rc::Rc;
use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::Path;

use std::ffi::CStr;
use std::os::raw::{c_uint, c_int};

use num_traits::Num;
use num_traits::cast::{ToPrimitive, NumCast};

use gl46::*;

use crate::error::{SkyError, SkyResult};
use crate::opengl::gl::{GlCtx, gl_get_error};
use crate::opengl::uniform::GlUniform;

/******************************************************************************/

fn c_str_to_string<T>(c_str: &[u8], len: T) -> String
where
    T: Num + ToPrimitive
{
    match <usize as NumCast>::from(len) {
        None | Some(0) => "".to_string(),
        Some(i) => {
            let bytes = &c_str[..i.min(c_str.len())];
            match CStr::from_bytes_until_nul(bytes) {
                Ok(s) => s.to_string_lossy().into_owned(),
                Err(_) => String::from_utf8_lossy(bytes).into_owned(),
            }
        }
    }
}

fn get_log<F>(gl: &GlCtx, handle: c_uint, max_size: usize, f: F) -> Result<String, String>
    where F: Fn(c_uint, i32, *mut c_int, *mut u8) {
    let mut log_data = vec![0u8; max_size];
    let mut log_len = 0;
    f(handle, log_data.len() as i32, &mut log_len, log_data.as_mut_ptr());
    if let Err(error) = gl_get_error(gl) {
        return Err(format!("Cannot get log {error:?}"));
    }
    Ok(c_str_to_string(&log_data, log_len))
}

fn get_shader_log(gl: &GlCtx, shader: c_uint) -> Result<String, String> {
    let max_size = get_shader_param(gl, shader, GL_INFO_LOG_LENGTH)?;
    if max_size < 0 {
        return Err(format!("Max size of shader log is negative {max_size:?}"));
    }
    get_log(gl, shader, max_size as usize, |a, b, c, d| unsafe { gl.GetShaderInfoLog(a, b, c, d) } )
}

pub fn get_shader_param(gl: &GlCtx, shader: c_uint, param: GLenum) -> Result<i32, String> {
    let mut val: c_int = 0;
    unsafe {
        gl.GetShaderiv(shader, param, &mut val);
        if let Err(error) = gl_get_error(gl) {
            return Err(format!("Cannot get shader param {param:?} for {shader:?}: {error:?}"));
        }
    }
    Ok(val as i32)
}

/******************************************************************************/

/// Compiles GLSL source text into an already created shader object.
pub fn compile_source(gl: &GlCtx, shader: c_uint, source: &str) -> Result<(), String> {
    let ptr = source.as_ptr();
    let len = source.len() as c_int;
    unsafe {
        gl.ShaderSource(shader, 1, &ptr, &len);
    }
    if let Err(error) = gl_get_error(gl) {
        return Err(format!("Cannot set source for {shader:?}: {error:?}"));
    }
    gl.CompileShader(shader);
    let success = get_shader_param(gl, shader, GL_COMPILE_STATUS)?;
    if success != 1 {
        let s = get_shader_log(gl, shader)?;
        return Err(format!("Cannot compile shader: {s}"));
    }
    Ok(())
}

pub struct GlShader {
    name: String,
    shader: c_uint,
    gl: GlCtx,
}

impl GlShader {
    pub fn from_source(name: &str, source: &str, gl: &GlCtx, shader_type: GLenum) -> SkyResult<GlShader> {
        let shader = gl.CreateShader(shader_type);
        if shader == 0 {
            return Err(SkyError::Shader(format!("Cannot create shader {name:?}: {:?}", gl_get_error(gl))));
        }
        let shader = GlShader{name: name.to_string(), shader, gl: gl.clone()};
        compile_source(gl, shader.shader, source)
            .map_err(|e| SkyError::Shader(format!("{name}: {e}")))?;
        Ok(shader)
    }

    pub fn from_file(name: &str, path: &Path, gl: &GlCtx, shader_type: GLenum) -> SkyResult<GlShader> {
        let source = fs::read_to_string(path)
            .map_err(|e| SkyError::Shader(format!("Cannot read {path:?}: {e}")))?;
        Self::from_source(name, &source, gl, shader_type)
    }
}

impl Drop for GlShader {
    fn drop(&mut self) {
        self.gl.DeleteShader(self.shader);
        self.shader = 0;
    }
}

/******************************************************************************/

pub struct GlEntity {
    index: u32,
    gl_type: GLenum,
    name: String,
    size: c_int,
}

impl fmt::Display for GlEntity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {:?}, {}, {})", self.index, self.gl_type, self.name, self.size)
    }
}

pub struct ProgramInfo {
    attrs: Vec<GlEntity>,
    shaders: u16,
}

impl fmt::Display for ProgramInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Attrs({}):", self.attrs.len())?;
        for attr in &self.attrs {
            writeln!(f, "{}", attr)?;
        }
        writeln!(f, "shaders: {}", self.shaders)
    }
}

struct UniformHolder {
    uniform: Rc<RefCell<dyn GlUniform>>,
    index: i32,
}

pub struct GlProgram {
    gl: GlCtx,
    handle: c_uint,
    uniforms: Vec<UniformHolder>,
}

impl GlProgram {
    pub fn new(gl: &GlCtx) -> SkyResult<GlProgram> {
        let handle = gl.CreateProgram();
        if handle == 0 {
            return Err(SkyError::Shader("Cannot create program".to_string()));
        }
        Ok(GlProgram{gl: gl.clone(), handle, uniforms: Vec::new()})
    }

    pub fn from_files(gl: &GlCtx, vert: &Path, frag: &Path) -> SkyResult<GlProgram> {
        let mut program = Self::new(gl)?;
        let shaders = vec![
            GlShader::from_file("vert", vert, gl, GL_VERTEX_SHADER)?,
            GlShader::from_file("frag", frag, gl, GL_FRAGMENT_SHADER)?,
        ];
        program.attach_shaders(shaders)?;
        Ok(program)
    }

    pub fn use_program(&self) {
        let gl = &self.gl;
        gl.UseProgram(self.handle);
        self.bind_uniforms();
    }

    pub fn bind_uniforms(&self) {
        let gl = &self.gl;
        for holder in &self.uniforms {
            holder.uniform.borrow().bind(gl, holder.index);
        }
    }

    /// Links the program. Shader objects are flagged for deletion on return,
    /// GL keeps them alive while attached.
    pub fn attach_shaders(&mut self, shaders: Vec<GlShader>) -> SkyResult<()> {
        let gl = &self.gl;
        for shader in &shaders {
            gl.AttachShader(self.handle, shader.shader);
            if let Err(error) = gl_get_error(gl) {
                return Err(SkyError::Shader(format!("Cannot attach shader {:?}: {:?}", shader.name, error)));
            }
        }
        gl.LinkProgram(self.handle);
        if let Err(error) = gl_get_error(gl) {
            return Err(SkyError::Shader(format!("Cannot link program {error:?}")));
        }

        let success = self.get_program_value(GL_LINK_STATUS).map_err(SkyError::Shader)?;
        if success != 1 {
            let log = self.get_log().unwrap_or_default();
            return Err(SkyError::Shader(format!("Cannot link program: {log}")));
        }
        Ok(())
    }

    pub fn set_uniform(&mut self, index: i32, uniform: Rc<RefCell<dyn GlUniform>>) {
        let holder = UniformHolder{uniform, index};
        self.uniforms.push(holder);
    }

    pub fn get_log(&self) -> Result<String, String> {
        let gl = &self.gl;
        let max_size = self.get_program_value(GL_INFO_LOG_LENGTH)?;
        if max_size < 0 {
            return Err(format!("Max size of program log is negative {max_size:?}"));
        }
        get_log(gl, self.handle, max_size as usize, |a, b, c, d| unsafe { gl.GetProgramInfoLog(a, b, c, d) })
    }

    pub fn get_program_value(&self, attr: GLenum) -> Result<i32, String> {
        let gl = &self.gl;
        unsafe {
            let mut val: c_int = 0;
            gl.GetProgramiv(self.handle, attr, &mut val);
            if let Err(error) = gl_get_error(gl) {
                Err(format!("GetProgramiv failed for {attr:?} with error {error:?}"))
            } else {
                Ok(val as i32)
            }
        }
    }

    pub fn get_info(&self) -> Result<ProgramInfo, String> {
        let gl = &self.gl;
        let active_attrs = self.get_program_value(GL_ACTIVE_ATTRIBUTES)?;
        let max_attr_len = self.get_program_value(GL_ACTIVE_ATTRIBUTE_MAX_LENGTH)?;
        if max_attr_len < 0 {
            return Err(format!("GL_ACTIVE_ATTRIBUTE_MAX_LENGTH is negative {max_attr_len:?}"));
        }

        let mut name = vec![0u8; max_attr_len as usize + 1];
        let mut attrs = Vec::new();
        for i in 0..active_attrs {
            let mut length: c_int = 0;
            let mut size: c_int = 0;
            let mut gl_type: GLenum = gl46::GLenum(0);
            unsafe {
                gl.GetActiveAttrib(self.handle
                                   , i as u32
                                   , name.len() as i32
                                   , &mut length
                                   , &mut size
                                   , &mut gl_type
                                   , name.as_mut_ptr());
                let index = gl.GetAttribLocation(self.handle, name.as_ptr());
                attrs.push(GlEntity{index: index as u32, gl_type, name: c_str_to_string(&name, length + 1), size});
            }
        }

        let shaders = self.get_program_value(GL_ATTACHED_SHADERS)?;
        Ok(ProgramInfo{attrs, shaders: shaders as u16})
    }
}

impl Drop for GlProgram {
    fn drop(&mut self) {
        self.gl.DeleteProgram(self.handle);
        self.handle = 0;
    }
}

/******************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_str_conversion() {
        assert_eq!(c_str_to_string(b"coord\0\0\0", 6), "coord");
        assert_eq!(c_str_to_string(b"coord\0", 0), "");
        assert_eq!(c_str_to_string(b"abc", 3), "abc");
    }
}
