use std::ffi::{c_char, CString};
use std::marker::PhantomData;

use gl::types::{GLint, GLsizei};

use crate::context::{clamp_log, GlContext, ProgramId, ShaderId, ShaderStage};

/// The context current on this thread, reached through the `gl` crate's
/// loaded function pointers.
///
/// `gl::load_with` must have been called with a current context before any
/// method is used. The raw pointer marker keeps the handle on its thread.
#[derive(Copy, Clone, Debug)]
pub struct NativeGl {
    _thread_bound: PhantomData<*const ()>,
}

impl NativeGl {
    /// # Safety
    ///
    /// A context must be current on the calling thread and the `gl` function
    /// pointers must be loaded for it.
    pub unsafe fn current() -> Self {
        Self {
            _thread_bound: PhantomData,
        }
    }
}

fn read_log(buf: Vec<u8>, written: GLsizei, max_len: usize) -> String {
    let written = (written.max(0) as usize).min(buf.len());
    clamp_log(&String::from_utf8_lossy(&buf[..written]), max_len)
}

fn c_name(name: &str) -> Option<CString> {
    match CString::new(name) {
        Ok(name) => Some(name),
        Err(_) => {
            log::warn!("binding name {name:?} contains a NUL byte, skipped");
            None
        }
    }
}

impl GlContext for NativeGl {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId {
        ShaderId(unsafe { gl::CreateShader(stage.gl_enum()) })
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        // explicit length, the source does not need a terminator
        let ptr = source.as_ptr() as *const c_char;
        let Some(len) = source_len(source.len()) else {
            log::error!("shader source of {} bytes is too long", source.len());
            return;
        };

        unsafe {
            gl::ShaderSource(shader.0, 1, (&ptr) as *const *const c_char, &len);
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe { gl::CompileShader(shader.0) }
    }

    fn compile_status(&self, shader: ShaderId) -> bool {
        let mut success: GLint = 0;
        unsafe { gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut success) }
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: ShaderId, max_len: usize) -> String {
        let mut len: GLint = 0;
        unsafe { gl::GetShaderiv(shader.0, gl::INFO_LOG_LENGTH, &mut len) };

        let cap = (len.max(0) as usize).min(max_len);
        if cap == 0 {
            return String::new();
        }

        let mut buf = vec![0_u8; cap];
        let mut written: GLsizei = 0;

        unsafe {
            gl::GetShaderInfoLog(
                shader.0,
                cap as GLsizei,
                &mut written,
                buf.as_mut_ptr() as *mut c_char,
            );
        }

        read_log(buf, written, max_len)
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe { gl::DeleteShader(shader.0) }
    }

    fn create_program(&self) -> ProgramId {
        ProgramId(unsafe { gl::CreateProgram() })
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { gl::AttachShader(program.0, shader.0) }
    }

    fn bind_attrib_location(&self, program: ProgramId, index: u32, name: &str) {
        if let Some(name) = c_name(name) {
            unsafe { gl::BindAttribLocation(program.0, index, name.as_ptr()) }
        }
    }

    fn bind_frag_data_location(&self, program: ProgramId, index: u32, name: &str) {
        if let Some(name) = c_name(name) {
            unsafe { gl::BindFragDataLocation(program.0, index, name.as_ptr()) }
        }
    }

    fn link_program(&self, program: ProgramId) {
        unsafe { gl::LinkProgram(program.0) }
    }

    fn link_status(&self, program: ProgramId) -> bool {
        let mut success: GLint = 0;
        unsafe { gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut success) }
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: ProgramId, max_len: usize) -> String {
        let mut len: GLint = 0;
        unsafe { gl::GetProgramiv(program.0, gl::INFO_LOG_LENGTH, &mut len) };

        let cap = (len.max(0) as usize).min(max_len);
        if cap == 0 {
            return String::new();
        }

        let mut buf = vec![0_u8; cap];
        let mut written: GLsizei = 0;

        unsafe {
            gl::GetProgramInfoLog(
                program.0,
                cap as GLsizei,
                &mut written,
                buf.as_mut_ptr() as *mut c_char,
            );
        }

        read_log(buf, written, max_len)
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe { gl::DeleteProgram(program.0) }
    }
}

/// Byte length as passed to `glShaderSource`, `None` past `GLint::MAX`.
fn source_len(len: usize) -> Option<GLint> {
    GLint::try_from(len).ok()
}
