use std::fmt::{Display, Formatter};

/// Upper bound for info logs read back from the context, in bytes.
pub const INFO_LOG_LEN: usize = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    pub fn gl_enum(&self) -> gl::types::GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

impl ProgramId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// The subset of a GL context needed to build shader programs.
///
/// Implementors are cheap handles to one context; clones address the same
/// objects. All calls must happen on the thread that owns the context, and
/// calls against one context must not interleave.
pub trait GlContext: Clone {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn compile_status(&self, shader: ShaderId) -> bool;
    /// Returns at most `max_len` bytes of the shader info log.
    fn shader_info_log(&self, shader: ShaderId, max_len: usize) -> String;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> ProgramId;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn bind_attrib_location(&self, program: ProgramId, index: u32, name: &str);
    fn bind_frag_data_location(&self, program: ProgramId, index: u32, name: &str);
    fn link_program(&self, program: ProgramId);
    fn link_status(&self, program: ProgramId) -> bool;
    /// Returns at most `max_len` bytes of the program info log.
    fn program_info_log(&self, program: ProgramId, max_len: usize) -> String;
    fn delete_program(&self, program: ProgramId);
}

/// Cuts `log` to at most `max_len` bytes on a char boundary and trims
/// trailing whitespace and NULs.
pub fn clamp_log(log: &str, max_len: usize) -> String {
    let mut end = log.len().min(max_len);

    while !log.is_char_boundary(end) {
        end -= 1;
    }

    log[..end]
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}
