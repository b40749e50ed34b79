use std::ffi::CString;

use crate::native::NativeGl;
use crate::program::Program;

/// Location of a uniform in a linked native program.
///
/// Setters write to the program currently in use, see
/// [`GlRenderer::use_program`](crate::renderer::GlRenderer::use_program).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Uniform {
    location: i32,
}

impl Uniform {
    /// `None` when the program has no active uniform called `name`.
    pub fn find(program: &Program<NativeGl>, name: &str) -> Option<Self> {
        let c_name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program.get_id(), c_name.as_ptr()) };

        if location < 0 {
            log::debug!("uniform {name} not active in program {}", program.get_id());
            return None;
        }

        Some(Self { location })
    }

    pub fn set_i32(&self, value: i32) {
        unsafe { gl::Uniform1i(self.location, value) }
    }

    pub fn set_vec3(&self, value: [f32; 3]) {
        unsafe { gl::Uniform3f(self.location, value[0], value[1], value[2]) }
    }

    pub fn set_vec3_array(&self, values: &[[f32; 3]]) {
        unsafe {
            gl::Uniform3fv(
                self.location,
                values.len() as i32,
                values.as_ptr() as *const f32,
            )
        }
    }
}
