use crate::geometry::{Elements, Geometry};
use crate::native::NativeGl;
use crate::program::Program;

/// Issues draw calls on the current context.
pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn use_program(&mut self, program: &Program<NativeGl>) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program<NativeGl>) {
        self.use_program(program);

        unsafe {
            gl::BindVertexArray(geometry.vao());
            match geometry.elements() {
                Elements::Arrays(count) => gl::DrawArrays(gl::TRIANGLES, 0, count as i32),
                Elements::Indexed(count) => gl::DrawElements(
                    gl::TRIANGLES,
                    count as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                ),
            }
            gl::BindVertexArray(0);
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
