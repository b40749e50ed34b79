use std::time::Duration;

use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::NativeGl;

use super::{Demo, DemoError};

/// Clears the window, nothing else.
pub struct HelloWorld;

impl Demo for HelloWorld {
    fn title(&self) -> &'static str {
        "Hello World!"
    }

    fn init(&mut self, _gl: &NativeGl) -> Result<(), DemoError> {
        Ok(())
    }

    fn clear_color(&self) -> [f32; 4] {
        [0.2, 0.2, 0.4, 0.0]
    }

    fn render(&mut self, _renderer: &mut GlRenderer, _elapsed: Duration) {}

    fn release(&mut self) {}
}
