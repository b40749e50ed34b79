use std::time::Duration;

use gl_wrapper::geometry::{GeometryBuilder, VertexAttribute};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::uniform::Uniform;
use gl_wrapper::{NativeGl, ProgramBuilder, QUAD};

use crate::window::Key;

use super::{Demo, DemoError, Scene};

const COLORS: [[f32; 3]; 4] = [
    [1.0, 0.0, 0.0], // red
    [0.0, 1.0, 0.0], // green
    [0.0, 0.0, 1.0], // blue
    [1.0, 1.0, 0.0], // yellow
];

struct Resources {
    scene: Scene,
    cols: Uniform,
    chosen: Uniform,
}

/// Quad colored from a `vec3[4]` uniform, cycled with the arrow keys.
#[derive(Default)]
pub struct UniformArray {
    resources: Option<Resources>,
    chosen: usize,
}

impl UniformArray {
    pub fn chosen(&self) -> usize {
        self.chosen
    }
}

impl Demo for UniformArray {
    fn title(&self) -> &'static str {
        "Uniform array test"
    }

    fn init(&mut self, gl: &NativeGl) -> Result<(), DemoError> {
        let program = ProgramBuilder::new(
            include_str!("../gl_shaders/uniform_array_vertex.glsl"),
            include_str!("../gl_shaders/uniform_array_fragment.glsl"),
        )
        .with_attribute(0, "position")
        .with_frag_output(0, "color");

        let geometry = GeometryBuilder::new(&QUAD).with_attribute(VertexAttribute::Vec2);

        let scene = Scene::new(gl, program, geometry)?;
        let cols = Uniform::find(&scene.program, "cols[0]")
            .or_else(|| Uniform::find(&scene.program, "cols"))
            .ok_or(DemoError::MissingUniform("cols"))?;
        let chosen = Uniform::find(&scene.program, "chosen")
            .ok_or(DemoError::MissingUniform("chosen"))?;

        log::info!("Press 'up' or 'down' to cycle through some colors.");

        self.resources = Some(Resources {
            scene,
            cols,
            chosen,
        });
        Ok(())
    }

    fn render(&mut self, renderer: &mut GlRenderer, _elapsed: Duration) {
        if let Some(res) = &self.resources {
            renderer.use_program(&res.scene.program);
            res.cols.set_vec3_array(&COLORS);
            res.chosen.set_i32(self.chosen as i32);
            res.scene.draw(renderer);
        }
    }

    fn on_key(&mut self, key: Key) {
        let len = COLORS.len();
        match key {
            Key::Up => self.chosen = (self.chosen + 1) % len,
            Key::Down => self.chosen = (self.chosen + len - 1) % len,
            _ => {}
        }
    }

    fn release(&mut self) {
        self.resources = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_cycle_colors() {
        let mut demo = UniformArray::default();
        assert_eq!(demo.chosen(), 0);

        demo.on_key(Key::Down);
        assert_eq!(demo.chosen(), 3);

        for _ in 0..5 {
            demo.on_key(Key::Up);
        }
        assert_eq!(demo.chosen(), 0);

        demo.on_key(Key::Other);
        assert_eq!(demo.chosen(), 0);
    }
}
