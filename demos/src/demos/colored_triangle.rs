use std::time::Duration;

use gl_wrapper::geometry::{GeometryBuilder, VertexAttribute};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::uniform::Uniform;
use gl_wrapper::{NativeGl, ProgramBuilder};

use super::{Demo, DemoError, Scene};

/// Indexed triangle with per-vertex colors, tinted by a uniform that
/// changes over time.
#[derive(Default)]
pub struct ColoredTriangle {
    scene: Option<(Scene, Uniform)>,
}

impl ColoredTriangle {
    #[rustfmt::skip]
    const VERTICES: [f32; 18] = [
        // position3, color3
        0.0, 0.5, 0.0,
        1.0, 0.0, 0.0,

        -0.5, -0.5, 0.0,
        0.0, 1.0, 0.0,

        0.5, -0.5, 0.0,
        0.0, 0.0, 1.0,
    ];

    const INDICES: [u32; 3] = [0, 1, 2];
}

pub fn triangle_color(elapsed: Duration) -> [f32; 3] {
    let time = elapsed.as_millis() as f64 / 500.0;

    [
        (time / 3.0).sin() as f32,
        (time / 2.0).sin() as f32,
        (time / 5.0).sin() as f32,
    ]
}

impl Demo for ColoredTriangle {
    fn title(&self) -> &'static str {
        "Colored triangle"
    }

    fn init(&mut self, gl: &NativeGl) -> Result<(), DemoError> {
        let program = ProgramBuilder::new(
            include_str!("../gl_shaders/colored_triangle_vertex.glsl"),
            include_str!("../gl_shaders/colored_triangle_fragment.glsl"),
        )
        .with_attribute(0, "position")
        .with_attribute(1, "vertexColor")
        .with_frag_output(0, "color");

        let geometry = GeometryBuilder::new(&Self::VERTICES)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec3)
            .with_indices(&Self::INDICES);

        let scene = Scene::new(gl, program, geometry)?;
        let color = Uniform::find(&scene.program, "triangleColor")
            .ok_or(DemoError::MissingUniform("triangleColor"))?;

        self.scene = Some((scene, color));
        Ok(())
    }

    fn render(&mut self, renderer: &mut GlRenderer, elapsed: Duration) {
        if let Some((scene, color)) = &self.scene {
            renderer.use_program(&scene.program);
            color.set_vec3(triangle_color(elapsed));
            scene.draw(renderer);
        }
    }

    fn release(&mut self) {
        self.scene = None;
    }
}
