use std::time::Duration;

use gl_wrapper::geometry::{GeometryBuilder, VertexAttribute};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::{NativeGl, ProgramBuilder, TRIANGLE};

use super::{Demo, DemoError, Scene};

const SIMPLE_VERT: &str = include_str!("../gl_shaders/simple_vertex.glsl");
const SIMPLE_FRAG: &str = include_str!("../gl_shaders/simple_fragment.glsl");

fn simple_program() -> ProgramBuilder<'static> {
    ProgramBuilder::new(SIMPLE_VERT, SIMPLE_FRAG)
        .with_attribute(0, "position")
        .with_frag_output(0, "color")
}

/// White triangle from sources kept in the binary.
#[derive(Default)]
pub struct SimpleShader {
    scene: Option<Scene>,
}

impl SimpleShader {
    const VERTEX_SOURCE: &'static str = "#version 330 core
layout (location = 0) in vec3 vert;
void main()
{
    gl_Position = vec4(vert.x, vert.y, 0.0, 1.0);
}";

    const FRAGMENT_SOURCE: &'static str = "#version 330 core
out vec4 outColor;
void main()
{
    outColor = vec4(1.0f, 1.0f, 1.0f, 1.0f);
}";

    #[rustfmt::skip]
    const VERTICES: [f32; 9] = [
        0.0, 0.5, 0.0,
        0.5, -0.5, 0.0,
        -0.5, -0.5, 0.0,
    ];
}

impl Demo for SimpleShader {
    fn title(&self) -> &'static str {
        "Simple shader"
    }

    fn init(&mut self, gl: &NativeGl) -> Result<(), DemoError> {
        let program = ProgramBuilder::new(Self::VERTEX_SOURCE, Self::FRAGMENT_SOURCE)
            .with_attribute(0, "vert")
            .with_frag_output(0, "outColor");
        let geometry =
            GeometryBuilder::new(&Self::VERTICES).with_attribute(VertexAttribute::Vec3);

        self.scene = Some(Scene::new(gl, program, geometry)?);
        Ok(())
    }

    fn render(&mut self, renderer: &mut GlRenderer, _elapsed: Duration) {
        if let Some(scene) = &self.scene {
            scene.draw(renderer);
        }
    }

    fn release(&mut self) {
        self.scene = None;
    }
}

/// Triangle from the shader files.
#[derive(Default)]
pub struct Simple {
    scene: Option<Scene>,
}

impl Demo for Simple {
    fn title(&self) -> &'static str {
        "Simple shader example"
    }

    fn init(&mut self, gl: &NativeGl) -> Result<(), DemoError> {
        let geometry = GeometryBuilder::new(&TRIANGLE).with_attribute(VertexAttribute::Vec2);

        self.scene = Some(Scene::new(gl, simple_program(), geometry)?);
        Ok(())
    }

    fn render(&mut self, renderer: &mut GlRenderer, _elapsed: Duration) {
        if let Some(scene) = &self.scene {
            scene.draw(renderer);
        }
    }

    fn release(&mut self) {
        self.scene = None;
    }
}

/// Quad drawn from four vertices and an index buffer.
#[derive(Default)]
pub struct ElementArray {
    scene: Option<Scene>,
}

impl ElementArray {
    #[rustfmt::skip]
    const VERTICES: [f32; 8] = [
        0.5, 0.5,
        0.5, -0.5,
        -0.5, -0.5,
        -0.5, 0.5,
    ];

    #[rustfmt::skip]
    const INDICES: [u32; 6] = [
        0, 1, 3,
        1, 2, 3,
    ];
}

impl Demo for ElementArray {
    fn title(&self) -> &'static str {
        "Element array"
    }

    fn init(&mut self, gl: &NativeGl) -> Result<(), DemoError> {
        let geometry = GeometryBuilder::new(&Self::VERTICES)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&Self::INDICES);

        self.scene = Some(Scene::new(gl, simple_program(), geometry)?);
        Ok(())
    }

    fn render(&mut self, renderer: &mut GlRenderer, _elapsed: Duration) {
        if let Some(scene) = &self.scene {
            scene.draw(renderer);
        }
    }

    fn release(&mut self) {
        self.scene = None;
    }
}
