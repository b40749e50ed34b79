use std::time::Duration;

use thiserror::Error;

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::{NativeGl, PBError, Program, ProgramBuilder};

use crate::window::Key;

mod colored_triangle;
mod hello_world;
mod triangles;
mod uniform_array;

pub use colored_triangle::ColoredTriangle;
pub use hello_world::HelloWorld;
pub use triangles::{ElementArray, Simple, SimpleShader};
pub use uniform_array::UniformArray;

pub trait Demo {
    fn title(&self) -> &'static str;

    /// Creates the demo's GL objects. Called once, with the context current.
    fn init(&mut self, gl: &NativeGl) -> Result<(), DemoError>;

    fn clear_color(&self) -> [f32; 4] {
        [0.0, 0.0, 0.0, 1.0]
    }

    fn render(&mut self, renderer: &mut GlRenderer, elapsed: Duration);

    /// Called for every released key other than escape.
    fn on_key(&mut self, _key: Key) {}

    /// Drops the GL objects created by `init`.
    fn release(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DemoKind {
    HelloWorld,
    SimpleShader,
    Simple,
    ElementArray,
    ColoredTriangle,
    UniformArray,
}

impl DemoKind {
    pub fn create(self) -> Box<dyn Demo> {
        match self {
            DemoKind::HelloWorld => Box::new(HelloWorld),
            DemoKind::SimpleShader => Box::<SimpleShader>::default(),
            DemoKind::Simple => Box::<Simple>::default(),
            DemoKind::ElementArray => Box::<ElementArray>::default(),
            DemoKind::ColoredTriangle => Box::<ColoredTriangle>::default(),
            DemoKind::UniformArray => Box::<UniformArray>::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("could not build shader program: {0}")]
    Program(#[from] PBError),
    #[error("could not build geometry: {0}")]
    Geometry(#[from] GBError),
    #[error("uniform `{0}` is not active in the program")]
    MissingUniform(&'static str),
}

/// One program drawing one piece of geometry.
pub struct Scene {
    pub program: Program<NativeGl>,
    pub geometry: Geometry,
}

impl Scene {
    pub fn new(
        gl: &NativeGl,
        program: ProgramBuilder<'_>,
        geometry: GeometryBuilder<'_>,
    ) -> Result<Self, DemoError> {
        let program = program.build_logged(gl)?.into_program();
        let geometry = geometry.build()?;

        log::debug!("scene ready, program {}", program.get_id());

        Ok(Self { program, geometry })
    }

    pub fn draw(&self, renderer: &mut GlRenderer) {
        renderer.draw(&self.geometry, &self.program);
    }
}
