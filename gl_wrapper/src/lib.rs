#[rustfmt::skip]
pub const TRIANGLE: [f32; 6] = [
    -0.5, -0.5,
    0.5, -0.5,
    0.0, 0.5,
];

#[rustfmt::skip]
pub const QUAD: [f32; 12] = [
    -0.5, -0.5,
    0.5, -0.5,
    0.5, 0.5,
    0.5, 0.5,
    -0.5, 0.5,
    -0.5, -0.5,
];

pub mod context;
pub mod diagnostics;
pub mod geometry;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod native;
pub mod program;
pub mod renderer;
pub mod uniform;

pub use context::{GlContext, ProgramId, ShaderId, ShaderStage};
pub use diagnostics::{BuildDiagnostics, Diagnostic, DiagnosticSink, LogSink, Origin, Severity};
pub use native::NativeGl;
pub use program::{BuiltProgram, PBError, Program, ProgramBuilder, ShaderSource};
