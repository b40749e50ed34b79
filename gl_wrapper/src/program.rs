use std::collections::BTreeMap;

use thiserror::Error;

use crate::context::{GlContext, ProgramId, ShaderId, ShaderStage, INFO_LOG_LEN};
use crate::diagnostics::{BuildDiagnostics, Diagnostic, DiagnosticSink, LogSink, Origin};

/// Source text for one shader stage.
#[derive(Copy, Clone, Debug)]
pub struct ShaderSource<'a> {
    stage: ShaderStage,
    text: &'a str,
}

impl<'a> ShaderSource<'a> {
    pub fn new(stage: ShaderStage, text: &'a str) -> Self {
        Self { stage, text }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn text(&self) -> &'a str {
        self.text
    }
}

/// Compiles a vertex/fragment pair and links it into a [`Program`].
///
/// Compilation stops at the first stage that fails; the fragment shader is
/// never created when the vertex shader does not compile. Whatever the
/// outcome, every shader object created during a build is deleted before
/// [`ProgramBuilder::build`] returns, and on failure so is the program.
///
/// Binding names are policy of the caller, nothing is bound by default.
#[derive(Clone, Debug)]
pub struct ProgramBuilder<'a> {
    vert: ShaderSource<'a>,
    frag: ShaderSource<'a>,
    attributes: BTreeMap<u32, String>,
    frag_outputs: BTreeMap<u32, String>,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: ShaderSource::new(ShaderStage::Vertex, vert_src),
            frag: ShaderSource::new(ShaderStage::Fragment, frag_src),
            attributes: BTreeMap::new(),
            frag_outputs: BTreeMap::new(),
        }
    }

    /// Binds vertex attribute `name` to location `index` before linking.
    pub fn with_attribute(mut self, index: u32, name: impl Into<String>) -> Self {
        self.attributes.insert(index, name.into());
        self
    }

    /// Binds fragment output `name` to color number `index` before linking.
    pub fn with_frag_output(mut self, index: u32, name: impl Into<String>) -> Self {
        self.frag_outputs.insert(index, name.into());
        self
    }

    /// Same as [`ProgramBuilder::build`], reporting through [`LogSink`].
    pub fn build_logged<C: GlContext>(&self, gl: &C) -> Result<BuiltProgram<C>, PBError> {
        self.build(gl, &mut LogSink)
    }

    /// Builds the program on `gl`, which must be current on this thread.
    ///
    /// Every non-blank compile or link log is passed to `sink`. Logs that came
    /// with a success status are also returned in
    /// [`BuiltProgram::diagnostics`].
    pub fn build<C, S>(&self, gl: &C, sink: &mut S) -> Result<BuiltProgram<C>, PBError>
    where
        C: GlContext,
        S: DiagnosticSink + ?Sized,
    {
        self.validate()?;

        let mut diagnostics = BuildDiagnostics::default();

        let vert = compile(gl, &self.vert, &mut diagnostics, sink)?;
        let frag = compile(gl, &self.frag, &mut diagnostics, sink)?;

        let program = Program::new(gl.clone(), gl.create_program());

        gl.attach_shader(program.id, vert.id);
        gl.attach_shader(program.id, frag.id);

        for (index, name) in &self.attributes {
            gl.bind_attrib_location(program.id, *index, name);
        }

        for (index, name) in &self.frag_outputs {
            gl.bind_frag_data_location(program.id, *index, name);
        }

        gl.link_program(program.id);

        let success = gl.link_status(program.id);
        let log = gl.program_info_log(program.id, INFO_LOG_LEN);

        // shaders are not needed past linking, whatever the result
        drop(vert);
        drop(frag);

        if !success {
            report_error(sink, Origin::Link, &log);
            return Err(PBError::LinkFailed { log });
        }

        if !log.trim().is_empty() {
            let diagnostic = Diagnostic::warning(Origin::Link, log);
            sink.report(&diagnostic);
            diagnostics.push(diagnostic);
        }

        log::debug!(
            "linked program {} with {} warning(s)",
            program.get_id(),
            diagnostics.len()
        );

        Ok(BuiltProgram {
            program,
            diagnostics,
        })
    }

    fn validate(&self) -> Result<(), PBError> {
        for source in [&self.vert, &self.frag] {
            if source.text.trim().is_empty() {
                return Err(PBError::EmptySource {
                    stage: source.stage,
                });
            }
        }

        for name in self.attributes.values().chain(self.frag_outputs.values()) {
            if name.is_empty() || name.contains('\0') {
                return Err(PBError::InvalidBindingName { name: name.clone() });
            }
        }

        Ok(())
    }
}

/// A shader object that is deleted when dropped.
struct CompiledShader<'g, C: GlContext> {
    gl: &'g C,
    id: ShaderId,
}

impl<C: GlContext> Drop for CompiledShader<'_, C> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

fn compile<'g, C, S>(
    gl: &'g C,
    source: &ShaderSource<'_>,
    diagnostics: &mut BuildDiagnostics,
    sink: &mut S,
) -> Result<CompiledShader<'g, C>, PBError>
where
    C: GlContext,
    S: DiagnosticSink + ?Sized,
{
    let stage = source.stage;
    let shader = CompiledShader {
        gl,
        id: gl.create_shader(stage),
    };

    gl.shader_source(shader.id, source.text);
    gl.compile_shader(shader.id);

    let success = gl.compile_status(shader.id);
    let log = gl.shader_info_log(shader.id, INFO_LOG_LEN);

    if !success {
        report_error(sink, Origin::Stage(stage), &log);
        return Err(PBError::CompileFailed { stage, log });
    }

    if !log.trim().is_empty() {
        let diagnostic = Diagnostic::warning(Origin::Stage(stage), log);
        sink.report(&diagnostic);
        diagnostics.push(diagnostic);
    }

    Ok(shader)
}

fn report_error<S: DiagnosticSink + ?Sized>(sink: &mut S, origin: Origin, log: &str) {
    if !log.trim().is_empty() {
        sink.report(&Diagnostic::error(origin, log.to_string()));
    }
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("{stage} shader failed to compile: {log}")]
    CompileFailed { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    LinkFailed { log: String },
    #[error("{stage} shader source is empty")]
    EmptySource { stage: ShaderStage },
    #[error("invalid binding name {name:?}")]
    InvalidBindingName { name: String },
}

/// Result of a successful build.
pub struct BuiltProgram<C: GlContext> {
    pub program: Program<C>,
    pub diagnostics: BuildDiagnostics,
}

impl<C: GlContext> BuiltProgram<C> {
    pub fn into_program(self) -> Program<C> {
        self.program
    }
}

/// A linked program, deleted from its context on drop.
pub struct Program<C: GlContext> {
    gl: Option<C>,
    id: ProgramId,
}

impl<C: GlContext> Program<C> {
    fn new(gl: C, id: ProgramId) -> Self {
        Self { gl: Some(gl), id }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn get_id(&self) -> u32 {
        self.id.raw()
    }

    /// Gives up ownership; the caller has to delete the program itself.
    pub fn into_raw(mut self) -> ProgramId {
        self.gl = None;
        self.id
    }
}

impl<C: GlContext> Drop for Program<C> {
    fn drop(&mut self) {
        if let Some(gl) = self.gl.take() {
            gl.delete_program(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::mock::MockGl;

    const VERT: &str = "#version 330 core\nvoid main(){gl_Position=vec4(0,0,0,1);}";
    const FRAG: &str = "#version 330 core\nout vec4 c; void main(){c=vec4(1,1,1,1);}";

    const VERT_COLOR: &str = "#version 330 core
layout (location = 0) in vec2 position;
out vec3 vColor;
void main() {
    vColor = vec3(position, 0.0);
    gl_Position = vec4(position, 0.0, 1.0);
}";

    const FRAG_COLOR: &str = "#version 330 core
in vec3 vColor;
out vec4 color;
void main() {
    color = vec4(vColor, 1.0);
}";

    #[test]
    fn builds_valid_pair() {
        let gl = MockGl::new();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let built = ProgramBuilder::new(VERT, FRAG).build(&gl, &mut sink).unwrap();

        assert_ne!(built.program.get_id(), 0);
        assert!(built.diagnostics.is_empty());
        assert!(sink.is_empty());
        assert!(gl.is_linked(built.program.id()));
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 1);

        drop(built);
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn vertex_error_short_circuits() {
        let gl = MockGl::new();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let broken = "#version 330 core\nvoid main(){gl_Position=vec4(0,0,0,1;}";
        let err = ProgramBuilder::new(broken, FRAG)
            .build(&gl, &mut sink)
            .err()
            .unwrap();

        match err {
            PBError::CompileFailed { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.is_empty());
            }
            e => panic!("unexpected error {e}"),
        }

        assert_eq!(gl.created_stages(), vec![ShaderStage::Vertex]);
        assert_eq!(gl.programs_created(), 0);
        assert_eq!(gl.live_objects(), 0);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].severity, Severity::Error);
        assert_eq!(sink[0].origin, Origin::Stage(ShaderStage::Vertex));
    }

    #[test]
    fn fragment_error_releases_vertex_shader() {
        let gl = MockGl::new();

        let broken = "#version 330 core\nout vec4 c; void main(){c=vec4(1,1,1,1);";
        let err = ProgramBuilder::new(VERT, broken)
            .build(&gl, &mut Vec::<Diagnostic>::new())
            .err()
            .unwrap();

        assert!(matches!(
            err,
            PBError::CompileFailed {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert_eq!(
            gl.created_stages(),
            vec![ShaderStage::Vertex, ShaderStage::Fragment]
        );
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn mismatched_interface_fails_to_link() {
        let gl = MockGl::new();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let err = ProgramBuilder::new(VERT, FRAG_COLOR)
            .build(&gl, &mut sink)
            .err()
            .unwrap();

        match err {
            PBError::LinkFailed { log } => assert!(log.contains("vColor")),
            e => panic!("unexpected error {e}"),
        }

        assert_eq!(gl.programs_created(), 1);
        assert_eq!(gl.live_objects(), 0);
        assert_eq!(sink.last().map(|d| d.origin), Some(Origin::Link));
    }

    #[test]
    fn missing_main_fails_to_link() {
        let gl = MockGl::new();

        let no_main = "#version 330 core\nout vec4 c; void shade(){c=vec4(1);}";
        let err = ProgramBuilder::new(VERT, no_main)
            .build_logged(&gl)
            .err()
            .unwrap();

        assert!(matches!(err, PBError::LinkFailed { ref log } if !log.is_empty()));
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn repeated_failures_do_not_accumulate_objects() {
        let gl = MockGl::new();
        let builder = ProgramBuilder::new(VERT, FRAG_COLOR);

        for _ in 0..8 {
            assert!(builder.build(&gl, &mut Vec::<Diagnostic>::new()).is_err());
        }

        assert_eq!(gl.programs_created(), 8);
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn independent_contexts_give_independent_programs() {
        let first_gl = MockGl::new();
        let second_gl = MockGl::new();
        let builder = ProgramBuilder::new(VERT_COLOR, FRAG_COLOR);

        let first = builder.build_logged(&first_gl).unwrap();
        let second = builder.build_logged(&second_gl).unwrap();

        assert!(first_gl.is_linked(first.program.id()));
        assert!(second_gl.is_linked(second.program.id()));
        assert_eq!(first_gl.live_programs(), 1);
        assert_eq!(second_gl.live_programs(), 1);

        drop(first);
        assert_eq!(first_gl.live_programs(), 0);
        assert_eq!(second_gl.live_programs(), 1);
    }

    #[test]
    fn warnings_are_kept_on_success() {
        let gl = MockGl::new();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let unversioned = "void main(){gl_Position=vec4(0,0,0,1);}";
        let built = ProgramBuilder::new(unversioned, FRAG)
            .build(&gl, &mut sink)
            .unwrap();

        let warnings: Vec<_> = built
            .diagnostics
            .from_origin(Origin::Stage(ShaderStage::Vertex))
            .collect();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        assert!(warnings[0].message.contains("#version"));
        assert_eq!(built.diagnostics.len(), 1);
        assert_eq!(sink, built.diagnostics.iter().cloned().collect::<Vec<_>>());
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn bindings_reach_the_context() {
        let gl = MockGl::new();

        let built = ProgramBuilder::new(VERT_COLOR, FRAG_COLOR)
            .with_attribute(0, "position")
            .with_frag_output(0, "color")
            .build_logged(&gl)
            .unwrap();

        let id = built.program.id();
        assert_eq!(gl.attrib_bindings(id), vec![(0, String::from("position"))]);
        assert_eq!(gl.frag_data_bindings(id), vec![(0, String::from("color"))]);
        assert_eq!(gl.late_bindings(id), 0);
    }

    #[test]
    fn link_warnings_are_kept_on_success() {
        let gl = MockGl::new();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let extra_output = "#version 330 core
out vec3 vColor;
out vec3 vNormal;
void main() {
    vColor = vec3(1.0);
    vNormal = vec3(0.0);
    gl_Position = vec4(0.0, 0.0, 0.0, 1.0);
}";
        let built = ProgramBuilder::new(extra_output, FRAG_COLOR)
            .build(&gl, &mut sink)
            .unwrap();

        let warnings: Vec<_> = built.diagnostics.from_origin(Origin::Link).collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        assert!(warnings[0].message.contains("vNormal"));

        assert_eq!(sink, built.diagnostics.iter().cloned().collect::<Vec<_>>());
        assert!(gl.is_linked(built.program.id()));
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn warnings_before_a_failure_reach_the_sink() {
        let gl = MockGl::new();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let unversioned = "void main(){gl_Position=vec4(0,0,0,1);}";
        let broken = "#version 330 core\nout vec4 c; void main(){c=vec4(1,1,1,1);";
        let err = ProgramBuilder::new(unversioned, broken)
            .build(&gl, &mut sink)
            .err()
            .unwrap();

        assert!(matches!(
            err,
            PBError::CompileFailed {
                stage: ShaderStage::Fragment,
                ..
            }
        ));

        let reported: Vec<_> = sink.iter().map(|d| (d.origin, d.severity)).collect();
        assert_eq!(
            reported,
            vec![
                (Origin::Stage(ShaderStage::Vertex), Severity::Warning),
                (Origin::Stage(ShaderStage::Fragment), Severity::Error),
            ]
        );
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn blank_failure_logs_are_not_reported() {
        let gl = MockGl::with_blank_logs();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let broken = "#version 330 core\nvoid main(){gl_Position=vec4(0,0,0,1;}";
        let err = ProgramBuilder::new(broken, FRAG)
            .build(&gl, &mut sink)
            .err()
            .unwrap();
        assert!(matches!(err, PBError::CompileFailed { ref log, .. } if log.is_empty()));

        let err = ProgramBuilder::new(VERT, FRAG_COLOR)
            .build(&gl, &mut sink)
            .err()
            .unwrap();
        assert!(matches!(err, PBError::LinkFailed { ref log } if log.is_empty()));

        assert!(sink.is_empty());
        assert_eq!(gl.live_objects(), 0);
    }

    #[test]
    fn invalid_input_allocates_nothing() {
        let gl = MockGl::new();

        let err = ProgramBuilder::new(VERT, "  \n").build_logged(&gl).err().unwrap();
        assert!(matches!(
            err,
            PBError::EmptySource {
                stage: ShaderStage::Fragment
            }
        ));

        let err = ProgramBuilder::new(VERT, FRAG)
            .with_attribute(0, "pos\0ition")
            .build_logged(&gl)
            .err()
            .unwrap();
        assert!(matches!(err, PBError::InvalidBindingName { .. }));

        assert!(gl.created_stages().is_empty());
        assert_eq!(gl.programs_created(), 0);
    }

    #[test]
    fn into_raw_keeps_program_alive() {
        let gl = MockGl::new();

        let built = ProgramBuilder::new(VERT, FRAG).build_logged(&gl).unwrap();
        let id = built.into_program().into_raw();

        assert!(gl.is_live_program(id));
        gl.delete_program(id);
        assert_eq!(gl.live_objects(), 0);
    }
}
