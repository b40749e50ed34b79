//! In-memory [`GlContext`] for tests.
//!
//! Compilation runs a small GLSL lint instead of a real compiler:
//! unbalanced delimiters are syntax errors and a missing `#version` line is
//! a warning. Linking checks that both stages define `main` and that every
//! fragment input has a vertex output with the same name and type. A vertex
//! output no fragment input reads is a link warning. Every object created is
//! tracked so tests can assert nothing leaked.
//!
//! Passing a handle the mock never issued (or already deleted) panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::context::{clamp_log, GlContext, ProgramId, ShaderId, ShaderStage};

#[derive(Clone, Debug, Default)]
pub struct MockGl {
    state: Rc<RefCell<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: u32,
    shaders: HashMap<u32, MockShader>,
    programs: HashMap<u32, MockProgram>,
    created_stages: Vec<ShaderStage>,
    programs_created: usize,
    blank_logs: bool,
}

#[derive(Debug)]
struct MockShader {
    stage: ShaderStage,
    source: String,
    output: Option<CompileOutput>,
}

#[derive(Clone, Debug)]
struct CompileOutput {
    success: bool,
    log: String,
    has_main: bool,
    inputs: Vec<Variable>,
    outputs: Vec<Variable>,
}

#[derive(Clone, Debug, PartialEq)]
struct Variable {
    ty: String,
    name: String,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<u32>,
    attribs: Vec<(u32, String)>,
    frag_outputs: Vec<(u32, String)>,
    late_bindings: usize,
    linked: Option<(bool, String)>,
}

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose info logs are always empty, failures included.
    pub fn with_blank_logs() -> Self {
        let gl = Self::default();
        gl.state.borrow_mut().blank_logs = true;
        gl
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_objects(&self) -> usize {
        self.live_shaders() + self.live_programs()
    }

    /// Stages of every shader object ever created, in creation order.
    pub fn created_stages(&self) -> Vec<ShaderStage> {
        self.state.borrow().created_stages.clone()
    }

    pub fn programs_created(&self) -> usize {
        self.state.borrow().programs_created
    }

    pub fn is_live_program(&self, program: ProgramId) -> bool {
        self.state.borrow().programs.contains_key(&program.0)
    }

    pub fn is_linked(&self, program: ProgramId) -> bool {
        self.with_program(program, |p| matches!(p.linked, Some((true, _))))
    }

    pub fn attrib_bindings(&self, program: ProgramId) -> Vec<(u32, String)> {
        self.with_program(program, |p| p.attribs.clone())
    }

    pub fn frag_data_bindings(&self, program: ProgramId) -> Vec<(u32, String)> {
        self.with_program(program, |p| p.frag_outputs.clone())
    }

    /// Bindings made after the program was linked, which have no effect.
    pub fn late_bindings(&self, program: ProgramId) -> usize {
        self.with_program(program, |p| p.late_bindings)
    }

    fn blank_logs(&self) -> bool {
        self.state.borrow().blank_logs
    }

    fn with_program<T>(&self, program: ProgramId, f: impl FnOnce(&mut MockProgram) -> T) -> T {
        let mut state = self.state.borrow_mut();
        let program = state
            .programs
            .get_mut(&program.0)
            .unwrap_or_else(|| panic!("unknown program {}", program.0));
        f(program)
    }

    fn with_shader<T>(&self, shader: ShaderId, f: impl FnOnce(&mut MockShader) -> T) -> T {
        let mut state = self.state.borrow_mut();
        let shader = state
            .shaders
            .get_mut(&shader.0)
            .unwrap_or_else(|| panic!("unknown shader {}", shader.0));
        f(shader)
    }

    fn next_id(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.next_id
    }
}

impl GlContext for MockGl {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId {
        let id = self.next_id();
        let mut state = self.state.borrow_mut();
        state.created_stages.push(stage);
        state.shaders.insert(
            id,
            MockShader {
                stage,
                source: String::new(),
                output: None,
            },
        );
        ShaderId(id)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        self.with_shader(shader, |s| s.source = source.to_string());
    }

    fn compile_shader(&self, shader: ShaderId) {
        self.with_shader(shader, |s| s.output = Some(compile(&s.source)));
    }

    fn compile_status(&self, shader: ShaderId) -> bool {
        self.with_shader(shader, |s| s.output.as_ref().map_or(false, |o| o.success))
    }

    fn shader_info_log(&self, shader: ShaderId, max_len: usize) -> String {
        if self.blank_logs() {
            return String::new();
        }
        self.with_shader(shader, |s| {
            s.output
                .as_ref()
                .map(|o| clamp_log(&o.log, max_len))
                .unwrap_or_default()
        })
    }

    fn delete_shader(&self, shader: ShaderId) {
        let removed = self.state.borrow_mut().shaders.remove(&shader.0);
        if removed.is_none() {
            panic!("unknown shader {}", shader.0);
        }
    }

    fn create_program(&self) -> ProgramId {
        let id = self.next_id();
        let mut state = self.state.borrow_mut();
        state.programs_created += 1;
        state.programs.insert(id, MockProgram::default());
        ProgramId(id)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        if !self.state.borrow().shaders.contains_key(&shader.0) {
            panic!("unknown shader {}", shader.0);
        }
        self.with_program(program, |p| p.attached.push(shader.0));
    }

    fn bind_attrib_location(&self, program: ProgramId, index: u32, name: &str) {
        self.with_program(program, |p| {
            p.late_bindings += usize::from(p.linked.is_some());
            p.attribs.push((index, name.to_string()));
        });
    }

    fn bind_frag_data_location(&self, program: ProgramId, index: u32, name: &str) {
        self.with_program(program, |p| {
            p.late_bindings += usize::from(p.linked.is_some());
            p.frag_outputs.push((index, name.to_string()));
        });
    }

    fn link_program(&self, program: ProgramId) {
        let attached = self.with_program(program, |p| p.attached.clone());

        let stages: Vec<(ShaderStage, Option<CompileOutput>)> = {
            let state = self.state.borrow();
            attached
                .iter()
                .map(|id| {
                    let shader = state
                        .shaders
                        .get(id)
                        .unwrap_or_else(|| panic!("unknown shader {id}"));
                    (shader.stage, shader.output.clone())
                })
                .collect()
        };

        let result = link(&stages);
        self.with_program(program, |p| p.linked = Some(result));
    }

    fn link_status(&self, program: ProgramId) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: ProgramId, max_len: usize) -> String {
        if self.blank_logs() {
            return String::new();
        }
        self.with_program(program, |p| {
            p.linked
                .as_ref()
                .map(|(_, log)| clamp_log(log, max_len))
                .unwrap_or_default()
        })
    }

    fn delete_program(&self, program: ProgramId) {
        let removed = self.state.borrow_mut().programs.remove(&program.0);
        if removed.is_none() {
            panic!("unknown program {}", program.0);
        }
    }
}

fn compile(source: &str) -> CompileOutput {
    let code = strip_comments(source);

    if let Err(log) = check_delimiters(&code) {
        return CompileOutput {
            success: false,
            log,
            has_main: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
        };
    }

    let mut log = String::new();
    let first_line = code.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if !first_line.trim_start().starts_with("#version") {
        log.push_str("0:1(1): warning: no #version directive, assuming GLSL 1.10\n");
    }

    let declarations_only: String = code
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let top_level = top_level_text(&declarations_only);
    let tokens = tokenize(&top_level);

    CompileOutput {
        success: true,
        log,
        has_main: tokens.windows(3).any(|w| w == ["void", "main", "("]),
        inputs: declarations(&top_level, "in"),
        outputs: declarations(&top_level, "out"),
    }
}

fn link(stages: &[(ShaderStage, Option<CompileOutput>)]) -> (bool, String) {
    if stages
        .iter()
        .any(|(_, output)| !output.as_ref().map_or(false, |o| o.success))
    {
        return (
            false,
            "error: linking with uncompiled/unsuccessfully compiled shader\n".to_string(),
        );
    }

    let find = |stage: ShaderStage| {
        stages
            .iter()
            .find(|(s, _)| *s == stage)
            .and_then(|(_, output)| output.as_ref())
    };

    let (vert, frag) = match (find(ShaderStage::Vertex), find(ShaderStage::Fragment)) {
        (Some(v), Some(f)) => (v, f),
        _ => {
            return (
                false,
                "error: program needs both a vertex and a fragment shader\n".to_string(),
            )
        }
    };

    let mut errors = String::new();

    for (stage, output) in [(ShaderStage::Vertex, vert), (ShaderStage::Fragment, frag)] {
        if !output.has_main {
            errors.push_str(&format!("error: {stage} shader lacks `main'\n"));
        }
    }

    for input in &frag.inputs {
        match vert.outputs.iter().find(|o| o.name == input.name) {
            None => errors.push_str(&format!(
                "error: fragment shader input `{}' has no matching output in the previous stage\n",
                input.name
            )),
            Some(output) if output.ty != input.ty => errors.push_str(&format!(
                "error: `{}' declared as type `{}' in vertex shader and `{}' in fragment shader\n",
                input.name, output.ty, input.ty
            )),
            Some(_) => {}
        }
    }

    let mut log = errors.clone();
    for output in &vert.outputs {
        if !frag.inputs.iter().any(|i| i.name == output.name) {
            log.push_str(&format!(
                "warning: vertex shader output `{}' is unused by the fragment shader\n",
                output.name
            ));
        }
    }

    (errors.is_empty(), log)
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek().copied()) {
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    // keep line numbers stable
                    if c == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

fn check_delimiters(code: &str) -> Result<(), String> {
    let mut stack: Vec<(char, usize)> = Vec::new();

    for (line_no, line) in code.lines().enumerate() {
        let line_no = line_no + 1;
        for c in line.chars() {
            match c {
                '(' | '{' | '[' => stack.push((c, line_no)),
                ')' | '}' | ']' => {
                    let expected = match c {
                        ')' => '(',
                        '}' => '{',
                        _ => '[',
                    };
                    match stack.pop() {
                        Some((open, _)) if open == expected => {}
                        _ => {
                            return Err(format!(
                                "0:{line_no}(1): error: syntax error, unexpected '{c}'\n"
                            ))
                        }
                    }
                }
                _ => {}
            }
        }
    }

    match stack.pop() {
        Some((open, line_no)) => Err(format!(
            "0:{line_no}(1): error: syntax error, unexpected end of file, unclosed '{open}'\n"
        )),
        None => Ok(()),
    }
}

/// Code outside of `{}` blocks, with each closed block replaced by `;`.
fn top_level_text(code: &str) -> String {
    let mut out = String::new();
    let mut depth = 0_usize;

    for c in code.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    out.push(';');
                }
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }

    out
}

fn tokenize(code: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(code.len());
    for c in code.chars() {
        match c {
            '(' | ')' | ',' | ';' | '=' => {
                spaced.push(' ');
                spaced.push(c);
                spaced.push(' ');
            }
            _ => spaced.push(c),
        }
    }
    spaced.split_whitespace().map(str::to_string).collect()
}

fn declarations(top_level: &str, qualifier: &str) -> Vec<Variable> {
    top_level
        .split(';')
        .filter_map(|stmt| {
            let stmt = strip_layout(stmt);
            let tokens: Vec<&str> = stmt.split_whitespace().collect();
            let pos = tokens.iter().position(|t| *t == qualifier)?;
            let ty = *tokens.get(pos + 1)?;
            let name = *tokens.get(pos + 2)?;
            let name = name.split('[').next().unwrap_or(name);

            Some(Variable {
                ty: ty.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

fn strip_layout(stmt: &str) -> String {
    match stmt.find("layout") {
        Some(start) => match stmt[start..].find(')') {
            Some(end) => format!("{} {}", &stmt[..start], &stmt[start + end + 1..]),
            None => stmt.to_string(),
        },
        None => stmt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lint_reports_syntax_errors() {
        let out = compile("#version 330 core\nvoid main() {\n gl_Position = vec4(0.0;\n}");
        assert!(!out.success);
        assert!(out.log.contains("0:4(1): error"));

        let out = compile("#version 330 core\nvoid main() {");
        assert!(!out.success);
        assert!(out.log.contains("unexpected end of file"));
    }

    #[test]
    fn lint_warns_on_missing_version() {
        let out = compile("// header comment\nvoid main() {}");
        assert!(out.success);
        assert!(out.log.contains("no #version directive"));

        let out = compile("#version 330 core\nvoid main() {}");
        assert!(out.success);
        assert!(out.log.is_empty());
    }

    #[test]
    fn lint_collects_interface() {
        let out = compile(
            "#version 330 core\n\
             layout (location = 0) in vec3 position;\n\
             in vec3 color; // per vertex\n\
             out vec3 fragColor;\n\
             uniform vec3 cols[4];\n\
             void main() { fragColor = color; }",
        );
        assert!(out.success);
        assert!(out.has_main);
        assert_eq!(
            out.inputs,
            vec![
                Variable {
                    ty: "vec3".into(),
                    name: "position".into()
                },
                Variable {
                    ty: "vec3".into(),
                    name: "color".into()
                },
            ]
        );
        assert_eq!(
            out.outputs,
            vec![Variable {
                ty: "vec3".into(),
                name: "fragColor".into()
            }]
        );
    }

    #[test]
    fn unread_vertex_output_links_with_warning() {
        let vert = (
            ShaderStage::Vertex,
            Some(compile("#version 330 core\nout vec3 a;\nout vec3 b;\nvoid main() {}")),
        );
        let frag = (
            ShaderStage::Fragment,
            Some(compile("#version 330 core\nin vec3 a;\nvoid main() {}")),
        );

        let (success, log) = link(&[vert, frag]);
        assert!(success);
        assert!(log.contains("`b' is unused"));
        assert!(!log.contains("`a'"));
    }

    #[test]
    fn bindings_after_link_are_counted() {
        let gl = MockGl::new();
        let program = gl.create_program();
        gl.bind_attrib_location(program, 0, "position");
        assert_eq!(gl.late_bindings(program), 0);

        gl.link_program(program);
        gl.bind_frag_data_location(program, 0, "color");
        assert_eq!(gl.late_bindings(program), 1);
        gl.delete_program(program);
    }

    #[test]
    #[should_panic(expected = "unknown shader")]
    fn deleted_handles_are_rejected() {
        let gl = MockGl::new();
        let shader = gl.create_shader(ShaderStage::Vertex);
        gl.delete_shader(shader);

        gl.compile_status(shader);
    }
}
