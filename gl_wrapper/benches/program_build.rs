use criterion::{criterion_group, criterion_main, Criterion};

use gl_wrapper::mock::MockGl;
use gl_wrapper::{Diagnostic, ProgramBuilder};

const VERT: &str = "#version 330 core
layout (location = 0) in vec3 vert;
out vec3 vColor;
void main() {
    vColor = vert * 0.5 + 0.5;
    gl_Position = vec4(vert.x, vert.y, 0.0, 1.0);
}";

const FRAG: &str = "#version 330 core
in vec3 vColor;
out vec4 outColor;
void main() {
    outColor = vec4(vColor, 1.0);
}";

pub fn build_program(c: &mut Criterion) {
    let gl = MockGl::new();
    let builder = ProgramBuilder::new(VERT, FRAG)
        .with_attribute(0, "vert")
        .with_frag_output(0, "outColor");

    c.bench_function("build_program", |b| {
        b.iter(|| {
            let mut sink: Vec<Diagnostic> = Vec::new();
            builder.build(&gl, &mut sink).unwrap()
        })
    });
}

criterion_group!(benches, build_program);
criterion_main!(benches);
