use std::fmt::{Display, Formatter};

use crate::context::ShaderStage;

/// Which step of a build produced a log.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    Stage(ShaderStage),
    Link,
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Stage(stage) => f.write_fmt(format_args!("{stage} shader")),
            Origin::Link => f.write_str("program link"),
        }
    }
}

/// Taken from the status flag that came with the log, not from its text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub origin: Origin,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(origin: Origin, message: String) -> Self {
        Self {
            origin,
            severity: Severity::Warning,
            message,
        }
    }

    pub fn error(origin: Origin, message: String) -> Self {
        Self {
            origin,
            severity: Severity::Error,
            message,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}: {}", self.origin, self.message))
    }
}

/// Non-fatal logs collected by a successful build, in the order they were
/// produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildDiagnostics {
    entries: Vec<Diagnostic>,
}

impl BuildDiagnostics {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn from_origin(&self, origin: Origin) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.origin == origin)
    }
}

impl<'a> IntoIterator for &'a BuildDiagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Receives every non-blank log a build produces, fatal or not.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Error => log::error!("{diagnostic}"),
        }
    }
}
