use std::fmt;

/// Recoverable findings, reported while generation carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnsupportedService(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedService(service) => write!(f, "{} is not supported", service),
        }
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

// Forwards to the log and to stderr, so warnings show without RUST_LOG
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        eprintln!("Warning: {}", diagnostic);
    }
}
