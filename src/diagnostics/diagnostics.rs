use std::{collections::HashMap, fmt::Display, fs};

use yansi::Paint;

use crate::{get_line, Position};

/// Prefix of messages that are about the compiler run rather than a source
/// location.
pub const COMPILER_NAME: &str = "impc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }

    fn paint(&self, text: &str, colored: bool) -> String {
        if !colored {
            return text.to_string();
        }

        match self {
            Severity::Error => text.red().bold().to_string(),
            Severity::Warning => text.yellow().bold().to_string(),
            Severity::Note => text.cyan().bold().to_string(),
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One located message.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        file: &str,
        position: &Position,
        length: usize,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            severity,
            file: file.to_string(),
            line: position.line,
            column: position.column,
            length,
            message: message.into(),
        }
    }
}

/// The boundary through which the compiler talks to its user.
pub trait DiagnosticReporter {
    fn report(&mut self, diagnostic: &Diagnostic);

    /// A message about the run itself, not tied to a location.
    fn compiler_message(&mut self, severity: Severity, message: &str);

    /// An internal failure, with whatever context lines help locate it.
    fn report_crash(&mut self, message: &str, context: &[String]);

    /// Makes the text of `file` available for rendering source lines.
    fn register_source(&mut self, _file: &str, _source: &str) {}

    fn report_error(&mut self, file: &str, position: &Position, length: usize, message: &str) {
        self.report(&Diagnostic::new(
            Severity::Error,
            file,
            position,
            length,
            message,
        ));
    }

    fn report_warning(&mut self, file: &str, position: &Position, length: usize, message: &str) {
        self.report(&Diagnostic::new(
            Severity::Warning,
            file,
            position,
            length,
            message,
        ));
    }

    fn report_note(&mut self, file: &str, position: &Position, length: usize, message: &str) {
        self.report(&Diagnostic::new(
            Severity::Note,
            file,
            position,
            length,
            message,
        ));
    }
}

/// Renders a diagnostic as
///
/// ```text
/// file:line:column severity: message
///    3 | var x: i32 = "hi"
///      |            ^
/// ```
///
/// The source line loses its indentation and the carets are shifted to
/// match. Without a source line only the header is produced.
pub fn render(diagnostic: &Diagnostic, source_line: Option<&str>, colored: bool) -> String {
    let mut rendered = format!(
        "{}:{}:{} {}: {}",
        diagnostic.file,
        diagnostic.line,
        diagnostic.column,
        diagnostic.severity.paint(diagnostic.severity.label(), colored),
        diagnostic.message
    );

    let Some(source_line) = source_line else {
        return rendered;
    };

    let code = source_line.trim_start();
    let indent = source_line.chars().count() - code.chars().count();
    let offset = diagnostic.column.saturating_sub(1).saturating_sub(indent);
    let gutter = " ".repeat(4);
    let carets = "^".repeat(diagnostic.length.max(1));

    rendered.push_str(&format!("\n{:>4} | {}", diagnostic.line, code.trim_end()));
    rendered.push_str(&format!(
        "\n{} | {}{}",
        gutter,
        " ".repeat(offset),
        diagnostic.severity.paint(&carets, colored)
    ));

    rendered
}

/// Writes rendered diagnostics to stderr.
#[derive(Debug, Default)]
pub struct TerminalReporter {
    sources: HashMap<String, String>,
    colored: bool,
}

impl TerminalReporter {
    pub fn new(colored: bool) -> Self {
        TerminalReporter {
            sources: HashMap::new(),
            colored,
        }
    }

    /// Source text of `file`, read from disk when it was never registered.
    fn source(&mut self, file: &str) -> Option<&str> {
        if !self.sources.contains_key(file) {
            let text = fs::read_to_string(file).ok()?;
            self.sources.insert(file.to_string(), text);
        }

        self.sources.get(file).map(String::as_str)
    }
}

impl DiagnosticReporter for TerminalReporter {
    fn report(&mut self, diagnostic: &Diagnostic) {
        let colored = self.colored;
        let line = self
            .source(&diagnostic.file)
            .and_then(|source| get_line(source, diagnostic.line))
            .map(str::to_string);

        eprintln!("{}", render(diagnostic, line.as_deref(), colored));
    }

    fn compiler_message(&mut self, severity: Severity, message: &str) {
        eprintln!(
            "{}: {}: {}",
            COMPILER_NAME,
            severity.paint(severity.label(), self.colored),
            message
        );
    }

    fn report_crash(&mut self, message: &str, context: &[String]) {
        self.compiler_message(
            Severity::Error,
            "internal compiler error, please report this along with the output below",
        );
        eprintln!("------------[ cut here ]------------");
        eprintln!("{}", message);
        for line in context {
            eprintln!("{}", line);
        }
        eprintln!("------------[ cut here ]------------");
    }

    fn register_source(&mut self, file: &str, source: &str) {
        self.sources.insert(file.to_string(), source.to_string());
    }
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub diagnostics: Vec<Diagnostic>,
    pub messages: Vec<(Severity, String)>,
    pub crashes: Vec<(String, Vec<String>)>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .collect()
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.with_severity(Severity::Warning)
    }
}

impl DiagnosticReporter for CollectingReporter {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }

    fn compiler_message(&mut self, severity: Severity, message: &str) {
        self.messages.push((severity, message.to_string()));
    }

    fn report_crash(&mut self, message: &str, context: &[String]) {
        self.crashes.push((message.to_string(), context.to_vec()));
    }
}
