//! Per-file pipeline: tokenize, parse and report.

use std::{fs, path::Path, rc::Rc};

use log::{debug, info};
use thiserror::Error;

use crate::{
    ast::ast::Program,
    diagnostics::diagnostics::{DiagnosticReporter, Severity},
    errors::errors::{Error, ErrorClass, ErrorTip},
    get_line,
    lexer::lexer::tokenize,
    parser::parser::parse,
};

/// Options that apply to every file of a run.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Print the token stream of each file
    pub dump_tokens: bool,
    /// Print the tree of each file that parses
    pub dump_ast: bool,
}

/// Why a file was rejected. Everything it carries has already been handed
/// to the reporter.
#[derive(Error, Debug)]
pub enum CompileFailure {
    #[error("could not read '{file}': {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },
    #[error("{count} lexer error(s) while analyzing '{file}'")]
    Lexical { file: String, count: usize },
    #[error("{file}: {error}")]
    Rejected { file: String, error: Error },
}

/// Reads `path` and checks it.
pub fn check_file(
    path: &Path,
    options: &CompileOptions,
    reporter: &mut dyn DiagnosticReporter,
) -> Result<Program, CompileFailure> {
    let file = path.display().to_string();

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(source) => {
            let failure = CompileFailure::Io { file, source };
            reporter.compiler_message(Severity::Error, &failure.to_string());
            return Err(failure);
        }
    };

    check_source(&file, &source, options, reporter)
}

/// Checks one file's text: every lexical error is reported as a batch, after
/// that only the first syntax or semantic error. Warnings are reported
/// either way.
pub fn check_source(
    file: &str,
    source: &str,
    options: &CompileOptions,
    reporter: &mut dyn DiagnosticReporter,
) -> Result<Program, CompileFailure> {
    info!("checking {}", file);
    reporter.register_source(file, source);

    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(errors) => {
            for error in &errors {
                report_error(file, error, reporter);
            }

            let failure = CompileFailure::Lexical {
                file: file.to_string(),
                count: errors.len(),
            };
            reporter.compiler_message(Severity::Error, &failure.to_string());
            return Err(failure);
        }
    };
    debug!("{} token(s) in {}", tokens.len(), file);

    if options.dump_tokens {
        for token in &tokens {
            println!(
                "{}:{}\t{:?}\t{:?}",
                token.position.line, token.position.column, token.kind, token.value
            );
        }
    }

    let (parser, result) = parse(tokens, Rc::new(file.to_string()));

    for warning in parser.warnings() {
        reporter.report_warning(file, &warning.position, warning.length, &warning.message);
    }

    let program = result.map_err(|error| {
        if error.class() == ErrorClass::Internal {
            report_internal(file, source, &error, reporter);
        } else {
            report_error(file, &error, reporter);
        }

        CompileFailure::Rejected {
            file: file.to_string(),
            error,
        }
    })?;

    if options.dump_ast {
        println!("{:#?}", program);
    }

    Ok(program)
}

fn report_error(file: &str, error: &Error, reporter: &mut dyn DiagnosticReporter) {
    let message = match error.get_tip() {
        ErrorTip::None => error.to_string(),
        tip => format!("{} ({})", error, tip),
    };

    reporter.report_error(file, error.get_position(), error.get_length(), &message);

    for note in error.get_notes() {
        reporter.report_note(file, &note.position, note.length, &note.message);
    }
}

fn report_internal(file: &str, source: &str, error: &Error, reporter: &mut dyn DiagnosticReporter) {
    let position = error.get_position();
    let message = format!(
        "{} at {}:{}:{}",
        error, file, position.line, position.column
    );

    reporter.report_crash(&message, &context_lines(source, position.line));
}

/// The line before `line`, `line` itself and the line after, numbered.
pub fn context_lines(source: &str, line: usize) -> Vec<String> {
    (line.saturating_sub(1)..=line + 1)
        .filter_map(|number| get_line(source, number).map(|text| format!("{:>4} | {}", number, text)))
        .collect()
}
