//! User-facing reporting of errors, warnings and notes.
//!
//! The compiler never prints diagnostics itself; it hands them to a
//! `DiagnosticReporter`. `TerminalReporter` renders them with the offending
//! source line underneath, `CollectingReporter` keeps them for inspection.

pub mod diagnostics;
