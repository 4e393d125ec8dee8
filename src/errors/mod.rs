//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the front end.
//! It includes:
//!
//! - Error structures with source position and secondary notes
//! - Specific error variants for the lexical, syntax and semantic stages
//! - Classification used by the driver to decide how to report
//! - Helpful suggestions attached to some errors

pub mod errors;
