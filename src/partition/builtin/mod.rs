//! Built-in language definitions
//!
//! This module provides partitioning rules for common languages.

mod r;
mod rust;
mod c;
mod python;
mod toml_lang;

use super::language::LanguageDefinition;

pub use r::{r_language, R_COMMENT, R_QUOTED_SYMBOL, R_ROXYGEN, R_STRING};
pub use rust::{rust_language, RUST_COMMENT, RUST_STRING};
pub use c::{c_language, C_COMMENT, C_PREPROCESSOR, C_STRING};
pub use python::{python_language, PYTHON_COMMENT, PYTHON_STRING};
pub use toml_lang::{toml_language, TOML_COMMENT, TOML_STRING};

/// Get all built-in language definitions
pub fn all_languages() -> Vec<LanguageDefinition> {
    vec![
        r::r_language(),
        rust::rust_language(),
        c::c_language(),
        python::python_language(),
        toml_lang::toml_language(),
    ]
}
