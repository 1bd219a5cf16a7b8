//! C/C++ language definition

use crate::partition::language::LanguageDefinition;
use crate::partition::rules::{BlockRule, LineRule};

pub const C_COMMENT: &str = "__c_comment";
pub const C_STRING: &str = "__c_string";
pub const C_PREPROCESSOR: &str = "__c_preprocessor";

/// Create C language definition (also works for C++)
pub fn c_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("C");
    lang.add_extension("c");
    lang.add_extension("h");
    lang.add_extension("cpp");
    lang.add_extension("hpp");
    lang.add_extension("cc");
    lang.add_extension("cxx");

    // Block comments
    if let Ok(rule) = BlockRule::new("block_comment", r"/\*", r"\*/", C_COMMENT, 1) {
        lang.add_block_rule(rule);
    }

    // Strings (with escape support)
    if let Ok(rule) = BlockRule::with_escape("string", r#"""#, r#"""#, C_STRING, 2, '\\') {
        lang.add_block_rule(rule);
    }

    // Line comments
    if let Ok(rule) = LineRule::new("line_comment", r"//.*$", C_COMMENT, 100) {
        lang.add_line_rule(rule);
    }

    // Preprocessor directives
    if let Ok(rule) = LineRule::new("preprocessor", r"^\s*#\s*\w+", C_PREPROCESSOR, 95) {
        lang.add_line_rule(rule);
    }

    // Character literals
    if let Ok(rule) = LineRule::new("char", r"'(?:[^'\\]|\\.)'", C_STRING, 90) {
        lang.add_line_rule(rule);
    }

    lang
}
