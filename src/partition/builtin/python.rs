//! Python language definition

use crate::partition::language::LanguageDefinition;
use crate::partition::rules::{BlockRule, LineRule};

pub const PYTHON_COMMENT: &str = "__python_comment";
pub const PYTHON_STRING: &str = "__python_string";

/// Create Python language definition
pub fn python_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("Python");
    lang.add_extension("py");
    lang.add_extension("pyw");
    lang.add_extension("pyi");

    // Triple-quoted strings (docstrings) win ties with the single quotes
    if let Ok(rule) = BlockRule::new("triple_double", r#"""""#, r#"""""#, PYTHON_STRING, 1) {
        lang.add_block_rule(rule);
    }
    if let Ok(rule) = BlockRule::new("triple_single", r"'''", r"'''", PYTHON_STRING, 2) {
        lang.add_block_rule(rule);
    }

    // Regular strings (with escape support)
    if let Ok(rule) = BlockRule::with_escape("double_string", r#"""#, r#"""#, PYTHON_STRING, 3, '\\') {
        lang.add_block_rule(rule);
    }
    if let Ok(rule) = BlockRule::with_escape("single_string", r"'", r"'", PYTHON_STRING, 4, '\\') {
        lang.add_block_rule(rule);
    }

    // Comments
    if let Ok(rule) = LineRule::new("comment", r"#.*$", PYTHON_COMMENT, 100) {
        lang.add_line_rule(rule);
    }

    lang
}
