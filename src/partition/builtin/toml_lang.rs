//! TOML language definition

use crate::partition::language::LanguageDefinition;
use crate::partition::rules::{BlockRule, LineRule};

pub const TOML_COMMENT: &str = "__toml_comment";
pub const TOML_STRING: &str = "__toml_string";

/// Create TOML language definition
pub fn toml_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("TOML");
    lang.add_extension("toml");

    // Multi-line strings
    if let Ok(rule) = BlockRule::with_escape("multiline_basic", r#"""""#, r#"""""#, TOML_STRING, 1, '\\') {
        lang.add_block_rule(rule);
    }
    if let Ok(rule) = BlockRule::new("multiline_literal", r"'''", r"'''", TOML_STRING, 2) {
        lang.add_block_rule(rule);
    }

    // Basic strings escape, literal strings do not
    if let Ok(rule) = BlockRule::with_escape("basic_string", r#"""#, r#"""#, TOML_STRING, 3, '\\') {
        lang.add_block_rule(rule);
    }
    if let Ok(rule) = BlockRule::new("literal_string", r"'", r"'", TOML_STRING, 4) {
        lang.add_block_rule(rule);
    }

    // Comments
    if let Ok(rule) = LineRule::new("comment", r"#.*$", TOML_COMMENT, 100) {
        lang.add_line_rule(rule);
    }

    lang
}
