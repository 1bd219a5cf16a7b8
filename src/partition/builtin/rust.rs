//! Rust language definition

use crate::partition::language::LanguageDefinition;
use crate::partition::rules::{BlockRule, LineRule};

pub const RUST_COMMENT: &str = "__rust_comment";
pub const RUST_STRING: &str = "__rust_string";

/// Create Rust language definition
pub fn rust_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("Rust");
    lang.add_extension("rs");

    // Block comments (nesting is not tracked)
    if let Ok(rule) = BlockRule::new("block_comment", r"/\*", r"\*/", RUST_COMMENT, 1) {
        lang.add_block_rule(rule);
    }

    // Raw strings before plain strings: r"..." and r#"..."#
    if let Ok(rule) = BlockRule::new("raw_string_hash", r##"r#""##, r##""#"##, RUST_STRING, 2) {
        lang.add_block_rule(rule);
    }
    if let Ok(rule) = BlockRule::new("raw_string", r#"\br""#, r#"""#, RUST_STRING, 3) {
        lang.add_block_rule(rule);
    }
    if let Ok(rule) = BlockRule::with_escape("string", r#"""#, r#"""#, RUST_STRING, 4, '\\') {
        lang.add_block_rule(rule);
    }

    // Line comments (doc comments included)
    if let Ok(rule) = LineRule::new("line_comment", r"//.*$", RUST_COMMENT, 100) {
        lang.add_line_rule(rule);
    }

    // Character literals; lifetimes have no closing quote and stay code
    if let Ok(rule) = LineRule::new("char", r"'(?:[^'\\]|\\.|\\u\{[0-9a-fA-F]+\})'", RUST_STRING, 90) {
        lang.add_line_rule(rule);
    }

    lang
}
