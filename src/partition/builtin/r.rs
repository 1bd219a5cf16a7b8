//! R language definition

use crate::partition::language::LanguageDefinition;
use crate::partition::rules::{BlockRule, LineRule};

pub const R_COMMENT: &str = "__r_comment";
pub const R_ROXYGEN: &str = "__r_roxygen";
pub const R_STRING: &str = "__r_string";
pub const R_QUOTED_SYMBOL: &str = "__r_quoted_symbol";

/// Create R language definition
pub fn r_language() -> LanguageDefinition {
    let mut lang = LanguageDefinition::new("R");
    lang.add_extension("r");
    lang.add_extension("rprofile");

    // Strings and `quoted symbols` may span lines
    if let Ok(rule) = BlockRule::with_escape("string_double", "\"", "\"", R_STRING, 1, '\\') {
        lang.add_block_rule(rule);
    }
    if let Ok(rule) = BlockRule::with_escape("string_single", "'", "'", R_STRING, 2, '\\') {
        lang.add_block_rule(rule);
    }
    if let Ok(rule) = BlockRule::with_escape("quoted_symbol", "`", "`", R_QUOTED_SYMBOL, 3, '\\') {
        lang.add_block_rule(rule);
    }

    // Roxygen shares the comment start, so it needs the higher priority
    if let Ok(rule) = LineRule::new("roxygen", r"#'.*$", R_ROXYGEN, 110) {
        lang.add_line_rule(rule);
    }
    if let Ok(rule) = LineRule::new("comment", r"#.*$", R_COMMENT, 100) {
        lang.add_line_rule(rule);
    }

    lang
}
