//! Configuration file support
//!
//! Loads settings from ~/.heurscan.toml (or %USERPROFILE%\.heurscan.toml on
//! Windows). Unknown keys are ignored; a missing or broken file leaves the
//! defaults in place.
//!
//! Example:
//! ```toml
//! line-break-is-blank = true
//! escape-char = "\\"
//! tab-width = 4
//! pairs = ["()", "[]", "{}", "<>"]
//!
//! [[language]]
//! name = "Make"
//! extensions = ["mk"]
//!
//! [[language.block]]
//! name = "string"
//! start = '"'
//! end = '"'
//! partition = "__make_string"
//! escape = "\\"
//!
//! [[language.line]]
//! name = "comment"
//! pattern = "#.*$"
//! partition = "__make_comment"
//! priority = 100
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use toml::{Table, Value};

use crate::error::{Result, ScanError};
use crate::partition::{BlockRule, LanguageDefinition, LineRule};
use crate::scanner::PeerPair;

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether blank finders skip line breaks
    pub line_break_is_blank: bool,
    /// Escape character for peer matching, if any
    pub escape_char: Option<char>,
    /// Tab width for column display
    pub tab_width: usize,
    /// Pairs recognized by peer matching
    pub pairs: Vec<PeerPair>,
    /// Additional partitioning languages
    pub languages: Vec<LanguageDefinition>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_break_is_blank: false,
            escape_char: None,
            tab_width: 8,
            pairs: vec![PeerPair::PARENTHESES, PeerPair::BRACKETS, PeerPair::BRACES],
            languages: Vec::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".heurscan.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".heurscan.toml"))
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Load configuration from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        debug!("loading config from {}", path.display());
        Self::from_toml(&contents)
    }

    /// Build a configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings = Self::parse(contents)?;
        let mut config = Config::default();
        config.apply(&settings)?;
        Ok(config)
    }

    /// Parse config file contents into a table
    fn parse(contents: &str) -> Result<Table> {
        Ok(contents.parse::<Table>()?)
    }

    /// Apply settings from a parsed table
    fn apply(&mut self, settings: &Table) -> Result<()> {
        if let Some(value) = settings.get("line-break-is-blank").and_then(parse_bool) {
            self.line_break_is_blank = value;
        }

        if let Some(value) = settings.get("escape-char") {
            self.escape_char = match value.as_str() {
                Some("") => None,
                Some(s) => Some(single_char(s, "escape-char")?),
                None => return Err(ScanError::Config("escape-char must be a string".to_string())),
            };
        }

        if let Some(n) = settings.get("tab-width").and_then(Value::as_integer) {
            self.tab_width = n.clamp(1, 16) as usize; // Between 1 and 16
        }

        if let Some(value) = settings.get("pairs") {
            let Some(items) = value.as_array() else {
                return Err(ScanError::Config("pairs must be an array".to_string()));
            };
            self.pairs = items.iter().map(parse_pair).collect::<Result<_>>()?;
        }

        if let Some(value) = settings.get("language") {
            let Some(tables) = value.as_array() else {
                return Err(ScanError::Config("language must be an array of tables".to_string()));
            };
            for table in tables {
                let table = table
                    .as_table()
                    .ok_or_else(|| ScanError::Config("language entry must be a table".to_string()))?;
                self.languages.push(parse_language(table)?);
            }
        }

        Ok(())
    }
}

/// Parse a boolean value, accepting strings like "yes" and "on" too
fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(n) => Some(*n != 0),
        Value::String(s) => {
            let s = s.to_lowercase();
            Some(matches!(s.as_str(), "true" | "yes" | "on" | "1"))
        }
        _ => None,
    }
}

fn single_char(s: &str, key: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ScanError::Config(format!("{} must be a single character, got {:?}", key, s))),
    }
}

fn parse_pair(value: &Value) -> Result<PeerPair> {
    let s = value
        .as_str()
        .ok_or_else(|| ScanError::Config("pair must be a string".to_string()))?;
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(open), Some(close), None) => Ok(PeerPair::new(open, close)),
        _ => Err(ScanError::Config(format!("pair must be two characters, got {:?}", s))),
    }
}

fn required_str<'t>(table: &'t Table, key: &str, what: &str) -> Result<&'t str> {
    table
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ScanError::Config(format!("{} needs a string '{}'", what, key)))
}

fn parse_language(table: &Table) -> Result<LanguageDefinition> {
    let name = required_str(table, "name", "language")?;
    let mut lang = LanguageDefinition::new(name);

    if let Some(extensions) = table.get("extensions").and_then(Value::as_array) {
        for ext in extensions.iter().filter_map(Value::as_str) {
            lang.add_extension(ext);
        }
    }

    let blocks = table.get("block").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
    for (i, block) in blocks.iter().enumerate() {
        let Some(block) = block.as_table() else { continue };
        let rule_name = required_str(block, "name", "block rule")?;
        let start = required_str(block, "start", "block rule")?;
        let end = required_str(block, "end", "block rule")?;
        let partition = required_str(block, "partition", "block rule")?;
        let state_id = u8::try_from(i + 1)
            .map_err(|_| ScanError::Config(format!("language {} has too many block rules", name)))?;
        let rule = match block.get("escape").and_then(Value::as_str) {
            Some(escape) => BlockRule::with_escape(
                rule_name,
                start,
                end,
                partition,
                state_id,
                single_char(escape, "escape")?,
            )?,
            None => BlockRule::new(rule_name, start, end, partition, state_id)?,
        };
        lang.add_block_rule(rule);
    }

    let lines = table.get("line").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
    for line in lines {
        let Some(line) = line.as_table() else { continue };
        let rule_name = required_str(line, "name", "line rule")?;
        let pattern = required_str(line, "pattern", "line rule")?;
        let partition = required_str(line, "partition", "line rule")?;
        let priority = line.get("priority").and_then(Value::as_integer).unwrap_or(0);
        lang.add_line_rule(LineRule::new(rule_name, pattern, partition, priority as i32)?);
    }

    Ok(lang)
}
