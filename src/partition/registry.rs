//! Language registry
//!
//! Maps file extensions to language definitions and hands out partitioners.

use std::collections::HashMap;
use std::path::Path;

use log::debug;

use super::builtin;
use super::language::LanguageDefinition;
use super::map::RulePartitioner;

/// Known language definitions, keyed by name
pub struct LanguageRegistry {
    /// Loaded language definitions
    languages: HashMap<String, LanguageDefinition>,
    /// Extension to language name mapping
    extension_map: HashMap<String, String>,
}

impl LanguageRegistry {
    /// Create a registry holding the built-in languages
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for lang in builtin::all_languages() {
            registry.add_language(lang);
        }
        registry
    }

    /// Create a registry without any languages
    pub fn empty() -> Self {
        Self {
            languages: HashMap::new(),
            extension_map: HashMap::new(),
        }
    }

    /// Add a language definition, replacing one of the same name
    pub fn add_language(&mut self, lang: LanguageDefinition) {
        let name = lang.name.clone();
        for ext in &lang.extensions {
            if let Some(previous) = self.extension_map.insert(ext.to_lowercase(), name.clone()) {
                if previous != name {
                    debug!("extension '{}' moves from {} to {}", ext, previous, name);
                }
            }
        }
        self.languages.insert(name, lang);
    }

    /// Detect language from filename
    pub fn detect_language(&self, filename: &Path) -> Option<&str> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        self.extension_map.get(&ext).map(|s| s.as_str())
    }

    /// Get a language definition by name
    pub fn get_language(&self, name: &str) -> Option<&LanguageDefinition> {
        self.languages.get(name)
    }

    /// Partitioner for a file, if its language is known
    ///
    /// Scanners query the [`PartitionMap`](super::PartitionMap) it builds,
    /// not the partitioner.
    pub fn partitioner_for(&self, filename: &Path) -> Option<RulePartitioner<'_>> {
        let name = self.detect_language(filename)?;
        self.get_language(name).map(RulePartitioner::new)
    }

    /// List available languages
    pub fn list_languages(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.languages.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionClassifier;

    #[test]
    fn test_detect_language() {
        let registry = LanguageRegistry::new();

        assert_eq!(registry.detect_language(Path::new("analysis.R")), Some("R"));
        assert_eq!(registry.detect_language(Path::new("main.rs")), Some("Rust"));
        assert_eq!(registry.detect_language(Path::new("test.py")), Some("Python"));
        assert_eq!(registry.detect_language(Path::new("Cargo.toml")), Some("TOML"));
        assert_eq!(registry.detect_language(Path::new("main.c")), Some("C"));
        assert_eq!(registry.detect_language(Path::new("README.md")), None);
        assert_eq!(registry.detect_language(Path::new("no_extension")), None);
    }

    #[test]
    fn test_partitioner_for() {
        let registry = LanguageRegistry::new();
        let partitioner = registry.partitioner_for(Path::new("lib.rs")).unwrap();
        assert_eq!(partitioner.partitioning(), "Rust");
        assert!(registry.partitioner_for(Path::new("notes.txt")).is_none());
    }

    #[test]
    fn test_add_language_overrides_extension() {
        let mut registry = LanguageRegistry::new();
        let mut custom = LanguageDefinition::new("Rd");
        custom.add_extension("R");
        registry.add_language(custom);
        assert_eq!(registry.detect_language(Path::new("x.r")), Some("Rd"));
        assert_eq!(registry.list_languages(), vec!["C", "Python", "R", "Rd", "Rust", "TOML"]);
    }
}
