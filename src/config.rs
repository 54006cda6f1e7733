//! Builder configuration.

use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

/// Maps a raw `href` type designator to a normalized one.
pub type TypeNormalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Options recognized by the [`ModelBuilder`](crate::builder::ModelBuilder).
#[derive(Clone)]
pub struct ParserConfig {
    /// Applied to every `href` property target. Identity by default.
    pub normalize_type: TypeNormalizer,
    /// Packages whose id matches are parsed as a list of views.
    pub view_pattern: Option<Regex>,
    /// Nested packages whose id matches are recorded but not descended into.
    pub exclude_pattern: Option<Regex>,
    /// Raw parsed name → display name.
    pub name_map: IndexMap<String, String>,
    /// Warn about property names starting with an upper-case letter.
    pub check_property_name_case: bool,
    /// Namespace prefix → IRI used to expand `prefix:local` names.
    pub prefixes: IndexMap<String, String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            normalize_type: Arc::new(|href: &str| href.to_string()),
            view_pattern: None,
            exclude_pattern: None,
            name_map: IndexMap::new(),
            check_property_name_case: false,
            prefixes: default_prefixes(),
        }
    }
}

impl std::fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserConfig")
            .field("view_pattern", &self.view_pattern)
            .field("exclude_pattern", &self.exclude_pattern)
            .field("name_map", &self.name_map)
            .field("check_property_name_case", &self.check_property_name_case)
            .field("prefixes", &self.prefixes)
            .finish_non_exhaustive()
    }
}

impl ParserConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the href normalizer.
    pub fn with_normalize_type(
        mut self,
        normalize: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.normalize_type = Arc::new(normalize);
        self
    }

    /// Set the view package pattern.
    pub fn with_view_pattern(mut self, pattern: Regex) -> Self {
        self.view_pattern = Some(pattern);
        self
    }

    /// Set the excluded-subtree pattern.
    pub fn with_exclude_pattern(mut self, pattern: Regex) -> Self {
        self.exclude_pattern = Some(pattern);
        self
    }

    /// Add a display-name replacement.
    pub fn with_name(mut self, raw: impl Into<String>, display: impl Into<String>) -> Self {
        self.name_map.insert(raw.into(), display.into());
        self
    }

    /// Enable the property-name case check.
    pub fn with_property_name_case_check(mut self, enabled: bool) -> Self {
        self.check_property_name_case = enabled;
        self
    }

    /// Register a namespace prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), iri.into());
        self
    }

    /// Normalize an href through the configured normalizer.
    pub fn normalize(&self, href: &str) -> String {
        (self.normalize_type)(href)
    }

    /// Map a raw name to its display form: `name_map` first, then prefix
    /// expansion.
    pub fn display_name(&self, raw: &str) -> String {
        match self.name_map.get(raw) {
            Some(mapped) => mapped.clone(),
            None => self.expand_prefix(raw),
        }
    }

    /// Expand `prefix:local` into `<iri>local` for a known prefix.
    pub fn expand_prefix(&self, name: &str) -> String {
        let Some((prefix, rest)) = name.split_once(':') else {
            return name.to_string();
        };
        match self.prefixes.get(prefix) {
            Some(iri) => format!("{iri}{rest}"),
            None => name.to_string(),
        }
    }

    /// Returns true if the package id selects a view container.
    pub fn is_view_package(&self, id: &str) -> bool {
        self.view_pattern.as_ref().is_some_and(|re| re.is_match(id))
    }

    /// Returns true if the nested package's subtree is skipped.
    pub fn is_excluded_package(&self, id: &str) -> bool {
        self.exclude_pattern
            .as_ref()
            .is_some_and(|re| re.is_match(id))
    }
}

fn default_prefixes() -> IndexMap<String, String> {
    [
        ("xsd", "http://www.w3.org/2001/XMLSchema#"),
        ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
        ("owl", "http://www.w3.org/2002/07/owl#"),
        ("dc", "http://purl.org/dc/elements/1.1/"),
        ("dcterms", "http://purl.org/dc/terms/"),
    ]
    .into_iter()
    .map(|(p, iri)| (p.to_string(), iri.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefix_expanded() {
        let config = ParserConfig::new();
        assert_eq!(
            config.display_name("xsd:string"),
            "http://www.w3.org/2001/XMLSchema#string"
        );
        assert_eq!(config.display_name("LanguageSpecification"), "LanguageSpecification");
        assert_eq!(config.display_name("foo:bar"), "foo:bar");
    }

    #[test]
    fn test_name_map_wins_over_prefix() {
        let config = ParserConfig::new().with_name("xsd:string", "String");
        assert_eq!(config.display_name("xsd:string"), "String");
    }

    #[test]
    fn test_patterns() {
        let config = ParserConfig::new()
            .with_view_pattern(Regex::new("_views$").unwrap())
            .with_exclude_pattern(Regex::new("Pattern999").unwrap());
        assert!(config.is_view_package("ddi_views"));
        assert!(!config.is_view_package("ddi_core"));
        assert!(config.is_excluded_package("Pattern999_x"));
    }

    #[test]
    fn test_custom_normalizer() {
        let config = ParserConfig::new()
            .with_normalize_type(|href| href.rsplit('#').next().unwrap_or(href).to_string());
        assert_eq!(config.normalize("types.xmi#String"), "String");
    }
}
