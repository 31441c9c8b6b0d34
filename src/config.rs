//! Project configuration files.
//!
//! A project directory is recognised by one of [`CONFIG_FILE_NAMES`]. TOML
//! and JSON are both accepted; the format follows the file extension.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ruleset::RuleSetDefinition;

/// Candidate configuration file names, in lookup order.
pub const CONFIG_FILE_NAMES: &[&str] = &["loclint.toml", "loclint.json"];

/// String-keyed map that keeps document order.
///
/// Order matters for path globs (first match wins) and rule set bodies
/// (later entries override earlier ones). Re-inserting a key replaces the
/// value in its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> OrderedMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for OrderedMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<T> IntoIterator for OrderedMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

impl<T: Serialize> Serialize for OrderedMap<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

/// Top-level configuration of one project directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub name: Option<String>,
    pub locales: Option<Vec<String>>,
    #[serde(alias = "sourceLocale")]
    pub source_locale: Option<String>,
    pub plugins: Vec<String>,
    pub excludes: Option<Vec<String>>,
    /// Rules built from declarative definitions (e.g. regex source checkers).
    pub rules: Vec<DeclarativeRuleDefinition>,
    pub rulesets: OrderedMap<RuleSetDefinition>,
    pub formatters: Vec<FormatterDefinition>,
    /// Default fixer options, keyed by IR type.
    pub fixers: OrderedMap<Value>,
    pub filetypes: OrderedMap<FileTypeDefinition>,
    /// Include globs mapped to a file type name or an inline definition.
    pub paths: OrderedMap<PathMapping>,
    pub autofix: Option<bool>,
    #[serde(alias = "maxAutofixIterations")]
    pub max_autofix_iterations: Option<usize>,
}

/// A rule defined entirely in configuration, interpreted by the declarative
/// rule kind named in `type`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarativeRuleDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(flatten)]
    pub options: serde_json::Map<String, Value>,
}

/// A formatter defined by an output template.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatterDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub template: String,
    #[serde(default, alias = "highlightStart")]
    pub highlight_start: Option<String>,
    #[serde(default, alias = "highlightEnd")]
    pub highlight_end: Option<String>,
}

/// Either a single rule set name, a list of names, or an anonymous body.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleSetSpec {
    Name(String),
    Names(Vec<String>),
    Inline(RuleSetDefinition),
}

/// A serializer by name, or by name with constructor options.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SerializerSpec {
    Name(String),
    Configured {
        name: String,
        #[serde(flatten)]
        options: serde_json::Map<String, Value>,
    },
}

impl SerializerSpec {
    pub fn name(&self) -> &str {
        match self {
            SerializerSpec::Name(name) | SerializerSpec::Configured { name, .. } => name,
        }
    }

    pub fn options(&self) -> Value {
        match self {
            SerializerSpec::Name(_) => Value::Null,
            SerializerSpec::Configured { options, .. } => Value::Object(options.clone()),
        }
    }
}

/// Definition of a file type, either named under `filetypes` or inline
/// under `paths`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileTypeDefinition {
    pub locales: Option<Vec<String>>,
    /// Path template used to derive a file's locale from its path.
    pub template: Option<String>,
    /// Explicit IR type, normally inferred from the parsers.
    #[serde(rename = "type")]
    pub ir_type: Option<String>,
    pub parsers: Option<Vec<String>>,
    pub ruleset: Option<RuleSetSpec>,
    pub transformers: Option<Vec<String>>,
    pub serializer: Option<SerializerSpec>,
    /// Path-level excludes; only meaningful for inline definitions.
    pub excludes: Option<Vec<String>>,
}

/// Value of a `paths` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathMapping {
    Named(String),
    Inline(FileTypeDefinition),
}

impl PathMapping {
    pub fn excludes(&self) -> Option<&[String]> {
        match self {
            PathMapping::Named(_) => None,
            PathMapping::Inline(def) => def.excludes.as_deref(),
        }
    }

    pub fn template(&self) -> Option<&str> {
        match self {
            PathMapping::Named(_) => None,
            PathMapping::Inline(def) => def.template.as_deref(),
        }
    }
}

/// Return the configuration file inside `dir`, if any. Parent directories
/// are not consulted; each directory is its own project scope.
pub fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

pub fn load_config_file(path: &Path) -> Result<LintConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let cfg = if is_json {
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?
    } else {
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?
    };
    Ok(cfg)
}

pub fn load_config(
    explicit_path: Option<&Path>,
    dir: &Path,
) -> Result<Option<(PathBuf, LintConfig)>> {
    if let Some(p) = explicit_path {
        let cfg = load_config_file(p)?;
        return Ok(Some((p.to_path_buf(), cfg)));
    }

    let Some(p) = find_config_in_dir(dir) else {
        return Ok(None);
    };
    let cfg = load_config_file(&p)?;
    Ok(Some((p, cfg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::RuleSetting;

    #[test]
    fn toml_keeps_path_order() {
        let cfg: LintConfig = toml::from_str(
            r#"
            name = "demo"
            sourceLocale = "en-GB"

            [paths]
            "src/**/*.js" = "javascript"
            "**/*.json" = { parsers = ["string"], ruleset = ["json-rules"], excludes = ["**/package.json"] }
            "**" = "unknown"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.source_locale.as_deref(), Some("en-GB"));
        let globs: Vec<_> = cfg.paths.keys().collect();
        assert_eq!(globs, ["src/**/*.js", "**/*.json", "**"]);
        let json = cfg.paths.get("**/*.json").unwrap();
        assert_eq!(json.excludes(), Some(&["**/package.json".to_string()][..]));
        assert!(matches!(cfg.paths.get("**"), Some(PathMapping::Named(n)) if n == "unknown"));
    }

    #[test]
    fn json_rulesets_and_inline_ruleset() {
        let cfg: LintConfig = serde_json::from_str(
            r#"{
                "rulesets": {
                    "generic": { "quote-style": true, "no-dupes": false, "max-len": { "limit": 80 } }
                },
                "filetypes": {
                    "properties": {
                        "parsers": ["line"],
                        "ruleset": { "quote-style": true },
                        "serializer": { "name": "line", "eol": "\n" }
                    }
                },
                "maxAutofixIterations": 4
            }"#,
        )
        .unwrap();

        let generic = cfg.rulesets.get("generic").unwrap();
        let names: Vec<_> = generic.keys().collect();
        assert_eq!(names, ["quote-style", "no-dupes", "max-len"]);
        assert!(matches!(generic.get("no-dupes"), Some(RuleSetting::Enabled(false))));
        assert!(matches!(generic.get("max-len"), Some(RuleSetting::Options(_))));

        let props = cfg.filetypes.get("properties").unwrap();
        assert!(matches!(props.ruleset, Some(RuleSetSpec::Inline(_))));
        let serializer = props.serializer.as_ref().unwrap();
        assert_eq!(serializer.name(), "line");
        assert_eq!(serializer.options()["eol"], "\n");
        assert_eq!(cfg.max_autofix_iterations, Some(4));
    }

    #[test]
    fn declarative_rule_keeps_extra_fields() {
        let cfg: LintConfig = toml::from_str(
            r#"
            [[rules]]
            type = "source-checker"
            name = "no-todo"
            description = "No TODO markers"
            note = "Found {matchString}"
            regexps = ["TODO"]
            "#,
        )
        .unwrap();
        let rule = &cfg.rules[0];
        assert_eq!(rule.kind, "source-checker");
        assert_eq!(rule.options["regexps"][0], "TODO");
        assert!(!rule.options.contains_key("name"));
    }

    #[test]
    fn reinserting_a_key_keeps_position() {
        let mut map: OrderedMap<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        map.insert("a", 3);
        let items: Vec<_> = map.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        assert_eq!(items, [("a".to_string(), 3), ("b".to_string(), 2)]);
    }

    #[test]
    fn load_config_prefers_toml_and_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(None, dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join("loclint.json"), r#"{"name": "json"}"#).unwrap();
        std::fs::write(dir.path().join("loclint.toml"), "name = \"toml\"\n").unwrap();
        let (path, cfg) = load_config(None, dir.path()).unwrap().unwrap();
        assert!(path.ends_with("loclint.toml"));
        assert_eq!(cfg.name.as_deref(), Some("toml"));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "paths = 3").unwrap();
        let err = load_config(Some(&bad), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }
}
