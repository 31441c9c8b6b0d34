//! File types: named bundles of parsers, rules, transformers and a
//! serializer that all agree on one IR type.

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::builtin::STRING_IR;
use crate::config::{FileTypeDefinition, RuleSetSpec};
use crate::error::{LintError, LintResult};
use crate::parser::Parser;
use crate::plugin::PluginManager;
use crate::rule::Rule;
use crate::ruleset::{RuleSet, RuleSetting};
use crate::serializer::Serializer;
use crate::transformer::Transformer;

pub const UNKNOWN_FILE_TYPE: &str = "unknown";

pub struct FileType {
    name: String,
    ir_type: String,
    plugins: Arc<PluginManager>,
    locales: Option<Vec<String>>,
    project_locales: Vec<String>,
    template: Option<String>,
    parsers: Option<Vec<Arc<dyn Parser>>>,
    rule_set_names: Vec<String>,
    transformers: Vec<Arc<dyn Transformer>>,
    serializer: Option<Arc<dyn Serializer>>,
    rules: OnceLock<Vec<Arc<dyn Rule>>>,
}

/// Tracks the IR type while components are resolved; the first component
/// to report one makes it authoritative.
struct TypeCheck<'a> {
    file_type: &'a str,
    established: Option<String>,
}

impl TypeCheck<'_> {
    fn check(&mut self, kind: &'static str, name: &str, actual: &str) -> LintResult<()> {
        match &self.established {
            None => {
                self.established = Some(actual.to_string());
                Ok(())
            }
            Some(expected) if expected == actual => Ok(()),
            Some(expected) => Err(LintError::TypeMismatch {
                kind,
                name: name.to_string(),
                actual: actual.to_string(),
                file_type: self.file_type.to_string(),
                expected: expected.clone(),
            }),
        }
    }
}

impl FileType {
    /// Resolve a file type definition against the registries.
    ///
    /// Every named parser, transformer and serializer must exist and must
    /// handle the same IR type; otherwise construction fails. Unresolvable
    /// rule set names are only reported when the rules are first requested.
    pub fn new(
        name: &str,
        def: &FileTypeDefinition,
        plugins: Arc<PluginManager>,
        project_locales: &[String],
    ) -> LintResult<Self> {
        let mut types = TypeCheck {
            file_type: name,
            established: def.ir_type.clone(),
        };
        let context = || format!("the configuration for filetype {name}");

        let parsers = match &def.parsers {
            None => None,
            Some(names) => {
                let mut resolved = Vec::with_capacity(names.len());
                for parser_name in names {
                    let parser = plugins
                        .parsers()
                        .get(parser_name)
                        .ok_or_else(|| LintError::unknown("parser", parser_name, context()))?;
                    types.check("parser", parser_name, parser.ir_type())?;
                    resolved.push(parser);
                }
                Some(resolved)
            }
        };

        let rule_set_names = match &def.ruleset {
            None => Vec::new(),
            Some(RuleSetSpec::Name(set)) => vec![set.clone()],
            Some(RuleSetSpec::Names(sets)) => sets.clone(),
            Some(RuleSetSpec::Inline(body)) => {
                let synthesized = format!("{name}-unnamed-ruleset");
                plugins
                    .rules()
                    .add_rule_set_definition(&synthesized, body.clone());
                vec![synthesized]
            }
        };

        let mut transformers = Vec::new();
        for transformer_name in def.transformers.iter().flatten() {
            let transformer = plugins
                .transformers()
                .get(transformer_name)
                .ok_or_else(|| LintError::unknown("transformer", transformer_name, context()))?;
            types.check("transformer", transformer_name, transformer.ir_type())?;
            transformers.push(transformer);
        }

        let serializer = match &def.serializer {
            None => None,
            Some(spec) => {
                let serializer = plugins
                    .serializers()
                    .get(spec.name(), &spec.options())?
                    .ok_or_else(|| LintError::unknown("serializer", spec.name(), context()))?;
                types.check("serializer", spec.name(), serializer.ir_type())?;
                Some(Arc::from(serializer))
            }
        };

        let ir_type = types.established.unwrap_or_else(|| STRING_IR.to_string());
        debug!(filetype = name, ir_type = %ir_type, "resolved file type");

        Ok(Self {
            name: name.to_string(),
            ir_type,
            plugins,
            locales: def.locales.clone(),
            project_locales: project_locales.to_vec(),
            template: def.template.clone(),
            parsers,
            rule_set_names,
            transformers,
            serializer,
            rules: OnceLock::new(),
        })
    }

    /// The fallback type for files no path mapping claims: parsers by
    /// extension, no rules.
    pub fn unknown(plugins: Arc<PluginManager>, project_locales: &[String]) -> Self {
        Self {
            name: UNKNOWN_FILE_TYPE.to_string(),
            ir_type: STRING_IR.to_string(),
            plugins,
            locales: None,
            project_locales: project_locales.to_vec(),
            template: None,
            parsers: None,
            rule_set_names: Vec::new(),
            transformers: Vec::new(),
            serializer: None,
            rules: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ir_type(&self) -> &str {
        &self.ir_type
    }

    /// Configured parsers, or every parser registered for `extension`.
    pub fn parsers_for(&self, extension: Option<&str>) -> Vec<Arc<dyn Parser>> {
        match (&self.parsers, extension) {
            (Some(parsers), _) => parsers.clone(),
            (None, Some(ext)) => self.plugins.parsers().get_by_extension(ext),
            (None, None) => Vec::new(),
        }
    }

    pub fn rule_set_names(&self) -> &[String] {
        &self.rule_set_names
    }

    /// Resolved rules, computed once.
    ///
    /// Rule sets merge in order: `true` or an options value adds (or
    /// reconfigures) a rule, `false` removes it.
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        self.rules.get_or_init(|| self.resolve_rules())
    }

    fn resolve_rules(&self) -> Vec<Arc<dyn Rule>> {
        let registry = self.plugins.rules();
        let mut set = RuleSet::new();
        for set_name in &self.rule_set_names {
            let Some(definition) = registry.get_rule_set_definition(set_name) else {
                warn!(filetype = %self.name, ruleset = %set_name, "could not find rule set");
                continue;
            };
            for (rule_name, setting) in definition.iter() {
                let options = match setting {
                    RuleSetting::Enabled(false) => {
                        set.remove(rule_name);
                        continue;
                    }
                    RuleSetting::Enabled(true) => None,
                    RuleSetting::Options(options) => Some(options),
                };
                match registry.get(rule_name, options) {
                    Ok(rule) => set.add(rule),
                    Err(err) => {
                        warn!(filetype = %self.name, ruleset = %set_name, %err, "skipping rule")
                    }
                }
            }
        }
        debug!(filetype = %self.name, rules = ?set, "resolved rules");
        set.into_rules()
    }

    pub fn transformers(&self) -> &[Arc<dyn Transformer>] {
        &self.transformers
    }

    pub fn serializer(&self) -> Option<&Arc<dyn Serializer>> {
        self.serializer.as_ref()
    }

    /// Own locales, or the project's when none are configured.
    pub fn locales(&self) -> &[String] {
        self.locales.as_deref().unwrap_or(&self.project_locales)
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }
}

impl std::fmt::Debug for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileType")
            .field("name", &self.name)
            .field("ir_type", &self.ir_type)
            .field("rule_sets", &self.rule_set_names)
            .finish_non_exhaustive()
    }
}
