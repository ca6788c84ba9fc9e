use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use oregen_blocks::BlockSelector;
use toml::{Table, Value};

use crate::error::ConfigError;
use crate::parse::{Lenient, Parsed, join};
use crate::settings::GenerationSettings;

/// `target -> replacement`, evaluated in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplacementRule {
    pub target: BlockSelector,
    pub replacement: BlockSelector,
}

impl ReplacementRule {
    pub fn new(target: &str, replacement: &str) -> Self {
        Self {
            target: BlockSelector::parse(target),
            replacement: BlockSelector::parse(replacement),
        }
    }
}

/// Aggregate ore configuration: which resources are active, how each one
/// generates, and optional per-resource replacement rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteConfig {
    /// Active resource names. Iterated in name order during generation.
    pub ores: BTreeSet<String>,
    pub generators: HashMap<String, GenerationSettings>,
    pub replacements: HashMap<String, Vec<ReplacementRule>>,
}

impl VoteConfig {
    pub fn is_empty(&self) -> bool {
        self.ores.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.ores.iter().map(String::as_str)
    }

    pub fn settings(&self, resource: &str) -> Option<&GenerationSettings> {
        self.generators.get(resource)
    }

    /// Replacement rules for `resource`; empty when none are configured.
    pub fn rules(&self, resource: &str) -> &[ReplacementRule] {
        self.replacements
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn with_generator(mut self, settings: GenerationSettings) -> Self {
        self.ores.insert(settings.resource.clone());
        self.generators.insert(settings.resource.clone(), settings);
        self
    }

    pub fn with_rule(mut self, resource: &str, target: &str, replacement: &str) -> Self {
        self.replacements
            .entry(resource.to_string())
            .or_default()
            .push(ReplacementRule::new(target, replacement));
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Parsed<Self>, ConfigError> {
        let table: Table = toml::from_str(s).map_err(ConfigError::Parse)?;
        Ok(Self::from_table(&table))
    }

    pub fn from_value(value: &Value) -> Parsed<Self> {
        match value {
            Value::Table(t) => Self::from_table(t),
            other => {
                let mut lenient = Lenient::default();
                lenient.skip(String::new(), "table", other);
                lenient.finish(VoteConfig::default())
            }
        }
    }

    pub fn from_table(root: &Table) -> Parsed<Self> {
        let mut lenient = Lenient::default();
        let mut cfg = VoteConfig::default();

        if let Some(items) = lenient.array(root, "ores", "") {
            for name in lenient.strings(items, "ores") {
                let name = name.trim();
                if !name.is_empty() {
                    cfg.ores.insert(name.to_string());
                }
            }
        }

        if let Some(generators) = lenient.table(root, "generators", "") {
            for (name, value) in generators {
                let path = join("generators", name);
                match value {
                    Value::Table(t) => {
                        let settings = GenerationSettings::from_table(name, t, &path, &mut lenient);
                        cfg.generators.insert(name.clone(), settings);
                    }
                    other => lenient.skip(path, "table", other),
                }
            }
        }

        if let Some(replacements) = lenient.table(root, "replacements", "") {
            for (resource, value) in replacements {
                let path = join("replacements", resource);
                let Value::Table(specs) = value else {
                    lenient.skip(path, "table", value);
                    continue;
                };
                let mut rules = Vec::with_capacity(specs.len());
                for (target, replacement) in specs {
                    match replacement {
                        Value::String(r) => rules.push(ReplacementRule::new(target, r)),
                        other => lenient.skip(join(&path, target), "string", other),
                    }
                }
                if !rules.is_empty() {
                    cfg.replacements.insert(resource.clone(), rules);
                }
            }
        }

        for name in &cfg.ores {
            if !cfg.generators.contains_key(name) {
                log::debug!("active resource {} has no generator settings", name);
            }
        }
        lenient.finish(cfg)
    }
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Parsed<VoteConfig>, ConfigError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(ConfigError::Read)?;
    let parsed = VoteConfig::from_toml_str(&s)?;
    parsed.log_skipped(&path.display().to_string());
    log::info!(
        "loaded ore config from {}: {} active, {} generators, {} replacement sets",
        path.display(),
        parsed.value.ores.len(),
        parsed.value.generators.len(),
        parsed.value.replacements.len()
    );
    Ok(parsed)
}
