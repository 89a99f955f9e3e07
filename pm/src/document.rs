//! Documents and the loader that reads them from a template directory
//!
//! A [`Document`] is an insertion-ordered YAML mapping. Keys keep the order
//! they had in the source file, which is also the order they render in.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::config::Config;
use crate::error::MergeError;

const MERGE_KEY: &str = "<<";

/// An ordered key/value document parsed from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    mapping: Mapping,
}

impl Document {
    pub fn from_mapping(mapping: Mapping) -> Self {
        Self { mapping }
    }

    /// Parse YAML text; `origin` is only used in error messages
    ///
    /// An empty document is an empty mapping. Any other non-mapping top level
    /// is rejected. `<<` merge keys are expanded.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, MergeError> {
        debug!("Document::from_yaml_str: called origin={} len={}", origin.display(), text.len());
        if text.trim().is_empty() {
            debug!("Document::from_yaml_str: empty input, returning empty mapping");
            return Ok(Self::default());
        }

        let mut value: Value = serde_yaml::from_str(text).map_err(|e| MergeError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        expand_merge_keys(&mut value).map_err(|message| MergeError::Parse {
            path: origin.to_path_buf(),
            message,
        })?;

        match value {
            Value::Mapping(mapping) => Ok(Self { mapping }),
            Value::Null => Ok(Self::default()),
            other => Err(MergeError::Parse {
                path: origin.to_path_buf(),
                message: format!("top level must be a mapping, found {}", value_kind(&other)),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.mapping.get(key)
    }

    /// The `prompt` section, if present
    pub fn prompt(&self) -> Option<&Value> {
        self.get(crate::PROMPT_KEY)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.mapping.keys()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub(crate) fn as_mapping_mut(&mut self) -> &mut Mapping {
        &mut self.mapping
    }
}

/// Flatten `<<` merge keys in place, recursively
///
/// Merged entries come first, followed by the mapping's own entries; for a
/// sequence of sources the earliest source wins. Own entries always win.
/// Positions follow first appearance in that sequence.
fn expand_merge_keys(value: &mut Value) -> Result<(), String> {
    match value {
        Value::Mapping(mapping) => {
            if mapping.contains_key(MERGE_KEY) {
                let own = std::mem::take(mapping);
                let mut pairs: Vec<(Value, Value)> = Vec::new();
                let mut rest: Vec<(Value, Value)> = Vec::new();
                for (key, entry) in own {
                    if key.as_str() == Some(MERGE_KEY) {
                        merge_sources(entry, &mut pairs)?;
                    } else {
                        rest.push((key, entry));
                    }
                }
                pairs.extend(rest);
                for (key, entry) in pairs {
                    mapping.insert(key, entry);
                }
            }
            for entry in mapping.values_mut() {
                expand_merge_keys(entry)?;
            }
        }
        Value::Sequence(sequence) => {
            for entry in sequence.iter_mut() {
                expand_merge_keys(entry)?;
            }
        }
        Value::Tagged(tagged) => expand_merge_keys(&mut tagged.value)?,
        _ => {}
    }
    Ok(())
}

fn merge_sources(source: Value, pairs: &mut Vec<(Value, Value)>) -> Result<(), String> {
    match source {
        Value::Mapping(mapping) => {
            let mut source = Value::Mapping(mapping);
            expand_merge_keys(&mut source)?;
            if let Value::Mapping(mapping) = source {
                pairs.extend(mapping);
            }
        }
        Value::Sequence(sources) => {
            for source in sources.into_iter().rev() {
                if !matches!(source, Value::Mapping(_)) {
                    return Err(format!(
                        "merge key '{}' expects mappings, found {} in sequence",
                        MERGE_KEY,
                        value_kind(&source)
                    ));
                }
                merge_sources(source, pairs)?;
            }
        }
        other => {
            return Err(format!(
                "merge key '{}' expects a mapping or a sequence of mappings, found {}",
                MERGE_KEY,
                value_kind(&other)
            ));
        }
    }
    Ok(())
}

/// Human-readable name of a YAML value's kind
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Reads `<dir>/<name>.<extension>` documents
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    dir: PathBuf,
    base_name: String,
    extension: String,
}

impl DocumentLoader {
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.template_dir, &config.base_name, &config.extension)
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Path of the document called `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{}.{}", name, self.extension))
        }
    }

    /// Load and parse the document called `name`
    pub fn load(&self, name: &str) -> Result<Document, MergeError> {
        let path = self.path_for(name);
        debug!("DocumentLoader::load: called name={} path={}", name, path.display());

        let text = fs::read_to_string(&path).map_err(|e| MergeError::from_read(&path, e))?;
        let doc = Document::from_yaml_str(&text, &path)?;

        info!("Loaded {} ({} top-level keys)", path.display(), doc.len());
        Ok(doc)
    }

    /// Load the configured base document
    pub fn load_base(&self) -> Result<Document, MergeError> {
        self.load(&self.base_name)
    }
}
