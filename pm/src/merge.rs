//! Shallow merge of a child document's `prompt` section into a base document
//!
//! Only the `prompt` mapping is touched, and only one level deep: a child
//! value replaces the base value for the same key wholesale, nested mappings
//! included. Every other top-level key of the base passes through; every
//! other top-level key of the child is ignored.

use log::debug;
use serde_yaml::{Mapping, Value};

use crate::PROMPT_KEY;
use crate::document::{Document, value_kind};
use crate::error::{MergeError, Side};

/// Merge `child`'s `prompt` section into `base`, returning the merged document
pub fn merge(base: Document, child: &Document) -> Result<Document, MergeError> {
    let mut merged = base;
    merge_into(&mut merged, child)?;
    Ok(merged)
}

/// In-place form of [`merge`]
///
/// Overwritten keys keep their position in the base `prompt` mapping; new
/// keys are appended. On error `base` is left unmodified.
pub fn merge_into(base: &mut Document, child: &Document) -> Result<(), MergeError> {
    debug!("merge_into: called base_keys={} child_keys={}", base.len(), child.len());

    let target = base_prompt_mut(base)?;
    let overrides = match child_prompt(child)? {
        Some(overrides) => overrides,
        None => {
            debug!("merge_into: child has no prompt overrides, base unchanged");
            return Ok(());
        }
    };

    let mut replaced = 0usize;
    let mut added = 0usize;
    for (key, value) in overrides {
        if target.insert(key.clone(), value.clone()).is_some() {
            replaced += 1;
        } else {
            added += 1;
        }
    }

    debug!("merge_into: replaced={} added={}", replaced, added);
    Ok(())
}

fn base_prompt_mut(base: &mut Document) -> Result<&mut Mapping, MergeError> {
    match base.as_mapping_mut().get_mut(PROMPT_KEY) {
        Some(Value::Mapping(prompt)) => Ok(prompt),
        Some(other) => Err(MergeError::TypeMismatch {
            key: PROMPT_KEY.to_string(),
            side: Side::Base,
            found: value_kind(other),
        }),
        None => Err(MergeError::MissingKey {
            key: PROMPT_KEY.to_string(),
        }),
    }
}

fn child_prompt(child: &Document) -> Result<Option<&Mapping>, MergeError> {
    match child.prompt() {
        Some(Value::Mapping(prompt)) => Ok(Some(prompt)),
        Some(Value::Null) => {
            debug!("child_prompt: prompt is null, treating as absent");
            Ok(None)
        }
        Some(other) => Err(MergeError::TypeMismatch {
            key: PROMPT_KEY.to_string(),
            side: Side::Child,
            found: value_kind(other),
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::Path;

    fn doc(yaml: &str) -> Document {
        Document::from_yaml_str(yaml, Path::new("test.yml")).unwrap()
    }

    fn prompt_of(doc: &Document) -> &Mapping {
        doc.prompt().and_then(|p| p.as_mapping()).expect("prompt mapping")
    }

    #[test]
    fn test_merge_overrides_and_adds() {
        let base = doc("version: 2\nprompt:\n  a: 1\n  b: 2\nfooter: end\n");
        let child = doc("prompt:\n  b: 3\n  c: 4\n");

        let merged = merge(base, &child).unwrap();

        assert_eq!(
            crate::render(&merged).unwrap(),
            "version: 2\nprompt:\n  a: 1\n  b: 3\n  c: 4\nfooter: end\n"
        );
    }

    #[test]
    fn test_merge_preserves_key_order() {
        let base = doc("prompt:\n  z: 1\n  y: 2\n  x: 3\n");
        let child = doc("prompt:\n  new: 0\n  y: 20\n");

        let merged = merge(base, &child).unwrap();
        let keys: Vec<_> = prompt_of(&merged).keys().filter_map(|k| k.as_str()).collect();

        assert_eq!(keys, vec!["z", "y", "x", "new"]);
        assert_eq!(prompt_of(&merged).get("y"), Some(&Value::from(20)));
    }

    #[test]
    fn test_merge_child_without_prompt() {
        let base = doc("prompt:\n  a: 1\n");
        let child = doc("title: ignored\n");

        let merged = merge(base.clone(), &child).unwrap();
        assert_eq!(crate::render(&merged).unwrap(), crate::render(&base).unwrap());
    }

    #[test]
    fn test_merge_child_null_prompt_is_absent() {
        let base = doc("prompt:\n  a: 1\n");
        let child = doc("prompt:\n");

        let merged = merge(base, &child).unwrap();
        assert_eq!(crate::render(&merged).unwrap(), "prompt:\n  a: 1\n");
    }

    #[test]
    fn test_merge_ignores_child_top_level_keys() {
        let base = doc("prompt:\n  a: 1\nmeta: base\n");
        let child = doc("prompt:\n  a: 2\nmeta: child\nextra: true\n");

        let merged = merge(base, &child).unwrap();

        assert_eq!(merged.get("meta").and_then(|v| v.as_str()), Some("base"));
        assert!(merged.get("extra").is_none());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = doc("prompt:\n  rules:\n    style: terse\n    lang: en\n");
        let child = doc("prompt:\n  rules:\n    lang: ja\n");

        let merged = merge(base, &child).unwrap();
        let rules = prompt_of(&merged).get("rules").and_then(|v| v.as_mapping()).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("lang").and_then(|v| v.as_str()), Some("ja"));
        assert!(rules.get("style").is_none());
    }

    #[test]
    fn test_merge_missing_base_prompt() {
        let base = doc("title: no prompt here\n");
        let child = doc("prompt:\n  a: 1\n");

        let err = merge(base, &child).unwrap_err();
        assert!(matches!(err, MergeError::MissingKey { ref key } if key == "prompt"));
    }

    #[test]
    fn test_merge_base_prompt_not_mapping() {
        let base = doc("prompt: just text\n");
        let child = doc("prompt:\n  a: 1\n");

        let err = merge(base, &child).unwrap_err();
        assert!(matches!(
            err,
            MergeError::TypeMismatch {
                side: Side::Base,
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn test_merge_child_prompt_not_mapping() {
        let base = doc("prompt:\n  a: 1\n");
        let child = doc("prompt:\n  - a\n  - b\n");

        let err = merge(base, &child).unwrap_err();
        assert!(matches!(
            err,
            MergeError::TypeMismatch {
                side: Side::Child,
                found: "sequence",
                ..
            }
        ));
    }

    #[test]
    fn test_merge_into_leaves_base_on_error() {
        let mut base = doc("prompt:\n  a: 1\n");
        let before = base.clone();
        let child = doc("prompt: 42\n");

        assert!(merge_into(&mut base, &child).is_err());
        assert_eq!(crate::render(&base).unwrap(), crate::render(&before).unwrap());
    }

    #[test]
    fn test_merge_over_anchored_defaults() {
        let base = doc("defaults: &d\n  tone: calm\n  lang: en\nprompt:\n  <<: *d\n  role: dev\n");
        let child = doc("prompt:\n  lang: ja\n");

        let merged = merge(base, &child).unwrap();

        assert_eq!(
            crate::render(&merged).unwrap(),
            "defaults:\n  tone: calm\n  lang: en\nprompt:\n  tone: calm\n  lang: ja\n  role: dev\n"
        );
    }

    fn prompt_doc(entries: &[(String, i64)], extra: bool) -> Document {
        let mut prompt = Mapping::new();
        for (k, v) in entries {
            prompt.insert(Value::from(k.as_str()), Value::from(*v));
        }
        let mut root = Mapping::new();
        if extra {
            root.insert(Value::from("version"), Value::from(1));
        }
        root.insert(Value::from(PROMPT_KEY), Value::Mapping(prompt));
        Document::from_mapping(root)
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(
            base in prop::collection::vec(("[a-e]{1,3}", any::<i64>()), 0..8),
            child in prop::collection::vec(("[a-h]{1,3}", any::<i64>()), 0..8),
        ) {
            let base = prompt_doc(&base, true);
            let child = prompt_doc(&child, false);

            let once = merge(base, &child).unwrap();
            let twice = merge(once.clone(), &child).unwrap();
            prop_assert_eq!(crate::render(&once).unwrap(), crate::render(&twice).unwrap());
        }

        #[test]
        fn prop_child_values_win(
            base in prop::collection::vec(("[a-e]{1,3}", any::<i64>()), 0..8),
            child in prop::collection::vec(("[a-e]{1,3}", any::<i64>()), 0..8),
        ) {
            let base_doc = prompt_doc(&base, true);
            let child_doc = prompt_doc(&child, false);

            let merged = merge(base_doc.clone(), &child_doc).unwrap();
            let merged_prompt = prompt_of(&merged);
            let child_prompt = prompt_of(&child_doc);

            for (key, value) in child_prompt {
                prop_assert_eq!(merged_prompt.get(key), Some(value));
            }
            for (key, value) in prompt_of(&base_doc) {
                if !child_prompt.contains_key(key) {
                    prop_assert_eq!(merged_prompt.get(key), Some(value));
                }
            }
            prop_assert_eq!(merged.get("version"), base_doc.get("version"));
        }
    }
}
