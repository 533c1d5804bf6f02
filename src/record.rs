//! Decoded template records, one per template file

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{ResolveError, Result};

/// Raw template file contents before conversion into a `ChronicleTemplate`
///
/// Content, preset and parameter records are kept as raw YAML mappings;
/// they are decoded through their variant registries when the template is
/// constructed. The decoder rejects repeated keys, but distinct keys may
/// still convert to the same ID (`1` and `"1"`), so each registry checks
/// for collisions itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateRecord {
    pub id: Option<String>,
    pub description: Option<String>,
    pub inherit: Option<String>,
    pub aliases: Option<Vec<String>>,
    pub content: Option<Mapping>,
    pub presets: Option<Mapping>,
    pub parameters: Option<Mapping>,
}

impl TemplateRecord {
    /// Decode a template file
    ///
    /// A blank document yields an empty record.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let record: Option<Self> =
            serde_yaml::from_str(source).map_err(|e| ResolveError::from_yaml(&e))?;
        Ok(record.unwrap_or_default())
    }
}

/// Turn a YAML mapping key into an ID string
///
/// Numbers and booleans are accepted since authors tend to leave choice
/// values like `1` or `yes` unquoted.
pub(crate) fn key_to_string(key: &Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ResolveError::load(format!(
            "expected a string key, found {:?}",
            other
        ))),
    }
}

/// Render a mapping key the way it was written, for collision reports
pub(crate) fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => format!("key \"{}\"", s),
        other => match key_to_string(other) {
            Ok(id) => format!("key {}", id),
            Err(_) => format!("key {:?}", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_document_is_empty_record() {
        let record = TemplateRecord::from_yaml_str("").expect("Should decode");
        assert!(record.id.is_none());
        assert!(record.content.is_none());

        let record = TemplateRecord::from_yaml_str("# just a comment\n").expect("Should decode");
        assert!(record.description.is_none());
    }

    #[test]
    fn test_full_record() {
        let yaml = r#"
id: base
description: Base layout
inherit: root
aliases: [b]
content:
  foo:
    type: text
presets:
  default:
    type: text
parameters:
  char:
    type: text
"#;
        let record = TemplateRecord::from_yaml_str(yaml).expect("Should decode");
        assert_eq!(record.id.as_deref(), Some("base"));
        assert_eq!(record.inherit.as_deref(), Some("root"));
        assert_eq!(record.aliases, Some(vec!["b".to_string()]));
        assert_eq!(record.content.map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_null_sections_are_absent() {
        let record = TemplateRecord::from_yaml_str("id: a\ncontent:\npresets:\n").expect("Should decode");
        assert!(record.content.is_none());
        assert!(record.presets.is_none());
    }

    #[test]
    fn test_unknown_top_level_field_fails() {
        let err = TemplateRecord::from_yaml_str("id: a\ncolour: red\n").unwrap_err();
        assert!(matches!(err, ResolveError::Load { .. }));
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_malformed_yaml_fails() {
        assert!(TemplateRecord::from_yaml_str("id: [unclosed\n").is_err());
    }

    #[test]
    fn test_duplicate_content_key_fails() {
        let yaml = "id: a\ncontent:\n  foo:\n    type: text\n  foo:\n    type: text\n";
        assert!(TemplateRecord::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_key_to_string() {
        assert_eq!(key_to_string(&Value::from(1)).unwrap(), "1");
        assert_eq!(key_to_string(&Value::from("x")).unwrap(), "x");
        assert!(key_to_string(&Value::Null).is_err());
    }

    #[test]
    fn test_key_label_keeps_quoting() {
        assert_eq!(key_label(&Value::from(1)), "key 1");
        assert_eq!(key_label(&Value::from("1")), "key \"1\"");
    }

    #[test]
    fn test_null_document_is_empty_record() {
        let record = TemplateRecord::from_yaml_str("~\n").expect("Should decode");
        assert!(record.id.is_none());
    }

    #[test]
    fn test_unknown_field_error_keeps_offset() {
        let err = TemplateRecord::from_yaml_str("id: a\ncolour: red\n").unwrap_err();
        match err {
            ResolveError::Load { offset, .. } => assert!(offset.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
