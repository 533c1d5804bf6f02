//! Content entries: positioned items that make up a chronicle template
//!
//! Every entry is decoded from a YAML mapping whose `type` field selects
//! one of a closed set of variants. The remaining fields are decoded
//! strictly into the variant struct; unexpected fields are rejected.
//!
//! # Example
//!
//! ```yaml
//! content:
//!   player:
//!     type: text
//!     x: 10
//!     y: 20
//!     x2: 60
//!     y2: 25
//! ```

mod fields;
mod variants;

use std::collections::BTreeMap;
use std::fmt;

use serde_yaml::{Mapping, Value};

use crate::error::{ResolveError, Result};
use crate::record::{key_label, key_to_string};

pub(crate) use fields::PresetFields;
pub use variants::{Choice, Multiline, Rectangle, Text, Trigger};

/// Discriminator for the content entry variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Rectangle,
    Trigger,
    Choice,
    Multiline,
}

impl ContentKind {
    /// All known variants, in registry order
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Text,
        ContentKind::Rectangle,
        ContentKind::Trigger,
        ContentKind::Choice,
        ContentKind::Multiline,
    ];

    /// The `type` tag used in template files
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Rectangle => "rectangle",
            ContentKind::Trigger => "trigger",
            ContentKind::Choice => "choice",
            ContentKind::Multiline => "multiline",
        }
    }

    /// Look up a variant by its `type` tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Decode the variant-specific fields of a record (without `type`)
    fn decode(self, fields: Value) -> std::result::Result<ContentEntry, serde_yaml::Error> {
        Ok(match self {
            ContentKind::Text => ContentEntry::Text(serde_yaml::from_value(fields)?),
            ContentKind::Rectangle => ContentEntry::Rectangle(serde_yaml::from_value(fields)?),
            ContentKind::Trigger => ContentEntry::Trigger(serde_yaml::from_value(fields)?),
            ContentKind::Choice => ContentEntry::Choice(serde_yaml::from_value(fields)?),
            ContentKind::Multiline => ContentEntry::Multiline(serde_yaml::from_value(fields)?),
        })
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single content entry of a chronicle template
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEntry {
    Text(Text),
    Rectangle(Rectangle),
    Trigger(Trigger),
    Choice(Choice),
    Multiline(Multiline),
}

impl ContentEntry {
    /// Decode a content record, dispatching on its `type` field
    pub fn from_value(id: &str, value: Value) -> Result<Self> {
        let Value::Mapping(mut fields) = value else {
            return Err(ResolveError::load(format!(
                "content entry '{}' is not a mapping",
                id
            )));
        };

        let kind = match fields.remove("type") {
            Some(Value::String(tag)) if !tag.is_empty() => ContentKind::from_tag(&tag)
                .ok_or_else(|| ResolveError::unknown_type("content", tag))?,
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(ResolveError::load(format!(
                    "content entry '{}': missing or empty 'type' field",
                    id
                )));
            }
            Some(other) => {
                return Err(ResolveError::load(format!(
                    "content entry '{}': 'type' must be a string, found {:?}",
                    id, other
                )));
            }
        };

        let nested = match kind {
            ContentKind::Trigger | ContentKind::Choice => fields.remove("content"),
            ContentKind::Text | ContentKind::Rectangle | ContentKind::Multiline => None,
        };

        let mut entry = kind
            .decode(Value::Mapping(fields))
            .map_err(|e| ResolveError::from_yaml(&e).context(format!("content entry '{}'", id)))?;
        entry.set_id(id);
        if let Some(block) = nested {
            entry
                .decode_nested(block)
                .map_err(|e| e.context(format!("content entry '{}'", id)))?;
        }
        Ok(entry)
    }

    /// Decode every entry of a mapping, keyed by the mapping keys
    ///
    /// Keys that differ in YAML but convert to the same ID (`1` and `"1"`)
    /// are rejected.
    pub fn decode_map(mapping: Mapping) -> Result<BTreeMap<String, ContentEntry>> {
        let mut entries = BTreeMap::new();
        let mut labels: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in mapping {
            let id = key_to_string(&key)?;
            if let Some(first) = labels.get(&id) {
                return Err(ResolveError::duplicate("content", id, first.clone(), key_label(&key)));
            }
            let entry = Self::from_value(&id, value)?;
            labels.insert(id.clone(), key_label(&key));
            entries.insert(id, entry);
        }
        Ok(entries)
    }

    /// Decode the nested `content` block of a trigger or choice entry
    fn decode_nested(&mut self, block: Value) -> Result<()> {
        let mapping = nested_mapping(block, "nested content")?;
        match self {
            ContentEntry::Trigger(e) => e.content = Self::decode_map(mapping)?,
            ContentEntry::Choice(e) => {
                let mut labels: BTreeMap<String, String> = BTreeMap::new();
                for (key, value) in mapping {
                    let choice = key_to_string(&key)?;
                    if let Some(first) = labels.get(&choice) {
                        return Err(ResolveError::duplicate(
                            "choice",
                            choice,
                            first.clone(),
                            key_label(&key),
                        ));
                    }
                    let block = nested_mapping(value, &format!("content for choice '{}'", choice))?;
                    let entries = Self::decode_map(block)
                        .map_err(|e| e.context(format!("choice '{}'", choice)))?;
                    labels.insert(choice.clone(), key_label(&key));
                    e.content.insert(choice, entries);
                }
            }
            ContentEntry::Text(_) | ContentEntry::Rectangle(_) | ContentEntry::Multiline(_) => {}
        }
        Ok(())
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentEntry::Text(_) => ContentKind::Text,
            ContentEntry::Rectangle(_) => ContentKind::Rectangle,
            ContentEntry::Trigger(_) => ContentKind::Trigger,
            ContentEntry::Choice(_) => ContentKind::Choice,
            ContentEntry::Multiline(_) => ContentKind::Multiline,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ContentEntry::Text(e) => &e.id,
            ContentEntry::Rectangle(e) => &e.id,
            ContentEntry::Trigger(e) => &e.id,
            ContentEntry::Choice(e) => &e.id,
            ContentEntry::Multiline(e) => &e.id,
        }
    }

    fn set_id(&mut self, id: &str) {
        let slot = match self {
            ContentEntry::Text(e) => &mut e.id,
            ContentEntry::Rectangle(e) => &mut e.id,
            ContentEntry::Trigger(e) => &mut e.id,
            ContentEntry::Choice(e) => &mut e.id,
            ContentEntry::Multiline(e) => &mut e.id,
        };
        *slot = id.to_string();
    }

    pub fn desc(&self) -> Option<&str> {
        match self {
            ContentEntry::Text(e) => e.desc.as_deref(),
            ContentEntry::Rectangle(e) => e.desc.as_deref(),
            ContentEntry::Trigger(e) => e.desc.as_deref(),
            ContentEntry::Choice(e) => e.desc.as_deref(),
            ContentEntry::Multiline(e) => e.desc.as_deref(),
        }
    }

    /// IDs of the presets this entry asks the renderer to apply
    pub fn preset_refs(&self) -> &[String] {
        match self {
            ContentEntry::Text(e) => &e.presets,
            ContentEntry::Rectangle(e) => &e.presets,
            ContentEntry::Trigger(e) => &e.presets,
            ContentEntry::Choice(e) => &e.presets,
            ContentEntry::Multiline(e) => &e.presets,
        }
    }

    /// Parameter this entry is linked to (trigger and choice entries)
    pub fn parameter_ref(&self) -> Option<&str> {
        match self {
            ContentEntry::Trigger(e) => e.trigger.as_deref(),
            ContentEntry::Choice(e) => e.choices.as_deref(),
            ContentEntry::Text(_) | ContentEntry::Rectangle(_) | ContentEntry::Multiline(_) => None,
        }
    }

    /// Entries nested below a trigger or choice entry
    pub fn nested(&self) -> Vec<&ContentEntry> {
        match self {
            ContentEntry::Trigger(e) => e.content.values().collect(),
            ContentEntry::Choice(e) => e.content.values().flat_map(|m| m.values()).collect(),
            ContentEntry::Text(_) | ContentEntry::Rectangle(_) | ContentEntry::Multiline(_) => {
                Vec::new()
            }
        }
    }

    /// Copy every field that is unset here from the preset
    ///
    /// Only fields that exist on both variants are considered. Fields set
    /// on this entry are never touched, whatever their value.
    pub fn add_missing_values_from(&mut self, preset: &ContentEntry) {
        let fallback = preset.preset_fields();
        match self {
            ContentEntry::Text(e) => e.fill_from(&fallback),
            ContentEntry::Rectangle(e) => e.fill_from(&fallback),
            ContentEntry::Trigger(e) => e.fill_from(&fallback),
            ContentEntry::Choice(e) => e.fill_from(&fallback),
            ContentEntry::Multiline(e) => e.fill_from(&fallback),
        }
    }

    pub(crate) fn preset_fields(&self) -> PresetFields {
        match self {
            ContentEntry::Text(e) => e.preset_fields(),
            ContentEntry::Rectangle(e) => e.preset_fields(),
            ContentEntry::Trigger(e) => e.preset_fields(),
            ContentEntry::Choice(e) => e.preset_fields(),
            ContentEntry::Multiline(e) => e.preset_fields(),
        }
    }
}

fn nested_mapping(value: Value, what: &str) -> Result<Mapping> {
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ResolveError::load(format!("{} is not a mapping", what))),
    }
}
