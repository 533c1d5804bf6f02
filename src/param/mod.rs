//! Parameter entries describing the arguments a template accepts
//!
//! Like content entries, parameters are a closed set of variants selected
//! by a `type` field. Each variant validates its own definition and the
//! arguments supplied for it, and may write derived values back into the
//! argument store.

mod store;

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;

use crate::args::ArgStore;
use crate::error::{ResolveError, Result};

pub use store::ParamStore;

/// `<player>-<character>`, e.g. `123456-2001`
static SOCIETY_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").expect("society id pattern is valid")
});

/// Discriminator for the parameter variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Text,
    SocietyId,
    Choice,
}

impl ParamKind {
    pub const ALL: [ParamKind; 3] = [ParamKind::Text, ParamKind::SocietyId, ParamKind::Choice];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Text => "text",
            ParamKind::SocietyId => "societyid",
            ParamKind::Choice => "choice",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    fn decode(self, fields: Value) -> std::result::Result<ParamEntry, serde_yaml::Error> {
        Ok(match self {
            ParamKind::Text => ParamEntry::Text(serde_yaml::from_value(fields)?),
            ParamKind::SocietyId => ParamEntry::SocietyId(serde_yaml::from_value(fields)?),
            ParamKind::Choice => ParamEntry::Choice(serde_yaml::from_value(fields)?),
        })
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form text, any value is accepted
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextParam {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: String,
    /// Heading under which the parameter is listed
    pub group: Option<String>,
}

/// Society ID of the form `<player>-<character>`
///
/// A valid argument is normalized and split into `<id>.player` and
/// `<id>.char`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocietyIdParam {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: String,
    pub group: Option<String>,
}

/// One value out of a fixed list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceParam {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: String,
    pub group: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// A single parameter definition
#[derive(Debug, Clone, PartialEq)]
pub enum ParamEntry {
    Text(TextParam),
    SocietyId(SocietyIdParam),
    Choice(ChoiceParam),
}

impl ParamEntry {
    /// Decode a parameter record, dispatching on its `type` field
    ///
    /// The returned entry has no ID yet; `ParamStore::add` sets it.
    pub fn from_value(key: &str, value: Value) -> Result<Self> {
        let Value::Mapping(mut fields) = value else {
            return Err(ResolveError::load(format!(
                "parameter '{}' is not a mapping",
                key
            )));
        };

        let kind = match fields.remove("type") {
            Some(Value::String(tag)) if !tag.is_empty() => ParamKind::from_tag(&tag)
                .ok_or_else(|| ResolveError::unknown_type("parameter", tag))?,
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(ResolveError::load(format!(
                    "parameter '{}': missing or empty 'type' field",
                    key
                )));
            }
            Some(other) => {
                return Err(ResolveError::load(format!(
                    "parameter '{}': 'type' must be a string, found {:?}",
                    key, other
                )));
            }
        };

        kind.decode(Value::Mapping(fields))
            .map_err(|e| ResolveError::from_yaml(&e).context(format!("parameter '{}'", key)))
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            ParamEntry::Text(_) => ParamKind::Text,
            ParamEntry::SocietyId(_) => ParamKind::SocietyId,
            ParamEntry::Choice(_) => ParamKind::Choice,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ParamEntry::Text(p) => &p.id,
            ParamEntry::SocietyId(p) => &p.id,
            ParamEntry::Choice(p) => &p.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: &str) {
        let slot = match self {
            ParamEntry::Text(p) => &mut p.id,
            ParamEntry::SocietyId(p) => &mut p.id,
            ParamEntry::Choice(p) => &mut p.id,
        };
        *slot = id.to_string();
    }

    pub fn description(&self) -> &str {
        match self {
            ParamEntry::Text(p) => &p.description,
            ParamEntry::SocietyId(p) => &p.description,
            ParamEntry::Choice(p) => &p.description,
        }
    }

    pub fn example(&self) -> &str {
        match self {
            ParamEntry::Text(p) => &p.example,
            ParamEntry::SocietyId(p) => &p.example,
            ParamEntry::Choice(p) => &p.example,
        }
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            ParamEntry::Text(p) => p.group.as_deref(),
            ParamEntry::SocietyId(p) => p.group.as_deref(),
            ParamEntry::Choice(p) => p.group.as_deref(),
        }
    }

    /// Allowed values, for choice parameters
    pub fn choices(&self) -> Option<&[String]> {
        match self {
            ParamEntry::Choice(p) => Some(&p.choices),
            ParamEntry::Text(_) | ParamEntry::SocietyId(_) => None,
        }
    }

    /// Argument keys this parameter writes back besides its own
    pub fn derived_keys(&self) -> Vec<String> {
        match self {
            ParamEntry::SocietyId(p) => society_id_keys(&p.id).to_vec(),
            ParamEntry::Text(_) | ParamEntry::Choice(_) => Vec::new(),
        }
    }

    /// Independent copy for another store
    ///
    /// Entries own all their data, so a clone shares nothing with the
    /// original.
    pub fn duplicate(&self) -> ParamEntry {
        self.clone()
    }

    /// Check the definition itself
    pub fn is_valid(&self) -> Result<()> {
        let id = self.id();
        if id.is_empty() || id.trim() != id || id.contains('=') {
            return Err(ResolveError::validation(
                "ID must be non-empty, without surrounding whitespace and without '='",
            ));
        }
        if self.description().is_empty() {
            return Err(ResolveError::validation("missing description"));
        }
        if self.example().is_empty() {
            return Err(ResolveError::validation("missing example value"));
        }

        match self {
            ParamEntry::Text(_) => Ok(()),
            ParamEntry::SocietyId(p) => {
                if SOCIETY_ID.is_match(&p.example) {
                    Ok(())
                } else {
                    Err(ResolveError::validation(format!(
                        "example '{}' is not a society ID of the form <player>-<character>",
                        p.example
                    )))
                }
            }
            ParamEntry::Choice(p) => {
                if p.choices.is_empty() {
                    return Err(ResolveError::validation("no choices defined"));
                }
                for (i, choice) in p.choices.iter().enumerate() {
                    if p.choices[..i].contains(choice) {
                        return Err(ResolveError::validation(format!(
                            "choice '{}' listed more than once",
                            choice
                        )));
                    }
                }
                if !p.choices.contains(&p.example) {
                    return Err(ResolveError::validation(format!(
                        "example '{}' is not one of the choices",
                        p.example
                    )));
                }
                Ok(())
            }
        }
    }

    /// Validate the argument for this parameter, writing back derived values
    pub fn validate_and_process_args(&self, args: &mut ArgStore) -> Result<()> {
        let Some(value) = args.get(self.id()).map(str::to_string) else {
            return Ok(());
        };

        match self {
            ParamEntry::Text(_) => Ok(()),
            ParamEntry::SocietyId(p) => {
                let caps = SOCIETY_ID.captures(&value).ok_or_else(|| {
                    ResolveError::validation(format!(
                        "'{}' is not a society ID of the form <player>-<character>",
                        value
                    ))
                })?;
                let player = caps[1].to_string();
                let character = caps[2].to_string();
                args.set(p.id.as_str(), format!("{}-{}", player, character));
                let [player_key, char_key] = society_id_keys(&p.id);
                args.set(player_key, player);
                args.set(char_key, character);
                Ok(())
            }
            ParamEntry::Choice(p) => {
                if p.choices.contains(&value) {
                    Ok(())
                } else {
                    Err(ResolveError::validation(format!(
                        "'{}' is not one of: {}",
                        value,
                        p.choices.join(", ")
                    )))
                }
            }
        }
    }

    /// One entry of the parameter listing
    pub fn describe(&self, verbose: bool) -> String {
        let mut out = format!("- {}", self.id());
        if !self.description().is_empty() {
            out.push_str(&format!(": {}", self.description()));
        }
        if verbose {
            out.push_str(&format!("\n\tType: {}", self.kind()));
            out.push_str(&format!("\n\tExample: {}", self.example()));
            if let Some(choices) = self.choices() {
                out.push_str(&format!("\n\tChoices: {}", choices.join(", ")));
            }
        }
        out
    }
}

fn society_id_keys(id: &str) -> [String; 2] {
    [format!("{}.player", id), format!("{}.char", id)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(id: &str, yaml: &str) -> Result<ParamEntry> {
        let value: Value = serde_yaml::from_str(yaml).expect("Fixture should be valid YAML");
        let mut entry = ParamEntry::from_value(id, value)?;
        entry.set_id(id);
        Ok(entry)
    }

    #[test]
    fn test_decode_choice() {
        let entry = decode(
            "faction",
            "type: choice\ndescription: Faction\nexample: Grand Archive\nchoices: [Grand Archive, Vigilant Seal]",
        )
        .unwrap();
        assert_eq!(entry.kind(), ParamKind::Choice);
        assert_eq!(entry.choices().map(|c| c.len()), Some(2));
        assert!(entry.is_valid().is_ok());
    }

    #[test]
    fn test_unknown_param_type() {
        let err = decode("x", "type: number").unwrap_err();
        assert!(matches!(err, ResolveError::UnknownType { .. }));
    }

    #[test]
    fn test_missing_param_type() {
        let err = decode("x", "description: foo").unwrap_err();
        assert!(matches!(err, ResolveError::Load { .. }));
    }

    #[test]
    fn test_unknown_param_field() {
        let err = decode("x", "type: text\nchoices: [a]").unwrap_err();
        assert!(matches!(err.root(), ResolveError::Load { .. }));
    }

    #[test]
    fn test_is_valid_requires_example() {
        let entry = decode("x", "type: text\ndescription: foo").unwrap();
        assert!(entry.is_valid().is_err());
    }

    #[test]
    fn test_choice_example_must_be_listed() {
        let entry = decode("x", "type: choice\ndescription: d\nexample: c\nchoices: [a, b]").unwrap();
        assert!(entry.is_valid().is_err());
        let entry = decode("x", "type: choice\ndescription: d\nexample: a\nchoices: [a, a]").unwrap();
        assert!(entry.is_valid().is_err());
    }

    #[test]
    fn test_societyid_writes_back_parts() {
        let entry = decode("societyid", "type: societyid\ndescription: d\nexample: 123-2001").unwrap();
        let mut args = ArgStore::from_args(["societyid= 123456 - 2001 "]).unwrap();
        entry.validate_and_process_args(&mut args).expect("Should validate");
        assert_eq!(args.get("societyid"), Some("123456-2001"));
        assert_eq!(args.get("societyid.player"), Some("123456"));
        assert_eq!(args.get("societyid.char"), Some("2001"));
    }

    #[test]
    fn test_societyid_rejects_garbage() {
        let entry = decode("societyid", "type: societyid\ndescription: d\nexample: 123-2001").unwrap();
        let mut args = ArgStore::from_args(["societyid=abc"]).unwrap();
        let err = entry.validate_and_process_args(&mut args).unwrap_err();
        assert!(matches!(err, ResolveError::Validation { .. }));
    }

    #[test]
    fn test_choice_rejects_unlisted_value() {
        let entry = decode("x", "type: choice\ndescription: d\nexample: a\nchoices: [a, b]").unwrap();
        let mut args = ArgStore::from_args(["x=c"]).unwrap();
        assert!(entry.validate_and_process_args(&mut args).is_err());
    }

    #[test]
    fn test_duplicate_is_independent() {
        let entry = decode("x", "type: choice\ndescription: d\nexample: a\nchoices: [a]").unwrap();
        let mut copy = entry.duplicate();
        if let ParamEntry::Choice(p) = &mut copy {
            p.choices.push("b".to_string());
        }
        assert_eq!(entry.choices().map(|c| c.len()), Some(1));
        assert_eq!(copy.choices().map(|c| c.len()), Some(2));
    }
}
