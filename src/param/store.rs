//! Parameter store holding the parameter definitions of one template

use std::collections::HashMap;

use serde_yaml::Mapping;

use crate::args::ArgStore;
use crate::error::{ResolveError, Result};
use crate::record::{key_label, key_to_string};

use super::ParamEntry;

/// Parameter definitions indexed by ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamStore {
    entries: HashMap<String, ParamEntry>,
}

impl ParamStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a `parameters` mapping from a template record
    ///
    /// Keys converting to the same ID (`1` and `"1"`) are a duplicate.
    pub fn from_mapping(mapping: Mapping) -> Result<Self> {
        let mut store = Self::new();
        let mut labels: HashMap<String, String> = HashMap::new();
        for (key, value) in mapping {
            let id = key_to_string(&key)?;
            if let Some(first) = labels.get(&id) {
                return Err(ResolveError::duplicate("parameter", id, first.clone(), key_label(&key)));
            }
            let entry = ParamEntry::from_value(&id, value)?;
            labels.insert(id.clone(), key_label(&key));
            store.add(&id, entry);
        }
        Ok(store)
    }

    /// Add an entry under `id`, setting the entry's own ID to match
    ///
    /// Callers check for duplicate IDs beforehand.
    pub fn add(&mut self, id: &str, mut entry: ParamEntry) {
        assert!(
            entry.id().is_empty() || entry.id() == id,
            "parameter key '{}' conflicts with entry ID '{}'",
            id,
            entry.id()
        );
        assert!(
            !self.entries.contains_key(id),
            "parameter '{}' added twice",
            id
        );
        entry.set_id(id);
        self.entries.insert(id.to_string(), entry);
    }

    pub fn get(&self, id: &str) -> Option<&ParamEntry> {
        self.entries.get(id)
    }

    /// Get an entry, failing with a not-found error
    pub fn require(&self, id: &str) -> Result<&ParamEntry> {
        self.get(id)
            .ok_or_else(|| ResolveError::not_found("parameter", id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inherit all entries of another store
    ///
    /// Any ID present in both stores is an error, and nothing is copied in
    /// that case. Inherited entries are independent copies.
    pub fn inherit_from(&mut self, other: &ParamStore) -> Result<()> {
        if let Some(id) = other
            .sorted_keys()
            .into_iter()
            .find(|id| self.entries.contains_key(id))
        {
            return Err(ResolveError::duplicate(
                "parameter",
                id,
                "inheriting store",
                "inherited store",
            ));
        }

        for (id, entry) in &other.entries {
            self.add(id, entry.duplicate());
        }
        Ok(())
    }

    /// Check all parameter definitions, reporting the first invalid one
    ///
    /// Values a parameter derives from its argument must not land on the
    /// key of another parameter.
    pub fn is_valid(&self) -> Result<()> {
        for id in self.sorted_keys() {
            if let Some(entry) = self.get(&id) {
                entry
                    .is_valid()
                    .map_err(|e| e.context(format!("parameter '{}'", id)))?;
                if let Some(clash) = entry.derived_keys().into_iter().find(|k| self.contains(k)) {
                    return Err(ResolveError::validation(format!(
                        "derived argument '{}' is also defined as a parameter",
                        clash
                    ))
                    .context(format!("parameter '{}'", id)));
                }
            }
        }
        Ok(())
    }

    /// Validate every supplied argument against its parameter
    ///
    /// Each argument needs a matching parameter. Parameters without an
    /// argument are not checked. Derived values written back by a
    /// parameter are not validated themselves.
    pub fn validate_and_process_args(&self, args: &mut ArgStore) -> Result<()> {
        for key in args.keys() {
            let entry = self.get(&key).ok_or_else(|| {
                ResolveError::validation("no corresponding parameter registered for template")
                    .context(format!("argument '{}'", key))
            })?;

            entry
                .validate_and_process_args(args)
                .map_err(|e| e.context(format!("argument '{}'", key)))?;
        }
        Ok(())
    }

    /// `id=example` pairs for all parameters, sorted by ID
    pub fn example_arguments(&self) -> Vec<String> {
        self.sorted_keys()
            .into_iter()
            .filter_map(|id| self.get(&id))
            .map(|entry| format!("{}={}", entry.id(), entry.example()))
            .collect()
    }

    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Multi-line listing of all parameters, sorted by ID
    pub fn describe(&self, verbose: bool) -> String {
        self.sorted_keys()
            .into_iter()
            .filter_map(|id| self.get(&id))
            .map(|entry| entry.describe(verbose))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store(yaml: &str) -> ParamStore {
        let mapping: Mapping = serde_yaml::from_str(yaml).expect("Fixture should be valid YAML");
        ParamStore::from_mapping(mapping).expect("Should decode")
    }

    const PARAMS: &str = r#"
societyid:
  type: societyid
  description: Society ID
  example: 123456-2001
faction:
  type: choice
  description: Faction
  example: Envoy's Alliance
  choices: [Envoy's Alliance, Grand Archive]
char:
  type: text
  description: Character name
  example: Stabby
"#;

    #[test]
    fn test_from_mapping_sets_ids() {
        let store = store(PARAMS);
        assert_eq!(store.len(), 3);
        assert_eq!(store.sorted_keys(), vec!["char", "faction", "societyid"]);
        for id in store.sorted_keys() {
            assert_eq!(store.get(&id).map(|e| e.id()), Some(id.as_str()));
        }
        assert!(store.is_valid().is_ok());
    }

    #[test]
    fn test_example_arguments_round_trip() {
        let store = store(PARAMS);
        let examples = store.example_arguments();
        assert_eq!(
            examples,
            vec![
                "char=Stabby",
                "faction=Envoy's Alliance",
                "societyid=123456-2001"
            ]
        );

        let mut args = ArgStore::from_args(&examples).expect("Should parse");
        store
            .validate_and_process_args(&mut args)
            .expect("Example arguments should validate");
        assert_eq!(args.get("societyid.player"), Some("123456"));
    }

    #[test]
    fn test_numeric_and_string_key_collide() {
        let yaml = r#"
1:
  type: text
  description: First
  example: a
"1":
  type: text
  description: Second
  example: b
"#;
        let mapping: Mapping = serde_yaml::from_str(yaml).expect("Fixture should be valid YAML");
        let err = ParamStore::from_mapping(mapping).unwrap_err();
        match err {
            ResolveError::DuplicateId { kind, id, first, second } => {
                assert_eq!(kind, "parameter");
                assert_eq!(id, "1");
                assert_eq!(first, "key 1");
                assert_eq!(second, "key \"1\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_derived_key_clashing_with_parameter_is_invalid() {
        let store = store(
            r#"
s:
  type: societyid
  description: Society ID
  example: 1-2001
s.player:
  type: choice
  description: Player tier
  example: gold
  choices: [gold, silver]
"#,
        );
        let err = store.is_valid().unwrap_err();
        assert!(matches!(err.root(), ResolveError::Validation { .. }));
        let msg = err.to_string();
        assert!(msg.contains("parameter 's'") && msg.contains("s.player"), "{}", msg);
    }

    #[test]
    fn test_argument_without_parameter_fails() {
        let store = store(PARAMS);
        let mut args = ArgStore::from_args(["unknown=1"]).unwrap();
        let err = store.validate_and_process_args(&mut args).unwrap_err();
        assert!(matches!(err.root(), ResolveError::Validation { .. }));
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_missing_arguments_are_fine() {
        let store = store(PARAMS);
        let mut args = ArgStore::new();
        assert!(store.validate_and_process_args(&mut args).is_ok());
    }

    #[test]
    fn test_inherit_rejects_every_duplicate() {
        let mut a = store(PARAMS);
        let b = store("char:\n  type: text\n  description: d\n  example: e\n");
        let err = a.inherit_from(&b).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateId { .. }));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_inherit_copies_entries() {
        let mut a = store("player:\n  type: text\n  description: d\n  example: e\n");
        let b = store(PARAMS);
        a.inherit_from(&b).expect("Should inherit");
        assert_eq!(a.len(), 4);
        assert_eq!(a.get("faction"), b.get("faction"));
    }

    #[test]
    fn test_is_valid_names_entry() {
        let store = store("broken:\n  type: text\n  description: d\n");
        let err = store.is_valid().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    #[should_panic]
    fn test_add_conflicting_id_panics() {
        let mut store = ParamStore::new();
        let mut entry = ParamEntry::Text(Default::default());
        entry.set_id("a");
        store.add("b", entry);
    }

    #[test]
    fn test_require_unknown_is_not_found() {
        let store = store(PARAMS);
        assert!(matches!(
            store.require("nope"),
            Err(ResolveError::NotFound { .. })
        ));
    }

    #[test]
    fn test_describe_sorted() {
        let store = store(PARAMS);
        insta::assert_snapshot!(store.describe(false), @r###"
        - char: Character name
        - faction: Faction
        - societyid: Society ID
        "###);
    }
}
