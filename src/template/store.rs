//! Template store: all templates of one resolution run, indexed by ID

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::error::{ResolveError, Result};
use crate::loader;
use crate::record::TemplateRecord;

use super::ChronicleTemplate;

/// Collection of chronicle templates indexed by unique ID
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: HashMap<String, ChronicleTemplate>,
    /// Alias -> template ID
    aliases: HashMap<String, String>,
    /// Directory the templates were loaded from, if any
    root: Option<PathBuf>,
    /// Set once every template has its ancestors merged in
    inheritance_resolved: bool,
}

impl TemplateStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from decoded `(locator, record)` pairs
    ///
    /// Fails on the first record that cannot be turned into a template, and
    /// on any template ID or alias defined twice. Inheritance is not
    /// resolved yet.
    pub fn build<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, TemplateRecord)>,
    {
        let mut store = Self::new();
        for (locator, record) in records {
            let template = ChronicleTemplate::from_record(&locator, record)?;
            store.insert(template)?;
        }
        store.register_aliases()?;
        Ok(store)
    }

    /// Build, resolve inheritance and validate every template
    pub fn load<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, TemplateRecord)>,
    {
        let mut store = Self::build(records)?;
        store.resolve_inheritance()?;
        store.validate()?;
        info!(templates = store.templates.len(), "template store ready");
        Ok(store)
    }

    /// Load all template files below the configured root
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        let records = loader::load_records(config)?;
        let mut store = Self::load(records)?;
        store.root = Some(config.root.clone());
        Ok(store)
    }

    fn insert(&mut self, template: ChronicleTemplate) -> Result<()> {
        if let Some(existing) = self.templates.get(template.id()) {
            return Err(ResolveError::duplicate(
                "template",
                template.id(),
                existing.locator(),
                template.locator(),
            ));
        }
        debug!(template = %template.id(), locator = %template.locator(), "added template");
        self.templates.insert(template.id().to_string(), template);
        Ok(())
    }

    // Done after all templates are in, so that an alias clashing with a
    // template defined in a later file is caught as well.
    fn register_aliases(&mut self) -> Result<()> {
        for id in self.list_template_ids(false) {
            let Some(template) = self.templates.get(&id) else {
                continue;
            };
            for alias in template.aliases() {
                if let Some(owner) = self.templates.get(alias) {
                    return Err(ResolveError::duplicate(
                        "template",
                        alias.as_str(),
                        owner.locator(),
                        template.locator(),
                    ));
                }
                if let Some(owner) = self.aliases.get(alias).and_then(|t| self.templates.get(t)) {
                    return Err(ResolveError::duplicate(
                        "template",
                        alias.as_str(),
                        owner.locator(),
                        template.locator(),
                    ));
                }
                self.aliases.insert(alias.clone(), id.clone());
            }
        }
        Ok(())
    }

    /// Directory the templates were loaded from
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template ID for an ID or alias
    fn canonical_id<'a>(&'a self, id: &'a str) -> Option<&'a str> {
        if self.templates.contains_key(id) {
            Some(id)
        } else {
            self.aliases.get(id).map(String::as_str)
        }
    }

    /// Get a template by ID or alias
    pub fn get_template(&self, id: &str) -> Result<&ChronicleTemplate> {
        self.canonical_id(id)
            .and_then(|canonical| self.templates.get(canonical))
            .ok_or_else(|| ResolveError::not_found("template", id))
    }

    /// Sorted template IDs, optionally including aliases
    pub fn list_template_ids(&self, include_aliases: bool) -> Vec<String> {
        let mut ids: Vec<String> = self.templates.keys().cloned().collect();
        if include_aliases {
            ids.extend(self.aliases.keys().cloned());
        }
        ids.sort();
        ids.dedup();
        ids
    }

    /// Merge every template's ancestors into it
    ///
    /// Ancestors are resolved before their descendants, so chains of any
    /// length are flattened. A missing parent or a cycle is an error.
    ///
    /// On error the store is left as it was. Once resolution succeeded,
    /// further calls do nothing.
    pub fn resolve_inheritance(&mut self) -> Result<()> {
        if self.inheritance_resolved {
            return Ok(());
        }
        let mut templates = self.templates.clone();
        let mut resolved = HashSet::new();
        for id in self.list_template_ids(false) {
            let mut chain = Vec::new();
            self.resolve_template(&mut templates, &id, &mut resolved, &mut chain)?;
        }
        self.templates = templates;
        self.inheritance_resolved = true;
        Ok(())
    }

    fn resolve_template(
        &self,
        templates: &mut HashMap<String, ChronicleTemplate>,
        id: &str,
        resolved: &mut HashSet<String>,
        chain: &mut Vec<String>,
    ) -> Result<()> {
        if resolved.contains(id) {
            return Ok(());
        }
        if chain.iter().any(|c| c == id) {
            return Err(ResolveError::inheritance(format!(
                "inheritance cycle: {} -> {}",
                chain.join(" -> "),
                id
            )));
        }

        let template = templates
            .get(id)
            .ok_or_else(|| ResolveError::not_found("template", id))?;
        let Some(parent_ref) = template.inherit().map(str::to_string) else {
            resolved.insert(id.to_string());
            return Ok(());
        };
        let parent_id = self
            .canonical_id(&parent_ref)
            .map(str::to_string)
            .ok_or_else(|| {
                ResolveError::inheritance(format!(
                    "template '{}' inherits from unknown template '{}'",
                    id, parent_ref
                ))
            })?;

        chain.push(id.to_string());
        self.resolve_template(templates, &parent_id, resolved, chain)?;
        chain.pop();

        let parent = templates
            .get(&parent_id)
            .cloned()
            .ok_or_else(|| ResolveError::not_found("template", parent_id.as_str()))?;
        let child = templates
            .get_mut(id)
            .ok_or_else(|| ResolveError::not_found("template", id))?;
        child
            .inherit_from(&parent)
            .map_err(|e| e.at(child.locator()))?;

        debug!(template = %id, parent = %parent_id, "resolved inheritance");
        resolved.insert(id.to_string());
        Ok(())
    }

    /// Validate every template, in ID order
    pub fn validate(&self) -> Result<()> {
        for id in self.list_template_ids(false) {
            let template = self.get_template(&id)?;
            template.validate().map_err(|e| e.at(template.locator()))?;
        }
        Ok(())
    }

    /// Multi-line listing of all templates, sorted by ID
    pub fn describe(&self, verbose: bool) -> String {
        self.list_template_ids(false)
            .iter()
            .filter_map(|id| self.templates.get(id))
            .map(|t| t.describe(verbose))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
