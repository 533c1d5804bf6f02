//! A single chronicle template

use std::collections::HashMap;

use tracing::debug;

use crate::content::ContentEntry;
use crate::error::{ResolveError, Result};
use crate::param::ParamStore;
use crate::record::TemplateRecord;

/// Preset applied to every content entry of the same template
const DEFAULT_PRESET: &str = "default";

/// Named, inheritable bundle of content, preset and parameter definitions
#[derive(Debug, Clone)]
pub struct ChronicleTemplate {
    id: String,
    description: String,
    inherit: Option<String>,
    aliases: Vec<String>,
    locator: String,
    content: HashMap<String, ContentEntry>,
    presets: HashMap<String, ContentEntry>,
    parameters: ParamStore,
}

impl ChronicleTemplate {
    /// Create a template from a decoded record
    ///
    /// Fails if `id` or `description` is missing or empty, or if any
    /// content, preset or parameter record cannot be decoded.
    pub fn from_record(locator: &str, record: TemplateRecord) -> Result<Self> {
        let id = record
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ResolveError::load("template does not contain an ID").at(locator))?;
        let description = record
            .description
            .filter(|d| !d.is_empty())
            .ok_or_else(|| {
                ResolveError::load(format!("template '{}' does not contain a description", id))
                    .at(locator)
            })?;

        let wrap = |e: ResolveError| e.context(format!("template '{}'", id)).at(locator);

        let content: HashMap<_, _> = ContentEntry::decode_map(record.content.unwrap_or_default())
            .map_err(wrap)?
            .into_iter()
            .collect();
        let presets: HashMap<_, _> = ContentEntry::decode_map(record.presets.unwrap_or_default())
            .map_err(wrap)?
            .into_iter()
            .collect();
        let parameters =
            ParamStore::from_mapping(record.parameters.unwrap_or_default()).map_err(wrap)?;

        let mut template = Self {
            id,
            description,
            inherit: record.inherit.filter(|p| !p.is_empty()),
            aliases: record.aliases.unwrap_or_default(),
            locator: locator.to_string(),
            content,
            presets,
            parameters,
        };
        template.apply_default_preset();

        debug!(
            template = %template.id,
            content = template.content.len(),
            presets = template.presets.len(),
            parameters = template.parameters.len(),
            "constructed template"
        );
        Ok(template)
    }

    // Legacy behavior kept for existing template files: the "default"
    // preset fills unset fields of every entry defined in this template.
    // Entries inherited later are not affected.
    fn apply_default_preset(&mut self) {
        if let Some(preset) = self.presets.get(DEFAULT_PRESET) {
            for entry in self.content.values_mut() {
                entry.add_missing_values_from(preset);
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// ID of the template this one inherits from
    pub fn inherit(&self) -> Option<&str> {
        self.inherit.as_deref()
    }

    /// Alternative IDs under which this template can be looked up
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Locator of the file this template was loaded from
    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn parameters(&self) -> &ParamStore {
        &self.parameters
    }

    pub fn content(&self, id: &str) -> Result<&ContentEntry> {
        self.content
            .get(id)
            .ok_or_else(|| {
                ResolveError::not_found("content", id).context(format!("template '{}'", self.id))
            })
    }

    pub fn preset(&self, id: &str) -> Result<&ContentEntry> {
        self.presets
            .get(id)
            .ok_or_else(|| {
                ResolveError::not_found("preset", id).context(format!("template '{}'", self.id))
            })
    }

    /// Sorted content IDs; aliases are keys that differ from the entry's own ID
    pub fn content_ids(&self, include_aliases: bool) -> Vec<String> {
        let mut ids: Vec<String> = self
            .content
            .iter()
            .filter(|(key, entry)| include_aliases || key.as_str() == entry.id())
            .map(|(key, _)| key.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn preset_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.presets.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Short textual summary for listings
    pub fn describe(&self, verbose: bool) -> String {
        if verbose {
            format!(
                "- {}\n\tDesc: {}\n\tFile: {}",
                self.id, self.description, self.locator
            )
        } else if self.description.is_empty() {
            format!("- {}", self.id)
        } else {
            format!("- {}: {}", self.id, self.description)
        }
    }

    /// Merge content, presets and parameters of `other` into this template
    ///
    /// A content ID or parameter ID present in both is an error. A preset
    /// ID present in both keeps the local preset. Nothing is merged unless
    /// all checks pass.
    pub fn inherit_from(&mut self, other: &ChronicleTemplate) -> Result<()> {
        let mut collisions: Vec<&String> = other
            .content
            .keys()
            .filter(|id| self.content.contains_key(id.as_str()))
            .collect();
        collisions.sort();
        if let Some(id) = collisions.first() {
            return Err(ResolveError::inheritance(format!(
                "content ID '{}' cannot be inherited from '{}', because it already exists in '{}'",
                id, other.id, self.id
            )));
        }

        if let Some(id) = other
            .parameters
            .sorted_keys()
            .into_iter()
            .find(|id| self.parameters.contains(id))
        {
            return Err(ResolveError::duplicate(
                "parameter",
                id,
                self.id.as_str(),
                other.id.as_str(),
            )
            .context(format!("inheriting '{}' into '{}'", other.id, self.id)));
        }
        self.parameters.inherit_from(&other.parameters)?;

        for (id, entry) in &other.content {
            self.content.insert(id.clone(), entry.clone());
        }
        for (id, entry) in &other.presets {
            self.presets
                .entry(id.clone())
                .or_insert_with(|| entry.clone());
        }

        debug!(template = %self.id, parent = %other.id, "inherited");
        Ok(())
    }

    /// Check references between content, presets and parameters
    pub fn validate(&self) -> Result<()> {
        let wrap = |e: ResolveError| e.context(format!("template '{}'", self.id));

        self.parameters.is_valid().map_err(wrap)?;
        for id in self.content_ids(true) {
            if let Some(entry) = self.content.get(&id) {
                self.validate_entry(entry)
                    .map_err(|e| wrap(e.context(format!("content '{}'", id))))?;
            }
        }
        Ok(())
    }

    fn validate_entry(&self, entry: &ContentEntry) -> Result<()> {
        for preset in entry.preset_refs() {
            if !self.presets.contains_key(preset) {
                return Err(ResolveError::not_found("preset", preset.as_str()));
            }
        }

        if let Some(param_id) = entry.parameter_ref() {
            let param = self.parameters.require(param_id)?;
            if let (ContentEntry::Choice(choice), Some(allowed)) = (entry, param.choices()) {
                if let Some(unknown) = choice.content.keys().find(|c| !allowed.contains(*c)) {
                    return Err(ResolveError::validation(format!(
                        "'{}' is not a choice of parameter '{}'",
                        unknown, param_id
                    )));
                }
            }
        }

        for nested in entry.nested() {
            self.validate_entry(nested)
                .map_err(|e| e.context(format!("content '{}'", nested.id())))?;
        }
        Ok(())
    }
}
