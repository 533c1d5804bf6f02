//! Concrete content entry variants

use std::collections::BTreeMap;

use serde::Deserialize;

use super::fields::{fill, PresetFields};
use super::ContentEntry;

/// Single-line text placed inside a box
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Text {
    #[serde(skip)]
    pub id: String,
    pub desc: Option<String>,
    #[serde(default)]
    pub presets: Vec<String>,
    /// Literal text or a `param:<id>` reference resolved by the renderer
    pub value: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub font: Option<String>,
    pub fontsize: Option<f64>,
    pub align: Option<String>,
    pub color: Option<String>,
}

impl Text {
    pub(crate) fn preset_fields(&self) -> PresetFields {
        PresetFields {
            desc: self.desc.clone(),
            value: self.value.clone(),
            x: self.x,
            y: self.y,
            x2: self.x2,
            y2: self.y2,
            font: self.font.clone(),
            fontsize: self.fontsize,
            align: self.align.clone(),
            color: self.color.clone(),
            ..PresetFields::default()
        }
    }

    pub(crate) fn fill_from(&mut self, f: &PresetFields) {
        fill(&mut self.desc, &f.desc);
        fill(&mut self.value, &f.value);
        fill(&mut self.x, &f.x);
        fill(&mut self.y, &f.y);
        fill(&mut self.x2, &f.x2);
        fill(&mut self.y2, &f.y2);
        fill(&mut self.font, &f.font);
        fill(&mut self.fontsize, &f.fontsize);
        fill(&mut self.align, &f.align);
        fill(&mut self.color, &f.color);
    }
}

/// Text spread over several evenly spaced lines
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Multiline {
    #[serde(skip)]
    pub id: String,
    pub desc: Option<String>,
    #[serde(default)]
    pub presets: Vec<String>,
    pub value: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub font: Option<String>,
    pub fontsize: Option<f64>,
    pub align: Option<String>,
    pub color: Option<String>,
    pub lines: Option<u32>,
}

impl Multiline {
    pub(crate) fn preset_fields(&self) -> PresetFields {
        PresetFields {
            desc: self.desc.clone(),
            value: self.value.clone(),
            x: self.x,
            y: self.y,
            x2: self.x2,
            y2: self.y2,
            font: self.font.clone(),
            fontsize: self.fontsize,
            align: self.align.clone(),
            color: self.color.clone(),
            lines: self.lines,
            ..PresetFields::default()
        }
    }

    pub(crate) fn fill_from(&mut self, f: &PresetFields) {
        fill(&mut self.desc, &f.desc);
        fill(&mut self.value, &f.value);
        fill(&mut self.x, &f.x);
        fill(&mut self.y, &f.y);
        fill(&mut self.x2, &f.x2);
        fill(&mut self.y2, &f.y2);
        fill(&mut self.font, &f.font);
        fill(&mut self.fontsize, &f.fontsize);
        fill(&mut self.align, &f.align);
        fill(&mut self.color, &f.color);
        fill(&mut self.lines, &f.lines);
    }
}

/// Filled rectangle, e.g. to strike out a section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rectangle {
    #[serde(skip)]
    pub id: String,
    pub desc: Option<String>,
    #[serde(default)]
    pub presets: Vec<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub color: Option<String>,
    /// Between 0.0 (opaque) and 1.0 (invisible)
    pub transparency: Option<f64>,
}

impl Rectangle {
    pub(crate) fn preset_fields(&self) -> PresetFields {
        PresetFields {
            desc: self.desc.clone(),
            x: self.x,
            y: self.y,
            x2: self.x2,
            y2: self.y2,
            color: self.color.clone(),
            transparency: self.transparency,
            ..PresetFields::default()
        }
    }

    pub(crate) fn fill_from(&mut self, f: &PresetFields) {
        fill(&mut self.desc, &f.desc);
        fill(&mut self.x, &f.x);
        fill(&mut self.y, &f.y);
        fill(&mut self.x2, &f.x2);
        fill(&mut self.y2, &f.y2);
        fill(&mut self.color, &f.color);
        fill(&mut self.transparency, &f.transparency);
    }
}

/// Nested content rendered only if the linked argument is present
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trigger {
    #[serde(skip)]
    pub id: String,
    pub desc: Option<String>,
    #[serde(default)]
    pub presets: Vec<String>,
    /// Parameter ID whose argument activates the nested content
    pub trigger: Option<String>,
    /// Decoded separately, through the content entry registry
    #[serde(skip)]
    pub content: BTreeMap<String, ContentEntry>,
}

impl Trigger {
    pub(crate) fn preset_fields(&self) -> PresetFields {
        PresetFields {
            desc: self.desc.clone(),
            trigger: self.trigger.clone(),
            ..PresetFields::default()
        }
    }

    pub(crate) fn fill_from(&mut self, f: &PresetFields) {
        fill(&mut self.desc, &f.desc);
        fill(&mut self.trigger, &f.trigger);
    }
}

/// Nested content selected by the value of a linked argument
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Choice {
    #[serde(skip)]
    pub id: String,
    pub desc: Option<String>,
    #[serde(default)]
    pub presets: Vec<String>,
    /// Parameter ID whose argument value selects a content block
    pub choices: Option<String>,
    /// Decoded separately, through the content entry registry
    #[serde(skip)]
    pub content: BTreeMap<String, BTreeMap<String, ContentEntry>>,
}

impl Choice {
    pub(crate) fn preset_fields(&self) -> PresetFields {
        PresetFields {
            desc: self.desc.clone(),
            choices: self.choices.clone(),
            ..PresetFields::default()
        }
    }

    pub(crate) fn fill_from(&mut self, f: &PresetFields) {
        fill(&mut self.desc, &f.desc);
        fill(&mut self.choices, &f.choices);
    }
}
