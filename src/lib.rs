//! Chronicle Templates - template and parameter resolution for chronicle sheets
//!
//! This library loads a library of named, inheritable templates describing
//! what content goes where on a chronicle sheet, merges inherited content,
//! presets and parameters, and validates caller-supplied arguments against
//! the parameter definitions of a template.
//!
//! # Example
//!
//! ```rust
//! use chronicle_templates::{prepare_arguments, TemplateRecord, TemplateStore};
//!
//! let base = TemplateRecord::from_yaml_str(r#"
//! id: base
//! description: Shared layout
//! parameters:
//!   player:
//!     type: text
//!     description: Player name
//!     example: Jane
//! content:
//!   player:
//!     type: text
//!     value: param:player
//! "#).unwrap();
//! let scenario = TemplateRecord::from_yaml_str(r#"
//! id: scenario
//! description: A scenario
//! inherit: base
//! "#).unwrap();
//!
//! let store = TemplateStore::load(vec![
//!     ("base.yml".to_string(), base),
//!     ("scenario.yml".to_string(), scenario),
//! ]).unwrap();
//!
//! let template = store.get_template("scenario").unwrap();
//! assert_eq!(template.content_ids(false), vec!["player"]);
//!
//! let args = prepare_arguments(template, ["player=Jane"]).unwrap();
//! assert_eq!(args.get("player"), Some("Jane"));
//! ```

pub mod args;
pub mod config;
pub mod content;
pub mod error;
pub mod loader;
pub mod param;
pub mod record;
pub mod template;

pub use args::ArgStore;
pub use config::{ConfigError, LoaderConfig};
pub use content::{ContentEntry, ContentKind};
pub use error::ResolveError;
pub use param::{ParamEntry, ParamKind, ParamStore};
pub use record::TemplateRecord;
pub use template::{ChronicleTemplate, TemplateStore};

/// Load and resolve all templates below `root` with default settings
pub fn load_templates(root: impl Into<std::path::PathBuf>) -> Result<TemplateStore, ResolveError> {
    load_templates_with_config(&LoaderConfig::new().with_root(root))
}

/// Load and resolve all templates with custom loader configuration
pub fn load_templates_with_config(config: &LoaderConfig) -> Result<TemplateStore, ResolveError> {
    TemplateStore::from_config(config)
}

/// Parse `key=value` arguments and validate them against a template
///
/// The returned store includes values derived by the parameters.
pub fn prepare_arguments<I, S>(
    template: &ChronicleTemplate,
    raw: I,
) -> Result<ArgStore, ResolveError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = ArgStore::from_args(raw)?;
    template
        .parameters()
        .validate_and_process_args(&mut args)
        .map_err(|e| e.context(format!("template '{}'", template.id())))?;
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TemplateStore {
        let record = TemplateRecord::from_yaml_str(
            r#"
id: a
description: A
parameters:
  societyid:
    type: societyid
    description: Society ID
    example: 1-2001
"#,
        )
        .expect("Should decode");
        TemplateStore::load(vec![("a.yml".to_string(), record)]).expect("Should load")
    }

    #[test]
    fn test_prepare_arguments_adds_derived_values() {
        let store = store();
        let template = store.get_template("a").unwrap();
        let args = prepare_arguments(template, ["societyid=42-2007"]).unwrap();
        assert_eq!(args.get("societyid.char"), Some("2007"));
    }

    #[test]
    fn test_prepare_arguments_rejects_unknown_key() {
        let store = store();
        let template = store.get_template("a").unwrap();
        let err = prepare_arguments(template, ["player=x"]).unwrap_err();
        assert!(matches!(err.root(), ResolveError::Validation { .. }));
        assert!(err.to_string().contains("template 'a'"));
    }

    #[test]
    fn test_load_templates_missing_root_is_empty() {
        let store = load_templates("/no/such/templates").unwrap();
        assert!(store.is_empty());
    }
}
