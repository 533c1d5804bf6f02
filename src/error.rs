//! Error types for template loading, inheritance and argument validation

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Errors that can occur while building, resolving or validating templates
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Missing or empty required field, malformed record, missing discriminator
    #[error("load error: {message}")]
    Load {
        message: String,
        /// Source locator of the file being decoded, if known
        locator: Option<String>,
        /// Byte offset into the source text, if the decoder reported one
        offset: Option<usize>,
    },

    /// The same ID was defined twice
    #[error("duplicate {kind} ID '{id}' ({first} and {second})")]
    DuplicateId {
        kind: &'static str,
        id: String,
        first: String,
        second: String,
    },

    /// Unrecognized variant discriminator
    #[error("unknown {category} type '{value}'")]
    UnknownType {
        category: &'static str,
        value: String,
    },

    /// Missing parent, inheritance cycle or content collision
    #[error("inheritance error: {message}")]
    Inheritance { message: String },

    /// Argument or parameter definition rejected
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Lookup by an unknown ID
    #[error("{kind} not found: '{id}'")]
    NotFound { kind: &'static str, id: String },

    /// Reading a template file failed
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error annotated with the file, template or entry it occurred in
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Create a load error without location information
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
            locator: None,
            offset: None,
        }
    }

    /// Create a load error from a YAML decoder error, keeping its byte offset
    pub fn from_yaml(err: &serde_yaml::Error) -> Self {
        Self::Load {
            message: err.to_string(),
            locator: None,
            offset: err.location().map(|l| l.index()),
        }
    }

    pub fn duplicate(
        kind: &'static str,
        id: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn unknown_type(category: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownType {
            category,
            value: value.into(),
        }
    }

    pub fn inheritance(message: impl Into<String>) -> Self {
        Self::Inheritance {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    /// Wrap this error with a contextual identifier
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Attach the source locator to a load error; other errors get wrapped
    pub fn at(self, locator: &str) -> Self {
        match self {
            Self::Load {
                message,
                locator: None,
                offset,
            } => Self::Load {
                message,
                locator: Some(locator.to_string()),
                offset,
            },
            other => other.context(format!("in '{}'", locator)),
        }
    }

    /// The innermost error, skipping all context layers
    pub fn root(&self) -> &ResolveError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// Falls back to the plain message when no byte offset is known.
    pub fn report(&self, source: &str, filename: &str) -> String {
        let offset = match self.root() {
            Self::Load {
                offset: Some(offset),
                ..
            } => (*offset).min(source.len()),
            _ => return self.to_string(),
        };
        let end = source
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map(|c| offset + c.len_utf8())
            .unwrap_or(offset);

        let message = self.root().to_string();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, offset)
            .with_message(&message)
            .with_label(
                Label::new((filename, offset..end))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
