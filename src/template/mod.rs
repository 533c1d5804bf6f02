//! Chronicle templates and the store that resolves them
//!
//! A template bundles content entries, presets and parameters. Templates
//! may inherit from one another; the store merges each template's
//! ancestors into it once all files are loaded.
//!
//! # Example
//!
//! ```yaml
//! id: pfs2.s1-01
//! description: Scenario 1-01 chronicle
//! inherit: pfs2
//! presets:
//!   default:
//!     type: text
//!     font: Helvetica
//! content:
//!   event:
//!     type: text
//!     x: 10
//!     y: 20
//! ```

mod chronicle;
mod store;

pub use chronicle::ChronicleTemplate;
pub use store::TemplateStore;
