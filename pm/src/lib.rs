//! PromptMerge - compose prompt templates from a shared base
//!
//! Loads a base document and a named child document, shallow-merges the
//! child's `prompt` mapping over the base's, and renders the result as YAML.
//!
//! # Layout
//!
//! ```text
//! ./
//! ├── base.yml      # shared structure and defaults
//! ├── bugfix.yml    # child: prompt overrides for `pm bugfix`
//! └── review.yml
//! ```
//!
//! # Example
//!
//! ```ignore
//! use promptmerge::{DocumentLoader, compose, render};
//!
//! let loader = DocumentLoader::new(".", "base", "yml");
//! let merged = compose(&loader, "bugfix")?;
//! print!("{}", render(&merged)?);
//! ```

pub mod cli;
pub mod config;
mod document;
mod error;
mod merge;
mod output;

use log::debug;

pub use document::{Document, DocumentLoader, value_kind};
pub use error::{MergeError, Side};
pub use merge::{merge, merge_into};
pub use output::{Destination, render, write};

/// Default base document name
pub const DEFAULT_BASE_NAME: &str = "base";

/// Default template file extension
pub const DEFAULT_EXTENSION: &str = "yml";

/// Key of the section that child documents override
pub const PROMPT_KEY: &str = "prompt";

/// Load the base and `template_name` documents and merge them
pub fn compose(loader: &DocumentLoader, template_name: &str) -> Result<Document, MergeError> {
    debug!("compose: called template_name={}", template_name);
    let base = loader.load_base()?;
    let child = loader.load(template_name)?;
    merge(base, &child)
}
