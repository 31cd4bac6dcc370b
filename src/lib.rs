//! Turn DOIs and ISBNs into formatted citations.
//!
//! `citekit` covers the formatting half of a citation generator. It classifies
//! a user-supplied identifier, normalizes the metadata a registry returned for
//! it, and renders that record in one of a fixed set of citation styles.
//!
//! # Key Features
//!
//! - **Identifier classification**: DOIs (bare, `doi:` or resolver URLs) and
//!   checksum-validated ISBN-10/13
//! - **Metadata normalization** from Crossref, DataCite, Open Library,
//!   Google Books and WorldCat payloads
//! - **Citation styles**: APA 6th/7th, MLA 8th/9th, Chicago author-date and
//!   notes, Harvard, IEEE, Vancouver, AMA, ACS, Nature, Science, BibTeX, ACM
//! - **Three forms per citation**: full reference, parenthetical and
//!   narrative in-text citations, computed together
//!
//! Fetching metadata over the network is left to the caller.
//!
//! # Basic Usage
//!
//! ```rust
//! use citekit::{classify, normalize, render, Registry, RawMetadata};
//!
//! let identifier = classify("https://doi.org/10.1037/a0038915").unwrap();
//!
//! let payload = r#"{
//!     "title": ["Work Engagement"],
//!     "author": [
//!         {"given": "James M.", "family": "Diefendorff"},
//!         {"given": "Gina A.", "family": "Seaton"}
//!     ],
//!     "issued": {"date-parts": [[2015]]},
//!     "type": "journal-article"
//! }"#;
//! let raw = RawMetadata::from_json(Registry::Crossref, payload).unwrap();
//! let record = normalize(raw, &identifier).unwrap();
//!
//! let citation = render(&record, "apa-7th").unwrap();
//! assert_eq!(citation.parenthetical, "(Diefendorff & Seaton, 2015)");
//! assert_eq!(citation.narrative, "Diefendorff and Seaton (2015)");
//! assert!(citation.full.starts_with("Diefendorff, J. M., & Seaton, G. A. (2015)."));
//! ```
//!
//! # Error Handling
//!
//! Every operation returns [`Result`], wrapping [`CitationError`]:
//!
//! ```rust
//! use citekit::{render, BibliographicRecord, CitationError, WorkType};
//!
//! let record = BibliographicRecord::new("Untitled", WorkType::Book);
//! match render(&record, "turabian") {
//!     Err(CitationError::UnknownStyle(id)) => eprintln!("no style named {id}"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! # Thread Safety
//!
//! All operations are pure. The builtin style registry is initialised once on
//! first use and only read afterwards, so rendering may run concurrently from
//! any number of threads.

use thiserror::Error;

pub mod format;
pub mod identifier;
pub mod normalize;
pub mod record;
mod regex;
pub mod style;
mod utils;

// Reexports
pub use format::{CitationResult, Mode, OutputFormat, RenderOptions};
pub use identifier::{Identifier, IsbnKind, classify};
pub use normalize::{RawMetadata, Registry, normalize};
pub use record::{Author, BibliographicRecord, Field, WorkType};
pub use style::{StyleDefinition, StyleRegistry};

/// A specialized Result type for citation operations.
pub type Result<T> = std::result::Result<T, CitationError>;

/// Represents errors that can occur while classifying, normalizing or rendering.
#[derive(Error, Debug)]
pub enum CitationError {
    #[error("Invalid identifier: '{0}' is neither a DOI nor a valid ISBN")]
    InvalidIdentifier(String),

    #[error("Incomplete metadata: missing required field '{0}'")]
    IncompleteMetadata(Field),

    #[error("Unknown citation style: '{0}'")]
    UnknownStyle(String),

    #[error("Parse error: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CitationError {
    fn from(err: serde_json::Error) -> Self {
        CitationError::InvalidFormat(err.to_string())
    }
}

/// Renders `record` in the builtin style `style_id` with default options.
///
/// # Errors
///
/// Returns [`CitationError::UnknownStyle`] when `style_id` is not a builtin
/// style, and [`CitationError::IncompleteMetadata`] when the style requires a
/// field the record does not carry.
pub fn render(record: &BibliographicRecord, style_id: &str) -> Result<CitationResult> {
    StyleRegistry::builtin().render(record, style_id)
}

/// Renders `record` in the builtin style `style_id` with explicit options.
///
/// # Errors
///
/// See [`render`].
pub fn render_with(
    record: &BibliographicRecord,
    style_id: &str,
    options: &RenderOptions,
) -> Result<CitationResult> {
    StyleRegistry::builtin().render_with(record, style_id, options)
}

/// Lists the builtin styles as `(identifier, display name)` pairs.
pub fn available_styles() -> Vec<(&'static str, &'static str)> {
    StyleRegistry::builtin()
        .iter()
        .map(|style| (style.id.as_str(), style.name.as_str()))
        .collect()
}
