//! Style lookup.

use super::{StyleDefinition, builtin};
use crate::format::{CitationResult, RenderOptions, render_citation};
use crate::record::BibliographicRecord;
use crate::{CitationError, Result};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static BUILTIN: LazyLock<StyleRegistry> = LazyLock::new(|| {
    let registry = StyleRegistry::from_styles(builtin::styles());
    tracing::info!(styles = registry.len(), "loaded builtin citation styles");
    registry
});

/// An ordered set of citation styles keyed by identifier.
///
/// Identifiers are matched case-insensitively, ignoring surrounding
/// whitespace. A registry is read-only once shared; the builtin one is
/// built on first use and lives for the whole process.
///
/// # Examples
///
/// ```
/// use citekit::StyleRegistry;
///
/// let registry = StyleRegistry::builtin();
/// assert_eq!(registry.get(" APA-7th ").unwrap().id.as_str(), "apa-7th");
/// assert!(registry.get("turabian").is_err());
/// ```
///
/// Loading styles from configuration:
///
/// ```
/// use citekit::StyleRegistry;
///
/// let json = r#"[{
///     "id": "Short",
///     "name": "Title only",
///     "layout": [{"variable": "title", "suffix": "."}]
/// }]"#;
/// let registry = StyleRegistry::from_json(json).unwrap();
/// assert_eq!(registry.get("short").unwrap().name, "Title only");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRegistry {
    styles: Vec<StyleDefinition>,
}

impl StyleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin registry.
    pub fn builtin() -> &'static StyleRegistry {
        &BUILTIN
    }

    fn from_styles(styles: Vec<StyleDefinition>) -> Self {
        let mut registry = Self::new();
        for style in styles {
            registry.insert(style);
        }
        registry
    }

    /// Loads styles from a JSON array of style definitions.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::InvalidFormat`] when the document is not a
    /// valid list of definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let styles: Vec<StyleDefinition> = serde_json::from_str(json)?;
        let registry = Self::from_styles(styles);
        tracing::info!(styles = registry.len(), "loaded citation styles");
        Ok(registry)
    }

    /// Loads styles from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::Io`] when the file cannot be read, and
    /// [`CitationError::InvalidFormat`] when its content is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "reading citation styles");
        Self::from_json(&json)
    }

    /// Adds a style, replacing any style with the same identifier in place.
    /// Returns the replaced style.
    pub fn insert(&mut self, mut style: StyleDefinition) -> Option<StyleDefinition> {
        style.id = style.id.trim().to_lowercase().into();
        match self.position(&style.id) {
            Some(index) => Some(std::mem::replace(&mut self.styles[index], style)),
            None => {
                self.styles.push(style);
                None
            }
        }
    }

    /// Looks up a style by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::UnknownStyle`] when no style has this
    /// identifier.
    pub fn get(&self, id: &str) -> Result<&StyleDefinition> {
        self.position(id)
            .map(|index| &self.styles[index])
            .ok_or_else(|| CitationError::UnknownStyle(id.to_string()))
    }

    fn position(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        self.styles
            .iter()
            .position(|style| style.id.eq_ignore_ascii_case(id))
    }

    /// Styles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Renders `record` in style `id` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::UnknownStyle`] for an unknown `id` and
    /// [`CitationError::IncompleteMetadata`] when the record lacks a field
    /// the style requires.
    pub fn render(&self, record: &BibliographicRecord, id: &str) -> Result<CitationResult> {
        self.render_with(record, id, &RenderOptions::default())
    }

    /// Renders `record` in style `id`.
    ///
    /// # Errors
    ///
    /// See [`StyleRegistry::render`].
    pub fn render_with(
        &self,
        record: &BibliographicRecord,
        id: &str,
        options: &RenderOptions,
    ) -> Result<CitationResult> {
        render_citation(self.get(id)?, record, options)
    }

    /// Renders many records in one style, keeping their order. Each record
    /// succeeds or fails on its own.
    ///
    /// With the `parallel` feature the records are rendered on the rayon
    /// thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::UnknownStyle`] for an unknown `id`.
    pub fn render_all(
        &self,
        records: &[BibliographicRecord],
        id: &str,
        options: &RenderOptions,
    ) -> Result<Vec<Result<CitationResult>>> {
        let style = self.get(id)?;
        let render = |record: &BibliographicRecord| render_citation(style, record, options);

        #[cfg(feature = "parallel")]
        let citations = {
            use rayon::prelude::*;
            records.par_iter().map(render).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let citations = records.iter().map(render).collect();

        Ok(citations)
    }
}
