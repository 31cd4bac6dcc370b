//! The citation rendering engine.
//!
//! Walks a [`StyleDefinition`]'s layouts over one [`BibliographicRecord`] to
//! produce the full reference and both in-text forms together.
//!
//! # Example
//!
//! ```
//! use citekit::{render_with, Author, BibliographicRecord, OutputFormat, RenderOptions, WorkType};
//!
//! let mut record = BibliographicRecord::new("Work Engagement", WorkType::ArticleJournal);
//! record.authors = vec![Author::new("James M.", "Diefendorff")];
//! record.year = Some(2015);
//!
//! let mut options = RenderOptions::new();
//! options
//!     .set_output_format(OutputFormat::Markdown)
//!     .set_citation_number(7);
//!
//! let citation = render_with(&record, "ieee", &options).unwrap();
//! assert_eq!(citation.parenthetical, "[7]");
//! ```

pub mod authors;
mod output;
pub mod title;

use crate::record::BibliographicRecord;
use crate::style::{
    Anonymous, Condition, Content, Element, Escape, PageFormat, StyleDefinition, Variable,
};
use crate::utils::{minimal_page_range, ordinal};
use crate::{CitationError, Field, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use unicode_normalization::UnicodeNormalization;

pub use authors::format_authors;
pub use output::OutputFormat;
use output::{Piece, escape_latex};

/// The three renderings of one record in one style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitationResult {
    /// Reference-list entry
    pub full: String,
    /// In-text citation in parentheses (or a numeric marker)
    pub parenthetical: String,
    /// In-text citation used as part of a sentence
    pub narrative: String,
}

/// Which of the three renderings is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Full,
    Parenthetical,
    Narrative,
}

/// Options for a render call.
///
/// # Examples
///
/// ```
/// use citekit::{OutputFormat, RenderOptions};
///
/// let mut options = RenderOptions::new();
/// options.set_output_format(OutputFormat::Html);
/// assert_eq!(options.output_format(), OutputFormat::Html);
/// assert_eq!(options.citation_number(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// How emphasis markers are emitted
    output_format: OutputFormat,
    /// Reference number for numeric styles; `?` is rendered when unset
    citation_number: Option<u32>,
}

impl RenderOptions {
    /// Creates options with plain output and no citation number
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output format
    pub fn set_output_format(&mut self, format: OutputFormat) -> &mut Self {
        self.output_format = format;
        self
    }

    /// Sets the reference number used by numeric styles
    pub fn set_citation_number(&mut self, number: u32) -> &mut Self {
        self.citation_number = Some(number);
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn citation_number(&self) -> Option<u32> {
        self.citation_number
    }
}

/// Placeholder for the reference number of numeric styles.
const NUMBER_PLACEHOLDER: &str = "?";

/// Renders `record` in `style`.
///
/// # Errors
///
/// Returns [`CitationError::IncompleteMetadata`] when the record lacks a
/// title or a field the style requires.
pub(crate) fn render_citation(
    style: &StyleDefinition,
    record: &BibliographicRecord,
    options: &RenderOptions,
) -> Result<CitationResult> {
    if record.title.trim().is_empty() {
        return Err(CitationError::IncompleteMetadata(Field::Title));
    }
    if let Some(field) = style.required.iter().find(|field| !record.has(**field)) {
        return Err(CitationError::IncompleteMetadata(*field));
    }

    let renderer = Renderer {
        style,
        record,
        options,
    };
    let citation = CitationResult {
        full: renderer.layout(&style.layout, Mode::Full),
        parenthetical: renderer.layout(&style.in_text.parenthetical, Mode::Parenthetical),
        narrative: renderer.layout(&style.in_text.narrative, Mode::Narrative),
    };
    tracing::debug!(style = %style.id, title = %record.title, "rendered citation");
    Ok(citation)
}

struct Renderer<'a> {
    style: &'a StyleDefinition,
    record: &'a BibliographicRecord,
    options: &'a RenderOptions,
}

impl Renderer<'_> {
    fn layout(&self, elements: &[Element], mode: Mode) -> String {
        let mut out = Piece::default();
        for element in elements {
            if let Some(piece) = self.element(element, mode) {
                out.push(piece, self.style.punctuation_in_quote);
            }
        }
        out.into_string().trim().to_string()
    }

    fn element(&self, element: &Element, mode: Mode) -> Option<Piece> {
        if let Some(condition) = &element.when {
            if !self.holds(condition) {
                return None;
            }
        }
        let body = match &element.content {
            Content::Text(text) => self.piece(text),
            Content::Variable(variable) => self.variable(*variable, mode)?,
            Content::Group { items, delimiter } => self.group(items, delimiter, mode)?,
        };
        if body.is_empty() {
            return None;
        }
        Some(self.decorate(body, element))
    }

    /// Renders a group, or `None` when none of its variables rendered.
    fn group(&self, items: &[Element], delimiter: &str, mode: Mode) -> Option<Piece> {
        let mut out = Piece::default();
        let mut substantive = false;
        for item in items {
            let Some(piece) = self.element(item, mode) else {
                continue;
            };
            substantive |= !matches!(item.content, Content::Text(_));
            if !out.is_empty() {
                out.push(self.piece(delimiter), self.style.punctuation_in_quote);
            }
            out.push(piece, self.style.punctuation_in_quote);
        }
        substantive.then_some(out)
    }

    /// Applies quotes, emphasis, prefix and suffix.
    fn decorate(&self, body: Piece, element: &Element) -> Piece {
        let format = self.options.output_format;
        let body = if element.quoted {
            body.quote(&self.style.quotes.open, &self.style.quotes.close, format)
        } else {
            body
        };
        let body = body.emphasize(element.emphasis, format);

        let mut out = self.piece(&element.prefix);
        out.push(body, self.style.punctuation_in_quote);
        out.push(self.piece(&element.suffix), self.style.punctuation_in_quote);
        out
    }

    fn holds(&self, condition: &Condition) -> bool {
        match condition {
            Condition::HasContainer => self.record.container_title.is_some(),
            Condition::NoContainer => self.record.container_title.is_none(),
            Condition::TypeIs(types) => types.contains(&self.record.work_type),
            Condition::TypeIsNot(types) => !types.contains(&self.record.work_type),
        }
    }

    fn piece(&self, text: &str) -> Piece {
        Piece::text(text, self.options.output_format)
    }

    fn variable(&self, variable: Variable, mode: Mode) -> Option<Piece> {
        let record = self.record;
        let text = match variable {
            Variable::Authors => return self.authors(mode),
            Variable::CitationNumber => self
                .options
                .citation_number
                .map_or_else(|| NUMBER_PLACEHOLDER.to_string(), |n| n.to_string()),
            Variable::Year => match record.year {
                Some(year) => year.to_string(),
                None => self.style.date.missing.as_deref()?.to_string(),
            },
            Variable::Title => {
                if mode == Mode::Full && self.title_moved_to_authors() {
                    return None;
                }
                title::apply(self.style.title_case, &record.title)
            }
            Variable::ContainerTitle => record.container_title.clone()?,
            Variable::Volume => record.volume.clone()?,
            Variable::Issue => record.issue.clone()?,
            Variable::Pages => self.pages(record.pages.as_deref()?),
            Variable::Publisher => record.publisher.clone()?,
            Variable::PublisherPlace => record.publisher_place.clone()?,
            Variable::Edition => {
                let edition = record.edition.as_deref()?;
                edition
                    .parse::<u32>()
                    .map_or_else(|_| edition.to_string(), ordinal)
            }
            Variable::Doi => record.doi.clone()?,
            Variable::Url => record.url.clone()?,
            Variable::Link => self.link()?,
            Variable::Isbn => record.isbn.clone()?,
            Variable::EntryType => record.work_type.bibtex_entry().to_string(),
            Variable::CiteKey => cite_key(record),
        };
        Some(self.piece(&self.escape(variable, &text)))
    }

    /// Escapes record text for the style's target syntax. Identifiers and
    /// links stay verbatim.
    fn escape<'t>(&self, variable: Variable, text: &'t str) -> Cow<'t, str> {
        match (self.style.escape, variable) {
            (Escape::None, _)
            | (
                _,
                Variable::Doi
                | Variable::Url
                | Variable::Link
                | Variable::CiteKey
                | Variable::EntryType
                | Variable::CitationNumber,
            ) => Cow::Borrowed(text),
            (Escape::Latex, _) => escape_latex(text),
        }
    }

    fn authors(&self, mode: Mode) -> Option<Piece> {
        let style = self.style;
        if let Some(names) =
            format_authors(&self.record.authors, &style.authors, &style.in_text, mode)
        {
            return Some(self.piece(&self.escape(Variable::Authors, &names)));
        }
        match &style.anonymous {
            Anonymous::Title => {
                let title = self.piece(&title::apply(style.title_case, &self.record.title));
                Some(self.format_as_title(title))
            }
            Anonymous::ContainerTitle => {
                let container = self.record.container_title.as_deref()?;
                Some(self.piece(container))
            }
            Anonymous::Text(text) => Some(self.piece(text)),
            Anonymous::Omit => None,
        }
    }

    fn title_moved_to_authors(&self) -> bool {
        self.record.authors.is_empty() && self.style.anonymous == Anonymous::Title
    }

    /// Quotes and emphasizes `piece` the way the layout presents the title.
    fn format_as_title(&self, piece: Piece) -> Piece {
        let format = self.options.output_format;
        let Some(element) = self.find_title_element(&self.style.layout) else {
            return piece;
        };
        let piece = if element.quoted {
            piece.quote(&self.style.quotes.open, &self.style.quotes.close, format)
        } else {
            piece
        };
        piece.emphasize(element.emphasis, format)
    }

    fn find_title_element<'e>(&self, elements: &'e [Element]) -> Option<&'e Element> {
        elements.iter().find_map(|element| {
            if element.when.as_ref().is_some_and(|c| !self.holds(c)) {
                return None;
            }
            match &element.content {
                Content::Variable(Variable::Title) => Some(element),
                Content::Group { items, .. } => self.find_title_element(items),
                _ => None,
            }
        })
    }

    fn pages(&self, pages: &str) -> String {
        let rule = &self.style.pages;
        let Some((from, to)) = pages.split_once('-') else {
            return pages.to_string();
        };
        let (from, to) = match rule.format {
            PageFormat::Minimal => minimal_page_range(pages)
                .unwrap_or_else(|| (from.trim().to_string(), to.trim().to_string())),
            PageFormat::Expanded => (from.trim().to_string(), to.trim().to_string()),
        };
        format!("{from}{}{to}", rule.delimiter)
    }

    fn link(&self) -> Option<String> {
        let rule = &self.style.link;
        if let Some(doi) = &self.record.doi {
            return Some(format!(
                "{}{doi}",
                rule.doi_prefix.as_deref().unwrap_or_default()
            ));
        }
        let prefix = rule.url_prefix.as_deref()?;
        let url = self.record.url.as_deref()?;
        Some(format!("{prefix}{url}"))
    }
}

/// BibTeX key: first author's family name, year and first significant title
/// word, folded to lower-case ASCII (`diefendorff2015work`).
fn cite_key(record: &BibliographicRecord) -> String {
    let clean = |word: &str| -> String {
        word.nfkd()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    };
    let name = record
        .authors
        .first()
        .map(|author| clean(&author.family))
        .unwrap_or_default();
    let year = record.year.map(|y| y.to_string()).unwrap_or_default();
    let word = record
        .title
        .split_whitespace()
        .map(clean)
        .find(|word| !word.is_empty() && !title::MINOR_WORDS.contains(&word.as_str()))
        .unwrap_or_default();

    let key = format!("{name}{year}{word}");
    if key.is_empty() {
        "ref".to_string()
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Author, WorkType};
    use crate::style::{AuthorRule, InTextRule, Quotes, TitleCase};
    use pretty_assertions::assert_eq;

    fn record() -> BibliographicRecord {
        let mut record = BibliographicRecord::new("Work Engagement", WorkType::ArticleJournal);
        record.authors = vec![
            Author::new("James M.", "Diefendorff"),
            Author::new("Gina A.", "Seaton"),
        ];
        record.year = Some(2015);
        record.container_title = Some("Journal of Applied Psychology".to_string());
        record.volume = Some("100".to_string());
        record.pages = Some("1001-1008".to_string());
        record
    }

    fn style(layout: Vec<Element>, anonymous: Anonymous) -> StyleDefinition {
        StyleDefinition {
            id: "test".into(),
            name: "Test".to_string(),
            version: "1".into(),
            authors: AuthorRule {
                conjunction: Some("and".into()),
                ..AuthorRule::default()
            },
            in_text: InTextRule {
                parenthetical: vec![
                    Element::group(vec![
                        Element::variable(Variable::Authors),
                        Element::variable(Variable::Year),
                    ])
                    .delimiter(" ")
                    .prefix("(")
                    .suffix(")"),
                ],
                narrative: vec![Element::variable(Variable::Authors)],
                ..InTextRule::default()
            },
            anonymous,
            title_case: TitleCase::Title,
            quotes: Quotes::default(),
            punctuation_in_quote: true,
            date: Default::default(),
            link: Default::default(),
            pages: Default::default(),
            escape: Escape::None,
            layout,
            required: Vec::new(),
        }
    }

    fn layout() -> Vec<Element> {
        vec![
            Element::variable(Variable::Authors).suffix("."),
            Element::variable(Variable::Title)
                .prefix(" ")
                .suffix(".")
                .quoted(),
            Element::group(vec![
                Element::variable(Variable::ContainerTitle).italic(),
                Element::variable(Variable::Volume).prefix(" "),
                Element::variable(Variable::Issue).prefix(" (").suffix(")"),
                Element::variable(Variable::Pages).prefix(": "),
            ])
            .prefix(" ")
            .suffix("."),
        ]
    }

    #[test]
    fn test_missing_fields_contract_their_punctuation() {
        let style = style(layout(), Anonymous::Omit);
        let citation = render_citation(&style, &record(), &RenderOptions::new()).unwrap();
        assert_eq!(
            citation.full,
            "Diefendorff, James M. and Seaton, Gina A. \"Work Engagement.\" Journal of Applied Psychology 100: 1001\u{2013}1008."
        );
    }

    #[test]
    fn test_group_without_variables_is_dropped() {
        let mut layout = layout();
        layout.push(
            Element::group(vec![
                Element::text("Available at: "),
                Element::variable(Variable::Url),
            ])
            .prefix(" "),
        );
        let style = style(layout, Anonymous::Omit);
        let citation = render_citation(&style, &record(), &RenderOptions::new()).unwrap();
        assert!(!citation.full.contains("Available at"));
    }

    #[test]
    fn test_anonymous_title_moves_to_author_position() {
        let mut record = record();
        record.authors.clear();
        let style = style(layout(), Anonymous::Title);
        let citation = render_citation(&style, &record, &RenderOptions::new()).unwrap();
        assert_eq!(
            citation.full,
            "\"Work Engagement.\" Journal of Applied Psychology 100: 1001\u{2013}1008."
        );
        assert_eq!(citation.parenthetical, "(\"Work Engagement\" 2015)");
    }

    #[test]
    fn test_anonymous_text_and_container() {
        let mut record = record();
        record.authors.clear();

        let style = style(layout(), Anonymous::Text("Anonymous".into()));
        let citation = render_citation(&style, &record, &RenderOptions::new()).unwrap();
        assert!(citation.full.starts_with("Anonymous. \"Work Engagement.\""));
        assert_eq!(citation.narrative, "Anonymous");

        let style = self::style(layout(), Anonymous::ContainerTitle);
        let citation = render_citation(&style, &record, &RenderOptions::new()).unwrap();
        assert!(
            citation
                .full
                .starts_with("Journal of Applied Psychology. \"Work Engagement.\"")
        );
    }

    #[test]
    fn test_anonymous_omit_leaves_no_dangling_delimiter() {
        let mut record = record();
        record.authors.clear();
        let style = style(layout(), Anonymous::Omit);
        let citation = render_citation(&style, &record, &RenderOptions::new()).unwrap();
        assert!(citation.full.starts_with("\"Work Engagement.\""));
        assert_eq!(citation.parenthetical, "(2015)");
        assert_eq!(citation.narrative, "");
    }

    #[test]
    fn test_required_fields() {
        let mut style = style(layout(), Anonymous::Omit);
        style.required = vec![Field::Doi];
        assert!(matches!(
            render_citation(&style, &record(), &RenderOptions::new()),
            Err(CitationError::IncompleteMetadata(Field::Doi))
        ));

        let mut record = record();
        record.title = "  ".to_string();
        style.required.clear();
        assert!(matches!(
            render_citation(&style, &record, &RenderOptions::new()),
            Err(CitationError::IncompleteMetadata(Field::Title))
        ));
    }

    #[test]
    fn test_markdown_and_html_output() {
        let style = style(layout(), Anonymous::Omit);
        let mut options = RenderOptions::new();

        options.set_output_format(OutputFormat::Markdown);
        let citation = render_citation(&style, &record(), &options).unwrap();
        assert!(citation.full.contains("*Journal of Applied Psychology* 100"));

        options.set_output_format(OutputFormat::Html);
        let citation = render_citation(&style, &record(), &options).unwrap();
        assert!(citation.full.contains("<i>Journal of Applied Psychology</i> 100"));
    }

    #[test]
    fn test_cite_key() {
        assert_eq!(cite_key(&record()), "diefendorff2015work");

        let mut record = BibliographicRecord::new("The Art of Müller", WorkType::Book);
        record.authors = vec![Author::literal("World Health Organization")];
        assert_eq!(cite_key(&record), "worldhealthorganizationart");

        let record = BibliographicRecord::new("Of the", WorkType::Book);
        assert_eq!(cite_key(&record), "ref");

        let mut record = BibliographicRecord::new("Études sur l'art", WorkType::Book);
        record.authors = vec![Author::new("François", "Müller-Łukasz")];
        record.year = Some(2015);
        assert_eq!(cite_key(&record), "mullerukasz2015etudes");
    }

    #[test]
    fn test_latex_escape_applies_to_record_values_only() {
        let mut record = record();
        record.title = "R&D {Costs}".to_string();
        record.authors = vec![Author::literal("Smith & Sons")];
        record.doi = Some("10.1000/a_b".to_string());
        let mut style = style(
            vec![
                Element::variable(Variable::Authors).suffix("{"),
                Element::variable(Variable::Title).prefix(" "),
                Element::variable(Variable::Doi).prefix(" "),
            ],
            Anonymous::Omit,
        );
        style.title_case = TitleCase::AsIs;
        style.escape = Escape::Latex;
        let citation = render_citation(&style, &record, &RenderOptions::new()).unwrap();
        assert_eq!(citation.full, "Smith \\& Sons{ R\\&D \\{Costs\\} 10.1000/a_b");
    }
}
