//! Citation styles as data.
//!
//! A [`StyleDefinition`] holds every rule the engine needs to render one
//! citation style: how author lists are written and truncated, how titles
//! are cased and quoted, how page ranges and links look, and an ordered
//! layout of [`Element`]s for the full reference and the two in-text forms.
//! Adding a style means adding a definition, not new control flow.
//!
//! Definitions serialize with serde (kebab-case), so a [`StyleRegistry`] can
//! be loaded from JSON as well as built in code.
//!
//! # Example
//!
//! ```
//! use citekit::style::{Content, Element, Variable};
//!
//! let year = Element::variable(Variable::Year).prefix(" (").suffix(").");
//! assert!(matches!(year.content, Content::Variable(Variable::Year)));
//! ```

mod builtin;
mod registry;

use crate::record::{Field, WorkType};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

pub use registry::StyleRegistry;

/// One citation style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StyleDefinition {
    /// Registry key, e.g. `apa-7th`
    pub id: CompactString,
    /// Human-readable name
    pub name: String,
    /// Edition of the style guide this definition follows
    #[serde(default)]
    pub version: CompactString,
    /// Author list rules for the full reference
    #[serde(default)]
    pub authors: AuthorRule,
    /// In-text citation rules and templates
    #[serde(default)]
    pub in_text: InTextRule,
    /// What stands in for the author list when a record has none
    #[serde(default)]
    pub anonymous: Anonymous,
    #[serde(default)]
    pub title_case: TitleCase,
    #[serde(default)]
    pub quotes: Quotes,
    /// Moves a following period or comma inside closing quotes
    #[serde(default)]
    pub punctuation_in_quote: bool,
    #[serde(default)]
    pub date: DateRule,
    #[serde(default)]
    pub link: LinkRule,
    #[serde(default)]
    pub pages: PageRule,
    /// Escaping applied to record values
    #[serde(default)]
    pub escape: Escape,
    /// Ordered elements of the full reference
    pub layout: Vec<Element>,
    /// Fields a record must carry to be rendered in this style
    #[serde(default)]
    pub required: Vec<Field>,
}

/// Escaping of record values for the syntax a style targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Escape {
    #[default]
    None,
    /// Backslash before `&`, `%`, `$`, `#`, `_`, `{` and `}`
    Latex,
}

/// Order of the name parts in the full reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameOrder {
    /// "Family, Given" for every author
    #[default]
    FamilyFirst,
    /// "Family, Given" for the first author, "Given Family" for the rest
    FamilyFirstLeadOnly,
    /// "Given Family" for every author
    GivenFirst,
}

/// When the list delimiter also precedes the conjunction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DelimiterBeforeLast {
    /// "A, & B" and "A, B, & C"
    Always,
    /// "A & B" and "A, B & C"
    #[default]
    Never,
    /// "A and B" but "A, B, and C"
    Contextual,
}

/// Truncation of long author lists in the full reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Truncation {
    /// Lists longer than this are truncated
    pub threshold: usize,
    /// Number of leading authors kept
    pub keep: usize,
    /// Text between the kept names and `term`
    #[serde(default = "default_space")]
    pub delimiter: CompactString,
    /// "et al." or an ellipsis
    #[serde(default = "default_et_al")]
    pub term: CompactString,
    /// Appends the final author after `term`
    #[serde(default)]
    pub last: bool,
}

/// How author lists are written in the full reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AuthorRule {
    pub name_order: NameOrder,
    /// Abbreviates given names to initials followed by this text; full given
    /// names are kept when unset
    pub initialize_with: Option<CompactString>,
    /// Between family and given parts of an inverted name
    pub sort_separator: CompactString,
    /// Between names
    pub delimiter: CompactString,
    /// Word before the last name ("&", "and"); unset joins with `delimiter`
    pub conjunction: Option<CompactString>,
    pub delimiter_before_last: DelimiterBeforeLast,
    pub et_al: Option<Truncation>,
}

impl Default for AuthorRule {
    fn default() -> Self {
        Self {
            name_order: NameOrder::FamilyFirst,
            initialize_with: None,
            sort_separator: CompactString::const_new(", "),
            delimiter: CompactString::const_new(", "),
            conjunction: None,
            delimiter_before_last: DelimiterBeforeLast::Never,
            et_al: None,
        }
    }
}

/// In-text citation rules.
///
/// Truncation here is independent of [`AuthorRule::et_al`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InTextRule {
    /// Author count from which only the first family name is shown
    pub et_al_min: usize,
    pub et_al_term: CompactString,
    pub parenthetical_conjunction: CompactString,
    pub narrative_conjunction: CompactString,
    pub parenthetical: Vec<Element>,
    pub narrative: Vec<Element>,
}

impl Default for InTextRule {
    fn default() -> Self {
        Self {
            et_al_min: 3,
            et_al_term: default_et_al(),
            parenthetical_conjunction: CompactString::const_new("and"),
            narrative_conjunction: CompactString::const_new("and"),
            parenthetical: Vec::new(),
            narrative: Vec::new(),
        }
    }
}

/// Stand-in for a missing author list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anonymous {
    /// The title moves to the author position and is not repeated
    Title,
    ContainerTitle,
    /// Fixed text such as "Anonymous"
    Text(CompactString),
    /// The author position is dropped along with its punctuation
    #[default]
    Omit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleCase {
    /// Only the first word (and the first word after a colon) capitalized
    Sentence,
    /// Every major word capitalized
    Title,
    #[default]
    AsIs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotes {
    pub open: CompactString,
    pub close: CompactString,
}

impl Default for Quotes {
    fn default() -> Self {
        Self {
            open: CompactString::const_new("\""),
            close: CompactString::const_new("\""),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DateRule {
    /// Rendered in place of a missing year, e.g. "n.d."
    pub missing: Option<CompactString>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LinkRule {
    /// Prepended to the DOI, e.g. `https://doi.org/` or `doi:`
    pub doi_prefix: Option<CompactString>,
    /// Prepended to the URL when there is no DOI; unset drops the URL
    pub url_prefix: Option<CompactString>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageFormat {
    /// `1001–1008`
    #[default]
    Expanded,
    /// `1001–8`
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PageRule {
    pub delimiter: CompactString,
    pub format: PageFormat,
}

impl Default for PageRule {
    fn default() -> Self {
        Self {
            delimiter: CompactString::const_new("\u{2013}"),
            format: PageFormat::Expanded,
        }
    }
}

/// A value drawn from the record (or the render options).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variable {
    /// The caller-supplied reference number, or `?`
    CitationNumber,
    Authors,
    Year,
    Title,
    ContainerTitle,
    Volume,
    Issue,
    Pages,
    Publisher,
    PublisherPlace,
    /// Ordinal edition ("2nd")
    Edition,
    Doi,
    Url,
    /// DOI with the style prefix, or the URL when there is no DOI
    Link,
    Isbn,
    /// BibTeX entry type for the work type
    EntryType,
    /// BibTeX citation key
    CiteKey,
}

/// Structural emphasis. How it is emitted depends on the output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emphasis {
    #[default]
    None,
    Italic,
    Bold,
    Superscript,
}

/// A condition on the record that gates an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    HasContainer,
    NoContainer,
    TypeIs(Vec<WorkType>),
    TypeIsNot(Vec<WorkType>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Content {
    Variable(Variable),
    /// Literal text, always rendered
    Text(CompactString),
    /// Rendered only when at least one variable inside it renders
    Group {
        items: Vec<Element>,
        #[serde(default)]
        delimiter: CompactString,
    },
}

/// One piece of a layout.
///
/// An element whose content is missing is dropped together with its prefix
/// and suffix, so absent fields never leave dangling punctuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(flatten)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub prefix: CompactString,
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub suffix: CompactString,
    #[serde(default)]
    pub emphasis: Emphasis,
    #[serde(default)]
    pub quoted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
}

impl Element {
    fn new(content: Content) -> Self {
        Self {
            content,
            prefix: CompactString::default(),
            suffix: CompactString::default(),
            emphasis: Emphasis::None,
            quoted: false,
            when: None,
        }
    }

    #[must_use]
    pub fn variable(variable: Variable) -> Self {
        Self::new(Content::Variable(variable))
    }

    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::new(Content::Text(text.into()))
    }

    #[must_use]
    pub fn group(items: Vec<Element>) -> Self {
        Self::new(Content::Group {
            items,
            delimiter: CompactString::default(),
        })
    }

    #[must_use]
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the delimiter between the items of a group. No effect on other
    /// elements.
    #[must_use]
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        if let Content::Group {
            delimiter: current, ..
        } = &mut self.content
        {
            *current = delimiter.into();
        }
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.emphasis = Emphasis::Italic;
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.emphasis = Emphasis::Bold;
        self
    }

    #[must_use]
    pub fn superscript(mut self) -> Self {
        self.emphasis = Emphasis::Superscript;
        self
    }

    #[must_use]
    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }

    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.when = Some(condition);
        self
    }
}

fn default_space() -> CompactString {
    CompactString::const_new(" ")
}

fn default_et_al() -> CompactString {
    CompactString::const_new("et al.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_element_builder() {
        let element = Element::group(vec![
            Element::variable(Variable::Volume),
            Element::variable(Variable::Issue).prefix("(").suffix(")"),
        ])
        .delimiter(", ")
        .when(Condition::HasContainer);

        let Content::Group { items, delimiter } = &element.content else {
            panic!("expected a group");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(delimiter.as_str(), ", ");
        assert_eq!(element.when, Some(Condition::HasContainer));
    }

    #[test]
    fn test_delimiter_ignored_outside_groups() {
        let element = Element::variable(Variable::Title).delimiter(", ");
        assert_eq!(element.content, Content::Variable(Variable::Title));
    }

    #[test]
    fn test_element_json_shape() {
        let element: Element = serde_json::from_str(
            r#"{"variable": "container-title", "prefix": " ", "emphasis": "italic"}"#,
        )
        .unwrap();
        assert_eq!(
            element,
            Element::variable(Variable::ContainerTitle).prefix(" ").italic()
        );

        let element: Element = serde_json::from_str(
            r#"{"group": {"items": [{"text": "vol. "}, {"variable": "volume"}]}, "when": {"type-is": ["book"]}}"#,
        )
        .unwrap();
        assert_eq!(
            element,
            Element::group(vec![
                Element::text("vol. "),
                Element::variable(Variable::Volume)
            ])
            .when(Condition::TypeIs(vec![WorkType::Book]))
        );
    }

    #[test]
    fn test_partial_rules_fill_defaults() {
        let rule: InTextRule = serde_json::from_str(r#"{"et-al-min": 4}"#).unwrap();
        assert_eq!(rule.et_al_min, 4);
        assert_eq!(rule.et_al_term.as_str(), "et al.");

        let rule: AuthorRule = serde_json::from_str(r#"{"conjunction": "&"}"#).unwrap();
        assert_eq!(rule.conjunction.as_deref(), Some("&"));
        assert_eq!(rule.delimiter.as_str(), ", ");

        let anonymous: Anonymous = serde_json::from_str(r#"{"text": "Anon."}"#).unwrap();
        assert_eq!(anonymous, Anonymous::Text("Anon.".into()));
    }
}
