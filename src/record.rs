//! The canonical bibliographic record consumed by the style engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An author (or organizational creator) of a work.
///
/// `family` is never empty. Organizational authors are marked `literal` and
/// keep their whole name in `family`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Given name(s), unset for organizations and mononyms
    pub given: Option<String>,
    /// Family name, or the full name of a literal author
    pub family: String,
    /// Corporate or organizational author; disables name splitting
    #[serde(default)]
    pub literal: bool,
}

impl Author {
    /// Creates a personal author.
    #[must_use]
    pub fn new(given: impl Into<String>, family: impl Into<String>) -> Self {
        let given = given.into();
        Self {
            given: (!given.trim().is_empty()).then(|| given.trim().to_string()),
            family: family.into().trim().to_string(),
            literal: false,
        }
    }

    /// Creates an organizational author whose name is never split or reversed.
    #[must_use]
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            given: None,
            family: name.into().trim().to_string(),
            literal: true,
        }
    }
}

/// The kind of work a record describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkType {
    #[default]
    ArticleJournal,
    Book,
    Chapter,
    PaperConference,
    Report,
    Thesis,
    Dataset,
    Post,
    Other,
}

impl WorkType {
    /// Maps a Crossref or CSL type name onto a work type.
    ///
    /// Unrecognised names map to [`WorkType::ArticleJournal`], the most common
    /// kind of DOI-registered work.
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "journal-article" | "article-journal" | "journal-issue" | "journal-volume"
            | "journal" | "journalarticle" => WorkType::ArticleJournal,
            "book" | "monograph" | "edited-book" | "reference-book" | "book-series"
            | "book-set" => WorkType::Book,
            "book-chapter" | "chapter" | "book-track" | "book-part" | "book-section"
            | "bookchapter" => WorkType::Chapter,
            "proceedings-article" | "proceedings" | "conference-paper" | "paper-conference"
            | "proceedings-series" | "conferencepaper" => WorkType::PaperConference,
            "report" | "report-series" | "standard" | "report-component" | "standard-series" => {
                WorkType::Report
            }
            "dissertation" | "thesis" => WorkType::Thesis,
            "dataset" => WorkType::Dataset,
            "posted-content" | "post" | "preprint" => WorkType::Post,
            "other" => WorkType::Other,
            _ => WorkType::ArticleJournal,
        }
    }

    /// The BibTeX entry type used for this kind of work.
    pub fn bibtex_entry(self) -> &'static str {
        match self {
            WorkType::ArticleJournal => "article",
            WorkType::Book => "book",
            WorkType::Chapter => "incollection",
            WorkType::PaperConference => "inproceedings",
            WorkType::Report => "techreport",
            WorkType::Thesis => "phdthesis",
            WorkType::Dataset | WorkType::Post | WorkType::Other => "misc",
        }
    }
}

/// Names a record field, for error reporting and style requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    Title,
    Authors,
    Year,
    ContainerTitle,
    Publisher,
    PublisherPlace,
    Volume,
    Issue,
    Pages,
    Edition,
    Doi,
    Isbn,
    Url,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Authors => "authors",
            Field::Year => "year",
            Field::ContainerTitle => "container title",
            Field::Publisher => "publisher",
            Field::PublisherPlace => "publisher place",
            Field::Volume => "volume",
            Field::Issue => "issue",
            Field::Pages => "pages",
            Field::Edition => "edition",
            Field::Doi => "DOI",
            Field::Isbn => "ISBN",
            Field::Url => "URL",
        };
        f.write_str(name)
    }
}

/// One work, normalized from a registry payload.
///
/// `title` is never empty. Optional fields are `None` when the source did not
/// provide them; an empty string is never used to mean "missing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographicRecord {
    /// Title of the work (with subtitle, if any)
    pub title: String,
    /// Ordered list of authors
    pub authors: Vec<Author>,
    /// Year of publication
    pub year: Option<i32>,
    /// Journal, book or series title
    pub container_title: Option<String>,
    /// Publisher name
    pub publisher: Option<String>,
    /// Place of publication
    pub publisher_place: Option<String>,
    /// Volume number
    pub volume: Option<String>,
    /// Issue number
    pub issue: Option<String>,
    /// Page range
    pub pages: Option<String>,
    /// Edition number
    pub edition: Option<String>,
    /// Digital Object Identifier, lower-cased
    pub doi: Option<String>,
    /// ISBN, digits only
    pub isbn: Option<String>,
    /// Landing page URL
    pub url: Option<String>,
    /// Kind of work
    #[serde(default)]
    pub work_type: WorkType,
}

impl BibliographicRecord {
    /// Creates a record with only a title and a work type.
    #[must_use]
    pub fn new(title: impl Into<String>, work_type: WorkType) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            year: None,
            container_title: None,
            publisher: None,
            publisher_place: None,
            volume: None,
            issue: None,
            pages: None,
            edition: None,
            doi: None,
            isbn: None,
            url: None,
            work_type,
        }
    }

    /// Whether the given field carries a value.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Title => !self.title.is_empty(),
            Field::Authors => !self.authors.is_empty(),
            Field::Year => self.year.is_some(),
            Field::ContainerTitle => self.container_title.is_some(),
            Field::Publisher => self.publisher.is_some(),
            Field::PublisherPlace => self.publisher_place.is_some(),
            Field::Volume => self.volume.is_some(),
            Field::Issue => self.issue.is_some(),
            Field::Pages => self.pages.is_some(),
            Field::Edition => self.edition.is_some(),
            Field::Doi => self.doi.is_some(),
            Field::Isbn => self.isbn.is_some(),
            Field::Url => self.url.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("journal-article", WorkType::ArticleJournal)]
    #[case("book-chapter", WorkType::Chapter)]
    #[case("monograph", WorkType::Book)]
    #[case("proceedings-article", WorkType::PaperConference)]
    #[case("dissertation", WorkType::Thesis)]
    #[case("posted-content", WorkType::Post)]
    #[case("Dataset", WorkType::Dataset)]
    #[case("something-new", WorkType::ArticleJournal)]
    fn test_work_type_from_type_name(#[case] name: &str, #[case] expected: WorkType) {
        assert_eq!(WorkType::from_type_name(name), expected);
    }

    #[test]
    fn test_author_constructors_trim_and_unset_empty_given() {
        let author = Author::new("  ", " Plato ");
        assert_eq!(author.given, None);
        assert_eq!(author.family, "Plato");
        assert!(!author.literal);

        let org = Author::literal("World Health Organization");
        assert!(org.literal);
        assert_eq!(org.given, None);
    }

    #[test]
    fn test_has_distinguishes_unset_fields() {
        let mut record = BibliographicRecord::new("A Title", WorkType::Book);
        assert!(record.has(Field::Title));
        assert!(!record.has(Field::Doi));
        record.doi = Some("10.1000/x".to_string());
        assert!(record.has(Field::Doi));
    }

    #[test]
    fn test_field_display() {
        assert_eq!(Field::ContainerTitle.to_string(), "container title");
        assert_eq!(Field::Doi.to_string(), "DOI");
    }
}
