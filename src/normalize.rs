//! Metadata normalization.
//!
//! Maps the differently shaped payloads of DOI registries (Crossref,
//! DataCite) and ISBN registries (Open Library, Google Books, WorldCat) onto
//! one [`BibliographicRecord`].
//!
//! # Example
//!
//! ```
//! use citekit::{classify, normalize, RawMetadata, Registry};
//!
//! let isbn = classify("978-0-306-40615-7").unwrap();
//! let raw = RawMetadata::from_json(
//!     Registry::WorldCat,
//!     r#"{"list": [{"title": "Work Engagement", "author": "James M. Diefendorff and Gina A. Seaton", "year": "2015"}]}"#,
//! )
//! .unwrap();
//!
//! let record = normalize(raw, &isbn).unwrap();
//! assert_eq!(record.authors.len(), 2);
//! assert_eq!(record.year, Some(2015));
//! assert_eq!(record.isbn.as_deref(), Some("9780306406157"));
//! ```

mod author;
pub mod structure;

use crate::identifier::Identifier;
use crate::record::{BibliographicRecord, Field, WorkType};
use crate::utils::{clean_text, extract_year, format_doi, format_page_numbers};
use crate::{CitationError, Result};
use author::{RawName, resolve_authors, split_author_list};
use serde::{Deserialize, Serialize};
use structure::{
    CrossrefPayload, CrossrefWork, DataCiteAttributes, DataCitePayload, GoogleBooksPayload,
    GoogleVolumeInfo, OpenLibraryBook, OpenLibraryPayload, Scalar, WorldCatPayload,
    WorldCatRecord,
};

/// The registry a raw payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Registry {
    Crossref,
    DataCite,
    OpenLibrary,
    GoogleBooks,
    WorldCat,
}

impl Registry {
    /// Whether this registry resolves DOIs (as opposed to ISBNs).
    pub fn resolves_doi(self) -> bool {
        matches!(self, Registry::Crossref | Registry::DataCite)
    }
}

/// A raw metadata payload, tagged with the registry that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawMetadata {
    Crossref(CrossrefWork),
    DataCite(DataCiteAttributes),
    OpenLibrary(OpenLibraryBook),
    GoogleBooks(GoogleVolumeInfo),
    WorldCat(WorldCatRecord),
}

impl RawMetadata {
    /// Decodes a registry response body.
    ///
    /// Both the registry's response envelope and the bare record inside it
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::InvalidFormat`] when `json` does not match the
    /// registry's shape.
    pub fn from_json(registry: Registry, json: &str) -> Result<Self> {
        let raw = match registry {
            Registry::Crossref => {
                RawMetadata::Crossref(serde_json::from_str::<CrossrefPayload>(json)?.into())
            }
            Registry::DataCite => {
                RawMetadata::DataCite(serde_json::from_str::<DataCitePayload>(json)?.into())
            }
            Registry::OpenLibrary => {
                RawMetadata::OpenLibrary(serde_json::from_str::<OpenLibraryPayload>(json)?.into())
            }
            Registry::GoogleBooks => {
                RawMetadata::GoogleBooks(serde_json::from_str::<GoogleBooksPayload>(json)?.into())
            }
            Registry::WorldCat => {
                RawMetadata::WorldCat(serde_json::from_str::<WorldCatPayload>(json)?.into())
            }
        };
        Ok(raw)
    }

    /// The registry this payload came from.
    pub fn registry(&self) -> Registry {
        match self {
            RawMetadata::Crossref(_) => Registry::Crossref,
            RawMetadata::DataCite(_) => Registry::DataCite,
            RawMetadata::OpenLibrary(_) => Registry::OpenLibrary,
            RawMetadata::GoogleBooks(_) => Registry::GoogleBooks,
            RawMetadata::WorldCat(_) => Registry::WorldCat,
        }
    }
}

/// Normalizes a raw registry payload into a [`BibliographicRecord`].
///
/// `source` is the identifier the payload was fetched for; it fills the
/// record's `doi` or `isbn`.
///
/// # Errors
///
/// Returns [`CitationError::IncompleteMetadata`] when no usable title can be
/// found in the payload.
pub fn normalize(raw: RawMetadata, source: &Identifier) -> Result<BibliographicRecord> {
    let registry = raw.registry();
    let mut draft = match raw {
        RawMetadata::Crossref(work) => RecordDraft::from(work),
        RawMetadata::DataCite(attributes) => RecordDraft::from(attributes),
        RawMetadata::OpenLibrary(book) => RecordDraft::from(book),
        RawMetadata::GoogleBooks(info) => RecordDraft::from(info),
        RawMetadata::WorldCat(record) => RecordDraft::from(record),
    };

    match source {
        Identifier::Doi(doi) => draft.doi = Some(doi.clone()),
        Identifier::Isbn { value, .. } => draft.isbn = Some(value.clone()),
    }

    let record = BibliographicRecord::try_from(draft)?;
    tracing::debug!(
        ?registry,
        identifier = %source,
        authors = record.authors.len(),
        year = ?record.year,
        "normalized bibliographic record"
    );
    Ok(record)
}

/// A record under construction, before the title requirement is checked.
#[derive(Debug, Clone, Default)]
struct RecordDraft {
    title: Option<String>,
    subtitle: Option<String>,
    names: Vec<RawName>,
    year: Option<i32>,
    container_title: Option<String>,
    publisher: Option<String>,
    publisher_place: Option<String>,
    volume: Option<String>,
    issue: Option<String>,
    pages: Option<String>,
    edition: Option<String>,
    doi: Option<String>,
    isbn: Option<String>,
    url: Option<String>,
    work_type: WorkType,
}

impl TryFrom<RecordDraft> for BibliographicRecord {
    type Error = CitationError;

    fn try_from(draft: RecordDraft) -> std::result::Result<Self, Self::Error> {
        let title = draft
            .title
            .as_deref()
            .and_then(clean_text)
            .ok_or(CitationError::IncompleteMetadata(Field::Title))?;
        let title = match draft.subtitle.as_deref().and_then(clean_text) {
            Some(subtitle) if !title.ends_with(&subtitle) => {
                format!("{}: {}", title.trim_end_matches(':'), subtitle)
            }
            _ => title,
        };

        let (authors, rejected) = resolve_authors(draft.names);
        for entry in rejected {
            tracing::warn!(entry = %entry, "dropping author entry without a family name");
        }

        let doi = draft.doi.as_deref().and_then(format_doi);
        // A resolver link for the record's own DOI adds nothing to the DOI itself
        let url = draft
            .url
            .and_then(|url| non_empty(&url))
            .filter(|url| !is_doi_resolver_link(url));

        Ok(BibliographicRecord {
            title,
            authors,
            year: draft.year,
            container_title: draft.container_title.as_deref().and_then(clean_text),
            publisher: draft.publisher.as_deref().and_then(clean_text),
            publisher_place: draft.publisher_place.as_deref().and_then(clean_text),
            volume: draft.volume.as_deref().and_then(non_empty),
            issue: draft.issue.as_deref().and_then(non_empty),
            pages: draft.pages.as_deref().and_then(normalize_pages),
            edition: draft.edition.as_deref().and_then(normalize_edition),
            doi,
            isbn: draft.isbn.as_deref().and_then(normalize_isbn),
            url,
            work_type: draft.work_type,
        })
    }
}

impl From<CrossrefWork> for RecordDraft {
    fn from(work: CrossrefWork) -> Self {
        let year = work.publication_year();
        let names = work
            .author
            .into_iter()
            .map(|author| match (author.name, author.family) {
                (Some(name), None) => RawName::Organization(name),
                (_, family) => RawName::Structured {
                    given: author.given,
                    family,
                },
            })
            .collect();

        RecordDraft {
            title: work.title.first().cloned(),
            subtitle: work.subtitle.first().cloned(),
            names,
            year,
            container_title: work.container_title.first().cloned(),
            publisher: work.publisher,
            publisher_place: work.publisher_location,
            volume: work.volume.as_ref().and_then(Scalar::text),
            issue: work.issue.as_ref().and_then(Scalar::text),
            pages: work.page,
            edition: work.edition_number.as_ref().and_then(Scalar::text),
            doi: work.doi,
            isbn: work.isbn.first().cloned(),
            url: work.url,
            work_type: work
                .work_type
                .as_deref()
                .map(WorkType::from_type_name)
                .unwrap_or_default(),
        }
    }
}

impl From<DataCiteAttributes> for RecordDraft {
    fn from(attributes: DataCiteAttributes) -> Self {
        let title = attributes
            .titles
            .iter()
            .find(|t| t.title_type.is_none())
            .or_else(|| attributes.titles.first())
            .map(|t| t.title.clone());
        let subtitle = attributes
            .titles
            .iter()
            .find(|t| t.title_type.as_deref() == Some("Subtitle"))
            .map(|t| t.title.clone());

        let year = attributes
            .publication_year
            .as_ref()
            .and_then(Scalar::text)
            .and_then(|text| extract_year(&text))
            .or_else(|| {
                attributes
                    .dates
                    .iter()
                    .filter(|d| d.date_type.as_deref() == Some("Issued"))
                    .find_map(|d| extract_year(&d.date))
            });
        if year.is_none() && attributes.publication_year.is_some() {
            tracing::warn!(
                value = ?attributes.publication_year,
                "unparsable DataCite publication year"
            );
        }

        let names = attributes
            .creators
            .into_iter()
            .map(|creator| {
                let organizational = creator.name_type.as_deref() == Some("Organizational");
                match (creator.given_name, creator.family_name, creator.name) {
                    (_, _, Some(name)) if organizational => RawName::Organization(name),
                    (given, Some(family), _) => RawName::Structured {
                        given,
                        family: Some(family),
                    },
                    (_, None, Some(name)) => RawName::Single(name),
                    (given, None, None) => RawName::Structured {
                        given,
                        family: None,
                    },
                }
            })
            .collect();

        let container = attributes.container.unwrap_or_default();
        let pages = match (
            container.first_page.as_ref().and_then(Scalar::text),
            container.last_page.as_ref().and_then(Scalar::text),
        ) {
            (Some(first), Some(last)) => Some(format!("{first}-{last}")),
            (first, None) => first,
            (None, last) => last,
        };

        let work_type = attributes
            .types
            .as_ref()
            .and_then(|types| {
                types
                    .citeproc
                    .as_deref()
                    .or(types.resource_type_general.as_deref())
            })
            .map(WorkType::from_type_name)
            .unwrap_or_default();

        RecordDraft {
            title,
            subtitle,
            names,
            year,
            container_title: container.title,
            publisher: attributes.publisher.map(|p| p.name().to_string()),
            volume: container.volume.as_ref().and_then(Scalar::text),
            issue: container.issue.as_ref().and_then(Scalar::text),
            pages,
            doi: attributes.doi,
            url: attributes.url,
            work_type,
            ..RecordDraft::default()
        }
    }
}

impl From<OpenLibraryBook> for RecordDraft {
    fn from(book: OpenLibraryBook) -> Self {
        RecordDraft {
            title: book.title,
            subtitle: book.subtitle,
            names: book
                .authors
                .into_iter()
                .map(|author| RawName::Single(author.name))
                .collect(),
            year: book.publish_date.as_deref().and_then(extract_year),
            publisher: book.publishers.into_iter().next().map(|p| p.name),
            publisher_place: book.publish_places.into_iter().next().map(|p| p.name),
            edition: book.edition_name,
            url: book.url,
            work_type: WorkType::Book,
            ..RecordDraft::default()
        }
    }
}

impl From<GoogleVolumeInfo> for RecordDraft {
    fn from(info: GoogleVolumeInfo) -> Self {
        let isbn = info
            .industry_identifiers
            .iter()
            .find(|id| id.kind == "ISBN_13")
            .or_else(|| info.industry_identifiers.iter().find(|id| id.kind == "ISBN_10"))
            .map(|id| id.identifier.clone());

        RecordDraft {
            title: info.title,
            subtitle: info.subtitle,
            names: info.authors.into_iter().map(RawName::Single).collect(),
            year: info.published_date.as_deref().and_then(extract_year),
            publisher: info.publisher,
            isbn,
            url: info.info_link,
            work_type: WorkType::Book,
            ..RecordDraft::default()
        }
    }
}

impl From<WorldCatRecord> for RecordDraft {
    fn from(record: WorldCatRecord) -> Self {
        RecordDraft {
            title: record.title,
            names: record
                .author
                .as_deref()
                .map(split_author_list)
                .unwrap_or_default()
                .into_iter()
                .map(RawName::Single)
                .collect(),
            year: record
                .year
                .as_ref()
                .and_then(Scalar::text)
                .and_then(|text| extract_year(&text)),
            publisher: record.publisher,
            publisher_place: record.city,
            edition: record.ed,
            url: record.url.and_then(|urls| urls.first().cloned()),
            work_type: WorkType::Book,
            ..RecordDraft::default()
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_doi_resolver_link(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ["://doi.org/", "://dx.doi.org/"]
        .iter()
        .any(|host| lower.contains(host))
}

/// Unifies range dashes to a hyphen and expands abbreviated end pages.
fn normalize_pages(pages: &str) -> Option<String> {
    let unified = pages.trim().replace(['\u{2013}', '\u{2014}'], "-");
    non_empty(&unified).map(|p| format_page_numbers(&p))
}

/// Keeps the edition number; a first edition is not worth citing.
fn normalize_edition(edition: &str) -> Option<String> {
    let digits: String = edition
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<u32>() {
        Ok(0 | 1) | Err(_) => None,
        Ok(n) => Some(n.to_string()),
    }
}

fn normalize_isbn(isbn: &str) -> Option<String> {
    let digits: String = isbn
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    matches!(digits.len(), 10 | 13).then_some(digits)
}
