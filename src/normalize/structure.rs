//! Raw registry payload shapes.
//!
//! These mirror the JSON returned by each registry closely enough to decode
//! it with serde. Every field is optional: registries omit freely, and the
//! decision about what is required belongs to normalization.
//!
//! # Design Decision
//!
//! - **Lenient scalars**: numbers that registries send either as JSON numbers
//!   or strings (years, volumes, date parts) decode through [`Scalar`]
//! - **One or many**: Crossref wraps titles in arrays while CSL-JSON does not;
//!   [`OneOrMany`] accepts both
//! - **Envelopes**: each registry's response wrapper is accepted as well as
//!   the bare record inside it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A JSON scalar that may arrive as a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// The scalar as trimmed text, or `None` when empty.
    pub fn text(&self) -> Option<String> {
        let text = match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Str(s) => s.trim().to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// A value that may be a single item or an array of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    /// The first item, if any.
    pub fn first(&self) -> Option<&T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.first(),
        }
    }

    /// All items in order.
    pub fn to_vec(&self) -> Vec<&T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items.iter().collect(),
        }
    }
}

/// A CSL/Crossref structured date: `{"date-parts": [[2015, 3, 1]]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateParts {
    #[serde(rename = "date-parts", default)]
    pub date_parts: Vec<Vec<Option<Scalar>>>,
}

impl DateParts {
    /// The year of the first date, if present and numeric.
    pub fn year(&self) -> Option<i32> {
        self.date_parts
            .first()
            .and_then(|parts| parts.first())
            .and_then(|part| part.as_ref())
            .and_then(Scalar::text)
            .and_then(|text| text.parse().ok())
    }
}

/// A Crossref contributor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossrefAuthor {
    pub given: Option<String>,
    pub family: Option<String>,
    /// Set instead of given/family for organizations
    pub name: Option<String>,
}

/// A Crossref work record (the `message` of a `/works/{doi}` response).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrossrefWork {
    #[serde(default)]
    pub title: OneOrMany<String>,
    #[serde(default)]
    pub subtitle: OneOrMany<String>,
    #[serde(default)]
    pub author: Vec<CrossrefAuthor>,
    pub published_print: Option<DateParts>,
    pub published_online: Option<DateParts>,
    pub issued: Option<DateParts>,
    pub created: Option<DateParts>,
    #[serde(default)]
    pub container_title: OneOrMany<String>,
    pub publisher: Option<String>,
    pub publisher_location: Option<String>,
    pub volume: Option<Scalar>,
    pub issue: Option<Scalar>,
    pub page: Option<String>,
    pub edition_number: Option<Scalar>,
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    #[serde(rename = "URL")]
    pub url: Option<String>,
    #[serde(rename = "ISBN", default)]
    pub isbn: OneOrMany<String>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
}

impl CrossrefWork {
    /// The publication date, preferring print over online over issued over
    /// the record creation date.
    pub fn publication_year(&self) -> Option<i32> {
        [
            &self.published_print,
            &self.published_online,
            &self.issued,
            &self.created,
        ]
        .into_iter()
        .flatten()
        .find_map(DateParts::year)
    }
}

/// A DataCite title entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCiteTitle {
    pub title: String,
    pub title_type: Option<String>,
}

/// A DataCite creator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCiteCreator {
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    /// `Personal` or `Organizational`
    pub name_type: Option<String>,
}

/// A DataCite date entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCiteDate {
    pub date: String,
    pub date_type: Option<String>,
}

/// DataCite sends the publisher as a plain string or, in newer API versions,
/// as an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataCitePublisher {
    Name(String),
    Object { name: String },
}

impl DataCitePublisher {
    pub fn name(&self) -> &str {
        match self {
            DataCitePublisher::Name(name) | DataCitePublisher::Object { name } => name,
        }
    }
}

/// The journal or series a DataCite work belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCiteContainer {
    pub title: Option<String>,
    pub volume: Option<Scalar>,
    pub issue: Option<Scalar>,
    pub first_page: Option<Scalar>,
    pub last_page: Option<Scalar>,
}

/// DataCite resource type descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCiteTypes {
    pub citeproc: Option<String>,
    pub resource_type_general: Option<String>,
}

/// The `attributes` object of a DataCite `/dois/{doi}` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCiteAttributes {
    #[serde(default)]
    pub titles: Vec<DataCiteTitle>,
    #[serde(default)]
    pub creators: Vec<DataCiteCreator>,
    pub publication_year: Option<Scalar>,
    #[serde(default)]
    pub dates: Vec<DataCiteDate>,
    pub publisher: Option<DataCitePublisher>,
    pub container: Option<DataCiteContainer>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub types: Option<DataCiteTypes>,
}

/// A `{"name": ...}` object, as Open Library uses for authors, publishers
/// and places.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: String,
}

/// An Open Library book (`jscmd=data` format).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenLibraryBook {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<Named>,
    #[serde(default)]
    pub publishers: Vec<Named>,
    #[serde(default)]
    pub publish_places: Vec<Named>,
    pub publish_date: Option<String>,
    pub edition_name: Option<String>,
    pub url: Option<String>,
}

/// A Google Books industry identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

/// The `volumeInfo` object of a Google Books volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleVolumeInfo {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
    pub info_link: Option<String>,
}

/// A WorldCat xID metadata record. Authors arrive as one combined string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldCatRecord {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub city: Option<String>,
    pub year: Option<Scalar>,
    pub ed: Option<String>,
    pub url: Option<OneOrMany<String>>,
}

// Response envelopes. Untagged enums try the wrapped shape first and fall
// back to the bare record.

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum CrossrefPayload {
    Envelope { message: CrossrefWork },
    Bare(CrossrefWork),
}

#[derive(Deserialize)]
pub(crate) struct DataCiteData {
    attributes: DataCiteAttributes,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum DataCitePayload {
    Envelope { data: DataCiteData },
    Bare(DataCiteAttributes),
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum OpenLibraryPayload {
    Keyed(BTreeMap<String, OpenLibraryBook>),
    Bare(OpenLibraryBook),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleVolume {
    volume_info: GoogleVolumeInfo,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum GoogleBooksPayload {
    Envelope { items: Vec<GoogleVolume> },
    Bare(GoogleVolumeInfo),
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum WorldCatPayload {
    Envelope { list: Vec<WorldCatRecord> },
    Bare(WorldCatRecord),
}

impl From<CrossrefPayload> for CrossrefWork {
    fn from(payload: CrossrefPayload) -> Self {
        match payload {
            CrossrefPayload::Envelope { message } => message,
            CrossrefPayload::Bare(work) => work,
        }
    }
}

impl From<DataCitePayload> for DataCiteAttributes {
    fn from(payload: DataCitePayload) -> Self {
        match payload {
            DataCitePayload::Envelope { data } => data.attributes,
            DataCitePayload::Bare(attributes) => attributes,
        }
    }
}

impl From<OpenLibraryPayload> for OpenLibraryBook {
    fn from(payload: OpenLibraryPayload) -> Self {
        match payload {
            OpenLibraryPayload::Keyed(books) => books.into_values().next().unwrap_or_default(),
            OpenLibraryPayload::Bare(book) => book,
        }
    }
}

impl From<GoogleBooksPayload> for GoogleVolumeInfo {
    fn from(payload: GoogleBooksPayload) -> Self {
        match payload {
            GoogleBooksPayload::Envelope { items } => items
                .into_iter()
                .next()
                .map(|volume| volume.volume_info)
                .unwrap_or_default(),
            GoogleBooksPayload::Bare(info) => info,
        }
    }
}

impl From<WorldCatPayload> for WorldCatRecord {
    fn from(payload: WorldCatPayload) -> Self {
        match payload {
            WorldCatPayload::Envelope { list } => list.into_iter().next().unwrap_or_default(),
            WorldCatPayload::Bare(record) => record,
        }
    }
}
