//! Identifier classification and normalization.
//!
//! Accepts a DOI (bare, `doi:`-prefixed or as a resolver URL) or an
//! ISBN-10/13 (with or without hyphens and spaces) and produces a normalized
//! [`Identifier`].
//!
//! # Example
//!
//! ```
//! use citekit::{classify, Identifier, IsbnKind};
//!
//! let doi = classify("https://doi.org/10.1037/A0038915").unwrap();
//! assert_eq!(doi, Identifier::Doi("10.1037/a0038915".to_string()));
//!
//! let isbn = classify("978-0-306-40615-7").unwrap();
//! assert_eq!(isbn.isbn_kind(), Some(IsbnKind::Isbn13));
//! ```

use crate::regex::{Captures, Regex};
use crate::{CitationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// A URL scheme and host (any resolver, with or without the scheme) or a
/// scheme label that may precede a bare identifier. A host needs a
/// top-level domain of letters, so a bare `10.1037/...` never matches.
static PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:[a-z][a-z0-9+.-]*://)?(?:[a-z0-9-]+\.)+[a-z]{2,}(?::\d+)?/|(?:urn:)?doi:\s*|isbn(?:-1[03])?:?\s*)(?P<rest>.+)$",
    )
    .unwrap()
});

static DOI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^10\.\d{4,9}(?:\.\d+)*/\S+$").unwrap());

/// The two ISBN lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsbnKind {
    Isbn10,
    Isbn13,
}

/// A classified, normalized bibliographic identifier.
///
/// DOIs are lower-cased with any resolver prefix removed. ISBNs hold digits
/// only (plus a trailing `X` for ISBN-10) and always carry a valid checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identifier {
    Doi(String),
    Isbn { value: String, kind: IsbnKind },
}

impl Identifier {
    /// The normalized identifier text.
    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Doi(doi) => doi,
            Identifier::Isbn { value, .. } => value,
        }
    }

    /// Returns the ISBN kind, or `None` for a DOI.
    pub fn isbn_kind(&self) -> Option<IsbnKind> {
        match self {
            Identifier::Doi(_) => None,
            Identifier::Isbn { kind, .. } => Some(*kind),
        }
    }

    /// Short label naming the identifier scheme.
    pub fn scheme(&self) -> &'static str {
        match self {
            Identifier::Doi(_) => "doi",
            Identifier::Isbn { .. } => "isbn",
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Identifier {
    type Err = CitationError;

    fn from_str(s: &str) -> Result<Self> {
        classify(s)
    }
}

/// Classifies a raw identifier string as a DOI or an ISBN.
///
/// # Errors
///
/// Returns [`CitationError::InvalidIdentifier`] when the input is neither a
/// DOI nor an ISBN with a valid checksum.
pub fn classify(raw: &str) -> Result<Identifier> {
    let bare = strip_prefix(raw.trim());

    if DOI_REGEX.is_match(bare) {
        let doi = bare.to_lowercase();
        tracing::debug!(doi = %doi, "classified identifier as DOI");
        return Ok(Identifier::Doi(doi));
    }
    if bare.starts_with("10.") && bare.contains('/') {
        return Err(CitationError::InvalidIdentifier(raw.to_string()));
    }

    let digits: String = bare
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let kind = match digits.len() {
        10 if isbn10_checksum_ok(&digits) => IsbnKind::Isbn10,
        13 if isbn13_checksum_ok(&digits) => IsbnKind::Isbn13,
        _ => return Err(CitationError::InvalidIdentifier(raw.to_string())),
    };

    tracing::debug!(isbn = %digits, ?kind, "classified identifier as ISBN");
    Ok(Identifier::Isbn {
        value: digits,
        kind,
    })
}

/// Removes a resolver URL or scheme label, returning the bare identifier.
fn strip_prefix(input: &str) -> &str {
    PREFIX_REGEX
        .captures(input)
        .and_then(|captures: Captures| captures.name("rest"))
        .map_or(input, |rest| rest.as_str().trim())
}

/// ISBN-10: the sum of each digit times its weight (10 down to 1) is a
/// multiple of 11. `X` stands for 10 and is only allowed as the check digit.
fn isbn10_checksum_ok(digits: &str) -> bool {
    let mut sum = 0;
    for (i, c) in digits.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            '0'..='9' => c as u32 - '0' as u32,
            _ => return false,
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

/// ISBN-13: digits weighted alternately 1 and 3 sum to a multiple of 10.
fn isbn13_checksum_ok(digits: &str) -> bool {
    let mut sum = 0;
    for (i, c) in digits.chars().enumerate() {
        let Some(value) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { value } else { value * 3 };
    }
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("10.1037/a0038915")]
    #[case("10.1037/A0038915")]
    #[case("  10.1037/a0038915  ")]
    #[case("doi:10.1037/a0038915")]
    #[case("DOI: 10.1037/A0038915")]
    #[case("urn:doi:10.1037/a0038915")]
    #[case("https://doi.org/10.1037/a0038915")]
    #[case("http://dx.doi.org/10.1037/a0038915")]
    #[case("HTTPS://DOI.ORG/10.1037/A0038915")]
    #[case("https://www.doi.org/10.1037/a0038915")]
    #[case("doi.org/10.1037/a0038915")]
    #[case("www.doi.org/10.1037/a0038915")]
    #[case("https://hdl.handle.net/10.1037/a0038915")]
    #[case("http://doi.apa.org:8080/10.1037/a0038915")]
    fn test_classify_doi_is_case_and_prefix_insensitive(#[case] input: &str) {
        assert_eq!(
            classify(input).unwrap(),
            Identifier::Doi("10.1037/a0038915".to_string())
        );
    }

    #[test]
    fn test_classify_doi_is_idempotent() {
        let first = classify("https://doi.org/10.1000/XYZ.123").unwrap();
        let second = classify(first.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("0306406152", IsbnKind::Isbn10)]
    #[case("0-306-40615-2", IsbnKind::Isbn10)]
    #[case("080442957X", IsbnKind::Isbn10)]
    #[case("0-8044-2957-x", IsbnKind::Isbn10)]
    #[case("9780306406157", IsbnKind::Isbn13)]
    #[case("978-0-306-40615-7", IsbnKind::Isbn13)]
    #[case("ISBN 978 0 306 40615 7", IsbnKind::Isbn13)]
    #[case("isbn-13: 978-0-306-40615-7", IsbnKind::Isbn13)]
    fn test_classify_valid_isbn(#[case] input: &str, #[case] kind: IsbnKind) {
        let identifier = classify(input).unwrap();
        assert_eq!(identifier.isbn_kind(), Some(kind));
        assert!(
            identifier
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c == 'X')
        );
    }

    #[test]
    fn test_classify_rejects_every_single_digit_corruption() {
        for valid in ["0306406152", "9780306406157"] {
            for position in 0..valid.len() {
                let original = valid.as_bytes()[position] - b'0';
                for replacement in 0..10u8 {
                    if replacement == original {
                        continue;
                    }
                    let mut corrupted = valid.as_bytes().to_vec();
                    corrupted[position] = b'0' + replacement;
                    let corrupted = String::from_utf8(corrupted).unwrap();
                    assert!(
                        matches!(
                            classify(&corrupted),
                            Err(CitationError::InvalidIdentifier(_))
                        ),
                        "corruption accepted: {corrupted}"
                    );
                }
            }
        }
    }

    #[rstest]
    #[case("")]
    #[case("hello world")]
    #[case("12345")]
    #[case("10.12/short-prefix")]
    #[case("X306406152")]
    #[case("97803064061570")]
    #[case("10.978/0306406157")]
    #[case("https://example.org/10.1/9780306406157")]
    fn test_classify_invalid(#[case] input: &str) {
        assert!(matches!(
            classify(input),
            Err(CitationError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_from_str_and_display() {
        let identifier: Identifier = "978-0-306-40615-7".parse().unwrap();
        assert_eq!(identifier.to_string(), "9780306406157");
        assert_eq!(identifier.scheme(), "isbn");
    }
}
