//! Author name resolution for raw registry entries.
//!
//! Registries describe creators in three ways: structured given/family
//! pairs, a single name per creator, or one combined string listing every
//! creator. All three end up as [`Author`] values; entries without a usable
//! family name are rejected and reported back to the caller.

use crate::record::Author;
use crate::utils::parse_author_name;
use either::{Either, Left, Right};
use itertools::Itertools;

/// Trailing words that mark a name as an organization.
const ORGANIZATION_SUFFIXES: &[&str] = &[
    "inc",
    "ltd",
    "llc",
    "plc",
    "gmbh",
    "corp",
    "corporation",
    "company",
    "co",
    "council",
    "association",
    "society",
    "institute",
    "organization",
    "organisation",
    "committee",
    "commission",
    "foundation",
    "agency",
    "department",
    "ministry",
    "board",
    "group",
    "consortium",
    "collaboration",
    "university",
    "press",
    "office",
    "centre",
    "center",
];

/// Suffix fragments that a comma split detaches from an organization name.
const DETACHED_SUFFIXES: &[&str] = &["inc", "ltd", "llc", "plc", "gmbh", "corp", "co"];

/// One creator as a registry described it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawName {
    /// Separate given and family parts
    Structured {
        given: Option<String>,
        family: Option<String>,
    },
    /// A single name that still needs splitting ("Given Family" or "Family, Given")
    Single(String),
    /// An organization name, never split
    Organization(String),
}

/// Whether a name ends in a recognised organizational word.
pub(crate) fn is_organization(name: &str) -> bool {
    name.split_whitespace()
        .last()
        .map(normalize_word)
        .is_some_and(|word| ORGANIZATION_SUFFIXES.contains(&word.as_str()))
}

fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Splits a combined author string into one string per creator.
///
/// Semicolons separate creators when present (each may then be written
/// "Family, Given"). Otherwise commas, "and" and "&" separate names, which
/// are given-first unless they alternate "Family, Given" throughout. A
/// leading "by" and a closing period are dropped, and company suffixes cut
/// off by a comma ("Acme, Inc.") are re-attached.
pub(crate) fn split_author_list(combined: &str) -> Vec<String> {
    let trimmed = combined.trim();
    let trimmed = trimmed
        .strip_prefix("by ")
        .or_else(|| trimmed.strip_prefix("By "))
        .unwrap_or(trimmed);

    let mut names: Vec<String> = if trimmed.contains(';') {
        trimmed
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    } else {
        let pieces: Vec<&str> = trimmed
            .split(',')
            .flat_map(|part| part.split(" and "))
            .flat_map(|part| part.split(" & "))
            .map(str::trim)
            .map(|part| part.strip_prefix("and ").unwrap_or(part).trim())
            .filter(|s| !s.is_empty())
            .collect();
        if is_family_given_list(&pieces) {
            pieces
                .chunks(2)
                .map(|pair| pair.join(", "))
                .collect()
        } else {
            attach_detached_suffixes(pieces)
        }
    };

    if let Some(last) = names.last_mut() {
        let kept = strip_closing_period(last).len();
        last.truncate(kept);
    }
    names
}

/// Whether comma-separated pieces alternate a one-word family name with
/// given names ("Diefendorff, James M., Seaton, Gina A.").
fn is_family_given_list(pieces: &[&str]) -> bool {
    !pieces.is_empty()
        && pieces.len() % 2 == 0
        && pieces.chunks(2).all(|pair| {
            let (family, given) = (pair[0], pair[1]);
            !family.contains(char::is_whitespace)
                && !DETACHED_SUFFIXES.contains(&normalize_word(given).as_str())
                && looks_like_given_names(given)
        })
}

fn looks_like_given_names(text: &str) -> bool {
    text.split_whitespace().all(|word| {
        word.chars().next().is_some_and(char::is_uppercase)
            && word.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\''))
    })
}

fn attach_detached_suffixes(pieces: Vec<&str>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for piece in pieces {
        let detached = DETACHED_SUFFIXES.contains(&normalize_word(piece).as_str());
        match names.last_mut() {
            Some(previous) if detached => {
                previous.push_str(", ");
                previous.push_str(piece);
            }
            _ => names.push(piece.to_string()),
        }
    }
    names
}

/// Drops a sentence-ending period, keeping one that closes an initial
/// ("Gina A.") or an abbreviated company suffix ("Acme, Inc.").
fn strip_closing_period(name: &str) -> &str {
    let Some(stem) = name.strip_suffix('.') else {
        return name;
    };
    let last_word = stem.rsplit(|c: char| c.is_whitespace() || c == '.').next().unwrap_or(stem);
    let initial = last_word.chars().count() == 1;
    let abbreviation = DETACHED_SUFFIXES.contains(&normalize_word(last_word).as_str());
    if initial || abbreviation { name } else { stem }
}

/// Resolves one raw creator into an [`Author`], or returns a description of
/// the entry when no family name can be found.
pub(crate) fn resolve_name(name: RawName) -> Either<String, Author> {
    match name {
        RawName::Organization(name) => {
            if name.trim().is_empty() {
                Left(name)
            } else {
                Right(Author::literal(name))
            }
        }
        RawName::Single(name) => {
            let trimmed = name.trim();
            if is_organization(trimmed) {
                return Right(Author::literal(trimmed));
            }
            match parse_author_name(trimmed) {
                (_, family) if family.is_empty() => Left(name),
                (given, family) => Right(Author::new(given.unwrap_or_default(), family)),
            }
        }
        RawName::Structured { given, family } => {
            let given = given.map(|g| g.trim().to_string()).filter(|g| !g.is_empty());
            let family = family.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
            match (given, family) {
                (given, Some(family)) => Right(Author::new(given.unwrap_or_default(), family)),
                // A lone given name is a mononym
                (Some(given), None) => Right(Author::new("", given)),
                (None, None) => Left("<empty name>".to_string()),
            }
        }
    }
}

/// Resolves every raw creator, keeping order. Rejected entries are returned
/// separately so the caller can report them.
pub(crate) fn resolve_authors(names: Vec<RawName>) -> (Vec<Author>, Vec<String>) {
    let (rejected, authors): (Vec<_>, Vec<_>) = names.into_iter().partition_map(resolve_name);
    (authors, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("James M. Diefendorff and Gina A. Seaton", &["James M. Diefendorff", "Gina A. Seaton"])]
    #[case("by James M. Diefendorff & Gina A. Seaton.", &["James M. Diefendorff", "Gina A. Seaton"])]
    #[case("Ann Lee, Bo Chen, and Cy Diaz", &["Ann Lee", "Bo Chen", "Cy Diaz"])]
    #[case("Diefendorff, James M.; Seaton, Gina A.", &["Diefendorff, James M.", "Seaton, Gina A."])]
    #[case("Acme, Inc. and Ann Lee", &["Acme, Inc.", "Ann Lee"])]
    #[case("by Ann Lee and Acme, Inc.", &["Ann Lee", "Acme, Inc."])]
    #[case("Ann Lee and Ministry of Health.", &["Ann Lee", "Ministry of Health"])]
    #[case("Diefendorff, James M.", &["Diefendorff, James M."])]
    #[case(
        "Diefendorff, James M. and Seaton, Gina A.",
        &["Diefendorff, James M.", "Seaton, Gina A."]
    )]
    #[case("Lee, Ann, Chen, Bo", &["Lee, Ann", "Chen, Bo"])]
    #[case("", &[])]
    fn test_split_author_list(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(split_author_list(input), expected);
    }

    #[rstest]
    #[case("American Psychological Association", true)]
    #[case("Acme, Inc.", true)]
    #[case("National Research Council", true)]
    #[case("Google LLC", true)]
    #[case("James M. Diefendorff", false)]
    #[case("Plato", false)]
    fn test_is_organization(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_organization(name), expected);
    }

    #[test]
    fn test_resolve_single_names() {
        let author = resolve_name(RawName::Single("Gina A. Seaton".to_string())).unwrap_right();
        assert_eq!(author, Author::new("Gina A.", "Seaton"));

        let author = resolve_name(RawName::Single("Seaton, Gina A.".to_string())).unwrap_right();
        assert_eq!(author, Author::new("Gina A.", "Seaton"));

        let org = resolve_name(RawName::Single("World Health Organization".to_string()))
            .unwrap_right();
        assert!(org.literal);
        assert_eq!(org.family, "World Health Organization");
    }

    #[test]
    fn test_resolve_structured_names() {
        let author = resolve_name(RawName::Structured {
            given: Some(" James M. ".to_string()),
            family: Some("Diefendorff".to_string()),
        })
        .unwrap_right();
        assert_eq!(author, Author::new("James M.", "Diefendorff"));

        let mononym = resolve_name(RawName::Structured {
            given: Some("Aristotle".to_string()),
            family: None,
        })
        .unwrap_right();
        assert_eq!(mononym.family, "Aristotle");
        assert_eq!(mononym.given, None);
    }

    #[test]
    fn test_resolve_authors_reports_rejected_entries() {
        let (authors, rejected) = resolve_authors(vec![
            RawName::Single("Ann Lee".to_string()),
            RawName::Structured {
                given: Some(" ".to_string()),
                family: None,
            },
            RawName::Organization("  ".to_string()),
            RawName::Organization("Cochrane Collaboration".to_string()),
        ]);
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[1], Author::literal("Cochrane Collaboration"));
        assert_eq!(rejected.len(), 2);
    }
}
