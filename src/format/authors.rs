//! Author list formatting.
//!
//! One algorithm, parameterized by [`AuthorRule`] for full references and by
//! [`InTextRule`] for in-text citations. Literal (organizational) authors are
//! never split, reversed or abbreviated.

use crate::format::Mode;
use crate::record::Author;
use crate::style::{AuthorRule, DelimiterBeforeLast, InTextRule, NameOrder};

/// Formats an author list for the given mode.
///
/// Returns `None` for an empty list; the caller decides what stands in for
/// the missing authors.
pub fn format_authors(
    authors: &[Author],
    rule: &AuthorRule,
    in_text: &InTextRule,
    mode: Mode,
) -> Option<String> {
    if authors.is_empty() {
        return None;
    }
    Some(match mode {
        Mode::Full => full(authors, rule),
        Mode::Parenthetical => short(authors, in_text, &in_text.parenthetical_conjunction),
        Mode::Narrative => short(authors, in_text, &in_text.narrative_conjunction),
    })
}

fn full(authors: &[Author], rule: &AuthorRule) -> String {
    let truncation = rule
        .et_al
        .as_ref()
        .filter(|truncation| authors.len() > truncation.threshold);

    let Some(truncation) = truncation else {
        let names: Vec<String> = authors
            .iter()
            .enumerate()
            .map(|(i, author)| display_name(author, rule, i == 0))
            .collect();
        return join_names(&names, rule);
    };

    let keep = truncation.keep.clamp(1, authors.len());
    let mut out = authors[..keep]
        .iter()
        .enumerate()
        .map(|(i, author)| display_name(author, rule, i == 0))
        .collect::<Vec<_>>()
        .join(rule.delimiter.as_str());
    out.push_str(&truncation.delimiter);
    out.push_str(&truncation.term);
    if truncation.last {
        if let Some(last) = authors.last() {
            out.push(' ');
            out.push_str(&display_name(last, rule, false));
        }
    }
    out
}

/// Family names only, truncated from `et_al_min` authors.
fn short(authors: &[Author], in_text: &InTextRule, conjunction: &str) -> String {
    let families: Vec<&str> = authors.iter().map(|a| a.family.as_str()).collect();
    match families.as_slice() {
        [only] => only.to_string(),
        [first, second] => format!("{first} {conjunction} {second}"),
        [first, ..] if families.len() >= in_text.et_al_min => {
            format!("{first} {}", in_text.et_al_term)
        }
        [init @ .., last] => format!("{}, {conjunction} {last}", init.join(", ")),
        [] => String::new(),
    }
}

/// Joins full names with the delimiter and conjunction of `rule`.
fn join_names(names: &[String], rule: &AuthorRule) -> String {
    let Some(conjunction) = rule.conjunction.as_deref() else {
        return names.join(rule.delimiter.as_str());
    };
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => {
            let serial = match rule.delimiter_before_last {
                DelimiterBeforeLast::Always => true,
                DelimiterBeforeLast::Never => false,
                DelimiterBeforeLast::Contextual => names.len() > 2,
            };
            let before_last = if serial {
                format!("{}{conjunction} ", rule.delimiter)
            } else {
                format!(" {conjunction} ")
            };
            format!("{}{before_last}{last}", init.join(rule.delimiter.as_str()))
        }
    }
}

fn display_name(author: &Author, rule: &AuthorRule, lead: bool) -> String {
    let Some(given) = author.given.as_deref().filter(|_| !author.literal) else {
        return author.family.clone();
    };
    let given = match rule.initialize_with.as_deref() {
        Some(with) => initials(given, with),
        None => given.to_string(),
    };
    let inverted = match rule.name_order {
        NameOrder::FamilyFirst => true,
        NameOrder::FamilyFirstLeadOnly => lead,
        NameOrder::GivenFirst => false,
    };
    if inverted {
        format!("{}{}{given}", author.family, rule.sort_separator)
    } else {
        format!("{given} {}", author.family)
    }
}

/// Abbreviates given names: `initials("James M.", ". ")` is `"J. M."`,
/// `initials("Jean-Paul", ". ")` is `"J.-P."` and `initials("James M.", "")`
/// is `"JM"`.
pub(crate) fn initials(given: &str, with: &str) -> String {
    let mark = with.trim_end();
    let joiner = if with.ends_with(' ') { " " } else { "" };
    given
        .split(|c: char| c.is_whitespace() || c == '.')
        .filter(|word| !word.is_empty())
        .map(|word| {
            word.split('-')
                .filter_map(|part| part.chars().find(|c| c.is_alphabetic()))
                .map(|c| format!("{}{mark}", c.to_uppercase()))
                .collect::<Vec<_>>()
                .join("-")
        })
        .filter(|initial| !initial.is_empty())
        .collect::<Vec<_>>()
        .join(joiner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Truncation;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn authors(count: usize) -> Vec<Author> {
        [
            ("James M.", "Diefendorff"),
            ("Gina A.", "Seaton"),
            ("Ann", "Lee"),
            ("Bo", "Chen"),
            ("Cy", "Diaz"),
            ("Di", "Evans"),
            ("Ed", "Ford"),
            ("Flo", "Grant"),
        ]
        .iter()
        .take(count)
        .map(|(given, family)| Author::new(*given, *family))
        .collect()
    }

    fn apa() -> AuthorRule {
        AuthorRule {
            initialize_with: Some(". ".into()),
            conjunction: Some("&".into()),
            delimiter_before_last: DelimiterBeforeLast::Always,
            et_al: Some(Truncation {
                threshold: 5,
                keep: 4,
                delimiter: ", ".into(),
                term: ". . .".into(),
                last: true,
            }),
            ..AuthorRule::default()
        }
    }

    #[rstest]
    #[case("James M.", ". ", "J. M.")]
    #[case("James M.", ".", "J.M.")]
    #[case("James M.", "", "JM")]
    #[case("Jean-Paul", ". ", "J.-P.")]
    #[case("J.M.", ". ", "J. M.")]
    #[case("émile", ". ", "É.")]
    fn test_initials(#[case] given: &str, #[case] with: &str, #[case] expected: &str) {
        assert_eq!(initials(given, with), expected);
    }

    #[rstest]
    #[case(1, "Diefendorff, J. M.")]
    #[case(2, "Diefendorff, J. M., & Seaton, G. A.")]
    #[case(3, "Diefendorff, J. M., Seaton, G. A., & Lee, A.")]
    #[case(
        6,
        "Diefendorff, J. M., Seaton, G. A., Lee, A., Chen, B., . . . Evans, D."
    )]
    fn test_full_family_first_with_ellipsis(#[case] count: usize, #[case] expected: &str) {
        let rule = apa();
        let formatted = format_authors(&authors(count), &rule, &InTextRule::default(), Mode::Full);
        assert_eq!(formatted.as_deref(), Some(expected));
    }

    #[rstest]
    #[case(2, DelimiterBeforeLast::Contextual, "J. M. Diefendorff and G. A. Seaton")]
    #[case(3, DelimiterBeforeLast::Contextual, "J. M. Diefendorff, G. A. Seaton, and A. Lee")]
    #[case(3, DelimiterBeforeLast::Never, "J. M. Diefendorff, G. A. Seaton and A. Lee")]
    fn test_full_given_first(
        #[case] count: usize,
        #[case] before_last: DelimiterBeforeLast,
        #[case] expected: &str,
    ) {
        let rule = AuthorRule {
            name_order: NameOrder::GivenFirst,
            initialize_with: Some(". ".into()),
            conjunction: Some("and".into()),
            delimiter_before_last: before_last,
            ..AuthorRule::default()
        };
        let formatted = format_authors(&authors(count), &rule, &InTextRule::default(), Mode::Full);
        assert_eq!(formatted.as_deref(), Some(expected));
    }

    #[test]
    fn test_full_lead_only_inversion_and_et_al() {
        let rule = AuthorRule {
            name_order: NameOrder::FamilyFirstLeadOnly,
            conjunction: Some("and".into()),
            delimiter_before_last: DelimiterBeforeLast::Always,
            et_al: Some(Truncation {
                threshold: 2,
                keep: 1,
                delimiter: ", ".into(),
                term: "et al.".into(),
                last: false,
            }),
            ..AuthorRule::default()
        };
        let in_text = InTextRule::default();
        assert_eq!(
            format_authors(&authors(2), &rule, &in_text, Mode::Full).as_deref(),
            Some("Diefendorff, James M., and Gina A. Seaton")
        );
        assert_eq!(
            format_authors(&authors(3), &rule, &in_text, Mode::Full).as_deref(),
            Some("Diefendorff, James M., et al.")
        );
    }

    #[test]
    fn test_full_without_conjunction() {
        let rule = AuthorRule {
            initialize_with: Some("".into()),
            sort_separator: " ".into(),
            ..AuthorRule::default()
        };
        assert_eq!(
            format_authors(&authors(2), &rule, &InTextRule::default(), Mode::Full).as_deref(),
            Some("Diefendorff JM, Seaton GA")
        );
    }

    #[rstest]
    #[case(1, Mode::Parenthetical, "Diefendorff")]
    #[case(2, Mode::Parenthetical, "Diefendorff & Seaton")]
    #[case(2, Mode::Narrative, "Diefendorff and Seaton")]
    #[case(3, Mode::Parenthetical, "Diefendorff et al.")]
    #[case(8, Mode::Narrative, "Diefendorff et al.")]
    fn test_in_text(#[case] count: usize, #[case] mode: Mode, #[case] expected: &str) {
        let in_text = InTextRule {
            parenthetical_conjunction: "&".into(),
            ..InTextRule::default()
        };
        assert_eq!(
            format_authors(&authors(count), &apa(), &in_text, mode).as_deref(),
            Some(expected)
        );
    }

    #[test]
    fn test_in_text_below_et_al_min_lists_everyone() {
        let in_text = InTextRule {
            et_al_min: 4,
            ..InTextRule::default()
        };
        assert_eq!(
            format_authors(&authors(3), &apa(), &in_text, Mode::Narrative).as_deref(),
            Some("Diefendorff, Seaton, and Lee")
        );
        assert_eq!(
            format_authors(&authors(4), &apa(), &in_text, Mode::Narrative).as_deref(),
            Some("Diefendorff et al.")
        );
    }

    #[test]
    fn test_literal_author_is_verbatim_in_every_mode() {
        let org = vec![Author::literal("World Health Organization")];
        let in_text = InTextRule::default();
        for mode in [Mode::Full, Mode::Parenthetical, Mode::Narrative] {
            assert_eq!(
                format_authors(&org, &apa(), &in_text, mode).as_deref(),
                Some("World Health Organization")
            );
        }
    }

    #[test]
    fn test_empty_list_is_none() {
        assert_eq!(
            format_authors(&[], &apa(), &InTextRule::default(), Mode::Full),
            None
        );
    }
}
