//! Title casing.

use crate::style::TitleCase;

/// Words left lower-case inside a title-cased title.
pub(crate) const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "down", "for", "from", "if", "in", "into", "nor",
    "of", "off", "on", "onto", "or", "over", "per", "so", "than", "the", "to", "up", "upon", "via",
    "vs", "with", "yet",
];

/// Applies a casing rule to a title.
pub fn apply(rule: TitleCase, title: &str) -> String {
    match rule {
        TitleCase::AsIs => title.to_string(),
        TitleCase::Sentence => sentence_case(&unshout(title)),
        TitleCase::Title => title_case(&unshout(title)),
    }
}

/// Lower-cases a title typed entirely in capitals, which would otherwise be
/// kept verbatim as one long acronym.
fn unshout(title: &str) -> String {
    let has_lower = title.chars().any(char::is_lowercase);
    let words = title.split_whitespace().count();
    if !has_lower && words > 1 {
        title.to_lowercase()
    } else {
        title.to_string()
    }
}

/// Capitalizes the first word and the first word after a colon, question
/// mark or exclamation mark. Acronyms and mixed-case words are kept.
fn sentence_case(title: &str) -> String {
    let mut starts_clause = true;
    title
        .split(' ')
        .map(|word| {
            let cased = if word.is_empty() || is_special(word) {
                word.to_string()
            } else if starts_clause {
                capitalize(&word.to_lowercase())
            } else {
                word.to_lowercase()
            };
            if !word.is_empty() {
                starts_clause = ends_clause(word);
            }
            cased
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalizes every word except minor words in the middle of a clause.
fn title_case(title: &str) -> String {
    let words: Vec<&str> = title.split(' ').collect();
    let last = words.iter().rposition(|w| !w.is_empty());
    let mut starts_clause = true;
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let bare = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            let cased = if word.is_empty() || is_special(word) {
                word.to_string()
            } else if !starts_clause
                && Some(i) != last
                && MINOR_WORDS.contains(&bare.as_str())
            {
                word.to_lowercase()
            } else {
                word.split('-').map(capitalize).collect::<Vec<_>>().join("-")
            };
            if !word.is_empty() {
                starts_clause = ends_clause(word);
            }
            cased
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words whose casing carries meaning: acronyms ("DNA"), mixed case
/// ("iPhone", "McDonald"), anything with a digit, and single letters.
fn is_special(word: &str) -> bool {
    let letters = word.chars().filter(|c| c.is_alphabetic()).count();
    if letters == 1 && word != "A" && word != "a" {
        return true;
    }
    word.split('-').any(|part| {
        part.chars().any(|c| c.is_ascii_digit())
            || part
                .chars()
                .skip_while(|c| !c.is_alphabetic())
                .skip(1)
                .any(char::is_uppercase)
    })
}

fn ends_clause(word: &str) -> bool {
    word.ends_with([':', '?', '!'])
}

/// Upper-cases the first letter, leaving the rest untouched.
fn capitalize(word: &str) -> String {
    match word.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((index, c)) => {
            let mut out = String::with_capacity(word.len());
            out.push_str(&word[..index]);
            out.extend(c.to_uppercase());
            out.push_str(&word[index + c.len_utf8()..]);
            out
        }
        None => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Work Engagement", "Work engagement")]
    #[case("work engagement", "Work engagement")]
    #[case("The Role of DNA in Self-Determination", "The role of DNA in self-determination")]
    #[case("Growth of E. coli in Broth", "Growth of E. coli in broth")]
    #[case("Burnout: A Meta-Analysis", "Burnout: A meta-analysis")]
    #[case("Using the iPhone in 2015 Surveys", "Using the iPhone in 2015 surveys")]
    #[case("WORK ENGAGEMENT", "Work engagement")]
    fn test_sentence_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(apply(TitleCase::Sentence, input), expected);
    }

    #[rstest]
    #[case("work engagement", "Work Engagement")]
    #[case("the role of DNA in self-determination", "The Role of DNA in Self-Determination")]
    #[case("a theory of the firm", "A Theory of the Firm")]
    #[case("burnout: a meta-analysis of the evidence", "Burnout: A Meta-Analysis of the Evidence")]
    #[case("what we fight for", "What We Fight For")]
    #[case("\"quoted\" beginnings", "\"Quoted\" Beginnings")]
    fn test_title_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(apply(TitleCase::Title, input), expected);
    }

    #[test]
    fn test_as_is_keeps_title() {
        assert_eq!(apply(TitleCase::AsIs, "wORK eNGAGEMENT"), "wORK eNGAGEMENT");
    }
}
