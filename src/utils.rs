use crate::regex::Regex;
use std::sync::LazyLock;

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\D)(\d{4})(?:\D|$)").unwrap());

static MARKUP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());

/// Formats page numbers consistently, handling partial end page numbers
///
/// # Arguments
///
/// * `page_range` - The page string to format
pub fn format_page_numbers(page_range: &str) -> String {
    // Handle non-hyphenated or empty input
    if !page_range.contains('-') {
        return page_range.to_string();
    }

    let parts: Vec<&str> = page_range.split('-').collect();
    if parts.len() != 2 {
        return page_range.to_string();
    }

    let (from, to) = (parts[0].trim(), parts[1].trim());

    let (from_prefix, from_num) = split_prefix_and_number(from);
    let (to_prefix, to_num) = split_prefix_and_number(to);

    if from_prefix != to_prefix && !from_prefix.is_empty() && !to_prefix.is_empty() {
        return page_range.to_string();
    }

    let to_num = match to_num {
        Some(num) => num,
        None => return page_range.to_string(),
    };

    let from_num = match from_num {
        Some(num) => num,
        None => return page_range.to_string(),
    };

    let digits_only = |num: &str| num.bytes().all(|b| b.is_ascii_digit());
    if !digits_only(&from_num) || !digits_only(&to_num) {
        return page_range.to_string();
    }

    // If to number is shorter, use from's leading digits
    let completed_to = if to_num.len() < from_num.len() {
        format!("{}{}", &from_num[..from_num.len() - to_num.len()], to_num)
    } else {
        to_num.to_string()
    };

    if from_num == completed_to {
        return format!("{}{}", from_prefix, from_num);
    }

    format!("{}{}-{}{}", from_prefix, from_num, from_prefix, completed_to)
}

/// Helper function to split a page number into prefix and numeric part
fn split_prefix_and_number(input: &str) -> (String, Option<String>) {
    match input.find(|c: char| c.is_ascii_digit()) {
        Some(index) => {
            let prefix = input[..index].to_string();
            let number = input[index..].to_string();
            (prefix, Some(number))
        }
        None => (input.to_string(), None),
    }
}

/// Shortens the end page of a range to the digits that differ from the start
/// page, e.g. `"100-110"` becomes `("100", "10")` and `"284-287"` becomes
/// `("284", "7")`.
///
/// Returns `None` when `pages` is not a plain numeric range.
pub fn minimal_page_range(pages: &str) -> Option<(String, String)> {
    let (from, to) = pages.split_once('-')?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty()
        || from.len() != to.len()
        || !from.chars().all(|c| c.is_ascii_digit())
        || !to.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let common = from
        .chars()
        .zip(to.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let keep = (to.len() - common).max(1);
    Some((from.to_string(), to[to.len() - keep..].to_string()))
}

/// Formats a DOI string by removing URL prefixes and [doi] suffixes
///
/// # Arguments
///
/// * `doi_str` - The DOI string to format
pub fn format_doi(doi_str: &str) -> Option<String> {
    if doi_str.is_empty() {
        return None;
    }
    let doi = doi_str
        .trim()
        .trim_end_matches("[doi]")
        .trim()
        .replace(|c: char| c.is_whitespace(), "")
        .to_lowercase();

    // Find the first occurrence of "10." which typically starts a DOI
    doi.find("10.").map(|pos| doi[pos..].to_string())
}

/// Splits a single personal name into `(given, family)`.
///
/// Handles "Family, Given" and "Given Family" forms. A name without any
/// whitespace or comma is a mononym and has no given part.
pub fn parse_author_name(name: &str) -> (Option<String>, String) {
    let name = name.trim();
    if let Some((family, given)) = name.split_once(',') {
        let given = given.trim();
        return (
            (!given.is_empty()).then(|| given.to_string()),
            family.trim().to_string(),
        );
    }

    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => (None, String::new()),
        [family] => (None, family.to_string()),
        [given @ .., family] => (Some(given.join(" ")), family.to_string()),
    }
}

/// Extracts the first four-digit year from a free-form date string.
pub fn extract_year(date: &str) -> Option<i32> {
    YEAR_REGEX
        .captures(date)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Strips markup tags and collapses runs of whitespace.
///
/// Returns `None` when nothing but whitespace is left.
pub fn clean_text(text: &str) -> Option<String> {
    let stripped = MARKUP_REGEX.replace_all(text, "");
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Renders a number as an English ordinal ("1st", "2nd", "11th", ...).
pub fn ordinal(number: u32) -> String {
    let suffix = match (number % 10, number % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{number}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_format_page_numbers() {
        assert_eq!(format_page_numbers("1234-45"), "1234-1245");
        assert_eq!(format_page_numbers("1234"), "1234");
        assert_eq!(format_page_numbers("123-456"), "123-456");
        assert_eq!(format_page_numbers("e071674"), "e071674");
        assert_eq!(format_page_numbers("R575-82"), "R575-R582");
        assert_eq!(format_page_numbers("12-345"), "12-345");
        assert_eq!(format_page_numbers("5-10"), "5-10");
        assert_eq!(format_page_numbers("A94-A95"), "A94-A95");
        assert_eq!(format_page_numbers("01-Apr"), "01-Apr");
        assert_eq!(format_page_numbers("101-101"), "101");
        assert_eq!(format_page_numbers("12é-3"), "12é-3");
        assert_eq!(format_page_numbers("1234-4é"), "1234-4é");
        assert_eq!(format_page_numbers("١٢٣-٤"), "١٢٣-٤");
    }

    #[rstest]
    #[case("100-110", Some(("100", "10")))]
    #[case("1234-1245", Some(("1234", "45")))]
    #[case("100-199", Some(("100", "99")))]
    #[case("5-9", Some(("5", "9")))]
    #[case("1001-1008", Some(("1001", "8")))]
    #[case("99-100", None)]
    #[case("R575-R582", None)]
    #[case("e071674", None)]
    fn test_minimal_page_range(#[case] input: &str, #[case] expected: Option<(&str, &str)>) {
        let expected = expected.map(|(a, b)| (a.to_string(), b.to_string()));
        assert_eq!(minimal_page_range(input), expected);
    }

    #[test]
    fn test_format_doi() {
        let test_cases = vec![
            ("10.1000/test", Some("10.1000/test".to_string())),
            ("10.1000/test [doi]", Some("10.1000/test".to_string())),
            ("https://doi.org/10.1000/test", Some("10.1000/test".to_string())),
            ("http://dx.doi.org/10.1000/test", Some("10.1000/test".to_string())),
            ("DOI: 10.1000/TEST", Some("10.1000/test".to_string())),
            ("", None),
            ("invalid", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(format_doi(input), expected);
        }
    }

    #[test]
    fn test_parse_author_name() {
        let (given, family) = parse_author_name("Seaton, Gina A.");
        assert_eq!(given.as_deref(), Some("Gina A."));
        assert_eq!(family, "Seaton");

        let (given, family) = parse_author_name("James M. Diefendorff");
        assert_eq!(given.as_deref(), Some("James M."));
        assert_eq!(family, "Diefendorff");

        let (given, family) = parse_author_name("Plato");
        assert_eq!(given, None);
        assert_eq!(family, "Plato");

        let (given, family) = parse_author_name("Smith-Jones, ");
        assert_eq!(given, None);
        assert_eq!(family, "Smith-Jones");

        let (given, family) = parse_author_name("");
        assert_eq!(given, None);
        assert_eq!(family, "");
    }

    #[rstest]
    #[case("2015", Some(2015))]
    #[case("March 2015", Some(2015))]
    #[case("2015-03-01", Some(2015))]
    #[case("c1999.", Some(1999))]
    #[case("unknown", None)]
    fn test_extract_year(#[case] input: &str, #[case] expected: Option<i32>) {
        assert_eq!(extract_year(input), expected);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("  Growth of <i>E. coli</i>\n in   broth "),
            Some("Growth of E. coli in broth".to_string())
        );
        assert_eq!(clean_text(" <b></b> "), None);
    }

    #[rstest]
    #[case(1, "1st")]
    #[case(2, "2nd")]
    #[case(3, "3rd")]
    #[case(4, "4th")]
    #[case(11, "11th")]
    #[case(12, "12th")]
    #[case(21, "21st")]
    #[case(102, "102nd")]
    fn test_ordinal(#[case] number: u32, #[case] expected: &str) {
        assert_eq!(ordinal(number), expected);
    }
}
