//! Output formats and rendered fragments.

use crate::style::Emphasis;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How structural emphasis is emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// No markers for italic and bold; superscript becomes a leading `^`
    #[default]
    Plain,
    /// `*italic*`, `**bold**`, `^superscript^`
    Markdown,
    /// `<i>`, `<b>` and `<sup>` tags, with text escaped
    Html,
}

impl OutputFormat {
    fn markers(self, emphasis: Emphasis) -> (&'static str, &'static str) {
        match (self, emphasis) {
            (_, Emphasis::None) => ("", ""),
            // Keeps reference numbers apart from the text they follow
            (OutputFormat::Plain, Emphasis::Superscript) => ("^", ""),
            (OutputFormat::Plain, _) => ("", ""),
            (OutputFormat::Markdown, Emphasis::Italic) => ("*", "*"),
            (OutputFormat::Markdown, Emphasis::Bold) => ("**", "**"),
            (OutputFormat::Markdown, Emphasis::Superscript) => ("^", "^"),
            (OutputFormat::Html, Emphasis::Italic) => ("<i>", "</i>"),
            (OutputFormat::Html, Emphasis::Bold) => ("<b>", "</b>"),
            (OutputFormat::Html, Emphasis::Superscript) => ("<sup>", "</sup>"),
        }
    }

    fn escape(self, text: &str) -> Cow<'_, str> {
        match self {
            OutputFormat::Html if text.contains(['&', '<', '>']) => Cow::Owned(
                text.replace('&', "&amp;")
                    .replace('<', "&lt;")
                    .replace('>', "&gt;"),
            ),
            _ => Cow::Borrowed(text),
        }
    }
}

const LATEX_SPECIALS: [char; 7] = ['&', '%', '$', '#', '_', '{', '}'];

/// Backslash-escapes LaTeX special characters.
pub(crate) fn escape_latex(text: &str) -> Cow<'_, str> {
    if !text.contains(LATEX_SPECIALS) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if LATEX_SPECIALS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// A rendered fragment of a citation.
///
/// Tracks the last visible character so that joining fragments never
/// doubles sentence punctuation ("et al.." or "Why?."), and whether the
/// fragment ends in a closing quote that a following period or comma may
/// move inside.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Piece {
    text: String,
    last: Option<char>,
    /// Byte length of the closing quote the text ends with
    quote_close: Option<usize>,
}

impl Piece {
    /// A fragment of literal text, escaped for `format`.
    pub(crate) fn text(content: &str, format: OutputFormat) -> Self {
        Self {
            text: format.escape(content).into_owned(),
            last: content.chars().last(),
            quote_close: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub(crate) fn emphasize(self, emphasis: Emphasis, format: OutputFormat) -> Self {
        let (open, close) = format.markers(emphasis);
        if open.is_empty() || self.is_empty() {
            return self;
        }
        Self {
            text: format!("{open}{}{close}", self.text),
            last: self.last,
            quote_close: None,
        }
    }

    pub(crate) fn quote(self, open: &str, close: &str, format: OutputFormat) -> Self {
        let close = format.escape(close);
        Self {
            text: format!("{}{}{close}", format.escape(open), self.text),
            last: self.last,
            quote_close: Some(close.len()),
        }
    }

    /// Appends `other`, dropping a leading period or comma that would
    /// follow sentence punctuation, and moving it inside a closing quote when
    /// `punctuation_in_quote` is set.
    pub(crate) fn push(&mut self, mut other: Piece, punctuation_in_quote: bool) {
        if let Some(first) = other.text.chars().next().filter(|c| matches!(c, '.' | ',')) {
            let redundant = match (first, self.last) {
                ('.', Some('.' | '?' | '!')) => true,
                (',', Some('?' | '!')) => true,
                _ => false,
            };
            if redundant {
                other.text.remove(0);
            } else if let (true, Some(close_len)) = (punctuation_in_quote, self.quote_close) {
                other.text.remove(0);
                let at = self.text.len() - close_len;
                self.text.insert(at, first);
                self.last = Some(first);
                if other.text.is_empty() {
                    return;
                }
            }
        }

        if other.text.is_empty() {
            return;
        }
        self.text.push_str(&other.text);
        self.last = other.last.or(self.last);
        self.quote_close = other.quote_close;
    }

    pub(crate) fn into_string(self) -> String {
        self.text
    }
}
