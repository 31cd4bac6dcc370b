//! The builtin style definitions.

use crate::record::{Field, WorkType};
use super::Condition::{HasContainer, NoContainer};
use super::Variable::{
    Authors, CitationNumber, CiteKey, ContainerTitle, Doi, Edition, EntryType, Isbn, Issue, Link,
    Pages, Publisher, PublisherPlace, Url, Volume, Year,
};
use super::{
    Anonymous, AuthorRule, Condition, DateRule, DelimiterBeforeLast, Element, Escape, InTextRule,
    LinkRule, NameOrder, PageFormat, PageRule, Quotes, StyleDefinition, TitleCase, Truncation,
    Variable,
};

/// Every builtin style, in listing order.
pub(super) fn styles() -> Vec<StyleDefinition> {
    vec![
        apa_6th(),
        apa_7th(),
        mla("mla", "MLA 8th edition", "8", "doi:"),
        mla("mla-9", "MLA 9th edition", "9", "https://doi.org/"),
        chicago_author_date(),
        chicago_notes(),
        harvard(),
        ieee(),
        vancouver(),
        ama(),
        acs(),
        nature(),
        science(),
        bibtex(),
        acm(),
    ]
}

fn var(variable: Variable) -> Element {
    Element::variable(variable)
}

fn group(items: Vec<Element>) -> Element {
    Element::group(items)
}

fn title() -> Element {
    Element::variable(Variable::Title)
}

/// A style skeleton: no truncation, plain quotes, expanded en dash ranges.
fn base(id: &str, name: &str, version: &str, layout: Vec<Element>) -> StyleDefinition {
    StyleDefinition {
        id: id.into(),
        name: name.to_string(),
        version: version.into(),
        authors: AuthorRule::default(),
        in_text: InTextRule::default(),
        anonymous: Anonymous::Omit,
        title_case: TitleCase::AsIs,
        quotes: Quotes::default(),
        punctuation_in_quote: false,
        date: DateRule::default(),
        link: LinkRule::default(),
        pages: PageRule::default(),
        escape: Escape::None,
        layout,
        required: Vec::new(),
    }
}

fn et_al(threshold: usize, keep: usize, delimiter: &str) -> Option<Truncation> {
    Some(Truncation {
        threshold,
        keep,
        delimiter: delimiter.into(),
        term: "et al.".into(),
        last: false,
    })
}

fn link(doi_prefix: &str, url_prefix: &str) -> LinkRule {
    LinkRule {
        doi_prefix: Some(doi_prefix.into()),
        url_prefix: Some(url_prefix.into()),
    }
}

fn no_date() -> DateRule {
    DateRule {
        missing: Some("n.d.".into()),
    }
}

/// "(Family, 2015)" / "Family (2015)", with `delimiter` between name and year.
fn author_date_in_text(
    parenthetical_conjunction: &str,
    delimiter: &str,
    et_al_min: usize,
) -> InTextRule {
    InTextRule {
        et_al_min,
        parenthetical_conjunction: parenthetical_conjunction.into(),
        parenthetical: vec![
            group(vec![var(Authors), var(Year)])
                .delimiter(delimiter)
                .prefix("(")
                .suffix(")"),
        ],
        narrative: vec![var(Authors), var(Year).prefix(" (").suffix(")")],
        ..InTextRule::default()
    }
}

/// "[?]" / "Family [?]".
fn numeric_in_text(open: &str, close: &str) -> InTextRule {
    InTextRule {
        parenthetical: vec![var(CitationNumber).prefix(open).suffix(close)],
        narrative: vec![
            var(Authors),
            var(CitationNumber)
                .prefix(&format!(" {open}"))
                .suffix(close),
        ],
        ..InTextRule::default()
    }
}

/// Superscript reference numbers.
fn superscript_in_text() -> InTextRule {
    InTextRule {
        parenthetical: vec![var(CitationNumber).superscript()],
        narrative: vec![var(Authors), var(CitationNumber).superscript()],
        ..InTextRule::default()
    }
}

fn apa_authors(threshold: usize) -> AuthorRule {
    AuthorRule {
        initialize_with: Some(". ".into()),
        conjunction: Some("&".into()),
        delimiter_before_last: DelimiterBeforeLast::Always,
        et_al: Some(Truncation {
            threshold,
            keep: threshold - 1,
            delimiter: ", ".into(),
            term: ". . .".into(),
            last: true,
        }),
        ..AuthorRule::default()
    }
}

fn apa_layout(publisher: Element) -> Vec<Element> {
    vec![
        var(Authors).suffix("."),
        var(Year).prefix(" (").suffix(")."),
        group(vec![title(), var(Edition).prefix(" (").suffix(" ed.)")])
            .prefix(" ")
            .suffix(".")
            .when(HasContainer),
        group(vec![
            title().italic(),
            var(Edition).prefix(" (").suffix(" ed.)"),
        ])
        .prefix(" ")
        .suffix(".")
        .when(NoContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Volume).italic().prefix(", "),
            var(Issue).prefix("(").suffix(")"),
            var(Pages).prefix(", "),
        ])
        .prefix(" ")
        .suffix(".")
        .when(HasContainer),
        publisher.prefix(" ").suffix(".").when(NoContainer),
        var(Link).prefix(" "),
    ]
}

fn apa_6th() -> StyleDefinition {
    let publisher = group(vec![var(PublisherPlace), var(Publisher)]).delimiter(": ");
    StyleDefinition {
        authors: apa_authors(7),
        in_text: author_date_in_text("&", ", ", 3),
        anonymous: Anonymous::Title,
        title_case: TitleCase::Sentence,
        date: no_date(),
        link: link("doi:", "Retrieved from "),
        ..base("apa", "APA 6th edition", "6", apa_layout(publisher))
    }
}

fn apa_7th() -> StyleDefinition {
    let publisher = group(vec![var(Publisher)]);
    StyleDefinition {
        authors: apa_authors(20),
        in_text: author_date_in_text("&", ", ", 3),
        anonymous: Anonymous::Title,
        title_case: TitleCase::Sentence,
        date: no_date(),
        link: link("https://doi.org/", ""),
        ..base("apa-7th", "APA 7th edition", "7", apa_layout(publisher))
    }
}

fn mla(id: &str, name: &str, version: &str, doi_prefix: &str) -> StyleDefinition {
    let layout = vec![
        var(Authors).suffix("."),
        title()
            .quoted()
            .prefix(" ")
            .suffix(".")
            .when(HasContainer),
        title().italic().prefix(" ").suffix(".").when(NoContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Edition).suffix(" ed."),
            var(Volume).prefix("vol. "),
            var(Issue).prefix("no. "),
            var(Publisher).when(NoContainer),
            var(Year),
            var(Pages).prefix("pp. "),
            var(Link),
        ])
        .delimiter(", ")
        .prefix(" ")
        .suffix("."),
    ];
    StyleDefinition {
        authors: AuthorRule {
            name_order: NameOrder::FamilyFirstLeadOnly,
            conjunction: Some("and".into()),
            delimiter_before_last: DelimiterBeforeLast::Always,
            et_al: et_al(2, 1, ", "),
            ..AuthorRule::default()
        },
        in_text: InTextRule {
            parenthetical: vec![var(Authors).prefix("(").suffix(")")],
            narrative: vec![var(Authors)],
            ..InTextRule::default()
        },
        anonymous: Anonymous::Title,
        title_case: TitleCase::Title,
        punctuation_in_quote: true,
        link: link(doi_prefix, ""),
        ..base(id, name, version, layout)
    }
}

fn chicago_authors() -> AuthorRule {
    AuthorRule {
        name_order: NameOrder::FamilyFirstLeadOnly,
        conjunction: Some("and".into()),
        delimiter_before_last: DelimiterBeforeLast::Always,
        et_al: et_al(10, 7, ", "),
        ..AuthorRule::default()
    }
}

fn chicago_author_date() -> StyleDefinition {
    let layout = vec![
        var(Authors).suffix("."),
        var(Year).prefix(" ").suffix("."),
        title()
            .quoted()
            .prefix(" ")
            .suffix(".")
            .when(HasContainer),
        title().italic().prefix(" ").suffix(".").when(NoContainer),
        var(Edition).prefix(" ").suffix(" ed.").when(NoContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Volume).prefix(" "),
            var(Issue).prefix(" (").suffix(")"),
            var(Pages).prefix(": "),
        ])
        .prefix(" ")
        .suffix(".")
        .when(HasContainer),
        group(vec![var(PublisherPlace), var(Publisher)])
            .delimiter(": ")
            .prefix(" ")
            .suffix(".")
            .when(NoContainer),
        var(Link).prefix(" ").suffix("."),
    ];
    StyleDefinition {
        authors: chicago_authors(),
        in_text: author_date_in_text("and", " ", 4),
        anonymous: Anonymous::Title,
        title_case: TitleCase::Title,
        punctuation_in_quote: true,
        date: no_date(),
        link: link("https://doi.org/", ""),
        ..base(
            "chicago",
            "Chicago Manual of Style 17th edition (author-date)",
            "17",
            layout,
        )
    }
}

fn chicago_notes() -> StyleDefinition {
    let layout = vec![
        var(Authors).suffix("."),
        title()
            .quoted()
            .prefix(" ")
            .suffix(".")
            .when(HasContainer),
        title().italic().prefix(" ").suffix(".").when(NoContainer),
        var(Edition).prefix(" ").suffix(" ed.").when(NoContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Volume).prefix(" "),
            var(Issue).prefix(", no. "),
            var(Year).prefix(" (").suffix(")"),
            var(Pages).prefix(": "),
        ])
        .prefix(" ")
        .suffix(".")
        .when(HasContainer),
        group(vec![
            group(vec![var(PublisherPlace), var(Publisher)]).delimiter(": "),
            var(Year),
        ])
        .delimiter(", ")
        .prefix(" ")
        .suffix(".")
        .when(NoContainer),
        var(Link).prefix(" ").suffix("."),
    ];
    StyleDefinition {
        authors: chicago_authors(),
        in_text: author_date_in_text("and", " ", 4),
        anonymous: Anonymous::Title,
        title_case: TitleCase::Title,
        punctuation_in_quote: true,
        date: no_date(),
        link: link("https://doi.org/", ""),
        ..base(
            "chicago-notes",
            "Chicago Manual of Style 17th edition (notes and bibliography)",
            "17",
            layout,
        )
    }
}

fn harvard() -> StyleDefinition {
    let layout = vec![
        var(Authors),
        var(Year).prefix(" (").suffix(")"),
        title().quoted().prefix(" ").when(HasContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Volume).prefix(", "),
            var(Issue).prefix("(").suffix(")"),
            var(Pages).prefix(", pp. "),
        ])
        .prefix(", ")
        .suffix(".")
        .when(HasContainer),
        title().italic().prefix(" ").suffix(".").when(NoContainer),
        var(Edition).prefix(" ").suffix(" edn.").when(NoContainer),
        group(vec![var(PublisherPlace), var(Publisher)])
            .delimiter(": ")
            .prefix(" ")
            .suffix(".")
            .when(NoContainer),
        var(Link).prefix(" Available at: ").suffix("."),
    ];
    StyleDefinition {
        authors: AuthorRule {
            initialize_with: Some(".".into()),
            conjunction: Some("and".into()),
            delimiter_before_last: DelimiterBeforeLast::Never,
            et_al: et_al(3, 1, " "),
            ..AuthorRule::default()
        },
        in_text: author_date_in_text("and", " ", 3),
        anonymous: Anonymous::Title,
        title_case: TitleCase::Sentence,
        quotes: Quotes {
            open: "'".into(),
            close: "'".into(),
        },
        date: no_date(),
        link: link("https://doi.org/", ""),
        ..base("harvard", "Harvard (Cite Them Right)", "12", layout)
    }
}

fn ieee() -> StyleDefinition {
    let layout = vec![
        var(CitationNumber).prefix("[").suffix("]"),
        var(Authors).prefix(" ").suffix(","),
        title()
            .quoted()
            .prefix(" ")
            .suffix(",")
            .when(HasContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Volume).prefix("vol. "),
            var(Issue).prefix("no. "),
            var(Pages).prefix("pp. "),
            var(Year),
            var(Link),
        ])
        .delimiter(", ")
        .prefix(" ")
        .suffix(".")
        .when(HasContainer),
        title().italic().prefix(" ").when(NoContainer),
        var(Edition).prefix(", ").suffix(" ed.").when(NoContainer),
        group(vec![
            group(vec![var(PublisherPlace), var(Publisher)]).delimiter(": "),
            var(Year),
        ])
        .delimiter(", ")
        .prefix(". ")
        .suffix(".")
        .when(NoContainer),
        var(Link).prefix(" ").suffix(".").when(NoContainer),
    ];
    StyleDefinition {
        authors: AuthorRule {
            name_order: NameOrder::GivenFirst,
            initialize_with: Some(". ".into()),
            conjunction: Some("and".into()),
            delimiter_before_last: DelimiterBeforeLast::Contextual,
            et_al: et_al(6, 1, " "),
            ..AuthorRule::default()
        },
        in_text: numeric_in_text("[", "]"),
        title_case: TitleCase::Sentence,
        punctuation_in_quote: true,
        link: link("doi: ", "[Online]. Available: "),
        ..base("ieee", "IEEE", "2021", layout)
    }
}

/// Vancouver-family layout: "Journal. 2015;12(3):100-10." or
/// "2nd ed. Place: Publisher; 2015."
fn medical_layout(container: Element, publisher: Element) -> Vec<Element> {
    vec![
        var(Authors).suffix("."),
        title().prefix(" ").suffix("."),
        group(vec![
            container.suffix("."),
            var(Year).prefix(" "),
            group(vec![var(Volume), var(Issue).prefix("(").suffix(")")]).prefix(";"),
            var(Pages).prefix(":"),
        ])
        .prefix(" ")
        .suffix(".")
        .when(HasContainer),
        var(Edition).prefix(" ").suffix(" ed.").when(NoContainer),
        group(vec![publisher, var(Year)])
            .delimiter("; ")
            .prefix(" ")
            .suffix(".")
            .when(NoContainer),
        var(Link).prefix(" "),
    ]
}

fn vancouver() -> StyleDefinition {
    let layout = medical_layout(
        var(ContainerTitle),
        group(vec![var(PublisherPlace), var(Publisher)]).delimiter(": "),
    );
    StyleDefinition {
        authors: AuthorRule {
            initialize_with: Some("".into()),
            sort_separator: " ".into(),
            et_al: et_al(6, 6, ", "),
            ..AuthorRule::default()
        },
        in_text: numeric_in_text("[", "]"),
        title_case: TitleCase::Sentence,
        link: link("doi:", "Available from: "),
        pages: PageRule {
            delimiter: "-".into(),
            format: PageFormat::Minimal,
        },
        ..base("vancouver", "Vancouver", "2", layout)
    }
}

fn ama() -> StyleDefinition {
    let layout = medical_layout(var(ContainerTitle).italic(), var(Publisher));
    StyleDefinition {
        authors: AuthorRule {
            initialize_with: Some("".into()),
            sort_separator: " ".into(),
            et_al: et_al(6, 3, ", "),
            ..AuthorRule::default()
        },
        in_text: superscript_in_text(),
        title_case: TitleCase::Sentence,
        link: link("doi:", ""),
        pages: PageRule {
            delimiter: "-".into(),
            format: PageFormat::Expanded,
        },
        ..base("ama", "AMA 11th edition", "11", layout)
    }
}

fn acs() -> StyleDefinition {
    let layout = vec![
        var(Authors).suffix("."),
        title().prefix(" ").suffix(".").when(HasContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Year).bold().prefix(" "),
            var(Volume).italic().prefix(", "),
            var(Issue).prefix(" (").suffix(")"),
            var(Pages).prefix(", "),
        ])
        .prefix(" ")
        .suffix(".")
        .when(HasContainer),
        title().italic().prefix(" ").when(NoContainer),
        var(Edition).prefix(", ").suffix(" ed.").when(NoContainer),
        group(vec![
            group(vec![var(Publisher), var(PublisherPlace)]).delimiter(": "),
            var(Year),
        ])
        .delimiter(", ")
        .prefix("; ")
        .suffix(".")
        .when(NoContainer),
        var(Link).prefix(" ").suffix("."),
    ];
    StyleDefinition {
        authors: AuthorRule {
            initialize_with: Some(". ".into()),
            delimiter: "; ".into(),
            ..AuthorRule::default()
        },
        in_text: superscript_in_text(),
        title_case: TitleCase::Title,
        link: link("DOI: ", ""),
        ..base("acs", "American Chemical Society", "3", layout)
    }
}

/// "Journal 12, 100–110 (2015)." or "Title (Publisher, 2015)."
fn journal_letter_layout(authors: Element) -> Vec<Element> {
    vec![
        authors,
        title().prefix(" ").suffix(".").when(HasContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Volume).bold().prefix(" "),
            var(Pages).prefix(", "),
        ])
        .prefix(" ")
        .when(HasContainer),
        var(Year).prefix(" (").suffix(").").when(HasContainer),
        title().italic().prefix(" ").when(NoContainer),
        group(vec![var(Publisher), var(Year)])
            .delimiter(", ")
            .prefix(" (")
            .suffix(")")
            .when(NoContainer),
        Element::text(".").when(NoContainer),
    ]
}

fn nature() -> StyleDefinition {
    StyleDefinition {
        authors: AuthorRule {
            initialize_with: Some(". ".into()),
            conjunction: Some("&".into()),
            delimiter_before_last: DelimiterBeforeLast::Never,
            et_al: et_al(5, 1, " "),
            ..AuthorRule::default()
        },
        in_text: superscript_in_text(),
        title_case: TitleCase::Sentence,
        ..base(
            "nature",
            "Nature",
            "2024",
            journal_letter_layout(var(Authors).suffix(".")),
        )
    }
}

fn science() -> StyleDefinition {
    StyleDefinition {
        authors: AuthorRule {
            name_order: NameOrder::GivenFirst,
            initialize_with: Some(". ".into()),
            et_al: et_al(5, 1, " "),
            ..AuthorRule::default()
        },
        in_text: numeric_in_text("(", ")"),
        title_case: TitleCase::Sentence,
        ..base(
            "science",
            "Science",
            "2024",
            journal_letter_layout(var(Authors).suffix(",")),
        )
    }
}

fn bibtex() -> StyleDefinition {
    let field = |name: &str, variable: Variable| {
        var(variable)
            .prefix(&format!(",\n  {name} = {{"))
            .suffix("}")
    };
    let in_collection = vec![WorkType::Chapter, WorkType::PaperConference];
    let layout = vec![
        Element::text("@"),
        var(EntryType),
        Element::text("{"),
        var(CiteKey),
        field("author", Authors),
        field("title", Variable::Title),
        field("journal", ContainerTitle).when(Condition::TypeIsNot(in_collection.clone())),
        field("booktitle", ContainerTitle).when(Condition::TypeIs(in_collection)),
        field("year", Year),
        field("volume", Volume),
        field("number", Issue),
        field("pages", Pages),
        field("edition", Edition),
        field("publisher", Publisher),
        field("address", PublisherPlace),
        field("isbn", Isbn),
        field("doi", Doi),
        field("url", Url),
        Element::text("\n}"),
    ];
    StyleDefinition {
        authors: AuthorRule {
            delimiter: " and ".into(),
            ..AuthorRule::default()
        },
        in_text: InTextRule {
            parenthetical: vec![var(CiteKey).prefix("\\citep{").suffix("}")],
            narrative: vec![var(CiteKey).prefix("\\citet{").suffix("}")],
            ..InTextRule::default()
        },
        pages: PageRule {
            delimiter: "--".into(),
            format: PageFormat::Expanded,
        },
        escape: Escape::Latex,
        required: vec![Field::Year],
        ..base("bibtex", "BibTeX", "0.99", layout)
    }
}

fn acm() -> StyleDefinition {
    let layout = vec![
        var(Authors).suffix("."),
        var(Year).prefix(" ").suffix("."),
        title().prefix(" ").suffix(".").when(HasContainer),
        group(vec![
            var(ContainerTitle).italic(),
            var(Volume).prefix(" "),
            var(Issue).prefix(", "),
            var(Year).prefix(" (").suffix(")"),
            var(Pages).prefix(", "),
        ])
        .prefix(" ")
        .suffix(".")
        .when(HasContainer),
        group(vec![
            title().italic(),
            var(Edition).prefix(" (").suffix(" ed.)"),
        ])
        .prefix(" ")
        .suffix(".")
        .when(NoContainer),
        group(vec![var(Publisher), var(PublisherPlace)])
            .delimiter(", ")
            .prefix(" ")
            .suffix(".")
            .when(NoContainer),
        var(Link).prefix(" "),
    ];
    StyleDefinition {
        authors: AuthorRule {
            name_order: NameOrder::GivenFirst,
            conjunction: Some("and".into()),
            delimiter_before_last: DelimiterBeforeLast::Contextual,
            ..AuthorRule::default()
        },
        in_text: numeric_in_text("[", "]"),
        title_case: TitleCase::Title,
        link: link("https://doi.org/", ""),
        ..base("acm", "ACM Reference Format", "2024", layout)
    }
}
