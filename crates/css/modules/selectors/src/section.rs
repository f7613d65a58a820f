//! Grouping of selectors into output sections.

/// Bare element selectors emitted first in the base section, in this order.
pub const BASE_ORDER: [&str; 3] = ["*", "html", "body"];

/// Output section a top-level selector is emitted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectorSection {
    /// `:root` and custom property scopes.
    Root,
    /// Universal, `html`, `body` and pseudo-element rules.
    Base,
    /// Selectors starting with `h1` through `h6`.
    Heading,
    /// Anything not matched by another section.
    Element,
    /// Selectors starting with `.`.
    Class,
    /// Selectors starting with `#`.
    Id,
    /// Other selectors using a pseudo-class.
    Pseudo,
}

impl SelectorSection {
    /// Sections in emission order.
    pub const ALL: [Self; 7] = [
        Self::Root,
        Self::Base,
        Self::Heading,
        Self::Element,
        Self::Class,
        Self::Id,
        Self::Pseudo,
    ];

    /// Heading comment written above the section.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Root => "CSS VARIABLES",
            Self::Base => "RESET AND BASE",
            Self::Heading | Self::Element | Self::Class | Self::Id | Self::Pseudo => "MAIN RULES",
        }
    }
}

fn is_root(selector: &str) -> bool {
    selector.starts_with(":root")
}

fn is_base(selector: &str) -> bool {
    BASE_ORDER.contains(&selector) || selector.starts_with("::")
}

fn is_heading(selector: &str) -> bool {
    ["h1", "h2", "h3", "h4", "h5", "h6"]
        .iter()
        .any(|heading| selector.starts_with(heading))
}

fn is_class(selector: &str) -> bool {
    selector.starts_with('.')
}

fn is_id(selector: &str) -> bool {
    selector.starts_with('#')
}

fn is_pseudo(selector: &str) -> bool {
    selector.contains(':')
}

/// Checked top to bottom; the first matching predicate decides.
const CLASSIFIERS: [(fn(&str) -> bool, SelectorSection); 6] = [
    (is_root, SelectorSection::Root),
    (is_base, SelectorSection::Base),
    (is_heading, SelectorSection::Heading),
    (is_class, SelectorSection::Class),
    (is_id, SelectorSection::Id),
    (is_pseudo, SelectorSection::Pseudo),
];

/// Section a single (already split) selector belongs to.
pub fn classify_selector(selector: &str) -> SelectorSection {
    CLASSIFIERS
        .iter()
        .find(|(matches, _)| matches(selector))
        .map_or(SelectorSection::Element, |&(_, section)| section)
}

#[cfg(test)]
mod tests {
    use super::{SelectorSection, classify_selector};

    #[test]
    fn classifies_by_first_matching_rule() {
        let cases = [
            (":root", SelectorSection::Root),
            (":root[data-theme=dark]", SelectorSection::Root),
            ("*", SelectorSection::Base),
            ("html", SelectorSection::Base),
            ("body", SelectorSection::Base),
            ("::selection", SelectorSection::Base),
            ("h2", SelectorSection::Heading),
            ("h1.title:hover", SelectorSection::Heading),
            (".btn:hover", SelectorSection::Class),
            ("#main", SelectorSection::Id),
            ("a:hover", SelectorSection::Pseudo),
            ("input::placeholder", SelectorSection::Pseudo),
            ("nav ul li", SelectorSection::Element),
            ("header", SelectorSection::Element),
            ("body.dark", SelectorSection::Element),
            ("*:focus", SelectorSection::Pseudo),
        ];
        for (selector, expected) in cases {
            assert_eq!(classify_selector(selector), expected, "selector {selector}");
        }
    }
}
