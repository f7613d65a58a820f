use core::fmt;
use indexmap::IndexMap;

/// Value stored for one property of a rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyValue {
    pub value: String,
    pub important: bool,
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.important {
            write!(formatter, "{} !important", self.value)
        } else {
            write!(formatter, "{}", self.value)
        }
    }
}

/// All declarations collected for one selector in one scope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    pub selector: String,
    /// Lowercased property name -> value. Later writes replace the value in place.
    pub properties: IndexMap<String, PropertyValue>,
}

impl Rule {
    pub fn new(selector: &str) -> Self {
        Self {
            selector: selector.trim().to_owned(),
            properties: IndexMap::new(),
        }
    }

    /// Set a property, overwriting any earlier value for the same name.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) {
        self.properties.insert(name.to_ascii_lowercase(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Switches for one compilation run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompileOptions {
    /// Sort selectors alphabetically inside every scope.
    pub alphabetical: bool,
    /// Keep order-sensitive pseudo-class selectors in source order while sorting.
    pub safe_mode: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            alphabetical: false,
            safe_mode: true,
        }
    }
}

/// Counters describing one compilation run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CompileStats {
    /// Qualified rules seen, including ones later dropped as empty.
    pub rules_parsed: usize,
    /// Individual selectors stored after splitting selector lists.
    pub selectors_split: usize,
    /// Distinct properties per declaration block, summed over every selector they were merged into.
    pub properties_merged: usize,
    /// Non-media at-rules seen.
    pub at_rules: usize,
    /// `@media` blocks seen.
    pub media_queries: usize,
    /// Syntax errors skipped.
    pub parse_errors: usize,
    /// At-rules nested in `@media` blocks, which are not carried over.
    pub dropped_at_rules: usize,
    /// Length of the input text in bytes.
    pub input_bytes: usize,
    /// Length of the generated text in bytes.
    pub output_bytes: usize,
}

impl CompileStats {
    /// Bytes saved; negative when the output grew.
    pub fn size_reduction(&self) -> i64 {
        let input = i64::try_from(self.input_bytes).unwrap_or(i64::MAX);
        let output = i64::try_from(self.output_bytes).unwrap_or(i64::MAX);
        input.saturating_sub(output)
    }
}

/// Result of [`crate::compile`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Compilation {
    /// The reorganized stylesheet.
    pub css: String,
    pub stats: CompileStats,
}
