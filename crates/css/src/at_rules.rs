//! Collection of at-rules that are carried through verbatim.

use log::debug;
use std::collections::HashMap;

/// At-rules identified by the name in their prelude; a later definition replaces an earlier one.
const NAMED_AT_RULES: [&str; 6] = [
    "keyframes",
    "-webkit-keyframes",
    "-moz-keyframes",
    "-o-keyframes",
    "counter-style",
    "property",
];

/// Whether at-rules with this keyword are deduplicated by name.
pub fn is_named_at_rule(keyword: &str) -> bool {
    NAMED_AT_RULES.contains(&keyword)
}

/// One preserved at-rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollectedAtRule {
    /// Lowercased keyword, e.g. `keyframes` or `import`.
    pub keyword: String,
    /// Name for deduplicated kinds; `None` otherwise or when the prelude was empty.
    pub name: Option<String>,
    /// Serialized rule, emitted as is.
    pub content: String,
}

/// At-rules in output order.
#[derive(Clone, Debug, Default)]
pub struct AtRuleCollector {
    entries: Vec<CollectedAtRule>,
    /// (keyword, name) -> index into `entries`
    named: HashMap<(String, String), usize>,
}

impl AtRuleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an at-rule.
    ///
    /// Named kinds (see [`is_named_at_rule`]) with a non-empty name replace the
    /// content of an earlier entry with the same keyword and name, keeping its
    /// position. Everything else is appended. Returns `true` on replacement.
    pub fn record(&mut self, keyword: &str, name: Option<&str>, content: String) -> bool {
        let name = name
            .map(str::trim)
            .filter(|candidate| !candidate.is_empty() && is_named_at_rule(keyword));
        if let Some(name) = name {
            let key = (keyword.to_owned(), name.to_owned());
            if let Some(entry) = self.named.get(&key).and_then(|&index| self.entries.get_mut(index)) {
                debug!("@{keyword} {name}: replacing earlier definition");
                entry.content = content;
                return true;
            }
            self.named.insert(key, self.entries.len());
        }
        self.entries.push(CollectedAtRule {
            keyword: keyword.to_owned(),
            name: name.map(str::to_owned),
            content,
        });
        false
    }

    pub fn entries(&self) -> &[CollectedAtRule] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
