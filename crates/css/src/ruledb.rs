use crate::types::{PropertyValue, Rule};
use core::mem::take;
use css_media_queries::normalize_condition;
use css_selectors::alphabetical_order;
use css_syntax::Declaration;
use indexmap::IndexMap;
use log::trace;
use std::collections::HashSet;

/// Selector -> rule, one entry per selector, in first-seen order.
pub type Scope = IndexMap<String, Rule>;

/// Rules of one stylesheet, split into the top level and one scope per media condition.
#[derive(Clone, Debug, Default)]
pub struct RuleDB {
    top: Scope,
    /// Keyed by normalized condition, so spacing variants share a scope.
    media: IndexMap<String, Scope>,
}

impl RuleDB {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `declarations` into the rule for `selector` in the given scope.
    ///
    /// `media` is the raw condition text, or `None` for the top level. Creates
    /// the rule on first use; later values overwrite earlier ones per property.
    /// Returns the number of distinct properties in the block, so a name
    /// repeated inside one block counts once.
    pub fn add_declarations(
        &mut self,
        media: Option<&str>,
        selector: &str,
        declarations: &[Declaration],
    ) -> usize {
        let scope = match media {
            Some(condition) => self.media.entry(normalize_condition(condition)).or_default(),
            None => &mut self.top,
        };
        let rule = scope
            .entry(selector.to_owned())
            .or_insert_with(|| Rule::new(selector));
        let mut distinct = HashSet::new();
        for decl in declarations {
            distinct.insert(decl.name.to_ascii_lowercase());
            trace!("{selector} <- {}: {}", decl.name, decl.value);
            rule.set_property(
                &decl.name,
                PropertyValue {
                    value: decl.value.clone(),
                    important: decl.important,
                },
            );
        }
        distinct.len()
    }

    pub fn top_level(&self) -> &Scope {
        &self.top
    }

    pub fn media_scope(&self, condition: &str) -> Option<&Scope> {
        self.media.get(&normalize_condition(condition))
    }

    /// Media scopes in first-seen order.
    pub fn media_scopes(&self) -> impl Iterator<Item = (&str, &Scope)> {
        self.media.iter().map(|(condition, scope)| (condition.as_str(), scope))
    }

    /// Reorder every scope alphabetically by selector (see [`alphabetical_order`]).
    pub fn sort_alphabetically(&mut self, safe: bool) {
        sort_scope(&mut self.top, safe);
        for scope in self.media.values_mut() {
            sort_scope(scope, safe);
        }
    }
}

fn sort_scope(scope: &mut Scope, safe: bool) {
    let order = {
        let selectors: Vec<&str> = scope.keys().map(String::as_str).collect();
        alphabetical_order(&selectors, safe)
    };
    let mut entries: Vec<Option<(String, Rule)>> = take(scope).into_iter().map(Some).collect();
    *scope = order
        .into_iter()
        .filter_map(|index| entries.get_mut(index).and_then(Option::take))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, value: &str) -> Declaration {
        Declaration {
            name: name.to_owned(),
            value: value.to_owned(),
            important: false,
        }
    }

    fn values(rule: &Rule) -> Vec<(&str, String)> {
        rule.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.to_string()))
            .collect()
    }

    #[test]
    fn later_declarations_win_and_new_ones_append() {
        let mut db = RuleDB::new();
        db.add_declarations(None, ".a", &[decl("color", "red"), decl("margin", "0")]);
        let written = db.add_declarations(
            None,
            ".a",
            &[
                Declaration {
                    important: true,
                    ..decl("color", "blue")
                },
                decl("padding", "1px"),
            ],
        );
        assert_eq!(written, 2);
        assert_eq!(db.top_level().len(), 1);
        assert_eq!(
            values(&db.top_level()[".a"]),
            vec![
                ("color", "blue !important".to_owned()),
                ("margin", "0".to_owned()),
                ("padding", "1px".to_owned()),
            ]
        );
    }

    #[test]
    fn repeated_names_in_one_block_count_once() {
        let mut db = RuleDB::new();
        let written = db.add_declarations(
            None,
            "a",
            &[decl("color", "red"), decl("COLOR", "blue"), decl("margin", "0")],
        );
        assert_eq!(written, 2);
        assert_eq!(
            values(&db.top_level()["a"]),
            vec![("color", "blue".to_owned()), ("margin", "0".to_owned())]
        );
    }

    #[test]
    fn media_scopes_are_independent_and_normalized() {
        let mut db = RuleDB::new();
        db.add_declarations(None, ".a", &[decl("color", "red")]);
        db.add_declarations(Some("(max-width:600px)"), ".a", &[decl("color", "green")]);
        db.add_declarations(Some("( max-width: 600px )"), ".a", &[decl("width", "auto")]);
        assert_eq!(values(&db.top_level()[".a"]), vec![("color", "red".to_owned())]);
        assert_eq!(db.media_scopes().count(), 1);
        let scope = db.media_scope("(max-width: 600px)").unwrap();
        assert_eq!(
            values(&scope[".a"]),
            vec![("color", "green".to_owned()), ("width", "auto".to_owned())]
        );
    }

    #[test]
    fn sorting_reorders_each_scope() {
        let mut db = RuleDB::new();
        for selector in ["a:hover", ".zeta", "a:link", ".alpha"] {
            db.add_declarations(None, selector, &[decl("color", "red")]);
            db.add_declarations(Some("print"), selector, &[decl("color", "black")]);
        }
        db.sort_alphabetically(true);
        let top: Vec<&str> = db.top_level().keys().map(String::as_str).collect();
        assert_eq!(top, vec!["a:hover", "a:link", ".alpha", ".zeta"]);
        let print: Vec<&str> = db.media_scope("print").unwrap().keys().map(String::as_str).collect();
        assert_eq!(print, top);
    }
}
