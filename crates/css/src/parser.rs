//! Stylesheet intake: parsed nodes into the rule store and at-rule collector.

use crate::at_rules::AtRuleCollector;
use crate::ruledb::RuleDB;
use crate::types::CompileStats;
use css_selectors::split_selector_list;
use css_syntax::{AtRule, Node, QualifiedRule, SyntaxError, parse_stylesheet};
use log::{debug, warn};

/// Counters accumulated while one stylesheet is taken in.
#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    rules_parsed: usize,
    selectors_split: usize,
    properties_merged: usize,
    at_rules: usize,
    media_queries: usize,
    parse_errors: usize,
    dropped_at_rules: usize,
}

/// Everything collected from one stylesheet.
#[derive(Debug, Default)]
pub struct Collected {
    pub rules: RuleDB,
    pub at_rules: AtRuleCollector,
    counters: Counters,
}

impl Collected {
    /// Freeze the counters into the run's statistics record.
    pub fn stats(&self, input_bytes: usize, output_bytes: usize) -> CompileStats {
        let counters = self.counters;
        CompileStats {
            rules_parsed: counters.rules_parsed,
            selectors_split: counters.selectors_split,
            properties_merged: counters.properties_merged,
            at_rules: counters.at_rules,
            media_queries: counters.media_queries,
            parse_errors: counters.parse_errors,
            dropped_at_rules: counters.dropped_at_rules,
            input_bytes,
            output_bytes,
        }
    }

    fn visit(&mut self, node: Node) {
        match node {
            Node::Qualified(rule) => self.visit_qualified(rule, None),
            Node::AtRule(rule) => self.visit_at_rule(rule),
            Node::Error(error) => self.record_error(&error),
        }
    }

    fn record_error(&mut self, error: &SyntaxError) {
        self.counters.parse_errors = self.counters.parse_errors.saturating_add(1);
        warn!("parse error at line {}: {}", error.location, error.message);
    }

    fn visit_qualified(&mut self, rule: QualifiedRule, media: Option<&str>) {
        self.counters.rules_parsed = self.counters.rules_parsed.saturating_add(1);
        for error in &rule.block.errors {
            self.record_error(error);
        }
        if rule.prelude.is_empty() {
            debug!("line {}: rule without selector skipped", rule.location);
            return;
        }
        if rule.block.declarations.is_empty() {
            debug!("line {}: empty rule `{}` dropped", rule.location, rule.prelude);
            return;
        }
        for selector in split_selector_list(&rule.prelude) {
            self.counters.selectors_split = self.counters.selectors_split.saturating_add(1);
            let written = self
                .rules
                .add_declarations(media, &selector, &rule.block.declarations);
            self.counters.properties_merged = self.counters.properties_merged.saturating_add(written);
        }
    }

    fn visit_at_rule(&mut self, rule: AtRule) {
        let keyword = rule.keyword();
        if keyword == "media" {
            self.visit_media(rule);
            return;
        }
        self.counters.at_rules = self.counters.at_rules.saturating_add(1);
        let name = rule.prelude_text();
        self.at_rules.record(&keyword, Some(name), rule.to_css());
    }

    fn visit_media(&mut self, rule: AtRule) {
        self.counters.media_queries = self.counters.media_queries.saturating_add(1);
        let condition = rule.prelude_text().to_owned();
        // `@media {}` applies everywhere.
        let media = if condition.is_empty() {
            None
        } else {
            Some(condition.as_str())
        };
        for nested in rule.rules {
            match nested {
                Node::Qualified(inner) => self.visit_qualified(inner, media),
                Node::AtRule(inner) => {
                    self.counters.dropped_at_rules = self.counters.dropped_at_rules.saturating_add(1);
                    warn!(
                        "line {}: @{} nested in @media {condition} dropped",
                        inner.location, inner.name
                    );
                }
                Node::Error(error) => self.record_error(&error),
            }
        }
    }
}

/// Parse `css` and collect its rules and at-rules.
pub fn collect(css: &str) -> Collected {
    let mut collected = Collected::default();
    for node in parse_stylesheet(css) {
        collected.visit(node);
    }
    collected
}
