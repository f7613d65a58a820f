//! Output composer: renders the collected stylesheet in section order.

use crate::at_rules::AtRuleCollector;
use crate::ruledb::{RuleDB, Scope};
use crate::types::Rule;
use css_media_queries::arrange_sections;
use css_selectors::{BASE_ORDER, SelectorSection, classify_selector};

const BANNER: &str = "/* ================================================== */\n\
                      /* COMPILED STYLESHEET */\n\
                      /* ================================================== */\n\n";
const INDENT: &str = "    ";

fn push_heading(out: &mut String, title: &str) {
    out.push_str("/* ===== ");
    out.push_str(title);
    out.push_str(" ===== */\n");
}

/// Append `rule` with every line prefixed by `indent`. Empty rules write nothing.
fn emit_rule(rule: &Rule, indent: &str, out: &mut String) {
    if rule.is_empty() {
        return;
    }
    out.push_str(indent);
    out.push_str(&rule.selector);
    out.push_str(" {\n");
    for (name, value) in &rule.properties {
        out.push_str(&format!("{indent}{INDENT}{name}: {value};\n"));
    }
    out.push_str(indent);
    out.push_str("}\n");
}

fn emit_at_rules(at_rules: &AtRuleCollector, out: &mut String) {
    if at_rules.is_empty() {
        return;
    }
    push_heading(out, "PRESERVED AT-RULES");
    for entry in at_rules.entries() {
        out.push_str(&entry.content);
        if !entry.content.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push('\n');
}

/// Non-empty top-level rules grouped by section, in emission order.
fn group_top_level(scope: &Scope) -> Vec<(SelectorSection, Vec<&Rule>)> {
    let mut groups: Vec<(SelectorSection, Vec<&Rule>)> = SelectorSection::ALL
        .iter()
        .map(|&section| (section, Vec::new()))
        .collect();
    for rule in scope.values().filter(|rule| !rule.is_empty()) {
        let section = classify_selector(&rule.selector);
        if let Some((_, group)) = groups.iter_mut().find(|(candidate, _)| *candidate == section) {
            group.push(rule);
        }
    }
    for (section, group) in &mut groups {
        if *section == SelectorSection::Base {
            // Fixed elements first, pseudo-elements after, each group stable.
            group.sort_by_key(|rule| {
                BASE_ORDER
                    .iter()
                    .position(|base| *base == rule.selector)
                    .unwrap_or(BASE_ORDER.len())
            });
        }
    }
    groups.retain(|(_, group)| !group.is_empty());
    groups
}

fn emit_top_level(scope: &Scope, out: &mut String) {
    let mut current_title = None;
    for (section, rules) in group_top_level(scope) {
        let title = section.title();
        if current_title != Some(title) {
            push_heading(out, title);
            current_title = Some(title);
        }
        for rule in rules {
            emit_rule(rule, "", out);
            out.push('\n');
        }
    }
}

fn emit_media(rules: &RuleDB, out: &mut String) {
    let scopes = rules
        .media_scopes()
        .map(|(condition, scope)| (condition.to_owned(), scope))
        .filter(|(_, scope)| scope.values().any(|rule| !rule.is_empty()));
    let sections = arrange_sections(scopes);
    if sections.is_empty() {
        return;
    }
    push_heading(out, "MEDIA QUERIES");
    for (section, scopes) in sections {
        out.push_str(&format!("\n/* --- {} --- */\n", section.title()));
        for (condition, scope) in scopes {
            out.push_str(&format!("@media {condition} {{\n"));
            let mut first = true;
            for rule in scope.values().filter(|rule| !rule.is_empty()) {
                if !first {
                    out.push('\n');
                }
                first = false;
                emit_rule(rule, INDENT, out);
            }
            out.push_str("}\n\n");
        }
    }
}

/// Collapse runs of three or more newlines into one blank line and end with a single newline.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0_usize;
    for character in text.chars() {
        if character == '\n' {
            newlines = newlines.saturating_add(1);
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(character);
    }
    let trimmed_len = out.trim_end_matches('\n').len();
    out.truncate(trimmed_len);
    out.push('\n');
    out
}

/// Render the whole stylesheet: at-rules, top-level sections, then media sections.
pub fn emit_stylesheet(rules: &RuleDB, at_rules: &AtRuleCollector) -> String {
    let mut out = String::from(BANNER);
    emit_at_rules(at_rules, &mut out);
    emit_top_level(rules.top_level(), &mut out);
    emit_media(rules, &mut out);
    collapse_blank_lines(&out)
}
