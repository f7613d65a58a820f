//! Stylesheet reorganizer.
//!
//! Parses a stylesheet, merges repeated selectors (last declaration wins per
//! property), deduplicates named at-rules such as `@keyframes`, and renders the
//! result grouped into sections: preserved at-rules, `:root` variables, reset
//! and base rules, the remaining rules by selector kind, then media queries
//! ordered from broad to narrow with preference and print queries last.

pub mod at_rules;
pub mod emitter;
pub mod parser;
pub mod ruledb;
pub mod types;

pub use types::{Compilation, CompileOptions, CompileStats, PropertyValue, Rule};

use log::info;

/// Run the whole pipeline on one stylesheet.
///
/// Syntax errors never abort the run; they are skipped and counted in
/// [`CompileStats::parse_errors`].
pub fn compile(css: &str, options: &CompileOptions) -> Compilation {
    let mut collected = parser::collect(css);
    if options.alphabetical {
        info!(
            "Sorting selectors alphabetically ({} mode)",
            if options.safe_mode { "safe" } else { "unsafe" }
        );
        collected.rules.sort_alphabetically(options.safe_mode);
    }
    let output = emitter::emit_stylesheet(&collected.rules, &collected.at_rules);
    let stats = collected.stats(css.len(), output.len());
    Compilation { css: output, stats }
}
