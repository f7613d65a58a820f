//! Selectors Level 4 — Selector list handling for stylesheet reorganization.
//! Spec: <https://www.w3.org/TR/selectors-4/>
//!
//! Nothing here matches selectors against a tree. Selectors are treated as text:
//! - Splitting a selector list into its complex selectors (Section 4.1 — Selector lists)
//! - Classifying a selector into the output section it belongs to
//! - Alphabetical ordering that keeps state-dependent pseudo-classes in source order

mod order;
mod section;
mod split;

// Re-export public API
pub use order::{ORDER_SENSITIVE_PATTERNS, alphabetical_order, is_order_sensitive};
pub use section::{BASE_ORDER, SelectorSection, classify_selector};
pub use split::split_selector_list;
