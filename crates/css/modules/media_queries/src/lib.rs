//! Media Queries Level 4 — Condition text handling.
//! Spec: <https://www.w3.org/TR/mediaqueries-4/>
//!
//! Media conditions are compared and ordered as text: conditions that only
//! differ in spacing are normalized to the same key, each condition is
//! bucketed by the device range it targets, and buckets are ordered so that
//! broader queries come before narrower ones.

mod condition;
mod section;

pub use condition::{WidthFeature, normalize_condition, width_features, width_sort_key};
pub use section::{MediaCategory, MediaSection, arrange_sections, classify_condition};
