//! Classification of media conditions into output sections.

use crate::condition::{WidthFeature, width_features, width_sort_key};
use log::debug;

/// Widest `max-width` still treated as a phone layout.
const MOBILE_MAX_WIDTH: u32 = 768;
/// Widest `max-width` still treated as a tablet layout.
const TABLET_MAX_WIDTH: u32 = 1024;

/// Device range a media condition targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaCategory {
    /// Mentions `print`.
    Print,
    /// Uses a `prefers-*` feature.
    Preference,
    /// `max-width` up to 768px.
    Mobile,
    /// `max-width` above 768px up to 1024px.
    Tablet,
    /// `max-width` above 1024px.
    WideMaxWidth,
    /// `min-width` without any `max-width`.
    Desktop,
    /// Everything else, including `max-width` without a readable number.
    Other,
}

impl MediaCategory {
    /// Output section this category is emitted under.
    pub const fn section(self) -> MediaSection {
        match self {
            Self::Print => MediaSection::Print,
            Self::Preference => MediaSection::Preference,
            Self::Mobile | Self::Tablet => MediaSection::Mobile,
            Self::Desktop => MediaSection::Desktop,
            Self::WideMaxWidth | Self::Other => MediaSection::Other,
        }
    }
}

/// Group of `@media` blocks in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaSection {
    /// `min-width` queries, narrowest first.
    Desktop,
    /// `max-width` queries up to tablet size, widest first.
    Mobile,
    /// Remaining queries, ordered by width where one is present.
    Other,
    /// `prefers-*` queries in source order.
    Preference,
    /// `print` queries in source order. Always last.
    Print,
}

impl MediaSection {
    /// Sections in emission order.
    pub const ALL: [Self; 5] = [
        Self::Desktop,
        Self::Mobile,
        Self::Other,
        Self::Preference,
        Self::Print,
    ];

    /// Heading comment written above the section.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Desktop => "DESKTOP",
            Self::Mobile => "MOBILE",
            Self::Other => "OTHER",
            Self::Preference => "USER PREFERENCES",
            Self::Print => "PRINT",
        }
    }

    /// Whether blocks inside this section are ordered by width.
    pub const fn sorted_by_width(self) -> bool {
        matches!(self, Self::Desktop | Self::Mobile | Self::Other)
    }
}

/// Classify a normalized media condition.
pub fn classify_condition(condition: &str) -> MediaCategory {
    if condition.contains("print") {
        return MediaCategory::Print;
    }
    if condition.contains("prefers-") {
        return MediaCategory::Preference;
    }
    if condition.contains("max-width") {
        let max_width = width_features(condition)
            .into_iter()
            .find_map(|(feature, width)| (feature == WidthFeature::Max).then_some(width));
        return match max_width {
            Some(width) if width <= MOBILE_MAX_WIDTH => MediaCategory::Mobile,
            Some(width) if width <= TABLET_MAX_WIDTH => MediaCategory::Tablet,
            Some(_) => MediaCategory::WideMaxWidth,
            None => MediaCategory::Other,
        };
    }
    if condition.contains("min-width") {
        return MediaCategory::Desktop;
    }
    MediaCategory::Other
}

/// Bucket `(condition, value)` pairs into sections in emission order.
///
/// Empty sections are left out. Within width-ordered sections the sort is
/// stable, so conditions with equal keys keep their insertion order.
pub fn arrange_sections<T>(
    scopes: impl IntoIterator<Item = (String, T)>,
) -> Vec<(MediaSection, Vec<(String, T)>)> {
    let mut buckets: Vec<(MediaSection, Vec<(String, T)>)> = MediaSection::ALL
        .iter()
        .map(|&section| (section, Vec::new()))
        .collect();
    for (condition, value) in scopes {
        let category = classify_condition(&condition);
        if category == MediaCategory::Tablet {
            debug!("@media {condition}: tablet range, emitted with mobile queries");
        }
        let section = category.section();
        if let Some((_, bucket)) = buckets.iter_mut().find(|(candidate, _)| *candidate == section) {
            bucket.push((condition, value));
        }
    }
    for (section, bucket) in &mut buckets {
        if section.sorted_by_width() {
            bucket.sort_by_key(|(condition, _)| width_sort_key(condition));
        }
    }
    buckets.retain(|(_, bucket)| !bucket.is_empty());
    buckets
}
