//! Condition normalization and width extraction.

/// Collapse whitespace and normalize spacing around `(`, `)` and `:`.
///
/// `screen  and ( max-width:768px )` becomes `screen and (max-width: 768px)`.
/// The result is stable: normalizing it again returns it unchanged.
pub fn normalize_condition(raw: &str) -> String {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let collapsed: Vec<char> = words.join(" ").chars().collect();
    let mut out = String::with_capacity(collapsed.len());
    for (index, &character) in collapsed.iter().enumerate() {
        let next = collapsed.get(index.saturating_add(1)).copied();
        match character {
            ' ' if out.ends_with('(') || matches!(next, Some(')' | ':')) => {}
            ':' => {
                out.push(':');
                if next.is_some_and(|following| following != ' ' && following != ')') {
                    out.push(' ');
                }
            }
            _ => out.push(character),
        }
    }
    out
}

/// Width media feature kinds used for classification and ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthFeature {
    /// `max-width`
    Max,
    /// `min-width`
    Min,
}

/// All `max-width:` / `min-width:` features with an integer value, in source order.
///
/// Only the leading integer digits are read, so `768.5px` yields 768.
pub fn width_features(condition: &str) -> Vec<(WidthFeature, u32)> {
    condition
        .match_indices("-width:")
        .filter_map(|(index, marker)| {
            let feature = match condition.get(index.checked_sub(3)?..index)? {
                "max" => WidthFeature::Max,
                "min" => WidthFeature::Min,
                _ => return None,
            };
            let rest = condition.get(index.saturating_add(marker.len())..)?.trim_start();
            let digits_end = rest
                .find(|character: char| !character.is_ascii_digit())
                .unwrap_or(rest.len());
            let width = rest.get(..digits_end)?.parse().ok()?;
            Some((feature, width))
        })
        .collect()
}

/// Sort key placing wide `max-width` queries first and narrow `min-width` queries first.
///
/// Uses the first width feature of the condition; conditions without one get `0`.
pub fn width_sort_key(condition: &str) -> i64 {
    match width_features(condition).first() {
        Some(&(WidthFeature::Max, width)) => -i64::from(width),
        Some(&(WidthFeature::Min, width)) => i64::from(width),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spacing() {
        assert_eq!(
            normalize_condition("screen  and ( max-width:768px )"),
            "screen and (max-width: 768px)"
        );
        assert_eq!(
            normalize_condition("(min-width : 600px)\n  and\t(orientation:landscape)"),
            "(min-width: 600px) and (orientation: landscape)"
        );
        assert_eq!(normalize_condition("print"), "print");
    }

    #[test]
    fn normalization_is_stable() {
        for raw in [
            "screen and (max-width: 768px)",
            "( prefers-color-scheme :dark )",
            "not all and (monochrome)",
        ] {
            let once = normalize_condition(raw);
            assert_eq!(normalize_condition(&once), once);
        }
    }

    #[test]
    fn extracts_width_features_in_order() {
        assert_eq!(
            width_features("(min-width: 600px) and (max-width: 900px)"),
            vec![(WidthFeature::Min, 600), (WidthFeature::Max, 900)]
        );
        assert_eq!(width_features("(max-width: 48em)"), vec![(WidthFeature::Max, 48)]);
        assert!(width_features("(max-width: calc(10px))").is_empty());
        assert!(width_features("(min-device-width: 300px)").is_empty());
    }

    #[test]
    fn sort_keys() {
        assert_eq!(width_sort_key("(max-width: 480px)"), -480);
        assert_eq!(width_sort_key("(min-width: 1200px)"), 1200);
        assert_eq!(width_sort_key("(orientation: portrait)"), 0);
    }
}
