//! Alphabetical ordering of rules.

use log::debug;

/// Pseudo-classes whose rules depend on their relative source order.
pub const ORDER_SENSITIVE_PATTERNS: [&str; 8] = [
    ":link",
    ":visited",
    ":hover",
    ":focus",
    ":active",
    ":first-child",
    ":last-child",
    ":nth-",
];

/// Whether moving this selector relative to its siblings may change the cascade.
pub fn is_order_sensitive(selector: &str) -> bool {
    ORDER_SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| selector.contains(pattern))
}

/// Compute the alphabetical permutation of `selectors`.
///
/// Returns indices into `selectors`. With `safe` set, order-sensitive
/// selectors come first in their original order, followed by the remaining
/// selectors sorted case-insensitively. Without it every selector is sorted.
/// Sorting is stable, so selectors equal up to case keep their source order.
pub fn alphabetical_order<S: AsRef<str>>(selectors: &[S], safe: bool) -> Vec<usize> {
    let (mut pinned, mut sortable): (Vec<usize>, Vec<usize>) = (0..selectors.len())
        .partition(|&index| safe && is_order_sensitive(selectors[index].as_ref()));
    sortable.sort_by_cached_key(|&index| selectors[index].as_ref().to_lowercase());
    debug!(
        "alphabetical order: {} pinned, {} sorted",
        pinned.len(),
        sortable.len()
    );
    pinned.append(&mut sortable);
    pinned
}
