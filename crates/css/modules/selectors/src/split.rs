//! Selector list splitting.
//! Spec: <https://www.w3.org/TR/selectors-4/#grouping>

use core::mem::take;

/// Scanner state while walking a selector list.
struct SelectorListScanner {
    /// Selectors completed so far.
    selectors: Vec<String>,
    /// Characters of the selector being accumulated.
    current: String,
    /// Open `(`, `[` and `{` not yet closed.
    depth: usize,
    /// Quote character of the string literal currently open, if any.
    quote: Option<char>,
    /// Whether the previous character was a backslash.
    escaped: bool,
}

impl SelectorListScanner {
    const fn new() -> Self {
        Self {
            selectors: Vec::new(),
            current: String::new(),
            depth: 0,
            quote: None,
            escaped: false,
        }
    }

    fn push(&mut self, character: char) {
        if let Some(open) = self.quote {
            if character == open && !self.escaped {
                self.quote = None;
            }
        } else {
            match character {
                '"' | '\'' if !self.escaped => self.quote = Some(character),
                '(' | '[' | '{' if !self.escaped => self.depth = self.depth.saturating_add(1),
                ')' | ']' | '}' if !self.escaped => self.depth = self.depth.saturating_sub(1),
                ',' if self.depth == 0 && !self.escaped => {
                    self.flush();
                    return;
                }
                _ => {}
            }
        }
        self.escaped = character == '\\' && !self.escaped;
        self.current.push(character);
    }

    fn flush(&mut self) {
        let selector = take(&mut self.current);
        let trimmed = selector.trim();
        if !trimmed.is_empty() {
            self.selectors.push(trimmed.to_owned());
        }
    }

    /// Unterminated strings or brackets still yield the trailing selector.
    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.selectors
    }
}

/// Split a selector list on top-level commas.
///
/// Commas nested in `()`, `[]` or `{}`, commas inside quoted strings and
/// backslash-escaped commas are kept. Each selector is trimmed; empty entries are dropped.
pub fn split_selector_list(list: &str) -> Vec<String> {
    let mut scanner = SelectorListScanner::new();
    for character in list.chars() {
        scanner.push(character);
    }
    scanner.finish()
}
