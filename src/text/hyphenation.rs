//! Hyphenation-aware line joining.
//!
//! Layout extractors hand over one string per physical line, so words that
//! were wrapped at the right margin arrive split:
//!
//! - "инфор-" (line 1) + "мация" (line 2) → "информация"
//! - "busi\u{00AD}" (line 1) + "ness" (line 2) → "business"
//!
//! A line ending in a continuation hyphen (hard `-`, `‐`, `‑` or a soft
//! hyphen U+00AD) is merged with the next line when that line starts with a
//! letter. Everything else is joined with the
//! caller's separator, so the only character ever dropped is the wrap hyphen.

const SOFT_HYPHEN: char = '\u{00AD}';
const WRAP_HYPHENS: [char; 4] = ['-', '\u{2010}', '\u{2011}', SOFT_HYPHEN];

/// Hyphenation handler for reconstructing split words.
#[derive(Debug, Clone)]
pub struct HyphenationHandler {
    /// Whether to merge wrapped words at all
    repair: bool,
}

impl Default for HyphenationHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl HyphenationHandler {
    /// Create a new hyphenation handler with repair enabled.
    pub fn new() -> Self {
        Self { repair: true }
    }

    /// Enable or disable word-wrap repair.
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    /// Check if a line ends with a continuation hyphen.
    ///
    /// A continuation hyphen is one of `-`, `‐`, `‑` or the soft hyphen as
    /// the last non-space character. Whether it is removed depends on the
    /// next line, see [`should_merge`](Self::should_merge).
    ///
    /// # Examples
    ///
    /// ```
    /// use docstruct::text::hyphenation::HyphenationHandler;
    ///
    /// assert!(HyphenationHandler::is_continuation_hyphen("инфор-"));
    /// assert!(HyphenationHandler::is_continuation_hyphen("в 10-"));
    /// assert!(!HyphenationHandler::is_continuation_hyphen("- пункт"));
    /// ```
    pub fn is_continuation_hyphen(text: &str) -> bool {
        text.trim_end()
            .chars()
            .next_back()
            .is_some_and(|c| WRAP_HYPHENS.contains(&c))
    }

    /// Check if a line starts with a letter (after leading whitespace).
    pub fn starts_with_letter(text: &str) -> bool {
        text.trim_start()
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic())
    }

    /// Decide whether `current` and `next` form one wrapped word.
    pub fn should_merge(&self, current: &str, next: &str) -> bool {
        self.repair && Self::is_continuation_hyphen(current) && Self::starts_with_letter(next)
    }

    /// Append `next` to `acc`, repairing a wrapped word when needed.
    ///
    /// Returns `true` when the hyphen was removed and the words merged.
    pub fn join_into(&self, acc: &mut String, next: &str, separator: &str) -> bool {
        let next = next.trim();
        if next.is_empty() {
            return false;
        }
        if acc.is_empty() {
            acc.push_str(next);
            return false;
        }

        if self.should_merge(acc, next) {
            let trimmed_len = acc.trim_end().len();
            acc.truncate(trimmed_len);
            acc.pop();
            acc.push_str(next);
            return true;
        }

        acc.push_str(separator);
        acc.push_str(next);
        false
    }

    /// Join a sequence of lines with `separator`, repairing wrapped words.
    ///
    /// # Examples
    ///
    /// ```
    /// use docstruct::text::hyphenation::HyphenationHandler;
    ///
    /// let handler = HyphenationHandler::new();
    /// let text = handler.join_lines(["Новая инфор-", "мация поступила"], "\n");
    /// assert_eq!(text, "Новая информация поступила");
    /// ```
    pub fn join_lines<'a, I>(&self, lines: I, separator: &str) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut acc = String::new();
        for line in lines {
            self.join_into(&mut acc, line, separator);
        }
        acc
    }
}
