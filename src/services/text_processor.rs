// Text Processing Service
// Headline normalization and the structural counts the detectors read

/// A headline prepared for scoring.
///
/// `original` keeps the trimmed input with its casing intact (punctuation and
/// capitalization detectors need it); `text` is the lower-cased copy every
/// keyword detector matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHeadline {
    pub original: String,
    pub text: String,
}

/// Whitespace plus the zero-width byte order mark some editors prepend to files
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|t| !t.is_empty())
}

impl NormalizedHeadline {
    /// Returns `None` for empty, whitespace-only or BOM-only input
    pub fn from_raw(raw: &str) -> Option<Self> {
        let original = raw.trim_matches(is_separator);
        if original.is_empty() {
            return None;
        }
        Some(Self {
            original: original.to_string(),
            text: original.to_lowercase(),
        })
    }

    /// Whitespace-delimited tokens of the original headline
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        split_tokens(&self.original)
    }

    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    pub fn contains_any<S: AsRef<str>>(&self, needles: &[S]) -> bool {
        needles.iter().any(|n| self.text.contains(n.as_ref()))
    }
}

/// Count ASCII exclamation marks
pub fn count_exclamations(text: &str) -> usize {
    text.chars().filter(|c| *c == '!').count()
}

/// A token is "shouted" when it is longer than `min_len` characters and
/// upper-casing it changes nothing. Digits and symbols pass that test too.
pub fn is_shouted_token(token: &str, min_len: usize) -> bool {
    token.chars().count() > min_len && token.to_uppercase() == token
}

/// Count shouted tokens in a whitespace-delimited string
pub fn count_shouted_tokens(text: &str, min_len: usize) -> usize {
    split_tokens(text)
        .filter(|w| is_shouted_token(w, min_len))
        .count()
}
