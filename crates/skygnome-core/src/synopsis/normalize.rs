use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^A-Za-z0-9_]+").expect("leading non-word regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\s+").expect("whitespace run regex"));

/// Strip leading non-word characters, collapse whitespace runs and trim.
///
/// # Examples
/// ```
/// use skygnome_core::normalize;
///
/// assert_eq!(normalize("... the  story   so far "), "the story so far");
/// ```
pub fn normalize(text: &str) -> String {
    let text = LEADING_NON_WORD.replace(text, "");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

/// Remove the first occurrence of `gunk`, then normalize what is left.
pub(crate) fn remove(text: &str, gunk: &str) -> String {
    normalize(&text.replacen(gunk, "", 1))
}

#[cfg(test)]
mod tests {
    use super::{normalize, remove};

    #[test]
    fn normalize_strips_leading_punctuation() {
        assert_eq!(normalize("...continues"), "continues");
        assert_eq!(normalize(" - Drama"), "Drama");
    }

    #[test]
    fn normalize_keeps_inner_punctuation() {
        assert_eq!(normalize("A tale. Of two\t\tcities."), "A tale. Of two cities.");
    }

    #[test]
    fn normalize_of_only_punctuation_is_empty() {
        assert_eq!(normalize("..."), "");
    }

    #[test]
    fn remove_takes_first_occurrence_only() {
        assert_eq!(remove("a (x) b (x) c", "(x)"), "a b (x) c");
    }
}
