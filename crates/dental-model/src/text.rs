//! Keyword matching over free-text treatment and diagnosis names.
//!
//! Every rule table keys off case-insensitive substring containment, so the
//! helpers here are the single definition of "name contains keyword" used by
//! the catalog index and by the evaluators.

/// Returns true if `haystack` contains `needle`, ignoring case.
///
/// An empty keyword never matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Returns the first keyword contained in `haystack`, if any.
pub fn first_contained<'a, I>(haystack: &str, keywords: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let lowered = haystack.to_lowercase();
    keywords
        .into_iter()
        .map(String::as_str)
        .find(|keyword| !keyword.is_empty() && lowered.contains(&keyword.to_lowercase()))
}

/// Returns true if `haystack` contains any of `keywords`, ignoring case.
pub fn contains_any<'a, I>(haystack: &str, keywords: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    first_contained(haystack, keywords).is_some()
}

/// Returns the first `count` characters of `raw` (character-safe).
pub fn leading_chars(raw: &str, count: usize) -> &str {
    match raw.char_indices().nth(count) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}
