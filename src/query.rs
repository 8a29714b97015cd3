// @module: Query text for the per-word full-text measurement

const CONTAINS_PREFIX: &str = "distinct-values((for $i in //*[text() contains text \"";
const CONTAINS_SUFFIX: &str = "\"] return base-uri($i)))";

/// Build the query that finds every document with a text node containing
/// `word` and returns the distinct document URIs.
///
/// The word is inserted verbatim. Quotes or other query syntax inside the word
/// are not escaped and end up in the query text as-is, so such a word usually
/// makes the server reject the query.
pub fn build_contains_query(word: &str) -> String {
    format!("{}{}{}", CONTAINS_PREFIX, word, CONTAINS_SUFFIX)
}

/// Recover the word from a query built by `build_contains_query`
pub fn word_of_contains_query(text: &str) -> Option<&str> {
    text.strip_prefix(CONTAINS_PREFIX)?.strip_suffix(CONTAINS_SUFFIX)
}
