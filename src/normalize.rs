use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a label into its comparison form: lowercase, diacritics stripped,
/// punctuation removed, whitespace collapsed.
///
/// Separators that join words (`-`, `_`, `/`, `&`) become spaces so that a slug
/// like `"st-mirren"` and the name `"St. Mirren"` fold to the same key.
pub fn normalize_label(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    for ch in raw.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            folded.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || matches!(ch, '-' | '_' | '/' | '&') {
            folded.push(' ');
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when `needle` occurs in `haystack` as a whole run of words after both
/// are normalized.
pub fn contains_label(haystack: &str, needle: &str) -> bool {
    let needle = normalize_label(needle);
    if needle.is_empty() {
        return false;
    }
    let haystack = normalize_label(haystack);
    // Pad so the match can't start or end inside a word.
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

pub fn slugify(raw: &str) -> String {
    normalize_label(raw).replace(' ', "-")
}

pub fn is_valid_slug(raw: &str) -> bool {
    !raw.is_empty()
        && !raw.starts_with('-')
        && !raw.ends_with('-')
        && raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
