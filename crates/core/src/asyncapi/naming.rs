//! Type name canonicalization.

/// Characters that separate words in channel titles and discriminators.
const SEPARATORS: [char; 6] = ['_', '-', ':', '.', ' ', '/'];

/// Suffix appended to a channel title to form its namespace name.
pub const CHANNEL_SUFFIX: &str = "Channel";

/// Convert `raw` to PascalCase: split on separators, drop them, and
/// uppercase the first letter of every word.
///
/// Letters inside a word keep their case, so `fooBar_baz` becomes `FooBarBaz`
/// and the function is idempotent.
pub fn canonicalize(raw: &str) -> String {
    raw.split(SEPARATORS)
        .filter(|word| !word.is_empty())
        .map(capitalize_first)
        .collect()
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Namespace name for a channel title: `user_events` -> `UserEventsChannel`.
pub fn channel_namespace(title: &str) -> String {
    canonicalize(&format!("{title}{CHANNEL_SUFFIX}"))
}
