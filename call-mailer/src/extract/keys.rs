//! Separator- and case-insensitive key lookup.

/// Lowercase `key` and drop every underscore and space.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find the first entry whose key normalises to the same form as `target`.
///
/// Works over any ordered key/value iteration; the mapping is only borrowed.
pub fn find_key<'a, K, V, I>(entries: I, target: &str) -> Option<(&'a str, &'a V)>
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: AsRef<str> + ?Sized + 'a,
    V: 'a,
{
    let wanted = normalize_key(target);
    entries
        .into_iter()
        .map(|(key, value)| (key.as_ref(), value))
        .find(|(key, _)| normalize_key(key) == wanted)
}
