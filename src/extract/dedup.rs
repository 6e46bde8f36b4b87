use std::collections::HashSet;
use std::hash::Hash;

/// Removes duplicates, keeping the first occurrence of each string
///
/// Stable: survivors keep their relative order. Equality is exact string
/// equality.
///
/// # Examples
///
/// ```
/// use doc_harvest::dedup;
///
/// let items = vec!["a", "b", "a", "c"].into_iter().map(String::from);
/// assert_eq!(dedup(items), vec!["a", "b", "c"]);
/// ```
pub fn dedup<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    dedup_by_key(items, |item| item.clone())
}

/// Removes items whose key was already seen, keeping the first occurrence
pub fn dedup_by_key<T, K, I, F>(items: I, mut key: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}
