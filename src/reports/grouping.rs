//! Grouping and ordering helpers shared by the reports.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Groups `items` by `key`, preserving input order within each group.
///
/// # Example
///
/// ```
/// use duty_engine::reports::group_by;
///
/// let groups = group_by(vec![("b", 1), ("a", 2), ("b", 3)], |(k, _)| *k);
/// assert_eq!(groups["b"], vec![("b", 1), ("b", 3)]);
/// assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Orders callsigns case-insensitively, falling back to an exact comparison
/// so the order is total.
pub fn compare_callsigns(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_keeps_input_order() {
        let groups = group_by(vec![3, 1, 4, 1, 5, 9, 2, 6], |n| n % 2);
        assert_eq!(groups[&0], vec![4, 2, 6]);
        assert_eq!(groups[&1], vec![3, 1, 1, 5, 9]);
    }

    #[test]
    fn test_group_by_empty() {
        let groups = group_by(Vec::<i32>::new(), |n| *n);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_callsigns_sort_case_insensitively() {
        let mut callsigns = vec!["zeke", "Alpha", "bravo", "alpha"];
        callsigns.sort_by(|a, b| compare_callsigns(a, b));
        assert_eq!(callsigns, vec!["Alpha", "alpha", "bravo", "zeke"]);
    }
}
