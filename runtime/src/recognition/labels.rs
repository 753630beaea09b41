//! Class index to fingerspelling label table.

/// Labels in the exact order of the class indices the model was trained on.
/// Reordering this table without retraining the model breaks every prediction.
pub const CLASS_LABELS: [&str; 45] = [
    "a", "chi", "e", "fu", "ha", "he", "hi", "ho", "i", "ka", //
    "ke", "ki", "ko", "ku", "ma", "me", "mi", "mo", "mu", "n", //
    "na", "ne", "ni", "no", "nu", "o", "ra", "re", "ri", "ro", //
    "ru", "sa", "se", "shi", "so", "su", "ta", "te", "to", "tsu", //
    "u", "wa", "ya", "yo", "yu",
];

/// Look up the label for a class index, `None` when out of range.
pub fn label(index: i64) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| CLASS_LABELS.get(i))
        .copied()
}

/// Number of known classes.
pub fn len() -> usize {
    CLASS_LABELS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_index_maps_verbatim() {
        for (i, expected) in CLASS_LABELS.iter().enumerate() {
            assert_eq!(label(i as i64), Some(*expected));
        }
        assert_eq!(label(0), Some("a"));
        assert_eq!(label(39), Some("tsu"));
        assert_eq!(label(44), Some("yu"));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(label(-1), None);
        assert_eq!(label(45), None);
        assert_eq!(label(i64::MAX), None);
    }

    #[test]
    fn test_labels_unique() {
        let mut sorted = CLASS_LABELS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), len());
    }
}
