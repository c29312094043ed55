/// Species names indexed by the class the model emits.
pub const SPECIES: [&str; 3] = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];

/// Name returned for class indices outside of `SPECIES`.
pub const UNKNOWN_SPECIES: &str = "Unknown";

/// Maps a class index to its species name.
///
/// Indices the table doesn't cover resolve to `UNKNOWN_SPECIES` instead of failing.
pub fn resolve(class: i64) -> &'static str {
    usize::try_from(class)
        .ok()
        .and_then(|idx| SPECIES.get(idx))
        .copied()
        .unwrap_or(UNKNOWN_SPECIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_classes() {
        assert_eq!(resolve(0), "Iris-setosa");
        assert_eq!(resolve(1), "Iris-versicolor");
        assert_eq!(resolve(2), "Iris-virginica");
    }

    #[test]
    fn out_of_range_is_unknown() {
        for class in [-1, 3, 42, i64::MIN, i64::MAX] {
            assert_eq!(resolve(class), UNKNOWN_SPECIES);
        }
    }

    #[test]
    fn resolution_is_stable() {
        for class in -2..5 {
            assert_eq!(resolve(class), resolve(class));
        }
    }
}
