//! Unique identities so tests sharing a store never collide.

use uuid::Uuid;

/// `{prefix}-{uuid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("player");
/// assert!(a.starts_with("player-"));
/// assert_ne!(a, unique_str("player"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// A batch of `n` unique ids sharing a prefix.
pub fn unique_ids(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|_| unique_str(prefix)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let ids = unique_ids("p", 4);
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
