//! Stored name generation
//!
//! Names have the shape `<unix millis>-<random>-<original name>`.

use rand::Rng;

/// Exclusive upper bound of the random component
pub const RANDOM_SUFFIX_BOUND: u64 = 1_000_000_000_000_000;

/// Generate a collision-resistant storage name for an upload
pub fn generate_stored_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = rand::thread_rng().gen_range(0..RANDOM_SUFFIX_BOUND);
    let stored_name = stored_name_at(millis, suffix, original_name);

    tracing::debug!(original_name = %original_name, stored_name = %stored_name, "Generated stored name");

    stored_name
}

/// Build a stored name from an explicit timestamp and random suffix
pub fn stored_name_at(millis: i64, suffix: u64, original_name: &str) -> String {
    format!("{}-{}-{}", millis, suffix, base_name(original_name))
}

/// Final path component of a client-supplied name.
///
/// Browsers on Windows may send full paths, and a crafted name could
/// otherwise point outside the storage root.
fn base_name(original_name: &str) -> &str {
    original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn split(name: &str) -> (&str, &str, &str) {
        let mut parts = name.splitn(3, '-');
        (
            parts.next().unwrap(),
            parts.next().unwrap(),
            parts.next().unwrap(),
        )
    }

    #[test]
    fn test_name_shape() {
        let name = generate_stored_name("a.txt");
        let (millis, suffix, original) = split(&name);

        assert!(!millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()));
        assert!(!suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(original, "a.txt");
    }

    #[test]
    fn test_stored_name_at() {
        assert_eq!(stored_name_at(1700000000000, 42, "a.txt"), "1700000000000-42-a.txt");
        assert_eq!(stored_name_at(1, 2, ""), "1-2-");
        assert_eq!(stored_name_at(1, 2, "with-dashes.tar.gz"), "1-2-with-dashes.tar.gz");
    }

    #[test]
    fn test_strips_directories() {
        assert_eq!(stored_name_at(1, 2, "../../etc/passwd"), "1-2-passwd");
        assert_eq!(stored_name_at(1, 2, "C:\\Users\\me\\photo.jpg"), "1-2-photo.jpg");
        assert_eq!(stored_name_at(1, 2, "dir/"), "1-2-");
        assert_eq!(stored_name_at(1, 2, ".."), "1-2-..");
    }

    #[test]
    fn test_unique_within_one_millisecond() {
        let mut rng = rand::thread_rng();
        let millis = chrono::Utc::now().timestamp_millis();

        let names: HashSet<String> = (0..10_000)
            .map(|_| stored_name_at(millis, rng.gen_range(0..RANDOM_SUFFIX_BOUND), "a.txt"))
            .collect();

        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn test_rapid_generation_is_unique() {
        let first = generate_stored_name("same.bin");
        let second = generate_stored_name("same.bin");
        assert_ne!(first, second);
    }
}
