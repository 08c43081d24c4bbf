//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with the catalog schema migrated (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data derived from the test name
//! - `assertions`: assertion helpers with readable failure messages
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let city = builder.name("city", "main");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Deterministic test data seeded from the test name.
///
/// Names are unique per test so tests sharing a database never collide
/// on filter-by-name queries.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("city", "main"), "test-city-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// An id guaranteed not to exist in a fresh database.
    pub fn missing_id(&self) -> i64 {
        1_000_000 + (self.seed % 1_000_000) as i64
    }

    /// A score within `0..=max`, stable for the same builder and salt.
    pub fn score(&self, max: f32, salt: u64) -> f32 {
        let step = self.seed.wrapping_add(salt) % 11;
        max * step as f32 / 10.0
    }
}

pub mod assertions {
    /// Compare id lists regardless of order.
    pub fn assert_same_ids(actual: &[i64], expected: &[i64], context: &str) {
        let mut actual = actual.to_vec();
        let mut expected = expected.to_vec();
        actual.sort_unstable();
        expected.sort_unstable();
        assert_eq!(actual, expected, "{}: id sets differ", context);
    }

    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.name("city", "a"), builder2.name("city", "a"));
        assert_eq!(builder1.missing_id(), builder2.missing_id());
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.name("city", "a"), builder2.name("city", "a"));
    }

    #[test]
    fn test_score_stays_in_range() {
        let builder = TestDataBuilder::from_test_name("scores");
        for salt in 0..50 {
            let score = builder.score(5.0, salt);
            assert!((0.0..=5.0).contains(&score));
        }
    }

    #[test]
    fn test_assert_same_ids_ignores_order() {
        assertions::assert_same_ids(&[3, 1], &[1, 3], "filter");
    }
}
