//! Shared test utilities for the workspace
//!
//! - [`LogCapture`]: records `tracing` events for one target so tests can count them
//! - [`http`]: request builders and body decoding for `tower::ServiceExt::oneshot` tests
//! - [`TestDataBuilder`]: deterministic test data derived from the test name
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{LogCapture, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let capture = LogCapture::for_target("timing");
//!     let _guard = capture.install();
//!
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!     let id = builder.user_id();
//!
//!     // ... exercise code that logs on the "timing" target ...
//!     assert_eq!(capture.len(), 1);
//! }
//! ```

pub mod http;
mod logs;

pub use logs::{CapturedEvent, LogCapture};

/// Builder for test data with deterministic randomization
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name, so each test gets stable, distinct data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// assert!(builder.user_id() >= 1);
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Positive numeric id in `1..=1_000_000`
    pub fn user_id(&self) -> i64 {
        (self.seed % 1_000_000) as i64 + 1
    }

    /// `test-<prefix>-<seed>-<suffix>`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Username satisfying `^[a-zA-Z0-9_]+$`
    pub fn username(&self, suffix: &str) -> String {
        format!("user_{}_{}", self.seed % 100_000, suffix)
    }

    pub fn email(&self, suffix: &str) -> String {
        format!("{}@example.com", self.username(suffix))
    }
}
