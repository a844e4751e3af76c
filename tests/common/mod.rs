#![allow(dead_code)]

pub use cmdhost_test_utils::captured::CapturedContext;
pub use cmdhost_test_utils::fake_command::{Call, FakeCommand};
pub use cmdhost_test_utils::init_tracing;

/// Owned argument list from string literals.
pub fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
