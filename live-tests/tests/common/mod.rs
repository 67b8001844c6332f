//! Common test utilities for live platform tests.

use live_tests::LiveContext;

pub fn setup() -> LiveContext {
    LiveContext::new().expect("Failed to create live test context")
}

pub fn should_skip() -> bool {
    live_tests::should_skip()
}

/// Macro to skip live tests when no account is configured.
#[macro_export]
macro_rules! skip_if_no_account {
    () => {
        if common::should_skip() {
            eprintln!("Skipping live test (ONEP_TEST_CIK is not set)");
            return;
        }
    };
}
