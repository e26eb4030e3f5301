// Shared proptest configuration for domain property tests.

use proptest::test_runner::Config;

/// Case count honours `PROPTEST_CASES`, defaulting to a quick run.
pub fn proptest_config() -> Config {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(64);
    Config {
        cases,
        ..Config::default()
    }
}
