//! End-to-end integration tests
//!
//! These tests replay predefined command scripts through the complete
//! pipeline. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Applies every command to a fresh bank with a fixed clock
//! 3. Generates the account report CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Savings interest and the strict savings withdrawal rule
//! - The current account minimum balance
//! - PIN lockout and administrative unblocking
//! - Transfers, including rejected ones
//! - Deletion, closure and account number allocation
//! - Sorting of the report order
//! - Malformed script lines

#[cfg(test)]
mod tests {
    use bank_ledger::core::FixedClock;
    use bank_ledger::runner::run_script;
    use bank_ledger::{BankConfig, BankError};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use std::fs;
    use std::path::Path;

    fn fixed_clock() -> Box<FixedClock> {
        Box::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        ))
    }

    /// Run a test fixture by replaying input.csv and comparing with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Input or expected files cannot be read
    /// - Output doesn't match expected
    fn run_test_fixture(fixture_name: &str) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let mut output = Vec::new();
        run_script(
            Path::new(&input_path),
            &mut output,
            BankConfig::default(),
            fixed_clock(),
        )
        .unwrap_or_else(|e| panic!("Failed to replay script: {}", e));

        let actual_output = String::from_utf8(output).expect("Report is not UTF-8");
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {}\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("savings_interest")]
    #[case("current_minimum_balance")]
    #[case("pin_lockout")]
    #[case("unblock_after_lockout")]
    #[case("transfer")]
    #[case("delete_and_close")]
    #[case("sort_by_balance")]
    #[case("sort_by_name")]
    #[case("admin_maintenance")]
    #[case("malformed_lines")]
    fn test_fixtures(#[case] fixture: &str) {
        run_test_fixture(fixture);
    }

    #[test]
    fn test_missing_script_is_fatal() {
        let mut output = Vec::new();
        let result = run_script(
            Path::new("tests/fixtures/does_not_exist.csv"),
            &mut output,
            BankConfig::default(),
            fixed_clock(),
        );

        assert!(matches!(result, Err(BankError::FileNotFound { .. })));
        assert!(output.is_empty());
    }
}
