//! The `cat` subtest - roundtrip parse/print tests

use crate::parser::{normalize_ir, parse_test_file};
use rv_ir::{parse_program, Registry};

/// Run tests from cat test files
#[allow(dead_code)]
pub fn run_tests_from_file(content: &str) {
    let test_cases = parse_test_file(content);

    assert!(!test_cases.is_empty(), "No test cases found in test file");

    let registry = Registry::riscv().expect("registry");
    for case in test_cases {
        assert_eq!(
            case.command, "test cat",
            "Unexpected test command: {}",
            case.command
        );
        run_cat_test(&registry, &case.program_text, &case.expected_text);
    }
}

/// Run a single cat test (roundtrip parse/print)
#[allow(dead_code)]
fn run_cat_test(registry: &Registry, program_text: &str, expected_text: &str) {
    let program = parse_program(program_text.trim(), registry).unwrap_or_else(|e| {
        panic!(
            "Failed to parse program: {}\n\nProgram text:\n{}",
            e, program_text
        )
    });

    let actual = format!("{}", program);
    let actual_normalized = normalize_ir(&actual);
    let expected_normalized = normalize_ir(expected_text);

    if actual_normalized != expected_normalized {
        panic!(
            "Cat test failed!\n\nExpected:\n{}\n\nActual:\n{}\n\nOriginal program:\n{}",
            expected_text, actual, program_text
        );
    }

    // The printed form must parse back to the same program.
    let reparsed = parse_program(&actual, registry)
        .unwrap_or_else(|e| panic!("Failed to re-parse printed program: {}\n\n{}", e, actual));
    assert_eq!(reparsed, program, "Printed program does not round-trip:\n{}", actual);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cat_basic() {
        let content = include_str!("../filetests/cat/basic.rvir");
        run_tests_from_file(content);
    }

    #[test]
    fn test_cat_aliases() {
        let content = include_str!("../filetests/cat/aliases.rvir");
        run_tests_from_file(content);
    }
}
