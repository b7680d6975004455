//! The `verifier` subtest - label verifier error detection tests

use crate::parser::parse_test_file;
use rv_ir::{parse_program, verify_labels, Registry, VerifierError, VerifyOptions};
use std::collections::BTreeMap;

/// Run tests from verifier test files
#[allow(dead_code)]
pub fn run_tests_from_file(content: &str) {
    let test_cases = parse_test_file(content);

    assert!(!test_cases.is_empty(), "No test cases found in test file");

    let registry = Registry::riscv().expect("registry");
    for case in test_cases {
        let options = match case.command.as_str() {
            "test verifier" => VerifyOptions::new(),
            "test verifier external" => VerifyOptions::new().with_external_labels(true),
            other => panic!("Unexpected test command: {}", other),
        };
        run_verifier_test(&registry, &case.program_text, options);
    }
}

/// Extract error annotations from program text
/// Returns a map from line number to expected error message
#[allow(dead_code)]
fn extract_error_annotations(program_text: &str) -> BTreeMap<usize, String> {
    let mut errors = BTreeMap::new();

    for (line_idx, line) in program_text.lines().enumerate() {
        if let Some(error_start) = line.find("// error:") {
            let error_msg = String::from(line[error_start + 9..].trim());
            errors.insert(line_idx, error_msg);
        }
    }

    errors
}

fn list_errors(errors: &[VerifierError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run a single verifier test
#[allow(dead_code)]
fn run_verifier_test(registry: &Registry, program_text: &str, options: VerifyOptions) {
    let program = parse_program(program_text.trim(), registry).unwrap_or_else(|e| {
        panic!(
            "Failed to parse program: {}\n\nProgram text:\n{}",
            e, program_text
        )
    });

    let expected_errors = extract_error_annotations(program_text);
    let result = verify_labels(&program, options);

    if expected_errors.is_empty() {
        if let Err(errors) = result {
            panic!(
                "Verifier test failed: expected valid program but got errors:\n{}\n\nProgram:\n{}",
                list_errors(&errors),
                program_text
            );
        }
        return;
    }

    let actual_errors = match result {
        Ok(()) => panic!(
            "Verifier test failed: expected errors but program is valid\n\nProgram:\n{}",
            program_text
        ),
        Err(errors) => errors,
    };

    if actual_errors.len() != expected_errors.len() {
        panic!(
            "Verifier test failed: expected {} errors but got {}\n\n\
             Actual errors:\n{}\n\nProgram:\n{}",
            expected_errors.len(),
            actual_errors.len(),
            list_errors(&actual_errors),
            program_text
        );
    }

    // Substring match
    for expected_msg in expected_errors.values() {
        let found = actual_errors
            .iter()
            .any(|e| e.message.contains(expected_msg.as_str()));
        if !found {
            panic!(
                "Verifier test failed: expected error message '{}' not found\n\n\
                 Actual errors:\n{}\n\nProgram:\n{}",
                expected_msg,
                list_errors(&actual_errors),
                program_text
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_annotations() {
        let text = "module {\n  \"riscv.ret\"() // error: nope\n}";
        let errors = extract_error_annotations(text);
        assert_eq!(errors.get(&1).map(String::as_str), Some("nope"));
    }

    #[test]
    fn test_verifier_labels() {
        let content = include_str!("../filetests/verifier/labels.rvir");
        run_tests_from_file(content);
    }

    #[test]
    fn test_verifier_external() {
        let content = include_str!("../filetests/verifier/external.rvir");
        run_tests_from_file(content);
    }
}
