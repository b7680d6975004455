//! The `asm` subtest - print a program as assembly and filecheck the listing

use crate::filecheck::match_listing;
use crate::parser::parse_test_file;
use rv_ir::{parse_assembly, parse_program, print_assembly, AsmConfig, Registry};

/// Run tests from asm test files
#[allow(dead_code)]
pub fn run_tests_from_file(content: &str) {
    let test_cases = parse_test_file(content);

    assert!(!test_cases.is_empty(), "No test cases found in test file");

    let registry = Registry::riscv().expect("registry");
    for case in test_cases {
        assert_eq!(
            case.command, "test asm",
            "Unexpected test command: {}",
            case.command
        );
        run_asm_test(&registry, &case.program_text, &case.expected_text);
    }
}

/// Run a single asm test
#[allow(dead_code)]
fn run_asm_test(registry: &Registry, program_text: &str, expected_text: &str) {
    let program = parse_program(program_text.trim(), registry).unwrap_or_else(|e| {
        panic!(
            "Failed to parse program: {}\n\nProgram text:\n{}",
            e, program_text
        )
    });

    let asm = print_assembly(&program, &AsmConfig::default());
    if let Err(e) = match_listing(&asm, expected_text) {
        panic!("Asm test failed!\n\n{}\n\nAssembly:\n{}", e, asm);
    }

    // Checks do not depend on the indent.
    let indented = print_assembly(&program, &AsmConfig::new().with_indent("    "));
    if let Err(e) = match_listing(&indented, expected_text) {
        panic!("Asm test failed with a space indent!\n\n{}\n\nAssembly:\n{}", e, indented);
    }

    let reparsed = parse_assembly(&asm, registry)
        .unwrap_or_else(|e| panic!("Failed to parse printed assembly: {}\n\n{}", e, asm));
    assert_eq!(
        reparsed, program,
        "Assembly does not parse back to the original program:\n{}",
        asm
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asm_arith() {
        let content = include_str!("../filetests/asm/arith.rvir");
        run_tests_from_file(content);
    }

    #[test]
    fn test_asm_memory() {
        let content = include_str!("../filetests/asm/memory.rvir");
        run_tests_from_file(content);
    }

    #[test]
    fn test_asm_control() {
        let content = include_str!("../filetests/asm/control.rvir");
        run_tests_from_file(content);
    }

    #[test]
    fn test_asm_directives() {
        let content = include_str!("../filetests/asm/directives.rvir");
        run_tests_from_file(content);
    }
}
