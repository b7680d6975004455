//! Label verifier.

use alloc::{collections::BTreeMap, format, string::String, vec::Vec};
use core::fmt;

use log::warn;

use crate::{inst::Op, program::Program};

/// Verifier error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierError {
    /// Error message describing what's wrong
    pub message: String,
    /// Optional location information (e.g., "op3")
    pub location: Option<String>,
}

impl VerifierError {
    pub fn new(message: String) -> Self {
        Self {
            message,
            location: None,
        }
    }

    pub fn with_location(message: String, location: String) -> Self {
        Self {
            message,
            location: Some(location),
        }
    }
}

impl fmt::Display for VerifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl core::error::Error for VerifierError {}

/// Verifier options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerifyOptions {
    /// Accept label offsets with no matching label op, e.g. calls into
    /// another object file.
    pub allow_external: bool,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_external_labels(mut self, allow: bool) -> Self {
        self.allow_external = allow;
        self
    }
}

/// Check that label ops are unique and that label offsets resolve.
///
/// Returns every problem found, in program order.
pub fn verify_labels(program: &Program, options: VerifyOptions) -> Result<(), Vec<VerifierError>> {
    let mut errors = Vec::new();
    let mut defined: BTreeMap<&str, usize> = BTreeMap::new();

    for (index, op) in program.ops.iter().enumerate() {
        if let Op::Label(label) = op {
            let name = label.label.name();
            if let Some(first) = defined.get(name) {
                errors.push(VerifierError::with_location(
                    format!("Label '{}' is already defined at op{}", name, first),
                    format!("op{}", index),
                ));
            } else {
                defined.insert(name, index);
            }
        }
    }

    if !options.allow_external {
        for (index, op) in program.ops.iter().enumerate() {
            let Op::Inst(inst) = op else { continue };
            let Some(label) = inst.operands().offset().and_then(|o| o.as_label()) else {
                continue;
            };
            if !defined.contains_key(label.name()) {
                errors.push(VerifierError::with_location(
                    format!("'{}' refers to undefined label '{}'", inst.name(), label.name()),
                    format!("op{}", index),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for error in &errors {
            warn!("{}", error);
        }
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::{inst::Instruction, regs::Register};

    fn looped() -> Program {
        Program::new()
            .label("loop")
            .unwrap()
            .inst(Instruction::addi(Register::A0, Register::A0, -1))
            .inst(Instruction::bnez(Register::A0, "loop").unwrap())
            .inst(Instruction::ret())
    }

    #[test]
    fn test_valid_program() {
        assert_eq!(verify_labels(&looped(), VerifyOptions::default()), Ok(()));
    }

    #[test]
    fn test_integer_offsets_are_not_checked() {
        let program = Program::new().inst(Instruction::jal(Register::ZERO, 64).unwrap());
        assert!(verify_labels(&program, VerifyOptions::new()).is_ok());
    }

    #[test]
    fn test_undefined_label() {
        let program = looped().inst(Instruction::jal(Register::ZERO, "exit").unwrap());
        let errors = verify_labels(&program, VerifyOptions::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location.as_deref(), Some("op4"));
        assert!(errors[0].message.contains("undefined label 'exit'"));
    }

    #[test]
    fn test_external_labels_allowed() {
        let program = Program::new().inst(Instruction::jal(Register::RA, "printf").unwrap());
        let options = VerifyOptions::new().with_external_labels(true);
        assert!(verify_labels(&program, options).is_ok());
        assert!(verify_labels(&program, VerifyOptions::new()).is_err());
    }

    #[test]
    fn test_duplicate_label() {
        let program = looped().label("loop").unwrap();
        let errors = verify_labels(&program, VerifyOptions::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "op4: Label 'loop' is already defined at op0"
        );
    }
}
