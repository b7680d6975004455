//! Error types for the RISC-V dialect.

use alloc::string::String;
use core::fmt;

use crate::{opcode::Opcode, shape::Shape};

/// Errors raised while constructing, parsing or registering dialect values.
///
/// Every failure originates at attribute construction or at the shape check of
/// an instruction and is returned to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialectError {
    /// Register index outside `0..=31`.
    RegisterIndexOutOfRange { index: i64 },
    /// Name is neither an ABI mnemonic nor of the form `x<N>`.
    UnknownRegisterName { name: String },
    /// An offset slot was given something other than an integer or a label.
    MalformedOffsetOrLabel { found: &'static str },
    /// Label attributes must name something.
    EmptyLabel,
    /// Label text that is not an assembly symbol (`main`, `.L1`, `_start`).
    InvalidLabel { label: String },
    /// A directive that assembly text could not carry unchanged.
    InvalidDirective {
        directive: String,
        reason: &'static str,
    },
    /// Integer attribute width outside `1..=64`.
    InvalidIntegerWidth { width: u32 },
    /// No op with this name is registered.
    UnknownOperation { name: String },
    /// No attribute with this name is registered.
    UnknownAttribute { name: String },
    /// Operands of one shape were supplied for an opcode of another.
    ShapeMismatch {
        opcode: Opcode,
        expected: Shape,
        found: Shape,
    },
    /// A slot required by the op's shape is absent.
    MissingAttribute {
        op: &'static str,
        attr: &'static str,
    },
    /// An attribute that the op's shape does not declare.
    UnexpectedAttribute { op: &'static str, attr: String },
    /// The same attribute key appears twice.
    DuplicateAttribute { op: &'static str, attr: String },
    /// A slot was filled with an attribute of the wrong kind.
    AttributeKindMismatch {
        op: &'static str,
        attr: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// A descriptor with this name is already registered.
    DuplicateRegistration { name: &'static str },
}

impl fmt::Display for DialectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialectError::RegisterIndexOutOfRange { index } => {
                write!(f, "register index {} out of range (expected 0..=31)", index)
            }
            DialectError::UnknownRegisterName { name } => {
                write!(f, "unknown register name '{}'", name)
            }
            DialectError::MalformedOffsetOrLabel { found } => {
                write!(f, "offset must be an integer or a label, found {}", found)
            }
            DialectError::EmptyLabel => write!(f, "label must not be empty"),
            DialectError::InvalidLabel { label } => {
                write!(
                    f,
                    "invalid label '{}' (expected a symbol such as 'loop' or '.L1')",
                    label
                )
            }
            DialectError::InvalidDirective { directive, reason } => {
                write!(f, "invalid directive '.{}': {}", directive, reason)
            }
            DialectError::InvalidIntegerWidth { width } => {
                write!(f, "integer width {} out of range (expected 1..=64)", width)
            }
            DialectError::UnknownOperation { name } => write!(f, "unknown operation '{}'", name),
            DialectError::UnknownAttribute { name } => write!(f, "unknown attribute '!{}'", name),
            DialectError::ShapeMismatch {
                opcode,
                expected,
                found,
            } => write!(
                f,
                "'{}' has shape {:?}, but operands of shape {:?} were given",
                opcode.name(),
                expected,
                found
            ),
            DialectError::MissingAttribute { op, attr } => {
                write!(f, "'{}' requires attribute '{}'", op, attr)
            }
            DialectError::UnexpectedAttribute { op, attr } => {
                write!(f, "'{}' has no attribute '{}'", op, attr)
            }
            DialectError::DuplicateAttribute { op, attr } => {
                write!(f, "attribute '{}' given twice for '{}'", attr, op)
            }
            DialectError::AttributeKindMismatch {
                op,
                attr,
                expected,
                found,
            } => write!(
                f,
                "attribute '{}' of '{}' must be {}, found {}",
                attr, op, expected, found
            ),
            DialectError::DuplicateRegistration { name } => {
                write!(f, "'{}' is already registered", name)
            }
        }
    }
}

impl core::error::Error for DialectError {}
