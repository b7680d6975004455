//! RISC-V dialect IR.
//!
//! This crate defines a typed, assembly-level IR for RV32I/M:
//! - Registers (`x0`..`x31` with ABI names)
//! - Attributes (registers, labels, integers, strings)
//! - Operand shapes and one constructor per mnemonic
//! - Label and directive ops
//! - A registry plus parsers and printers for the generic op format and for
//!   assembly text
//! - A label verifier
//!
//! ```
//! use rv_ir::{Instruction, Program, Register};
//!
//! let program = Program::new()
//!     .label("main")?
//!     .inst(Instruction::li(Register::A0, 0))
//!     .inst(Instruction::ret());
//! assert_eq!(program.instructions().count(), 2);
//! # Ok::<(), rv_ir::DialectError>(())
//! ```

#![no_std]

extern crate alloc;

mod attr;
mod error;
mod inst;
mod opcode;
mod parser;
mod printer;
mod program;
mod registry;
mod regs;
mod shape;
mod verifier;

pub use attr::{
    AttrKind, Attribute, DialectAttribute, ImmediateInput, IntegerAttr, LabelAttr, Offset,
    OffsetInput, RegisterAttr, StringAttr,
};
pub use error::DialectError;
pub use inst::{DirectiveOp, Instruction, LabelOp, Op};
pub use opcode::{Category, Opcode, DIALECT_PREFIX, OP_ALIASES};
pub use parser::{parse_assembly, parse_attribute, parse_op, parse_program, ParseError};
pub use printer::{
    print_assembly, write_assembly, write_op, write_program, write_statement, AsmConfig,
    RegisterStyle,
};
pub use program::Program;
pub use registry::{
    register_dialect, AttrDescriptor, OpDescriptor, OpKind, ParameterParser, Registry,
};
pub use regs::{Register, ABI_NAMES};
pub use shape::{Operands, Shape, Slot, SlotKind};
pub use verifier::{verify_labels, VerifierError, VerifyOptions};
