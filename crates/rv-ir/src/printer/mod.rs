//! Printers for the generic op format and for assembly text.

pub mod asm;
pub mod generic;

pub use asm::{print_assembly, write_assembly, write_statement, AsmConfig, RegisterStyle};
pub use generic::{write_op, write_program};
