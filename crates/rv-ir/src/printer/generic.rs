//! Generic op format printer.
//!
//! Output is accepted by [`crate::parse_program`] and [`crate::parse_op`].

use core::fmt;

use crate::{
    inst::{Instruction, Op},
    program::Program,
};

/// Write `module { ... }` with one op per line.
pub fn write_program<W: fmt::Write + ?Sized>(out: &mut W, program: &Program) -> fmt::Result {
    out.write_str("module {\n")?;
    for op in &program.ops {
        out.write_str("  ")?;
        write_op(out, op)?;
        out.write_char('\n')?;
    }
    out.write_char('}')
}

/// Write `"name"() {attrs}`; the dictionary is omitted when empty.
pub fn write_op<W: fmt::Write + ?Sized>(out: &mut W, op: &Op) -> fmt::Result {
    write!(out, "\"{}\"()", op.name())?;
    let attrs = op.attributes();
    if attrs.is_empty() {
        return Ok(());
    }
    out.write_str(" {")?;
    for (i, (name, attr)) in attrs.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write!(out, "\"{}\" = {}", name, attr)?;
    }
    out.write_char('}')
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_op(f, self)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_op(f, &Op::Inst(self.clone()))
    }
}
