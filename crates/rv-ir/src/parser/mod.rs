//! Parsers for the generic op format and for assembly text.
//!
//! Every entry point takes the [`Registry`] that defines which attributes and
//! ops are known.

mod asm;
mod error;
mod generic;
mod primitives;
mod whitespace;

pub(crate) use whitespace::strip_hash_comment;

pub use error::ParseError;

use error::{from_nom, RawError};

use crate::{attr::Attribute, inst::Op, program::Program, registry::Registry};

/// Fail unless only whitespace and comments follow.
fn expect_end<'a>(source: &'a str, rest: &'a str) -> Result<(), ParseError> {
    match whitespace::blank(rest) {
        Ok(("", _)) => Ok(()),
        Ok((remaining, _)) => {
            Err(RawError::expected(remaining, "end of input").into_parse_error(source))
        }
        Err(e) => Err(from_nom(source, e)),
    }
}

fn leading_blank(input: &str) -> &str {
    match whitespace::blank(input) {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

/// Parse a complete program in the generic format (`module { ... }`).
pub fn parse_program(input: &str, registry: &Registry) -> Result<Program, ParseError> {
    let body = leading_blank(input);
    let (rest, program) =
        generic::parse_program_internal(body, registry).map_err(|e| from_nom(input, e))?;
    expect_end(input, rest)?;
    Ok(program)
}

/// Parse a single op in the generic format.
pub fn parse_op(input: &str, registry: &Registry) -> Result<Op, ParseError> {
    let body = leading_blank(input);
    let (rest, op) = generic::parse_op_internal(body, registry).map_err(|e| from_nom(input, e))?;
    expect_end(input, rest)?;
    Ok(op)
}

/// Parse a single attribute value (`!riscv.reg<a0>`, `42 : i64`, `"text"`).
pub fn parse_attribute(input: &str, registry: &Registry) -> Result<Attribute, ParseError> {
    let body = leading_blank(input);
    let (rest, attr) =
        generic::parse_attribute_internal(body, registry).map_err(|e| from_nom(input, e))?;
    expect_end(input, rest)?;
    Ok(attr)
}

/// Parse assembly text, one statement per line.
pub fn parse_assembly(input: &str, registry: &Registry) -> Result<Program, ParseError> {
    asm::parse_assembly_internal(input, registry).map_err(|e| from_nom(input, e))
}
