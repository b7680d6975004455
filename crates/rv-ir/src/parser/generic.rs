//! Parser for the generic op format.
//!
//! ```text
//! module {
//!   "riscv.addi"() {"rd" = !riscv.reg<a0>, "rs1" = !riscv.reg<sp>, "immediate" = 42 : i64}
//!   "riscv.ret"()
//! }
//! ```

use alloc::{string::String, vec::Vec};

use log::trace;
use nom::{
    bytes::complete::tag,
    character::complete::char,
    combinator::{cut, opt},
    error::context,
    sequence::terminated,
};

use super::{
    error::{PResult, RawError},
    primitives::{attribute_name, decimal, int_type, quoted_string},
    whitespace::blank,
};
use crate::{
    attr::{Attribute, IntegerAttr, StringAttr},
    error::DialectError,
    inst::{DirectiveOp, Instruction, LabelOp, Op},
    program::Program,
    registry::{OpKind, Registry},
};

/// Parse `module { op* }`.
pub(crate) fn parse_program_internal<'a>(
    input: &'a str,
    registry: &Registry,
) -> PResult<'a, Program> {
    let (input, _) = context("'module'", terminated(tag("module"), blank))(input)?;
    let (mut input, _) = context("'{'", terminated(char('{'), blank))(input)?;

    let mut program = Program::new();
    loop {
        if let (rest, Some(_)) = opt(char::<_, RawError<'_>>('}'))(input)? {
            input = rest;
            break;
        }
        if input.is_empty() {
            return Err(nom::Err::Failure(RawError::expected(input, "'}'")));
        }
        let (rest, op) = terminated(|i| parse_op_internal(i, registry), blank)(input)?;
        program.push(op);
        input = rest;
    }
    Ok((input, program))
}

/// Parse `"name"() {attrs}`, then build and validate the op.
pub(crate) fn parse_op_internal<'a>(input: &'a str, registry: &Registry) -> PResult<'a, Op> {
    let start = input;
    let (input, name) = context("op name", terminated(quoted_string, blank))(input)?;

    let desc = registry.op(&name).copied().ok_or_else(|| {
        nom::Err::Failure(RawError::dialect(
            start,
            DialectError::UnknownOperation { name: name.clone() },
        ))
    })?;

    let (input, _) = context("'('", terminated(char('('), blank))(input)?;
    let (input, _) = context("')'", terminated(char(')'), blank))(input)?;
    let (input, attrs) = opt(|i| parse_attr_dict(i, registry))(input)?;
    let attrs = attrs.unwrap_or_default();

    let op =
        build_op(desc.kind, attrs).map_err(|e| nom::Err::Failure(RawError::dialect(start, e)))?;
    trace!("parsed {}", op.name());
    Ok((input, op))
}

/// Parse `{"key" = attr, ...}`.
fn parse_attr_dict<'a>(
    input: &'a str,
    registry: &Registry,
) -> PResult<'a, Vec<(String, Attribute)>> {
    let (input, _) = terminated(char('{'), blank)(input)?;
    cut(|i| parse_attr_entries(i, registry))(input)
}

fn parse_attr_entries<'a>(
    mut input: &'a str,
    registry: &Registry,
) -> PResult<'a, Vec<(String, Attribute)>> {
    let mut entries = Vec::new();

    if let (rest, Some(_)) = opt(char::<_, RawError<'_>>('}'))(input)? {
        return Ok((rest, entries));
    }
    loop {
        let (rest, key) = context("attribute name", terminated(quoted_string, blank))(input)?;
        let (rest, _) = context("'='", terminated(char('='), blank))(rest)?;
        let (rest, value) = terminated(|i| parse_attribute_internal(i, registry), blank)(rest)?;
        entries.push((key, value));

        if let (rest, Some(_)) = opt(terminated(char::<_, RawError<'_>>(','), blank))(rest)? {
            input = rest;
            continue;
        }
        let (rest, _) = context("',' or '}'", char::<_, RawError<'_>>('}'))(rest)?;
        return Ok((rest, entries));
    }
}

/// Parse one attribute value: a dialect literal, an integer, or a string.
pub(crate) fn parse_attribute_internal<'a>(
    input: &'a str,
    registry: &Registry,
) -> PResult<'a, Attribute> {
    match input.chars().next() {
        Some('!') => parse_dialect_attribute(input, registry),
        Some('"') => {
            let (rest, value) = quoted_string(input)?;
            Ok((rest, Attribute::String(StringAttr::new(value))))
        }
        _ => parse_integer_attribute(input),
    }
}

/// `!name<parameter>`, dispatched through the registry.
fn parse_dialect_attribute<'a>(input: &'a str, registry: &Registry) -> PResult<'a, Attribute> {
    let (rest, _) = char::<_, RawError<'_>>('!')(input)?;
    let (rest, name) = context("attribute name", attribute_name)(rest)?;
    let desc = registry.attr(name).ok_or_else(|| {
        nom::Err::Failure(RawError::dialect(
            input,
            DialectError::UnknownAttribute { name: name.into() },
        ))
    })?;
    let (rest, _) = context("'<'", char::<_, RawError<'_>>('<'))(rest)?;
    let (rest, attr) =
        (desc.parse)(rest).map_err(|e| nom::Err::Failure(RawError::dialect(rest, e)))?;
    let (rest, _) = context("'>'", char::<_, RawError<'_>>('>'))(rest)?;
    Ok((rest, attr))
}

/// `value : iW`
fn parse_integer_attribute(input: &str) -> PResult<'_, Attribute> {
    let (rest, value) = context("attribute value", terminated(decimal, blank))(input)?;
    let (rest, _) = context("':'", terminated(char(':'), blank))(rest)?;
    let (after, width) = context("integer type", int_type)(rest)?;
    let attr = IntegerAttr::from_int_and_width(value, width)
        .map_err(|e| nom::Err::Failure(RawError::dialect(rest, e)))?;
    Ok((after, Attribute::Integer(attr)))
}

fn build_op(kind: OpKind, attrs: Vec<(String, Attribute)>) -> Result<Op, DialectError> {
    match kind {
        OpKind::Instruction(opcode) => Instruction::from_attributes(opcode, attrs).map(Op::Inst),
        OpKind::Label => LabelOp::from_attributes(attrs).map(Op::Label),
        OpKind::Directive => DirectiveOp::from_attributes(attrs).map(Op::Directive),
    }
}
