//! Parser for RISC-V assembly text.
//!
//! One statement per line: `label:`, `.directive value`, or
//! `mnemonic op, op, ...`. `#` starts a comment. Loads and stores accept both
//! the memory form `lw a0, 8(sp)` and the plain form `lw a0, sp, 8`.

use alloc::{format, vec, vec::Vec};

use log::trace;
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt},
    error::context,
    sequence::{delimited, preceded},
};

use super::{
    error::{PResult, RawError},
    primitives::{identifier, integer, register_name},
    whitespace::{inline, strip_hash_comment},
};
use crate::{
    attr::{Attribute, IntegerAttr, LabelAttr},
    error::DialectError,
    inst::{DirectiveOp, Instruction, LabelOp, Op},
    opcode::{Opcode, DIALECT_PREFIX},
    program::Program,
    registry::{OpKind, Registry},
    regs::Register,
    shape::{Shape, SlotKind},
};

type Operands = Vec<(&'static str, Attribute)>;

/// Parse a whole assembly listing.
pub(crate) fn parse_assembly_internal<'a>(
    source: &'a str,
    registry: &Registry,
) -> Result<Program, nom::Err<RawError<'a>>> {
    let mut program = Program::new();
    for line in source.lines() {
        let code = strip_hash_comment(line).trim();
        if code.is_empty() {
            continue;
        }
        let (rest, op) = parse_statement(code, registry)?;
        let (rest, _) = inline(rest)?;
        if !rest.is_empty() {
            return Err(nom::Err::Failure(RawError::expected(rest, "end of line")));
        }
        trace!("parsed {}", op.name());
        program.push(op);
    }
    Ok(program)
}

/// Parse one statement with comments and surrounding space already removed.
pub(crate) fn parse_statement<'a>(input: &'a str, registry: &Registry) -> PResult<'a, Op> {
    if let Ok((rest, name)) = label_definition(input) {
        require_op(registry, LabelOp::NAME, input)?;
        let label = LabelOp::new(name).map_err(|e| dialect_failure(input, e))?;
        return Ok((rest, Op::Label(label)));
    }
    if let Some(body) = input.strip_prefix('.') {
        require_op(registry, DirectiveOp::NAME, input)?;
        let (value, name) = context("directive name", identifier)(body)?;
        let (value, _) = inline(value)?;
        let value = value.trim_end();
        let directive = DirectiveOp::new(name, value).map_err(|e| dialect_failure(input, e))?;
        return Ok((&value[value.len()..], Op::Directive(directive)));
    }
    let (rest, inst) = parse_instruction(input, registry)?;
    Ok((rest, Op::Inst(inst)))
}

fn label_definition(input: &str) -> PResult<'_, &str> {
    let (rest, name) = identifier(input)?;
    let (rest, _) = preceded(inline, char(':'))(rest)?;
    Ok((rest, name))
}

fn dialect_failure(at: &str, err: DialectError) -> nom::Err<RawError<'_>> {
    nom::Err::Failure(RawError::dialect(at, err))
}

fn require_op<'a>(
    registry: &Registry,
    name: &str,
    at: &'a str,
) -> Result<(), nom::Err<RawError<'a>>> {
    match registry.op(name) {
        Some(_) => Ok(()),
        None => Err(dialect_failure(
            at,
            DialectError::UnknownOperation { name: name.into() },
        )),
    }
}

fn parse_instruction<'a>(input: &'a str, registry: &Registry) -> PResult<'a, Instruction> {
    let (rest, mnemonic) = context("mnemonic", identifier)(input)?;
    let name = format!("{}{}", DIALECT_PREFIX, mnemonic);
    let opcode = match registry.op(&name).map(|desc| desc.kind) {
        Some(OpKind::Instruction(opcode)) => opcode,
        _ => return Err(dialect_failure(input, DialectError::UnknownOperation { name })),
    };
    let (rest, _) = inline(rest)?;

    let (rest, operands) = if opcode.is_memory() {
        alt((
            |i| memory_operands(i, opcode),
            |i| plain_operands(i, opcode.shape()),
        ))(rest)?
    } else {
        plain_operands(rest, opcode.shape())?
    };

    let inst =
        Instruction::from_attributes(opcode, operands).map_err(|e| dialect_failure(input, e))?;
    Ok((rest, inst))
}

fn comma(input: &str) -> PResult<'_, ()> {
    let (rest, _) = context("','", delimited(inline, char(','), inline))(input)?;
    Ok((rest, ()))
}

fn register(input: &str) -> PResult<'_, Attribute> {
    let (rest, name) = context("a register", register_name)(input)?;
    let register = Register::from_name(name).map_err(|e| dialect_failure(input, e))?;
    Ok((rest, Attribute::from(register)))
}

fn immediate(input: &str) -> PResult<'_, Attribute> {
    context("an integer", map(integer, |v| Attribute::from(IntegerAttr::i64(v))))(input)
}

fn offset(input: &str) -> PResult<'_, Attribute> {
    context(
        "an integer or a label",
        alt((
            map(integer, |v| Attribute::from(IntegerAttr::i64(v))),
            label_offset,
        )),
    )(input)
}

fn label_offset(input: &str) -> PResult<'_, Attribute> {
    let (rest, name) = identifier(input)?;
    let label = LabelAttr::new(name).map_err(|e| dialect_failure(input, e))?;
    Ok((rest, Attribute::from(label)))
}

/// Operands in slot order, comma separated.
fn plain_operands(input: &str, shape: Shape) -> PResult<'_, Operands> {
    let mut rest = input;
    let mut operands = Vec::with_capacity(shape.arity());
    for (i, slot) in shape.slots().iter().enumerate() {
        if i > 0 {
            rest = comma(rest)?.0;
        }
        let (after, attr) = match slot.kind {
            SlotKind::Register => register(rest)?,
            SlotKind::Immediate => immediate(rest)?,
            SlotKind::Offset => offset(rest)?,
        };
        operands.push((slot.name, attr));
        rest = after;
    }
    Ok((rest, operands))
}

/// `rd, imm(rs1)` for loads, `rs2, imm(rs1)` for stores. A missing
/// displacement means zero.
fn memory_operands(input: &str, opcode: Opcode) -> PResult<'_, Operands> {
    let value_slot = match opcode.shape() {
        Shape::Rs1Rs2Imm => "rs2",
        _ => "rd",
    };
    let (rest, value) = register(input)?;
    let (rest, _) = comma(rest)?;
    let (rest, displacement) = opt(integer)(rest)?;
    let (rest, _) = preceded(inline, char('('))(rest)?;
    let (rest, base) = preceded(inline, register)(rest)?;
    let (rest, _) = context("')'", preceded(inline, char(')')))(rest)?;
    Ok((
        rest,
        vec![
            (value_slot, value),
            ("rs1", base),
            (
                "immediate",
                Attribute::from(IntegerAttr::i64(displacement.unwrap_or(0))),
            ),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::error::RawErrorKind;

    fn parse(source: &str) -> Program {
        let registry = Registry::riscv().unwrap();
        parse_assembly_internal(source, &registry).unwrap()
    }

    fn parse_one(line: &str) -> Op {
        let registry = Registry::riscv().unwrap();
        let (rest, op) = parse_statement(line, &registry).unwrap();
        assert_eq!(rest, "");
        op
    }

    #[test]
    fn test_parse_instructions() {
        assert_eq!(
            parse_one("addi a0, sp, -16"),
            Op::Inst(Instruction::addi(Register::A0, Register::SP, -16))
        );
        assert_eq!(
            parse_one("add x10,x11,x12"),
            Op::Inst(Instruction::add(Register::A0, Register::A1, Register::A2))
        );
        assert_eq!(parse_one("ret"), Op::Inst(Instruction::ret()));
        assert_eq!(
            parse_one("li t0, 0x100"),
            Op::Inst(Instruction::li(Register::T0, 256))
        );
    }

    #[test]
    fn test_sltui_is_read_as_sltiu() {
        let sltiu = Op::Inst(Instruction::sltiu(Register::A0, Register::A1, 5));
        assert_eq!(parse_one("sltui a0, a1, 5"), sltiu);
        let printed = crate::print_assembly(&parse("sltui a0, a1, 5"), &Default::default());
        assert_eq!(printed, "\tsltiu a0, a1, 5\n");
    }

    #[test]
    fn test_parse_label_and_directive() {
        let label = |name| Op::Label(LabelOp::new(name).unwrap());
        let directive = |name, value| Op::Directive(DirectiveOp::new(name, value).unwrap());
        assert_eq!(parse_one("main:"), label("main"));
        assert_eq!(parse_one(".L1:"), label(".L1"));
        assert_eq!(parse_one(".globl main"), directive("globl", "main"));
        assert_eq!(parse_one(".text"), directive("text", ""));
        assert_eq!(
            parse_one(".section .rodata, \"a\""),
            directive("section", ".rodata, \"a\"")
        );
        assert_eq!(
            parse(".ascii \"a # b\" # trailing comment").ops,
            [directive("ascii", "\"a # b\"")]
        );
    }

    #[test]
    fn test_parse_memory_forms() {
        let load = Instruction::lw(Register::A0, Register::SP, 8);
        assert_eq!(parse_one("lw a0, 8(sp)"), Op::Inst(load.clone()));
        assert_eq!(parse_one("lw a0, sp, 8"), Op::Inst(load));

        let store = Instruction::sw(Register::SP, Register::RA, 12);
        assert_eq!(parse_one("sw ra, 12(sp)"), Op::Inst(store.clone()));
        assert_eq!(parse_one("sw sp, ra, 12"), Op::Inst(store));

        assert_eq!(
            parse_one("lbu t1, (a0)"),
            Op::Inst(Instruction::lbu(Register::T1, Register::A0, 0))
        );
    }

    #[test]
    fn test_parse_offsets() {
        assert_eq!(
            parse_one("beq a0, zero, done"),
            Op::Inst(Instruction::beq(Register::A0, Register::ZERO, "done").unwrap())
        );
        assert_eq!(
            parse_one("jal ra, -8"),
            Op::Inst(Instruction::jal(Register::RA, -8).unwrap())
        );
    }

    #[test]
    fn test_parse_listing_with_comments() {
        let program = parse(
            "# entry point\n.globl main\nmain:\n    li a0, 0   # exit code\n\n    ret\n",
        );
        assert_eq!(program.len(), 4);
        assert_eq!(program.instructions().count(), 2);
    }

    #[test]
    fn test_unknown_mnemonic() {
        let registry = Registry::riscv().unwrap();
        let err = parse_assembly_internal("    frobnicate a0", &registry).unwrap_err();
        let nom::Err::Failure(raw) = err else {
            panic!("expected failure")
        };
        assert_eq!(
            raw.kind,
            RawErrorKind::Dialect(DialectError::UnknownOperation {
                name: "riscv.frobnicate".into()
            })
        );
    }

    #[test]
    fn test_operand_errors() {
        let registry = Registry::riscv().unwrap();
        assert!(parse_assembly_internal("add a0, a1", &registry).is_err());
        assert!(parse_assembly_internal("add a0, a1, 3", &registry).is_err());
        assert!(parse_assembly_internal("ret a0", &registry).is_err());
        assert!(parse_assembly_internal("mv a0, x40", &registry).is_err());
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = Registry::new();
        assert!(parse_assembly_internal("main:", &registry).is_err());
        assert!(parse_assembly_internal("ret", &registry).is_err());
        assert_eq!(parse_assembly_internal("# nothing", &registry), Ok(Program::new()));
    }
}
