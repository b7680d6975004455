//! Assembly printer.

use alloc::string::String;
use core::fmt;

use crate::{
    attr::RegisterAttr,
    inst::{Instruction, Op},
    program::Program,
    shape::Operands,
};

/// How registers are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterStyle {
    /// `a0`, `sp`, `s0`
    #[default]
    Abi,
    /// `x10`, `x2`, `x8`
    Numeric,
}

/// Assembly printer options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmConfig {
    /// Prefix for instruction lines. Labels and directives are not indented.
    pub indent: String,
    pub register_style: RegisterStyle,
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            indent: String::from("\t"),
            register_style: RegisterStyle::Abi,
        }
    }
}

impl AsmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_register_style(mut self, style: RegisterStyle) -> Self {
        self.register_style = style;
        self
    }
}

/// Print a program as assembly, one statement per line.
pub fn print_assembly(program: &Program, config: &AsmConfig) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_assembly(&mut out, program, config);
    out
}

pub fn write_assembly<W: fmt::Write + ?Sized>(
    out: &mut W,
    program: &Program,
    config: &AsmConfig,
) -> fmt::Result {
    for op in &program.ops {
        write_statement(out, op, config)?;
        out.write_char('\n')?;
    }
    Ok(())
}

/// Write one op without a trailing newline.
pub fn write_statement<W: fmt::Write + ?Sized>(
    out: &mut W,
    op: &Op,
    config: &AsmConfig,
) -> fmt::Result {
    match op {
        Op::Label(label) => write!(out, "{}:", label.label.name()),
        Op::Directive(directive) => {
            write!(out, ".{}", directive.directive.value())?;
            if !directive.value.value().is_empty() {
                write!(out, " {}", directive.value.value())?;
            }
            Ok(())
        }
        Op::Inst(inst) => {
            out.write_str(&config.indent)?;
            write_instruction(out, inst, config.register_style)
        }
    }
}

fn write_instruction<W: fmt::Write + ?Sized>(
    out: &mut W,
    inst: &Instruction,
    style: RegisterStyle,
) -> fmt::Result {
    out.write_str(inst.opcode().mnemonic())?;
    let reg = |r: &RegisterAttr| Reg(*r, style);

    match inst.operands() {
        // Loads and stores use `offset(base)`.
        Operands::RdRs1Imm { rd, rs1, immediate } if inst.opcode().is_memory() => {
            write!(out, " {}, {}({})", reg(rd), immediate.value(), reg(rs1))
        }
        Operands::Rs1Rs2Imm {
            rs1,
            rs2,
            immediate,
        } => write!(out, " {}, {}({})", reg(rs2), immediate.value(), reg(rs1)),
        Operands::RdRs1Imm { rd, rs1, immediate } => {
            write!(out, " {}, {}, {}", reg(rd), reg(rs1), immediate.value())
        }
        Operands::RdRs1Off { rd, rs1, offset } => {
            write!(out, " {}, {}, {}", reg(rd), reg(rs1), offset)
        }
        Operands::Rs1Rs2Off { rs1, rs2, offset } => {
            write!(out, " {}, {}, {}", reg(rs1), reg(rs2), offset)
        }
        Operands::RdRs1Rs2 { rd, rs1, rs2 } => {
            write!(out, " {}, {}, {}", reg(rd), reg(rs1), reg(rs2))
        }
        Operands::RsRtOff { rs, rt, offset } => {
            write!(out, " {}, {}, {}", reg(rs), reg(rt), offset)
        }
        Operands::RdImm { rd, immediate } => write!(out, " {}, {}", reg(rd), immediate.value()),
        Operands::RdOff { rd, offset } => write!(out, " {}, {}", reg(rd), offset),
        Operands::RsOff { rs, offset } => write!(out, " {}, {}", reg(rs), offset),
        Operands::RdRs { rd, rs } => write!(out, " {}, {}", reg(rd), reg(rs)),
        Operands::NoOperands => Ok(()),
    }
}

/// A register spelled in a given style.
struct Reg(RegisterAttr, RegisterStyle);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let register = self.0.register();
        match self.1 {
            RegisterStyle::Abi => f.write_str(register.abi_name()),
            RegisterStyle::Numeric => write!(f, "x{}", register.index()),
        }
    }
}
