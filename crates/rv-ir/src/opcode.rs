//! The instruction catalog.

use crate::shape::Shape;

/// Invoke `$handler!` with the full mnemonic table.
///
/// Each entry is `Variant, "mnemonic", constructor, Shape, Category;`.
#[macro_export]
macro_rules! opcodes {
    ($handler:ident) => {
        $handler! {
            // Loads
            Lb, "lb", lb, RdRs1Imm, Load;
            Lbu, "lbu", lbu, RdRs1Imm, Load;
            Lh, "lh", lh, RdRs1Imm, Load;
            Lhu, "lhu", lhu, RdRs1Imm, Load;
            Lw, "lw", lw, RdRs1Imm, Load;

            // Stores
            Sb, "sb", sb, Rs1Rs2Imm, Store;
            Sh, "sh", sh, Rs1Rs2Imm, Store;
            Sw, "sw", sw, Rs1Rs2Imm, Store;

            // Branches
            Beq, "beq", beq, Rs1Rs2Off, Branch;
            Bne, "bne", bne, Rs1Rs2Off, Branch;
            Blt, "blt", blt, Rs1Rs2Off, Branch;
            Bge, "bge", bge, Rs1Rs2Off, Branch;
            Bltu, "bltu", bltu, Rs1Rs2Off, Branch;
            Bgeu, "bgeu", bgeu, Rs1Rs2Off, Branch;

            // Shifts
            Sll, "sll", sll, RdRs1Rs2, Shift;
            Slli, "slli", slli, RdRs1Imm, Shift;
            Srl, "srl", srl, RdRs1Rs2, Shift;
            Srli, "srli", srli, RdRs1Imm, Shift;
            Sra, "sra", sra, RdRs1Rs2, Shift;
            Srai, "srai", srai, RdRs1Imm, Shift;

            // Arithmetic
            Add, "add", add, RdRs1Rs2, Arithmetic;
            Addi, "addi", addi, RdRs1Imm, Arithmetic;
            Sub, "sub", sub, RdRs1Rs2, Arithmetic;
            Lui, "lui", lui, RdImm, Arithmetic;
            Auipc, "auipc", auipc, RdImm, Arithmetic;

            // Logical
            Xor, "xor", xor, RdRs1Rs2, Logical;
            Xori, "xori", xori, RdRs1Imm, Logical;
            Or, "or", or, RdRs1Rs2, Logical;
            Ori, "ori", ori, RdRs1Imm, Logical;
            And, "and", and, RdRs1Rs2, Logical;
            Andi, "andi", andi, RdRs1Imm, Logical;

            // Compare
            Slt, "slt", slt, RdRs1Rs2, Compare;
            Slti, "slti", slti, RdRs1Imm, Compare;
            Sltu, "sltu", sltu, RdRs1Rs2, Compare;
            Sltiu, "sltiu", sltiu, RdRs1Imm, Compare;

            // Jump & link
            Jal, "jal", jal, RdOff, Jump;
            Jalr, "jalr", jalr, RdRs1Off, Jump;

            // System
            Ecall, "ecall", ecall, NoOperands, System;
            Ebreak, "ebreak", ebreak, NoOperands, System;
            Scall, "scall", scall, NoOperands, System;
            Sbreak, "sbreak", sbreak, NoOperands, System;

            // RV32M
            Mul, "mul", mul, RdRs1Rs2, MulDiv;
            Mulh, "mulh", mulh, RdRs1Rs2, MulDiv;
            Mulhsu, "mulhsu", mulhsu, RdRs1Rs2, MulDiv;
            Mulhu, "mulhu", mulhu, RdRs1Rs2, MulDiv;
            Div, "div", div, RdRs1Rs2, MulDiv;
            Divu, "divu", divu, RdRs1Rs2, MulDiv;
            Rem, "rem", rem, RdRs1Rs2, MulDiv;
            Remu, "remu", remu, RdRs1Rs2, MulDiv;

            // Pseudo-instructions
            Nop, "nop", nop, NoOperands, Pseudo;
            Li, "li", li, RdImm, Pseudo;
            Mv, "mv", mv, RdRs, Pseudo;
            Not, "not", not, RdRs, Pseudo;
            Neg, "neg", neg, RdRs, Pseudo;
            Negw, "negw", negw, RdRs, Pseudo;
            Seqz, "seqz", seqz, RdRs, Pseudo;
            Snez, "snez", snez, RdRs, Pseudo;
            Sltz, "sltz", sltz, RdRs, Pseudo;
            Sgtz, "sgtz", sgtz, RdRs, Pseudo;
            Beqz, "beqz", beqz, RsOff, Pseudo;
            Bnez, "bnez", bnez, RsOff, Pseudo;
            Blez, "blez", blez, RsOff, Pseudo;
            Bgez, "bgez", bgez, RsOff, Pseudo;
            Bltz, "bltz", bltz, RsOff, Pseudo;
            Bgtz, "bgtz", bgtz, RsOff, Pseudo;
            Bgt, "bgt", bgt, RsRtOff, Pseudo;
            Ble, "ble", ble, RsRtOff, Pseudo;
            Bgtu, "bgtu", bgtu, RsRtOff, Pseudo;
            Bleu, "bleu", bleu, RsRtOff, Pseudo;
            Ret, "ret", ret, NoOperands, Pseudo;
        }
    };
}

/// Prefix shared by every op name in the dialect.
pub const DIALECT_PREFIX: &str = "riscv.";

/// Instruction group, as listed in the ISA manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Load,
    Store,
    Branch,
    Shift,
    Arithmetic,
    Logical,
    Compare,
    Jump,
    System,
    MulDiv,
    Pseudo,
}

macro_rules! define_opcodes {
    ($($variant:ident, $mnemonic:literal, $ctor:ident, $shape:ident, $category:ident;)*) => {
        /// A RISC-V mnemonic.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Opcode {
            $(
                #[doc = concat!("`", $mnemonic, "`")]
                $variant,
            )*
        }

        impl Opcode {
            /// Every opcode, in catalog order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant),*];

            /// Assembly mnemonic, e.g. `addi`.
            pub fn mnemonic(&self) -> &'static str {
                match self {
                    $(Opcode::$variant => $mnemonic,)*
                }
            }

            /// Op name, e.g. `riscv.addi`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Opcode::$variant => concat!("riscv.", $mnemonic),)*
                }
            }

            /// Operand shape shared by every instance of this opcode.
            pub fn shape(&self) -> Shape {
                match self {
                    $(Opcode::$variant => Shape::$shape,)*
                }
            }

            pub fn category(&self) -> Category {
                match self {
                    $(Opcode::$variant => Category::$category,)*
                }
            }

            /// Look an opcode up by its assembly mnemonic.
            pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
                match mnemonic {
                    $($mnemonic => Some(Opcode::$variant),)*
                    _ => Opcode::from_alias(mnemonic),
                }
            }
        }
    };
}

opcodes!(define_opcodes);

/// Alternate op names accepted on input. Printing always uses the
/// canonical name.
pub const OP_ALIASES: &[(&str, Opcode)] = &[("riscv.sltui", Opcode::Sltiu)];

impl Opcode {
    fn from_alias(mnemonic: &str) -> Option<Opcode> {
        OP_ALIASES
            .iter()
            .find(|(name, _)| name.strip_prefix(DIALECT_PREFIX) == Some(mnemonic))
            .map(|(_, opcode)| *opcode)
    }

    /// Look an opcode up by its op name (`riscv.<mnemonic>`).
    pub fn from_name(name: &str) -> Option<Opcode> {
        name.strip_prefix(DIALECT_PREFIX)
            .and_then(Opcode::from_mnemonic)
    }

    pub fn is_pseudo(&self) -> bool {
        self.category() == Category::Pseudo
    }

    /// Loads and stores; printed in `offset(base)` form in assembly.
    pub fn is_memory(&self) -> bool {
        matches!(self.category(), Category::Load | Category::Store)
    }
}
