//! Operand shapes.
//!
//! Every RISC-V op in the dialect has one of a small number of operand
//! schemas. [`Shape`] is the tag, [`Operands`] carries the attributes for one
//! instance, and [`Shape::slots`] lists the slots in print order.

use alloc::{vec, vec::Vec};

use crate::attr::{Attribute, AttrKind, IntegerAttr, Offset, RegisterAttr};

/// Operand schema of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `rd, rs1, immediate` (loads, register-immediate ALU ops)
    RdRs1Imm,
    /// `rd, rs1, offset` (jalr)
    RdRs1Off,
    /// `rs1, rs2, immediate` (stores)
    Rs1Rs2Imm,
    /// `rs1, rs2, offset` (conditional branches)
    Rs1Rs2Off,
    /// `rd, rs1, rs2` (register-register ALU ops)
    RdRs1Rs2,
    /// `rs, rt, offset` (swapped-operand branch pseudos)
    RsRtOff,
    /// `rd, immediate` (lui, auipc, li)
    RdImm,
    /// `rd, offset` (jal)
    RdOff,
    /// `rs, offset` (compare-with-zero branch pseudos)
    RsOff,
    /// `rd, rs` (unary pseudos)
    RdRs,
    /// No operands.
    NoOperands,
}

/// What a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Register,
    Immediate,
    /// Integer or label.
    Offset,
}

impl SlotKind {
    pub fn accepts(&self, kind: AttrKind) -> bool {
        match self {
            SlotKind::Register => kind == AttrKind::Register,
            SlotKind::Immediate => kind == AttrKind::Integer,
            SlotKind::Offset => matches!(kind, AttrKind::Integer | AttrKind::Label),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SlotKind::Register => "a register",
            SlotKind::Immediate => "an integer",
            SlotKind::Offset => "an integer or a label",
        }
    }
}

/// A named operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub name: &'static str,
    pub kind: SlotKind,
}

const fn slot(name: &'static str, kind: SlotKind) -> Slot {
    Slot { name, kind }
}

const RD: Slot = slot("rd", SlotKind::Register);
const RS: Slot = slot("rs", SlotKind::Register);
const RT: Slot = slot("rt", SlotKind::Register);
const RS1: Slot = slot("rs1", SlotKind::Register);
const RS2: Slot = slot("rs2", SlotKind::Register);
const IMMEDIATE: Slot = slot("immediate", SlotKind::Immediate);
const OFFSET: Slot = slot("offset", SlotKind::Offset);

impl Shape {
    pub const ALL: [Shape; 11] = [
        Shape::RdRs1Imm,
        Shape::RdRs1Off,
        Shape::Rs1Rs2Imm,
        Shape::Rs1Rs2Off,
        Shape::RdRs1Rs2,
        Shape::RsRtOff,
        Shape::RdImm,
        Shape::RdOff,
        Shape::RsOff,
        Shape::RdRs,
        Shape::NoOperands,
    ];

    /// Slots of this shape, in print order.
    pub fn slots(&self) -> &'static [Slot] {
        match self {
            Shape::RdRs1Imm => &[RD, RS1, IMMEDIATE],
            Shape::RdRs1Off => &[RD, RS1, OFFSET],
            Shape::Rs1Rs2Imm => &[RS1, RS2, IMMEDIATE],
            Shape::Rs1Rs2Off => &[RS1, RS2, OFFSET],
            Shape::RdRs1Rs2 => &[RD, RS1, RS2],
            Shape::RsRtOff => &[RS, RT, OFFSET],
            Shape::RdImm => &[RD, IMMEDIATE],
            Shape::RdOff => &[RD, OFFSET],
            Shape::RsOff => &[RS, OFFSET],
            Shape::RdRs => &[RD, RS],
            Shape::NoOperands => &[],
        }
    }

    /// Number of operands.
    pub fn arity(&self) -> usize {
        self.slots().len()
    }

    /// Look a slot up by attribute name.
    pub fn slot(&self, name: &str) -> Option<&'static Slot> {
        self.slots().iter().find(|s| s.name == name)
    }
}

/// The operands of one instruction, laid out by shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operands {
    RdRs1Imm {
        rd: RegisterAttr,
        rs1: RegisterAttr,
        immediate: IntegerAttr,
    },
    RdRs1Off {
        rd: RegisterAttr,
        rs1: RegisterAttr,
        offset: Offset,
    },
    Rs1Rs2Imm {
        rs1: RegisterAttr,
        rs2: RegisterAttr,
        immediate: IntegerAttr,
    },
    Rs1Rs2Off {
        rs1: RegisterAttr,
        rs2: RegisterAttr,
        offset: Offset,
    },
    RdRs1Rs2 {
        rd: RegisterAttr,
        rs1: RegisterAttr,
        rs2: RegisterAttr,
    },
    RsRtOff {
        rs: RegisterAttr,
        rt: RegisterAttr,
        offset: Offset,
    },
    RdImm {
        rd: RegisterAttr,
        immediate: IntegerAttr,
    },
    RdOff {
        rd: RegisterAttr,
        offset: Offset,
    },
    RsOff {
        rs: RegisterAttr,
        offset: Offset,
    },
    RdRs {
        rd: RegisterAttr,
        rs: RegisterAttr,
    },
    NoOperands,
}

impl Operands {
    pub fn shape(&self) -> Shape {
        match self {
            Operands::RdRs1Imm { .. } => Shape::RdRs1Imm,
            Operands::RdRs1Off { .. } => Shape::RdRs1Off,
            Operands::Rs1Rs2Imm { .. } => Shape::Rs1Rs2Imm,
            Operands::Rs1Rs2Off { .. } => Shape::Rs1Rs2Off,
            Operands::RdRs1Rs2 { .. } => Shape::RdRs1Rs2,
            Operands::RsRtOff { .. } => Shape::RsRtOff,
            Operands::RdImm { .. } => Shape::RdImm,
            Operands::RdOff { .. } => Shape::RdOff,
            Operands::RsOff { .. } => Shape::RsOff,
            Operands::RdRs { .. } => Shape::RdRs,
            Operands::NoOperands => Shape::NoOperands,
        }
    }

    /// Operands as `(slot name, attribute)` pairs, in slot order.
    pub fn attributes(&self) -> Vec<(&'static str, Attribute)> {
        let reg = |r: &RegisterAttr| Attribute::Register(*r);
        let imm = |i: &IntegerAttr| Attribute::Integer(*i);
        let off = |o: &Offset| Attribute::from(o.clone());
        match self {
            Operands::RdRs1Imm { rd, rs1, immediate } => vec![
                ("rd", reg(rd)),
                ("rs1", reg(rs1)),
                ("immediate", imm(immediate)),
            ],
            Operands::RdRs1Off { rd, rs1, offset } => {
                vec![("rd", reg(rd)), ("rs1", reg(rs1)), ("offset", off(offset))]
            }
            Operands::Rs1Rs2Imm {
                rs1,
                rs2,
                immediate,
            } => vec![
                ("rs1", reg(rs1)),
                ("rs2", reg(rs2)),
                ("immediate", imm(immediate)),
            ],
            Operands::Rs1Rs2Off { rs1, rs2, offset } => vec![
                ("rs1", reg(rs1)),
                ("rs2", reg(rs2)),
                ("offset", off(offset)),
            ],
            Operands::RdRs1Rs2 { rd, rs1, rs2 } => {
                vec![("rd", reg(rd)), ("rs1", reg(rs1)), ("rs2", reg(rs2))]
            }
            Operands::RsRtOff { rs, rt, offset } => {
                vec![("rs", reg(rs)), ("rt", reg(rt)), ("offset", off(offset))]
            }
            Operands::RdImm { rd, immediate } => {
                vec![("rd", reg(rd)), ("immediate", imm(immediate))]
            }
            Operands::RdOff { rd, offset } => vec![("rd", reg(rd)), ("offset", off(offset))],
            Operands::RsOff { rs, offset } => vec![("rs", reg(rs)), ("offset", off(offset))],
            Operands::RdRs { rd, rs } => vec![("rd", reg(rd)), ("rs", reg(rs))],
            Operands::NoOperands => Vec::new(),
        }
    }

    /// Destination register, if the shape has one.
    pub fn rd(&self) -> Option<RegisterAttr> {
        match self {
            Operands::RdRs1Imm { rd, .. }
            | Operands::RdRs1Off { rd, .. }
            | Operands::RdRs1Rs2 { rd, .. }
            | Operands::RdImm { rd, .. }
            | Operands::RdOff { rd, .. }
            | Operands::RdRs { rd, .. } => Some(*rd),
            _ => None,
        }
    }

    /// Immediate, if the shape has one.
    pub fn immediate(&self) -> Option<IntegerAttr> {
        match self {
            Operands::RdRs1Imm { immediate, .. }
            | Operands::Rs1Rs2Imm { immediate, .. }
            | Operands::RdImm { immediate, .. } => Some(*immediate),
            _ => None,
        }
    }

    /// Offset, if the shape has one.
    pub fn offset(&self) -> Option<&Offset> {
        match self {
            Operands::RdRs1Off { offset, .. }
            | Operands::Rs1Rs2Off { offset, .. }
            | Operands::RsRtOff { offset, .. }
            | Operands::RdOff { offset, .. }
            | Operands::RsOff { offset, .. } => Some(offset),
            _ => None,
        }
    }

    /// Register operands read by the instruction, in slot order.
    pub fn sources(&self) -> Vec<RegisterAttr> {
        match self {
            Operands::RdRs1Imm { rs1, .. } | Operands::RdRs1Off { rs1, .. } => vec![*rs1],
            Operands::Rs1Rs2Imm { rs1, rs2, .. }
            | Operands::Rs1Rs2Off { rs1, rs2, .. }
            | Operands::RdRs1Rs2 { rs1, rs2, .. } => vec![*rs1, *rs2],
            Operands::RsRtOff { rs, rt, .. } => vec![*rs, *rt],
            Operands::RsOff { rs, .. } | Operands::RdRs { rs, .. } => vec![*rs],
            Operands::RdImm { .. } | Operands::RdOff { .. } | Operands::NoOperands => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use super::*;
    use crate::{attr::LabelAttr, regs::Register};

    #[test]
    fn test_slot_counts() {
        assert_eq!(Shape::RdRs1Rs2.arity(), 3);
        assert_eq!(Shape::RdRs.arity(), 2);
        assert_eq!(Shape::NoOperands.arity(), 0);
        for shape in Shape::ALL {
            assert!(shape.arity() <= 3);
        }
    }

    #[test]
    fn test_slot_lookup() {
        let slot = Shape::RsRtOff.slot("rt").unwrap();
        assert_eq!(slot.kind, SlotKind::Register);
        assert_eq!(Shape::RsRtOff.slot("offset").unwrap().kind, SlotKind::Offset);
        assert!(Shape::RsRtOff.slot("rd").is_none());
    }

    #[test]
    fn test_slot_kind_accepts() {
        assert!(SlotKind::Offset.accepts(AttrKind::Label));
        assert!(SlotKind::Offset.accepts(AttrKind::Integer));
        assert!(!SlotKind::Immediate.accepts(AttrKind::Label));
        assert!(!SlotKind::Register.accepts(AttrKind::Integer));
    }

    #[test]
    fn test_attributes_follow_slot_order() {
        let operands = Operands::Rs1Rs2Off {
            rs1: Register::A0.into(),
            rs2: Register::A1.into(),
            offset: Offset::Label(LabelAttr::new("done").unwrap()),
        };
        let names: Vec<&str> = operands.attributes().iter().map(|(n, _)| *n).collect();
        let expected: Vec<&str> = operands.shape().slots().iter().map(|s| s.name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_accessors() {
        let operands = Operands::RdRs1Imm {
            rd: Register::A0.into(),
            rs1: Register::SP.into(),
            immediate: IntegerAttr::i64(16),
        };
        assert_eq!(operands.rd(), Some(Register::A0.into()));
        assert_eq!(operands.immediate(), Some(IntegerAttr::i64(16)));
        assert_eq!(operands.offset(), None);
        assert_eq!(operands.sources(), vec![RegisterAttr::new(Register::SP)]);
    }
}
