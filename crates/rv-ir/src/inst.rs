//! Instruction nodes and the auxiliary ops.

use alloc::{string::String, vec::Vec};

use crate::{
    attr::{
        is_symbol, Attribute, ImmediateInput, IntegerAttr, LabelAttr, Offset, OffsetInput,
        RegisterAttr, StringAttr,
    },
    error::DialectError,
    opcode::Opcode,
    parser::strip_hash_comment,
    shape::{Operands, Shape, SlotKind},
};

/// A RISC-V instruction: an opcode plus operands matching its shape.
///
/// Fields are private so an instruction can only exist with operands of the
/// opcode's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    opcode: Opcode,
    operands: Operands,
}

impl Instruction {
    /// Build an instruction from already-typed operands.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::ShapeMismatch`] if the operands do not have the
    /// opcode's shape.
    pub fn new(opcode: Opcode, operands: Operands) -> Result<Self, DialectError> {
        let expected = opcode.shape();
        let found = operands.shape();
        if expected != found {
            return Err(DialectError::ShapeMismatch {
                opcode,
                expected,
                found,
            });
        }
        Ok(Self { opcode, operands })
    }

    /// Build an instruction from a generic attribute dictionary.
    ///
    /// Each slot of the opcode's shape must be present exactly once with an
    /// attribute of the right kind, and nothing else may be present.
    pub fn from_attributes<K>(
        opcode: Opcode,
        attrs: impl IntoIterator<Item = (K, Attribute)>,
    ) -> Result<Self, DialectError>
    where
        K: Into<String>,
    {
        let op = opcode.name();
        let shape = opcode.shape();
        let mut slots: Vec<Option<Attribute>> = shape.slots().iter().map(|_| None).collect();

        for (key, attr) in attrs {
            let key: String = key.into();
            let index = shape
                .slots()
                .iter()
                .position(|slot| slot.name == key)
                .ok_or_else(|| DialectError::UnexpectedAttribute {
                    op,
                    attr: key.clone(),
                })?;
            if slots[index].is_some() {
                return Err(DialectError::DuplicateAttribute { op, attr: key });
            }
            slots[index] = Some(attr);
        }

        let mut filled = Vec::with_capacity(slots.len());
        for (slot, attr) in shape.slots().iter().zip(slots) {
            let attr = attr.ok_or(DialectError::MissingAttribute {
                op,
                attr: slot.name,
            })?;
            let operand = match (slot.kind, attr) {
                (SlotKind::Register, Attribute::Register(r)) => Operand::Reg(r),
                (SlotKind::Immediate, Attribute::Integer(i)) => Operand::Imm(i),
                (SlotKind::Offset, attr) => Operand::Off(Offset::try_from(attr)?),
                (kind, attr) => {
                    return Err(DialectError::AttributeKindMismatch {
                        op,
                        attr: slot.name,
                        expected: kind.describe(),
                        found: attr.kind().describe(),
                    })
                }
            };
            filled.push(operand);
        }

        let operands = operands_from_slots(shape, filled);
        Ok(Self { opcode, operands })
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn operands(&self) -> &Operands {
        &self.operands
    }

    pub fn shape(&self) -> Shape {
        self.operands.shape()
    }

    /// Op name, e.g. `riscv.addi`.
    pub fn name(&self) -> &'static str {
        self.opcode.name()
    }

    /// Operands as `(slot name, attribute)` pairs, in slot order.
    pub fn attributes(&self) -> Vec<(&'static str, Attribute)> {
        self.operands.attributes()
    }
}

/// A slot value after its kind has been checked.
enum Operand {
    Reg(RegisterAttr),
    Imm(IntegerAttr),
    Off(Offset),
}

/// Assemble operands whose kinds were already checked against `shape`.
fn operands_from_slots(shape: Shape, operands: Vec<Operand>) -> Operands {
    use Operand::{Imm, Off, Reg};

    let mut it = operands.into_iter();
    match (shape, it.next(), it.next(), it.next()) {
        (Shape::RdRs1Imm, Some(Reg(rd)), Some(Reg(rs1)), Some(Imm(immediate))) => {
            Operands::RdRs1Imm { rd, rs1, immediate }
        }
        (Shape::RdRs1Off, Some(Reg(rd)), Some(Reg(rs1)), Some(Off(offset))) => {
            Operands::RdRs1Off { rd, rs1, offset }
        }
        (Shape::Rs1Rs2Imm, Some(Reg(rs1)), Some(Reg(rs2)), Some(Imm(immediate))) => {
            Operands::Rs1Rs2Imm {
                rs1,
                rs2,
                immediate,
            }
        }
        (Shape::Rs1Rs2Off, Some(Reg(rs1)), Some(Reg(rs2)), Some(Off(offset))) => {
            Operands::Rs1Rs2Off { rs1, rs2, offset }
        }
        (Shape::RdRs1Rs2, Some(Reg(rd)), Some(Reg(rs1)), Some(Reg(rs2))) => {
            Operands::RdRs1Rs2 { rd, rs1, rs2 }
        }
        (Shape::RsRtOff, Some(Reg(rs)), Some(Reg(rt)), Some(Off(offset))) => {
            Operands::RsRtOff { rs, rt, offset }
        }
        (Shape::RdImm, Some(Reg(rd)), Some(Imm(immediate)), None) => {
            Operands::RdImm { rd, immediate }
        }
        (Shape::RdOff, Some(Reg(rd)), Some(Off(offset)), None) => Operands::RdOff { rd, offset },
        (Shape::RsOff, Some(Reg(rs)), Some(Off(offset)), None) => Operands::RsOff { rs, offset },
        (Shape::RdRs, Some(Reg(rd)), Some(Reg(rs)), None) => Operands::RdRs { rd, rs },
        (Shape::NoOperands, None, None, None) => Operands::NoOperands,
        _ => unreachable!("operands were checked against the slots of {:?}", shape),
    }
}

macro_rules! shape_constructor {
    (RdRs1Imm, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rd, rs1, immediate`")]
        pub fn $ctor(
            rd: impl Into<RegisterAttr>,
            rs1: impl Into<RegisterAttr>,
            immediate: impl Into<ImmediateInput>,
        ) -> Self {
            Self::from_shape(
                Opcode::$variant,
                Operands::RdRs1Imm {
                    rd: rd.into(),
                    rs1: rs1.into(),
                    immediate: immediate.into().normalize(),
                },
            )
        }
    };
    (RdRs1Off, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rd, rs1, offset`")]
        #[doc = ""]
        #[doc = "Fails if a label offset is not a valid label."]
        pub fn $ctor(
            rd: impl Into<RegisterAttr>,
            rs1: impl Into<RegisterAttr>,
            offset: impl Into<OffsetInput>,
        ) -> Result<Self, DialectError> {
            Ok(Self::from_shape(
                Opcode::$variant,
                Operands::RdRs1Off {
                    rd: rd.into(),
                    rs1: rs1.into(),
                    offset: offset.into().normalize()?,
                },
            ))
        }
    };
    (Rs1Rs2Imm, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rs1, rs2, immediate`")]
        pub fn $ctor(
            rs1: impl Into<RegisterAttr>,
            rs2: impl Into<RegisterAttr>,
            immediate: impl Into<ImmediateInput>,
        ) -> Self {
            Self::from_shape(
                Opcode::$variant,
                Operands::Rs1Rs2Imm {
                    rs1: rs1.into(),
                    rs2: rs2.into(),
                    immediate: immediate.into().normalize(),
                },
            )
        }
    };
    (Rs1Rs2Off, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rs1, rs2, offset`")]
        #[doc = ""]
        #[doc = "Fails if a label offset is not a valid label."]
        pub fn $ctor(
            rs1: impl Into<RegisterAttr>,
            rs2: impl Into<RegisterAttr>,
            offset: impl Into<OffsetInput>,
        ) -> Result<Self, DialectError> {
            Ok(Self::from_shape(
                Opcode::$variant,
                Operands::Rs1Rs2Off {
                    rs1: rs1.into(),
                    rs2: rs2.into(),
                    offset: offset.into().normalize()?,
                },
            ))
        }
    };
    (RdRs1Rs2, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rd, rs1, rs2`")]
        pub fn $ctor(
            rd: impl Into<RegisterAttr>,
            rs1: impl Into<RegisterAttr>,
            rs2: impl Into<RegisterAttr>,
        ) -> Self {
            Self::from_shape(
                Opcode::$variant,
                Operands::RdRs1Rs2 {
                    rd: rd.into(),
                    rs1: rs1.into(),
                    rs2: rs2.into(),
                },
            )
        }
    };
    (RsRtOff, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rs, rt, offset`")]
        #[doc = ""]
        #[doc = "Fails if a label offset is not a valid label."]
        pub fn $ctor(
            rs: impl Into<RegisterAttr>,
            rt: impl Into<RegisterAttr>,
            offset: impl Into<OffsetInput>,
        ) -> Result<Self, DialectError> {
            Ok(Self::from_shape(
                Opcode::$variant,
                Operands::RsRtOff {
                    rs: rs.into(),
                    rt: rt.into(),
                    offset: offset.into().normalize()?,
                },
            ))
        }
    };
    (RdImm, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rd, immediate`")]
        pub fn $ctor(rd: impl Into<RegisterAttr>, immediate: impl Into<ImmediateInput>) -> Self {
            Self::from_shape(
                Opcode::$variant,
                Operands::RdImm {
                    rd: rd.into(),
                    immediate: immediate.into().normalize(),
                },
            )
        }
    };
    (RdOff, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rd, offset`")]
        #[doc = ""]
        #[doc = "Fails if a label offset is not a valid label."]
        pub fn $ctor(
            rd: impl Into<RegisterAttr>,
            offset: impl Into<OffsetInput>,
        ) -> Result<Self, DialectError> {
            Ok(Self::from_shape(
                Opcode::$variant,
                Operands::RdOff {
                    rd: rd.into(),
                    offset: offset.into().normalize()?,
                },
            ))
        }
    };
    (RsOff, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rs, offset`")]
        #[doc = ""]
        #[doc = "Fails if a label offset is not a valid label."]
        pub fn $ctor(
            rs: impl Into<RegisterAttr>,
            offset: impl Into<OffsetInput>,
        ) -> Result<Self, DialectError> {
            Ok(Self::from_shape(
                Opcode::$variant,
                Operands::RsOff {
                    rs: rs.into(),
                    offset: offset.into().normalize()?,
                },
            ))
        }
    };
    (RdRs, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, " rd, rs`")]
        pub fn $ctor(rd: impl Into<RegisterAttr>, rs: impl Into<RegisterAttr>) -> Self {
            Self::from_shape(
                Opcode::$variant,
                Operands::RdRs {
                    rd: rd.into(),
                    rs: rs.into(),
                },
            )
        }
    };
    (NoOperands, $variant:ident, $mnemonic:literal, $ctor:ident) => {
        #[doc = concat!("`", $mnemonic, "`")]
        pub fn $ctor() -> Self {
            Self::from_shape(Opcode::$variant, Operands::NoOperands)
        }
    };
}

macro_rules! define_constructors {
    ($($variant:ident, $mnemonic:literal, $ctor:ident, $shape:ident, $category:ident;)*) => {
        /// One constructor per mnemonic, typed by the mnemonic's shape.
        ///
        /// Raw integers passed for immediates and offsets are normalized to
        /// 64-bit integer attributes. Strings passed for offsets become labels,
        /// so constructors with an offset slot return a `Result`.
        impl Instruction {
            $(shape_constructor!($shape, $variant, $mnemonic, $ctor);)*
        }
    };
}

crate::opcodes!(define_constructors);

impl Instruction {
    // Only called by the generated constructors, which pair each opcode with
    // operands of its own shape.
    fn from_shape(opcode: Opcode, operands: Operands) -> Self {
        debug_assert_eq!(opcode.shape(), operands.shape());
        Self { opcode, operands }
    }
}

/// `riscv.label`: marks a code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelOp {
    pub label: LabelAttr,
}

impl LabelOp {
    pub const NAME: &'static str = "riscv.label";

    /// # Errors
    ///
    /// Fails if `name` is not a valid label (see [`LabelAttr::new`]).
    pub fn new(name: impl Into<String>) -> Result<Self, DialectError> {
        Ok(Self {
            label: LabelAttr::new(name)?,
        })
    }

    /// Build from a `{"label" = !riscv.label<...>}` dictionary.
    pub fn from_attributes<K>(
        attrs: impl IntoIterator<Item = (K, Attribute)>,
    ) -> Result<Self, DialectError>
    where
        K: Into<String>,
    {
        let [label] = take_named(Self::NAME, ["label"], attrs)?;
        match label {
            Attribute::Label(label) => Ok(Self { label }),
            other => Err(kind_mismatch(Self::NAME, "label", "a label", &other)),
        }
    }
}

/// `riscv.directive`: an assembler directive such as `.globl main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectiveOp {
    pub directive: StringAttr,
    pub value: StringAttr,
}

impl DirectiveOp {
    pub const NAME: &'static str = "riscv.directive";

    /// Build a directive that prints as one line of assembly, `.directive value`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidDirective`] when the name is not a
    /// symbol, or when the value spans lines, has surrounding whitespace,
    /// starts with `:`, or contains a `#` outside quotes.
    pub fn new(
        directive: impl Into<StringAttr>,
        value: impl Into<StringAttr>,
    ) -> Result<Self, DialectError> {
        let directive = directive.into();
        let value = value.into();
        check_directive(directive.value(), value.value())?;
        Ok(Self { directive, value })
    }

    /// Build from a `{"directive" = "...", "value" = "..."}` dictionary.
    pub fn from_attributes<K>(
        attrs: impl IntoIterator<Item = (K, Attribute)>,
    ) -> Result<Self, DialectError>
    where
        K: Into<String>,
    {
        let [directive, value] = take_named(Self::NAME, ["directive", "value"], attrs)?;
        let directive = match directive {
            Attribute::String(s) => s,
            other => return Err(kind_mismatch(Self::NAME, "directive", "a string", &other)),
        };
        let value = match value {
            Attribute::String(s) => s,
            other => return Err(kind_mismatch(Self::NAME, "value", "a string", &other)),
        };
        Self::new(directive, value)
    }
}

fn check_directive(directive: &str, value: &str) -> Result<(), DialectError> {
    let reason = if !is_symbol(directive) {
        "name must be a symbol"
    } else if value.contains(['\n', '\r']) {
        "value spans more than one line"
    } else if value.trim() != value {
        "value has leading or trailing whitespace"
    } else if value.starts_with(':') {
        "value starts with ':'"
    } else if strip_hash_comment(value).len() != value.len() {
        "value contains an unquoted '#'"
    } else {
        return Ok(());
    };
    Err(DialectError::InvalidDirective {
        directive: directive.into(),
        reason,
    })
}

/// Pick exactly the attributes named in `names` out of a dictionary.
fn take_named<K, const N: usize>(
    op: &'static str,
    names: [&'static str; N],
    attrs: impl IntoIterator<Item = (K, Attribute)>,
) -> Result<[Attribute; N], DialectError>
where
    K: Into<String>,
{
    let mut found: [Option<Attribute>; N] = core::array::from_fn(|_| None);
    for (key, attr) in attrs {
        let key: String = key.into();
        let Some(index) = names.iter().position(|name| *name == key) else {
            return Err(DialectError::UnexpectedAttribute { op, attr: key });
        };
        if found[index].is_some() {
            return Err(DialectError::DuplicateAttribute { op, attr: key });
        }
        found[index] = Some(attr);
    }

    let mut out = Vec::with_capacity(N);
    for (name, attr) in names.iter().zip(found) {
        out.push(attr.ok_or(DialectError::MissingAttribute { op, attr: *name })?);
    }
    out.try_into()
        .map_err(|_| DialectError::MissingAttribute { op, attr: names[0] })
}

fn kind_mismatch(
    op: &'static str,
    attr: &'static str,
    expected: &'static str,
    found: &Attribute,
) -> DialectError {
    DialectError::AttributeKindMismatch {
        op,
        attr,
        expected,
        found: found.kind().describe(),
    }
}

/// Any op of the dialect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    Inst(Instruction),
    Label(LabelOp),
    Directive(DirectiveOp),
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Inst(inst) => inst.name(),
            Op::Label(_) => LabelOp::NAME,
            Op::Directive(_) => DirectiveOp::NAME,
        }
    }

    /// Attributes in print order.
    pub fn attributes(&self) -> Vec<(&'static str, Attribute)> {
        match self {
            Op::Inst(inst) => inst.attributes(),
            Op::Label(op) => Vec::from([("label", Attribute::Label(op.label.clone()))]),
            Op::Directive(op) => Vec::from([
                ("directive", Attribute::String(op.directive.clone())),
                ("value", Attribute::String(op.value.clone())),
            ]),
        }
    }

    pub fn as_inst(&self) -> Option<&Instruction> {
        match self {
            Op::Inst(inst) => Some(inst),
            _ => None,
        }
    }
}

impl From<Instruction> for Op {
    fn from(inst: Instruction) -> Self {
        Op::Inst(inst)
    }
}

impl From<LabelOp> for Op {
    fn from(op: LabelOp) -> Self {
        Op::Label(op)
    }
}

impl From<DirectiveOp> for Op {
    fn from(op: DirectiveOp) -> Self {
        Op::Directive(op)
    }
}
