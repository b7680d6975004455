//! Registration of attribute and op descriptors.
//!
//! A [`Registry`] is populated once and then passed by shared reference to
//! every parser. There is no global instance.

use alloc::collections::BTreeMap;
use core::fmt;

use log::debug;

use crate::{
    attr::{Attribute, DialectAttribute, LabelAttr, RegisterAttr},
    error::DialectError,
    inst::{DirectiveOp, LabelOp},
    opcode::{Opcode, OP_ALIASES},
};

/// Parses the parameter of one attribute kind into a generic [`Attribute`].
pub type ParameterParser = fn(&str) -> Result<(&str, Attribute), DialectError>;

/// How the text format reads one dialect attribute.
#[derive(Clone, Copy)]
pub struct AttrDescriptor {
    pub name: &'static str,
    pub parse: ParameterParser,
}

impl fmt::Debug for AttrDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl AttrDescriptor {
    /// Descriptor for a type implementing [`DialectAttribute`].
    pub fn of<A>() -> Self
    where
        A: DialectAttribute + Into<Attribute>,
    {
        Self {
            name: A::NAME,
            parse: parse_as::<A>,
        }
    }
}

fn parse_as<A>(input: &str) -> Result<(&str, Attribute), DialectError>
where
    A: DialectAttribute + Into<Attribute>,
{
    let (rest, parameter) = A::parse_parameter(input)?;
    Ok((rest, A::from_parameter(parameter).into()))
}

/// What kind of op a registered name builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Instruction(Opcode),
    Label,
    Directive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDescriptor {
    pub name: &'static str,
    pub kind: OpKind,
}

impl OpDescriptor {
    pub fn instruction(opcode: Opcode) -> Self {
        Self {
            name: opcode.name(),
            kind: OpKind::Instruction(opcode),
        }
    }
}

/// Attribute and op descriptors known to the parsers.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    attrs: BTreeMap<&'static str, AttrDescriptor>,
    ops: BTreeMap<&'static str, OpDescriptor>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the RISC-V dialect registered.
    pub fn riscv() -> Result<Self, DialectError> {
        let mut registry = Self::new();
        register_dialect(&mut registry)?;
        Ok(registry)
    }

    pub fn register_attr(&mut self, desc: AttrDescriptor) -> Result<(), DialectError> {
        if self.attrs.contains_key(desc.name) {
            return Err(DialectError::DuplicateRegistration { name: desc.name });
        }
        self.attrs.insert(desc.name, desc);
        Ok(())
    }

    pub fn register_op(&mut self, desc: OpDescriptor) -> Result<(), DialectError> {
        if self.ops.contains_key(desc.name) {
            return Err(DialectError::DuplicateRegistration { name: desc.name });
        }
        self.ops.insert(desc.name, desc);
        Ok(())
    }

    pub fn attr(&self, name: &str) -> Option<&AttrDescriptor> {
        self.attrs.get(name)
    }

    pub fn op(&self, name: &str) -> Option<&OpDescriptor> {
        self.ops.get(name)
    }

    pub fn attr_count(&self) -> usize {
        self.attrs.len()
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Registered op names, sorted.
    pub fn op_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ops.keys().copied()
    }
}

/// Register the dialect's attributes and ops.
///
/// Fails with [`DialectError::DuplicateRegistration`] if any of them is
/// already present, so calling this twice on one registry is an error.
pub fn register_dialect(registry: &mut Registry) -> Result<(), DialectError> {
    registry.register_attr(AttrDescriptor::of::<RegisterAttr>())?;
    registry.register_attr(AttrDescriptor::of::<LabelAttr>())?;

    for opcode in Opcode::ALL {
        registry.register_op(OpDescriptor::instruction(*opcode))?;
    }
    for (name, opcode) in OP_ALIASES {
        registry.register_op(OpDescriptor {
            name: *name,
            kind: OpKind::Instruction(*opcode),
        })?;
    }
    registry.register_op(OpDescriptor {
        name: LabelOp::NAME,
        kind: OpKind::Label,
    })?;
    registry.register_op(OpDescriptor {
        name: DirectiveOp::NAME,
        kind: OpKind::Directive,
    })?;

    debug!(
        "registered riscv dialect: {} attributes, {} ops",
        registry.attr_count(),
        registry.op_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::Register;

    #[test]
    fn test_riscv_registry() {
        let registry = Registry::riscv().unwrap();
        assert_eq!(registry.attr_count(), 2);
        assert_eq!(registry.op_count(), Opcode::ALL.len() + OP_ALIASES.len() + 2);
        assert_eq!(
            registry.op("riscv.addi").map(|d| d.kind),
            Some(OpKind::Instruction(Opcode::Addi))
        );
        assert_eq!(registry.op("riscv.label").map(|d| d.kind), Some(OpKind::Label));
        assert!(registry.op("riscv.bogus").is_none());
        assert_eq!(
            registry.op("riscv.sltui").map(|d| d.kind),
            Some(OpKind::Instruction(Opcode::Sltiu))
        );
    }

    #[test]
    fn test_register_twice_fails() {
        let mut registry = Registry::riscv().unwrap();
        assert_eq!(
            register_dialect(&mut registry),
            Err(DialectError::DuplicateRegistration { name: "riscv.reg" })
        );
    }

    #[test]
    fn test_attr_dispatch() {
        let registry = Registry::riscv().unwrap();
        let reg = registry.attr("riscv.reg").unwrap();
        let (rest, attr) = (reg.parse)("x2>").unwrap();
        assert_eq!(rest, ">");
        assert_eq!(attr, Attribute::from(Register::SP));

        let label = registry.attr("riscv.label").unwrap();
        let (_, attr) = (label.parse)("end>").unwrap();
        assert_eq!(attr, Attribute::Label(LabelAttr::new("end").unwrap()));
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(registry.attr("riscv.reg").is_none());
        assert_eq!(registry.op_names().count(), 0);
    }
}
