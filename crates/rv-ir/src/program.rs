//! Programs.

use alloc::vec::Vec;
use core::fmt;

use crate::{
    error::DialectError,
    inst::{DirectiveOp, Instruction, LabelOp, Op},
};

/// An ordered sequence of dialect ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, op: impl Into<Op>) {
        self.ops.push(op.into());
    }

    /// Append an instruction and return `self` for chaining.
    pub fn inst(mut self, inst: Instruction) -> Self {
        self.ops.push(Op::Inst(inst));
        self
    }

    /// Append a label and return `self` for chaining.
    ///
    /// Fails if `name` is not a valid label.
    pub fn label(mut self, name: &str) -> Result<Self, DialectError> {
        self.ops.push(Op::Label(LabelOp::new(name)?));
        Ok(self)
    }

    /// Append a directive and return `self` for chaining.
    ///
    /// Fails if the directive cannot be written on one assembly line.
    pub fn directive(mut self, directive: &str, value: &str) -> Result<Self, DialectError> {
        self.ops.push(Op::Directive(DirectiveOp::new(directive, value)?));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Op> + '_ {
        self.ops.iter()
    }

    /// Instructions only, skipping labels and directives.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.ops.iter().filter_map(Op::as_inst)
    }

    /// Names of all label ops, in program order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.iter().filter_map(|op| match op {
            Op::Label(label) => Some(label.label.name()),
            _ => None,
        })
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::printer::generic::write_program(f, self)
    }
}
