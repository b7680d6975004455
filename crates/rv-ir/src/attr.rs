//! Attributes attached to dialect ops.
//!
//! Two attributes belong to the dialect itself and carry a parse/print
//! contract ([`DialectAttribute`]):
//! - [`RegisterAttr`], written `!riscv.reg<a0>`
//! - [`LabelAttr`], written `!riscv.label<loop>`
//!
//! [`IntegerAttr`] and [`StringAttr`] are the built-in literal attributes
//! (`42 : i64`, `"text"`). [`Attribute`] is the closed sum over all four and is
//! what the generic op format stores.

use alloc::string::{String, ToString};
use core::fmt;

use nom::bytes::complete::take_till;

use crate::{error::DialectError, regs::Register};

/// The parse/print contract between a dialect attribute and the text format.
///
/// The surrounding `!name<` ... `>` is handled by the op parser; these hooks
/// only see the parameter text between the angle brackets.
pub trait DialectAttribute: Sized {
    /// Attribute name as written after `!`.
    const NAME: &'static str;

    /// The value the attribute wraps.
    type Parameter;

    /// Parse the parameter, consuming input up to (not including) `>`.
    ///
    /// Returns the unconsumed input alongside the parameter.
    fn parse_parameter(input: &str) -> Result<(&str, Self::Parameter), DialectError>;

    /// Print the parameter in the form `parse_parameter` accepts.
    fn print_parameter<W: fmt::Write + ?Sized>(
        parameter: &Self::Parameter,
        out: &mut W,
    ) -> fmt::Result;

    fn from_parameter(parameter: Self::Parameter) -> Self;

    fn parameter(&self) -> &Self::Parameter;

    /// Print `<parameter>`.
    fn print_literal<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        out.write_char('<')?;
        Self::print_parameter(self.parameter(), out)?;
        out.write_char('>')
    }
}

/// Text up to the closing `>` of an attribute literal.
fn parameter_text(input: &str) -> (&str, &str) {
    let parsed: nom::IResult<&str, &str> = take_till(|c| c == '>')(input);
    // `take_till` on complete input cannot fail.
    parsed.unwrap_or((input, ""))
}

/// A register operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterAttr(Register);

impl RegisterAttr {
    pub fn new(register: Register) -> Self {
        Self(register)
    }

    pub fn from_index(index: i64) -> Result<Self, DialectError> {
        Register::from_index(index).map(Self)
    }

    pub fn from_name(name: &str) -> Result<Self, DialectError> {
        Register::from_name(name).map(Self)
    }

    pub fn register(&self) -> Register {
        self.0
    }
}

impl From<Register> for RegisterAttr {
    fn from(register: Register) -> Self {
        Self(register)
    }
}

impl DialectAttribute for RegisterAttr {
    const NAME: &'static str = "riscv.reg";
    type Parameter = Register;

    fn parse_parameter(input: &str) -> Result<(&str, Register), DialectError> {
        let (rest, name) = parameter_text(input);
        Ok((rest, Register::from_name(name)?))
    }

    fn print_parameter<W: fmt::Write + ?Sized>(parameter: &Register, out: &mut W) -> fmt::Result {
        out.write_str(parameter.abi_name())
    }

    fn from_parameter(parameter: Register) -> Self {
        Self(parameter)
    }

    fn parameter(&self) -> &Register {
        &self.0
    }
}

/// First character of an assembly symbol (`main`, `.L1`, `_start`, `$x`).
pub(crate) fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '.' || c == '$'
}

pub(crate) fn is_symbol_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$'
}

/// Whether `name` can be written as a bare symbol in assembly text.
pub(crate) fn is_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_symbol_start) && chars.all(is_symbol_continue)
}

fn check_label(name: &str) -> Result<(), DialectError> {
    if name.is_empty() {
        Err(DialectError::EmptyLabel)
    } else if !is_symbol(name) {
        Err(DialectError::InvalidLabel {
            label: name.to_string(),
        })
    } else {
        Ok(())
    }
}

/// A symbolic code location.
///
/// The name is always a non-empty assembly symbol, so it prints the same way
/// in both text formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelAttr(String);

impl LabelAttr {
    /// # Errors
    ///
    /// Returns [`DialectError::EmptyLabel`] for `""` and
    /// [`DialectError::InvalidLabel`] for anything that is not a symbol.
    pub fn new(name: impl Into<String>) -> Result<Self, DialectError> {
        let name = name.into();
        check_label(&name)?;
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for LabelAttr {
    type Error = DialectError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl TryFrom<String> for LabelAttr {
    type Error = DialectError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl DialectAttribute for LabelAttr {
    const NAME: &'static str = "riscv.label";
    type Parameter = String;

    fn parse_parameter(input: &str) -> Result<(&str, String), DialectError> {
        let (rest, text) = parameter_text(input);
        check_label(text)?;
        Ok((rest, text.to_string()))
    }

    fn print_parameter<W: fmt::Write + ?Sized>(parameter: &String, out: &mut W) -> fmt::Result {
        out.write_str(parameter)
    }

    // Only reached with text that `parse_parameter` already checked.
    fn from_parameter(parameter: String) -> Self {
        Self(parameter)
    }

    fn parameter(&self) -> &String {
        &self.0
    }
}

/// A fixed-width signed integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerAttr {
    value: i64,
    width: u32,
}

impl IntegerAttr {
    /// Width every raw integer is normalized to.
    pub const DEFAULT_WIDTH: u32 = 64;

    /// A 64-bit integer attribute.
    pub fn i64(value: i64) -> Self {
        Self {
            value,
            width: Self::DEFAULT_WIDTH,
        }
    }

    /// An integer attribute of the given width.
    ///
    /// The value itself is not range-checked against the width.
    pub fn from_int_and_width(value: i64, width: u32) -> Result<Self, DialectError> {
        if width == 0 || width > 64 {
            return Err(DialectError::InvalidIntegerWidth { width });
        }
        Ok(Self { value, width })
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl fmt::Display for IntegerAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : i{}", self.value, self.width)
    }
}

/// A string literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StringAttr(String);

impl StringAttr {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StringAttr {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StringAttr {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for StringAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

/// A branch or jump target: a resolved displacement or a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Offset {
    Integer(IntegerAttr),
    Label(LabelAttr),
}

impl Offset {
    pub fn as_integer(&self) -> Option<&IntegerAttr> {
        match self {
            Offset::Integer(attr) => Some(attr),
            Offset::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&LabelAttr> {
        match self {
            Offset::Label(attr) => Some(attr),
            Offset::Integer(_) => None,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Integer(attr) => write!(f, "{}", attr.value()),
            Offset::Label(attr) => f.write_str(attr.name()),
        }
    }
}

impl TryFrom<Attribute> for Offset {
    type Error = DialectError;

    fn try_from(attr: Attribute) -> Result<Self, Self::Error> {
        match attr {
            Attribute::Integer(attr) => Ok(Offset::Integer(attr)),
            Attribute::Label(attr) => Ok(Offset::Label(attr)),
            other => Err(DialectError::MalformedOffsetOrLabel {
                found: other.kind().describe(),
            }),
        }
    }
}

/// A value supplied for an immediate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmediateInput {
    Raw(i64),
    Built(IntegerAttr),
}

impl ImmediateInput {
    /// Raw integers become 64-bit attributes; built attributes pass through.
    pub fn normalize(self) -> IntegerAttr {
        match self {
            ImmediateInput::Raw(value) => IntegerAttr::i64(value),
            ImmediateInput::Built(attr) => attr,
        }
    }
}

impl From<i64> for ImmediateInput {
    fn from(value: i64) -> Self {
        ImmediateInput::Raw(value)
    }
}

impl From<i32> for ImmediateInput {
    fn from(value: i32) -> Self {
        ImmediateInput::Raw(value.into())
    }
}

impl From<IntegerAttr> for ImmediateInput {
    fn from(attr: IntegerAttr) -> Self {
        ImmediateInput::Built(attr)
    }
}

/// A value supplied for an offset slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetInput {
    RawInteger(i64),
    RawLabelText(String),
    Built(Offset),
}

impl OffsetInput {
    /// Raw integers become 64-bit attributes and raw text becomes a label.
    ///
    /// # Errors
    ///
    /// Fails when raw label text is not a valid label (see [`LabelAttr::new`]).
    pub fn normalize(self) -> Result<Offset, DialectError> {
        match self {
            OffsetInput::RawInteger(value) => Ok(Offset::Integer(IntegerAttr::i64(value))),
            OffsetInput::RawLabelText(text) => LabelAttr::new(text).map(Offset::Label),
            OffsetInput::Built(offset) => Ok(offset),
        }
    }
}

impl From<i64> for OffsetInput {
    fn from(value: i64) -> Self {
        OffsetInput::RawInteger(value)
    }
}

impl From<i32> for OffsetInput {
    fn from(value: i32) -> Self {
        OffsetInput::RawInteger(value.into())
    }
}

impl From<&str> for OffsetInput {
    fn from(text: &str) -> Self {
        OffsetInput::RawLabelText(text.to_string())
    }
}

impl From<String> for OffsetInput {
    fn from(text: String) -> Self {
        OffsetInput::RawLabelText(text)
    }
}

impl From<IntegerAttr> for OffsetInput {
    fn from(attr: IntegerAttr) -> Self {
        OffsetInput::Built(Offset::Integer(attr))
    }
}

impl From<LabelAttr> for OffsetInput {
    fn from(attr: LabelAttr) -> Self {
        OffsetInput::Built(Offset::Label(attr))
    }
}

impl From<Offset> for OffsetInput {
    fn from(offset: Offset) -> Self {
        OffsetInput::Built(offset)
    }
}

/// Kind tag of an [`Attribute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    Register,
    Label,
    Integer,
    String,
}

impl AttrKind {
    pub fn describe(&self) -> &'static str {
        match self {
            AttrKind::Register => "a register",
            AttrKind::Label => "a label",
            AttrKind::Integer => "an integer",
            AttrKind::String => "a string",
        }
    }
}

/// Any attribute that can appear in an op's attribute dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    Register(RegisterAttr),
    Label(LabelAttr),
    Integer(IntegerAttr),
    String(StringAttr),
}

impl Attribute {
    pub fn kind(&self) -> AttrKind {
        match self {
            Attribute::Register(_) => AttrKind::Register,
            Attribute::Label(_) => AttrKind::Label,
            Attribute::Integer(_) => AttrKind::Integer,
            Attribute::String(_) => AttrKind::String,
        }
    }
}

impl From<RegisterAttr> for Attribute {
    fn from(attr: RegisterAttr) -> Self {
        Attribute::Register(attr)
    }
}

impl From<Register> for Attribute {
    fn from(register: Register) -> Self {
        Attribute::Register(RegisterAttr(register))
    }
}

impl From<LabelAttr> for Attribute {
    fn from(attr: LabelAttr) -> Self {
        Attribute::Label(attr)
    }
}

impl From<IntegerAttr> for Attribute {
    fn from(attr: IntegerAttr) -> Self {
        Attribute::Integer(attr)
    }
}

impl From<StringAttr> for Attribute {
    fn from(attr: StringAttr) -> Self {
        Attribute::String(attr)
    }
}

impl From<Offset> for Attribute {
    fn from(offset: Offset) -> Self {
        match offset {
            Offset::Integer(attr) => Attribute::Integer(attr),
            Offset::Label(attr) => Attribute::Label(attr),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Register(attr) => {
                write!(f, "!{}", RegisterAttr::NAME)?;
                attr.print_literal(f)
            }
            Attribute::Label(attr) => {
                write!(f, "!{}", LabelAttr::NAME)?;
                attr.print_literal(f)
            }
            Attribute::Integer(attr) => write!(f, "{}", attr),
            Attribute::String(attr) => write!(f, "{}", attr),
        }
    }
}
