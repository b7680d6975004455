//! RISC-V general-purpose registers.

use alloc::string::{String, ToString};
use core::{fmt, str::FromStr};

use crate::error::DialectError;

/// ABI mnemonics and the register index each one names.
///
/// Index 8 appears twice (`s0` and `fp`), so this table is only used for
/// name → index lookups. The reverse direction goes through
/// [`CANONICAL_NAMES`].
pub const ABI_NAMES: [(&str, u8); 33] = [
    ("zero", 0),
    ("ra", 1),
    ("sp", 2),
    ("gp", 3),
    ("tp", 4),
    ("t0", 5),
    ("t1", 6),
    ("t2", 7),
    ("s0", 8),
    ("fp", 8),
    ("s1", 9),
    ("a0", 10),
    ("a1", 11),
    ("a2", 12),
    ("a3", 13),
    ("a4", 14),
    ("a5", 15),
    ("a6", 16),
    ("a7", 17),
    ("s2", 18),
    ("s3", 19),
    ("s4", 20),
    ("s5", 21),
    ("s6", 22),
    ("s7", 23),
    ("s8", 24),
    ("s9", 25),
    ("s10", 26),
    ("s11", 27),
    ("t3", 28),
    ("t4", 29),
    ("t5", 30),
    ("t6", 31),
];

/// The name printed for each register index.
///
/// `x8` prints as `s0`, keeping it in the saved-register family (`s0`..`s11`).
const CANONICAL_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// A RISC-V general-purpose register (`x0`..`x31`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(u8);

impl Register {
    /// Number of general-purpose registers.
    pub const COUNT: usize = 32;

    /// Create a register from its index.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::RegisterIndexOutOfRange`] unless `0 <= index <= 31`.
    pub fn from_index(index: i64) -> Result<Self, DialectError> {
        match u8::try_from(index) {
            Ok(num) if (num as usize) < Self::COUNT => Ok(Self(num)),
            _ => Err(DialectError::RegisterIndexOutOfRange { index }),
        }
    }

    /// Parse a register name.
    ///
    /// Accepts ABI mnemonics (`zero`, `ra`, `sp`, `a0`, `s0`, `fp`, ...) and the
    /// raw form `x<N>` with one or more decimal digits.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnknownRegisterName`] for anything else, or
    /// [`DialectError::RegisterIndexOutOfRange`] for `x<N>` with `N > 31`.
    pub fn from_name(name: &str) -> Result<Self, DialectError> {
        if let Some(&(_, index)) = ABI_NAMES.iter().find(|(abi, _)| *abi == name) {
            return Ok(Self(index));
        }
        match name.strip_prefix('x') {
            Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                // Digit strings too long for i64 are still just out of range.
                let index = digits.parse::<i64>().unwrap_or(i64::MAX);
                Self::from_index(index)
            }
            _ => Err(DialectError::UnknownRegisterName {
                name: name.to_string(),
            }),
        }
    }

    /// Register index (0-31).
    pub fn index(&self) -> u8 {
        self.0
    }

    /// Canonical ABI name of this register.
    pub fn abi_name(&self) -> &'static str {
        CANONICAL_NAMES[self.0 as usize]
    }

    /// Raw numeric name, `x<N>`.
    pub fn numeric_name(&self) -> String {
        alloc::format!("x{}", self.0)
    }

    /// Iterate over all 32 registers in index order.
    pub fn all() -> impl Iterator<Item = Register> {
        (0..Self::COUNT as u8).map(Register)
    }
}

// Named registers
impl Register {
    pub const ZERO: Register = Register(0);
    pub const RA: Register = Register(1);
    pub const SP: Register = Register(2);
    pub const GP: Register = Register(3);
    pub const TP: Register = Register(4);
    pub const T0: Register = Register(5);
    pub const T1: Register = Register(6);
    pub const T2: Register = Register(7);
    pub const S0: Register = Register(8);
    pub const FP: Register = Register(8);
    pub const S1: Register = Register(9);
    pub const A0: Register = Register(10);
    pub const A1: Register = Register(11);
    pub const A2: Register = Register(12);
    pub const A3: Register = Register(13);
    pub const A4: Register = Register(14);
    pub const A5: Register = Register(15);
    pub const A6: Register = Register(16);
    pub const A7: Register = Register(17);
    pub const S2: Register = Register(18);
    pub const S3: Register = Register(19);
    pub const S4: Register = Register(20);
    pub const S5: Register = Register(21);
    pub const S6: Register = Register(22);
    pub const S7: Register = Register(23);
    pub const S8: Register = Register(24);
    pub const S9: Register = Register(25);
    pub const S10: Register = Register(26);
    pub const S11: Register = Register(27);
    pub const T3: Register = Register(28);
    pub const T4: Register = Register(29);
    pub const T5: Register = Register(30);
    pub const T6: Register = Register(31);
}

impl TryFrom<i64> for Register {
    type Error = DialectError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

impl FromStr for Register {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abi_name())
    }
}
