//! Primitive parsers for names, integers, and string literals.

use alloc::string::String;
use core::num::ParseIntError;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, hex_digit1, satisfy},
    combinator::{map, map_res, opt, recognize},
    sequence::{pair, preceded},
};

use super::error::{PResult, RawError};
use crate::attr::{is_symbol_continue, is_symbol_start};

fn to_i64(negative: bool, digits: &str, radix: u32) -> Result<i64, ParseIntError> {
    if negative {
        i64::from_str_radix(&alloc::format!("-{}", digits), radix)
    } else {
        i64::from_str_radix(digits, radix)
    }
}

/// Parse an integer literal: decimal or `0x` hex, optionally negative.
pub(crate) fn integer(input: &str) -> PResult<'_, i64> {
    map_res(
        pair(
            opt(char('-')),
            alt((
                map(preceded(tag_no_case("0x"), hex_digit1), |d| (d, 16)),
                map(digit1, |d| (d, 10)),
            )),
        ),
        |(sign, (digits, radix)): (Option<char>, (&str, u32))| {
            to_i64(sign.is_some(), digits, radix)
        },
    )(input)
}

/// Parse a decimal integer literal only.
pub(crate) fn decimal(input: &str) -> PResult<'_, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// Parse a symbol: labels, mnemonics, directive names (`.L1`, `main`, `addi`).
pub(crate) fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(satisfy(is_symbol_start), take_while(is_symbol_continue)))(input)
}

/// Parse a register name (`a0`, `x10`, `zero`). Validity is checked later.
pub(crate) fn register_name(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(input)
}

/// Parse an attribute name following `!` (`riscv.reg`).
pub(crate) fn attribute_name(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.')(input)
}

/// Parse an integer type (`i64`) and return its width.
pub(crate) fn int_type(input: &str) -> PResult<'_, u32> {
    map_res(preceded(char('i'), digit1), |s: &str| s.parse::<u32>())(input)
}

/// Parse a double-quoted string literal with `\"`, `\\`, `\n`, `\t` escapes.
pub(crate) fn quoted_string(input: &str) -> PResult<'_, String> {
    let (mut rest, _) = char::<_, RawError<'_>>('"')(input)?;
    let mut out = String::new();
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None => return Err(nom::Err::Failure(RawError::expected(rest, "closing '\"'"))),
            Some('"') => return Ok((chars.as_str(), out)),
            Some('\\') => match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                _ => return Err(nom::Err::Failure(RawError::expected(rest, "escape sequence"))),
            },
            Some(c) => out.push(c),
        }
        rest = chars.as_str();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_integer() {
        assert_eq!(integer("42"), Ok(("", 42)));
        assert_eq!(integer("-42"), Ok(("", -42)));
        assert_eq!(integer("0"), Ok(("", 0)));
        assert_eq!(integer("42 "), Ok((" ", 42)));
        assert_eq!(integer("0x10"), Ok(("", 16)));
        assert_eq!(integer("-0XfF)"), Ok((")", -255)));
        assert_eq!(integer("-9223372036854775808"), Ok(("", i64::MIN)));
    }

    #[test]
    fn test_integer_errors() {
        assert!(integer("abc").is_err());
        assert!(integer("-").is_err());
        assert!(integer("9223372036854775808").is_err());
    }

    #[test]
    fn test_decimal_rejects_hex() {
        assert_eq!(decimal("0x10"), Ok(("x10", 0)));
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("main:"), Ok((":", "main")));
        assert_eq!(identifier(".L1 "), Ok((" ", ".L1")));
        assert_eq!(identifier("loop_start,"), Ok((",", "loop_start")));
        assert!(identifier("1abc").is_err());
    }

    #[test]
    fn test_register_name() {
        assert_eq!(register_name("a0, a1"), Ok((", a1", "a0")));
        assert_eq!(register_name("x31)"), Ok((")", "x31")));
    }

    #[test]
    fn test_int_type() {
        assert_eq!(int_type("i64"), Ok(("", 64)));
        assert_eq!(int_type("i12}"), Ok(("}", 12)));
        assert!(int_type("u32").is_err());
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(quoted_string("\"globl\""), Ok(("", "globl".to_string())));
        assert_eq!(quoted_string("\"\", x"), Ok((", x", "".to_string())));
        assert_eq!(
            quoted_string("\"a\\\"b\\n\""),
            Ok(("", "a\"b\n".to_string()))
        );
        assert!(matches!(quoted_string("\"open"), Err(nom::Err::Failure(_))));
        assert!(matches!(quoted_string("\"\\q\""), Err(nom::Err::Failure(_))));
        assert!(matches!(quoted_string("bare"), Err(nom::Err::Error(_))));
    }
}
