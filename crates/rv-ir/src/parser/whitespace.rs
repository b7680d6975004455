//! Whitespace and comment parsing utilities.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{multispace1, space0},
    combinator::{map, recognize},
    multi::many0,
    sequence::pair,
};

use super::error::PResult;

/// `//` to end of line
fn line_comment(input: &str) -> PResult<'_, &str> {
    recognize(pair(tag("//"), take_till(|c| c == '\n')))(input)
}

/// Whitespace (spaces, tabs, newlines) and `//` comments - returns the matched string
pub(crate) fn blank_space(input: &str) -> PResult<'_, &str> {
    recognize(many0(alt((
        map(multispace1, |_| ()),
        map(line_comment, |_| ()),
    ))))(input)
}

/// Whitespace and comments, discarded.
/// This is the separator used throughout the generic format.
pub(crate) fn blank(input: &str) -> PResult<'_, ()> {
    map(blank_space, |_| ())(input)
}

/// Spaces and tabs only; assembly statements do not span lines.
pub(crate) fn inline(input: &str) -> PResult<'_, ()> {
    map(space0, |_| ())(input)
}

/// Strip a `#` comment from one line of assembly, ignoring `#` inside quotes.
pub(crate) fn strip_hash_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_space() {
        assert_eq!(blank_space("   "), Ok(("", "   ")));
        assert_eq!(blank_space("\n\t  "), Ok(("", "\n\t  ")));
        assert_eq!(blank_space("  \"riscv"), Ok(("\"riscv", "  ")));
        assert_eq!(blank_space(""), Ok(("", "")));
    }

    #[test]
    fn test_blank_skips_comments() {
        assert_eq!(blank("// one\n  // two\n  x"), Ok(("x", ())));
        assert_eq!(blank("// trailing"), Ok(("", ())));
        assert_eq!(blank("/ x"), Ok(("/ x", ())));
    }

    #[test]
    fn test_inline_stops_at_newline() {
        assert_eq!(inline(" \t\nx"), Ok(("\nx", ())));
    }

    #[test]
    fn test_strip_hash_comment() {
        assert_eq!(strip_hash_comment("addi a0, a0, 1 # bump"), "addi a0, a0, 1 ");
        assert_eq!(strip_hash_comment("# whole line"), "");
        assert_eq!(strip_hash_comment(".string \"a#b\" # c"), ".string \"a#b\" ");
        assert_eq!(strip_hash_comment(".string \"a\\\"#\""), ".string \"a\\\"#\"");
        assert_eq!(strip_hash_comment("ret"), "ret");
    }
}
