//! Parse error types.

use alloc::{
    format,
    string::{String, ToString},
};
use core::{fmt, num::ParseIntError};

use nom::{
    error::{ContextError, ErrorKind, FromExternalError},
    Offset,
};

use crate::error::DialectError;

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the parsed text.
    pub position: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
    /// The dialect-level failure, when the text was well-formed but invalid.
    pub cause: Option<DialectError>,
}

impl ParseError {
    pub(crate) fn at(source: &str, position: usize, message: String) -> Self {
        let position = position.min(source.len());
        let before = &source[..position];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            message,
            position,
            line,
            column,
            cause: None,
        }
    }

    fn with_cause(mut self, cause: DialectError) -> Self {
        self.cause = Some(cause);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause as &(dyn core::error::Error + 'static))
    }
}

/// What went wrong at a [`RawError`] location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawErrorKind {
    Nom(ErrorKind),
    Expected(&'static str),
    Integer,
    Dialect(DialectError),
}

/// The nom error type used by every parser in this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawError<'a> {
    pub input: &'a str,
    pub kind: RawErrorKind,
}

pub(crate) type PResult<'a, T> = nom::IResult<&'a str, T, RawError<'a>>;

impl<'a> RawError<'a> {
    pub fn expected(input: &'a str, what: &'static str) -> Self {
        Self {
            input,
            kind: RawErrorKind::Expected(what),
        }
    }

    pub fn dialect(input: &'a str, err: DialectError) -> Self {
        Self {
            input,
            kind: RawErrorKind::Dialect(err),
        }
    }

    /// Convert to a [`ParseError`] positioned relative to `source`.
    ///
    /// `self.input` must be a subslice of `source`.
    pub fn into_parse_error(self, source: &str) -> ParseError {
        let position = source.offset(self.input);
        let found = describe_input(self.input);
        match self.kind {
            RawErrorKind::Nom(kind) => ParseError::at(
                source,
                position,
                format!("unexpected {} ({})", found, kind.description()),
            ),
            RawErrorKind::Expected(what) => {
                ParseError::at(source, position, format!("expected {}, found {}", what, found))
            }
            RawErrorKind::Integer => {
                ParseError::at(source, position, "integer literal out of range".to_string())
            }
            RawErrorKind::Dialect(err) => {
                ParseError::at(source, position, err.to_string()).with_cause(err)
            }
        }
    }
}

impl<'a> nom::error::ParseError<&'a str> for RawError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: RawErrorKind::Nom(kind),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> ContextError<&'a str> for RawError<'a> {
    // The innermost context wins; it names the most specific construct.
    fn add_context(input: &'a str, ctx: &'static str, other: Self) -> Self {
        match other.kind {
            RawErrorKind::Nom(_) => Self::expected(input, ctx),
            _ => other,
        }
    }
}

impl<'a> FromExternalError<&'a str, DialectError> for RawError<'a> {
    fn from_external_error(input: &'a str, _kind: ErrorKind, e: DialectError) -> Self {
        Self::dialect(input, e)
    }
}

impl<'a> FromExternalError<&'a str, ParseIntError> for RawError<'a> {
    fn from_external_error(input: &'a str, _kind: ErrorKind, _e: ParseIntError) -> Self {
        Self {
            input,
            kind: RawErrorKind::Integer,
        }
    }
}

/// Convert a top-level nom failure.
pub(crate) fn from_nom(source: &str, err: nom::Err<RawError<'_>>) -> ParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.into_parse_error(source),
        nom::Err::Incomplete(_) => ParseError::at(
            source,
            source.len(),
            "unexpected end of input".to_string(),
        ),
    }
}

fn describe_input(input: &str) -> String {
    let line = input.lines().next().unwrap_or("").trim_end();
    if line.is_empty() {
        return if input.trim().is_empty() {
            "end of input".to_string()
        } else {
            "end of line".to_string()
        };
    }
    let snippet: String = line.chars().take(24).collect();
    if snippet.len() < line.len() {
        format!("'{}...'", snippet)
    } else {
        format!("'{}'", snippet)
    }
}
