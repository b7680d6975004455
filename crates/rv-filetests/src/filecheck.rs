//! Filecheck matching for assembly listings
//!
//! Listings are normalized before matching: `#` comments, indentation and
//! blank lines are dropped, so directives are written against bare statements.

use ::filecheck::{Checker, CheckerBuilder, NO_VARIABLES};

/// Build a filechecker from directive lines such as `check: main:`
pub fn build_filechecker(directives: &str) -> Result<Checker, String> {
    let mut builder = CheckerBuilder::new();

    for line in directives.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        builder
            .directive(trimmed)
            .map_err(|e| format!("Failed to parse filecheck directive '{}': {}", trimmed, e))?;
    }

    Ok(builder.finish())
}

/// The part of an assembly line before any `#` outside a string literal.
fn strip_asm_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// One statement per line with comments and indentation removed
pub fn normalize_listing(asm: &str) -> String {
    let mut out = String::new();
    for statement in asm.lines().map(|l| strip_asm_comment(l).trim()) {
        if !statement.is_empty() {
            out.push_str(statement);
            out.push('\n');
        }
    }
    out
}

/// Match an assembly listing against filecheck directives
pub fn match_listing(asm: &str, directives: &str) -> Result<(), String> {
    let checker = build_filechecker(directives)?;
    let listing = normalize_listing(asm);

    if checker
        .check(&listing, NO_VARIABLES)
        .map_err(|e| format!("Filecheck error: {}", e))?
    {
        Ok(())
    } else {
        let (_, explain) = checker
            .explain(&listing, NO_VARIABLES)
            .map_err(|e| format!("Failed to get filecheck explanation: {}", e))?;

        Err(format!("Filecheck failed:\n{}", explain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match() {
        let asm = "main:\n\tli a0, 0\n\tret\n";
        assert!(match_listing(asm, "check: main:\nnextln: li a0, 0\nnextln: ret").is_ok());
        assert!(match_listing(asm, "check: main:\nnextln: ret").is_err());
    }

    #[test]
    fn test_comments_and_indentation_are_ignored() {
        let asm = "# entry\nmain:\n    li a0, 0   # zero\n\n\t\tret\n";
        assert_eq!(normalize_listing(asm), "main:\nli a0, 0\nret\n");
        assert!(match_listing(asm, "check: main:\nnextln: li a0, 0\nnextln: ret").is_ok());
        assert!(match_listing(asm, "check: zero").is_err());
    }

    #[test]
    fn test_hash_inside_string_is_kept() {
        assert_eq!(strip_asm_comment(r#".ascii "a # b" # tail"#), r#".ascii "a # b" "#);
        assert_eq!(strip_asm_comment(r##".ascii "q\"#" # tail"##), r##".ascii "q\"#" "##);
        assert!(match_listing(".ascii \"a # b\"\n", "check: .ascii \"a # b\"").is_ok());
    }
}
