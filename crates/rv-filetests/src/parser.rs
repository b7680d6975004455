//! Test file parsing

/// A test case extracted from a test file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// The program text, `module { ... }`
    pub program_text: String,
    /// The expected output text (from comments) or directives
    pub expected_text: String,
    /// The test command, e.g. `test cat`
    pub command: String,
}

/// Net brace depth change of one line; braces inside string literals do not count.
fn brace_delta(line: &str) -> i32 {
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in line.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth
}

fn strip_comment_marker(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix("; ")
        .or_else(|| trimmed.strip_prefix(';'))
        .unwrap_or(trimmed)
}

/// Parse a test file and extract programs with their expected outputs
pub fn parse_test_file(content: &str) -> Vec<TestCase> {
    let lines: Vec<&str> = content.lines().collect();
    let mut test_cases = Vec::new();
    let mut i = 0;

    // Parse test command from header
    let mut command = String::new();
    while i < lines.len() {
        let line = lines[i].trim();
        i += 1;
        if line.starts_with("test ") {
            command = String::from(line);
            break;
        }
    }

    while i < lines.len() {
        if !lines[i].trim().starts_with("module") {
            i += 1;
            continue;
        }

        // Find the end of the module (matching braces)
        let program_start = i;
        let mut depth = 0;
        let mut program_end = i;
        for (j, line) in lines.iter().enumerate().skip(i) {
            depth += brace_delta(line);
            program_end = j;
            if depth <= 0 && line.contains('}') {
                break;
            }
        }
        let program_text = lines[program_start..=program_end].join("\n");

        // Expected output: the run of `;` lines after the program. Blank
        // lines may precede it; a blank line after it ends it.
        let mut j = program_end + 1;
        let mut expected = Vec::new();
        while j < lines.len() {
            let line = lines[j].trim();
            if line.starts_with(';') {
                expected.push(strip_comment_marker(line));
            } else if !line.is_empty() || !expected.is_empty() {
                break;
            }
            j += 1;
        }

        test_cases.push(TestCase {
            program_text,
            expected_text: expected.join("\n"),
            command: command.clone(),
        });
        i = j;
    }

    test_cases
}

/// Normalize IR text for comparison
pub fn normalize_ir(ir: &str) -> Vec<String> {
    ir.lines()
        .map(|l| String::from(l.trim()))
        .filter(|l| !l.is_empty())
        .collect()
}
