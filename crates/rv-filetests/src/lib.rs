//! File-based tests for the RISC-V dialect.
//!
//! Similar to Cranelift's filetests, these tests read `.rvir` files that contain:
//! - A test command (`test cat`, `test asm`, `test verifier`)
//! - Programs in the generic format (`module { ... }`)
//! - Expected output or annotations in `;` comments

pub mod filecheck;
pub mod parser;

mod test_asm;
mod test_cat;
mod test_verifier;

pub use self::filecheck::{build_filechecker, match_listing, normalize_listing};
pub use self::parser::{normalize_ir, parse_test_file, TestCase};
