//! Integration tests for building, printing and parsing RISC-V dialect programs.
//!
//! Programs are built with the constructor API, printed in both text formats,
//! parsed back with a registry, and compared.

use rv_ir::{
    parse_assembly, parse_op, parse_program, print_assembly, register_dialect, verify_labels,
    AsmConfig, Attribute, DialectError, Instruction, IntegerAttr, LabelAttr, Offset, Op, Opcode,
    Program, Register, RegisterAttr, RegisterStyle, Registry, Shape, VerifyOptions,
};

fn registry() -> Registry {
    Registry::riscv().expect("fresh registry")
}

/// Sum the integers 1..=n, leaving the result in a0.
fn sum_program() -> Program {
    build_sum_program().expect("valid program")
}

fn build_sum_program() -> Result<Program, DialectError> {
    Ok(Program::new()
        .directive("text", "")?
        .directive("globl", "sum")?
        .label("sum")?
        .inst(Instruction::mv(Register::T0, Register::A0))
        .inst(Instruction::li(Register::A0, 0))
        .label("loop")?
        .inst(Instruction::beqz(Register::T0, "done")?)
        .inst(Instruction::add(Register::A0, Register::A0, Register::T0))
        .inst(Instruction::addi(Register::T0, Register::T0, -1))
        .inst(Instruction::jal(Register::ZERO, "loop")?)
        .label("done")?
        .inst(Instruction::ret()))
}

/// One instance of every opcode in the catalog.
fn every_opcode() -> Program {
    let mut program = Program::new();
    for opcode in Opcode::ALL {
        let attrs = opcode.shape().slots().iter().map(|slot| {
            let attr = match slot.kind {
                rv_ir::SlotKind::Register => Attribute::from(Register::A3),
                rv_ir::SlotKind::Immediate => Attribute::from(IntegerAttr::i64(-20)),
                rv_ir::SlotKind::Offset => Attribute::from(LabelAttr::new("target").unwrap()),
            };
            (slot.name, attr)
        });
        program.push(Instruction::from_attributes(*opcode, attrs).unwrap());
    }
    program.label("target").unwrap()
}

#[test]
fn test_generic_roundtrip() {
    let registry = registry();
    for program in [sum_program(), every_opcode()] {
        let text = format!("{}", program);
        let parsed = parse_program(&text, &registry)
            .unwrap_or_else(|e| panic!("failed to parse:\n{}\n{}", text, e));
        assert_eq!(parsed, program);
    }
}

#[test]
fn test_assembly_roundtrip() {
    let registry = registry();
    for config in [
        AsmConfig::default(),
        AsmConfig::new()
            .with_indent("    ")
            .with_register_style(RegisterStyle::Numeric),
    ] {
        for program in [sum_program(), every_opcode()] {
            let text = print_assembly(&program, &config);
            let parsed = parse_assembly(&text, &registry)
                .unwrap_or_else(|e| panic!("failed to parse:\n{}\n{}", text, e));
            assert_eq!(parsed, program);
        }
    }
}

#[test]
fn test_assembly_listing() {
    let expected = "\
.text
.globl sum
sum:
\tmv t0, a0
\tli a0, 0
loop:
\tbeqz t0, done
\tadd a0, a0, t0
\taddi t0, t0, -1
\tjal zero, loop
done:
\tret
";
    assert_eq!(print_assembly(&sum_program(), &AsmConfig::default()), expected);
}

#[test]
fn test_hand_written_assembly() {
    let source = r#"
    # prologue
    .globl main
main:
    addi sp, sp, -16
    sw ra, 12(sp)
    sw s0, 8(sp)
    addi fp, sp, 16     # frame pointer
    lw a0, 0x0(x8)
    call_done:
    lw s0, 8(sp)
    lw ra, 12(sp)
    addi sp, sp, 16
    ret
"#;
    let program = parse_assembly(source, &registry()).unwrap();
    assert_eq!(program.len(), 12);
    assert_eq!(program.labels().collect::<Vec<_>>(), ["main", "call_done"]);
    assert_eq!(
        program.ops[3],
        Op::Inst(Instruction::sw(Register::SP, Register::RA, 12))
    );
    assert_eq!(
        program.ops[5],
        Op::Inst(Instruction::addi(Register::S0, Register::SP, 16))
    );
    assert_eq!(
        program.ops[6],
        Op::Inst(Instruction::lw(Register::A0, Register::FP, 0))
    );
}

#[test]
fn test_register_literal_canonicalization() {
    let registry = registry();
    let canonical = r#""riscv.mv"() {"rd" = !riscv.reg<a0>, "rs" = !riscv.reg<s0>}"#;
    let op = parse_op(canonical, &registry).unwrap();
    assert_eq!(format!("{}", op), canonical);

    let aliased = r#""riscv.mv"() {"rd" = !riscv.reg<x10>, "rs" = !riscv.reg<fp>}"#;
    let op = parse_op(aliased, &registry).unwrap();
    assert_eq!(format!("{}", op), canonical);
}

#[test]
fn test_register_properties() {
    for i in 0..32i64 {
        let reg = Register::from_index(i).unwrap();
        assert_eq!(reg.index() as i64, i);
        assert_eq!(Register::from_name(reg.abi_name()).unwrap().index() as i64, i);
    }
    assert!(Register::from_index(-1).is_err());
    assert!(Register::from_index(32).is_err());
    assert_eq!(Register::from_name("s0").unwrap().index(), 8);
    assert_eq!(Register::from_name("fp").unwrap().index(), 8);
    assert_eq!(Register::from_index(8).unwrap().abi_name(), "s0");
    assert_eq!(Register::from_name("x5").unwrap().index(), 5);
    assert!(Register::from_name("x32").is_err());
    assert!(Register::from_name("bogus").is_err());
}

#[test]
fn test_three_register_shape() {
    let rd = RegisterAttr::new(Register::A0);
    let rs1 = RegisterAttr::new(Register::A1);
    let rs2 = RegisterAttr::new(Register::A2);
    let inst = Instruction::sub(rd, rs1, rs2);
    assert_eq!(
        inst.attributes(),
        vec![
            ("rd", Attribute::from(rd)),
            ("rs1", Attribute::from(rs1)),
            ("rs2", Attribute::from(rs2)),
        ]
    );

    let with_immediate = Instruction::from_attributes(
        Opcode::Sub,
        vec![
            ("rd", Attribute::from(rd)),
            ("rs1", Attribute::from(rs1)),
            ("rs2", Attribute::from(IntegerAttr::i64(1))),
        ],
    );
    assert!(matches!(
        with_immediate,
        Err(DialectError::AttributeKindMismatch { attr: "rs2", .. })
    ));
}

#[test]
fn test_offset_construction_paths() {
    let numeric = Instruction::bne(Register::A0, Register::A1, 100).unwrap();
    let offset = numeric.operands().offset().unwrap();
    assert_eq!(offset, &Offset::Integer(IntegerAttr::i64(100)));
    assert_eq!(offset.as_integer().map(|i| i.width()), Some(64));
    assert!(offset.as_label().is_none());

    let symbolic = Instruction::bne(Register::A0, Register::A1, "L1").unwrap();
    let offset = symbolic.operands().offset().unwrap();
    assert_eq!(offset.as_label().map(|l| l.name()), Some("L1"));
    assert!(offset.as_integer().is_none());
}

#[test]
fn test_immediate_normalization_across_shapes() {
    for opcode in Opcode::ALL {
        if !opcode.shape().slots().iter().any(|s| s.name == "immediate") {
            continue;
        }
        let attrs: Vec<(&str, Attribute)> = opcode
            .shape()
            .slots()
            .iter()
            .map(|slot| match slot.name {
                "immediate" => (slot.name, Attribute::from(IntegerAttr::i64(42))),
                _ => (slot.name, Attribute::from(Register::T1)),
            })
            .collect();
        let inst = Instruction::from_attributes(*opcode, attrs).unwrap();
        assert_eq!(inst.operands().immediate(), Some(IntegerAttr::i64(42)));
    }
    assert_eq!(
        Instruction::lui(Register::A0, 42).operands().immediate(),
        Instruction::sb(Register::A0, Register::A1, 42).operands().immediate()
    );
}

#[test]
fn test_shape_mismatch_via_new() {
    let operands = Instruction::li(Register::A0, 1).operands().clone();
    assert_eq!(
        Instruction::new(Opcode::Jal, operands),
        Err(DialectError::ShapeMismatch {
            opcode: Opcode::Jal,
            expected: Shape::RdOff,
            found: Shape::RdImm,
        })
    );
}

#[test]
fn test_registry_errors() {
    let mut registry = registry();
    assert_eq!(
        register_dialect(&mut registry),
        Err(DialectError::DuplicateRegistration { name: "riscv.reg" })
    );

    let err = parse_program("module {\n  \"riscv.fadd\"()\n}", &registry).unwrap_err();
    assert_eq!(
        err.cause,
        Some(DialectError::UnknownOperation {
            name: "riscv.fadd".into()
        })
    );

    let empty = Registry::new();
    assert!(parse_op("\"riscv.ret\"()", &empty).is_err());
}

#[test]
fn test_label_verifier() {
    assert!(verify_labels(&sum_program(), VerifyOptions::default()).is_ok());

    let broken = sum_program()
        .label("loop")
        .unwrap()
        .inst(Instruction::bnez(Register::A0, "missing").unwrap());
    let errors = verify_labels(&broken, VerifyOptions::default()).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].message.contains("'loop'"));
    assert!(errors[1].message.contains("'missing'"));
}

#[test]
fn test_unprintable_labels_are_rejected() {
    assert_eq!(Program::new().label(""), Err(DialectError::EmptyLabel));
    assert_eq!(LabelAttr::new(""), Err(DialectError::EmptyLabel));
    for bad in ["a>b", "loop start", "9lives"] {
        assert_eq!(
            Program::new().label(bad),
            Err(DialectError::InvalidLabel { label: bad.into() })
        );
        assert!(Instruction::jal(Register::RA, bad).is_err());
        assert!(Instruction::beqz(Register::A0, bad).is_err());
    }

    // Neither text format accepts them either.
    let registry = registry();
    let generic = "module {\n  \"riscv.label\"() {\"label\" = !riscv.label<>}\n}";
    let err = parse_program(generic, &registry).unwrap_err();
    assert_eq!(err.cause, Some(DialectError::EmptyLabel));
    assert!(parse_assembly("loop start:\n", &registry).is_err());
}

#[test]
fn test_directive_values_survive_assembly() {
    assert!(matches!(
        Program::new().directive("ascii", "a # b"),
        Err(DialectError::InvalidDirective { .. })
    ));

    let registry = registry();
    let program = Program::new()
        .directive("ascii", "\"a # b\"")
        .and_then(|p| p.directive("section", ".rodata, \"a\""))
        .and_then(|p| p.label(".L1$data"))
        .unwrap();
    let text = print_assembly(&program, &AsmConfig::default());
    assert_eq!(text, ".ascii \"a # b\"\n.section .rodata, \"a\"\n.L1$data:\n");
    assert_eq!(parse_assembly(&text, &registry).unwrap(), program);
    assert_eq!(parse_program(&program.to_string(), &registry).unwrap(), program);
}
