//! Integration tests for the Lilt CLI.
//!
//! These tests invoke the `lilt` binary as a subprocess and check exit
//! codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn lilt() -> Command {
    Command::cargo_bin("lilt").unwrap()
}

/// Helper: assemble source text, returning the path to the .liltb output.
fn assemble_to_temp(dir: &TempDir, source: &str) -> PathBuf {
    let input = dir.path().join("test.lilt");
    let output = dir.path().join("test.liltb");
    fs::write(&input, source).unwrap();
    lilt()
        .args([
            "asm",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    output
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    lilt()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: lilt"));
}

#[test]
fn help_flag_exits_0() {
    lilt()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    lilt()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown command"));
}

// ---- asm ----

#[test]
fn asm_simple_program() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("test.lilt");
    let output = dir.path().join("test.liltb");
    fs::write(&input, "push_int64 50\nhalt\n").unwrap();

    lilt()
        .args([
            "asm",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("assembled"));

    assert!(output.exists());
    let bytes = fs::read(&output).unwrap();
    // 2-byte header + push_int64(2) + halt(1)
    assert_eq!(bytes.len(), 5);
}

#[test]
fn asm_default_output_name() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("prog.lilt");
    fs::write(&input, "halt\n").unwrap();

    lilt()
        .args(["asm", input.to_str().unwrap()])
        .assert()
        .success();

    assert!(dir.path().join("prog.liltb").exists());
}

#[test]
fn asm_appends_extension_for_other_names() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("prog.txt");
    fs::write(&input, "halt\n").unwrap();

    lilt()
        .args(["asm", input.to_str().unwrap()])
        .assert()
        .success();

    assert!(dir.path().join("prog.txt.liltb").exists());
}

#[test]
fn asm_bad_input_exits_1() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.lilt");
    fs::write(&input, "frobnicate\n").unwrap();

    lilt()
        .args(["asm", input.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid instruction"));
}

#[test]
fn asm_reports_error_position() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.lilt");
    fs::write(&input, "halt\njump nowhere\n").unwrap();

    lilt()
        .args(["asm", input.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn asm_missing_file_exits_1() {
    lilt()
        .args(["asm", "nonexistent.lilt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

// ---- run ----

#[test]
fn run_prints_program_output() {
    let dir = TempDir::new().unwrap();
    let image = assemble_to_temp(&dir, "push_uint8 65 print_ch halt\n");

    lilt()
        .args(["run", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn run_variable_program() {
    let dir = TempDir::new().unwrap();
    let image = assemble_to_temp(&dir, "var x push_int64 10 store x load x print halt\n");

    lilt()
        .args(["run", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout("10");
}

#[test]
fn run_runtime_error_exits_2() {
    let dir = TempDir::new().unwrap();
    let image = assemble_to_temp(&dir, "push_int64 1 push_zero div halt\n");

    lilt()
        .args(["run", image.to_str().unwrap()])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn run_invalid_image_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.liltb");
    // Header says entry -1.
    fs::write(&path, [0x01, 0x00]).unwrap();

    lilt()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid image"));
}

#[test]
fn run_missing_file_exits_1() {
    lilt()
        .args(["run", "nonexistent.liltb"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

// ---- disasm ----

#[test]
fn disasm_outputs_reassemblable_text() {
    let dir = TempDir::new().unwrap();
    let image = assemble_to_temp(&dir, "var x push_int64 10 store x load x print halt\n");

    lilt()
        .args(["disasm", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout("var v0\npush_int64 10\nstore v0\nload v0\nprint\nhalt\n");
}

#[test]
fn disasm_labels_branch_targets() {
    let dir = TempDir::new().unwrap();
    let image = assemble_to_temp(&dir, ":loop nop jump loop\n");

    lilt()
        .args(["disasm", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(":l0"))
        .stdout(predicate::str::contains("jump l0"));
}

#[test]
fn disasm_garbage_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("junk.liltb");
    fs::write(&path, [0x00, 0x00, 0xee]).unwrap();

    lilt()
        .args(["disasm", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

// ---- full pipeline ----

#[test]
fn asm_then_run_then_disasm() {
    let dir = TempDir::new().unwrap();
    let source = "\
var i
push_int64 3
store i
:loop
load i
jump_false end
load i
print
load i
dec
store i
jump loop
:end
halt
";
    let image = assemble_to_temp(&dir, source);

    lilt()
        .args(["run", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout("321");

    // Disassemble, reassemble, and the program must still behave the same.
    let output = lilt()
        .args(["disasm", image.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let round = dir.path().join("round.lilt");
    fs::write(&round, output).unwrap();
    let round_image = dir.path().join("round.liltb");
    lilt()
        .args([
            "asm",
            round.to_str().unwrap(),
            "-o",
            round_image.to_str().unwrap(),
        ])
        .assert()
        .success();
    lilt()
        .args(["run", round_image.to_str().unwrap()])
        .assert()
        .success()
        .stdout("321");
}
