//! CLI command implementations.

use lilt_common::Image;
use std::fs;

/// Assemble a .lilt text file to a .liltb binary image.
pub fn asm(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: asm requires an input file");
        eprintln!("Usage: lilt asm <input.lilt> [-o output.liltb]");
        return Err(1);
    }

    let input = &args[0];

    let output = if args.len() >= 3 && args[1] == "-o" {
        args[2].clone()
    } else if let Some(stem) = input.strip_suffix(".lilt") {
        format!("{stem}.liltb")
    } else {
        format!("{input}.liltb")
    };

    let text = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    let image = lilt_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let bytes = image.encode();

    fs::write(&output, &bytes).map_err(|e| {
        eprintln!("error: cannot write '{output}': {e}");
        1
    })?;

    eprintln!(
        "assembled {} bytes of code ({} slots, entry {}) -> {output}",
        image.code.len(),
        image.slot_count,
        image.entry
    );
    Ok(())
}

/// Execute a .liltb binary image.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: lilt run <input.liltb>");
        return Err(1);
    }

    let image = read_image(&args[0])?;

    lilt_vm::run(&image).map_err(|e| {
        eprintln!("runtime error: {e}");
        2
    })
}

/// Disassemble a .liltb binary image to stdout.
pub fn disasm(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: disasm requires an input file");
        eprintln!("Usage: lilt disasm <input.liltb>");
        return Err(1);
    }

    let image = read_image(&args[0])?;
    let text = lilt_assembler::disassemble(&image).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    print!("{text}");
    Ok(())
}

/// Read and decode a .liltb image file.
fn read_image(path: &str) -> Result<Image, i32> {
    let bytes = fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    Image::decode(&bytes).map_err(|e| {
        eprintln!("error: invalid image: {e}");
        1
    })
}
