//! Lilt CLI — assemble, run, and disassemble.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, I/O, decode, or assembly error
//! - 2: Runtime error

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "asm" => commands::asm(&args[2..]),
        "run" => commands::run(&args[2..]),
        "disasm" => commands::disasm(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: lilt <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  asm <input.lilt> [-o output.liltb]   Assemble text to a binary image");
    eprintln!("  run <input.liltb>                    Execute a binary image");
    eprintln!("  disasm <input.liltb>                 Disassemble an image to text");
}
