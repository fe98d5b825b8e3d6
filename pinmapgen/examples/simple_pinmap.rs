//! Simple pinmap example: build a pinmap from a raw-nets JSON file and print it.

use pinmapgen::prelude::*;
use pinmapgen::PinmapGenCore;
use std::path::Path;

fn main() -> Result<(), PinmapError> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/rp2040_board.json".to_string());
    let mcu = args.next().unwrap_or_else(|| "rp2040".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_pinmap [path/to/nets.json] [mcu]");
        std::process::exit(1);
    }

    let pinmap = PinmapGenCore::build_from_file(path, &mcu, &PinmapOptions::default())?;

    println!("Pinmap for {} ({} nets)", pinmap.mcu, pinmap.metadata.total_nets);
    println!();
    for (net, assignment) in &pinmap.pins {
        println!(
            "  {:<14} {:<10} {}",
            net,
            assignment.pins.join(","),
            assignment.description
        );
    }

    if !pinmap.differential_pairs.is_empty() {
        println!();
        println!("Differential pairs:");
        for pair in &pinmap.differential_pairs {
            println!("  {} / {}", pair.positive, pair.negative);
        }
    }

    let diagnostics = pinmap.diagnostics();
    if !diagnostics.errors.is_empty() {
        println!();
        println!("ERRORS:");
        for error in &diagnostics.errors {
            println!("  - {}", error.message);
        }
    }
    if !diagnostics.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &diagnostics.warnings {
            println!("  - {}", warning.message);
        }
    }

    Ok(())
}
