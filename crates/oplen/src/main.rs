//! oplen - harness around the length disassembler
//!
//! Usage:
//!   oplen decode             Decode hex lines from stdin and print records
//!   oplen check              Compare lengths against the iced-x86 oracle
//!   oplen corpus <binary>    Emit canonicalized encodings from a binary
//!
//! All subcommands take `--bits 16|32|64` (default 64). `check` exits with
//! the number of mismatching lines, saturated at 255, so it can drive a test
//! script directly.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use iced_x86::{Decoder, DecoderError, DecoderOptions, OpKind};
use oplen_core::MachineMode;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

/// Window handed to the oracle when walking a binary; comfortably larger
/// than any instruction.
const CORPUS_WINDOW: usize = 32;

#[derive(Parser)]
#[command(name = "oplen")]
#[command(about = "x86 instruction length harness", long_about = None)]
struct Cli {
    /// CPU mode: 16, 32 or 64
    #[arg(short, long, default_value_t = 64, global = true)]
    bits: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode hex-encoded instructions from stdin, one per line
    Decode,
    /// Decode hex lines with both the core and the oracle and report length
    /// disagreements; the exit code is the mismatch count
    Check,
    /// Walk a binary file, canonicalize operand bytes and emit each distinct
    /// encoding as a hex line
    Corpus {
        /// Path to the binary file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let mode = machine_mode(cli.bits)?;
    match cli.command {
        Commands::Decode => cmd_decode(mode),
        Commands::Check => cmd_check(mode, u32::from(cli.bits)),
        Commands::Corpus { file } => cmd_corpus(u32::from(cli.bits), &file),
    }
}

fn machine_mode(bits: u8) -> Result<MachineMode> {
    Ok(match bits {
        16 => MachineMode::Virtual8086,
        32 => MachineMode::LongCompatibility,
        64 => MachineMode::LongMode,
        other => bail!("expected 16, 32 or 64 bits, got {other}"),
    })
}

fn parse_hex_line(line: &str) -> Result<Vec<u8>> {
    anyhow::ensure!(
        line.len() % 2 == 0,
        "odd number of hex digits in '{line}'"
    );
    (0..line.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&line[i..i + 2], 16)
                .with_context(|| format!("bad hex byte in '{line}'"))
        })
        .collect()
}

fn cmd_decode(mode: MachineMode) -> Result<i32> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let bytes = parse_hex_line(line)?;
        match oplen_core::disassemble(&bytes, mode) {
            Ok(insn) => println!(
                "{line}: length={} map={} opcode={:#04x} address_bits={} operand_bits={} vex={} 3dnow={}",
                insn.length,
                insn.opcode_map,
                insn.opcode,
                insn.address_bits,
                insn.operand_bits,
                insn.is_vex,
                insn.is_3dnow
            ),
            Err(err) => println!("{line}: error: {err}"),
        }
    }
    Ok(0)
}

fn cmd_check(mode: MachineMode, bitness: u32) -> Result<i32> {
    let mut failed: u8 = 0;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let bytes = parse_hex_line(line)?;

        // Encodings the oracle rejects prove nothing about lengths.
        let mut decoder = Decoder::with_ip(bitness, &bytes, 0, DecoderOptions::NONE);
        let oracle = decoder.decode();
        if decoder.last_error() != DecoderError::None {
            continue;
        }

        match oplen_core::disassemble(&bytes, mode) {
            Ok(insn) if usize::from(insn.length) == oracle.len() => {}
            Ok(insn) => {
                eprintln!("expected {} but got {} on {}", oracle.len(), insn.length, line);
                failed = failed.saturating_add(1);
            }
            Err(err) => {
                eprintln!("disassembly of '{line}' failed: {err}");
                failed = failed.saturating_add(1);
            }
        }
    }

    Ok(i32::from(failed))
}

fn cmd_corpus(bitness: u32, file: &PathBuf) -> Result<i32> {
    let data = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let mut seen = HashSet::new();
    let mut offset = 0usize;

    while offset + CORPUS_WINDOW <= data.len() {
        let mut window = [0u8; CORPUS_WINDOW];
        window.copy_from_slice(&data[offset..offset + CORPUS_WINDOW]);

        let mut decoder = Decoder::with_ip(bitness, &window, 0, DecoderOptions::NONE);
        let instruction = decoder.decode();
        if decoder.last_error() != DecoderError::None {
            offset += 1;
            continue;
        }
        let length = instruction.len();

        // Blank memory displacements and relative branch offsets so distinct
        // addresses collapse onto one canonical encoding.
        let offsets = decoder.get_constant_offsets(&instruction);
        if offsets.has_displacement() {
            let start = offsets.displacement_offset();
            for byte in &mut window[start..start + offsets.displacement_size()] {
                *byte = 0x41;
            }
        }
        let relative = matches!(
            instruction.op0_kind(),
            OpKind::NearBranch16 | OpKind::NearBranch32 | OpKind::NearBranch64
        );
        if relative {
            if offsets.has_immediate() {
                let start = offsets.immediate_offset();
                for byte in &mut window[start..start + offsets.immediate_size()] {
                    *byte = 0x41;
                }
            }
            if offsets.has_immediate2() {
                let start = offsets.immediate_offset2();
                for byte in &mut window[start..start + offsets.immediate_size2()] {
                    *byte = 0x41;
                }
            }
        }

        let hex: String = window[..length].iter().map(|b| format!("{b:02x}")).collect();
        let mut hasher = DefaultHasher::new();
        hex.hash(&mut hasher);
        if seen.insert(hasher.finish()) {
            println!("{hex}");
        }

        offset += length;
    }

    Ok(0)
}
