//! # oplen-core
//!
//! Length disassembler for 8086 / x86 / x86-64 machine code.
//!
//! Given a byte window and a CPU execution mode, [`disassemble`] reports how
//! many bytes the first encoded instruction spans, plus a handful of
//! structural attributes (opcode map, primary opcode byte, effective
//! address/operand widths, observed prefixes, VEX-family / 3DNow! flags).
//! Operands are never interpreted; this is the layout layer only.
//!
//! Decoding is a pure function over its inputs: no I/O, no allocation, no
//! global state. Callers may decode concurrently on disjoint buffers.

mod cursor;
mod decoder;
mod error;
mod instruction;
mod mode;
mod modrm;
pub mod opcodes;
mod prefix;
mod vex;

pub use decoder::{disassemble, disassemble_bounded};
pub use error::DecodeError;
pub use instruction::Instruction;
pub use mode::MachineMode;

/// Architectural upper bound on the encoded length of one instruction.
///
/// Advisory: the decoder reports whatever the byte stream implies and does
/// not clamp to this value (an over-long prefix run decodes at its literal
/// length). Real CPUs fault on anything longer.
pub const MAX_INSTRUCTION_LEN: usize = 15;
