//! Decoded instruction record.

/// Structural facts about one decoded instruction.
///
/// Only layout-level attributes are reported. The decoder never interprets
/// operands, so there is no mnemonic, register or target information here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Total encoded length in bytes, prefixes included.
    pub length: u8,

    /// Logical opcode-table index: 0 = one-byte map, 1 = `0F`, 2 = `0F 38`,
    /// 3 = `0F 3A`, 4 = 3DNow!, 5..=31 = the raw `mmmmm` selector of a
    /// VEX/EVEX/XOP encoding.
    pub opcode_map: u8,
    /// Final primary opcode byte. For 3DNow! this is the byte *after* the
    /// operand bytes.
    pub opcode: u8,

    /// Effective address width in bits (16, 32 or 64).
    pub address_bits: u8,
    /// Effective operand width in bits (16, 32 or 64).
    pub operand_bits: u8,

    /// A literal `66` prefix byte was present. A `66` merely implied by a
    /// VEX `pp` field does not set this.
    pub operand_override_prefix: bool,
    /// A literal `67` prefix byte was present.
    pub address_override_prefix: bool,

    /// The W bit is in effect, from REX.W or the VEX/EVEX/XOP W bit.
    pub operand_size_override: bool,

    /// Encoded via a VEX, EVEX or XOP prefix.
    pub is_vex: bool,
    /// 3DNow! encoding (`0F 0F`, opcode byte trailing the operands).
    /// Mutually exclusive with `is_vex`.
    pub is_3dnow: bool,
}
