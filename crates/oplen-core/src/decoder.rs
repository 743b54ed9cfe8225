//! The length decoding driver.
//!
//! Phases run in a fixed order: prefix scan, VEX-family classification,
//! 3DNow! detection, legacy opcode fetch, explicit special cases, then the
//! table-driven trailing-byte walk. Every phase reads through the same
//! bounded cursor, so the reported length is simply the cursor offset at the
//! end.

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::instruction::Instruction;
use crate::mode::MachineMode;
use crate::modrm::ModRM;
use crate::opcodes;
use crate::prefix::Prefixes;
use crate::vex::VexKind;

/// All 3DNow! instructions live in map 4.
const OPCODE_MAP_3DNOW: u8 = 4;

/// Decodes the length and structural attributes of the first instruction in
/// `bytes`, using the default 255-byte window.
pub fn disassemble(bytes: &[u8], mode: MachineMode) -> Result<Instruction, DecodeError> {
    disassemble_bounded(bytes, mode, u8::MAX)
}

/// Decodes the first instruction in `bytes`, reading at most `max_length`
/// bytes. The cursor never advances past `max_length` or the end of the
/// slice, whichever comes first.
pub fn disassemble_bounded(
    bytes: &[u8],
    mode: MachineMode,
    max_length: u8,
) -> Result<Instruction, DecodeError> {
    let mut cursor = ByteCursor::new(bytes, max_length);

    let prefixes = Prefixes::scan(&mut cursor, mode == MachineMode::LongMode);

    let mut insn = Instruction {
        length: 0,
        opcode_map: 0,
        opcode: 0,
        address_bits: 0,
        operand_bits: 0,
        operand_override_prefix: prefixes.operand_override,
        address_override_prefix: prefixes.address_override,
        operand_size_override: prefixes.wide_operand,
        is_vex: false,
        is_3dnow: false,
    };

    if cursor.is_empty() {
        return Err(DecodeError::NoMoreData);
    }

    if let Some(kind) = VexKind::classify(mode, &cursor) {
        insn.is_vex = true;
        let fields = kind.parse(&mut cursor)?;
        insn.opcode_map = fields.opcode_map;
        if let Some(wide) = fields.wide_operand {
            insn.operand_size_override = wide;
        }
        insn.opcode = cursor.next().ok_or(DecodeError::NoMoreData)?;
    }

    insn.address_bits = mode.address_bits(insn.address_override_prefix);
    insn.operand_bits = mode.operand_bits(insn.operand_size_override, insn.operand_override_prefix);
    let sixteen_bit = insn.address_bits == 16;

    if !insn.is_vex {
        if is_3dnow(&cursor) {
            insn.is_3dnow = true;
            handle_3dnow(&mut cursor, sixteen_bit, &mut insn)?;
            insn.length = cursor.offset();
            return Ok(insn);
        }

        fetch_opcode(&mut cursor, &mut insn)?;
    }

    if handle_explicitly(&mut cursor, &insn, mode)? {
        insn.length = cursor.offset();
        return Ok(insn);
    }

    let info =
        opcodes::lookup(insn.opcode_map, insn.opcode).ok_or(DecodeError::UnknownInstruction)?;

    let mut displacement = 0;
    if info.modrm {
        let (_, implied) = ModRM::parse(&mut cursor, sixteen_bit)?;
        displacement = implied;
    }

    if info.disp_asz && !cursor.consume(usize::from(insn.address_bits / 8)) {
        return Err(DecodeError::NoMoreData);
    }
    if info.disp_osz && !cursor.consume(usize::from((insn.operand_bits / 8).min(4))) {
        return Err(DecodeError::NoMoreData);
    }
    if !cursor.consume(usize::from(displacement)) {
        return Err(DecodeError::NoMoreData);
    }
    if !cursor.consume(usize::from(info.fixed)) {
        return Err(DecodeError::NoMoreData);
    }
    if info.imm_osz && !cursor.consume(usize::from((insn.operand_bits / 8).min(4))) {
        return Err(DecodeError::NoMoreData);
    }
    if info.uimm_osz && !cursor.consume(usize::from(insn.operand_bits / 8)) {
        return Err(DecodeError::NoMoreData);
    }

    insn.length = cursor.offset();
    Ok(insn)
}

/// `0F 0F`: the 3DNow! escape. The actual opcode byte sits *after* the
/// ModR/M, SIB and displacement.
fn is_3dnow(cursor: &ByteCursor<'_>) -> bool {
    cursor.has(2) && cursor.peek(0) == Some(0x0F) && cursor.peek(1) == Some(0x0F)
}

fn handle_3dnow(
    cursor: &mut ByteCursor<'_>,
    sixteen_bit: bool,
    insn: &mut Instruction,
) -> Result<(), DecodeError> {
    cursor.consume(2); // the 0F 0F escape, guaranteed by is_3dnow

    let (_, displacement) = ModRM::parse(cursor, sixteen_bit)?;
    if !cursor.consume(usize::from(displacement)) {
        return Err(DecodeError::NoMoreData);
    }

    insn.opcode_map = OPCODE_MAP_3DNOW;
    insn.opcode = cursor.next().ok_or(DecodeError::NoMoreData)?;
    Ok(())
}

/// Reads 1..=3 opcode bytes, honoring the `0F`, `0F 38` and `0F 3A` escapes.
fn fetch_opcode(cursor: &mut ByteCursor<'_>, insn: &mut Instruction) -> Result<(), DecodeError> {
    let first = cursor.next().ok_or(DecodeError::NoMoreData)?;
    if first != 0x0F {
        insn.opcode = first;
        insn.opcode_map = 0;
        return Ok(());
    }

    let second = cursor.next().ok_or(DecodeError::NoMoreData)?;
    if second != 0x38 && second != 0x3A {
        insn.opcode = second;
        insn.opcode_map = 1;
        return Ok(());
    }

    let third = cursor.next().ok_or(DecodeError::NoMoreData)?;
    insn.opcode = third;
    insn.opcode_map = if second == 0x38 { 2 } else { 3 };
    Ok(())
}

/// Opcodes whose trailing bytes the range tables cannot express. Returns
/// `Ok(true)` when the opcode was claimed and fully consumed.
fn handle_explicitly(
    cursor: &mut ByteCursor<'_>,
    insn: &Instruction,
    mode: MachineMode,
) -> Result<bool, DecodeError> {
    let sixteen_bit = insn.address_bits == 16;

    if insn.opcode_map == 0 && (insn.opcode == 0xF6 || insn.opcode == 0xF7) {
        // Group 3: only the TEST sub-opcodes (reg 0 and 1) carry an
        // immediate; NOT/NEG/MUL/DIV do not.
        let (modrm, displacement) = ModRM::parse(cursor, sixteen_bit)?;
        if !cursor.consume(usize::from(displacement)) {
            return Err(DecodeError::NoMoreData);
        }
        if modrm.reg <= 0b001 {
            let immediate = if insn.opcode == 0xF7 {
                (insn.operand_bits / 8).min(4)
            } else {
                1
            };
            if !cursor.consume(usize::from(immediate)) {
                return Err(DecodeError::NoMoreData);
            }
        }
        return Ok(true);
    }

    if insn.opcode_map == 0 && insn.opcode == 0xA1 {
        // MOV rAX, moffs ignores every size prefix; the absolute offset is
        // mode-sized.
        let moffs = match mode {
            MachineMode::Virtual8086 => 2,
            MachineMode::LongCompatibility => 4,
            MachineMode::LongMode => 8,
        };
        if !cursor.consume(moffs) {
            return Err(DecodeError::NoMoreData);
        }
        return Ok(true);
    }

    if insn.opcode_map == 1 && insn.opcode == 0x78 && !insn.is_vex {
        // EXTRQ/INSERTQ carry two 1-byte immediates after the ModR/M. The
        // register-form VMREAD shares the opcode and currently gets the same
        // treatment. TODO split VMREAD off by its mandatory-prefix class.
        let (_, displacement) = ModRM::parse(cursor, sixteen_bit)?;
        if !cursor.consume(usize::from(displacement)) {
            return Err(DecodeError::NoMoreData);
        }
        if !cursor.consume(2) {
            return Err(DecodeError::NoMoreData);
        }
        return Ok(true);
    }

    if insn.opcode_map == 0 && (insn.opcode == 0xE8 || insn.opcode == 0xE9) {
        // Near CALL/JMP relative offset. 64-bit mode pins it at 32 bits no
        // matter which prefixes are present.
        let relative = match mode {
            MachineMode::Virtual8086 => 2,
            MachineMode::LongCompatibility => usize::from(insn.operand_bits / 8),
            MachineMode::LongMode => 4,
        };
        if !cursor.consume(relative) {
            return Err(DecodeError::NoMoreData);
        }
        return Ok(true);
    }

    if insn.opcode_map == 1 && (insn.opcode == 0x20 || insn.opcode == 0x21) {
        // MOV from CR/DR: the ModR/M always selects registers, so whatever
        // its mod field hints at, there is no displacement.
        cursor.next().ok_or(DecodeError::NoMoreData)?;
        return Ok(true);
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8], mode: MachineMode) -> Instruction {
        disassemble(bytes, mode).unwrap_or_else(|err| panic!("{err} on {bytes:02x?}"))
    }

    fn length(bytes: &[u8], mode: MachineMode) -> u8 {
        decode(bytes, mode).length
    }

    #[test]
    fn nop() {
        let insn = decode(&[0x90], MachineMode::LongMode);
        assert_eq!(insn.length, 1);
        assert_eq!(insn.opcode_map, 0);
        assert_eq!(insn.opcode, 0x90);
        assert_eq!(insn.address_bits, 64);
        assert_eq!(insn.operand_bits, 32);
    }

    #[test]
    fn mov_rbp_rsp() {
        let insn = decode(&[0x48, 0x89, 0xE5], MachineMode::LongMode);
        assert_eq!(insn.length, 3);
        assert!(insn.operand_size_override);
        assert_eq!(insn.operand_bits, 64);
    }

    #[test]
    fn operand_size_override_nop() {
        let insn = decode(&[0x66, 0x90], MachineMode::LongMode);
        assert_eq!(insn.length, 2);
        assert!(insn.operand_override_prefix);
        assert_eq!(insn.operand_bits, 16);
    }

    #[test]
    fn five_byte_nop() {
        // ModR/M + SIB + disp8.
        assert_eq!(length(&[0x0F, 0x1F, 0x44, 0x00, 0x00], MachineMode::LongMode), 5);
    }

    #[test]
    fn near_jmp_rel32() {
        let insn = decode(&[0xE9, 0x00, 0x00, 0x00, 0x00], MachineMode::LongMode);
        assert_eq!(insn.length, 5);
    }

    #[test]
    fn test_eax_imm32() {
        // Group 3 with reg=000 carries the immediate.
        let insn = decode(&[0xF7, 0xC0, 0x01, 0x00, 0x00, 0x00], MachineMode::LongMode);
        assert_eq!(insn.length, 6);
    }

    #[test]
    fn vzeroupper_two_byte_vex() {
        let insn = decode(&[0xC5, 0xF8, 0x77], MachineMode::LongMode);
        assert_eq!(insn.length, 3);
        assert!(insn.is_vex);
        assert_eq!(insn.opcode_map, 1);
        assert_eq!(insn.opcode, 0x77);
    }

    #[test]
    fn group3_without_immediate() {
        // NEG has reg=011: no immediate after the ModR/M.
        assert_eq!(length(&[0xF7, 0xD8], MachineMode::LongMode), 2);
        assert_eq!(length(&[0xF6, 0xD8], MachineMode::LongMode), 2);
    }

    #[test]
    fn group3_f6_takes_one_immediate_byte() {
        assert_eq!(length(&[0xF6, 0xC1, 0x01], MachineMode::LongMode), 3);
    }

    #[test]
    fn group3_immediate_is_capped_under_rex_w() {
        // TEST RAX, imm32: the immediate stays 4 bytes wide.
        assert_eq!(
            length(&[0x48, 0xF7, 0xC0, 0x01, 0x00, 0x00, 0x00], MachineMode::LongMode),
            7
        );
    }

    #[test]
    fn moffs_load_is_mode_sized_and_ignores_prefixes() {
        assert_eq!(length(&[0xA1, 0x00, 0x20], MachineMode::Virtual8086), 3);
        assert_eq!(
            length(&[0xA1, 0x44, 0x33, 0x22, 0x11], MachineMode::LongCompatibility),
            5
        );
        assert_eq!(
            length(&[0xA1, 1, 2, 3, 4, 5, 6, 7, 8], MachineMode::LongMode),
            9
        );
        // A 66 prefix changes nothing but its own byte.
        assert_eq!(
            length(&[0x66, 0xA1, 0x44, 0x33, 0x22, 0x11], MachineMode::LongCompatibility),
            6
        );
    }

    #[test]
    fn moffs_store_uses_the_address_width_tables() {
        // A2/A3 go through the table path with an address-sized offset.
        assert_eq!(
            length(&[0xA3, 1, 2, 3, 4, 5, 6, 7, 8], MachineMode::LongMode),
            9
        );
        assert_eq!(
            length(&[0x67, 0xA0, 1, 2, 3, 4], MachineMode::LongMode),
            6
        );
    }

    #[test]
    fn near_call_jmp_is_mode_dependent() {
        assert_eq!(length(&[0xE8, 0x10, 0x00], MachineMode::Virtual8086), 3);
        assert_eq!(
            length(&[0xE8, 0, 0, 0, 0], MachineMode::LongCompatibility),
            5
        );
        // Operand-size override shrinks it in 32-bit mode...
        assert_eq!(
            length(&[0x66, 0xE8, 0, 0], MachineMode::LongCompatibility),
            4
        );
        // ...but 64-bit mode always reads 4 bytes.
        assert_eq!(length(&[0x66, 0xE8, 0, 0, 0, 0], MachineMode::LongMode), 6);
    }

    #[test]
    fn mov_from_control_register_has_no_displacement() {
        // The mod=00 encoding would imply a displacement elsewhere.
        assert_eq!(length(&[0x0F, 0x20, 0x05], MachineMode::LongMode), 3);
        assert_eq!(length(&[0x0F, 0x21, 0xC0], MachineMode::LongMode), 3);
    }

    #[test]
    fn mov_to_control_register_is_unknown() {
        // 0F 22/23 have no table entries.
        assert_eq!(
            disassemble(&[0x0F, 0x22, 0xC0], MachineMode::LongMode),
            Err(DecodeError::UnknownInstruction)
        );
    }

    #[test]
    fn extrq_consumes_two_immediates() {
        // 66 0F 78 /0 ib ib
        assert_eq!(
            length(&[0x66, 0x0F, 0x78, 0xC0, 0x03, 0x04], MachineMode::LongMode),
            6
        );
    }

    #[test]
    fn vex_encoded_0f78_falls_through_to_the_tables() {
        // EVEX map 1, opcode 0x78: plain ModR/M, no immediates.
        let insn = decode(&[0x62, 0xF1, 0x7C, 0x48, 0x78, 0xC0], MachineMode::LongMode);
        assert_eq!(insn.length, 6);
        assert!(insn.is_vex);
    }

    #[test]
    fn three_byte_vex() {
        // vbroadcastss xmm0, [rip+0]: map 2, RIP-relative disp32.
        let insn = decode(
            &[0xC4, 0xE2, 0x79, 0x18, 0x05, 0, 0, 0, 0],
            MachineMode::LongMode,
        );
        assert_eq!(insn.length, 9);
        assert_eq!(insn.opcode_map, 2);
        assert_eq!(insn.opcode, 0x18);
        assert!(!insn.operand_size_override);
    }

    #[test]
    fn three_byte_vex_w_bit() {
        let insn = decode(&[0xC4, 0xE2, 0xF9, 0x18, 0xC0], MachineMode::LongMode);
        assert!(insn.operand_size_override);
        assert_eq!(insn.operand_bits, 64);
    }

    #[test]
    fn evex() {
        // vaddps zmm0, zmm0, zmm0.
        let insn = decode(&[0x62, 0xF1, 0x7C, 0x48, 0x58, 0xC0], MachineMode::LongMode);
        assert_eq!(insn.length, 6);
        assert!(insn.is_vex);
        assert_eq!(insn.opcode_map, 1);
        assert_eq!(insn.opcode, 0x58);
    }

    #[test]
    fn xop() {
        // vprotd xmm0, xmm0, 1: map 8 carries an imm8.
        let insn = decode(&[0x8F, 0xE8, 0x78, 0xC2, 0xC0, 0x01], MachineMode::LongMode);
        assert_eq!(insn.length, 6);
        assert!(insn.is_vex);
        assert_eq!(insn.opcode_map, 8);

        // Map 9 has none.
        let insn = decode(&[0x8F, 0xA9, 0xA8, 0x90, 0xC0], MachineMode::LongMode);
        assert_eq!(insn.length, 5);
        assert_eq!(insn.opcode_map, 9);
    }

    #[test]
    fn pop_rm_is_not_xop() {
        let insn = decode(&[0x8F, 0x00], MachineMode::LongMode);
        assert_eq!(insn.length, 2);
        assert!(!insn.is_vex);
        assert_eq!(insn.opcode, 0x8F);
    }

    #[test]
    fn bound_vs_evex_in_compatibility_mode() {
        // BOUND ebx, [eax]: payload top bits rule EVEX out.
        let insn = decode(&[0x62, 0x18, 0, 0, 0, 0], MachineMode::LongCompatibility);
        assert_eq!(insn.length, 2);
        assert!(!insn.is_vex);

        // A real EVEX encoding still decodes as EVEX there.
        let insn = decode(&[0x62, 0xF1, 0x7C, 0x48, 0x58, 0xC0], MachineMode::LongCompatibility);
        assert_eq!(insn.length, 6);
        assert!(insn.is_vex);
    }

    #[test]
    fn lds_vs_vex_in_compatibility_mode() {
        let insn = decode(&[0xC5, 0x10, 0x90], MachineMode::LongCompatibility);
        assert_eq!(insn.length, 2);
        assert!(!insn.is_vex);

        let insn = decode(&[0xC5, 0xF8, 0x77], MachineMode::LongCompatibility);
        assert_eq!(insn.length, 3);
        assert!(insn.is_vex);
    }

    #[test]
    fn short_vex_windows_decode_as_the_legacy_opcodes() {
        // C4 with fewer than 4 readable bytes is LES.
        let insn = decode(&[0xC4, 0x01], MachineMode::LongMode);
        assert_eq!(insn.length, 2);
        assert!(!insn.is_vex);
    }

    #[test]
    fn three_dnow() {
        // pfmul mm0, mm7: opcode byte after the ModR/M.
        let insn = decode(&[0x0F, 0x0F, 0xC7, 0xB4], MachineMode::LongMode);
        assert_eq!(insn.length, 4);
        assert!(insn.is_3dnow);
        assert!(!insn.is_vex);
        assert_eq!(insn.opcode_map, 4);
        assert_eq!(insn.opcode, 0xB4);
    }

    #[test]
    fn three_dnow_with_memory_operand() {
        // pfadd mm1, [rax+0x10]: disp8 sits between ModR/M and the opcode.
        let insn = decode(&[0x0F, 0x0F, 0x48, 0x10, 0x9E], MachineMode::LongMode);
        assert_eq!(insn.length, 5);
        assert_eq!(insn.opcode, 0x9E);
    }

    #[test]
    fn three_dnow_truncated_opcode_is_no_more_data() {
        assert_eq!(
            disassemble(&[0x0F, 0x0F, 0xC7], MachineMode::LongMode),
            Err(DecodeError::NoMoreData)
        );
    }

    #[test]
    fn escape_maps() {
        let insn = decode(&[0x0F, 0x38, 0x18, 0xC0], MachineMode::LongMode);
        assert_eq!(insn.opcode_map, 2);
        assert_eq!(insn.length, 4);

        // palignr xmm0, xmm1, 3.
        let insn = decode(&[0x66, 0x0F, 0x3A, 0x0F, 0xC1, 0x03], MachineMode::LongMode);
        assert_eq!(insn.opcode_map, 3);
        assert_eq!(insn.length, 6);
    }

    #[test]
    fn sixteen_bit_addressing() {
        // mov ax, [si+2]: disp8.
        assert_eq!(length(&[0x8B, 0x44, 0x02], MachineMode::Virtual8086), 3);
        // mov ax, [bx+0x1234]: disp16.
        assert_eq!(length(&[0x8B, 0x87, 0x34, 0x12], MachineMode::Virtual8086), 4);
        // Address-size override switches to 32-bit forms with a SIB.
        assert_eq!(length(&[0x67, 0x8B, 0x04, 0x24], MachineMode::Virtual8086), 4);
    }

    #[test]
    fn sixteen_bit_direct_address_quirk() {
        // mod=00 rm=110 keeps the table's 4-byte displacement; see the note
        // in the ModR/M decoder.
        assert_eq!(
            length(&[0x89, 0x06, 0xAA, 0xBB, 0xCC, 0xDD], MachineMode::Virtual8086),
            6
        );
    }

    #[test]
    fn mov_immediate_widths() {
        assert_eq!(length(&[0xB8, 0x34, 0x12], MachineMode::Virtual8086), 3);
        assert_eq!(length(&[0xB8, 1, 0, 0, 0], MachineMode::LongMode), 5);
        assert_eq!(length(&[0x66, 0xB8, 0x34, 0x12], MachineMode::LongMode), 4);
        // The B8..BF immediate is uncapped: REX.W makes it 8 bytes.
        assert_eq!(
            length(&[0x48, 0xB8, 1, 2, 3, 4, 5, 6, 7, 8], MachineMode::LongMode),
            10
        );
    }

    #[test]
    fn far_pointer_forms() {
        // ptr16:16 and ptr16:32.
        assert_eq!(length(&[0x9A, 0, 0, 0x08, 0], MachineMode::Virtual8086), 5);
        assert_eq!(
            length(&[0xEA, 0, 0, 0, 0, 0x08, 0], MachineMode::LongCompatibility),
            7
        );
    }

    #[test]
    fn rip_relative_call() {
        assert_eq!(
            length(&[0xFF, 0x15, 0x10, 0, 0, 0], MachineMode::LongMode),
            6
        );
    }

    #[test]
    fn conditional_branch_widths() {
        assert_eq!(length(&[0x75, 0x10], MachineMode::LongMode), 2);
        assert_eq!(length(&[0x0F, 0x84, 0, 0, 0, 0], MachineMode::LongMode), 6);
        assert_eq!(length(&[0x0F, 0x84, 0, 0], MachineMode::Virtual8086), 4);
    }

    #[test]
    fn rex_dropped_by_later_legacy_prefix() {
        // 48 66 B8: the REX.W is forgotten, so the immediate is 2 bytes.
        let insn = decode(&[0x48, 0x66, 0xB8, 0x34, 0x12], MachineMode::LongMode);
        assert_eq!(insn.length, 5);
        assert!(!insn.operand_size_override);
        assert_eq!(insn.operand_bits, 16);
    }

    #[test]
    fn unknown_opcode() {
        assert_eq!(
            disassemble(&[0x0F, 0x04], MachineMode::LongMode),
            Err(DecodeError::UnknownInstruction)
        );
        assert_eq!(
            disassemble(&[0x0F, 0x24, 0xC0], MachineMode::LongMode),
            Err(DecodeError::UnknownInstruction)
        );
    }

    #[test]
    fn empty_and_truncated_inputs() {
        assert_eq!(
            disassemble(&[], MachineMode::LongMode),
            Err(DecodeError::NoMoreData)
        );
        // Prefixes alone.
        assert_eq!(
            disassemble(&[0x66, 0x67], MachineMode::LongMode),
            Err(DecodeError::NoMoreData)
        );
        // REX alone.
        assert_eq!(
            disassemble(&[0x48], MachineMode::LongMode),
            Err(DecodeError::NoMoreData)
        );
        // Opcode wants a ModR/M that is not there.
        assert_eq!(
            disassemble(&[0x89], MachineMode::LongMode),
            Err(DecodeError::NoMoreData)
        );
        // Immediate cut short.
        assert_eq!(
            disassemble(&[0xE9, 0x00, 0x00], MachineMode::LongMode),
            Err(DecodeError::NoMoreData)
        );
        assert_eq!(
            disassemble(&[0xB8, 0x01], MachineMode::LongMode),
            Err(DecodeError::NoMoreData)
        );
    }

    #[test]
    fn zero_window_is_no_more_data() {
        assert_eq!(
            disassemble_bounded(&[0x90], MachineMode::LongMode, 0),
            Err(DecodeError::NoMoreData)
        );
    }

    #[test]
    fn window_of_exactly_the_instruction_length_succeeds() {
        let full = disassemble(&[0xE9, 0, 0, 0, 0, 0x90], MachineMode::LongMode).unwrap();
        assert_eq!(full.length, 5);
        let bounded =
            disassemble_bounded(&[0xE9, 0, 0, 0, 0, 0x90], MachineMode::LongMode, 5).unwrap();
        assert_eq!(bounded, full);
        assert_eq!(
            disassemble_bounded(&[0xE9, 0, 0, 0, 0, 0x90], MachineMode::LongMode, 4),
            Err(DecodeError::NoMoreData)
        );
    }

    #[test]
    fn length_equals_bytes_consumed_for_prefixed_forms() {
        let insn = decode(
            &[0x64, 0x66, 0x67, 0x8B, 0x04, 0x25, 0, 0, 0, 0],
            MachineMode::LongMode,
        );
        assert_eq!(insn.length, 10);
        assert!(insn.operand_override_prefix);
        assert!(insn.address_override_prefix);
        assert_eq!(insn.address_bits, 32);
        assert_eq!(insn.operand_bits, 16);
    }

    #[test]
    fn vex_and_3dnow_never_both() {
        let vex = decode(&[0xC5, 0xF8, 0x77], MachineMode::LongMode);
        assert!(vex.is_vex && !vex.is_3dnow);
        let now = decode(&[0x0F, 0x0F, 0xC7, 0xB4], MachineMode::LongMode);
        assert!(now.is_3dnow && !now.is_vex);
    }

    #[test]
    fn high_vex_map_selectors_are_unknown() {
        // mmmmm = 0x1F has no table.
        assert_eq!(
            disassemble(&[0xC4, 0xFF, 0x79, 0x18, 0xC0], MachineMode::LongMode),
            Err(DecodeError::UnknownInstruction)
        );
    }
}
