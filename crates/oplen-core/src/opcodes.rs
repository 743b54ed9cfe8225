//! Opcode length tables.
//!
//! Each opcode map is an ordered list of closed `[from, to]` ranges over the
//! primary opcode byte. Lookup scans linearly and the first hit wins; a miss
//! means the opcode is unknown to the tables. Descriptors only say which
//! trailing fields an opcode carries; they are tuned for positive
//! recognition of valid encodings, not for rejecting invalid ones, so an
//! invalid encoding inside a recognized range decodes to *some* length
//! rather than an error.
//!
//! Group opcodes whose trailing bytes depend on the ModR/M `reg` field
//! (`F6`/`F7`), the mode-sized `A1`/`E8`/`E9` forms and the MOV CR/DR pair
//! are intentionally absent here; the decoder handles them before table
//! lookup.

/// Trailing-byte descriptor for one opcode (or a run of opcodes).
///
/// Stored as plain fields rather than a packed byte so no code depends on a
/// particular bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// A ModR/M byte (with possible SIB and displacement) follows.
    pub modrm: bool,
    /// Count of fixed trailing bytes, 0..=7. Immediates and fixed-size
    /// displacements share this counter; no opcode needs both.
    pub fixed: u8,
    /// Displacement sized by the effective address width.
    pub disp_asz: bool,
    /// Displacement sized by the effective operand width, capped at 4 bytes.
    pub disp_osz: bool,
    /// Immediate sized by the effective operand width, capped at 4 bytes.
    pub imm_osz: bool,
    /// Immediate sized by the effective operand width, uncapped.
    pub uimm_osz: bool,
}

/// A run of opcodes sharing one descriptor.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeRange {
    pub from: u8,
    pub to: u8,
    pub info: OpcodeInfo,
}

const fn info(
    modrm: bool,
    fixed: u8,
    disp_asz: bool,
    disp_osz: bool,
    imm_osz: bool,
    uimm_osz: bool,
) -> OpcodeInfo {
    OpcodeInfo {
        modrm,
        fixed,
        disp_asz,
        disp_osz,
        imm_osz,
        uimm_osz,
    }
}

const fn r(from: u8, to: u8, info: OpcodeInfo) -> OpcodeRange {
    OpcodeRange { from, to, info }
}

/// No trailing bytes at all.
const NONE: OpcodeInfo = info(false, 0, false, false, false, false);
/// ModR/M plus whatever displacement it implies.
const RM: OpcodeInfo = info(true, 0, false, false, false, false);
/// ModR/M followed by one immediate byte.
const RM_IMM8: OpcodeInfo = info(true, 1, false, false, false, false);
/// ModR/M followed by an operand-sized immediate (capped at 4).
const RM_IMMZ: OpcodeInfo = info(true, 0, false, false, true, false);
/// ModR/M followed by a 4-byte immediate (XOP map 0xA).
const RM_IMM32: OpcodeInfo = info(true, 4, false, false, false, false);
/// One immediate byte (also used for rel8 branches).
const IMM8: OpcodeInfo = info(false, 1, false, false, false, false);
/// Two immediate bytes.
const IMM16: OpcodeInfo = info(false, 2, false, false, false, false);
/// `ENTER`: imm16 + imm8.
const IMM16_IMM8: OpcodeInfo = info(false, 3, false, false, false, false);
/// Operand-sized immediate, capped at 4 bytes.
const IMMZ: OpcodeInfo = info(false, 0, false, false, true, false);
/// Operand-sized immediate, uncapped (8 bytes under REX.W).
const IMMV: OpcodeInfo = info(false, 0, false, false, false, true);
/// Address-sized absolute offset (`MOV AL/moffs` family).
const MOFFS: OpcodeInfo = info(false, 0, true, false, false, false);
/// Operand-sized relative branch displacement, capped at 4 bytes.
const RELZ: OpcodeInfo = info(false, 0, false, true, false, false);
/// Far pointer: operand-sized offset plus a 2-byte selector.
const FAR_PTR: OpcodeInfo = info(false, 2, false, true, false, false);

/// Map 0: the legacy one-byte opcode map.
static MAP_ONE_BYTE: &[OpcodeRange] = &[
    r(0x00, 0x03, RM),        // ADD r/m,r forms
    r(0x04, 0x04, IMM8),      // ADD AL, imm8
    r(0x05, 0x05, IMMZ),      // ADD rAX, immz
    r(0x06, 0x07, NONE),      // PUSH/POP ES
    r(0x08, 0x0B, RM),        // OR
    r(0x0C, 0x0C, IMM8),
    r(0x0D, 0x0D, IMMZ),
    r(0x0E, 0x0E, NONE),      // PUSH CS (0F is the escape byte)
    r(0x10, 0x13, RM),        // ADC
    r(0x14, 0x14, IMM8),
    r(0x15, 0x15, IMMZ),
    r(0x16, 0x17, NONE),      // PUSH/POP SS
    r(0x18, 0x1B, RM),        // SBB
    r(0x1C, 0x1C, IMM8),
    r(0x1D, 0x1D, IMMZ),
    r(0x1E, 0x1F, NONE),      // PUSH/POP DS
    r(0x20, 0x23, RM),        // AND (26 is a segment prefix)
    r(0x24, 0x24, IMM8),
    r(0x25, 0x25, IMMZ),
    r(0x27, 0x27, NONE),      // DAA
    r(0x28, 0x2B, RM),        // SUB (2E is a segment prefix)
    r(0x2C, 0x2C, IMM8),
    r(0x2D, 0x2D, IMMZ),
    r(0x2F, 0x2F, NONE),      // DAS
    r(0x30, 0x33, RM),        // XOR (36 is a segment prefix)
    r(0x34, 0x34, IMM8),
    r(0x35, 0x35, IMMZ),
    r(0x37, 0x37, NONE),      // AAA
    r(0x38, 0x3B, RM),        // CMP (3E is a segment prefix)
    r(0x3C, 0x3C, IMM8),
    r(0x3D, 0x3D, IMMZ),
    r(0x3F, 0x3F, NONE),      // AAS
    r(0x40, 0x61, NONE),      // INC/DEC r, PUSH/POP r, PUSHA/POPA
    r(0x62, 0x63, RM),        // BOUND, ARPL / MOVSXD
    r(0x68, 0x68, IMMZ),      // PUSH immz (64..67 are prefixes)
    r(0x69, 0x69, RM_IMMZ),   // IMUL r, r/m, immz
    r(0x6A, 0x6A, IMM8),      // PUSH imm8
    r(0x6B, 0x6B, RM_IMM8),   // IMUL r, r/m, imm8
    r(0x6C, 0x6F, NONE),      // INS/OUTS
    r(0x70, 0x7F, IMM8),      // Jcc rel8
    r(0x80, 0x80, RM_IMM8),   // group 1 r/m8, imm8
    r(0x81, 0x81, RM_IMMZ),   // group 1 r/m, immz
    r(0x82, 0x83, RM_IMM8),   // group 1 imm8 aliases
    r(0x84, 0x8F, RM),        // TEST, XCHG, MOV, LEA, MOV seg, POP r/m
    r(0x90, 0x99, NONE),      // XCHG rAX family, NOP, CBW, CWD
    r(0x9A, 0x9A, FAR_PTR),   // CALL far
    r(0x9B, 0x9F, NONE),      // WAIT, PUSHF/POPF, SAHF/LAHF
    r(0xA0, 0xA0, MOFFS),     // MOV AL, moffs (A1 is handled up front)
    r(0xA2, 0xA3, MOFFS),     // MOV moffs, AL/rAX
    r(0xA4, 0xA7, NONE),      // MOVS/CMPS
    r(0xA8, 0xA8, IMM8),      // TEST AL, imm8
    r(0xA9, 0xA9, IMMZ),      // TEST rAX, immz
    r(0xAA, 0xAF, NONE),      // STOS/LODS/SCAS
    r(0xB0, 0xB7, IMM8),      // MOV r8, imm8
    r(0xB8, 0xBF, IMMV),      // MOV r, immv (8-byte under REX.W)
    r(0xC0, 0xC1, RM_IMM8),   // group 2 shifts, imm8
    r(0xC2, 0xC2, IMM16),     // RET imm16
    r(0xC3, 0xC3, NONE),      // RET
    r(0xC4, 0xC5, RM),        // LES/LDS (VEX is classified earlier)
    r(0xC6, 0xC6, RM_IMM8),   // group 11 MOV r/m8, imm8
    r(0xC7, 0xC7, RM_IMMZ),   // group 11 MOV r/m, immz
    r(0xC8, 0xC8, IMM16_IMM8), // ENTER
    r(0xC9, 0xC9, NONE),      // LEAVE
    r(0xCA, 0xCA, IMM16),     // RETF imm16
    r(0xCB, 0xCC, NONE),      // RETF, INT3
    r(0xCD, 0xCD, IMM8),      // INT imm8
    r(0xCE, 0xCF, NONE),      // INTO, IRET
    r(0xD0, 0xD3, RM),        // group 2 shifts by 1/CL
    r(0xD4, 0xD5, IMM8),      // AAM/AAD
    r(0xD6, 0xD7, NONE),      // SALC, XLAT
    r(0xD8, 0xDF, RM),        // x87 escapes
    r(0xE0, 0xE7, IMM8),      // LOOPcc/JrCXZ rel8, IN/OUT imm8
    r(0xEA, 0xEA, FAR_PTR),   // JMP far (E8/E9 are handled up front)
    r(0xEB, 0xEB, IMM8),      // JMP rel8
    r(0xEC, 0xEF, NONE),      // IN/OUT DX
    r(0xF1, 0xF1, NONE),      // INT1 (F0/F2/F3 are prefixes)
    r(0xF4, 0xF5, NONE),      // HLT, CMC (F6/F7 are handled up front)
    r(0xF8, 0xFD, NONE),      // CLC..STD
    r(0xFE, 0xFF, RM),        // groups 4/5
];

/// Map 1: `0F xx`. Also serves VEX/EVEX encodings selecting `mmmmm = 1`.
static MAP_0F: &[OpcodeRange] = &[
    r(0x00, 0x03, RM),        // groups 6/7, LAR, LSL
    r(0x05, 0x09, NONE),      // SYSCALL, CLTS, SYSRET, INVD, WBINVD
    r(0x0B, 0x0B, NONE),      // UD2
    r(0x0D, 0x0D, RM),        // PREFETCH group
    r(0x0E, 0x0E, NONE),      // FEMMS (0F is the 3DNow! escape)
    r(0x10, 0x1F, RM),        // SSE moves, hint NOPs
    r(0x28, 0x2F, RM),        // MOVAPS..COMISS (20..23 MOV CR/DR excluded)
    r(0x30, 0x35, NONE),      // WRMSR, RDTSC, RDMSR, RDPMC, SYSENTER, SYSEXIT
    r(0x37, 0x37, NONE),      // GETSEC (38/3A are escape bytes)
    r(0x40, 0x4F, RM),        // CMOVcc
    r(0x50, 0x6F, RM),        // SSE/MMX arithmetic and shuffles
    r(0x70, 0x73, RM_IMM8),   // PSHUF*, shift groups 12..14
    r(0x74, 0x76, RM),        // PCMPEQ
    r(0x77, 0x77, NONE),      // EMMS / VZEROUPPER
    r(0x78, 0x7F, RM),        // VMREAD/VMWRITE, MOVD/MOVQ/MOVDQA
    r(0x80, 0x8F, RELZ),      // Jcc relz
    r(0x90, 0x9F, RM),        // SETcc
    r(0xA0, 0xA2, NONE),      // PUSH/POP FS, CPUID
    r(0xA3, 0xA3, RM),        // BT
    r(0xA4, 0xA4, RM_IMM8),   // SHLD imm8
    r(0xA5, 0xA5, RM),        // SHLD CL
    r(0xA8, 0xAA, NONE),      // PUSH/POP GS, RSM
    r(0xAB, 0xAB, RM),        // BTS
    r(0xAC, 0xAC, RM_IMM8),   // SHRD imm8
    r(0xAD, 0xAF, RM),        // SHRD CL, group 15, IMUL
    r(0xB0, 0xB9, RM),        // CMPXCHG, LSS..LGS, MOVZX, POPCNT, UD1
    r(0xBA, 0xBA, RM_IMM8),   // group 8 BT imm8
    r(0xBB, 0xBF, RM),        // BTC, BSF/BSR, MOVSX
    r(0xC0, 0xC1, RM),        // XADD
    r(0xC2, 0xC2, RM_IMM8),   // CMPPS imm8
    r(0xC3, 0xC3, RM),        // MOVNTI
    r(0xC4, 0xC6, RM_IMM8),   // PINSRW, PEXTRW, SHUFPS
    r(0xC7, 0xC7, RM),        // group 9 CMPXCHG8B/16B
    r(0xC8, 0xCF, NONE),      // BSWAP
    r(0xD0, 0xFF, RM),        // MMX/SSE2 block through UD0
];

/// Map 2: `0F 38 xx`. Also serves VEX/EVEX `mmmmm = 2`. Every defined
/// opcode takes a ModR/M and no immediate.
static MAP_0F38: &[OpcodeRange] = &[r(0x00, 0xFF, RM)];

/// Map 3: `0F 3A xx`. Also serves VEX/EVEX `mmmmm = 3`. Every defined
/// opcode takes a ModR/M plus one immediate byte.
static MAP_0F3A: &[OpcodeRange] = &[r(0x00, 0xFF, RM_IMM8)];

/// Map 4 is 3DNow!. The decoder resolves those lengths before table lookup
/// (the opcode byte sits after the operands), so the map stays empty.
static MAP_3DNOW: &[OpcodeRange] = &[];

/// EVEX `mmm` values with no instructions in the tables.
static MAP_EMPTY: &[OpcodeRange] = &[];

/// XOP map 8: the immediate-carrying XOP instructions.
static MAP_XOP8: &[OpcodeRange] = &[r(0x00, 0xFF, RM_IMM8)];

/// XOP map 9: register/memory forms without an immediate.
static MAP_XOP9: &[OpcodeRange] = &[r(0x00, 0xFF, RM)];

/// XOP map 0xA: `BEXTR`/`LWPINS`-style forms with a 4-byte immediate.
static MAP_XOPA: &[OpcodeRange] = &[r(0x00, 0xFF, RM_IMM32)];

/// Table set, indexed by opcode map. VEX-family selectors above 0xA have no
/// table and decode as unknown.
static OPCODE_TABLES: [&[OpcodeRange]; 11] = [
    MAP_ONE_BYTE,
    MAP_0F,
    MAP_0F38,
    MAP_0F3A,
    MAP_3DNOW,
    MAP_EMPTY,
    MAP_EMPTY,
    MAP_EMPTY,
    MAP_XOP8,
    MAP_XOP9,
    MAP_XOPA,
];

/// Looks up the trailing-byte descriptor for `(map, opcode)`.
pub fn lookup(map: u8, opcode: u8) -> Option<&'static OpcodeInfo> {
    let table = OPCODE_TABLES.get(usize::from(map))?;
    table
        .iter()
        .find(|range| opcode >= range.from && opcode <= range.to)
        .map(|range| &range.info)
}
