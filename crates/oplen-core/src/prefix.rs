//! Legacy and REX prefix scanning.

use crate::cursor::ByteCursor;

/// Legacy prefix bytes recognized ahead of the opcode, in no particular
/// order: lock/rep group, segment overrides, operand size, address size.
static LEGACY_PREFIXES: [u8; 11] = [
    0xF0, 0xF2, 0xF3, // LOCK, REPNE, REP
    0x2E, 0x36, 0x3E, 0x26, 0x64, 0x65, // segment overrides
    0x66, // operand-size override
    0x67, // address-size override
];

/// Prefix facts accumulated by the scanner.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Prefixes {
    /// A literal `66` byte was seen.
    pub operand_override: bool,
    /// A literal `67` byte was seen.
    pub address_override: bool,
    /// W bit taken from a REX prefix. A VEX-family prefix may override it
    /// later.
    pub wide_operand: bool,
}

impl Prefixes {
    /// Greedily consumes legacy prefixes (and REX prefixes when
    /// `rex_allowed`, i.e. in 64-bit mode), stopping at the first byte that
    /// is neither.
    ///
    /// When several REX prefixes appear, the last one counts; but a legacy
    /// prefix *after* a REX invalidates it, so the W bit is dropped again on
    /// every legacy-prefix byte. This matches observed hardware behavior,
    /// which is otherwise undocumented.
    pub(crate) fn scan(cursor: &mut ByteCursor<'_>, rex_allowed: bool) -> Self {
        let mut prefixes = Self::default();

        while let Some(byte) = cursor.peek(0) {
            if LEGACY_PREFIXES.contains(&byte) {
                if byte == 0x66 {
                    prefixes.operand_override = true;
                }
                if byte == 0x67 {
                    prefixes.address_override = true;
                }
                prefixes.wide_operand = false;
                cursor.next();
                continue;
            }

            // REX: 0100wrxb
            if rex_allowed && byte & 0xF0 == 0x40 {
                prefixes.wide_operand = byte & 0x08 != 0;
                cursor.next();
                continue;
            }

            break;
        }

        prefixes
    }
}
