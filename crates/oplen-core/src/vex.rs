//! VEX, EVEX and XOP prefix classification and field extraction.
//!
//! The lead bytes are all overloaded: `C4`/`C5` are `LES`/`LDS` outside
//! 64-bit mode, `62` is `BOUND`, and `8F` is `POP r/m`. Classification has
//! to look ahead at the payload byte (and the remaining window size) before
//! committing to the VEX-family reading.

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::mode::MachineMode;

/// Which VEX-family encoding introduces the instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VexKind {
    /// `C5 b1`; the opcode map is fixed to 1 (`0F`).
    TwoByte,
    /// `C4 b1 b2`.
    ThreeByte,
    /// `8F b1 b2`. AMD reserves `mmmmm >= 8` so the prefix can coexist with
    /// the `POP r/m` encoding of `8F`.
    Xop,
    /// `62 b1 b2 b3`.
    Evex,
}

/// Opcode map and W bit extracted from a VEX-family prefix.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VexFields {
    /// Raw map selector (`mmmmm`, or the 3-bit `mmm` for EVEX), verbatim.
    pub opcode_map: u8,
    /// W bit, for the encodings that carry one (two-byte VEX does not).
    pub wide_operand: Option<bool>,
}

impl VexKind {
    /// Classifies the upcoming bytes without consuming anything.
    ///
    /// Returns `None` when the lead byte is not a VEX-family introducer, or
    /// when lookahead rules the VEX reading out; the caller then falls
    /// through to legacy decoding.
    pub(crate) fn classify(mode: MachineMode, cursor: &ByteCursor<'_>) -> Option<Self> {
        // Even the shortest family member (two-byte VEX) spans a lead byte,
        // a payload byte and the opcode.
        if !cursor.has(2) {
            return None;
        }

        let payload = cursor.peek(1)?;

        if mode == MachineMode::LongCompatibility {
            // Disambiguation against BOUND/LES/LDS: the VEX reading requires
            // the inverted R and X bits of the payload byte to both be set.
            // A ModR/M for the legacy forms always has at least one of the
            // top bits clear (mod == 11 register forms are not valid there).
            if payload & 0xC0 != 0xC0 {
                return None;
            }
        }

        match cursor.peek(0)? {
            0xC4 if cursor.has(3) => Some(Self::ThreeByte),
            0xC5 => Some(Self::TwoByte),
            0x8F if payload & 0x1F >= 8 => Some(Self::Xop),
            0x62 if cursor.has(4) => Some(Self::Evex),
            _ => None,
        }
    }

    /// Consumes the prefix bytes and extracts the embedded fields. The
    /// opcode byte itself is left for the caller.
    pub(crate) fn parse(self, cursor: &mut ByteCursor<'_>) -> Result<VexFields, DecodeError> {
        cursor.next().ok_or(DecodeError::NoMoreData)?; // lead byte

        match self {
            Self::TwoByte => {
                cursor.next().ok_or(DecodeError::NoMoreData)?;
                Ok(VexFields {
                    opcode_map: 1,
                    wide_operand: None,
                })
            }
            Self::ThreeByte | Self::Xop => {
                let b1 = cursor.next().ok_or(DecodeError::NoMoreData)?;
                let b2 = cursor.next().ok_or(DecodeError::NoMoreData)?;
                Ok(VexFields {
                    opcode_map: b1 & 0x1F,
                    wide_operand: Some(b2 & 0x80 != 0),
                })
            }
            Self::Evex => {
                let b1 = cursor.next().ok_or(DecodeError::NoMoreData)?;
                let b2 = cursor.next().ok_or(DecodeError::NoMoreData)?;
                cursor.next().ok_or(DecodeError::NoMoreData)?;
                Ok(VexFields {
                    opcode_map: b1 & 0x07,
                    wide_operand: Some(b2 & 0x80 != 0),
                })
            }
        }
    }
}
