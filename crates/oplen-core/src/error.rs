//! Decode error types.

use thiserror::Error;

/// Error type for length decoding.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A required byte could not be read: the buffer was truncated or the
    /// caller's `max_length` window was too small.
    #[error("instruction stream ended prematurely")]
    NoMoreData,

    /// The opcode has no entry in the length tables. Invalid encodings that
    /// happen to fall inside a recognized table range are *not* reported;
    /// the tables are tuned for recognition, not validation.
    #[error("opcode not present in the length tables")]
    UnknownInstruction,
}
