//! Error types for chunk parsing and entity decoding.
//!
//! [`P3dError`] covers both stream-level failures (truncation, bad seeks, unbalanced
//! frames) and per-chunk decode failures. The [`Registry`](crate::chunk::registry::Registry)
//! decides which of them abort a whole load and which only skip one chunk, see
//! [`P3dError::is_fatal`].

use thiserror::Error;

use crate::chunk::ChunkId;

pub type Result<T> = std::result::Result<T, P3dError>;

#[derive(Error, Debug)]
pub enum P3dError {
    /// The stream ended before a read could be satisfied.
    #[error("unexpected end of input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("seek to {target} is outside the stream (length {len})")]
    InvalidSeek { target: i128, len: u64 },

    /// A decoder read past its chunk, or a child declared an end beyond its parent.
    #[error("chunk {id} overran its end at {end} (cursor at {position})")]
    ChunkOverrun {
        id: ChunkId,
        end: u64,
        position: u64,
    },

    #[error("end_chunk called without an open chunk")]
    UnbalancedChunk,

    #[error("{kind} version {found} (expected {expected})")]
    VersionMismatch {
        kind: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("{kind} references unknown `{name}`")]
    DanglingReference { kind: &'static str, name: String },

    #[error("unexpected chunk {found} (expected {expected})")]
    UnexpectedChunk { expected: ChunkId, found: ChunkId },

    #[error("malformed chunk: {0}")]
    Malformed(String),

    #[error("png decode error: {0}")]
    Png(#[from] png::DecodingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl P3dError {
    /// Errors after which the cursor can't be trusted to find the next sibling, even
    /// when they happen inside a decoder. Header errors seen by the dispatcher itself
    /// are always fatal regardless of kind.
    pub fn is_fatal(&self) -> bool {
        matches!(self, P3dError::UnbalancedChunk | P3dError::Io(_))
    }
}
