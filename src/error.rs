//! Encoder and decoder error types.

use thiserror::Error;

/// Errors raised when constructing an encoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// No source blocks were supplied.
    #[error("cannot encode an empty source set")]
    EmptySourceSet,

    /// Source blocks are zero-length.
    #[error("source blocks must contain at least one element")]
    EmptySourceBlocks,

    /// A source block's length differs from the first block's.
    #[error("source block {index} has length {len}, expected {expected}")]
    UnequalBlockLength {
        /// Index of the offending block.
        index: usize,
        /// Its length.
        len: usize,
        /// Length of the first block.
        expected: usize,
    },
}

/// Errors raised by the decoder.
///
/// All of these leave the decoder state untouched; streaming callers can
/// drop the offending block and keep feeding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Source block count must be at least 1.
    #[error("source block count must be at least 1")]
    ZeroBlockCount,

    /// Block size must be at least 1.
    #[error("block size must be at least 1")]
    ZeroBlockSize,

    /// Transmitted degree falls outside `[1, k]`.
    #[error("degree {degree} outside valid range [1, {k}]")]
    DegreeOutOfRange {
        /// The transmitted degree.
        degree: u32,
        /// Number of source blocks.
        k: u32,
    },

    /// Payload length does not match the configured block size.
    #[error("payload length {len} does not match block size {block_size}")]
    PayloadLengthMismatch {
        /// The transmitted payload length.
        len: usize,
        /// The decoder's block size.
        block_size: usize,
    },

    /// The transmitted degree disagrees with the degree regenerated from
    /// the block's seed, so the neighbor selection cannot be trusted.
    #[error("seed {seed:#018x} regenerates degree {derived}, block claims {claimed}")]
    SeedMismatch {
        /// The block's seed.
        seed: u64,
        /// The transmitted degree.
        claimed: u32,
        /// The degree the seed actually produces.
        derived: u32,
    },
}
