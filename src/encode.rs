//! LT encoder: XOR-combines pseudo-randomly selected source blocks.

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::config::SolitonConfig;
use crate::error::EncodeError;
use crate::prng::Xoshiro256;
use crate::soliton::DegreeTable;

/// One encoded block.
///
/// Only `seed`, `degree` and `payload` travel on the wire; `indices` is
/// derived from the seed and regenerated by the decoder, so it is skipped
/// on serialization (an empty vector after deserialization).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedBlock {
    /// Seed that regenerates this block's neighbor selection.
    pub seed: u64,

    /// Number of source blocks XOR-combined into the payload.
    pub degree: u32,

    /// The selected source indices, in draw order. Derived attribute;
    /// never transmitted.
    #[serde(skip)]
    pub indices: Vec<u32>,

    /// Elementwise XOR of the selected source blocks.
    pub payload: Vec<i32>,
}

/// Rateless encoder over a fixed set of equal-length source blocks.
///
/// Each generated block is defined entirely by its 64-bit seed: a
/// block-local generator seeded with it yields the degree and the distinct
/// source indices, and the payload is their XOR. Unseeded calls draw the
/// block seed from the encoder's master generator.
pub struct LtEncoder {
    sources: Vec<Vec<i32>>,
    block_size: usize,
    master: Xoshiro256,
    degrees: DegreeTable,
}

impl LtEncoder {
    /// Create an encoder with the default Robust Soliton tuning.
    ///
    /// `master_seed` fixes the stream of auto-generated block seeds; pass
    /// `None` to seed from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::EmptySourceSet`] for an empty source set,
    /// [`EncodeError::EmptySourceBlocks`] for zero-length blocks, and
    /// [`EncodeError::UnequalBlockLength`] if any block's length differs
    /// from the first block's.
    pub fn new(
        source_blocks: Vec<Vec<i32>>,
        master_seed: Option<u64>,
    ) -> Result<Self, EncodeError> {
        Self::with_config(source_blocks, master_seed, &SolitonConfig::default())
    }

    /// Create an encoder with explicit Robust Soliton tuning.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LtEncoder::new`].
    pub fn with_config(
        source_blocks: Vec<Vec<i32>>,
        master_seed: Option<u64>,
        config: &SolitonConfig,
    ) -> Result<Self, EncodeError> {
        let Some(first) = source_blocks.first() else {
            return Err(EncodeError::EmptySourceSet);
        };
        let block_size = first.len();
        if block_size == 0 {
            return Err(EncodeError::EmptySourceBlocks);
        }
        for (index, block) in source_blocks.iter().enumerate() {
            if block.len() != block_size {
                return Err(EncodeError::UnequalBlockLength {
                    index,
                    len: block.len(),
                    expected: block_size,
                });
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let k = source_blocks.len() as u32;
        let seed = master_seed.unwrap_or_else(|| rand::rng().random());

        Ok(Self {
            sources: source_blocks,
            block_size,
            master: Xoshiro256::new(seed),
            degrees: DegreeTable::new(k, config),
        })
    }

    /// Generate one encoded block.
    ///
    /// With `Some(seed)` the result is a pure function of the encoder's
    /// sources and that seed; with `None` the seed comes off the master
    /// generator and is recorded on the returned block.
    pub fn generate_block(&mut self, block_seed: Option<u64>) -> EncodedBlock {
        let seed = block_seed.unwrap_or_else(|| self.master.next_u64());
        let (degree, indices) = self.degrees.neighbors(seed);

        let mut payload = vec![0i32; self.block_size];
        for &index in &indices {
            for (acc, &v) in payload.iter_mut().zip(&self.sources[index as usize]) {
                *acc ^= v;
            }
        }

        EncodedBlock { seed, degree, indices, payload }
    }

    /// Number of source blocks `k`.
    #[must_use]
    pub fn source_block_count(&self) -> u32 {
        self.degrees.k()
    }

    /// Length of every source block.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }
}

/// Construct an encoder over `blocks` and emit `n` encoded blocks.
///
/// # Errors
///
/// Same conditions as [`LtEncoder::new`].
pub fn encode_file_blocks(
    blocks: Vec<Vec<i32>>,
    master_seed: Option<u64>,
    n: usize,
) -> Result<Vec<EncodedBlock>, EncodeError> {
    let mut encoder = LtEncoder::new(blocks, master_seed)?;
    Ok((0..n).map(|_| encoder.generate_block(None)).collect())
}
