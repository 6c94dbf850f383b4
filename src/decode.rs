//! LT decoder: iterative belief-propagation (peeling) over encoded blocks.
//!
//! The decoder keeps unresolved blocks in an arena of pending entries with
//! stable handles, an adjacency map from source index to the handles that
//! still reference it, and a ready queue of residual-degree-1 blocks. Each
//! accepted block either resolves immediately, joins the pending graph, or
//! is absorbed as redundant; the peeling loop then drains the ready queue,
//! substituting every recovered source into the blocks that reference it.

use std::collections::{BTreeSet, VecDeque};

use crate::config::SolitonConfig;
use crate::error::DecodeError;
use crate::soliton::DegreeTable;

/// An encoded block that still references undecoded sources.
///
/// `residual` always equals the XOR of the source blocks named by
/// `remaining`: recovered sources are XOR-subtracted out as they resolve.
#[derive(Debug)]
struct PendingBlock {
    remaining: BTreeSet<u32>,
    residual: Vec<i32>,
}

/// Outcome of absorbing one encoded block.
///
/// A corrupt residual is never fatal: the offending block is dropped and
/// decoding continues. The count here is the streaming caller's signal
/// that it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOutcome {
    /// Number of source blocks decoded after peeling.
    pub decoded_count: u32,

    /// Residuals that should have cancelled to zero but did not, detected
    /// and dropped during this call.
    pub corrupt_residuals: u32,
}

/// Peeling decoder for a stream of encoded blocks.
///
/// Feed blocks with [`LtDecoder::add_encoded_block`] until
/// [`LtDecoder::is_complete`] reports true, then collect the sources with
/// [`LtDecoder::get_all_decoded_blocks`]. Completion is terminal: further
/// additions are absorbed without effect.
pub struct LtDecoder {
    block_size: usize,
    degrees: DegreeTable,
    decoded: Vec<Option<Vec<i32>>>,
    decoded_count: u32,
    /// Arena of unresolved blocks. Retired entries become `None`; handles
    /// stay stable and are validated before use.
    pending: Vec<Option<PendingBlock>>,
    /// Source index -> handles of pending blocks that still reference it.
    adjacency: Vec<BTreeSet<usize>>,
    /// Residual-degree-1 blocks awaiting a peel, as `(index, residual)`.
    ready: VecDeque<(u32, Vec<i32>)>,
    round: u32,
    received: u64,
}

impl LtDecoder {
    /// Create a decoder for `k` source blocks of `block_size` elements,
    /// with the default Robust Soliton tuning.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ZeroBlockCount`] if `k == 0` and
    /// [`DecodeError::ZeroBlockSize`] if `block_size == 0`.
    pub fn new(k: u32, block_size: u32) -> Result<Self, DecodeError> {
        Self::with_config(k, block_size, &SolitonConfig::default())
    }

    /// Create a decoder with explicit Robust Soliton tuning.
    ///
    /// The tuning must match the encoder's, or regenerated degrees will
    /// disagree with transmitted ones and every block will be rejected.
    ///
    /// # Errors
    ///
    /// Same conditions as [`LtDecoder::new`].
    pub fn with_config(
        k: u32,
        block_size: u32,
        config: &SolitonConfig,
    ) -> Result<Self, DecodeError> {
        if k == 0 {
            return Err(DecodeError::ZeroBlockCount);
        }
        if block_size == 0 {
            return Err(DecodeError::ZeroBlockSize);
        }
        Ok(Self {
            block_size: block_size as usize,
            degrees: DegreeTable::new(k, config),
            decoded: vec![None; k as usize],
            decoded_count: 0,
            pending: Vec::new(),
            adjacency: vec![BTreeSet::new(); k as usize],
            ready: VecDeque::new(),
            round: 0,
            received: 0,
        })
    }

    /// Absorb one encoded block and run peeling to quiescence.
    ///
    /// The block's neighbor selection is regenerated from `seed`; the
    /// transmitted `degree` is only used to cross-check the regeneration.
    /// Returns the decoded count after peeling together with the number
    /// of corrupt residuals dropped along the way — corruption never
    /// fails the call.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::PayloadLengthMismatch`],
    /// [`DecodeError::DegreeOutOfRange`], or [`DecodeError::SeedMismatch`]
    /// without touching decoder state; the caller can keep streaming.
    pub fn add_encoded_block(
        &mut self,
        seed: u64,
        degree: u32,
        mut payload: Vec<i32>,
    ) -> Result<DecodeOutcome, DecodeError> {
        if payload.len() != self.block_size {
            return Err(DecodeError::PayloadLengthMismatch {
                len: payload.len(),
                block_size: self.block_size,
            });
        }
        let k = self.degrees.k();
        if degree == 0 || degree > k {
            return Err(DecodeError::DegreeOutOfRange { degree, k });
        }

        let (derived, indices) = self.degrees.neighbors(seed);
        if derived != degree {
            return Err(DecodeError::SeedMismatch {
                seed,
                claimed: degree,
                derived,
            });
        }

        self.received += 1;
        let was_complete = self.is_complete();
        let mut corrupt_residuals = 0;

        // Substitute out every source this block references that is
        // already known.
        let mut remaining = BTreeSet::new();
        for index in indices {
            if let Some(block) = &self.decoded[index as usize] {
                xor_into(&mut payload, block);
            } else {
                remaining.insert(index);
            }
        }

        if remaining.is_empty() {
            // Fully redundant. The residual must cancel to zero; anything
            // else means the payload never matched its seed.
            if payload.iter().any(|&v| v != 0) {
                corrupt_residuals += 1;
                tracing::warn!(seed, "redundant block has non-zero residual; corrupt input discarded");
            }
        } else if remaining.len() == 1 {
            // Degree one after substitution: straight to the ready queue,
            // no pending entry needed.
            if let Some(&index) = remaining.iter().next() {
                self.ready.push_back((index, payload));
            }
        } else {
            let handle = self.pending.len();
            for &index in &remaining {
                self.adjacency[index as usize].insert(handle);
            }
            self.pending.push(Some(PendingBlock {
                remaining,
                residual: payload,
            }));
        }

        corrupt_residuals += self.peel();

        if !was_complete && self.is_complete() {
            tracing::debug!(
                k,
                rounds = self.round,
                received = self.received,
                "all source blocks recovered"
            );
        }

        Ok(DecodeOutcome {
            decoded_count: self.decoded_count,
            corrupt_residuals,
        })
    }

    /// Drain the ready queue, recovering one source per entry and
    /// substituting it into every pending block that references it.
    /// Returns the number of corrupt residuals dropped.
    fn peel(&mut self) -> u32 {
        let mut corrupt_residuals = 0;
        while let Some((index, value)) = self.ready.pop_front() {
            self.round += 1;
            let slot = index as usize;

            if let Some(existing) = &self.decoded[slot] {
                // Two blocks resolved the same source. Equal values are the
                // normal redundancy case; unequal values mean corrupt input.
                if *existing != value {
                    corrupt_residuals += 1;
                    tracing::warn!(index, "conflicting resolution for source block; corrupt input discarded");
                }
                continue;
            }

            for handle in std::mem::take(&mut self.adjacency[slot]) {
                let Some(block) = self.pending[handle].as_mut() else {
                    continue;
                };
                xor_into(&mut block.residual, &value);
                block.remaining.remove(&index);

                if block.remaining.len() > 1 {
                    continue;
                }
                // Down to one unresolved reference: retire the arena slot
                // and queue the survivor.
                if let Some(retired) = self.pending[handle].take() {
                    if let Some(&last) = retired.remaining.iter().next() {
                        self.adjacency[last as usize].remove(&handle);
                        self.ready.push_back((last, retired.residual));
                    }
                }
            }

            self.decoded[slot] = Some(value);
            self.decoded_count += 1;
        }
        corrupt_residuals
    }

    /// Number of source blocks recovered so far.
    #[must_use]
    pub const fn decoded_count(&self) -> u32 {
        self.decoded_count
    }

    /// Whether all `k` source blocks have been recovered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.decoded_count == self.degrees.k()
    }

    /// Number of peeling rounds performed (one per ready-queue pop).
    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.round
    }

    /// Number of encoded blocks accepted (validation failures excluded).
    #[must_use]
    pub const fn received_count(&self) -> u64 {
        self.received
    }

    /// Number of source blocks `k`.
    #[must_use]
    pub fn k(&self) -> u32 {
        self.degrees.k()
    }

    /// Length of every source block.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// A single recovered source block, if that index has resolved.
    #[must_use]
    pub fn get_decoded_block(&self, index: u32) -> Option<&[i32]> {
        self.decoded.get(index as usize)?.as_deref()
    }

    /// All recovered source blocks in index order, once decoding is
    /// complete; `None` while any source is still missing.
    #[must_use]
    pub fn get_all_decoded_blocks(&self) -> Option<Vec<Vec<i32>>> {
        if !self.is_complete() {
            return None;
        }
        Some(self.decoded.iter().flatten().cloned().collect())
    }

    /// Verify the §3-style structural invariants against the known
    /// sources. Test-only.
    #[cfg(test)]
    fn check_invariants(&self, sources: &[Vec<i32>]) {
        for block in self.pending.iter().flatten() {
            assert!(!block.remaining.is_empty());
            let mut expected = vec![0i32; self.block_size];
            for &i in &block.remaining {
                assert!(self.decoded[i as usize].is_none());
                xor_into(&mut expected, &sources[i as usize]);
            }
            assert_eq!(block.residual, expected);
        }

        for (i, handles) in self.adjacency.iter().enumerate() {
            for &handle in handles {
                let block = self.pending[handle]
                    .as_ref()
                    .expect("adjacency handle must point at a live block");
                assert!(block.remaining.contains(&u32::try_from(i).unwrap()));
            }
        }
        for (handle, slot) in self.pending.iter().enumerate() {
            if let Some(block) = slot {
                for &i in &block.remaining {
                    assert!(self.adjacency[i as usize].contains(&handle));
                }
            }
        }

        let live = u32::try_from(self.decoded.iter().flatten().count()).unwrap();
        assert_eq!(self.decoded_count, live);
        assert_eq!(self.is_complete(), self.decoded_count == self.degrees.k());
        assert!(self.ready.is_empty(), "ready queue drains before returning");
    }
}

/// Elementwise XOR of `other` into `target`.
fn xor_into(target: &mut [i32], other: &[i32]) {
    for (acc, &v) in target.iter_mut().zip(other) {
        *acc ^= v;
    }
}
