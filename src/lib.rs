//! Luby Transform fountain codes.
//!
//! A rateless erasure code: `k` equal-length source blocks go in, an
//! unbounded stream of encoded blocks comes out, and any sufficient subset
//! (slightly more than `k`) recovers the originals with high probability.
//! Useful where loss is unknown and feedback is unwelcome — one-to-many
//! broadcast, QR-stream transfer, store-and-forward delivery.
//!
//! - **Degree distribution**: Robust Soliton over `1..=k`, tunable via
//!   [`SolitonConfig`]
//! - **Neighbor selection**: derived from a 64-bit per-block seed through
//!   a frozen generator, so indices never travel on the wire
//! - **Decoding**: iterative belief-propagation (peeling) over a pending
//!   graph, one source recovered per ready degree-1 block
//!
//! # Quick Start
//!
//! ```rust
//! use lt_fountain::{LtDecoder, LtEncoder};
//!
//! let sources = vec![vec![1, 0], vec![0, 2], vec![4, 0], vec![0, 8]];
//! let mut encoder = LtEncoder::new(sources.clone(), Some(7)).unwrap();
//! let mut decoder = LtDecoder::new(4, 2).unwrap();
//!
//! for _ in 0..200 {
//!     let block = encoder.generate_block(None);
//!     decoder.add_encoded_block(block.seed, block.degree, block.payload).unwrap();
//!     if decoder.is_complete() {
//!         break;
//!     }
//! }
//! assert_eq!(decoder.get_all_decoded_blocks(), Some(sources));
//! ```
//!
//! # Wire form
//!
//! An encoded block travels as `(seed: u64, degree: u32, payload)`; the
//! selected source indices are regenerated from the seed on the decoder
//! side. `k`, the block size, and the Soliton tuning are out-of-band
//! parameters both sides must share.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod decode;
mod encode;
mod error;
mod golden;
mod prng;
mod soliton;

pub use config::SolitonConfig;
pub use decode::{DecodeOutcome, LtDecoder};
pub use encode::{encode_file_blocks, EncodedBlock, LtEncoder};
pub use error::{DecodeError, EncodeError};
