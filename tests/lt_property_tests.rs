//! Property-based tests for the LT encoder/decoder pair.
//!
//! Covers the quantified invariants: round-trip recovery for arbitrary
//! sources and seeds, payload/XOR consistency, stream determinism,
//! counter monotonicity, idempotent redelivery, and rejection without
//! state change.

use lt_fountain::{encode_file_blocks, DecodeError, LtDecoder, LtEncoder};
use proptest::prelude::*;

/// Random source sets: 1..20 blocks of 1..6 elements each.
fn source_blocks() -> impl Strategy<Value = Vec<Vec<i32>>> {
    (1usize..20, 1usize..6).prop_flat_map(|(k, block_size)| {
        prop::collection::vec(prop::collection::vec(any::<i32>(), block_size), k)
    })
}

fn dims(sources: &[Vec<i32>]) -> (u32, u32) {
    (
        u32::try_from(sources.len()).unwrap(),
        u32::try_from(sources[0].len()).unwrap(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trip_recovers_all_sources(
        sources in source_blocks(),
        master_seed in any::<u64>(),
    ) {
        let (k, block_size) = dims(&sources);
        let mut encoder = LtEncoder::new(sources.clone(), Some(master_seed)).unwrap();
        let mut decoder = LtDecoder::new(k, block_size).unwrap();

        let mut produced = 0usize;
        while !decoder.is_complete() {
            produced += 1;
            prop_assert!(produced <= 2_000, "starved after {} blocks", produced);
            let block = encoder.generate_block(None);
            let outcome = decoder
                .add_encoded_block(block.seed, block.degree, block.payload)
                .unwrap();
            prop_assert_eq!(outcome.corrupt_residuals, 0);
        }

        prop_assert_eq!(decoder.decoded_count(), k);
        prop_assert_eq!(decoder.get_all_decoded_blocks(), Some(sources));
    }

    #[test]
    fn payload_matches_xor_of_selected_sources(
        sources in source_blocks(),
        block_seed in any::<u64>(),
    ) {
        let mut encoder = LtEncoder::new(sources.clone(), Some(0)).unwrap();
        let block = encoder.generate_block(Some(block_seed));

        prop_assert_eq!(block.indices.len(), block.degree as usize);
        let mut expected = vec![0i32; sources[0].len()];
        for &i in &block.indices {
            for (acc, &v) in expected.iter_mut().zip(&sources[i as usize]) {
                *acc ^= v;
            }
        }
        prop_assert_eq!(block.payload, expected);
    }

    #[test]
    fn equal_seeds_give_equal_streams(
        sources in source_blocks(),
        master_seed in any::<u64>(),
    ) {
        let a = encode_file_blocks(sources.clone(), Some(master_seed), 32).unwrap();
        let b = encode_file_blocks(sources, Some(master_seed), 32).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn counters_never_decrease(
        sources in source_blocks(),
        master_seed in any::<u64>(),
    ) {
        let (k, block_size) = dims(&sources);
        let mut encoder = LtEncoder::new(sources, Some(master_seed)).unwrap();
        let mut decoder = LtDecoder::new(k, block_size).unwrap();

        let mut last_count = 0;
        let mut last_round = 0;
        for _ in 0..100 {
            let block = encoder.generate_block(None);
            let outcome = decoder
                .add_encoded_block(block.seed, block.degree, block.payload)
                .unwrap();
            prop_assert!(outcome.decoded_count >= last_count);
            prop_assert!(decoder.current_round() >= last_round);
            last_count = outcome.decoded_count;
            last_round = decoder.current_round();
        }
    }

    #[test]
    fn redelivery_is_idempotent(
        sources in source_blocks(),
        master_seed in any::<u64>(),
        batch in 1usize..40,
    ) {
        let (k, block_size) = dims(&sources);
        let mut encoder = LtEncoder::new(sources, Some(master_seed)).unwrap();
        let mut decoder = LtDecoder::new(k, block_size).unwrap();

        let blocks: Vec<_> = (0..batch).map(|_| encoder.generate_block(None)).collect();
        for block in &blocks {
            decoder
                .add_encoded_block(block.seed, block.degree, block.payload.clone())
                .unwrap();
        }

        let count = decoder.decoded_count();
        let round = decoder.current_round();
        for block in &blocks {
            let after = decoder
                .add_encoded_block(block.seed, block.degree, block.payload.clone())
                .unwrap();
            prop_assert_eq!(after.decoded_count, count);
        }
        prop_assert_eq!(decoder.decoded_count(), count);
        prop_assert!(decoder.current_round() >= round);
    }

    #[test]
    fn misdeclared_degree_rejected_without_state_change(
        sources in source_blocks(),
        master_seed in any::<u64>(),
    ) {
        let (k, block_size) = dims(&sources);
        prop_assume!(k > 1);

        let mut encoder = LtEncoder::new(sources, Some(master_seed)).unwrap();
        let mut decoder = LtDecoder::new(k, block_size).unwrap();

        let block = encoder.generate_block(None);
        // Stays within [1, k] but disagrees with the seed's true degree.
        let wrong = (block.degree % k) + 1;

        let result = decoder.add_encoded_block(block.seed, wrong, block.payload.clone());
        let is_seed_mismatch = matches!(result, Err(DecodeError::SeedMismatch { .. }));
        prop_assert!(is_seed_mismatch);
        prop_assert_eq!(decoder.decoded_count(), 0);
        prop_assert_eq!(decoder.current_round(), 0);
        prop_assert_eq!(decoder.received_count(), 0);

        // The honest triple still lands.
        decoder
            .add_encoded_block(block.seed, block.degree, block.payload)
            .unwrap();
        prop_assert_eq!(decoder.received_count(), 1);
    }
}
