//! Golden tests for the encoder/decoder pair.
//!
//! These pin the frozen draw-sequence contract and verify deterministic
//! behavior end to end: identical encoders emit identical streams, and
//! identical streams drive identical decoders.
