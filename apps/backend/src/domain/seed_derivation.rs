//! RNG seed derivation utilities for deterministic shuffles.
//!
//! A session stores one base `rng_seed` plus a shuffle counter. Every
//! shuffle (initial deal and each discard-pile reshuffle) derives its own
//! 32-byte seed from both, so replaying a session reproduces every shuffle
//! and a retried write reshuffles identically.

/// Derive the 32-byte seed for the `shuffle_no`-th shuffle of a session.
pub fn derive_shuffle_seed(rng_seed: u64, shuffle_no: u32) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"sequence/shuffle");
    hasher.update(&rng_seed.to_le_bytes());
    hasher.update(&shuffle_no.to_le_bytes());
    *hasher.finalize().as_bytes()
}
