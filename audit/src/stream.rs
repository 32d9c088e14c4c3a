//! The shared bounded integer stream.
//!
//! Provider and auditor independently derive the same challenge from a
//! seed, so this generator is part of the wire contract, not an internal
//! detail: element `k` of the stream is `mix(seed + k)` mapped into
//! `[0, bound)` by a 128-bit multiply-shift. The mixer is the splitmix64
//! finalizer. Integer-only arithmetic keeps the output byte-identical on
//! every platform — determinism here is a correctness requirement.
//!
//! The generator is deliberately not cryptographically strong; seed
//! unpredictability comes from the auditor's RNG at issuance time.

/// splitmix64 finalizer.
fn mix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Map a full-width word into `[0, bound)` without modulo bias skew from
/// truncation: `(x * bound) >> 64`.
fn map_to_bound(x: u64, bound: u64) -> u64 {
    ((u128::from(x) * u128::from(bound)) >> 64) as u64
}

/// The `count` stream values for `seed`, each in `[0, bound)`.
pub fn bounded_stream(seed: u64, count: usize, bound: u64) -> Vec<u64> {
    (0..count)
        .map(|k| map_to_bound(mix(seed.wrapping_add(k as u64)), bound))
        .collect()
}
