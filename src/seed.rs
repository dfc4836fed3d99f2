/// Derives an independent RNG seed for one country from the configured base
/// seed. Sampling and shuffling pass different `stream` values so the two
/// generators never share a sequence.
///
/// FNV-1a over the country code, folded into the base seed. Stable across
/// platforms and releases, unlike the std hasher.
pub fn derive_seed(base: u64, country_code: &str, stream: u64) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET ^ base.wrapping_mul(FNV_PRIME);
    for byte in country_code.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash ^= stream;
    hash.wrapping_mul(FNV_PRIME)
}

/// Stream tag for the grid sampler generator.
pub const SAMPLING_STREAM: u64 = 1;
/// Stream tag for the polygon shuffle generator.
pub const SHUFFLE_STREAM: u64 = 2;
