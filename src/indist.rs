// Optional wrapper around the dual-stream transformer: re-randomizes,
// injects homomorphic noise, duplicates for redundancy, and interleaves +
// shuffles both streams to frustrate statistical analysis. Grounded in
// `indistinguishable_ext.py`'s four operations, resolved to the single
// metadata schema this spec defines in place of the two incompatible
// schemas that coexist in the source (`encrypt.py` vs
// `indistinguishable_ext.py`) — Open Question 3. The deterministic
// Fisher-Yates shuffle is seeded via `ChaCha20Rng::from_seed`, the same
// "reproducible from a stored seed" pattern `axelarnetwork-tofn` uses
// `rand_chacha` for elsewhere in the pack.

use crate::artifact::{IndistinguishabilityMetadata, StreamArtifact};
use crate::paillier::{PaillierError, PublicKey};
use num_bigint_dig::BigInt;
use num_traits::Zero;
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Configuration for the indistinguishability wrapper.
#[derive(Clone, Debug)]
pub struct IndistOptions {
    /// Noise values are drawn from `[1, floor(n * noise_scale))`.
    pub noise_scale: f64,
    /// Each ciphertext becomes `redundancy_factor` copies (original plus
    /// `redundancy_factor - 1` re-randomizations).
    pub redundancy_factor: usize,
}

impl Default for IndistOptions {
    fn default() -> Self {
        IndistOptions {
            noise_scale: 1e-4,
            redundancy_factor: 1,
        }
    }
}

/// Wraps an already-masked `artifact`'s two streams with re-randomization,
/// homomorphic noise, redundancy duplication, and an interleave + shuffle,
/// recording the inverse metadata needed by [`unwrap`].
pub fn wrap<R: CryptoRng + RngCore>(
    rng: &mut R,
    pk: &PublicKey,
    mut artifact: StreamArtifact,
    opts: &IndistOptions,
) -> Result<StreamArtifact, PaillierError> {
    let mut stream_a: Vec<BigInt> = artifact
        .stream_a
        .iter()
        .map(|h| crate::artifact::hex_to_bigint(h).expect("artifact already validated"))
        .collect();
    let mut stream_b: Vec<BigInt> = artifact
        .stream_b
        .iter()
        .map(|h| crate::artifact::hex_to_bigint(h).expect("artifact already validated"))
        .collect();

    for c in stream_a.iter_mut().chain(stream_b.iter_mut()) {
        *c = pk.randomize(rng, c)?;
    }

    let noise_bound = noise_bound(&pk.n, opts.noise_scale);
    let deltas_a = inject_noise(rng, pk, &mut stream_a, &noise_bound)?;
    let deltas_b = inject_noise(rng, pk, &mut stream_b, &noise_bound)?;

    let (redundant_a, indices_a) = duplicate(rng, pk, &stream_a, opts.redundancy_factor)?;
    let (redundant_b, indices_b) = duplicate(rng, pk, &stream_b, opts.redundancy_factor)?;

    let mut shuffle_seed = [0u8; 16];
    rng.fill_bytes(&mut shuffle_seed);
    let (combined, permutation) = interleave_and_shuffle(&redundant_a, &redundant_b, &shuffle_seed);

    artifact.stream_a = combined.iter().map(crate::artifact::bigint_to_hex).collect();
    artifact.stream_b = Vec::new();
    artifact.indistinguishability_metadata = Some(IndistinguishabilityMetadata {
        shuffle_seed: shuffle_seed.to_vec(),
        shuffle_permutation: permutation,
        noise_deltas_a: deltas_a.iter().map(|d| d.to_str_radix(10)).collect(),
        noise_deltas_b: deltas_b.iter().map(|d| d.to_str_radix(10)).collect(),
        redundancy_factor: opts.redundancy_factor,
        original_indices_a: indices_a,
        original_indices_b: indices_b,
    });

    Ok(artifact)
}

/// Inverts [`wrap`]: un-interleaves/un-shuffles, takes the first occurrence
/// of each original index, removes noise, yielding plain masked streams.
pub fn unwrap(pk: &PublicKey, artifact: &StreamArtifact) -> Result<StreamArtifact, PaillierError> {
    let meta = artifact
        .indistinguishability_metadata
        .as_ref()
        .expect("unwrap called on artifact without indistinguishability metadata");

    let combined: Vec<BigInt> = artifact
        .stream_a
        .iter()
        .map(|h| crate::artifact::hex_to_bigint(h).expect("artifact already validated"))
        .collect();

    let mut inverted = vec![BigInt::zero(); combined.len()];
    for (shuffled_pos, &original_pos) in meta.shuffle_permutation.iter().enumerate() {
        inverted[original_pos] = combined[shuffled_pos].clone();
    }

    let redundant_a_len = meta.original_indices_a.len();
    let redundant_a = &inverted[..redundant_a_len];
    let redundant_b = &inverted[redundant_a_len..];

    let deduped_a = first_occurrence_per_index(redundant_a, &meta.original_indices_a);
    let deduped_b = first_occurrence_per_index(redundant_b, &meta.original_indices_b);

    let noise_a: Vec<BigInt> = meta
        .noise_deltas_a
        .iter()
        .map(|s| s.parse().expect("stored delta is a valid decimal integer"))
        .collect();
    let noise_b: Vec<BigInt> = meta
        .noise_deltas_b
        .iter()
        .map(|s| s.parse().expect("stored delta is a valid decimal integer"))
        .collect();

    let denoised_a = remove_noise(pk, &deduped_a, &noise_a)?;
    let denoised_b = remove_noise(pk, &deduped_b, &noise_b)?;

    let mut result = artifact.clone();
    result.stream_a = denoised_a.iter().map(crate::artifact::bigint_to_hex).collect();
    result.stream_b = denoised_b.iter().map(crate::artifact::bigint_to_hex).collect();
    result.indistinguishability_metadata = None;
    Ok(result)
}

fn noise_bound(n: &BigInt, scale: f64) -> BigInt {
    let scale_milli = (scale * 1_000_000.0).max(1.0) as u64;
    (n * BigInt::from(scale_milli)) / BigInt::from(1_000_000u64)
}

fn inject_noise<R: CryptoRng + RngCore>(
    rng: &mut R,
    pk: &PublicKey,
    stream: &mut [BigInt],
    bound: &BigInt,
) -> Result<Vec<BigInt>, PaillierError> {
    let effective_bound = if *bound < BigInt::from(2u8) {
        BigInt::from(2u8)
    } else {
        bound.clone()
    };
    let mut deltas = Vec::with_capacity(stream.len());
    for c in stream.iter_mut() {
        let delta = rng.gen_bigint_range_like(&effective_bound);
        *c = pk.add_constant(c, &delta)?;
        deltas.push(delta);
    }
    Ok(deltas)
}

fn remove_noise(pk: &PublicKey, stream: &[BigInt], deltas: &[BigInt]) -> Result<Vec<BigInt>, PaillierError> {
    stream
        .iter()
        .zip(deltas.iter())
        .map(|(c, delta)| pk.add_constant(c, &(-delta)))
        .collect()
}

/// Produces `(redundancy_factor)` copies per ciphertext (the original plus
/// re-randomizations), and the mapping from output index to original index.
fn duplicate<R: CryptoRng + RngCore>(
    rng: &mut R,
    pk: &PublicKey,
    stream: &[BigInt],
    redundancy_factor: usize,
) -> Result<(Vec<BigInt>, Vec<usize>), PaillierError> {
    let factor = redundancy_factor.max(1);
    let mut out = Vec::with_capacity(stream.len() * factor);
    let mut indices = Vec::with_capacity(stream.len() * factor);
    for (i, c) in stream.iter().enumerate() {
        out.push(c.clone());
        indices.push(i);
        for _ in 1..factor {
            out.push(pk.randomize(rng, c)?);
            indices.push(i);
        }
    }
    Ok((out, indices))
}

fn first_occurrence_per_index(values: &[BigInt], original_indices: &[usize]) -> Vec<BigInt> {
    let max_index = original_indices.iter().copied().max().map(|m| m + 1).unwrap_or(0);
    let mut seen = vec![false; max_index];
    let mut result = vec![BigInt::zero(); max_index];
    for (value, &idx) in values.iter().zip(original_indices.iter()) {
        if !seen[idx] {
            result[idx] = value.clone();
            seen[idx] = true;
        }
    }
    result
}

/// Concatenates `a` then `b`, shuffles via a seeded Fisher-Yates, and
/// returns the shuffled values plus the permutation mapping shuffled
/// position -> original combined-list position.
fn interleave_and_shuffle(
    a: &[BigInt],
    b: &[BigInt],
    shuffle_seed: &[u8; 16],
) -> (Vec<BigInt>, Vec<usize>) {
    let mut combined: Vec<BigInt> = a.iter().cloned().chain(b.iter().cloned()).collect();
    let mut permutation: Vec<usize> = (0..combined.len()).collect();

    let mut seed = [0u8; 32];
    seed[..16].copy_from_slice(shuffle_seed);
    let mut rng = ChaCha20Rng::from_seed(seed);

    let n = combined.len();
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=i);
        combined.swap(i, j);
        permutation.swap(i, j);
    }

    (combined, permutation)
}

/// Convenience trait so `inject_noise` can draw `[0, bound)` from any RNG
/// without threading a `BigInt`-capable generic bound through every caller.
trait GenBigIntRangeLike {
    fn gen_bigint_range_like(&mut self, bound: &BigInt) -> BigInt;
}

impl<R: RngCore + ?Sized> GenBigIntRangeLike for R {
    fn gen_bigint_range_like(&mut self, bound: &BigInt) -> BigInt {
        use num_bigint_dig::RandBigInt;
        self.gen_bigint_range(&BigInt::from(1u8), bound)
    }
}
