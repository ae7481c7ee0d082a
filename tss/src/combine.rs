//! Secret reconstruction.
//!
//! Combining validates a set of shares, selects a threshold-sized subset,
//! interpolates the padded payload octet-by-octet, and verifies the
//! embedded digest when one is present. With more shares than the
//! threshold, the subset can be the first M in input order, a uniform
//! random M, or (when a digest is embedded) every M-subset in turn
//! until one verifies.
//!
//! Each invocation runs the fixed pipeline normalize -> validate ->
//! select -> reconstruct -> verify, expressed as a chain of immutable
//! bindings rather than shared mutable state.

use std::time::Instant;

use rand::{rngs::OsRng, CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{TssError, TssResult};
use crate::gf256::Gf256;
use crate::hash::HashAlgorithm;
use crate::pkcs7;
use crate::polynomial::interpolate_at_zero;
use crate::share::{matches_human_pattern, Identifier, Share};
use crate::validation;

/// Upper bound on the number of subsets combinatorial recovery will try.
pub const MAX_COMBINATIONS: u64 = 1_000_000;

/// How the combiner selects a threshold-sized subset when more shares
/// than the threshold are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectBy {
	/// Take the first M shares in input order.
	#[default]
	First,
	/// Take a uniformly random M-subset.
	Sample,
	/// Try every M-subset in lexicographic order until one verifies.
	/// Requires shares with an embedded digest.
	Combinations,
}

/// Options for one combine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineOpts {
	/// Subset selection strategy.
	pub select_by: SelectBy,
	/// Whether the payload carries PKCS#7 padding to strip.
	pub padding: bool,
}

impl Default for CombineOpts {
	fn default() -> Self {
		Self { select_by: SelectBy::First, padding: true }
	}
}

/// The outcome of a successful combine.
///
/// Holds the recovered secret together with the share-set metadata. The
/// secret is zeroized when the value is dropped.
pub struct RecoveredSecret {
	secret: Vec<u8>,
	identifier: Identifier,
	threshold: u8,
	hash: HashAlgorithm,
	digest: Option<String>,
	elapsed_ms: u64,
}

impl RecoveredSecret {
	/// The recovered secret octets.
	pub fn secret(&self) -> &[u8] {
		&self.secret
	}

	/// Take ownership of the secret, leaving nothing behind to zeroize.
	pub fn into_secret(mut self) -> Vec<u8> {
		std::mem::take(&mut self.secret)
	}

	/// Identifier of the share set.
	pub fn identifier(&self) -> &Identifier {
		&self.identifier
	}

	/// Threshold of the share set.
	pub fn threshold(&self) -> u8 {
		self.threshold
	}

	/// Digest algorithm that was embedded at split time.
	pub fn hash(&self) -> HashAlgorithm {
		self.hash
	}

	/// Hex rendering of the embedded digest, if one was present.
	pub fn digest(&self) -> Option<&str> {
		self.digest.as_deref()
	}

	/// Wall-clock duration of the combine call in milliseconds.
	pub fn elapsed_ms(&self) -> u64 {
		self.elapsed_ms
	}
}

impl Zeroize for RecoveredSecret {
	fn zeroize(&mut self) {
		self.secret.zeroize();
	}
}

impl Drop for RecoveredSecret {
	fn drop(&mut self) {
		self.secret.zeroize();
	}
}

impl core::fmt::Debug for RecoveredSecret {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("RecoveredSecret")
			.field("secret", &"[REDACTED]")
			.field("identifier", &self.identifier)
			.field("threshold", &self.threshold)
			.field("hash", &self.hash)
			.field("digest", &self.digest)
			.field("elapsed_ms", &self.elapsed_ms)
			.finish()
	}
}

/// Combine shares using the system entropy source for SAMPLE selection.
pub fn combine<S: AsRef<[u8]>>(inputs: &[S], opts: &CombineOpts) -> TssResult<RecoveredSecret> {
	combine_with_rng(inputs, opts, &mut OsRng)
}

/// Combine shares, drawing SAMPLE-selection randomness from `rng`.
///
/// Inputs are either all human-format strings or all binary shares;
/// mixing the two fails. The input slice is copied up front and never
/// mutated.
pub fn combine_with_rng<S: AsRef<[u8]>, R: CryptoRng + RngCore>(
	inputs: &[S],
	opts: &CombineOpts,
	rng: &mut R,
) -> TssResult<RecoveredSecret> {
	let started = Instant::now();

	if inputs.is_empty() {
		return Err(TssError::InsufficientShares { provided: 0, required: 1 });
	}

	let shares = normalize(inputs)?;

	validation::headers_identical(&shares)?;
	validation::bodies_uniform_length(&shares)?;
	let threshold = shares[0].threshold();
	let hash = shares[0].hash();
	let identifier = *shares[0].identifier();
	validation::threshold_met(shares.len(), threshold)?;

	let xs: Vec<u8> = shares.iter().map(|s| s.x()).collect();
	validation::xs_nonzero_and_distinct(&xs)?;

	let m = threshold as usize;
	match opts.select_by {
		SelectBy::First => {
			let selected: Vec<&Share> = shares.iter().take(m).collect();
			let (secret, digest) = recover_subset(&selected, hash, opts.padding)?;
			Ok(finish(secret, digest, identifier, threshold, hash, started))
		},
		SelectBy::Sample => {
			let picked = rand::seq::index::sample(rng, shares.len(), m);
			let selected: Vec<&Share> = picked.iter().map(|i| &shares[i]).collect();
			let (secret, digest) = recover_subset(&selected, hash, opts.padding)?;
			Ok(finish(secret, digest, identifier, threshold, hash, started))
		},
		SelectBy::Combinations => {
			if hash == HashAlgorithm::None {
				return Err(TssError::CombinationsRequireDigest);
			}
			if !combinations_within_bound(shares.len(), m) {
				return Err(TssError::TooManyCombinations {
					shares: shares.len(),
					threshold,
					max: MAX_COMBINATIONS,
				});
			}

			for subset in Combinations::new(shares.len(), m) {
				let selected: Vec<&Share> = subset.iter().map(|&i| &shares[i]).collect();
				match recover_subset(&selected, hash, opts.padding) {
					Ok((secret, digest)) => {
						return Ok(finish(secret, digest, identifier, threshold, hash, started))
					},
					Err(
						TssError::DigestMismatch
						| TssError::InvalidPadding { .. }
						| TssError::NoSecretRecovered,
					) => {
						tracing::debug!("share subset {:?} did not verify, trying next", subset);
					},
					Err(e) => return Err(e),
				}
			}

			Err(TssError::NoSecretRecovered)
		},
	}
}

/// Decode the inputs as all-human or all-binary shares.
fn normalize<S: AsRef<[u8]>>(inputs: &[S]) -> TssResult<Vec<Share>> {
	let human = inputs.iter().filter(|i| matches_human_pattern(i.as_ref())).count();
	if human == inputs.len() {
		inputs
			.iter()
			.map(|i| {
				let s = core::str::from_utf8(i.as_ref()).expect("human pattern implies UTF-8");
				Share::from_human(s)
			})
			.collect()
	} else if human == 0 {
		inputs.iter().map(|i| Share::from_bytes(i.as_ref())).collect()
	} else {
		Err(TssError::MixedShareFormats)
	}
}

/// Reconstruct and verify the secret from exactly threshold-many shares.
///
/// Returns the secret and the embedded digest octets, if any.
fn recover_subset(
	shares: &[&Share],
	hash: HashAlgorithm,
	padding: bool,
) -> TssResult<(Vec<u8>, Option<Vec<u8>>)> {
	let xs: Vec<Gf256> = shares.iter().map(|s| Gf256(s.x())).collect();
	let len = shares[0].payload().len();

	let mut reconstructed = Vec::with_capacity(len);
	for p in 0..len {
		let ys: Vec<Gf256> = shares.iter().map(|s| Gf256(s.payload()[p])).collect();
		reconstructed.push(interpolate_at_zero(&xs, &ys).value());
	}

	let outcome = verify_payload(&reconstructed, hash, padding);
	reconstructed.zeroize();
	outcome
}

/// Strip the padding, then split off and check the embedded digest.
///
/// Splitting produced `pad(secret || digest)`, so unpadding the whole
/// payload comes first and the trailing digest octets come off the
/// unpadded result.
fn verify_payload(
	payload: &[u8],
	hash: HashAlgorithm,
	padding: bool,
) -> TssResult<(Vec<u8>, Option<Vec<u8>>)> {
	let body = if padding {
		let body_len = pkcs7::unpad(payload, u8::MAX)?;
		&payload[..body_len]
	} else {
		payload
	};

	if hash == HashAlgorithm::None {
		if body.is_empty() {
			return Err(TssError::NoSecretRecovered);
		}
		return Ok((body.to_vec(), None));
	}

	// A wrong subset can unpad to any length, so a body too short to
	// carry the digest is a failed reconstruction, not a hard fault.
	let digest_len = hash.digest_len();
	if body.len() < digest_len + 1 {
		return Err(TssError::NoSecretRecovered);
	}

	let (secret, embedded) = body.split_at(body.len() - digest_len);
	let mut actual = hash.digest(secret);
	let matches: bool = actual.ct_eq(embedded).into();
	actual.zeroize();
	if !matches {
		return Err(TssError::DigestMismatch);
	}

	Ok((secret.to_vec(), Some(embedded.to_vec())))
}

fn finish(
	secret: Vec<u8>,
	digest: Option<Vec<u8>>,
	identifier: Identifier,
	threshold: u8,
	hash: HashAlgorithm,
	started: Instant,
) -> RecoveredSecret {
	RecoveredSecret {
		secret,
		identifier,
		threshold,
		hash,
		digest: digest.map(hex::encode),
		elapsed_ms: started.elapsed().as_millis() as u64,
	}
}

/// Whether C(n, k) stays within [`MAX_COMBINATIONS`].
fn combinations_within_bound(n: usize, k: usize) -> bool {
	let k = k.min(n - k);
	let mut count: u128 = 1;
	for i in 0..k {
		// Exact at every step: C(n, i+1) = C(n, i) * (n - i) / (i + 1).
		count = count * (n - i) as u128 / (i as u128 + 1);
		if count > MAX_COMBINATIONS as u128 {
			return false;
		}
	}
	true
}

/// Lexicographic k-subsets of 0..n by index position.
struct Combinations {
	n: usize,
	indices: Vec<usize>,
	done: bool,
}

impl Combinations {
	fn new(n: usize, k: usize) -> Self {
		Self { n, indices: (0..k).collect(), done: k > n }
	}
}

impl Iterator for Combinations {
	type Item = Vec<usize>;

	fn next(&mut self) -> Option<Vec<usize>> {
		if self.done {
			return None;
		}
		let current = self.indices.clone();

		// Advance to the next subset, rightmost index first.
		let k = self.indices.len();
		let mut i = k;
		loop {
			if i == 0 {
				self.done = true;
				break;
			}
			i -= 1;
			if self.indices[i] < self.n - k + i {
				self.indices[i] += 1;
				for j in i + 1..k {
					self.indices[j] = self.indices[j - 1] + 1;
				}
				break;
			}
		}

		Some(current)
	}
}

#[cfg(test)]
mod tests {
	use rand::{rngs::StdRng, SeedableRng};

	use super::*;
	use crate::split::{split_with_rng, SplitConfig};

	fn shares_for(
		secret: &[u8],
		threshold: u8,
		num_shares: u8,
		hash: HashAlgorithm,
	) -> Vec<Vec<u8>> {
		let mut rng = StdRng::seed_from_u64(42);
		let config = SplitConfig::new(threshold, num_shares).unwrap().with_hash(hash);
		split_with_rng(secret, &config, &mut rng)
			.unwrap()
			.iter()
			.map(|s| s.to_bytes())
			.collect()
	}

	#[test]
	fn test_first_selection_roundtrip() {
		let shares = shares_for(b"hello", 2, 3, HashAlgorithm::Sha256);
		let recovered = combine(&shares, &CombineOpts::default()).unwrap();
		assert_eq!(recovered.secret(), b"hello");
		assert_eq!(recovered.threshold(), 2);
		assert_eq!(recovered.hash(), HashAlgorithm::Sha256);
		assert_eq!(recovered.digest().unwrap(), hex::encode(HashAlgorithm::Sha256.digest(b"hello")));
	}

	#[test]
	fn test_sample_selection_roundtrip() {
		let shares = shares_for(b"hello", 2, 5, HashAlgorithm::Sha256);
		let opts = CombineOpts { select_by: SelectBy::Sample, ..CombineOpts::default() };
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..10 {
			let recovered = combine_with_rng(&shares, &opts, &mut rng).unwrap();
			assert_eq!(recovered.secret(), b"hello");
		}
	}

	#[test]
	fn test_insufficient_shares() {
		let shares = shares_for(b"hello", 3, 5, HashAlgorithm::Sha256);
		let err = combine(&shares[..2], &CombineOpts::default()).unwrap_err();
		assert_eq!(err, TssError::InsufficientShares { provided: 2, required: 3 });

		let none: Vec<Vec<u8>> = Vec::new();
		assert!(combine(&none, &CombineOpts::default()).is_err());
	}

	#[test]
	fn test_mixed_formats_rejected() {
		let mut rng = StdRng::seed_from_u64(42);
		let config =
			SplitConfig::new(2, 2).unwrap().with_identifier(*b"testid0000000000");
		let shares = split_with_rng(b"hello", &config, &mut rng).unwrap();

		let mixed = vec![
			shares[0].to_bytes(),
			shares[1].to_human().unwrap().into_bytes(),
		];
		assert_eq!(
			combine(&mixed, &CombineOpts::default()).unwrap_err(),
			TssError::MixedShareFormats
		);
	}

	#[test]
	fn test_inconsistent_headers_rejected() {
		let a = shares_for(b"hello", 2, 2, HashAlgorithm::Sha256);
		let b = shares_for(b"hello", 2, 2, HashAlgorithm::Sha1);
		let mixed = vec![a[0].clone(), b[1].clone()];
		let err = combine(&mixed, &CombineOpts::default()).unwrap_err();
		assert!(matches!(
			err,
			TssError::InconsistentHeaders | TssError::UnequalShareLengths
		));
	}

	#[test]
	fn test_duplicate_x_rejected() {
		let shares = shares_for(b"hello", 2, 3, HashAlgorithm::Sha256);
		let dup = vec![shares[0].clone(), shares[0].clone()];
		assert_eq!(
			combine(&dup, &CombineOpts::default()).unwrap_err(),
			TssError::DuplicateShareIndex { x: 1 }
		);
	}

	#[test]
	fn test_corrupted_payload_fails_digest() {
		let mut shares = shares_for(b"hello", 2, 2, HashAlgorithm::Sha256);
		let last = shares[1].len() - 1;
		shares[1][last] ^= 0x01;
		let err = combine(&shares, &CombineOpts::default()).unwrap_err();
		assert!(matches!(err, TssError::DigestMismatch | TssError::InvalidPadding { .. }));
	}

	#[test]
	fn test_combinations_recover_despite_corruption() {
		let mut shares = shares_for(b"hello", 2, 4, HashAlgorithm::Sha256);
		// Corrupt the first share so FIRST selection fails but some
		// subset without it still verifies.
		shares[0][25] ^= 0xFF;
		assert!(combine(&shares, &CombineOpts::default()).is_err());

		let opts = CombineOpts { select_by: SelectBy::Combinations, ..CombineOpts::default() };
		let recovered = combine(&shares, &opts).unwrap();
		assert_eq!(recovered.secret(), b"hello");
	}

	#[test]
	fn test_combinations_require_digest() {
		let shares = shares_for(b"hello", 2, 3, HashAlgorithm::None);
		let opts = CombineOpts { select_by: SelectBy::Combinations, ..CombineOpts::default() };
		assert_eq!(
			combine(&shares, &opts).unwrap_err(),
			TssError::CombinationsRequireDigest
		);
	}

	#[test]
	fn test_combinations_bound() {
		assert!(combinations_within_bound(5, 3));
		assert!(!combinations_within_bound(30, 15));
		assert!(!combinations_within_bound(255, 128));
		assert!(combinations_within_bound(255, 1));
		assert!(combinations_within_bound(255, 254));
	}

	#[test]
	fn test_combinations_iterator_lexicographic() {
		let subsets: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
		assert_eq!(
			subsets,
			vec![
				vec![0, 1],
				vec![0, 2],
				vec![0, 3],
				vec![1, 2],
				vec![1, 3],
				vec![2, 3]
			]
		);

		let all: Vec<Vec<usize>> = Combinations::new(3, 3).collect();
		assert_eq!(all, vec![vec![0, 1, 2]]);
	}

	#[test]
	fn test_recovered_secret_debug_redacts() {
		let shares = shares_for(b"hello", 2, 2, HashAlgorithm::Sha256);
		let recovered = combine(&shares, &CombineOpts::default()).unwrap();
		let debug = format!("{:?}", recovered);
		assert!(debug.contains("REDACTED"));
		assert!(!debug.contains("hello"));
	}

	#[test]
	fn test_into_secret_takes_ownership() {
		let shares = shares_for(b"hello", 2, 2, HashAlgorithm::Sha256);
		let recovered = combine(&shares, &CombineOpts::default()).unwrap();
		assert_eq!(recovered.into_secret(), b"hello".to_vec());
	}
}
