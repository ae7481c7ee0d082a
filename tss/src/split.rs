//! Secret splitting.
//!
//! Splitting turns a secret octet string into N shares of which any M
//! reconstruct it. The secret is optionally extended with a digest of
//! itself, padded, and then shared octet-by-octet: each octet becomes the
//! constant term of a fresh random degree-(M-1) polynomial, and share i
//! collects the evaluations at X = i.

use rand::{rngs::OsRng, CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{validate_split_params, TssError, TssResult};
use crate::gf256::Gf256;
use crate::hash::HashAlgorithm;
use crate::pkcs7;
use crate::polynomial::Polynomial;
use crate::share::{generate_identifier_with_rng, Identifier, Share};
use crate::MAX_SECRET_LEN;

/// Longest padded payload that still fits the 16-bit share_len field.
const MAX_PAYLOAD_LEN: usize = u16::MAX as usize - 1;

/// Configuration for one split operation.
///
/// # Example
///
/// ```
/// use rtss::{HashAlgorithm, SplitConfig};
///
/// let config = SplitConfig::new(3, 5)
/// 	.expect("valid parameters")
/// 	.with_hash(HashAlgorithm::Sha256)
/// 	.with_pad_blocksize(32);
/// assert_eq!(config.threshold(), 3);
/// assert_eq!(config.num_shares(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
	/// Threshold value (minimum shares required to reconstruct).
	threshold: u8,
	/// Total number of shares to produce.
	num_shares: u8,
	/// Digest algorithm embedded for verification at combine time.
	hash: HashAlgorithm,
	/// PKCS#7 block size; 0 disables padding.
	pad_blocksize: u8,
	/// Identifier stamped into every share; generated when absent.
	identifier: Option<Identifier>,
}

impl SplitConfig {
	/// Create a split configuration for an (M, N) scheme.
	///
	/// Defaults: SHA-256 digest, padding block size 16, generated
	/// identifier.
	///
	/// # Errors
	///
	/// Returns an error if `threshold` is zero or exceeds `num_shares`.
	pub fn new(threshold: u8, num_shares: u8) -> TssResult<Self> {
		validate_split_params(threshold, num_shares)?;
		Ok(Self {
			threshold,
			num_shares,
			hash: HashAlgorithm::Sha256,
			pad_blocksize: 16,
			identifier: None,
		})
	}

	/// Select the digest algorithm (`HashAlgorithm::None` disables
	/// verification and combinatorial recovery).
	pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
		self.hash = hash;
		self
	}

	/// Set the PKCS#7 padding block size; 0 disables padding.
	pub fn with_pad_blocksize(mut self, pad_blocksize: u8) -> Self {
		self.pad_blocksize = pad_blocksize;
		self
	}

	/// Stamp a caller-chosen identifier instead of a generated one.
	pub fn with_identifier(mut self, identifier: Identifier) -> Self {
		self.identifier = Some(identifier);
		self
	}

	/// Get the threshold value.
	#[inline]
	pub fn threshold(&self) -> u8 {
		self.threshold
	}

	/// Get the total number of shares.
	#[inline]
	pub fn num_shares(&self) -> u8 {
		self.num_shares
	}

	/// Get the digest algorithm.
	#[inline]
	pub fn hash(&self) -> HashAlgorithm {
		self.hash
	}

	/// Get the padding block size.
	#[inline]
	pub fn pad_blocksize(&self) -> u8 {
		self.pad_blocksize
	}
}

/// Split a secret into shares using the system entropy source.
pub fn split(secret: &[u8], config: &SplitConfig) -> TssResult<Vec<Share>> {
	split_with_rng(secret, config, &mut OsRng)
}

/// Split a secret into shares from the supplied entropy source.
///
/// Each payload position gets its own polynomial, so the coefficients are
/// independent across positions; fewer than threshold-many shares carry
/// no information about the secret.
pub fn split_with_rng<R: CryptoRng + RngCore>(
	secret: &[u8],
	config: &SplitConfig,
	rng: &mut R,
) -> TssResult<Vec<Share>> {
	if secret.is_empty() {
		return Err(TssError::EmptySecret);
	}
	if secret.len() > MAX_SECRET_LEN {
		return Err(TssError::SecretTooLarge { length: secret.len(), max: MAX_SECRET_LEN });
	}

	let identifier = match config.identifier {
		Some(id) => id,
		None => generate_identifier_with_rng(rng),
	};

	// Payload = secret || digest(secret), PKCS#7 padded.
	let mut payload = secret.to_vec();
	payload.extend_from_slice(&config.hash.digest(secret));
	if config.pad_blocksize > 0 {
		pkcs7::pad(&mut payload, config.pad_blocksize);
	}
	if payload.len() > MAX_PAYLOAD_LEN {
		let length = payload.len();
		payload.zeroize();
		return Err(TssError::SecretTooLarge { length, max: MAX_PAYLOAD_LEN });
	}

	let num_shares = config.num_shares as usize;
	let mut bodies: Vec<Vec<u8>> =
		(0..num_shares).map(|_| Vec::with_capacity(payload.len())).collect();

	for &octet in &payload {
		let poly = Polynomial::random(Gf256(octet), config.threshold - 1, rng);
		for (i, body) in bodies.iter_mut().enumerate() {
			body.push(poly.evaluate(Gf256(i as u8 + 1)).value());
		}
	}
	payload.zeroize();

	Ok(bodies
		.into_iter()
		.enumerate()
		.map(|(i, body)| {
			Share::new(identifier, config.hash, config.threshold, i as u8 + 1, body)
		})
		.collect())
}
