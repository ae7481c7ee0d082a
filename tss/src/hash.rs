//! The closed registry of share digest algorithms.
//!
//! Every share header carries a one-octet code selecting the digest that
//! was embedded at split time. The registry is closed: only the codes
//! below are valid, and unknown codes are rejected at parse time.

use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{TssError, TssResult};

/// Digest algorithm embedded in a share set.
///
/// | code | name   | digest octets |
/// |------|--------|---------------|
/// | 0    | NONE   | 0             |
/// | 1    | SHA1   | 20            |
/// | 2    | SHA256 | 32            |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HashAlgorithm {
	/// No embedded digest.
	None,
	/// SHA-1, 20-octet digest.
	Sha1,
	/// SHA-256, 32-octet digest.
	#[default]
	Sha256,
}

/// The algorithms that actually embed a digest.
pub const WITH_DIGEST: [HashAlgorithm; 2] = [HashAlgorithm::Sha1, HashAlgorithm::Sha256];

impl HashAlgorithm {
	/// One-octet registry code.
	pub fn code(self) -> u8 {
		match self {
			HashAlgorithm::None => 0,
			HashAlgorithm::Sha1 => 1,
			HashAlgorithm::Sha256 => 2,
		}
	}

	/// Look up an algorithm by its registry code.
	pub fn from_code(code: u8) -> TssResult<Self> {
		match code {
			0 => Ok(HashAlgorithm::None),
			1 => Ok(HashAlgorithm::Sha1),
			2 => Ok(HashAlgorithm::Sha256),
			_ => Err(TssError::UnknownHashCode { code }),
		}
	}

	/// Canonical algorithm name.
	pub fn name(self) -> &'static str {
		match self {
			HashAlgorithm::None => "NONE",
			HashAlgorithm::Sha1 => "SHA1",
			HashAlgorithm::Sha256 => "SHA256",
		}
	}

	/// Look up an algorithm by name, case-insensitively.
	pub fn from_name(name: &str) -> TssResult<Self> {
		match name.to_ascii_uppercase().as_str() {
			"NONE" => Ok(HashAlgorithm::None),
			"SHA1" => Ok(HashAlgorithm::Sha1),
			"SHA256" => Ok(HashAlgorithm::Sha256),
			_ => Err(TssError::UnknownHashName { name: name.to_string() }),
		}
	}

	/// Digest length in octets.
	pub fn digest_len(self) -> usize {
		match self {
			HashAlgorithm::None => 0,
			HashAlgorithm::Sha1 => 20,
			HashAlgorithm::Sha256 => 32,
		}
	}

	/// Compute the digest of the given bytes. Empty for `None`.
	pub fn digest(self, data: &[u8]) -> Vec<u8> {
		match self {
			HashAlgorithm::None => Vec::new(),
			HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
			HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
		}
	}
}

impl core::fmt::Display for HashAlgorithm {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_code_roundtrip() {
		for algo in [HashAlgorithm::None, HashAlgorithm::Sha1, HashAlgorithm::Sha256] {
			assert_eq!(HashAlgorithm::from_code(algo.code()).unwrap(), algo);
			assert_eq!(HashAlgorithm::from_name(algo.name()).unwrap(), algo);
		}
	}

	#[test]
	fn test_unknown_code_and_name() {
		assert!(matches!(
			HashAlgorithm::from_code(3),
			Err(TssError::UnknownHashCode { code: 3 })
		));
		assert!(matches!(
			HashAlgorithm::from_code(255),
			Err(TssError::UnknownHashCode { .. })
		));
		assert!(HashAlgorithm::from_name("md5").is_err());
	}

	#[test]
	fn test_name_is_case_insensitive() {
		assert_eq!(HashAlgorithm::from_name("sha256").unwrap(), HashAlgorithm::Sha256);
		assert_eq!(HashAlgorithm::from_name("Sha1").unwrap(), HashAlgorithm::Sha1);
		assert_eq!(HashAlgorithm::from_name("none").unwrap(), HashAlgorithm::None);
	}

	#[test]
	fn test_digest_lengths() {
		let data = b"threshold";
		assert_eq!(HashAlgorithm::None.digest(data).len(), 0);
		assert_eq!(HashAlgorithm::Sha1.digest(data).len(), 20);
		assert_eq!(HashAlgorithm::Sha256.digest(data).len(), 32);
		for algo in WITH_DIGEST {
			assert_eq!(algo.digest(data).len(), algo.digest_len());
		}
	}

	#[test]
	fn test_known_vectors() {
		// FIPS 180 test vectors for "abc".
		assert_eq!(
			hex::encode(HashAlgorithm::Sha1.digest(b"abc")),
			"a9993e364706816aba3e25717850c26c9cd0d89d"
		);
		assert_eq!(
			hex::encode(HashAlgorithm::Sha256.digest(b"abc")),
			"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
		);
	}
}
