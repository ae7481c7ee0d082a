//! Error types for threshold secret sharing operations.

use core::fmt;

/// Result type for secret sharing operations.
pub type TssResult<T> = Result<T, TssError>;

/// Error types for secret sharing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TssError {
	/// Invalid split parameters (threshold, share count).
	InvalidParameters {
		/// Threshold value.
		threshold: u8,
		/// Total number of shares requested.
		shares: u8,
		/// Description of the validation error.
		reason: &'static str,
	},
	/// The identifier cannot be used as requested.
	InvalidIdentifier {
		/// Reason for invalidity.
		reason: &'static str,
	},
	/// The secret is empty.
	EmptySecret,
	/// The secret (after digest and padding) does not fit a share.
	SecretTooLarge {
		/// Length provided.
		length: usize,
		/// Maximum supported length.
		max: usize,
	},
	/// Unregistered hash algorithm code in a share header.
	UnknownHashCode {
		/// The offending code.
		code: u8,
	},
	/// Unregistered hash algorithm name.
	UnknownHashName {
		/// The offending name.
		name: String,
	},
	/// A binary share does not parse.
	MalformedShare {
		/// Reason the share was rejected.
		reason: &'static str,
	},
	/// A human-format share string does not match the expected pattern.
	MalformedHumanShare {
		/// Reason the string was rejected.
		reason: &'static str,
	},
	/// The base64url payload of a human share does not decode.
	Base64Decode {
		/// Decoder error description.
		detail: String,
	},
	/// Human and binary shares were mixed in one combine call.
	MixedShareFormats,
	/// Share headers within one set are not byte-identical.
	InconsistentHeaders,
	/// Shares within one set have different byte lengths.
	UnequalShareLengths,
	/// Fewer shares provided than the embedded threshold requires.
	InsufficientShares {
		/// Number of shares provided.
		provided: usize,
		/// Required threshold.
		required: u8,
	},
	/// A share carries the reserved X-coordinate zero.
	ZeroShareIndex,
	/// Two shares carry the same X-coordinate.
	DuplicateShareIndex {
		/// The duplicated X-coordinate.
		x: u8,
	},
	/// Combinatorial recovery was requested without an embedded digest.
	CombinationsRequireDigest,
	/// The subset search space exceeds the supported bound.
	TooManyCombinations {
		/// Number of shares provided.
		shares: usize,
		/// Embedded threshold (subset size).
		threshold: u8,
		/// Maximum number of subsets that will be attempted.
		max: u64,
	},
	/// The embedded digest did not match the reconstructed secret.
	DigestMismatch,
	/// The reconstructed payload carries invalid PKCS#7 padding.
	InvalidPadding {
		/// Reason the padding was rejected.
		reason: &'static str,
	},
	/// Reconstruction produced no verifiable secret.
	NoSecretRecovered,
}

impl fmt::Display for TssError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TssError::InvalidParameters { threshold, shares, reason } => {
				write!(
					f,
					"Invalid split parameters: threshold={}, shares={}, reason: {}",
					threshold, shares, reason
				)
			},
			TssError::InvalidIdentifier { reason } => {
				write!(f, "Invalid identifier: {}", reason)
			},
			TssError::EmptySecret => {
				write!(f, "Secret must be at least one octet")
			},
			TssError::SecretTooLarge { length, max } => {
				write!(f, "Secret too large: {} octets (max: {})", length, max)
			},
			TssError::UnknownHashCode { code } => {
				write!(f, "Unknown hash algorithm code: {}", code)
			},
			TssError::UnknownHashName { name } => {
				write!(f, "Unknown hash algorithm name: {}", name)
			},
			TssError::MalformedShare { reason } => {
				write!(f, "Malformed share: {}", reason)
			},
			TssError::MalformedHumanShare { reason } => {
				write!(f, "Malformed human share string: {}", reason)
			},
			TssError::Base64Decode { detail } => {
				write!(f, "Share payload is not valid base64url: {}", detail)
			},
			TssError::MixedShareFormats => {
				write!(f, "Shares must be all human-format or all binary, not a mix")
			},
			TssError::InconsistentHeaders => {
				write!(f, "Share headers are not identical across the set")
			},
			TssError::UnequalShareLengths => {
				write!(f, "Shares have different lengths")
			},
			TssError::InsufficientShares { provided, required } => {
				write!(f, "Insufficient shares: provided {}, required {}", provided, required)
			},
			TssError::ZeroShareIndex => {
				write!(f, "Share X-coordinate must be nonzero")
			},
			TssError::DuplicateShareIndex { x } => {
				write!(f, "Duplicate share X-coordinate: {}", x)
			},
			TssError::CombinationsRequireDigest => {
				write!(f, "Combinatorial recovery requires shares with an embedded digest")
			},
			TssError::TooManyCombinations { shares, threshold, max } => {
				write!(
					f,
					"Too many share combinations: C({}, {}) exceeds the maximum of {}",
					shares, threshold, max
				)
			},
			TssError::DigestMismatch => {
				write!(f, "Embedded digest does not match the reconstructed secret")
			},
			TssError::InvalidPadding { reason } => {
				write!(f, "Invalid PKCS#7 padding: {}", reason)
			},
			TssError::NoSecretRecovered => {
				write!(f, "No verifiable secret could be reconstructed")
			},
		}
	}
}

impl std::error::Error for TssError {}

/// Validate split parameters.
pub fn validate_split_params(threshold: u8, shares: u8) -> TssResult<()> {
	if threshold < 1 {
		return Err(TssError::InvalidParameters {
			threshold,
			shares,
			reason: "threshold must be at least 1",
		});
	}

	if shares < threshold {
		return Err(TssError::InvalidParameters {
			threshold,
			shares,
			reason: "threshold cannot exceed number of shares",
		});
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_valid_split_params() {
		assert!(validate_split_params(1, 1).is_ok());
		assert!(validate_split_params(2, 3).is_ok());
		assert!(validate_split_params(128, 255).is_ok());
		assert!(validate_split_params(255, 255).is_ok());
	}

	#[test]
	fn test_invalid_split_params() {
		// Threshold of zero
		assert!(validate_split_params(0, 3).is_err());

		// Threshold exceeds share count
		assert!(validate_split_params(5, 3).is_err());
	}

	#[test]
	fn test_error_messages_are_short_english() {
		let err = TssError::InsufficientShares { provided: 1, required: 3 };
		assert_eq!(err.to_string(), "Insufficient shares: provided 1, required 3");

		let err = TssError::UnknownHashCode { code: 9 };
		assert_eq!(err.to_string(), "Unknown hash algorithm code: 9");
	}
}
