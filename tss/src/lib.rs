//! # Threshold Secret Sharing over GF(256)
//!
//! This crate implements the threshold secret sharing scheme of
//! draft-mcgrew-tss-03: a secret octet string is split into N shares of
//! which any M reconstruct it, while any M-1 reveal nothing. A digest of
//! the secret is optionally embedded (RTSS) so that reconstruction can be
//! verified, and with more than M shares available the combiner can walk
//! share subsets until a verified secret emerges.
//!
//! ## Overview
//!
//! Splitting works octet-by-octet: each octet of the (digest-extended,
//! padded) secret becomes the constant term of a fresh random polynomial
//! of degree M-1 over GF(256), and share i collects the evaluations at
//! X = i. Combining interpolates the constant term back from any M
//! evaluation points per octet.
//!
//! Shares travel either as binary octet strings or as human-readable
//! `tss~...` strings that survive copy-paste.
//!
//! ## Quick Start
//!
//! ```
//! use rtss::{combine, split, CombineOpts, HashAlgorithm, SplitConfig};
//!
//! // Split a secret 2-of-3 with an embedded SHA-256 digest.
//! let config = SplitConfig::new(2, 3)?.with_hash(HashAlgorithm::Sha256);
//! let shares = split(b"correct horse battery staple", &config)?;
//!
//! // Any two shares reconstruct and verify the secret.
//! let two: Vec<Vec<u8>> = shares.iter().take(2).map(|s| s.to_bytes()).collect();
//! let recovered = combine(&two, &CombineOpts::default())?;
//! assert_eq!(recovered.secret(), b"correct horse battery staple");
//! # Ok::<(), rtss::TssError>(())
//! ```
//!
//! ## Security Notes
//!
//! - Fewer than M shares are information-theoretically independent of the
//!   secret; the guarantee relies on the quality of the entropy source.
//! - Embedded digest verification uses a constant-time comparison.
//! - Secrets and polynomial coefficients are zeroized on drop. Shares are
//!   not treated as secret material.
//!
//! ## Features
//!
//! - `serde`: serialization of shares and option types.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

// Core modules
mod combine;
mod error;
pub mod gf256;
mod hash;
pub mod pkcs7;
pub mod polynomial;
mod share;
mod split;
mod validation;

// ============================================================================
// Public API
// ============================================================================

// Splitting
pub use split::{split, split_with_rng, SplitConfig};

// Combining
pub use combine::{
	combine, combine_with_rng, CombineOpts, RecoveredSecret, SelectBy, MAX_COMBINATIONS,
};

// Share types and codecs
pub use share::{
	generate_identifier, generate_identifier_with_rng, Identifier, Share, HEADER_LEN,
	IDENTIFIER_LEN,
};

// Digest registry
pub use hash::{HashAlgorithm, WITH_DIGEST};

// Error types
pub use error::{TssError, TssResult};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of shares in one set (the nonzero field elements).
pub const MAX_SHARES: u8 = 255;

/// Maximum secret length in octets.
pub const MAX_SECRET_LEN: usize = u16::MAX as usize;
