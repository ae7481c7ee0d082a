//! Share-set validation helpers.
//!
//! Each helper checks one invariant of a set of co-generated shares and
//! returns a typed fault. The combiner composes them in a fixed order so
//! the first violated invariant is the one reported.

use crate::error::{TssError, TssResult};
use crate::share::Share;

/// Every share must carry the same identifier, hash, threshold and length.
pub(crate) fn headers_identical(shares: &[Share]) -> TssResult<()> {
	let first = &shares[0];
	for share in &shares[1..] {
		if share.identifier() != first.identifier()
			|| share.hash() != first.hash()
			|| share.threshold() != first.threshold()
		{
			return Err(TssError::InconsistentHeaders);
		}
	}
	Ok(())
}

/// Every share body must have the same length.
pub(crate) fn bodies_uniform_length(shares: &[Share]) -> TssResult<()> {
	let len = shares[0].payload().len();
	if shares.iter().any(|s| s.payload().len() != len) {
		return Err(TssError::UnequalShareLengths);
	}
	Ok(())
}

/// At least threshold-many shares must be present.
pub(crate) fn threshold_met(count: usize, threshold: u8) -> TssResult<()> {
	if count < threshold as usize {
		return Err(TssError::InsufficientShares { provided: count, required: threshold });
	}
	Ok(())
}

/// X-coordinates must be nonzero and pairwise distinct.
pub(crate) fn xs_nonzero_and_distinct(xs: &[u8]) -> TssResult<()> {
	let mut seen = [false; 256];
	for &x in xs {
		if x == 0 {
			return Err(TssError::ZeroShareIndex);
		}
		if seen[x as usize] {
			return Err(TssError::DuplicateShareIndex { x });
		}
		seen[x as usize] = true;
	}
	Ok(())
}
