//! PKCS#7 octet padding.
//!
//! The splitter pads the digest-augmented secret to a multiple of the
//! configured block size so that share payloads do not leak the exact
//! secret length. The pad octets all carry the count of octets added; an
//! input that is already a multiple of the block size gains a full block.

use crate::error::{TssError, TssResult};

/// Append PKCS#7 padding for the given block size (1..=255).
pub fn pad(buf: &mut Vec<u8>, block_size: u8) {
	let block = block_size as usize;
	debug_assert!(block > 0, "padding block size must be nonzero");
	let count = block - (buf.len() % block);
	buf.extend(std::iter::repeat(count as u8).take(count));
}

/// Strip PKCS#7 padding, returning the unpadded prefix length.
///
/// Fails if the final octet is zero, exceeds the block size or the buffer
/// length, or if the trailing octets are not all equal to it.
pub fn unpad(buf: &[u8], block_size: u8) -> TssResult<usize> {
	let last = match buf.last() {
		Some(&b) => b as usize,
		None => return Err(TssError::InvalidPadding { reason: "empty buffer" }),
	};

	if last == 0 {
		return Err(TssError::InvalidPadding { reason: "pad octet is zero" });
	}
	if last > block_size as usize {
		return Err(TssError::InvalidPadding { reason: "pad octet exceeds block size" });
	}
	if last > buf.len() {
		return Err(TssError::InvalidPadding { reason: "pad octet exceeds buffer length" });
	}
	if buf[buf.len() - last..].iter().any(|&b| b as usize != last) {
		return Err(TssError::InvalidPadding { reason: "trailing octets are not uniform" });
	}

	Ok(buf.len() - last)
}
