//! Share types and the binary/human codecs.
//!
//! A share is a fixed 20-octet header followed by a body: one X-coordinate
//! octet and the payload octets produced by the split polynomials. The
//! human-readable form wraps the entire binary share in URL-safe base64
//! inside a `tss~` string so shares survive copy-paste, chat and e-mail.
//!
//! Binary layout (multi-byte fields in network order):
//!
//! ```text
//! offset  size  field
//! 0       16    identifier
//! 16       1    hash algorithm code (0|1|2)
//! 17       1    threshold M (1..255)
//! 18       2    share_len = 1 + payload_len (big-endian)
//! 20       1    X coordinate (1..255)
//! 21     L-1    payload octets
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::{rngs::OsRng, CryptoRng, RngCore};

use crate::error::{TssError, TssResult};
use crate::hash::HashAlgorithm;

/// Length of the share identifier in octets.
pub const IDENTIFIER_LEN: usize = 16;

/// Length of the binary share header in octets.
pub const HEADER_LEN: usize = 20;

/// A 16-octet label binding the shares of one secret together.
///
/// The core treats the identifier as opaque octets; printability is a
/// front-end policy. Only printable identifiers have a human form.
pub type Identifier = [u8; IDENTIFIER_LEN];

/// Generate a random identifier of 16 printable hex characters.
pub fn generate_identifier() -> Identifier {
	generate_identifier_with_rng(&mut OsRng)
}

/// Generate a random identifier from the supplied entropy source.
pub fn generate_identifier_with_rng<R: CryptoRng + RngCore>(rng: &mut R) -> Identifier {
	let mut raw = [0u8; IDENTIFIER_LEN / 2];
	rng.fill_bytes(&mut raw);
	let mut id = [0u8; IDENTIFIER_LEN];
	id.copy_from_slice(hex::encode(raw).as_bytes());
	id
}

/// One share of a split secret.
///
/// Shares are meant to be distributed, so the payload is not treated as
/// secret material; fewer than threshold-many payloads are information-
/// theoretically independent of the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Share {
	/// Identifier common to the whole share set.
	identifier: Identifier,
	/// Digest algorithm embedded in the payload.
	hash: HashAlgorithm,
	/// Minimum number of shares needed to reconstruct.
	threshold: u8,
	/// X-coordinate of this share's evaluation points.
	x: u8,
	/// One polynomial evaluation per padded secret octet.
	payload: Vec<u8>,
}

impl Share {
	pub(crate) fn new(
		identifier: Identifier,
		hash: HashAlgorithm,
		threshold: u8,
		x: u8,
		payload: Vec<u8>,
	) -> Self {
		Self { identifier, hash, threshold, x, payload }
	}

	/// Identifier common to the whole share set.
	pub fn identifier(&self) -> &Identifier {
		&self.identifier
	}

	/// Digest algorithm embedded in the payload.
	pub fn hash(&self) -> HashAlgorithm {
		self.hash
	}

	/// Threshold required to reconstruct the secret.
	pub fn threshold(&self) -> u8 {
		self.threshold
	}

	/// X-coordinate of this share.
	pub fn x(&self) -> u8 {
		self.x
	}

	/// Payload octets (one per padded secret octet).
	pub fn payload(&self) -> &[u8] {
		&self.payload
	}

	/// Serialize to the binary wire format.
	pub fn to_bytes(&self) -> Vec<u8> {
		let share_len = (1 + self.payload.len()) as u16;
		let mut out = Vec::with_capacity(HEADER_LEN + 1 + self.payload.len());
		out.extend_from_slice(&self.identifier);
		out.push(self.hash.code());
		out.push(self.threshold);
		out.extend_from_slice(&share_len.to_be_bytes());
		out.push(self.x);
		out.extend_from_slice(&self.payload);
		out
	}

	/// Parse a share from the binary wire format.
	///
	/// Rejects truncated input, unregistered hash codes, a zero threshold
	/// and a `share_len` field that disagrees with the actual length. The
	/// X-coordinate is validated at the set level, not here.
	pub fn from_bytes(bytes: &[u8]) -> TssResult<Self> {
		if bytes.len() < HEADER_LEN {
			return Err(TssError::MalformedShare { reason: "truncated header" });
		}

		let mut identifier = [0u8; IDENTIFIER_LEN];
		identifier.copy_from_slice(&bytes[..IDENTIFIER_LEN]);
		let hash = HashAlgorithm::from_code(bytes[16])?;
		let threshold = bytes[17];
		let share_len = u16::from_be_bytes([bytes[18], bytes[19]]) as usize;

		if threshold == 0 {
			return Err(TssError::MalformedShare { reason: "zero threshold" });
		}
		if share_len < 2 {
			return Err(TssError::MalformedShare { reason: "share body too short" });
		}
		if bytes.len() != HEADER_LEN + share_len {
			return Err(TssError::MalformedShare {
				reason: "length disagrees with share_len header field",
			});
		}

		let x = bytes[HEADER_LEN];
		let payload = bytes[HEADER_LEN + 1..].to_vec();

		Ok(Self { identifier, hash, threshold, x, payload })
	}

	/// Render the human string form: `tss~<id>~<threshold>~<base64url>`.
	///
	/// The identifier must be printable ASCII (NUL-padded identifiers are
	/// rendered without the padding); opaque binary identifiers have no
	/// human form and fail here.
	pub fn to_human(&self) -> TssResult<String> {
		let id_text = identifier_text(&self.identifier)?;
		let encoded = URL_SAFE_NO_PAD.encode(self.to_bytes());
		Ok(format!("tss~{}~{}~{}", id_text, self.threshold, encoded))
	}

	/// Parse the human string form.
	///
	/// The identifier and threshold fields of the string are advisory; the
	/// authoritative values come from the embedded binary header.
	pub fn from_human(s: &str) -> TssResult<Self> {
		let (_, _, payload) = human_parts(s)?;
		let bytes = URL_SAFE_NO_PAD
			.decode(payload)
			.map_err(|e| TssError::Base64Decode { detail: e.to_string() })?;
		Self::from_bytes(&bytes)
	}
}

/// Render an identifier as human text, stripping trailing NUL padding.
///
/// `~` is the field separator of the human form, so identifiers that
/// contain it have no human rendering.
fn identifier_text(identifier: &Identifier) -> TssResult<&str> {
	let end = identifier.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
	let text = &identifier[..end];
	if !text.iter().all(|&b| (0x20..=0x7E).contains(&b) && b != b'~') {
		return Err(TssError::InvalidIdentifier { reason: "identifier is not printable ASCII" });
	}
	// Printable ASCII is valid UTF-8.
	Ok(core::str::from_utf8(text).expect("printable ASCII"))
}

/// Split a human share string into its (id, threshold, base64) fields.
///
/// Accepts `tss~<printable id, 0..=16 chars>~<1..=255>~<base64url>`.
fn human_parts(s: &str) -> TssResult<(&str, &str, &str)> {
	let rest = s
		.strip_prefix("tss~")
		.ok_or(TssError::MalformedHumanShare { reason: "missing tss~ prefix" })?;
	let (id_text, rest) = rest
		.split_once('~')
		.ok_or(TssError::MalformedHumanShare { reason: "expected four ~-separated fields" })?;
	let (threshold_text, payload) = rest
		.split_once('~')
		.ok_or(TssError::MalformedHumanShare { reason: "expected four ~-separated fields" })?;

	if id_text.len() > IDENTIFIER_LEN
		|| !id_text.bytes().all(|b| (0x20..=0x7E).contains(&b) && b != b'~')
	{
		return Err(TssError::MalformedHumanShare {
			reason: "identifier text must be printable ASCII",
		});
	}

	let valid_threshold = !threshold_text.is_empty()
		&& threshold_text.len() <= 3
		&& !threshold_text.starts_with('0')
		&& threshold_text.bytes().all(|b| b.is_ascii_digit())
		&& threshold_text.parse::<u16>().map_or(false, |t| (1..=255).contains(&t));
	if !valid_threshold {
		return Err(TssError::MalformedHumanShare { reason: "threshold field out of range" });
	}

	if payload.is_empty()
		|| !payload.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
	{
		return Err(TssError::MalformedHumanShare { reason: "payload is not base64url" });
	}

	Ok((id_text, threshold_text, payload))
}

/// Whether the bytes look like a human-format share string.
///
/// Used by the combiner to normalize its inputs: all inputs must match
/// this pattern to be treated as human shares.
pub(crate) fn matches_human_pattern(bytes: &[u8]) -> bool {
	match core::str::from_utf8(bytes) {
		Ok(s) => human_parts(s).is_ok(),
		Err(_) => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_share() -> Share {
		Share::new(
			*b"testid0000000000",
			HashAlgorithm::Sha256,
			3,
			7,
			vec![0xDE, 0xAD, 0xBE, 0xEF],
		)
	}

	#[test]
	fn test_binary_roundtrip() {
		let share = sample_share();
		let bytes = share.to_bytes();
		assert_eq!(bytes.len(), HEADER_LEN + 1 + 4);
		assert_eq!(&bytes[..IDENTIFIER_LEN], b"testid0000000000");
		assert_eq!(bytes[16], 2);
		assert_eq!(bytes[17], 3);
		assert_eq!(u16::from_be_bytes([bytes[18], bytes[19]]), 5);
		assert_eq!(bytes[20], 7);

		let parsed = Share::from_bytes(&bytes).unwrap();
		assert_eq!(parsed, share);
	}

	#[test]
	fn test_from_bytes_rejects_truncation() {
		let share = sample_share();
		let bytes = share.to_bytes();
		assert!(Share::from_bytes(&bytes[..10]).is_err());
		assert!(Share::from_bytes(&bytes[..bytes.len() - 1]).is_err());

		let mut extended = bytes.clone();
		extended.push(0);
		assert!(Share::from_bytes(&extended).is_err());
	}

	#[test]
	fn test_from_bytes_rejects_bad_header_fields() {
		let share = sample_share();

		let mut bad_hash = share.to_bytes();
		bad_hash[16] = 9;
		assert!(matches!(
			Share::from_bytes(&bad_hash),
			Err(TssError::UnknownHashCode { code: 9 })
		));

		let mut zero_threshold = share.to_bytes();
		zero_threshold[17] = 0;
		assert!(Share::from_bytes(&zero_threshold).is_err());

		let mut bad_len = share.to_bytes();
		bad_len[18] = 0xFF;
		assert!(Share::from_bytes(&bad_len).is_err());
	}

	#[test]
	fn test_human_roundtrip() {
		let share = sample_share();
		let human = share.to_human().unwrap();
		assert!(human.starts_with("tss~testid0000000000~3~"));
		assert!(matches_human_pattern(human.as_bytes()));

		let parsed = Share::from_human(&human).unwrap();
		assert_eq!(parsed, share);
	}

	#[test]
	fn test_human_strips_nul_padding() {
		let mut id = [0u8; IDENTIFIER_LEN];
		id[..4].copy_from_slice(b"abcd");
		let share = Share::new(id, HashAlgorithm::None, 2, 1, vec![0x01]);
		let human = share.to_human().unwrap();
		assert!(human.starts_with("tss~abcd~2~"));
		assert_eq!(*Share::from_human(&human).unwrap().identifier(), id);
	}

	#[test]
	fn test_human_rejects_unprintable_identifier() {
		let share =
			Share::new([0xFFu8; IDENTIFIER_LEN], HashAlgorithm::None, 2, 1, vec![0x01]);
		assert!(matches!(share.to_human(), Err(TssError::InvalidIdentifier { .. })));

		// The field separator cannot appear inside an identifier.
		let share = Share::new(*b"tilde~tilde00000", HashAlgorithm::None, 2, 1, vec![0x01]);
		assert!(share.to_human().is_err());
	}

	#[test]
	fn test_from_human_rejects_malformed_strings() {
		for bad in [
			"",
			"tss",
			"tss~id~2",
			"xss~id~2~QUJD",
			"tss~id~0~QUJD",
			"tss~id~256~QUJD",
			"tss~id~02~QUJD",
			"tss~id~2~",
			"tss~id~2~not base64!",
			"tss~this-identifier-is-longer-than-sixteen~2~QUJD",
		] {
			assert!(Share::from_human(bad).is_err(), "accepted {:?}", bad);
			assert!(!matches_human_pattern(bad.as_bytes()));
		}
	}

	#[test]
	fn test_from_human_surfaces_decode_fault() {
		// Pattern-valid base64url that is not a whole number of bytes.
		let err = Share::from_human("tss~id~2~A").unwrap_err();
		assert!(matches!(err, TssError::Base64Decode { .. }));
	}

	#[test]
	fn test_generated_identifier_is_printable_hex() {
		use rand::{rngs::StdRng, SeedableRng};
		let mut rng = StdRng::seed_from_u64(1);
		let id = generate_identifier_with_rng(&mut rng);
		assert!(id.iter().all(|b| b.is_ascii_hexdigit()));

		let other = generate_identifier_with_rng(&mut rng);
		assert_ne!(id, other);
	}
}
