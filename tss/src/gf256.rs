//! GF(256) field arithmetic.
//!
//! This module implements arithmetic in the field GF(2^8) under the
//! reduction polynomial x^8 + x^4 + x^3 + x + 1 (0x11B), the field used by
//! the share encoding. Multiplication and inversion go through exp/log
//! tables built at compile time from the generator 0x03.

use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};
use zeroize::Zeroize;

/// The reduction polynomial x^8 + x^4 + x^3 + x + 1.
const REDUCTION_POLY: u16 = 0x11B;

/// Build the exp/log tables for the generator 0x03.
///
/// The exp table is doubled (510 entries) so that a product of two logs,
/// each at most 254, indexes it directly without a fold modulo 255.
const fn build_tables() -> ([u8; 510], [u8; 256]) {
	let mut exp = [0u8; 510];
	let mut log = [0u8; 256];
	let mut x: u16 = 1;
	let mut i = 0;
	while i < 255 {
		exp[i] = x as u8;
		exp[i + 255] = x as u8;
		log[x as usize] = i as u8;
		// Multiply by the generator: x * 3 = (x << 1) ^ x, then reduce.
		let mut next = (x << 1) ^ x;
		if next & 0x100 != 0 {
			next ^= REDUCTION_POLY;
		}
		x = next;
		i += 1;
	}
	(exp, log)
}

const TABLES: ([u8; 510], [u8; 256]) = build_tables();
const EXP: [u8; 510] = TABLES.0;
const LOG: [u8; 256] = TABLES.1;

/// Element of GF(256).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gf256(pub u8);

impl Zeroize for Gf256 {
	fn zeroize(&mut self) {
		self.0.zeroize();
	}
}

impl Gf256 {
	/// Zero element.
	pub const ZERO: Self = Self(0);

	/// One element.
	pub const ONE: Self = Self(1);

	/// Get the value as u8.
	pub fn value(&self) -> u8 {
		self.0
	}

	/// Multiplicative inverse.
	///
	/// Library callers never divide by zero: Lagrange denominators are
	/// differences of distinct nonzero X-coordinates.
	pub fn inv(self) -> Self {
		assert!(self.0 != 0, "inverse of zero in GF(256)");
		Self(EXP[255 - LOG[self.0 as usize] as usize])
	}

	/// Exponentiation by a non-negative integer.
	pub fn pow(self, n: u32) -> Self {
		if n == 0 {
			return Self::ONE;
		}
		if self.0 == 0 {
			return Self::ZERO;
		}
		let log = LOG[self.0 as usize] as u32;
		Self(EXP[((log * n) % 255) as usize])
	}
}

impl Add for Gf256 {
	type Output = Self;

	fn add(self, other: Self) -> Self {
		Self(self.0 ^ other.0)
	}
}

impl AddAssign for Gf256 {
	fn add_assign(&mut self, other: Self) {
		*self = *self + other;
	}
}

impl Sub for Gf256 {
	type Output = Self;

	// Subtraction and addition coincide in a field of characteristic two.
	fn sub(self, other: Self) -> Self {
		Self(self.0 ^ other.0)
	}
}

impl SubAssign for Gf256 {
	fn sub_assign(&mut self, other: Self) {
		*self = *self - other;
	}
}

impl Mul for Gf256 {
	type Output = Self;

	fn mul(self, other: Self) -> Self {
		if self.0 == 0 || other.0 == 0 {
			return Self::ZERO;
		}
		Self(EXP[LOG[self.0 as usize] as usize + LOG[other.0 as usize] as usize])
	}
}

impl MulAssign for Gf256 {
	fn mul_assign(&mut self, other: Self) {
		*self = *self * other;
	}
}

impl Div for Gf256 {
	type Output = Self;

	fn div(self, other: Self) -> Self {
		self * other.inv()
	}
}

impl DivAssign for Gf256 {
	fn div_assign(&mut self, other: Self) {
		*self = *self / other;
	}
}
