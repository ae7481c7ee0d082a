//! Random polynomials and Lagrange interpolation over GF(256).
//!
//! Splitting samples one fresh random polynomial per secret octet with the
//! secret as the constant term; recovery interpolates the constant term
//! back from any threshold-many evaluation points.

use rand::{CryptoRng, Rng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::gf256::Gf256;

/// A polynomial over GF(256), least-significant coefficient first.
///
/// The coefficients are secret material and are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Polynomial(Vec<Gf256>);

impl Polynomial {
	/// Generate a random polynomial of the given degree with f(0) = constant.
	///
	/// The higher coefficients are drawn uniformly from the full field, so
	/// any fewer than degree + 1 evaluations reveal nothing about f(0).
	pub fn random<R: CryptoRng + RngCore>(constant: Gf256, degree: u8, rng: &mut R) -> Self {
		let mut coeffs = Vec::with_capacity(degree as usize + 1);
		coeffs.push(constant);
		for _ in 0..degree {
			coeffs.push(Gf256(rng.gen()));
		}
		Self(coeffs)
	}

	/// Number of coefficients (degree + 1).
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the polynomial has no coefficients.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Evaluate at x using Horner's method.
	pub fn evaluate(&self, x: Gf256) -> Gf256 {
		let mut y = Gf256::ZERO;
		for &c in self.0.iter().rev() {
			y = y * x + c;
		}
		y
	}
}

/// Interpolate the value at x = 0 from distinct evaluation points.
///
/// Computes sum over i of y_i * prod over j != i of x_j / (x_j - x_i).
/// The x-coordinates must be nonzero and pairwise distinct; the share
/// validation layer guarantees this before interpolation is reached.
pub fn interpolate_at_zero(xs: &[Gf256], ys: &[Gf256]) -> Gf256 {
	debug_assert_eq!(xs.len(), ys.len());

	let mut sum = Gf256::ZERO;
	for (i, (&xi, &yi)) in xs.iter().zip(ys.iter()).enumerate() {
		let mut basis = Gf256::ONE;
		for (j, &xj) in xs.iter().enumerate() {
			if i != j {
				basis *= xj / (xj - xi);
			}
		}
		sum += basis * yi;
	}
	sum
}
