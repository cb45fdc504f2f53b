// Арифметика в поле скаляров Ed25519 (mod ℓ)
// Shamir split и интерполяция Лагранжа в нуле

use crate::error::{CryptoError, Result};
use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Evaluates `coefficients[0] + coefficients[1]·x + …` at `x` (Horner).
pub fn evaluate_polynomial(coefficients: &[Scalar], x: Scalar) -> Scalar {
    coefficients
        .iter()
        .rev()
        .fold(Scalar::ZERO, |acc, coefficient| acc * x + coefficient)
}

/// Splits `secret` into `total` points of a random degree `threshold - 1`
/// polynomial. Point `i` (1-based) is returned at position `i - 1`.
pub fn split_secret<R: RngCore + CryptoRng>(
    secret: &Scalar,
    threshold: u16,
    total: u16,
    rng: &mut R,
) -> Result<Vec<(u16, Scalar)>> {
    if threshold == 0 || threshold > total {
        return Err(CryptoError::InvalidThresholdParameters { threshold, total });
    }

    let mut coefficients = Vec::with_capacity(threshold as usize);
    coefficients.push(*secret);
    for _ in 1..threshold {
        coefficients.push(Scalar::random(rng));
    }

    let shares = (1..=total)
        .map(|index| (index, evaluate_polynomial(&coefficients, Scalar::from(index))))
        .collect();

    coefficients.zeroize();

    Ok(shares)
}

/// Lagrange coefficient of `index` for interpolation at zero over `indices`.
///
/// `indices` must be distinct and non-zero; `index` must be one of them.
pub fn lagrange_coefficient_at_zero(index: u16, indices: &[u16]) -> Scalar {
    let xi = Scalar::from(index);
    let mut numerator = Scalar::ONE;
    let mut denominator = Scalar::ONE;

    for &other in indices.iter().filter(|&&other| other != index) {
        let xj = Scalar::from(other);
        numerator *= xj;
        denominator *= xj - xi;
    }

    numerator * denominator.invert()
}

/// Interpolates the polynomial through `points` at zero.
pub fn interpolate_at_zero(points: &[(u16, Scalar)]) -> Scalar {
    let indices: Vec<u16> = points.iter().map(|(index, _)| *index).collect();
    points
        .iter()
        .map(|(index, value)| lagrange_coefficient_at_zero(*index, &indices) * value)
        .fold(Scalar::ZERO, |acc, term| acc + term)
}
