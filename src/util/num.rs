/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
///
/// Integer literals above this bound are rejected by the lexer with a
/// recommendation to use a `#` bignumber literal instead, and fraction
/// literals above it are promoted to bigfractions.
pub const MAX_SAFE_INT: i64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds [`MAX_SAFE_INT`] in absolute
/// value.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if conversion is not lossless.
///
/// ## Example
/// ```
/// use twine::util::num::{MAX_SAFE_INT, i64_to_f64_checked};
///
/// // Works for safe values
/// let result = i64_to_f64_checked(42, "too big!");
/// assert_eq!(result.unwrap(), 42.0);
///
/// // Fails for values outside safe range
/// let big = MAX_SAFE_INT + 1;
/// assert!(i64_to_f64_checked(big, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_INT.unsigned_abs() {
        return Err(error);
    }
    Ok(value as f64)
}

/// Safely converts an `f64` to `i64` if the value is finite, within range, and
/// not fractional.
///
/// ## Errors
/// Returns `Err(error)` for non-finite, out-of-range, or fractional values.
///
/// ## Parameters
/// - `value`: The floating-point value to convert.
/// - `error`: The error to return if conversion is invalid.
///
/// ## Example
/// ```
/// use twine::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(1000.0, "bad").unwrap(), 1000);
/// assert!(f64_to_i64_checked(1.5, "bad").is_err());
/// assert!(f64_to_i64_checked(1e20, "bad").is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked<E>(value: f64, error: E) -> Result<i64, E> {
    if !value.is_finite() {
        return Err(error);
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(error);
    }
    if value.fract() != 0.0 {
        return Err(error);
    }
    Ok(value as i64)
}

/// Greatest common divisor over magnitudes, by Euclid's algorithm.
///
/// Used for rational-number reduction in the simplifier and by the
/// `gcd`/`lcm` natives.
#[must_use]
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

/// Safely converts a `usize` index from an `f64` value.
///
/// Indexing expressions accept any numeric primitive, so an index that
/// arrives as a float must be integral and non-negative before it can be
/// used to address a vector or matrix element.
///
/// ## Errors
/// Returns `Err(error)` if the value is negative, fractional, or too large.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
pub fn f64_to_usize_checked<E>(value: f64, error: E) -> Result<usize, E>
    where E: Clone
{
    let as_int = f64_to_i64_checked(value, error.clone())?;
    usize::try_from(as_int).map_err(|_| error)
}
