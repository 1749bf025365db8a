//! Fixed point selection for the Linear and Slof schemes.
//!
//! The fixed point multiplies every sample before rounding. A larger fixed
//! point means a finer quantization step, but the scaled integers must still
//! fit their fields: 32 bits for Linear seeds and residuals, 16 bits for Slof
//! codewords. The routines here pick the largest fixed point that is safe for
//! a given array, optionally capped by an accuracy target.
//!
//! Linear and Slof streams open with the fixed point as a big-endian IEEE-754
//! double; [`read_fixed_point`] reads it back.

use crate::error::NumpressError;

/// Size of the fixed point field at the start of Linear and Slof streams.
pub const FIXED_POINT_BYTES: usize = 8;

/// Largest magnitude a Linear residual may take after scaling.
const LINEAR_INT_MAX: f64 = i32::MAX as f64;

/// Largest Slof codeword.
const SLOF_CODEWORD_MAX: f64 = u16::MAX as f64;

/// Check that a fixed point is usable for encoding.
pub(crate) fn check_fixed_point(fixed_point: f64) -> Result<(), NumpressError> {
    if fixed_point.is_finite() && fixed_point > 0.0 {
        Ok(())
    } else {
        Err(NumpressError::InvalidFixedPoint(fixed_point))
    }
}

fn check_finite(data: &[f64]) -> Result<(), NumpressError> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(NumpressError::NonFinite {
            index,
            value: data[index],
        }),
        None => Ok(()),
    }
}

/// Read the fixed point stored at the start of a Linear or Slof stream.
///
/// # Example
/// ```
/// use numpress::{encode_slof, read_fixed_point};
///
/// let encoded = encode_slof(&[10.0, 20.0], 3000.0).unwrap();
/// assert_eq!(read_fixed_point(&encoded).unwrap(), 3000.0);
/// ```
pub fn read_fixed_point(bytes: &[u8]) -> Result<f64, NumpressError> {
    let mut field = [0u8; FIXED_POINT_BYTES];
    let header = bytes
        .get(..FIXED_POINT_BYTES)
        .ok_or(NumpressError::TruncatedHeader {
            expected: FIXED_POINT_BYTES,
            actual: bytes.len(),
        })?;
    field.copy_from_slice(header);

    let fixed_point = f64::from_be_bytes(field);
    if check_fixed_point(fixed_point).is_err() {
        return Err(NumpressError::InvalidData(format!(
            "stored fixed point {} is not positive and finite",
            fixed_point
        )));
    }
    Ok(fixed_point)
}

/// Compute the largest fixed point the Linear scheme can use for `data`.
///
/// The first two samples are stored as seeds and every later sample as a
/// residual against `2 * data[i-1] - data[i-2]`. The result keeps all of them
/// inside 32 bits, leaving one unit of headroom for rounding on each residual.
///
/// # Example
/// ```
/// use numpress::optimal_linear_fixed_point;
///
/// let fp = optimal_linear_fixed_point(&[100.0, 101.0, 102.0, 103.0]).unwrap();
/// assert_eq!(fp, 21262214.0);
/// ```
pub fn optimal_linear_fixed_point(data: &[f64]) -> Result<f64, NumpressError> {
    if data.is_empty() {
        return Err(NumpressError::EmptyInput);
    }
    check_finite(data)?;

    let mut max_double = data.iter().take(2).fold(1.0f64, |m, v| m.max(v.abs()));
    for w in data.windows(3) {
        let extrapol = w[1] + (w[1] - w[0]);
        let diff = w[2] - extrapol;
        max_double = max_double.max((diff.abs() + 1.0).ceil());
    }

    Ok((LINEAR_INT_MAX / max_double).floor())
}

/// Compute a Linear fixed point meeting an absolute accuracy target.
///
/// Rounding to the fixed point grid loses at most half a step, so an accuracy
/// of `mass_accuracy` needs `0.5 / mass_accuracy`. The result never exceeds
/// [`optimal_linear_fixed_point`]; when the target cannot be met without
/// overflow, the overflow bound is returned instead.
///
/// # Example
/// ```
/// use numpress::optimal_linear_fixed_point_mass;
///
/// let fp = optimal_linear_fixed_point_mass(&[100.0, 101.0, 102.0, 103.0], 0.001).unwrap();
/// assert_eq!(fp, 500.0);
/// ```
pub fn optimal_linear_fixed_point_mass(
    data: &[f64],
    mass_accuracy: f64,
) -> Result<f64, NumpressError> {
    if !(mass_accuracy.is_finite() && mass_accuracy > 0.0) {
        return Err(NumpressError::InvalidMassAccuracy(mass_accuracy));
    }
    let overflow_bound = optimal_linear_fixed_point(data)?;
    Ok((0.5 / mass_accuracy).min(overflow_bound))
}

/// Compute the largest fixed point the Slof scheme can use for `data`.
///
/// Every codeword is `ln(x + 1) * fixed_point`, so the largest sample decides
/// how far the 16-bit range can be stretched.
///
/// # Example
/// ```
/// use numpress::optimal_slof_fixed_point;
///
/// let fp = optimal_slof_fixed_point(&[100.0, 101.0, 102.0, 103.0]).unwrap();
/// assert_eq!(fp, 14110.0);
/// ```
pub fn optimal_slof_fixed_point(data: &[f64]) -> Result<f64, NumpressError> {
    if data.is_empty() {
        return Err(NumpressError::EmptyInput);
    }

    let mut max_double = 1.0f64;
    for (index, &value) in data.iter().enumerate() {
        if !value.is_finite() {
            return Err(NumpressError::NonFinite { index, value });
        }
        if value < 0.0 {
            return Err(NumpressError::Negative { index, value });
        }
        max_double = max_double.max((value + 1.0).ln());
    }

    Ok((SLOF_CODEWORD_MAX / max_double).floor())
}
