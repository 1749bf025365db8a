//! Short logged float codec for intensities.
//!
//! Every sample becomes a 16-bit codeword `round(ln(x + 1) * fixed_point)`.
//! The logarithm makes the quantization step grow with the value, so the
//! relative error stays near `0.5 / fixed_point` across many decades. Fixed
//! width codewords also allow random access by index.
//!
//! ## Encoding Format
//!
//! - Fixed point (8 bytes, f64 big-endian)
//! - Codewords (2 bytes each, u16 little-endian)

use crate::error::NumpressError;
use crate::fixed_point::{check_fixed_point, read_fixed_point, FIXED_POINT_BYTES};

/// Size of one codeword.
const CODEWORD_BYTES: usize = 2;

/// Largest codeword.
const CODEWORD_MAX: f64 = u16::MAX as f64;

fn codeword(index: usize, value: f64, fixed_point: f64) -> Result<u16, NumpressError> {
    if !value.is_finite() {
        return Err(NumpressError::NonFinite { index, value });
    }
    if value < 0.0 {
        return Err(NumpressError::Negative { index, value });
    }
    let scaled = (value + 1.0).ln() * fixed_point;
    if scaled > CODEWORD_MAX {
        return Err(NumpressError::Overflow {
            index,
            quantized: scaled,
            limit: CODEWORD_MAX,
        });
    }
    Ok((scaled + 0.5) as u16)
}

/// Encode non-negative intensities as logarithmic 16-bit codewords.
///
/// # Arguments
/// * `data` - Samples to encode
/// * `fixed_point` - Scale applied to `ln(x + 1)` (see
///   [`optimal_slof_fixed_point`](crate::optimal_slof_fixed_point))
///
/// # Errors
/// * [`NumpressError::InvalidFixedPoint`] if `fixed_point` is not positive
/// * [`NumpressError::NonFinite`] or [`NumpressError::Negative`] for samples
///   outside `[0, inf)`
/// * [`NumpressError::Overflow`] if a codeword exceeds 65535
///
/// # Example
/// ```
/// use numpress::{decode_slof, encode_slof};
///
/// let data = vec![100.0, 200.0, 300.00005, 400.0001];
/// let encoded = encode_slof(&data, 10000.0).unwrap();
/// assert_eq!(encoded.len(), 16);
///
/// let decoded = decode_slof(&encoded).unwrap();
/// for (a, b) in data.iter().zip(&decoded) {
///     assert!((a - b).abs() < 1.0);
/// }
/// ```
pub fn encode_slof(data: &[f64], fixed_point: f64) -> Result<Vec<u8>, NumpressError> {
    check_fixed_point(fixed_point)?;
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let codewords = data
        .iter()
        .enumerate()
        .map(|(index, &value)| codeword(index, value, fixed_point))
        .collect::<Result<Vec<u16>, _>>()?;

    let mut result = Vec::with_capacity(FIXED_POINT_BYTES + data.len() * CODEWORD_BYTES);
    result.extend_from_slice(&fixed_point.to_be_bytes());
    for cw in codewords {
        result.extend_from_slice(&cw.to_le_bytes());
    }
    Ok(result)
}

/// Decode a Slof stream back to f64 values.
///
/// # Errors
/// * [`NumpressError::TruncatedHeader`] if the fixed point is cut short
/// * [`NumpressError::InvalidData`] for a corrupt fixed point or a codeword
///   cut in half
pub fn decode_slof(bytes: &[u8]) -> Result<Vec<f64>, NumpressError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let fixed_point = read_fixed_point(bytes)?;
    let body = &bytes[FIXED_POINT_BYTES..];
    if body.len() % CODEWORD_BYTES != 0 {
        return Err(NumpressError::InvalidData(format!(
            "slof body of {} bytes is not a whole number of codewords",
            body.len()
        )));
    }

    Ok(body
        .chunks_exact(CODEWORD_BYTES)
        .map(|c| (f64::from(u16::from_le_bytes([c[0], c[1]])) / fixed_point).exp() - 1.0)
        .collect())
}
