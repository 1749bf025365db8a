//! Linear prediction codec for smoothly varying arrays.
//!
//! Each sample is scaled by the fixed point and rounded to an integer. The
//! first two integers are stored as seeds; every later integer is predicted
//! as `2 * ival[i-1] - ival[i-2]` and only the residual is stored, with the
//! half-byte code from [`crate::halfbyte`]. For m/z or retention-time arrays
//! the residuals are tiny and most samples cost one or two nibbles.
//!
//! ## Encoding Format
//!
//! - Fixed point (8 bytes, f64 big-endian)
//! - First integer (4 bytes, i32 little-endian)
//! - Second integer (4 bytes, i32 little-endian)
//! - Residuals (half-byte packed, padded to a whole byte with `0x0`)
//!
//! Arrays of one sample stop after the first integer; an empty array encodes
//! to an empty stream. The decoder predicts from its own decoded integers,
//! so the error stays within half a quantization step for every sample.

use crate::error::NumpressError;
use crate::fixed_point::{check_fixed_point, read_fixed_point, FIXED_POINT_BYTES};
use crate::halfbyte::HalfBytePack;

/// Size of one seed field.
const SEED_BYTES: usize = 4;

/// Size of the full header (fixed point plus both seeds).
const HEADER_LEN: usize = FIXED_POINT_BYTES + 2 * SEED_BYTES;

/// Scale and round a sample onto the fixed point grid.
fn quantize(index: usize, value: f64, fixed_point: f64) -> Result<i64, NumpressError> {
    if !value.is_finite() {
        return Err(NumpressError::NonFinite { index, value });
    }
    let scaled = (value * fixed_point + 0.5).floor();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if scaled >= i64::MAX as f64 || scaled < i64::MIN as f64 {
        return Err(NumpressError::Overflow {
            index,
            quantized: scaled,
            limit: i64::MAX as f64,
        });
    }
    Ok(scaled as i64)
}

fn seed_bytes(index: usize, ival: i64) -> Result<[u8; SEED_BYTES], NumpressError> {
    i32::try_from(ival)
        .map(i32::to_le_bytes)
        .map_err(|_| NumpressError::Overflow {
            index,
            quantized: ival as f64,
            limit: i32::MAX as f64,
        })
}

fn read_seed(bytes: &[u8], slot: usize) -> Result<i64, NumpressError> {
    let start = FIXED_POINT_BYTES + slot * SEED_BYTES;
    let end = start + SEED_BYTES;
    let field = bytes
        .get(start..end)
        .ok_or(NumpressError::TruncatedHeader {
            expected: end,
            actual: bytes.len(),
        })?;

    let mut seed = [0u8; SEED_BYTES];
    seed.copy_from_slice(field);
    Ok(i64::from(i32::from_le_bytes(seed)))
}

/// Encode an array of f64 values with linear prediction.
///
/// # Arguments
/// * `data` - Samples to encode, typically ascending m/z values
/// * `fixed_point` - Scale applied before rounding (see
///   [`optimal_linear_fixed_point`](crate::optimal_linear_fixed_point))
///
/// # Errors
/// * [`NumpressError::InvalidFixedPoint`] if `fixed_point` is not positive
/// * [`NumpressError::NonFinite`] for NaN or infinite samples
/// * [`NumpressError::Overflow`] if a seed leaves the signed 32-bit range
/// * [`NumpressError::ResidualOverflow`] if a residual leaves the 32-bit range
///
/// # Example
/// ```
/// use numpress::encode_linear;
///
/// let encoded = encode_linear(&[100.0, 101.0, 102.0, 103.0], 100000.0).unwrap();
/// assert_eq!(
///     encoded,
///     vec![64, 248, 106, 0, 0, 0, 0, 0, 128, 150, 152, 0, 32, 29, 154, 0, 136]
/// );
/// ```
pub fn encode_linear(data: &[f64], fixed_point: f64) -> Result<Vec<u8>, NumpressError> {
    check_fixed_point(fixed_point)?;
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let ints = data
        .iter()
        .enumerate()
        .map(|(index, &value)| quantize(index, value, fixed_point))
        .collect::<Result<Vec<i64>, _>>()?;

    let mut hb = HalfBytePack::<Vec<u8>>::with_capacity(HEADER_LEN + data.len() * 5 / 2);
    hb.write_bytes(&fixed_point.to_be_bytes());
    for (index, &ival) in ints.iter().take(2).enumerate() {
        hb.write_bytes(&seed_bytes(index, ival)?);
    }

    for (i, w) in ints.windows(3).enumerate() {
        let extrapol = 2 * i128::from(w[1]) - i128::from(w[0]);
        let residual = i128::from(w[2]) - extrapol;
        let diff = i32::try_from(residual).map_err(|_| NumpressError::ResidualOverflow {
            index: i + 2,
            residual,
        })?;
        hb.write_int(diff as u32);
    }

    Ok(hb.into_vec())
}

/// Decode a linear-prediction stream back to f64 values.
///
/// The fixed point is read from the stream itself.
///
/// # Errors
/// * [`NumpressError::TruncatedHeader`] if the stream stops inside its header
/// * [`NumpressError::InvalidData`] for a corrupt fixed point, a residual cut
///   short, or integers that overflow while being reconstructed
///
/// # Example
/// ```
/// use numpress::{decode_linear, encode_linear};
///
/// let data = vec![400.1, 400.2, 400.35, 400.5];
/// let encoded = encode_linear(&data, 1000.0).unwrap();
/// let decoded = decode_linear(&encoded).unwrap();
/// for (a, b) in data.iter().zip(&decoded) {
///     assert!((a - b).abs() <= 0.5 / 1000.0);
/// }
/// ```
pub fn decode_linear(bytes: &[u8]) -> Result<Vec<f64>, NumpressError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let fixed_point = read_fixed_point(bytes)?;
    if bytes.len() == FIXED_POINT_BYTES {
        return Ok(Vec::new());
    }

    let mut prev2 = read_seed(bytes, 0)?;
    if bytes.len() == FIXED_POINT_BYTES + SEED_BYTES {
        return Ok(vec![prev2 as f64 / fixed_point]);
    }
    let mut prev1 = read_seed(bytes, 1)?;

    let mut result = Vec::with_capacity(2 + (bytes.len() - HEADER_LEN) * 2);
    result.push(prev2 as f64 / fixed_point);
    result.push(prev1 as f64 / fixed_point);

    let mut hb = HalfBytePack::new(&bytes[HEADER_LEN..]);
    while hb.has_remaining() {
        let diff = i64::from(hb.read_int()? as i32);
        let ival = prev1
            .checked_mul(2)
            .and_then(|d| d.checked_sub(prev2))
            .and_then(|extrapol| extrapol.checked_add(diff))
            .ok_or_else(|| {
                NumpressError::InvalidData(format!(
                    "reconstructed value overflows at index {}",
                    result.len()
                ))
            })?;

        result.push(ival as f64 / fixed_point);
        prev2 = prev1;
        prev1 = ival;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR_RESULT: [u8; 17] = [
        64, 248, 106, 0, 0, 0, 0, 0, 128, 150, 152, 0, 32, 29, 154, 0, 136,
    ];

    const DATA_LONG: [f64; 7] = [
        100.0, 200.0, 300.00005, 400.00010, 450.00010, 455.00010, 700.00010,
    ];

    #[test]
    fn test_encode_fixture() {
        let encoded = encode_linear(&[100.0, 101.0, 102.0, 103.0], 100000.0).unwrap();
        assert_eq!(encoded.len(), 17);
        assert_eq!(encoded[0], 64);
        assert_eq!(encoded, LINEAR_RESULT);
    }

    #[test]
    fn test_decode_fixture() {
        let decoded = decode_linear(&LINEAR_RESULT).unwrap();
        assert_eq!(decoded, vec![100.0, 101.0, 102.0, 103.0]);
    }

    #[test]
    fn test_size_ladder() {
        let expected = [(5.0, 22), (500.0, 25), (5e4, 29), (5e5, 30), (5e6, 31)];
        for (fixed_point, len) in expected {
            let encoded = encode_linear(&DATA_LONG, fixed_point).unwrap();
            assert_eq!(encoded.len(), len, "fixed point {}", fixed_point);
        }
    }

    #[test]
    fn test_accurate_to_three_digits() {
        let encoded = encode_linear(&DATA_LONG, 500.0).unwrap();
        let decoded = decode_linear(&encoded).unwrap();
        assert_eq!(decoded.len(), DATA_LONG.len());
        for (a, b) in DATA_LONG.iter().zip(&decoded) {
            assert!((a - b).abs() < 5e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_residual_nibbles() {
        let encoded = encode_linear(&[100.0, 200.0, 300.00005, 400.00010], 100000.0).unwrap();
        assert_eq!(encoded.len(), 18);
        assert_eq!(&encoded[8..12], &[0x80, 0x96, 0x98, 0x00]);
        assert_eq!(encoded[16], 0x75);
        assert_eq!(encoded[17] & 0xf0, 0x80);
    }

    #[test]
    fn test_decode_nice() {
        let data = [100.0, 200.0, 300.00005, 400.00010];
        let decoded = decode_linear(&encode_linear(&data, 100000.0).unwrap()).unwrap();
        assert_eq!(decoded.len(), 4);
        for (a, b) in data.iter().zip(&decoded) {
            assert!((a - b).abs() < 0.000005);
        }
    }

    #[test]
    fn test_decode_weird() {
        let data = [100.0, 200.0, 4000.00005, 0.00010];
        let decoded = decode_linear(&encode_linear(&data, 100000.0).unwrap()).unwrap();
        assert_eq!(decoded.len(), 4);
        for (a, b) in data.iter().zip(&decoded) {
            assert!((a - b).abs() < 0.000005);
        }
    }

    #[test]
    fn test_roundtrip_ramp() {
        let data: Vec<f64> = (0..1000)
            .map(|i| 300.0 + i as f64 * 0.731 + (i as f64 * 0.1).sin() * 0.05)
            .collect();
        let fixed_point = 100000.0;
        let decoded = decode_linear(&encode_linear(&data, fixed_point).unwrap()).unwrap();
        assert_eq!(decoded.len(), data.len());
        for (a, b) in data.iter().zip(&decoded) {
            assert!((a - b).abs() <= 1.0 / fixed_point);
        }
    }

    #[test]
    fn test_empty() {
        assert!(encode_linear(&[], 1000.0).unwrap().is_empty());
        assert!(decode_linear(&[]).unwrap().is_empty());
        // Other implementations write a bare fixed point for empty arrays
        assert!(decode_linear(&1000.0f64.to_be_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_one_and_two_values() {
        let one = encode_linear(&[42.0], 100.0).unwrap();
        assert_eq!(one.len(), 12);
        assert_eq!(decode_linear(&one).unwrap(), vec![42.0]);

        let two = encode_linear(&[42.0, 43.5], 100.0).unwrap();
        assert_eq!(two.len(), 16);
        assert_eq!(decode_linear(&two).unwrap(), vec![42.0, 43.5]);
    }

    #[test]
    fn test_truncated_headers() {
        for len in (1..8).chain(9..12).chain(13..16) {
            let err = decode_linear(&LINEAR_RESULT[..len]).unwrap_err();
            assert!(
                matches!(err, NumpressError::TruncatedHeader { .. }),
                "len {}: {:?}",
                len,
                err
            );
        }
    }

    #[test]
    fn test_truncated_body() {
        // A verbatim residual needs nine nibbles; cut it short
        let data = [0.0, 0.0, 3000.0];
        let encoded = encode_linear(&data, 100000.0).unwrap();
        assert_eq!(encoded.len(), HEADER_LEN + 5);
        let err = decode_linear(&encoded[..HEADER_LEN + 2]).unwrap_err();
        assert!(matches!(err, NumpressError::InvalidData(_)));
    }

    #[test]
    fn test_invalid_fixed_point() {
        for fp in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                encode_linear(&[1.0, 2.0], fp),
                Err(NumpressError::InvalidFixedPoint(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_input() {
        let err = encode_linear(&[1.0, 2.0, f64::NAN], 10.0).unwrap_err();
        assert!(matches!(err, NumpressError::NonFinite { index: 2, .. }));
    }

    #[test]
    fn test_seed_overflow() {
        let err = encode_linear(&[2147483648.0, 0.0], 1.0).unwrap_err();
        assert_eq!(
            err,
            NumpressError::Overflow {
                index: 0,
                quantized: 2147483648.0,
                limit: 2147483647.0
            }
        );

        let err = encode_linear(&[-2147483649.0], 1.0).unwrap_err();
        assert!(matches!(err, NumpressError::Overflow { index: 0, .. }));

        let err = encode_linear(&[1.0, 50000.0], 100000.0).unwrap_err();
        assert!(matches!(err, NumpressError::Overflow { index: 1, .. }));
    }

    #[test]
    fn test_negative_seeds() {
        let data = [-10.0, 5.0, 0.0, -5.0];
        let encoded = encode_linear(&data, 1000.0).unwrap();
        assert_eq!(&encoded[8..12], &(-10000i32).to_le_bytes());
        assert_eq!(decode_linear(&encoded).unwrap(), data.to_vec());

        let data = [-1.0, 0.0, 1.0];
        let fixed_point = crate::optimal_linear_fixed_point(&data).unwrap();
        let decoded = decode_linear(&encode_linear(&data, fixed_point).unwrap()).unwrap();
        for (a, b) in data.iter().zip(&decoded) {
            assert!((a - b).abs() <= 0.5 / fixed_point);
        }
    }

    #[test]
    fn test_seed_sign_extends() {
        // 300 * 1e7 does not fit 32 signed bits
        assert!(matches!(
            encode_linear(&[300.0, 300.0], 1e7),
            Err(NumpressError::Overflow { index: 0, .. })
        ));

        let mut bytes = 1.0f64.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
        assert_eq!(decode_linear(&bytes).unwrap(), vec![-1.0]);
    }

    #[test]
    fn test_stable_over_five_cycles() {
        let mut values = DATA_LONG.to_vec();
        let first = decode_linear(&encode_linear(&values, 500.0).unwrap()).unwrap();
        for _ in 0..5 {
            values = decode_linear(&encode_linear(&values, 500.0).unwrap()).unwrap();
            assert_eq!(values, first);
        }
    }

    #[test]
    fn test_residual_overflow() {
        let err = encode_linear(&[0.0, 0.0, 30000.0], 100000.0).unwrap_err();
        assert_eq!(
            err,
            NumpressError::ResidualOverflow {
                index: 2,
                residual: 3_000_000_000
            }
        );
    }

    #[test]
    fn test_quantize_overflow() {
        let err = encode_linear(&[1.0, 1.0, 1e300], 1.0).unwrap_err();
        assert!(matches!(err, NumpressError::Overflow { index: 2, .. }));
    }

    #[test]
    fn test_negative_values_after_seeds() {
        let data = [10.0, 5.0, 0.0, -5.0, -10.0];
        let decoded = decode_linear(&encode_linear(&data, 1000.0).unwrap()).unwrap();
        assert_eq!(decoded, data.to_vec());
    }

    #[test]
    fn test_decode_idempotent() {
        let encoded = encode_linear(&DATA_LONG, 5e4).unwrap();
        assert_eq!(
            decode_linear(&encoded).unwrap(),
            decode_linear(&encoded).unwrap()
        );
    }
}
