//! Positive integer compaction for ion counts.
//!
//! Samples are rounded to the nearest integer and each integer is written
//! directly with the half-byte code, without prediction: ion counts jump
//! around too much for a linear predictor to help. Data that is already
//! integral round-trips exactly.
//!
//! ## Encoding Format
//!
//! Half-byte packed integers only, padded to a whole byte with `0x0`. There is
//! no header; the fixed point is implicitly 1.

use crate::error::NumpressError;
use crate::halfbyte::{CodeWord, HalfBytePack};

/// Largest count Pic accepts.
const PIC_MAX: f64 = i32::MAX as f64;

fn count(index: usize, value: f64) -> Result<u32, NumpressError> {
    if !value.is_finite() {
        return Err(NumpressError::NonFinite { index, value });
    }
    let rounded = (value + 0.5).floor();
    if rounded < 0.0 {
        return Err(NumpressError::Negative { index, value });
    }
    if rounded > PIC_MAX {
        return Err(NumpressError::Overflow {
            index,
            quantized: rounded,
            limit: PIC_MAX,
        });
    }
    Ok(rounded as u32)
}

/// Encode non-negative counts by rounding them to integers.
///
/// # Errors
/// * [`NumpressError::NonFinite`] for NaN or infinite samples
/// * [`NumpressError::Negative`] for samples rounding below zero
/// * [`NumpressError::Overflow`] for samples rounding above `i32::MAX`
///
/// # Example
/// ```
/// use numpress::{decode_pic, encode_pic};
///
/// let encoded = encode_pic(&[100.0, 101.0, 102.0, 103.0]).unwrap();
/// assert_eq!(encoded.len(), 6);
/// assert_eq!(decode_pic(&encoded).unwrap(), vec![100.0, 101.0, 102.0, 103.0]);
/// ```
pub fn encode_pic(data: &[f64]) -> Result<Vec<u8>, NumpressError> {
    let counts = data
        .iter()
        .enumerate()
        .map(|(index, &value)| count(index, value))
        .collect::<Result<Vec<u32>, _>>()?;

    let nibbles: usize = counts
        .iter()
        .map(|&c| CodeWord::classify(c).nibble_count())
        .sum();
    let mut hb = HalfBytePack::<Vec<u8>>::with_capacity((nibbles + 1) / 2);
    for c in counts {
        hb.write_int(c);
    }
    Ok(hb.into_vec())
}

/// Decode a Pic stream back to f64 values.
///
/// # Errors
/// [`NumpressError::InvalidData`] if the stream ends inside a value.
pub fn decode_pic(bytes: &[u8]) -> Result<Vec<f64>, NumpressError> {
    let counts = HalfBytePack::new(bytes).read_all()?;
    Ok(counts.into_iter().map(f64::from).collect())
}
