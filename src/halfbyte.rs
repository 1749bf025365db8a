//! Half-byte variable-length integer packing.
//!
//! Every 32-bit integer is written as one head nibble followed by 0-8 payload
//! nibbles, two nibbles per byte, high nibble first. The head says how many of
//! the integer's most significant nibbles were elided and what they held:
//!
//! | Head | Meaning | Payload nibbles |
//! |------|---------|-----------------|
//! | `0x0` | nothing elided | 8 |
//! | `0x1..=0x8` | top `head` nibbles are `0x0` | `8 - head` |
//! | `0x9..=0xF` | top `head - 8` nibbles are `0xF` | `16 - head` |
//!
//! Payload nibbles follow least significant first. Examples:
//!
//! | Value | Nibbles |
//! |-------|---------|
//! | 0 | `8` |
//! | -1 | `F F` |
//! | 35 | `6 3 2` |
//! | 370000000 | `0 0 8 0 C D 0 6 1` |
//!
//! A stream with an odd number of nibbles ends in the pad nibble `0x0`. A
//! `0x0` head always needs 8 more nibbles, so a lone trailing `0x0` can only
//! be padding.

use crate::error::NumpressError;

/// Number of nibbles in a 32-bit integer.
const INT_NIBBLES: u32 = 8;

/// Most `0xF` nibbles a head can elide (head `0xF`).
const MAX_ELIDED_ONES: u32 = 7;

/// Nibble filling the low half of a final, half-used byte.
pub const PAD_NIBBLE: u8 = 0x0;

/// The three shapes a packed integer can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeWord {
    /// The top `n` nibbles (1..=8) are `0x0` and are not written.
    LeadingZeros(u8),
    /// The top `n` nibbles (1..=7) are `0xF` and are not written.
    LeadingOnes(u8),
    /// All eight nibbles are written.
    Verbatim,
}

impl CodeWord {
    /// Pick the shortest code word for `x`.
    pub fn classify(x: u32) -> Self {
        let zeros = x.leading_zeros() / 4;
        if zeros > 0 {
            return CodeWord::LeadingZeros(zeros as u8);
        }
        let ones = (x.leading_ones() / 4).min(MAX_ELIDED_ONES);
        if ones > 0 {
            CodeWord::LeadingOnes(ones as u8)
        } else {
            CodeWord::Verbatim
        }
    }

    /// Interpret a head nibble. Only the low four bits of `head` are used.
    pub fn from_head(head: u8) -> Self {
        match head & 0xf {
            0 => CodeWord::Verbatim,
            h @ 1..=8 => CodeWord::LeadingZeros(h),
            h => CodeWord::LeadingOnes(h - 8),
        }
    }

    /// The head nibble announcing this code word.
    pub fn head(self) -> u8 {
        match self {
            CodeWord::LeadingZeros(n) => n,
            CodeWord::LeadingOnes(n) => n + 8,
            CodeWord::Verbatim => 0,
        }
    }

    /// Number of payload nibbles following the head.
    pub fn payload_len(self) -> u32 {
        match self {
            CodeWord::LeadingZeros(n) | CodeWord::LeadingOnes(n) => INT_NIBBLES - n as u32,
            CodeWord::Verbatim => INT_NIBBLES,
        }
    }

    /// Total nibbles including the head.
    #[inline]
    pub fn nibble_count(self) -> usize {
        1 + self.payload_len() as usize
    }

    /// Bits implied by the elided nibbles.
    fn fill(self) -> u32 {
        match self {
            CodeWord::LeadingOnes(n) => !0u32 << (32 - 4 * n as u32),
            _ => 0,
        }
    }
}

/// A half-byte packer for reading and writing variable-length integers.
///
/// Reads from a byte slice and writes to a growable Vec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HalfBytePack<B> {
    buff: B,
    cursor: usize,
    half: bool,
}

impl<B> HalfBytePack<B> {
    /// Create a new HalfBytePack over the given buffer.
    #[inline]
    pub fn new(buff: B) -> Self {
        HalfBytePack {
            buff,
            cursor: 0,
            half: false,
        }
    }

    /// Get the total number of nibbles processed so far.
    #[inline]
    pub fn sum_nibbles(&self) -> usize {
        self.cursor * 2 + self.half as usize
    }
}

// Reading operations for byte slices
impl HalfBytePack<&[u8]> {
    /// Read one nibble.
    #[inline]
    pub fn read_nibble(&mut self) -> Result<u8, NumpressError> {
        let byte = *self.buff.get(self.cursor).ok_or_else(|| {
            NumpressError::InvalidData(format!(
                "half-byte stream ends mid-value after {} nibbles",
                self.sum_nibbles()
            ))
        })?;

        let nibble = if self.half {
            self.cursor += 1;
            byte & 0xf
        } else {
            byte >> 4
        };
        self.half = !self.half;
        Ok(nibble)
    }

    /// Read one packed integer.
    pub fn read_int(&mut self) -> Result<u32, NumpressError> {
        let word = CodeWord::from_head(self.read_nibble()?);
        let mut value = word.fill();
        for i in 0..word.payload_len() {
            value |= u32::from(self.read_nibble()?) << (4 * i);
        }
        Ok(value)
    }

    /// Whether another integer starts before the end of the stream.
    ///
    /// A final lone pad nibble does not count.
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.cursor < self.buff.len() && !self.at_padding()
    }

    fn at_padding(&self) -> bool {
        self.half
            && self.cursor + 1 == self.buff.len()
            && self.buff[self.cursor] & 0xf == PAD_NIBBLE
    }

    /// Read every remaining integer.
    pub fn read_all(&mut self) -> Result<Vec<u32>, NumpressError> {
        let mut values = Vec::with_capacity(self.buff.len());
        while self.has_remaining() {
            values.push(self.read_int()?);
        }
        Ok(values)
    }
}

impl Default for HalfBytePack<Vec<u8>> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

// Writing operations for growable Vec
impl HalfBytePack<Vec<u8>> {
    /// Create a new HalfBytePack with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    /// Write one nibble. Only the low four bits of `nibble` are used.
    #[inline]
    pub fn write_nibble(&mut self, nibble: u8) {
        let nibble = nibble & 0xf;
        if self.half {
            if let Some(last) = self.buff.last_mut() {
                *last |= nibble;
            }
            self.cursor += 1;
        } else {
            // The low half stays PAD_NIBBLE until the next write.
            self.buff.push((nibble << 4) | PAD_NIBBLE);
        }
        self.half = !self.half;
    }

    /// Write one packed integer.
    pub fn write_int(&mut self, x: u32) {
        let word = CodeWord::classify(x);
        self.write_nibble(word.head());
        for i in 0..word.payload_len() {
            self.write_nibble((x >> (4 * i)) as u8);
        }
    }

    /// Write raw bytes. The packer must be byte aligned.
    #[inline]
    pub(crate) fn write_bytes(&mut self, values: &[u8]) {
        debug_assert!(!self.half, "write_bytes on a half-filled byte");
        self.buff.extend_from_slice(values);
        self.cursor += values.len();
    }

    /// Consume the HalfBytePack and return the underlying buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.buff
    }
}
