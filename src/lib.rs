//! # numpress-rs
//!
//! A Rust implementation of MS-Numpress: accuracy-bounded compression of the
//! numeric arrays carried by mass-spectrometry spectra and chromatograms.
//!
//! Based on ["MS-Numpress: Numerical compression of mass spectrometry
//! data"](https://doi.org/10.1074/mcp.O114.037879) (Teleman et al., MCP 2014).
//!
//! ## Overview
//!
//! Three schemes share one wire primitive and one idea: multiply by a fixed
//! point, round to an integer, and pack the integers compactly.
//!
//! 1. **Linear** (`linear`): second-order linear prediction over fixed-point
//!    integers. Suited to m/z and retention-time arrays, which rise smoothly.
//! 2. **Pic** (`pic`): positive integer compaction. Suited to ion counts that
//!    are already integral.
//! 3. **Slof** (`slof`): short logged float. Every intensity becomes a 2-byte
//!    codeword with roughly constant relative error.
//!
//! Linear and Pic store their integers with a half-byte variable-length code
//! (`halfbyte`) that spends a single nibble on the common "no change" residual.
//!
//! ## Quick Start
//!
//! ```rust
//! use numpress::{decode_linear, encode_linear, optimal_linear_fixed_point_mass};
//!
//! let mz = vec![100.0, 100.5, 101.0, 101.5, 102.0];
//!
//! // Pick a fixed point giving 0.001 m/z absolute accuracy
//! let fixed_point = optimal_linear_fixed_point_mass(&mz, 0.001).unwrap();
//!
//! let encoded = encode_linear(&mz, fixed_point).unwrap();
//! let decoded = decode_linear(&encoded).unwrap();
//!
//! for (a, b) in mz.iter().zip(&decoded) {
//!     assert!((a - b).abs() <= 0.001);
//! }
//! ```
//!
//! ## Choosing a Scheme
//!
//! | Data | Scheme | Error model |
//! |------|--------|-------------|
//! | m/z, retention time | Linear | absolute, `<= 0.5 / fixed_point` |
//! | integral ion counts | Pic | absolute, `<= 0.5` |
//! | intensities over many decades | Slof | relative, `~ 0.5 / fixed_point` |
//!
//! [`NumpressCodec`] bundles a scheme with a fixed-point policy for callers
//! that want to configure the codec once and reuse it.
//!
//! ## Wire Compatibility
//!
//! Streams are byte-for-byte compatible with the reference MS-Numpress
//! implementations: Linear and Slof open with the fixed point as a big-endian
//! IEEE-754 double; Pic has no header.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub mod fixed_point;
pub mod halfbyte;
mod linear;
mod pic;
mod scheme;
mod slof;

pub use error::{ErrorKind, NumpressError};
pub use fixed_point::{
    optimal_linear_fixed_point, optimal_linear_fixed_point_mass, optimal_slof_fixed_point,
    read_fixed_point,
};
pub use linear::{decode_linear, encode_linear};
pub use pic::{decode_pic, encode_pic};
pub use scheme::{FixedPoint, NumpressCodec, Scheme};
pub use slof::{decode_slof, encode_slof};

/// Convenience type alias for Results with NumpressError.
pub type Result<T> = std::result::Result<T, NumpressError>;
