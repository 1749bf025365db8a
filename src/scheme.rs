//! Scheme selection and a configured codec.
//!
//! mzML annotates each compressed binary array with a PSI-MS accession naming
//! the Numpress scheme. [`Scheme`] maps between those accessions, short names
//! and the codec functions; [`NumpressCodec`] pairs a scheme with a
//! [`FixedPoint`] policy so callers can encode without picking a scale by hand.

use std::fmt;
use std::str::FromStr;

use crate::error::NumpressError;
use crate::fixed_point::{
    check_fixed_point, optimal_linear_fixed_point, optimal_linear_fixed_point_mass,
    optimal_slof_fixed_point,
};
use crate::linear::{decode_linear, encode_linear};
use crate::pic::{decode_pic, encode_pic};
use crate::slof::{decode_slof, encode_slof};

/// The three MS-Numpress compression schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scheme {
    /// Linear prediction, for smooth monotone data such as m/z or retention time.
    Linear,
    /// Positive integer compaction, for ion counts.
    Pic,
    /// Short logged float, for intensities.
    Slof,
}

impl Scheme {
    /// All schemes, in accession order.
    pub const ALL: [Scheme; 3] = [Scheme::Linear, Scheme::Pic, Scheme::Slof];

    /// PSI-MS controlled vocabulary accession.
    pub fn accession(self) -> &'static str {
        match self {
            Scheme::Linear => "MS:1002312",
            Scheme::Pic => "MS:1002313",
            Scheme::Slof => "MS:1002314",
        }
    }

    /// PSI-MS controlled vocabulary term name.
    pub fn cv_name(self) -> &'static str {
        match self {
            Scheme::Linear => "MS-Numpress linear prediction compression",
            Scheme::Pic => "MS-Numpress positive integer compression",
            Scheme::Slof => "MS-Numpress short logged float compression",
        }
    }

    /// Look a scheme up by its accession.
    pub fn from_accession(accession: &str) -> Option<Scheme> {
        Scheme::ALL
            .into_iter()
            .find(|s| s.accession() == accession.trim())
    }

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Linear => "linear",
            Scheme::Pic => "pic",
            Scheme::Slof => "slof",
        }
    }

    /// Whether streams of this scheme begin with a fixed point.
    pub fn has_header(self) -> bool {
        !matches!(self, Scheme::Pic)
    }

    /// Decode a stream of this scheme.
    pub fn decode(self, bytes: &[u8]) -> Result<Vec<f64>, NumpressError> {
        match self {
            Scheme::Linear => decode_linear(bytes),
            Scheme::Pic => decode_pic(bytes),
            Scheme::Slof => decode_slof(bytes),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = NumpressError;

    /// Parse a short name (any case) or a PSI-MS accession.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(scheme) = Scheme::from_accession(name) {
            return Ok(scheme);
        }
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| NumpressError::UnknownScheme(s.to_string()))
    }
}

/// How a [`NumpressCodec`] chooses its fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FixedPoint {
    /// Use this exact value.
    Explicit(f64),
    /// Use the largest value the data allows.
    #[default]
    Optimal,
    /// Meet an accuracy target, capped by the largest value the data allows.
    ///
    /// Absolute for Linear, relative for Slof.
    MassAccuracy(f64),
}

/// A scheme together with its fixed point policy.
///
/// # Example
/// ```
/// use numpress::{FixedPoint, NumpressCodec, Scheme};
///
/// let codec = NumpressCodec::linear(FixedPoint::MassAccuracy(0.001));
/// let mz = [100.0, 101.0, 102.0, 103.0];
/// let encoded = codec.encode(&mz).unwrap();
///
/// let decoded = Scheme::Linear.decode(&encoded).unwrap();
/// for (a, b) in mz.iter().zip(&decoded) {
///     assert!((a - b).abs() <= 0.001);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumpressCodec {
    scheme: Scheme,
    #[cfg_attr(feature = "serde", serde(default))]
    fixed_point: FixedPoint,
}

impl NumpressCodec {
    /// Create a codec for `scheme`.
    pub fn new(scheme: Scheme, fixed_point: FixedPoint) -> Self {
        Self {
            scheme,
            fixed_point,
        }
    }

    /// Create a Linear codec.
    pub fn linear(fixed_point: FixedPoint) -> Self {
        Self::new(Scheme::Linear, fixed_point)
    }

    /// Create a Pic codec. Pic has no fixed point.
    pub fn pic() -> Self {
        Self::new(Scheme::Pic, FixedPoint::Optimal)
    }

    /// Create a Slof codec.
    pub fn slof(fixed_point: FixedPoint) -> Self {
        Self::new(Scheme::Slof, fixed_point)
    }

    /// The configured scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The configured fixed point policy.
    pub fn fixed_point(&self) -> FixedPoint {
        self.fixed_point
    }

    /// The fixed point this codec would use for `data`.
    ///
    /// Pic always reports 1.
    pub fn resolve_fixed_point(&self, data: &[f64]) -> Result<f64, NumpressError> {
        if !self.scheme.has_header() {
            return Ok(1.0);
        }
        match (self.fixed_point, self.scheme) {
            (FixedPoint::Explicit(fp), _) => {
                check_fixed_point(fp)?;
                Ok(fp)
            }
            (FixedPoint::Optimal, Scheme::Slof) => optimal_slof_fixed_point(data),
            (FixedPoint::Optimal, _) => optimal_linear_fixed_point(data),
            (FixedPoint::MassAccuracy(acc), Scheme::Slof) => {
                if !(acc.is_finite() && acc > 0.0) {
                    return Err(NumpressError::InvalidMassAccuracy(acc));
                }
                Ok((0.5 / acc).min(optimal_slof_fixed_point(data)?))
            }
            (FixedPoint::MassAccuracy(acc), _) => optimal_linear_fixed_point_mass(data, acc),
        }
    }

    /// Encode `data`. Empty input encodes to an empty stream.
    pub fn encode(&self, data: &[f64]) -> Result<Vec<u8>, NumpressError> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        match self.scheme {
            Scheme::Linear => encode_linear(data, self.resolve_fixed_point(data)?),
            Scheme::Pic => encode_pic(data),
            Scheme::Slof => encode_slof(data, self.resolve_fixed_point(data)?),
        }
    }

    /// Decode a stream produced by this codec's scheme.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>, NumpressError> {
        self.scheme.decode(bytes)
    }
}
