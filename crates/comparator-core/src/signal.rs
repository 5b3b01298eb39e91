//! Input sequences.

use std::ops::Range;

use num_complex::Complex64;

/// One input sequence, real or complex.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl Signal {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Real(v) => v.len(),
            Self::Complex(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }

    /// Owned copy of `range`. The range must lie within the signal.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        match self {
            Self::Real(v) => Self::Real(v[range].to_vec()),
            Self::Complex(v) => Self::Complex(v[range].to_vec()),
        }
    }

    /// Owned copy of the first `len` samples (or all of them, if shorter).
    #[must_use]
    pub fn truncated(&self, len: usize) -> Self {
        self.slice(0..len.min(self.len()))
    }

    /// Rotate samples right by `shift` (sample `i` moves to `i + shift`).
    #[must_use]
    pub fn rolled(&self, shift: usize) -> Self {
        let mut out = self.clone();
        let n = out.len();
        if n > 0 {
            match &mut out {
                Self::Real(v) => v.rotate_right(shift % n),
                Self::Complex(v) => v.rotate_right(shift % n),
            }
        }
        out
    }

    /// Samples as complex numbers, promoting real data with a zero imaginary part.
    #[must_use]
    pub fn to_complex(&self) -> Vec<Complex64> {
        match self {
            Self::Real(v) => v.iter().map(|&x| Complex64::new(x, 0.0)).collect(),
            Self::Complex(v) => v.clone(),
        }
    }

    #[must_use]
    pub fn into_complex(self) -> Self {
        match self {
            Self::Real(v) => Self::Complex(v.into_iter().map(|x| Complex64::new(x, 0.0)).collect()),
            Self::Complex(v) => Self::Complex(v),
        }
    }

    /// Largest sample magnitude, or 0 for an empty signal.
    #[must_use]
    pub fn peak_magnitude(&self) -> f64 {
        match self {
            Self::Real(v) => v.iter().fold(0.0, |m, x| m.max(x.abs())),
            Self::Complex(v) => v.iter().fold(0.0, |m, z| m.max(z.norm())),
        }
    }
}

impl From<Vec<f64>> for Signal {
    fn from(v: Vec<f64>) -> Self {
        Self::Real(v)
    }
}

impl From<&[f64]> for Signal {
    fn from(v: &[f64]) -> Self {
        Self::Real(v.to_vec())
    }
}

impl From<Vec<Complex64>> for Signal {
    fn from(v: Vec<Complex64>) -> Self {
        Self::Complex(v)
    }
}
