//! Operation domain: the sub-range of samples a comparison looks at.
//!
//! The domain is stored as a rule rather than a fixed range, so it can be
//! re-resolved against the (per-call) minimum input length.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::error::{ComparatorError, Result};

type WindowFn = dyn Fn(usize) -> Range<usize> + Send + Sync;

/// Window rule, resolved against a sequence length by [`OperationDomain::resolve`].
#[derive(Clone, Default)]
pub enum OperationDomain {
    /// The whole sequence.
    #[default]
    Full,
    /// Absolute `[start, stop)`; `stop = None` runs to the end. Both bounds clamp to the length.
    Absolute { start: usize, stop: Option<usize> },
    /// Fractions of the length, each in `[0, 1]`.
    Fraction { start: f64, stop: f64 },
    /// Arbitrary window as a function of length.
    Custom(Arc<WindowFn>),
}

impl OperationDomain {
    #[must_use]
    pub const fn absolute(start: usize, stop: usize) -> Self {
        Self::Absolute {
            start,
            stop: Some(stop),
        }
    }

    #[must_use]
    pub const fn from_start(start: usize) -> Self {
        Self::Absolute { start, stop: None }
    }

    /// Fractional window. Both fractions must lie in `[0, 1]` with `start <= stop`.
    pub fn fraction(start: f64, stop: f64) -> Result<Self> {
        let in_unit = |f: f64| (0.0..=1.0).contains(&f);
        if !in_unit(start) || !in_unit(stop) {
            return Err(ComparatorError::InvalidDomain(format!(
                "fractions must lie in [0, 1], got ({start}, {stop})"
            )));
        }
        if start > stop {
            return Err(ComparatorError::InvalidDomain(format!(
                "fraction start {start} exceeds stop {stop}"
            )));
        }
        Ok(Self::Fraction { start, stop })
    }

    pub fn custom<F>(window: F) -> Self
    where
        F: Fn(usize) -> Range<usize> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(window))
    }

    /// Concrete `[start, stop)` for a sequence of `len` samples.
    ///
    /// The returned range always lies within `0..len`. An empty range is not
    /// an error here; the transformer rejects empty windows.
    #[must_use]
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let (start, stop) = match self {
            Self::Full => (0, len),
            Self::Absolute { start, stop } => (*start, stop.unwrap_or(len)),
            Self::Fraction { start, stop } => (
                (start * len as f64).floor() as usize,
                (stop * len as f64).floor() as usize,
            ),
            Self::Custom(window) => {
                let r = window(len);
                (r.start, r.end)
            }
        };
        let stop = stop.min(len);
        let start = start.min(stop);
        start..stop
    }
}

impl fmt::Debug for OperationDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "Full"),
            Self::Absolute { start, stop } => f
                .debug_struct("Absolute")
                .field("start", start)
                .field("stop", stop)
                .finish(),
            Self::Fraction { start, stop } => f
                .debug_struct("Fraction")
                .field("start", start)
                .field("stop", stop)
                .finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl From<(usize, usize)> for OperationDomain {
    fn from((start, stop): (usize, usize)) -> Self {
        Self::absolute(start, stop)
    }
}

impl From<Range<usize>> for OperationDomain {
    fn from(r: Range<usize>) -> Self {
        Self::absolute(r.start, r.end)
    }
}
