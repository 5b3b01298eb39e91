//! JSON comparison plans.
//!
//! A plan names the domain set to run in, the input signals, optional
//! labels, and which built-in operators and products to register:
//!
//! ```json
//! {
//!   "name": "smoke",
//!   "domain": "time_freq",
//!   "signals": [[1.0, 2.0, 3.0], [[1.0, 0.5], [2.0, 0.0], [0.0, -1.0]]],
//!   "labels": ["ref", "dut"],
//!   "operators": ["diff"],
//!   "products": ["mean", "rms"],
//!   "window": {"kind": "fraction", "start": 0.0, "stop": 0.5}
//! }
//! ```
//!
//! Complex samples are written as `[re, im]` pairs.

use std::path::Path;

use comparator_core::{ComparatorError, OperationDomain, Representation, Signal};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Which comparators a plan runs in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    /// No transform, no alignment.
    Plain,
    /// Time-aligned, untransformed.
    #[default]
    Time,
    /// Forward FFT.
    Freq,
    /// Both `time` and `freq`.
    TimeFreq,
}

/// One input sequence: plain numbers, or `[re, im]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalInput {
    Real(Vec<f64>),
    Complex(Vec<[f64; 2]>),
}

impl SignalInput {
    #[must_use]
    pub fn to_signal(&self) -> Signal {
        match self {
            Self::Real(v) => Signal::Real(v.clone()),
            Self::Complex(v) => {
                Signal::Complex(v.iter().map(|&[re, im]| Complex64::new(re, im)).collect())
            }
        }
    }
}

/// Operation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowInput {
    Absolute {
        start: usize,
        #[serde(default)]
        stop: Option<usize>,
    },
    Fraction {
        start: f64,
        stop: f64,
    },
}

impl WindowInput {
    pub fn to_domain(&self) -> Result<OperationDomain, ComparatorError> {
        match *self {
            Self::Absolute { start, stop } => Ok(OperationDomain::Absolute { start, stop }),
            Self::Fraction { start, stop } => OperationDomain::fraction(start, stop),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPlan {
    pub name: String,
    #[serde(default)]
    pub domain: DomainKind,
    pub signals: Vec<SignalInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    pub operators: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    /// `cartesian` or `polar`; the process default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowInput>,
    /// Overrides the domain's own alignment setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<bool>,
    /// Number format for plain-text reports, e.g. `.6e`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ComparisonPlan {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    #[must_use]
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.iter().map(SignalInput::to_signal).collect()
    }

    pub fn representation(&self) -> Result<Option<Representation>, HarnessError> {
        self.representation
            .as_deref()
            .map(|raw| {
                Representation::from_str_loose(raw).ok_or_else(|| {
                    HarnessError::InvalidPlan(format!(
                        "unknown representation {raw:?}, expected cartesian|polar"
                    ))
                })
            })
            .transpose()
    }
}
