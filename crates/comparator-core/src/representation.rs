//! Decomposition of (possibly complex) signals into real-valued channels.
//!
//! Real signals always map to a single `value` channel. Complex signals map
//! to exactly two channels, chosen by the active [`Representation`]:
//! - `Cartesian`: real part, imaginary part
//! - `Polar`: magnitude, phase (radians, `atan2` convention)

use num_complex::Complex64;

use crate::signal::Signal;

/// Label of the single channel produced for real-valued input.
pub const REAL_CHANNEL: &str = "value";

/// How complex samples are split into real channels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    #[default]
    Cartesian,
    Polar,
}

/// One real-valued component of a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub label: &'static str,
    pub data: Vec<f64>,
}

type Extractor = fn(&Complex64) -> f64;

impl Representation {
    /// Parse from string (case-insensitive). Unknown names yield `None`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartesian" | "cart" | "re-im" | "reim" => Some(Self::Cartesian),
            "polar" | "mag-phase" | "magphase" => Some(Self::Polar),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cartesian => "cartesian",
            Self::Polar => "polar",
        }
    }

    fn extractors(self) -> [(Extractor, &'static str); 2] {
        match self {
            Self::Cartesian => [
                (|z: &Complex64| z.re, "real"),
                (|z: &Complex64| z.im, "imag"),
            ],
            Self::Polar => [
                (|z: &Complex64| z.norm(), "magnitude"),
                (|z: &Complex64| z.arg(), "phase"),
            ],
        }
    }

    /// Ordered channel labels for real (`complex == false`) or complex input.
    #[must_use]
    pub fn channel_labels(self, complex: bool) -> Vec<&'static str> {
        if complex {
            self.extractors().iter().map(|(_, label)| *label).collect()
        } else {
            vec![REAL_CHANNEL]
        }
    }

    /// Number of channels a signal decomposes into.
    #[must_use]
    pub const fn channel_count(complex: bool) -> usize {
        if complex { 2 } else { 1 }
    }

    /// Split `signal` into its channels.
    #[must_use]
    pub fn channels(self, signal: &Signal) -> Vec<Channel> {
        match signal {
            Signal::Real(v) => vec![Channel {
                label: REAL_CHANNEL,
                data: v.clone(),
            }],
            Signal::Complex(v) => self
                .extractors()
                .iter()
                .map(|&(extract, label)| Channel {
                    label,
                    data: v.iter().map(extract).collect(),
                })
                .collect(),
        }
    }
}
