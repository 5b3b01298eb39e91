//! Numeric format specs for textual rendering of results.
//!
//! Accepts the small subset of printf-style specs that make sense for
//! scalars: `.6e`, `.3f`, `g`, optionally with a leading `:` or `{:...}`.

use std::fmt;

/// How scalars are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Fixed point with the given number of decimals.
    Fixed(usize),
    /// Scientific with the given mantissa decimals, exponent as `e+00`.
    Exponent(usize),
    /// Shortest round-trip representation.
    General,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::Exponent(6)
    }
}

impl NumberFormat {
    /// Parse a spec such as `.6e`, `{:.3f}` or `g`. Returns `None` for
    /// anything outside the supported subset.
    #[must_use]
    pub fn parse(spec: &str) -> Option<Self> {
        let s = spec.trim();
        let s = s.strip_prefix('{').and_then(|r| r.strip_suffix('}')).unwrap_or(s);
        let s = s.strip_prefix(':').unwrap_or(s);
        if s.is_empty() || s == "g" {
            return Some(Self::General);
        }
        let (kind_at, _) = s.char_indices().last()?;
        let (body, kind) = s.split_at(kind_at);
        let precision = match body {
            "" => 6,
            _ => body.strip_prefix('.')?.parse().ok()?,
        };
        match kind {
            "f" | "F" => Some(Self::Fixed(precision)),
            "e" | "E" => Some(Self::Exponent(precision)),
            "g" | "G" => Some(Self::General),
            _ => None,
        }
    }

    #[must_use]
    pub fn format(self, x: f64) -> String {
        match self {
            Self::Fixed(p) => format!("{x:.p$}"),
            Self::General => format!("{x}"),
            Self::Exponent(p) => {
                if !x.is_finite() {
                    return format!("{x}");
                }
                let raw = format!("{x:.p$e}");
                match raw.split_once('e') {
                    Some((mantissa, exp)) => {
                        let (sign, digits) = match exp.strip_prefix('-') {
                            Some(d) => ('-', d),
                            None => ('+', exp),
                        };
                        format!("{mantissa}e{sign}{digits:0>2}")
                    }
                    None => raw,
                }
            }
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(p) => write!(f, ".{p}f"),
            Self::Exponent(p) => write!(f, ".{p}e"),
            Self::General => write!(f, "g"),
        }
    }
}
