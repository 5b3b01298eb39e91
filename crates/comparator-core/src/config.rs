//! Process-level defaults.
//!
//! The default decomposition of complex signals is read from the
//! `COMPARATOR_REPRESENTATION` environment variable:
//! - `cartesian` (default): real and imaginary parts
//! - `polar`: magnitude and phase
//!
//! Unrecognized values fall back to cartesian. The variable is read once and
//! cached for the life of the process.

use std::sync::OnceLock;

use crate::representation::Representation;

pub const REPRESENTATION_ENV: &str = "COMPARATOR_REPRESENTATION";

static DEFAULT_REPRESENTATION: OnceLock<Representation> = OnceLock::new();

fn parse_representation_env(raw: Option<&str>) -> Representation {
    raw.and_then(Representation::from_str_loose)
        .unwrap_or_default()
}

/// Representation new comparators start with.
#[must_use]
pub fn default_representation() -> Representation {
    *DEFAULT_REPRESENTATION.get_or_init(|| {
        let raw = std::env::var(REPRESENTATION_ENV).ok();
        parse_representation_env(raw.as_deref())
    })
}
