//! Cross-correlation based delay estimation for time-domain comparisons.
//!
//! Both signals are amplitude-normalized by their peak magnitude, then the
//! full-length cross-correlation
//!
//! `c[k] = Σ_n a[n + k] · conj(b[n])`,  `k = -(len(b) - 1) ..= len(a) - 1`
//!
//! is computed through a zero-padded FFT (`rustfft`). The estimated delay is
//! `argmax(c) - (len(b) - 1)`, i.e. the lag at which `a` best lines up with
//! `b`. For `a = sin(x)`, `b = sin(x + 2)` this is `+2`.

use num_complex::Complex64;

use crate::signal::Signal;
use crate::transform::fft;

/// Full cross-correlation of `a` against `b`, `len(a) + len(b) - 1` samples.
///
/// Index `i` holds lag `i - (len(b) - 1)`.
#[must_use]
pub fn cross_correlate(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let out_len = a.len() + b.len() - 1;
    let size = out_len.next_power_of_two();

    let mut fa = a.to_vec();
    fa.resize(size, Complex64::new(0.0, 0.0));
    let mut fb = b.to_vec();
    fb.resize(size, Complex64::new(0.0, 0.0));

    let fa = fft(fa, false);
    let fb = fft(fb, false);
    let product: Vec<Complex64> = fa.iter().zip(&fb).map(|(x, y)| x * y.conj()).collect();
    let circular = fft(product, true);

    // Circular index `k mod size` holds lag k; unwrap negative lags first.
    let scale = 1.0 / size as f64;
    let neg = b.len() - 1;
    (0..out_len)
        .map(|i| {
            let lag = i as isize - neg as isize;
            let idx = lag.rem_euclid(size as isize) as usize;
            circular[idx] * scale
        })
        .collect()
}

fn normalized(signal: &Signal) -> Vec<Complex64> {
    let peak = signal.peak_magnitude();
    let mut out = signal.to_complex();
    if peak > 0.0 {
        for z in &mut out {
            *z /= peak;
        }
    }
    out
}

/// Integer sample delay of `b` relative to `a`.
///
/// Ties resolve to the first (most negative) lag. Real inputs are ranked by
/// the correlation value itself, complex inputs by its magnitude. Returns 0
/// when either signal is empty.
#[must_use]
pub fn estimate_delay(a: &Signal, b: &Signal) -> isize {
    let corr = cross_correlate(&normalized(a), &normalized(b));
    if corr.is_empty() {
        return 0;
    }
    let complex = a.is_complex() || b.is_complex();
    let score = |z: &Complex64| if complex { z.norm() } else { z.re };

    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, z) in corr.iter().enumerate() {
        let s = score(z);
        // Strict `>` keeps the first maximum; FFT round-off is far below the
        // gap between distinct correlation peaks.
        if s > best_score + 1e-12 {
            best = i;
            best_score = s;
        }
    }
    best as isize - (b.len() as isize - 1)
}

/// Shift `b` so it lines up with `a`: circular shift by `|delay|` samples.
#[must_use]
pub fn align_to(a: &Signal, b: &Signal) -> (Signal, isize) {
    let delay = estimate_delay(a, b);
    (b.rolled(delay.unsigned_abs()), delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(v: &[f64]) -> Vec<Complex64> {
        v.iter().map(|&x| Complex64::new(x, 0.0)).collect()
    }

    #[test]
    fn correlation_matches_direct_sum() {
        let a = real(&[1.0, 2.0, 3.0]);
        let b = real(&[0.0, 1.0, 0.5]);
        let got = cross_correlate(&a, &b);
        let want = [0.5, 2.0, 3.5, 3.0, 0.0];
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert!((g.re - w).abs() < 1e-9, "got {g}, want {w}");
            assert!(g.im.abs() < 1e-9);
        }
    }

    #[test]
    fn sine_delay_is_two() {
        let a: Vec<f64> = (0..100).map(|x| f64::from(x).sin()).collect();
        let b: Vec<f64> = (0..100).map(|x| (f64::from(x) + 2.0).sin()).collect();
        assert_eq!(estimate_delay(&Signal::from(a), &Signal::from(b)), 2);
    }

    #[test]
    fn identical_signals_have_zero_delay() {
        let a: Vec<f64> = (0..64).map(|x| (f64::from(x) * 0.3).cos()).collect();
        let s = Signal::from(a);
        assert_eq!(estimate_delay(&s, &s), 0);
    }

    #[test]
    fn negative_delay_for_lagging_signal() {
        let mut a = vec![0.0; 32];
        a[10] = 1.0;
        let mut b = vec![0.0; 32];
        b[13] = 1.0;
        assert_eq!(estimate_delay(&Signal::from(a), &Signal::from(b)), -3);
    }

    #[test]
    fn align_shifts_by_absolute_delay() {
        let mut a = vec![0.0; 16];
        a[5] = 1.0;
        let mut b = vec![0.0; 16];
        b[3] = 1.0;
        let (shifted, delay) = align_to(&Signal::from(a.clone()), &Signal::from(b));
        assert_eq!(delay, 2);
        assert_eq!(shifted, Signal::from(a));
    }

    #[test]
    fn empty_input_has_no_delay() {
        let e = Signal::Real(Vec::new());
        assert_eq!(estimate_delay(&e, &Signal::from(vec![1.0])), 0);
    }
}
