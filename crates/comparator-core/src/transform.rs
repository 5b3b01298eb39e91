//! Forward/inverse transforms applied to windowed signals.
//!
//! The heavy lifting is delegated to `rustfft`; this module only adapts
//! [`Signal`] to and from the planner's complex buffers.

use std::fmt;

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::signal::Signal;

/// A whole-sequence transform, applied to each signal independently.
pub trait SignalTransform: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    fn apply(&self, signal: &Signal) -> Signal;
}

/// Forward discrete Fourier transform (unnormalized, like `numpy.fft.fft`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Fft;

/// Inverse discrete Fourier transform, normalized by `1/n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InverseFft;

impl SignalTransform for Fft {
    fn name(&self) -> &str {
        "fft"
    }

    fn apply(&self, signal: &Signal) -> Signal {
        Signal::Complex(fft(signal.to_complex(), false))
    }
}

impl SignalTransform for InverseFft {
    fn name(&self) -> &str {
        "ifft"
    }

    fn apply(&self, signal: &Signal) -> Signal {
        let mut out = fft(signal.to_complex(), true);
        let n = out.len();
        if n > 0 {
            let scale = 1.0 / n as f64;
            for z in &mut out {
                *z *= scale;
            }
        }
        Signal::Complex(out)
    }
}

/// Run an in-place FFT over `buf` and hand it back.
pub(crate) fn fft(mut buf: Vec<Complex64>, inverse: bool) -> Vec<Complex64> {
    if buf.is_empty() {
        return buf;
    }
    let mut planner = FftPlanner::<f64>::new();
    let plan = if inverse {
        planner.plan_fft_inverse(buf.len())
    } else {
        planner.plan_fft_forward(buf.len())
    };
    plan.process(&mut buf);
    buf
}

/// Adapter turning a closure into a [`SignalTransform`].
pub struct FnTransform<F> {
    name: String,
    fun: F,
}

impl<F> FnTransform<F>
where
    F: Fn(&Signal) -> Signal + Send + Sync,
{
    pub fn new(name: impl Into<String>, fun: F) -> Self {
        Self {
            name: name.into(),
            fun,
        }
    }
}

impl<F> SignalTransform for FnTransform<F>
where
    F: Fn(&Signal) -> Signal + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, signal: &Signal) -> Signal {
        (self.fun)(signal)
    }
}

impl<F> fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &[Complex64], b: &[Complex64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).norm() < 1e-9)
    }

    #[test]
    fn fft_of_impulse_is_flat() {
        let out = Fft.apply(&Signal::from(vec![1.0, 0.0, 0.0, 0.0]));
        let Signal::Complex(v) = out else {
            panic!("fft output must be complex");
        };
        assert!(close(&v, &[Complex64::new(1.0, 0.0); 4]));
    }

    #[test]
    fn fft_matches_direct_dft() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let Signal::Complex(got) = Fft.apply(&Signal::from(x.clone())) else {
            panic!("fft output must be complex");
        };
        let n = x.len();
        let want: Vec<Complex64> = (0..n)
            .map(|k| {
                x.iter().enumerate().fold(Complex64::new(0.0, 0.0), |acc, (t, &v)| {
                    let theta = -2.0 * std::f64::consts::PI * (k * t) as f64 / n as f64;
                    acc + Complex64::from_polar(v, theta)
                })
            })
            .collect();
        assert!(close(&got, &want));
    }

    #[test]
    fn inverse_undoes_forward() {
        let x = Signal::from(vec![0.5, -1.0, 2.0, 3.5, 0.0]);
        let round = InverseFft.apply(&Fft.apply(&x));
        assert!(close(&round.to_complex(), &x.to_complex()));
    }

    #[test]
    fn closure_transform_reports_name() {
        let t = FnTransform::new("negate", |s: &Signal| match s {
            Signal::Real(v) => Signal::Real(v.iter().map(|x| -x).collect()),
            Signal::Complex(v) => Signal::Complex(v.iter().map(|z| -z).collect()),
        });
        assert_eq!(t.name(), "negate");
        assert_eq!(t.apply(&Signal::from(vec![1.0])), Signal::from(vec![-1.0]));
    }
}
