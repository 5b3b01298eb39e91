//! Single-domain comparator: transform, then run every registered operator.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::align::align_to;
use crate::config::default_representation;
use crate::domain::OperationDomain;
use crate::engine::operator_products;
use crate::error::{ComparatorError, Result};
use crate::operator::Operator;
use crate::product::{Product, ProductMap, get_products};
use crate::registry::Registry;
use crate::representation::{Channel, Representation};
use crate::result::{OperatorResult, ProductResult};
use crate::signal::Signal;
use crate::transform::{Fft, InverseFft, SignalTransform};

/// Output of one [`SingleDomainComparator::compare`] call, keyed by operator
/// name in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub operators: Vec<(String, OperatorResult)>,
    pub products: Vec<(String, ProductResult)>,
}

impl Comparison {
    #[must_use]
    pub fn operator(&self, name: &str) -> Option<&OperatorResult> {
        self.operators.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Product result derived from the operator called `name`.
    #[must_use]
    pub fn product(&self, name: &str) -> Option<&ProductResult> {
        self.products.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn operator_names(&self) -> impl Iterator<Item = &str> {
        self.operators.iter().map(|(n, _)| n.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

/// Comparator bound to one analysis domain (time, frequency, ...).
///
/// Holds the operator and product registries, the operation domain, the
/// complex representation, an optional forward/inverse transform pair and
/// the time-alignment switch. Registries are configuration: mutate them
/// between calls, not during one.
#[derive(Clone)]
pub struct SingleDomainComparator {
    name: String,
    forward: Option<Arc<dyn SignalTransform>>,
    inverse: Option<Arc<dyn SignalTransform>>,
    operators: Registry<Operator>,
    products: Registry<Product>,
    domain: OperationDomain,
    representation: Representation,
    align: bool,
}

impl SingleDomainComparator {
    /// Comparator with no transform and no alignment.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_transforms(name, None, None)
    }

    #[must_use]
    pub fn with_transforms(
        name: impl Into<String>,
        forward: Option<Arc<dyn SignalTransform>>,
        inverse: Option<Arc<dyn SignalTransform>>,
    ) -> Self {
        Self {
            name: name.into(),
            forward,
            inverse,
            operators: Registry::new(),
            products: Registry::new(),
            domain: OperationDomain::Full,
            representation: default_representation(),
            align: false,
        }
    }

    /// Time-domain comparator: signals after the first are aligned to it.
    #[must_use]
    pub fn time_domain(name: impl Into<String>) -> Self {
        let mut c = Self::new(name);
        c.align = true;
        c
    }

    /// Frequency-domain comparator: forward FFT, inverse FFT.
    #[must_use]
    pub fn frequency_domain(name: impl Into<String>) -> Self {
        Self::with_transforms(name, Some(Arc::new(Fft)), Some(Arc::new(InverseFft)))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn forward_transform(&self) -> Option<&dyn SignalTransform> {
        self.forward.as_deref()
    }

    #[must_use]
    pub fn inverse_transform(&self) -> Option<&dyn SignalTransform> {
        self.inverse.as_deref()
    }

    #[must_use]
    pub const fn operators(&self) -> &Registry<Operator> {
        &self.operators
    }

    pub fn operators_mut(&mut self) -> &mut Registry<Operator> {
        &mut self.operators
    }

    #[must_use]
    pub const fn products(&self) -> &Registry<Product> {
        &self.products
    }

    pub fn products_mut(&mut self) -> &mut Registry<Product> {
        &mut self.products
    }

    #[must_use]
    pub const fn domain(&self) -> &OperationDomain {
        &self.domain
    }

    pub fn set_domain(&mut self, domain: impl Into<OperationDomain>) {
        self.domain = domain.into();
    }

    #[must_use]
    pub const fn representation(&self) -> Representation {
        self.representation
    }

    pub fn set_representation(&mut self, representation: Representation) {
        self.representation = representation;
    }

    #[must_use]
    pub const fn alignment(&self) -> bool {
        self.align
    }

    pub fn set_alignment(&mut self, align: bool) {
        self.align = align;
    }

    /// Truncate to the shared minimum length, align (if enabled), window and
    /// apply the forward transform. Inputs are never modified.
    pub fn transform(&self, signals: &[Signal]) -> Result<Vec<Signal>> {
        let min_size = signals
            .iter()
            .map(Signal::len)
            .min()
            .ok_or(ComparatorError::NoSignals)?;
        if let Some(index) = signals.iter().position(Signal::is_empty) {
            return Err(ComparatorError::EmptySignal { index });
        }

        let mut out: Vec<Signal> = signals.iter().map(|s| s.truncated(min_size)).collect();

        if self.align {
            if let Some((first, rest)) = out.split_first_mut() {
                for (i, s) in rest.iter_mut().enumerate() {
                    let (aligned, delay) = align_to(first, s);
                    debug!(domain = %self.name, index = i + 1, delay, "aligned signal");
                    *s = aligned;
                }
            }
        }

        let window = self.domain.resolve(min_size);
        if window.is_empty() {
            warn!(
                domain = %self.name,
                len = min_size,
                start = window.start,
                stop = window.end,
                "operation domain selects no samples"
            );
            return Err(ComparatorError::EmptySignal { index: 0 });
        }
        for s in &mut out {
            *s = s.slice(window.clone());
        }

        if let Some(forward) = &self.forward {
            for s in &mut out {
                *s = forward.apply(s);
            }
        }
        Ok(out)
    }

    /// Channel decomposition of transformed signals. If any of them is
    /// complex, all are treated as complex so every leaf has two channels.
    fn decompose(representation: Representation, signals: Vec<Signal>) -> Vec<Vec<Channel>> {
        let complex = signals.iter().any(Signal::is_complex);
        signals
            .into_iter()
            .map(|s| {
                let s = if complex { s.into_complex() } else { s };
                representation.channels(&s)
            })
            .collect()
    }

    /// Products of a single transformed signal, one map per channel.
    pub fn operate(&self, signal: &Signal) -> Result<Vec<ProductMap>> {
        let transformed = self.transform(std::slice::from_ref(signal))?;
        let decomposed = Self::decompose(self.representation, transformed);
        decomposed
            .first()
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(|c| get_products(&self.products, &c.data))
            .collect()
    }

    /// One registered operator on one ordered pair, one output per channel.
    pub fn compare_pair(&self, a: &Signal, b: &Signal, operator: &str) -> Result<Vec<Vec<f64>>> {
        let op = self
            .operators
            .get(operator)
            .ok_or_else(|| ComparatorError::UnknownOperator(operator.to_string()))?;
        let transformed = self.transform(&[a.clone(), b.clone()])?;
        let decomposed = Self::decompose(self.representation, transformed);
        let [da, db] = decomposed.as_slice() else {
            return Err(ComparatorError::NoSignals);
        };
        da.iter()
            .zip(db)
            .map(|(ca, cb)| op.call(operator, &[ca.data.as_slice(), cb.data.as_slice()]))
            .collect()
    }

    /// Run every registered operator over every combination of `signals`
    /// using the comparator's current representation.
    pub fn compare(&self, signals: &[Signal], labels: Option<Vec<String>>) -> Result<Comparison> {
        self.compare_with(self.representation, signals, labels)
    }

    /// Like [`compare`](Self::compare) with an explicit representation for
    /// this call only.
    pub fn compare_with(
        &self,
        representation: Representation,
        signals: &[Signal],
        labels: Option<Vec<String>>,
    ) -> Result<Comparison> {
        if let Some(l) = &labels {
            if l.len() != signals.len() {
                return Err(ComparatorError::InvalidLabelAssignment {
                    expected: signals.len(),
                    got: l.len(),
                });
            }
        }
        let transformed = self.transform(signals)?;
        let decomposed = Self::decompose(representation, transformed);
        debug!(
            domain = %self.name,
            signals = signals.len(),
            channels = decomposed.first().map_or(0, Vec::len),
            representation = representation.as_str(),
            operators = self.operators.len(),
            products = self.products.len(),
            "compare"
        );

        let mut comparison = Comparison::default();
        for (name, operator) in self.operators.iter() {
            let (ops, prods) = operator_products(name, operator, &decomposed, &self.products)?;
            let mut result = OperatorResult::new(name, ops);
            result.set_labels(labels.clone())?;
            comparison.operators.push((name.to_string(), result));
            comparison
                .products
                .push((name.to_string(), ProductResult::new(prods)));
        }
        Ok(comparison)
    }
}

impl fmt::Debug for SingleDomainComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleDomainComparator")
            .field("name", &self.name)
            .field("forward", &self.forward.as_ref().map(|t| t.name().to_string()))
            .field("inverse", &self.inverse.as_ref().map(|t| t.name().to_string()))
            .field("operators", &self.operators.names().collect::<Vec<_>>())
            .field("products", &self.products.names().collect::<Vec<_>>())
            .field("domain", &self.domain)
            .field("representation", &self.representation)
            .field("align", &self.align)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use crate::product::ProductValue;
    use crate::result::Node;
    use num_complex::Complex64;

    fn arange(n: usize, offset: f64) -> Signal {
        Signal::Real((0..n).map(|i| i as f64 + offset).collect())
    }

    fn diff_mean(name: &str) -> SingleDomainComparator {
        let mut c = SingleDomainComparator::new(name);
        c.set_representation(Representation::Cartesian);
        c.operators_mut()
            .insert("diff", builtin::operator("diff").unwrap());
        c.products_mut()
            .insert("mean", builtin::product("mean").unwrap());
        c
    }

    #[test]
    fn end_to_end_diff_and_mean() {
        let s0 = Signal::Real(vec![1.0, 2.0, 3.0, 4.0]);
        let s1 = Signal::Real(vec![0.5, 0.5, 0.5, 0.5]);
        let s2 = Signal::Real(vec![4.0, 3.0, 2.0, 1.0]);
        let c = diff_mean("time");
        let out = c.compare(&[s0, s1, s2], None).unwrap();

        let diff = out.operator("diff").unwrap();
        assert_eq!(diff.len(), 3);
        assert!(diff.iter().all(|row| row.len() == 3));
        assert_eq!(
            diff.by_path(&[0, 1, 0]).unwrap().node(),
            Some(&Node::Leaf(vec![0.5, 1.5, 2.5, 3.5]))
        );
        assert_eq!(
            diff.by_path(&[1, 0, 0]).unwrap().node(),
            Some(&Node::Leaf(vec![-0.5, -1.5, -2.5, -3.5]))
        );

        let mean = out.product("diff").unwrap().values("mean").unwrap();
        let m = mean.descend(&[0, 1, 0]).unwrap().0.as_leaf().unwrap();
        assert_eq!(m, &ProductValue::Scalar(2.0));
    }

    #[test]
    fn transform_truncates_to_shortest() {
        let c = SingleDomainComparator::new("time");
        let signals: Vec<Signal> = (0..3).map(|i| arange(10 + i, 0.0)).collect();
        let out = c.transform(&signals).unwrap();
        assert!(out.iter().all(|s| s.len() == 10));
        assert_eq!(out[2], arange(10, 0.0));
    }

    #[test]
    fn domain_window_is_applied_after_truncation() {
        let mut c = SingleDomainComparator::new("time");
        c.set_domain(OperationDomain::absolute(2, 5));
        let out = c.transform(&[arange(8, 0.0), arange(6, 1.0)]).unwrap();
        assert_eq!(out[0], Signal::Real(vec![2.0, 3.0, 4.0]));
        assert_eq!(out[1], Signal::Real(vec![3.0, 4.0, 5.0]));

        c.set_domain(OperationDomain::fraction(0.5, 1.0).unwrap());
        let out = c.transform(&[arange(8, 0.0)]).unwrap();
        assert_eq!(out[0], Signal::Real(vec![4.0, 5.0, 6.0, 7.0]));
    }

    #[test]
    fn frequency_transform_matches_dft() {
        let c = SingleDomainComparator::frequency_domain("freq");
        let a = arange(8, 0.0);
        let out = c.transform(&[a.clone(), arange(9, 0.0)]).unwrap();
        let Signal::Complex(spectrum) = &out[0] else {
            panic!("expected complex output");
        };
        let samples = a.to_complex();
        for (k, z) in spectrum.iter().enumerate() {
            let expected: Complex64 = samples
                .iter()
                .enumerate()
                .map(|(n, x)| {
                    let angle = -2.0 * std::f64::consts::PI * (k * n) as f64 / 8.0;
                    x * Complex64::new(angle.cos(), angle.sin())
                })
                .sum();
            assert!((z - expected).norm() < 1e-9, "bin {k}: {z} vs {expected}");
        }
        assert_eq!(c.inverse_transform().map(|t| t.name()), Some("ifft"));
    }

    #[test]
    fn time_domain_aligns_later_signals() {
        let c = SingleDomainComparator::time_domain("time");
        let a = Signal::Real((0..100).map(|x| f64::from(x).sin()).collect());
        let b = Signal::Real((0..100).map(|x| f64::from(x + 2).sin()).collect());
        let out = c.transform(&[a.clone(), b]).unwrap();
        let (Signal::Real(a), Signal::Real(aligned)) = (&a, &out[1]) else {
            panic!("expected real output");
        };
        for i in 2..100 {
            assert!((a[i] - aligned[i]).abs() < 1e-12, "sample {i}");
        }
    }

    #[test]
    fn complex_inputs_produce_two_channels() {
        let z = Signal::Complex(vec![Complex64::new(3.0, 4.0), Complex64::new(0.0, 1.0)]);
        let r = Signal::Real(vec![1.0, 1.0]);
        let mut c = diff_mean("time");
        c.operators_mut()
            .insert("this", builtin::operator("this").unwrap());
        let out = c.compare(&[z.clone(), r], None).unwrap();
        let diff = out.operator("diff").unwrap();
        assert_eq!(diff.complex_dim(), 2);
        assert_eq!(out.product("this").unwrap().complex_dim(), 2);

        let polar = c.compare_with(Representation::Polar, &[z], None).unwrap();
        let this = polar.operator("this").unwrap();
        assert_eq!(this.by_path(&[0, 0, 0]).unwrap().sample(), Some(5.0));
    }

    #[test]
    fn real_inputs_produce_one_channel() {
        let c = diff_mean("time");
        let out = c.compare(&[arange(4, 0.0), arange(4, 1.0)], None).unwrap();
        assert_eq!(out.operator("diff").unwrap().complex_dim(), 1);
        assert!(out.product("diff").unwrap().is_real());
    }

    #[test]
    fn labels_are_attached_and_checked() {
        let c = diff_mean("time");
        let signals = [arange(4, 0.0), arange(4, 1.0), arange(4, 2.0)];
        let labels: Vec<String> = ["a", "b", "c"].map(String::from).to_vec();
        let out = c.compare(&signals, Some(labels)).unwrap();
        let diff = out.operator("diff").unwrap();
        assert_eq!(diff.by_label("c").unwrap(), diff.by_index(2).unwrap());

        let err = c
            .compare(&signals, Some(vec!["a".to_string(), "b".to_string()]))
            .unwrap_err();
        assert_eq!(
            err,
            ComparatorError::InvalidLabelAssignment {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn degenerate_inputs_fail_fast() {
        let mut c = diff_mean("time");
        assert_eq!(c.compare(&[], None).unwrap_err(), ComparatorError::NoSignals);
        assert_eq!(
            c.compare(&[arange(3, 0.0), Signal::Real(Vec::new())], None)
                .unwrap_err(),
            ComparatorError::EmptySignal { index: 1 }
        );
        c.set_domain(OperationDomain::absolute(5, 9));
        assert_eq!(
            c.compare(&[arange(3, 0.0)], None).unwrap_err(),
            ComparatorError::EmptySignal { index: 0 }
        );
    }

    #[test]
    fn compare_is_idempotent() {
        let c = diff_mean("time");
        let signals = [arange(5, 0.0), arange(5, 0.25)];
        let first = c.compare(&signals, None).unwrap();
        let second = c.compare(&signals, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn operate_and_compare_pair() {
        let mut c = diff_mean("time");
        c.operators_mut()
            .insert("abs_diff", builtin::operator("abs_diff").unwrap());
        let a = Signal::Real(vec![1.0, 5.0, 3.0]);
        let b = Signal::Real(vec![2.0, 2.0, 2.0]);

        let products = c.operate(&a).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].get("mean"), Some(&ProductValue::Scalar(3.0)));

        let pair = c.compare_pair(&a, &b, "abs_diff").unwrap();
        assert_eq!(pair, vec![vec![1.0, 3.0, 1.0]]);
        assert_eq!(
            c.compare_pair(&a, &b, "nope").unwrap_err(),
            ComparatorError::UnknownOperator("nope".to_string())
        );
    }

    #[test]
    fn operate_reduces_every_channel_of_complex_output() {
        let mut c = SingleDomainComparator::frequency_domain("freq");
        c.set_representation(Representation::Cartesian);
        c.products_mut()
            .insert("mean", builtin::product("mean").unwrap());
        // spectrum [10, -2+2i, -2, -2-2i]
        let products = c.operate(&Signal::Real(vec![1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(products.len(), 2);
        let means: Vec<f64> = products
            .iter()
            .map(|m| m.get("mean").and_then(ProductValue::as_scalar).unwrap())
            .collect();
        assert!((means[0] - 1.0).abs() < 1e-12, "{means:?}");
        assert!(means[1].abs() < 1e-12, "{means:?}");
    }

    #[test]
    fn inputs_are_not_modified() {
        let c = SingleDomainComparator::time_domain("time");
        let signals = vec![arange(6, 0.0), arange(6, 3.0)];
        let copy = signals.clone();
        let _ = c.transform(&signals).unwrap();
        assert_eq!(signals, copy);
    }
}
