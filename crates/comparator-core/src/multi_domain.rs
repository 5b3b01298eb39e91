//! Fan-out over several single-domain comparators.
//!
//! Operators and products are registered once on the [`MultiDomainComparator`]
//! and broadcast to every domain through [`ObservableRegistry`] listeners.
//! Each domain keeps its own transforms and alignment setting.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::comparator::{Comparison, SingleDomainComparator};
use crate::domain::OperationDomain;
use crate::error::Result;
use crate::operator::Operator;
use crate::product::Product;
use crate::registry::Registry;
use crate::representation::Representation;
use crate::signal::Signal;

/// A registry mutation, delivered to listeners after it has been applied.
#[derive(Debug)]
pub enum RegistryEvent<'a, T> {
    Inserted { name: &'a str, value: &'a T },
    Removed { name: &'a str },
}

type Listener<T> = Box<dyn Fn(&RegistryEvent<'_, T>) + Send + Sync>;

/// Handle returned by [`ObservableRegistry::subscribe`].
pub type SubscriptionId = usize;

/// [`Registry`] that notifies subscribers of every insert and remove.
pub struct ObservableRegistry<T> {
    inner: Registry<T>,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: SubscriptionId,
}

impl<T> Default for ObservableRegistry<T> {
    fn default() -> Self {
        Self {
            inner: Registry::new(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> ObservableRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&RegistryEvent<'_, T>) + Send + Sync + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a listener. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(i, _)| *i != id);
        self.listeners.len() != before
    }

    fn notify(&self, event: &RegistryEvent<'_, T>) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        let old = self.inner.insert(name.clone(), value);
        if let Some(value) = self.inner.get(&name) {
            self.notify(&RegistryEvent::Inserted { name: &name, value });
        }
        old
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let old = self.inner.remove(name);
        if old.is_some() {
            self.notify(&RegistryEvent::Removed { name });
        }
        old
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.inner.get(name)
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry<T> {
        &self.inner
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.names()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableRegistry")
            .field("inner", &self.inner)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

pub type SharedComparator = Arc<RwLock<SingleDomainComparator>>;

/// Listener that mirrors registry events into one registry of `domain`.
fn forward<T: Clone + 'static>(
    domain: &SharedComparator,
    pick: fn(&mut SingleDomainComparator) -> &mut Registry<T>,
) -> impl Fn(&RegistryEvent<'_, T>) + Send + Sync + 'static {
    let domain = Arc::clone(domain);
    move |event: &RegistryEvent<'_, T>| {
        let mut guard = domain.write();
        let target = pick(&mut *guard);
        match event {
            RegistryEvent::Inserted { name, value } => {
                target.insert(*name, (*value).clone());
            }
            RegistryEvent::Removed { name } => {
                target.remove(name);
            }
        }
    }
}

fn operators_of(c: &mut SingleDomainComparator) -> &mut Registry<Operator> {
    c.operators_mut()
}

fn products_of(c: &mut SingleDomainComparator) -> &mut Registry<Product> {
    c.products_mut()
}

/// One registered domain and its listener handles.
struct DomainSlot {
    name: String,
    comparator: SharedComparator,
    operator_sub: SubscriptionId,
    product_sub: SubscriptionId,
}

/// Several named domains sharing one set of operators and products.
pub struct MultiDomainComparator {
    name: String,
    domains: Vec<DomainSlot>,
    operators: ObservableRegistry<Operator>,
    products: ObservableRegistry<Product>,
    domain: Option<OperationDomain>,
    representation: Option<Representation>,
}

impl MultiDomainComparator {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domains: Vec::new(),
            operators: ObservableRegistry::new(),
            products: ObservableRegistry::new(),
            domain: None,
            representation: None,
        }
    }

    /// `time` (aligned) and `freq` (FFT) domains.
    #[must_use]
    pub fn time_freq() -> Self {
        let mut multi = Self::new("time_freq");
        multi.add_domain(SingleDomainComparator::time_domain("time"));
        multi.add_domain(SingleDomainComparator::frequency_domain("freq"));
        multi
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a domain under its own name. Operators, products, the operation
    /// domain and the representation set so far are copied into it, and
    /// later registrations are forwarded. A domain with the same name is
    /// replaced and stops receiving registrations.
    pub fn add_domain(&mut self, mut comparator: SingleDomainComparator) -> SharedComparator {
        for (name, op) in self.operators.registry().iter() {
            comparator.operators_mut().insert(name, op.clone());
        }
        for (name, p) in self.products.registry().iter() {
            comparator.products_mut().insert(name, p.clone());
        }
        if let Some(domain) = &self.domain {
            comparator.set_domain(domain.clone());
        }
        if let Some(representation) = self.representation {
            comparator.set_representation(representation);
        }

        let name = comparator.name().to_string();
        let shared = Arc::new(RwLock::new(comparator));
        let slot = DomainSlot {
            name: name.clone(),
            comparator: Arc::clone(&shared),
            operator_sub: self.operators.subscribe(forward(&shared, operators_of)),
            product_sub: self.products.subscribe(forward(&shared, products_of)),
        };

        match self.domains.iter_mut().find(|d| d.name == name) {
            Some(existing) => {
                self.operators.unsubscribe(existing.operator_sub);
                self.products.unsubscribe(existing.product_sub);
                *existing = slot;
                debug!(multi = %self.name, domain = %name, "domain replaced");
            }
            None => {
                self.domains.push(slot);
                debug!(multi = %self.name, domain = %name, "domain added");
            }
        }
        shared
    }

    #[must_use]
    pub fn domain(&self, name: &str) -> Option<SharedComparator> {
        self.domains
            .iter()
            .find(|d| d.name == name)
            .map(|d| Arc::clone(&d.comparator))
    }

    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.name.as_str())
    }

    #[must_use]
    pub const fn operators(&self) -> &ObservableRegistry<Operator> {
        &self.operators
    }

    pub fn operators_mut(&mut self) -> &mut ObservableRegistry<Operator> {
        &mut self.operators
    }

    #[must_use]
    pub const fn products(&self) -> &ObservableRegistry<Product> {
        &self.products
    }

    pub fn products_mut(&mut self) -> &mut ObservableRegistry<Product> {
        &mut self.products
    }

    /// Set the operation domain on every current and future domain.
    pub fn set_domain(&mut self, domain: impl Into<OperationDomain>) {
        let domain = domain.into();
        for d in &self.domains {
            d.comparator.write().set_domain(domain.clone());
        }
        self.domain = Some(domain);
    }

    /// Set the representation on every current and future domain.
    pub fn set_representation(&mut self, representation: Representation) {
        for d in &self.domains {
            d.comparator.write().set_representation(representation);
        }
        self.representation = Some(representation);
    }

    /// Compare in every domain, in the order the domains were added.
    pub fn compare(
        &self,
        signals: &[Signal],
        labels: Option<Vec<String>>,
    ) -> Result<Vec<(String, Comparison)>> {
        self.domains
            .iter()
            .map(|d| {
                let comparison = d.comparator.read().compare(signals, labels.clone())?;
                Ok((d.name.clone(), comparison))
            })
            .collect()
    }
}

impl fmt::Debug for MultiDomainComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiDomainComparator")
            .field("name", &self.name)
            .field("domains", &self.domain_names().collect::<Vec<_>>())
            .field("operators", &self.operators.names().collect::<Vec<_>>())
            .field("products", &self.products.names().collect::<Vec<_>>())
            .field("representation", &self.representation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use std::sync::Mutex;

    #[test]
    fn listeners_see_mutations_after_they_apply() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let mut reg: ObservableRegistry<u32> = ObservableRegistry::new();
        reg.subscribe(move |event| {
            let line = match event {
                RegistryEvent::Inserted { name, value } => format!("+{name}={value}"),
                RegistryEvent::Removed { name } => format!("-{name}"),
            };
            log.lock().unwrap().push(line);
        });
        reg.insert("a", 1);
        reg.insert("a", 2);
        assert_eq!(reg.remove("a"), Some(2));
        assert_eq!(reg.remove("a"), None);
        assert_eq!(*seen.lock().unwrap(), ["+a=1", "+a=2", "-a"]);
    }

    #[test]
    fn registrations_reach_every_domain() {
        let mut multi = MultiDomainComparator::new("multi");
        multi
            .operators_mut()
            .insert("diff", builtin::operator("diff").unwrap());
        let early = multi.add_domain(SingleDomainComparator::new("early"));
        let late = multi.add_domain(SingleDomainComparator::new("late"));
        multi
            .products_mut()
            .insert("mean", builtin::product("mean").unwrap());

        for domain in [&early, &late] {
            let c = domain.read();
            assert!(c.operators().contains("diff"), "{}", c.name());
            assert!(c.products().contains("mean"), "{}", c.name());
        }

        multi.operators_mut().remove("diff");
        assert!(early.read().operators().is_empty());
        assert!(late.read().operators().is_empty());
    }

    #[test]
    fn domain_setting_is_broadcast() {
        let mut multi = MultiDomainComparator::new("multi");
        multi.add_domain(SingleDomainComparator::new("a"));
        multi.set_domain(OperationDomain::absolute(1, 3));
        multi.add_domain(SingleDomainComparator::new("b"));
        for name in ["a", "b"] {
            let c = multi.domain(name).unwrap();
            assert_eq!(c.read().domain().resolve(10), 1..3);
        }
    }

    #[test]
    fn replaced_domain_stops_receiving_registrations() {
        let mut multi = MultiDomainComparator::new("multi");
        let old = multi.add_domain(SingleDomainComparator::new("a"));
        let new = multi.add_domain(SingleDomainComparator::new("a"));
        assert_eq!(multi.domain_names().count(), 1);
        assert_eq!(multi.operators().subscriber_count(), 1);
        assert_eq!(multi.products().subscriber_count(), 1);

        multi
            .operators_mut()
            .insert("diff", builtin::operator("diff").unwrap());
        assert!(new.read().operators().contains("diff"));
        assert!(!old.read().operators().contains("diff"));
        assert!(Arc::ptr_eq(&multi.domain("a").unwrap(), &new));
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut reg: ObservableRegistry<u32> = ObservableRegistry::new();
        let (h1, h2) = (Arc::clone(&hits), Arc::clone(&hits));
        let first = reg.subscribe(move |_| h1.lock().unwrap().push(1));
        let _second = reg.subscribe(move |_| h2.lock().unwrap().push(2));
        assert!(reg.unsubscribe(first));
        assert!(!reg.unsubscribe(first));
        assert_eq!(reg.subscriber_count(), 1);
        reg.insert("x", 0);
        assert_eq!(*hits.lock().unwrap(), [2]);
    }

    #[test]
    fn representation_reaches_later_domains() {
        let mut multi = MultiDomainComparator::new("multi");
        multi.add_domain(SingleDomainComparator::new("a"));
        multi.set_representation(Representation::Polar);
        multi.add_domain(SingleDomainComparator::new("b"));
        for name in ["a", "b"] {
            let c = multi.domain(name).unwrap();
            assert_eq!(c.read().representation(), Representation::Polar, "{name}");
        }
    }

    #[test]
    fn time_freq_compares_in_both_domains() {
        let mut multi = MultiDomainComparator::time_freq();
        assert_eq!(multi.domain_names().collect::<Vec<_>>(), ["time", "freq"]);
        multi
            .operators_mut()
            .insert("diff", builtin::operator("diff").unwrap());
        multi
            .products_mut()
            .insert("rms", builtin::product("rms").unwrap());

        let a = Signal::Real((0..16).map(|x| f64::from(x).sin()).collect());
        let b = Signal::Real((0..16).map(|x| f64::from(x).cos()).collect());
        let out = multi.compare(&[a, b], None).unwrap();
        let names: Vec<&str> = out.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["time", "freq"]);
        assert_eq!(out[0].1.operator("diff").unwrap().complex_dim(), 1);
        assert_eq!(out[1].1.operator("diff").unwrap().complex_dim(), 2);
        assert!(out[1].1.product("diff").unwrap().contains("rms"));
    }
}
