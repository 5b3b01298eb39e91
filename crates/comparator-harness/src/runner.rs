//! Executes a [`ComparisonPlan`] against the built-in catalog.

use std::time::Instant;

use comparator_core::{
    Comparison, MultiDomainComparator, NumberFormat, SingleDomainComparator, builtin,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::HarnessError;
use crate::plan::{ComparisonPlan, DomainKind};
use crate::run_log::{LogLevel, Outcome, RunLog};

/// Results of one domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub name: String,
    pub comparison: Comparison,
}

/// Results of a whole plan, in domain order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub plan: String,
    pub run_id: String,
    pub domains: Vec<DomainReport>,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report: per domain, per operator, the sample tree
    /// followed by every product block.
    #[must_use]
    pub fn render_plain(&self, format: NumberFormat) -> String {
        let mut out = String::new();
        out.push_str(&format!("plan {} ({})\n", self.plan, self.run_id));
        for domain in &self.domains {
            out.push_str(&format!("\n== {} ==\n", domain.name));
            for (name, result) in &domain.comparison.operators {
                out.push_str(&format!("-- {name} --\n{result}\n"));
                if let Some(products) = domain.comparison.product(name) {
                    if !products.product_names().is_empty() {
                        out.push_str(&products.render(format));
                        out.push('\n');
                    }
                }
            }
        }
        out
    }
}

pub struct PlanRunner {
    plan: ComparisonPlan,
    run_id: String,
}

impl PlanRunner {
    #[must_use]
    pub fn new(plan: ComparisonPlan, run_id: impl Into<String>) -> Self {
        Self {
            plan,
            run_id: run_id.into(),
        }
    }

    #[must_use]
    pub const fn plan(&self) -> &ComparisonPlan {
        &self.plan
    }

    /// Number format requested by the plan, or the default.
    pub fn number_format(&self) -> Result<NumberFormat, HarnessError> {
        match self.plan.format.as_deref() {
            None => Ok(NumberFormat::default()),
            Some(spec) => NumberFormat::parse(spec).ok_or_else(|| {
                HarnessError::InvalidPlan(format!("unsupported number format {spec:?}"))
            }),
        }
    }

    /// Assemble the comparator the plan describes.
    pub fn build(&self) -> Result<MultiDomainComparator, HarnessError> {
        let plan = &self.plan;
        if plan.operators.is_empty() {
            return Err(HarnessError::InvalidPlan(
                "plan registers no operators".to_string(),
            ));
        }

        let mut multi = match plan.domain {
            DomainKind::TimeFreq => MultiDomainComparator::time_freq(),
            kind => {
                let mut multi = MultiDomainComparator::new(plan.name.clone());
                multi.add_domain(match kind {
                    DomainKind::Plain => SingleDomainComparator::new("plain"),
                    DomainKind::Freq => SingleDomainComparator::frequency_domain("freq"),
                    _ => SingleDomainComparator::time_domain("time"),
                });
                multi
            }
        };

        for name in &plan.operators {
            let op = builtin::operator(name).ok_or_else(|| {
                HarnessError::UnknownOperator(name.clone(), builtin::OPERATOR_NAMES.join(", "))
            })?;
            multi.operators_mut().insert(name.clone(), op);
        }
        for name in &plan.products {
            let p = builtin::product(name).ok_or_else(|| {
                HarnessError::UnknownProduct(name.clone(), builtin::PRODUCT_NAMES.join(", "))
            })?;
            multi.products_mut().insert(name.clone(), p);
        }

        if let Some(window) = &plan.window {
            multi.set_domain(window.to_domain()?);
        }
        if let Some(repr) = plan.representation()? {
            multi.set_representation(repr);
        }
        if let Some(align) = plan.align {
            let names: Vec<String> = multi.domain_names().map(str::to_string).collect();
            for name in names {
                if let Some(domain) = multi.domain(&name) {
                    domain.write().set_alignment(align);
                }
            }
        }
        debug!(plan = %plan.name, ?multi, "comparator built");
        Ok(multi)
    }

    /// Run every domain and log one line per domain to `log`.
    pub fn run(&self, log: &mut RunLog) -> Result<RunReport, HarnessError> {
        let plan = &self.plan;
        let signals = plan.signals();
        let start = log
            .entry(LogLevel::Info, "run_start")
            .with_plan(&plan.name)
            .with_signals(signals.len())
            .with_operators(plan.operators.clone());
        log.emit_entry(start)?;

        let multi = self.build()?;
        let started = Instant::now();
        let mut domains = Vec::new();
        for name in multi.domain_names() {
            let Some(domain) = multi.domain(name) else {
                continue;
            };
            let t0 = Instant::now();
            let outcome = domain.read().compare(&signals, plan.labels.clone());
            let elapsed = elapsed_us(t0);
            match outcome {
                Ok(comparison) => {
                    let entry = log
                        .entry(LogLevel::Info, "domain_done")
                        .with_domain(name)
                        .with_outcome(Outcome::Pass)
                        .with_duration_us(elapsed);
                    log.emit_entry(entry)?;
                    domains.push(DomainReport {
                        name: name.to_string(),
                        comparison,
                    });
                }
                Err(err) => {
                    let entry = log
                        .entry(LogLevel::Error, "domain_failed")
                        .with_domain(name)
                        .with_outcome(Outcome::Fail)
                        .with_duration_us(elapsed)
                        .with_details(serde_json::json!({ "error": err.to_string() }));
                    log.emit_entry(entry)?;
                    log.flush()?;
                    return Err(err.into());
                }
            }
        }

        let end = log
            .entry(LogLevel::Info, "run_end")
            .with_plan(&plan.name)
            .with_outcome(Outcome::Pass)
            .with_duration_us(elapsed_us(started));
        log.emit_entry(end)?;
        log.flush()?;
        info!(plan = %plan.name, domains = domains.len(), "plan complete");

        Ok(RunReport {
            plan: plan.name.clone(),
            run_id: self.run_id.clone(),
            domains,
        })
    }
}

fn elapsed_us(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_micros()).unwrap_or(u64::MAX)
}
