//! CLI entrypoint for the comparator harness.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use comparator_core::builtin;
use comparator_harness::trace_init::init_tracing;
use comparator_harness::{ComparisonPlan, PlanRunner, RunLog};

/// Runs signal comparison plans.
#[derive(Debug, Parser)]
#[command(name = "comparator-harness")]
#[command(about = "Combinatorial signal comparison from JSON plans")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Execute a plan and write its report.
    Run {
        /// Plan JSON path.
        #[arg(long)]
        plan: PathBuf,
        /// Output report path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format: `json` (default) or `plain`.
        #[arg(long, default_value = "json")]
        format: String,
        /// Optional JSONL run log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Run id used in the report and log trace ids.
        #[arg(long, default_value = "run")]
        run_id: String,
    },
    /// List built-in operators and products, or validate a plan.
    Describe {
        /// Plan JSON path to validate.
        #[arg(long)]
        plan: Option<PathBuf>,
    },
}

fn write_output(output: Option<&Path>, body: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, body)?;
        }
        None => println!("{body}"),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            plan,
            output,
            format,
            log,
            run_id,
        } => {
            let plan = ComparisonPlan::from_file(&plan)?;
            let runner = PlanRunner::new(plan, run_id.as_str());
            let mut run_log = match &log {
                Some(path) => RunLog::to_file(path, &run_id)?,
                None => RunLog::sink(&run_id),
            };
            let report = runner.run(&mut run_log)?;
            let body = match format.to_ascii_lowercase().as_str() {
                "json" => report.to_json()?,
                "plain" => report.render_plain(runner.number_format()?),
                other => {
                    return Err(
                        format!("Unsupported format '{other}', expected json|plain").into()
                    );
                }
            };
            write_output(output.as_deref(), &body)?;
        }
        Command::Describe { plan } => match plan {
            Some(path) => {
                let plan = ComparisonPlan::from_file(&path)?;
                let runner = PlanRunner::new(plan, "describe");
                let multi = runner.build()?;
                let domains: Vec<&str> = multi.domain_names().collect();
                println!("plan: {}", runner.plan().name);
                println!("domains: {}", domains.join(", "));
                println!("signals: {}", runner.plan().signals.len());
                println!("operators: {}", runner.plan().operators.join(", "));
                println!("products: {}", runner.plan().products.join(", "));
            }
            None => {
                println!("operators:");
                for name in builtin::OPERATOR_NAMES {
                    if let Some(op) = builtin::operator(name) {
                        let symmetric = if op.is_symmetric() { ", symmetric" } else { "" };
                        println!("  {name} (arity {}{symmetric})", op.arity());
                    }
                }
                println!("products:");
                for name in builtin::PRODUCT_NAMES {
                    println!("  {name}");
                }
            }
        },
    }

    Ok(())
}
