//! medcalc: clinical calculator command-line front end.
//!
//! Wires the real runtime together (orchestrator, schema verifier, bounded
//! hash-chained audit log) and exposes it through three subcommands.
//!
//! Usage:
//!   medcalc list [--schema]
//!   medcalc run bmi weight=70 height=175
//!   medcalc run qtc-correction qt=460 heartRate=95 --json
//!   medcalc batch requests.jsonl --audit 20
//!   medcalc --config medcalc.toml run pediatric-dosing-weight weight=20 age=6 dosePerKg=15

mod input;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use medcalc_audit::{AuditEntry, InMemoryAuditLog};
use medcalc_contracts::{
    audit::{AuditRecord, SessionId},
    error::{CalcError, CalcResult},
};
use medcalc_core::{report::format_value, traits::AuditSink, CalculatorConfig, Orchestrator};
use medcalc_verify::SchemaParameterVerifier;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Clinical calculators with input safety checks and an audit trail.
#[derive(Parser)]
#[command(
    name = "medcalc",
    about = "Clinical calculator runtime",
    long_about = "Runs registered clinical calculators through range validation,\n\
                  extreme-value scanning, schema verification and safety advisors,\n\
                  recording every invocation in a hash-chained audit log."
)]
struct Cli {
    /// TOML configuration file (audit capacity, extra drug limits).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered calculators.
    List {
        /// Print every calculator's input JSON Schema instead.
        #[arg(long)]
        schema: bool,
    },
    /// Run one calculator.
    Run {
        /// Calculator key, e.g. `bmi` or `ckd-epi`.
        calculator: String,
        /// Parameters as key=value pairs.
        #[arg(value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Session identifier recorded in the audit log.
        #[arg(long)]
        session: Option<String>,
        /// Print the structured report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run a JSON-lines file of invocations and print the audit trail.
    Batch {
        file: PathBuf,
        /// Number of most recent audit entries to print.
        #[arg(long, value_name = "N", default_value_t = 10)]
        audit: usize,
    },
}

// ── SharedAudit newtype ───────────────────────────────────────────────────────

/// Lets the CLI keep a handle on the log it gives the orchestrator.
struct SharedAudit(Arc<InMemoryAuditLog>);

impl AuditSink for SharedAudit {
    fn record(&self, record: &AuditRecord) -> CalcResult<()> {
        self.0.record(record)
    }
}

struct Runtime {
    orchestrator: Orchestrator,
    audit: Arc<InMemoryAuditLog>,
}

fn build_runtime(config_path: Option<&Path>) -> CalcResult<Runtime> {
    let config = match config_path {
        Some(path) => CalculatorConfig::from_file(path)?,
        None => CalculatorConfig::builtin()?,
    };
    let audit = Arc::new(InMemoryAuditLog::new(config.audit.capacity));
    let orchestrator = Orchestrator::with_config(
        Box::new(SharedAudit(Arc::clone(&audit))),
        Box::new(SchemaParameterVerifier::with_clinical_rules()),
        &config,
    )?;
    info!(
        audit_capacity = audit.capacity(),
        drug_limits = orchestrator.drug_limits().len(),
        "runtime ready"
    );
    Ok(Runtime { orchestrator, audit })
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-step pipeline logs.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::List { schema } => {
            list(schema);
            Ok(())
        }
        Command::Run { calculator, params, session, json } => {
            run(cli.config.as_deref(), &calculator, &params, session, json)
        }
        Command::Batch { file, audit } => batch(cli.config.as_deref(), &file, audit),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn list(schema: bool) {
    if schema {
        let schemas: Vec<serde_json::Value> = medcalc_formulas::all_specs()
            .map(|spec| spec.input_schema())
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&schemas).expect("JSON values are always serializable")
        );
        return;
    }

    for spec in medcalc_formulas::all_specs() {
        let required: Vec<&str> = spec.required_params().map(|p| p.name).collect();
        println!("{:<26} {}", spec.kind.as_str(), spec.name);
        println!("{:<26} requires: {}", "", required.join(", "));
    }
}

fn run(
    config: Option<&Path>,
    calculator: &str,
    tokens: &[String],
    session: Option<String>,
    json: bool,
) -> CalcResult<()> {
    let runtime = build_runtime(config)?;
    let params = input::parse_assignments(tokens)?;
    let report = runtime
        .orchestrator
        .invoke(calculator, params, session.map(SessionId))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("CalculationReport is always serializable")
        );
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn batch(config: Option<&Path>, file: &Path, audit_count: usize) -> CalcResult<()> {
    let text = std::fs::read_to_string(file).map_err(|e| CalcError::ConfigError {
        reason: format!("failed to read batch file '{}': {}", file.display(), e),
    })?;
    let runtime = build_runtime(config)?;

    let mut failed = 0usize;
    for (line, request) in input::parse_batch(&text) {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                failed += 1;
                println!("line {line}: skipped: {e}");
                continue;
            }
        };
        let outcome =
            runtime
                .orchestrator
                .invoke(&request.calculator, request.parameters, request.session);
        if outcome.is_err() {
            failed += 1;
        }
        println!("{}", input::summary_line(line, &request.calculator, &outcome));
        if matches!(outcome, Err(CalcError::AuditWriteFailed { .. })) {
            return outcome.map(|_| ());
        }
    }

    println!();
    println!(
        "Audit log: {} of {} entries retained, {} failed invocation(s)",
        runtime.audit.len(),
        runtime.audit.capacity(),
        failed
    );
    for entry in runtime.audit.recent(audit_count) {
        println!("  {}", describe_entry(&entry));
    }

    let intact = runtime.audit.verify_integrity();
    println!("Chain integrity: {}", if intact { "VERIFIED" } else { "BROKEN" });
    if !intact {
        return Err(CalcError::AuditWriteFailed {
            reason: "audit chain failed verification".to_string(),
        });
    }
    Ok(())
}

fn describe_entry(entry: &AuditEntry) -> String {
    let record = &entry.record;
    let outcome = match (&record.output, &record.error) {
        (_, Some(error)) => format!("error: {error}"),
        (Some(value), None) => format!("output: {}", format_value(*value)),
        (None, None) => "no output".to_string(),
    };
    let session = record
        .session_id
        .as_ref()
        .map(|s| format!(" session={}", s.0))
        .unwrap_or_default();
    format!(
        "#{} {} {} {}{} hash={}",
        entry.sequence,
        record.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
        record.calculator_type,
        outcome,
        session,
        entry.this_hash.get(..12).unwrap_or(&entry.this_hash)
    )
}
