use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollytell", version)]
struct Cli {
    /// Log debug events (binding, slide changes, reveals) to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep a scenario's scroll range and emit every render update as JSON lines.
    Simulate(SimulateArgs),
    /// Validate a scenario and report how each section binds.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSONL path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print per-section scheduler counters to stderr.
    #[arg(long)]
    stats: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn load(path: &std::path::Path) -> anyhow::Result<scrollytell::sim::Scenario> {
    scrollytell::sim::Scenario::from_path(path)
        .with_context(|| format!("load scenario '{}'", path.display()))
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let scenario = load(&args.in_path)?;
    let report = scenario.run()?;

    let sink: Box<dyn std::io::Write> = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            Box::new(f)
        }
        None => Box::new(std::io::stdout().lock()),
    };
    let mut w = BufWriter::new(sink);
    for sample in &report.samples {
        serde_json::to_writer(&mut w, sample).context("serialize sample")?;
        w.write_all(b"\n")?;
    }
    w.flush().context("flush output")?;

    if args.stats {
        for (name, s) in &report.stats {
            eprintln!(
                "{name}: events={} frames={} coalesced={} recomputes={}",
                s.events, s.frames_requested, s.coalesced, s.recomputes
            );
        }
    }
    if let Some(path) = &args.out {
        eprintln!("wrote {} samples to {}", report.samples.len(), path.display());
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let scenario = load(&args.in_path)?;
    let bindings = scenario.bindings()?;
    for b in &bindings {
        let context = match b.context {
            scrollytell::ScrollingContext::Window => "window".to_string(),
            scrollytell::ScrollingContext::Nested(node) => format!("nested(node {})", node.0),
        };
        println!(
            "{}\t{}\t{}\tcontext={}{}",
            b.id,
            b.section,
            b.kind,
            context,
            if b.spacer { "\tspacer" } else { "" }
        );
    }
    eprintln!("ok: {} section(s)", bindings.len());
    Ok(())
}
