use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pica-conform", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the conformance suites on the reference platform.
    Run(RunArgs),
    /// List the built-in suites.
    List,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Suite to run; repeat for several. Defaults to all suites, or the config's list.
    #[arg(long = "suite", value_enum)]
    suites: Vec<SuiteChoice>,

    /// JSON config file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the run report as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write a PNG of every mismatching frame into this directory.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Rounding used to encode expected colors.
    #[arg(long, value_enum)]
    rounding: Option<RoundingChoice>,

    /// Rounding of the reference rasterizer, when it should differ from `--rounding`.
    #[arg(long, value_enum)]
    raster_rounding: Option<RoundingChoice>,

    /// Mismatch policy for every suite.
    #[arg(long, value_enum)]
    policy: Option<PolicyChoice>,

    /// Exit with a failure status when any case mismatches.
    #[arg(long)]
    fail_on_mismatch: bool,

    /// Wait for A before the first case.
    #[arg(long)]
    wait_for_start: bool,

    /// Wait for A after each mismatching case.
    #[arg(long)]
    pause_on_mismatch: bool,

    /// Return right after the last case instead of waiting for Start.
    #[arg(long)]
    no_idle: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SuiteChoice {
    Dph,
    Sge,
    Fp,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoundingChoice {
    Nearest,
    Truncate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    ReportAll,
    StopAtFirst,
}

impl From<SuiteChoice> for pica_conform::SuiteKind {
    fn from(c: SuiteChoice) -> Self {
        match c {
            SuiteChoice::Dph => Self::Dph,
            SuiteChoice::Sge => Self::Sge,
            SuiteChoice::Fp => Self::Fp,
        }
    }
}

impl From<RoundingChoice> for pica_conform::RoundingRule {
    fn from(c: RoundingChoice) -> Self {
        match c {
            RoundingChoice::Nearest => Self::NearestTiesAway,
            RoundingChoice::Truncate => Self::Truncate,
        }
    }
}

impl From<PolicyChoice> for pica_conform::MismatchPolicy {
    fn from(c: PolicyChoice) -> Self {
        match c {
            PolicyChoice::ReportAll => Self::ReportAll,
            PolicyChoice::StopAtFirst => Self::StopAtFirst,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::List => cmd_list(),
    }
}

fn load_config(args: &RunArgs) -> anyhow::Result<pica_conform::HarnessConfig> {
    let mut cfg = match &args.config {
        Some(path) => pica_conform::HarnessConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => pica_conform::HarnessConfig::default(),
    };

    if !args.suites.is_empty() {
        cfg.suites = args.suites.iter().copied().map(Into::into).collect();
    }
    if let Some(dir) = &args.snapshot_dir {
        cfg.snapshot_dir = Some(dir.clone());
    }
    if let Some(r) = args.rounding {
        cfg.rounding = r.into();
    }
    if let Some(r) = args.raster_rounding {
        cfg.raster_rounding = Some(r.into());
    }
    if let Some(p) = args.policy {
        cfg.policy = Some(p.into());
    }
    cfg.fail_on_mismatch |= args.fail_on_mismatch;
    cfg.wait_for_start |= args.wait_for_start;
    cfg.pause_on_mismatch |= args.pause_on_mismatch;
    if args.no_idle {
        cfg.idle_until_exit = false;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let settings = pica_conform::platform_settings(&cfg);
    let mut platform =
        pica_conform::create_platform(pica_conform::PlatformKind::Soft, &settings)?;

    let runner = pica_conform::Runner::new(cfg)?;
    let mut sink = pica_conform::Tee {
        first: pica_conform::InMemoryReport::default(),
        second: pica_conform::TextReporter::new(io::stdout().lock()),
    };
    let summary = runner.run(platform.as_mut(), &mut sink)?;

    if let Some(path) = &args.json {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create report dir '{}'", parent.display()))?;
        }
        let json = sink.first.report().to_json()?;
        std::fs::write(path, json).with_context(|| format!("write report '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    if runner.config().fail_on_mismatch && !summary.all_passed() {
        anyhow::bail!("{} of {} cases mismatched", summary.failed, summary.total);
    }
    Ok(())
}

fn cmd_list() -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    for s in pica_conform::all_suites() {
        writeln!(
            out,
            "{:<4} {:>3} cases  {}",
            s.kind.name(),
            s.tests().len(),
            s.instruction
        )?;
    }
    Ok(())
}
