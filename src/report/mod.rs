//! Run results and where they go.

pub(crate) mod snapshot;

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::foundation::error::{ConformError, ConformResult};
use crate::table::{Suite, SuiteKind, TestCase};
use crate::verify::{MismatchPolicy, Outcome};

/// Result of one executed case.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaseRecord {
    /// Suite the case belongs to.
    pub suite: SuiteKind,
    /// Case id.
    pub id: u32,
    /// Case label.
    pub description: String,
    /// Policy the case was verified under.
    pub policy: MismatchPolicy,
    /// Comparison result.
    pub outcome: Outcome,
    /// PNG written for a mismatching frame, if snapshots are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

impl CaseRecord {
    /// Record `outcome` for `case` of `suite`, verified under `policy`.
    pub fn new(
        suite: SuiteKind,
        case: &TestCase,
        policy: MismatchPolicy,
        outcome: Outcome,
    ) -> Self {
        Self {
            suite,
            id: case.id,
            description: case.description.clone(),
            policy,
            outcome,
            snapshot: None,
        }
    }
}

/// Pass/fail counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Cases executed.
    pub total: usize,
    /// Cases that matched.
    pub passed: usize,
    /// Cases that mismatched.
    pub failed: usize,
}

impl RunSummary {
    /// Count one outcome.
    pub fn add(&mut self, outcome: &Outcome) {
        self.total += 1;
        if outcome.is_pass() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Return `true` when no executed case mismatched.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Serializable record of a whole run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Every executed case, in run order.
    pub cases: Vec<CaseRecord>,
    /// Totals over `cases`.
    pub summary: RunSummary,
}

impl RunReport {
    /// Append a record and update the totals.
    pub fn push(&mut self, record: CaseRecord) {
        self.summary.add(&record.outcome);
        self.cases.push(record);
    }

    /// Records of one suite, in run order.
    pub fn suite(&self, kind: SuiteKind) -> impl Iterator<Item = &CaseRecord> {
        self.cases.iter().filter(move |r| r.suite == kind)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> ConformResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConformError::Other(anyhow::anyhow!("serialize run report: {e}")))
    }
}

/// Consumer of case results, called by the runner in run order.
pub trait ReportSink {
    /// A suite is about to run.
    fn begin_suite(&mut self, suite: &Suite) -> ConformResult<()>;
    /// One case of `suite` finished.
    fn record(&mut self, suite: &Suite, record: &CaseRecord) -> ConformResult<()>;
    /// Every suite has run.
    fn end_run(&mut self, summary: &RunSummary) -> ConformResult<()>;
    /// The run is waiting for the operator.
    fn prompt(&mut self, _message: &str) -> ConformResult<()> {
        Ok(())
    }
}

/// Line-oriented diagnostic output.
#[derive(Debug)]
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    /// Write to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) -> ConformResult<()> {
        writeln!(self.out, "{args}")
            .map_err(|e| ConformError::Other(anyhow::Error::new(e).context("write report")))
    }
}

impl<W: Write> ReportSink for TextReporter<W> {
    fn begin_suite(&mut self, suite: &Suite) -> ConformResult<()> {
        self.line(format_args!("== {} ({}) ==", suite.kind, suite.instruction))
    }

    fn record(&mut self, _suite: &Suite, record: &CaseRecord) -> ConformResult<()> {
        self.line(format_args!("Test {}: {}", record.id, record.description))?;
        match &record.outcome {
            Outcome::Pass => {
                if record.policy == MismatchPolicy::StopAtFirst {
                    self.line(format_args!("Success."))?;
                }
            }
            Outcome::Mismatch(mismatches) => {
                for m in mismatches {
                    self.line(format_args!("Failure: {m}"))?;
                }
            }
        }
        if let Some(path) = &record.snapshot {
            self.line(format_args!("  snapshot: {}", path.display()))?;
        }
        Ok(())
    }

    fn end_run(&mut self, summary: &RunSummary) -> ConformResult<()> {
        self.line(format_args!(
            "Tests ends. {} passed, {} failed, {} total.",
            summary.passed, summary.failed, summary.total
        ))?;
        self.out
            .flush()
            .map_err(|e| ConformError::Other(anyhow::Error::new(e).context("flush report")))
    }

    fn prompt(&mut self, message: &str) -> ConformResult<()> {
        self.line(format_args!("{message}"))
    }
}

/// Captures every record; useful in tests and for JSON output.
#[derive(Debug, Default)]
pub struct InMemoryReport {
    report: RunReport,
    suites: Vec<SuiteKind>,
    finished: bool,
}

impl InMemoryReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected report.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Suites begun, in order.
    pub fn suites(&self) -> &[SuiteKind] {
        &self.suites
    }

    /// Return `true` once `end_run` has been called.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Take the collected report.
    pub fn into_report(self) -> RunReport {
        self.report
    }
}

impl ReportSink for InMemoryReport {
    fn begin_suite(&mut self, suite: &Suite) -> ConformResult<()> {
        self.suites.push(suite.kind);
        Ok(())
    }

    fn record(&mut self, _suite: &Suite, record: &CaseRecord) -> ConformResult<()> {
        self.report.push(record.clone());
        Ok(())
    }

    fn end_run(&mut self, _summary: &RunSummary) -> ConformResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Forwards every call to two sinks in order.
#[derive(Debug)]
pub struct Tee<A, B> {
    /// First sink.
    pub first: A,
    /// Second sink.
    pub second: B,
}

impl<A: ReportSink, B: ReportSink> ReportSink for Tee<A, B> {
    fn begin_suite(&mut self, suite: &Suite) -> ConformResult<()> {
        self.first.begin_suite(suite)?;
        self.second.begin_suite(suite)
    }

    fn record(&mut self, suite: &Suite, record: &CaseRecord) -> ConformResult<()> {
        self.first.record(suite, record)?;
        self.second.record(suite, record)
    }

    fn end_run(&mut self, summary: &RunSummary) -> ConformResult<()> {
        self.first.end_run(summary)?;
        self.second.end_run(summary)
    }

    fn prompt(&mut self, message: &str) -> ConformResult<()> {
        self.first.prompt(message)?;
        self.second.prompt(message)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/report/mod.rs"]
mod tests;
