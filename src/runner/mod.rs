//! The render-verify loop.
//!
//! One [`Runner::run`] call owns the platform for its whole lifetime: it brings graphics up,
//! acquires every suite's program and vertex buffer, drives each case through exactly one
//! frame, and releases everything in reverse acquisition order on the way out, whether the
//! run succeeded or not.

use crate::config::HarnessConfig;
use crate::foundation::error::ConformResult;
use crate::platform::{
    BufferHandle, DeviceMemory, Display, InputSource, Keys, Pipeline, Platform, PlatformSettings,
    ProgramHandle,
};
use crate::render::driver::{RenderDriver, SuiteResources};
use crate::render::sync::FrameSync;
use crate::report::{CaseRecord, ReportSink, RunSummary, snapshot};
use crate::table::{Suite, TestCase};
use crate::verify::Verifier;

/// Something acquired from the platform that must be given back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquired {
    /// A loaded program.
    Program(ProgramHandle),
    /// A device buffer.
    Buffer(BufferHandle),
}

/// Acquisitions in order; released last-in first-out.
#[derive(Debug, Default)]
pub struct ResourceStack {
    held: Vec<Acquired>,
}

impl ResourceStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember an acquisition.
    pub fn push(&mut self, r: Acquired) {
        self.held.push(r);
    }

    /// Acquisitions still held, oldest first.
    pub fn held(&self) -> &[Acquired] {
        &self.held
    }

    /// Release everything, newest first. Every release is attempted; the first error wins.
    pub fn release_all<P>(&mut self, platform: &mut P) -> ConformResult<()>
    where
        P: Pipeline + DeviceMemory + ?Sized,
    {
        let mut first_err = None;
        while let Some(r) = self.held.pop() {
            let res = match r {
                Acquired::Program(h) => platform.free_program(h),
                Acquired::Buffer(h) => platform.free_buffer(h),
            };
            if let Err(e) = res {
                tracing::warn!(resource = ?r, error = %e, "release failed");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Block on vblank, polling input once per frame, until `key` is pressed.
///
/// There is no timeout. Returns the number of frames waited.
pub fn block_until_key<P>(platform: &mut P, key: Keys) -> ConformResult<u64>
where
    P: Display + InputSource + ?Sized,
{
    let mut frames = 0;
    loop {
        platform.wait_vblank()?;
        frames += 1;
        if platform.scan_keys_down().contains(key) {
            return Ok(frames);
        }
    }
}

/// Platform settings matching `config`, for the soft platform.
pub fn platform_settings(config: &HarnessConfig) -> PlatformSettings {
    PlatformSettings {
        rounding: config.raster_rounding.unwrap_or(config.rounding),
        ..PlatformSettings::default()
    }
}

struct SuiteRun<'s> {
    suite: &'s Suite,
    driver: RenderDriver,
    verifier: Verifier,
}

/// Drives validated suites through a platform.
#[derive(Debug)]
pub struct Runner {
    config: HarnessConfig,
    suites: Vec<Suite>,
}

impl Runner {
    /// Runner for the suites `config` selects.
    pub fn new(config: HarnessConfig) -> ConformResult<Self> {
        let suites = config
            .selected_suites()
            .into_iter()
            .map(crate::table::suite)
            .collect();
        Self::with_suites(config, suites)
    }

    /// Runner for explicit `suites`; both config and suites are validated here.
    pub fn with_suites(config: HarnessConfig, suites: Vec<Suite>) -> ConformResult<Self> {
        config.validate()?;
        for s in &suites {
            s.validate()?;
        }
        Ok(Self { config, suites })
    }

    /// Suites in run order.
    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    /// Effective configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every suite and report through `sink`.
    ///
    /// Mismatches are recorded, never returned as errors. An error means the run could not
    /// proceed; resources are released before it is returned.
    #[tracing::instrument(level = "info", skip_all, fields(suites = self.suites.len()))]
    pub fn run<P, S>(&self, platform: &mut P, sink: &mut S) -> ConformResult<RunSummary>
    where
        P: Platform + ?Sized,
        S: ReportSink + ?Sized,
    {
        let layout = platform.framebuffer_layout();
        for suite in &self.suites {
            suite.check_layout(layout)?;
        }

        platform.init_graphics()?;
        tracing::info!("graphics initialized");

        let mut stack = ResourceStack::new();
        let result = self
            .acquire(platform, &mut stack)
            .and_then(|runs| self.execute(platform, sink, &runs));

        let teardown = stack
            .release_all(platform)
            .and_then(|()| platform.shutdown_graphics());
        match (result, teardown) {
            (Ok(summary), Ok(())) => {
                tracing::info!(
                    total = summary.total,
                    passed = summary.passed,
                    failed = summary.failed,
                    "run finished"
                );
                Ok(summary)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), teardown) => {
                if let Err(te) = teardown {
                    tracing::warn!(error = %te, "teardown after failed run");
                }
                Err(e)
            }
        }
    }

    fn acquire<'s, P>(
        &'s self,
        platform: &mut P,
        stack: &mut ResourceStack,
    ) -> ConformResult<Vec<SuiteRun<'s>>>
    where
        P: Platform + ?Sized,
    {
        let layout = platform.framebuffer_layout();
        let mut runs = Vec::with_capacity(self.suites.len());
        for suite in &self.suites {
            let program = platform.load_program(&suite.module)?;
            stack.push(Acquired::Program(program));

            let uniform = platform.uniform_location(program, suite.uniform)?;
            let vertex_buffer =
                platform.alloc_device_buffer(RenderDriver::vertex_buffer_size(suite))?;
            stack.push(Acquired::Buffer(vertex_buffer));

            let resources = SuiteResources {
                program,
                uniform,
                vertex_buffer,
            };
            let driver = RenderDriver::new(suite, resources, layout);
            driver.prepare(platform)?;

            let policy = self.config.policy.unwrap_or(suite.policy);
            tracing::debug!(suite = %suite.kind, ?program, ?vertex_buffer, ?policy, "acquired");
            runs.push(SuiteRun {
                suite,
                driver,
                verifier: Verifier::new(self.config.rounding, policy),
            });
        }
        Ok(runs)
    }

    fn execute<P, S>(
        &self,
        platform: &mut P,
        sink: &mut S,
        runs: &[SuiteRun<'_>],
    ) -> ConformResult<RunSummary>
    where
        P: Platform + ?Sized,
        S: ReportSink + ?Sized,
    {
        if self.config.wait_for_start {
            sink.prompt("Press A to begin.")?;
            block_until_key(platform, Keys::A)?;
        }

        let mut sync = FrameSync::new();
        let mut summary = RunSummary::default();
        for run in runs {
            self.run_suite(platform, sink, run, &mut sync, &mut summary)?;
        }
        sink.end_run(&summary)?;

        if self.config.idle_until_exit {
            sink.prompt("Tests ends. Press start to exit.")?;
            let frames = block_until_key(platform, Keys::START)?;
            tracing::debug!(frames, "exit key observed");
        }
        Ok(summary)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(suite = %run.suite.kind))]
    fn run_suite<P, S>(
        &self,
        platform: &mut P,
        sink: &mut S,
        run: &SuiteRun<'_>,
        sync: &mut FrameSync,
        summary: &mut RunSummary,
    ) -> ConformResult<()>
    where
        P: Platform + ?Sized,
        S: ReportSink + ?Sized,
    {
        sink.begin_suite(run.suite)?;
        for case in run.suite.tests() {
            let record = self.run_case(platform, run, case, sync)?;
            summary.add(&record.outcome);
            sink.record(run.suite, &record)?;

            if !record.outcome.is_pass() && self.config.pause_on_mismatch {
                sink.prompt("Press A to continue.")?;
                block_until_key(platform, Keys::A)?;
            }
            sync.present(platform)?;
        }
        Ok(())
    }

    /// clear, begin, configure, submit, wait, verify. Leaves the frame `Ready`.
    ///
    /// A snapshot that cannot be written is logged; the record is still returned.
    fn run_case<P>(
        &self,
        platform: &mut P,
        run: &SuiteRun<'_>,
        case: &TestCase,
        sync: &mut FrameSync,
    ) -> ConformResult<CaseRecord>
    where
        P: Platform + ?Sized,
    {
        tracing::debug!(id = case.id, description = %case.description, "case");
        platform.clear(self.config.clear_color)?;
        sync.begin(platform)?;
        run.driver.configure(platform, case)?;
        sync.submit(platform)?;

        let frame = sync.wait_ready(platform)?;
        let outcome = run.verifier.verify(case, &frame)?;
        let policy = run.verifier.policy();
        let mut record = CaseRecord::new(run.suite.kind, case, policy, outcome);
        if !record.outcome.is_pass()
            && let Some(dir) = &self.config.snapshot_dir
        {
            match snapshot::write_png(dir, run.suite.kind, case.id, frame.frame(), frame.view()) {
                Ok(path) => record.snapshot = Some(path),
                Err(e) => tracing::warn!(id = case.id, error = %e, "snapshot not written"),
            }
        }
        Ok(record)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runner/mod.rs"]
mod tests;
