//! Harness configuration.
//!
//! Loaded from an optional JSON file; every field has a default so an empty object is a valid
//! config. The CLI applies its flags on top before calling [`HarnessConfig::validate`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::quantize::RoundingRule;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ConformError, ConformResult};
use crate::table::SuiteKind;
use crate::verify::MismatchPolicy;

/// Everything that changes how a run behaves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Rounding used to encode expected values; must match the rasterizer under test.
    pub rounding: RoundingRule,
    /// Rounding of the soft rasterizer; defaults to `rounding`.
    pub raster_rounding: Option<RoundingRule>,
    /// Overrides every suite's own mismatch policy when set.
    pub policy: Option<MismatchPolicy>,
    /// Color the render target is cleared to before each case.
    pub clear_color: Rgba8,
    /// Wait for A before the first case.
    pub wait_for_start: bool,
    /// Wait for A after each mismatching case.
    pub pause_on_mismatch: bool,
    /// After the last case, keep presenting frames until Start is pressed.
    pub idle_until_exit: bool,
    /// Suites to run, in order; empty means all of them.
    pub suites: Vec<SuiteKind>,
    /// Directory receiving a PNG of every mismatching frame.
    pub snapshot_dir: Option<PathBuf>,
    /// Exit with a failure status when any case mismatches.
    pub fail_on_mismatch: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingRule::default(),
            raster_rounding: None,
            policy: None,
            clear_color: [0, 0, 0, 0],
            wait_for_start: false,
            pause_on_mismatch: false,
            idle_until_exit: true,
            suites: Vec::new(),
            snapshot_dir: None,
            fail_on_mismatch: false,
        }
    }
}

impl HarnessConfig {
    /// Parse a JSON config file.
    pub fn from_path(path: &Path) -> ConformResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConformError::config(format!("read '{}': {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| ConformError::config(format!("'{}': {e}", path.display())))
    }

    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> ConformResult<Self> {
        serde_json::from_str(text).map_err(|e| ConformError::config(format!("parse config: {e}")))
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> ConformResult<()> {
        for (i, kind) in self.suites.iter().enumerate() {
            if self.suites[..i].contains(kind) {
                return Err(ConformError::config(format!("suite '{kind}' listed twice")));
            }
        }
        if let Some(dir) = &self.snapshot_dir
            && dir.as_os_str().is_empty()
        {
            return Err(ConformError::config("snapshot_dir must not be empty"));
        }
        Ok(())
    }

    /// Suites selected for the run, in run order.
    pub fn selected_suites(&self) -> Vec<SuiteKind> {
        if self.suites.is_empty() {
            SuiteKind::ALL.to_vec()
        } else {
            self.suites.clone()
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
