//! Readback comparison.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::color::Channel;
use crate::color::quantize::{QuantizedColor, RoundingRule};
use crate::foundation::core::PixelCoord;
use crate::foundation::error::{ConformError, ConformResult};
use crate::framebuffer::view::PixelView;
use crate::render::sync::ReadyFrame;
use crate::table::{ExpectedColor, TestCase};

/// What the verifier does after the first differing channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Compare every channel and report each difference.
    #[default]
    ReportAll,
    /// Stop at the first difference in framebuffer byte order.
    StopAtFirst,
}

/// One channel whose stored byte differs from the expected byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMismatch {
    /// Channel compared.
    pub channel: Channel,
    /// Quantized expected value.
    pub expected: u8,
    /// Byte read from the framebuffer.
    pub actual: u8,
}

impl std::fmt::Display for ChannelMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "channel={} expected={:02X} actual={:02X}",
            self.channel, self.expected, self.actual
        )
    }
}

/// Result of verifying one case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "mismatches", rename_all = "snake_case")]
pub enum Outcome {
    /// Every compared channel matched.
    Pass,
    /// At least one channel differed.
    Mismatch(SmallVec<[ChannelMismatch; 4]>),
}

impl Outcome {
    /// Return `true` for [`Outcome::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Differing channels; empty on pass.
    pub fn mismatches(&self) -> &[ChannelMismatch] {
        match self {
            Self::Pass => &[],
            Self::Mismatch(m) => m,
        }
    }
}

/// Compares the readback pixel against a case's expected color.
#[derive(Clone, Copy, Debug)]
pub struct Verifier {
    rule: RoundingRule,
    policy: MismatchPolicy,
    at: PixelCoord,
}

impl Verifier {
    /// Verifier reading the bottom-left pixel.
    pub fn new(rule: RoundingRule, policy: MismatchPolicy) -> Self {
        Self {
            rule,
            policy,
            at: PixelCoord::ORIGIN,
        }
    }

    /// Read from `at` instead of the origin.
    pub fn at(mut self, at: PixelCoord) -> Self {
        self.at = at;
        self
    }

    /// Policy in effect.
    pub fn policy(&self) -> MismatchPolicy {
        self.policy
    }

    /// Verify `case` against a ready frame.
    pub fn verify(&self, case: &TestCase, frame: &ReadyFrame<'_>) -> ConformResult<Outcome> {
        let outcome = self.compare(&case.expected, frame.view())?;
        if let Outcome::Mismatch(m) = &outcome {
            tracing::warn!(id = case.id, description = %case.description, mismatches = m.len(), "readback mismatch");
        }
        Ok(outcome)
    }

    /// Compare `expected` with the pixel at the verifier's coordinate.
    ///
    /// Channels are walked in framebuffer byte order; channels the expectation omits are
    /// not compared.
    pub fn compare(&self, expected: &ExpectedColor, view: &PixelView<'_>) -> ConformResult<Outcome> {
        let want = QuantizedColor::from_expected(expected, self.rule);
        let stored = view.layout().format.memory_order();
        if want.len() > stored.len() {
            return Err(ConformError::readback(format!(
                "expected {} channels, framebuffer stores {}",
                want.len(),
                stored.len()
            )));
        }

        let got = view.pixel(self.at)?;
        if want == got {
            return Ok(Outcome::Pass);
        }

        let mut mismatches = SmallVec::new();
        for &channel in stored {
            let (Some(expected), Some(actual)) = (want.get(channel), got.get(channel)) else {
                continue;
            };
            if expected != actual {
                mismatches.push(ChannelMismatch {
                    channel,
                    expected,
                    actual,
                });
                if self.policy == MismatchPolicy::StopAtFirst {
                    break;
                }
            }
        }

        if mismatches.is_empty() {
            Ok(Outcome::Pass)
        } else {
            Ok(Outcome::Mismatch(mismatches))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/verify/mod.rs"]
mod tests;
