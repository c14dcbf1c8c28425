//! Test vector tables.
//!
//! Suites are plain data: built once at startup, validated, then consumed in declaration order
//! by the runner. Every case is independent of the ones before it.

pub(crate) mod dph;
pub(crate) mod fp;
pub(crate) mod sge;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::color::classify::FpClass;
use crate::foundation::core::Vec4;
use crate::foundation::error::{ConformError, ConformResult};
use crate::framebuffer::layout::FramebufferLayout;
use crate::platform::ShaderModule;
use crate::verify::MismatchPolicy;

/// Expected post-rasterization color of a case, 3 or 4 channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedColor {
    /// Red, green, blue.
    Rgb([f32; 3]),
    /// Red, green, blue, alpha.
    Rgba([f32; 4]),
}

impl ExpectedColor {
    /// Channel values in logical order.
    pub fn channels(&self) -> &[f32] {
        match self {
            Self::Rgb(c) => c,
            Self::Rgba(c) => c,
        }
    }

    /// Same value in the three color channels.
    pub const fn gray(v: f32) -> Self {
        Self::Rgb([v, v, v])
    }

    /// Marker color for a classified result.
    pub const fn class(class: FpClass) -> Self {
        Self::Rgb(class.marker())
    }

    /// Check every channel is finite and inside `[0, 1]`.
    pub fn validate(&self) -> ConformResult<()> {
        for (i, &c) in self.channels().iter().enumerate() {
            if !c.is_finite() || !(0.0..=1.0).contains(&c) {
                return Err(ConformError::validation(format!(
                    "expected channel {i} = {c} outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Shader inputs for one case.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseInputs {
    /// Value written to the suite's uniform register.
    pub uniform: Vec4,
    /// Value written to the color attribute of every vertex, when the suite uses one.
    pub vertex_color: Option<Vec4>,
}

/// One conformance check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique within its suite; selector value for selector suites.
    pub id: u32,
    /// Human-readable label.
    pub description: String,
    /// Shader inputs.
    pub inputs: CaseInputs,
    /// Expected quantized color.
    pub expected: ExpectedColor,
}

impl TestCase {
    /// Case driven by a uniform and a per-vertex color.
    pub fn with_color(
        id: u32,
        description: impl Into<String>,
        uniform: Vec4,
        vertex_color: Vec4,
        expected: ExpectedColor,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            inputs: CaseInputs {
                uniform,
                vertex_color: Some(vertex_color),
            },
            expected,
        }
    }

    /// Case selecting a shader path by writing `id` into the uniform's `x` component.
    pub fn selector(id: u32, description: impl Into<String>, class: FpClass) -> Self {
        Self {
            id,
            description: description.into(),
            inputs: CaseInputs {
                uniform: Vec4::new(id as f32, 0.0, 0.0, 0.0),
                vertex_color: None,
            },
            expected: ExpectedColor::class(class),
        }
    }
}

/// Built-in suites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteKind {
    /// `dph` against a uniform and a vertex color.
    Dph,
    /// `sge` against a uniform and a vertex color.
    Sge,
    /// Floating-point edge cases selected by id and classified by the shader.
    Fp,
}

impl SuiteKind {
    /// Every built-in suite, in run order.
    pub const ALL: [SuiteKind; 3] = [Self::Dph, Self::Sge, Self::Fp];

    /// Lower-case suite name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dph => "dph",
            Self::Sge => "sge",
            Self::Fp => "fp",
        }
    }

    /// Parse a suite name as produced by [`SuiteKind::name`].
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == s)
    }
}

impl std::fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How case inputs reach the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Uniform upload only; the vertex buffer holds positions.
    Uniform,
    /// Uniform upload plus a color attribute rewritten into every vertex each case.
    UniformAndVertexColor {
        /// Color components per vertex (3 or 4).
        components: u8,
    },
}

/// Screen area covered by the quad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawRegion {
    /// The bottom-left pixel only.
    SinglePixel,
    /// The whole screen.
    FullScreen,
}

/// An ordered, immutable table of cases plus how to run them.
#[derive(Clone, Debug)]
pub struct Suite {
    /// Which suite this is.
    pub kind: SuiteKind,
    /// Instruction under test, as shader assembly.
    pub instruction: &'static str,
    /// Shader program to load.
    pub module: ShaderModule,
    /// Name of the per-case uniform in `module`.
    pub uniform: &'static str,
    /// Input delivery strategy.
    pub delivery: Delivery,
    /// Quad coverage.
    pub region: DrawRegion,
    /// Default verification policy.
    pub policy: MismatchPolicy,
    /// Cases in run order.
    pub cases: Vec<TestCase>,
}

impl Suite {
    /// Cases in declaration order.
    pub fn tests(&self) -> &[TestCase] {
        &self.cases
    }

    /// Check ids are unique, expectations are representable and inputs match the delivery.
    pub fn validate(&self) -> ConformResult<()> {
        if self.cases.is_empty() {
            return Err(ConformError::validation(format!(
                "suite '{}' has no cases",
                self.kind
            )));
        }
        if !self.module.uniforms.contains(&self.uniform) {
            return Err(ConformError::validation(format!(
                "suite '{}' drives uniform '{}' not declared by module '{}'",
                self.kind, self.uniform, self.module.name
            )));
        }
        if let Delivery::UniformAndVertexColor { components } = self.delivery
            && !(3..=4).contains(&components)
        {
            return Err(ConformError::validation(format!(
                "suite '{}' vertex color must have 3 or 4 components, got {components}",
                self.kind
            )));
        }

        let mut seen = BTreeSet::new();
        for case in &self.cases {
            if !seen.insert(case.id) {
                return Err(ConformError::validation(format!(
                    "suite '{}' repeats case id {}",
                    self.kind, case.id
                )));
            }
            case.expected.validate().map_err(|e| {
                ConformError::validation(format!("suite '{}' case {}: {e}", self.kind, case.id))
            })?;
            let wants_color = matches!(self.delivery, Delivery::UniformAndVertexColor { .. });
            if wants_color != case.inputs.vertex_color.is_some() {
                return Err(ConformError::validation(format!(
                    "suite '{}' case {}: vertex color presence does not match delivery",
                    self.kind, case.id
                )));
            }
        }
        Ok(())
    }

    /// Check every expectation fits in the channels `layout` stores.
    pub fn check_layout(&self, layout: FramebufferLayout) -> ConformResult<()> {
        let stored = layout.format.channel_count();
        match self
            .cases
            .iter()
            .find(|c| c.expected.channels().len() > stored)
        {
            Some(case) => Err(ConformError::validation(format!(
                "suite '{}' case {} expects {} channels, {:?} framebuffer stores {stored}",
                self.kind,
                case.id,
                case.expected.channels().len(),
                layout.format
            ))),
            None => Ok(()),
        }
    }
}

/// Build the table for `kind`.
pub fn suite(kind: SuiteKind) -> Suite {
    match kind {
        SuiteKind::Dph => dph::suite(),
        SuiteKind::Sge => sge::suite(),
        SuiteKind::Fp => fp::suite(),
    }
}

/// Every built-in suite, in run order.
pub fn all_suites() -> Vec<Suite> {
    SuiteKind::ALL.into_iter().map(suite).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/table/mod.rs"]
mod tests;
