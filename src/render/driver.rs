use smallvec::smallvec;

use crate::foundation::core::Vec4;
use crate::foundation::error::{ConformError, ConformResult};
use crate::framebuffer::layout::FramebufferLayout;
use crate::platform::{
    AttributeDesc, BufferHandle, Pipeline, Primitive, ProgramHandle, UniformLocation,
    VertexLayout,
};
use crate::table::{Delivery, DrawRegion, Suite, TestCase};

/// Vertices in the quad strip.
pub const QUAD_VERTICES: u32 = 4;

/// Shader input register of the position attribute.
pub const POSITION_REGISTER: u8 = 0;
/// Shader input register of the color attribute.
pub const COLOR_REGISTER: u8 = 1;

const POSITION_COMPONENTS: u8 = 3;
const QUAD_DEPTH: f32 = 0.5;

/// Platform objects a suite draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuiteResources {
    /// Linked program.
    pub program: ProgramHandle,
    /// Location of the suite's per-case uniform.
    pub uniform: UniformLocation,
    /// Vertex buffer, sized by [`RenderDriver::vertex_buffer_size`].
    pub vertex_buffer: BufferHandle,
}

/// Programs the pipeline so one draw leaves a case's result in the readback pixel.
///
/// Every case overwrites the uniform and, when the suite feeds a vertex color, the whole vertex
/// buffer. Nothing from the previous case is patched incrementally.
#[derive(Debug)]
pub struct RenderDriver {
    resources: SuiteResources,
    delivery: Delivery,
    layout: VertexLayout,
    positions: [[f32; 3]; QUAD_VERTICES as usize],
}

impl RenderDriver {
    /// Build a driver for `suite` rendering into a framebuffer with `fb` dimensions.
    pub fn new(suite: &Suite, resources: SuiteResources, fb: FramebufferLayout) -> Self {
        Self {
            resources,
            delivery: suite.delivery,
            layout: vertex_layout(suite.delivery),
            positions: quad_positions(suite.region, fb),
        }
    }

    /// Bytes of device memory the vertex buffer needs for `suite`.
    pub fn vertex_buffer_size(suite: &Suite) -> usize {
        vertex_layout(suite.delivery).stride() * QUAD_VERTICES as usize
    }

    /// Resources this driver renders with.
    pub fn resources(&self) -> SuiteResources {
        self.resources
    }

    /// Upload case-independent data. Called once after the resources are acquired.
    pub fn prepare<P: Pipeline + ?Sized>(&self, pipeline: &mut P) -> ConformResult<()> {
        if self.delivery == Delivery::Uniform {
            let bytes = self.vertex_bytes(None)?;
            pipeline.write_buffer(self.resources.vertex_buffer, &bytes)?;
        }
        Ok(())
    }

    /// Program the pipeline for `case` and issue exactly one draw.
    #[tracing::instrument(level = "trace", skip(self, pipeline, case), fields(id = case.id))]
    pub fn configure<P: Pipeline + ?Sized>(
        &self,
        pipeline: &mut P,
        case: &TestCase,
    ) -> ConformResult<()> {
        pipeline.bind_program(self.resources.program)?;
        pipeline.set_uniform(self.resources.uniform, case.inputs.uniform)?;

        if let Delivery::UniformAndVertexColor { .. } = self.delivery {
            let color = case.inputs.vertex_color.ok_or_else(|| {
                ConformError::validation(format!("case {} has no vertex color", case.id))
            })?;
            let bytes = self.vertex_bytes(Some(color))?;
            pipeline.write_buffer(self.resources.vertex_buffer, &bytes)?;
        }

        pipeline.set_vertex_attributes(self.resources.vertex_buffer, &self.layout)?;
        pipeline.draw(Primitive::TriangleStrip, QUAD_VERTICES)
    }

    /// Serialize the full vertex list, little-endian `f32`, interleaved per [`VertexLayout`].
    pub fn vertex_bytes(&self, color: Option<Vec4>) -> ConformResult<Vec<u8>> {
        let color_components = match self.delivery {
            Delivery::Uniform => 0,
            Delivery::UniformAndVertexColor { components } => usize::from(components),
        };
        let color = match (color_components, color) {
            (0, _) => [0.0; 4],
            (_, Some(c)) => c.to_array(),
            (_, None) => {
                return Err(ConformError::validation(
                    "vertex color required by delivery strategy",
                ));
            }
        };

        let mut out = Vec::with_capacity(self.layout.stride() * self.positions.len());
        for pos in &self.positions {
            for f in pos.iter().chain(color[..color_components].iter()) {
                out.extend_from_slice(&f.to_le_bytes());
            }
        }
        Ok(out)
    }
}

fn vertex_layout(delivery: Delivery) -> VertexLayout {
    let position = AttributeDesc {
        register: POSITION_REGISTER,
        components: POSITION_COMPONENTS,
    };
    match delivery {
        Delivery::Uniform => VertexLayout {
            attributes: smallvec![position],
        },
        Delivery::UniformAndVertexColor { components } => VertexLayout {
            attributes: smallvec![
                position,
                AttributeDesc {
                    register: COLOR_REGISTER,
                    components,
                }
            ],
        },
    }
}

/// Quad corners in normalized device coordinates, in strip order.
fn quad_positions(region: DrawRegion, fb: FramebufferLayout) -> [[f32; 3]; 4] {
    let (x1, y1) = match region {
        DrawRegion::FullScreen => (1.0, 1.0),
        DrawRegion::SinglePixel => (
            -1.0 + 2.0 / fb.width as f32,
            -1.0 + 2.0 / fb.height as f32,
        ),
    };
    let (x0, y0) = (-1.0, -1.0);
    [
        [x0, y0, QUAD_DEPTH],
        [x1, y0, QUAD_DEPTH],
        [x0, y1, QUAD_DEPTH],
        [x1, y1, QUAD_DEPTH],
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
