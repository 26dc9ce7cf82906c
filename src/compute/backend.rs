use crate::compute::blend::BlendIntrinsic;
use crate::foundation::core::PremulRgba8;
use crate::foundation::error::SvgfxResult;
use crate::surface::buffer::ImageBuffer;

/// An image-processing session bound to one filter execution.
///
/// A context is created at the start of `execute` and dropped at its end. All operands handed to
/// an intrinsic must share dimensions unless stated otherwise; violations are reported as
/// evaluation errors, never panics.
pub trait ComputeContext {
    /// Which backend implements this context.
    fn kind(&self) -> BackendKind;

    /// Source copy: `dst = src`.
    fn copy(&mut self, src: &ImageBuffer, dst: &mut ImageBuffer) -> SvgfxResult<()>;

    /// `dst = op(src, dst)` per pixel.
    fn blend(
        &mut self,
        op: BlendIntrinsic,
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()>;

    /// Isotropic gaussian blur of `src` into `dst` with standard deviation `sigma` (pixels).
    fn gaussian_blur(
        &mut self,
        sigma: f32,
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()>;

    /// Fill `dst` with one premultiplied pixel.
    fn fill(&mut self, px: PremulRgba8, dst: &mut ImageBuffer) -> SvgfxResult<()>;

    /// Draw `src` source-over onto `dst` with its origin at `(dx, dy)`; pixels landing outside
    /// `dst` are discarded.
    fn draw_offset(
        &mut self,
        src: &ImageBuffer,
        dx: i32,
        dy: i32,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()>;
}

/// Available compute backends.
///
/// - `Cpu` is always available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Portable scalar implementation.
    #[default]
    Cpu,
}

/// Backend selection and limits for filter execution.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComputeSettings {
    pub backend: BackendKind,
    /// Largest gaussian kernel radius (pixels) a blur may use.
    pub max_blur_radius: u32,
}

impl Default for ComputeSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Cpu,
            max_blur_radius: 256,
        }
    }
}

/// Create a compute context for one execution.
pub fn create_context(settings: &ComputeSettings) -> SvgfxResult<Box<dyn ComputeContext>> {
    match settings.backend {
        BackendKind::Cpu => Ok(Box::new(crate::compute::cpu::CpuContext::new(*settings))),
    }
}
