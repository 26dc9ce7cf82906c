use crate::compute::backend::{BackendKind, ComputeContext, ComputeSettings};
use crate::compute::blend::{BlendIntrinsic, blend, blend_in_place};
use crate::compute::blur::{blur_rgba8_premul, kernel_radius};
use crate::foundation::core::PremulRgba8;
use crate::foundation::error::{SvgfxError, SvgfxResult};
use crate::surface::buffer::ImageBuffer;

/// Scalar CPU implementation of the compute intrinsics.
#[derive(Debug)]
pub struct CpuContext {
    settings: ComputeSettings,
}

impl CpuContext {
    pub fn new(settings: ComputeSettings) -> Self {
        tracing::trace!(?settings, "cpu compute context created");
        Self { settings }
    }
}

impl Drop for CpuContext {
    fn drop(&mut self) {
        tracing::trace!("cpu compute context released");
    }
}

fn ensure_same_size(a: &ImageBuffer, b: &ImageBuffer, what: &str) -> SvgfxResult<()> {
    if a.same_size(b) {
        return Ok(());
    }
    Err(SvgfxError::evaluation(format!(
        "{what}: operand sizes differ ({}x{} vs {}x{})",
        a.width(),
        a.height(),
        b.width(),
        b.height()
    )))
}

impl ComputeContext for CpuContext {
    fn kind(&self) -> BackendKind {
        BackendKind::Cpu
    }

    fn copy(&mut self, src: &ImageBuffer, dst: &mut ImageBuffer) -> SvgfxResult<()> {
        ensure_same_size(src, dst, "copy")?;
        dst.data_mut().copy_from_slice(src.data());
        Ok(())
    }

    fn blend(
        &mut self,
        op: BlendIntrinsic,
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()> {
        ensure_same_size(src, dst, "blend")?;
        blend_in_place(op, dst.data_mut(), src.data())
    }

    fn gaussian_blur(
        &mut self,
        sigma: f32,
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()> {
        ensure_same_size(src, dst, "gaussian_blur")?;
        let radius = kernel_radius(sigma, self.settings.max_blur_radius);
        let out = blur_rgba8_premul(src.data(), src.width(), src.height(), radius, sigma)?;
        dst.data_mut().copy_from_slice(&out);
        Ok(())
    }

    fn fill(&mut self, px: PremulRgba8, dst: &mut ImageBuffer) -> SvgfxResult<()> {
        for d in dst.data_mut().chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
        Ok(())
    }

    fn draw_offset(
        &mut self,
        src: &ImageBuffer,
        dx: i32,
        dy: i32,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()> {
        let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
        let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
        let (dx, dy) = (i64::from(dx), i64::from(dy));

        // Destination span covered by the translated source, clipped to `dst`.
        let x0 = dx.max(0);
        let x1 = (dx + sw).min(dw);
        let y0 = dy.max(0);
        let y1 = (dy + sh).min(dh);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        for y in y0..y1 {
            for x in x0..x1 {
                let (sx, sy) = ((x - dx) as u32, (y - dy) as u32);
                let (tx, ty) = (x as u32, y as u32);
                if let (Some(s), Some(d)) = (src.pixel(sx, sy), dst.pixel(tx, ty)) {
                    dst.set_pixel(tx, ty, blend(BlendIntrinsic::SrcOver, s, d));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compute/cpu.rs"]
mod tests;
