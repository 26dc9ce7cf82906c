use crate::foundation::core::PremulRgba8;
use crate::foundation::error::{SvgfxError, SvgfxResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Porter-Duff and separable blend intrinsics available to a compute context.
///
/// `src` is the incoming layer and `dst` is the buffer modified in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendIntrinsic {
    /// Both operands discarded.
    Clear,
    /// `src` replaces `dst`.
    Src,
    /// `dst` kept.
    Dst,
    /// `src` over `dst`.
    SrcOver,
    /// `dst` over `src`.
    DstOver,
    /// `src` masked by `dst` alpha.
    SrcIn,
    /// `dst` masked by `src` alpha.
    DstIn,
    /// `src` where `dst` is transparent.
    SrcOut,
    /// `dst` where `src` is transparent.
    DstOut,
    /// `src` on top of `dst`, keeping `dst` coverage.
    SrcAtop,
    /// `dst` on top of `src`, keeping `src` coverage.
    DstAtop,
    /// Non-overlapping parts of both.
    Xor,
    /// Separable multiply (W3C compositing formula).
    Multiply,
}

/// Blend one premultiplied pixel.
pub fn blend(op: BlendIntrinsic, src: PremulRgba8, dst: PremulRgba8) -> PremulRgba8 {
    let sa = u16::from(src[3]);
    let da = u16::from(dst[3]);
    let inv_sa = 255 - sa;
    let inv_da = 255 - da;

    let mut out = [0u8; 4];
    match op {
        BlendIntrinsic::Clear => {}
        BlendIntrinsic::Src => out = src,
        BlendIntrinsic::Dst => out = dst,
        BlendIntrinsic::SrcOver => {
            for i in 0..4 {
                out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv_sa));
            }
        }
        BlendIntrinsic::DstOver => {
            for i in 0..4 {
                out[i] = add_sat_u8(dst[i], mul_div255_u8(u16::from(src[i]), inv_da));
            }
        }
        BlendIntrinsic::SrcIn => {
            for i in 0..4 {
                out[i] = mul_div255_u8(u16::from(src[i]), da);
            }
        }
        BlendIntrinsic::DstIn => {
            for i in 0..4 {
                out[i] = mul_div255_u8(u16::from(dst[i]), sa);
            }
        }
        BlendIntrinsic::SrcOut => {
            for i in 0..4 {
                out[i] = mul_div255_u8(u16::from(src[i]), inv_da);
            }
        }
        BlendIntrinsic::DstOut => {
            for i in 0..4 {
                out[i] = mul_div255_u8(u16::from(dst[i]), inv_sa);
            }
        }
        BlendIntrinsic::SrcAtop => {
            for i in 0..3 {
                out[i] = add_sat_u8(
                    mul_div255_u8(u16::from(src[i]), da),
                    mul_div255_u8(u16::from(dst[i]), inv_sa),
                );
            }
            out[3] = dst[3];
        }
        BlendIntrinsic::DstAtop => {
            for i in 0..3 {
                out[i] = add_sat_u8(
                    mul_div255_u8(u16::from(dst[i]), sa),
                    mul_div255_u8(u16::from(src[i]), inv_da),
                );
            }
            out[3] = src[3];
        }
        BlendIntrinsic::Xor => {
            for i in 0..4 {
                out[i] = add_sat_u8(
                    mul_div255_u8(u16::from(src[i]), inv_da),
                    mul_div255_u8(u16::from(dst[i]), inv_sa),
                );
            }
        }
        BlendIntrinsic::Multiply => {
            for i in 0..3 {
                let both = mul_div255_u8(u16::from(src[i]), u16::from(dst[i]));
                let s_only = mul_div255_u8(u16::from(src[i]), inv_da);
                let d_only = mul_div255_u8(u16::from(dst[i]), inv_sa);
                out[i] = add_sat_u8(add_sat_u8(both, s_only), d_only);
            }
            out[3] = add_sat_u8(src[3], mul_div255_u8(da, inv_sa));
        }
    }
    out
}

/// Apply `op` with `src` onto every pixel of `dst`.
pub fn blend_in_place(op: BlendIntrinsic, dst: &mut [u8], src: &[u8]) -> SvgfxResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SvgfxError::evaluation(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = blend(op, [s[0], s[1], s[2], s[3]], [d[0], d[1], d[2], d[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compute/blend.rs"]
mod tests;
