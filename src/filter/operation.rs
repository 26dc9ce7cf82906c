use crate::compute::backend::ComputeContext;
use crate::filter::fallback::{Fidelity, IntrinsicMapping, blend_mode_mapping, composite_mapping};
use crate::filter::input::InputRef;
use crate::foundation::core::{Argb, PremulRgba8, Subregion, Vec2};
use crate::foundation::error::SvgfxResult;
use crate::surface::buffer::ImageBuffer;

/// `feBlend` mode. Binding codes 0..=4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Darken,
    Lighten,
}

impl BlendMode {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Normal),
            1 => Some(Self::Multiply),
            2 => Some(Self::Screen),
            3 => Some(Self::Darken),
            4 => Some(Self::Lighten),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Multiply => 1,
            Self::Screen => 2,
            Self::Darken => 3,
            Self::Lighten => 4,
        }
    }
}

/// `feComposite` operator. Binding codes 1..=6.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeOperator {
    #[default]
    Over,
    In,
    Out,
    Atop,
    Xor,
    Arithmetic,
}

impl CompositeOperator {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Over),
            2 => Some(Self::In),
            3 => Some(Self::Out),
            4 => Some(Self::Atop),
            5 => Some(Self::Xor),
            6 => Some(Self::Arithmetic),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Over => 1,
            Self::In => 2,
            Self::Out => 3,
            Self::Atop => 4,
            Self::Xor => 5,
            Self::Arithmetic => 6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Blend {
    #[serde(default)]
    pub region: Subregion,
    #[serde(rename = "in")]
    pub input: InputRef,
    #[serde(rename = "in2")]
    pub input2: InputRef,
    #[serde(default)]
    pub mode: BlendMode,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Composite {
    #[serde(default)]
    pub region: Subregion,
    #[serde(default)]
    pub operator: CompositeOperator,
    #[serde(rename = "in")]
    pub input: InputRef,
    #[serde(rename = "in2")]
    pub input2: InputRef,
    /// Arithmetic coefficients `k1..k4`; accepted but not applied.
    #[serde(default)]
    pub k: [f64; 4],
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Flood {
    #[serde(default)]
    pub region: Subregion,
    /// Ignored by execution; kept for parity with the other primitives.
    #[serde(rename = "in")]
    pub input: InputRef,
    /// `0x00RRGGBB`; the top byte is replaced by the opacity.
    pub color: Argb,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GaussianBlur {
    #[serde(default)]
    pub region: Subregion,
    #[serde(rename = "in")]
    pub input: InputRef,
    pub std_dev_x: f64,
    pub std_dev_y: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    #[serde(default)]
    pub region: Subregion,
    #[serde(rename = "in")]
    pub input: InputRef,
    pub dx: f64,
    pub dy: f64,
}

/// One filter primitive.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    Blend(Blend),
    Composite(Composite),
    Flood(Flood),
    GaussianBlur(GaussianBlur),
    Offset(Offset),
}

impl Operation {
    pub fn blend(input: InputRef, input2: InputRef, mode: BlendMode) -> Self {
        Self::Blend(Blend {
            region: Subregion::default(),
            input,
            input2,
            mode,
        })
    }

    pub fn composite(operator: CompositeOperator, input: InputRef, input2: InputRef) -> Self {
        Self::Composite(Composite {
            region: Subregion::default(),
            operator,
            input,
            input2,
            k: [0.0; 4],
        })
    }

    /// `color` is `0x00RRGGBB`.
    pub fn flood(color: u32, opacity: f64) -> Self {
        Self::Flood(Flood {
            region: Subregion::default(),
            input: InputRef::Source,
            color: Argb(color & 0x00ff_ffff),
            opacity,
        })
    }

    pub fn gaussian_blur(input: InputRef, std_dev_x: f64, std_dev_y: f64) -> Self {
        Self::GaussianBlur(GaussianBlur {
            region: Subregion::default(),
            input,
            std_dev_x,
            std_dev_y,
        })
    }

    pub fn offset(input: InputRef, dx: f64, dy: f64) -> Self {
        Self::Offset(Offset {
            region: Subregion::default(),
            input,
            dx,
            dy,
        })
    }

    /// SVG element name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blend(_) => "feBlend",
            Self::Composite(_) => "feComposite",
            Self::Flood(_) => "feFlood",
            Self::GaussianBlur(_) => "feGaussianBlur",
            Self::Offset(_) => "feOffset",
        }
    }

    pub fn region(&self) -> Subregion {
        match self {
            Self::Blend(op) => op.region,
            Self::Composite(op) => op.region,
            Self::Flood(op) => op.region,
            Self::GaussianBlur(op) => op.region,
            Self::Offset(op) => op.region,
        }
    }

    /// Set the informational subregion.
    pub fn with_region(mut self, region: Subregion) -> Self {
        match &mut self {
            Self::Blend(op) => op.region = region,
            Self::Composite(op) => op.region = region,
            Self::Flood(op) => op.region = region,
            Self::GaussianBlur(op) => op.region = region,
            Self::Offset(op) => op.region = region,
        }
        self
    }

    /// Inputs read by execution, in `(in, in2)` order. Flood reads nothing.
    pub fn inputs(&self) -> (Option<InputRef>, Option<InputRef>) {
        match self {
            Self::Blend(op) => (Some(op.input), Some(op.input2)),
            Self::Composite(op) => (Some(op.input), Some(op.input2)),
            Self::Flood(_) => (None, None),
            Self::GaussianBlur(op) => (Some(op.input), None),
            Self::Offset(op) => (Some(op.input), None),
        }
    }

    /// Definition-time rewrites applied when a primitive is appended to a stack.
    ///
    /// Gaussian blurs get non-finite or negative deviations zeroed, a single zero axis takes the
    /// other axis' value, and a blur with both deviations zero becomes `Composite(over, in, in)`.
    pub fn normalized(self) -> Self {
        match self {
            Self::GaussianBlur(blur) => blur.normalized(),
            other => other,
        }
    }

    /// Run this primitive. `input`/`input2` are the resolved buffers (transparent when the
    /// reference carried no pixels); every buffer has the execution's dimensions.
    pub(crate) fn run(
        &self,
        ctx: &mut dyn ComputeContext,
        input: &ImageBuffer,
        input2: &ImageBuffer,
    ) -> SvgfxResult<ImageBuffer> {
        match self {
            Self::Blend(op) => op.run(ctx, input, input2),
            Self::Composite(op) => op.run(ctx, input, input2),
            Self::Flood(op) => op.run(ctx, input),
            Self::GaussianBlur(op) => op.run(ctx, input),
            Self::Offset(op) => op.run(ctx, input),
        }
    }
}

fn note_approximation(what: &'static str, detail: &dyn std::fmt::Debug, mapping: IntrinsicMapping) {
    if mapping.fidelity == Fidelity::Approximate {
        tracing::debug!(
            primitive = what,
            requested = ?detail,
            intrinsic = ?mapping.intrinsic,
            "approximating unsupported operator"
        );
    }
}

/// `out = copy(in2)`, then `in` is blended onto `out`.
fn blend_onto_copy(
    ctx: &mut dyn ComputeContext,
    mapping: IntrinsicMapping,
    input: &ImageBuffer,
    input2: &ImageBuffer,
) -> SvgfxResult<ImageBuffer> {
    let mut out = input2.transparent_like();
    ctx.copy(input2, &mut out)?;
    ctx.blend(mapping.intrinsic, input, &mut out)?;
    Ok(out)
}

impl Blend {
    fn run(
        &self,
        ctx: &mut dyn ComputeContext,
        input: &ImageBuffer,
        input2: &ImageBuffer,
    ) -> SvgfxResult<ImageBuffer> {
        let mapping = blend_mode_mapping(self.mode);
        note_approximation("feBlend", &self.mode, mapping);
        blend_onto_copy(ctx, mapping, input, input2)
    }
}

impl Composite {
    fn run(
        &self,
        ctx: &mut dyn ComputeContext,
        input: &ImageBuffer,
        input2: &ImageBuffer,
    ) -> SvgfxResult<ImageBuffer> {
        let mapping = composite_mapping(self.operator);
        note_approximation("feComposite", &self.operator, mapping);
        blend_onto_copy(ctx, mapping, input, input2)
    }
}

impl Flood {
    /// `round(opacity * 255)`, saturating into `0..=255` (NaN maps to 0).
    pub fn alpha(&self) -> u8 {
        (self.opacity * 255.0).round() as u8
    }

    pub fn premul_pixel(&self) -> PremulRgba8 {
        self.color.with_alpha(self.alpha()).to_premul()
    }

    fn run(&self, ctx: &mut dyn ComputeContext, canvas: &ImageBuffer) -> SvgfxResult<ImageBuffer> {
        let mut out = canvas.transparent_like();
        ctx.fill(self.premul_pixel(), &mut out)?;
        Ok(out)
    }
}

fn sanitize_deviation(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

impl GaussianBlur {
    fn normalized(self) -> Operation {
        let sx = sanitize_deviation(self.std_dev_x);
        let sy = sanitize_deviation(self.std_dev_y);
        let (sx, sy) = match (sx == 0.0, sy == 0.0) {
            (true, false) => (sy, sy),
            (false, true) => (sx, sx),
            _ => (sx, sy),
        };

        if sx == 0.0 && sy == 0.0 {
            return Operation::Composite(Composite {
                region: self.region,
                operator: CompositeOperator::Over,
                input: self.input,
                input2: self.input,
                k: [0.0; 4],
            });
        }

        Operation::GaussianBlur(GaussianBlur {
            std_dev_x: sx,
            std_dev_y: sy,
            ..self
        })
    }

    fn run(&self, ctx: &mut dyn ComputeContext, input: &ImageBuffer) -> SvgfxResult<ImageBuffer> {
        if self.std_dev_x != self.std_dev_y {
            tracing::debug!(
                std_dev_x = self.std_dev_x,
                std_dev_y = self.std_dev_y,
                "elliptical blur requested; using std_dev_x for both axes"
            );
        }
        // Finite deviations beyond f32 range still blur at the radius cap.
        let sigma = self.std_dev_x.min(f64::from(f32::MAX)) as f32;
        let mut out = input.transparent_like();
        ctx.gaussian_blur(sigma, input, &mut out)?;
        Ok(out)
    }
}

impl Offset {
    /// Whole-pixel translation; halves round away from zero and huge values saturate.
    pub fn shift(&self) -> (i32, i32) {
        let v = Vec2::new(self.dx, self.dy).round();
        (v.x as i32, v.y as i32)
    }

    fn run(&self, ctx: &mut dyn ComputeContext, input: &ImageBuffer) -> SvgfxResult<ImageBuffer> {
        let (dx, dy) = self.shift();
        let mut out = input.transparent_like();
        ctx.draw_offset(input, dx, dy, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/operation.rs"]
mod tests;
