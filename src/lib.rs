//! svgfx executes SVG filter-effect stacks over premultiplied RGBA8 images.
//!
//! - Define named filters on a [`FilterRegistry`] (typed [`Operation`]s, raw binding codes, or a
//!   JSON [`FilterDocument`])
//! - Select one and [`execute`](FilterRegistry::execute) it against a background/source pair
//! - Optionally render the source with the [`SvgEngine`]
//!
//! Execution never fails: unresolvable inputs and failing primitives degrade to transparent
//! output and are reported through `tracing`.
#![forbid(unsafe_code)]

mod compute;
mod config;
mod engine;
mod filter;
mod foundation;
mod surface;

pub use crate::compute::backend::{BackendKind, ComputeContext, ComputeSettings, create_context};
pub use crate::compute::blend::{BlendIntrinsic, blend, blend_in_place};
pub use crate::compute::blur::{blur_rgba8_premul, kernel_radius};
pub use crate::compute::cpu::CpuContext;
pub use crate::config::document::{
    ColorSpec, FilterDef, FilterDocument, InputSpec, PrimitiveDef, PrimitiveKind,
};
pub use crate::engine::raster::{SvgEngine, SvgHandle};
pub use crate::filter::fallback::{
    BLEND_MODES, COMPOSITE_OPERATORS, Fidelity, IntrinsicMapping, blend_mode_mapping,
    composite_mapping,
};
pub use crate::filter::input::InputRef;
pub use crate::filter::operation::{
    Blend, BlendMode, Composite, CompositeOperator, Flood, GaussianBlur, Offset, Operation,
};
pub use crate::filter::registry::{FilterBuilder, FilterRegistry};
pub use crate::filter::stack::FilterStack;
pub use crate::foundation::core::{Argb, PremulRgba8, Rect, Subregion, Vec2};
pub use crate::foundation::error::{SvgfxError, SvgfxResult};
pub use crate::surface::buffer::ImageBuffer;
