//! Mapping from SVG blend modes and composite operators to compute intrinsics.
//!
//! The intrinsic set has no screen/darken/lighten and no arithmetic compositing; those entries are
//! marked [`Fidelity::Approximate`].

use crate::compute::blend::BlendIntrinsic;
use crate::filter::operation::{BlendMode, CompositeOperator};

/// How faithfully an intrinsic reproduces the requested SVG operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fidelity {
    Exact,
    /// A stand-in is used; results differ visibly from the SVG definition.
    Approximate,
}

/// One row of the fallback table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntrinsicMapping {
    pub intrinsic: BlendIntrinsic,
    pub fidelity: Fidelity,
}

const fn exact(intrinsic: BlendIntrinsic) -> IntrinsicMapping {
    IntrinsicMapping {
        intrinsic,
        fidelity: Fidelity::Exact,
    }
}

const fn approx(intrinsic: BlendIntrinsic) -> IntrinsicMapping {
    IntrinsicMapping {
        intrinsic,
        fidelity: Fidelity::Approximate,
    }
}

/// `feBlend` modes.
pub const BLEND_MODES: [(BlendMode, IntrinsicMapping); 5] = [
    (BlendMode::Normal, exact(BlendIntrinsic::SrcOver)),
    (BlendMode::Multiply, exact(BlendIntrinsic::Multiply)),
    (BlendMode::Screen, approx(BlendIntrinsic::Multiply)),
    (BlendMode::Darken, approx(BlendIntrinsic::Multiply)),
    (BlendMode::Lighten, approx(BlendIntrinsic::Multiply)),
];

/// `feComposite` operators. Arithmetic ignores k1..k4.
pub const COMPOSITE_OPERATORS: [(CompositeOperator, IntrinsicMapping); 6] = [
    (CompositeOperator::Over, exact(BlendIntrinsic::SrcOver)),
    (CompositeOperator::In, exact(BlendIntrinsic::SrcIn)),
    (CompositeOperator::Out, exact(BlendIntrinsic::SrcOut)),
    (CompositeOperator::Atop, exact(BlendIntrinsic::SrcAtop)),
    (CompositeOperator::Xor, exact(BlendIntrinsic::Xor)),
    (CompositeOperator::Arithmetic, approx(BlendIntrinsic::Multiply)),
];

pub fn blend_mode_mapping(mode: BlendMode) -> IntrinsicMapping {
    BLEND_MODES
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, mapping)| *mapping)
        .unwrap_or(exact(BlendIntrinsic::SrcOver))
}

pub fn composite_mapping(operator: CompositeOperator) -> IntrinsicMapping {
    COMPOSITE_OPERATORS
        .iter()
        .find(|(o, _)| *o == operator)
        .map(|(_, mapping)| *mapping)
        .unwrap_or(exact(BlendIntrinsic::SrcOver))
}

#[cfg(test)]
#[path = "../../tests/unit/filter/fallback.rs"]
mod tests;
