//! Image-processing intrinsics used by the filter compositor.

pub(crate) mod backend;
pub(crate) mod blend;
pub(crate) mod blur;
pub(crate) mod cpu;
