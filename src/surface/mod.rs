//! Owned raster buffers exchanged between the filter compositor and its callers.

pub(crate) mod buffer;
