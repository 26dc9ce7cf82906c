//! Handle-based SVG engine used to produce source images for filters.

pub(crate) mod raster;
