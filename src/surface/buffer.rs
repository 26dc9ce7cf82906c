use crate::foundation::core::{Argb, PremulRgba8};
use crate::foundation::error::{SvgfxError, SvgfxResult};
use crate::foundation::math::{premultiply, unpremultiply};

/// An owned 2D raster in premultiplied RGBA8, row-major, no padding.
///
/// Every intermediate in a filter execution is an `ImageBuffer`. Ownership is exclusive: a buffer
/// lives in exactly one place (a node slot, a derived cache entry, or the caller's hands) and is
/// lent out read-only to the nodes that consume it.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> SvgfxResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SvgfxError::evaluation("image buffer size overflow"))
}

impl ImageBuffer {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> SvgfxResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Allocate a buffer filled with one premultiplied pixel.
    pub fn filled(width: u32, height: u32, px: PremulRgba8) -> SvgfxResult<Self> {
        let len = byte_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            data.extend_from_slice(&px);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A transparent buffer with the same dimensions as `self`.
    pub fn transparent_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: vec![0u8; self.data.len()],
        }
    }

    /// Wrap existing premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> SvgfxResult<Self> {
        if data.len() != byte_len(width, height)? {
            return Err(SvgfxError::validation(
                "premultiplied data must be width*height*4 bytes",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert from a straight-alpha platform bitmap.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = img.as_raw().clone();
        for px in data.chunks_exact_mut(4) {
            let p = premultiply([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&p);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Convert from packed straight-alpha `0xAARRGGBB` pixels (Android `int[]` bitmap layout).
    pub fn from_argb_pixels(width: u32, height: u32, pixels: &[u32]) -> SvgfxResult<Self> {
        if pixels.len().checked_mul(4) != Some(byte_len(width, height)?) {
            return Err(SvgfxError::validation(
                "argb pixel slice must contain width*height entries",
            ));
        }
        let mut data = Vec::with_capacity(pixels.len() * 4);
        for &p in pixels {
            data.extend_from_slice(&Argb(p).to_premul());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert to a straight-alpha platform bitmap.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let idx = self.index(x, y);
            let px = [
                self.data[idx],
                self.data[idx + 1],
                self.data[idx + 2],
                self.data[idx + 3],
            ];
            image::Rgba(unpremultiply(px))
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel_straight(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel(x, y).map(unpremultiply)
    }

    /// Overwrite one pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: PremulRgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    pub fn same_size(&self, other: &ImageBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Crop (top-left anchored) or pad with transparency to `width` x `height`.
    pub fn fit_to(&self, width: u32, height: u32) -> SvgfxResult<ImageBuffer> {
        if self.width == width && self.height == height {
            return Ok(self.clone());
        }
        let mut out = ImageBuffer::new(width, height)?;
        let copy_w = self.width.min(width) as usize * 4;
        for y in 0..self.height.min(height) {
            let src = self.index(0, y);
            let dst = out.index(0, y);
            out.data[dst..dst + copy_w].copy_from_slice(&self.data[src..src + copy_w]);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/buffer.rs"]
mod tests;
