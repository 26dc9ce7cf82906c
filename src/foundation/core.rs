pub use kurbo::{Rect, Vec2};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Informational filter-primitive subregion in pixels (`x`, `y`, `width`, `height`).
///
/// Execution currently always covers the full buffer extent; the region is carried so callers
/// and logs can see what the document asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Subregion {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Subregion {
    /// Build a subregion from its four components.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The region as a `kurbo` rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }

    /// `true` when the region has no area, i.e. "use the whole canvas".
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Packed `0xAARRGGBB` color as used by platform bitmaps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Argb(pub u32);

impl Argb {
    /// Pack straight-alpha components.
    pub fn from_components(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    /// Replace the alpha byte.
    pub fn with_alpha(self, a: u8) -> Self {
        Self((self.0 & 0x00ff_ffff) | (u32::from(a) << 24))
    }

    /// Alpha component.
    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Straight-alpha `[r, g, b, a]`.
    pub fn to_rgba(self) -> [u8; 4] {
        [
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
            self.0 as u8,
            self.alpha(),
        ]
    }

    /// Premultiplied `[r, g, b, a]`.
    pub fn to_premul(self) -> PremulRgba8 {
        crate::foundation::math::premultiply(self.to_rgba())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
