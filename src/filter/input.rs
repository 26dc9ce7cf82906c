use std::fmt;

/// Where a filter primitive reads one of its inputs from.
///
/// The raw `i32` encoding is the one used across the binding boundary: non-negative values index
/// earlier primitives of the same stack, negative values name special slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputRef {
    /// `SourceGraphic` (-1).
    Source,
    /// Alpha channel of the source (-2).
    SourceAlpha,
    /// `BackgroundImage` (-3).
    Background,
    /// Alpha channel of the background (-4).
    BackgroundAlpha,
    /// `FillPaint` (-5). Reserved; resolves to no buffer.
    FillPaint,
    /// `StrokePaint` (-6). Reserved; resolves to no buffer.
    StrokePaint,
    /// Output of the primitive at this index.
    Node(usize),
    /// Any other negative code. Resolves to no buffer.
    Unknown(i32),
}

impl InputRef {
    pub fn from_raw(code: i32) -> Self {
        match code {
            -1 => Self::Source,
            -2 => Self::SourceAlpha,
            -3 => Self::Background,
            -4 => Self::BackgroundAlpha,
            -5 => Self::FillPaint,
            -6 => Self::StrokePaint,
            n if n >= 0 => Self::Node(n as usize),
            n => Self::Unknown(n),
        }
    }

    /// Raw binding code. Node indices beyond `i32::MAX` saturate.
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Source => -1,
            Self::SourceAlpha => -2,
            Self::Background => -3,
            Self::BackgroundAlpha => -4,
            Self::FillPaint => -5,
            Self::StrokePaint => -6,
            Self::Node(i) => i32::try_from(i).unwrap_or(i32::MAX),
            Self::Unknown(n) => n,
        }
    }

    /// Parse an SVG `in` keyword. Result names are not keywords and return `None`.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.trim() {
            "SourceGraphic" => Some(Self::Source),
            "SourceAlpha" => Some(Self::SourceAlpha),
            "BackgroundImage" | "BackgroundGraphic" => Some(Self::Background),
            "BackgroundAlpha" => Some(Self::BackgroundAlpha),
            "FillPaint" => Some(Self::FillPaint),
            "StrokePaint" => Some(Self::StrokePaint),
            _ => None,
        }
    }

    /// Slots that never carry pixels in this compositor.
    pub fn is_reserved(self) -> bool {
        matches!(self, Self::FillPaint | Self::StrokePaint | Self::Unknown(_))
    }
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("SourceGraphic"),
            Self::SourceAlpha => f.write_str("SourceAlpha"),
            Self::Background => f.write_str("BackgroundImage"),
            Self::BackgroundAlpha => f.write_str("BackgroundAlpha"),
            Self::FillPaint => f.write_str("FillPaint"),
            Self::StrokePaint => f.write_str("StrokePaint"),
            Self::Node(i) => write!(f, "#{i}"),
            Self::Unknown(n) => write!(f, "unknown({n})"),
        }
    }
}

// Serialized as the raw binding code so documents and dumps stay compact.
impl serde::Serialize for InputRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.to_raw())
    }
}

impl<'de> serde::Deserialize<'de> for InputRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i32::deserialize(deserializer).map(Self::from_raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/input.rs"]
mod tests;
