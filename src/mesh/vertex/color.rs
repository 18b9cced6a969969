use crate::float_types::Real;

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const WHITE: Color32 = Color32::new(255, 255, 255, 255);
    pub const BLACK: Color32 = Color32::new(0, 0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color32 { r, g, b, a }
    }

    /// Channel-wise linear blend, `t = 0` gives `self` and `t = 1` gives `other`.
    /// `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: &Color32, t: Real) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as Real + (b as Real - a as Real) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Color32 {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Packed `0xAARRGGBB` value, handy as a hash or equality key.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl From<[u8; 4]> for Color32 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Color32::new(r, g, b, a)
    }
}

impl From<Color32> for [u8; 4] {
    fn from(c: Color32) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}
