//! Pixel color type and channel layout.
//!
//! Pixels are stored as four 8-bit channels in R, G, B, A byte order.
//! Hosts that hand over packed 32-bit ARGB words (`0xAARRGGBB`) convert
//! through [`Rgba8::from_argb32`] / [`Rgba8::to_argb32`].

// ============================================================================
// Component order
// ============================================================================

/// RGBA component order: R=0, G=1, B=2, A=3
pub struct OrderRgba;
impl OrderRgba {
    pub const R: usize = 0;
    pub const G: usize = 1;
    pub const B: usize = 2;
    pub const A: usize = 3;
    pub const N: usize = 4;
}

// ============================================================================
// Rgba8 (8-bit per channel)
// ============================================================================

/// RGBA color with u8 components. Not premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_SCALE: u32 = 1 << Self::BASE_SHIFT;
    pub const BASE_MASK: u32 = Self::BASE_SCALE - 1;

    pub const TRANSPARENT: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Rgba8 = Rgba8 { r: 255, g: 255, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn new_opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, Self::BASE_MASK as u8)
    }

    /// Unpack a `0xAARRGGBB` word.
    #[inline]
    pub const fn from_argb32(v: u32) -> Self {
        Self {
            a: (v >> 24) as u8,
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
        }
    }

    /// Pack into a `0xAARRGGBB` word.
    #[inline]
    pub const fn to_argb32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Read a pixel from a 4-byte RGBA slice.
    #[inline]
    pub fn from_slice(p: &[u8]) -> Self {
        Self {
            r: p[OrderRgba::R],
            g: p[OrderRgba::G],
            b: p[OrderRgba::B],
            a: p[OrderRgba::A],
        }
    }

    /// Write this pixel into a 4-byte RGBA slice.
    #[inline]
    pub fn write_to(self, p: &mut [u8]) {
        p[OrderRgba::R] = self.r;
        p[OrderRgba::G] = self.g;
        p[OrderRgba::B] = self.b;
        p[OrderRgba::A] = self.a;
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl From<u32> for Rgba8 {
    fn from(v: u32) -> Self {
        Self::from_argb32(v)
    }
}

impl From<Rgba8> for u32 {
    fn from(c: Rgba8) -> Self {
        c.to_argb32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb32_unpack() {
        let c = Rgba8::from_argb32(0x80FF4020);
        assert_eq!(c, Rgba8::new(0xFF, 0x40, 0x20, 0x80));
    }

    #[test]
    fn test_argb32_pack() {
        assert_eq!(Rgba8::new(1, 2, 3, 4).to_argb32(), 0x04010203);
        assert_eq!(u32::from(Rgba8::WHITE), 0xFFFF_FFFF);
    }

    #[test]
    fn test_slice_layout_is_rgba() {
        let mut bytes = [0u8; 4];
        Rgba8::new(10, 20, 30, 40).write_to(&mut bytes);
        assert_eq!(bytes, [10, 20, 30, 40]);
        assert_eq!(Rgba8::from_slice(&bytes).to_bytes(), bytes);
    }

    #[test]
    fn test_new_opaque_and_default() {
        assert_eq!(Rgba8::new_opaque(1, 2, 3), Rgba8::new(1, 2, 3, 255));
        assert_eq!(Rgba8::default(), Rgba8::TRANSPARENT);
    }
}
